//! # EMBER
//!
//! The main crate, integrating the shared types and the effects core.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       EMBER                              │
//! ├──────────────────────────────────────────────────────────┤
//! │  ember_shared        ember_effects          host         │
//! │  • Vec2        ───>  • ParticleSystem  ───> VisualHost   │
//! │  • Color             • ExpiryTimeline       (renderer)   │
//! │                      • EffectsConfig                     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `demo`: Scripted headless runs with a fixed frame step

pub mod demo;

// Re-export the crates
pub use ember_effects as effects;
pub use ember_shared as shared;

// Re-export commonly used types
pub use demo::{DemoReport, DemoScript, ScriptedEmission};
pub use ember_effects::{EffectsConfig, EffectsError, ParticleSystem, VisualHost};
pub use ember_shared::{Color, Vec2};

//! # EMBER Effects
//!
//! Preset particle effects for 2D games: explosions that burst outward and
//! decelerate, implosions that converge on a point.
//!
//! ## Design Principles
//!
//! 1. **Plain data** - a particle is a record, stepped by pure functions
//! 2. **Explicit host** - the renderer is passed in, never looked up globally
//! 3. **One timeline** - batch expiry is a timer checked inside `tick`
//! 4. **External configuration** - tuning comes from TOML or defaults
//!
//! ## Example
//!
//! ```rust
//! use ember_effects::{EffectsConfig, ParticleSystem, RecordingHost};
//! use ember_shared::{Color, Vec2};
//!
//! let config = EffectsConfig::default().with_seed(7);
//! let mut fx = ParticleSystem::new(config, RecordingHost::new())?;
//!
//! fx.spawn_explosion(Vec2::new(0.0, 0.0), Color::RED, 10.0, 5);
//! for _ in 0..4 {
//!     fx.tick(0.5);
//! }
//! assert_eq!(fx.particle_count(), 0);
//! # Ok::<(), ember_effects::EffectsError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod emission;
pub mod error;
pub mod host;
pub mod kinematics;
pub mod particle;
pub mod system;
pub mod timeline;
pub mod transition;

pub use config::EffectsConfig;
pub use emission::EmissionRequest;
pub use error::{EffectsError, EffectsResult};
pub use host::{HostCall, RecordingHost, VisualHandle, VisualHost, VisualState};
pub use kinematics::KinematicsConfig;
pub use particle::{Batch, BatchId, EffectKind, Motion, Particle, ParticleShape};
pub use system::{EffectsStats, ParticleSystem};
pub use timeline::{ExpiryTimeline, TimerId};
pub use transition::LinearTransition;

//! # EMBER Shared
//!
//! Value types used by the effects core and by whatever host draws the
//! particles.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on a renderer or windowing crate.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod color;
pub mod math;

pub use color::Color;
pub use math::Vec2;

//! Emission requests and the randomness behind them.
//!
//! Speeds are skewed toward the radius: `radius * (1 - 0.6 / r)` with `r`
//! uniform in `[1, 6)` lands in `[0.4 * radius, 0.9 * radius)`, and most
//! draws sit near the top of that range.

use ember_shared::{Color, Vec2};
use rand::Rng;

use crate::particle::EffectKind;

/// Lower bound of the skew draw.
pub const SKEW_MIN: f32 = 1.0;
/// Upper bound (exclusive) of the skew draw.
pub const SKEW_MAX: f32 = 6.0;
/// Numerator of the skew term.
const SKEW_NUMERATOR: f32 = 0.6;

/// One spawn call. Produces exactly `count` particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionRequest {
    /// Effect to play
    pub kind: EffectKind,
    /// Emission point, also the implosion target
    pub origin: Vec2,
    /// Particle fill
    pub color: Color,
    /// Maximum initial speed (explosion) or scatter distance (implosion)
    pub radius: f32,
    /// Number of particles
    pub count: u32,
}

impl EmissionRequest {
    /// Explosion request
    #[must_use]
    pub const fn explosion(origin: Vec2, color: Color, radius: f32, count: u32) -> Self {
        Self {
            kind: EffectKind::Explosion,
            origin,
            color,
            radius,
            count,
        }
    }

    /// Implosion request
    #[must_use]
    pub const fn implosion(origin: Vec2, color: Color, radius: f32, count: u32) -> Self {
        Self {
            kind: EffectKind::Implosion,
            origin,
            color,
            radius,
            count,
        }
    }

    /// True when the request produces nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Deterministic part of the speed draw. `r` is expected in `[1, 6)`.
///
/// Non-positive (or NaN) radii give zero.
#[must_use]
pub fn speed_factor(radius: f32, r: f32) -> f32 {
    if radius > 0.0 {
        radius * (1.0 - SKEW_NUMERATOR / r)
    } else {
        0.0
    }
}

/// Random speed for a particle of the given radius.
pub fn random_speed<R: Rng>(rng: &mut R, radius: f32) -> f32 {
    let r = rng.gen_range(SKEW_MIN..SKEW_MAX);
    speed_factor(radius, r)
}

/// Uniformly distributed direction.
pub fn random_unit_vector<R: Rng>(rng: &mut R) -> Vec2 {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    Vec2::from_angle(angle)
}

/// Random offset with a skewed length, used both as an explosion velocity and
/// as an implosion scatter offset.
pub fn random_offset<R: Rng>(rng: &mut R, radius: f32) -> Vec2 {
    random_unit_vector(rng) * random_speed(rng, radius)
}

//! Per-particle kinematics.
//!
//! Pure functions over a [`Particle`]; no host access, no randomness.

use ember_shared::Vec2;

use crate::particle::{Motion, Particle};

/// Tuning for the explosion step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicsConfig {
    /// Velocity decay per time unit.
    pub drag_coefficient: f32,
    /// Manhattan speed below which velocity snaps to zero.
    pub velocity_epsilon: f32,
    /// Multiplier on displacement per step.
    pub motion_scale: f32,
}

impl Default for KinematicsConfig {
    fn default() -> Self {
        Self {
            drag_coefficient: 3.0,
            velocity_epsilon: 0.001,
            motion_scale: 1.0,
        }
    }
}

/// Multiplicative velocity decay for one step, clamped to `[0, 1]` so a long
/// step can stop a particle but never reverse or accelerate it.
#[must_use]
pub fn drag_factor(drag_coefficient: f32, dt: f32) -> f32 {
    (1.0 - drag_coefficient * dt).clamp(0.0, 1.0)
}

/// Heading of `v` in degrees, mirrored by 180 when `v.x <= 0`.
///
/// Axis-aligned (and zero) vectors have no heading; the caller keeps the
/// previous orientation.
#[must_use]
pub fn heading_degrees(v: Vec2) -> Option<f32> {
    if v.x == 0.0 || v.y == 0.0 {
        return None;
    }
    let angle = (v.y / v.x).atan().to_degrees();
    Some(if v.x > 0.0 { angle } else { angle + 180.0 })
}

/// Opacity that falls linearly from 1 at `elapsed = 0` to 0 at `duration`.
#[must_use]
pub fn linear_fade(elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return 0.0;
    }
    (1.0 - elapsed / duration).clamp(0.0, 1.0)
}

/// Advances a ballistic velocity/position pair by `dt`.
///
/// Order: drag, move, rest snap.
pub fn integrate(position: &mut Vec2, velocity: &mut Vec2, dt: f32, config: &KinematicsConfig) {
    *velocity *= drag_factor(config.drag_coefficient, dt);
    *position += *velocity * (dt * config.motion_scale);
    if velocity.manhattan_length() < config.velocity_epsilon {
        *velocity = Vec2::ZERO;
    }
}

/// Steps an explosion particle. Returns true if its orientation changed.
///
/// Converging particles are left untouched.
pub fn step_explosion(particle: &mut Particle, dt: f32, config: &KinematicsConfig) -> bool {
    let Motion::Ballistic { velocity } = &mut particle.motion else {
        return false;
    };

    integrate(&mut particle.position, velocity, dt, config);
    particle.lifetime = (particle.lifetime - dt).max(0.0);

    match heading_degrees(*velocity) {
        Some(angle) => {
            particle.orientation = angle;
            true
        }
        None => false,
    }
}

/// Moves an implosion particle to where it is `age` after emission and
/// re-aims it along its displacement from the origin. Returns true if its
/// orientation changed.
///
/// Ballistic particles are left untouched.
pub fn step_implosion(particle: &mut Particle, age: f32, duration: f32) -> bool {
    let Motion::Converging(transition) = &mut particle.motion else {
        return false;
    };

    particle.position = transition.seek(age);
    particle.lifetime = (duration - age).max(0.0);

    match heading_degrees(particle.position - particle.origin) {
        Some(angle) => {
            particle.orientation = angle;
            true
        }
        None => false,
    }
}

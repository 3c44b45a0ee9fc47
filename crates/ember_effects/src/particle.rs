//! Particle and batch records.
//!
//! A particle is plain data. Everything that changes it lives in
//! [`crate::kinematics`] and is driven by [`crate::ParticleSystem::tick`].

use ember_shared::{Color, Vec2};
use serde::{Deserialize, Serialize};

use crate::host::VisualHandle;
use crate::timeline::TimerId;
use crate::transition::LinearTransition;

/// Which preset effect a batch plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Particles fly outward from the origin and decelerate.
    Explosion,
    /// Particles start scattered around the origin and converge on it.
    Implosion,
}

/// Visual primitive the host draws for each particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleShape {
    /// Extent along the particle's heading.
    pub width: f32,
    /// Extent across the heading.
    pub height: f32,
}

impl ParticleShape {
    /// Creates a shape
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A 10x1 streak.
    pub const STREAK: Self = Self::new(10.0, 1.0);
}

impl Default for ParticleShape {
    fn default() -> Self {
        Self::STREAK
    }
}

/// How a particle moves.
#[derive(Debug, Clone, PartialEq)]
pub enum Motion {
    /// Free flight under drag.
    Ballistic {
        /// Current velocity, units per time unit.
        velocity: Vec2,
    },
    /// Linear travel from the scatter point to the origin.
    Converging(LinearTransition),
}

/// A single live particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Current position.
    pub position: Vec2,
    /// Emission point of the batch.
    pub origin: Vec2,
    /// Fill color.
    pub color: Color,
    /// Heading in degrees.
    pub orientation: f32,
    /// Current opacity, `1.0` at emission.
    pub opacity: f32,
    /// Time left until the batch expires.
    pub lifetime: f32,
    /// Movement model.
    pub motion: Motion,
    /// Host visual drawn for this particle.
    pub visual: VisualHandle,
}

impl Particle {
    /// Effect kind implied by the movement model.
    #[must_use]
    pub fn kind(&self) -> EffectKind {
        match self.motion {
            Motion::Ballistic { .. } => EffectKind::Explosion,
            Motion::Converging(_) => EffectKind::Implosion,
        }
    }

    /// Current velocity. Converging particles report zero, their motion is
    /// a position interpolation rather than an integrated velocity.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        match self.motion {
            Motion::Ballistic { velocity } => velocity,
            Motion::Converging(_) => Vec2::ZERO,
        }
    }
}

/// Identifies the batch produced by one spawn call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BatchId(pub u64);

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "batch#{}", self.0)
    }
}

/// Particles from one emission, removed together.
#[derive(Debug, Clone)]
pub struct Batch {
    pub(crate) id: BatchId,
    pub(crate) kind: EffectKind,
    pub(crate) particles: Vec<Particle>,
    pub(crate) duration: f32,
    pub(crate) spawned_at: f64,
    pub(crate) timer: TimerId,
}

impl Batch {
    /// Batch ID
    #[must_use]
    pub fn id(&self) -> BatchId {
        self.id
    }

    /// Effect kind
    #[must_use]
    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    /// Live particles
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Total lifetime of the batch.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Simulation time the batch was emitted at.
    #[must_use]
    pub fn spawned_at(&self) -> f64 {
        self.spawned_at
    }

    /// Simulation time the batch is removed at.
    #[must_use]
    pub fn deadline(&self) -> f64 {
        self.spawned_at + f64::from(self.duration)
    }

    /// Number of particles
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// True when the batch holds no particles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

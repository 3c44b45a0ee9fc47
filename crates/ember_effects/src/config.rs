//! Effect tuning, loaded once at startup.
//!
//! ```toml
//! drag_coefficient = 3.0
//! explosion_duration = 2.0
//! implosion_duration = 1.0
//! seed = 42
//!
//! [shape]
//! width = 10.0
//! height = 1.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EffectsError, EffectsResult};
use crate::kinematics::KinematicsConfig;
use crate::particle::{EffectKind, ParticleShape};

/// Configuration for a `ParticleSystem`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectsConfig {
    /// Velocity decay per time unit for explosion particles.
    pub drag_coefficient: f32,
    /// Manhattan speed below which a particle is considered at rest.
    pub velocity_epsilon: f32,
    /// Multiplier on per-tick displacement.
    pub motion_scale: f32,
    /// Lifetime of an explosion batch.
    pub explosion_duration: f32,
    /// Lifetime of an implosion batch, also its travel time.
    pub implosion_duration: f32,
    /// Fade implosion particles out like explosions instead of holding them opaque.
    pub implosion_fade: bool,
    /// RNG seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Visual primitive requested from the host for every particle.
    pub shape: ParticleShape,
}

impl EffectsConfig {
    /// Default drag coefficient.
    pub const DEFAULT_DRAG: f32 = 3.0;
    /// Default rest threshold.
    pub const DEFAULT_EPSILON: f32 = 0.001;
    /// Default explosion lifetime.
    pub const DEFAULT_EXPLOSION_DURATION: f32 = 2.0;
    /// Default implosion lifetime.
    pub const DEFAULT_IMPLOSION_DURATION: f32 = 1.0;

    /// Parses a config from TOML text and validates it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigParse` for malformed TOML or unknown keys and
    /// `InvalidConfig` for out-of-range values.
    pub fn from_toml_str(text: &str) -> EffectsResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| EffectsError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigRead` if the file cannot be read, otherwise the same
    /// errors as [`EffectsConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> EffectsResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| EffectsError::ConfigRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Serializes the config back to TOML.
    ///
    /// # Errors
    ///
    /// Returns `ConfigParse` if serialization fails.
    pub fn to_toml_string(&self) -> EffectsResult<String> {
        toml::to_string(self).map_err(|e| EffectsError::ConfigParse(e.to_string()))
    }

    /// Same config with a fixed RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks every value is in range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the first offending key.
    pub fn validate(&self) -> EffectsResult<()> {
        non_negative("drag_coefficient", self.drag_coefficient)?;
        non_negative("velocity_epsilon", self.velocity_epsilon)?;
        non_negative("motion_scale", self.motion_scale)?;
        positive("explosion_duration", self.explosion_duration)?;
        positive("implosion_duration", self.implosion_duration)?;
        positive("shape.width", self.shape.width)?;
        positive("shape.height", self.shape.height)?;
        Ok(())
    }

    /// Batch lifetime for an effect kind.
    #[must_use]
    pub fn duration(&self, kind: EffectKind) -> f32 {
        match kind {
            EffectKind::Explosion => self.explosion_duration,
            EffectKind::Implosion => self.implosion_duration,
        }
    }

    /// Whether particles of this kind fade out over their batch lifetime.
    #[must_use]
    pub fn fades(&self, kind: EffectKind) -> bool {
        match kind {
            EffectKind::Explosion => true,
            EffectKind::Implosion => self.implosion_fade,
        }
    }

    /// The subset of tuning the per-particle step needs.
    #[must_use]
    pub fn kinematics(&self) -> KinematicsConfig {
        KinematicsConfig {
            drag_coefficient: self.drag_coefficient,
            velocity_epsilon: self.velocity_epsilon,
            motion_scale: self.motion_scale,
        }
    }
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            drag_coefficient: Self::DEFAULT_DRAG,
            velocity_epsilon: Self::DEFAULT_EPSILON,
            motion_scale: 1.0,
            explosion_duration: Self::DEFAULT_EXPLOSION_DURATION,
            implosion_duration: Self::DEFAULT_IMPLOSION_DURATION,
            implosion_fade: false,
            seed: None,
            shape: ParticleShape::default(),
        }
    }
}

fn non_negative(key: &str, value: f32) -> EffectsResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EffectsError::InvalidConfig(format!(
            "{key} must be finite and >= 0, got {value}"
        )))
    }
}

fn positive(key: &str, value: f32) -> EffectsResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EffectsError::InvalidConfig(format!(
            "{key} must be finite and > 0, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EffectsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.duration(EffectKind::Explosion), 2.0);
        assert_eq!(config.duration(EffectKind::Implosion), 1.0);
        assert!(config.fades(EffectKind::Explosion));
        assert!(!config.fades(EffectKind::Implosion));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EffectsConfig::from_toml_str(
            "drag_coefficient = 1.5\nseed = 7\n\n[shape]\nwidth = 4.0\nheight = 2.0\n",
        )
        .unwrap();

        assert_eq!(config.drag_coefficient, 1.5);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.shape, ParticleShape::new(4.0, 2.0));
        assert_eq!(config.explosion_duration, 2.0);
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let err = EffectsConfig::from_toml_str("gravity = 9.8").unwrap_err();
        assert!(matches!(err, EffectsError::ConfigParse(_)));
    }

    #[test]
    fn test_rejects_zero_duration() {
        let err = EffectsConfig::from_toml_str("implosion_duration = 0.0").unwrap_err();
        assert_eq!(
            err,
            EffectsError::InvalidConfig(
                "implosion_duration must be finite and > 0, got 0".to_string()
            )
        );
    }

    #[test]
    fn test_rejects_negative_drag() {
        let err = EffectsConfig::from_toml_str("drag_coefficient = -1.0").unwrap_err();
        assert!(matches!(err, EffectsError::InvalidConfig(_)));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = EffectsConfig::from_toml_file("/nonexistent/ember/effects.toml").unwrap_err();
        assert!(matches!(err, EffectsError::ConfigRead { .. }));
    }

    #[test]
    fn test_toml_round_trip_of_seeded_config() {
        let config = EffectsConfig::default().with_seed(99);
        let text = config.to_toml_string().unwrap();
        assert_eq!(EffectsConfig::from_toml_str(&text).unwrap(), config);
    }
}

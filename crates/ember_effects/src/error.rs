//! # Effects Error Types
//!
//! Spawning and ticking never fail; configuration is the only fallible
//! surface of the effects core.

use thiserror::Error;

/// Errors that can occur while building a particle system.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EffectsError {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be read.
    #[error("failed to read config {path}: {reason}")]
    ConfigRead {
        /// Path that was read.
        path: String,
        /// Underlying I/O error message.
        reason: String,
    },

    /// The configuration file is not valid TOML for `EffectsConfig`.
    #[error("failed to parse config: {0}")]
    ConfigParse(String),
}

/// Result type for effects operations.
pub type EffectsResult<T> = Result<T, EffectsError>;

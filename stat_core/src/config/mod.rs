//! Configuration loading for tunable combat constants

mod constants;

pub use constants::{
    constants, constants_initialized, ensure_constants_initialized, init_constants,
    init_constants_default, CapConstants, CritConstants, GameConstants, HitConstants,
    MitigationConstants,
};

use thiserror::Error;

/// Error loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

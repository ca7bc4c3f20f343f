//! Construction-time errors
//!
//! Placement and tick operations never fail; "nothing happened" is an ordinary
//! outcome. Invalid parameters are rejected here, when samplers, ladders and
//! configs are built.

use thiserror::Error;
use verdure_content::FamilyError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("probability {0} is outside [0, 1]")]
    InvalidProbability(f32),

    #[error("variant modulus must be greater than zero")]
    ZeroModulus,

    #[error("climate policy needs reference temperature above base ({base} >= {reference})")]
    InvalidClimatePolicy { base: f32, reference: f32 },

    #[error("rarity ladder is invalid: {0}")]
    InvalidLadder(String),

    #[error("config value '{field}' is invalid: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error(transparent)]
    Family(#[from] FamilyError),

    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

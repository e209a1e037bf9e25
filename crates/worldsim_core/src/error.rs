//! Error types for worldsim_core.
//!
//! Only configuration problems surface as errors. Soft runtime conditions
//! (no target, ineligible mate, blocked tile) are resolved where they occur.

use thiserror::Error;

/// Main error type for worldsim_core operations.
#[derive(Error, Debug)]
pub enum SimError {
    /// The walkability table marks no biome as walkable or slow.
    #[error("Walkability table has no walkable or slow biome")]
    MissingWalkability,

    /// Biome thresholds are not strictly increasing or are negative.
    #[error("Malformed biome bands: {0}")]
    MalformedBands(String),

    /// Zero-sized or oversized grid.
    #[error("Invalid grid size {width}x{height}")]
    InvalidGrid { width: u16, height: u16 },

    /// A handle that is not (or no longer) registered.
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    /// TOML parsing errors
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type alias for worldsim_core operations.
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    /// Creates a new malformed bands error.
    #[must_use]
    pub fn bands<S: Into<String>>(msg: S) -> Self {
        Self::MalformedBands(msg.into())
    }

    /// Creates a new unknown entity error.
    #[must_use]
    pub fn unknown_entity<S: Into<String>>(what: S) -> Self {
        Self::UnknownEntity(what.into())
    }
}

use thiserror::Error;

use crate::config::ALLOWED_MODULUS_BITS;

/// A construction-time contract violation, one variant per constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("share count must be >= threshold (threshold={threshold}, share_count={share_count})")]
    ShareCountBelowThreshold { threshold: u32, share_count: u32 },
    #[error("threshold must be >= {min} (threshold={threshold})")]
    ThresholdTooSmall { threshold: u32, min: u32 },
    #[error("modulus size must be one of ( {} ) bits (got {bits})", allowed_sizes())]
    UnsupportedModulusSize { bits: u32 },
}

fn allowed_sizes() -> String {
    ALLOWED_MODULUS_BITS
        .iter()
        .map(|bits| bits.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Error)]
pub enum KeyParamsError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] ParameterError),
    #[error("expected {expected} shares to bind, got {actual}")]
    ShareCountMismatch { expected: u32, actual: usize },
    #[error("share fingerprints are already bound to this key")]
    AlreadyBound,
    #[error("random generation failed")]
    RandomGenerationFailed,
    #[error("no probable prime found (bits={bits}, attempts={attempts})")]
    PrimeSearchExhausted { bits: u32, attempts: usize },
    #[error("invalid modulus: {0}")]
    InvalidModulus(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

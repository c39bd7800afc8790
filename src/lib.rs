//! Key parameters for N-of-M threshold secret sharing.
//!
//! This crate owns the public side of a sharing session: it validates the
//! threshold and share count, generates the prime field modulus the sharing
//! polynomial is evaluated over, and binds a SHA-256 fingerprint of every
//! issued share so that a share can later be authenticated against the key.
//! Splitting and reconstructing secrets is left to the caller.
//!
//! ```no_run
//! use threshold_keyparams::KeyParameters;
//!
//! let key = KeyParameters::new(3, 5, 2048)?;
//! let shares: Vec<Vec<u8>> = (1..=5u8).map(|i| vec![i; 32]).collect();
//! key.bind_shares(&shares)?;
//! assert!(key.contains_share(&shares[0]));
//! assert!(!key.contains_share(&vec![0u8; 32]));
//! # Ok::<(), threshold_keyparams::KeyParamsError>(())
//! ```

pub mod config;
pub mod error;
pub mod key_parameters;
pub mod share;
pub mod utils;

#[cfg(test)]
pub mod tests;

pub use crate::error::{KeyParamsError, ParameterError};
pub use crate::key_parameters::{KeyParameters, ModulusSize};
pub use crate::share::{fingerprint_bytes, Fingerprint, ShareLike};
pub use crate::utils::{decode_modulus_b64u, encode_modulus_b64u};
pub use crate::utils::{generate_probable_prime, is_probably_prime};

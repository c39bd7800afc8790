//! Public key parameters for an N-of-M threshold sharing scheme.
//!
//! A [`KeyParameters`] owns the scheme configuration (threshold, share count,
//! modulus size) and the prime field modulus the external sharer works over.
//! After the shares exist their fingerprints are bound to the key once, and
//! from then on any candidate share can be checked against it.
//!
//! # Lifecycle
//!
//! 1. `KeyParameters::new(n, m, bits)` validates and generates the modulus.
//! 2. The sharer splits the secret into `m` shares over `modulus()`.
//! 3. `bind_shares(&shares)` stores their fingerprints (once).
//! 4. `contains_share(&candidate)` answers membership, from any thread.

use std::fmt;
use std::sync::OnceLock;

use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::{ALLOWED_MODULUS_BITS, MIN_THRESHOLD};
use crate::error::{KeyParamsError, ParameterError};
use crate::share::{Fingerprint, ShareLike};
use crate::utils::{decode_b64u, encode_modulus_b64u, generate_probable_prime, is_probably_prime};

/// Allowed bit lengths of the field modulus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModulusSize {
    Bits1024,
    Bits2048,
    Bits3072,
    Bits4096,
}

impl ModulusSize {
    pub const ALL: [ModulusSize; 4] = [
        ModulusSize::Bits1024,
        ModulusSize::Bits2048,
        ModulusSize::Bits3072,
        ModulusSize::Bits4096,
    ];

    pub fn bits(self) -> u32 {
        match self {
            ModulusSize::Bits1024 => ALLOWED_MODULUS_BITS[0],
            ModulusSize::Bits2048 => ALLOWED_MODULUS_BITS[1],
            ModulusSize::Bits3072 => ALLOWED_MODULUS_BITS[2],
            ModulusSize::Bits4096 => ALLOWED_MODULUS_BITS[3],
        }
    }

    /// Length of the modulus byte encoding.
    pub fn byte_len(self) -> usize {
        self.bits() as usize / 8
    }
}

impl TryFrom<u32> for ModulusSize {
    type Error = ParameterError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        ModulusSize::ALL
            .into_iter()
            .find(|size| size.bits() == bits)
            .ok_or(ParameterError::UnsupportedModulusSize { bits })
    }
}

impl fmt::Display for ModulusSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bits", self.bits())
    }
}

/// Public parameters of one secret-sharing session.
///
/// Threshold, share count and modulus never change after construction. The
/// share fingerprints start unbound and can be bound exactly once; they are
/// only reachable through the membership predicates.
pub struct KeyParameters {
    threshold: u32,
    share_count: u32,
    modulus_size: ModulusSize,
    modulus: BigUint,
    fingerprints: OnceLock<Box<[Fingerprint]>>,
}

impl KeyParameters {
    /// Create key parameters with a freshly generated modulus of `size_bits` bits.
    ///
    /// Checks, in order: `share_count >= threshold`, `threshold >= 2`, and
    /// `size_bits` is one of [`ALLOWED_MODULUS_BITS`].
    pub fn new(threshold: u32, share_count: u32, size_bits: u32) -> Result<Self, KeyParamsError> {
        validate_counts(threshold, share_count)?;
        let size = ModulusSize::try_from(size_bits)?;
        Self::generate(threshold, share_count, size)
    }

    /// Same as [`KeyParameters::new`] with an already typed modulus size.
    pub fn with_size(
        threshold: u32,
        share_count: u32,
        size: ModulusSize,
    ) -> Result<Self, KeyParamsError> {
        validate_counts(threshold, share_count)?;
        Self::generate(threshold, share_count, size)
    }

    fn generate(
        threshold: u32,
        share_count: u32,
        modulus_size: ModulusSize,
    ) -> Result<Self, KeyParamsError> {
        log::debug!(
            "generating {}-of-{} key parameters with a {} modulus",
            threshold,
            share_count,
            modulus_size
        );
        let modulus = generate_probable_prime(modulus_size.bits())?;

        Ok(Self {
            threshold,
            share_count,
            modulus_size,
            modulus,
            fingerprints: OnceLock::new(),
        })
    }

    /// Minimum number of shares needed to reconstruct the secret.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Number of shares created.
    pub fn share_count(&self) -> u32 {
        self.share_count
    }

    pub fn modulus_size(&self) -> ModulusSize {
        self.modulus_size
    }

    /// The prime field modulus.
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Modulus as unsigned little-endian bytes, always `modulus_size().byte_len()` long.
    pub fn modulus_bytes(&self) -> Vec<u8> {
        self.modulus.to_bytes_le()
    }

    /// Modulus as base64url (unpadded) of [`KeyParameters::modulus_bytes`].
    pub fn modulus_b64u(&self) -> String {
        encode_modulus_b64u(&self.modulus)
    }

    /// Whether share fingerprints have been bound.
    pub fn is_bound(&self) -> bool {
        self.fingerprints.get().is_some()
    }

    /// Bind the fingerprints of `shares` to this key.
    ///
    /// Exactly `share_count()` shares are required. Only digests are kept. A
    /// key can be bound once; later calls fail with
    /// [`KeyParamsError::AlreadyBound`] and leave the first binding in place.
    pub fn bind_shares<S: ShareLike>(&self, shares: &[S]) -> Result<(), KeyParamsError> {
        if self.is_bound() {
            log::warn!("rejecting second share binding");
            return Err(KeyParamsError::AlreadyBound);
        }
        if shares.len() != self.share_count as usize {
            return Err(KeyParamsError::ShareCountMismatch {
                expected: self.share_count,
                actual: shares.len(),
            });
        }

        let digests: Box<[Fingerprint]> =
            shares.iter().map(|share| share.fingerprint()).collect();
        self.fingerprints.set(digests).map_err(|_| {
            log::warn!("rejecting concurrent share binding");
            KeyParamsError::AlreadyBound
        })?;

        log::debug!("bound {} share fingerprints", self.share_count);
        Ok(())
    }

    /// Whether `candidate` is one of the bound shares. Always false before binding.
    pub fn contains_share<S: ShareLike + ?Sized>(&self, candidate: &S) -> bool {
        self.contains_fingerprint(&candidate.fingerprint())
    }

    /// Whether `fingerprint` matches one of the bound shares.
    pub fn contains_fingerprint(&self, fingerprint: &Fingerprint) -> bool {
        self.fingerprints
            .get()
            .is_some_and(|bound| bound.iter().any(|fp| fp == fingerprint))
    }

    fn from_record(record: KeyParametersRecord) -> Result<Self, KeyParamsError> {
        validate_counts(record.threshold, record.share_count)?;
        let modulus_size = ModulusSize::try_from(record.modulus_bits)?;

        let modulus_le = decode_b64u(&record.modulus)?;
        if modulus_le.len() != modulus_size.byte_len() {
            return Err(KeyParamsError::InvalidModulus(format!(
                "expected {} encoded bytes, got {}",
                modulus_size.byte_len(),
                modulus_le.len()
            )));
        }
        let modulus = BigUint::from_bytes_le(&modulus_le);
        if modulus.bits() != u64::from(modulus_size.bits()) {
            return Err(KeyParamsError::InvalidModulus(format!(
                "expected {} bits, got {}",
                modulus_size.bits(),
                modulus.bits()
            )));
        }
        if !is_probably_prime(&modulus)? {
            return Err(KeyParamsError::InvalidModulus("not a probable prime".into()));
        }

        let fingerprints = match record.fingerprints {
            None => OnceLock::new(),
            Some(hexes) => {
                if hexes.len() != record.share_count as usize {
                    return Err(KeyParamsError::ShareCountMismatch {
                        expected: record.share_count,
                        actual: hexes.len(),
                    });
                }
                let digests = hexes
                    .iter()
                    .map(|h| {
                        Fingerprint::from_hex(h).ok_or_else(|| {
                            KeyParamsError::Serialization(format!("malformed fingerprint {:?}", h))
                        })
                    })
                    .collect::<Result<Box<[Fingerprint]>, _>>()?;
                OnceLock::from(digests)
            }
        };

        Ok(Self {
            threshold: record.threshold,
            share_count: record.share_count,
            modulus_size,
            modulus,
            fingerprints,
        })
    }

    fn to_record(&self) -> KeyParametersRecord {
        KeyParametersRecord {
            threshold: self.threshold,
            share_count: self.share_count,
            modulus_bits: self.modulus_size.bits(),
            modulus: self.modulus_b64u(),
            fingerprints: self
                .fingerprints
                .get()
                .map(|bound| bound.iter().map(Fingerprint::to_hex).collect()),
        }
    }
}

fn validate_counts(threshold: u32, share_count: u32) -> Result<(), ParameterError> {
    if share_count < threshold {
        return Err(ParameterError::ShareCountBelowThreshold {
            threshold,
            share_count,
        });
    }
    if threshold < MIN_THRESHOLD {
        return Err(ParameterError::ThresholdTooSmall {
            threshold,
            min: MIN_THRESHOLD,
        });
    }
    Ok(())
}

// Debug never prints fingerprints.
impl fmt::Debug for KeyParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyParameters")
            .field("threshold", &self.threshold)
            .field("share_count", &self.share_count)
            .field("modulus_size", &self.modulus_size)
            .field("modulus", &self.modulus_b64u())
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// Persisted form of [`KeyParameters`].
#[derive(Serialize, Deserialize)]
struct KeyParametersRecord {
    threshold: u32,
    share_count: u32,
    modulus_bits: u32,
    modulus: String,
    fingerprints: Option<Vec<String>>,
}

impl Serialize for KeyParameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for KeyParameters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = KeyParametersRecord::deserialize(deserializer)?;
        KeyParameters::from_record(record).map_err(serde::de::Error::custom)
    }
}

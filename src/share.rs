//! Share fingerprints.
//!
//! A share is authenticated against a key by its fingerprint: the SHA-256
//! digest of the share's canonical byte representation. The digest function is
//! fixed so that whoever produces shares and whoever checks them compute the
//! same value.

use std::borrow::Cow;
use std::fmt;

use hex::FromHex;
use sha2::{Digest, Sha256};

use crate::config::FINGERPRINT_LEN;

/// Fixed-length SHA-256 digest of a share.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
        &self.0
    }

    /// Lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse exactly 64 hex digits.
    pub fn from_hex(s: &str) -> Option<Self> {
        <[u8; FINGERPRINT_LEN] as FromHex>::from_hex(s).ok().map(Self)
    }
}

impl From<[u8; FINGERPRINT_LEN]> for Fingerprint {
    fn from(bytes: [u8; FINGERPRINT_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

/// SHA-256 of `bytes`.
pub fn fingerprint_bytes(bytes: &[u8]) -> Fingerprint {
    Fingerprint(Sha256::digest(bytes).into())
}

/// Anything that can be bound to a key as a share.
///
/// Implementors only supply their canonical encoding; the fingerprint is
/// derived from it with [`fingerprint_bytes`] and should not be overridden
/// unless the override computes the same digest.
pub trait ShareLike {
    fn canonical_bytes(&self) -> Cow<'_, [u8]>;

    fn fingerprint(&self) -> Fingerprint {
        fingerprint_bytes(&self.canonical_bytes())
    }
}

impl ShareLike for [u8] {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl ShareLike for Vec<u8> {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl<const N: usize> ShareLike for [u8; N] {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl<T: ShareLike + ?Sized> ShareLike for &T {
    fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        (**self).canonical_bytes()
    }

    fn fingerprint(&self) -> Fingerprint {
        (**self).fingerprint()
    }
}

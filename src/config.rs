//! Library configuration and scheme parameters.

/// Bit lengths accepted for the field modulus.
pub const ALLOWED_MODULUS_BITS: [u32; 4] = [1024, 2048, 3072, 4096];

/// Smallest threshold that still provides secrecy (a 1-of-M scheme does not).
pub const MIN_THRESHOLD: u32 = 2;

/// Miller-Rabin rounds per candidate. Worst-case error is `4^-64 = 2^-128`.
pub const MILLER_RABIN_ROUNDS: usize = 64;

/// Upper bound on prime candidates examined before giving up.
/// A 4096-bit search needs ~1400 odd candidates on average.
pub const PRIME_GEN_MAX_ATTEMPTS: usize = 100_000;

/// Length in bytes of a share fingerprint (SHA-256).
pub const FINGERPRINT_LEN: usize = 32;

use base64ct::{Base64UrlUnpadded, Encoding};
use getrandom::getrandom;
use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

use crate::config::{MILLER_RABIN_ROUNDS, PRIME_GEN_MAX_ATTEMPTS};
use crate::error::KeyParamsError;

// Odd primes below 256, used to discard most composites before Miller-Rabin.
const SMALL_PRIMES: [u32; 53] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

/// Fill `buf` from the operating system CSPRNG.
pub(crate) fn fill_random(buf: &mut [u8]) -> Result<(), KeyParamsError> {
    getrandom(buf).map_err(|e| {
        log::error!("os rng failure: {}", e);
        KeyParamsError::RandomGenerationFailed
    })
}

/// Encode a modulus as base64url (unpadded) over its little-endian unsigned bytes.
pub fn encode_modulus_b64u(x: &BigUint) -> String {
    Base64UrlUnpadded::encode_string(&x.to_bytes_le())
}

/// Decode a modulus from base64url (unpadded) little-endian unsigned bytes.
pub fn decode_modulus_b64u(s: &str) -> Result<BigUint, KeyParamsError> {
    Ok(BigUint::from_bytes_le(&decode_b64u(s)?))
}

pub(crate) fn decode_b64u(s: &str) -> Result<Vec<u8>, KeyParamsError> {
    Base64UrlUnpadded::decode_vec(s)
        .map_err(|e| KeyParamsError::Serialization(format!("modulus: {}", e)))
}

/// Uniformly random value in `[0, 2^bits)`.
fn random_bits(bits: u64) -> Result<BigUint, KeyParamsError> {
    let mut bytes = vec![0u8; ((bits + 7) / 8) as usize];
    fill_random(&mut bytes)?;

    let surplus = bytes.len() as u64 * 8 - bits;
    Ok(BigUint::from_bytes_le(&bytes) >> surplus)
}

/// Uniformly random value in `[0, upper)`, by rejection.
fn random_below(upper: &BigUint) -> Result<BigUint, KeyParamsError> {
    if upper.is_zero() {
        return Ok(BigUint::zero());
    }
    loop {
        let value = random_bits(upper.bits())?;
        if &value < upper {
            return Ok(value);
        }
    }
}

/// Generate a random probable prime with exactly `bits` bits.
///
/// Each candidate is a uniform `bits`-wide draw with the top bit set, which
/// pins the length, and the low bit set, which makes it odd.
pub fn generate_probable_prime(bits: u32) -> Result<BigUint, KeyParamsError> {
    if bits < 2 {
        return Err(KeyParamsError::InvalidModulus(format!(
            "cannot generate a {}-bit prime",
            bits
        )));
    }
    let width = u64::from(bits);

    for attempt in 1..=PRIME_GEN_MAX_ATTEMPTS {
        let mut candidate = random_bits(width)?;
        candidate.set_bit(width - 1, true);
        candidate.set_bit(0, true);

        if is_probably_prime(&candidate)? {
            log::trace!("found {}-bit probable prime after {} candidates", bits, attempt);
            return Ok(candidate);
        }
    }

    Err(KeyParamsError::PrimeSearchExhausted {
        bits,
        attempts: PRIME_GEN_MAX_ATTEMPTS,
    })
}

/// Probable-prime test: trial division by the odd primes below 256, then
/// `MILLER_RABIN_ROUNDS` Miller-Rabin rounds with uniform bases in `[2, n-2]`.
pub fn is_probably_prime(n: &BigUint) -> Result<bool, KeyParamsError> {
    if let Some(small) = n.to_u32() {
        if small < 2 {
            return Ok(false);
        }
        if small == 2 || SMALL_PRIMES.contains(&small) {
            return Ok(true);
        }
    }
    if !n.bit(0) || SMALL_PRIMES.iter().any(|&p| (n % p).is_zero()) {
        return Ok(false);
    }

    // n - 1 = d * 2^s, d odd
    let n_minus_1 = n - 1u32;
    let s = n_minus_1.trailing_zeros().unwrap_or(0);
    let d = &n_minus_1 >> s;
    let base_span = n - 3u32;

    for _ in 0..MILLER_RABIN_ROUNDS {
        let base = random_below(&base_span)? + 2u32;
        if proves_composite(&base, n, &n_minus_1, &d, s) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Whether `base` is a Miller-Rabin witness for the compositeness of `n`.
fn proves_composite(
    base: &BigUint,
    n: &BigUint,
    n_minus_1: &BigUint,
    d: &BigUint,
    s: u64,
) -> bool {
    let mut x = base.modpow(d, n);
    if x.is_one() || &x == n_minus_1 {
        return false;
    }
    for _ in 1..s {
        x = &x * &x % n;
        if &x == n_minus_1 {
            return false;
        }
        if x.is_one() {
            // Nontrivial square root of 1.
            return true;
        }
    }
    true
}

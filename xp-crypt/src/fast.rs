//! XXH64 hashing of arbitrary values, rendered as short radix strings.
//!
//! Values are serialized to canonical JSON before hashing, so structurally
//! equal values always produce the same digest. The 64-bit result is then
//! rendered in the requested radix (base 36 by default).
//!
//! ## Core Functions
//!
//! - [`fast_hash`] - Hash any `Serialize` value with [`FastHashOptions`]
//! - [`fast_hash_hex`] - Same, with the radix fixed at 16
//! - [`fast_hash_str`] - Hash raw text without JSON quoting
//! - [`digest64`] - The raw 64-bit XXH64 value
//! - [`to_radix`] - Render a `u64` in any radix from 2 to 36
//!
//! ## Examples
//!
//! ```rust
//! use xp_crypt::{FastHashOptions, fast_hash, fast_hash_hex};
//!
//! let key = fast_hash(&("user", 42), FastHashOptions::default()).unwrap();
//! assert_eq!(key, fast_hash(&("user", 42), FastHashOptions::default()).unwrap());
//!
//! let hex = fast_hash_hex(&("user", 42), 0).unwrap();
//! assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
//! ```
//!
//! Not suitable for anything adversarial: use it for cache keys, change
//! detection and deduplication.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh64::xxh64;

use crate::error::CryptError;

/// Seed used when the caller does not pick one.
pub const DEFAULT_SEED: u64 = 0;

/// Radix used when the caller does not pick one.
pub const DEFAULT_BASE: u32 = 36;

/// Radix of [`fast_hash_hex`].
pub const HEX_BASE: u32 = 16;

/// Smallest supported radix.
pub const MIN_BASE: u32 = 2;

/// Largest supported radix.
pub const MAX_BASE: u32 = 36;

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A 64-bit non-cryptographic hasher.
pub trait FastHasher: Send + Sync {
    /// Hashes `bytes` with `seed` into a 64-bit value.
    fn digest64(&self, bytes: &[u8], seed: u64) -> u64;
}

/// XXH64, as implemented by `xxhash-rust`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Xxh64;

impl FastHasher for Xxh64 {
    #[inline]
    fn digest64(&self, bytes: &[u8], seed: u64) -> u64 {
        xxh64(bytes, seed)
    }
}

/// Seed and radix for a fast hash.
///
/// Missing fields take their defaults when deserializing, so `{}` is the
/// same as `FastHashOptions::default()`.
///
/// ## Examples
///
/// ```rust
/// use xp_crypt::FastHashOptions;
///
/// let options = FastHashOptions::default().with_seed(7).with_base(16);
/// assert_eq!(options.seed, 7);
/// assert_eq!(options.base, 16);
///
/// let parsed: FastHashOptions = serde_json::from_str(r#"{"seed": 7}"#).unwrap();
/// assert_eq!(parsed.base, 36);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FastHashOptions {
    pub seed: u64,
    pub base: u32,
}

impl Default for FastHashOptions {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            base: DEFAULT_BASE,
        }
    }
}

impl FastHashOptions {
    /// Replaces the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replaces the output radix.
    pub fn with_base(mut self, base: u32) -> Self {
        self.base = base;
        self
    }
}

/// Serializes `input` to canonical JSON.
///
/// Going through `serde_json::Value` sorts object keys, so two maps with the
/// same entries serialize identically whatever their iteration order.
///
/// ## Errors
///
/// Returns `CryptError::Serialization` if `input` has no JSON form, such as
/// a map with non-string keys.
pub fn canonical_json<T: Serialize + ?Sized>(input: &T) -> Result<String, CryptError> {
    let value = serde_json::to_value(input)?;
    Ok(serde_json::to_string(&value)?)
}

/// Computes the XXH64 hash of `bytes` with `seed`.
///
/// ## Examples
///
/// ```rust
/// use xp_crypt::digest64;
///
/// assert_eq!(digest64(b"", 0), 0xef46db3751d8e999);
/// ```
#[inline]
pub fn digest64(bytes: &[u8], seed: u64) -> u64 {
    Xxh64.digest64(bytes, seed)
}

/// Renders `value` in `base` with lowercase digits, no prefix or padding.
///
/// ## Examples
///
/// ```rust
/// use xp_crypt::to_radix;
///
/// assert_eq!(to_radix(255, 16).unwrap(), "ff");
/// assert_eq!(to_radix(35, 36).unwrap(), "z");
/// assert_eq!(to_radix(0, 2).unwrap(), "0");
/// ```
///
/// ## Errors
///
/// Returns `CryptError::InvalidBase` if `base` is outside `2..=36`.
pub fn to_radix(mut value: u64, base: u32) -> Result<String, CryptError> {
    if !(MIN_BASE..=MAX_BASE).contains(&base) {
        return Err(CryptError::InvalidBase(base));
    }
    if value == 0 {
        return Ok("0".to_string());
    }

    let radix = u64::from(base);
    let mut digits = Vec::with_capacity(64);
    while value > 0 {
        digits.push(DIGITS[(value % radix) as usize]);
        value /= radix;
    }
    digits.reverse();

    Ok(digits.into_iter().map(char::from).collect())
}

/// Hashes any serializable value and renders the digest in `options.base`.
///
/// ## Errors
///
/// Returns `CryptError::Serialization` if `input` cannot be serialized, or
/// `CryptError::InvalidBase` if `options.base` is outside `2..=36`.
pub fn fast_hash<T: Serialize + ?Sized>(
    input: &T,
    options: FastHashOptions,
) -> Result<String, CryptError> {
    fast_hash_with(&Xxh64, input, options)
}

/// [`fast_hash`] with the radix fixed at 16.
pub fn fast_hash_hex<T: Serialize + ?Sized>(input: &T, seed: u64) -> Result<String, CryptError> {
    fast_hash(input, FastHashOptions::default().with_seed(seed).with_base(HEX_BASE))
}

/// Hashes `text` as-is, without JSON quoting.
pub fn fast_hash_str(text: &str, options: FastHashOptions) -> Result<String, CryptError> {
    to_radix(digest64(text.as_bytes(), options.seed), options.base)
}

pub(crate) fn fast_hash_with<H, T>(
    hasher: &H,
    input: &T,
    options: FastHashOptions,
) -> Result<String, CryptError>
where
    H: FastHasher + ?Sized,
    T: Serialize + ?Sized,
{
    // Reject the radix before paying for serialization.
    if !(MIN_BASE..=MAX_BASE).contains(&options.base) {
        return Err(CryptError::InvalidBase(options.base));
    }
    let json = canonical_json(input)?;
    to_radix(hasher.digest64(json.as_bytes(), options.seed), options.base)
}

//! bcrypt password hashing.
//!
//! The facade treats adaptive hashing as a capability: produce a
//! self-describing digest from an input and a salt, and check an input
//! against such a digest. [`Bcrypt`] provides it via the `bcrypt` crate.
//!
//! The returned string is in modular-crypt format, which includes the
//! version, cost, salt and hash - everything needed for verification:
//!
//! ```text
//! $2b$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy
//!  \/ \/ \____________________/\_____________________________/
//!  |  cost       salt                        hash
//! version
//! ```
//!
//! These calls are slow on purpose. Run them through the async facade
//! ([`hash`](crate::hash), [`compare`](crate::compare)) rather than on an
//! async executor thread.

use crate::error::CryptError;
use crate::salt::ResolvedSalt;

/// A slow, tunable-cost password hasher.
pub trait AdaptiveHasher: Send + Sync + 'static {
    /// Hashes `input` with `salt`, returning a self-describing digest.
    fn generate_digest(&self, input: &str, salt: &ResolvedSalt) -> Result<String, CryptError>;

    /// Checks `input` against a digest produced by [`generate_digest`](Self::generate_digest).
    fn verify(&self, input: &str, digest: &str) -> Result<bool, CryptError>;
}

/// bcrypt, as implemented by the `bcrypt` crate.
///
/// Inputs longer than 72 bytes are truncated by the algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bcrypt;

impl AdaptiveHasher for Bcrypt {
    fn generate_digest(&self, input: &str, salt: &ResolvedSalt) -> Result<String, CryptError> {
        match salt {
            ResolvedSalt::Generate { cost } => Ok(bcrypt::hash(input, *cost)?),
            ResolvedSalt::Fixed {
                version,
                cost,
                salt,
            } => Ok(bcrypt::hash_with_salt(input, *cost, *salt)?.format_for_version((*version).into())),
        }
    }

    fn verify(&self, input: &str, digest: &str) -> Result<bool, CryptError> {
        Ok(bcrypt::verify(input, digest)?)
    }
}

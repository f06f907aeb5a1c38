//! Password hashing, password comparison and fast content hashing.
//!
//! This crate is a thin facade over two hashing libraries:
//!
//! - **bcrypt** (via `bcrypt`) for password storage: [`hash`], [`compare`]
//! - **XXH64** (via `xxhash-rust`) for cache keys and change detection:
//!   [`fast_hash`], [`fast_hash_hex`]
//!
//! ## Async and callbacks
//!
//! bcrypt is slow on purpose, so [`hash`] and [`compare`] return futures
//! that run the work on Tokio's blocking pool. Callers that prefer a
//! completion handler use [`hash_with_callback`] / [`compare_with_callback`],
//! which return the same future and also invoke the handler. [`fast_hash`]
//! is synchronous.
//!
//! ## Defaults
//!
//! | Parameter | Default | Constant |
//! |-----------|---------|----------|
//! | bcrypt cost | 10 | [`DEFAULT_COST`] |
//! | fast-hash seed | 0 | [`DEFAULT_SEED`] |
//! | fast-hash radix | 36 | [`DEFAULT_BASE`] |
//!
//! ## Examples
//!
//! ```rust
//! use xp_crypt::{FastHashOptions, fast_hash};
//!
//! let key = fast_hash(&["a", "b"], FastHashOptions::default()).unwrap();
//! let hex = fast_hash(&["a", "b"], FastHashOptions::default().with_base(16)).unwrap();
//! assert_eq!(
//!     u64::from_str_radix(&key, 36).unwrap(),
//!     u64::from_str_radix(&hex, 16).unwrap()
//! );
//! ```

pub mod adaptive;
mod callback;
mod crypt;
mod error;
pub mod fast;
pub mod salt;

pub use adaptive::{AdaptiveHasher, Bcrypt};
pub use callback::with_callback;
pub use crypt::{Crypt, compare, compare_with_callback, hash, hash_with_callback};
pub use error::CryptError;
pub use fast::{
    DEFAULT_BASE, DEFAULT_SEED, FastHashOptions, FastHasher, HEX_BASE, MAX_BASE, MIN_BASE, Xxh64,
    canonical_json, digest64, fast_hash, fast_hash_hex, fast_hash_str, to_radix,
};
pub use salt::{BcryptVersion, DEFAULT_COST, MAX_COST, MIN_COST, ResolvedSalt, Salt};

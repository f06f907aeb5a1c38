//! The crypt facade: `hash`, `compare` and `fast_hash` behind one type.
//!
//! [`Crypt`] is generic over its two collaborators so either can be
//! swapped; the crate-root functions use [`Crypt::default`], which pairs
//! [`Bcrypt`] with [`Xxh64`].
//!
//! `hash` and `compare` validate their arguments synchronously, then run the
//! delegate on Tokio's blocking pool. The returned futures are independent:
//! concurrent calls may complete in any order. Dropping a future does not
//! stop a worker that has already started.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use serde::Serialize;
use tokio::runtime::Handle;
use tracing::{Instrument, debug, debug_span, trace};

use crate::adaptive::{AdaptiveHasher, Bcrypt};
use crate::callback::with_callback;
use crate::error::CryptError;
use crate::fast::{FastHashOptions, FastHasher, HEX_BASE, Xxh64, fast_hash_with};
use crate::salt::Salt;

/// Hashing facade over an adaptive hasher `A` and a fast hasher `F`.
#[derive(Debug, Clone)]
pub struct Crypt<A = Bcrypt, F = Xxh64> {
    adaptive: Arc<A>,
    fast: F,
}

impl Default for Crypt {
    fn default() -> Self {
        Self::new(Bcrypt, Xxh64)
    }
}

impl<A, F> Crypt<A, F>
where
    A: AdaptiveHasher,
    F: FastHasher,
{
    /// Builds a facade from an adaptive hasher and a fast hasher.
    pub fn new(adaptive: A, fast: F) -> Self {
        Self {
            adaptive: Arc::new(adaptive),
            fast,
        }
    }

    /// Hashes `input` with `salt`, a cost factor or a prebuilt salt string.
    ///
    /// The salt is validated before this method returns; an invalid salt
    /// yields a future that resolves to the error without scheduling any
    /// work (and without needing a runtime).
    ///
    /// ## Errors
    ///
    /// - `CryptError::InvalidCost` if the cost is outside `4..=31`
    /// - `CryptError::HashFormat` if a prebuilt salt is malformed
    /// - `CryptError::NoRuntime` if awaited outside a Tokio runtime
    pub fn hash<S>(&self, input: &str, salt: S) -> BoxFuture<'static, Result<String, CryptError>>
    where
        S: Into<Salt>,
    {
        let resolved = match salt.into().resolve() {
            Ok(resolved) => resolved,
            Err(err) => {
                debug!(error = %err, "rejected salt");
                return future::ready(Err(err)).boxed();
            }
        };

        let span = debug_span!("hash", cost = resolved.cost(), prebuilt = resolved.is_fixed());
        let adaptive = Arc::clone(&self.adaptive);
        let input = input.to_owned();

        async move {
            let digest = run_blocking(move || adaptive.generate_digest(&input, &resolved)).await;
            match &digest {
                Ok(_) => trace!("digest generated"),
                Err(err) => debug!(error = %err, "hashing failed"),
            }
            digest
        }
        .instrument(span)
        .boxed()
    }

    /// Checks `input` against a digest produced by [`hash`](Self::hash).
    ///
    /// ## Errors
    ///
    /// - `CryptError::HashFormat` if `digest` is not a bcrypt string
    /// - `CryptError::NoRuntime` if awaited outside a Tokio runtime
    pub fn compare(&self, input: &str, digest: &str) -> BoxFuture<'static, Result<bool, CryptError>> {
        let span = debug_span!("compare", digest_len = digest.len());
        let adaptive = Arc::clone(&self.adaptive);
        let input = input.to_owned();
        let digest = digest.to_owned();

        async move {
            let matched = run_blocking(move || adaptive.verify(&input, &digest)).await;
            match &matched {
                Ok(matched) => trace!(matched, "comparison finished"),
                Err(err) => debug!(error = %err, "comparison failed"),
            }
            matched
        }
        .instrument(span)
        .boxed()
    }

    /// [`hash`](Self::hash), also reporting the outcome to `callback`.
    pub fn hash_with_callback<S, C>(
        &self,
        input: &str,
        salt: S,
        callback: C,
    ) -> BoxFuture<'static, Result<String, CryptError>>
    where
        S: Into<Salt>,
        C: FnOnce(Result<&String, &CryptError>) + Send + 'static,
    {
        with_callback(self.hash(input, salt), callback)
    }

    /// [`compare`](Self::compare), also reporting the outcome to `callback`.
    pub fn compare_with_callback<C>(
        &self,
        input: &str,
        digest: &str,
        callback: C,
    ) -> BoxFuture<'static, Result<bool, CryptError>>
    where
        C: FnOnce(Result<&bool, &CryptError>) + Send + 'static,
    {
        with_callback(self.compare(input, digest), callback)
    }

    /// Hashes any serializable value with the fast hasher.
    ///
    /// ## Errors
    ///
    /// - `CryptError::Serialization` if `input` has no JSON form
    /// - `CryptError::InvalidBase` if `options.base` is outside `2..=36`
    pub fn fast_hash<T>(&self, input: &T, options: FastHashOptions) -> Result<String, CryptError>
    where
        T: Serialize + ?Sized,
    {
        fast_hash_with(&self.fast, input, options)
    }

    /// [`fast_hash`](Self::fast_hash) with the radix fixed at 16.
    pub fn fast_hash_hex<T>(&self, input: &T, seed: u64) -> Result<String, CryptError>
    where
        T: Serialize + ?Sized,
    {
        self.fast_hash(input, FastHashOptions::default().with_seed(seed).with_base(HEX_BASE))
    }
}

/// Runs a CPU-heavy job on the blocking pool of the current runtime.
async fn run_blocking<T, J>(job: J) -> Result<T, CryptError>
where
    T: Send + 'static,
    J: FnOnce() -> Result<T, CryptError> + Send + 'static,
{
    let handle = Handle::try_current().map_err(|_| CryptError::NoRuntime)?;
    handle
        .spawn_blocking(job)
        .await
        .map_err(|e| CryptError::Worker(e.to_string()))?
}

/// Hashes `input` with bcrypt. See [`Crypt::hash`].
///
/// ## Examples
///
/// ```rust
/// use xp_crypt::{compare, hash};
///
/// #[tokio::main]
/// async fn main() {
///     let digest = hash("my-secret-password", 4).await.unwrap();
///     assert!(digest.starts_with("$2b$04$"));
///
///     assert!(compare("my-secret-password", &digest).await.unwrap());
///     assert!(!compare("wrong-password", &digest).await.unwrap());
/// }
/// ```
pub fn hash<S: Into<Salt>>(input: &str, salt: S) -> BoxFuture<'static, Result<String, CryptError>> {
    Crypt::default().hash(input, salt)
}

/// Checks `input` against a bcrypt digest. See [`Crypt::compare`].
pub fn compare(input: &str, digest: &str) -> BoxFuture<'static, Result<bool, CryptError>> {
    Crypt::default().compare(input, digest)
}

/// See [`Crypt::hash_with_callback`].
pub fn hash_with_callback<S, C>(
    input: &str,
    salt: S,
    callback: C,
) -> BoxFuture<'static, Result<String, CryptError>>
where
    S: Into<Salt>,
    C: FnOnce(Result<&String, &CryptError>) + Send + 'static,
{
    Crypt::default().hash_with_callback(input, salt, callback)
}

/// See [`Crypt::compare_with_callback`].
pub fn compare_with_callback<C>(
    input: &str,
    digest: &str,
    callback: C,
) -> BoxFuture<'static, Result<bool, CryptError>>
where
    C: FnOnce(Result<&bool, &CryptError>) + Send + 'static,
{
    Crypt::default().compare_with_callback(input, digest, callback)
}

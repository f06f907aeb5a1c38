//! Completion-callback adapter for the async facade.
//!
//! Every async operation returns a future. For callers that prefer to be
//! notified, [`with_callback`] starts the future on the current Tokio runtime
//! and invokes a handler once it settles. The handler runs even when the
//! returned future is dropped without being awaited.

use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::runtime::Handle;
use tracing::trace;

use crate::error::CryptError;

/// Runs `task` in the background, calls `callback` with its outcome, and
/// returns a future resolving to the same outcome.
///
/// The callback is invoked exactly once. Outside a Tokio runtime a task that
/// is already settled (such as a rejected salt) reports its own outcome;
/// anything still pending reports `CryptError::NoRuntime`.
///
/// ## Examples
///
/// ```rust
/// use xp_crypt::{compare, hash, with_callback};
///
/// #[tokio::main]
/// async fn main() {
///     let digest = hash("secret", 4).await.unwrap();
///
///     let matched = with_callback(compare("secret", &digest), |outcome| {
///         assert!(matches!(outcome, Ok(true)));
///     })
///     .await
///     .unwrap();
///     assert!(matched);
/// }
/// ```
pub fn with_callback<T, Fut, F>(task: Fut, callback: F) -> BoxFuture<'static, Result<T, CryptError>>
where
    T: Send + 'static,
    Fut: Future<Output = Result<T, CryptError>> + Send + 'static,
    F: FnOnce(Result<&T, &CryptError>) + Send + 'static,
{
    let handle = match Handle::try_current() {
        Ok(handle) => handle,
        Err(_) => {
            let outcome = task.now_or_never().unwrap_or(Err(CryptError::NoRuntime));
            callback(outcome.as_ref());
            return futures::future::ready(outcome).boxed();
        }
    };

    let join = handle.spawn(async move {
        let outcome = task.await;
        trace!(ok = outcome.is_ok(), "invoking completion callback");
        callback(outcome.as_ref());
        outcome
    });

    async move {
        match join.await {
            Ok(outcome) => outcome,
            Err(e) => Err(CryptError::Worker(e.to_string())),
        }
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn callback_receives_success() {
        let calls = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&calls);

        let value = with_callback(async { Ok::<_, CryptError>(42) }, move |outcome| {
            assert_eq!(outcome.ok(), Some(&42));
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .await
        .unwrap();

        assert_eq!(value, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn callback_receives_error_and_future_rejects() {
        let (tx, rx) = oneshot::channel();

        let result = with_callback(
            async { Err::<u32, _>(CryptError::InvalidCost(2)) },
            move |outcome| {
                let _ = tx.send(matches!(outcome, Err(CryptError::InvalidCost(2))));
            },
        )
        .await;

        assert!(matches!(result, Err(CryptError::InvalidCost(2))));
        assert!(rx.await.unwrap());
    }

    #[tokio::test]
    async fn callback_fires_without_awaiting() {
        let (tx, rx) = oneshot::channel();

        drop(with_callback(async { Ok::<_, CryptError>("done") }, move |outcome| {
            let _ = tx.send(outcome.ok().copied());
        }));

        assert_eq!(rx.await.unwrap(), Some("done"));
    }

    #[test]
    fn outside_runtime_reports_no_runtime() {
        let calls = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&calls);

        let result = futures::executor::block_on(with_callback(
            futures::future::pending::<Result<u32, CryptError>>(),
            move |outcome| {
                assert!(matches!(outcome, Err(CryptError::NoRuntime)));
                seen.fetch_add(1, Ordering::SeqCst);
            },
        ));

        assert!(matches!(result, Err(CryptError::NoRuntime)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn outside_runtime_settled_task_keeps_its_outcome() {
        let (tx, rx) = oneshot::channel();

        let result = futures::executor::block_on(with_callback(
            async { Ok::<_, CryptError>(7) },
            move |outcome| {
                let _ = tx.send(outcome.ok().copied());
            },
        ));

        assert_eq!(result.unwrap(), 7);
        assert_eq!(futures::executor::block_on(rx).unwrap(), Some(7));
    }
}

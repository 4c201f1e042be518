//! Uniform loading/failure handling around backend reads.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use spend_logging::{spend_debug, spend_error, spend_warn};

use crate::{FeedKind, FetchError, RequestId};

/// Receives every final fetch failure, tagged with the request that failed.
/// Called before `run` returns, so a report always precedes the completion
/// event of the same request.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, feed: FeedKind, request: RequestId, error: &FetchError);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// A failed attempt is final.
    ReportImmediately,
    /// One more attempt after `delay`; the second failure is final.
    RetryOnce { delay: Duration },
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::RetryOnce {
            delay: Duration::from_millis(250),
        }
    }
}

/// Wraps a backend read with a `loading` flag and a bounded retry policy.
///
/// `loading` is raised before the first attempt, stays raised across the
/// retry, and is released when `run` returns or its future is dropped. A
/// final failure is passed to the [`ErrorReporter`] and returned as `Err`.
pub struct RequestGate {
    feed: FeedKind,
    policy: RetryPolicy,
    reporter: Arc<dyn ErrorReporter>,
    in_flight: AtomicUsize,
}

impl RequestGate {
    pub fn new(feed: FeedKind, policy: RetryPolicy, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            feed,
            policy,
            reporter,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// True while at least one `run` on this gate is in flight.
    pub fn loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub async fn run<T, F, Fut>(&self, request: RequestId, mut op: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let _loading = LoadingGuard::acquire(&self.in_flight);

        let result = match (op().await, self.policy) {
            (Err(err), RetryPolicy::RetryOnce { delay }) => {
                spend_warn!("request #{} {} fetch failed ({}), retrying", request, self.feed, err);
                tokio::time::sleep(delay).await;
                op().await
            }
            (result, _) => result,
        };

        match &result {
            Ok(_) => spend_debug!("request #{} {} fetch succeeded", request, self.feed),
            Err(err) => {
                spend_error!("request #{} {} fetch failed: {}", request, self.feed, err);
                self.reporter.report(self.feed, request, err);
            }
        }
        result
    }
}

struct LoadingGuard<'a> {
    counter: &'a AtomicUsize,
}

impl<'a> LoadingGuard<'a> {
    fn acquire(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self { counter }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

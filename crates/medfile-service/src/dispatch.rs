//! Fan-out of per-item document-store calls.
//!
//! Each item of a batch is one independent call. Calls run concurrently up
//! to a bound, and the caller only sees the results once every call has
//! settled.

use std::future::Future;

use futures::stream::{self, StreamExt};

use medfile_core::error::{AppError, ErrorKind};
use medfile_core::result::AppResult;
use medfile_entity::outcome::FailureReason;

/// How one settled call is interpreted.
#[derive(Debug)]
pub enum CallOutcome<T> {
    /// The store applied the change.
    Applied(T),
    /// The store refused this item; the batch goes on.
    Failed(FailureReason),
    /// The store is unreachable; the batch as a whole fails.
    Fatal(AppError),
}

/// Map a store result onto the per-item taxonomy.
pub fn classify<T>(result: AppResult<T>) -> CallOutcome<T> {
    match result {
        Ok(value) => CallOutcome::Applied(value),
        Err(err) => match err.kind {
            ErrorKind::NotFound => CallOutcome::Failed(FailureReason::NotFound),
            ErrorKind::Validation => CallOutcome::Failed(FailureReason::Validation),
            ErrorKind::ServiceUnavailable => CallOutcome::Fatal(err),
            _ => CallOutcome::Failed(FailureReason::StoreRejected(err.message)),
        },
    }
}

/// Run `call` for every job with at most `limit` in flight and return the
/// results in job order.
pub async fn settle_all<J, F, Fut, R>(jobs: Vec<J>, limit: usize, mut call: F) -> Vec<R>
where
    F: FnMut(J) -> Fut,
    Fut: Future<Output = R>,
{
    let mut settled: Vec<(usize, R)> = stream::iter(jobs.into_iter().enumerate())
        .map(|(index, job)| {
            let fut = call(job);
            async move { (index, fut.await) }
        })
        .buffer_unordered(limit.max(1))
        .collect()
        .await;

    settled.sort_by_key(|(index, _)| *index);
    settled.into_iter().map(|(_, result)| result).collect()
}

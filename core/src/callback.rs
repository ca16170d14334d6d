//! Success/failure callback adapter.

use std::future::Future;

use tokio::task::JoinHandle;

use crate::error::ApiError;

/// Run `call` on the current tokio runtime and invoke exactly one of the two
/// callbacks with its outcome.
///
/// Must be called from within a runtime. The returned handle completes after
/// the callback has run.
pub fn spawn_with_callbacks<F, T, S, E>(call: F, on_success: S, on_failure: E) -> JoinHandle<()>
where
    F: Future<Output = Result<T, ApiError>> + Send + 'static,
    T: Send + 'static,
    S: FnOnce(T) + Send + 'static,
    E: FnOnce(ApiError) + Send + 'static,
{
    tokio::spawn(async move {
        match call.await {
            Ok(value) => on_success(value),
            Err(error) => on_failure(error),
        }
    })
}

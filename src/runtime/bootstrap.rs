//! Loop-safe bootstrap
//!
//! Runs one async build exactly once from synchronous code, whether or not
//! the caller is already inside a Tokio runtime. Without an ambient runtime
//! a current-thread runtime is created on the spot. Inside one, blocking on
//! a nested runtime would panic, so the build runs on a dedicated worker
//! thread with its own runtime instead.
//!
//! On both paths the build is bounded by the same timeout and runs as a
//! spawned task, so a panic surfaces as [`AgentError::Internal`] instead of
//! unwinding into the caller.

use crate::errors::{AgentError, AgentResult};
use std::future::Future;
use std::sync::mpsc;
use std::time::Duration;

const WORKER_THREAD_NAME: &str = "github-agent-bootstrap";

/// Extra wait on the worker channel beyond the build timeout, covering
/// runtime startup and teardown on the worker thread.
const WORKER_GRACE: Duration = Duration::from_secs(1);

/// Which execution context the build runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapPath {
    /// No runtime was active; one was created on the calling thread
    Direct,
    /// A runtime was active; the build ran on a worker thread
    Worker,
}

impl BootstrapPath {
    /// Inspect the calling context
    #[must_use]
    pub fn detect() -> Self {
        if tokio::runtime::Handle::try_current().is_ok() {
            Self::Worker
        } else {
            Self::Direct
        }
    }
}

/// Run `build` to completion and return its result.
///
/// # Errors
/// - [`AgentError::BootstrapTimeout`] when `build` does not finish in `timeout`
/// - [`AgentError::Internal`] when `build` panics or the runtime cannot start
/// - whatever `build` itself returns
pub fn try_run_bootstrap<F, Fut, T>(build: F, timeout: Duration) -> AgentResult<T>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = AgentResult<T>> + Send + 'static,
    T: Send + 'static,
{
    let path = BootstrapPath::detect();
    tracing::debug!(?path, timeout_ms = timeout_millis(timeout), "bootstrapping");

    match path {
        BootstrapPath::Direct => run_direct(build, timeout),
        BootstrapPath::Worker => run_on_worker(build, timeout),
    }
}

/// Like [`try_run_bootstrap`], but logs any failure and returns `None`.
pub fn run_bootstrap<F, Fut, T>(build: F, timeout: Duration) -> Option<T>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = AgentResult<T>> + Send + 'static,
    T: Send + 'static,
{
    match try_run_bootstrap(build, timeout) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!(stage = e.stage(), "Bootstrap failed: {e}");
            None
        }
    }
}

fn run_direct<F, Fut, T>(build: F, timeout: Duration) -> AgentResult<T>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = AgentResult<T>> + Send + 'static,
    T: Send + 'static,
{
    let runtime = new_runtime()?;
    let result = runtime.block_on(bounded(build, timeout));
    // A timed-out build may still be parked on the runtime; don't wait for it
    runtime.shutdown_background();
    result
}

fn run_on_worker<F, Fut, T>(build: F, timeout: Duration) -> AgentResult<T>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = AgentResult<T>> + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel(1);

    std::thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(move || {
            let result = new_runtime().and_then(|runtime| {
                let result = runtime.block_on(bounded(build, timeout));
                runtime.shutdown_background();
                result
            });
            // The caller may have stopped waiting
            let _ = tx.send(result);
        })?;

    match rx.recv_timeout(timeout + WORKER_GRACE) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => Err(AgentError::BootstrapTimeout {
            timeout_ms: timeout_millis(timeout),
        }),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(AgentError::Internal {
            component: "bootstrap".to_string(),
            reason: "worker thread exited without a result".to_string(),
        }),
    }
}

async fn bounded<F, Fut, T>(build: F, timeout: Duration) -> AgentResult<T>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = AgentResult<T>> + Send + 'static,
    T: Send + 'static,
{
    // Call `build` inside the task too, so a panic before the first await is caught
    let handle = tokio::spawn(async move { build().await });
    match tokio::time::timeout(timeout, handle).await {
        Ok(joined) => joined?,
        Err(_) => Err(AgentError::BootstrapTimeout {
            timeout_ms: timeout_millis(timeout),
        }),
    }
}

fn new_runtime() -> AgentResult<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| AgentError::Internal {
            component: "bootstrap".to_string(),
            reason: format!("Failed to start runtime: {e}"),
        })
}

fn timeout_millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    async fn answer() -> AgentResult<u32> {
        tokio::task::yield_now().await;
        Ok(42)
    }

    #[test]
    fn detects_missing_runtime() {
        assert_eq!(BootstrapPath::detect(), BootstrapPath::Direct);
    }

    #[tokio::test]
    async fn detects_active_runtime() {
        assert_eq!(BootstrapPath::detect(), BootstrapPath::Worker);
    }

    #[test]
    fn direct_path_returns_build_result() {
        assert_eq!(run_bootstrap(answer, Duration::from_secs(5)), Some(42));
    }

    #[tokio::test]
    async fn worker_path_returns_same_result() {
        assert_eq!(run_bootstrap(answer, Duration::from_secs(5)), Some(42));
    }

    #[test]
    fn build_error_is_passed_through() {
        let err = try_run_bootstrap(
            || async {
                Err::<(), _>(AgentError::NoTools {
                    reason: "empty".into(),
                })
            },
            Duration::from_secs(5),
        )
        .unwrap_err();
        assert!(matches!(err, AgentError::NoTools { .. }));
    }

    #[test]
    fn slow_build_times_out_on_direct_path() {
        let started = Instant::now();
        let err = try_run_bootstrap(
            || async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(())
            },
            Duration::from_millis(50),
        )
        .unwrap_err();

        assert!(matches!(err, AgentError::BootstrapTimeout { timeout_ms: 50 }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn slow_build_times_out_on_worker_path() {
        let started = Instant::now();
        let result = run_bootstrap(
            || async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(())
            },
            Duration::from_millis(50),
        );

        assert!(result.is_none());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    async fn explode() -> AgentResult<()> {
        panic!("boom")
    }

    #[test]
    fn panicking_build_is_contained() {
        let err = try_run_bootstrap(explode, Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, AgentError::Internal { ref reason, .. } if reason.contains("panicked")));
    }

    fn explode_before_future() -> std::future::Ready<AgentResult<()>> {
        panic!("boom before future")
    }

    #[test]
    fn build_panicking_before_its_future_is_contained() {
        let err = try_run_bootstrap(explode_before_future, Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, AgentError::Internal { ref reason, .. } if reason.contains("panicked")));
    }

    #[tokio::test]
    async fn build_panicking_before_its_future_is_contained_on_worker_path() {
        let err = try_run_bootstrap(explode_before_future, Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, AgentError::Internal { ref reason, .. } if reason.contains("panicked")));
    }

    #[tokio::test]
    async fn panicking_build_is_contained_on_worker_path() {
        assert!(run_bootstrap(explode, Duration::from_secs(5)).is_none());
    }
}

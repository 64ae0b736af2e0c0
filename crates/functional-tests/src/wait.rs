//! Polling helpers
//!
//! Pages change after a redirect or a slow staging round trip, so checks
//! are retried at a fixed interval until they pass or time runs out.

use std::future::Future;
use std::time::{Duration, Instant};

use thiserror::Error;

pub const MAX_WAIT: Duration = Duration::from_secs(5);
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Errors that may go away if the check is tried again
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Failure of a functional check
#[derive(Debug, Error)]
pub enum CheckError {
    /// The page is not (yet) what the check expects
    #[error("assertion failed: {0}")]
    Assertion(String),

    /// Talking to the server failed
    #[error("driver error: {0}")]
    Driver(String),

    /// The test environment could not be prepared
    #[error("setup failed: {0}")]
    Setup(String),
}

impl Retryable for CheckError {
    fn is_retryable(&self) -> bool {
        matches!(self, CheckError::Assertion(_) | CheckError::Driver(_))
    }
}

impl From<reqwest::Error> for CheckError {
    fn from(e: reqwest::Error) -> Self {
        CheckError::Driver(e.to_string())
    }
}

pub type CheckResult<T = ()> = Result<T, CheckError>;

/// `Ok` when `condition` holds, otherwise an assertion failure with `message`
pub fn check(condition: bool, message: impl Into<String>) -> CheckResult {
    if condition {
        Ok(())
    } else {
        Err(CheckError::Assertion(message.into()))
    }
}

/// Retry `f` every 500 ms for up to 5 s
pub fn wait_for<T, E, F>(f: F) -> Result<T, E>
where
    E: Retryable,
    F: FnMut() -> Result<T, E>,
{
    wait_for_with(MAX_WAIT, POLL_INTERVAL, f)
}

/// Retry `f` every `interval` until it succeeds or `timeout` has elapsed,
/// then return its last error
pub fn wait_for_with<T, E, F>(timeout: Duration, interval: Duration, mut f: F) -> Result<T, E>
where
    E: Retryable,
    F: FnMut() -> Result<T, E>,
{
    let start = Instant::now();
    loop {
        match f() {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_retryable() || start.elapsed() >= timeout => return Err(e),
            Err(_) => std::thread::sleep(interval),
        }
    }
}

/// Async [`wait_for`]
pub async fn wait_for_async<T, E, F, Fut>(f: F) -> Result<T, E>
where
    E: Retryable,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    wait_for_async_with(MAX_WAIT, POLL_INTERVAL, f).await
}

pub async fn wait_for_async_with<T, E, F, Fut>(
    timeout: Duration,
    interval: Duration,
    mut f: F,
) -> Result<T, E>
where
    E: Retryable,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let start = Instant::now();
    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_retryable() || start.elapsed() >= timeout => return Err(e),
            Err(_) => tokio::time::sleep(interval).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHORT: Duration = Duration::from_millis(200);
    const TICK: Duration = Duration::from_millis(10);

    #[test]
    fn test_returns_first_success() {
        let mut calls = 0;
        let result: CheckResult<u32> = wait_for_with(SHORT, TICK, || {
            calls += 1;
            Ok(7)
        });
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_retries_until_success() {
        let mut calls = 0;
        let result = wait_for_with(SHORT, TICK, || {
            calls += 1;
            if calls < 3 {
                Err(CheckError::Assertion("not yet".into()))
            } else {
                Ok(calls)
            }
        });
        assert_eq!(result.unwrap(), 3);
    }

    #[test]
    fn test_gives_up_with_last_error() {
        let start = Instant::now();
        let mut calls = 0;
        let result: CheckResult = wait_for_with(SHORT, TICK, || {
            calls += 1;
            Err(CheckError::Driver(format!("attempt {calls}")))
        });

        assert!(start.elapsed() >= SHORT);
        match result {
            Err(CheckError::Driver(message)) => assert_eq!(message, format!("attempt {calls}")),
            other => panic!("unexpected {other:?}"),
        }
        assert!(calls > 1);
    }

    #[test]
    fn test_setup_errors_are_not_retried() {
        let mut calls = 0;
        let result: CheckResult = wait_for_with(SHORT, TICK, || {
            calls += 1;
            Err(CheckError::Setup("no server".into()))
        });
        assert!(matches!(result, Err(CheckError::Setup(_))));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_default_window_outlasts_short_failures() {
        let start = Instant::now();
        let result = wait_for(|| {
            if start.elapsed() < Duration::from_millis(600) {
                Err(CheckError::Assertion("row missing".into()))
            } else {
                Ok(())
            }
        });
        assert!(result.is_ok());
        assert!(start.elapsed() < MAX_WAIT);
    }

    #[tokio::test]
    async fn test_async_retries_then_succeeds() {
        let mut calls = 0;
        let result = wait_for_async_with(SHORT, TICK, || {
            calls += 1;
            let attempt = calls;
            async move {
                if attempt < 2 {
                    Err(CheckError::Assertion("not yet".into()))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_async_gives_up() {
        let result: CheckResult = wait_for_async_with(SHORT, TICK, || async {
            Err(CheckError::Assertion("never".into()))
        })
        .await;
        assert!(matches!(result, Err(CheckError::Assertion(_))));
    }
}

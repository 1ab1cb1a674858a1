//! Bounded wait mechanisms.
//!
//! Every wait polls a probe until it yields a value or the budget runs out.
//! Nothing waits without a bound: an exhausted budget is a typed
//! [`ShopError::Timeout`], which callers may refine into
//! [`ShopError::ElementNotFound`] or a screen mismatch.

use crate::driver::{Driver, ElementHandle};
use crate::locator::Locator;
use crate::result::{ShopError, ShopResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for screen detection (8 seconds)
pub const DEFAULT_SCREEN_TIMEOUT_MS: u64 = 8_000;

/// Default timeout for element waits (5 seconds)
pub const DEFAULT_ELEMENT_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_ELEMENT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// POLLING
// =============================================================================

/// Poll `probe` until it yields `Some`, or fail with [`ShopError::Timeout`].
///
/// The probe always runs at least once. Errors from the probe abort the wait
/// immediately; they are not retried.
pub async fn poll_until<T, F, Fut>(options: &WaitOptions, what: &str, mut probe: F) -> ShopResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ShopResult<Option<T>>>,
{
    let start = Instant::now();
    loop {
        if let Some(value) = probe().await? {
            return Ok(value);
        }
        if start.elapsed() >= options.timeout() {
            tracing::debug!(what, timeout_ms = options.timeout_ms, "wait exhausted");
            return Err(ShopError::Timeout {
                what: what.to_string(),
                ms: options.timeout_ms,
            });
        }
        tokio::time::sleep(options.poll_interval()).await;
    }
}

/// Wait for a boolean condition
pub async fn wait_until<F, Fut>(options: &WaitOptions, what: &str, mut condition: F) -> ShopResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ShopResult<bool>>,
{
    poll_until(options, what, || {
        let fut = condition();
        async move { Ok(fut.await?.then_some(())) }
    })
    .await
}

/// Wait for at least one element to match, returning the first.
///
/// Maps an exhausted budget to [`ShopError::ElementNotFound`].
pub async fn wait_for_element(
    driver: &dyn Driver,
    locator: &Locator,
    options: &WaitOptions,
) -> ShopResult<ElementHandle> {
    let found = poll_until(options, locator.name(), || async move {
        Ok(locator.query(driver).await?.into_iter().next())
    })
    .await;
    match found {
        Err(ShopError::Timeout { .. }) => Err(locator.not_found()),
        other => other,
    }
}

/// Wait for a matching element that is visible, returning it.
///
/// Maps an exhausted budget to [`ShopError::ElementNotFound`].
pub async fn wait_for_visible(
    driver: &dyn Driver,
    locator: &Locator,
    options: &WaitOptions,
) -> ShopResult<ElementHandle> {
    let found = poll_until(options, locator.name(), || async move {
        for handle in locator.query(driver).await? {
            if driver.is_visible(&handle).await? {
                return Ok(Some(handle));
            }
        }
        Ok(None)
    })
    .await;
    match found {
        Err(ShopError::Timeout { .. }) => Err(locator.not_found()),
        other => other,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    mod wait_options_tests {
        use super::*;

        #[test]
        fn test_wait_options_default() {
            let opts = WaitOptions::default();
            assert_eq!(opts.timeout_ms, DEFAULT_ELEMENT_TIMEOUT_MS);
            assert_eq!(opts.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        }

        #[test]
        fn test_wait_options_builder() {
            let opts = WaitOptions::new().with_timeout(250).with_poll_interval(5);
            assert_eq!(opts.timeout(), Duration::from_millis(250));
            assert_eq!(opts.poll_interval(), Duration::from_millis(5));
        }
    }

    mod polling_tests {
        use super::*;

        #[tokio::test]
        async fn test_immediate_success() {
            let opts = WaitOptions::new().with_timeout(0);
            let value = poll_until(&opts, "answer", || async { Ok(Some(42)) })
                .await
                .unwrap();
            assert_eq!(value, 42);
        }

        #[tokio::test(start_paused = true)]
        async fn test_success_after_retries() {
            let calls = AtomicUsize::new(0);
            let opts = WaitOptions::new().with_timeout(1_000).with_poll_interval(10);
            let calls_ref = &calls;
            let value = poll_until(&opts, "third call", || async move {
                let n = calls_ref.fetch_add(1, Ordering::SeqCst) + 1;
                Ok((n >= 3).then_some(n))
            })
            .await
            .unwrap();
            assert_eq!(value, 3);
        }

        #[tokio::test(start_paused = true)]
        async fn test_timeout_is_typed() {
            let opts = WaitOptions::new().with_timeout(100).with_poll_interval(10);
            let err = wait_until(&opts, "never", || async { Ok(false) })
                .await
                .unwrap_err();
            match err {
                ShopError::Timeout { what, ms } => {
                    assert_eq!(what, "never");
                    assert_eq!(ms, 100);
                }
                other => panic!("unexpected {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_probe_error_aborts() {
            let calls = AtomicUsize::new(0);
            let calls_ref = &calls;
            let opts = WaitOptions::new().with_timeout(1_000);
            let err = poll_until::<(), _, _>(&opts, "broken", || async move {
                calls_ref.fetch_add(1, Ordering::SeqCst);
                Err(ShopError::driver("connection lost"))
            })
            .await
            .unwrap_err();
            assert!(matches!(err, ShopError::Driver { .. }));
            assert_eq!(calls.load(Ordering::SeqCst), 1);
        }
    }
}

//! Session configuration.

use crate::driver::DeviceProfile;
use crate::result::{ShopError, ShopResult};
use crate::wait::{
    WaitOptions, DEFAULT_ELEMENT_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_SCREEN_TIMEOUT_MS,
};

/// Public demo storefront
pub const DEFAULT_BASE_URL: &str = "https://www.saucedemo.com";

/// Environment variable overriding the base URL
pub const ENV_BASE_URL: &str = "SHOPCHECK_BASE_URL";
/// Environment variable overriding headless mode (`true`/`false`/`1`/`0`)
pub const ENV_HEADLESS: &str = "SHOPCHECK_HEADLESS";
/// Environment variable overriding the screen timeout in milliseconds
pub const ENV_TIMEOUT_MS: &str = "SHOPCHECK_TIMEOUT_MS";
/// Environment variable pointing at a chromium binary
pub const ENV_CHROMIUM_PATH: &str = "CHROMIUM_PATH";

/// Configuration shared by every page object of one session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Storefront base URL
    pub base_url: String,
    /// Emulated device
    pub device: DeviceProfile,
    /// Run the browser without a window
    pub headless: bool,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
    /// Budget for screen detection
    pub screen_timeout_ms: u64,
    /// Budget for element waits
    pub element_timeout_ms: u64,
    /// Polling interval for all waits
    pub poll_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            device: DeviceProfile::DESKTOP,
            headless: true,
            chromium_path: None,
            sandbox: true,
            screen_timeout_ms: DEFAULT_SCREEN_TIMEOUT_MS,
            element_timeout_ms: DEFAULT_ELEMENT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl SessionConfig {
    /// Default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with `SHOPCHECK_*` and `CHROMIUM_PATH` variables
    pub fn from_env() -> ShopResult<Self> {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Overlay values from a key lookup
    pub fn overlay<F>(mut self, lookup: F) -> ShopResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.base_url = url;
        }
        if let Some(raw) = lookup(ENV_HEADLESS) {
            self.headless = parse_flag(&raw).ok_or_else(|| ShopError::parse(ENV_HEADLESS, raw))?;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            self.screen_timeout_ms = raw
                .trim()
                .parse()
                .map_err(|_| ShopError::parse(ENV_TIMEOUT_MS, raw))?;
        }
        if let Some(path) = lookup(ENV_CHROMIUM_PATH).filter(|v| !v.is_empty()) {
            self.chromium_path = Some(path);
        }
        Ok(self)
    }

    /// Set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set device profile
    #[must_use]
    pub const fn with_device(mut self, device: DeviceProfile) -> Self {
        self.device = device;
        self
    }

    /// Use the mobile profile
    #[must_use]
    pub const fn mobile(self) -> Self {
        self.with_device(DeviceProfile::MOBILE)
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Set screen detection timeout
    #[must_use]
    pub const fn with_screen_timeout(mut self, timeout_ms: u64) -> Self {
        self.screen_timeout_ms = timeout_ms;
        self
    }

    /// Set element wait timeout
    #[must_use]
    pub const fn with_element_timeout(mut self, timeout_ms: u64) -> Self {
        self.element_timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Wait options for screen detection
    #[must_use]
    pub const fn screen_wait(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.screen_timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    /// Wait options for element lookups
    #[must_use]
    pub const fn element_wait(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.element_timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    /// Absolute URL of a path on the storefront
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        crate::screen::join_url(&self.base_url, path)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

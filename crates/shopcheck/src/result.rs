//! Result and error types for shopcheck.

use crate::screen::Screen;
use thiserror::Error;

/// Result type for shopcheck operations
pub type ShopResult<T> = Result<T, ShopError>;

/// Errors that can occur while driving the storefront
#[derive(Debug, Error)]
pub enum ShopError {
    /// The location never reached the screen's path pattern
    #[error("Navigation mismatch on {screen}: expected location matching {expected}, still at {actual}")]
    NavigationMismatch {
        /// Screen that was expected
        screen: Screen,
        /// Expected path pattern
        expected: String,
        /// Last observed location
        actual: String,
    },

    /// Location matched but the screen's title marker did not
    #[error("Content mismatch on {screen} ({locator}): expected {expected:?}, got {actual:?}")]
    ContentMismatch {
        /// Screen that was expected
        screen: Screen,
        /// Semantic name of the marker locator
        locator: String,
        /// Expected marker text
        expected: String,
        /// Last observed marker text
        actual: String,
    },

    /// A locator resolved to zero elements where one was required
    #[error("Element not found on {screen}: {locator} ({selector})")]
    ElementNotFound {
        /// Screen the locator belongs to
        screen: Screen,
        /// Semantic locator name
        locator: String,
        /// Resolved selector
        selector: String,
    },

    /// Observed state differs from the expected state
    #[error("Assertion failed on {screen}: {what}: expected {expected}, got {actual}")]
    AssertionFailed {
        /// Screen the assertion ran on
        screen: Screen,
        /// What was compared
        what: String,
        /// Expected value
        expected: String,
        /// Observed value
        actual: String,
    },

    /// An action is not valid in the current workflow state
    #[error("Invalid transition {transition} from {from}")]
    InvalidTransition {
        /// Screen the workflow is on
        from: Screen,
        /// Requested transition
        transition: String,
    },

    /// A bounded wait exceeded its budget
    #[error("Timed out after {ms}ms waiting for {what}")]
    Timeout {
        /// What was being waited for
        what: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Low-level failure reported by a driver backend
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Fixture data could not be loaded or is inconsistent
    #[error("Fixture error: {message}")]
    Fixture {
        /// Error message
        message: String,
    },

    /// A displayed value could not be parsed
    #[error("Could not parse {what} from {input:?}")]
    Parse {
        /// What was being parsed
        what: String,
        /// Raw input
        input: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl ShopError {
    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create a fixture error
    #[must_use]
    pub fn fixture(message: impl Into<String>) -> Self {
        Self::Fixture {
            message: message.into(),
        }
    }

    /// Create an assertion failure
    #[must_use]
    pub fn assertion(
        screen: Screen,
        what: impl Into<String>,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        Self::AssertionFailed {
            screen,
            what: what.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a parse error
    #[must_use]
    pub fn parse(what: impl Into<String>, input: impl Into<String>) -> Self {
        Self::Parse {
            what: what.into(),
            input: input.into(),
        }
    }

    /// Check whether this error came from an exhausted wait of any kind
    #[must_use]
    pub const fn is_wait_failure(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. }
                | Self::NavigationMismatch { .. }
                | Self::ContentMismatch { .. }
                | Self::ElementNotFound { .. }
        )
    }
}

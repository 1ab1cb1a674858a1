//! Driver - Abstract Browser Automation Trait
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────────────┐
//! │  Driver (Abstract Trait)                                                  │
//! ├───────────────────────────────────────────────────────────────────────────┤
//! │                                                                           │
//! │  ┌─────────────────────┐  ┌─────────────────────┐                         │
//! │  │  ChromiumDriver     │  │  SimulatedStorefront │                        │
//! │  │  (feature browser)  │  │  (always available)  │                        │
//! │  │                     │  │                      │                        │
//! │  │  CDP via            │  │  In-memory model of  │                        │
//! │  │  chromiumoxide      │  │  the demo shop       │                        │
//! │  └─────────────────────┘  └─────────────────────┘                         │
//! │                                                                           │
//! │  Page objects only ever see `&dyn Driver`.                                │
//! └───────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Element handles are `(selector, index)` pairs that the backend re-resolves
//! on every call, so nothing read from the DOM is cached between calls.

use crate::result::ShopResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Re-resolvable reference to the `index`-th element matching `selector`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    /// CSS selector the element was found with
    pub selector: String,
    /// Position among the selector's matches, in document order
    pub index: usize,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(selector: impl Into<String>, index: usize) -> Self {
        Self {
            selector: selector.into(),
            index,
        }
    }

    /// Handles for the first `count` matches of a selector
    #[must_use]
    pub fn all(selector: &str, count: usize) -> Vec<Self> {
        (0..count).map(|i| Self::new(selector, i)).collect()
    }
}

impl std::fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.selector, self.index)
    }
}

/// Viewport profile a session emulates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeviceProfile {
    /// Profile name
    pub name: &'static str,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Device scale factor
    pub device_scale_factor: f64,
    /// Is mobile device
    pub is_mobile: bool,
    /// Default user agent, if the profile overrides it
    pub user_agent: Option<&'static str>,
}

impl DeviceProfile {
    /// Desktop 1280x720
    pub const DESKTOP: Self = Self {
        name: "Desktop",
        viewport_width: 1280,
        viewport_height: 720,
        device_scale_factor: 1.0,
        is_mobile: false,
        user_agent: None,
    };

    /// Desktop 1080p
    pub const DESKTOP_1080P: Self = Self {
        name: "Desktop 1080p",
        viewport_width: 1920,
        viewport_height: 1080,
        device_scale_factor: 1.0,
        is_mobile: false,
        user_agent: None,
    };

    /// iPhone SE sized viewport
    pub const MOBILE: Self = Self {
        name: "Mobile",
        viewport_width: 375,
        viewport_height: 667,
        device_scale_factor: 2.0,
        is_mobile: true,
        user_agent: Some(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0 like Mac OS X) AppleWebKit/605.1.15",
        ),
    };
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::DESKTOP
    }
}

/// Abstract driver trait for browser automation
///
/// Each backend translates its own failures into [`crate::ShopError::Driver`].
/// No method waits for a condition; bounded waiting is layered on top by
/// [`crate::wait`].
#[async_trait]
pub trait Driver: Send + Sync + std::fmt::Debug {
    /// Backend name for logs and reports
    fn backend(&self) -> &'static str;

    /// Navigate to URL
    async fn navigate(&self, url: &str) -> ShopResult<()>;

    /// Get current URL
    async fn current_url(&self) -> ShopResult<String>;

    /// Query all elements matching a CSS selector
    async fn find_all(&self, selector: &str) -> ShopResult<Vec<ElementHandle>>;

    /// Query the first element matching a CSS selector
    async fn find(&self, selector: &str) -> ShopResult<Option<ElementHandle>> {
        Ok(self.find_all(selector).await?.into_iter().next())
    }

    /// Click element
    async fn click(&self, element: &ElementHandle) -> ShopResult<()>;

    /// Type text into element (appends to its current value)
    async fn type_text(&self, element: &ElementHandle, text: &str) -> ShopResult<()>;

    /// Clear an input element
    async fn clear(&self, element: &ElementHandle) -> ShopResult<()>;

    /// Rendered text of an element (the value, for inputs)
    async fn text(&self, element: &ElementHandle) -> ShopResult<String>;

    /// Whether the element is rendered visibly
    async fn is_visible(&self, element: &ElementHandle) -> ShopResult<bool>;

    /// Select an `<option>` by value on a `<select>` element
    async fn select_option(&self, element: &ElementHandle, value: &str) -> ShopResult<()>;

    /// Close the browser
    async fn close(&self) -> ShopResult<()>;
}

/// Driver handle shared by all page objects of one session
pub type SharedDriver = Arc<dyn Driver>;

#[cfg(test)]
mod tests {
    use super::*;

    mod element_handle_tests {
        use super::*;

        #[test]
        fn test_element_handle_creation() {
            let elem = ElementHandle::new(".title", 0);
            assert_eq!(elem.selector, ".title");
            assert_eq!(elem.index, 0);
            assert_eq!(elem.to_string(), ".title[0]");
        }

        #[test]
        fn test_all_handles_are_indexed_in_order() {
            let handles = ElementHandle::all(".cart_item", 3);
            assert_eq!(handles.len(), 3);
            assert_eq!(handles[2], ElementHandle::new(".cart_item", 2));
        }
    }

    mod device_profile_tests {
        use super::*;

        #[test]
        fn test_mobile_profile() {
            let device = DeviceProfile::MOBILE;
            assert_eq!(device.viewport_width, 375);
            assert_eq!(device.viewport_height, 667);
            assert!(device.is_mobile);
            assert!(device.user_agent.is_some());
        }

        #[test]
        fn test_default_is_desktop() {
            let device = DeviceProfile::default();
            assert_eq!(device.viewport_width, 1280);
            assert!(!device.is_mobile);
        }
    }
}

//! Test sessions.
//!
//! A [`Session`] owns one driver and one configuration. Page objects handed
//! out by a session share its driver; nothing is shared between sessions.

use crate::config::SessionConfig;
use crate::driver::SharedDriver;
use crate::page::LoginPage;
use crate::result::ShopResult;
use crate::sim::SimulatedStorefront;
use std::sync::Arc;
use uuid::Uuid;

/// One isolated browser session
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    driver: SharedDriver,
    config: Arc<SessionConfig>,
    span: tracing::Span,
}

impl Session {
    /// Create a session over an existing driver
    #[must_use]
    pub fn new(driver: SharedDriver, config: SessionConfig) -> Self {
        let id = Uuid::new_v4();
        let span = tracing::info_span!(
            "session",
            id = %id,
            backend = driver.backend(),
            device = config.device.name,
        );
        tracing::debug!(parent: &span, base_url = %config.base_url, "session created");
        Self {
            id,
            driver,
            config: Arc::new(config),
            span,
        }
    }

    /// Session over a fresh simulated storefront
    #[must_use]
    pub fn simulated(config: SessionConfig) -> Self {
        let shop = SimulatedStorefront::new().with_base_url(config.base_url.clone());
        Self::new(Arc::new(shop), config)
    }

    /// Session over a freshly launched chromium
    #[cfg(feature = "browser")]
    pub async fn chromium(config: SessionConfig) -> ShopResult<Self> {
        let driver = crate::chromium::ChromiumDriver::launch(&config).await?;
        Ok(Self::new(Arc::new(driver), config))
    }

    /// Session id
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Shared driver handle
    #[must_use]
    pub fn driver(&self) -> SharedDriver {
        Arc::clone(&self.driver)
    }

    /// Backend name
    #[must_use]
    pub fn backend(&self) -> &'static str {
        self.driver.backend()
    }

    /// Configuration
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Tracing span that scopes this session's events
    #[must_use]
    pub const fn span(&self) -> &tracing::Span {
        &self.span
    }

    /// Login page object, without navigating
    #[must_use]
    pub fn login_page(&self) -> LoginPage {
        LoginPage::new(self.driver(), Arc::clone(&self.config))
    }

    /// Navigate to the storefront and return the verified login page
    pub async fn open(&self) -> ShopResult<LoginPage> {
        let page = self.login_page();
        page.visit().await?;
        Ok(page)
    }

    /// Close the underlying browser
    pub async fn close(self) -> ShopResult<()> {
        tracing::debug!(parent: &self.span, "session closed");
        self.driver.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_are_isolated() {
        let a = Session::simulated(SessionConfig::default());
        let b = Session::simulated(SessionConfig::default());
        assert_ne!(a.id(), b.id());
        assert!(!Arc::ptr_eq(&a.driver(), &b.driver()));
        assert_eq!(a.backend(), "sim");
    }

    #[tokio::test]
    async fn test_open_lands_on_login() {
        let session = Session::simulated(SessionConfig::default().with_screen_timeout(200));
        let login = session.open().await.unwrap();
        login.assert_no_error().await.unwrap();
        session.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_custom_base_url() {
        let config = SessionConfig::default().with_base_url("http://localhost:8080");
        let session = Session::simulated(config);
        session.open().await.unwrap();
        assert_eq!(
            session.driver().current_url().await.unwrap(),
            "http://localhost:8080/"
        );
    }

    #[tokio::test]
    async fn test_base_url_with_path_prefix() {
        let config = SessionConfig::default()
            .with_base_url("http://localhost:8080/demo")
            .with_screen_timeout(300);
        let session = Session::simulated(config);
        let fixtures = crate::fixture::Fixtures::builtin();
        let products = session
            .open()
            .await
            .unwrap()
            .login_as(fixtures.standard_user().unwrap())
            .await
            .unwrap();
        products.open_cart().await.unwrap();
        assert_eq!(
            session.driver().current_url().await.unwrap(),
            "http://localhost:8080/demo/cart.html"
        );
    }
}

//! Login screen.

use super::{Outcome, PageContext, PageObject, ProductsPage};
use crate::config::SessionConfig;
use crate::driver::SharedDriver;
use crate::fixture::UserRecord;
use crate::model::ErrorState;
use crate::result::{ShopError, ShopResult};
use crate::screen::Screen;
use std::sync::Arc;

/// Result of submitting credentials
#[derive(Debug)]
pub enum LoginAttempt {
    /// Credentials accepted; the catalog is verified
    LoggedIn(ProductsPage),
    /// Credentials refused; still on the login screen
    Refused(ErrorState),
}

impl LoginAttempt {
    /// Error shown, if the login was refused
    #[must_use]
    pub fn error(&self) -> Option<&ErrorState> {
        match self {
            Self::LoggedIn(_) => None,
            Self::Refused(state) => Some(state),
        }
    }
}

/// Page object for the login form
#[derive(Debug, Clone)]
pub struct LoginPage {
    ctx: PageContext,
}

impl PageObject for LoginPage {
    fn context(&self) -> &PageContext {
        &self.ctx
    }
}

impl LoginPage {
    /// Create a login page object
    #[must_use]
    pub fn new(driver: SharedDriver, config: Arc<SessionConfig>) -> Self {
        Self::from_context(PageContext::new(Screen::Login, driver, config))
    }

    pub(crate) fn from_context(ctx: PageContext) -> Self {
        debug_assert_eq!(ctx.screen(), Screen::Login);
        Self { ctx }
    }

    /// Navigate to the storefront root and verify the login form
    pub async fn visit(&self) -> ShopResult<&Self> {
        let url = self.ctx.config().url(Screen::Login.path());
        tracing::debug!(%url, "visit");
        self.ctx.driver().navigate(&url).await?;
        self.assert_on_screen().await
    }

    /// Type the username
    pub async fn enter_username(&self, username: &str) -> ShopResult<&Self> {
        self.ctx.fill("username", username).await?;
        Ok(self)
    }

    /// Type the password
    pub async fn enter_password(&self, password: &str) -> ShopResult<&Self> {
        self.ctx.fill("password", password).await?;
        Ok(self)
    }

    /// Press the login button
    pub async fn click_login(&self) -> ShopResult<&Self> {
        self.ctx.click("login_button").await?;
        Ok(self)
    }

    /// Enter credentials and submit, without judging the outcome
    pub async fn login(&self, username: &str, password: &str) -> ShopResult<&Self> {
        self.enter_username(username)
            .await?
            .enter_password(password)
            .await?
            .click_login()
            .await
    }

    /// Submit a user's credentials and report whether they were accepted
    pub async fn attempt(&self, user: &UserRecord) -> ShopResult<LoginAttempt> {
        self.login(&user.username, &user.password).await?;
        match self.ctx.await_outcome(Screen::Products).await? {
            Outcome::Moved => {
                let ctx = self.ctx.arrive(Screen::Products).await?;
                tracing::info!(username = %user.username, "logged in");
                Ok(LoginAttempt::LoggedIn(ProductsPage::from_context(ctx)))
            }
            Outcome::Refused(message) => {
                tracing::info!(username = %user.username, %message, "login refused");
                Ok(LoginAttempt::Refused(ErrorState {
                    screen: Screen::Login,
                    message,
                }))
            }
        }
    }

    /// Log in and return the verified product catalog
    pub async fn login_as(&self, user: &UserRecord) -> ShopResult<ProductsPage> {
        match self.attempt(user).await? {
            LoginAttempt::LoggedIn(products) => Ok(products),
            LoginAttempt::Refused(state) => Err(ShopError::assertion(
                Screen::Login,
                format!("login of {:?}", user.username),
                "accepted",
                state.message,
            )),
        }
    }

    /// Visible error message, if any
    pub async fn error_message(&self) -> ShopResult<Option<String>> {
        self.ctx.visible_text("error").await
    }

    /// Fail unless a visible error contains `expected`
    pub async fn assert_error_message(&self, expected: &str) -> ShopResult<&Self> {
        let handle = self.ctx.visible_element("error").await?;
        let actual = self.ctx.driver().text(&handle).await?;
        if actual.contains(expected) {
            Ok(self)
        } else {
            Err(ShopError::assertion(Screen::Login, "error message", expected, actual))
        }
    }

    /// Fail if an error message is visible
    pub async fn assert_no_error(&self) -> ShopResult<&Self> {
        match self.error_message().await? {
            None => Ok(self),
            Some(message) => Err(ShopError::assertion(
                Screen::Login,
                "error message",
                "<none>",
                message,
            )),
        }
    }

    /// Dismiss the error banner
    pub async fn clear_error(&self) -> ShopResult<&Self> {
        self.ctx.click("error_button").await?;
        Ok(self)
    }
}

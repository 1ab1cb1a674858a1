//! Chromium backend over the Chrome `DevTools` Protocol.
//!
//! Element primitives run as small scripts against
//! `document.querySelectorAll(selector)[index]`, so every call re-resolves
//! its handle. Value changes go through the native `value` setter followed by
//! `input`/`change` events; the storefront's React inputs ignore plain
//! property writes.

use crate::config::SessionConfig;
use crate::driver::{Driver, ElementHandle};
use crate::result::{ShopError, ShopResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::Mutex;

/// Reply envelope every script returns
#[derive(Debug, Deserialize)]
struct Reply<T> {
    found: bool,
    #[serde(default = "Option::default")]
    value: Option<T>,
}

/// Chromium driven through chromiumoxide
#[derive(Debug)]
pub struct ChromiumDriver {
    browser: Mutex<Browser>,
    page: Page,
    handler: tokio::task::JoinHandle<()>,
}

impl ChromiumDriver {
    /// Launch chromium and open a blank page sized for the session's device
    pub async fn launch(config: &SessionConfig) -> ShopResult<Self> {
        let device = config.device;
        let mut builder =
            BrowserConfig::builder().window_size(device.viewport_width, device.viewport_height);
        if !config.headless {
            builder = builder.with_head();
        }
        if !config.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }
        let cdp_config = builder
            .build()
            .map_err(|message| ShopError::BrowserLaunch { message })?;

        let (browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| ShopError::BrowserLaunch {
                message: e.to_string(),
            })?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ShopError::BrowserLaunch {
                message: e.to_string(),
            })?;
        page.execute(SetDeviceMetricsOverrideParams::new(
            i64::from(device.viewport_width),
            i64::from(device.viewport_height),
            device.device_scale_factor,
            device.is_mobile,
        ))
        .await
        .map_err(cdp_error)?;
        if let Some(user_agent) = device.user_agent {
            page.execute(SetUserAgentOverrideParams::new(user_agent))
                .await
                .map_err(cdp_error)?;
        }
        tracing::info!(
            device = device.name,
            headless = config.headless,
            "chromium launched"
        );

        Ok(Self {
            browser: Mutex::new(browser),
            page,
            handler,
        })
    }

    async fn eval<T: DeserializeOwned>(&self, script: &str) -> ShopResult<T> {
        let result = self.page.evaluate(script).await.map_err(cdp_error)?;
        result
            .into_value()
            .map_err(|e| ShopError::driver(format!("unexpected script result: {e}")))
    }

    async fn on_element<T: DeserializeOwned>(
        &self,
        element: &ElementHandle,
        body: &str,
    ) -> ShopResult<Option<T>> {
        let reply: Reply<T> = self.eval(&element_script(element, body)).await?;
        if reply.found {
            Ok(reply.value)
        } else {
            Err(ShopError::driver(format!("stale element reference: {element}")))
        }
    }

    async fn set_value(&self, element: &ElementHandle, value_expr: &str) -> ShopResult<()> {
        let body = format!(
            "const proto = el instanceof HTMLSelectElement ? HTMLSelectElement.prototype \
               : el instanceof HTMLTextAreaElement ? HTMLTextAreaElement.prototype \
               : HTMLInputElement.prototype; \
             const setter = Object.getOwnPropertyDescriptor(proto, 'value').set; \
             el.focus(); \
             setter.call(el, {value_expr}); \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
             return el.value;"
        );
        let _: Option<String> = self.on_element(element, &body).await?;
        Ok(())
    }
}

fn cdp_error(e: impl std::fmt::Display) -> ShopError {
    ShopError::driver(e.to_string())
}

fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

/// Script resolving `element` as `el` and running `body` against it
fn element_script(element: &ElementHandle, body: &str) -> String {
    format!(
        "(() => {{ \
           const el = document.querySelectorAll({selector})[{index}]; \
           if (!el) {{ return {{ found: false }}; }} \
           const value = (() => {{ {body} }})(); \
           return {{ found: true, value: value === undefined ? null : value }}; \
         }})()",
        selector = js_string(&element.selector),
        index = element.index,
    )
}

const VISIBLE_BODY: &str = "\
    if (typeof el.checkVisibility === 'function' \
        && !el.checkVisibility({ checkOpacity: true, checkVisibilityCSS: true })) { return false; } \
    const rect = el.getBoundingClientRect(); \
    const style = getComputedStyle(el); \
    return rect.width > 0 && rect.height > 0 && rect.right > 0 && rect.bottom > 0 \
        && style.visibility !== 'hidden' && style.display !== 'none';";

const TEXT_BODY: &str = "\
    const tag = el.tagName; \
    return (tag === 'INPUT' || tag === 'TEXTAREA' || tag === 'SELECT') ? el.value : el.innerText;";

#[async_trait]
impl Driver for ChromiumDriver {
    fn backend(&self) -> &'static str {
        "chromium"
    }

    async fn navigate(&self, url: &str) -> ShopResult<()> {
        tracing::debug!(url, "goto");
        let _ = self.page.goto(url).await.map_err(cdp_error)?;
        Ok(())
    }

    async fn current_url(&self) -> ShopResult<String> {
        Ok(self
            .page
            .url()
            .await
            .map_err(cdp_error)?
            .unwrap_or_else(|| "about:blank".to_string()))
    }

    async fn find_all(&self, selector: &str) -> ShopResult<Vec<ElementHandle>> {
        let count: usize = self
            .eval(&format!(
                "document.querySelectorAll({}).length",
                js_string(selector)
            ))
            .await?;
        tracing::trace!(selector, count, "query");
        Ok(ElementHandle::all(selector, count))
    }

    async fn click(&self, element: &ElementHandle) -> ShopResult<()> {
        tracing::trace!(%element, "click");
        let body = format!(
            "if (!(() => {{ {VISIBLE_BODY} }})()) {{ return false; }} \
             el.scrollIntoView({{ block: 'center' }}); el.click(); return true;"
        );
        match self.on_element::<bool>(element, &body).await? {
            Some(true) => Ok(()),
            _ => Err(ShopError::driver(format!(
                "element not interactable: {element}"
            ))),
        }
    }

    async fn type_text(&self, element: &ElementHandle, text: &str) -> ShopResult<()> {
        tracing::trace!(%element, chars = text.len(), "type");
        self.set_value(element, &format!("el.value + {}", js_string(text)))
            .await
    }

    async fn clear(&self, element: &ElementHandle) -> ShopResult<()> {
        self.set_value(element, "''").await
    }

    async fn text(&self, element: &ElementHandle) -> ShopResult<String> {
        Ok(self
            .on_element::<String>(element, TEXT_BODY)
            .await?
            .unwrap_or_default())
    }

    async fn is_visible(&self, element: &ElementHandle) -> ShopResult<bool> {
        Ok(self
            .on_element::<bool>(element, VISIBLE_BODY)
            .await?
            .unwrap_or(false))
    }

    async fn select_option(&self, element: &ElementHandle, value: &str) -> ShopResult<()> {
        let known: Option<bool> = self
            .on_element(
                element,
                &format!(
                    "return el instanceof HTMLSelectElement \
                       && Array.from(el.options).some(o => o.value === {});",
                    js_string(value)
                ),
            )
            .await?;
        if known != Some(true) {
            return Err(ShopError::driver(format!(
                "no option with value {value:?} in {element}"
            )));
        }
        self.set_value(element, &js_string(value)).await
    }

    async fn close(&self) -> ShopResult<()> {
        let mut browser = self.browser.lock().await;
        let closed = browser.close().await;
        self.handler.abort();
        closed.map_err(cdp_error)?;
        tracing::debug!("chromium closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_is_escaped() {
        let handle = ElementHandle::new("[data-test=\"add-to-cart-sauce-labs-backpack\"]", 2);
        let script = element_script(&handle, "return 1;");
        assert!(script.contains(r#"querySelectorAll("[data-test=\"add-to-cart-sauce-labs-backpack\"]")[2]"#));
        assert!(script.contains("found: false"));
    }

    #[test]
    fn test_reply_without_value() {
        let reply: Reply<String> = serde_json::from_str(r#"{"found": false}"#).unwrap();
        assert!(!reply.found);
        assert!(reply.value.is_none());
    }

    #[test]
    fn test_js_string_quotes() {
        assert_eq!(js_string("it's \"x\""), r#""it's \"x\"""#);
    }
}

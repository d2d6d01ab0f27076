//! Page objects
//!
//! One module per screen of the shop. Each page object is bound to the live
//! page handle of the current session, resolves its element locators at
//! construction time, and exposes typed actions and queries. Action methods
//! that leave the screen consume the page object and return the one for the
//! next screen, so calls that are invalid for the current screen do not
//! compile.

pub mod cart;
pub mod checkout_complete;
pub mod checkout_step_one;
pub mod checkout_step_two;
pub mod login;
pub mod products;

pub use cart::CartPage;
pub use checkout_complete::CheckoutCompletePage;
pub use checkout_step_one::CheckoutStepOnePage;
pub use checkout_step_two::CheckoutStepTwoPage;
pub use login::LoginPage;
pub use products::{SocialNetwork, SortOption, ProductsPage};

use anyhow::{Context, Result};
use async_trait::async_trait;
use playwright::api::DocumentLoadState;
use regex::Regex;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

pub use crate::session::PageHandle;

/// Shared page title of the application under test.
pub const APP_TITLE: &str = "Swag Labs";

/// Common contract of every page object.
#[async_trait]
pub trait PageObject {
    /// URL fragment that identifies this screen.
    fn url_fragment(&self) -> &'static str;

    /// Expected document title for this screen.
    fn expected_title(&self) -> &'static str;

    fn handle(&self) -> &PageHandle;

    /// Coarse "am I on this screen" check. Read-only; meant for assertions,
    /// not control flow.
    async fn is_on_page(&self) -> bool {
        let url = current_url(self.handle()).await.unwrap_or_default();
        let title = current_title(self.handle()).await.unwrap_or_default();
        url.contains(self.url_fragment()) && title == self.expected_title()
    }
}

pub(crate) async fn current_url(page: &PageHandle) -> Result<String> {
    let page = page.lock().await;
    let url: String = page
        .evaluate("() => window.location.href", ())
        .await
        .context("Failed to read current URL")?;
    Ok(url)
}

pub(crate) async fn current_path(page: &PageHandle) -> Result<String> {
    let page = page.lock().await;
    let path: String = page
        .evaluate("() => window.location.pathname", ())
        .await
        .context("Failed to read current path")?;
    Ok(path)
}

pub(crate) async fn current_title(page: &PageHandle) -> Result<String> {
    let page = page.lock().await;
    let title: String = page
        .evaluate("() => document.title", ())
        .await
        .context("Failed to read page title")?;
    Ok(title)
}

/// Poll until the URL contains `fragment`.
pub(crate) async fn wait_for_url_contains(
    page: &PageHandle,
    fragment: &str,
    timeout_ms: u64,
) -> Result<()> {
    let start = Instant::now();
    while start.elapsed().as_millis() < timeout_ms as u128 {
        if current_url(page).await?.contains(fragment) {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    anyhow::bail!(
        "Timed out after {}ms waiting for URL containing {:?} (current: {})",
        timeout_ms,
        fragment,
        current_url(page).await.unwrap_or_default()
    )
}

/// Poll until the page is back on the landing screen. The landing screen is
/// served both as "/" and as "/index.html".
pub(crate) async fn wait_for_landing(page: &PageHandle, timeout_ms: u64) -> Result<()> {
    let start = Instant::now();
    while start.elapsed().as_millis() < timeout_ms as u128 {
        if is_landing_path(&current_path(page).await?) {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    anyhow::bail!("Timed out after {}ms waiting for the landing screen", timeout_ms)
}

pub(crate) fn is_landing_path(path: &str) -> bool {
    path == "/" || path.ends_with("index.html")
}

pub(crate) async fn goto(page: &PageHandle, url: &str, timeout_ms: u64) -> Result<()> {
    let page = page.lock().await;
    page.goto_builder(url)
        .wait_until(DocumentLoadState::NetworkIdle)
        .timeout(timeout_ms as f64)
        .goto()
        .await
        .with_context(|| format!("Failed to navigate to {}", url))?;
    Ok(())
}

pub(crate) async fn click(page: &PageHandle, selector: &str) -> Result<()> {
    let page = page.lock().await;
    page.click_builder(selector)
        .click()
        .await
        .with_context(|| format!("Failed to click {}", selector))?;
    Ok(())
}

pub(crate) async fn fill(page: &PageHandle, selector: &str, value: &str) -> Result<()> {
    let page = page.lock().await;
    let element = page
        .query_selector(selector)
        .await
        .with_context(|| format!("Failed to query {}", selector))?
        .with_context(|| format!("No element matches {}", selector))?;
    element
        .fill_builder(value)
        .fill()
        .await
        .with_context(|| format!("Failed to fill {}", selector))?;
    Ok(())
}

pub(crate) async fn wait_for_selector(
    page: &PageHandle,
    selector: &str,
    timeout_ms: u64,
) -> Result<()> {
    let page = page.lock().await;
    let _ = page
        .wait_for_selector_builder(selector)
        .timeout(timeout_ms as f64)
        .wait_for_selector()
        .await
        .with_context(|| format!("Element {} did not appear within {}ms", selector, timeout_ms))?;
    Ok(())
}

/// Visibility probe; absent elements read as not visible.
pub(crate) async fn is_visible(page: &PageHandle, selector: &str) -> bool {
    let page = page.lock().await;
    match page.query_selector(selector).await {
        Ok(Some(element)) => element.is_visible().await.unwrap_or(false),
        _ => false,
    }
}

/// Text of the first match, or empty string when absent or unreadable.
pub(crate) async fn element_text(page: &PageHandle, selector: &str) -> String {
    let page = page.lock().await;
    page.evaluate_on_selector::<String, String>(
        selector,
        "el => el.innerText || el.textContent || ''",
        None::<String>,
    )
    .await
    .map(|text| text.trim().to_string())
    .unwrap_or_default()
}

/// Trimmed text of every match, in document order. Empty on read failure.
pub(crate) async fn element_texts(page: &PageHandle, selector: &str) -> Vec<String> {
    let page = page.lock().await;
    page.evaluate(
        "sel => Array.from(document.querySelectorAll(sel)).map(el => el.innerText.trim())",
        selector,
    )
    .await
    .unwrap_or_default()
}

pub(crate) async fn count_elements(page: &PageHandle, selector: &str) -> usize {
    let page = page.lock().await;
    page.query_selector_all(selector)
        .await
        .map(|elements| elements.len())
        .unwrap_or(0)
}

/// Set a `<select>` to `value` and fire its change event.
pub(crate) async fn select_by_value(page: &PageHandle, selector: &str, value: &str) -> Result<()> {
    let page = page.lock().await;
    let js = r#"([sel, value]) => {
        const el = document.querySelector(sel);
        if (!el) throw new Error('select not found: ' + sel);
        el.value = value;
        el.dispatchEvent(new Event('change', { bubbles: true }));
    }"#;
    page.evaluate::<_, ()>(js, serde_json::json!([selector, value]))
        .await
        .with_context(|| format!("Failed to select {:?} in {}", value, selector))?;
    Ok(())
}

/// Numeric value of a currency display string ("$29.99" -> 29.99).
pub fn parse_price(display: &str) -> Option<f64> {
    static PRICE_RE: OnceLock<Regex> = OnceLock::new();
    let re = PRICE_RE.get_or_init(|| Regex::new(r"\d+(?:\.\d+)?").expect("price regex compiles"));
    re.find(display).and_then(|m| m.as_str().parse().ok())
}

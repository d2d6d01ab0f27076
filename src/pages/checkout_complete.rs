//! Checkout complete screen.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use super::{element_text, goto, PageHandle, PageObject, APP_TITLE};
use crate::config::Config;
use crate::pages::products::ProductsPage;

/// Literal phrases the completion screen shows for a successful order.
pub const THANK_YOU_PHRASE: &str = "Thank you for your order";
pub const DISPATCH_PHRASE: &str = "Your order has been dispatched";

#[derive(Debug, Clone)]
struct Locators {
    complete_header: &'static str,
    complete_text: &'static str,
}

impl Default for Locators {
    fn default() -> Self {
        Self {
            complete_header: ".complete-header",
            complete_text: ".complete-text",
        }
    }
}

pub struct CheckoutCompletePage {
    page: PageHandle,
    config: Arc<Config>,
    locators: Locators,
}

impl CheckoutCompletePage {
    pub const URL_FRAGMENT: &'static str = "checkout-complete.html";

    pub fn new(page: PageHandle, config: Arc<Config>) -> Self {
        Self {
            page,
            config,
            locators: Locators::default(),
        }
    }

    pub async fn complete_header(&self) -> String {
        element_text(&self.page, self.locators.complete_header).await
    }

    pub async fn complete_text(&self) -> String {
        element_text(&self.page, self.locators.complete_text).await
    }

    /// Both completion phrases must be present.
    pub async fn verify_order_completion(&self) -> bool {
        self.complete_header().await.contains(THANK_YOU_PHRASE)
            && self.complete_text().await.contains(DISPATCH_PHRASE)
    }

    /// Menu traversal is unreliable on this screen; navigate straight to the
    /// inventory URL instead.
    pub async fn back_to_products(self) -> Result<ProductsPage> {
        let url = self.config.url_for("/inventory.html");
        goto(&self.page, &url, self.config.settings.timeout_ms).await?;
        Ok(ProductsPage::new(self.page, self.config))
    }
}

#[async_trait]
impl PageObject for CheckoutCompletePage {
    fn url_fragment(&self) -> &'static str {
        Self::URL_FRAGMENT
    }

    fn expected_title(&self) -> &'static str {
        APP_TITLE
    }

    fn handle(&self) -> &PageHandle {
        &self.page
    }
}

//! Checkout step two: read-only order overview.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use super::{
    click, count_elements, element_text, element_texts, wait_for_url_contains, PageHandle,
    PageObject, APP_TITLE,
};
use crate::config::Config;
use crate::pages::checkout_complete::CheckoutCompletePage;
use crate::pages::products::ProductsPage;

#[derive(Debug, Clone)]
struct Locators {
    cart_item: &'static str,
    item_name: &'static str,
    item_price: &'static str,
    subtotal_label: &'static str,
    tax_label: &'static str,
    total_label: &'static str,
    finish_button: &'static str,
    cancel_button: &'static str,
}

impl Default for Locators {
    fn default() -> Self {
        Self {
            cart_item: ".cart_item",
            item_name: ".inventory_item_name",
            item_price: ".inventory_item_price",
            subtotal_label: ".summary_subtotal_label",
            tax_label: ".summary_tax_label",
            total_label: ".summary_total_label",
            finish_button: "#finish",
            cancel_button: "#cancel",
        }
    }
}

pub struct CheckoutStepTwoPage {
    page: PageHandle,
    config: Arc<Config>,
    locators: Locators,
}

impl CheckoutStepTwoPage {
    pub const URL_FRAGMENT: &'static str = "checkout-step-two.html";

    pub fn new(page: PageHandle, config: Arc<Config>) -> Self {
        Self {
            page,
            config,
            locators: Locators::default(),
        }
    }

    pub async fn item_names(&self) -> Vec<String> {
        element_texts(&self.page, self.locators.item_name).await
    }

    pub async fn item_prices(&self) -> Vec<String> {
        element_texts(&self.page, self.locators.item_price).await
    }

    pub async fn item_count(&self) -> usize {
        count_elements(&self.page, self.locators.cart_item).await
    }

    /// Currency-formatted display string, e.g. "Item total: $29.99".
    pub async fn subtotal(&self) -> String {
        element_text(&self.page, self.locators.subtotal_label).await
    }

    pub async fn tax(&self) -> String {
        element_text(&self.page, self.locators.tax_label).await
    }

    pub async fn total(&self) -> String {
        element_text(&self.page, self.locators.total_label).await
    }

    pub async fn finish(self) -> Result<CheckoutCompletePage> {
        click(&self.page, self.locators.finish_button).await?;
        wait_for_url_contains(
            &self.page,
            CheckoutCompletePage::URL_FRAGMENT,
            self.config.settings.timeout_ms,
        )
        .await?;
        Ok(CheckoutCompletePage::new(self.page, self.config))
    }

    pub async fn cancel(self) -> Result<ProductsPage> {
        click(&self.page, self.locators.cancel_button).await?;
        wait_for_url_contains(
            &self.page,
            ProductsPage::URL_FRAGMENT,
            self.config.settings.timeout_ms,
        )
        .await?;
        Ok(ProductsPage::new(self.page, self.config))
    }
}

#[async_trait]
impl PageObject for CheckoutStepTwoPage {
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

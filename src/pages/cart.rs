//! Cart screen.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::{
    click, count_elements, element_texts, is_visible, wait_for_url_contains, PageHandle,
    PageObject, APP_TITLE,
};
use crate::config::Config;
use crate::pages::checkout_step_one::CheckoutStepOnePage;
use crate::pages::products::ProductsPage;

#[derive(Debug, Clone)]
struct Locators {
    cart_list: &'static str,
    cart_item: &'static str,
    item_name: &'static str,
    item_price: &'static str,
    remove_buttons: &'static str,
    continue_shopping_button: &'static str,
    checkout_button: &'static str,
}

impl Default for Locators {
    fn default() -> Self {
        Self {
            cart_list: ".cart_list",
            cart_item: ".cart_item",
            item_name: ".inventory_item_name",
            item_price: ".inventory_item_price",
            remove_buttons: ".cart_item button.cart_button",
            continue_shopping_button: "#continue-shopping",
            checkout_button: "#checkout",
        }
    }
}

pub struct CartPage {
    page: PageHandle,
    config: Arc<Config>,
    locators: Locators,
}

impl CartPage {
    pub const URL_FRAGMENT: &'static str = "cart.html";

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

    pub async fn is_cart_empty(&self) -> bool {
        self.item_count().await == 0
    }

    pub async fn is_cart_page_displayed(&self) -> bool {
        is_visible(&self.page, self.locators.cart_list).await
    }

    /// Remove the row whose name matches `name`.
    pub async fn remove_item(&self, name: &str) -> Result<()> {
        log::info!("Removing {:?} from cart page", name);
        let selector = format!(".cart_item:has-text(\"{}\") button.cart_button", name);
        click(&self.page, &selector).await
    }

    /// Empty the cart. Clicks run back to front so earlier rows keep their
    /// position while later ones disappear; a no-op on an empty cart.
    pub async fn remove_all_items(&self) -> Result<()> {
        let buttons = {
            let page = self.page.lock().await;
            page.query_selector_all(self.locators.remove_buttons)
                .await
                .context("Failed to query cart remove controls")?
        };
        log::info!("Removing all {} cart item(s)", buttons.len());
        for button in buttons.iter().rev() {
            button
                .click_builder()
                .click()
                .await
                .context("Failed to click cart remove control")?;
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        Ok(())
    }

    pub async fn continue_shopping(self) -> Result<ProductsPage> {
        click(&self.page, self.locators.continue_shopping_button).await?;
        wait_for_url_contains(
            &self.page,
            ProductsPage::URL_FRAGMENT,
            self.config.settings.timeout_ms,
        )
        .await?;
        Ok(ProductsPage::new(self.page, self.config))
    }

    pub async fn proceed_to_checkout(self) -> Result<CheckoutStepOnePage> {
        click(&self.page, self.locators.checkout_button).await?;
        wait_for_url_contains(
            &self.page,
            CheckoutStepOnePage::URL_FRAGMENT,
            self.config.settings.timeout_ms,
        )
        .await?;
        Ok(CheckoutStepOnePage::new(self.page, self.config))
    }
}

#[async_trait]
impl PageObject for CartPage {
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

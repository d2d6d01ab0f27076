//! Checkout step one: customer information form.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use super::{
    click, element_text, fill, is_visible, wait_for_selector, wait_for_url_contains, PageHandle,
    PageObject, APP_TITLE,
};
use crate::config::Config;
use crate::data::CustomerInfo;
use crate::pages::cart::CartPage;
use crate::pages::checkout_step_two::CheckoutStepTwoPage;

#[derive(Debug, Clone)]
struct Locators {
    first_name_input: &'static str,
    last_name_input: &'static str,
    postal_code_input: &'static str,
    continue_button: &'static str,
    cancel_button: &'static str,
    error_message: &'static str,
}

impl Default for Locators {
    fn default() -> Self {
        Self {
            first_name_input: "#first-name",
            last_name_input: "#last-name",
            postal_code_input: "#postal-code",
            continue_button: "#continue",
            cancel_button: "#cancel",
            error_message: "[data-test=\"error\"]",
        }
    }
}

pub struct CheckoutStepOnePage {
    page: PageHandle,
    config: Arc<Config>,
    locators: Locators,
}

impl CheckoutStepOnePage {
    pub const URL_FRAGMENT: &'static str = "checkout-step-one.html";

    pub fn new(page: PageHandle, config: Arc<Config>) -> Self {
        Self {
            page,
            config,
            locators: Locators::default(),
        }
    }

    pub async fn fill_checkout_form(&self, customer: &CustomerInfo) -> Result<()> {
        log::info!(
            "Filling checkout form for {} {}",
            customer.first_name,
            customer.last_name
        );
        fill(&self.page, self.locators.first_name_input, &customer.first_name).await?;
        fill(&self.page, self.locators.last_name_input, &customer.last_name).await?;
        fill(&self.page, self.locators.postal_code_input, &customer.postal_code).await?;
        Ok(())
    }

    /// Advance to the overview screen. Valid once the required fields are
    /// filled in; with an incomplete form the application stays here and the
    /// navigation wait times out.
    pub async fn continue_to_step_two(self) -> Result<CheckoutStepTwoPage> {
        click(&self.page, self.locators.continue_button).await?;
        wait_for_url_contains(
            &self.page,
            CheckoutStepTwoPage::URL_FRAGMENT,
            self.config.settings.timeout_ms,
        )
        .await?;
        Ok(CheckoutStepTwoPage::new(self.page, self.config))
    }

    /// Submit the form as-is to drive the validation-error path; waits for
    /// the error banner and stays on this screen.
    pub async fn continue_with_empty_form(self) -> Result<CheckoutStepOnePage> {
        click(&self.page, self.locators.continue_button).await?;
        wait_for_selector(
            &self.page,
            self.locators.error_message,
            self.config.settings.timeout_ms,
        )
        .await?;
        Ok(self)
    }

    pub async fn cancel(self) -> Result<CartPage> {
        click(&self.page, self.locators.cancel_button).await?;
        wait_for_url_contains(
            &self.page,
            CartPage::URL_FRAGMENT,
            self.config.settings.timeout_ms,
        )
        .await?;
        Ok(CartPage::new(self.page, self.config))
    }

    pub async fn is_error_message_displayed(&self) -> bool {
        is_visible(&self.page, self.locators.error_message).await
    }

    pub async fn error_message(&self) -> String {
        element_text(&self.page, self.locators.error_message).await
    }
}

#[async_trait]
impl PageObject for CheckoutStepOnePage {
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

//! Landing screen with the sign-in form.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use super::{
    click, current_path, current_title, fill, is_landing_path, is_visible, wait_for_selector,
    wait_for_url_contains, PageHandle, PageObject, APP_TITLE,
};
use crate::config::{Config, Credentials};
use crate::pages::products::ProductsPage;

#[derive(Debug, Clone)]
struct Locators {
    username_input: &'static str,
    password_input: &'static str,
    login_button: &'static str,
    error_message: &'static str,
}

impl Default for Locators {
    fn default() -> Self {
        Self {
            username_input: "#user-name",
            password_input: "#password",
            login_button: "#login-button",
            error_message: "[data-test=\"error\"]",
        }
    }
}

pub struct LoginPage {
    page: PageHandle,
    config: Arc<Config>,
    locators: Locators,
}

impl LoginPage {
    pub const URL_FRAGMENT: &'static str = "index.html";

    pub fn new(page: PageHandle, config: Arc<Config>) -> Self {
        Self {
            page,
            config,
            locators: Locators::default(),
        }
    }

    /// Sign in and land on the inventory screen.
    pub async fn login(self, credentials: &Credentials) -> Result<ProductsPage> {
        log::info!("Logging in as {}", credentials.username);
        fill(&self.page, self.locators.username_input, &credentials.username).await?;
        fill(&self.page, self.locators.password_input, &credentials.password).await?;
        click(&self.page, self.locators.login_button).await?;
        wait_for_url_contains(
            &self.page,
            ProductsPage::URL_FRAGMENT,
            self.config.settings.timeout_ms,
        )
        .await?;
        Ok(ProductsPage::new(self.page, self.config))
    }

    /// Same fill and click, but the application is expected to reject the
    /// credentials: waits for the error banner instead of navigation and
    /// stays on this screen.
    pub async fn login_expecting_error(self, credentials: &Credentials) -> Result<LoginPage> {
        log::info!("Attempting rejected login as {:?}", credentials.username);
        fill(&self.page, self.locators.username_input, &credentials.username).await?;
        fill(&self.page, self.locators.password_input, &credentials.password).await?;
        click(&self.page, self.locators.login_button).await?;
        wait_for_selector(
            &self.page,
            self.locators.error_message,
            self.config.settings.timeout_ms,
        )
        .await?;
        Ok(self)
    }

    pub async fn is_error_message_displayed(&self) -> bool {
        is_visible(&self.page, self.locators.error_message).await
    }

    /// Text of the error banner. Meaningful after a visibility check.
    pub async fn error_message(&self) -> String {
        super::element_text(&self.page, self.locators.error_message).await
    }

    pub async fn clear_form(&self) -> Result<()> {
        fill(&self.page, self.locators.username_input, "").await?;
        fill(&self.page, self.locators.password_input, "").await?;
        Ok(())
    }
}

#[async_trait]
impl PageObject for LoginPage {
    fn url_fragment(&self) -> &'static str {
        Self::URL_FRAGMENT
    }

    fn expected_title(&self) -> &'static str {
        APP_TITLE
    }

    fn handle(&self) -> &PageHandle {
        &self.page
    }

    // The landing screen is served both as "/" and as "/index.html".
    async fn is_on_page(&self) -> bool {
        let path = current_path(&self.page).await.unwrap_or_default();
        let title = current_title(&self.page).await.unwrap_or_default();
        is_landing_path(&path) && title == self.expected_title()
    }
}

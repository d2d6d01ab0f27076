//! Inventory screen: product listing, sorting, cart controls, side menu and
//! footer checks.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Datelike, Local};
use regex::Regex;
use std::sync::Arc;
use std::sync::OnceLock;
use std::time::Duration;

use super::{
    click, count_elements, element_text, element_texts, select_by_value, wait_for_landing,
    wait_for_selector, wait_for_url_contains, PageHandle, PageObject, APP_TITLE,
};
use crate::config::Config;
use crate::pages::cart::CartPage;
use crate::pages::login::LoginPage;

/// The closed set of orderings the sort dropdown offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOption {
    NameAscending,
    NameDescending,
    PriceLowToHigh,
    PriceHighToLow,
}

impl SortOption {
    /// Visible label in the dropdown.
    pub fn label(&self) -> &'static str {
        match self {
            SortOption::NameAscending => "Name (A to Z)",
            SortOption::NameDescending => "Name (Z to A)",
            SortOption::PriceLowToHigh => "Price (low to high)",
            SortOption::PriceHighToLow => "Price (high to low)",
        }
    }

    /// Option value attribute in the dropdown.
    pub fn value(&self) -> &'static str {
        match self {
            SortOption::NameAscending => "az",
            SortOption::NameDescending => "za",
            SortOption::PriceLowToHigh => "lohi",
            SortOption::PriceHighToLow => "hilo",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        [
            SortOption::NameAscending,
            SortOption::NameDescending,
            SortOption::PriceLowToHigh,
            SortOption::PriceHighToLow,
        ]
        .into_iter()
        .find(|option| option.label() == label)
    }
}

/// Footer social links the inventory screen carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialNetwork {
    Twitter,
    Facebook,
    LinkedIn,
}

impl SocialNetwork {
    fn selector(&self) -> &'static str {
        match self {
            SocialNetwork::Twitter => ".social_twitter a",
            SocialNetwork::Facebook => ".social_facebook a",
            SocialNetwork::LinkedIn => ".social_linkedin a",
        }
    }
}

#[derive(Debug, Clone)]
struct Locators {
    item_name: &'static str,
    item_price: &'static str,
    cart_badge: &'static str,
    cart_link: &'static str,
    sort_select: &'static str,
    menu_button: &'static str,
    menu_close_button: &'static str,
    logout_link: &'static str,
    reset_link: &'static str,
    footer_copy: &'static str,
}

impl Default for Locators {
    fn default() -> Self {
        Self {
            item_name: ".inventory_item_name",
            item_price: ".inventory_item_price",
            cart_badge: ".shopping_cart_badge",
            cart_link: ".shopping_cart_link",
            sort_select: "[data-test=\"product_sort_container\"]",
            menu_button: "#react-burger-menu-btn",
            menu_close_button: "#react-burger-cross-btn",
            logout_link: "#logout_sidebar_link",
            reset_link: "#reset_sidebar_link",
            footer_copy: ".footer_copy",
        }
    }
}

pub struct ProductsPage {
    page: PageHandle,
    config: Arc<Config>,
    locators: Locators,
}

impl ProductsPage {
    pub const URL_FRAGMENT: &'static str = "inventory.html";

    pub fn new(page: PageHandle, config: Arc<Config>) -> Self {
        Self {
            page,
            config,
            locators: Locators::default(),
        }
    }

    /// Toggle control inside the row whose name matches `name`. The same
    /// button reads "Add to cart" or "Remove" depending on cart membership.
    fn item_button_selector(name: &str) -> String {
        format!(".inventory_item:has-text(\"{}\") button.btn_inventory", name)
    }

    pub async fn add_product_to_cart(&self, name: &str) -> Result<()> {
        log::info!("Adding {:?} to cart", name);
        click(&self.page, &Self::item_button_selector(name)).await
    }

    pub async fn remove_product_from_cart(&self, name: &str) -> Result<()> {
        log::info!("Removing {:?} from cart", name);
        click(&self.page, &Self::item_button_selector(name)).await
    }

    /// Number shown on the cart badge. The badge is absent when the cart is
    /// empty; absence reads as 0.
    pub async fn cart_item_count(&self) -> u32 {
        element_text(&self.page, self.locators.cart_badge)
            .await
            .parse()
            .unwrap_or(0)
    }

    pub async fn product_names(&self) -> Vec<String> {
        element_texts(&self.page, self.locators.item_name).await
    }

    pub async fn product_prices(&self) -> Vec<String> {
        element_texts(&self.page, self.locators.item_price).await
    }

    pub async fn product_count(&self) -> usize {
        count_elements(&self.page, self.locators.item_name).await
    }

    /// Select a sort order and give the list time to re-render before the
    /// caller reads it back.
    pub async fn sort_products(&self, option: SortOption) -> Result<()> {
        log::info!("Sorting products by {:?}", option.label());
        select_by_value(&self.page, self.locators.sort_select, option.value()).await?;
        tokio::time::sleep(Duration::from_millis(self.config.settings.implicit_wait_ms)).await;
        Ok(())
    }

    /// Membership is inferred from the row's toggle label only.
    pub async fn is_product_in_cart(&self, name: &str) -> bool {
        element_text(&self.page, &Self::item_button_selector(name)).await == "Remove"
    }

    /// Side menu "Reset App State". Expected to empty the cart; what happens
    /// to the row toggle labels afterwards differs between application
    /// builds, so callers observe rather than assert that part.
    pub async fn reset_app_state(&self) -> Result<()> {
        log::info!("Resetting application state");
        self.open_menu().await?;
        click(&self.page, self.locators.reset_link).await?;
        self.close_menu().await?;
        Ok(())
    }

    pub async fn logout(self) -> Result<LoginPage> {
        log::info!("Logging out");
        self.open_menu().await?;
        click(&self.page, self.locators.logout_link).await?;
        wait_for_landing(&self.page, self.config.settings.timeout_ms).await?;
        Ok(LoginPage::new(self.page, self.config))
    }

    pub async fn go_to_cart(self) -> Result<CartPage> {
        click(&self.page, self.locators.cart_link).await?;
        wait_for_url_contains(
            &self.page,
            CartPage::URL_FRAGMENT,
            self.config.settings.timeout_ms,
        )
        .await?;
        Ok(CartPage::new(self.page, self.config))
    }

    /// A footer link counts as clickable when it is an anchor or button, or
    /// carries an href or onclick.
    pub async fn is_social_media_link_clickable(&self, network: SocialNetwork) -> bool {
        let js = r#"sel => {
            const el = document.querySelector(sel);
            if (!el) return false;
            const tag = el.tagName.toLowerCase();
            return Boolean(el.getAttribute('href') || el.onclick || tag === 'a' || tag === 'button');
        }"#;
        let page = self.page.lock().await;
        page.evaluate::<_, bool>(js, network.selector())
            .await
            .unwrap_or(false)
    }

    pub async fn footer_copyright_text(&self) -> String {
        element_text(&self.page, self.locators.footer_copy).await
    }

    /// Whether the year printed in the footer lags the current calendar
    /// year. No year in the text reads as not outdated.
    pub async fn is_copyright_year_outdated(&self) -> bool {
        copyright_year_is_outdated(&self.footer_copyright_text().await, Local::now().year())
    }

    async fn open_menu(&self) -> Result<()> {
        click(&self.page, self.locators.menu_button).await?;
        // The menu slides in; the entries exist but are not interactable
        // until the animation settles.
        wait_for_selector(
            &self.page,
            self.locators.reset_link,
            self.config.settings.timeout_ms,
        )
        .await?;
        tokio::time::sleep(Duration::from_millis(self.config.settings.implicit_wait_ms)).await;
        Ok(())
    }

    async fn close_menu(&self) -> Result<()> {
        click(&self.page, self.locators.menu_close_button).await?;
        tokio::time::sleep(Duration::from_millis(self.config.settings.implicit_wait_ms)).await;
        Ok(())
    }
}

#[async_trait]
impl PageObject for ProductsPage {
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

fn copyright_year_is_outdated(text: &str, current_year: i32) -> bool {
    static YEAR_RE: OnceLock<Regex> = OnceLock::new();
    let re = YEAR_RE.get_or_init(|| Regex::new(r"\b(19|20)\d{2}\b").expect("year regex compiles"));
    match re.find(text).and_then(|m| m.as_str().parse::<i32>().ok()) {
        Some(year) => year < current_year,
        None => false,
    }
}

//! Checkout form validation and the order overview.

use anyhow::Result;
use async_trait::async_trait;

use super::{check, check_eq, Outcome, Scenario};
use crate::data::CustomerInfo;
use crate::harness::TestContext;
use crate::pages::{CheckoutStepOnePage, PageObject};

async fn checkout_with_one_product(
    ctx: &TestContext<'_>,
) -> Result<(String, CheckoutStepOnePage)> {
    let name = ctx
        .data
        .products()
        .first()
        .map(|p| p.name.clone())
        .ok_or_else(|| anyhow::anyhow!("fixture catalogue is empty"))?;
    let products = ctx.login("StandardUser").await?;
    products.add_product_to_cart(&name).await?;
    let cart = products.go_to_cart().await?;
    Ok((name, cart.proceed_to_checkout().await?))
}

pub struct CheckoutValidatesRequiredFields;

#[async_trait]
impl Scenario for CheckoutValidatesRequiredFields {
    fn name(&self) -> &'static str {
        "checkout_validates_required_fields"
    }

    fn category(&self) -> &'static str {
        "checkout"
    }

    async fn run(&self, ctx: &TestContext<'_>) -> Result<Outcome> {
        let (_, step_one) = checkout_with_one_product(ctx).await?;

        // Each submit leaves the form on this screen with the next missing
        // field called out; fields filled so far are retained.
        let step_one = step_one.continue_with_empty_form().await?;
        check(step_one.is_error_message_displayed().await, "validation error shown")?;
        check_eq(
            step_one.error_message().await,
            ctx.data.error_message("firstNameRequired")?.to_string(),
            "first-name validation text",
        )?;
        check(step_one.is_on_page().await, "no advance past step one")?;

        step_one
            .fill_checkout_form(&CustomerInfo {
                first_name: "Ada".to_string(),
                last_name: String::new(),
                postal_code: String::new(),
            })
            .await?;
        let step_one = step_one.continue_with_empty_form().await?;
        check_eq(
            step_one.error_message().await,
            ctx.data.error_message("lastNameRequired")?.to_string(),
            "last-name validation text",
        )?;

        step_one
            .fill_checkout_form(&CustomerInfo {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                postal_code: String::new(),
            })
            .await?;
        let step_one = step_one.continue_with_empty_form().await?;
        check_eq(
            step_one.error_message().await,
            ctx.data.error_message("postalCodeRequired")?.to_string(),
            "postal-code validation text",
        )?;
        check(step_one.is_on_page().await, "still on step one after all rejects")?;
        Ok(Outcome::Passed)
    }
}

pub struct CancelCheckoutReturnsToCart;

#[async_trait]
impl Scenario for CancelCheckoutReturnsToCart {
    fn name(&self) -> &'static str {
        "cancel_checkout_returns_to_cart"
    }

    fn category(&self) -> &'static str {
        "checkout"
    }

    async fn run(&self, ctx: &TestContext<'_>) -> Result<Outcome> {
        let (name, step_one) = checkout_with_one_product(ctx).await?;
        let cart = step_one.cancel().await?;
        check(cart.is_cart_page_displayed().await, "back on the cart screen")?;
        check(
            cart.item_names().await.contains(&name),
            "cart still holds the product after cancel",
        )?;
        Ok(Outcome::Passed)
    }
}

pub struct CheckoutOverviewShowsTotals;

#[async_trait]
impl Scenario for CheckoutOverviewShowsTotals {
    fn name(&self) -> &'static str {
        "checkout_overview_shows_totals"
    }

    fn category(&self) -> &'static str {
        "checkout"
    }

    async fn run(&self, ctx: &TestContext<'_>) -> Result<Outcome> {
        let (name, step_one) = checkout_with_one_product(ctx).await?;
        let customer = ctx.data.random_customer()?;
        step_one.fill_checkout_form(&customer).await?;
        let step_two = step_one.continue_to_step_two().await?;

        check(step_two.is_on_page().await, "overview screen displayed")?;
        check_eq(step_two.item_count().await, 1, "overview row count")?;
        check(
            step_two.item_names().await.contains(&name),
            "overview lists the product",
        )?;
        check(!step_two.subtotal().await.is_empty(), "subtotal is shown")?;
        check(!step_two.tax().await.is_empty(), "tax is shown")?;
        check(!step_two.total().await.is_empty(), "total is shown")?;

        // Backing out of the overview returns to the inventory screen.
        let products = step_two.cancel().await?;
        check(products.is_on_page().await, "cancel lands on the inventory screen")?;
        Ok(Outcome::Passed)
    }
}

//! Full purchase journeys.

use anyhow::Result;
use async_trait::async_trait;

use super::{check, check_eq, Outcome, Scenario};
use crate::harness::TestContext;
use crate::pages::PageObject;

pub struct CompletePurchase;

#[async_trait]
impl Scenario for CompletePurchase {
    fn name(&self) -> &'static str {
        "complete_purchase"
    }

    fn category(&self) -> &'static str {
        "end_to_end"
    }

    async fn run(&self, ctx: &TestContext<'_>) -> Result<Outcome> {
        let name = ctx
            .data
            .products()
            .first()
            .map(|p| p.name.clone())
            .ok_or_else(|| anyhow::anyhow!("fixture catalogue is empty"))?;

        let products = ctx.login("StandardUser").await?;
        products.add_product_to_cart(&name).await?;
        check_eq(products.cart_item_count().await, 1, "badge after add")?;

        let cart = products.go_to_cart().await?;
        check_eq(cart.item_count().await, 1, "cart row count")?;
        check(
            cart.item_names().await.contains(&name),
            "cart lists the product",
        )?;

        let step_one = cart.proceed_to_checkout().await?;
        let customer = ctx.data.random_customer()?;
        step_one.fill_checkout_form(&customer).await?;

        let step_two = step_one.continue_to_step_two().await?;
        check_eq(step_two.item_count().await, 1, "overview row count")?;
        check(
            step_two.item_names().await.contains(&name),
            "overview lists the product",
        )?;
        check(!step_two.subtotal().await.is_empty(), "subtotal is shown")?;
        check(!step_two.tax().await.is_empty(), "tax is shown")?;
        check(!step_two.total().await.is_empty(), "total is shown")?;

        let complete = step_two.finish().await?;
        check(
            complete.verify_order_completion().await,
            "completion screen shows the thank-you and dispatch phrases",
        )?;

        let products = complete.back_to_products().await?;
        check(products.is_on_page().await, "back on the inventory screen")?;

        let login = products.logout().await?;
        check(login.is_on_page().await, "back on the login screen")?;
        Ok(Outcome::Passed)
    }
}

pub struct CompletePurchaseViaConvenienceFlow;

#[async_trait]
impl Scenario for CompletePurchaseViaConvenienceFlow {
    fn name(&self) -> &'static str {
        "complete_purchase_via_convenience_flow"
    }

    fn category(&self) -> &'static str {
        "end_to_end"
    }

    async fn run(&self, ctx: &TestContext<'_>) -> Result<Outcome> {
        let name = ctx
            .data
            .products()
            .last()
            .map(|p| p.name.clone())
            .ok_or_else(|| anyhow::anyhow!("fixture catalogue is empty"))?;
        let complete = ctx.complete_checkout("StandardUser", &name).await?;
        check(
            complete.verify_order_completion().await,
            "completion screen shows the thank-you and dispatch phrases",
        )?;
        check(!complete.complete_header().await.is_empty(), "header is shown")?;
        Ok(Outcome::Passed)
    }
}

pub struct BrowseAsProblemUser;

#[async_trait]
impl Scenario for BrowseAsProblemUser {
    fn name(&self) -> &'static str {
        "browse_as_problem_user"
    }

    fn category(&self) -> &'static str {
        "end_to_end"
    }

    async fn run(&self, ctx: &TestContext<'_>) -> Result<Outcome> {
        if ctx.config.credentials("ProblemUser").is_err() {
            return Ok(Outcome::Skipped(
                "no ProblemUser credentials configured".to_string(),
            ));
        }
        let name = ctx
            .data
            .products()
            .first()
            .map(|p| p.name.clone())
            .ok_or_else(|| anyhow::anyhow!("fixture catalogue is empty"))?;

        let products = ctx.login("ProblemUser").await?;
        check(products.is_on_page().await, "problem user reaches the inventory")?;
        products.add_product_to_cart(&name).await?;
        check(
            products.cart_item_count().await >= 1,
            "problem user can add to cart",
        )?;
        Ok(Outcome::Passed)
    }
}

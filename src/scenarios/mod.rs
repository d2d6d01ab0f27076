//! Test scenarios
//!
//! Each scenario is a small struct implementing [`Scenario`]; the registry
//! in [`all_scenarios`] is what the CLI filters and runs. Assertion failures
//! surface as errors carrying both expected and actual values; outcomes that
//! are not a plain pass/fail (known application defects, unmet
//! preconditions) are reported through [`Outcome`].

mod checkout_tests;
mod end_to_end;
mod login_tests;

use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;

use crate::harness::TestContext;

/// Outcome of a scenario that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    /// Completed, but the checked behavior is a known application defect
    /// whose expected state differs between environments; the note records
    /// what was observed.
    Inconclusive(String),
    /// Preconditions not met, e.g. a user type absent from the config.
    Skipped(String),
}

#[async_trait]
pub trait Scenario: Send + Sync {
    fn name(&self) -> &'static str;
    fn category(&self) -> &'static str;
    async fn run(&self, ctx: &TestContext<'_>) -> Result<Outcome>;
}

/// Every registered scenario, in execution order.
pub fn all_scenarios() -> Vec<Box<dyn Scenario>> {
    vec![
        Box::new(login_tests::LoginWithStandardUser),
        Box::new(login_tests::LoginWithLockedOutUser),
        Box::new(login_tests::LoginWithMismatchedCredentials),
        Box::new(login_tests::LoginWithEmptyUsername),
        Box::new(login_tests::LoginWithEmptyPassword),
        Box::new(products_tests::SortProductsByName),
        Box::new(products_tests::SortProductsByPrice),
        Box::new(products_tests::AddProductsUpdatesCartBadge),
        Box::new(products_tests::RemoveProductFromInventory),
        Box::new(products_tests::ResetAppStateClearsCart),
        Box::new(products_tests::LogoutReturnsToLogin),
        Box::new(products_tests::FooterSocialLinksAreClickable),
        Box::new(products_tests::FooterCopyrightYearIsCurrent),
        Box::new(cart_tests::CartListsAddedProducts),
        Box::new(cart_tests::RemoveItemFromCart),
        Box::new(cart_tests::RemoveAllItemsFromCart),
        Box::new(cart_tests::ContinueShoppingReturnsToInventory),
        Box::new(checkout_tests::CheckoutValidatesRequiredFields),
        Box::new(checkout_tests::CancelCheckoutReturnsToCart),
        Box::new(checkout_tests::CheckoutOverviewShowsTotals),
        Box::new(end_to_end::CompletePurchase),
        Box::new(end_to_end::CompletePurchaseViaConvenienceFlow),
        Box::new(end_to_end::BrowseAsProblemUser),
    ]
}

/// Fail with a description when a condition does not hold.
pub(crate) fn check(condition: bool, description: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        anyhow::bail!("Assertion failed: {}", description)
    }
}

/// Fail with both values when actual differs from expected.
pub(crate) fn check_eq<T: PartialEq + Debug>(actual: T, expected: T, what: &str) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        anyhow::bail!("{}: expected {:?}, got {:?}", what, expected, actual)
    }
}

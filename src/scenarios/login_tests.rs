//! Login flows, positive and negative. The negative paths assert the
//! application's literal error strings as recorded in the fixture file.

use anyhow::Result;
use async_trait::async_trait;

use super::{check, check_eq, Outcome, Scenario};
use crate::config::Credentials;
use crate::harness::TestContext;
use crate::pages::PageObject;

pub struct LoginWithStandardUser;

#[async_trait]
impl Scenario for LoginWithStandardUser {
    fn name(&self) -> &'static str {
        "login_with_standard_user"
    }

    fn category(&self) -> &'static str {
        "login"
    }

    async fn run(&self, ctx: &TestContext<'_>) -> Result<Outcome> {
        let products = ctx.login("StandardUser").await?;
        check(products.is_on_page().await, "inventory page displayed after login")?;
        check(
            !products.product_names().await.is_empty(),
            "inventory list is populated after login",
        )?;
        Ok(Outcome::Passed)
    }
}

pub struct LoginWithLockedOutUser;

#[async_trait]
impl Scenario for LoginWithLockedOutUser {
    fn name(&self) -> &'static str {
        "login_with_locked_out_user"
    }

    fn category(&self) -> &'static str {
        "login"
    }

    async fn run(&self, ctx: &TestContext<'_>) -> Result<Outcome> {
        let credentials = match ctx.config.credentials("LockedOutUser") {
            Ok(credentials) => credentials.clone(),
            Err(_) => {
                return Ok(Outcome::Skipped(
                    "no LockedOutUser credentials configured".to_string(),
                ))
            }
        };
        let login = ctx
            .landing_page()?
            .login_expecting_error(&credentials)
            .await?;
        check(login.is_error_message_displayed().await, "error banner displayed")?;
        check_eq(
            login.error_message().await,
            ctx.data.error_message("lockedOutUser")?.to_string(),
            "locked-out error text",
        )?;
        check(login.is_on_page().await, "still on the login screen")?;
        Ok(Outcome::Passed)
    }
}

pub struct LoginWithMismatchedCredentials;

#[async_trait]
impl Scenario for LoginWithMismatchedCredentials {
    fn name(&self) -> &'static str {
        "login_with_mismatched_credentials"
    }

    fn category(&self) -> &'static str {
        "login"
    }

    async fn run(&self, ctx: &TestContext<'_>) -> Result<Outcome> {
        let credentials = Credentials::new("no_such_user", "wrong_password");
        let login = ctx
            .landing_page()?
            .login_expecting_error(&credentials)
            .await?;
        check_eq(
            login.error_message().await,
            ctx.data.error_message("invalidCredentials")?.to_string(),
            "mismatched-credentials error text",
        )?;
        check(login.is_on_page().await, "still on the login screen")?;
        Ok(Outcome::Passed)
    }
}

pub struct LoginWithEmptyUsername;

#[async_trait]
impl Scenario for LoginWithEmptyUsername {
    fn name(&self) -> &'static str {
        "login_with_empty_username"
    }

    fn category(&self) -> &'static str {
        "login"
    }

    async fn run(&self, ctx: &TestContext<'_>) -> Result<Outcome> {
        let login = ctx.landing_page()?;
        // Start from a dirty form to exercise the clear path as well.
        login
            .login_expecting_error(&Credentials::new("", "secret_sauce"))
            .await?
            .clear_form()
            .await?;

        let login = ctx
            .landing_page()?
            .login_expecting_error(&Credentials::new("", ""))
            .await?;
        check_eq(
            login.error_message().await,
            ctx.data.error_message("usernameRequired")?.to_string(),
            "empty-username error text",
        )?;
        Ok(Outcome::Passed)
    }
}

pub struct LoginWithEmptyPassword;

#[async_trait]
impl Scenario for LoginWithEmptyPassword {
    fn name(&self) -> &'static str {
        "login_with_empty_password"
    }

    fn category(&self) -> &'static str {
        "login"
    }

    async fn run(&self, ctx: &TestContext<'_>) -> Result<Outcome> {
        let username = ctx.config.credentials("StandardUser")?.username.clone();
        let login = ctx
            .landing_page()?
            .login_expecting_error(&Credentials::new(&username, ""))
            .await?;
        check_eq(
            login.error_message().await,
            ctx.data.error_message("passwordRequired")?.to_string(),
            "empty-password error text",
        )?;
        check(login.is_on_page().await, "still on the login screen")?;
        Ok(Outcome::Passed)
    }
}

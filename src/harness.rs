//! Suite and per-test lifecycle
//!
//! The suite owns the long-lived collaborators (config, fixture data, report
//! collector). Every scenario gets a fresh browser session navigated to the
//! application's base URL, and a context exposing the landing page object
//! plus the common orchestrations. Teardown always closes the session and
//! always records a result, whatever happened before.

use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::config::Config;
use crate::data::TestData;
use crate::pages::{CheckoutCompletePage, LoginPage, ProductsPage};
use crate::report::{ReportCollector, RunResults, TestResult, TestStatus};
use crate::scenarios::{Outcome, Scenario};
use crate::session::BrowserSession;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// What a running scenario gets to work with.
pub struct TestContext<'a> {
    pub config: Arc<Config>,
    pub data: Arc<TestData>,
    pub session: &'a BrowserSession,
}

impl TestContext<'_> {
    /// Page object for the screen the session starts on.
    pub fn landing_page(&self) -> Result<LoginPage> {
        Ok(LoginPage::new(self.session.page()?, self.config.clone()))
    }

    /// Look up credentials for a named user type and drive the login flow.
    pub async fn login(&self, user_type: &str) -> Result<ProductsPage> {
        let credentials = self.config.credentials(user_type)?.clone();
        self.landing_page()?.login(&credentials).await
    }

    /// Full purchase chain: login, add the product, open the cart, check
    /// out with a random fixture customer, finish the order.
    pub async fn complete_checkout(
        &self,
        user_type: &str,
        product_name: &str,
    ) -> Result<CheckoutCompletePage> {
        let products = self.login(user_type).await?;
        products.add_product_to_cart(product_name).await?;
        let cart = products.go_to_cart().await?;
        let step_one = cart.proceed_to_checkout().await?;
        let customer = self.data.random_customer()?;
        step_one.fill_checkout_form(&customer).await?;
        let step_two = step_one.continue_to_step_two().await?;
        step_two.finish().await
    }
}

pub struct Suite {
    config: Arc<Config>,
    data: Arc<TestData>,
    collector: ReportCollector,
    artifact_dir: PathBuf,
    run_id: String,
}

impl Suite {
    pub fn new(config: Config, data: TestData, artifact_dir: PathBuf) -> Self {
        let run_id = Uuid::new_v4().to_string();
        log::info!(
            "Suite initialized (run {}, base URL {}, browser {})",
            run_id,
            config.settings.base_url,
            config.settings.browser
        );
        Self {
            collector: ReportCollector::new(&run_id),
            config: Arc::new(config),
            data: Arc::new(data),
            artifact_dir,
            run_id,
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn collector(&self) -> &ReportCollector {
        &self.collector
    }

    /// Execute the scenarios in order and return the collected results.
    pub async fn run(&self, scenarios: &[Box<dyn Scenario>]) -> RunResults {
        for scenario in scenarios {
            let spinner = start_spinner(scenario.as_ref());
            let result = self.run_scenario(scenario.as_ref()).await;
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }
            print_result_line(&result);
            self.collector.record(result);
        }
        self.collector.snapshot()
    }

    /// One test: setup, scenario body, failure artifacts, teardown,
    /// unconditional result recording.
    async fn run_scenario(&self, scenario: &dyn Scenario) -> TestResult {
        let started_at = Local::now();
        let stopwatch = Instant::now();
        log::info!("Starting {} [{}]", scenario.name(), scenario.category());

        let mut session =
            BrowserSession::new(self.config.settings.clone(), self.artifact_dir.clone());
        let outcome = self.drive(scenario, &mut session).await;

        let mut screenshot_path = None;
        if outcome.is_err() {
            if self.config.settings.screenshot_on_failure {
                match session.screenshot(scenario.name()).await {
                    Ok(path) => screenshot_path = Some(path.display().to_string()),
                    Err(e) => log::warn!("Could not capture failure screenshot: {:#}", e),
                }
            }
            if self.config.settings.trace_on_failure {
                if let Err(e) = session.save_dom_snapshot(scenario.name()).await {
                    log::warn!("Could not capture failure DOM snapshot: {:#}", e);
                }
            }
        }

        // Close errors are logged inside close(); they never replace the
        // scenario's own outcome.
        session.close().await;

        let (status, error_message) = match outcome {
            Ok(Outcome::Passed) => (TestStatus::Passed, None),
            Ok(Outcome::Inconclusive(note)) => (TestStatus::Inconclusive, Some(note)),
            Ok(Outcome::Skipped(reason)) => (TestStatus::Skipped, Some(reason)),
            Err(e) => (TestStatus::Failed, Some(format!("{:#}", e))),
        };

        TestResult {
            test_name: scenario.name().to_string(),
            category: scenario.category().to_string(),
            status,
            browser: self.config.settings.browser.to_string(),
            start_time: started_at.format(TIME_FORMAT).to_string(),
            end_time: Local::now().format(TIME_FORMAT).to_string(),
            duration_seconds: stopwatch.elapsed().as_secs_f64(),
            error_message,
            screenshot_path,
        }
    }

    async fn drive(
        &self,
        scenario: &dyn Scenario,
        session: &mut BrowserSession,
    ) -> Result<Outcome> {
        session.initialize().await?;
        session.navigate_to(&self.config.url_for("/")).await?;
        let ctx = TestContext {
            config: self.config.clone(),
            data: self.data.clone(),
            session,
        };
        scenario.run(&ctx).await
    }
}

fn start_spinner(scenario: &dyn Scenario) -> Option<ProgressBar> {
    if !std::io::stdout().is_terminal() {
        return None;
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template("  {spinner} {msg}")
            .unwrap(),
    );
    spinner.set_message(format!("{} [{}]", scenario.name(), scenario.category()));
    spinner.enable_steady_tick(Duration::from_millis(100));
    Some(spinner)
}

fn print_result_line(result: &TestResult) {
    match result.status {
        TestStatus::Passed => println!(
            "  {} {} ({:.2}s)",
            "✔".green(),
            result.test_name,
            result.duration_seconds
        ),
        TestStatus::Failed => {
            println!(
                "  {} {} ({:.2}s)",
                "✘".red().bold(),
                result.test_name,
                result.duration_seconds
            );
            if let Some(ref message) = result.error_message {
                println!("      {}", message.red());
            }
        }
        TestStatus::Skipped => println!(
            "  {} {} ({})",
            "↷".yellow(),
            result.test_name,
            result
                .error_message
                .as_deref()
                .unwrap_or("skipped")
                .dimmed()
        ),
        TestStatus::Inconclusive => {
            println!(
                "  {} {} ({:.2}s)",
                "?".yellow().bold(),
                result.test_name,
                result.duration_seconds
            );
            if let Some(ref note) = result.error_message {
                println!("      {}", note.yellow());
            }
        }
    }
}

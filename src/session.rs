//! Browser session management
//!
//! One session owns one browser process, one context and one page for the
//! duration of a single test. The lifecycle is a small state machine:
//! Uninitialized -> Initializing -> Ready -> Closed. Operations that need a
//! live page are only valid in Ready.

use anyhow::{Context, Result};
use chrono::Local;
use playwright::api::browser_type::RecordVideo;
use playwright::api::{Browser, BrowserContext, DocumentLoadState, Page, Viewport};
use playwright::Playwright;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::{BrowserKind, Settings};

pub const VIEWPORT_WIDTH: i32 = 1280;
pub const VIEWPORT_HEIGHT: i32 = 720;

/// Shared handle to the live page. Page objects hold clones of this.
pub type PageHandle = Arc<Mutex<Page>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Initializing,
    Ready,
    Closed,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("browser session is {actual:?}, expected {expected:?}")]
    InvalidState {
        expected: SessionState,
        actual: SessionState,
    },
}

pub struct BrowserSession {
    settings: Settings,
    state: SessionState,
    playwright: Option<Playwright>,
    browser: Option<Browser>,
    context: Option<BrowserContext>,
    page: Option<PageHandle>,
    /// Root for screenshots, DOM snapshots and videos of this run.
    artifact_dir: PathBuf,
}

impl BrowserSession {
    pub fn new(settings: Settings, artifact_dir: PathBuf) -> Self {
        Self {
            settings,
            state: SessionState::Uninitialized,
            playwright: None,
            browser: None,
            context: None,
            page: None,
            artifact_dir,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn browser_name(&self) -> String {
        self.settings.browser.to_string()
    }

    pub fn timeout_ms(&self) -> u64 {
        self.settings.timeout_ms
    }

    /// Launch the configured engine, open one context and one page.
    pub async fn initialize(&mut self) -> Result<()> {
        if self.state != SessionState::Uninitialized {
            return Err(SessionError::InvalidState {
                expected: SessionState::Uninitialized,
                actual: self.state,
            }
            .into());
        }
        self.state = SessionState::Initializing;

        let playwright = Playwright::initialize()
            .await
            .context("Failed to initialize Playwright")?;

        let browser_type = match self.settings.browser {
            BrowserKind::Chromium => playwright.chromium(),
            BrowserKind::Firefox => playwright.firefox(),
            BrowserKind::Webkit => playwright.webkit(),
        };

        let mut launcher = browser_type.launcher().headless(self.settings.headless);
        if self.settings.slow_mo_ms > 0 {
            launcher = launcher.slowmo(self.settings.slow_mo_ms as f64);
        }
        let browser = launcher
            .launch()
            .await
            .with_context(|| format!("Failed to launch {}", self.settings.browser))?;

        let context = if self.settings.video_on_failure {
            let video_dir = self.artifact_dir.join("videos");
            std::fs::create_dir_all(&video_dir).ok();
            browser
                .context_builder()
                .record_video(RecordVideo {
                    dir: &video_dir,
                    size: None,
                })
                .build()
                .await
                .context("Failed to create browser context with video recording")?
        } else {
            browser
                .context_builder()
                .build()
                .await
                .context("Failed to create browser context")?
        };

        let page = context.new_page().await.context("Failed to open page")?;
        page.set_viewport_size(Viewport {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
        })
        .await
        .context("Failed to set viewport size")?;

        log::info!(
            "Browser session ready ({}, headless: {})",
            self.settings.browser,
            self.settings.headless
        );

        self.playwright = Some(playwright);
        self.browser = Some(browser);
        self.context = Some(context);
        self.page = Some(Arc::new(Mutex::new(page)));
        self.state = SessionState::Ready;
        Ok(())
    }

    /// Handle to the live page; valid only while Ready.
    pub fn page(&self) -> Result<PageHandle> {
        match (&self.state, &self.page) {
            (SessionState::Ready, Some(page)) => Ok(page.clone()),
            _ => Err(SessionError::InvalidState {
                expected: SessionState::Ready,
                actual: self.state,
            }
            .into()),
        }
    }

    /// Navigate and wait for the network to go idle.
    pub async fn navigate_to(&self, url: &str) -> Result<()> {
        let handle = self.page()?;
        let page = handle.lock().await;
        page.goto_builder(url)
            .wait_until(DocumentLoadState::NetworkIdle)
            .timeout(self.settings.timeout_ms as f64)
            .goto()
            .await
            .with_context(|| format!("Failed to navigate to {}", url))?;
        Ok(())
    }

    /// Capture the current page to a timestamped PNG and return its path.
    pub async fn screenshot(&self, name: &str) -> Result<PathBuf> {
        let handle = self.page()?;
        let dir = self.artifact_dir.join("screenshots");
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create screenshot directory: {}", dir.display()))?;
        let path = dir.join(format!(
            "{}_{}.png",
            sanitize_file_name(name),
            Local::now().format("%Y%m%d_%H%M%S")
        ));
        let page = handle.lock().await;
        page.screenshot_builder()
            .path(path.clone())
            .screenshot()
            .await
            .context("Failed to capture screenshot")?;
        Ok(path)
    }

    /// Failure-time DOM snapshot. The driver binding exposes no trace
    /// archive, so the rendered HTML is saved instead.
    pub async fn save_dom_snapshot(&self, name: &str) -> Result<PathBuf> {
        let handle = self.page()?;
        let dir = self.artifact_dir.join("traces");
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create trace directory: {}", dir.display()))?;
        let path = dir.join(format!(
            "{}_{}.html",
            sanitize_file_name(name),
            Local::now().format("%Y%m%d_%H%M%S")
        ));
        let page = handle.lock().await;
        let html = page.content().await.context("Failed to read page content")?;
        std::fs::write(&path, html)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Tear down page, context, browser and the driver handle. Safe to call
    /// in any state and more than once; close errors are logged rather than
    /// propagated so they cannot mask the test outcome.
    pub async fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        // Page and context go down with the browser; dropping the handles
        // releases our references to them.
        self.page.take();
        self.context.take();
        if let Some(browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                log::warn!("Error while closing browser: {}", e);
            }
        }
        self.playwright.take();
        self.state = SessionState::Closed;
        log::info!("Browser session closed");
    }
}

fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            base_url: "https://shop.example.com".to_string(),
            browser: BrowserKind::Chromium,
            headless: true,
            slow_mo_ms: 0,
            timeout_ms: 5000,
            implicit_wait_ms: 100,
            screenshot_on_failure: true,
            video_on_failure: false,
            trace_on_failure: false,
            random_seed: None,
        }
    }

    #[test]
    fn new_session_starts_uninitialized() {
        let session = BrowserSession::new(settings(), PathBuf::from("./output"));
        assert_eq!(session.state(), SessionState::Uninitialized);
        assert_eq!(session.browser_name(), "chromium");
    }

    #[tokio::test]
    async fn page_access_requires_ready_state() {
        let session = BrowserSession::new(settings(), PathBuf::from("./output"));
        let err = session.page().unwrap_err();
        assert!(err.to_string().contains("Uninitialized"));
    }

    #[tokio::test]
    async fn navigate_requires_ready_state() {
        let session = BrowserSession::new(settings(), PathBuf::from("./output"));
        let err = session
            .navigate_to("https://shop.example.com/")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("expected Ready"));
    }

    #[tokio::test]
    async fn close_is_idempotent_on_partial_initialization() {
        let mut session = BrowserSession::new(settings(), PathBuf::from("./output"));
        session.close().await;
        assert_eq!(session.state(), SessionState::Closed);
        // Second close is a no-op.
        session.close().await;
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(
            sanitize_file_name("login: bad / name"),
            "login__bad___name"
        );
    }
}

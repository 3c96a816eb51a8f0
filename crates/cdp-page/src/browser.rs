//! Chromium-backed [`PagePort`] implementation.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as Base64;
use base64::Engine as _;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::dom::{
    GetDocumentParams, QuerySelectorParams, SetFileInputFilesParams,
};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::Page;
use futures::StreamExt;
use page_port::PagePort;
use serde_json::Value;
use siteflow_core_types::{DriveError, Locator, LocatorStrategy};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::BrowserLaunchConfig;
use crate::js;

const READY_POLL_MS: u64 = 100;

fn backend(err: impl Display) -> DriveError {
    DriveError::Backend(err.to_string())
}

/// Owns the Chromium process and the CDP event loop.
pub struct CdpBrowser {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl CdpBrowser {
    pub async fn launch(config: &BrowserLaunchConfig) -> Result<Self, DriveError> {
        let mut builder =
            BrowserConfig::builder().window_size(config.window_width, config.window_height);
        if !config.headless {
            builder = builder.with_head();
        }
        if config.no_sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(executable) = config.resolve_executable() {
            debug!(executable = %executable.display(), "using browser binary");
            builder = builder.chrome_executable(executable);
        }
        let browser_config = builder.build().map_err(DriveError::Backend)?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(backend)?;
        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });
        info!(headless = config.headless, "browser launched");

        Ok(Self {
            browser,
            handler: handle,
        })
    }

    pub async fn new_page(&self) -> Result<CdpPage, DriveError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(backend)?;
        Ok(CdpPage { page })
    }

    pub async fn close(mut self) -> Result<(), DriveError> {
        self.browser.close().await.map_err(backend)?;
        self.handler.abort();
        Ok(())
    }
}

/// One live page; interactions are JS evaluations that re-resolve the
/// locator on every call and report a `{ status }` object.
pub struct CdpPage {
    page: Page,
}

impl CdpPage {
    async fn eval_value(&self, script: String) -> Result<Value, DriveError> {
        let result = self.page.evaluate(script).await.map_err(backend)?;
        result.into_value::<Value>().map_err(backend)
    }

    async fn eval_number(&self, script: String) -> Result<i64, DriveError> {
        let value = self.eval_value(script).await?;
        Ok(value
            .as_i64()
            .or_else(|| value.as_f64().map(|v| v as i64))
            .unwrap_or(0))
    }

    /// Run a `{ status }` script, mapping `missing` to `NotFound` and any
    /// other non-ok status to `InteractionFailed`.
    async fn eval_status(&self, locator: &Locator, script: String) -> Result<Value, DriveError> {
        let value = self.eval_value(script).await?;
        match value.get("status").and_then(Value::as_str).unwrap_or("unknown") {
            "ok" => Ok(value),
            "missing" => Err(DriveError::NotFound(locator.to_string())),
            other => Err(DriveError::InteractionFailed(format!(
                "{locator}: unexpected status '{other}'"
            ))),
        }
    }

    /// Resolve the locator to a CDP node id. CSS locators resolve directly;
    /// XPath targets are tagged with a temporary marker attribute so the
    /// CSS-only DOM commands can find them.
    async fn node_id_for(
        &self,
        locator: &Locator,
    ) -> Result<chromiumoxide::cdp::browser_protocol::dom::NodeId, DriveError> {
        let selector = match locator.strategy {
            LocatorStrategy::Css => locator.value.clone(),
            LocatorStrategy::XPath => {
                self.eval_status(locator, js::mark_script(locator, "1")).await?;
                format!("[{}]", js::MARKER_ATTR)
            }
        };

        let document = self
            .page
            .execute(GetDocumentParams::default())
            .await
            .map_err(backend)?;
        let root = document.root.node_id.clone();
        let found = self
            .page
            .execute(QuerySelectorParams::new(root, selector))
            .await
            .map_err(backend)?;
        Ok(found.node_id.clone())
    }

    async fn clear_marker(&self, locator: &Locator) {
        if locator.strategy == LocatorStrategy::XPath {
            if let Err(err) = self.eval_value(js::unmark_script(locator)).await {
                debug!(error = %err, "could not clear upload marker");
            }
        }
    }

    /// Capture the current viewport as PNG.
    pub async fn screenshot_to(&self, path: &Path) -> Result<(), DriveError> {
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        let response = self.page.execute(params).await.map_err(backend)?;
        let encoded: &str = response.data.as_ref();
        let bytes = Base64.decode(encoded).map_err(backend)?;
        tokio::fs::write(path, bytes).await.map_err(backend)?;
        info!(path = %path.display(), "screenshot written");
        Ok(())
    }
}

#[async_trait]
impl PagePort for CdpPage {
    async fn navigate(&self, url: &str) -> Result<(), DriveError> {
        self.page.goto(url).await.map_err(backend)?;
        Ok(())
    }

    async fn wait_dom_ready(&self, timeout: Duration) -> Result<(), DriveError> {
        let started = Instant::now();
        loop {
            match self.eval_value(js::ready_state_script()).await {
                Ok(value) => {
                    if matches!(value.as_str(), Some("interactive") | Some("complete")) {
                        return Ok(());
                    }
                }
                // Probes can race the navigation; keep polling until deadline.
                Err(err) => debug!(error = %err, "readyState probe failed"),
            }
            if started.elapsed() >= timeout {
                return Err(DriveError::timed_out(
                    "document ready",
                    timeout.as_millis() as u64,
                ));
            }
            sleep(Duration::from_millis(READY_POLL_MS)).await;
        }
    }

    async fn is_visible(&self, locator: &Locator) -> Result<bool, DriveError> {
        let value = self.eval_value(js::visibility_script(locator)).await?;
        match value.get("status").and_then(Value::as_str) {
            Some("ok") => Ok(value
                .get("visible")
                .and_then(Value::as_bool)
                .unwrap_or(false)),
            // Absent element: report invisible so callers can keep polling.
            _ => Ok(false),
        }
    }

    async fn click(&self, locator: &Locator) -> Result<(), DriveError> {
        self.eval_status(locator, js::click_script(locator)).await?;
        Ok(())
    }

    async fn fill(&self, locator: &Locator, text: &str) -> Result<(), DriveError> {
        self.eval_status(locator, js::fill_script(locator, text)).await?;
        Ok(())
    }

    async fn select_option(&self, locator: &Locator, value: &str) -> Result<(), DriveError> {
        let result = self.eval_value(js::select_script(locator, value)).await?;
        match result.get("status").and_then(Value::as_str).unwrap_or("unknown") {
            "ok" => Ok(()),
            "missing" => Err(DriveError::NotFound(locator.to_string())),
            "not-select" => Err(DriveError::InteractionFailed(format!(
                "{locator} is not a select control"
            ))),
            "option-missing" => Err(DriveError::InteractionFailed(format!(
                "{locator} has no option with value '{value}'"
            ))),
            other => Err(DriveError::InteractionFailed(format!(
                "{locator}: unexpected status '{other}'"
            ))),
        }
    }

    async fn set_files(&self, locator: &Locator, paths: &[PathBuf]) -> Result<(), DriveError> {
        let node_id = self.node_id_for(locator).await?;
        let files: Vec<String> = paths
            .iter()
            .map(|path| path.to_string_lossy().into_owned())
            .collect();

        let result = self
            .page
            .execute(SetFileInputFilesParams {
                files,
                node_id: Some(node_id),
                backend_node_id: None,
                object_id: None,
            })
            .await;
        self.clear_marker(locator).await;

        match result {
            Ok(_) => Ok(()),
            Err(err) => {
                warn!(%locator, error = %err, "file attachment failed");
                Err(DriveError::InteractionFailed(err.to_string()))
            }
        }
    }

    async fn scroll_position(&self) -> Result<i64, DriveError> {
        self.eval_number(js::scroll_position_script()).await
    }

    async fn set_scroll_position(&self, y: i64) -> Result<(), DriveError> {
        self.eval_value(js::set_scroll_script(y)).await?;
        Ok(())
    }

    async fn content_height(&self) -> Result<i64, DriveError> {
        self.eval_number(js::content_height_script()).await
    }

    async fn viewport_height(&self) -> Result<i64, DriveError> {
        self.eval_number(js::viewport_height_script()).await
    }

    async fn current_url(&self) -> Result<String, DriveError> {
        let url = self.page.url().await.map_err(backend)?;
        Ok(url.unwrap_or_default())
    }
}

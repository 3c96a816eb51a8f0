use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use siteflow_core_types::{DriveError, Locator};

/// Capability boundary over one live page/browser session.
///
/// The journey core borrows an implementation for the duration of a call
/// and never stores it; the caller (journey entry point) owns the session.
/// Locators are re-resolved on every method, so no DOM reference survives
/// a navigation.
#[async_trait]
pub trait PagePort: Send + Sync {
    /// Start loading `url`. Completion is observed via [`wait_dom_ready`].
    ///
    /// [`wait_dom_ready`]: PagePort::wait_dom_ready
    async fn navigate(&self, url: &str) -> Result<(), DriveError>;

    /// Block until the document reports a loaded DOM or `timeout` elapses.
    async fn wait_dom_ready(&self, timeout: Duration) -> Result<(), DriveError>;

    /// Whether the element is currently attached and visible.
    ///
    /// Absence is not an error here: a missing element reports `false` so
    /// callers can poll for late-attaching nodes.
    async fn is_visible(&self, locator: &Locator) -> Result<bool, DriveError>;

    async fn click(&self, locator: &Locator) -> Result<(), DriveError>;

    /// Overwrite the element's value with `text`.
    async fn fill(&self, locator: &Locator, text: &str) -> Result<(), DriveError>;

    /// Select the option with the given value on a `<select>` control.
    async fn select_option(&self, locator: &Locator, value: &str) -> Result<(), DriveError>;

    /// Attach local files to a file input.
    async fn set_files(&self, locator: &Locator, paths: &[PathBuf]) -> Result<(), DriveError>;

    /// Current vertical scroll offset in CSS pixels.
    async fn scroll_position(&self) -> Result<i64, DriveError>;

    async fn set_scroll_position(&self, y: i64) -> Result<(), DriveError>;

    /// Total scrollable content height.
    async fn content_height(&self) -> Result<i64, DriveError>;

    async fn viewport_height(&self) -> Result<i64, DriveError>;

    async fn current_url(&self) -> Result<String, DriveError>;
}

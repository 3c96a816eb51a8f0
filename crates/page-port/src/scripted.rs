//! Browserless [`PagePort`] implementation driven by a scripted DOM.
//!
//! Used by unit tests, the workspace integration tests and `--dry-run`:
//! elements are declared up front with visibility schedules and optional
//! failure injection, and every interaction is recorded for assertions.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use siteflow_core_types::{DriveError, Locator};
use tokio::sync::Mutex;

use crate::port::PagePort;

/// One scripted element keyed by its locator value.
#[derive(Clone, Debug)]
pub struct SimElement {
    visible: bool,
    visible_from: Option<Instant>,
    fail_fill: bool,
    fail_select: bool,
    navigates_to: Option<String>,
    options: Option<Vec<String>>,
    value: String,
    files: Vec<PathBuf>,
}

impl SimElement {
    pub fn visible() -> Self {
        Self {
            visible: true,
            visible_from: None,
            fail_fill: false,
            fail_select: false,
            navigates_to: None,
            options: None,
            value: String::new(),
            files: Vec::new(),
        }
    }

    pub fn hidden() -> Self {
        Self {
            visible: false,
            ..Self::visible()
        }
    }

    /// Element that attaches/become visible only after `delay`.
    pub fn visible_after(delay: Duration) -> Self {
        Self {
            visible: false,
            visible_from: Some(Instant::now() + delay),
            ..Self::visible()
        }
    }

    /// Clicking this element navigates the page, like an anchor.
    pub fn navigates_to(mut self, url: impl Into<String>) -> Self {
        self.navigates_to = Some(url.into());
        self
    }

    /// Restrict `select_option` to this option list.
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    /// Reject any `select_option` call against this element.
    pub fn rejecting_select(mut self) -> Self {
        self.fail_select = true;
        self
    }

    /// Reject any `fill` call against this element.
    pub fn rejecting_fill(mut self) -> Self {
        self.fail_fill = true;
        self
    }

    fn currently_visible(&self) -> bool {
        match self.visible_from {
            Some(at) => Instant::now() >= at,
            None => self.visible,
        }
    }
}

/// Recorded interaction, in call order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageCall {
    Navigate(String),
    WaitDomReady,
    Click(String),
    Fill { locator: String, text: String },
    Select { locator: String, value: String },
    SetFiles { locator: String, paths: Vec<PathBuf> },
    SetScroll(i64),
}

#[derive(Debug)]
struct Inner {
    url: String,
    elements: HashMap<String, SimElement>,
    scroll_y: i64,
    content_height: i64,
    viewport_height: i64,
    calls: Vec<PageCall>,
}

#[derive(Debug)]
pub struct ScriptedPage {
    inner: Mutex<Inner>,
}

impl ScriptedPage {
    pub fn new(start_url: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                url: start_url.into(),
                elements: HashMap::new(),
                scroll_y: 0,
                content_height: 0,
                viewport_height: 0,
                calls: Vec::new(),
            }),
        }
    }

    pub async fn insert_element(&self, locator_value: impl Into<String>, element: SimElement) {
        let mut inner = self.inner.lock().await;
        inner.elements.insert(locator_value.into(), element);
    }

    pub async fn remove_element(&self, locator_value: &str) {
        let mut inner = self.inner.lock().await;
        inner.elements.remove(locator_value);
    }

    pub async fn set_geometry(&self, content_height: i64, viewport_height: i64) {
        let mut inner = self.inner.lock().await;
        inner.content_height = content_height;
        inner.viewport_height = viewport_height;
    }

    pub async fn calls(&self) -> Vec<PageCall> {
        self.inner.lock().await.calls.clone()
    }

    pub async fn url(&self) -> String {
        self.inner.lock().await.url.clone()
    }

    pub async fn scroll_y(&self) -> i64 {
        self.inner.lock().await.scroll_y
    }

    /// Last value written into the element, if any.
    pub async fn element_value(&self, locator_value: &str) -> Option<String> {
        let inner = self.inner.lock().await;
        inner.elements.get(locator_value).map(|el| el.value.clone())
    }

    pub async fn element_files(&self, locator_value: &str) -> Option<Vec<PathBuf>> {
        let inner = self.inner.lock().await;
        inner.elements.get(locator_value).map(|el| el.files.clone())
    }
}

#[async_trait]
impl PagePort for ScriptedPage {
    async fn navigate(&self, url: &str) -> Result<(), DriveError> {
        let mut inner = self.inner.lock().await;
        inner.url = url.to_string();
        inner.scroll_y = 0;
        inner.calls.push(PageCall::Navigate(url.to_string()));
        Ok(())
    }

    async fn wait_dom_ready(&self, _timeout: Duration) -> Result<(), DriveError> {
        let mut inner = self.inner.lock().await;
        inner.calls.push(PageCall::WaitDomReady);
        Ok(())
    }

    async fn is_visible(&self, locator: &Locator) -> Result<bool, DriveError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .elements
            .get(&locator.value)
            .map(SimElement::currently_visible)
            .unwrap_or(false))
    }

    async fn click(&self, locator: &Locator) -> Result<(), DriveError> {
        let mut inner = self.inner.lock().await;
        let target = match inner.elements.get(&locator.value) {
            Some(el) => el.clone(),
            None => return Err(DriveError::NotFound(locator.to_string())),
        };
        if !target.currently_visible() {
            return Err(DriveError::InteractionFailed(format!(
                "{locator} is not visible"
            )));
        }
        inner.calls.push(PageCall::Click(locator.value.clone()));
        if let Some(url) = target.navigates_to {
            inner.url = url;
            inner.scroll_y = 0;
        }
        Ok(())
    }

    async fn fill(&self, locator: &Locator, text: &str) -> Result<(), DriveError> {
        let mut inner = self.inner.lock().await;
        let element = inner
            .elements
            .get_mut(&locator.value)
            .ok_or_else(|| DriveError::NotFound(locator.to_string()))?;
        if element.fail_fill {
            return Err(DriveError::InteractionFailed(format!(
                "{locator} rejected the value"
            )));
        }
        element.value = text.to_string();
        inner.calls.push(PageCall::Fill {
            locator: locator.value.clone(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn select_option(&self, locator: &Locator, value: &str) -> Result<(), DriveError> {
        let mut inner = self.inner.lock().await;
        let element = inner
            .elements
            .get_mut(&locator.value)
            .ok_or_else(|| DriveError::NotFound(locator.to_string()))?;
        if element.fail_select {
            return Err(DriveError::InteractionFailed(format!(
                "{locator} rejected the selection"
            )));
        }
        if let Some(options) = &element.options {
            if !options.iter().any(|opt| opt == value) {
                return Err(DriveError::InteractionFailed(format!(
                    "{locator} has no option '{value}'"
                )));
            }
        }
        element.value = value.to_string();
        inner.calls.push(PageCall::Select {
            locator: locator.value.clone(),
            value: value.to_string(),
        });
        Ok(())
    }

    async fn set_files(&self, locator: &Locator, paths: &[PathBuf]) -> Result<(), DriveError> {
        let mut inner = self.inner.lock().await;
        let element = inner
            .elements
            .get_mut(&locator.value)
            .ok_or_else(|| DriveError::NotFound(locator.to_string()))?;
        element.files = paths.to_vec();
        inner.calls.push(PageCall::SetFiles {
            locator: locator.value.clone(),
            paths: paths.to_vec(),
        });
        Ok(())
    }

    async fn scroll_position(&self) -> Result<i64, DriveError> {
        Ok(self.inner.lock().await.scroll_y)
    }

    async fn set_scroll_position(&self, y: i64) -> Result<(), DriveError> {
        let mut inner = self.inner.lock().await;
        inner.scroll_y = y;
        inner.calls.push(PageCall::SetScroll(y));
        Ok(())
    }

    async fn content_height(&self) -> Result<i64, DriveError> {
        Ok(self.inner.lock().await.content_height)
    }

    async fn viewport_height(&self) -> Result<i64, DriveError> {
        Ok(self.inner.lock().await.viewport_height)
    }

    async fn current_url(&self) -> Result<String, DriveError> {
        Ok(self.inner.lock().await.url.clone())
    }
}

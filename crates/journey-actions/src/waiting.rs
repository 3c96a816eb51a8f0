//! Element readiness waiting.

use std::time::{Duration, Instant};

use page_port::PagePort;
use siteflow_core_types::{DriveError, Locator};
use tokio::time::sleep;
use tracing::trace;

/// Block until the element behind `locator` is visible or `timeout` elapses.
///
/// Bounded polling: each miss suspends the caller for `poll_interval`.
/// Transient absence is never an error before the deadline; the element is
/// checked once immediately so an already-ready element returns without
/// sleeping. Transport failures propagate as-is.
pub async fn wait_element_ready(
    page: &dyn PagePort,
    locator: &Locator,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<(), DriveError> {
    let started = Instant::now();
    loop {
        match page.is_visible(locator).await {
            Ok(true) => return Ok(()),
            Ok(false) => trace!(%locator, "element not ready yet"),
            // Some backends report absence as an error; treat it the same
            // as an invisible element until the deadline.
            Err(DriveError::NotFound(_)) => trace!(%locator, "element not attached yet"),
            Err(other) => return Err(other),
        }
        if started.elapsed() >= timeout {
            return Err(DriveError::timed_out(
                locator.to_string(),
                timeout.as_millis() as u64,
            ));
        }
        sleep(poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_port::{ScriptedPage, SimElement};

    #[tokio::test]
    async fn succeeds_when_element_appears_before_deadline() {
        let page = ScriptedPage::new("https://example.test/");
        page.insert_element("#late", SimElement::visible_after(Duration::from_millis(30)))
            .await;

        let result = wait_element_ready(
            &page,
            &Locator::css("#late"),
            Duration::from_millis(300),
            Duration::from_millis(10),
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn times_out_when_element_appears_too_late() {
        let page = ScriptedPage::new("https://example.test/");
        page.insert_element("#late", SimElement::visible_after(Duration::from_millis(500)))
            .await;

        let err = wait_element_ready(
            &page,
            &Locator::css("#late"),
            Duration::from_millis(60),
            Duration::from_millis(10),
        )
        .await
        .unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn absent_element_times_out_rather_than_erroring() {
        let page = ScriptedPage::new("https://example.test/");
        let err = wait_element_ready(
            &page,
            &Locator::css("#never"),
            Duration::from_millis(40),
            Duration::from_millis(10),
        )
        .await
        .unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn already_visible_element_returns_immediately() {
        let page = ScriptedPage::new("https://example.test/");
        page.insert_element("#now", SimElement::visible()).await;

        let started = Instant::now();
        wait_element_ready(
            &page,
            &Locator::css("#now"),
            Duration::from_millis(1_000),
            Duration::from_millis(200),
        )
        .await
        .unwrap();
        assert!(started.elapsed() < Duration::from_millis(100));
    }
}

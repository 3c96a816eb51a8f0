use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Every fixed delay in the journey, collected behind one value object so
/// pacing can be tuned (or collapsed for dry runs) without touching the
/// component logic.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlePolicy {
    /// Upper bound for an element to become actionable.
    pub element_timeout_ms: u64,
    /// Interval between readiness polls.
    pub poll_interval_ms: u64,
    /// Pause after each successful field fill, letting reactive UI catch up.
    pub field_settle_ms: u64,
    /// Buffer after each journey step before its post-condition is checked.
    pub step_settle_ms: u64,
    /// Pause after the scroll loop finishes, for lazy-loaded content.
    pub scroll_settle_ms: u64,
    /// Pause on either side of the submit click.
    pub submit_settle_ms: u64,
    /// Dwell on a freshly opened page before scrolling it.
    pub page_dwell_ms: u64,
}

impl Default for SettlePolicy {
    fn default() -> Self {
        Self {
            element_timeout_ms: 10_000,
            poll_interval_ms: 100,
            field_settle_ms: 1_000,
            step_settle_ms: 1_000,
            scroll_settle_ms: 2_000,
            submit_settle_ms: 2_000,
            page_dwell_ms: 2_000,
        }
    }
}

impl SettlePolicy {
    /// Policy with every settle delay collapsed; used by dry runs and tests.
    /// Readiness waits keep a small bound so absence still times out fast.
    pub fn instant() -> Self {
        Self {
            element_timeout_ms: 250,
            poll_interval_ms: 5,
            field_settle_ms: 0,
            step_settle_ms: 0,
            scroll_settle_ms: 0,
            submit_settle_ms: 0,
            page_dwell_ms: 0,
        }
    }

    pub fn element_timeout(&self) -> Duration {
        Duration::from_millis(self.element_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn field_settle(&self) -> Duration {
        Duration::from_millis(self.field_settle_ms)
    }

    pub fn step_settle(&self) -> Duration {
        Duration::from_millis(self.step_settle_ms)
    }

    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }

    pub fn submit_settle(&self) -> Duration {
        Duration::from_millis(self.submit_settle_ms)
    }

    pub fn page_dwell(&self) -> Duration {
        Duration::from_millis(self.page_dwell_ms)
    }
}

/// Human-like scroll pacing: how far each step moves and how long it rests.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollPacing {
    pub step_px: i64,
    pub step_delay_ms: u64,
}

impl Default for ScrollPacing {
    fn default() -> Self {
        Self {
            step_px: 160,
            step_delay_ms: 20,
        }
    }
}

impl ScrollPacing {
    /// Step size with the `> 0` invariant enforced.
    pub fn effective_step(&self) -> i64 {
        self.step_px.max(1)
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

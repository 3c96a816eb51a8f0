//! Core types for journey orchestration.

use chrono::{DateTime, Utc};
use journey_actions::FormPlan;
use serde::{Deserialize, Serialize};
use siteflow_core_types::{JourneyId, Locator};

/// Action performed by one journey step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StepAction {
    /// Load a URL.
    Navigate { url: String },

    /// Click a control in place (theme toggle, accordion, ...).
    ToggleControl { locator: Locator },

    /// Click a link that navigates.
    ClickLink { locator: Locator },

    /// Walk the viewport to the bottom of the current page.
    ScrollToBottom,

    /// Fill an ordered form plan.
    FillForm(FormPlan),

    /// Click a submit control, with dwell on either side.
    Submit { locator: Locator },
}

/// Expected page state after a step completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PostCondition {
    /// Current URL contains the fragment (case-sensitive substring).
    UrlContains(String),

    /// Element is attached and visible.
    ElementVisible(Locator),

    /// Every listed condition holds.
    All(Vec<PostCondition>),
}

/// One step of the linear journey.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyStep {
    pub name: String,
    pub action: StepAction,
    /// Dwell before the action, in milliseconds.
    pub pause_before_ms: u64,
    pub post: Option<PostCondition>,
}

impl JourneyStep {
    pub fn new(name: impl Into<String>, action: StepAction) -> Self {
        Self {
            name: name.into(),
            action,
            pause_before_ms: 0,
            post: None,
        }
    }

    pub fn with_pause_before(mut self, pause_ms: u64) -> Self {
        self.pause_before_ms = pause_ms;
        self
    }

    pub fn with_post(mut self, post: PostCondition) -> Self {
        self.post = Some(post);
        self
    }
}

/// Terminal verification evaluated once every step has completed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Verification {
    /// The final URL must contain this fragment.
    pub expected_url_fragment: String,

    /// All of these must be visible (conjunction).
    pub required_controls: Vec<Locator>,
}

/// Fixed, linear journey: steps run in order, fail fast, no retries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journey {
    pub id: JourneyId,
    pub name: String,
    pub steps: Vec<JourneyStep>,
    pub verification: Verification,
}

impl Journey {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: JourneyId::new(),
            name: name.into(),
            steps: Vec::new(),
            verification: Verification::default(),
        }
    }

    pub fn with_step(mut self, step: JourneyStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_verification(mut self, verification: Verification) -> Self {
        self.verification = verification;
        self
    }
}

/// Execution record for one step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    pub step: String,
    pub ok: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub latency_ms: u64,
    pub error: Option<String>,
}

impl StepReport {
    pub fn new(step: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            step: step.into(),
            ok: false,
            started_at: now,
            finished_at: now,
            latency_ms: 0,
            error: None,
        }
    }

    pub fn with_success(mut self) -> Self {
        self.ok = true;
        self
    }

    pub fn with_error(mut self, error: String) -> Self {
        self.ok = false;
        self.error = Some(error);
        self
    }

    /// Stamp the finish time and latency.
    pub fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self.latency_ms = (self.finished_at - self.started_at).num_milliseconds() as u64;
        self
    }
}

/// Aggregate journey verdict plus the two terminal verification signals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyReport {
    pub journey: String,
    pub ok: bool,
    pub on_expected_page: bool,
    pub form_structure_present: bool,
    pub failed_step: Option<String>,
    pub steps: Vec<StepReport>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub latency_ms: u64,
    pub error: Option<String>,
}

impl JourneyReport {
    pub fn new(journey: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            journey: journey.into(),
            ok: false,
            on_expected_page: false,
            form_structure_present: false,
            failed_step: None,
            steps: Vec::new(),
            started_at: now,
            finished_at: now,
            latency_ms: 0,
            error: None,
        }
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self.latency_ms = (self.finished_at - self.started_at).num_milliseconds() as u64;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_builders_compose() {
        let step = JourneyStep::new(
            "open-portfolio",
            StepAction::ClickLink {
                locator: Locator::xpath("//*[@id=\"navbarNav\"]/ul/li[4]/a"),
            },
        )
        .with_pause_before(2_000)
        .with_post(PostCondition::UrlContains("portfolio".into()));

        assert_eq!(step.pause_before_ms, 2_000);
        assert!(step.post.is_some());
    }

    #[test]
    fn report_finish_stamps_latency() {
        let report = StepReport::new("submit").with_success().finish();
        assert!(report.ok);
        assert!(report.finished_at >= report.started_at);
    }
}

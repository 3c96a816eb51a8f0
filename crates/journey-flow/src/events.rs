//! Observability port for journey execution.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::types::{JourneyReport, JourneyStep};

#[async_trait]
pub trait JourneyEvents: Send + Sync {
    async fn step_started(&self, step: &JourneyStep);
    async fn step_finished(&self, step: &str, ok: bool, error: Option<&str>);
    async fn journey_finished(&self, report: &JourneyReport);
}

/// Default sink: structured tracing at the checkpoints.
#[derive(Clone, Debug, Default)]
pub struct TracingJourneyEvents;

#[async_trait]
impl JourneyEvents for TracingJourneyEvents {
    async fn step_started(&self, step: &JourneyStep) {
        info!(step = %step.name, "journey step started");
    }

    async fn step_finished(&self, step: &str, ok: bool, error: Option<&str>) {
        if ok {
            info!(step, "journey step finished");
        } else {
            warn!(step, error = error.unwrap_or("unknown"), "journey step failed");
        }
    }

    async fn journey_finished(&self, report: &JourneyReport) {
        info!(
            journey = %report.journey,
            ok = report.ok,
            on_expected_page = report.on_expected_page,
            form_structure_present = report.form_structure_present,
            latency_ms = report.latency_ms,
            "journey finished"
        );
    }
}

#[derive(Clone, Debug, Default)]
pub struct NullJourneyEvents;

#[async_trait]
impl JourneyEvents for NullJourneyEvents {
    async fn step_started(&self, _step: &JourneyStep) {}
    async fn step_finished(&self, _step: &str, _ok: bool, _error: Option<&str>) {}
    async fn journey_finished(&self, _report: &JourneyReport) {}
}

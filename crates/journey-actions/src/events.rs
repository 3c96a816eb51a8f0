//! Observability port for form filling.
//!
//! Components report progress through this seam instead of logging inline,
//! so control flow stays free of reporting concerns.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::model::{FieldOutcome, FieldSpec};

#[async_trait]
pub trait FormEvents: Send + Sync {
    async fn field_started(&self, spec: &FieldSpec);
    async fn field_finished(&self, field: &str, outcome: &FieldOutcome);
}

/// Default sink: structured tracing at the checkpoints.
#[derive(Clone, Debug, Default)]
pub struct TracingFormEvents;

#[async_trait]
impl FormEvents for TracingFormEvents {
    async fn field_started(&self, spec: &FieldSpec) {
        info!(field = %spec.name, locator = %spec.locator, kind = ?spec.kind, "filling field");
    }

    async fn field_finished(&self, field: &str, outcome: &FieldOutcome) {
        match outcome {
            FieldOutcome::Filled => info!(field, "field filled"),
            FieldOutcome::Skipped(reason) => info!(field, reason, "field skipped"),
            FieldOutcome::Failed(error) => warn!(field, error = %error, "field failed"),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct NullFormEvents;

#[async_trait]
impl FormEvents for NullFormEvents {
    async fn field_started(&self, _spec: &FieldSpec) {}
    async fn field_finished(&self, _field: &str, _outcome: &FieldOutcome) {}
}

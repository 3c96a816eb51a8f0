use siteflow_core_types::DriveError;
use thiserror::Error;

/// Structural errors detected before a journey starts executing.
///
/// Runtime failures never surface here; they are recorded in the
/// [`JourneyReport`](crate::types::JourneyReport) so a failed run still
/// produces a full account of what happened.
#[derive(Debug, Error, Clone)]
pub enum FlowError {
    #[error("journey has no steps")]
    EmptyJourney,

    #[error("duplicate step name '{0}'")]
    DuplicateStep(String),

    #[error("step '{step}' has an invalid form plan: {reason}")]
    InvalidPlan { step: String, reason: String },
}

impl From<FlowError> for DriveError {
    fn from(err: FlowError) -> Self {
        DriveError::InteractionFailed(err.to_string())
    }
}

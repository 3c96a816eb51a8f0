//! Ordered form sequencing with per-field failure isolation.

use std::time::Instant;

use page_port::PagePort;
use siteflow_core_types::DriveError;
use tracing::{debug, warn};

use crate::events::FormEvents;
use crate::fill::fill_field;
use crate::model::{
    FieldKind, FieldOutcome, FieldResult, FormOutcome, FormPlan, FormReport, PlanError,
};
use crate::policy::SettlePolicy;

/// Fill every field of `plan` in order.
///
/// A failure on a required field stops the remaining plan immediately,
/// except for dropdowns, whose selection failures never abort the form.
/// Skipped optional fields and tolerated failures do not block later
/// fields. The result is `Completed` only if every required field actually
/// reported `Filled`.
///
/// Structural plan errors (duplicates, kind mismatches) are rejected before
/// any field is touched.
pub async fn fill_form(
    page: &dyn PagePort,
    plan: &FormPlan,
    policy: &SettlePolicy,
    events: &dyn FormEvents,
) -> Result<FormReport, PlanError> {
    plan.validate()?;

    let started = Instant::now();
    let mut fields = Vec::with_capacity(plan.len());
    let mut aborted: Option<(String, DriveError)> = None;

    for spec in plan.fields() {
        let field_started = Instant::now();
        let outcome = fill_field(page, spec, policy, events).await;

        let fatal = spec.required
            && spec.kind != FieldKind::Dropdown
            && matches!(outcome, FieldOutcome::Failed(_));

        if spec.required && !outcome.is_filled() && aborted.is_none() {
            aborted = Some((spec.name.clone(), unfilled_reason(&outcome)));
        }

        fields.push(FieldResult {
            name: spec.name.clone(),
            outcome,
            latency_ms: field_started.elapsed().as_millis() as u64,
        });

        if fatal {
            warn!(field = %spec.name, "required field failed, aborting remaining plan");
            break;
        }
    }

    let outcome = match aborted {
        None => FormOutcome::Completed,
        Some((field, reason)) => FormOutcome::AbortedAt { field, reason },
    };
    debug!(fields = fields.len(), completed = outcome.is_completed(), "form plan finished");

    Ok(FormReport {
        outcome,
        fields,
        latency_ms: started.elapsed().as_millis() as u64,
    })
}

fn unfilled_reason(outcome: &FieldOutcome) -> DriveError {
    match outcome {
        FieldOutcome::Failed(err) => err.clone(),
        FieldOutcome::Skipped(reason) => DriveError::NotFound(reason.clone()),
        // Unreachable by construction; kept total for safety.
        FieldOutcome::Filled => DriveError::InteractionFailed("field reported filled".to_string()),
    }
}

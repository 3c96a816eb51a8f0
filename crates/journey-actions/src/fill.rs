//! Single-field filling with per-kind tolerance rules.

use page_port::PagePort;
use siteflow_core_types::DriveError;
use tokio::time::sleep;

use crate::events::FormEvents;
use crate::model::{FieldKind, FieldOutcome, FieldSpec};
use crate::policy::SettlePolicy;
use crate::waiting::wait_element_ready;

/// Drive one field and report what happened.
///
/// Tolerance rules:
/// - `Dropdown`: absence (readiness timeout or explicit invisibility) is a
///   `Skipped`, and selection failures surface as `Failed` but are never
///   fatal to the caller.
/// - `Text` / `FileUpload`: any failure surfaces as `Failed`; the sequencer
///   decides fatality from the `required` flag.
///
/// Every successful interaction is followed by the field settle delay so
/// reactive UI (validation, conditional fields) catches up before the next
/// field is touched.
pub async fn fill_field(
    page: &dyn PagePort,
    spec: &FieldSpec,
    policy: &SettlePolicy,
    events: &dyn FormEvents,
) -> FieldOutcome {
    events.field_started(spec).await;

    let outcome = drive_field(page, spec, policy).await;
    if outcome.is_filled() {
        sleep(policy.field_settle()).await;
    }

    events.field_finished(&spec.name, &outcome).await;
    outcome
}

async fn drive_field(page: &dyn PagePort, spec: &FieldSpec, policy: &SettlePolicy) -> FieldOutcome {
    match spec.kind {
        FieldKind::Dropdown => drive_dropdown(page, spec, policy).await,
        FieldKind::Text => drive_text(page, spec, policy).await,
        FieldKind::FileUpload => drive_upload(page, spec, policy).await,
    }
}

async fn drive_dropdown(
    page: &dyn PagePort,
    spec: &FieldSpec,
    policy: &SettlePolicy,
) -> FieldOutcome {
    match wait_element_ready(
        page,
        &spec.locator,
        policy.element_timeout(),
        policy.poll_interval(),
    )
    .await
    {
        Ok(()) => {}
        Err(err) if err.is_timeout() => {
            return FieldOutcome::Skipped(format!("dropdown never became visible: {}", spec.locator))
        }
        Err(other) => return FieldOutcome::Failed(other),
    }

    // Re-check explicitly: a dropdown that vanished between the wait and the
    // interaction is treated as absent, not broken.
    match page.is_visible(&spec.locator).await {
        Ok(true) => {}
        Ok(false) | Err(DriveError::NotFound(_)) => {
            return FieldOutcome::Skipped(format!("dropdown not visible: {}", spec.locator))
        }
        Err(other) => return FieldOutcome::Failed(other),
    }

    let Some(value) = spec.value.as_text() else {
        return FieldOutcome::Failed(DriveError::InteractionFailed(format!(
            "field '{}' has no selectable value",
            spec.name
        )));
    };

    // Open the control first, then select.
    if let Err(err) = page.click(&spec.locator).await {
        return FieldOutcome::Failed(err);
    }
    if let Err(err) = page.select_option(&spec.locator, value).await {
        return FieldOutcome::Failed(err);
    }

    FieldOutcome::Filled
}

async fn drive_text(page: &dyn PagePort, spec: &FieldSpec, policy: &SettlePolicy) -> FieldOutcome {
    if let Err(err) = wait_element_ready(
        page,
        &spec.locator,
        policy.element_timeout(),
        policy.poll_interval(),
    )
    .await
    {
        return FieldOutcome::Failed(err);
    }

    let Some(text) = spec.value.as_text() else {
        return FieldOutcome::Failed(DriveError::InteractionFailed(format!(
            "field '{}' has no text value",
            spec.name
        )));
    };

    match page.fill(&spec.locator, text).await {
        Ok(()) => FieldOutcome::Filled,
        Err(err) => FieldOutcome::Failed(err),
    }
}

async fn drive_upload(page: &dyn PagePort, spec: &FieldSpec, policy: &SettlePolicy) -> FieldOutcome {
    if let Err(err) = wait_element_ready(
        page,
        &spec.locator,
        policy.element_timeout(),
        policy.poll_interval(),
    )
    .await
    {
        return FieldOutcome::Failed(err);
    }

    let Some(path) = spec.value.as_file() else {
        return FieldOutcome::Failed(DriveError::InteractionFailed(format!(
            "field '{}' has no file value",
            spec.name
        )));
    };

    match page.set_files(&spec.locator, std::slice::from_ref(path)).await {
        Ok(()) => FieldOutcome::Filled,
        Err(err) => FieldOutcome::Failed(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NullFormEvents;
    use crate::model::FieldSpec;
    use page_port::{PageCall, ScriptedPage, SimElement};
    use siteflow_core_types::Locator;

    fn policy() -> SettlePolicy {
        SettlePolicy {
            element_timeout_ms: 60,
            poll_interval_ms: 5,
            ..SettlePolicy::instant()
        }
    }

    #[tokio::test]
    async fn text_field_fills_and_records_value() {
        let page = ScriptedPage::new("https://example.test/careers/");
        page.insert_element("input[name=\"name\"]", SimElement::visible())
            .await;
        let spec = FieldSpec::text("name", Locator::css("input[name=\"name\"]"), "Sharjeel Ahmad");

        let outcome = fill_field(&page, &spec, &policy(), &NullFormEvents).await;

        assert!(outcome.is_filled());
        assert_eq!(
            page.element_value("input[name=\"name\"]").await.as_deref(),
            Some("Sharjeel Ahmad")
        );
    }

    #[tokio::test]
    async fn missing_dropdown_is_skipped_not_failed() {
        let page = ScriptedPage::new("https://example.test/careers/");
        let spec = FieldSpec::dropdown(
            "title",
            Locator::css("select[name=\"title\"]"),
            "Jr. Web Developer",
        );

        let outcome = fill_field(&page, &spec, &policy(), &NullFormEvents).await;
        assert!(matches!(outcome, FieldOutcome::Skipped(_)));
    }

    #[tokio::test]
    async fn hidden_dropdown_is_skipped() {
        let page = ScriptedPage::new("https://example.test/careers/");
        page.insert_element("select[name=\"location\"]", SimElement::hidden())
            .await;
        let spec = FieldSpec::dropdown("location", Locator::css("select[name=\"location\"]"), "Lahore");

        let outcome = fill_field(&page, &spec, &policy(), &NullFormEvents).await;
        assert!(matches!(outcome, FieldOutcome::Skipped(_)));
    }

    #[tokio::test]
    async fn dropdown_selection_failure_is_reported_not_skipped() {
        let page = ScriptedPage::new("https://example.test/careers/");
        page.insert_element(
            "select[name=\"title\"]",
            SimElement::visible().rejecting_select(),
        )
        .await;
        let spec = FieldSpec::dropdown(
            "title",
            Locator::css("select[name=\"title\"]"),
            "Jr. Web Developer",
        );

        let outcome = fill_field(&page, &spec, &policy(), &NullFormEvents).await;
        assert!(matches!(outcome, FieldOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn dropdown_clicks_before_selecting() {
        let page = ScriptedPage::new("https://example.test/careers/");
        page.insert_element(
            "select[name=\"title\"]",
            SimElement::visible().with_options(["Jr. Web Developer"]),
        )
        .await;
        let spec = FieldSpec::dropdown(
            "title",
            Locator::css("select[name=\"title\"]"),
            "Jr. Web Developer",
        );

        let outcome = fill_field(&page, &spec, &policy(), &NullFormEvents).await;
        assert!(outcome.is_filled());

        let calls = page.calls().await;
        let click_at = calls
            .iter()
            .position(|c| matches!(c, PageCall::Click(_)))
            .unwrap();
        let select_at = calls
            .iter()
            .position(|c| matches!(c, PageCall::Select { .. }))
            .unwrap();
        assert!(click_at < select_at);
    }

    #[tokio::test]
    async fn required_text_timeout_is_failed() {
        let page = ScriptedPage::new("https://example.test/careers/");
        let spec = FieldSpec::text("email", Locator::css("input[name=\"email\"]"), "a@b.c");

        let outcome = fill_field(&page, &spec, &policy(), &NullFormEvents).await;
        match outcome {
            FieldOutcome::Failed(err) => assert!(err.is_timeout()),
            other => panic!("expected timeout failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn upload_attaches_file() {
        let page = ScriptedPage::new("https://example.test/careers/");
        page.insert_element("input[name=\"resume\"]", SimElement::visible())
            .await;
        let spec = FieldSpec::file_upload(
            "resume",
            Locator::css("input[name=\"resume\"]"),
            "./resume.pdf",
        );

        let outcome = fill_field(&page, &spec, &policy(), &NullFormEvents).await;
        assert!(outcome.is_filled());
        let files = page.element_files("input[name=\"resume\"]").await.unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("resume.pdf"));
    }
}

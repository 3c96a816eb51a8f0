//! Linear journey executor.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_recursion::async_recursion;
use journey_actions::{
    fill_form, scroll_to_bottom, wait_element_ready, FormEvents, FormOutcome, FormPlan,
    ScrollPacing, SettlePolicy, TracingFormEvents,
};
use page_port::PagePort;
use siteflow_core_types::DriveError;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::errors::FlowError;
use crate::events::{JourneyEvents, TracingJourneyEvents};
use crate::redact;
use crate::types::{
    Journey, JourneyReport, JourneyStep, PostCondition, StepAction, StepReport, Verification,
};

/// Execution phase of the journey state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JourneyState {
    Idle,
    Navigating,
    PageLoaded,
    Interacting,
    Terminal,
}

/// Drives a [`Journey`] step by step: fail fast, no retry, no rollback.
///
/// Each step executes its action, waits for the page to settle (load signal
/// plus a fixed buffer), then evaluates its post-condition. The first
/// failure terminates the run; the terminal state evaluates the journey's
/// two verification predicates.
pub struct JourneyExecutor {
    policy: SettlePolicy,
    pacing: ScrollPacing,
    events: Arc<dyn JourneyEvents>,
    form_events: Arc<dyn FormEvents>,
}

impl JourneyExecutor {
    pub fn new(policy: SettlePolicy, pacing: ScrollPacing) -> Self {
        Self {
            policy,
            pacing,
            events: Arc::new(TracingJourneyEvents),
            form_events: Arc::new(TracingFormEvents),
        }
    }

    pub fn with_events(mut self, events: Arc<dyn JourneyEvents>) -> Self {
        self.events = events;
        self
    }

    pub fn with_form_events(mut self, events: Arc<dyn FormEvents>) -> Self {
        self.form_events = events;
        self
    }

    /// Reject structurally broken journeys before anything touches the page.
    pub fn validate(&self, journey: &Journey) -> Result<(), FlowError> {
        if journey.steps.is_empty() {
            return Err(FlowError::EmptyJourney);
        }
        let mut seen = HashSet::new();
        for step in &journey.steps {
            if !seen.insert(step.name.as_str()) {
                return Err(FlowError::DuplicateStep(step.name.clone()));
            }
            if let StepAction::FillForm(plan) = &step.action {
                plan.validate().map_err(|err| FlowError::InvalidPlan {
                    step: step.name.clone(),
                    reason: err.to_string(),
                })?;
            }
        }
        Ok(())
    }

    /// Run the journey to its terminal state.
    ///
    /// `Err` is reserved for invalid journey structure; every runtime
    /// failure is recorded in the returned report instead.
    pub async fn run(
        &self,
        page: &dyn PagePort,
        journey: &Journey,
    ) -> Result<JourneyReport, FlowError> {
        self.validate(journey)?;

        info!(
            journey = %journey.name,
            id = %journey.id,
            steps = journey.steps.len(),
            "starting journey"
        );

        let mut report = JourneyReport::new(journey.name.clone());
        let mut state = JourneyState::Idle;

        for step in &journey.steps {
            self.events.step_started(step).await;
            state = self.enter_step(state, step);

            if step.pause_before_ms > 0 {
                sleep(Duration::from_millis(step.pause_before_ms)).await;
            }

            let step_report = StepReport::new(step.name.clone());
            let result = match self.execute_action(page, step).await {
                Ok(()) => self.settle_then_check(page, step).await,
                Err(err) => Err(err),
            };

            match result {
                Ok(()) => {
                    state = JourneyState::PageLoaded;
                    self.events.step_finished(&step.name, true, None).await;
                    report.steps.push(step_report.with_success().finish());
                }
                Err(err) => {
                    let message = err.to_string();
                    self.events
                        .step_finished(&step.name, false, Some(&message))
                        .await;
                    report.steps.push(step_report.with_error(message.clone()).finish());
                    report.failed_step = Some(step.name.clone());
                    report.error = Some(message);
                    debug!(from = ?state, to = ?JourneyState::Terminal, "state transition");

                    let report = report.finish();
                    self.events.journey_finished(&report).await;
                    return Ok(report);
                }
            }
        }

        debug!(from = ?state, to = ?JourneyState::Terminal, "state transition");
        report.on_expected_page = self.on_expected_page(page, &journey.verification).await;
        report.form_structure_present = self
            .form_structure_present(page, &journey.verification)
            .await;
        report.ok = report.on_expected_page && report.form_structure_present;
        if !report.ok {
            report.error = Some(format!(
                "terminal verification failed (on_expected_page={}, form_structure_present={})",
                report.on_expected_page, report.form_structure_present
            ));
        }

        let report = report.finish();
        self.events.journey_finished(&report).await;
        Ok(report)
    }

    fn enter_step(&self, state: JourneyState, step: &JourneyStep) -> JourneyState {
        let next = match step.action {
            StepAction::Navigate { .. } | StepAction::ClickLink { .. } => JourneyState::Navigating,
            _ => JourneyState::Interacting,
        };
        debug!(from = ?state, to = ?next, step = %step.name, "state transition");
        next
    }

    async fn execute_action(
        &self,
        page: &dyn PagePort,
        step: &JourneyStep,
    ) -> Result<(), DriveError> {
        match &step.action {
            StepAction::Navigate { url } => {
                info!(url = %redact::url(url), "navigating");
                page.navigate(url).await
            }
            StepAction::ToggleControl { locator } | StepAction::ClickLink { locator } => {
                wait_element_ready(
                    page,
                    locator,
                    self.policy.element_timeout(),
                    self.policy.poll_interval(),
                )
                .await?;
                page.click(locator).await
            }
            StepAction::ScrollToBottom => {
                scroll_to_bottom(page, &self.pacing, &self.policy).await;
                Ok(())
            }
            StepAction::FillForm(plan) => self.run_form(page, plan).await,
            StepAction::Submit { locator } => {
                wait_element_ready(
                    page,
                    locator,
                    self.policy.element_timeout(),
                    self.policy.poll_interval(),
                )
                .await?;
                sleep(self.policy.submit_settle()).await;
                page.click(locator).await?;
                sleep(self.policy.submit_settle()).await;
                Ok(())
            }
        }
    }

    async fn run_form(&self, page: &dyn PagePort, plan: &FormPlan) -> Result<(), DriveError> {
        let report = fill_form(page, plan, &self.policy, self.form_events.as_ref())
            .await
            .map_err(|err| DriveError::InteractionFailed(err.to_string()))?;

        match report.outcome {
            FormOutcome::Completed => Ok(()),
            FormOutcome::AbortedAt { field, reason } => Err(DriveError::InteractionFailed(
                format!("form aborted at field '{field}': {reason}"),
            )),
        }
    }

    /// Load signal plus fixed buffer, then the step's post-condition.
    async fn settle_then_check(
        &self,
        page: &dyn PagePort,
        step: &JourneyStep,
    ) -> Result<(), DriveError> {
        page.wait_dom_ready(self.policy.element_timeout()).await?;
        sleep(self.policy.step_settle()).await;

        if let Some(post) = &step.post {
            if !self.check_post(page, post).await? {
                return Err(DriveError::PostConditionFalse(step.name.clone()));
            }
        }
        Ok(())
    }

    #[async_recursion]
    async fn check_post(
        &self,
        page: &dyn PagePort,
        post: &PostCondition,
    ) -> Result<bool, DriveError> {
        match post {
            PostCondition::UrlContains(fragment) => {
                let url = page.current_url().await?;
                debug!(url = %redact::url(&url), fragment, "checking url post-condition");
                Ok(url.contains(fragment.as_str()))
            }
            PostCondition::ElementVisible(locator) => page.is_visible(locator).await,
            PostCondition::All(conditions) => {
                for condition in conditions {
                    if !self.check_post(page, condition).await? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }

    async fn on_expected_page(&self, page: &dyn PagePort, verification: &Verification) -> bool {
        if verification.expected_url_fragment.is_empty() {
            return true;
        }
        match page.current_url().await {
            Ok(url) => {
                debug!(url = %redact::url(&url), "terminal url check");
                url.contains(&verification.expected_url_fragment)
            }
            Err(err) => {
                warn!(error = %err, "could not read final url");
                false
            }
        }
    }

    async fn form_structure_present(
        &self,
        page: &dyn PagePort,
        verification: &Verification,
    ) -> bool {
        for locator in &verification.required_controls {
            match page.is_visible(locator).await {
                Ok(true) => {}
                Ok(false) => {
                    warn!(%locator, "required control not visible at terminal state");
                    return false;
                }
                Err(err) => {
                    warn!(%locator, error = %err, "required control check failed");
                    return false;
                }
            }
        }
        true
    }
}

//! The codeflamme journey: step sequence, form plan and dry-run seeding.

use journey_actions::{FieldSpec, FormPlan};
use journey_flow::{Journey, JourneyStep, PostCondition, StepAction, Verification};
use page_port::{ScriptedPage, SimElement};
use siteflow_core_types::Locator;

use crate::config::AppConfig;

const THEME_TOGGLE: &str = "#theme-mode";
const PORTFOLIO_LINK: &str = "//*[@id=\"navbarNav\"]/ul/li[4]/a";
const CAREERS_LINK: &str = "//*[@id=\"navbarNav\"]/ul/li[6]/a";
const JOB_TITLE_SELECT: &str = "select[name=\"title\"]";
const FULL_NAME_INPUT: &str = "input[name=\"name\"]";
const EMAIL_INPUT: &str = "input[name=\"email\"]";
const PHONE_INPUT: &str = "input[name=\"phone\"]";
const LOCATION_SELECT: &str = "select[name=\"location\"]";
const GITHUB_INPUT: &str = "input[name=\"github\"]";
const LINKEDIN_INPUT: &str = "input[name=\"linkedin\"]";
const RESUME_INPUT: &str = "input[name=\"resume\"]";
const COVER_LETTER_INPUT: &str = "textarea[name=\"message\"]";
const APPLY_BUTTON: &str = "button[type=\"submit\"]";
const APPLICATION_FORM: &str = "form";

/// Ordered application form. Dropdowns are optional: the site renders them
/// conditionally and their absence must not sink the application.
pub fn build_form_plan(config: &AppConfig) -> FormPlan {
    let applicant = &config.applicant;
    FormPlan::new()
        .with_field(FieldSpec::dropdown(
            "title",
            Locator::css(JOB_TITLE_SELECT),
            applicant.job_title.clone(),
        ))
        .with_field(FieldSpec::text(
            "name",
            Locator::css(FULL_NAME_INPUT),
            applicant.full_name.clone(),
        ))
        .with_field(FieldSpec::text(
            "email",
            Locator::css(EMAIL_INPUT),
            applicant.email.clone(),
        ))
        .with_field(FieldSpec::text(
            "phone",
            Locator::css(PHONE_INPUT),
            applicant.phone.clone(),
        ))
        .with_field(FieldSpec::dropdown(
            "location",
            Locator::css(LOCATION_SELECT),
            applicant.location.clone(),
        ))
        .with_field(FieldSpec::text(
            "github",
            Locator::css(GITHUB_INPUT),
            applicant.github_url.clone(),
        ))
        .with_field(FieldSpec::text(
            "linkedin",
            Locator::css(LINKEDIN_INPUT),
            applicant.linkedin_url.clone(),
        ))
        .with_field(FieldSpec::file_upload(
            "resume",
            Locator::css(RESUME_INPUT),
            applicant.resume_path.clone(),
        ))
        .with_field(FieldSpec::text(
            "cover-letter",
            Locator::css(COVER_LETTER_INPUT),
            applicant.cover_letter.clone(),
        ))
}

/// The fixed journey: home, theme toggle, portfolio scroll, careers form,
/// submit, then terminal verification on the careers page.
pub fn build_journey(config: &AppConfig) -> Journey {
    Journey::new("codeflamme-application")
        .with_step(
            JourneyStep::new(
                "open-home",
                StepAction::Navigate {
                    url: config.site.base_url.clone(),
                },
            )
            .with_post(PostCondition::ElementVisible(Locator::css(THEME_TOGGLE))),
        )
        .with_step(JourneyStep::new(
            "toggle-theme",
            StepAction::ToggleControl {
                locator: Locator::css(THEME_TOGGLE),
            },
        ))
        .with_step(
            JourneyStep::new(
                "open-portfolio",
                StepAction::ClickLink {
                    locator: Locator::xpath(PORTFOLIO_LINK),
                },
            )
            .with_post(PostCondition::UrlContains("portfolio".to_string())),
        )
        .with_step(
            JourneyStep::new("scroll-portfolio", StepAction::ScrollToBottom)
                .with_pause_before(config.timeouts.page_dwell_ms),
        )
        .with_step(
            JourneyStep::new(
                "open-careers",
                StepAction::ClickLink {
                    locator: Locator::xpath(CAREERS_LINK),
                },
            )
            .with_post(PostCondition::UrlContains(
                config.site.careers_url_fragment.clone(),
            )),
        )
        .with_step(JourneyStep::new(
            "fill-application",
            StepAction::FillForm(build_form_plan(config)),
        ))
        .with_step(JourneyStep::new(
            "submit-application",
            StepAction::Submit {
                locator: Locator::css(APPLY_BUTTON),
            },
        ))
        .with_verification(Verification {
            expected_url_fragment: config.site.careers_url_fragment.clone(),
            required_controls: vec![
                Locator::css(APPLICATION_FORM),
                Locator::css(FULL_NAME_INPUT),
                Locator::css(EMAIL_INPUT),
            ],
        })
}

/// Scripted stand-in for the live site, matching everything the journey
/// touches. Used by `--dry-run` and the integration tests.
pub async fn seed_scripted_page(config: &AppConfig) -> ScriptedPage {
    let base = config.site.base_url.trim_end_matches('/').to_string();
    let page = ScriptedPage::new("about:blank");

    page.insert_element(THEME_TOGGLE, SimElement::visible()).await;
    page.insert_element(
        PORTFOLIO_LINK,
        SimElement::visible().navigates_to(format!("{base}/portfolio/")),
    )
    .await;
    page.insert_element(
        CAREERS_LINK,
        SimElement::visible().navigates_to(format!("{base}/careers/")),
    )
    .await;

    page.insert_element(
        JOB_TITLE_SELECT,
        SimElement::visible().with_options([config.applicant.job_title.clone()]),
    )
    .await;
    page.insert_element(FULL_NAME_INPUT, SimElement::visible()).await;
    page.insert_element(EMAIL_INPUT, SimElement::visible()).await;
    page.insert_element(PHONE_INPUT, SimElement::visible()).await;
    page.insert_element(
        LOCATION_SELECT,
        SimElement::visible().with_options([config.applicant.location.clone()]),
    )
    .await;
    page.insert_element(GITHUB_INPUT, SimElement::visible()).await;
    page.insert_element(LINKEDIN_INPUT, SimElement::visible()).await;
    page.insert_element(RESUME_INPUT, SimElement::visible()).await;
    page.insert_element(COVER_LETTER_INPUT, SimElement::visible()).await;
    page.insert_element(APPLY_BUTTON, SimElement::visible()).await;
    page.insert_element(APPLICATION_FORM, SimElement::visible()).await;

    page.set_geometry(2_400, 800).await;
    page
}

use anyhow::{bail, Result};
use cdp_page::CdpBrowser;
use clap::Parser;
use journey_actions::SettlePolicy;
use journey_flow::{JourneyExecutor, JourneyReport};
use tracing::{info, warn};

use siteflow_cli::cli::{Cli, Command, RunArgs};
use siteflow_cli::config::AppConfig;
use siteflow_cli::journey::{build_journey, seed_scripted_page};
use siteflow_cli::{logging, report};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.log_file.as_deref())?;
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Plan => plan(&config),
        Command::Run(args) => run(config, args).await,
    }
}

fn plan(config: &AppConfig) -> Result<()> {
    let journey = build_journey(config);
    println!("journey: {}", journey.name);
    for (index, step) in journey.steps.iter().enumerate() {
        println!("  {}. {}", index + 1, step.name);
    }
    println!(
        "verification: url contains '{}', {} required controls",
        journey.verification.expected_url_fragment,
        journey.verification.required_controls.len()
    );
    Ok(())
}

async fn run(mut config: AppConfig, args: RunArgs) -> Result<()> {
    if let Some(headless) = args.headless {
        config.browser.headless = headless;
    }
    if let Some(path) = args.chrome_path {
        config.browser.executable = Some(path);
    }
    if let Some(timeout) = args.element_timeout {
        config.timeouts.element_timeout_ms = timeout.as_millis() as u64;
    }
    if args.dry_run {
        config.timeouts = SettlePolicy::instant();
    }

    let journey = build_journey(&config);
    let executor = JourneyExecutor::new(config.timeouts.clone(), config.scroll.clone());

    let journey_report: JourneyReport = if args.dry_run {
        if args.screenshot.is_some() {
            warn!("screenshots are not available in dry-run mode");
        }
        let page = seed_scripted_page(&config).await;
        executor.run(&page, &journey).await?
    } else {
        if !config.applicant.resume_path.exists() {
            bail!(
                "resume file '{}' does not exist",
                config.applicant.resume_path.display()
            );
        }

        let browser = CdpBrowser::launch(&config.browser).await?;
        let page = browser.new_page().await?;
        let result = executor.run(&page, &journey).await?;
        if let Some(path) = &args.screenshot {
            if let Err(err) = page.screenshot_to(path).await {
                warn!(error = %err, "screenshot capture failed");
            }
        }
        if let Err(err) = browser.close().await {
            warn!(error = %err, "browser shutdown failed");
        }
        result
    };

    if args.json {
        report::print_json(&journey_report)?;
    } else {
        report::print_text(&journey_report);
    }

    if !journey_report.ok {
        let at = journey_report
            .failed_step
            .as_ref()
            .map(|step| format!(" at step '{step}'"))
            .unwrap_or_default();
        bail!("journey failed{at}");
    }
    info!("journey passed");
    Ok(())
}

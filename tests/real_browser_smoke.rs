//! Real-browser smoke test against the live site.
//!
//! Disabled by default; set SITEFLOW_SMOKE=1 (and optionally
//! SITEFLOW_CHROME to a Chrome/Chromium binary) to run it.

use std::env;
use std::fs;
use std::process::Command;

use anyhow::{Context, Result};
use tempfile::tempdir;

#[test]
fn real_browser_journey_smoke() -> Result<()> {
    const TOGGLE: &str = "SITEFLOW_SMOKE";
    let enabled = env::var(TOGGLE).unwrap_or_default();
    if enabled.is_empty() || enabled == "0" {
        eprintln!("skipping real-browser smoke test (set {TOGGLE}=1 to enable)");
        return Ok(());
    }

    let binary = env!("CARGO_BIN_EXE_siteflow");
    let tmp = tempdir()?;
    let resume_path = tmp.path().join("resume.pdf");
    fs::write(&resume_path, b"%PDF-1.4\n%siteflow smoke resume\n")?;
    let screenshot_path = tmp.path().join("final.png");

    let mut command = Command::new(binary);
    command
        .arg("run")
        .arg("--screenshot")
        .arg(&screenshot_path)
        .env("SITEFLOW_APPLICANT__RESUME_PATH", &resume_path);
    if let Ok(chrome) = env::var("SITEFLOW_CHROME") {
        command.arg("--chrome-path").arg(chrome);
    }

    let output = command.output().context("failed to execute siteflow run")?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        output.status.success(),
        "run failed: status={:?}\nstdout:\n{stdout}\nstderr:\n{stderr}",
        output.status
    );
    assert!(stdout.contains("verdict: PASS"), "stdout: {stdout}");
    assert!(
        screenshot_path.exists(),
        "expected screenshot at {}",
        screenshot_path.display()
    );

    Ok(())
}

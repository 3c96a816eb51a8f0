//! CLI behavior without a browser.

use assert_cmd::Command;

#[test]
fn plan_prints_the_step_list() {
    let output = Command::cargo_bin("siteflow")
        .unwrap()
        .arg("plan")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("codeflamme-application"));
    assert!(stdout.contains("open-portfolio"));
    assert!(stdout.contains("submit-application"));
}

#[test]
fn dry_run_passes_end_to_end() {
    let output = Command::cargo_bin("siteflow")
        .unwrap()
        .args(["run", "--dry-run"])
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stdout: {stdout}");
    assert!(stdout.contains("verdict: PASS"), "stdout: {stdout}");
    assert!(stdout.contains("on expected page:       true"));
}

#[test]
fn dry_run_json_emits_a_parsable_report() {
    let output = Command::cargo_bin("siteflow")
        .unwrap()
        .args(["run", "--dry-run", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["journey"], "codeflamme-application");
    assert_eq!(report["ok"], true);
    assert_eq!(report["steps"].as_array().unwrap().len(), 7);
}

#[test]
fn run_refuses_a_missing_resume_without_a_browser_launch() {
    let output = Command::cargo_bin("siteflow")
        .unwrap()
        .args(["run"])
        .env("SITEFLOW_APPLICANT__RESUME_PATH", "/nonexistent/resume.pdf")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("resume"), "stderr: {stderr}");
}

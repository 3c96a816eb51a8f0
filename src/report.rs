//! Verdict output for the CLI.

use anyhow::Result;
use journey_flow::JourneyReport;

pub fn print_text(report: &JourneyReport) {
    println!("journey: {}", report.journey);
    for step in &report.steps {
        let status = if step.ok { "ok" } else { "failed" };
        match &step.error {
            Some(error) => println!(
                "  {:<20} {:<7} {:>6}ms  {}",
                step.step, status, step.latency_ms, error
            ),
            None => println!("  {:<20} {:<7} {:>6}ms", step.step, status, step.latency_ms),
        }
    }
    println!("on expected page:       {}", report.on_expected_page);
    println!("form structure present: {}", report.form_structure_present);
    println!("verdict: {}", if report.ok { "PASS" } else { "FAIL" });
}

pub fn print_json(report: &JourneyReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_report_round_trips() {
        let report = JourneyReport::new("codeflamme-application");
        let encoded = serde_json::to_string(&report).unwrap();
        let decoded: JourneyReport = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.journey, "codeflamme-application");
        assert!(!decoded.ok);
    }
}

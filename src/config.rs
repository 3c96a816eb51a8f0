//! Layered configuration: built-in defaults, optional TOML file,
//! `SITEFLOW_*` environment overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cdp_page::BrowserLaunchConfig;
use config::{Config, Environment, File};
use journey_actions::{ScrollPacing, SettlePolicy};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: String,
    /// Fragment the final URL must contain for the journey to pass.
    pub careers_url_fragment: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://codeflamme.com/".to_string(),
            careers_url_fragment: "career".to_string(),
        }
    }
}

/// Values typed into the application form.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicantProfile {
    pub job_title: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub github_url: String,
    pub linkedin_url: String,
    pub resume_path: PathBuf,
    pub cover_letter: String,
}

impl Default for ApplicantProfile {
    fn default() -> Self {
        Self {
            job_title: "Jr. Web Developer".to_string(),
            full_name: "Sharjeel Ahmad".to_string(),
            email: "contact.sharjeelahmad@gmail.com".to_string(),
            phone: "03244991112".to_string(),
            location: "Lahore".to_string(),
            github_url: "https://github.com/SharjeelAhmad-12".to_string(),
            linkedin_url: "https://www.linkedin.com/in/sharjeel-ahmad-0013902b8/".to_string(),
            resume_path: PathBuf::from("./resume.pdf"),
            cover_letter:
                "I am excited to apply for this role and contribute my skills to Codeflamme."
                    .to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub site: SiteConfig,
    pub applicant: ApplicantProfile,
    pub timeouts: SettlePolicy,
    pub scroll: ScrollPacing,
    pub browser: BrowserLaunchConfig,
}

impl AppConfig {
    /// Defaults, then the config file (explicit path or
    /// `<config-dir>/siteflow/config.toml`), then `SITEFLOW_*` variables
    /// (`__` separates nested keys).
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);

        match explicit {
            Some(path) => {
                builder = builder.add_source(File::from(path.to_path_buf()));
            }
            None => {
                if let Some(dir) = dirs::config_dir() {
                    builder = builder
                        .add_source(File::from(dir.join("siteflow/config.toml")).required(false));
                }
            }
        }

        builder = builder.add_source(Environment::with_prefix("SITEFLOW").separator("__"));

        builder
            .build()
            .context("building configuration")?
            .try_deserialize()
            .context("deserializing configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_reproduce_the_observed_journey() {
        let config = AppConfig::default();
        assert_eq!(config.site.base_url, "https://codeflamme.com/");
        assert_eq!(config.applicant.job_title, "Jr. Web Developer");
        assert_eq!(config.applicant.location, "Lahore");
        assert_eq!(config.timeouts.element_timeout_ms, 10_000);
        assert_eq!(config.scroll.step_px, 160);
        assert!(config.browser.headless);
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "[applicant]\nfull_name = \"Someone Else\"\n\n[scroll]\nstep_px = 320\n"
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.applicant.full_name, "Someone Else");
        assert_eq!(config.scroll.step_px, 320);
        // Untouched sections keep their defaults.
        assert_eq!(config.applicant.email, "contact.sharjeelahmad@gmail.com");
    }
}

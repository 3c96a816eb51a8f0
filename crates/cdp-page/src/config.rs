use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Chromium launch settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserLaunchConfig {
    pub headless: bool,
    pub no_sandbox: bool,
    /// Explicit browser binary; when unset, well-known names are probed on PATH.
    pub executable: Option<PathBuf>,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for BrowserLaunchConfig {
    fn default() -> Self {
        Self {
            headless: true,
            no_sandbox: false,
            executable: None,
            window_width: 1366,
            window_height: 768,
        }
    }
}

const KNOWN_BINARIES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "chrome",
];

impl BrowserLaunchConfig {
    pub fn resolve_executable(&self) -> Option<PathBuf> {
        if let Some(path) = &self.executable {
            return Some(path.clone());
        }
        KNOWN_BINARIES
            .iter()
            .find_map(|name| which::which(name).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_executable_wins_over_path_probe() {
        let config = BrowserLaunchConfig {
            executable: Some(PathBuf::from("/opt/chrome/chrome")),
            ..BrowserLaunchConfig::default()
        };
        assert_eq!(
            config.resolve_executable(),
            Some(PathBuf::from("/opt/chrome/chrome"))
        );
    }

    #[test]
    fn defaults_are_headless() {
        let config = BrowserLaunchConfig::default();
        assert!(config.headless);
        assert!(!config.no_sandbox);
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error taxonomy shared by every layer of the journey driver.
///
/// Variants mirror the ways a page interaction can go wrong:
/// - the element never became actionable (`TimedOut`)
/// - the selector resolved to nothing (`NotFound`)
/// - the platform rejected the interaction itself (`InteractionFailed`)
/// - a step's expected end state was not observed (`PostConditionFalse`)
/// - the browser transport failed underneath us (`Backend`)
#[derive(Debug, Error, Clone)]
pub enum DriveError {
    #[error("wait timed out after {timeout_ms}ms: {what}")]
    TimedOut { what: String, timeout_ms: u64 },

    #[error("element not found: {0}")]
    NotFound(String),

    #[error("interaction failed: {0}")]
    InteractionFailed(String),

    #[error("post-condition not met at step '{0}'")]
    PostConditionFalse(String),

    #[error("page backend error: {0}")]
    Backend(String),
}

impl DriveError {
    pub fn timed_out(what: impl Into<String>, timeout_ms: u64) -> Self {
        Self::TimedOut {
            what: what.into(),
            timeout_ms,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, DriveError::TimedOut { .. })
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct JourneyId(pub String);

impl JourneyId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for JourneyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JourneyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct StepId(pub String);

impl StepId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for StepId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub String);

impl ActionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strategy used to resolve a [`Locator`] against the live document.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocatorStrategy {
    Css,
    XPath,
}

/// Descriptor for a page element, resolved fresh on every interaction.
///
/// Nothing holds on to a resolved element: navigations invalidate DOM
/// references, so the port layer re-queries the locator per call.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Locator {
    pub strategy: LocatorStrategy,
    pub value: String,
}

impl Locator {
    pub fn css(value: impl Into<String>) -> Self {
        Self {
            strategy: LocatorStrategy::Css,
            value: value.into(),
        }
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Self {
            strategy: LocatorStrategy::XPath,
            value: value.into(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.strategy {
            LocatorStrategy::Css => write!(f, "css={}", self.value),
            LocatorStrategy::XPath => write!(f, "xpath={}", self.value),
        }
    }
}

impl FromStr for Locator {
    type Err = DriveError;

    /// Parses `css=...`/`xpath=...` prefixes; bare strings starting with
    /// `//` or `(` are treated as XPath, everything else as CSS.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = raw.strip_prefix("css=") {
            return Ok(Locator::css(rest));
        }
        if let Some(rest) = raw.strip_prefix("xpath=") {
            return Ok(Locator::xpath(rest));
        }
        if raw.trim().is_empty() {
            return Err(DriveError::InteractionFailed("empty locator".to_string()));
        }
        if raw.starts_with("//") || raw.starts_with('(') {
            Ok(Locator::xpath(raw))
        } else {
            Ok(Locator::css(raw))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locator_parse_autodetects_strategy() {
        let xpath: Locator = "//*[@id=\"navbarNav\"]/ul/li[4]/a".parse().unwrap();
        assert_eq!(xpath.strategy, LocatorStrategy::XPath);

        let css: Locator = "input[name=\"email\"]".parse().unwrap();
        assert_eq!(css.strategy, LocatorStrategy::Css);

        let prefixed: Locator = "css=#theme-mode".parse().unwrap();
        assert_eq!(prefixed.strategy, LocatorStrategy::Css);
        assert_eq!(prefixed.value, "#theme-mode");
    }

    #[test]
    fn locator_parse_rejects_empty() {
        assert!("".parse::<Locator>().is_err());
    }

    #[test]
    fn timeout_helper_matches_variant() {
        let err = DriveError::timed_out("css=#x", 500);
        assert!(err.is_timeout());
        assert!(!DriveError::NotFound("y".into()).is_timeout());
    }
}

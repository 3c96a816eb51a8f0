use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use siteflow_core_types::{DriveError, Locator};
use thiserror::Error;

/// How a field is driven.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Dropdown,
    FileUpload,
}

/// Value written into a field.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    File(PathBuf),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&PathBuf> {
        match self {
            FieldValue::File(path) => Some(path),
            FieldValue::Text(_) => None,
        }
    }
}

/// One form field: immutable descriptor, defined once per plan.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub locator: Locator,
    pub value: FieldValue,
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Required text input.
    pub fn text(name: impl Into<String>, locator: Locator, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locator,
            value: FieldValue::Text(value.into()),
            required: true,
            kind: FieldKind::Text,
        }
    }

    /// Dropdown selection; optional by default because absent or inert
    /// dropdowns are tolerated.
    pub fn dropdown(name: impl Into<String>, locator: Locator, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            locator,
            value: FieldValue::Text(value.into()),
            required: false,
            kind: FieldKind::Dropdown,
        }
    }

    /// Required file attachment.
    pub fn file_upload(name: impl Into<String>, locator: Locator, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            locator,
            value: FieldValue::File(path.into()),
            required: true,
            kind: FieldKind::FileUpload,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Plan structure error, reported before any field is touched.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum PlanError {
    #[error("form plan is empty")]
    Empty,

    #[error("duplicate field '{0}' in form plan")]
    DuplicateField(String),

    #[error("field '{0}' value does not match its kind")]
    ValueMismatch(String),
}

/// Ordered form description; insertion order is fill order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FormPlan {
    fields: Vec<FieldSpec>,
}

impl FormPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate structure: non-empty, unique names, values matching kinds.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.fields.is_empty() {
            return Err(PlanError::Empty);
        }
        let mut seen = HashSet::new();
        for spec in &self.fields {
            if !seen.insert(spec.name.as_str()) {
                return Err(PlanError::DuplicateField(spec.name.clone()));
            }
            let matches_kind = match spec.kind {
                FieldKind::Text | FieldKind::Dropdown => spec.value.as_text().is_some(),
                FieldKind::FileUpload => spec.value.as_file().is_some(),
            };
            if !matches_kind {
                return Err(PlanError::ValueMismatch(spec.name.clone()));
            }
        }
        Ok(())
    }
}

/// Outcome of driving one field.
#[derive(Clone, Debug)]
pub enum FieldOutcome {
    /// Interaction succeeded.
    Filled,
    /// Field was legitimately absent or inert and skipped.
    Skipped(String),
    /// Interaction failed; fatality is decided by the sequencer.
    Failed(DriveError),
}

impl FieldOutcome {
    pub fn is_filled(&self) -> bool {
        matches!(self, FieldOutcome::Filled)
    }
}

#[derive(Clone, Debug)]
pub struct FieldResult {
    pub name: String,
    pub outcome: FieldOutcome,
    pub latency_ms: u64,
}

/// Aggregate form outcome.
#[derive(Clone, Debug)]
pub enum FormOutcome {
    Completed,
    AbortedAt { field: String, reason: DriveError },
}

impl FormOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, FormOutcome::Completed)
    }
}

#[derive(Clone, Debug)]
pub struct FormReport {
    pub outcome: FormOutcome,
    pub fields: Vec<FieldResult>,
    pub latency_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_rejects_duplicate_names() {
        let plan = FormPlan::new()
            .with_field(FieldSpec::text("email", Locator::css("#a"), "x@y.z"))
            .with_field(FieldSpec::text("email", Locator::css("#b"), "x@y.z"));
        assert_eq!(
            plan.validate(),
            Err(PlanError::DuplicateField("email".into()))
        );
    }

    #[test]
    fn plan_rejects_value_kind_mismatch() {
        let mismatched = FieldSpec {
            name: "resume".into(),
            locator: Locator::css("#resume"),
            value: FieldValue::Text("not-a-path".into()),
            required: true,
            kind: FieldKind::FileUpload,
        };
        let plan = FormPlan::new().with_field(mismatched);
        assert_eq!(plan.validate(), Err(PlanError::ValueMismatch("resume".into())));
    }

    #[test]
    fn plan_rejects_empty() {
        assert_eq!(FormPlan::new().validate(), Err(PlanError::Empty));
    }

    #[test]
    fn dropdown_defaults_to_optional() {
        let spec = FieldSpec::dropdown("title", Locator::css("select"), "Jr. Web Developer");
        assert!(!spec.required);
        assert!(FieldSpec::text("name", Locator::css("input"), "x").required);
    }
}

//! Submission validation against a stored [`FormSchema`].
//!
//! The engine is pure: no I/O, no shared state, and identical inputs always produce an
//! identical [`ValidationReport`]. Keys in a submission that the schema does not know are
//! ignored so older schemas keep accepting payloads from newer renderers.

mod rules;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::field::FieldDefinition;
use super::schema::FormSchema;

/// Raw submitted data keyed by field id.
pub type Submission = BTreeMap<String, SubmissionValue>;

/// Shapes a renderer may post for a single field.
///
/// `null` counts as blank. Any other JSON is kept as `Other` and only reported, as
/// `invalid_type`, when the key belongs to a schema field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmissionValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
    File(FileReference),
    Other(serde_json::Value),
}

impl SubmissionValue {
    pub(crate) fn is_blank(&self) -> bool {
        match self {
            SubmissionValue::Text(text) => text.trim().is_empty(),
            SubmissionValue::List(items) => items.iter().all(|item| item.trim().is_empty()),
            SubmissionValue::File(file) => file.name.trim().is_empty(),
            SubmissionValue::Null => true,
            SubmissionValue::Bool(_) | SubmissionValue::Number(_) | SubmissionValue::Other(_) => {
                false
            }
        }
    }
}

impl From<&str> for SubmissionValue {
    fn from(value: &str) -> Self {
        SubmissionValue::Text(value.to_string())
    }
}

impl From<String> for SubmissionValue {
    fn from(value: String) -> Self {
        SubmissionValue::Text(value)
    }
}

impl From<f64> for SubmissionValue {
    fn from(value: f64) -> Self {
        SubmissionValue::Number(value)
    }
}

impl From<bool> for SubmissionValue {
    fn from(value: bool) -> Self {
        SubmissionValue::Bool(value)
    }
}

/// Pointer to an upload handled by the file collaborator. Only presence is checked here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReference {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    Required,
    Range,
    Length,
    Pattern,
    InvalidOption,
    InvalidType,
}

impl FieldErrorKind {
    pub const fn code(self) -> &'static str {
        match self {
            FieldErrorKind::Required => "required",
            FieldErrorKind::Range => "range",
            FieldErrorKind::Length => "length",
            FieldErrorKind::Pattern => "pattern",
            FieldErrorKind::InvalidOption => "invalid_option",
            FieldErrorKind::InvalidType => "invalid_type",
        }
    }
}

/// The single error reported for a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub code: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub(crate) fn new(code: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: BTreeMap<String, FieldError>,
}

impl ValidationReport {
    pub fn error_kind(&self, field_id: &str) -> Option<FieldErrorKind> {
        self.errors.get(field_id).map(|error| error.code)
    }
}

/// Check one submitted value against one field. The first failing rule wins.
pub fn validate_field(
    field: &FieldDefinition,
    value: Option<&SubmissionValue>,
) -> Result<(), FieldError> {
    rules::check_field(field, value)
}

/// Validate every schema field, in schema order, and collect one error per failing field.
pub fn validate(schema: &FormSchema, submission: &Submission) -> ValidationReport {
    let mut errors = BTreeMap::new();

    for field in &schema.fields {
        if let Err(error) = validate_field(field, submission.get(&field.id)) {
            errors.entry(field.id.clone()).or_insert(error);
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

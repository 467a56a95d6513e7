use std::collections::HashSet;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::field::{FieldDefinition, FieldKind};

/// Ordered field collection plus form metadata. Field order is the render and tab order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    pub form_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl FormSchema {
    pub fn new(form_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            title: title.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    /// Append without any checks; pair with [`FormSchema::validate`].
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(&self, id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.id == id)
    }

    pub fn push_field(&mut self, field: FieldDefinition) -> Result<(), SchemaError> {
        if self.field(&field.id).is_some() {
            return Err(SchemaError::DuplicateFieldId { field: field.id });
        }
        self.fields.push(field);
        Ok(())
    }

    /// Swap the field in place, keeping its slot. Returns the previous definition.
    pub fn replace_field(
        &mut self,
        id: &str,
        field: FieldDefinition,
    ) -> Result<FieldDefinition, SchemaError> {
        let index = self.position(id).ok_or_else(|| SchemaError::UnknownField {
            field: id.to_string(),
        })?;

        if field.id != id && self.field(&field.id).is_some() {
            return Err(SchemaError::DuplicateFieldId { field: field.id });
        }

        Ok(std::mem::replace(&mut self.fields[index], field))
    }

    pub fn remove_field(&mut self, id: &str) -> Option<FieldDefinition> {
        let index = self.position(id)?;
        Some(self.fields.remove(index))
    }

    /// Structural checks. Every problem is reported, in field order.
    pub fn validate(&self) -> Result<(), SchemaErrors> {
        let mut errors = Vec::new();

        if self.fields.is_empty() {
            errors.push(SchemaError::EmptyFields);
        }

        let mut seen = HashSet::new();
        let mut reported = HashSet::new();

        for (position, field) in self.fields.iter().enumerate() {
            if field.id.trim().is_empty() {
                errors.push(SchemaError::EmptyFieldId { position });
            } else if !seen.insert(field.id.as_str()) && reported.insert(field.id.as_str()) {
                errors.push(SchemaError::DuplicateFieldId {
                    field: field.id.clone(),
                });
            }

            if field.field_type().requires_options() && field.kind.options().is_empty() {
                errors.push(SchemaError::MissingOptions {
                    field: field.id.clone(),
                });
            }

            check_constraints(field, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaErrors(errors))
        }
    }
}

/// Free-function form of [`FormSchema::validate`].
pub fn validate_schema(schema: &FormSchema) -> Result<(), SchemaErrors> {
    schema.validate()
}

fn check_constraints(field: &FieldDefinition, errors: &mut Vec<SchemaError>) {
    let inverted = match &field.kind {
        FieldKind::Number {
            validation: Some(rules),
        } => matches!((rules.min, rules.max), (Some(min), Some(max)) if min > max),
        FieldKind::Date {
            validation: Some(rules),
        } => matches!((rules.min, rules.max), (Some(min), Some(max)) if min > max),
        _ => match field.kind.text_rules() {
            Some(rules) => matches!(
                (rules.min_length, rules.max_length),
                (Some(min), Some(max)) if min > max
            ),
            None => false,
        },
    };

    if inverted {
        errors.push(SchemaError::InvertedBounds {
            field: field.id.clone(),
        });
    }

    if let Some(pattern) = field.kind.text_rules().and_then(|rules| rules.pattern.as_ref()) {
        if let Err(err) = Regex::new(pattern) {
            errors.push(SchemaError::InvalidPattern {
                field: field.id.clone(),
                pattern: pattern.clone(),
                reason: err.to_string(),
            });
        }
    }
}

/// Structural defects in a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum SchemaError {
    #[error("schema must contain at least one field")]
    EmptyFields,
    #[error("field id \"{field}\" is used more than once")]
    DuplicateFieldId { field: String },
    #[error("field \"{field}\" needs at least one option")]
    MissingOptions { field: String },
    #[error("field at position {position} has an empty id")]
    EmptyFieldId { position: usize },
    #[error("field \"{field}\" has an invalid pattern \"{pattern}\": {reason}")]
    InvalidPattern {
        field: String,
        pattern: String,
        reason: String,
    },
    #[error("field \"{field}\" has a lower bound greater than its upper bound")]
    InvertedBounds { field: String },
    #[error("field \"{field}\" does not exist in the schema")]
    UnknownField { field: String },
}

/// Every defect found in one pass over a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SchemaErrors(pub Vec<SchemaError>);

impl SchemaErrors {
    pub fn contains(&self, predicate: impl Fn(&SchemaError) -> bool) -> bool {
        self.0.iter().any(predicate)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for SchemaErrors {}

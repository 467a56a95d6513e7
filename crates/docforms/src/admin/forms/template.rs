use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::schema::FormSchema;
use crate::admin::users::UserId;

/// Identifier wrapper for stored form templates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub String);

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// URL-safe template key matching `^[a-z0-9-]+$`. Immutable once a template exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    pub fn parse(raw: &str) -> Result<Self, SlugError> {
        if raw.is_empty() {
            return Err(SlugError::Empty);
        }
        if let Some(character) = raw
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(SlugError::InvalidCharacter {
                slug: raw.to_string(),
                character,
            });
        }
        Ok(Self(raw.to_string()))
    }

    /// Derive a slug from a display name: lowercase, whitespace runs become `-`,
    /// anything else outside `[a-z0-9-]` is dropped.
    pub fn from_name(name: &str) -> Result<Self, SlugError> {
        let mut slug = String::with_capacity(name.len());
        let mut in_whitespace = false;
        for c in name.trim().chars().flat_map(char::to_lowercase) {
            if c.is_whitespace() {
                if !in_whitespace {
                    slug.push('-');
                }
                in_whitespace = true;
                continue;
            }
            in_whitespace = false;
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                slug.push(c);
            }
        }
        Self::parse(&slug)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlugError {
    #[error("slug must not be empty")]
    Empty,
    #[error("slug \"{slug}\" contains '{character}'; only lowercase letters, digits, and hyphens are allowed")]
    InvalidCharacter { slug: String, character: char },
}

/// Named, activatable wrapper that exclusively owns one schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormTemplate {
    pub id: TemplateId,
    pub name: String,
    pub slug: Slug,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub schema: FormSchema,
    pub is_active: bool,
    pub requires_approval: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by_id: UserId,
}

impl FormTemplate {
    /// Materialize a stored template. New templates start active.
    pub fn from_new(id: TemplateId, template: NewFormTemplate, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: template.name,
            slug: template.slug,
            description: template.description,
            schema: template.schema,
            is_active: true,
            requires_approval: template.requires_approval,
            created_at: now,
            updated_at: now,
            created_by_id: template.created_by_id,
        }
    }

    /// Apply a partial patch and refresh `updated_at`. The slug is never touched.
    pub fn apply(&mut self, changes: &TemplateChanges, now: DateTime<Utc>) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(description) = &changes.description {
            self.description = Some(description.clone());
        }
        if let Some(schema) = &changes.schema {
            self.schema = schema.clone();
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
        if let Some(requires_approval) = changes.requires_approval {
            self.requires_approval = requires_approval;
        }
        self.updated_at = now;
    }
}

fn default_requires_approval() -> bool {
    true
}

/// Admin input for a new template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFormTemplate {
    pub name: String,
    pub slug: Slug,
    #[serde(default)]
    pub description: Option<String>,
    pub schema: FormSchema,
    #[serde(default = "default_requires_approval")]
    pub requires_approval: bool,
}

/// What the repository receives once the service has accepted a create request.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFormTemplate {
    pub name: String,
    pub slug: Slug,
    pub description: Option<String>,
    pub schema: FormSchema,
    pub requires_approval: bool,
    pub created_by_id: UserId,
}

impl NewFormTemplate {
    pub fn from_request(request: CreateFormTemplate, created_by_id: UserId) -> Self {
        Self {
            name: request.name,
            slug: request.slug,
            description: request.description,
            schema: request.schema,
            requires_approval: request.requires_approval,
            created_by_id,
        }
    }
}

/// Fields an update may touch. Absent fields stay as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<FormSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_approval: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFormTemplate {
    pub id: TemplateId,
    #[serde(flatten)]
    pub changes: TemplateChanges,
}

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::admin::users::{UserId, UserRole};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditLogId(pub String);

impl fmt::Display for AuditLogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mutations the lifecycle services record, named `entity.verb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditAction {
    FormCreated,
    FormUpdated,
    FormDeleted,
    FormActivated,
    FormDeactivated,
    UserCreated,
    UserUpdated,
    UserDeleted,
}

impl AuditAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            AuditAction::FormCreated => "form.created",
            AuditAction::FormUpdated => "form.updated",
            AuditAction::FormDeleted => "form.deleted",
            AuditAction::FormActivated => "form.activated",
            AuditAction::FormDeactivated => "form.deactivated",
            AuditAction::UserCreated => "user.created",
            AuditAction::UserUpdated => "user.updated",
            AuditAction::UserDeleted => "user.deleted",
        }
    }

    pub const fn entity_type(self) -> &'static str {
        match self {
            AuditAction::FormCreated
            | AuditAction::FormUpdated
            | AuditAction::FormDeleted
            | AuditAction::FormActivated
            | AuditAction::FormDeactivated => "FormTemplate",
            AuditAction::UserCreated | AuditAction::UserUpdated | AuditAction::UserDeleted => {
                "User"
            }
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `entity.verb`: two non-empty lowercase segments separated by one dot.
pub fn is_action_name(action: &str) -> bool {
    match action.split_once('.') {
        Some((entity, verb)) => [entity, verb].iter().all(|part| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        }),
        None => false,
    }
}

/// Whoever triggered a mutation, as far as the request tells us.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Actor {
    pub fn system() -> Self {
        Self::default()
    }

    pub fn user(user_id: UserId, role: UserRole) -> Self {
        Self {
            user_id: Some(user_id),
            role: Some(role),
            ..Self::default()
        }
    }

    /// Id stamped on records this actor creates.
    pub fn attribution(&self) -> UserId {
        self.user_id.clone().unwrap_or_else(UserId::system)
    }
}

/// Immutable audit record. `id` and `timestamp` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: AuditLogId,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_role: Option<UserRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AuditLogEntry {
    pub fn from_new(id: AuditLogId, entry: NewAuditLogEntry, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            action: entry.action,
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            user_id: entry.user_id,
            actor_role: entry.actor_role,
            old_value: entry.old_value,
            new_value: entry.new_value,
            ip_address: entry.ip_address,
            user_agent: entry.user_agent,
            timestamp,
        }
    }

    pub fn list_item(&self, user_name: Option<String>) -> AuditLogListItem {
        AuditLogListItem {
            id: self.id.clone(),
            action: self.action.clone(),
            entity_type: self.entity_type.clone(),
            entity_id: self.entity_id.clone(),
            user_name,
            actor_role: self.actor_role,
            timestamp: self.timestamp,
        }
    }
}

/// Audit entry as submitted, before the store stamps id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAuditLogEntry {
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub actor_role: Option<UserRole>,
    #[serde(default)]
    pub old_value: Option<Value>,
    #[serde(default)]
    pub new_value: Option<Value>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl NewAuditLogEntry {
    pub fn for_action(action: AuditAction, entity_id: impl Into<String>, actor: &Actor) -> Self {
        Self {
            action: action.as_str().to_string(),
            entity_type: action.entity_type().to_string(),
            entity_id: entity_id.into(),
            user_id: actor.user_id.clone(),
            actor_role: actor.role,
            old_value: None,
            new_value: None,
            ip_address: actor.ip_address.clone(),
            user_agent: actor.user_agent.clone(),
        }
    }

    pub fn with_values(mut self, old_value: Option<Value>, new_value: Option<Value>) -> Self {
        self.old_value = old_value;
        self.new_value = new_value;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogListItem {
    pub id: AuditLogId,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_role: Option<UserRole>,
    pub timestamp: DateTime<Utc>,
}

/// Query over the audit trail. Every populated criterion must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl AuditLogFilter {
    pub fn has_inverted_range(&self) -> bool {
        matches!((self.start_date, self.end_date), (Some(start), Some(end)) if start > end)
    }

    /// Date bounds are inclusive; `search` is case-insensitive over action, entity id,
    /// and the resolved user name.
    pub fn matches(&self, entry: &AuditLogEntry, user_name: Option<&str>) -> bool {
        if self.start_date.is_some_and(|start| entry.timestamp < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| entry.timestamp > end) {
            return false;
        }
        if let Some(user_id) = &self.user_id {
            if entry.user_id.as_ref() != Some(user_id) {
                return false;
            }
        }
        if let Some(entity_type) = &self.entity_type {
            if &entry.entity_type != entity_type {
                return false;
            }
        }
        if let Some(action) = &self.action {
            if &entry.action != action {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            Some(query) => {
                let query = query.to_lowercase();
                entry.action.to_lowercase().contains(&query)
                    || entry.entity_id.to_lowercase().contains(&query)
                    || user_name.is_some_and(|name| name.to_lowercase().contains(&query))
            }
            None => true,
        }
    }
}

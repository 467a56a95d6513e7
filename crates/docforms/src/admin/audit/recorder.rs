use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::domain::{Actor, AuditAction, AuditLogEntry, NewAuditLogEntry};
use super::repository::AuditRepository;

/// Appends audit entries after a lifecycle mutation has been committed.
///
/// A failed append is logged and swallowed: the mutation already happened and
/// reporting it as failed would invite a retry that duplicates it.
pub struct AuditRecorder<A> {
    repository: Arc<A>,
}

impl<A> Clone for AuditRecorder<A> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
        }
    }
}

impl<A> AuditRecorder<A>
where
    A: AuditRepository + 'static,
{
    pub fn new(repository: Arc<A>) -> Self {
        Self { repository }
    }

    pub fn record(
        &self,
        action: AuditAction,
        entity_id: &str,
        actor: &Actor,
        old_value: Option<Value>,
        new_value: Option<Value>,
    ) -> Option<AuditLogEntry> {
        let entry = NewAuditLogEntry::for_action(action, entity_id, actor)
            .with_values(old_value, new_value);

        match self.repository.create(entry) {
            Ok(stored) => Some(stored),
            Err(err) => {
                warn!(action = %action, entity_id, error = %err, "audit append failed");
                None
            }
        }
    }
}

/// JSON snapshot for `oldValue`/`newValue`.
pub fn snapshot<T: Serialize>(value: &T) -> Option<Value> {
    serde_json::to_value(value).ok()
}

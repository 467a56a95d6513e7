use std::sync::Arc;

use super::domain::{
    is_action_name, AuditLogEntry, AuditLogFilter, AuditLogId, AuditLogListItem, NewAuditLogEntry,
};
use super::repository::AuditRepository;
use crate::admin::repository::RepositoryError;

/// Read access to the audit trail plus manual appends for actions outside the
/// lifecycle services (approvals, logins recorded by other subsystems).
pub struct AuditLogService<A> {
    repository: Arc<A>,
}

impl<A> AuditLogService<A>
where
    A: AuditRepository + 'static,
{
    pub fn new(repository: Arc<A>) -> Self {
        Self { repository }
    }

    pub fn get_audit_logs(
        &self,
        filter: Option<&AuditLogFilter>,
    ) -> Result<Vec<AuditLogListItem>, AuditServiceError> {
        if let Some(filter) = filter {
            if filter.has_inverted_range() {
                return Err(AuditServiceError::InvertedDateRange);
            }
        }
        Ok(self.repository.find_all(filter)?)
    }

    pub fn get_audit_log_by_id(
        &self,
        id: &AuditLogId,
    ) -> Result<Option<AuditLogEntry>, AuditServiceError> {
        Ok(self.repository.find_by_id(id)?)
    }

    pub fn log_action(
        &self,
        entry: NewAuditLogEntry,
    ) -> Result<AuditLogEntry, AuditServiceError> {
        if !is_action_name(&entry.action) {
            return Err(AuditServiceError::InvalidAction(entry.action));
        }
        if entry.entity_id.trim().is_empty() || entry.entity_type.trim().is_empty() {
            return Err(AuditServiceError::MissingEntity);
        }
        Ok(self.repository.create(entry)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuditServiceError {
    #[error("action \"{0}\" does not follow the entity.verb convention")]
    InvalidAction(String),
    #[error("audit entries must name an entity type and id")]
    MissingEntity,
    #[error("start date must not be after end date")]
    InvertedDateRange,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

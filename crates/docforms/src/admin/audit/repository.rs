use super::domain::{
    AuditLogEntry, AuditLogFilter, AuditLogId, AuditLogListItem, NewAuditLogEntry,
};
use crate::admin::repository::RepositoryError;

/// Append-only audit store. Implementations never mutate a stored entry.
pub trait AuditRepository: Send + Sync {
    fn find_all(
        &self,
        filter: Option<&AuditLogFilter>,
    ) -> Result<Vec<AuditLogListItem>, RepositoryError>;
    fn find_by_id(&self, id: &AuditLogId) -> Result<Option<AuditLogEntry>, RepositoryError>;
    fn create(&self, entry: NewAuditLogEntry) -> Result<AuditLogEntry, RepositoryError>;
}

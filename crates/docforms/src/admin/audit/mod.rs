//! Append-only trail of administrative mutations.

mod actor;
pub mod domain;
pub mod recorder;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use actor::{ACTOR_ID_HEADER, ACTOR_ROLE_HEADER, FORWARDED_FOR_HEADER};
pub use domain::{
    is_action_name, Actor, AuditAction, AuditLogEntry, AuditLogFilter, AuditLogId,
    AuditLogListItem, NewAuditLogEntry,
};
pub use recorder::AuditRecorder;
pub use repository::AuditRepository;
pub use router::audit_router;
pub use service::{AuditLogService, AuditServiceError};

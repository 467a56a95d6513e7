//! Administrative subsystem: form templates, user accounts, and the audit trail.

pub mod audit;
pub mod extract;
pub mod format;
pub mod forms;
pub mod memory;
pub mod repository;
pub mod users;

use std::sync::Arc;

use axum::Router;

pub use repository::RepositoryError;

use audit::{audit_router, AuditLogService, AuditRepository};
use forms::{form_template_router, FormTemplateRepository, FormTemplateService};
use users::{user_router, UserRepository, UserService};

/// All `/api/v1/admin` routes.
pub fn admin_router<T, U, A>(
    templates: Arc<FormTemplateService<T, A>>,
    users: Arc<UserService<U, A>>,
    audit_log: Arc<AuditLogService<A>>,
) -> Router
where
    T: FormTemplateRepository + 'static,
    U: UserRepository + 'static,
    A: AuditRepository + 'static,
{
    form_template_router(templates)
        .merge(user_router(users))
        .merge(audit_router(audit_log))
}

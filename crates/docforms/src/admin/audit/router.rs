use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use super::domain::{AuditLogFilter, AuditLogId, NewAuditLogEntry};
use super::repository::AuditRepository;
use super::service::{AuditLogService, AuditServiceError};
use crate::admin::extract::JsonBody;

/// Read endpoints for the audit viewer plus a manual append hook.
pub fn audit_router<A>(service: Arc<AuditLogService<A>>) -> Router
where
    A: AuditRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/admin/audit",
            get(list_handler::<A>).post(append_handler::<A>),
        )
        .route("/api/v1/admin/audit/:log_id", get(detail_handler::<A>))
        .with_state(service)
}

pub(crate) async fn list_handler<A>(
    State(service): State<Arc<AuditLogService<A>>>,
    Query(filter): Query<AuditLogFilter>,
) -> Response
where
    A: AuditRepository + 'static,
{
    match service.get_audit_logs(Some(&filter)) {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn detail_handler<A>(
    State(service): State<Arc<AuditLogService<A>>>,
    Path(log_id): Path<String>,
) -> Response
where
    A: AuditRepository + 'static,
{
    let id = AuditLogId(log_id);
    match service.get_audit_log_by_id(&id) {
        Ok(Some(entry)) => (StatusCode::OK, Json(entry)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": format!("audit log \"{id}\" not found") });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn append_handler<A>(
    State(service): State<Arc<AuditLogService<A>>>,
    JsonBody(entry): JsonBody<NewAuditLogEntry>,
) -> Response
where
    A: AuditRepository + 'static,
{
    match service.log_action(entry) {
        Ok(stored) => (StatusCode::CREATED, Json(stored)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(error: AuditServiceError) -> Response {
    let status = match &error {
        AuditServiceError::InvalidAction(_)
        | AuditServiceError::MissingEntity
        | AuditServiceError::InvertedDateRange => StatusCode::UNPROCESSABLE_ENTITY,
        AuditServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

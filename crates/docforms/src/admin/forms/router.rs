use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::repository::FormTemplateRepository;
use super::service::{FormTemplateService, TemplateServiceError};
use super::template::{CreateFormTemplate, TemplateChanges, TemplateId, UpdateFormTemplate};
use super::validation::Submission;
use crate::admin::audit::{Actor, AuditRepository};
use crate::admin::extract::JsonBody;
use crate::admin::repository::RepositoryError;

/// Router exposing template administration and submission validation.
pub fn form_template_router<R, A>(service: Arc<FormTemplateService<R, A>>) -> Router
where
    R: FormTemplateRepository + 'static,
    A: AuditRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/admin/forms",
            get(list_handler::<R, A>).post(create_handler::<R, A>),
        )
        .route(
            "/api/v1/admin/forms/:template_id",
            get(detail_handler::<R, A>)
                .patch(update_handler::<R, A>)
                .delete(delete_handler::<R, A>),
        )
        .route(
            "/api/v1/admin/forms/:template_id/active",
            post(toggle_handler::<R, A>),
        )
        .route(
            "/api/v1/admin/forms/:template_id/validate",
            post(validate_handler::<R, A>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ToggleRequest {
    pub(crate) is_active: bool,
}

pub(crate) async fn list_handler<R, A>(
    State(service): State<Arc<FormTemplateService<R, A>>>,
) -> Response
where
    R: FormTemplateRepository + 'static,
    A: AuditRepository + 'static,
{
    match service.get_all_templates() {
        Ok(templates) => (StatusCode::OK, Json(templates)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn detail_handler<R, A>(
    State(service): State<Arc<FormTemplateService<R, A>>>,
    Path(template_id): Path<String>,
) -> Response
where
    R: FormTemplateRepository + 'static,
    A: AuditRepository + 'static,
{
    let id = TemplateId(template_id);
    match service.get_template_by_id(&id) {
        Ok(Some(template)) => (StatusCode::OK, Json(template)).into_response(),
        Ok(None) => error_response(TemplateServiceError::NotFound(id)),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_handler<R, A>(
    State(service): State<Arc<FormTemplateService<R, A>>>,
    actor: Actor,
    JsonBody(request): JsonBody<CreateFormTemplate>,
) -> Response
where
    R: FormTemplateRepository + 'static,
    A: AuditRepository + 'static,
{
    match service.create_template(request, &actor) {
        Ok(template) => (StatusCode::CREATED, Json(template)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_handler<R, A>(
    State(service): State<Arc<FormTemplateService<R, A>>>,
    Path(template_id): Path<String>,
    actor: Actor,
    JsonBody(changes): JsonBody<TemplateChanges>,
) -> Response
where
    R: FormTemplateRepository + 'static,
    A: AuditRepository + 'static,
{
    let update = UpdateFormTemplate {
        id: TemplateId(template_id),
        changes,
    };
    match service.update_template(update, &actor) {
        Ok(template) => (StatusCode::OK, Json(template)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_handler<R, A>(
    State(service): State<Arc<FormTemplateService<R, A>>>,
    Path(template_id): Path<String>,
    actor: Actor,
) -> Response
where
    R: FormTemplateRepository + 'static,
    A: AuditRepository + 'static,
{
    match service.delete_template(&TemplateId(template_id), &actor) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn toggle_handler<R, A>(
    State(service): State<Arc<FormTemplateService<R, A>>>,
    Path(template_id): Path<String>,
    actor: Actor,
    JsonBody(request): JsonBody<ToggleRequest>,
) -> Response
where
    R: FormTemplateRepository + 'static,
    A: AuditRepository + 'static,
{
    match service.toggle_template_active(&TemplateId(template_id), request.is_active, &actor) {
        Ok(template) => (StatusCode::OK, Json(template)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn validate_handler<R, A>(
    State(service): State<Arc<FormTemplateService<R, A>>>,
    Path(template_id): Path<String>,
    JsonBody(submission): JsonBody<Submission>,
) -> Response
where
    R: FormTemplateRepository + 'static,
    A: AuditRepository + 'static,
{
    match service.validate_submission(&TemplateId(template_id), &submission) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(error: TemplateServiceError) -> Response {
    let (status, payload) = match &error {
        TemplateServiceError::DuplicateSlug(_) | TemplateServiceError::Inactive(_) => {
            (StatusCode::CONFLICT, json!({ "error": error.to_string() }))
        }
        TemplateServiceError::NotFound(_) => {
            (StatusCode::NOT_FOUND, json!({ "error": error.to_string() }))
        }
        TemplateServiceError::InvalidSchema(details) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "error": "invalid form schema", "details": details }),
        ),
        TemplateServiceError::Repository(RepositoryError::Conflict) => (
            StatusCode::CONFLICT,
            json!({ "error": "form template already exists" }),
        ),
        TemplateServiceError::Repository(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": error.to_string() }),
        ),
    };
    (status, Json(payload)).into_response()
}

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{CreateUser, UpdateUser, UserChanges, UserId};
use super::repository::UserRepository;
use super::service::{UserService, UserServiceError};
use crate::admin::audit::{Actor, AuditRepository};
use crate::admin::extract::JsonBody;

pub fn user_router<R, A>(service: Arc<UserService<R, A>>) -> Router
where
    R: UserRepository + 'static,
    A: AuditRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/admin/users",
            get(list_handler::<R, A>).post(create_handler::<R, A>),
        )
        .route("/api/v1/admin/users/roles", get(roles_handler::<R, A>))
        .route(
            "/api/v1/admin/users/:user_id",
            get(detail_handler::<R, A>)
                .patch(update_handler::<R, A>)
                .delete(delete_handler::<R, A>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListQuery {
    #[serde(default)]
    pub(crate) search: Option<String>,
}

pub(crate) async fn list_handler<R, A>(
    State(service): State<Arc<UserService<R, A>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    R: UserRepository + 'static,
    A: AuditRepository + 'static,
{
    let result = match query.search.as_deref() {
        Some(search) => service.search_users(search),
        None => service.get_all_users(),
    };
    match result {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn roles_handler<R, A>(State(service): State<Arc<UserService<R, A>>>) -> Response
where
    R: UserRepository + 'static,
    A: AuditRepository + 'static,
{
    match service.role_breakdown() {
        Ok(counts) => (StatusCode::OK, Json(counts)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn detail_handler<R, A>(
    State(service): State<Arc<UserService<R, A>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: UserRepository + 'static,
    A: AuditRepository + 'static,
{
    let id = UserId(user_id);
    match service.get_user_by_id(&id) {
        Ok(Some(user)) => (StatusCode::OK, Json(user)).into_response(),
        Ok(None) => error_response(UserServiceError::NotFound(id)),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_handler<R, A>(
    State(service): State<Arc<UserService<R, A>>>,
    actor: Actor,
    JsonBody(request): JsonBody<CreateUser>,
) -> Response
where
    R: UserRepository + 'static,
    A: AuditRepository + 'static,
{
    match service.create_user(request, &actor) {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_handler<R, A>(
    State(service): State<Arc<UserService<R, A>>>,
    Path(user_id): Path<String>,
    actor: Actor,
    JsonBody(changes): JsonBody<UserChanges>,
) -> Response
where
    R: UserRepository + 'static,
    A: AuditRepository + 'static,
{
    let update = UpdateUser {
        id: UserId(user_id),
        changes,
    };
    match service.update_user(update, &actor) {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_handler<R, A>(
    State(service): State<Arc<UserService<R, A>>>,
    Path(user_id): Path<String>,
    actor: Actor,
) -> Response
where
    R: UserRepository + 'static,
    A: AuditRepository + 'static,
{
    match service.delete_user(&UserId(user_id), &actor) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(error: UserServiceError) -> Response {
    let status = match &error {
        UserServiceError::DuplicateEmail(_) => StatusCode::CONFLICT,
        UserServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        UserServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

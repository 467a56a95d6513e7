
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::admin::audit::{Actor, AuditLogService, NewAuditLogEntry};
use crate::admin::memory::{InMemoryAuditRepository, InMemoryUserRepository};
use crate::admin::users::{
    CreateUser, EmailAddress, Password, User, UserId, UserRepository, UserRole,
};

/// Audit store wired to a user directory holding one officer, Maria Santos.
fn service_with_directory() -> (
    AuditLogService<InMemoryAuditRepository>,
    Arc<InMemoryAuditRepository>,
    User,
) {
    let users = Arc::new(InMemoryUserRepository::default());
    let maria = users
        .create(
            CreateUser {
                email: EmailAddress::parse("maria@brgy.ph").expect("valid"),
                password: Password::new("pass-1234"),
                role: UserRole::Officer,
                first_name: "Maria".to_string(),
                last_name: "Santos".to_string(),
                phone_number: None,
            }
            .into(),
        )
        .expect("user stored");

    let audit = Arc::new(InMemoryAuditRepository::with_directory(users));
    (AuditLogService::new(audit.clone()), audit, maria)
}

fn entry(action: &str, entity_type: &str, entity_id: &str, actor: &Actor) -> NewAuditLogEntry {
    NewAuditLogEntry {
        action: action.to_string(),
        entity_type: entity_type.to_string(),
        entity_id: entity_id.to_string(),
        user_id: actor.user_id.clone(),
        actor_role: actor.role,
        old_value: None,
        new_value: None,
        ip_address: None,
        user_agent: None,
    }
}

fn officer(user: &User) -> Actor {
    Actor::user(user.id.clone(), user.role)
}

fn staff() -> Actor {
    Actor::user(UserId("usr-staff".to_string()), UserRole::Staff)
}

async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::admin::audit::Actor;
use crate::admin::memory::{InMemoryAuditRepository, InMemoryUserRepository};
use crate::admin::repository::RepositoryError;
use crate::admin::users::{
    user_router, CreateUser, EmailAddress, NewUser, Password, UpdateUser, User, UserId,
    UserListItem, UserRepository, UserRole, UserService,
};

pub(super) fn create_request(email: &str, role: UserRole) -> CreateUser {
    let (first_name, last_name) = email
        .split_once('@')
        .map(|(local, _)| (local.to_string(), "Santos".to_string()))
        .unwrap_or_default();
    CreateUser {
        email: EmailAddress::parse(email).expect("valid email"),
        password: Password::new("correct horse battery staple"),
        role,
        first_name,
        last_name,
        phone_number: None,
    }
}

pub(super) fn admin() -> Actor {
    Actor::user(UserId("usr-admin".to_string()), UserRole::Admin)
}

pub(super) type MemoryService = UserService<InMemoryUserRepository, InMemoryAuditRepository>;

pub(super) fn build_service() -> (MemoryService, Arc<InMemoryAuditRepository>) {
    let audit = Arc::new(InMemoryAuditRepository::default());
    let service = UserService::new(Arc::new(InMemoryUserRepository::default()), audit.clone());
    (service, audit)
}

pub(super) fn router_with_service(service: MemoryService) -> axum::Router {
    user_router(Arc::new(service))
}

/// Wraps the in-memory store and counts email lookups.
#[derive(Default)]
pub(super) struct CountingRepository {
    pub(super) inner: InMemoryUserRepository,
    pub(super) email_lookups: AtomicUsize,
}

impl CountingRepository {
    pub(super) fn email_lookups(&self) -> usize {
        self.email_lookups.load(Ordering::Relaxed)
    }
}

impl UserRepository for CountingRepository {
    fn find_all(&self) -> Result<Vec<UserListItem>, RepositoryError> {
        self.inner.find_all()
    }

    fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        self.inner.find_by_id(id)
    }

    fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, RepositoryError> {
        self.email_lookups.fetch_add(1, Ordering::Relaxed);
        self.inner.find_by_email(email)
    }

    fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        self.inner.create(user)
    }

    fn update(&self, update: UpdateUser) -> Result<User, RepositoryError> {
        self.inner.update(update)
    }

    fn delete(&self, id: &UserId) -> Result<(), RepositoryError> {
        self.inner.delete(id)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

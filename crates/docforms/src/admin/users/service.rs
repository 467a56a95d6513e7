use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use super::domain::{
    CreateUser, EmailAddress, NewUser, UpdateUser, User, UserId, UserListItem, UserRole,
};
use super::repository::UserRepository;
use crate::admin::audit::recorder::snapshot;
use crate::admin::audit::{Actor, AuditAction, AuditRecorder, AuditRepository};
use crate::admin::repository::RepositoryError;

/// Lifecycle rules around accounts, keyed on email the way templates are keyed on slug.
pub struct UserService<R, A> {
    repository: Arc<R>,
    audit: AuditRecorder<A>,
}

impl<R, A> UserService<R, A>
where
    R: UserRepository + 'static,
    A: AuditRepository + 'static,
{
    pub fn new(repository: Arc<R>, audit: Arc<A>) -> Self {
        Self {
            repository,
            audit: AuditRecorder::new(audit),
        }
    }

    pub fn get_all_users(&self) -> Result<Vec<UserListItem>, UserServiceError> {
        Ok(self.repository.find_all()?)
    }

    pub fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_id(id)?)
    }

    pub fn search_users(&self, query: &str) -> Result<Vec<UserListItem>, UserServiceError> {
        let users = self.repository.find_all()?;
        Ok(users
            .into_iter()
            .filter(|user| user.matches_search(query))
            .collect())
    }

    /// Head count per role; every role is present even when zero.
    pub fn role_breakdown(&self) -> Result<BTreeMap<UserRole, usize>, UserServiceError> {
        let mut counts: BTreeMap<UserRole, usize> =
            UserRole::ALL.iter().map(|role| (*role, 0)).collect();
        for user in self.repository.find_all()? {
            *counts.entry(user.role).or_default() += 1;
        }
        Ok(counts)
    }

    pub fn create_user(
        &self,
        request: CreateUser,
        actor: &Actor,
    ) -> Result<User, UserServiceError> {
        if self.repository.find_by_email(&request.email)?.is_some() {
            debug!(email = %request.email, "rejecting duplicate user email");
            return Err(UserServiceError::DuplicateEmail(request.email));
        }

        let email = request.email.clone();
        let created = self
            .repository
            .create(NewUser::from(request))
            .map_err(|err| duplicate_as(err, &email))?;

        info!(user_id = %created.id, role = %created.role, "user created");
        self.audit.record(
            AuditAction::UserCreated,
            &created.id.0,
            actor,
            None,
            snapshot(&created),
        );
        Ok(created)
    }

    /// Uniqueness is re-checked only when the email actually changes.
    pub fn update_user(&self, update: UpdateUser, actor: &Actor) -> Result<User, UserServiceError> {
        let existing = self.require(&update.id)?;

        if let Some(email) = update
            .changes
            .email
            .as_ref()
            .filter(|email| **email != existing.email)
        {
            if self.repository.find_by_email(email)?.is_some() {
                debug!(user_id = %existing.id, email = %email, "rejecting email already in use");
                return Err(UserServiceError::DuplicateEmail(email.clone()));
            }
        }

        let id = update.id.clone();
        let email = update.changes.email.clone();
        let updated = self.repository.update(update).map_err(|err| match err {
            RepositoryError::NotFound => UserServiceError::NotFound(id.clone()),
            RepositoryError::Conflict => match &email {
                Some(email) => UserServiceError::DuplicateEmail(email.clone()),
                None => RepositoryError::Conflict.into(),
            },
            other => other.into(),
        })?;

        info!(user_id = %updated.id, "user updated");
        self.audit.record(
            AuditAction::UserUpdated,
            &updated.id.0,
            actor,
            snapshot(&existing),
            snapshot(&updated),
        );
        Ok(updated)
    }

    pub fn delete_user(&self, id: &UserId, actor: &Actor) -> Result<(), UserServiceError> {
        let existing = self.require(id)?;

        self.repository.delete(id).map_err(|err| match err {
            RepositoryError::NotFound => UserServiceError::NotFound(id.clone()),
            other => other.into(),
        })?;

        info!(user_id = %id, "user deleted");
        self.audit.record(
            AuditAction::UserDeleted,
            &id.0,
            actor,
            snapshot(&existing),
            None,
        );
        Ok(())
    }

    fn require(&self, id: &UserId) -> Result<User, UserServiceError> {
        self.repository
            .find_by_id(id)?
            .ok_or_else(|| UserServiceError::NotFound(id.clone()))
    }
}

fn duplicate_as(err: RepositoryError, email: &EmailAddress) -> UserServiceError {
    match err {
        RepositoryError::Conflict => UserServiceError::DuplicateEmail(email.clone()),
        other => other.into(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("user with email \"{0}\" already exists")]
    DuplicateEmail(EmailAddress),
    #[error("user with id \"{0}\" not found")]
    NotFound(UserId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

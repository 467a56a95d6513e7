//! Process-local stores backing the API binary, demos, and tests.
//!
//! Each store enforces its uniqueness constraint under the same lock as the write, which
//! is the persistence-boundary guarantee the lifecycle services rely on.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use super::audit::{
    AuditLogEntry, AuditLogFilter, AuditLogId, AuditLogListItem, AuditRepository,
    NewAuditLogEntry,
};
use super::forms::{
    FormTemplate, FormTemplateRepository, NewFormTemplate, Slug, TemplateId, UpdateFormTemplate,
};
use super::repository::RepositoryError;
use super::users::{EmailAddress, NewUser, UpdateUser, User, UserId, UserListItem, UserRepository};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store lock poisoned".to_string()))
}

fn next_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

/// Templates in creation order.
#[derive(Default, Clone)]
pub struct InMemoryFormTemplateRepository {
    templates: Arc<Mutex<Vec<FormTemplate>>>,
}

impl FormTemplateRepository for InMemoryFormTemplateRepository {
    fn find_all(&self) -> Result<Vec<FormTemplate>, RepositoryError> {
        Ok(lock(&self.templates)?.clone())
    }

    fn find_by_id(&self, id: &TemplateId) -> Result<Option<FormTemplate>, RepositoryError> {
        let guard = lock(&self.templates)?;
        Ok(guard.iter().find(|template| &template.id == id).cloned())
    }

    fn find_by_slug(&self, slug: &Slug) -> Result<Option<FormTemplate>, RepositoryError> {
        let guard = lock(&self.templates)?;
        Ok(guard.iter().find(|template| &template.slug == slug).cloned())
    }

    fn create(&self, template: NewFormTemplate) -> Result<FormTemplate, RepositoryError> {
        let mut guard = lock(&self.templates)?;
        if guard.iter().any(|existing| existing.slug == template.slug) {
            return Err(RepositoryError::Conflict);
        }
        let created = FormTemplate::from_new(TemplateId(next_id("tpl")), template, Utc::now());
        guard.push(created.clone());
        Ok(created)
    }

    fn update(&self, update: UpdateFormTemplate) -> Result<FormTemplate, RepositoryError> {
        let mut guard = lock(&self.templates)?;
        let template = guard
            .iter_mut()
            .find(|template| template.id == update.id)
            .ok_or(RepositoryError::NotFound)?;
        template.apply(&update.changes, Utc::now());
        Ok(template.clone())
    }

    fn delete(&self, id: &TemplateId) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.templates)?;
        let index = guard
            .iter()
            .position(|template| &template.id == id)
            .ok_or(RepositoryError::NotFound)?;
        guard.remove(index);
        Ok(())
    }

    fn toggle_active(
        &self,
        id: &TemplateId,
        is_active: bool,
    ) -> Result<FormTemplate, RepositoryError> {
        let mut guard = lock(&self.templates)?;
        let template = guard
            .iter_mut()
            .find(|template| &template.id == id)
            .ok_or(RepositoryError::NotFound)?;
        template.is_active = is_active;
        template.updated_at = Utc::now();
        Ok(template.clone())
    }
}

/// Accounts in creation order. Passwords are accepted and dropped; credential storage
/// belongs to the authentication subsystem.
#[derive(Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<Mutex<Vec<User>>>,
}

impl UserRepository for InMemoryUserRepository {
    fn find_all(&self) -> Result<Vec<UserListItem>, RepositoryError> {
        Ok(lock(&self.users)?.iter().map(User::list_item).collect())
    }

    fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let guard = lock(&self.users)?;
        Ok(guard.iter().find(|user| &user.id == id).cloned())
    }

    fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, RepositoryError> {
        let guard = lock(&self.users)?;
        Ok(guard.iter().find(|user| &user.email == email).cloned())
    }

    fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut guard = lock(&self.users)?;
        if guard.iter().any(|existing| existing.email == user.email) {
            return Err(RepositoryError::Conflict);
        }
        let created = User::from_new(UserId(next_id("usr")), user, Utc::now());
        guard.push(created.clone());
        Ok(created)
    }

    fn update(&self, update: UpdateUser) -> Result<User, RepositoryError> {
        let mut guard = lock(&self.users)?;
        if let Some(email) = &update.changes.email {
            if guard
                .iter()
                .any(|user| &user.email == email && user.id != update.id)
            {
                return Err(RepositoryError::Conflict);
            }
        }
        let user = guard
            .iter_mut()
            .find(|user| user.id == update.id)
            .ok_or(RepositoryError::NotFound)?;
        user.apply(&update.changes, Utc::now());
        Ok(user.clone())
    }

    fn delete(&self, id: &UserId) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.users)?;
        let index = guard
            .iter()
            .position(|user| &user.id == id)
            .ok_or(RepositoryError::NotFound)?;
        guard.remove(index);
        Ok(())
    }
}

/// Append-only log, listed newest first. User names are resolved through the optional
/// directory so list items and free-text search can show who acted.
#[derive(Default, Clone)]
pub struct InMemoryAuditRepository {
    entries: Arc<Mutex<Vec<AuditLogEntry>>>,
    directory: Option<Arc<dyn UserRepository>>,
}

impl InMemoryAuditRepository {
    pub fn with_directory(directory: Arc<dyn UserRepository>) -> Self {
        Self {
            entries: Arc::default(),
            directory: Some(directory),
        }
    }

    /// Every stored entry in insertion order.
    pub fn entries(&self) -> Result<Vec<AuditLogEntry>, RepositoryError> {
        Ok(lock(&self.entries)?.clone())
    }

    fn user_name(&self, user_id: Option<&UserId>) -> Option<String> {
        let (directory, user_id) = (self.directory.as_ref()?, user_id?);
        directory
            .find_by_id(user_id)
            .ok()
            .flatten()
            .map(|user| user.full_name())
    }
}

impl AuditRepository for InMemoryAuditRepository {
    fn find_all(
        &self,
        filter: Option<&AuditLogFilter>,
    ) -> Result<Vec<AuditLogListItem>, RepositoryError> {
        let entries = lock(&self.entries)?.clone();
        Ok(entries
            .iter()
            .rev()
            .filter_map(|entry| {
                let user_name = self.user_name(entry.user_id.as_ref());
                let keep =
                    filter.map_or(true, |filter| filter.matches(entry, user_name.as_deref()));
                keep.then(|| entry.list_item(user_name))
            })
            .collect())
    }

    fn find_by_id(&self, id: &AuditLogId) -> Result<Option<AuditLogEntry>, RepositoryError> {
        let guard = lock(&self.entries)?;
        Ok(guard.iter().find(|entry| &entry.id == id).cloned())
    }

    fn create(&self, entry: NewAuditLogEntry) -> Result<AuditLogEntry, RepositoryError> {
        let stored = AuditLogEntry::from_new(AuditLogId(next_id("log")), entry, Utc::now());
        lock(&self.entries)?.push(stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::audit::{Actor, AuditAction};

    #[test]
    fn poisoned_audit_store_reports_unavailable() {
        let repository = InMemoryAuditRepository::default();
        repository
            .create(NewAuditLogEntry::for_action(
                AuditAction::FormCreated,
                "tpl-1",
                &Actor::system(),
            ))
            .expect("stored");

        let entries = Arc::clone(&repository.entries);
        let _ = std::thread::spawn(move || {
            let _guard = entries.lock().expect("first lock");
            panic!("poison the store");
        })
        .join();

        assert!(matches!(
            repository.entries(),
            Err(RepositoryError::Unavailable(_))
        ));
        assert!(repository.find_all(None).is_err());
    }
}

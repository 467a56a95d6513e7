use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::admin::audit::{Actor, AuditLogEntry, AuditRepository};
use crate::admin::forms::field::{FieldDefinition, FieldKind, NumberRules, TextRules};
use crate::admin::forms::repository::FormTemplateRepository;
use crate::admin::forms::schema::FormSchema;
use crate::admin::forms::template::{
    CreateFormTemplate, FormTemplate, NewFormTemplate, Slug, TemplateId, UpdateFormTemplate,
};
use crate::admin::forms::{form_template_router, FormTemplateService};
use crate::admin::memory::{InMemoryAuditRepository, InMemoryFormTemplateRepository};
use crate::admin::repository::RepositoryError;
use crate::admin::users::{UserId, UserRole};

pub(super) fn clearance_schema() -> FormSchema {
    FormSchema::new("barangay-clearance", "Barangay Clearance")
        .with_field(FieldDefinition::new("full_name", "Full name", FieldKind::text()).required())
        .with_field(
            FieldDefinition::new(
                "household",
                "Household members",
                FieldKind::Number {
                    validation: Some(NumberRules {
                        min: Some(0.0),
                        max: Some(10.0),
                        message: None,
                    }),
                },
            ),
        )
        .with_field(FieldDefinition::new(
            "purpose",
            "Purpose",
            FieldKind::select(["a", "b"]),
        ))
        .with_field(FieldDefinition::new(
            "precinct",
            "Precinct code",
            FieldKind::Text {
                validation: Some(TextRules {
                    min_length: Some(2),
                    max_length: Some(6),
                    pattern: Some("^[A-Z0-9]+$".to_string()),
                    message: Some("Use uppercase letters and digits".to_string()),
                }),
            },
        ))
}

pub(super) fn email_schema() -> FormSchema {
    FormSchema::new("contact", "Contact")
        .with_field(FieldDefinition::new("f1", "Email", FieldKind::email()).required())
}

pub(super) fn create_request(slug: &str) -> CreateFormTemplate {
    CreateFormTemplate {
        name: "Barangay Clearance".to_string(),
        slug: Slug::parse(slug).expect("valid slug"),
        description: Some("Clearance for employment and ID applications".to_string()),
        schema: clearance_schema(),
        requires_approval: true,
    }
}

pub(super) fn admin() -> Actor {
    Actor::user(UserId("usr-admin".to_string()), UserRole::Admin)
}

pub(super) type MemoryService =
    FormTemplateService<InMemoryFormTemplateRepository, InMemoryAuditRepository>;

pub(super) fn build_service() -> (
    MemoryService,
    Arc<InMemoryFormTemplateRepository>,
    Arc<InMemoryAuditRepository>,
) {
    let repository = Arc::new(InMemoryFormTemplateRepository::default());
    let audit = Arc::new(InMemoryAuditRepository::default());
    let service = FormTemplateService::new(repository.clone(), audit.clone());
    (service, repository, audit)
}

pub(super) fn router_with_service(service: MemoryService) -> axum::Router {
    form_template_router(Arc::new(service))
}

/// Stands in for a store whose lookups miss a concurrent insert: `find_by_slug` never
/// sees anything, but the unique constraint still fires on `create`.
#[derive(Default)]
pub(super) struct RacingRepository {
    pub(super) inner: InMemoryFormTemplateRepository,
}

impl FormTemplateRepository for RacingRepository {
    fn find_all(&self) -> Result<Vec<FormTemplate>, RepositoryError> {
        self.inner.find_all()
    }

    fn find_by_id(&self, id: &TemplateId) -> Result<Option<FormTemplate>, RepositoryError> {
        self.inner.find_by_id(id)
    }

    fn find_by_slug(&self, _slug: &Slug) -> Result<Option<FormTemplate>, RepositoryError> {
        Ok(None)
    }

    fn create(&self, template: NewFormTemplate) -> Result<FormTemplate, RepositoryError> {
        self.inner.create(template)
    }

    fn update(&self, update: UpdateFormTemplate) -> Result<FormTemplate, RepositoryError> {
        self.inner.update(update)
    }

    fn delete(&self, id: &TemplateId) -> Result<(), RepositoryError> {
        self.inner.delete(id)
    }

    fn toggle_active(
        &self,
        id: &TemplateId,
        is_active: bool,
    ) -> Result<FormTemplate, RepositoryError> {
        self.inner.toggle_active(id, is_active)
    }
}

pub(super) struct UnavailableRepository;

impl FormTemplateRepository for UnavailableRepository {
    fn find_all(&self) -> Result<Vec<FormTemplate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_id(&self, _id: &TemplateId) -> Result<Option<FormTemplate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_slug(&self, _slug: &Slug) -> Result<Option<FormTemplate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn create(&self, _template: NewFormTemplate) -> Result<FormTemplate, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _update: UpdateFormTemplate) -> Result<FormTemplate, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &TemplateId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn toggle_active(
        &self,
        _id: &TemplateId,
        _is_active: bool,
    ) -> Result<FormTemplate, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Audit store that refuses every append and counts the attempts.
#[derive(Default)]
pub(super) struct FailingAudit {
    pub(super) attempts: AtomicUsize,
}

impl AuditRepository for FailingAudit {
    fn find_all(
        &self,
        _filter: Option<&crate::admin::audit::AuditLogFilter>,
    ) -> Result<Vec<crate::admin::audit::AuditLogListItem>, RepositoryError> {
        Ok(Vec::new())
    }

    fn find_by_id(
        &self,
        _id: &crate::admin::audit::AuditLogId,
    ) -> Result<Option<AuditLogEntry>, RepositoryError> {
        Ok(None)
    }

    fn create(
        &self,
        _entry: crate::admin::audit::NewAuditLogEntry,
    ) -> Result<AuditLogEntry, RepositoryError> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        Err(RepositoryError::Unavailable("audit sink offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

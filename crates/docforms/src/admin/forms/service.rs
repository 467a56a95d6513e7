use std::sync::Arc;

use tracing::{debug, info};

use super::repository::FormTemplateRepository;
use super::schema::SchemaErrors;
use super::template::{
    CreateFormTemplate, FormTemplate, NewFormTemplate, Slug, TemplateId, UpdateFormTemplate,
};
use super::validation::{self, Submission, ValidationReport};
use crate::admin::audit::recorder::snapshot;
use crate::admin::audit::{Actor, AuditAction, AuditRecorder, AuditRepository};
use crate::admin::repository::RepositoryError;

/// Lifecycle rules around templates: slug uniqueness, existence checks, schema integrity.
pub struct FormTemplateService<R, A> {
    repository: Arc<R>,
    audit: AuditRecorder<A>,
}

impl<R, A> FormTemplateService<R, A>
where
    R: FormTemplateRepository + 'static,
    A: AuditRepository + 'static,
{
    pub fn new(repository: Arc<R>, audit: Arc<A>) -> Self {
        Self {
            repository,
            audit: AuditRecorder::new(audit),
        }
    }

    pub fn get_all_templates(&self) -> Result<Vec<FormTemplate>, TemplateServiceError> {
        Ok(self.repository.find_all()?)
    }

    /// Absence is a normal outcome here, not an error.
    pub fn get_template_by_id(
        &self,
        id: &TemplateId,
    ) -> Result<Option<FormTemplate>, TemplateServiceError> {
        Ok(self.repository.find_by_id(id)?)
    }

    pub fn create_template(
        &self,
        request: CreateFormTemplate,
        actor: &Actor,
    ) -> Result<FormTemplate, TemplateServiceError> {
        request
            .schema
            .validate()
            .map_err(TemplateServiceError::InvalidSchema)?;

        if self.repository.find_by_slug(&request.slug)?.is_some() {
            debug!(slug = %request.slug, "rejecting duplicate template slug");
            return Err(TemplateServiceError::DuplicateSlug(request.slug));
        }

        let slug = request.slug.clone();
        let template = NewFormTemplate::from_request(request, actor.attribution());
        let created = self.repository.create(template).map_err(|err| match err {
            RepositoryError::Conflict => TemplateServiceError::DuplicateSlug(slug),
            other => other.into(),
        })?;

        info!(template_id = %created.id, slug = %created.slug, "form template created");
        self.audit.record(
            AuditAction::FormCreated,
            &created.id.0,
            actor,
            None,
            snapshot(&created),
        );
        Ok(created)
    }

    pub fn update_template(
        &self,
        update: UpdateFormTemplate,
        actor: &Actor,
    ) -> Result<FormTemplate, TemplateServiceError> {
        let existing = self.require(&update.id)?;

        if let Some(schema) = &update.changes.schema {
            schema.validate().map_err(TemplateServiceError::InvalidSchema)?;
        }

        let id = update.id.clone();
        let updated = self
            .repository
            .update(update)
            .map_err(|err| not_found_as(err, &id))?;

        info!(template_id = %updated.id, "form template updated");
        self.audit.record(
            AuditAction::FormUpdated,
            &updated.id.0,
            actor,
            snapshot(&existing),
            snapshot(&updated),
        );
        Ok(updated)
    }

    pub fn delete_template(
        &self,
        id: &TemplateId,
        actor: &Actor,
    ) -> Result<(), TemplateServiceError> {
        let existing = self.require(id)?;

        self.repository
            .delete(id)
            .map_err(|err| not_found_as(err, id))?;

        info!(template_id = %id, slug = %existing.slug, "form template deleted");
        self.audit.record(
            AuditAction::FormDeleted,
            &id.0,
            actor,
            snapshot(&existing),
            None,
        );
        Ok(())
    }

    /// Show or hide a template without deleting it.
    pub fn toggle_template_active(
        &self,
        id: &TemplateId,
        is_active: bool,
        actor: &Actor,
    ) -> Result<FormTemplate, TemplateServiceError> {
        let existing = self.require(id)?;

        let toggled = self
            .repository
            .toggle_active(id, is_active)
            .map_err(|err| not_found_as(err, id))?;

        let action = if is_active {
            AuditAction::FormActivated
        } else {
            AuditAction::FormDeactivated
        };
        info!(template_id = %id, is_active, "form template visibility changed");
        self.audit.record(
            action,
            &id.0,
            actor,
            snapshot(&existing),
            snapshot(&toggled),
        );
        Ok(toggled)
    }

    /// Run the validation engine against a stored, active template.
    pub fn validate_submission(
        &self,
        id: &TemplateId,
        submission: &Submission,
    ) -> Result<ValidationReport, TemplateServiceError> {
        let template = self.require(id)?;
        if !template.is_active {
            return Err(TemplateServiceError::Inactive(template.slug));
        }
        Ok(validation::validate(&template.schema, submission))
    }

    fn require(&self, id: &TemplateId) -> Result<FormTemplate, TemplateServiceError> {
        self.repository
            .find_by_id(id)?
            .ok_or_else(|| TemplateServiceError::NotFound(id.clone()))
    }
}

fn not_found_as(err: RepositoryError, id: &TemplateId) -> TemplateServiceError {
    match err {
        RepositoryError::NotFound => TemplateServiceError::NotFound(id.clone()),
        other => other.into(),
    }
}

/// Rejections raised by the template lifecycle service.
#[derive(Debug, thiserror::Error)]
pub enum TemplateServiceError {
    #[error("form template with slug \"{0}\" already exists")]
    DuplicateSlug(Slug),
    #[error("form template with id \"{0}\" not found")]
    NotFound(TemplateId),
    #[error("form template \"{0}\" is not accepting submissions")]
    Inactive(Slug),
    #[error("invalid form schema: {0}")]
    InvalidSchema(SchemaErrors),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

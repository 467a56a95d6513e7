use super::template::{FormTemplate, NewFormTemplate, Slug, TemplateId, UpdateFormTemplate};
use crate::admin::repository::RepositoryError;

/// Storage abstraction for templates.
///
/// Implementations must enforce slug uniqueness themselves and report a collision as
/// [`RepositoryError::Conflict`]; the service-level lookup is only an early reject.
pub trait FormTemplateRepository: Send + Sync {
    fn find_all(&self) -> Result<Vec<FormTemplate>, RepositoryError>;
    fn find_by_id(&self, id: &TemplateId) -> Result<Option<FormTemplate>, RepositoryError>;
    fn find_by_slug(&self, slug: &Slug) -> Result<Option<FormTemplate>, RepositoryError>;
    fn create(&self, template: NewFormTemplate) -> Result<FormTemplate, RepositoryError>;
    fn update(&self, update: UpdateFormTemplate) -> Result<FormTemplate, RepositoryError>;
    fn delete(&self, id: &TemplateId) -> Result<(), RepositoryError>;
    fn toggle_active(
        &self,
        id: &TemplateId,
        is_active: bool,
    ) -> Result<FormTemplate, RepositoryError>;
}

//! Form templates: the field model, schema integrity rules, the submission validation
//! engine, and the lifecycle service that keeps slugs unique.

pub mod field;
pub mod repository;
pub mod router;
pub mod schema;
pub mod service;
pub mod template;
pub mod validation;

#[cfg(test)]
mod tests;

pub use field::{
    DateRules, DefaultValue, FieldDefinition, FieldKind, FieldType, NumberRules, TextRules,
};
pub use repository::FormTemplateRepository;
pub use router::form_template_router;
pub use schema::{validate_schema, FormSchema, SchemaError, SchemaErrors};
pub use service::{FormTemplateService, TemplateServiceError};
pub use template::{
    CreateFormTemplate, FormTemplate, NewFormTemplate, Slug, SlugError, TemplateChanges,
    TemplateId, UpdateFormTemplate,
};
pub use validation::{
    validate, validate_field, FieldError, FieldErrorKind, FileReference, Submission,
    SubmissionValue, ValidationReport,
};

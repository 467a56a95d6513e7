use metrics_exporter_prometheus::PrometheusHandle;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use docforms::admin::audit::{Actor, AuditLogService};
use docforms::admin::forms::{
    CreateFormTemplate, DateRules, FieldDefinition, FieldKind, FormSchema, FormTemplateService,
    NumberRules, Slug, SlugError, TemplateServiceError, TextRules,
};
use docforms::admin::memory::{
    InMemoryAuditRepository, InMemoryFormTemplateRepository, InMemoryUserRepository,
};
use docforms::admin::users::UserService;
use docforms::error::AppError;
use tracing::{debug, info};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type TemplateService =
    FormTemplateService<InMemoryFormTemplateRepository, InMemoryAuditRepository>;
pub(crate) type AccountService = UserService<InMemoryUserRepository, InMemoryAuditRepository>;
pub(crate) type AuditService = AuditLogService<InMemoryAuditRepository>;

/// The three admin services sharing one process-local audit trail.
#[derive(Clone)]
pub(crate) struct AdminServices {
    pub(crate) templates: Arc<TemplateService>,
    pub(crate) users: Arc<AccountService>,
    pub(crate) audit_log: Arc<AuditService>,
    pub(crate) audit: Arc<InMemoryAuditRepository>,
}

impl AdminServices {
    pub(crate) fn in_memory() -> Self {
        let users = Arc::new(InMemoryUserRepository::default());
        let audit = Arc::new(InMemoryAuditRepository::with_directory(users.clone()));
        let templates = Arc::new(InMemoryFormTemplateRepository::default());

        Self {
            templates: Arc::new(FormTemplateService::new(templates, audit.clone())),
            users: Arc::new(UserService::new(users, audit.clone())),
            audit_log: Arc::new(AuditLogService::new(audit.clone())),
            audit,
        }
    }
}

/// Document-request templates offered out of the box in development.
pub(crate) fn sample_templates() -> Result<Vec<CreateFormTemplate>, SlugError> {
    let clearance = FormSchema::new("barangay-clearance", "Barangay Clearance")
        .with_description("Required for employment, loans, and government IDs")
        .with_field(FieldDefinition::new("full_name", "Full name", FieldKind::text()).required())
        .with_field(
            FieldDefinition::new("birth_date", "Date of birth", FieldKind::date()).required(),
        )
        .with_field(
            FieldDefinition::new(
                "years_of_residency",
                "Years of residency",
                FieldKind::Number {
                    validation: Some(NumberRules {
                        min: Some(0.0),
                        max: Some(120.0),
                        message: None,
                    }),
                },
            )
            .required(),
        )
        .with_field(
            FieldDefinition::new(
                "purpose",
                "Purpose",
                FieldKind::select(["Employment", "Loan", "Government ID", "Travel"]),
            )
            .required(),
        )
        .with_field(FieldDefinition::new("contact", "Mobile number", FieldKind::phone()));

    let indigency = FormSchema::new("certificate-of-indigency", "Certificate of Indigency")
        .with_field(FieldDefinition::new("full_name", "Full name", FieldKind::text()).required())
        .with_field(FieldDefinition::new("email", "Email address", FieldKind::email()))
        .with_field(
            FieldDefinition::new(
                "monthly_income",
                "Monthly household income",
                FieldKind::Number {
                    validation: Some(NumberRules {
                        min: Some(0.0),
                        max: None,
                        message: Some("Income cannot be negative".to_string()),
                    }),
                },
            )
            .required(),
        )
        .with_field(
            FieldDefinition::new(
                "assistance",
                "Assistance type",
                FieldKind::radio(["Medical", "Burial", "Educational"]),
            )
            .required(),
        )
        .with_field(FieldDefinition::new("proof", "Proof of income", FieldKind::File));

    let business = FormSchema::new("business-permit", "Barangay Business Clearance")
        .with_field(
            FieldDefinition::new("business_name", "Business name", FieldKind::text()).required(),
        )
        .with_field(
            FieldDefinition::new(
                "dti_number",
                "DTI registration number",
                FieldKind::Text {
                    validation: Some(TextRules {
                        min_length: Some(6),
                        max_length: Some(12),
                        pattern: Some("^[0-9]+$".to_string()),
                        message: Some("Use the digits printed on the DTI certificate".to_string()),
                    }),
                },
            )
            .required(),
        )
        .with_field(FieldDefinition::new(
            "start_date",
            "Start of operations",
            FieldKind::Date {
                validation: Some(DateRules {
                    min: chrono::NaiveDate::from_ymd_opt(1950, 1, 1),
                    max: None,
                    message: None,
                }),
            },
        ))
        .with_field(
            FieldDefinition::new(
                "declaration",
                "I certify that the information above is true",
                FieldKind::checkbox(Vec::<String>::new()),
            )
            .required(),
        );

    Ok(vec![
        CreateFormTemplate {
            name: "Barangay Clearance".to_string(),
            slug: Slug::parse("barangay-clearance")?,
            description: Some("General-purpose clearance".to_string()),
            schema: clearance,
            requires_approval: true,
        },
        CreateFormTemplate {
            name: "Certificate of Indigency".to_string(),
            slug: Slug::parse("certificate-of-indigency")?,
            description: Some("Proof of low income for assistance programs".to_string()),
            schema: indigency,
            requires_approval: true,
        },
        CreateFormTemplate {
            name: "Business Clearance".to_string(),
            slug: Slug::parse("business-permit")?,
            description: None,
            schema: business,
            requires_approval: false,
        },
    ])
}

/// Create every sample template that is not there yet. Returns how many were added.
pub(crate) fn seed_templates(service: &TemplateService) -> Result<usize, AppError> {
    let mut created = 0;
    for template in sample_templates()? {
        let slug = template.slug.clone();
        match service.create_template(template, &Actor::system()) {
            Ok(_) => created += 1,
            Err(TemplateServiceError::DuplicateSlug(_)) => {
                debug!(%slug, "sample template already present");
            }
            Err(err) => return Err(err.into()),
        }
    }
    info!(created, "sample templates seeded");
    Ok(created)
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_templates_have_valid_schemas() {
        let templates = sample_templates().expect("sample slugs are valid");
        assert_eq!(templates.len(), 3);
        for template in &templates {
            assert!(
                template.schema.validate().is_ok(),
                "{} has an invalid schema",
                template.slug
            );
        }
    }

    #[test]
    fn seeding_is_idempotent() {
        let services = AdminServices::in_memory();
        assert_eq!(seed_templates(&services.templates).expect("seeded"), 3);
        assert_eq!(seed_templates(&services.templates).expect("reseeded"), 0);
        assert_eq!(services.audit.entries().unwrap().len(), 3);
    }
}

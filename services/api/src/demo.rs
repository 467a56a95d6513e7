use crate::infra::{read_json, sample_templates, seed_templates, AdminServices};
use clap::Args;
use docforms::admin::audit::Actor;
use docforms::admin::forms::{
    validate, FieldKind, FileReference, FormSchema, FormTemplate, Slug, Submission,
    SubmissionValue, TemplateChanges, UpdateFormTemplate, ValidationReport,
};
use docforms::admin::users::{CreateUser, EmailAddress, Password, UserRole};
use docforms::error::AppError;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Form schema JSON file (formId, title, fields)
    #[arg(long)]
    pub(crate) schema: PathBuf,
    /// Submission JSON file keyed by field id
    #[arg(long)]
    pub(crate) submission: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Slug of the sample template to walk through
    #[arg(long, default_value = "barangay-clearance", value_parser = Slug::parse)]
    pub(crate) slug: Slug,
    /// Print the full audit entries, including snapshots
    #[arg(long)]
    pub(crate) verbose_audit: bool,
}

/// Offline engine run. The report is printed whether or not the submission is valid.
pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let schema: FormSchema = read_json(&args.schema)?;
    if let Err(errors) = schema.validate() {
        println!("Schema {} has structural problems:", schema.form_id);
        for error in errors.iter() {
            println!("  - {}", error);
        }
    }

    let submission: Submission = read_json(&args.submission)?;
    let report = validate(&schema, &submission);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let slug = args.slug;
    let services = AdminServices::in_memory();

    println!("Document forms admin demo");
    let email = match EmailAddress::parse("admin@barangay.gov.ph") {
        Ok(email) => email,
        Err(err) => {
            println!("  Admin email rejected: {}", err);
            return Ok(());
        }
    };
    let admin = match services.users.create_user(
        CreateUser {
            email,
            password: Password::new("change-me-on-first-login"),
            role: UserRole::Admin,
            first_name: "Ana".to_string(),
            last_name: "Villanueva".to_string(),
            phone_number: None,
        },
        &Actor::system(),
    ) {
        Ok(user) => user,
        Err(err) => {
            println!("  Admin account unavailable: {}", err);
            return Ok(());
        }
    };
    let actor = Actor::user(admin.id.clone(), admin.role);
    println!("- Signed in as {} ({})", admin.full_name(), admin.role);

    let request = sample_templates()?
        .into_iter()
        .find(|template| template.slug == slug);
    let Some(request) = request else {
        println!("  No sample template uses slug {}", slug);
        return Ok(());
    };

    let template = services.templates.create_template(request.clone(), &actor)?;
    print_template(&template);

    match services.templates.create_template(request, &actor) {
        Ok(_) => println!("  Unexpected: duplicate slug accepted"),
        Err(err) => println!("- Second create rejected: {}", err),
    }

    let seeded = seed_templates(&services.templates)?;
    println!("- Seeded {} more sample templates", seeded);

    let empty = Submission::new();
    let report = services.templates.validate_submission(&template.id, &empty)?;
    print_report("Empty submission", &report);

    let filled = sample_submission(&template);
    let report = services.templates.validate_submission(&template.id, &filled)?;
    print_report("Completed submission", &report);

    services.templates.update_template(
        UpdateFormTemplate {
            id: template.id.clone(),
            changes: TemplateChanges {
                description: Some("Updated during the demo".to_string()),
                ..TemplateChanges::default()
            },
        },
        &actor,
    )?;
    services
        .templates
        .toggle_template_active(&template.id, false, &actor)?;
    match services.templates.validate_submission(&template.id, &filled) {
        Ok(_) => println!("  Unexpected: inactive template accepted a submission"),
        Err(err) => println!("- After deactivation: {}", err),
    }

    println!("\nAudit trail (newest first)");
    let entries = match services.audit_log.get_audit_logs(None) {
        Ok(entries) => entries,
        Err(err) => {
            println!("  Audit trail unavailable: {}", err);
            return Ok(());
        }
    };
    for item in &entries {
        println!(
            "  - {} {} {} by {}",
            item.timestamp.format("%H:%M:%S"),
            item.action,
            item.entity_id,
            item.user_name.as_deref().unwrap_or("system")
        );
    }

    if args.verbose_audit {
        let payload = services
            .audit
            .entries()
            .map_err(|err| err.to_string())
            .and_then(|entries| {
                serde_json::to_string_pretty(&entries).map_err(|err| err.to_string())
            });
        match payload {
            Ok(json) => println!("{}", json),
            Err(err) => println!("  Audit payload unavailable: {}", err),
        }
    }

    Ok(())
}

fn print_template(template: &FormTemplate) {
    println!(
        "- Created template {} ({}) with {} fields",
        template.name,
        template.slug,
        template.schema.fields.len()
    );
    for field in &template.schema.fields {
        let marker = if field.required { "*" } else { " " };
        println!(
            "    {} {} [{}]",
            marker,
            field.label,
            field.field_type().label()
        );
    }
}

fn print_report(title: &str, report: &ValidationReport) {
    if report.valid {
        println!("- {}: valid", title);
        return;
    }
    println!("- {}: {} field(s) need attention", title, report.errors.len());
    for (field, error) in &report.errors {
        println!("    {} ({}): {}", field, error.code.code(), error.message);
    }
}

/// Fill every field with a value that satisfies the sample schemas.
fn sample_submission(template: &FormTemplate) -> Submission {
    template
        .schema
        .fields
        .iter()
        .map(|field| {
            let value = match &field.kind {
                FieldKind::Number { .. } => SubmissionValue::Number(4.0),
                FieldKind::Date { .. } => SubmissionValue::from("1990-05-14"),
                FieldKind::Email { .. } => SubmissionValue::from("resident@mail.ph"),
                FieldKind::Phone { .. } => SubmissionValue::from("+63 917 555 0101"),
                FieldKind::Select { options } | FieldKind::Radio { options } => options
                    .first()
                    .cloned()
                    .map(SubmissionValue::Text)
                    .unwrap_or(SubmissionValue::Bool(false)),
                FieldKind::Checkbox { options } if options.is_empty() => {
                    SubmissionValue::Bool(true)
                }
                FieldKind::Checkbox { options } => SubmissionValue::List(options.clone()),
                FieldKind::File => SubmissionValue::File(FileReference {
                    name: "valid-id.jpg".to_string(),
                    storage_key: None,
                    content_type: Some("image/jpeg".to_string()),
                    size_bytes: Some(120_000),
                }),
                FieldKind::Text { validation } | FieldKind::Textarea { validation } => {
                    match validation.as_ref().and_then(|rules| rules.pattern.as_deref()) {
                        Some("^[0-9]+$") => SubmissionValue::from("20481234"),
                        _ => SubmissionValue::from("Juan Dela Cruz"),
                    }
                }
            };
            (field.id.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docforms::admin::forms::FieldErrorKind;

    #[test]
    fn sample_submissions_satisfy_every_sample_template() {
        let services = AdminServices::in_memory();
        seed_templates(&services.templates).expect("seeded");

        let templates = services.templates.get_all_templates().expect("listing");
        assert_eq!(templates.len(), 3);
        for template in &templates {
            let report = services
                .templates
                .validate_submission(&template.id, &sample_submission(template))
                .expect("report");
            assert!(report.valid, "{}: {:?}", template.slug, report.errors);
        }
    }

    #[test]
    fn empty_submission_flags_required_fields() {
        let request = sample_templates()
            .expect("samples")
            .into_iter()
            .find(|template| template.slug.as_str() == "barangay-clearance")
            .expect("clearance sample");

        let report = validate(&request.schema, &Submission::new());
        assert_eq!(
            report.error_kind("full_name"),
            Some(FieldErrorKind::Required)
        );
        assert!(report.error_kind("contact").is_none());
    }
}

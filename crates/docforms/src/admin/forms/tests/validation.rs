use super::common::*;
use crate::admin::forms::field::{DateRules, FieldDefinition, FieldKind};
use crate::admin::forms::schema::FormSchema;
use crate::admin::forms::validation::{
    validate, validate_field, FieldErrorKind, FileReference, Submission, SubmissionValue,
};
use chrono::NaiveDate;

fn submission<const N: usize>(entries: [(&str, SubmissionValue); N]) -> Submission {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

#[test]
fn missing_required_field_is_the_only_error() {
    let report = validate(&clearance_schema(), &Submission::new());

    assert!(!report.valid);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.error_kind("full_name"), Some(FieldErrorKind::Required));
}

#[test]
fn whitespace_only_counts_as_missing() {
    let report = validate(
        &clearance_schema(),
        &submission([("full_name", "   ".into())]),
    );
    assert_eq!(report.error_kind("full_name"), Some(FieldErrorKind::Required));
}

#[test]
fn number_outside_bounds_is_a_range_error() {
    let report = validate(
        &clearance_schema(),
        &submission([
            ("full_name", "Juan".into()),
            ("household", SubmissionValue::Number(15.0)),
        ]),
    );

    assert_eq!(report.error_kind("household"), Some(FieldErrorKind::Range));
    assert_eq!(
        report.errors["household"].message,
        "Household members must be between 0 and 10"
    );
    assert_eq!(report.errors.len(), 1);
}

#[test]
fn numeric_text_is_parsed_and_garbage_is_rejected() {
    let schema = clearance_schema();
    let within = validate(
        &schema,
        &submission([("full_name", "Juan".into()), ("household", "4".into())]),
    );
    assert!(within.valid);

    let garbage = validate(
        &schema,
        &submission([("full_name", "Juan".into()), ("household", "four".into())]),
    );
    assert_eq!(garbage.error_kind("household"), Some(FieldErrorKind::InvalidType));
}

#[test]
fn select_accepts_only_declared_options() {
    let schema = clearance_schema();

    let rejected = validate(
        &schema,
        &submission([("full_name", "Juan".into()), ("purpose", "c".into())]),
    );
    assert_eq!(rejected.error_kind("purpose"), Some(FieldErrorKind::InvalidOption));

    let accepted = validate(
        &schema,
        &submission([("full_name", "Juan".into()), ("purpose", "a".into())]),
    );
    assert!(accepted.valid);
    assert!(accepted.errors.is_empty());
}

#[test]
fn email_field_reports_pattern_then_accepts_valid_address() {
    let schema = email_schema();

    let bad = validate(&schema, &submission([("f1", "not-an-email".into())]));
    assert!(!bad.valid);
    assert_eq!(bad.error_kind("f1"), Some(FieldErrorKind::Pattern));

    let good = validate(&schema, &submission([("f1", "a@b.com".into())]));
    assert!(good.valid);
    assert!(good.errors.is_empty());
}

#[test]
fn length_is_checked_before_pattern() {
    let schema = clearance_schema();
    let base = || submission([("full_name", SubmissionValue::from("Juan"))]);

    let mut short = base();
    short.insert("precinct".to_string(), "A".into());
    assert_eq!(
        validate(&schema, &short).error_kind("precinct"),
        Some(FieldErrorKind::Length)
    );

    let mut long = base();
    long.insert("precinct".to_string(), "ABCDEFG".into());
    assert_eq!(
        validate(&schema, &long).error_kind("precinct"),
        Some(FieldErrorKind::Length)
    );

    let mut lower = base();
    lower.insert("precinct".to_string(), "ab12".into());
    let report = validate(&schema, &lower);
    assert_eq!(report.error_kind("precinct"), Some(FieldErrorKind::Pattern));
    assert_eq!(
        report.errors["precinct"].message,
        "Use uppercase letters and digits"
    );

    let mut ok = base();
    ok.insert("precinct".to_string(), "0142A".into());
    assert!(validate(&schema, &ok).valid);
}

#[test]
fn unknown_keys_are_ignored() {
    let report = validate(
        &clearance_schema(),
        &submission([
            ("full_name", "Juan".into()),
            ("favourite_colour", "green".into()),
        ]),
    );
    assert!(report.valid);
}

#[test]
fn validation_is_deterministic() {
    let schema = clearance_schema();
    let data = submission([
        ("household", SubmissionValue::Number(99.0)),
        ("purpose", "z".into()),
        ("precinct", "x".into()),
    ]);

    let first = validate(&schema, &data);
    let second = validate(&schema, &data);
    assert_eq!(first, second);
    assert_eq!(
        first.errors.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["full_name", "household", "precinct", "purpose"]
    );
}

#[test]
fn optional_blank_fields_are_skipped() {
    let report = validate(
        &clearance_schema(),
        &submission([
            ("full_name", "Juan".into()),
            ("purpose", "".into()),
            ("precinct", " ".into()),
        ]),
    );
    assert!(report.valid);
}

#[test]
fn consent_checkbox_must_be_ticked_when_required() {
    let field = FieldDefinition::new(
        "consent",
        "I certify the above",
        FieldKind::checkbox(Vec::<String>::new()),
    )
    .required();

    assert_eq!(
        validate_field(&field, Some(&false.into())).map_err(|error| error.code),
        Err(FieldErrorKind::Required)
    );
    assert!(validate_field(&field, Some(&true.into())).is_ok());
    assert!(validate_field(&field, Some(&"on".into())).is_ok());
    assert_eq!(
        validate_field(&field, Some(&"maybe".into())).map_err(|error| error.code),
        Err(FieldErrorKind::InvalidType)
    );
}

#[test]
fn multi_choice_checkbox_checks_every_selection() {
    let field = FieldDefinition::new(
        "assistance",
        "Assistance needed",
        FieldKind::checkbox(["Medical", "Burial", "Educational"]),
    );

    let chosen = SubmissionValue::List(vec!["Medical".to_string(), "Burial".to_string()]);
    assert!(validate_field(&field, Some(&chosen)).is_ok());

    let stray = SubmissionValue::List(vec!["Medical".to_string(), "Travel".to_string()]);
    assert_eq!(
        validate_field(&field, Some(&stray)).map_err(|error| error.code),
        Err(FieldErrorKind::InvalidOption)
    );
}

#[test]
fn file_fields_only_check_presence() {
    let field = FieldDefinition::new("valid_id", "Valid ID", FieldKind::File).required();

    assert_eq!(
        validate_field(&field, None).map_err(|error| error.code),
        Err(FieldErrorKind::Required)
    );
    let upload = SubmissionValue::File(FileReference {
        name: "umid.jpg".to_string(),
        storage_key: Some("uploads/umid.jpg".to_string()),
        content_type: Some("image/jpeg".to_string()),
        size_bytes: Some(48_213),
    });
    assert!(validate_field(&field, Some(&upload)).is_ok());
    assert_eq!(
        validate_field(&field, Some(&SubmissionValue::Number(3.0))).map_err(|error| error.code),
        Err(FieldErrorKind::InvalidType)
    );
}

#[test]
fn dates_parse_iso_and_respect_bounds() {
    let schema = FormSchema::new("event", "Event permit").with_field(FieldDefinition::new(
        "event_date",
        "Event date",
        FieldKind::Date {
            validation: Some(DateRules {
                min: NaiveDate::from_ymd_opt(2026, 1, 1),
                max: NaiveDate::from_ymd_opt(2026, 12, 31),
                message: None,
            }),
        },
    ));

    let inside = validate(&schema, &submission([("event_date", "2026-06-12".into())]));
    assert!(inside.valid);

    let outside = validate(&schema, &submission([("event_date", "2027-01-01".into())]));
    assert_eq!(outside.error_kind("event_date"), Some(FieldErrorKind::Range));

    let garbled = validate(&schema, &submission([("event_date", "12/06/2026".into())]));
    assert_eq!(garbled.error_kind("event_date"), Some(FieldErrorKind::InvalidType));
}

#[test]
fn phone_fields_use_the_builtin_format() {
    let field = FieldDefinition::new("mobile", "Mobile number", FieldKind::phone());
    assert!(validate_field(&field, Some(&"+63 917 555 0101".into())).is_ok());
    assert_eq!(
        validate_field(&field, Some(&"call me".into())).map_err(|error| error.code),
        Err(FieldErrorKind::Pattern)
    );
}

#[test]
fn submissions_deserialize_from_renderer_json() {
    let data: Submission = serde_json::from_value(serde_json::json!({
        "full_name": "Maria Santos",
        "household": 3,
        "purpose": "b",
        "precinct": "0142A"
    }))
    .expect("submission parses");

    assert_eq!(data.get("household"), Some(&SubmissionValue::Number(3.0)));
    assert!(validate(&clearance_schema(), &data).valid);
}

#[test]
fn null_and_unrecognised_values_outside_the_schema_are_ignored() {
    let data: Submission = serde_json::from_value(serde_json::json!({
        "f1": "a@b.com",
        "extra": null,
        "meta": { "x": 1 }
    }))
    .expect("submission parses");

    assert_eq!(data.get("extra"), Some(&SubmissionValue::Null));
    assert!(matches!(data.get("meta"), Some(SubmissionValue::Other(_))));
    assert!(validate(&email_schema(), &data).valid);
}

#[test]
fn null_counts_as_blank_and_unrecognised_shapes_are_invalid_type() {
    let data: Submission = serde_json::from_value(serde_json::json!({
        "full_name": null,
        "household": { "adults": 2 },
        "purpose": [1, 2]
    }))
    .expect("submission parses");

    let report = validate(&clearance_schema(), &data);
    assert_eq!(report.error_kind("full_name"), Some(FieldErrorKind::Required));
    assert_eq!(report.error_kind("household"), Some(FieldErrorKind::InvalidType));
    assert_eq!(report.error_kind("purpose"), Some(FieldErrorKind::InvalidType));
}

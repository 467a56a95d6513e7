use std::borrow::Cow;

use chrono::NaiveDate;

use crate::admin::format::{is_email, is_phone, matches_pattern};

use super::super::field::{DateRules, FieldDefinition, FieldKind, NumberRules, TextRules};
use super::{FieldError, FieldErrorKind, SubmissionValue};

#[derive(Debug, Clone, Copy)]
enum TextFormat {
    Free,
    Email,
    Phone,
}

pub(super) fn check_field(
    field: &FieldDefinition,
    value: Option<&SubmissionValue>,
) -> Result<(), FieldError> {
    let value = match value.filter(|value| !value.is_blank()) {
        Some(value) => value,
        None if field.required => {
            return Err(FieldError::new(
                FieldErrorKind::Required,
                format!("{} is required", field.label),
            ))
        }
        None => return Ok(()),
    };

    let label = field.label.as_str();
    match &field.kind {
        FieldKind::Number { validation } => check_number(label, value, validation.as_ref()),
        FieldKind::Date { validation } => check_date(label, value, validation.as_ref()),
        FieldKind::Text { validation } | FieldKind::Textarea { validation } => {
            check_text(label, value, validation.as_ref(), TextFormat::Free)
        }
        FieldKind::Email { validation } => {
            check_text(label, value, validation.as_ref(), TextFormat::Email)
        }
        FieldKind::Phone { validation } => {
            check_text(label, value, validation.as_ref(), TextFormat::Phone)
        }
        FieldKind::Select { options } | FieldKind::Radio { options } => {
            check_single_choice(label, value, options)
        }
        FieldKind::Checkbox { options } if options.is_empty() => {
            check_consent(label, value, field.required)
        }
        FieldKind::Checkbox { options } => check_multi_choice(label, value, options),
        FieldKind::File => check_file(label, value),
    }
}

fn invalid_type(label: &str, expected: &str) -> FieldError {
    FieldError::new(
        FieldErrorKind::InvalidType,
        format!("{label} must be {expected}"),
    )
}

fn as_text(value: &SubmissionValue) -> Option<Cow<'_, str>> {
    match value {
        SubmissionValue::Text(text) => Some(Cow::Borrowed(text.trim())),
        SubmissionValue::Number(number) => Some(Cow::Owned(format_number(*number))),
        _ => None,
    }
}

fn format_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

fn check_number(
    label: &str,
    value: &SubmissionValue,
    rules: Option<&NumberRules>,
) -> Result<(), FieldError> {
    let number = match value {
        SubmissionValue::Number(number) => Some(*number),
        SubmissionValue::Text(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|number| number.is_finite())
    .ok_or_else(|| invalid_type(label, "a number"))?;

    let Some(rules) = rules else {
        return Ok(());
    };

    let below = rules.min.is_some_and(|min| number < min);
    let above = rules.max.is_some_and(|max| number > max);
    if !(below || above) {
        return Ok(());
    }

    let message = rules.message.clone().unwrap_or_else(|| {
        range_message(
            label,
            rules.min.map(format_number),
            rules.max.map(format_number),
        )
    });
    Err(FieldError::new(FieldErrorKind::Range, message))
}

fn check_date(
    label: &str,
    value: &SubmissionValue,
    rules: Option<&DateRules>,
) -> Result<(), FieldError> {
    let date = match value {
        SubmissionValue::Text(text) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok(),
        _ => None,
    }
    .ok_or_else(|| invalid_type(label, "a date (YYYY-MM-DD)"))?;

    let Some(rules) = rules else {
        return Ok(());
    };

    let before = rules.min.is_some_and(|min| date < min);
    let after = rules.max.is_some_and(|max| date > max);
    if !(before || after) {
        return Ok(());
    }

    let message = rules.message.clone().unwrap_or_else(|| {
        range_message(
            label,
            rules.min.map(|min| min.to_string()),
            rules.max.map(|max| max.to_string()),
        )
    });
    Err(FieldError::new(FieldErrorKind::Range, message))
}

fn range_message(label: &str, min: Option<String>, max: Option<String>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{label} must be between {min} and {max}"),
        (Some(min), None) => format!("{label} must be at least {min}"),
        (None, Some(max)) => format!("{label} must be at most {max}"),
        (None, None) => format!("{label} is out of range"),
    }
}

fn check_text(
    label: &str,
    value: &SubmissionValue,
    rules: Option<&TextRules>,
    format: TextFormat,
) -> Result<(), FieldError> {
    let text = as_text(value).ok_or_else(|| invalid_type(label, "text"))?;
    let custom_message = rules.and_then(|rules| rules.message.clone());

    if let Some(rules) = rules {
        let length = text.chars().count();
        if let Some(min) = rules.min_length.filter(|min| length < *min) {
            return Err(FieldError::new(
                FieldErrorKind::Length,
                format!("{label} must be at least {min} characters"),
            ));
        }
        if let Some(max) = rules.max_length.filter(|max| length > *max) {
            return Err(FieldError::new(
                FieldErrorKind::Length,
                format!("{label} must be at most {max} characters"),
            ));
        }
    }

    let format_message = match format {
        TextFormat::Email if !is_email(&text) => {
            Some(format!("{label} must be a valid email address"))
        }
        TextFormat::Phone if !is_phone(&text) => {
            Some(format!("{label} must be a valid phone number"))
        }
        _ => None,
    };
    if let Some(default) = format_message {
        return Err(FieldError::new(
            FieldErrorKind::Pattern,
            custom_message.unwrap_or(default),
        ));
    }

    if let Some(pattern) = rules.and_then(|rules| rules.pattern.as_deref()) {
        if !matches_pattern(pattern, &text) {
            return Err(FieldError::new(
                FieldErrorKind::Pattern,
                custom_message.unwrap_or_else(|| format!("{label} has an invalid format")),
            ));
        }
    }

    Ok(())
}

fn check_single_choice(
    label: &str,
    value: &SubmissionValue,
    options: &[String],
) -> Result<(), FieldError> {
    let choice = as_text(value).ok_or_else(|| invalid_type(label, "a single choice"))?;
    if options.iter().any(|option| option == choice.as_ref()) {
        Ok(())
    } else {
        Err(invalid_option(label, options))
    }
}

fn check_multi_choice(
    label: &str,
    value: &SubmissionValue,
    options: &[String],
) -> Result<(), FieldError> {
    let choices: Vec<&str> = match value {
        SubmissionValue::Text(text) => vec![text.trim()],
        SubmissionValue::List(items) => items
            .iter()
            .map(|item| item.trim())
            .filter(|item| !item.is_empty())
            .collect(),
        _ => return Err(invalid_type(label, "a list of choices")),
    };

    if choices
        .iter()
        .all(|choice| options.iter().any(|option| option == choice))
    {
        Ok(())
    } else {
        Err(invalid_option(label, options))
    }
}

fn invalid_option(label: &str, options: &[String]) -> FieldError {
    FieldError::new(
        FieldErrorKind::InvalidOption,
        format!("{label} must be one of: {}", options.join(", ")),
    )
}

fn check_consent(label: &str, value: &SubmissionValue, required: bool) -> Result<(), FieldError> {
    let checked = match value {
        SubmissionValue::Bool(checked) => *checked,
        SubmissionValue::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" => true,
            "false" | "off" | "no" => false,
            _ => return Err(invalid_type(label, "checked or unchecked")),
        },
        _ => return Err(invalid_type(label, "checked or unchecked")),
    };

    if required && !checked {
        return Err(FieldError::new(
            FieldErrorKind::Required,
            format!("{label} is required"),
        ));
    }
    Ok(())
}

fn check_file(label: &str, value: &SubmissionValue) -> Result<(), FieldError> {
    match value {
        SubmissionValue::File(_) | SubmissionValue::Text(_) => Ok(()),
        _ => Err(invalid_type(label, "an uploaded file")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_numbers_render_without_fraction() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(2.5), "2.5");
    }
}

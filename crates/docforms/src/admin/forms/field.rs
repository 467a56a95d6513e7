use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One input on a form, described independently of whatever renders it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<DefaultValue>,
}

impl FieldDefinition {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            placeholder: None,
            required: false,
            kind,
            default_value: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_default(mut self, value: DefaultValue) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }
}

/// Closed set of input kinds. Each variant carries only the constraints that make
/// sense for it, so a pattern on a number field cannot be expressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        validation: Option<TextRules>,
    },
    Textarea {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        validation: Option<TextRules>,
    },
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        validation: Option<NumberRules>,
    },
    Email {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        validation: Option<TextRules>,
    },
    Phone {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        validation: Option<TextRules>,
    },
    Date {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        validation: Option<DateRules>,
    },
    Select {
        #[serde(default)]
        options: Vec<String>,
    },
    Radio {
        #[serde(default)]
        options: Vec<String>,
    },
    /// A single consent box when `options` is empty, a multi-select otherwise.
    Checkbox {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        options: Vec<String>,
    },
    File,
}

impl FieldKind {
    pub fn text() -> Self {
        Self::Text { validation: None }
    }

    pub fn textarea() -> Self {
        Self::Textarea { validation: None }
    }

    pub fn email() -> Self {
        Self::Email { validation: None }
    }

    pub fn phone() -> Self {
        Self::Phone { validation: None }
    }

    pub fn number() -> Self {
        Self::Number { validation: None }
    }

    pub fn date() -> Self {
        Self::Date { validation: None }
    }

    pub fn select<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Select {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    pub fn radio<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Radio {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    pub fn checkbox<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Checkbox {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    pub const fn field_type(&self) -> FieldType {
        match self {
            FieldKind::Text { .. } => FieldType::Text,
            FieldKind::Textarea { .. } => FieldType::Textarea,
            FieldKind::Number { .. } => FieldType::Number,
            FieldKind::Email { .. } => FieldType::Email,
            FieldKind::Phone { .. } => FieldType::Phone,
            FieldKind::Date { .. } => FieldType::Date,
            FieldKind::Select { .. } => FieldType::Select,
            FieldKind::Radio { .. } => FieldType::Radio,
            FieldKind::Checkbox { .. } => FieldType::Checkbox,
            FieldKind::File => FieldType::File,
        }
    }

    /// Options offered by choice fields; empty for every other kind.
    pub fn options(&self) -> &[String] {
        match self {
            FieldKind::Select { options }
            | FieldKind::Radio { options }
            | FieldKind::Checkbox { options } => options,
            _ => &[],
        }
    }

    pub fn text_rules(&self) -> Option<&TextRules> {
        match self {
            FieldKind::Text { validation }
            | FieldKind::Textarea { validation }
            | FieldKind::Email { validation }
            | FieldKind::Phone { validation } => validation.as_ref(),
            _ => None,
        }
    }
}

/// Discriminant of [`FieldKind`] used for display and capability checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Email,
    Phone,
    Date,
    Select,
    Radio,
    Checkbox,
    File,
}

impl FieldType {
    pub const ALL: [FieldType; 10] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Number,
        FieldType::Email,
        FieldType::Phone,
        FieldType::Date,
        FieldType::Select,
        FieldType::Radio,
        FieldType::Checkbox,
        FieldType::File,
    ];

    /// Builder-facing name.
    pub const fn label(self) -> &'static str {
        match self {
            FieldType::Text => "Short Text",
            FieldType::Textarea => "Long Text",
            FieldType::Number => "Number",
            FieldType::Email => "Email",
            FieldType::Phone => "Phone",
            FieldType::Date => "Date",
            FieldType::Select => "Dropdown",
            FieldType::Radio => "Radio Buttons",
            FieldType::Checkbox => "Checkbox",
            FieldType::File => "File Upload",
        }
    }

    /// Select and radio fields are meaningless without a closed choice set.
    pub const fn requires_options(self) -> bool {
        matches!(self, FieldType::Select | FieldType::Radio)
    }

    pub const fn is_text_like(self) -> bool {
        matches!(
            self,
            FieldType::Text | FieldType::Textarea | FieldType::Email | FieldType::Phone
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Replaces the default message when the value fails `pattern` or the built-in format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Pre-filled value shown when the form is rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

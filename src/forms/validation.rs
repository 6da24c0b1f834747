//! Field validation for data-collection forms.
//!
//! Each field is checked against an ordered rule chain. The first failing rule
//! produces the field's single error message; later rules are not evaluated.
//!
//! Order: required → type conformance → pattern → length bounds → numeric bounds.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::record::FieldValue;
use crate::templates::{FieldKind, FieldModel};

/// Rule that rejected a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Rule {
    Required,
    Type,
    Pattern,
    MinLength,
    MaxLength,
    Min,
    Max,
}

/// Validation error with a user-facing message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ValidationError {
    /// Name of the field that failed validation
    pub field: String,
    pub rule: Rule,
    pub message: String,
    /// Suggestion for how to fix the error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, rule: Rule, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule,
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn empty_field(field: &FieldModel) -> Self {
        let message = match field.kind {
            FieldKind::Checkbox => format!("{} must be checked", field.label),
            _ => format!("{} is required", field.label),
        };
        Self::new(&field.name, Rule::Required, message)
            .with_suggestion(format!("Please provide {}", field.label.to_lowercase()))
    }

    pub fn wrong_type(field: &FieldModel) -> Self {
        let (message, suggestion) = match &field.kind {
            FieldKind::Number | FieldKind::Currency => (
                format!("{} must be a number", field.label),
                "Use digits only, for example 250000".to_string(),
            ),
            FieldKind::Date => (
                format!("{} must be a valid date", field.label),
                "Use the format YYYY-MM-DD, for example 2024-06-01".to_string(),
            ),
            FieldKind::Select { options } => (
                format!("{} must be one of the listed options", field.label),
                format!("Choose one of: {}", options.join(", ")),
            ),
            FieldKind::Checkbox => (
                format!("{} must be yes or no", field.label),
                "Check or uncheck the box".to_string(),
            ),
            _ => (
                format!("{} has an unsupported value", field.label),
                "Enter plain text".to_string(),
            ),
        };
        Self::new(&field.name, Rule::Type, message).with_suggestion(suggestion)
    }

    pub fn invalid_format(field: &FieldModel) -> Self {
        let mut error = Self::new(
            &field.name,
            Rule::Pattern,
            format!("{} has an invalid format", field.label),
        );
        if let Some(placeholder) = &field.placeholder {
            error = error.with_suggestion(format!("Expected format: {}", placeholder));
        }
        error
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors in template field order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    /// Formatted, numbered summary of every error.
    pub fn to_message(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }

        let mut parts = vec![format!(
            "Validation failed: {} error(s) found\n",
            self.errors.len()
        )];

        for (i, error) in self.errors.iter().enumerate() {
            parts.push(format!("{}. {}", i + 1, error));
        }

        parts.push(String::new());
        parts.push("Please correct the fields above and try again.".to_string());

        parts.join("\n")
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_message())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate `value` against `field`, compiling its pattern on demand.
pub fn validate_field(field: &FieldModel, value: Option<&FieldValue>) -> Result<(), ValidationError> {
    let pattern = field
        .validation
        .pattern
        .as_deref()
        .and_then(|p| match Regex::new(p) {
            Ok(re) => Some(re),
            Err(e) => {
                log::warn!("Skipping uncompilable pattern on '{}': {}", field.name, e);
                None
            }
        });
    validate_with(field, value, pattern.as_ref())
}

/// Validate `value` against `field` with an already compiled pattern.
pub fn validate_with(
    field: &FieldModel,
    value: Option<&FieldValue>,
    pattern: Option<&Regex>,
) -> Result<(), ValidationError> {
    let value = match value {
        Some(v) if !is_missing(field, v) => v,
        _ if field.required => return Err(ValidationError::empty_field(field)),
        _ => return Ok(()),
    };

    check_type(field, value)?;

    let rules = &field.validation;
    if let Some(re) = pattern {
        if !re.is_match(value.to_text().trim()) {
            return Err(ValidationError::invalid_format(field));
        }
    }

    if field.kind.is_textual() {
        let len = value.to_text().chars().count();
        if let Some(min) = rules.min_length {
            if len < min {
                return Err(ValidationError::new(
                    &field.name,
                    Rule::MinLength,
                    format!("{} must be at least {} characters", field.label, min),
                ));
            }
        }
        if let Some(max) = rules.max_length {
            if len > max {
                return Err(ValidationError::new(
                    &field.name,
                    Rule::MaxLength,
                    format!("{} must be at most {} characters", field.label, max),
                ));
            }
        }
    }

    if field.kind.is_numeric() {
        // check_type guarantees a number here
        let n = value.as_number().unwrap_or_default();
        if let Some(min) = rules.min {
            if n < min {
                return Err(ValidationError::new(
                    &field.name,
                    Rule::Min,
                    format!("{} must be at least {}", field.label, min),
                ));
            }
        }
        if let Some(max) = rules.max {
            if n > max {
                return Err(ValidationError::new(
                    &field.name,
                    Rule::Max,
                    format!("{} must be at most {}", field.label, max),
                ));
            }
        }
    }

    Ok(())
}

/// Empty for the required rule: blank text, or an unchecked checkbox.
fn is_missing(field: &FieldModel, value: &FieldValue) -> bool {
    match (&field.kind, value) {
        (FieldKind::Checkbox, FieldValue::Bool(checked)) => !checked && field.required,
        (_, v) => v.is_blank(),
    }
}

fn check_type(field: &FieldModel, value: &FieldValue) -> Result<(), ValidationError> {
    let conforms = match &field.kind {
        FieldKind::Number | FieldKind::Currency => value.as_number().is_some(),
        FieldKind::Date => match value {
            FieldValue::Text(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").is_ok(),
            _ => false,
        },
        FieldKind::Select { options } => {
            let text = value.to_text();
            options.iter().any(|o| o == text.trim())
        }
        FieldKind::Checkbox => value.as_bool().is_some(),
        FieldKind::Text | FieldKind::Textarea | FieldKind::Signature => true,
    };

    if conforms {
        Ok(())
    } else {
        Err(ValidationError::wrong_type(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_field() -> FieldModel {
        FieldModel::new("code", "Code", FieldKind::Text)
    }

    #[test]
    fn test_required_empty() {
        let field = text_field().required();
        let err = validate_field(&field, None).unwrap_err();
        assert_eq!(err.rule, Rule::Required);
        assert!(err.message.contains("Code is required"));

        let err = validate_field(&field, Some(&FieldValue::text("   "))).unwrap_err();
        assert_eq!(err.rule, Rule::Required);
    }

    #[test]
    fn test_optional_empty_skips_remaining_rules() {
        let field = text_field().pattern("^[0-9]+$").min_length(3);
        assert!(validate_field(&field, None).is_ok());
        assert!(validate_field(&field, Some(&FieldValue::text(""))).is_ok());
    }

    #[test]
    fn test_required_short_circuits_pattern() {
        let field = text_field().required().pattern("^[0-9]{4}$");
        let err = validate_field(&field, Some(&FieldValue::text(""))).unwrap_err();
        assert_eq!(err.rule, Rule::Required);
    }

    #[test]
    fn test_pattern_before_length() {
        let field = text_field().pattern("^[0-9]+$").min_length(5);
        let err = validate_field(&field, Some(&FieldValue::text("ab"))).unwrap_err();
        assert_eq!(err.rule, Rule::Pattern);

        let err = validate_field(&field, Some(&FieldValue::text("12"))).unwrap_err();
        assert_eq!(err.rule, Rule::MinLength);
        assert!(validate_field(&field, Some(&FieldValue::text("12345"))).is_ok());
    }

    #[test]
    fn test_max_length_counts_chars() {
        let field = text_field().max_length(3);
        assert!(validate_field(&field, Some(&FieldValue::text("été"))).is_ok());
        let err = validate_field(&field, Some(&FieldValue::text("étés"))).unwrap_err();
        assert_eq!(err.rule, Rule::MaxLength);
    }

    #[test]
    fn test_numeric_bounds() {
        let field = FieldModel::new("rate", "Rate", FieldKind::Number).min(0.0).max(25.0);
        assert!(validate_field(&field, Some(&FieldValue::Number(4.5))).is_ok());
        assert_eq!(
            validate_field(&field, Some(&FieldValue::Number(-1.0))).unwrap_err().rule,
            Rule::Min
        );
        assert_eq!(
            validate_field(&field, Some(&FieldValue::Number(30.0))).unwrap_err().rule,
            Rule::Max
        );
    }

    #[test]
    fn test_type_conformance() {
        let price = FieldModel::new("price", "Price", FieldKind::Currency).min(1.0);
        let err = validate_field(&price, Some(&FieldValue::text("lots"))).unwrap_err();
        assert_eq!(err.rule, Rule::Type);
        assert!(validate_field(&price, Some(&FieldValue::text("$1,000"))).is_ok());

        let date = FieldModel::new("d", "Date", FieldKind::Date);
        assert!(validate_field(&date, Some(&FieldValue::text("2024-06-01"))).is_ok());
        assert_eq!(
            validate_field(&date, Some(&FieldValue::text("2024-13-01"))).unwrap_err().rule,
            Rule::Type
        );

        let select = FieldModel::select("s", "Kind", &["A", "B"]);
        assert!(validate_field(&select, Some(&FieldValue::text("B"))).is_ok());
        assert_eq!(
            validate_field(&select, Some(&FieldValue::text("C"))).unwrap_err().rule,
            Rule::Type
        );
    }

    #[test]
    fn test_required_checkbox_must_be_checked() {
        let field = FieldModel::new("ok", "Acknowledged", FieldKind::Checkbox).required();
        let err = validate_field(&field, Some(&FieldValue::Bool(false))).unwrap_err();
        assert_eq!(err.rule, Rule::Required);
        assert!(validate_field(&field, Some(&FieldValue::Bool(true))).is_ok());

        let optional = FieldModel::new("opt", "Optional", FieldKind::Checkbox);
        assert!(validate_field(&optional, Some(&FieldValue::Bool(false))).is_ok());
    }

    #[test]
    fn test_validation_errors_message() {
        let mut errors = ValidationErrors::new();
        errors.add(ValidationError::empty_field(&text_field()));
        errors.add(ValidationError::wrong_type(&FieldModel::new(
            "n",
            "Amount",
            FieldKind::Number,
        )));

        let msg = errors.to_message();
        assert!(msg.contains("2 error(s)"));
        assert!(msg.contains("Code is required"));
        assert!(msg.contains("Amount must be a number"));
        assert_eq!(errors.get("n").map(|e| e.rule), Some(Rule::Type));
        assert!(errors.into_result().is_err());
        assert!(ValidationErrors::new().into_result().is_ok());
    }
}

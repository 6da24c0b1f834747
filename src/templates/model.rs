//! Template and field definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::record::FieldValue;

/// Document family a template belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateCategory {
    PurchaseAgreement,
    Termination,
    CounterOffer,
    Disclosure,
    Inspection,
}

impl TemplateCategory {
    pub const ALL: [TemplateCategory; 5] = [
        Self::PurchaseAgreement,
        Self::Termination,
        Self::CounterOffer,
        Self::Disclosure,
        Self::Inspection,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PurchaseAgreement => "purchase-agreement",
            Self::Termination => "termination",
            Self::CounterOffer => "counter-offer",
            Self::Disclosure => "disclosure",
            Self::Inspection => "inspection",
        }
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| format!("unknown template category '{}'", s))
    }
}

/// Field type tag. Only `Select` carries data of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Textarea,
    Select { options: Vec<String> },
    Date,
    Number,
    Currency,
    Checkbox,
    Signature,
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Select { .. } => "select",
            Self::Date => "date",
            Self::Number => "number",
            Self::Currency => "currency",
            Self::Checkbox => "checkbox",
            Self::Signature => "signature",
        }
    }

    /// Kinds whose `min`/`max` bounds are meaningful.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Number | Self::Currency)
    }

    /// Kinds stored as text and subject to pattern and length rules.
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            Self::Text | Self::Textarea | Self::Select { .. } | Self::Date | Self::Signature
        )
    }
}

/// Declarative validation rules attached to a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl ValidationRules {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One input of a template's data-collection form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldModel {
    pub id: String,
    /// Record key, unique within the template.
    pub name: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "ValidationRules::is_empty")]
    pub validation: ValidationRules,
}

impl FieldModel {
    pub fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            id: name.to_string(),
            name: name.to_string(),
            label: label.to_string(),
            kind,
            required: false,
            placeholder: None,
            default_value: None,
            validation: ValidationRules::default(),
        }
    }

    pub fn select(name: &str, label: &str, options: &[&str]) -> Self {
        Self::new(
            name,
            label,
            FieldKind::Select {
                options: options.iter().map(|o| o.to_string()).collect(),
            },
        )
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn default_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn pattern(mut self, pattern: &str) -> Self {
        self.validation.pattern = Some(pattern.to_string());
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.validation.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.validation.max = Some(max);
        self
    }

    pub fn min_length(mut self, len: usize) -> Self {
        self.validation.min_length = Some(len);
        self
    }

    pub fn max_length(mut self, len: usize) -> Self {
        self.validation.max_length = Some(len);
        self
    }

    pub fn options(&self) -> Option<&[String]> {
        match &self.kind {
            FieldKind::Select { options } => Some(options),
            _ => None,
        }
    }
}

/// Presentation grouping of field ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub title: String,
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Section {
    pub fn new(id: &str, title: &str, fields: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            description: None,
        }
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Declarative description of a generated document and the form collecting its data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTemplate {
    #[schema(example = "purchase-agreement")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: TemplateCategory,
    #[schema(value_type = Vec<Object>)]
    pub fields: Vec<FieldModel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[schema(value_type = Vec<Object>)]
    pub sections: Vec<Section>,
}

impl DocumentTemplate {
    pub fn field(&self, name: &str) -> Option<&FieldModel> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_by_id(&self, id: &str) -> Option<&FieldModel> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldModel> {
        self.fields.iter().filter(|f| f.required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_serializes_with_flat_type_tag() {
        let field = FieldModel::select("propertyType", "Property type", &["House", "Condo"])
            .required();
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "select");
        assert_eq!(json["options"][1], "Condo");
        assert_eq!(json["required"], true);
        assert!(json.get("validation").is_none());

        let parsed: FieldModel = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, field);
    }

    #[test]
    fn test_field_deserializes_from_camel_case() {
        let json = r#"{
            "id": "price",
            "name": "price",
            "label": "Price",
            "type": "currency",
            "required": true,
            "validation": { "min": 1, "maxLength": 12 }
        }"#;
        let field: FieldModel = serde_json::from_str(json).unwrap();
        assert_eq!(field.kind, FieldKind::Currency);
        assert_eq!(field.validation.min, Some(1.0));
        assert_eq!(field.validation.max_length, Some(12));
        assert!(field.options().is_none());
    }

    #[test]
    fn test_category_round_trip_through_str() {
        for category in TemplateCategory::ALL {
            assert_eq!(category.as_str().parse::<TemplateCategory>(), Ok(category));
        }
        assert!("lease".parse::<TemplateCategory>().is_err());
        assert_eq!(
            serde_json::to_string(&TemplateCategory::CounterOffer).unwrap(),
            "\"counter-offer\""
        );
    }

    #[test]
    fn test_kind_classification() {
        assert!(FieldKind::Currency.is_numeric());
        assert!(!FieldKind::Currency.is_textual());
        assert!(FieldKind::Date.is_textual());
        assert!(!FieldKind::Checkbox.is_textual());
        assert!(!FieldKind::Checkbox.is_numeric());
    }
}

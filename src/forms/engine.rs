//! Form engine - binds a template's fields to one live data record.

use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;

use super::validation::{validate_with, ValidationError, ValidationErrors};
use crate::record::{parse_bool, parse_number, DataRecord, FieldValue};
use crate::templates::{DocumentTemplate, FieldKind, FieldModel};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("template '{template}' has no field named '{field}'")]
    UnknownField { template: String, field: String },
}

/// Lifecycle of an in-progress document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum FormState {
    Empty,
    Editing,
    DraftSaved,
    CompleteSaved,
}

/// Which kind of save was persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    Draft,
    Complete,
}

/// Holds the data record of one editing session and tracks its validity.
#[derive(Debug, Clone)]
pub struct FormEngine {
    template: Arc<DocumentTemplate>,
    record: DataRecord,
    errors: BTreeMap<String, ValidationError>,
    patterns: HashMap<String, Regex>,
    state: FormState,
}

impl FormEngine {
    /// Start an empty session; declared default values are pre-filled.
    pub fn new(template: Arc<DocumentTemplate>) -> Self {
        let record = template
            .fields
            .iter()
            .filter_map(|f| f.default_value.clone().map(|v| (f.name.clone(), v)))
            .collect();
        let mut engine = Self::bind(template, record);
        engine.state = FormState::Empty;
        engine
    }

    /// Resume editing a previously saved record.
    pub fn with_record(template: Arc<DocumentTemplate>, record: DataRecord) -> Self {
        let mut engine = Self::bind(template, record);
        let names: Vec<String> = engine.record.keys().cloned().collect();
        for name in names {
            engine.revalidate(&name);
        }
        engine
    }

    fn bind(template: Arc<DocumentTemplate>, record: DataRecord) -> Self {
        let patterns = template
            .fields
            .iter()
            .filter_map(|f| {
                let pattern = f.validation.pattern.as_deref()?;
                match Regex::new(pattern) {
                    Ok(re) => Some((f.name.clone(), re)),
                    Err(e) => {
                        log::warn!("Field '{}' pattern ignored: {}", f.name, e);
                        None
                    }
                }
            })
            .collect();

        Self {
            template,
            record,
            errors: BTreeMap::new(),
            patterns,
            state: FormState::Editing,
        }
    }

    pub fn template(&self) -> &Arc<DocumentTemplate> {
        &self.template
    }

    pub fn record(&self) -> &DataRecord {
        &self.record
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// Store `value` for `name`, coerced to the field's declared type.
    ///
    /// Values that cannot be coerced are kept verbatim and the field is marked
    /// invalid. Returns the field's current validation error, if any.
    pub fn set_field(
        &mut self,
        name: &str,
        value: FieldValue,
    ) -> Result<Option<ValidationError>, FormError> {
        let field = self.field(name)?;
        let coerced = coerce(field, value);
        self.record.insert(name.to_string(), coerced);
        self.state = FormState::Editing;
        self.revalidate(name);
        Ok(self.errors.get(name).cloned())
    }

    /// Remove the value of `name`, leaving it undefined.
    pub fn clear_field(&mut self, name: &str) -> Result<Option<ValidationError>, FormError> {
        self.field(name)?;
        self.record.remove(name);
        self.state = FormState::Editing;
        self.revalidate(name);
        Ok(self.errors.get(name).cloned())
    }

    pub fn validate_field(
        &self,
        field: &FieldModel,
        value: Option<&FieldValue>,
    ) -> Result<(), ValidationError> {
        validate_with(field, value, self.patterns.get(&field.name))
    }

    /// Errors of fields touched so far.
    pub fn field_errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.values()
    }

    pub fn field_error(&self, name: &str) -> Option<&ValidationError> {
        self.errors.get(name)
    }

    /// Percentage of required fields holding a value, 0..=100.
    ///
    /// A field counts once it holds anything other than undefined or the empty
    /// string, whether or not that value passes validation. Only a form with
    /// every required field filled reports 100.
    pub fn completion(&self) -> u8 {
        let (total, filled) = self
            .template
            .required_fields()
            .fold((0usize, 0usize), |(total, filled), field| {
                let has_value = self
                    .record
                    .get(&field.name)
                    .map_or(false, |v| !v.is_empty_string());
                (total + 1, filled + usize::from(has_value))
            });

        if total == 0 {
            return 100;
        }
        let percent = ((filled as f64 * 100.0) / total as f64).round() as u8;
        if filled < total {
            percent.min(99)
        } else {
            percent
        }
    }

    /// Check every field of the template; returns the record when all pass.
    pub fn validate_all(&self) -> Result<DataRecord, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for field in &self.template.fields {
            if let Err(e) = self.validate_field(field, self.record.get(&field.name)) {
                errors.add(e);
            }
        }
        errors.into_result().map(|_| self.record.clone())
    }

    pub fn is_valid(&self) -> bool {
        self.validate_all().is_ok()
    }

    /// Snapshot for a draft save, at any completion level.
    pub fn save_draft(&mut self) -> DataRecord {
        self.mark_saved(SaveKind::Draft);
        self.record.clone()
    }

    /// Snapshot for a complete save; fails with every field error, leaving state untouched.
    pub fn save_complete(&mut self) -> Result<DataRecord, ValidationErrors> {
        let snapshot = self.validate_all()?;
        self.mark_saved(SaveKind::Complete);
        Ok(snapshot)
    }

    /// Record that a snapshot taken earlier was persisted.
    pub fn mark_saved(&mut self, kind: SaveKind) {
        self.state = match kind {
            SaveKind::Draft => FormState::DraftSaved,
            SaveKind::Complete => FormState::CompleteSaved,
        };
    }

    fn field(&self, name: &str) -> Result<&FieldModel, FormError> {
        self.template
            .field(name)
            .ok_or_else(|| FormError::UnknownField {
                template: self.template.id.clone(),
                field: name.to_string(),
            })
    }

    fn revalidate(&mut self, name: &str) {
        let Some(field) = self.template.field(name) else {
            log::debug!("Record key '{}' is not a field of '{}'", name, self.template.id);
            return;
        };
        match validate_with(field, self.record.get(name), self.patterns.get(name)) {
            Ok(()) => {
                self.errors.remove(name);
            }
            Err(e) => {
                self.errors.insert(name.to_string(), e);
            }
        }
    }
}

/// Convert an incoming value to the representation of the field's type.
fn coerce(field: &FieldModel, value: FieldValue) -> FieldValue {
    match (&field.kind, value) {
        (FieldKind::Number | FieldKind::Currency, FieldValue::Text(raw)) => match parse_number(&raw) {
            Some(n) => FieldValue::Number(n),
            None => FieldValue::Text(raw),
        },
        (FieldKind::Checkbox, FieldValue::Text(raw)) => match parse_bool(&raw) {
            Some(b) => FieldValue::Bool(b),
            None => FieldValue::Text(raw),
        },
        (FieldKind::Checkbox, FieldValue::Number(n)) if n == 0.0 || n == 1.0 => {
            FieldValue::Bool(n == 1.0)
        }
        (kind, value @ (FieldValue::Number(_) | FieldValue::Bool(_))) if kind.is_textual() => {
            FieldValue::Text(value.to_string())
        }
        (_, value) => value,
    }
}

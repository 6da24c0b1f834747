//! Template registry - catalogue of document templates, looked up by id or category.
//!
//! Built once at process start and handed to the form engine and compositor
//! explicitly. Integrity of every template is checked on construction.

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

use super::catalog;
use super::model::{DocumentTemplate, FieldKind, TemplateCategory};

/// Errors raised while loading or resolving templates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    #[error("template '{0}' not found")]
    NotFound(String),
    #[error("template '{template}' is invalid: {reason}")]
    Invalid { template: String, reason: String },
}

impl TemplateError {
    fn invalid(template: &DocumentTemplate, reason: impl Into<String>) -> Self {
        Self::Invalid {
            template: template.id.clone(),
            reason: reason.into(),
        }
    }
}

/// Immutable catalogue of templates.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: Vec<Arc<DocumentTemplate>>,
    index: HashMap<String, usize>,
}

impl TemplateRegistry {
    /// Registry holding the built-in legal document templates.
    pub fn builtin() -> Result<Self, TemplateError> {
        Self::from_templates(catalog::builtin_templates())
    }

    /// Build a registry from arbitrary templates, checking each for integrity.
    pub fn from_templates(templates: Vec<DocumentTemplate>) -> Result<Self, TemplateError> {
        let mut index = HashMap::with_capacity(templates.len());
        let mut stored = Vec::with_capacity(templates.len());

        for template in templates {
            check_integrity(&template)?;
            if index.contains_key(&template.id) {
                return Err(TemplateError::invalid(&template, "duplicate template id"));
            }
            index.insert(template.id.clone(), stored.len());
            stored.push(Arc::new(template));
        }

        log::debug!("Template registry loaded with {} templates", stored.len());
        Ok(Self {
            templates: stored,
            index,
        })
    }

    pub fn get_template_by_id(&self, id: &str) -> Result<&Arc<DocumentTemplate>, TemplateError> {
        self.index
            .get(id)
            .map(|&i| &self.templates[i])
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    pub fn list_templates(&self) -> &[Arc<DocumentTemplate>] {
        &self.templates
    }

    pub fn templates_by_category(
        &self,
        category: TemplateCategory,
    ) -> impl Iterator<Item = &Arc<DocumentTemplate>> {
        self.templates.iter().filter(move |t| t.category == category)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

fn check_integrity(template: &DocumentTemplate) -> Result<(), TemplateError> {
    let mut names = HashSet::new();
    let mut ids = HashSet::new();

    for field in &template.fields {
        if !names.insert(field.name.as_str()) {
            return Err(TemplateError::invalid(
                template,
                format!("duplicate field name '{}'", field.name),
            ));
        }
        if !ids.insert(field.id.as_str()) {
            return Err(TemplateError::invalid(
                template,
                format!("duplicate field id '{}'", field.id),
            ));
        }

        if let FieldKind::Select { options } = &field.kind {
            if options.is_empty() {
                return Err(TemplateError::invalid(
                    template,
                    format!("select field '{}' has no options", field.name),
                ));
            }
        }

        let rules = &field.validation;
        if (rules.min.is_some() || rules.max.is_some()) && !field.kind.is_numeric() {
            return Err(TemplateError::invalid(
                template,
                format!(
                    "numeric bounds declared on {} field '{}'",
                    field.kind.name(),
                    field.name
                ),
            ));
        }

        if let Some(pattern) = &rules.pattern {
            if let Err(e) = Regex::new(pattern) {
                return Err(TemplateError::invalid(
                    template,
                    format!("pattern of field '{}' does not compile: {}", field.name, e),
                ));
            }
        }
    }

    let mut grouped = HashSet::new();
    for section in &template.sections {
        for field_id in &section.fields {
            if !ids.contains(field_id.as_str()) {
                return Err(TemplateError::invalid(
                    template,
                    format!(
                        "section '{}' references unknown field '{}'",
                        section.id, field_id
                    ),
                ));
            }
            if !grouped.insert(field_id.as_str()) {
                return Err(TemplateError::invalid(
                    template,
                    format!("field '{}' appears in more than one section", field_id),
                ));
            }
        }
    }

    Ok(())
}

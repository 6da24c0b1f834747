//! Compositor module - turns a template and its data record into a paginated PDF.
//!
//! - `layout` - page geometry, word wrap and block placement
//! - `format` - currency and file name formatting
//! - `glyphs` - text encoding for the standard PDF fonts
//! - `pdf` - PDF serialization of laid-out pages
//! - `routines` - one fixed document structure per template

pub mod format;
pub mod glyphs;
pub mod layout;
pub mod pdf;
pub mod routines;

pub use format::{format_amount, format_currency, sanitize_filename};
pub use layout::{BlockKind, Element, Layout, Page, PageGeometry, PlacedBlock};
pub use routines::{Composer, DocumentRoutine};

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::record::{DataRecord, RecordExt};
use crate::templates::{TemplateError, TemplateRegistry};

/// Errors that can occur during composition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompositionError {
    #[error("template not found: {0}")]
    TemplateNotFound(String),
    #[error("no document routine for template '{0}'")]
    UnsupportedTemplate(String),
    #[error("PDF serialization failed: {0}")]
    Render(String),
}

impl From<TemplateError> for CompositionError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::NotFound(id) => Self::TemplateNotFound(id),
            TemplateError::Invalid { template, .. } => Self::UnsupportedTemplate(template),
        }
    }
}

/// Result of a successful composition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposedDocument {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub page_count: usize,
    pub pages: Vec<Page>,
}

impl ComposedDocument {
    /// Every text line of every page, in layout order.
    pub fn text_lines(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(Page::text_lines)
    }
}

/// Lays out documents for the templates of one registry.
pub struct DocumentCompositor {
    registry: Arc<TemplateRegistry>,
    geometry: PageGeometry,
    routines: HashMap<&'static str, Box<dyn DocumentRoutine>>,
}

impl DocumentCompositor {
    pub fn new(registry: Arc<TemplateRegistry>, geometry: PageGeometry) -> Self {
        Self::with_routines(registry, geometry, routines::builtin_routines())
    }

    pub fn with_routines(
        registry: Arc<TemplateRegistry>,
        geometry: PageGeometry,
        routines: HashMap<&'static str, Box<dyn DocumentRoutine>>,
    ) -> Self {
        Self {
            registry,
            geometry,
            routines,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn supports(&self, template_id: &str) -> bool {
        self.routines.contains_key(template_id)
    }

    /// Compose the document for `template_id` from `data`.
    ///
    /// Data is not validated here; missing values print as blanks.
    pub fn compose(
        &self,
        template_id: &str,
        data: &DataRecord,
    ) -> Result<ComposedDocument, CompositionError> {
        let template = self.registry.get_template_by_id(template_id)?;
        let routine = self.routines.get(template.id.as_str()).ok_or_else(|| {
            log::error!("Template '{}' has no document routine", template.id);
            CompositionError::UnsupportedTemplate(template.id.clone())
        })?;

        let mut layout = Layout::new(self.geometry);
        routine.render(&mut Composer::new(&mut layout, template, data));
        let pages = layout.finish();

        let bytes = pdf::write_pdf(&pages, &self.geometry, &template.name).map_err(|err| {
            log::error!("Failed to serialize '{}': {}", template.id, err);
            CompositionError::Render(err.to_string())
        })?;
        let file_name = Self::derive_file_name(&template.id, &**routine, data);

        log::info!(
            "Composed '{}' ({} pages, {} bytes)",
            file_name,
            pages.len(),
            bytes.len()
        );

        Ok(ComposedDocument {
            bytes,
            file_name,
            page_count: pages.len(),
            pages,
        })
    }

    /// File name `compose` would give the document, without laying it out.
    pub fn file_name(&self, template_id: &str, data: &DataRecord) -> Result<String, CompositionError> {
        let template = self.registry.get_template_by_id(template_id)?;
        let routine = self
            .routines
            .get(template.id.as_str())
            .ok_or_else(|| CompositionError::UnsupportedTemplate(template.id.clone()))?;
        Ok(Self::derive_file_name(&template.id, &**routine, data))
    }

    fn derive_file_name(template_id: &str, routine: &dyn DocumentRoutine, data: &DataRecord) -> String {
        let party = data.text_of(routine.party_field());
        format!("{}-{}.pdf", template_id, sanitize_filename(&party, "document"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;
    use crate::templates::catalog;

    fn compositor() -> DocumentCompositor {
        let registry = Arc::new(TemplateRegistry::builtin().unwrap());
        DocumentCompositor::new(registry, PageGeometry::default())
    }

    #[test]
    fn test_every_builtin_template_has_a_routine() {
        let c = compositor();
        for template in c.registry.list_templates() {
            assert!(c.supports(&template.id), "missing routine for {}", template.id);
        }
    }

    #[test]
    fn test_unknown_template_fails_without_buffer() {
        let result = compositor().compose("unknown-template-id", &DataRecord::new());
        assert_eq!(
            result,
            Err(CompositionError::TemplateNotFound(
                "unknown-template-id".to_string()
            ))
        );
    }

    #[test]
    fn test_registered_template_without_routine_is_unsupported() {
        let registry = Arc::new(TemplateRegistry::builtin().unwrap());
        let c = DocumentCompositor::with_routines(registry, PageGeometry::default(), HashMap::new());
        assert_eq!(
            c.compose(catalog::COUNTER_OFFER, &DataRecord::new()),
            Err(CompositionError::UnsupportedTemplate(
                catalog::COUNTER_OFFER.to_string()
            ))
        );
    }

    #[test]
    fn test_file_name_and_determinism() {
        let c = compositor();
        let mut data = DataRecord::new();
        data.insert("senderName".into(), FieldValue::text("Jane Q. Buyer"));
        data.insert("distributionDetails".into(), FieldValue::text(""));

        let first = c.compose(catalog::TERMINATION_LETTER, &data).unwrap();
        let second = c.compose(catalog::TERMINATION_LETTER, &data).unwrap();
        assert_eq!(first.file_name, "termination-letter-jane-q-buyer.pdf");
        assert_eq!(
            c.file_name(catalog::TERMINATION_LETTER, &data).unwrap(),
            first.file_name
        );
        assert_eq!(first.bytes, second.bytes);
        assert_eq!(first.page_count, second.page_count);
        assert_eq!(first.pages, second.pages);
        assert!(first.bytes.starts_with(b"%PDF-1.4"));
    }

    #[test]
    fn test_missing_party_name_falls_back() {
        let doc = compositor()
            .compose(catalog::SELLER_DISCLOSURE, &DataRecord::new())
            .unwrap();
        assert_eq!(doc.file_name, "seller-disclosure-document.pdf");
        assert_eq!(doc.page_count, doc.pages.len());
    }
}

//! Templates module - document template catalogue and field models.
//!
//! - `model` - template, section and field definitions
//! - `registry` - lookup by id / category with load-time integrity checks
//! - `catalog` - the built-in legal document templates

pub mod catalog;
pub mod model;
pub mod registry;

pub use model::{
    DocumentTemplate, FieldKind, FieldModel, Section, TemplateCategory, ValidationRules,
};
pub use registry::{TemplateError, TemplateRegistry};

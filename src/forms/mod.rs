//! Forms module - live data collection for a template.
//!
//! - `engine` - `FormEngine`, one per editing session
//! - `validation` - ordered, short-circuit field rules

pub mod engine;
pub mod validation;

pub use engine::{FormEngine, FormError, FormState, SaveKind};
pub use validation::{validate_field, Rule, ValidationError, ValidationErrors};

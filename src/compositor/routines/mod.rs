//! Per-template layout routines.
//!
//! - `purchase_agreement` - residential promise to purchase
//! - `termination_letter` - notice of contract termination
//! - `counter_offer` - counter-proposal to an offer
//! - `seller_disclosure` - seller's declarations on the property
//! - `inspection_notice` - buyer's inspection result notice

pub mod counter_offer;
pub mod inspection_notice;
pub mod purchase_agreement;
pub mod seller_disclosure;
pub mod termination_letter;

use std::collections::HashMap;

use super::format::format_currency;
use super::layout::{Layout, BLANK};
use crate::record::{DataRecord, RecordExt};
use crate::templates::DocumentTemplate;

/// A fixed legal-document structure expressed as layout calls.
pub trait DocumentRoutine: Send + Sync {
    /// Id of the template this routine lays out.
    fn template_id(&self) -> &'static str;

    /// Record field naming the party used in the output file name.
    fn party_field(&self) -> &'static str;

    /// Lay out the document for the given record.
    fn render(&self, doc: &mut Composer<'_>);
}

/// Routines keyed by template id.
pub fn builtin_routines() -> HashMap<&'static str, Box<dyn DocumentRoutine>> {
    let routines: Vec<Box<dyn DocumentRoutine>> = vec![
        Box::new(purchase_agreement::PurchaseAgreement),
        Box::new(termination_letter::TerminationLetter),
        Box::new(counter_offer::CounterOffer),
        Box::new(seller_disclosure::SellerDisclosure),
        Box::new(inspection_notice::InspectionNotice),
    ];
    routines.into_iter().map(|r| (r.template_id(), r)).collect()
}

/// Layout cursor bound to one template and one record.
///
/// Field helpers take their labels from the template, so routines only name fields.
pub struct Composer<'a> {
    pub layout: &'a mut Layout,
    template: &'a DocumentTemplate,
    data: &'a DataRecord,
}

impl<'a> Composer<'a> {
    pub fn new(layout: &'a mut Layout, template: &'a DocumentTemplate, data: &'a DataRecord) -> Self {
        Self {
            layout,
            template,
            data,
        }
    }

    pub fn template(&self) -> &DocumentTemplate {
        self.template
    }

    /// Trimmed text of a field; empty when undefined.
    pub fn text(&self, name: &str) -> String {
        self.data.text_of(name)
    }

    /// Text of a field, or the blank placeholder.
    pub fn text_or_blank(&self, name: &str) -> String {
        let text = self.text(name);
        if text.is_empty() {
            BLANK.to_string()
        } else {
            text
        }
    }

    pub fn has(&self, name: &str) -> bool {
        !self.text(name).is_empty()
    }

    pub fn flag(&self, name: &str) -> bool {
        self.data.flag(name)
    }

    /// Currency rendering of a field, blank when the field was never filled.
    pub fn money(&self, name: &str) -> String {
        match self.data.value_of(name) {
            Some(value) if !value.is_blank() => format_currency(value),
            _ => BLANK.to_string(),
        }
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.data.value_of(name).and_then(|v| v.as_number())
    }

    pub fn label(&self, name: &str) -> String {
        match self.template.field(name) {
            Some(field) => field.label.clone(),
            None => {
                log::warn!("Template '{}' has no field '{}'", self.template.id, name);
                name.to_string()
            }
        }
    }

    pub fn title(&mut self, text: &str) {
        self.layout.title(text);
    }

    pub fn heading(&mut self, text: &str) {
        self.layout.heading(text);
    }

    pub fn paragraph(&mut self, text: &str) {
        self.layout.paragraph(text);
    }

    /// `Label: value` using the field's label.
    pub fn inline(&mut self, name: &str) {
        let label = self.label(name);
        let value = self.text(name);
        self.layout.inline_field(&label, &value);
    }

    /// Inline currency field.
    pub fn inline_money(&mut self, name: &str) {
        let label = self.label(name);
        let value = self.money(name);
        self.layout.inline_field(&label, &value);
    }

    /// Inline field emitted only when the record holds a value.
    pub fn inline_if_present(&mut self, name: &str) {
        if self.has(name) {
            self.inline(name);
        }
    }

    pub fn stacked(&mut self, name: &str) {
        let label = self.label(name);
        let value = self.text(name);
        self.layout.stacked_field(&label, &value);
    }

    /// Stacked field printing `fallback` instead of a blank.
    pub fn stacked_or(&mut self, name: &str, fallback: &str) {
        let label = self.label(name);
        let value = self.text(name);
        let value = if value.is_empty() { fallback } else { value.as_str() };
        self.layout.stacked_field(&label, value);
    }

    /// Signature block, marked signed when `signature_field` holds a capture and
    /// dated from `date_field` when given.
    pub fn signature(
        &mut self,
        label: &str,
        signature_field: Option<&str>,
        date_field: Option<&str>,
    ) {
        let signed = signature_field.map_or(false, |f| self.has(f));
        let date = date_field.map(|f| self.text(f));
        self.layout.signature(label, date.as_deref(), signed);
    }
}

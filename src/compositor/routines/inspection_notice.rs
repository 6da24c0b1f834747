//! Buyer's notice of the pre-purchase inspection result.

use super::{Composer, DocumentRoutine};
use crate::templates::catalog::INSPECTION_NOTICE;

const DEFICIENCIES_FOUND: &str = "Deficiencies found";
const PRICE_REDUCTION: &str = "Price reduction";

pub struct InspectionNotice;

impl DocumentRoutine for InspectionNotice {
    fn template_id(&self) -> &'static str {
        INSPECTION_NOTICE
    }

    fn party_field(&self) -> &'static str {
        "buyerName"
    }

    fn render(&self, doc: &mut Composer<'_>) {
        let name = doc.template().name.to_uppercase();
        doc.title(&name);
        doc.inline("noticeDate");

        doc.paragraph(&format!(
            "Further to the purchase agreement dated {} between {} (buyer) and {} \
             (seller) for the property located at {}, the buyer gives notice of the \
             result of the inspection carried out by {} on {}.",
            doc.text_or_blank("agreementDate"),
            doc.text_or_blank("buyerName"),
            doc.text_or_blank("sellerName"),
            doc.text_or_blank("propertyAddress").replace('\n', ", "),
            doc.text_or_blank("inspectorName"),
            doc.text_or_blank("inspectionDate"),
        ));
        doc.inline("inspectionOutcome");

        if doc.text("inspectionOutcome") == DEFICIENCIES_FOUND {
            doc.heading("Deficiencies and requested remedy");
            doc.stacked("deficiencies");
            doc.inline("requestedRemedy");
            if doc.text("requestedRemedy") == PRICE_REDUCTION {
                doc.inline_money("reductionAmount");
            }
            doc.inline("remedyDeadline");
            doc.paragraph(
                "Failing a written answer from the seller by the deadline above, the \
                 buyer may declare the agreement null and void.",
            );
        } else {
            doc.paragraph(
                "The buyer declares the inspection condition satisfied and waives it.",
            );
        }

        doc.signature("Buyer", Some("buyerSignature"), Some("noticeDate"));
        doc.signature("Seller (receipt)", Some("sellerSignature"), None);
    }
}

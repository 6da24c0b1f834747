//! Seller's declarations about the property.

use super::{Composer, DocumentRoutine};
use crate::templates::catalog::SELLER_DISCLOSURE;

/// Yes/no questions with the details field printed when the answer is yes.
const DECLARATIONS: [(&str, &str); 4] = [
    ("knownDefects", "defectsDetails"),
    ("waterInfiltration", "waterDetails"),
    ("pestInfestation", "pestDetails"),
    ("environmentalIssues", "environmentalDetails"),
];

pub struct SellerDisclosure;

impl DocumentRoutine for SellerDisclosure {
    fn template_id(&self) -> &'static str {
        SELLER_DISCLOSURE
    }

    fn party_field(&self) -> &'static str {
        "sellerName"
    }

    fn render(&self, doc: &mut Composer<'_>) {
        let name = doc.template().name.to_uppercase();
        doc.title(&name);
        doc.paragraph(&format!(
            "The seller, {}, makes the following declarations about the property located \
             at {}, to the best of their knowledge.",
            doc.text_or_blank("sellerName"),
            doc.text_or_blank("propertyAddress").replace('\n', ", "),
        ));
        doc.inline_if_present("yearBuilt");
        doc.inline_if_present("ownershipYears");

        doc.heading("Declarations");
        for (flag, details) in DECLARATIONS {
            let label = doc.label(flag);
            let answer = if doc.flag(flag) { "YES" } else { "NO" };
            doc.layout.inline_field(&label, answer);
            if doc.flag(flag) {
                doc.stacked(details);
            }
        }

        doc.heading("Renovations and repairs");
        doc.stacked_or("renovations", "None declared");

        doc.paragraph(
            "The seller declares that the above information is accurate and complete. The \
             buyer acknowledges having received a copy of these declarations.",
        );

        doc.signature("Seller", Some("sellerSignature"), Some("disclosureDate"));
        doc.signature("Buyer (acknowledgement)", Some("buyerSignature"), None);
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{all_text, count_blocks, record, render};
    use super::*;
    use crate::compositor::layout::BlockKind;
    use crate::record::FieldValue;

    #[test]
    fn test_details_only_for_positive_answers() {
        let data = record(&[
            ("sellerName", FieldValue::text("John Seller")),
            ("propertyAddress", FieldValue::text("3 Elm Rd")),
            ("knownDefects", FieldValue::Bool(true)),
            ("defectsDetails", FieldValue::text("Cracked foundation wall")),
            ("pestDetails", FieldValue::text("Ignored because unchecked")),
            ("disclosureDate", FieldValue::text("2024-03-01")),
        ]);
        let pages = render(&SellerDisclosure, &data);
        let text = all_text(&pages);
        assert!(text.contains("Cracked foundation wall"));
        assert!(!text.contains("Ignored because unchecked"));
        assert_eq!(text.matches("YES").count(), 1);
        assert_eq!(text.matches("NO").count(), 3);
        assert_eq!(count_blocks(&pages, BlockKind::Signature), 2);
    }
}

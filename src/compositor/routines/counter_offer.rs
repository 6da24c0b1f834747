//! Counter-offer to a promise to purchase.

use super::{Composer, DocumentRoutine};
use crate::templates::catalog::COUNTER_OFFER;

pub struct CounterOffer;

impl DocumentRoutine for CounterOffer {
    fn template_id(&self) -> &'static str {
        COUNTER_OFFER
    }

    fn party_field(&self) -> &'static str {
        "offereeName"
    }

    fn render(&self, doc: &mut Composer<'_>) {
        let number = doc.text_or_blank("counterOfferNumber");
        doc.title(&format!("COUNTER-OFFER NO. {}", number));

        doc.paragraph(&format!(
            "In response to the promise to purchase dated {} made by {} (the \"offeror\") \
             to {} (the \"offeree\") for the property located at {}, the offeree makes \
             the following counter-offer:",
            doc.text_or_blank("originalOfferDate"),
            doc.text_or_blank("offerorName"),
            doc.text_or_blank("offereeName"),
            doc.text_or_blank("propertyAddress").replace('\n', ", "),
        ));

        doc.heading("Amended terms");
        doc.inline_money("revisedPrice");
        if doc.has("revisedDeposit") {
            doc.inline_money("revisedDeposit");
        }
        doc.inline_if_present("revisedClosingDate");
        doc.stacked("amendments");

        if doc.flag("otherTermsUnchanged") {
            doc.paragraph(
                "All other terms and conditions of the original promise to purchase \
                 remain unchanged.",
            );
        }

        doc.heading("Expiry");
        doc.paragraph(&format!(
            "This counter-offer is irrevocable until {} on {}. If it has not been \
             accepted in writing by then, it becomes null and void.",
            doc.text_or_blank("expiryTime"),
            doc.text_or_blank("expiryDate"),
        ));

        doc.heading("Signatures");
        doc.signature("Offeree (counter-offering party)", Some("offereeSignature"), None);
        doc.signature("Offeror (acceptance)", Some("offerorSignature"), None);
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{all_text, count_blocks, record, render};
    use super::*;
    use crate::compositor::layout::BlockKind;
    use crate::record::FieldValue;

    fn counter() -> crate::record::DataRecord {
        record(&[
            ("counterOfferNumber", FieldValue::Number(2.0)),
            ("originalOfferDate", FieldValue::text("2024-02-01")),
            ("offerorName", FieldValue::text("Jane Buyer")),
            ("offereeName", FieldValue::text("John Seller")),
            ("propertyAddress", FieldValue::text("3 Elm Rd")),
            ("revisedPrice", FieldValue::Number(515000.0)),
            ("amendments", FieldValue::text("Closing moved to July.")),
            ("otherTermsUnchanged", FieldValue::Bool(true)),
            ("expiryDate", FieldValue::text("2024-02-05")),
            ("expiryTime", FieldValue::text("17:00")),
        ])
    }

    #[test]
    fn test_counter_offer_content() {
        let pages = render(&CounterOffer, &counter());
        let text = all_text(&pages);
        assert!(text.contains("COUNTER-OFFER NO. 2"));
        assert!(text.contains("$515,000.00"));
        assert!(text.contains("17:00 on 2024-02-05"));
        assert!(text.contains("remain unchanged"));
        assert_eq!(count_blocks(&pages, BlockKind::Signature), 2);
    }

    #[test]
    fn test_changed_terms_clause_is_skipped() {
        let mut data = counter();
        data.insert("otherTermsUnchanged".into(), FieldValue::Bool(false));
        let text = all_text(&render(&CounterOffer, &data));
        assert!(!text.contains("remain unchanged"));
    }
}

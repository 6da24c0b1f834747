//! Residential purchase agreement.

use super::{Composer, DocumentRoutine};
use crate::compositor::format::format_amount;
use crate::compositor::layout::BLANK;
use crate::templates::catalog::PURCHASE_AGREEMENT;

/// Inspection conditions, each gated on its own checkbox.
const INSPECTIONS: [(&str, &str); 3] = [
    (
        "buildingInspection",
        "The buyer may have the building inspected by a qualified building inspector of \
         their choice. Should the inspection reveal a material defect, the buyer may \
         cancel this agreement by written notice to the seller.",
    ),
    (
        "environmentalInspection",
        "The buyer may obtain an environmental site assessment. Should the assessment \
         reveal contamination of the land, the buyer may cancel this agreement by \
         written notice to the seller.",
    ),
    (
        "waterQualityInspection",
        "The buyer may have the drinking water supply tested for potability. Should the \
         test show the water is not potable, the buyer may cancel this agreement by \
         written notice to the seller.",
    ),
];

pub struct PurchaseAgreement;

impl DocumentRoutine for PurchaseAgreement {
    fn template_id(&self) -> &'static str {
        PURCHASE_AGREEMENT
    }

    fn party_field(&self) -> &'static str {
        "buyerName"
    }

    fn render(&self, doc: &mut Composer<'_>) {
        let name = doc.template().name.to_uppercase();
        doc.title(&name);
        doc.inline("agreementDate");

        doc.heading("1. Identification of the parties");
        doc.inline("buyerName");
        doc.inline("buyerAddress");
        doc.inline_if_present("buyerPhone");
        doc.inline_if_present("buyerEmail");
        doc.inline_if_present("coBuyerName");
        doc.paragraph("hereinafter called the \"buyer\", and");
        doc.inline("sellerName");
        doc.inline("sellerAddress");
        doc.inline_if_present("coSellerName");
        doc.paragraph("hereinafter called the \"seller\".");

        doc.heading("2. Description of the property");
        doc.paragraph(
            "The buyer promises to purchase, subject to the conditions below, the \
             following immovable property:",
        );
        doc.inline("propertyAddress");
        doc.inline("propertyType");
        doc.stacked("legalDescription");

        doc.heading("3. Included and excluded items");
        doc.stacked_or("includedItems", "None");
        doc.stacked_or("excludedItems", "None");

        doc.heading("4. Purchase price");
        let price = doc.money("purchasePrice");
        doc.paragraph(&format!(
            "The purchase price is {}, payable as follows:",
            price
        ));
        doc.inline_money("depositAmount");
        doc.inline("depositDueDate");
        let balance = match (doc.number("purchasePrice"), doc.number("depositAmount")) {
            (Some(price), Some(deposit)) => format_amount(price - deposit),
            _ => BLANK.to_string(),
        };
        doc.layout.inline_field("Balance payable at closing", &balance);

        doc.heading("5. Mortgage financing");
        if doc.flag("mortgageContingency") {
            doc.paragraph(&format!(
                "This agreement is conditional upon the buyer obtaining, within {} days of \
                 its acceptance, a first mortgage loan of not less than {} at an interest \
                 rate not exceeding {}% per year. Failing written notice of approval within \
                 that delay, this agreement becomes null and void and the deposit is \
                 returned to the buyer in full.",
                doc.text_or_blank("mortgageApprovalDays"),
                doc.money("mortgageAmount"),
                doc.text_or_blank("mortgageRate"),
            ));
        } else {
            doc.paragraph(
                "This agreement is not conditional upon the buyer obtaining mortgage \
                 financing.",
            );
        }

        doc.heading("6. Inspections");
        let mut any_inspection = false;
        for (flag, clause) in INSPECTIONS {
            if doc.flag(flag) {
                doc.paragraph(clause);
                any_inspection = true;
            }
        }
        if any_inspection {
            doc.inline("inspectionDays");
        } else {
            doc.paragraph("The buyer waives any inspection condition.");
        }

        doc.heading("7. Transfer of title and occupancy");
        let notary = if doc.has("notaryName") {
            doc.text("notaryName")
        } else {
            "a notary chosen by the buyer".to_string()
        };
        doc.paragraph(&format!(
            "The deed of sale shall be signed before {} on or before {}. The seller \
             shall deliver a good and marketable title, free of all encumbrances other \
             than those disclosed in this agreement.",
            notary,
            doc.text_or_blank("closingDate"),
        ));
        doc.inline("closingDate");
        doc.inline_if_present("occupancyDate");

        doc.heading("8. Additional conditions");
        doc.stacked_or("additionalConditions", "None");

        doc.heading("9. Signatures");
        doc.signature("Buyer", Some("buyerSignature"), Some("agreementDate"));
        doc.signature("Co-buyer", None, None);
        doc.signature("Seller", Some("sellerSignature"), Some("agreementDate"));
        doc.signature("Co-seller", None, None);
    }
}

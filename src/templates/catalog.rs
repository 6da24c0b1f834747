//! Built-in legal document templates.

use super::model::{DocumentTemplate, FieldKind, FieldModel, Section, TemplateCategory};

pub const PURCHASE_AGREEMENT: &str = "purchase-agreement";
pub const TERMINATION_LETTER: &str = "termination-letter";
pub const COUNTER_OFFER: &str = "counter-offer";
pub const SELLER_DISCLOSURE: &str = "seller-disclosure";
pub const INSPECTION_NOTICE: &str = "inspection-notice";

const PHONE_PATTERN: &str = r"^[0-9()+\-. ]{7,20}$";
const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
const TIME_PATTERN: &str = r"^([01][0-9]|2[0-3]):[0-5][0-9]$";

pub fn builtin_templates() -> Vec<DocumentTemplate> {
    vec![
        purchase_agreement(),
        termination_letter(),
        counter_offer(),
        seller_disclosure(),
        inspection_notice(),
    ]
}

fn text(name: &str, label: &str) -> FieldModel {
    FieldModel::new(name, label, FieldKind::Text)
}

fn textarea(name: &str, label: &str) -> FieldModel {
    FieldModel::new(name, label, FieldKind::Textarea)
}

fn date(name: &str, label: &str) -> FieldModel {
    FieldModel::new(name, label, FieldKind::Date).placeholder("YYYY-MM-DD")
}

fn currency(name: &str, label: &str) -> FieldModel {
    FieldModel::new(name, label, FieldKind::Currency)
}

fn number(name: &str, label: &str) -> FieldModel {
    FieldModel::new(name, label, FieldKind::Number)
}

fn checkbox(name: &str, label: &str) -> FieldModel {
    FieldModel::new(name, label, FieldKind::Checkbox).default_value(false)
}

fn signature(name: &str, label: &str) -> FieldModel {
    FieldModel::new(name, label, FieldKind::Signature)
}

fn purchase_agreement() -> DocumentTemplate {
    DocumentTemplate {
        id: PURCHASE_AGREEMENT.to_string(),
        name: "Residential Purchase Agreement".to_string(),
        description: "Promise to purchase an immovable residential property, with financing \
                      and inspection conditions."
            .to_string(),
        category: TemplateCategory::PurchaseAgreement,
        fields: vec![
            text("buyerName", "Buyer full name").required().max_length(120),
            textarea("buyerAddress", "Buyer address").required(),
            text("buyerPhone", "Buyer phone").pattern(PHONE_PATTERN),
            text("buyerEmail", "Buyer email").pattern(EMAIL_PATTERN),
            text("coBuyerName", "Co-buyer full name").max_length(120),
            text("sellerName", "Seller full name").required().max_length(120),
            textarea("sellerAddress", "Seller address").required(),
            text("coSellerName", "Co-seller full name").max_length(120),
            textarea("propertyAddress", "Property address").required(),
            textarea("legalDescription", "Cadastral / legal description"),
            FieldModel::select(
                "propertyType",
                "Property type",
                &[
                    "Single-family home",
                    "Condominium",
                    "Duplex",
                    "Triplex",
                    "Vacant land",
                ],
            )
            .required(),
            textarea("includedItems", "Included items"),
            textarea("excludedItems", "Excluded items"),
            currency("purchasePrice", "Purchase price").required().min(1.0),
            currency("depositAmount", "Deposit").required().min(0.0),
            date("depositDueDate", "Deposit due date"),
            checkbox("mortgageContingency", "Conditional on mortgage financing"),
            currency("mortgageAmount", "Mortgage amount").min(0.0),
            number("mortgageRate", "Maximum interest rate (%)").min(0.0).max(25.0),
            number("mortgageApprovalDays", "Days to obtain financing").min(1.0).max(90.0),
            checkbox("buildingInspection", "Building inspection"),
            checkbox("environmentalInspection", "Environmental inspection"),
            checkbox("waterQualityInspection", "Water quality inspection"),
            number("inspectionDays", "Days to complete inspections").min(1.0).max(60.0),
            date("closingDate", "Deed of sale (closing) date").required(),
            date("occupancyDate", "Occupancy date"),
            text("notaryName", "Notary"),
            textarea("additionalConditions", "Additional conditions").max_length(2000),
            date("agreementDate", "Date of agreement").required(),
            signature("buyerSignature", "Buyer signature"),
            signature("sellerSignature", "Seller signature"),
        ],
        sections: vec![
            Section::new(
                "parties",
                "Identification of the parties",
                &[
                    "buyerName",
                    "buyerAddress",
                    "buyerPhone",
                    "buyerEmail",
                    "coBuyerName",
                    "sellerName",
                    "sellerAddress",
                    "coSellerName",
                ],
            ),
            Section::new(
                "property",
                "Property",
                &[
                    "propertyAddress",
                    "legalDescription",
                    "propertyType",
                    "includedItems",
                    "excludedItems",
                ],
            ),
            Section::new(
                "price",
                "Purchase price",
                &["purchasePrice", "depositAmount", "depositDueDate"],
            ),
            Section::new(
                "financing",
                "Mortgage financing",
                &[
                    "mortgageContingency",
                    "mortgageAmount",
                    "mortgageRate",
                    "mortgageApprovalDays",
                ],
            ),
            Section::new(
                "inspections",
                "Inspections",
                &[
                    "buildingInspection",
                    "environmentalInspection",
                    "waterQualityInspection",
                    "inspectionDays",
                ],
            )
            .describe("Each selected inspection becomes a condition of the agreement."),
            Section::new(
                "closing",
                "Transfer of title",
                &["closingDate", "occupancyDate", "notaryName"],
            ),
            Section::new("conditions", "Other conditions", &["additionalConditions"]),
            Section::new(
                "signatures",
                "Signatures",
                &["agreementDate", "buyerSignature", "sellerSignature"],
            ),
        ],
    }
}

fn termination_letter() -> DocumentTemplate {
    DocumentTemplate {
        id: TERMINATION_LETTER.to_string(),
        name: "Contract Termination Letter".to_string(),
        description: "Written notice terminating a brokerage contract, promise to purchase \
                      or lease."
            .to_string(),
        category: TemplateCategory::Termination,
        fields: vec![
            text("senderName", "Sender name").required(),
            textarea("senderAddress", "Sender address").required(),
            text("recipientName", "Recipient name").required(),
            textarea("recipientAddress", "Recipient address").required(),
            FieldModel::select(
                "contractType",
                "Contract being terminated",
                &["Brokerage contract", "Promise to purchase", "Lease"],
            )
            .required(),
            text("contractReference", "Contract number"),
            date("contractDate", "Contract date").required(),
            textarea("propertyAddress", "Property address").required(),
            date("terminationDate", "Effective termination date").required(),
            FieldModel::select(
                "terminationReason",
                "Reason for termination",
                &[
                    "Mutual agreement",
                    "Unfulfilled condition",
                    "Breach of contract",
                    "Expiry of term",
                    "Other",
                ],
            )
            .required(),
            textarea("reasonDetails", "Details").max_length(1500),
            checkbox("depositRefund", "Request refund of deposit"),
            currency("refundAmount", "Amount to refund").min(0.0),
            textarea("distributionDetails", "Copies to (one per line)"),
            date("letterDate", "Letter date").required(),
            signature("senderSignature", "Sender signature"),
        ],
        sections: vec![
            Section::new(
                "correspondents",
                "Sender and recipient",
                &[
                    "senderName",
                    "senderAddress",
                    "recipientName",
                    "recipientAddress",
                ],
            ),
            Section::new(
                "contract",
                "Contract",
                &[
                    "contractType",
                    "contractReference",
                    "contractDate",
                    "propertyAddress",
                ],
            ),
            Section::new(
                "termination",
                "Termination",
                &[
                    "terminationDate",
                    "terminationReason",
                    "reasonDetails",
                    "depositRefund",
                    "refundAmount",
                ],
            ),
            Section::new(
                "closing",
                "Distribution and signature",
                &["distributionDetails", "letterDate", "senderSignature"],
            ),
        ],
    }
}

fn counter_offer() -> DocumentTemplate {
    DocumentTemplate {
        id: COUNTER_OFFER.to_string(),
        name: "Counter-Offer".to_string(),
        description: "Counter-proposal amending the terms of a promise to purchase.".to_string(),
        category: TemplateCategory::CounterOffer,
        fields: vec![
            number("counterOfferNumber", "Counter-offer number")
                .required()
                .min(1.0)
                .max(99.0)
                .default_value(1.0),
            date("originalOfferDate", "Date of the original offer").required(),
            text("offerorName", "Party making the counter-offer").required(),
            text("offereeName", "Party receiving the counter-offer").required(),
            textarea("propertyAddress", "Property address").required(),
            currency("revisedPrice", "Revised purchase price").required().min(1.0),
            currency("revisedDeposit", "Revised deposit").min(0.0),
            date("revisedClosingDate", "Revised closing date"),
            textarea("amendments", "Other amendments")
                .required()
                .min_length(10)
                .max_length(2000),
            checkbox("otherTermsUnchanged", "All other terms remain unchanged").default_value(true),
            date("expiryDate", "Counter-offer expiry date").required(),
            text("expiryTime", "Expiry time")
                .required()
                .pattern(TIME_PATTERN)
                .placeholder("HH:MM"),
            signature("offerorSignature", "Offeror signature"),
            signature("offereeSignature", "Offeree signature"),
        ],
        sections: vec![
            Section::new(
                "reference",
                "Reference",
                &[
                    "counterOfferNumber",
                    "originalOfferDate",
                    "offerorName",
                    "offereeName",
                    "propertyAddress",
                ],
            ),
            Section::new(
                "amendments",
                "Amendments",
                &[
                    "revisedPrice",
                    "revisedDeposit",
                    "revisedClosingDate",
                    "amendments",
                    "otherTermsUnchanged",
                ],
            ),
            Section::new(
                "acceptance",
                "Delay for acceptance",
                &[
                    "expiryDate",
                    "expiryTime",
                    "offerorSignature",
                    "offereeSignature",
                ],
            ),
        ],
    }
}

fn seller_disclosure() -> DocumentTemplate {
    DocumentTemplate {
        id: SELLER_DISCLOSURE.to_string(),
        name: "Seller's Declarations".to_string(),
        description: "Seller's disclosure of known defects and conditions affecting the \
                      property."
            .to_string(),
        category: TemplateCategory::Disclosure,
        fields: vec![
            text("sellerName", "Seller full name").required(),
            textarea("propertyAddress", "Property address").required(),
            number("yearBuilt", "Year built").min(1800.0).max(2100.0),
            number("ownershipYears", "Years of ownership").min(0.0).max(150.0),
            checkbox("knownDefects", "Known latent defects"),
            textarea("defectsDetails", "Defect details").max_length(1500),
            checkbox("waterInfiltration", "Past water infiltration"),
            textarea("waterDetails", "Water infiltration details").max_length(1500),
            checkbox("pestInfestation", "Pest infestation"),
            textarea("pestDetails", "Pest details").max_length(1500),
            checkbox("environmentalIssues", "Environmental issues"),
            textarea("environmentalDetails", "Environmental details").max_length(1500),
            textarea("renovations", "Renovations carried out").max_length(2000),
            date("disclosureDate", "Declaration date").required(),
            signature("sellerSignature", "Seller signature"),
            signature("buyerSignature", "Buyer acknowledgement"),
        ],
        sections: vec![
            Section::new(
                "property",
                "Property",
                &["sellerName", "propertyAddress", "yearBuilt", "ownershipYears"],
            ),
            Section::new(
                "declarations",
                "Declarations",
                &[
                    "knownDefects",
                    "defectsDetails",
                    "waterInfiltration",
                    "waterDetails",
                    "pestInfestation",
                    "pestDetails",
                    "environmentalIssues",
                    "environmentalDetails",
                    "renovations",
                ],
            ),
            Section::new(
                "signatures",
                "Signatures",
                &["disclosureDate", "sellerSignature", "buyerSignature"],
            ),
        ],
    }
}

fn inspection_notice() -> DocumentTemplate {
    DocumentTemplate {
        id: INSPECTION_NOTICE.to_string(),
        name: "Notice of Inspection Results".to_string(),
        description: "Buyer's notice to the seller following the pre-purchase inspection."
            .to_string(),
        category: TemplateCategory::Inspection,
        fields: vec![
            text("buyerName", "Buyer full name").required(),
            text("sellerName", "Seller full name").required(),
            textarea("propertyAddress", "Property address").required(),
            date("agreementDate", "Date of the purchase agreement").required(),
            text("inspectorName", "Inspector").required(),
            date("inspectionDate", "Inspection date").required(),
            FieldModel::select(
                "inspectionOutcome",
                "Outcome",
                &["Satisfied", "Deficiencies found"],
            )
            .required(),
            textarea("deficiencies", "Deficiencies found").max_length(2000),
            FieldModel::select(
                "requestedRemedy",
                "Requested remedy",
                &["Price reduction", "Repairs before closing", "Cancellation"],
            ),
            currency("reductionAmount", "Requested price reduction").min(0.0),
            date("remedyDeadline", "Seller response deadline"),
            date("noticeDate", "Notice date").required(),
            signature("buyerSignature", "Buyer signature"),
            signature("sellerSignature", "Seller acknowledgement"),
        ],
        sections: vec![
            Section::new(
                "reference",
                "Reference",
                &["buyerName", "sellerName", "propertyAddress", "agreementDate"],
            ),
            Section::new(
                "inspection",
                "Inspection",
                &[
                    "inspectorName",
                    "inspectionDate",
                    "inspectionOutcome",
                    "deficiencies",
                    "requestedRemedy",
                    "reductionAmount",
                    "remedyDeadline",
                ],
            ),
            Section::new(
                "signatures",
                "Signatures",
                &["noticeDate", "buyerSignature", "sellerSignature"],
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_field_is_grouped_in_a_section() {
        for template in builtin_templates() {
            let grouped: usize = template.sections.iter().map(|s| s.fields.len()).sum();
            assert_eq!(grouped, template.fields.len(), "template {}", template.id);
        }
    }

    #[test]
    fn test_every_template_requires_something() {
        for template in builtin_templates() {
            assert!(
                template.required_fields().count() > 0,
                "template {}",
                template.id
            );
        }
    }

    #[test]
    fn test_purchase_agreement_required_fields() {
        let template = purchase_agreement();
        let required: Vec<&str> = template.required_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(
            required,
            vec![
                "buyerName",
                "buyerAddress",
                "sellerName",
                "sellerAddress",
                "propertyAddress",
                "propertyType",
                "purchasePrice",
                "depositAmount",
                "closingDate",
                "agreementDate",
            ]
        );
    }
}

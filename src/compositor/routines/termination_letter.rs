//! Notice of termination of a brokerage contract, promise to purchase or lease.

use super::{Composer, DocumentRoutine};
use crate::templates::catalog::TERMINATION_LETTER;

/// Distribution list length printed even when nobody is listed.
pub const MIN_DISTRIBUTION_LINES: usize = 4;

pub struct TerminationLetter;

impl DocumentRoutine for TerminationLetter {
    fn template_id(&self) -> &'static str {
        TERMINATION_LETTER
    }

    fn party_field(&self) -> &'static str {
        "senderName"
    }

    fn render(&self, doc: &mut Composer<'_>) {
        doc.paragraph(&format!(
            "{}\n{}",
            doc.text_or_blank("senderName"),
            doc.text_or_blank("senderAddress")
        ));
        doc.inline("letterDate");
        doc.paragraph(&format!(
            "To:\n{}\n{}",
            doc.text_or_blank("recipientName"),
            doc.text_or_blank("recipientAddress")
        ));

        let contract = doc.text_or_blank("contractType");
        doc.heading(&format!("Subject: Notice of termination ({})", contract));
        doc.inline_if_present("contractReference");

        doc.paragraph(&format!(
            "Please take notice that the {} entered into on {} concerning the property \
             located at {} is terminated effective {}.",
            contract.to_lowercase(),
            doc.text_or_blank("contractDate"),
            doc.text_or_blank("propertyAddress").replace('\n', ", "),
            doc.text_or_blank("terminationDate"),
        ));
        doc.inline("terminationReason");
        if doc.has("reasonDetails") {
            doc.stacked("reasonDetails");
        }

        if doc.flag("depositRefund") {
            doc.paragraph(&format!(
                "The deposit of {} shall be returned in full to the buyer within ten days \
                 of this notice.",
                doc.money("refundAmount")
            ));
        }

        doc.paragraph(
            "This notice is sent without prejudice to any other right or recourse. \
             Please govern yourself accordingly.",
        );

        doc.signature("Sender", Some("senderSignature"), Some("letterDate"));

        doc.heading("Distribution");
        let entries = distribution_entries(&doc.text("distributionDetails"));
        let blanks = MIN_DISTRIBUTION_LINES.saturating_sub(entries.len());
        for entry in &entries {
            doc.paragraph(&format!("c.c. {}", entry));
        }
        for _ in 0..blanks {
            doc.layout.blank_line();
        }
    }
}

/// One recipient per line or per `;`.
fn distribution_entries(raw: &str) -> Vec<String> {
    raw.split(|c| c == '\n' || c == ';')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect()
}

//! Store module - persistence of generated document records.
//!
//! The core only talks to [`DocumentStore`]; `memory` provides the in-process
//! implementation used by the server and the tests.

pub mod memory;

pub use memory::InMemoryDocumentStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::record::DataRecord;
use crate::templates::TemplateCategory;

/// Errors reported by a store backend. Passed to callers unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("document store unavailable: {0}")]
    Unavailable(String),
    #[error("document store rejected the write: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Draft,
    Completed,
    Signed,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Completed => "completed",
            Self::Signed => "signed",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "draft" => Ok(Self::Draft),
            "completed" => Ok(Self::Completed),
            "signed" => Ok(Self::Signed),
            other => Err(format!("unknown document status '{}'", other)),
        }
    }
}

/// A saved document: the record snapshot plus bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDocument {
    #[schema(example = "f1e2d3c4-b5a6-7890-1234-567890abcdef")]
    pub id: Uuid,
    #[schema(example = "purchase-agreement")]
    pub template_id: String,
    #[schema(example = "Residential Purchase Agreement")]
    pub template_name: String,
    pub category: TemplateCategory,
    #[schema(example = "purchase-agreement-jane-buyer.pdf")]
    pub file_name: String,
    #[schema(value_type = Object)]
    pub data: DataRecord,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    pub status: DocumentStatus,
}

/// Browsing filter over stored documents. All criteria are optional and combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DocumentFilter {
    /// Case-insensitive match on template name, file name or any text value.
    pub search: Option<String>,
    pub status: Option<DocumentStatus>,
    pub category: Option<TemplateCategory>,
}

impl DocumentFilter {
    pub fn matches(&self, doc: &GeneratedDocument) -> bool {
        if self.status.map_or(false, |s| s != doc.status) {
            return false;
        }
        if self.category.map_or(false, |c| c != doc.category) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                doc.template_name.to_lowercase().contains(&needle)
                    || doc.file_name.to_lowercase().contains(&needle)
                    || doc
                        .data
                        .values()
                        .filter_map(|v| v.as_str())
                        .any(|v| v.to_lowercase().contains(&needle))
            }
        }
    }
}

/// Persistence of generated documents.
///
/// `save` always receives a full record and replaces any previous one with the
/// same id (last writer wins).
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    async fn load(&self, id: Uuid) -> Result<Option<GeneratedDocument>, StoreError>;

    async fn save(&self, document: GeneratedDocument) -> Result<(), StoreError>;

    async fn list(&self) -> Result<Vec<GeneratedDocument>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;

    fn doc(status: DocumentStatus, category: TemplateCategory) -> GeneratedDocument {
        let now = Utc::now();
        let mut data = DataRecord::new();
        data.insert("buyerName".into(), FieldValue::text("Jane Buyer"));
        data.insert("purchasePrice".into(), FieldValue::Number(500000.0));
        GeneratedDocument {
            id: Uuid::new_v4(),
            template_id: "purchase-agreement".into(),
            template_name: "Residential Purchase Agreement".into(),
            category,
            file_name: "purchase-agreement-jane-buyer.pdf".into(),
            data,
            created_at: now,
            updated_at: now,
            pdf_url: None,
            status,
        }
    }

    #[test]
    fn test_filter_by_status_and_category() {
        let d = doc(DocumentStatus::Draft, TemplateCategory::PurchaseAgreement);
        assert!(DocumentFilter::default().matches(&d));

        let filter = DocumentFilter {
            status: Some(DocumentStatus::Completed),
            ..Default::default()
        };
        assert!(!filter.matches(&d));

        let filter = DocumentFilter {
            status: Some(DocumentStatus::Draft),
            category: Some(TemplateCategory::PurchaseAgreement),
            ..Default::default()
        };
        assert!(filter.matches(&d));
    }

    #[test]
    fn test_filter_search_text() {
        let d = doc(DocumentStatus::Completed, TemplateCategory::PurchaseAgreement);
        let search = |s: &str| DocumentFilter {
            search: Some(s.to_string()),
            ..Default::default()
        };
        assert!(search("jane").matches(&d));
        assert!(search("PURCHASE").matches(&d));
        assert!(search("  ").matches(&d));
        assert!(!search("lease").matches(&d));
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&DocumentStatus::Completed).unwrap(),
            "\"completed\""
        );
        assert_eq!("signed".parse::<DocumentStatus>(), Ok(DocumentStatus::Signed));
    }
}

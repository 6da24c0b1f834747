//! File payloads returned by the generation endpoints.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::compositor::ComposedDocument;

pub const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    /// File name with extension
    #[schema(example = "purchase-agreement-jane-buyer.pdf")]
    pub filename: String,
    #[schema(example = "application/pdf")]
    pub mime_type: String,
    pub size_bytes: usize,
    /// ISO8601 creation time
    pub created_at: String,
}

/// File content with metadata and base64-encoded data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileContent {
    pub metadata: FileMetadata,
    /// Base64-encoded file data
    pub data: String,
}

impl FileContent {
    pub fn new(filename: impl Into<String>, mime_type: impl Into<String>, data: &[u8]) -> Self {
        Self {
            metadata: FileMetadata {
                filename: filename.into(),
                mime_type: mime_type.into(),
                size_bytes: data.len(),
                created_at: Utc::now().to_rfc3339(),
            },
            data: BASE64.encode(data),
        }
    }

    pub fn pdf(filename: impl Into<String>, data: &[u8]) -> Self {
        Self::new(filename, PDF_MIME, data)
    }

    pub fn decode_data(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(&self.data)
    }
}

/// A composed document as sent over the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFile {
    pub file: FileContent,
    pub page_count: usize,
}

impl From<&ComposedDocument> for GeneratedFile {
    fn from(doc: &ComposedDocument) -> Self {
        Self {
            file: FileContent::pdf(&doc.file_name, &doc.bytes),
            page_count: doc.page_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_content_round_trips() {
        let content = FileContent::pdf("a.pdf", b"%PDF-1.4 body");
        assert_eq!(content.metadata.mime_type, PDF_MIME);
        assert_eq!(content.metadata.size_bytes, 13);
        assert_eq!(content.decode_data().unwrap(), b"%PDF-1.4 body");

        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["metadata"]["sizeBytes"], 13);
        assert!(json["metadata"]["createdAt"].is_string());
    }
}

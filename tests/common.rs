#![allow(dead_code)]

use legaldoc_server::compositor::{BlockKind, ComposedDocument};
use legaldoc_server::config::AppConfig;
use legaldoc_server::record::{DataRecord, FieldValue};
use legaldoc_server::service::DocumentService;
use legaldoc_server::store::{DocumentStore, GeneratedDocument, InMemoryDocumentStore, StoreError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Store whose writes can be switched to fail or slowed down.
pub struct FlakyStore {
    documents: tokio::sync::Mutex<HashMap<Uuid, GeneratedDocument>>,
    failing: AtomicBool,
    write_delay: Duration,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::with_write_delay(Duration::ZERO)
    }

    pub fn with_write_delay(write_delay: Duration) -> Self {
        Self {
            documents: tokio::sync::Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
            write_delay,
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn count(&self) -> usize {
        self.documents.lock().await.len()
    }
}

#[async_trait::async_trait]
impl DocumentStore for FlakyStore {
    async fn load(&self, id: Uuid) -> Result<Option<GeneratedDocument>, StoreError> {
        Ok(self.documents.lock().await.get(&id).cloned())
    }

    async fn save(&self, document: GeneratedDocument) -> Result<(), StoreError> {
        if !self.write_delay.is_zero() {
            tokio::time::sleep(self.write_delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        self.documents.lock().await.insert(document.id, document);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<GeneratedDocument>, StoreError> {
        Ok(self.documents.lock().await.values().cloned().collect())
    }
}

pub fn service_with(store: Arc<dyn DocumentStore>) -> DocumentService {
    legaldoc_server::build_service(&AppConfig::default(), store).unwrap()
}

pub fn memory_service() -> (DocumentService, InMemoryDocumentStore) {
    let store = InMemoryDocumentStore::new();
    (service_with(Arc::new(store.clone())), store)
}

pub fn record(pairs: &[(&str, FieldValue)]) -> DataRecord {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

pub fn purchase_agreement() -> DataRecord {
    record(&[
        ("buyerName", FieldValue::text("Jane Buyer")),
        ("buyerAddress", FieldValue::text("12 Oak Avenue, Springfield")),
        ("sellerName", FieldValue::text("John Seller")),
        ("sellerAddress", FieldValue::text("48 Pine Street, Springfield")),
        ("propertyAddress", FieldValue::text("3 Elm Road, Springfield")),
        ("propertyType", FieldValue::text("Single-family home")),
        ("purchasePrice", FieldValue::Number(500000.0)),
        ("depositAmount", FieldValue::Number(25000.0)),
        ("closingDate", FieldValue::text("2024-06-01")),
        ("agreementDate", FieldValue::text("2024-03-15")),
    ])
}

pub fn termination_letter() -> DataRecord {
    record(&[
        ("senderName", FieldValue::text("Jane Buyer")),
        ("senderAddress", FieldValue::text("12 Oak Avenue")),
        ("recipientName", FieldValue::text("Acme Realty")),
        ("recipientAddress", FieldValue::text("9 Broker Way")),
        ("contractType", FieldValue::text("Brokerage contract")),
        ("contractDate", FieldValue::text("2024-01-10")),
        ("propertyAddress", FieldValue::text("3 Elm Road")),
        ("terminationDate", FieldValue::text("2024-04-01")),
        ("terminationReason", FieldValue::text("Mutual agreement")),
        ("letterDate", FieldValue::text("2024-03-20")),
        ("distributionDetails", FieldValue::text("")),
    ])
}

/// All page text joined with spaces, so wrapped phrases still match.
pub fn all_text(doc: &ComposedDocument) -> String {
    doc.text_lines().collect::<Vec<_>>().join(" ")
}

pub fn count_blocks(doc: &ComposedDocument, kind: BlockKind) -> usize {
    doc.pages
        .iter()
        .flat_map(|p| &p.blocks)
        .filter(|b| b.kind == kind)
        .count()
}

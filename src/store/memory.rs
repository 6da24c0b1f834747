//! In-memory [`DocumentStore`] used by the server binary and the tests.
//!
//! Records live for the lifetime of the process; clones share the same map.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DocumentStore, GeneratedDocument, StoreError};

/// Process-local store. Listing is ordered by most recent update.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<HashMap<Uuid, GeneratedDocument>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn load(&self, id: Uuid) -> Result<Option<GeneratedDocument>, StoreError> {
        Ok(self.documents.read().await.get(&id).cloned())
    }

    async fn save(&self, document: GeneratedDocument) -> Result<(), StoreError> {
        log::debug!("Storing document {} ({})", document.id, document.status);
        self.documents.write().await.insert(document.id, document);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<GeneratedDocument>, StoreError> {
        let mut documents: Vec<GeneratedDocument> =
            self.documents.read().await.values().cloned().collect();
        documents.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
        Ok(documents)
    }
}

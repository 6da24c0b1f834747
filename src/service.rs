//! Document service - editing sessions, persistence and generation.

use chrono::{DateTime, Utc};
use moka::future::Cache;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::compositor::{ComposedDocument, CompositionError, DocumentCompositor};
use crate::forms::{FormEngine, FormError, FormState, SaveKind, ValidationError, ValidationErrors};
use crate::record::{DataRecord, FieldValue};
use crate::store::{DocumentFilter, DocumentStatus, DocumentStore, GeneratedDocument, StoreError};
use crate::templates::{DocumentTemplate, TemplateCategory, TemplateError, TemplateRegistry};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Composition(#[from] CompositionError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),
    #[error("document not found: {0}")]
    DocumentNotFound(Uuid),
    #[error("document {0} is signed and can no longer be edited")]
    DocumentSigned(Uuid),
    #[error("document is {completion}% complete; fill every required field before generating")]
    GenerationBlocked { completion: u8 },
}

/// Snapshot of an editing session as shown to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: Uuid,
    pub template_id: String,
    pub document_id: Option<Uuid>,
    pub state: FormState,
    pub completion: u8,
    #[schema(value_type = Object)]
    pub data: DataRecord,
    pub errors: Vec<ValidationError>,
    pub can_generate: bool,
}

/// Outcome of a single field mutation.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldUpdate {
    pub field: String,
    pub error: Option<ValidationError>,
    pub completion: u8,
    pub state: FormState,
}

/// Expiry and size bound of one of the service caches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachePolicy {
    pub expiry: Duration,
    pub capacity: u64,
}

struct Session {
    engine: FormEngine,
    /// Id the record is stored under, fixed when the session opens.
    document_id: Uuid,
    created_at: DateTime<Utc>,
    pdf_url: Option<String>,
    /// Whether a save has reached the store.
    stored: bool,
}

impl Session {
    fn new(engine: FormEngine) -> Self {
        Self {
            engine,
            document_id: Uuid::new_v4(),
            created_at: Utc::now(),
            pdf_url: None,
            stored: false,
        }
    }

    fn view(&self, session_id: Uuid) -> SessionView {
        let completion = self.engine.completion();
        SessionView {
            session_id,
            template_id: self.engine.template().id.clone(),
            document_id: self.stored.then_some(self.document_id),
            state: self.engine.state(),
            completion,
            data: self.engine.record().clone(),
            errors: self.engine.field_errors().cloned().collect(),
            can_generate: completion == 100,
        }
    }
}

/// Entry point used by the HTTP layer.
///
/// Sessions live in a bounded cache and are dropped after sitting idle for the
/// session policy's expiry.
#[derive(Clone)]
pub struct DocumentService {
    registry: Arc<TemplateRegistry>,
    compositor: Arc<DocumentCompositor>,
    store: Arc<dyn DocumentStore>,
    sessions: moka::sync::Cache<Uuid, Arc<Mutex<Session>>>,
    render_cache: Cache<String, Arc<ComposedDocument>>,
}

impl DocumentService {
    pub fn new(
        registry: Arc<TemplateRegistry>,
        compositor: Arc<DocumentCompositor>,
        store: Arc<dyn DocumentStore>,
        render: CachePolicy,
        sessions: CachePolicy,
    ) -> Self {
        let render_cache = Cache::builder()
            .time_to_live(render.expiry)
            .max_capacity(render.capacity)
            .build();

        let sessions = moka::sync::Cache::builder()
            .time_to_idle(sessions.expiry)
            .max_capacity(sessions.capacity)
            .eviction_listener(|id: Arc<Uuid>, _, cause| {
                if cause.was_evicted() {
                    log::info!("Session {} dropped ({:?})", id, cause);
                }
            })
            .build();

        Self {
            registry,
            compositor,
            store,
            sessions,
            render_cache,
        }
    }

    pub fn list_templates(&self, category: Option<TemplateCategory>) -> Vec<Arc<DocumentTemplate>> {
        match category {
            Some(category) => self.registry.templates_by_category(category).cloned().collect(),
            None => self.registry.list_templates().to_vec(),
        }
    }

    pub fn template(&self, id: &str) -> Result<Arc<DocumentTemplate>, ServiceError> {
        Ok(self.registry.get_template_by_id(id)?.clone())
    }

    /// Open a new editing session, optionally pre-filled with `initial` values.
    pub fn create_session(
        &self,
        template_id: &str,
        initial: Option<DataRecord>,
    ) -> Result<SessionView, ServiceError> {
        let template = self.template(template_id)?;
        let mut engine = FormEngine::new(template);
        for (name, value) in initial.unwrap_or_default() {
            engine.set_field(&name, value)?;
        }

        let session_id = Uuid::new_v4();
        let session = Session::new(engine);
        let view = session.view(session_id);
        self.sessions.insert(session_id, Arc::new(Mutex::new(session)));

        log::info!("Session {} opened for template '{}'", session_id, template_id);
        Ok(view)
    }

    /// Drop an editing session. Saved documents stay in the store.
    pub fn close_session(&self, session_id: Uuid) -> Result<(), ServiceError> {
        self.sessions
            .remove(&session_id)
            .ok_or(ServiceError::SessionNotFound(session_id))?;
        log::info!("Session {} closed", session_id);
        Ok(())
    }

    pub fn set_field(
        &self,
        session_id: Uuid,
        name: &str,
        value: FieldValue,
    ) -> Result<FieldUpdate, ServiceError> {
        self.with_session(session_id, |session| {
            let error = session.engine.set_field(name, value)?;
            Ok(field_update(name, error, &session.engine))
        })
    }

    pub fn clear_field(&self, session_id: Uuid, name: &str) -> Result<FieldUpdate, ServiceError> {
        self.with_session(session_id, |session| {
            let error = session.engine.clear_field(name)?;
            Ok(field_update(name, error, &session.engine))
        })
    }

    pub fn completion(&self, session_id: Uuid) -> Result<u8, ServiceError> {
        self.with_session(session_id, |session| Ok(session.engine.completion()))
    }

    pub fn session_view(&self, session_id: Uuid) -> Result<SessionView, ServiceError> {
        self.with_session(session_id, |session| Ok(session.view(session_id)))
    }

    /// Persist the session's record as a draft, whatever its completion.
    pub async fn save_draft(&self, session_id: Uuid) -> Result<GeneratedDocument, ServiceError> {
        let pending = self.with_session(session_id, |session| Ok(PendingSave::from(&*session)))?;
        self.persist(session_id, pending, SaveKind::Draft).await
    }

    /// Persist the session's record as completed; every field must validate.
    pub async fn save_complete(&self, session_id: Uuid) -> Result<GeneratedDocument, ServiceError> {
        let pending = self.with_session(session_id, |session| {
            session.engine.validate_all()?;
            Ok(PendingSave::from(&*session))
        })?;
        self.persist(session_id, pending, SaveKind::Complete).await
    }

    /// Reload a stored document into a new editing session.
    pub async fn open_document(&self, document_id: Uuid) -> Result<SessionView, ServiceError> {
        let document = self
            .store
            .load(document_id)
            .await?
            .ok_or(ServiceError::DocumentNotFound(document_id))?;
        if document.status == DocumentStatus::Signed {
            log::warn!("Refusing to reopen signed document {}", document_id);
            return Err(ServiceError::DocumentSigned(document_id));
        }

        let template = self.template(&document.template_id)?;
        let session_id = Uuid::new_v4();
        let session = Session {
            engine: FormEngine::with_record(template, document.data),
            document_id: document.id,
            created_at: document.created_at,
            pdf_url: document.pdf_url,
            stored: true,
        };
        let view = session.view(session_id);
        self.sessions.insert(session_id, Arc::new(Mutex::new(session)));

        log::info!("Document {} reopened in session {}", document_id, session_id);
        Ok(view)
    }

    /// Compose `data` with the template's routine. Results are cached per input.
    pub async fn generate(
        &self,
        template_id: &str,
        data: &DataRecord,
    ) -> Result<Arc<ComposedDocument>, ServiceError> {
        let key = cache_key(template_id, data);
        if let Some(key) = &key {
            if let Some(hit) = self.render_cache.get(key).await {
                log::debug!("Render cache hit for '{}'", template_id);
                return Ok(hit);
            }
        }

        let composed = Arc::new(self.compositor.compose(template_id, data)?);
        if let Some(key) = key {
            self.render_cache.insert(key, composed.clone()).await;
        }
        Ok(composed)
    }

    /// Compose the session's document once every required field is filled.
    pub async fn generate_for_session(
        &self,
        session_id: Uuid,
    ) -> Result<Arc<ComposedDocument>, ServiceError> {
        let (template_id, data) = self.with_session(session_id, |session| {
            let completion = session.engine.completion();
            if completion < 100 {
                return Err(ServiceError::GenerationBlocked { completion });
            }
            Ok((
                session.engine.template().id.clone(),
                session.engine.record().clone(),
            ))
        })?;
        self.generate(&template_id, &data).await
    }

    pub async fn list_documents(
        &self,
        filter: &DocumentFilter,
    ) -> Result<Vec<GeneratedDocument>, ServiceError> {
        let documents = self.store.list().await?;
        Ok(documents.into_iter().filter(|d| filter.matches(d)).collect())
    }

    pub async fn get_document(&self, id: Uuid) -> Result<GeneratedDocument, ServiceError> {
        self.store
            .load(id)
            .await?
            .ok_or(ServiceError::DocumentNotFound(id))
    }

    fn with_session<T, F>(&self, session_id: Uuid, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut Session) -> Result<T, ServiceError>,
    {
        let session = self
            .sessions
            .get(&session_id)
            .ok_or(ServiceError::SessionNotFound(session_id))?;
        let mut guard = session.lock();
        f(&mut *guard)
    }

    /// Write the snapshot, then mark the session saved if it was not edited meanwhile.
    async fn persist(
        &self,
        session_id: Uuid,
        pending: PendingSave,
        kind: SaveKind,
    ) -> Result<GeneratedDocument, ServiceError> {
        let template = self.template(&pending.template_id)?;
        let now = Utc::now();
        let document = GeneratedDocument {
            id: pending.document_id,
            template_id: template.id.clone(),
            template_name: template.name.clone(),
            category: template.category,
            file_name: self.compositor.file_name(&template.id, &pending.data)?,
            data: pending.data,
            created_at: pending.created_at,
            updated_at: now,
            pdf_url: pending.pdf_url,
            status: match kind {
                SaveKind::Draft => DocumentStatus::Draft,
                SaveKind::Complete => DocumentStatus::Completed,
            },
        };

        if let Err(e) = self.store.save(document.clone()).await {
            log::error!("Saving document {} failed: {}", document.id, e);
            return Err(e.into());
        }

        if let Some(session) = self.sessions.get(&session_id) {
            let mut session = session.lock();
            session.stored = true;
            if session.engine.record() == &document.data {
                session.engine.mark_saved(kind);
            }
        }
        log::info!("Document {} saved as {}", document.id, document.status);
        Ok(document)
    }
}

struct PendingSave {
    template_id: String,
    data: DataRecord,
    document_id: Uuid,
    created_at: DateTime<Utc>,
    pdf_url: Option<String>,
}

impl From<&Session> for PendingSave {
    fn from(session: &Session) -> Self {
        Self {
            template_id: session.engine.template().id.clone(),
            data: session.engine.record().clone(),
            document_id: session.document_id,
            created_at: session.created_at,
            pdf_url: session.pdf_url.clone(),
        }
    }
}

fn field_update(name: &str, error: Option<ValidationError>, engine: &FormEngine) -> FieldUpdate {
    FieldUpdate {
        field: name.to_string(),
        error,
        completion: engine.completion(),
        state: engine.state(),
    }
}

/// Template id plus the canonical JSON of the record; `None` if it cannot be encoded.
fn cache_key(template_id: &str, data: &DataRecord) -> Option<String> {
    match serde_json::to_string(data) {
        Ok(json) => Some(format!("{}\u{0}{}", template_id, json)),
        Err(e) => {
            log::warn!("Record not cacheable: {}", e);
            None
        }
    }
}

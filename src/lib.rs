use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod api;
pub mod compositor;
pub mod config;
pub mod forms;
pub mod record;
pub mod service;
pub mod store;
pub mod templates;

use crate::compositor::DocumentCompositor;
use crate::config::AppConfig;
use crate::forms::ValidationError;
use crate::service::{CachePolicy, DocumentService};
use crate::store::{DocumentStore, InMemoryDocumentStore};
use crate::templates::{TemplateError, TemplateRegistry};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    /// Per-field failures, present on validation errors only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationError>,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            errors: Vec::new(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn unprocessable(message: &str) -> Self {
        Self::new("ValidationFailed", message)
    }

    pub fn conflict(message: &str) -> Self {
        Self::new("Conflict", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }

    pub fn with_errors(mut self, errors: Vec<ValidationError>) -> Self {
        self.errors = errors;
        self
    }
}

/// Wire the registry, compositor and store into a service.
pub fn build_service(
    config: &AppConfig,
    store: Arc<dyn DocumentStore>,
) -> Result<DocumentService, TemplateError> {
    let registry = Arc::new(TemplateRegistry::builtin()?);
    let compositor = Arc::new(DocumentCompositor::new(registry.clone(), config.geometry));
    log::info!("Loaded {} document templates", registry.len());

    Ok(DocumentService::new(
        registry,
        compositor,
        store,
        CachePolicy {
            expiry: config.render_cache_ttl,
            capacity: config.render_cache_capacity,
        },
        CachePolicy {
            expiry: config.session_idle_timeout,
            capacity: config.session_capacity,
        },
    ))
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    env_logger::Builder::new()
        .parse_filters(&config.log_filter)
        .init();

    #[derive(OpenApi)]
    #[openapi(
        paths(
            crate::api::templates::list_templates,
            crate::api::templates::get_template,
            crate::api::sessions::create_session,
            crate::api::sessions::get_session,
            crate::api::sessions::close_session,
            crate::api::sessions::set_field,
            crate::api::sessions::clear_field,
            crate::api::sessions::save_draft,
            crate::api::sessions::save_complete,
            crate::api::sessions::generate,
            crate::api::documents::list_documents,
            crate::api::documents::get_document,
            crate::api::documents::edit_document,
            crate::api::documents::generate
        ),
        components(
            schemas(
                templates::DocumentTemplate,
                templates::TemplateCategory,
                api::templates::TemplateSummary,
                api::sessions::CreateSessionRequest,
                api::sessions::SetFieldRequest,
                api::documents::GenerateRequest,
                api::content::FileContent,
                api::content::FileMetadata,
                api::content::GeneratedFile,
                service::SessionView,
                service::FieldUpdate,
                forms::FormState,
                forms::Rule,
                forms::ValidationError,
                store::GeneratedDocument,
                store::DocumentStatus,
                ErrorResponse,
            )
        ),
        tags(
            (name = "Templates", description = "Document template catalogue."),
            (name = "Sessions", description = "Form editing sessions."),
            (name = "Documents", description = "Stored documents and PDF generation.")
        ),
        servers(
            (url = "http://127.0.0.1:8080", description = "Localhost")
        )
    )]
    struct ApiDoc;

    let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
    let service = web::Data::new(build_service(&config, store)?);

    let prometheus = PrometheusMetricsBuilder::new("legaldoc_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create Prometheus metrics middleware: {}", e))?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let origins = config.allowed_origins.clone();
    HttpServer::new(move || {
        let cors = origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus.clone())
            .wrap(cors)
            .app_data(service.clone())
            .service(web::scope("/api").configure(api::config))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}

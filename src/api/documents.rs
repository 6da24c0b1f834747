use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::content::GeneratedFile;
use crate::record::DataRecord;
use crate::service::{DocumentService, ServiceError, SessionView};
use crate::store::{DocumentFilter, GeneratedDocument};
use crate::ErrorResponse;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[schema(example = "termination-letter")]
    pub template_id: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub data: DataRecord,
}

#[utoipa::path(
    context_path = "/api",
    tag = "Documents",
    get,
    path = "/documents",
    params(DocumentFilter),
    responses(
        (status = 200, description = "Stored documents, most recently updated first", body = [GeneratedDocument]),
        (status = 502, description = "Document store failed", body = ErrorResponse)
    )
)]
pub async fn list_documents(
    service: web::Data<DocumentService>,
    filter: web::Query<DocumentFilter>,
) -> Result<HttpResponse, ServiceError> {
    Ok(HttpResponse::Ok().json(service.list_documents(&filter).await?))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Documents",
    get,
    path = "/documents/{id}",
    params(
        ("id" = Uuid, Path, description = "Document id")
    ),
    responses(
        (status = 200, description = "Stored document", body = GeneratedDocument),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
pub async fn get_document(
    service: web::Data<DocumentService>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    Ok(HttpResponse::Ok().json(service.get_document(id.into_inner()).await?))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Documents",
    post,
    path = "/documents/{id}/edit",
    params(
        ("id" = Uuid, Path, description = "Document id")
    ),
    responses(
        (status = 201, description = "Document reopened in a new session", body = SessionView),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 409, description = "Document is signed", body = ErrorResponse)
    )
)]
pub async fn edit_document(
    service: web::Data<DocumentService>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let view = service.open_document(id.into_inner()).await?;
    Ok(HttpResponse::Created().json(view))
}

/// Stateless generation. The data is not validated; missing values print as blanks.
#[utoipa::path(
    context_path = "/api",
    tag = "Documents",
    post,
    path = "/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated PDF", body = GeneratedFile),
        (status = 404, description = "Template not found", body = ErrorResponse)
    )
)]
pub async fn generate(
    service: web::Data<DocumentService>,
    req: web::Json<GenerateRequest>,
) -> Result<HttpResponse, ServiceError> {
    let composed = service.generate(&req.template_id, &req.data).await?;
    Ok(HttpResponse::Ok().json(GeneratedFile::from(composed.as_ref())))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/documents").route(web::get().to(list_documents)))
        .service(web::resource("/documents/{id}").route(web::get().to(get_document)))
        .service(web::resource("/documents/{id}/edit").route(web::post().to(edit_document)))
        .service(web::resource("/generate").route(web::post().to(generate)));
}

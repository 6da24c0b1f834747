use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::content::GeneratedFile;
use crate::record::{DataRecord, FieldValue};
use crate::service::{DocumentService, FieldUpdate, ServiceError, SessionView};
use crate::store::GeneratedDocument;
use crate::ErrorResponse;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    #[schema(example = "purchase-agreement")]
    pub template_id: String,
    /// Initial field values, applied in key order.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub data: Option<DataRecord>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetFieldRequest {
    /// Text, number or boolean.
    #[schema(value_type = Object, example = "Jane Buyer")]
    pub value: FieldValue,
}

#[utoipa::path(
    context_path = "/api",
    tag = "Sessions",
    post,
    path = "/sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Editing session opened", body = SessionView),
        (status = 400, description = "Initial data names an unknown field", body = ErrorResponse),
        (status = 404, description = "Template not found", body = ErrorResponse)
    )
)]
pub async fn create_session(
    service: web::Data<DocumentService>,
    req: web::Json<CreateSessionRequest>,
) -> Result<HttpResponse, ServiceError> {
    let req = req.into_inner();
    let view = service.create_session(&req.template_id, req.data)?;
    Ok(HttpResponse::Created().json(view))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Sessions",
    get,
    path = "/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session id")
    ),
    responses(
        (status = 200, description = "Current session state", body = SessionView),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn get_session(
    service: web::Data<DocumentService>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    Ok(HttpResponse::Ok().json(service.session_view(id.into_inner())?))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Sessions",
    delete,
    path = "/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session id")
    ),
    responses(
        (status = 204, description = "Session closed; saved documents are kept"),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn close_session(
    service: web::Data<DocumentService>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    service.close_session(id.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    context_path = "/api",
    tag = "Sessions",
    put,
    path = "/sessions/{id}/fields/{name}",
    request_body = SetFieldRequest,
    params(
        ("id" = Uuid, Path, description = "Session id"),
        ("name" = String, Path, description = "Field name")
    ),
    responses(
        (status = 200, description = "Value stored; `error` is set when it failed validation", body = FieldUpdate),
        (status = 400, description = "Unknown field", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn set_field(
    service: web::Data<DocumentService>,
    path: web::Path<(Uuid, String)>,
    req: web::Json<SetFieldRequest>,
) -> Result<HttpResponse, ServiceError> {
    let (id, name) = path.into_inner();
    let update = service.set_field(id, &name, req.into_inner().value)?;
    Ok(HttpResponse::Ok().json(update))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Sessions",
    delete,
    path = "/sessions/{id}/fields/{name}",
    params(
        ("id" = Uuid, Path, description = "Session id"),
        ("name" = String, Path, description = "Field name")
    ),
    responses(
        (status = 200, description = "Value removed", body = FieldUpdate),
        (status = 400, description = "Unknown field", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn clear_field(
    service: web::Data<DocumentService>,
    path: web::Path<(Uuid, String)>,
) -> Result<HttpResponse, ServiceError> {
    let (id, name) = path.into_inner();
    Ok(HttpResponse::Ok().json(service.clear_field(id, &name)?))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Sessions",
    post,
    path = "/sessions/{id}/draft",
    params(
        ("id" = Uuid, Path, description = "Session id")
    ),
    responses(
        (status = 200, description = "Draft saved", body = GeneratedDocument),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 502, description = "Document store failed", body = ErrorResponse)
    )
)]
pub async fn save_draft(
    service: web::Data<DocumentService>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let document = service.save_draft(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(document))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Sessions",
    post,
    path = "/sessions/{id}/complete",
    params(
        ("id" = Uuid, Path, description = "Session id")
    ),
    responses(
        (status = 200, description = "Completed document saved", body = GeneratedDocument),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 422, description = "One or more fields failed validation", body = ErrorResponse),
        (status = 502, description = "Document store failed", body = ErrorResponse)
    )
)]
pub async fn save_complete(
    service: web::Data<DocumentService>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let document = service.save_complete(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(document))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Sessions",
    post,
    path = "/sessions/{id}/generate",
    params(
        ("id" = Uuid, Path, description = "Session id")
    ),
    responses(
        (status = 200, description = "Generated PDF", body = GeneratedFile),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 409, description = "Required fields are still missing", body = ErrorResponse)
    )
)]
pub async fn generate(
    service: web::Data<DocumentService>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let composed = service.generate_for_session(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(GeneratedFile::from(composed.as_ref())))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/sessions").route(web::post().to(create_session)))
        .service(
            web::resource("/sessions/{id}")
                .route(web::get().to(get_session))
                .route(web::delete().to(close_session)),
        )
        .service(
            web::resource("/sessions/{id}/fields/{name}")
                .route(web::put().to(set_field))
                .route(web::delete().to(clear_field)),
        )
        .service(web::resource("/sessions/{id}/draft").route(web::post().to(save_draft)))
        .service(web::resource("/sessions/{id}/complete").route(web::post().to(save_complete)))
        .service(web::resource("/sessions/{id}/generate").route(web::post().to(generate)));
}

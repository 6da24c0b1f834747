use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::service::{DocumentService, ServiceError};
use crate::templates::{DocumentTemplate, TemplateCategory};
use crate::ErrorResponse;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TemplateQuery {
    pub category: Option<TemplateCategory>,
}

/// Catalogue entry without the field definitions.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    #[schema(example = "purchase-agreement")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: TemplateCategory,
    pub field_count: usize,
    pub required_count: usize,
}

impl From<&DocumentTemplate> for TemplateSummary {
    fn from(t: &DocumentTemplate) -> Self {
        Self {
            id: t.id.clone(),
            name: t.name.clone(),
            description: t.description.clone(),
            category: t.category,
            field_count: t.fields.len(),
            required_count: t.required_fields().count(),
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Templates",
    get,
    path = "/templates",
    params(TemplateQuery),
    responses(
        (status = 200, description = "Available document templates", body = [TemplateSummary])
    )
)]
pub async fn list_templates(
    service: web::Data<DocumentService>,
    query: web::Query<TemplateQuery>,
) -> HttpResponse {
    let summaries: Vec<TemplateSummary> = service
        .list_templates(query.category)
        .iter()
        .map(|t| TemplateSummary::from(t.as_ref()))
        .collect();
    HttpResponse::Ok().json(summaries)
}

#[utoipa::path(
    context_path = "/api",
    tag = "Templates",
    get,
    path = "/templates/{id}",
    params(
        ("id" = String, Path, description = "Template id")
    ),
    responses(
        (status = 200, description = "Template with its field definitions", body = DocumentTemplate),
        (status = 404, description = "Template not found", body = ErrorResponse)
    )
)]
pub async fn get_template(
    service: web::Data<DocumentService>,
    id: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let template = service.template(&id)?;
    Ok(HttpResponse::Ok().json(template.as_ref()))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/templates").route(web::get().to(list_templates)))
        .service(web::resource("/templates/{id}").route(web::get().to(get_template)));
}

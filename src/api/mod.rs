//! HTTP surface: route registration and error mapping.

pub mod content;
pub mod documents;
pub mod sessions;
pub mod templates;

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};

use crate::compositor::CompositionError;
use crate::service::ServiceError;
use crate::templates::TemplateError;
use crate::ErrorResponse;

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Template(TemplateError::NotFound(_))
            | Self::Composition(CompositionError::TemplateNotFound(_))
            | Self::SessionNotFound(_)
            | Self::DocumentNotFound(_) => StatusCode::NOT_FOUND,
            Self::Template(_) | Self::Composition(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Store(_) => StatusCode::BAD_GATEWAY,
            Self::DocumentSigned(_) | Self::GenerationBlocked { .. } => StatusCode::CONFLICT,
            Self::Form(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        }

        let message = self.to_string();
        let body = match (self, status) {
            (Self::Validation(errors), _) => ErrorResponse::unprocessable(&message)
                .with_errors(errors.iter().cloned().collect()),
            (Self::Store(_), _) => ErrorResponse::new("StoreUnavailable", &message),
            (_, StatusCode::NOT_FOUND) => ErrorResponse::not_found(&message),
            (_, StatusCode::CONFLICT) => ErrorResponse::conflict(&message),
            (_, StatusCode::BAD_REQUEST) => ErrorResponse::bad_request(&message),
            _ => ErrorResponse::internal_error(&message),
        };
        HttpResponse::build(status).json(body)
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.configure(templates::config)
        .configure(sessions::config)
        .configure(documents::config);
}

//! Error handling - handler errors and HTML error pages.

use std::fmt;

use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{HttpResponse, ResponseError, web};
use tera::Context;

use yatube_core::error::{DomainError, RepoError};
use yatube_core::ports::{AuthError, MediaError};

use crate::render::Templates;

/// Application-level error type returned by handlers.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::NotFound(detail) => {
                tracing::debug!(%detail, "Not found");
                "Not Found".to_string()
            }
            AppError::BadRequest(detail) | AppError::Conflict(detail) => detail.clone(),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                "Internal Server Error".to_string()
            }
        };

        HttpResponse::build(self.status_code())
            .content_type(ContentType::plaintext())
            .body(body)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{} {} not found", entity_type, key))
            }
            DomainError::Validation { field, message } => {
                AppError::BadRequest(format!("Invalid {}: {}", field, message))
            }
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::InvalidName(name) => AppError::NotFound(name),
            MediaError::Io(msg) => AppError::Internal(format!("Media storage: {}", msg)),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Replace bare 404 and 500 bodies with the site's error templates.
pub fn error_pages<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new()
        .handler(StatusCode::NOT_FOUND, |res| {
            render_error_page(res, "core/404.html")
        })
        .handler(StatusCode::INTERNAL_SERVER_ERROR, |res| {
            render_error_page(res, "core/500.html")
        })
}

fn render_error_page<B>(
    res: ServiceResponse<B>,
    template: &str,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let (req, res) = res.into_parts();
    let mut context = Context::new();
    context.insert("path", req.path());

    let html = req
        .app_data::<web::Data<Templates>>()
        .and_then(|templates| match templates.render(template, &context) {
            Ok(html) => Some(html),
            Err(e) => {
                tracing::error!(template, error = ?e, "Error page rendering failed");
                None
            }
        });

    let response = match html {
        Some(html) => ServiceResponse::new(
            req,
            HttpResponse::build(res.status())
                .content_type(ContentType::html())
                .body(html),
        )
        .map_into_right_body(),
        None => ServiceResponse::new(req, res).map_into_left_body(),
    };

    Ok(ErrorHandlerResponse::Response(response))
}

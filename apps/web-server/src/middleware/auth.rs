//! Authentication extractors.
//!
//! The session token is read from the `access_token` cookie set at login, or
//! from an `Authorization: Bearer` header.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use uuid::Uuid;

use yatube_core::ports::{AuthError, TokenClaims};

use crate::state::AppState;
use crate::urls;

/// Name of the session cookie.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Authenticated user identity extractor.
///
/// Handlers taking an `Identity` are login-only: anonymous visitors are
/// redirected to the login page with the requested path as `next`.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

/// Authentication failure; answered with a redirect to the login page.
#[derive(Debug)]
pub struct AuthenticationError {
    pub error: AuthError,
    pub login_url: String,
}

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl ResponseError for AuthenticationError {
    fn status_code(&self) -> StatusCode {
        StatusCode::FOUND
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Found()
            .insert_header((header::LOCATION, self.login_url.as_str()))
            .finish()
    }
}

fn token_from_request(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match bearer {
        Some(token) => Some(token.to_string()),
        None => req
            .cookie(ACCESS_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string()),
    }
}

/// Resolve the caller's identity from the request.
pub fn authenticate(req: &HttpRequest) -> Result<Identity, AuthError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        tracing::error!("AppState not found in app data");
        AuthError::InvalidToken("Server configuration error".to_string())
    })?;

    let token = token_from_request(req).ok_or(AuthError::MissingAuth)?;
    state.tokens.validate_token(&token).map(Identity::from)
}

/// The signed-in user, if any.
pub fn current_identity(req: &HttpRequest) -> Option<Identity> {
    authenticate(req).ok()
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match authenticate(req) {
            Ok(identity) => ready(Ok(identity)),
            Err(error) => {
                let next = req
                    .uri()
                    .path_and_query()
                    .map(|pq| pq.as_str())
                    .unwrap_or(urls::INDEX);
                tracing::debug!(%error, path = next, "Login required");
                ready(Err(AuthenticationError {
                    error,
                    login_url: urls::login_with_next(next),
                }))
            }
        }
    }
}

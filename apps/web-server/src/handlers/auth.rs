//! Sign-up, login and logout pages.

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{Either, HttpResponse, http::header, web};
use serde_json::json;
use tera::Context;

use yatube_core::RepoError;
use yatube_core::domain::User;
use yatube_core::forms::{FormErrors, SignupForm};
use yatube_core::ports::DEFAULT_ROLE;
use yatube_shared::dto::{LoginRequest, NextQuery};

use crate::middleware::auth::ACCESS_TOKEN_COOKIE;
use crate::middleware::error::{AppError, AppResult};
use crate::render::View;
use crate::state::AppState;
use crate::urls;

pub const INVALID_LOGIN: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

pub const USERNAME_TAKEN: &str = "A user with that username already exists.";

type PageOrRedirect = Either<View, HttpResponse>;

fn session_cookie(token: String, max_age_seconds: i64) -> Cookie<'static> {
    Cookie::build(ACCESS_TOKEN_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age_seconds))
        .finish()
}

/// Issue a session for `user` and redirect to `location`.
fn start_session(state: &AppState, user: &User, location: &str) -> AppResult<HttpResponse> {
    let token = state
        .tokens
        .generate_token(user.id, &user.username, vec![DEFAULT_ROLE.to_string()])?;

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .cookie(session_cookie(token, state.tokens.expiration_seconds()))
        .finish())
}

fn signup_page(form: &SignupForm, errors: &FormErrors) -> View {
    let mut context = Context::new();
    context.insert(
        "values",
        &json!({ "username": form.username, "email": form.email }),
    );
    context.insert(
        "errors",
        &json!({
            "username": errors.get("username"),
            "email": errors.get("email"),
            "password1": errors.get("password1"),
            "password2": errors.get("password2"),
        }),
    );
    View::page("users/signup.html", context)
}

fn login_page(username: &str, next: Option<&str>, errors: &[&str]) -> View {
    let mut context = Context::new();
    context.insert("username", username);
    context.insert("next", &next);
    context.insert("errors", errors);
    View::page("users/login.html", context)
}

/// GET /auth/signup/
pub async fn signup_form() -> View {
    signup_page(&SignupForm::default(), &FormErrors::default())
}

/// POST /auth/signup/ - create the account and sign in.
pub async fn signup(
    state: web::Data<AppState>,
    form: web::Form<SignupForm>,
) -> AppResult<PageOrRedirect> {
    let form = match form.into_inner().clean() {
        Ok(form) => form,
        Err((form, errors)) => return Ok(Either::Left(signup_page(&form, &errors))),
    };

    if state.users.find_by_username(&form.username).await?.is_some() {
        let mut errors = FormErrors::default();
        errors.add("username", USERNAME_TAKEN);
        return Ok(Either::Left(signup_page(&form, &errors)));
    }

    let password_hash = state.passwords.hash(&form.password1)?;
    let user = state
        .users
        .create(User::new(form.username, form.email, password_hash))
        .await
        .map_err(|e| match e {
            RepoError::Constraint(_) => AppError::Conflict(USERNAME_TAKEN.to_string()),
            other => other.into(),
        })?;

    tracing::info!(user_id = %user.id, username = %user.username, "User signed up");
    Ok(Either::Right(start_session(&state, &user, urls::INDEX)?))
}

/// GET /auth/login/
pub async fn login_form(query: web::Query<NextQuery>) -> View {
    login_page("", query.next.as_deref(), &[])
}

/// POST /auth/login/ - check credentials and set the session cookie.
pub async fn login(
    state: web::Data<AppState>,
    form: web::Form<LoginRequest>,
) -> AppResult<PageOrRedirect> {
    let form = form.into_inner();
    let next = form.next.as_deref().filter(|n| !n.is_empty());

    let user = state.users.find_by_username(form.username.trim()).await?;
    let verified = match &user {
        Some(user) => state.passwords.verify(&form.password, &user.password_hash)?,
        None => {
            // Same cost as checking a real account.
            let _ = state.passwords.hash(&form.password);
            false
        }
    };

    match user {
        Some(user) if verified => {
            tracing::info!(username = %user.username, "User logged in");
            Ok(Either::Right(start_session(
                &state,
                &user,
                urls::safe_next(next),
            )?))
        }
        _ => {
            tracing::debug!(username = %form.username, "Login rejected");
            Ok(Either::Left(login_page(&form.username, next, &[INVALID_LOGIN])))
        }
    }
}

/// POST /auth/logout/ - drop the session cookie.
pub async fn logout() -> HttpResponse {
    let mut response = HttpResponse::Found()
        .insert_header((header::LOCATION, urls::INDEX))
        .finish();

    let cookie = Cookie::build(ACCESS_TOKEN_COOKIE, "").path("/").finish();
    if let Err(e) = response.add_removal_cookie(&cookie) {
        tracing::warn!(error = %e, "Failed to clear session cookie");
    }
    response
}

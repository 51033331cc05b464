//! HTML rendering with Tera.
//!
//! Handlers return a [`View`]: either a template plus its context, or a
//! redirect. The template is rendered when actix turns the view into a
//! response, so handlers stay testable without a running server.

use actix_web::body::BoxBody;
use actix_web::http::StatusCode;
use actix_web::http::header::{self, ContentType};
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use tera::{Context, Tera};

use crate::middleware::auth::current_identity;
use crate::urls;

/// Context key holding the signed-in username, `null` for anonymous visitors.
pub const CURRENT_USER: &str = "current_user";

/// Loaded template set.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Load every `*.html` file below `dir`.
    pub fn load(dir: &str) -> Result<Self, tera::Error> {
        let mut tera = Tera::new(&format!("{}/**/*.html", dir.trim_end_matches('/')))?;
        tera.register_function("url", urls::reverse);
        tracing::info!(
            templates = tera.get_template_names().count(),
            dir,
            "Templates loaded"
        );
        Ok(Self { tera })
    }

    pub fn render(&self, name: &str, context: &Context) -> Result<String, tera::Error> {
        if context.contains_key(CURRENT_USER) {
            return self.tera.render(name, context);
        }
        let mut context = context.clone();
        context.insert(CURRENT_USER, &Option::<String>::None);
        self.tera.render(name, &context)
    }
}

/// What a page handler produces.
#[derive(Debug)]
pub enum View {
    Page {
        template: &'static str,
        context: Context,
        status: StatusCode,
    },
    Redirect(String),
}

impl View {
    pub fn page(template: &'static str, context: Context) -> Self {
        View::Page {
            template,
            context,
            status: StatusCode::OK,
        }
    }

    pub fn redirect(location: impl Into<String>) -> Self {
        View::Redirect(location.into())
    }
}

#[cfg(test)]
impl View {
    pub fn template(&self) -> Option<&'static str> {
        match self {
            View::Page { template, .. } => Some(template),
            View::Redirect(_) => None,
        }
    }

    pub fn context(&self) -> Option<&Context> {
        match self {
            View::Page { context, .. } => Some(context),
            View::Redirect(_) => None,
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            View::Page { .. } => None,
            View::Redirect(location) => Some(location),
        }
    }
}

impl Responder for View {
    type Body = BoxBody;

    fn respond_to(self, req: &HttpRequest) -> HttpResponse<Self::Body> {
        match self {
            View::Redirect(location) => HttpResponse::Found()
                .insert_header((header::LOCATION, location))
                .finish(),
            View::Page {
                template,
                mut context,
                status,
            } => {
                let Some(templates) = req.app_data::<web::Data<Templates>>() else {
                    tracing::error!("Templates not found in app data");
                    return HttpResponse::InternalServerError().finish();
                };

                let username = current_identity(req).map(|identity| identity.username);
                context.insert(CURRENT_USER, &username);

                match templates.render(template, &context) {
                    Ok(html) => HttpResponse::build(status)
                        .content_type(ContentType::html())
                        .body(html),
                    Err(e) => {
                        tracing::error!(template, error = ?e, "Template rendering failed");
                        HttpResponse::InternalServerError().finish()
                    }
                }
            }
        }
    }
}

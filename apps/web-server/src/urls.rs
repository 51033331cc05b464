//! URL building for the site's named routes.

use std::collections::HashMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tera::Value;
use url::Url;
use url::form_urlencoded::byte_serialize;

pub const INDEX: &str = "/";
pub const POST_CREATE: &str = "/create/";
pub const LOGIN: &str = "/auth/login/";
pub const SIGNUP: &str = "/auth/signup/";
pub const LOGOUT: &str = "/auth/logout/";

pub fn group_list(slug: &str) -> String {
    format!("/group/{}/", path_segment(slug))
}

pub fn profile(username: &str) -> String {
    format!("/profile/{}/", path_segment(username))
}

pub fn post_detail(post_id: i64) -> String {
    format!("/posts/{post_id}/")
}

pub fn post_edit(post_id: i64) -> String {
    format!("/posts/{post_id}/edit/")
}

/// Login page that sends the visitor back to `next` afterwards.
pub fn login_with_next(next: &str) -> String {
    format!("{LOGIN}?next={}", byte_serialize(next.as_bytes()).collect::<String>())
}

/// Template function: `{{ url(name="profile", username=post.author.username) }}`.
pub fn reverse(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let name = str_arg(args, "name")?;
    let path = match name {
        "index" => INDEX.to_string(),
        "post_create" => POST_CREATE.to_string(),
        "login" => LOGIN.to_string(),
        "signup" => SIGNUP.to_string(),
        "logout" => LOGOUT.to_string(),
        "group_list" => group_list(str_arg(args, "slug")?),
        "profile" => profile(str_arg(args, "username")?),
        "post_detail" => post_detail(id_arg(args, "post_id")?),
        "post_edit" => post_edit(id_arg(args, "post_id")?),
        other => return Err(tera::Error::msg(format!("unknown route `{other}`"))),
    };
    Ok(Value::String(path))
}

fn str_arg<'a>(args: &'a HashMap<String, Value>, key: &str) -> tera::Result<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| tera::Error::msg(format!("`url` needs a string `{key}`")))
}

fn id_arg(args: &HashMap<String, Value>, key: &str) -> tera::Result<i64> {
    args.get(key)
        .and_then(Value::as_i64)
        .ok_or_else(|| tera::Error::msg(format!("`url` needs an integer `{key}`")))
}

/// Placeholder origin used to resolve redirect targets.
const SITE_ORIGIN: &str = "http://yatube.invalid/";

/// Characters kept verbatim in username and slug path segments.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'@')
    .remove(b'.')
    .remove(b'+')
    .remove(b'-')
    .remove(b'_');

/// Only same-site absolute paths are accepted as a post-login target.
///
/// Browsers drop tabs and newlines while parsing a `Location`, so the target
/// is resolved the same way and must stay on the site's own origin.
pub fn safe_next(next: Option<&str>) -> &str {
    let Some(next) = next else {
        return INDEX;
    };
    if !next.starts_with('/') || next.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return INDEX;
    }
    let Ok(site) = Url::parse(SITE_ORIGIN) else {
        return INDEX;
    };
    match site.join(next) {
        Ok(target) if target.origin() == site.origin() => next,
        _ => INDEX,
    }
}

fn path_segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

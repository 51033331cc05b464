//! Domain entities - the core business objects.

mod comment;
mod group;
mod post;
mod user;

pub use comment::{Comment, NewComment};
pub use group::{Group, NewGroup, SLUG_MAX_LENGTH, TITLE_MAX_LENGTH, slugify};
pub use post::{NewPost, Post, PostFilter};
pub use user::{USERNAME_MAX_LENGTH, User};

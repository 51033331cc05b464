//! # Yatube Shared
//!
//! Types that cross the boundary between handlers and templates or forms:
//! render-ready view models and submitted auth forms.

pub mod dto;
pub mod view;

pub use view::{AuthorView, GroupView, PostView};

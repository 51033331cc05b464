//! # Yatube Core
//!
//! The domain layer of the Yatube blog.
//! Records, ports, pagination and form validation live here, with zero
//! infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod forms;
pub mod pagination;
pub mod ports;

pub use error::{DomainError, RepoError};
pub use pagination::{POSTS_PER_PAGE, Page, PageWindow, Paginator};

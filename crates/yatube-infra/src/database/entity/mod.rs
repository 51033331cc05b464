//! SeaORM entities mirroring the domain records.

pub mod comment;
pub mod group;
pub mod post;
pub mod user;

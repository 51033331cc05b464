use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Maximum length of a group title.
pub const TITLE_MAX_LENGTH: usize = 200;
/// Maximum length of a group slug.
pub const SLUG_MAX_LENGTH: usize = 190;

/// Group entity - a named community posts may belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}

/// A group that has not been persisted yet.
///
/// The slug is fixed here and never recomputed once the group is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl NewGroup {
    /// Build a group, deriving the slug from the title when none is given.
    pub fn new(
        title: impl Into<String>,
        slug: Option<&str>,
        description: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let title = title.into().trim().to_string();
        let slug = match slug.map(str::trim).filter(|s| !s.is_empty()) {
            Some(explicit) => slugify(explicit),
            None => slugify(&title),
        };

        let group = Self {
            title,
            slug,
            description: description.into(),
        };
        group.validate()?;
        Ok(group)
    }

    /// Title is 1..=[`TITLE_MAX_LENGTH`] characters and the slug is non-empty.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("title", "must not be empty"));
        }
        if self.title.chars().count() > TITLE_MAX_LENGTH {
            return Err(DomainError::validation(
                "title",
                format!("must be at most {TITLE_MAX_LENGTH} characters"),
            ));
        }
        if self.slug.is_empty() {
            return Err(DomainError::validation(
                "slug",
                "cannot be derived from the title, give one explicitly",
            ));
        }
        if self.slug.len() > SLUG_MAX_LENGTH {
            return Err(DomainError::validation(
                "slug",
                format!("must be at most {SLUG_MAX_LENGTH} characters"),
            ));
        }
        Ok(())
    }
}

/// URL-safe, lower-case ASCII slug, truncated to [`SLUG_MAX_LENGTH`].
pub fn slugify(value: &str) -> String {
    let mut slug = slug::slugify(value);
    if slug.len() > SLUG_MAX_LENGTH {
        slug.truncate(SLUG_MAX_LENGTH);
        while slug.ends_with('-') {
            slug.pop();
        }
    }
    slug
}

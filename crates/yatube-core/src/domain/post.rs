use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a single authored text entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub text: String,
    /// Set once by the store at creation.
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub group_id: Option<i64>,
    /// Stored media name of the attached picture.
    pub image: Option<String>,
}

impl Post {
    /// Short form used in listings and logs.
    pub fn preview(&self) -> String {
        self.text.chars().take(15).collect()
    }
}

/// A post that has not been persisted yet. The author is always supplied by
/// the caller from the authenticated identity.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub text: String,
    pub author_id: Uuid,
    pub group_id: Option<i64>,
    pub image: Option<String>,
}

/// Selection used by post listings and counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Author(Uuid),
    Group(i64),
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            PostFilter::All => true,
            PostFilter::Author(author_id) => post.author_id == *author_id,
            PostFilter::Group(group_id) => post.group_id == Some(*group_id),
        }
    }
}

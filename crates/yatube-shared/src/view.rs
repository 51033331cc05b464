//! View models handed to templates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public face of a post author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorView {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupView {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// A post with its author and group resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostView {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author: AuthorView,
    pub group: Option<GroupView>,
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_view_serializes_null_group() {
        let view = PostView {
            id: 1,
            text: "hello".to_string(),
            pub_date: Utc::now(),
            author: AuthorView {
                id: Uuid::new_v4(),
                username: "auth".to_string(),
            },
            group: None,
            image_url: None,
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["author"]["username"], "auth");
        assert!(json["group"].is_null());
        assert!(json["image_url"].is_null());
    }
}

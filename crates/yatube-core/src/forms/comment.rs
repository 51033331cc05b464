use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::{FieldKind, FieldMeta, FormErrors, not_blank};
use crate::domain::NewComment;

/// Comment form. The post and author come from the request, never the body.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CommentForm {
    #[validate(custom(function = "not_blank"))]
    pub text: String,
}

impl CommentForm {
    pub const FIELDS: [FieldMeta; 1] = [FieldMeta {
        name: "text",
        label: "Comment",
        help_text: "Add a comment",
        required: true,
        kind: FieldKind::Textarea,
    }];

    pub fn clean(&self, post_id: i64, author_id: Uuid) -> Result<NewComment, FormErrors> {
        self.validate()?;
        Ok(NewComment {
            post_id,
            author_id,
            text: self.text.trim().to_string(),
        })
    }
}

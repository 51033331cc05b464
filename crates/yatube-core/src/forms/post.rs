use std::collections::BTreeMap;

use validator::Validate;

use super::{
    ChoiceContext, FieldContext, FieldKind, FieldMeta, FormContext, FormErrors, INVALID_CHOICE,
    INVALID_IMAGE, not_blank,
};
use crate::domain::{Group, Post};

/// Raw uploaded file as received from a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// An upload whose bytes decoded as a supported image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidImage {
    pub bytes: Vec<u8>,
    pub extension: &'static str,
    pub content_type: &'static str,
}

impl ImageUpload {
    /// Sniff the payload and make sure it fully decodes.
    pub fn validate_image(&self) -> Result<ValidImage, &'static str> {
        let format = image::guess_format(&self.bytes).map_err(|_| INVALID_IMAGE)?;
        image::load_from_memory_with_format(&self.bytes, format).map_err(|_| INVALID_IMAGE)?;

        Ok(ValidImage {
            bytes: self.bytes.clone(),
            extension: format.extensions_str().first().copied().unwrap_or("img"),
            content_type: format.to_mime_type(),
        })
    }
}

/// Values ready to be written to a post. The author is never part of it.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedPost {
    pub text: String,
    pub group_id: Option<i64>,
    pub image: Option<ValidImage>,
    pub image_clear: bool,
}

/// Create/edit form for posts: `text`, `group` and an optional `image`.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct PostForm {
    #[validate(custom(function = "not_blank"))]
    pub text: String,
    /// Raw group choice; empty means "no group".
    pub group: Option<String>,
    pub image: Option<ImageUpload>,
    /// Drop the current image when editing.
    pub image_clear: bool,
}

impl PostForm {
    pub const FIELDS: [FieldMeta; 3] = [
        FieldMeta {
            name: "text",
            label: "Text",
            help_text: "Enter the post text",
            required: true,
            kind: FieldKind::Textarea,
        },
        FieldMeta {
            name: "group",
            label: "Group",
            help_text: "Choose from the existing groups",
            required: false,
            kind: FieldKind::Select,
        },
        FieldMeta {
            name: "image",
            label: "Image",
            help_text: "Upload a picture",
            required: false,
            kind: FieldKind::File,
        },
    ];

    /// Form pre-filled with an existing post.
    pub fn from_post(post: &Post) -> Self {
        Self {
            text: post.text.clone(),
            group: post.group_id.map(|id| id.to_string()),
            image: None,
            image_clear: false,
        }
    }

    fn group_choice(&self) -> Option<&str> {
        self.group.as_deref().map(str::trim).filter(|g| !g.is_empty())
    }

    /// Validate against the groups that currently exist.
    pub fn clean(&self, groups: &[Group]) -> Result<CleanedPost, FormErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FormErrors::default(),
            Err(e) => FormErrors::from(e),
        };

        let group_id = match self.group_choice() {
            None => None,
            Some(raw) => {
                let resolved = raw
                    .parse::<i64>()
                    .ok()
                    .filter(|id| groups.iter().any(|g| g.id == *id));
                if resolved.is_none() {
                    errors.add("group", INVALID_CHOICE);
                }
                resolved
            }
        };

        let image = match &self.image {
            None => None,
            Some(upload) => match upload.validate_image() {
                Ok(valid) => Some(valid),
                Err(message) => {
                    errors.add("image", message);
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(CleanedPost {
            text: self.text.trim().to_string(),
            group_id,
            image,
            image_clear: self.image_clear,
        })
    }

    /// Render-ready view of the form with the submitted values kept.
    pub fn context(&self, errors: &FormErrors, groups: &[Group]) -> FormContext {
        let [text, group, image] = &Self::FIELDS;
        let selected = self.group_choice();

        let mut group_choices = vec![ChoiceContext {
            value: String::new(),
            label: "---------".to_string(),
            selected: selected.is_none(),
        }];
        group_choices.extend(groups.iter().map(|g| {
            let value = g.id.to_string();
            ChoiceContext {
                selected: selected == Some(value.as_str()),
                value,
                label: g.title.clone(),
            }
        }));

        FormContext {
            fields: vec![
                FieldContext::new(text, Some(self.text.clone()), errors),
                FieldContext::new(group, selected.map(str::to_string), errors),
                FieldContext::new(
                    image,
                    self.image.as_ref().map(|i| i.filename.clone()),
                    errors,
                ),
            ],
            choices: BTreeMap::from([("group", group_choices)]),
            errors: errors.clone(),
        }
    }
}

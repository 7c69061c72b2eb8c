use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// Post entity - a titled piece of content owned by a user.
///
/// `id` is assigned by the caller on create and never changes afterwards.
/// `version` belongs to the store: it is `None` until the post has been
/// written once and is bumped on every successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub version: Option<i32>,
}

impl Post {
    /// Create a post that has not been persisted yet.
    pub fn new(id: i32, user_id: i32, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            user_id,
            title: title.into(),
            body: body.into(),
            version: None,
        }
    }

    /// Apply an update request on top of the stored post.
    ///
    /// Keeps `id`, `user_id` and `version` from `self`; only `title` and
    /// `body` are taken from the draft. Whatever identity or version the
    /// draft carries is discarded.
    pub fn merge_update(&self, draft: PostDraft) -> Self {
        Self {
            id: self.id,
            user_id: self.user_id,
            title: draft.title,
            body: draft.body,
            version: self.version,
        }
    }
}

/// Client-supplied post fields, before validation.
///
/// Every field a client may send is optional here so that a missing value
/// shows up as a field violation instead of a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub id: Option<i32>,
    pub user_id: Option<i32>,
    pub title: String,
    pub body: String,
}

impl PostDraft {
    /// Check the editable content fields.
    pub fn content_violations(&self) -> Vec<FieldError> {
        let mut violations = Vec::new();
        if is_blank(&self.title) {
            violations.push(FieldError::blank("title"));
        }
        if is_blank(&self.body) {
            violations.push(FieldError::blank("body"));
        }
        violations
    }

    /// Validate the draft for creation and turn it into an unsaved post.
    pub fn into_new_post(self) -> Result<Post, Vec<FieldError>> {
        let mut violations = Vec::new();
        if self.id.is_none() {
            violations.push(FieldError::missing("id"));
        }
        if self.user_id.is_none() {
            violations.push(FieldError::missing("userId"));
        }
        violations.extend(self.content_violations());

        match (self.id, self.user_id) {
            (Some(id), Some(user_id)) if violations.is_empty() => {
                Ok(Post::new(id, user_id, self.title, self.body))
            }
            _ => Err(violations),
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

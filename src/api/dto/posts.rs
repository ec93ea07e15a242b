/*
 * Responsibility
 * - Posts request/response DTO
 * - Public ids in responses are already encoded (internal ids never leak)
 * - Requests only carry the client-writable fields; anything else in the
 *   body (author, id, timestamps, ...) is ignored by serde
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::dto::coerce;
use crate::repos::{NewPost, PostPatch};

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default, deserialize_with = "coerce::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "coerce::text")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "coerce::list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "coerce::list")]
    pub categories: Vec<String>,
}

impl CreatePostRequest {
    /// The author always comes from the verified token, never from the body.
    pub fn into_new_post(self, author_id: Uuid) -> NewPost {
        NewPost {
            title: self.title,
            content: self.content,
            tags: self.tags,
            categories: self.categories,
            author_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    // Tri-state:
    // - None: field missing (do not update)
    // - Some(None): null (clear)
    // - Some(Some(v)): set value
    #[serde(default, deserialize_with = "coerce::text_patch")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "coerce::text_patch")]
    pub content: Option<Option<String>>,
    #[serde(default, deserialize_with = "coerce::list_patch")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "coerce::list_patch")]
    pub categories: Option<Vec<String>>,
}

impl UpdatePostRequest {
    pub fn into_patch(self) -> PostPatch {
        PostPatch {
            title: self.title,
            content: self.content,
            tags: self.tags,
            categories: self.categories,
        }
    }
}

/// `author` is rendered as a bare id, or as `{id, name}` on the public read endpoints.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AuthorRef {
    Id(Uuid),
    Named(AuthorSummary),
}

#[derive(Debug, Serialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String, // encoded
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub author: AuthorRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

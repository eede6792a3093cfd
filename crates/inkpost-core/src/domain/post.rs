use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use inkpost_shared::ContentBlock;
use inkpost_shared::content::first_paragraph;
use inkpost_shared::dto::{CreatePostRequest, PostResponse, UpdatePostRequest};

use super::user::{User, UserId};

pub type PostId = i32;

/// Post entity - a blog post with a block-structured body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub user_id: UserId,
    pub title: String,
    pub body: Vec<ContentBlock>,
    pub tags: String,
    pub description: String,
    pub views: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable fields of a post, used for both insert and full replacement.
///
/// `description` is always derived from `body`; there is no way to set it
/// independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub user_id: UserId,
    pub title: String,
    pub body: Vec<ContentBlock>,
    pub tags: String,
    pub description: String,
}

impl PostDraft {
    pub fn new(user_id: UserId, title: String, body: Vec<ContentBlock>, tags: String) -> Self {
        let description = first_paragraph(&body);
        Self {
            user_id,
            title,
            body,
            tags,
            description,
        }
    }

    pub fn from_create(req: CreatePostRequest, user_id: UserId) -> Self {
        Self::new(user_id, req.title, req.body, req.tags)
    }

    pub fn from_update(req: UpdatePostRequest, user_id: UserId) -> Self {
        Self::new(user_id, req.title, req.body, req.tags)
    }
}

/// A post joined with its owner. The owner is absent only if the user row
/// was removed out from under the post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author: Option<User>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            body: post.body,
            tags: post.tags,
            description: post.description,
            views: post.views,
            user_id: post.user_id,
            user: None,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl From<PostWithAuthor> for PostResponse {
    fn from(value: PostWithAuthor) -> Self {
        let mut response = PostResponse::from(value.post);
        response.user = value.author.map(Into::into);
        response
    }
}

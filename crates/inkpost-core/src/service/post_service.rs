//! Post use-cases.
//!
//! # Invariants
//! - `description` is re-derived from `body` on every create and update.
//! - Views are only ever changed through `PostRepository::increment_views`.
//! - Only the owner may remove a post. Update does not check ownership and
//!   reassigns the post to the caller.

use std::sync::Arc;

use inkpost_shared::dto::{CreatePostRequest, SearchPostQuery, UpdatePostRequest};

use crate::domain::{Post, PostDraft, PostId, PostWithAuthor, UserId};
use crate::error::{DomainError, RepoError};
use crate::ports::{Page, PostRepository, PostSearch};

pub type ServiceResult<T> = Result<T, DomainError>;

/// Request-level operations over posts.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Create a post owned by `user_id`.
    pub async fn create(&self, dto: CreatePostRequest, user_id: UserId) -> ServiceResult<Post> {
        validate_title(&dto.title)?;

        let post = self.posts.insert(PostDraft::from_create(dto, user_id)).await?;
        tracing::info!(post_id = post.id, user_id, "Post created");
        Ok(post)
    }

    /// All posts, newest first.
    pub async fn find_all(&self) -> ServiceResult<Vec<Post>> {
        Ok(self.posts.list_newest_first().await?)
    }

    /// All posts ordered by views, most viewed first.
    pub async fn popular(&self) -> ServiceResult<Page<Post>> {
        Ok(self.posts.list_by_views().await?)
    }

    pub async fn search(&self, dto: SearchPostQuery) -> ServiceResult<Page<PostWithAuthor>> {
        let criteria = PostSearch::from(dto);
        tracing::debug!(?criteria, "Searching posts");
        Ok(self.posts.search(&criteria).await?)
    }

    /// Count a view and return the post with its owner.
    pub async fn find_one(&self, id: PostId) -> ServiceResult<PostWithAuthor> {
        if self.posts.increment_views(id).await? == 0 {
            return Err(DomainError::post_not_found(id));
        }

        self.posts
            .find_with_author(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    /// Replace title, body, tags and owner of an existing post.
    pub async fn update(
        &self,
        id: PostId,
        dto: UpdatePostRequest,
        user_id: UserId,
    ) -> ServiceResult<Post> {
        validate_title(&dto.title)?;

        if self.posts.find_by_id(id).await?.is_none() {
            return Err(DomainError::post_not_found(id));
        }

        let post = self
            .posts
            .replace(id, PostDraft::from_update(dto, user_id))
            .await
            .map_err(|e| not_found_or(e, id))?;

        tracing::info!(post_id = id, user_id, "Post updated");
        Ok(post)
    }

    /// Delete a post. Only its owner may do this.
    pub async fn remove(&self, id: PostId, user_id: UserId) -> ServiceResult<()> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))?;

        if post.user_id != user_id {
            tracing::warn!(post_id = id, owner_id = post.user_id, user_id, "Refused to delete post");
            return Err(DomainError::Forbidden(
                "Only the author can delete this post".to_string(),
            ));
        }

        self.posts
            .delete(id)
            .await
            .map_err(|e| not_found_or(e, id))?;

        tracing::info!(post_id = id, user_id, "Post deleted");
        Ok(())
    }
}

fn validate_title(title: &str) -> ServiceResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::Validation("Title must not be empty".to_string()));
    }
    Ok(())
}

// The row can disappear between the existence check and the write.
fn not_found_or(err: RepoError, id: PostId) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::post_not_found(id),
        other => other.into(),
    }
}

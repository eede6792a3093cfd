use async_trait::async_trait;

use inkpost_shared::dto::{SearchPostQuery, SortDirection};

use crate::domain::{Post, PostDraft, PostId, PostWithAuthor};
use crate::error::RepoError;

/// Generic repository trait shared by every entity.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID. Fails with `RepoError::NotFound` if no row matched.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// A page of results plus the number of rows matching before pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Normalized search criteria. Blank filters are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostSearch {
    pub body: Option<String>,
    pub title: Option<String>,
    pub tag: Option<String>,
    pub views: Option<SortDirection>,
    pub limit: u64,
    pub offset: u64,
}

impl From<SearchPostQuery> for PostSearch {
    fn from(query: SearchPostQuery) -> Self {
        let limit = query.page_size();
        let offset = query.page_offset();
        Self {
            body: non_blank(query.body),
            title: non_blank(query.title),
            tag: non_blank(query.tag),
            views: query.views,
            limit,
            offset,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, PostId> {
    /// Insert a new post and return the stored row.
    async fn insert(&self, draft: PostDraft) -> Result<Post, RepoError>;

    /// Load a post with its owner.
    async fn find_with_author(&self, id: PostId) -> Result<Option<PostWithAuthor>, RepoError>;

    /// All posts, newest first.
    async fn list_newest_first(&self) -> Result<Vec<Post>, RepoError>;

    /// All posts, most viewed first.
    async fn list_by_views(&self) -> Result<Page<Post>, RepoError>;

    /// Filtered, paginated lookup with owners joined. Filters are
    /// case-insensitive substring matches; the body filter only looks at
    /// `ContentBlock::text_fragments`.
    async fn search(&self, criteria: &PostSearch) -> Result<Page<PostWithAuthor>, RepoError>;

    /// Add one to the view counter as a single storage-side update.
    /// Returns the number of rows touched (0 when `id` does not exist).
    async fn increment_views(&self, id: PostId) -> Result<u64, RepoError>;

    /// Replace every writable field of an existing post.
    async fn replace(&self, id: PostId, draft: PostDraft) -> Result<Post, RepoError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_drops_blank_filters() {
        let criteria = PostSearch::from(SearchPostQuery {
            title: Some("  ".to_string()),
            tag: Some("rust".to_string()),
            ..Default::default()
        });

        assert_eq!(criteria.title, None);
        assert_eq!(criteria.tag.as_deref(), Some("rust"));
        assert_eq!(criteria.limit, 10);
        assert_eq!(criteria.offset, 0);
    }
}

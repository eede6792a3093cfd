//! In-memory post repository - used when no database is configured.
//!
//! Data is lost on process restart.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use inkpost_core::domain::{Post, PostDraft, PostId, PostWithAuthor, User, UserId};
use inkpost_core::error::RepoError;
use inkpost_core::ports::{BaseRepository, Page, PostRepository, PostSearch};
use inkpost_shared::ContentBlock;
use inkpost_shared::dto::SortDirection;

#[derive(Default)]
struct Store {
    posts: BTreeMap<PostId, Post>,
    users: HashMap<UserId, User>,
    last_id: PostId,
}

/// Post repository backed by a map behind an async `RwLock`.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<Store>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a user known so that it can be joined onto their posts.
    pub async fn add_user(&self, user: User) {
        self.store.write().await.users.insert(user.id, user);
    }
}

#[async_trait]
impl BaseRepository<Post, PostId> for InMemoryPostRepository {
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.posts.get(&id).cloned())
    }

    async fn delete(&self, id: PostId) -> Result<(), RepoError> {
        self.store
            .write()
            .await
            .posts
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, draft: PostDraft) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        store.last_id += 1;

        let now = Utc::now();
        let post = Post {
            id: store.last_id,
            user_id: draft.user_id,
            title: draft.title,
            body: draft.body,
            tags: draft.tags,
            description: draft.description,
            views: 0,
            created_at: now,
            updated_at: now,
        };
        store.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_with_author(&self, id: PostId) -> Result<Option<PostWithAuthor>, RepoError> {
        let store = self.store.read().await;
        Ok(store.posts.get(&id).map(|post| PostWithAuthor {
            post: post.clone(),
            author: store.users.get(&post.user_id).cloned(),
        }))
    }

    async fn list_newest_first(&self) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self.store.read().await.posts.values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(posts)
    }

    async fn list_by_views(&self) -> Result<Page<Post>, RepoError> {
        let mut posts: Vec<Post> = self.store.read().await.posts.values().cloned().collect();
        posts.sort_by(|a, b| b.views.cmp(&a.views).then(a.id.cmp(&b.id)));
        let total = posts.len() as u64;
        Ok(Page {
            items: posts,
            total,
        })
    }

    async fn search(&self, criteria: &PostSearch) -> Result<Page<PostWithAuthor>, RepoError> {
        let store = self.store.read().await;
        let mut matched: Vec<&Post> = store
            .posts
            .values()
            .filter(|post| matches_criteria(post, criteria))
            .collect();

        match criteria.views {
            Some(SortDirection::Asc) => {
                matched.sort_by(|a, b| a.views.cmp(&b.views).then(a.id.cmp(&b.id)))
            }
            Some(SortDirection::Desc) => {
                matched.sort_by(|a, b| b.views.cmp(&a.views).then(a.id.cmp(&b.id)))
            }
            None => matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))),
        }

        let total = matched.len() as u64;
        let items = matched
            .into_iter()
            .skip(criteria.offset as usize)
            .take(criteria.limit as usize)
            .map(|post| PostWithAuthor {
                post: post.clone(),
                author: store.users.get(&post.user_id).cloned(),
            })
            .collect();

        Ok(Page { items, total })
    }

    async fn increment_views(&self, id: PostId) -> Result<u64, RepoError> {
        let mut store = self.store.write().await;
        match store.posts.get_mut(&id) {
            Some(post) => {
                post.views += 1;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn replace(&self, id: PostId, draft: PostDraft) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        let post = store.posts.get_mut(&id).ok_or(RepoError::NotFound)?;

        post.user_id = draft.user_id;
        post.title = draft.title;
        post.body = draft.body;
        post.tags = draft.tags;
        post.description = draft.description;
        post.updated_at = Utc::now();

        Ok(post.clone())
    }
}

fn matches_criteria(post: &Post, criteria: &PostSearch) -> bool {
    criteria
        .title
        .as_deref()
        .is_none_or(|needle| contains_ci(&post.title, needle))
        && criteria
            .tag
            .as_deref()
            .is_none_or(|needle| contains_ci(&post.tags, needle))
        && criteria
            .body
            .as_deref()
            .is_none_or(|needle| body_contains_ci(post, needle))
}

fn body_contains_ci(post: &Post, needle: &str) -> bool {
    post.body
        .iter()
        .flat_map(ContentBlock::text_fragments)
        .any(|fragment| contains_ci(fragment, needle))
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

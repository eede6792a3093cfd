//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::ContentBlock;

/// Page size used by search when the caller does not pass `limit`.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Upper bound on a single search page.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Request to create a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub body: Vec<ContentBlock>,
    #[serde(default)]
    pub tags: String,
}

/// Request to update a post. Every field is replaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: String,
    pub body: Vec<ContentBlock>,
    #[serde(default)]
    pub tags: String,
}

/// Ordering by view count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "ASC", alias = "asc")]
    Asc,
    #[serde(rename = "DESC", alias = "desc")]
    Desc,
}

/// Search query string: `/posts/search?title=rust&views=DESC&limit=5`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchPostQuery {
    pub body: Option<String>,
    pub title: Option<String>,
    pub tag: Option<String>,
    pub views: Option<SortDirection>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl SearchPostQuery {
    /// Requested page size, defaulted and clamped to `1..=MAX_PAGE_SIZE`.
    pub fn page_size(&self) -> u64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn page_offset(&self) -> u64 {
        self.offset.unwrap_or(0)
    }
}

/// Public information about a post's owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: i32,
    pub full_name: String,
    pub email: String,
}

/// A post as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i32,
    pub title: String,
    pub body: Vec<ContentBlock>,
    pub tags: String,
    pub description: String,
    pub views: i32,
    pub user_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthorResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A list of posts together with the total number of matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_defaults_to_ten() {
        assert_eq!(SearchPostQuery::default().page_size(), 10);
        assert_eq!(SearchPostQuery::default().page_offset(), 0);
    }

    #[test]
    fn test_page_size_is_clamped() {
        let zero = SearchPostQuery {
            limit: Some(0),
            ..Default::default()
        };
        let huge = SearchPostQuery {
            limit: Some(10_000),
            ..Default::default()
        };

        assert_eq!(zero.page_size(), 1);
        assert_eq!(huge.page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_sort_direction_accepts_both_cases() {
        let upper: SortDirection = serde_json::from_str(r#""DESC""#).unwrap();
        let lower: SortDirection = serde_json::from_str(r#""asc""#).unwrap();

        assert_eq!(upper, SortDirection::Desc);
        assert_eq!(lower, SortDirection::Asc);
    }

    #[test]
    fn test_create_request_tags_default_to_empty() {
        let req: CreatePostRequest =
            serde_json::from_str(r#"{"title": "t", "body": []}"#).unwrap();

        assert_eq!(req.tags, "");
        assert!(req.body.is_empty());
    }
}

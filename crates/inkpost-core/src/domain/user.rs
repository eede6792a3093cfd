use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use inkpost_shared::dto::AuthorResponse;

pub type UserId = i32;

/// User entity - the owner of posts.
///
/// Users are managed upstream; this service only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for AuthorResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
        }
    }
}

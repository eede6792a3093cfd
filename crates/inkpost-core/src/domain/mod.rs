//! Domain entities - the core business objects.

mod post;
mod user;

pub use post::{Post, PostDraft, PostId, PostWithAuthor};
pub use user::{User, UserId};

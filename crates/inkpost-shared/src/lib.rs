//! # Inkpost Shared
//!
//! Wire types shared by the server and any Rust client: editor content blocks,
//! request/response DTOs and the RFC 7807 error body.

pub mod content;
pub mod dto;
pub mod response;

pub use content::ContentBlock;
pub use response::ErrorResponse;

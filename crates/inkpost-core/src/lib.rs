//! # Inkpost Core
//!
//! The domain layer of the Inkpost blog service.
//! This crate contains the post entities, the ports infrastructure must
//! implement, and the post service. It has no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::DomainError;
pub use service::PostService;

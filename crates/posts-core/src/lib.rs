//! # Posts Core
//!
//! The domain layer of the posts service.
//! This crate contains the post model, its validation and merge policy, the
//! repository port and the use-case service, with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{Post, PostDraft};
pub use error::{DomainError, FieldError, RepoError};
pub use service::PostService;

//! Use-case services on top of the repository ports.

mod post_service;

pub use post_service::{DomainResult, PostService};

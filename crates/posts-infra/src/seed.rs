//! Startup seeding from a JSON document.
//!
//! The document has the shape `{"posts": [{id, userId, title, body}, ...]}`.
//! Seeding only happens on an empty store so restarts do not rewrite data.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use posts_core::Post;
use posts_core::error::RepoError;
use posts_core::ports::{BaseRepository, PostRepository};

#[derive(Debug, Deserialize)]
struct SeedDocument {
    posts: Vec<Post>,
}

/// What the seeder did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store already held posts; nothing was written.
    Skipped { existing: u64 },
    /// This many posts were written.
    Loaded(usize),
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid seed document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to store seed posts: {0}")]
    Store(#[from] RepoError),
}

/// Load posts from `path` into `repo` if the store is empty.
pub async fn seed_from_file(repo: &dyn PostRepository, path: &Path) -> Result<SeedOutcome, SeedError> {
    let existing = repo.count().await?;
    if existing > 0 {
        tracing::info!(existing, "Store already populated, skipping seed");
        return Ok(SeedOutcome::Skipped { existing });
    }

    let raw = tokio::fs::read(path).await.map_err(|source| SeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document: SeedDocument = serde_json::from_slice(&raw)?;

    let saved = repo.save_all(document.posts).await?;
    tracing::info!(count = saved.len(), path = %path.display(), "Seeded posts");

    Ok(SeedOutcome::Loaded(saved.len()))
}

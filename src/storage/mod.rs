//! Storage abstractions for watermark persistence.
//!
//! Without a store, watermarks live only in memory and a restart treats the
//! current head of every board as already seen. With a store, each board's
//! anchor posts are saved after every completed scan and restored at startup.
//!
//! ## Directory Structure
//!
//! ```text
//! {state_dir}/
//! └── anchors/
//!     ├── Soft_Job.json
//!     └── Gossiping.json
//! ```

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Post;

// Re-export for convenience
pub use local::LocalStorage;

/// Persisted watermark of one board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorSnapshot {
    /// Board name
    pub board: String,
    /// ISO 8601 timestamp of last update
    pub updated_at: DateTime<Utc>,
    /// Anchor posts, newest first
    pub posts: Vec<Post>,
}

impl AnchorSnapshot {
    pub fn new(board: impl Into<String>, posts: Vec<Post>) -> Self {
        Self {
            board: board.into(),
            updated_at: Utc::now(),
            posts,
        }
    }
}

/// Trait for watermark storage backends.
#[async_trait]
pub trait AnchorStore: Send + Sync {
    /// Load the saved watermark of a board, if any.
    async fn load_anchor(&self, board: &str) -> Result<Option<AnchorSnapshot>>;

    /// Replace the saved watermark of a board.
    async fn save_anchor(&self, snapshot: &AnchorSnapshot) -> Result<()>;
}

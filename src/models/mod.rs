// src/models/mod.rs

//! Domain models for the board watcher.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod anchor;
mod board;
mod config;
mod post;
mod rule;
mod selectors;

// Re-export all public types
pub use anchor::{AnchorRecord, DEFAULT_ANCHOR_WIDTH};
pub use board::Board;
pub use config::{
    BoardConfig, Config, CrawlerConfig, ListingConfig, LoggingConfig, NotifyConfig, ScanConfig,
};
pub use post::{ListingEntry, ListingPage, Post, RawPost};
pub use rule::Rule;
pub use selectors::{CompiledSelectors, ListingSelectors};

/// A new post together with everyone subscribed to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedPost {
    pub post: Post,
    /// Subscribers of every matching rule, in rule order (never empty)
    pub subscribers: Vec<String>,
}

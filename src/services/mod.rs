//! Service layer for the board watcher.
//!
//! This module contains the business logic for:
//! - Listing fetching and post building (`HttpBoardClient`)
//! - Walking a listing down to a watermark (`ListingWalker`)
//! - Rule matching (`match_subscribers`)
//! - Scanning a board once (`BoardScanner`)
//! - Delivering matches (`Notifier`)

mod listing;
pub mod matcher;
mod notifier;
mod scanner;
pub mod walker;

#[cfg(test)]
pub(crate) mod testing;

pub use listing::{HttpBoardClient, PageFetcher, PostBuilder, extract_content, parse_listing};
pub use matcher::match_subscribers;
pub use notifier::{ConsoleNotifier, Notifier};
pub use scanner::{BoardScanner, ScanOutcome, select_subscribed};
pub use walker::{ListingWalker, StopReason, WalkOutcome};

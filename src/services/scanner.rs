// src/services/scanner.rs

//! Board scan service.
//!
//! One scan walks a board down to its watermark, renews the watermark from
//! the complete result, and pairs each new post with its subscribers.

use crate::error::Result;
use crate::models::{AnchorRecord, Board, MatchedPost, Post, ScanConfig};
use crate::services::matcher::match_subscribers;
use crate::services::walker::{ListingWalker, StopReason};
use crate::services::{PageFetcher, PostBuilder};

/// Result of scanning one board once.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Number of posts newer than the previous watermark
    pub new_posts: usize,

    /// New posts with at least one subscriber, newest first
    pub matches: Vec<MatchedPost>,

    pub stop: StopReason,
    pub pages_fetched: usize,
    pub skipped: usize,
}

/// Scans boards through a page fetcher and post builder.
pub struct BoardScanner<'a> {
    fetcher: &'a dyn PageFetcher,
    builder: &'a dyn PostBuilder,
    anchor_width: usize,
    max_scan_count: usize,
}

impl<'a> BoardScanner<'a> {
    /// Create a new scanner with the given collaborators and settings.
    pub fn new(
        fetcher: &'a dyn PageFetcher,
        builder: &'a dyn PostBuilder,
        settings: &ScanConfig,
    ) -> Self {
        Self {
            fetcher,
            builder,
            anchor_width: settings.anchor_width,
            max_scan_count: settings.max_scan_count,
        }
    }

    /// Install the initial watermark from the newest posts on the board.
    pub async fn bootstrap(&self, board: &mut Board) -> Result<()> {
        let outcome =
            ListingWalker::from_root(self.fetcher, self.builder, &board.url, self.anchor_width)
                .collect()
                .await?;
        let record = AnchorRecord::from_posts(self.anchor_width, outcome.posts);
        log::info!(
            "Bootstrapped board {} with anchors [{}]",
            board.name,
            record.post_ids().join(", ")
        );
        board.install_anchor(record);
        Ok(())
    }

    /// Scan a board once.
    ///
    /// The watermark is only renewed after the walk has completed; an error
    /// leaves it as it was so the next scan retries from the same place.
    pub async fn scan(&self, board: &mut Board) -> Result<ScanOutcome> {
        if !board.is_bootstrapped() {
            self.bootstrap(board).await?;
        }

        let outcome =
            ListingWalker::from_root(self.fetcher, self.builder, &board.url, self.max_scan_count)
                .stop_at(board.anchor())
                .collect()
                .await?;

        if outcome.stop == StopReason::BudgetReached {
            log::warn!(
                "Board {}: scan depth {} reached before the watermark",
                board.name,
                self.max_scan_count
            );
        }

        if let Some(anchor) = board.anchor_mut() {
            anchor.renew(&outcome.posts);
        }

        let new_posts = outcome.posts.len();
        let matches = select_subscribed(outcome.posts, board);
        log::debug!(
            "Board {}: {} new posts, {} matched, stop {:?}, {} pages, {} skipped",
            board.name,
            new_posts,
            matches.len(),
            outcome.stop,
            outcome.pages_fetched,
            outcome.skipped
        );

        Ok(ScanOutcome {
            new_posts,
            matches,
            stop: outcome.stop,
            pages_fetched: outcome.pages_fetched,
            skipped: outcome.skipped,
        })
    }
}

/// Pair posts with their subscribers, dropping posts nobody subscribed to.
pub fn select_subscribed(posts: Vec<Post>, board: &Board) -> Vec<MatchedPost> {
    posts
        .into_iter()
        .filter_map(|post| {
            let subscribers: Vec<String> = match_subscribers(&post, &board.rules)
                .map(str::to_string)
                .collect();
            (!subscribers.is_empty()).then_some(MatchedPost { post, subscribers })
        })
        .collect()
}

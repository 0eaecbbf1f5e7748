// src/services/walker.rs

//! Listing walker.
//!
//! Walks a paginated board listing from the newest post towards older ones,
//! one page at a time, and stops as soon as it has enough posts, reaches the
//! board's watermark, or runs out of pages.

use crate::error::Result;
use crate::models::{AnchorRecord, ListingEntry, Post, RawPost};
use crate::services::{PageFetcher, PostBuilder};

/// Why a walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The requested number of posts was produced
    BudgetReached,
    /// A post already in the watermark was found
    AnchorReached,
    /// No older page exists
    PaginationExhausted,
}

/// Everything a finished walk produced.
#[derive(Debug, Clone)]
pub struct WalkOutcome {
    /// Posts newest first
    pub posts: Vec<Post>,
    pub stop: StopReason,
    pub pages_fetched: usize,
    /// Rows dropped because the post could not be built
    pub skipped: usize,
}

/// Cursor over a board listing, newest post first.
pub struct ListingWalker<'a> {
    fetcher: &'a dyn PageFetcher,
    builder: &'a dyn PostBuilder,
    anchor: Option<&'a AnchorRecord>,
    remaining: usize,
    next_url: Option<String>,
    exclude_sticky: bool,
    // Rows of the current page in page order; popping walks newest to oldest.
    pending: Vec<RawPost>,
    stop: Option<StopReason>,
    pages_fetched: usize,
    skipped: usize,
}

impl<'a> ListingWalker<'a> {
    /// Walk from the listing root. Sticky posts on the root page are excluded.
    pub fn from_root(
        fetcher: &'a dyn PageFetcher,
        builder: &'a dyn PostBuilder,
        root_url: &str,
        max_count: usize,
    ) -> Self {
        Self::start(fetcher, builder, root_url, max_count, true)
    }

    /// Walk from an arbitrary listing page. No sticky exclusion is applied.
    pub fn from_page(
        fetcher: &'a dyn PageFetcher,
        builder: &'a dyn PostBuilder,
        page_url: &str,
        max_count: usize,
    ) -> Self {
        Self::start(fetcher, builder, page_url, max_count, false)
    }

    fn start(
        fetcher: &'a dyn PageFetcher,
        builder: &'a dyn PostBuilder,
        url: &str,
        max_count: usize,
        exclude_sticky: bool,
    ) -> Self {
        Self {
            fetcher,
            builder,
            anchor: None,
            remaining: max_count,
            next_url: Some(url.to_string()),
            exclude_sticky,
            pending: Vec::new(),
            stop: None,
            pages_fetched: 0,
            skipped: 0,
        }
    }

    /// Stop the walk at the first post found in `anchor`.
    pub fn stop_at(mut self, anchor: Option<&'a AnchorRecord>) -> Self {
        self.anchor = anchor;
        self
    }

    /// Reason the walk ended, once it has.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop
    }

    /// Produce the next post, or `None` once the walk has ended.
    ///
    /// Fails only when a listing page cannot be fetched or parsed; posts that
    /// cannot be built are skipped.
    pub async fn next_post(&mut self) -> Result<Option<Post>> {
        loop {
            if self.stop.is_some() {
                return Ok(None);
            }
            if self.remaining == 0 {
                return Ok(self.finish(StopReason::BudgetReached));
            }

            let Some(raw) = self.pending.pop() else {
                match self.next_url.take() {
                    Some(url) => {
                        self.load_page(&url).await?;
                        continue;
                    }
                    None => return Ok(self.finish(StopReason::PaginationExhausted)),
                }
            };

            // The id is known from the link alone; no need to fetch the body
            // of a post that is already part of the watermark.
            if raw.post_id().is_some_and(|id| self.is_anchor(&id)) {
                return Ok(self.finish(StopReason::AnchorReached));
            }

            let post = match self.builder.build(&raw).await {
                Ok(post) => post,
                Err(e) if e.is_post_unavailable() => {
                    log::debug!("Skipping entry: {}", e);
                    self.skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            if self.is_anchor(&post.post_id) {
                return Ok(self.finish(StopReason::AnchorReached));
            }

            self.remaining -= 1;
            return Ok(Some(post));
        }
    }

    /// Run the walk to completion.
    pub async fn collect(mut self) -> Result<WalkOutcome> {
        let mut posts = Vec::new();
        while let Some(post) = self.next_post().await? {
            posts.push(post);
        }
        Ok(WalkOutcome {
            posts,
            stop: self.stop.unwrap_or(StopReason::PaginationExhausted),
            pages_fetched: self.pages_fetched,
            skipped: self.skipped,
        })
    }

    async fn load_page(&mut self, url: &str) -> Result<()> {
        let page = self.fetcher.fetch(url).await?;
        self.pages_fetched += 1;

        let mut entries = page.entries;
        if self.exclude_sticky {
            if let Some(cut) = entries
                .iter()
                .position(|e| matches!(e, ListingEntry::StickySeparator))
            {
                entries.truncate(cut);
            }
            // Sticky posts only sit on the newest page.
            self.exclude_sticky = false;
        }

        self.pending = entries
            .into_iter()
            .filter_map(|entry| match entry {
                ListingEntry::Post(raw) => Some(raw),
                ListingEntry::StickySeparator => None,
            })
            .collect();
        self.next_url = page.next_url;
        log::debug!(
            "Loaded page {} with {} entries (older page: {})",
            url,
            self.pending.len(),
            self.next_url.as_deref().unwrap_or("none")
        );
        Ok(())
    }

    fn is_anchor(&self, post_id: &str) -> bool {
        self.anchor.is_some_and(|a| a.contains(post_id))
    }

    fn finish(&mut self, reason: StopReason) -> Option<Post> {
        self.stop = Some(reason);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::FakeBoard;

    fn ids(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.post_id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_walk_is_newest_first_across_pages() {
        let board = FakeBoard::new(&["A", "B", "C", "D", "E", "F", "G"], 3);
        let outcome = ListingWalker::from_root(&board, &board, &board.root_url(), 100)
            .collect()
            .await
            .unwrap();
        assert_eq!(ids(&outcome.posts), vec!["G", "F", "E", "D", "C", "B", "A"]);
        assert_eq!(outcome.stop, StopReason::PaginationExhausted);
        assert_eq!(outcome.pages_fetched, 3);
    }

    #[tokio::test]
    async fn test_stops_before_anchor() {
        let board = FakeBoard::new(&["Z", "C", "B", "A", "D", "E"], 20);
        let anchor = AnchorRecord::from_posts(3, ["A", "B", "C"].map(|id| board.post(id)));
        let outcome = ListingWalker::from_root(&board, &board, &board.root_url(), 10)
            .stop_at(Some(&anchor))
            .collect()
            .await
            .unwrap();
        assert_eq!(ids(&outcome.posts), vec!["E", "D"]);
        assert_eq!(outcome.stop, StopReason::AnchorReached);
    }

    #[tokio::test]
    async fn test_anchor_hit_does_not_fetch_post_body() {
        let board = FakeBoard::new(&["A", "B"], 20);
        let anchor = AnchorRecord::from_posts(3, [board.post("B")]);
        let outcome = ListingWalker::from_root(&board, &board, &board.root_url(), 10)
            .stop_at(Some(&anchor))
            .collect()
            .await
            .unwrap();
        assert!(outcome.posts.is_empty());
        assert_eq!(board.built_count(), 0);
    }

    #[tokio::test]
    async fn test_budget_limits_output_without_extra_fetch() {
        let board = FakeBoard::new(&["A", "B", "C", "D", "E", "F"], 3);
        let outcome = ListingWalker::from_root(&board, &board, &board.root_url(), 3)
            .collect()
            .await
            .unwrap();
        assert_eq!(ids(&outcome.posts), vec!["F", "E", "D"]);
        assert_eq!(outcome.stop, StopReason::BudgetReached);
        assert_eq!(outcome.pages_fetched, 1);
    }

    #[tokio::test]
    async fn test_zero_budget_fetches_nothing() {
        let board = FakeBoard::new(&["A"], 20);
        let outcome = ListingWalker::from_root(&board, &board, &board.root_url(), 0)
            .collect()
            .await
            .unwrap();
        assert!(outcome.posts.is_empty());
        assert_eq!(outcome.pages_fetched, 0);
    }

    #[tokio::test]
    async fn test_sticky_posts_excluded_from_root() {
        let board = FakeBoard::new(&["A", "B"], 20).with_sticky(&["S1", "S2"]);
        let outcome = ListingWalker::from_root(&board, &board, &board.root_url(), 100)
            .collect()
            .await
            .unwrap();
        assert_eq!(ids(&outcome.posts), vec!["B", "A"]);
    }

    #[tokio::test]
    async fn test_sticky_excluded_on_empty_history() {
        let board = FakeBoard::new(&[], 20).with_sticky(&["S1"]);
        let outcome = ListingWalker::from_root(&board, &board, &board.root_url(), 100)
            .collect()
            .await
            .unwrap();
        assert!(outcome.posts.is_empty());
        assert_eq!(outcome.stop, StopReason::PaginationExhausted);
    }

    #[tokio::test]
    async fn test_separator_on_older_page_is_not_a_cut() {
        let board = FakeBoard::new(&["A", "B", "C", "D"], 2)
            .with_sticky(&["S1"])
            .with_separator_on_page(1);
        let outcome = ListingWalker::from_root(&board, &board, &board.root_url(), 100)
            .collect()
            .await
            .unwrap();
        assert_eq!(ids(&outcome.posts), vec!["D", "C", "B", "A"]);
        assert_eq!(outcome.pages_fetched, 2);
    }

    #[tokio::test]
    async fn test_from_page_keeps_sticky_rows() {
        let board = FakeBoard::new(&["A"], 20).with_sticky(&["S1"]);
        let outcome = ListingWalker::from_page(&board, &board, &board.root_url(), 100)
            .collect()
            .await
            .unwrap();
        assert_eq!(ids(&outcome.posts), vec!["S1", "A"]);
    }

    #[tokio::test]
    async fn test_unavailable_posts_do_not_consume_budget() {
        let board = FakeBoard::new(&["A", "B", "X", "C", "D"], 20).with_deleted(&["X"]);
        let outcome = ListingWalker::from_root(&board, &board, &board.root_url(), 3)
            .collect()
            .await
            .unwrap();
        assert_eq!(ids(&outcome.posts), vec!["D", "C", "B"]);
        assert_eq!(outcome.skipped, 1);
    }

    #[tokio::test]
    async fn test_deleted_post_results_match_clean_listing() {
        let with_deleted = FakeBoard::new(&["A", "X", "B", "C"], 2).with_deleted(&["X"]);
        let clean = FakeBoard::new(&["A", "B", "C"], 2);

        let a = ListingWalker::from_root(&with_deleted, &with_deleted, &with_deleted.root_url(), 10)
            .collect()
            .await
            .unwrap();
        let b = ListingWalker::from_root(&clean, &clean, &clean.root_url(), 10)
            .collect()
            .await
            .unwrap();
        assert_eq!(ids(&a.posts), ids(&b.posts));
    }

    #[tokio::test]
    async fn test_deleted_newest_anchor_still_stops() {
        let board = FakeBoard::new(&["A", "B", "C", "D"], 20).with_deleted(&["C"]);
        // C was the newest anchor post and has since been deleted.
        let anchor = AnchorRecord::from_posts(3, ["C", "B", "A"].map(|id| board.post(id)));
        let outcome = ListingWalker::from_root(&board, &board, &board.root_url(), 10)
            .stop_at(Some(&anchor))
            .collect()
            .await
            .unwrap();
        assert_eq!(ids(&outcome.posts), vec!["D"]);
        assert_eq!(outcome.stop, StopReason::AnchorReached);
    }

    #[tokio::test]
    async fn test_lazy_next_post() {
        let board = FakeBoard::new(&["A", "B", "C", "D"], 2);
        let mut walker = ListingWalker::from_root(&board, &board, &board.root_url(), 10);
        let first = walker.next_post().await.unwrap().unwrap();
        assert_eq!(first.post_id, "D");
        assert_eq!(walker.stop_reason(), None);
        assert_eq!(board.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_broken_listing_propagates() {
        let board = FakeBoard::new(&["A", "B", "C"], 2).with_broken_page(1);
        let result = ListingWalker::from_root(&board, &board, &board.root_url(), 10)
            .collect()
            .await;
        assert!(result.is_err());
    }
}

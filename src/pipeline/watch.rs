// src/pipeline/watch.rs

//! Board watching pipeline.
//!
//! Boards are scanned concurrently up to `crawler.max_concurrent`; each board
//! is borrowed mutably by exactly one scan at a time.

use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};

use crate::error::Result;
use crate::models::{AnchorRecord, Board, Config};
use crate::services::{BoardScanner, Notifier, PageFetcher, PostBuilder, ScanOutcome};
use crate::storage::{AnchorSnapshot, AnchorStore};

/// Summary of one scan round over all boards.
#[derive(Debug, Clone)]
pub struct RoundStats {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub board_total: usize,
    pub board_failures: usize,
    pub new_posts: usize,
    pub matched_posts: usize,
    pub deliveries: usize,
    pub delivery_failures: usize,
}

impl RoundStats {
    fn start(board_total: usize) -> Self {
        let now = Utc::now();
        Self {
            start_time: now,
            end_time: now,
            board_total,
            board_failures: 0,
            new_posts: 0,
            matched_posts: 0,
            deliveries: 0,
            delivery_failures: 0,
        }
    }

    /// Log the round summary.
    pub fn log_summary(&self) {
        let elapsed = self.end_time - self.start_time;
        log::info!(
            "Round finished in {}ms: {}/{} boards ok, {} new posts, {} matched, {} delivered, \
             {} delivery failures",
            elapsed.num_milliseconds(),
            self.board_total - self.board_failures,
            self.board_total,
            self.new_posts,
            self.matched_posts,
            self.deliveries,
            self.delivery_failures
        );
    }
}

/// Scans boards, keeps their watermarks, and hands matches to a notifier.
pub struct Watcher<'a> {
    scanner: BoardScanner<'a>,
    notifier: &'a dyn Notifier,
    store: Option<&'a dyn AnchorStore>,
    anchor_width: usize,
    concurrency: usize,
}

impl<'a> Watcher<'a> {
    /// Create a watcher with the given collaborators.
    pub fn new(
        config: &Config,
        fetcher: &'a dyn PageFetcher,
        builder: &'a dyn PostBuilder,
        notifier: &'a dyn Notifier,
        store: Option<&'a dyn AnchorStore>,
    ) -> Self {
        Self {
            scanner: BoardScanner::new(fetcher, builder, &config.scan),
            notifier,
            store,
            anchor_width: config.scan.anchor_width,
            concurrency: config.crawler.max_concurrent.max(1),
        }
    }

    /// Give a board its watermark: restored from the store when one was
    /// saved, otherwise taken from the live head of the board.
    pub async fn prepare_board(&self, board: &mut Board) -> Result<()> {
        if board.is_bootstrapped() {
            return Ok(());
        }

        if let Some(store) = self.store {
            if let Some(snapshot) = store.load_anchor(&board.name).await? {
                let record = AnchorRecord::from_posts(self.anchor_width, snapshot.posts);
                log::info!(
                    "Restored board {} anchors [{}] saved at {}",
                    board.name,
                    record.post_ids().join(", "),
                    snapshot.updated_at
                );
                board.install_anchor(record);
                return Ok(());
            }
        }

        self.scanner.bootstrap(board).await?;
        self.save_anchor(board).await;
        Ok(())
    }

    /// Bootstrap every board. Returns the number of boards that failed; they
    /// are retried on their first scan.
    pub async fn bootstrap_all(&self, boards: &mut [Board]) -> usize {
        let results: Vec<(String, Result<()>)> = stream::iter(boards.iter_mut())
            .map(|board| async move {
                let result = self.prepare_board(board).await;
                (board.name.clone(), result)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut failures = 0;
        for (name, result) in results {
            match result {
                Ok(()) => log::info!("The initialization of board {} has been completed", name),
                Err(e) => {
                    failures += 1;
                    log::warn!("Failed to initialize board {}: {}", name, e);
                }
            }
        }
        failures
    }

    /// Scan one board and persist its renewed watermark.
    pub async fn scan_board(&self, board: &mut Board) -> Result<ScanOutcome> {
        self.prepare_board(board).await?;
        let outcome = self.scanner.scan(board).await?;
        self.save_anchor(board).await;
        Ok(outcome)
    }

    /// Scan every board once and deliver the matches.
    pub async fn run_round(&self, boards: &mut [Board]) -> RoundStats {
        let mut stats = RoundStats::start(boards.len());

        let mut results = stream::iter(boards.iter_mut())
            .map(|board| async move {
                let result = self.scan_board(board).await;
                (board.name.clone(), result)
            })
            .buffer_unordered(self.concurrency);

        while let Some((name, result)) = results.next().await {
            let outcome = match result {
                Ok(outcome) => outcome,
                Err(error) => {
                    stats.board_failures += 1;
                    log::warn!("Failed to scan board {}: {}", name, error);
                    continue;
                }
            };

            stats.new_posts += outcome.new_posts;
            stats.matched_posts += outcome.matches.len();
            for matched in &outcome.matches {
                match self.notifier.deliver(&name, matched).await {
                    Ok(()) => stats.deliveries += 1,
                    Err(error) => {
                        stats.delivery_failures += 1;
                        log::error!(
                            "Failed to deliver {} from board {}: {}",
                            matched.post.url,
                            name,
                            error
                        );
                    }
                }
            }
        }

        stats.end_time = Utc::now();
        stats
    }

    async fn save_anchor(&self, board: &Board) {
        let (Some(store), Some(anchor)) = (self.store, board.anchor()) else {
            return;
        };
        let snapshot = AnchorSnapshot::new(board.name.clone(), anchor.posts().cloned().collect());
        if let Err(e) = store.save_anchor(&snapshot).await {
            log::warn!("Failed to save anchors for board {}: {}", board.name, e);
        }
    }
}

/// Run scan rounds forever, `interval` apart, until Ctrl-C.
///
/// A round interrupted by Ctrl-C is dropped as a whole; boards whose walk had
/// not finished keep their previous watermark.
pub async fn run_watch(
    watcher: &Watcher<'_>,
    boards: &mut [Board],
    interval: Duration,
) -> Result<()> {
    log::info!("Initializing {} boards", boards.len());
    let failures = watcher.bootstrap_all(boards).await;
    if failures > 0 {
        log::warn!("{} boards failed to initialize and will retry on scan", failures);
    }

    loop {
        tokio::select! {
            stats = watcher.run_round(boards) => stats.log_summary(),
            _ = tokio::signal::ctrl_c() => {
                log::info!("Shutdown requested, abandoning the current round");
                return Ok(());
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => {
                log::info!("Shutdown requested");
                return Ok(());
            }
        }
    }
}

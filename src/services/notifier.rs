// src/services/notifier.rs

//! Delivery of matched posts.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::MatchedPost;
use crate::utils::template::render;

/// Delivery boundary for matched posts.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one matched post from `board` to its subscribers.
    async fn deliver(&self, board: &str, matched: &MatchedPost) -> Result<()>;
}

/// Renders matched posts through a template and prints them to stdout.
pub struct ConsoleNotifier {
    template: String,
}

impl ConsoleNotifier {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Render a matched post, filling `{board}` and `{subscribers}` on top of
    /// the post placeholders.
    pub fn render(&self, board: &str, matched: &MatchedPost) -> String {
        render(&self.template, |name| match name {
            "board" => Some(board.to_string()),
            "subscribers" => Some(matched.subscribers.join(", ")),
            _ => matched.post.field(name).map(str::to_string),
        })
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn deliver(&self, board: &str, matched: &MatchedPost) -> Result<()> {
        println!("{}", self.render(board, matched));
        log::info!(
            "Sent {} to the following subscribers: {}",
            matched.post.title,
            matched.subscribers.join(",")
        );
        Ok(())
    }
}

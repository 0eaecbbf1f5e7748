//! Bounded watermark of the newest confirmed posts of a board.

use std::collections::{HashSet, VecDeque};

use crate::models::Post;

/// Default number of anchor posts kept per board.
pub const DEFAULT_ANCHOR_WIDTH: usize = 3;

/// The N most recently confirmed newest posts of a board, newest at the front.
///
/// `ids` always holds exactly the identities of `posts`. Keeping more than one
/// post lets a scan still find the watermark when the newest anchor post has
/// been deleted since the previous scan.
#[derive(Debug, Clone)]
pub struct AnchorRecord {
    width: usize,
    posts: VecDeque<Post>,
    ids: HashSet<String>,
}

impl AnchorRecord {
    /// Create an empty record holding at most `width` posts.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            posts: VecDeque::with_capacity(width),
            ids: HashSet::with_capacity(width),
        }
    }

    /// Build a record from posts ordered newest-first, keeping the newest `width`.
    pub fn from_posts(width: usize, posts: impl IntoIterator<Item = Post>) -> Self {
        let mut record = Self::new(width);
        for post in posts {
            if record.posts.len() == width {
                break;
            }
            if record.ids.insert(post.post_id.clone()) {
                record.posts.push_back(post);
            }
        }
        record
    }

    /// Fold a scan's new posts (newest-first) into the record.
    ///
    /// The new posts go to the front with the newest first, then the oldest
    /// posts are evicted until the record is back to its width.
    pub fn renew(&mut self, new_posts: &[Post]) {
        for post in new_posts.iter().rev() {
            if self.ids.insert(post.post_id.clone()) {
                self.posts.push_front(post.clone());
            }
        }
        while self.posts.len() > self.width {
            if let Some(evicted) = self.posts.pop_back() {
                self.ids.remove(&evicted.post_id);
            }
        }
    }

    /// Whether a post id is part of the watermark.
    pub fn contains(&self, post_id: &str) -> bool {
        self.ids.contains(post_id)
    }

    /// Anchor posts, newest first.
    pub fn posts(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter()
    }

    /// Anchor post ids, newest first.
    pub fn post_ids(&self) -> Vec<&str> {
        self.posts.iter().map(|p| p.post_id.as_str()).collect()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let from_posts: HashSet<String> = self.posts.iter().map(|p| p.post_id.clone()).collect();
        self.posts.len() <= self.width
            && from_posts == self.ids
            && from_posts.len() == self.posts.len()
    }
}

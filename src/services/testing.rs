//! In-memory board used by walker and scanner tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{ListingEntry, ListingPage, Post, RawPost};
use crate::services::{PageFetcher, PostBuilder};

const BASE: &str = "https://fake.test/bbs/Test";

struct FakePost {
    post: Post,
    deleted: bool,
}

struct State {
    /// Oldest first
    posts: Vec<FakePost>,
    sticky: Vec<Post>,
    broken_page: Option<usize>,
    stray_separator: Option<usize>,
}

/// A paginated board held in memory.
///
/// Posts are chunked oldest first into pages of `per_page`; the last chunk is
/// the root page, which also carries the sticky posts below a separator.
pub struct FakeBoard {
    state: Mutex<State>,
    per_page: usize,
    fetches: AtomicUsize,
    builds: AtomicUsize,
}

impl FakeBoard {
    pub fn new(ids: &[&str], per_page: usize) -> Self {
        let posts = ids
            .iter()
            .map(|id| FakePost {
                post: Self::make_post(id),
                deleted: false,
            })
            .collect();
        Self {
            state: Mutex::new(State {
                posts,
                sticky: Vec::new(),
                broken_page: None,
                stray_separator: None,
            }),
            per_page: per_page.max(1),
            fetches: AtomicUsize::new(0),
            builds: AtomicUsize::new(0),
        }
    }

    pub fn with_sticky(self, ids: &[&str]) -> Self {
        self.state.lock().unwrap().sticky = ids.iter().map(|id| Self::make_post(id)).collect();
        self
    }

    pub fn with_deleted(self, ids: &[&str]) -> Self {
        for id in ids {
            self.delete(id);
        }
        self
    }

    /// Make the page `index` pages away from the root fail to load.
    pub fn with_broken_page(self, index: usize) -> Self {
        self.set_broken_page(Some(index));
        self
    }

    /// Put a separator after the first row of an older page.
    pub fn with_separator_on_page(self, index: usize) -> Self {
        self.state.lock().unwrap().stray_separator = Some(index);
        self
    }

    pub fn set_broken_page(&self, index: Option<usize>) {
        self.state.lock().unwrap().broken_page = index;
    }

    pub fn root_url(&self) -> String {
        format!("{BASE}/index.html")
    }

    fn page_url(index: usize) -> String {
        if index == 0 {
            format!("{BASE}/index.html")
        } else {
            format!("{BASE}/page{index}.html")
        }
    }

    fn page_index(url: &str) -> Option<usize> {
        let name = url.strip_prefix(BASE)?.strip_prefix('/')?;
        if name == "index.html" {
            return Some(0);
        }
        name.strip_prefix("page")?.strip_suffix(".html")?.parse().ok()
    }

    pub fn make_post(id: &str) -> Post {
        Post {
            post_id: id.to_string(),
            title: format!("title {id}"),
            author: "author".to_string(),
            date: " 1/02".to_string(),
            url: format!("{BASE}/{id}.html"),
            content: format!("content of {id}"),
        }
    }

    /// The post value for an id as the builder would produce it.
    pub fn post(&self, id: &str) -> Post {
        let state = self.state.lock().unwrap();
        state
            .posts
            .iter()
            .map(|p| &p.post)
            .chain(state.sticky.iter())
            .find(|p| p.post_id == id)
            .cloned()
            .unwrap_or_else(|| Self::make_post(id))
    }

    /// Append a new post at the head of the board.
    pub fn publish(&self, post: Post) {
        self.state.lock().unwrap().posts.push(FakePost {
            post,
            deleted: false,
        });
    }

    pub fn publish_id(&self, id: &str) {
        self.publish(Self::make_post(id));
    }

    pub fn delete(&self, id: &str) {
        let mut state = self.state.lock().unwrap();
        for p in state.posts.iter_mut().filter(|p| p.post.post_id == id) {
            p.deleted = true;
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn built_count(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    fn raw(post: &Post) -> RawPost {
        RawPost {
            title: Some(post.title.clone()),
            author: Some(post.author.clone()),
            date: Some(post.date.clone()),
            url: Some(post.url.clone()),
        }
    }
}

#[async_trait]
impl PageFetcher for FakeBoard {
    async fn fetch(&self, url: &str) -> Result<ListingPage> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();

        let index = Self::page_index(url)
            .ok_or_else(|| AppError::listing_changed(url, "unknown page"))?;
        if state.broken_page == Some(index) {
            return Err(AppError::listing_changed(url, "broken page"));
        }

        let chunks: Vec<&[FakePost]> = state.posts.chunks(self.per_page).collect();
        let page_count = chunks.len().max(1);
        if index >= page_count {
            return Err(AppError::listing_changed(url, "page out of range"));
        }

        let mut entries: Vec<ListingEntry> = chunks
            .get(page_count - 1 - index)
            .map(|chunk| {
                chunk
                    .iter()
                    .map(|p| {
                        if p.deleted {
                            ListingEntry::Post(RawPost {
                                date: Some(p.post.date.clone()),
                                ..RawPost::default()
                            })
                        } else {
                            ListingEntry::Post(Self::raw(&p.post))
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        if index > 0 && state.stray_separator == Some(index) && !entries.is_empty() {
            entries.insert(1, ListingEntry::StickySeparator);
        }

        if index == 0 && !state.sticky.is_empty() {
            entries.push(ListingEntry::StickySeparator);
            entries.extend(state.sticky.iter().map(|p| ListingEntry::Post(Self::raw(p))));
        }

        let next_url = (index + 1 < page_count).then(|| Self::page_url(index + 1));
        Ok(ListingPage { entries, next_url })
    }
}

#[async_trait]
impl PostBuilder for FakeBoard {
    async fn build(&self, entry: &RawPost) -> Result<Post> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        let url = entry
            .url
            .clone()
            .ok_or_else(|| AppError::post_unavailable("", "deleted"))?;
        let state = self.state.lock().unwrap();
        state
            .posts
            .iter()
            .filter(|p| !p.deleted)
            .map(|p| &p.post)
            .chain(state.sticky.iter())
            .find(|p| p.url == url)
            .cloned()
            .ok_or_else(|| AppError::post_unavailable(url, "not found"))
    }
}

// src/services/listing.rs

//! Board listing fetcher and post builder.
//!
//! The walker only talks to the [`PageFetcher`] and [`PostBuilder`] traits;
//! [`HttpBoardClient`] is the HTTP + HTML implementation of both.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{CompiledSelectors, Config, ListingEntry, ListingPage, Post, RawPost};
use crate::utils::http::{create_async_client, fetch_text};
use crate::utils::resolve_url;
use crate::utils::url::extract_post_id;

/// Source of listing pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a listing page and split it into entries.
    async fn fetch(&self, url: &str) -> Result<ListingPage>;
}

/// Turns a raw listing row into a full post.
#[async_trait]
pub trait PostBuilder: Send + Sync {
    /// Build a post, failing with `AppError::PostUnavailable` when the post
    /// cannot be read (deleted, missing fields, body fetch failed).
    async fn build(&self, entry: &RawPost) -> Result<Post>;
}

/// HTTP client for PTT-style boards.
pub struct HttpBoardClient {
    client: Client,
    selectors: CompiledSelectors,
    delay: Duration,
}

impl HttpBoardClient {
    /// Create a board client with the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = create_async_client(&config.crawler)?;
        let selectors = config.listing.selectors.compile()?;
        Ok(Self {
            client,
            selectors,
            delay: Duration::from_millis(config.crawler.request_delay_ms),
        })
    }

    async fn get(&self, url: &str) -> Result<String> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        log::debug!("GET {}", url);
        fetch_text(&self.client, url).await
    }
}

#[async_trait]
impl PageFetcher for HttpBoardClient {
    async fn fetch(&self, url: &str) -> Result<ListingPage> {
        let html = self.get(url).await?;
        parse_listing(&html, url, &self.selectors)
    }
}

#[async_trait]
impl PostBuilder for HttpBoardClient {
    async fn build(&self, entry: &RawPost) -> Result<Post> {
        let url = entry
            .url
            .clone()
            .ok_or_else(|| AppError::post_unavailable("", "entry has no link"))?;
        let missing = |field: &str| AppError::post_unavailable(&url, format!("missing {field}"));

        let title = entry.title.clone().ok_or_else(|| missing("title"))?;
        let author = entry.author.clone().ok_or_else(|| missing("author"))?;
        let date = entry.date.clone().ok_or_else(|| missing("date"))?;
        let post_id = extract_post_id(&url).ok_or_else(|| missing("post id"))?;

        let html = self
            .get(&url)
            .await
            .map_err(|e| AppError::post_unavailable(&url, e))?;
        let content = extract_content(&html, &self.selectors.content)
            .ok_or_else(|| missing("content"))?;

        Ok(Post {
            post_id,
            title,
            author,
            date,
            url,
            content,
        })
    }
}

/// Parse a listing page into entries (document order) and the older-page link.
pub fn parse_listing(
    html: &str,
    page_url: &str,
    selectors: &CompiledSelectors,
) -> Result<ListingPage> {
    let document = Html::parse_document(html);
    let base_url = Url::parse(page_url)?;

    let container = document
        .select(&selectors.container)
        .next()
        .ok_or_else(|| AppError::listing_changed(page_url, "listing container not found"))?;

    let entries: Vec<ListingEntry> = container
        .children()
        .filter_map(ElementRef::wrap)
        .map(|row| {
            if row
                .value()
                .classes()
                .any(|c| c == selectors.separator_class)
            {
                ListingEntry::StickySeparator
            } else {
                ListingEntry::Post(parse_row(&row, selectors, &base_url))
            }
        })
        .collect();

    if entries.is_empty() {
        return Err(AppError::listing_changed(page_url, "listing has no entries"));
    }

    let next_url = document
        .select(&selectors.next_page)
        .next()
        .and_then(|e| e.value().attr(&selectors.attr_name))
        .map(|href| resolve_url(&base_url, href));

    Ok(ListingPage { entries, next_url })
}

fn parse_row(row: &ElementRef, selectors: &CompiledSelectors, base_url: &Url) -> RawPost {
    let title_elem = row.select(&selectors.title).next();

    RawPost {
        title: title_elem.map(element_text).filter(|t| !t.is_empty()),
        author: select_text(row, &selectors.author),
        date: select_text(row, &selectors.date),
        url: title_elem
            .and_then(|e| e.value().attr(&selectors.attr_name))
            .map(|href| resolve_url(base_url, href)),
    }
}

fn select_text(row: &ElementRef, selector: &Selector) -> Option<String> {
    row.select(selector)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Flatten the post body to plain text.
pub fn extract_content(html: &str, selector: &Selector) -> Option<String> {
    let document = Html::parse_document(html);
    let body = document.select(selector).next()?;
    let text: String = body.text().collect();
    Some(text.trim().replace("\n\n", "\n"))
}

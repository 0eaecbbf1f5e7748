// src/models/selectors.rs

//! CSS selectors for scraping a board listing and its posts.

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// CSS selectors for scraping a board listing.
///
/// Defaults follow the PTT web layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingSelectors {
    /// Selector for the element whose children are the listing rows
    #[serde(default = "default_container")]
    pub container_selector: String,

    /// Class marking the divider above the sticky posts
    #[serde(default = "default_separator_class")]
    pub separator_class: String,

    /// Selector for the title link within a row
    #[serde(default = "default_title")]
    pub title_selector: String,

    /// Selector for the author element within a row
    #[serde(default = "default_author")]
    pub author_selector: String,

    /// Selector for the date element within a row
    #[serde(default = "default_date")]
    pub date_selector: String,

    /// Selector for the link to the next older page
    #[serde(default = "default_next_page")]
    pub next_page_selector: String,

    /// Selector for the post body on the post page
    #[serde(default = "default_content")]
    pub content_selector: String,

    /// HTML attribute name for extracting links (usually "href")
    #[serde(default = "default_attr_name")]
    pub attr_name: String,
}

fn default_container() -> String {
    ".r-list-container".to_string()
}

fn default_separator_class() -> String {
    "r-list-sep".to_string()
}

fn default_title() -> String {
    ".title a".to_string()
}

fn default_author() -> String {
    ".meta .author".to_string()
}

fn default_date() -> String {
    ".meta .date".to_string()
}

fn default_next_page() -> String {
    ".btn-group-paging a:nth-child(2)".to_string()
}

fn default_content() -> String {
    "#main-content".to_string()
}

fn default_attr_name() -> String {
    "href".to_string()
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            container_selector: default_container(),
            separator_class: default_separator_class(),
            title_selector: default_title(),
            author_selector: default_author(),
            date_selector: default_date(),
            next_page_selector: default_next_page(),
            content_selector: default_content(),
            attr_name: default_attr_name(),
        }
    }
}

impl ListingSelectors {
    /// Parse every selector, failing on the first invalid one.
    pub fn compile(&self) -> Result<CompiledSelectors> {
        Ok(CompiledSelectors {
            container: parse_selector(&self.container_selector)?,
            title: parse_selector(&self.title_selector)?,
            author: parse_selector(&self.author_selector)?,
            date: parse_selector(&self.date_selector)?,
            next_page: parse_selector(&self.next_page_selector)?,
            content: parse_selector(&self.content_selector)?,
            separator_class: self.separator_class.clone(),
            attr_name: self.attr_name.clone(),
        })
    }
}

/// Parsed form of [`ListingSelectors`].
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub container: Selector,
    pub title: Selector,
    pub author: Selector,
    pub date: Selector,
    pub next_page: Selector,
    pub content: Selector,
    pub separator_class: String,
    pub attr_name: String,
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

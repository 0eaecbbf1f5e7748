//! A monitored board with its rules and watermark.

use crate::models::{AnchorRecord, BoardConfig, ListingConfig, Rule};
use crate::utils::url::board_url;

/// One monitored forum listing.
#[derive(Debug, Clone)]
pub struct Board {
    /// Board name (e.g. "Soft_Job")
    pub name: String,

    /// Listing root URL (newest page)
    pub url: String,

    /// Subscriber rules, evaluated independently
    pub rules: Vec<Rule>,

    anchor: Option<AnchorRecord>,
}

impl Board {
    /// Create a board without a watermark yet.
    pub fn new(name: impl Into<String>, url: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            rules,
            anchor: None,
        }
    }

    /// Create a board from its configuration entry.
    pub fn from_config(config: &BoardConfig, listing: &ListingConfig) -> Self {
        let url = config
            .url
            .clone()
            .unwrap_or_else(|| board_url(&listing.board_url_template, &config.name));
        Self::new(config.name.clone(), url, config.rules.clone())
    }

    /// Current watermark, if the board has been bootstrapped.
    pub fn anchor(&self) -> Option<&AnchorRecord> {
        self.anchor.as_ref()
    }

    pub(crate) fn anchor_mut(&mut self) -> Option<&mut AnchorRecord> {
        self.anchor.as_mut()
    }

    /// Install the initial watermark.
    pub fn install_anchor(&mut self, record: AnchorRecord) {
        self.anchor = Some(record);
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.anchor.is_some()
    }
}

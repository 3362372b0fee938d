// src/models/selectors.rs

//! CSS selectors for scraping the forum.

use serde::{Deserialize, Serialize};

/// CSS selectors for the listing and post pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSelectors {
    /// Selector for each post container on the listing page
    #[serde(default = "default_post")]
    pub post: String,

    /// Post body containers, tried in order on the detail page
    #[serde(default = "default_content")]
    pub content: Vec<String>,

    /// Anchors explicitly flagged as torrent files
    #[serde(default = "default_torrent_anchor")]
    pub torrent_anchor: String,
}

fn default_post() -> String {
    "div.ipsType_break.ipsContained".to_string()
}

fn default_content() -> Vec<String> {
    vec![
        "div.cPost_contentWrap".to_string(),
        "div.ipsType_richText".to_string(),
    ]
}

fn default_torrent_anchor() -> String {
    "a[data-fileext=\"torrent\"]".to_string()
}

impl Default for SiteSelectors {
    fn default() -> Self {
        Self {
            post: default_post(),
            content: default_content(),
            torrent_anchor: default_torrent_anchor(),
        }
    }
}

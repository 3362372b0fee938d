// src/services/listing.rs

//! Listing page parser.
//!
//! Turns the forum home page into a bounded list of posts.

use scraper::{Html, Selector};
use url::Url;

use crate::error::Result;
use crate::models::Post;
use crate::services::parse_selector;
use crate::utils::{PageFetcher, resolve_url};

/// Reads post titles and links from the listing page.
pub struct ListingFetcher {
    post_sel: Selector,
    anchor_sel: Selector,
    max_posts: usize,
}

impl ListingFetcher {
    /// Create a listing fetcher for the given post container selector.
    pub fn new(post_selector: &str, max_posts: usize) -> Result<Self> {
        Ok(Self {
            post_sel: parse_selector(post_selector)?,
            anchor_sel: parse_selector("a")?,
            max_posts,
        })
    }

    /// Fetch the listing page and parse its posts.
    pub async fn fetch_posts(&self, fetcher: &dyn PageFetcher, base_url: &Url) -> Result<Vec<Post>> {
        let html = fetcher.fetch(base_url.as_str()).await?;
        let posts = self.parse_posts(&html, base_url);
        if posts.is_empty() {
            log::warn!("No posts found on {}", base_url);
        }
        Ok(posts)
    }

    /// Parse posts out of listing HTML.
    pub fn parse_posts(&self, html: &str, base_url: &Url) -> Vec<Post> {
        let document = Html::parse_document(html);

        document
            .select(&self.post_sel)
            .take(self.max_posts)
            .filter_map(|container| {
                let anchor = container.select(&self.anchor_sel).next()?;
                let title = anchor.text().collect::<String>().trim().to_string();
                let href = anchor.value().attr("href")?.trim();
                if title.is_empty() || href.is_empty() {
                    log::debug!("Skipping post container without title or link");
                    return None;
                }
                Some(Post {
                    title,
                    url: resolve_url(base_url, href),
                })
            })
            .collect()
    }
}

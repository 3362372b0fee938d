// src/services/details.rs

//! Post detail extractor.
//!
//! Finds the post body on a topic page and pulls torrent/magnet links out of
//! it using the ordered strategy chain.

use scraper::{Html, Selector};

use crate::error::Result;
use crate::models::{Config, TorrentLink};
use crate::services::parse_selector;
use crate::services::strategies::{LinkNormalizer, LinkStrategy, default_strategies};
use crate::utils::PageFetcher;

/// Extracts links from a single post page.
pub struct DetailExtractor {
    content_sels: Vec<Selector>,
    strategies: Vec<Box<dyn LinkStrategy>>,
    normalizer: LinkNormalizer,
    max_links: usize,
}

impl DetailExtractor {
    /// Build the extractor with the default strategy chain.
    pub fn from_config(config: &Config) -> Result<Self> {
        let strategies = default_strategies(&config.site.selectors, &config.limits)?;
        Self::new(config, strategies)
    }

    /// Build the extractor with a custom strategy chain.
    pub fn new(config: &Config, strategies: Vec<Box<dyn LinkStrategy>>) -> Result<Self> {
        let content_sels = config
            .site
            .selectors
            .content
            .iter()
            .map(|s| parse_selector(s))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            content_sels,
            strategies,
            normalizer: LinkNormalizer::new(config.base_url()?, config.limits.label_max_len),
            max_links: config.limits.max_links,
        })
    }

    /// Fetch a post page and extract its links.
    pub async fn extract(&self, fetcher: &dyn PageFetcher, url: &str) -> Result<Vec<TorrentLink>> {
        let html = fetcher.fetch(url).await?;
        Ok(self.extract_from_html(&html))
    }

    /// Extract links from post HTML.
    pub fn extract_from_html(&self, html: &str) -> Vec<TorrentLink> {
        let document = Html::parse_document(html);

        let Some(content) = self
            .content_sels
            .iter()
            .find_map(|sel| document.select(sel).next())
        else {
            log::debug!("No post content container found");
            return Vec::new();
        };

        for strategy in &self.strategies {
            let mut links = strategy.extract(content, &self.normalizer);
            if !links.is_empty() {
                log::debug!("Strategy '{}' found {} links", strategy.name(), links.len());
                links.truncate(self.max_links);
                return links;
            }
        }

        Vec::new()
    }
}

// src/services/catalog.rs

//! Cached movie catalog.
//!
//! Owns the last successful scrape and decides when to refetch. A refresh
//! replaces the whole snapshot; a failed refresh keeps serving the old one.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Config, MovieEntry, TorrentLink};
use crate::services::{DetailExtractor, ListingFetcher};
use crate::utils::{Clock, PageFetcher};

/// Snapshot of catalog state for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStats {
    pub cached_movies: usize,
    pub last_refresh: Option<DateTime<Utc>>,
    pub age: Option<Duration>,
}

/// Title-keyed movie cache with a fixed freshness window.
pub struct Catalog<F, C> {
    fetcher: F,
    clock: C,
    base_url: Url,
    ttl: Duration,
    listing: ListingFetcher,
    extractor: DetailExtractor,
    entries: Vec<MovieEntry>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl<F: PageFetcher, C: Clock> Catalog<F, C> {
    /// Create an empty catalog.
    pub fn new(config: &Config, fetcher: F, clock: C) -> Result<Self> {
        let ttl = i64::try_from(config.cache.ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| AppError::config("cache.ttl_secs is out of range"))?;

        Ok(Self {
            fetcher,
            clock,
            base_url: config.base_url()?,
            ttl,
            listing: ListingFetcher::new(&config.site.selectors.post, config.limits.max_posts)?,
            extractor: DetailExtractor::from_config(config)?,
            entries: Vec::new(),
            refreshed_at: None,
        })
    }

    /// Whether the snapshot is still inside the cache window.
    pub fn is_fresh(&self) -> bool {
        self.refreshed_at
            .is_some_and(|at| self.clock.now() - at < self.ttl)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Current time according to the catalog's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Current snapshot without touching the network.
    pub fn entries(&self) -> &[MovieEntry] {
        &self.entries
    }

    /// Movies, refetched first if the cache window has passed.
    pub async fn movies(&mut self) -> Vec<MovieEntry> {
        if self.is_fresh() {
            log::debug!("Serving {} movies from cache", self.entries.len());
            return self.entries.clone();
        }
        self.refresh().await
    }

    /// Movies posted on `date`.
    ///
    /// Posts carry no reliable date on the listing page, so this is the
    /// full catalog for any date.
    pub async fn movies_for_date(&mut self, date: NaiveDate) -> Vec<MovieEntry> {
        log::debug!("Listing movies for {}", date);
        self.movies().await
    }

    /// Movies whose title contains `query`, ignoring case.
    pub async fn search(&mut self, query: &str) -> Vec<MovieEntry> {
        let needle = query.trim().to_lowercase();
        self.movies()
            .await
            .into_iter()
            .filter(|movie| movie.title.to_lowercase().contains(&needle))
            .collect()
    }

    /// Look up a cached movie by its stable id.
    pub fn find(&self, id: &str) -> Option<&MovieEntry> {
        self.entries.iter().find(|movie| movie.id == id)
    }

    /// Extract links from an arbitrary post URL.
    pub async fn extract_links(&self, url: &str) -> Result<Vec<TorrentLink>> {
        self.extractor.extract(&self.fetcher, url).await
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            cached_movies: self.entries.len(),
            last_refresh: self.refreshed_at,
            age: self.refreshed_at.map(|at| self.clock.now() - at),
        }
    }

    /// Refetch now. On failure the previous snapshot is returned unchanged.
    pub async fn refresh(&mut self) -> Vec<MovieEntry> {
        match self.try_refresh().await {
            Ok(movies) => movies,
            Err(e) => {
                log::error!("Error fetching movies: {}", e);
                self.entries.clone()
            }
        }
    }

    /// Refetch now, reporting listing failures.
    ///
    /// An empty listing yields no movies but is not cached, so the next
    /// request tries again.
    pub async fn try_refresh(&mut self) -> Result<Vec<MovieEntry>> {
        let posts = self.listing.fetch_posts(&self.fetcher, &self.base_url).await?;
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let mut entries: Vec<MovieEntry> = Vec::with_capacity(posts.len());
        for post in posts {
            let links = match self.extractor.extract(&self.fetcher, &post.url).await {
                Ok(links) => links,
                Err(e) => {
                    log::warn!("Error getting movie details from {}: {}", post.url, e);
                    continue;
                }
            };
            if links.is_empty() {
                log::debug!("No links in '{}', skipping", post.title);
                continue;
            }

            match entries.iter_mut().find(|entry| entry.title == post.title) {
                Some(existing) => existing.links = links,
                None => entries.push(MovieEntry::new(post.title, links)),
            }
        }

        self.entries = entries;
        self.refreshed_at = Some(self.clock.now());
        log::info!("Cached {} movies", self.entries.len());

        Ok(self.entries.clone())
    }
}

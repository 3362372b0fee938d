//! Service layer for the bot.
//!
//! This module contains the scraping logic:
//! - Listing page parsing (`ListingFetcher`)
//! - Post link extraction (`DetailExtractor`, `LinkStrategy`)
//! - The cached movie catalog (`Catalog`)

mod catalog;
mod details;
mod listing;
pub mod strategies;

pub use catalog::{Catalog, CatalogStats};
pub use details::DetailExtractor;
pub use listing::ListingFetcher;
pub use strategies::{LinkNormalizer, LinkStrategy};

use scraper::Selector;

use crate::error::{AppError, Result};

/// Parse a CSS selector, mapping failures to `AppError::Selector`.
pub(crate) fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

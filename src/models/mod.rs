// src/models/mod.rs

//! Domain models for the bot.
//!
//! This module contains the data structures shared by the scraping
//! services and the chat layer.

mod config;
mod movie;
mod selectors;

// Re-export all public types
pub use config::{
    BotConfig, CacheConfig, Config, ENV_ADMIN_ID, ENV_BASE_URL, HttpConfig, LimitsConfig,
    SiteConfig,
};
pub use movie::{LinkKind, MovieEntry, Post, TorrentLink};
pub use selectors::SiteSelectors;

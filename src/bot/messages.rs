// src/bot/messages.rs

//! User-facing message texts.

use chrono::Duration;

use crate::bot::{Button, Callback, Reply};
use crate::models::MovieEntry;
use crate::services::CatalogStats;
use crate::utils::{escape_html, take_chars};

pub const ACCESS_DENIED: &str = "🚫 Access Denied";
pub const ACCESS_DENIED_CALLBACK: &str = "Access Denied";
pub const ACCESS_DENIED_START: &str =
    "🚫 <b>Access Denied</b>\n\nThis bot is restricted to admin use only.";

pub const FETCHING_TODAY: &str = "🔄 <b>Fetching today's posts...</b>";
pub const FETCHING_YESTERDAY: &str = "🔄 <b>Fetching yesterday's posts...</b>";
pub const TODAY_TITLE: &str = "📅 Today's Posts";
pub const YESTERDAY_TITLE: &str = "📆 Yesterday's Posts";

pub const DATE_PROMPT: &str =
    "📅 <b>Enter date in format:</b>\n\n<code>YYYY-MM-DD</code>\n\nExample: <code>2024-01-15</code>";
pub const INVALID_DATE: &str = "❌ Invalid date format! Use YYYY-MM-DD";
pub const FUTURE_DATE: &str = "⚠️ Cannot fetch future dates!";

pub const SEARCH_PROMPT: &str = "🔍 <b>Enter movie name to search:</b>";

pub const INVALID_URL: &str = "❌ Invalid URL format!";
pub const NO_LINKS_IN_URL: &str = "❌ No torrent links found in the provided URL";
pub const URL_ERROR: &str = "❌ Error processing URL. Please try again.";

pub const NOTICE_TODAY: &str = "Fetching today's posts...";
pub const NOTICE_YESTERDAY: &str = "Fetching yesterday's posts...";
pub const NOTICE_SEARCH: &str = "Search mode activated";
pub const NOTICE_STATS: &str = "Getting statistics...";
pub const NOTICE_STALE_MOVIE: &str = "This movie is no longer cached, list again";

/// Home screen with the command list and quick-action menu.
pub fn help(source: &str) -> Reply {
    let source = escape_html(source);
    let text = format!(
        "<b>🎬 {source} Bot - Admin Panel</b>

<blockquote><b>Get latest movies from {source}</b></blockquote>

<b>📋 Available Commands:</b>

🔹 <b>/today</b> - Get today's latest posts
🔹 <b>/yesterday</b> - Get yesterday's posts
🔹 <b>/date</b> - Get posts from specific date
🔹 <b>/getlink</b> - Extract torrent links from URL
🔹 <b>/search</b> - Search for specific movie
🔹 <b>/stats</b> - View bot statistics

<blockquote><b>⚡ Admin Access Only</b></blockquote>"
    );

    Reply::text(text).with_buttons(vec![
        vec![
            Button::new("📅 Today", &Callback::Today),
            Button::new("📆 Yesterday", &Callback::Yesterday),
        ],
        vec![
            Button::new("🔍 Search", &Callback::Search),
            Button::new("📊 Stats", &Callback::Stats),
        ],
    ])
}

/// Selection menu for a set of movies.
pub fn movie_list(movies: &[MovieEntry], title: &str, title_len: usize) -> Reply {
    if movies.is_empty() {
        return Reply::text(format!("❌ No movies found for {title}"));
    }

    let text = format!(
        "<b>{title}</b>\n\n🔘 <b>Select a movie:</b> ({} found)\n",
        movies.len()
    );
    let buttons = movies
        .iter()
        .map(|movie| {
            vec![Button::new(
                format!("🎬 {}...", take_chars(&movie.title, title_len)),
                &Callback::Movie(movie.id.clone()),
            )]
        })
        .collect();

    Reply::text(text).with_buttons(buttons)
}

/// Rendered links of one movie, one message each.
pub fn movie_links(movie: &MovieEntry) -> Vec<Reply> {
    movie
        .links
        .iter()
        .map(|link| Reply::text(link.render()).without_preview())
        .collect()
}

pub fn fetching_date(date: &str) -> String {
    format!("🔄 <b>Fetching posts for {date}...</b>")
}

pub fn date_title(date: &str) -> String {
    format!("📅 Posts for {date}")
}

pub fn searching(query: &str) -> String {
    format!("🔍 <b>Searching for:</b> {}", escape_html(query))
}

pub fn search_title(query: &str) -> String {
    format!("🔍 Search Results for '{}'", escape_html(query))
}

pub fn no_search_results(query: &str) -> String {
    format!("❌ No movies found for '<b>{}</b>'", escape_html(query))
}

pub fn url_prompt(base_url: &str) -> String {
    format!(
        "🔗 <b>Send the post URL to extract torrent links</b>\n\nExample: {}index.php?/topic/12345",
        escape_html(base_url)
    )
}

pub fn found_links(count: usize) -> String {
    format!("✅ <b>Found {count} torrent links:</b>\n")
}

pub fn getting_links(title: &str) -> String {
    format!("Getting links for {title}")
}

/// Human form of the cache age.
pub fn cache_age(age: Option<Duration>) -> String {
    match age {
        Some(age) => format!("{} minutes ago", age.num_minutes()),
        None => "No cache".to_string(),
    }
}

/// Cache window in whole minutes, or seconds when shorter than a minute.
pub fn refresh_interval(ttl_secs: u64) -> String {
    if ttl_secs < 60 {
        format!("{ttl_secs} seconds")
    } else {
        format!("{} minutes", ttl_secs / 60)
    }
}

pub fn stats(stats: &CatalogStats, source: &str, admin_id: i64, ttl_secs: u64) -> String {
    format!(
        "📊 <b>Bot Statistics</b>

🎬 <b>Cached Movies:</b> {}
🕐 <b>Last Update:</b> {}
🌐 <b>Source:</b> {}
👤 <b>Admin ID:</b> {admin_id}

<blockquote><b>Cache refreshes every {}</b></blockquote>",
        stats.cached_movies,
        cache_age(stats.age),
        escape_html(source),
        refresh_interval(ttl_secs),
    )
}

//! Movie post, link and catalog entry data structures.

use crate::utils::{entry_id, escape_html};

/// A post row from the forum listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Trimmed anchor text
    pub title: String,

    /// Absolute URL of the post
    pub url: String,
}

/// Which extraction path produced a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Torrent file or magnet URI
    Torrent,
    /// Generic anchor picked up by the last fallback
    Download,
}

/// A cleaned link extracted from a post body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentLink {
    pub kind: LinkKind,

    /// Whitespace-collapsed, length-bounded label
    pub label: String,

    /// Absolute URL or magnet URI
    pub url: String,
}

impl TorrentLink {
    /// Two-line HTML block sent to the chat.
    pub fn render(&self) -> String {
        let label = escape_html(&self.label);
        let url = escape_html(&self.url);
        match self.kind {
            LinkKind::Torrent => format!("📁 <b>{label}</b>\n\n🔗 <code>{url}</code>"),
            LinkKind::Download => format!("🔗 <b>{label}</b>\n\n<code>{url}</code>"),
        }
    }
}

/// A cached movie: a post title and its extracted links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieEntry {
    /// Stable identifier derived from the title
    pub id: String,
    pub title: String,
    pub links: Vec<TorrentLink>,
}

impl MovieEntry {
    pub fn new(title: impl Into<String>, links: Vec<TorrentLink>) -> Self {
        let title = title.into();
        Self {
            id: entry_id(&title),
            title,
            links,
        }
    }
}

//! Link extraction strategies.
//!
//! Each strategy looks at a post body and returns the links it recognizes.
//! `DetailExtractor` runs them in order and keeps the first non-empty result.

use scraper::{ElementRef, Selector};
use url::Url;

use crate::error::Result;
use crate::models::{LimitsConfig, LinkKind, SiteSelectors, TorrentLink};
use crate::services::parse_selector;
use crate::utils::{collapse_whitespace, is_magnet, normalize_link, truncate_label};

const DEFAULT_TORRENT_LABEL: &str = "Download Torrent";

/// Turns raw anchor text and `href` into a `TorrentLink`.
#[derive(Debug, Clone)]
pub struct LinkNormalizer {
    base_url: Url,
    label_max_len: usize,
}

impl LinkNormalizer {
    pub fn new(base_url: Url, label_max_len: usize) -> Self {
        Self {
            base_url,
            label_max_len,
        }
    }

    /// Build a link; `None` when the anchor has no target.
    pub fn link(&self, kind: LinkKind, raw_label: &str, href: &str) -> Option<TorrentLink> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }

        let mut label = collapse_whitespace(raw_label);
        if label.is_empty() && kind == LinkKind::Torrent {
            label = DEFAULT_TORRENT_LABEL.to_string();
        }

        Some(TorrentLink {
            kind,
            label: truncate_label(&label, self.label_max_len),
            url: normalize_link(&self.base_url, href),
        })
    }
}

/// One rule for finding links inside a post body.
pub trait LinkStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn extract(&self, content: ElementRef<'_>, normalizer: &LinkNormalizer) -> Vec<TorrentLink>;
}

fn anchor_text(anchor: &ElementRef<'_>) -> String {
    anchor.text().collect()
}

/// Anchors flagged as torrent attachments (`data-fileext="torrent"`).
///
/// Flagged anchors without a target are dropped; when none are left the
/// chain continues with the next strategy.
pub struct FileExtStrategy {
    anchors: Selector,
}

impl FileExtStrategy {
    pub fn new(selector: &str) -> Result<Self> {
        Ok(Self {
            anchors: parse_selector(selector)?,
        })
    }
}

impl LinkStrategy for FileExtStrategy {
    fn name(&self) -> &'static str {
        "file-ext"
    }

    fn extract(&self, content: ElementRef<'_>, normalizer: &LinkNormalizer) -> Vec<TorrentLink> {
        content
            .select(&self.anchors)
            .filter_map(|a| {
                let href = a.value().attr("href").unwrap_or("");
                normalizer.link(LinkKind::Torrent, &anchor_text(&a), href)
            })
            .collect()
    }
}

/// Anchors whose target mentions "torrent" or is a magnet URI.
pub struct TorrentHrefStrategy {
    anchors: Selector,
}

impl TorrentHrefStrategy {
    pub fn new() -> Result<Self> {
        Ok(Self {
            anchors: parse_selector("a[href]")?,
        })
    }

    fn matches(href: &str) -> bool {
        let href = href.trim();
        href.to_lowercase().contains("torrent") || is_magnet(href)
    }
}

impl LinkStrategy for TorrentHrefStrategy {
    fn name(&self) -> &'static str {
        "torrent-href"
    }

    fn extract(&self, content: ElementRef<'_>, normalizer: &LinkNormalizer) -> Vec<TorrentLink> {
        content
            .select(&self.anchors)
            .filter_map(|a| {
                let href = a.value().attr("href")?;
                if !Self::matches(href) {
                    return None;
                }
                normalizer.link(LinkKind::Torrent, &anchor_text(&a), href)
            })
            .collect()
    }
}

/// Last resort: the first few anchors, if their text looks descriptive.
pub struct GenericAnchorStrategy {
    anchors: Selector,
    max_anchors: usize,
    min_label_len: usize,
}

impl GenericAnchorStrategy {
    pub fn new(max_anchors: usize, min_label_len: usize) -> Result<Self> {
        Ok(Self {
            anchors: parse_selector("a[href]")?,
            max_anchors,
            min_label_len,
        })
    }
}

impl LinkStrategy for GenericAnchorStrategy {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn extract(&self, content: ElementRef<'_>, normalizer: &LinkNormalizer) -> Vec<TorrentLink> {
        content
            .select(&self.anchors)
            .take(self.max_anchors)
            .filter_map(|a| {
                let label = collapse_whitespace(&anchor_text(&a));
                if label.chars().count() <= self.min_label_len {
                    return None;
                }
                let href = a.value().attr("href").unwrap_or("");
                normalizer.link(LinkKind::Download, &label, href)
            })
            .collect()
    }
}

/// The fallback chain in the order it is tried.
pub fn default_strategies(
    selectors: &SiteSelectors,
    limits: &LimitsConfig,
) -> Result<Vec<Box<dyn LinkStrategy>>> {
    Ok(vec![
        Box::new(FileExtStrategy::new(&selectors.torrent_anchor)?),
        Box::new(TorrentHrefStrategy::new()?),
        Box::new(GenericAnchorStrategy::new(
            limits.max_fallback_anchors,
            limits.min_fallback_label_len,
        )?),
    ])
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;

    fn normalizer() -> LinkNormalizer {
        LinkNormalizer::new(Url::parse("https://forum.example").unwrap(), 100)
    }

    fn run(strategy: &dyn LinkStrategy, body: &str) -> Vec<TorrentLink> {
        let html = format!("<div class=\"body\">{body}</div>");
        let document = Html::parse_fragment(&html);
        let sel = Selector::parse("div.body").unwrap();
        let content = document.select(&sel).next().unwrap();
        strategy.extract(content, &normalizer())
    }

    #[test]
    fn test_file_ext_strategy() {
        let strategy = FileExtStrategy::new(&SiteSelectors::default().torrent_anchor).unwrap();
        let links = run(
            &strategy,
            r#"<a data-fileext="torrent" href="/attach.php?id=1">Leo   1080p
                 .torrent</a>
               <a data-fileext="torrent" href="">empty</a>
               <a data-fileext="torrent" href="/attach.php?id=2"></a>
               <a href="/other">other</a>"#,
        );
        assert_eq!(
            links,
            vec![
                TorrentLink {
                    kind: LinkKind::Torrent,
                    label: "Leo 1080p .torrent".to_string(),
                    url: "https://forum.example/attach.php?id=1".to_string(),
                },
                TorrentLink {
                    kind: LinkKind::Torrent,
                    label: "Download Torrent".to_string(),
                    url: "https://forum.example/attach.php?id=2".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_torrent_href_strategy() {
        let strategy = TorrentHrefStrategy::new().unwrap();
        let links = run(
            &strategy,
            r#"<a href="https://cdn.example/Leo.TORRENT">Leo</a>
               <a href="magnet:?xt=urn:btih:abc">Magnet</a>
               <a href="https://example.com/?u=magnet:x">Not a magnet</a>
               <a href="/topic/2">Thread</a>"#,
        );
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].url, "https://cdn.example/Leo.TORRENT");
        assert_eq!(links[1].url, "magnet:?xt=urn:btih:abc");
        assert!(links.iter().all(|l| l.kind == LinkKind::Torrent));
    }

    #[test]
    fn test_generic_strategy_looks_at_first_three_anchors() {
        let strategy = GenericAnchorStrategy::new(3, 5).unwrap();
        let links = run(
            &strategy,
            r#"<a href="/a">Short</a>
               <a href="/b">Long enough label</a>
               <a href="c">Another long label</a>
               <a href="/d">Fourth long label</a>"#,
        );
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].label, "Long enough label");
        assert_eq!(links[1].url, "https://forum.example/c");
        assert!(links.iter().all(|l| l.kind == LinkKind::Download));
    }

    #[test]
    fn test_generic_strategy_nothing_descriptive() {
        let strategy = GenericAnchorStrategy::new(3, 5).unwrap();
        assert!(run(&strategy, r#"<a href="/a">12345</a><a href="/b"></a>"#).is_empty());
    }

    #[test]
    fn test_label_truncated() {
        let label = "L".repeat(150);
        let link = normalizer()
            .link(LinkKind::Torrent, &label, "/x.torrent")
            .unwrap();
        assert_eq!(link.label, format!("{}...", "L".repeat(97)));
    }
}

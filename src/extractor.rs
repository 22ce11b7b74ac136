use scraper::Selector;
use tracing::*;

use crate::document::Document;
use crate::http_util::s;

/// A single lookup rule: read `attr` from the first element matching `selector`.
pub struct Strategy {
    name: &'static str,
    selector: Selector,
    attr: &'static str,
}

impl Strategy {
    pub fn new(name: &'static str, selector: Selector, attr: &'static str) -> Self {
        Strategy {
            name,
            selector,
            attr,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Empty attribute values count as a miss.
    pub fn apply(&self, doc: &Document) -> Option<String> {
        doc.first_attr(&self.selector, self.attr)
            .filter(|value| !value.is_empty())
            .map(ToOwned::to_owned)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub video_url: String,
    pub strategy: &'static str,
}

/// Strategies tried in order; the first one yielding a url wins.
pub struct StrategyChain {
    strategies: Vec<Strategy>,
}

impl StrategyChain {
    pub fn new(strategies: Vec<Strategy>) -> Self {
        StrategyChain { strategies }
    }

    pub fn extract(&self, doc: &Document) -> Option<Extraction> {
        self.strategies.iter().find_map(|strategy| {
            let video_url = strategy.apply(doc);
            trace!("Strategy '{}' found: {video_url:?}", strategy.name());
            video_url.map(|video_url| Extraction {
                video_url,
                strategy: strategy.name(),
            })
        })
    }

    pub fn extract_from_html(&self, html: &str) -> Option<Extraction> {
        self.extract(&Document::parse(html))
    }
}

impl Default for StrategyChain {
    fn default() -> Self {
        StrategyChain::new(vec![
            Strategy::new(
                "video-source-mp4",
                s(r#"video source[type="video/mp4"]"#),
                "src",
            ),
            Strategy::new("video-src", s("video"), "src"),
            Strategy::new("og-video", s(r#"meta[property="og:video"]"#), "content"),
        ])
    }
}

use scraper::{Html, Selector};
use tracing::*;

/// Parsed html page, queried with css selectors.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        let html = Html::parse_document(html);
        if !html.errors.is_empty() {
            trace!("Parsed page with {} html errors", html.errors.len());
        }
        Document { html }
    }

    /// Value of `attr` on the first element matching `selector`.
    pub fn first_attr(&self, selector: &Selector, attr: &str) -> Option<&str> {
        self.html
            .select(selector)
            .next()
            .and_then(|e| e.value().attr(attr))
    }
}

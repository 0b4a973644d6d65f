//! Signal collector over an HTML snapshot
//!
//! Pure with respect to the snapshot: no network access, no mutation.
//! Sample lists are capped to bound prompt size, and degenerate
//! documents (no forms, no headings, nothing at all) yield zero counts
//! and empty lists rather than an error.

use scraper::{Html, Selector};
use sitewarden_core::{Error, PageSignals, Result};
use tracing::debug;
use url::Url;

/// Maximum headings sampled per page
pub const MAX_HEADINGS: usize = 10;

/// Maximum paragraphs sampled per page
pub const MAX_PARAGRAPHS: usize = 5;

/// Maximum form labels sampled per page
pub const MAX_FORM_LABELS: usize = 10;

/// Collects a fixed-shape [`PageSignals`] snapshot from HTML
pub struct SignalCollector {
    title: Selector,
    forms: Selector,
    inputs: Selector,
    links: Selector,
    headings: Selector,
    paragraphs: Selector,
    labels: Selector,
}

impl SignalCollector {
    /// Create a collector with its selectors compiled up front
    pub fn new() -> Result<Self> {
        Ok(Self {
            title: parse_selector("title")?,
            forms: parse_selector("form")?,
            inputs: parse_selector("input")?,
            links: parse_selector("a")?,
            headings: parse_selector("h1,h2,h3")?,
            paragraphs: parse_selector("p")?,
            labels: parse_selector("label")?,
        })
    }

    /// Extract a snapshot of the page's observable structure.
    ///
    /// `page_url` is recorded verbatim; its host becomes `domain`
    /// (empty when the URL does not parse).
    pub fn collect(&self, html: &str, page_url: &str) -> PageSignals {
        let document = Html::parse_document(html);

        let title = self
            .sample_text(&document, &self.title, 1)
            .into_iter()
            .next()
            .unwrap_or_default();

        let domain = Url::parse(page_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default();

        let signals = PageSignals {
            title,
            url: page_url.to_string(),
            domain,
            form_count: document.select(&self.forms).count(),
            input_count: document.select(&self.inputs).count(),
            link_count: document.select(&self.links).count(),
            headings: self.sample_text(&document, &self.headings, MAX_HEADINGS),
            first_paragraphs: self.sample_text(&document, &self.paragraphs, MAX_PARAGRAPHS),
            form_labels: self.sample_text(&document, &self.labels, MAX_FORM_LABELS),
        };

        debug!(
            domain = %signals.domain,
            forms = signals.form_count,
            inputs = signals.input_count,
            links = signals.link_count,
            "collected page signals"
        );

        signals
    }

    /// Text of the first `cap` matching elements, trimmed, empties
    /// dropped. The cap applies to the elements scanned, so fewer than
    /// `cap` strings may survive the filter.
    fn sample_text(&self, document: &Html, selector: &Selector, cap: usize) -> Vec<String> {
        document
            .select(selector)
            .take(cap)
            .map(|element| {
                element
                    .text()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .filter(|text| !text.is_empty())
            .collect()
    }
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| Error::collector(format!("failed to compile selector '{}': {}", css, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collector() -> SignalCollector {
        SignalCollector::new().unwrap()
    }

    #[test]
    fn test_counts_and_samples() {
        let html = r#"
            <html><head><title> Example Bank </title></head>
            <body>
                <h1>Welcome</h1>
                <h2>Sign in</h2>
                <p>Enter your credentials below.</p>
                <form>
                    <label>Username</label><input name="u">
                    <label>Password</label><input name="p" type="password">
                </form>
                <a href="/help">Help</a>
                <a href="/about">About</a>
            </body></html>
        "#;

        let signals = collector().collect(html, "https://www.example-bank.com/login");

        assert_eq!(signals.title, "Example Bank");
        assert_eq!(signals.domain, "www.example-bank.com");
        assert_eq!(signals.form_count, 1);
        assert_eq!(signals.input_count, 2);
        assert_eq!(signals.link_count, 2);
        assert_eq!(signals.headings, vec!["Welcome", "Sign in"]);
        assert_eq!(signals.first_paragraphs, vec!["Enter your credentials below."]);
        assert_eq!(signals.form_labels, vec!["Username", "Password"]);
    }

    #[test]
    fn test_empty_document_yields_zeroes() {
        let signals = collector().collect("", "https://example.com");

        assert_eq!(signals.title, "");
        assert_eq!(signals.form_count, 0);
        assert_eq!(signals.input_count, 0);
        assert_eq!(signals.link_count, 0);
        assert!(signals.headings.is_empty());
        assert!(signals.first_paragraphs.is_empty());
        assert!(signals.form_labels.is_empty());
    }

    #[test]
    fn test_heading_cap() {
        let mut html = String::from("<html><body>");
        for i in 0..15 {
            html.push_str(&format!("<h2>Heading {}</h2>", i));
        }
        html.push_str("</body></html>");

        let signals = collector().collect(&html, "https://example.com");
        assert_eq!(signals.headings.len(), MAX_HEADINGS);
        assert_eq!(signals.headings[0], "Heading 0");
    }

    #[test]
    fn test_blank_elements_dropped_after_cap() {
        // Five paragraphs scanned, two blank: only three survive
        let html = "<p>one</p><p>  </p><p>two</p><p></p><p>three</p><p>never scanned</p>";
        let signals = collector().collect(html, "https://example.com");
        assert_eq!(signals.first_paragraphs, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_unparseable_url_leaves_domain_empty() {
        let signals = collector().collect("<p>hi</p>", "not a url");
        assert_eq!(signals.domain, "");
        assert_eq!(signals.url, "not a url");
    }

    #[test]
    fn test_nested_text_is_flattened() {
        let html = "<h1>Verify <strong>your</strong>\n account</h1>";
        let signals = collector().collect(html, "https://example.com");
        assert_eq!(signals.headings, vec!["Verify your account"]);
    }
}

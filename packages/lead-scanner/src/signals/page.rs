//! Parsed-document view the detectors run against.
//!
//! `scraper::Html` is not `Send`, so a document is parsed once into this
//! owned summary and dropped before the scanner awaits anything else.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use url::Url;

static BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());
static META_NAMED: LazyLock<Selector> = LazyLock::new(|| Selector::parse("meta[name]").unwrap());
static FORM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("form").unwrap());
static STAR_RATING: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".stars, .star, .rating").unwrap());

/// Elements whose text a visitor never sees.
const HIDDEN_TEXT_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// One `<a>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Raw href, trimmed; empty when the attribute is absent
    pub href: String,
    pub href_lower: String,
    /// Visible anchor text, lower-cased
    pub text_lower: String,
}

impl Anchor {
    /// `mailto:` and `tel:` targets.
    pub fn is_mail_or_phone(&self) -> bool {
        self.href_lower.starts_with("mailto:") || self.href_lower.starts_with("tel:")
    }
}

/// Everything the detectors need from one HTML document.
#[derive(Debug, Clone)]
pub struct PageView {
    /// Document URL (after redirects)
    pub base_url: Url,
    /// Visible body text
    pub text: String,
    pub text_lower: String,
    pub anchors: Vec<Anchor>,
    pub has_viewport_meta: bool,
    pub form_count: usize,
    pub has_star_rating: bool,
}

impl PageView {
    pub fn parse(html: &str, base_url: &Url) -> Self {
        let document = Html::parse_document(html);

        let text = visible_text(&document);
        let text_lower = text.to_lowercase();

        let anchors = document
            .select(&ANCHOR)
            .map(|el| {
                let href = el.value().attr("href").unwrap_or("").trim().to_string();
                Anchor {
                    href_lower: href.to_lowercase(),
                    href,
                    text_lower: element_text(&el).to_lowercase(),
                }
            })
            .collect();

        let has_viewport_meta = document.select(&META_NAMED).any(|el| {
            el.value()
                .attr("name")
                .is_some_and(|name| name.trim().eq_ignore_ascii_case("viewport"))
        });

        Self {
            base_url: base_url.clone(),
            text,
            text_lower,
            anchors,
            has_viewport_meta,
            form_count: document.select(&FORM).count(),
            has_star_rating: document.select(&STAR_RATING).next().is_some(),
        }
    }
}

/// Count `<form>` elements without building a full view.
pub fn count_forms(html: &str) -> usize {
    Html::parse_document(html).select(&FORM).count()
}

/// Text nodes under `<body>`, skipping script-like containers.
fn visible_text(document: &Html) -> String {
    let Some(body) = document.select(&BODY).next() else {
        return String::new();
    };

    let mut parts: Vec<&str> = Vec::new();
    for node in body.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_TEXT_TAGS.contains(&el.name()))
        });
        if hidden {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }
    parts.join(" ")
}

fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

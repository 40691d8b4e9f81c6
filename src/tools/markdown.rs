//! HTML → Markdown conversion
//!
//! Conversion runs in three steps:
//!
//! 1. Pick the content area: the first of [`CONTENT_SELECTORS`] that matches
//!    anything, else `<body>`.
//! 2. Render that subtree recursively, decorating a small, flat set of tags
//!    (headings, paragraphs, emphasis, lists, links, line breaks). Unknown tags
//!    pass their children through.
//! 3. Collapse runs of 3+ newlines to a blank line and trim.
//!
//! Boilerplate elements ([`BOILERPLATE_TAGS`]) are treated as absent
//! everywhere: they are never selected as the content area, nothing inside
//! them is selected, and they render as nothing. The parsed document is only
//! ever read.

use crate::types::{AppError, Result};
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, HtmlTreeSink, Node, Selector};
use tracing::debug;

/// Tags removed, descendants included, before anything else happens.
pub const BOILERPLATE_TAGS: &[&str] = &[
    "script", "style", "header", "footer", "nav", "aside", "form",
];

/// Content-area selectors in priority order.
pub const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role='main']",
    "#main-content",
    "#content",
    ".main-content",
    ".post-content",
    ".entry-content",
    ".article-body",
];

static COMPILED_SELECTORS: Lazy<Vec<(&'static str, Selector)>> = Lazy::new(|| {
    CONTENT_SELECTORS
        .iter()
        .map(|s| (*s, Selector::parse(s).expect("content selector is valid CSS")))
        .collect()
});

static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("body selector is valid CSS"));

static BLANK_LINES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("blank line regex is valid"));

/// Converts whole HTML documents into plain Markdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownConverter;

impl MarkdownConverter {
    pub fn new() -> Self {
        Self
    }

    /// Parse `html` and render its content area as Markdown.
    ///
    /// Fails with [`AppError::ContentNotFound`] only when the document has
    /// neither a matching content area nor a `<body>`.
    pub fn convert(&self, html: &str) -> Result<String> {
        let document = parse_document(html);
        self.convert_document(&document)
    }

    /// Render an already parsed document.
    pub fn convert_document(&self, document: &Html) -> Result<String> {
        let root = select_content_area(document).ok_or_else(|| {
            AppError::ContentNotFound("Could not find the main content area on the page.".to_string())
        })?;

        let rendered = render_element(root);
        Ok(normalize_whitespace(&rendered.text))
    }
}

/// Parse a full document with scripting disabled.
///
/// With scripting on, `<noscript>` content is a single raw-text node and its
/// markup would be rendered verbatim; with it off the children are elements.
pub fn parse_document(html: &str) -> Html {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };
    html5ever::parse_document(HtmlTreeSink::new(Html::new_document()), opts).one(html)
}

/// Find the content root: first matching selector wins, `<body>` is the fallback.
pub fn select_content_area(document: &Html) -> Option<ElementRef<'_>> {
    for (source, selector) in COMPILED_SELECTORS.iter() {
        if let Some(found) = document.select(selector).find(|el| !is_stripped(el)) {
            debug!(selector = source, "Selected content area");
            return Some(found);
        }
    }

    let body = document.select(&BODY_SELECTOR).next();
    if body.is_some() {
        debug!("No content selector matched, falling back to <body>");
    }
    body
}

/// Collapse 3+ consecutive newlines into exactly two, then trim.
pub fn normalize_whitespace(markdown: &str) -> String {
    BLANK_LINES_RE
        .replace_all(markdown, "\n\n")
        .trim()
        .to_string()
}

fn is_boilerplate(tag: &str) -> bool {
    BOILERPLATE_TAGS.contains(&tag)
}

/// True if the element or any of its ancestors is boilerplate.
fn is_stripped(el: &ElementRef<'_>) -> bool {
    is_boilerplate(el.value().name())
        || el.ancestors().any(|node| {
            node.value()
                .as_element()
                .is_some_and(|e| is_boilerplate(e.name()))
        })
}

/// Rendered Markdown plus whether the source had whitespace at either edge.
///
/// Text nodes render trimmed; the edge flags let concatenation keep a single
/// space between words that were separated in the HTML (`A <b>b</b> c`).
#[derive(Debug, Default, PartialEq)]
struct Fragment {
    text: String,
    leading_space: bool,
    trailing_space: bool,
}

impl Fragment {
    fn block(text: String) -> Self {
        Self {
            text,
            leading_space: false,
            trailing_space: false,
        }
    }

    fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self {
                text: String::new(),
                leading_space: !raw.is_empty(),
                trailing_space: !raw.is_empty(),
            };
        }
        Self {
            text: trimmed.to_string(),
            leading_space: raw.starts_with(char::is_whitespace),
            trailing_space: raw.ends_with(char::is_whitespace),
        }
    }

    fn wrap(self, prefix: &str, suffix: &str) -> Self {
        Self {
            text: format!("{}{}{}", prefix, self.text, suffix),
            ..self
        }
    }
}

#[derive(Default)]
struct Joiner {
    out: String,
    leading_space: bool,
    pending_space: bool,
}

impl Joiner {
    fn push(&mut self, frag: Fragment) {
        if frag.text.is_empty() {
            let spaced = frag.leading_space || frag.trailing_space;
            if self.out.is_empty() {
                self.leading_space |= spaced;
            } else {
                self.pending_space |= spaced;
            }
            return;
        }

        if self.out.is_empty() {
            self.leading_space |= frag.leading_space;
        } else if (self.pending_space || frag.leading_space)
            && !self.out.ends_with(char::is_whitespace)
            && !frag.text.starts_with(char::is_whitespace)
        {
            self.out.push(' ');
        }

        self.out.push_str(&frag.text);
        self.pending_space = frag.trailing_space;
    }

    fn finish(self) -> Fragment {
        Fragment {
            text: self.out,
            leading_space: self.leading_space,
            trailing_space: self.pending_space,
        }
    }
}

fn render_children(el: ElementRef<'_>) -> Fragment {
    let mut joiner = Joiner::default();

    for child in el.children() {
        match child.value() {
            Node::Text(text) => joiner.push(Fragment::from_text(text)),
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    joiner.push(render_element(child_el));
                }
            }
            _ => {}
        }
    }

    joiner.finish()
}

fn render_element(el: ElementRef<'_>) -> Fragment {
    let tag = el.value().name();

    if is_boilerplate(tag) {
        return Fragment::default();
    }
    if tag == "br" {
        return Fragment::block("\n".to_string());
    }

    let inner = render_children(el);

    match tag {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = usize::from(tag.as_bytes()[1] - b'0');
            Fragment::block(format!("\n\n{} {}\n\n", "#".repeat(level), inner.text))
        }
        "p" | "ul" | "ol" => Fragment::block(format!("\n\n{}\n\n", inner.text)),
        "li" => Fragment::block(format!("\n* {}", inner.text)),
        "strong" | "b" => inner.wrap("**", "**"),
        "em" | "i" => inner.wrap("*", "*"),
        "a" => {
            let href = el.value().attr("href").unwrap_or("");
            inner.wrap("[", &format!("]({})", href))
        }
        _ => inner,
    }
}

use ego_tree::NodeRef;
use ext_logging::{ext_trace, ext_warn};
use scraper::{Html, Node, Selector};

/// Content regions tried in order; the first match wins.
pub const DEFAULT_CONTENT_SELECTORS: &[&str] = &[
    "article",
    "[role=\"main\"]",
    "main",
    ".post-content",
    ".article-content",
    ".entry-content",
    ".main-content",
    "#main-content",
    "#content",
    ".content",
];

const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main",
    "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

pub trait Extractor {
    /// Returns the readable text of the page's main content region.
    fn extract(&self, html: &str) -> String;
}

/// Picks the first selector that matches, with no scoring:
/// - tries each configured selector in order
/// - otherwise returns the text of `<body>`
/// - fallback to the whole document's text.
#[derive(Debug, Clone)]
pub struct SelectorPriorityExtractor {
    selectors: Vec<Selector>,
}

impl SelectorPriorityExtractor {
    pub fn new<S: AsRef<str>>(selectors: &[S]) -> Self {
        let selectors = selectors
            .iter()
            .filter_map(|raw| {
                let raw = raw.as_ref();
                match Selector::parse(raw) {
                    Ok(selector) => Some(selector),
                    Err(err) => {
                        ext_warn!("skipping invalid content selector {raw:?}: {err:?}");
                        None
                    }
                }
            })
            .collect();
        Self { selectors }
    }
}

impl Default for SelectorPriorityExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT_SELECTORS)
    }
}

impl Extractor for SelectorPriorityExtractor {
    fn extract(&self, html: &str) -> String {
        let doc = Html::parse_document(html);

        for (index, selector) in self.selectors.iter().enumerate() {
            if let Some(node) = doc.select(selector).next() {
                ext_trace!("main content matched selector #{index}");
                return visible_text(*node);
            }
        }

        if let Some(body) = Selector::parse("body")
            .ok()
            .and_then(|sel| doc.select(&sel).next())
        {
            return visible_text(*body);
        }
        visible_text(*doc.root_element())
    }
}

/// Text as a reader sees it: block elements start new lines, runs of
/// whitespace collapse, blank lines are dropped.
pub fn visible_text(node: NodeRef<'_, Node>) -> String {
    let mut raw = String::new();
    collect_text(node, &mut raw);
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        // Source line breaks are layout-neutral; only blocks start new lines.
        Node::Text(text) => out.extend(
            text.chars()
                .map(|ch| if ch.is_whitespace() { ' ' } else { ch }),
        ),
        Node::Element(element) => {
            let name = element.name();
            if SKIPPED_ELEMENTS.contains(&name) {
                return;
            }
            let block = BLOCK_ELEMENTS.contains(&name);
            if block {
                out.push('\n');
            }
            for child in node.children() {
                collect_text(child, out);
            }
            if block {
                out.push('\n');
            }
        }
        Node::Document | Node::Fragment => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
        _ => {}
    }
}

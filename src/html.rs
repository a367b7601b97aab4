use ego_tree::NodeRef;
use scraper::{Html, Node, Selector};

/// Downstream stages only ever see the first 3000 characters of a page.
pub const MAX_TEXT_LEN: usize = 3000;

const JUNK_TAGS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "aside", "iframe", "noscript",
];

/// Cookie banners, popups and navigation chrome carry these class fragments.
const NOISE_CLASSES: &[&str] = &[
    "cookie", "banner", "popup", "modal", "navigation", "menu", "sidebar",
];

/// Site-name suffixes stripped from `<title>` text, applied in order.
const TITLE_SUFFIXES: &[&str] = &[" | Home", " - Home", " | ", " - ", " – ", "Home - "];

/// Clean prose text plus page title for one document.
#[derive(Debug, Clone, Default)]
pub struct Extracted {
    pub text: String,
    pub title: String,
}

/// Extract visible prose and a title from raw HTML. Never fails: the parser
/// is error-tolerant, so malformed markup just yields whatever text survives.
pub fn extract(html_source: &str) -> Extracted {
    let doc = Html::parse_document(html_source);
    Extracted {
        text: extract_text(&doc),
        title: extract_title(&doc),
    }
}

fn extract_text(doc: &Html) -> String {
    let mut parts: Vec<String> = Vec::new();
    collect_text(doc.tree.root(), &mut parts);

    let joined = parts.join(" ");
    let collapsed = joined.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_chars(&collapsed, MAX_TEXT_LEN)
}

/// Walk the node tree in document order, skipping junk subtrees entirely.
fn collect_text(node: NodeRef<'_, Node>, parts: &mut Vec<String>) {
    for child in node.children() {
        match child.value() {
            Node::Element(el) => {
                let name = el.name();
                if JUNK_TAGS.contains(&name) {
                    continue;
                }
                if let Some(class) = el.attr("class") {
                    let class = class.to_lowercase();
                    if NOISE_CLASSES.iter().any(|c| class.contains(c)) {
                        continue;
                    }
                }
                collect_text(child, parts);
            }
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed.to_string());
                }
            }
            _ => {}
        }
    }
}

fn extract_title(doc: &Html) -> String {
    let title_sel = Selector::parse("title").unwrap();
    if let Some(el) = doc.select(&title_sel).next() {
        let mut title = el.text().collect::<String>().trim().to_string();
        if !title.is_empty() {
            for sep in TITLE_SUFFIXES {
                if let Some(idx) = title.find(sep) {
                    title.truncate(idx);
                }
            }
            return title.trim().to_string();
        }
    }

    let h1_sel = Selector::parse("h1").unwrap();
    if let Some(el) = doc.select(&h1_sel).next() {
        return el.text().collect::<String>().trim().to_string();
    }

    String::new()
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

// ── Tests ──

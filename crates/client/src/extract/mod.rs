//! Plain-text extraction from HTML.
//!
//! Strips `<script>`, `<style>` and `<noscript>` subtrees, flattens the rest
//! to text, collapses whitespace, and truncates to a character budget so the
//! result stays within the AI provider's token limits.

use scraper::{Html, Selector};

/// Reduce an HTML document to bounded plain text.
pub fn html_to_text(html: &str, max_chars: usize) -> String {
    let mut doc = Html::parse_document(html);

    let skip = Selector::parse("script, style, noscript").expect("static selector");
    let ids: Vec<_> = doc.select(&skip).map(|el| el.id()).collect();
    for id in ids {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }

    let text = doc
        .root_element()
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");

    if text.chars().count() > max_chars {
        text.chars().take(max_chars).collect()
    } else {
        text
    }
}

// ABOUTME: Document abstraction over scraper's HTML tree for style-node surgery.
// ABOUTME: Collects non-exempt style blocks, rewrites their text, and reserializes.

//! HTML document wrapper for inline style replacement.
//!
//! A [`Document`] addresses the non-exempt `<style>` elements of a page in
//! document order. Only their text content is ever rewritten; the rest of the
//! tree serializes exactly as it round-trips through the parser.

use ego_tree::NodeId;
use once_cell::sync::Lazy;
use scraper::node::{Node, Text};
use scraper::{Html, Selector};

/// Attribute marking a style block as platform-mandated boilerplate. Blocks
/// carrying it must survive byte-for-byte and are never candidates.
pub const AMP_BOILERPLATE_ATTR: &str = "amp-boilerplate";

static STYLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("style").unwrap());

/// An HTML document with addressable inline style blocks.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse an HTML document. html5ever recovers from malformed markup, so
    /// construction itself never fails.
    pub fn parse(input: &str) -> Self {
        Self {
            html: Html::parse_document(input),
        }
    }

    /// CSS text of each non-exempt style element, in document order.
    pub fn candidate_styles(&self) -> Vec<String> {
        self.html
            .select(&STYLE_SELECTOR)
            .filter(|el| el.value().attr(AMP_BOILERPLATE_ATTR).is_none())
            .map(|el| el.text().collect::<String>())
            .collect()
    }

    /// Replace the text content of the i-th non-exempt style element with
    /// `texts[i]`. Callers pass exactly one replacement per candidate, in the
    /// order [`candidate_styles`](Self::candidate_styles) returned them.
    pub fn replace_candidate_styles(&mut self, texts: &[String]) {
        let ids = self.candidate_ids();
        debug_assert_eq!(ids.len(), texts.len());
        for (id, text) in ids.into_iter().zip(texts) {
            self.set_text(id, text);
        }
    }

    /// Serialize the whole document back to HTML text.
    pub fn serialize(&self) -> String {
        self.html.html()
    }

    fn candidate_ids(&self) -> Vec<NodeId> {
        self.html
            .select(&STYLE_SELECTOR)
            .filter(|el| el.value().attr(AMP_BOILERPLATE_ATTR).is_none())
            .map(|el| el.id())
            .collect()
    }

    /// Rewrite the first text child in place and drop any further children;
    /// an element with no text child gets one appended.
    fn set_text(&mut self, element: NodeId, text: &str) {
        let child_ids: Vec<NodeId> = match self.html.tree.get(element) {
            Some(node) => node.children().map(|c| c.id()).collect(),
            None => return,
        };

        let mut rewritten = false;
        for child in child_ids {
            let mut node = match self.html.tree.get_mut(child) {
                Some(node) => node,
                None => continue,
            };
            if !rewritten {
                if let Node::Text(t) = node.value() {
                    t.text = text.into();
                    rewritten = true;
                    continue;
                }
            }
            node.detach();
        }

        if !rewritten {
            if let Some(mut node) = self.html.tree.get_mut(element) {
                node.append(Node::Text(Text { text: text.into() }));
            }
        }
    }
}

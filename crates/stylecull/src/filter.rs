// ABOUTME: CSS usage filtering against a concrete HTML document.
// ABOUTME: Defines the FilterCss capability and the lightningcss-backed UsageFilter.

//! Usage filtering: dropping rules whose selectors match nothing.
//!
//! Filtering is selector-granular. Within a style rule, selectors that match
//! no element of the document are removed; a rule whose selector list becomes
//! empty is dropped. Kept selectors appear in the output verbatim and in
//! their original order. `@media` and `@supports` recurse into their inner
//! rule lists and disappear when nothing inside survives; all other at-rules
//! (`@font-face`, `@keyframes`, `@import`, ...) are kept as-is.

use std::future::Future;

use anyhow::anyhow;
use lightningcss::rules::{CssRule, CssRuleList};
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::traits::ToCss;
use scraper::Html;

use crate::error::{ProcessError, Result};
use crate::matcher::selector_used;

/// Capability for removing CSS rules whose selectors match nothing in a
/// document. Implementations receive the full original document text and the
/// raw CSS of a single style block.
pub trait FilterCss {
    fn filter(&self, document: &str, css: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Usage filter backed by lightningcss rule surgery and selector matching
/// against the parsed document.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsageFilter;

impl UsageFilter {
    pub fn new() -> Self {
        Self
    }
}

impl FilterCss for UsageFilter {
    fn filter(&self, document: &str, css: &str) -> impl Future<Output = Result<String>> + Send {
        async move { filter_unused(document, css) }
    }
}

fn filter_unused(document: &str, css: &str) -> Result<String> {
    let doc = Html::parse_document(document);
    let mut stylesheet = StyleSheet::parse(css, ParserOptions::default())
        .map_err(|e| ProcessError::filter("parse stylesheet", Some(anyhow!(e.to_string()))))?;

    let rules = std::mem::replace(&mut stylesheet.rules, CssRuleList(Vec::new()));
    stylesheet.rules = keep_used(rules, &doc);

    let output = stylesheet
        .to_css(PrinterOptions::default())
        .map_err(|e| ProcessError::filter("print stylesheet", Some(anyhow!(e.to_string()))))?;
    Ok(output.code)
}

fn keep_used<'i>(list: CssRuleList<'i>, doc: &Html) -> CssRuleList<'i> {
    let mut kept = Vec::with_capacity(list.0.len());
    for mut rule in list.0 {
        match &mut rule {
            CssRule::Style(style) => {
                style
                    .selectors
                    .0
                    .retain(|sel| match sel.to_css_string(PrinterOptions::default()) {
                        Ok(text) => selector_used(doc, &text),
                        // Unprintable selector: keep it rather than guess
                        Err(_) => true,
                    });
                if style.selectors.0.is_empty() {
                    continue;
                }
                let nested = std::mem::replace(&mut style.rules, CssRuleList(Vec::new()));
                style.rules = keep_used(nested, doc);
                kept.push(rule);
            }
            CssRule::Media(media) => {
                let inner = std::mem::replace(&mut media.rules, CssRuleList(Vec::new()));
                media.rules = keep_used(inner, doc);
                if !media.rules.0.is_empty() {
                    kept.push(rule);
                }
            }
            CssRule::Supports(supports) => {
                let inner = std::mem::replace(&mut supports.rules, CssRuleList(Vec::new()));
                supports.rules = keep_used(inner, doc);
                if !supports.rules.0.is_empty() {
                    kept.push(rule);
                }
            }
            _ => kept.push(rule),
        }
    }
    CssRuleList(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<!DOCTYPE html><html><head></head><body>\
        <h1>Title</h1>\
        <div class=\"used\">x</div>\
        <p id=\"target\">y</p>\
        </body></html>";

    #[test]
    fn drops_rules_matching_nothing() {
        let out = filter_unused(PAGE, ".used{color:#000}.unused{color:#111}").unwrap();
        assert!(out.contains(".used"));
        assert!(!out.contains(".unused"));
    }

    #[test]
    fn drops_only_unused_selectors_from_comma_lists() {
        let out = filter_unused(PAGE, ".used, .unused { color: #000 }").unwrap();
        assert!(out.contains(".used"));
        assert!(!out.contains(".unused"));
    }

    #[test]
    fn keeps_id_and_tag_selectors_that_match() {
        let out = filter_unused(PAGE, "#target{color:#000}h1{color:#111}h2{color:#222}").unwrap();
        assert!(out.contains("#target"));
        assert!(out.contains("h1"));
        assert!(!out.contains("h2"));
    }

    #[test]
    fn state_pseudo_classes_survive_on_used_selectors() {
        let out = filter_unused(PAGE, ".used:hover{color:#000}.unused:hover{color:#111}").unwrap();
        assert!(out.contains(".used:hover"));
        assert!(!out.contains(".unused"));
    }

    #[test]
    fn recurses_into_media_rules() {
        let css = "@media (min-width: 600px) { .used { color: #000 } .unused { color: #111 } }\
                   @media print { .unused { color: #222 } }";
        let out = filter_unused(PAGE, css).unwrap();
        assert!(out.contains(".used"));
        assert!(!out.contains(".unused"));
        assert!(!out.contains("print"));
    }

    #[test]
    fn keeps_font_face_and_keyframes() {
        let css = "@font-face { font-family: X; src: url(x.woff2); }\
                   @keyframes spin { to { transform: rotate(360deg) } }";
        let out = filter_unused(PAGE, css).unwrap();
        assert!(out.contains("@font-face"));
        assert!(out.contains("@keyframes"));
    }

    #[test]
    fn malformed_css_is_a_filter_error() {
        let err = filter_unused(PAGE, "?? {color:#000}").unwrap_err();
        assert!(err.is_filter());
    }

    #[test]
    fn empty_stylesheet_stays_empty() {
        let out = filter_unused(PAGE, "").unwrap();
        assert_eq!(out.trim(), "");
    }
}

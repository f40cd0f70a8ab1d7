// ABOUTME: Selector-to-document matching support for the usage filter.
// ABOUTME: Strips non-structural pseudos and caches compiled selectors process-wide.

//! Selector matching against a concrete document.
//!
//! Authored selectors carry state pseudo-classes (`:hover`, `:focus`) and
//! pseudo-elements (`::before`) that describe runtime state rather than
//! document structure, so they are ignored when deciding whether a selector
//! is used: `.a:hover` is used wherever `.a` is. Structural pseudo-classes
//! (`:not`, `:nth-child`, ...) stay in the match. A selector the engine
//! cannot compile is treated as used, so the filter never deletes a rule it
//! cannot reason about.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

/// Pseudo-classes the match engine evaluates structurally; every other pseudo
/// segment is stripped before matching.
const STRUCTURAL_PSEUDOS: &[&str] = &[
    "not",
    "is",
    "where",
    "has",
    "first-child",
    "last-child",
    "only-child",
    "nth-child",
    "nth-last-child",
    "first-of-type",
    "last-of-type",
    "only-of-type",
    "nth-of-type",
    "nth-last-of-type",
    "root",
    "empty",
];

/// Thread-safe cache of compiled selectors.
///
/// Uses a RwLock for read-heavy workloads: the same selectors recur across
/// style blocks and documents, so most accesses are cache hits.
static SELECTOR_CACHE: Lazy<RwLock<HashMap<String, Option<Selector>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Gets or compiles a selector, caching the result.
///
/// Returns `Some(Selector)` if the selector is valid, `None` if invalid.
/// Invalid selectors are cached too, so repeated misses stay cheap.
pub fn get_or_compile(css: &str) -> Option<Selector> {
    {
        let cache = SELECTOR_CACHE.read().unwrap();
        if let Some(cached) = cache.get(css) {
            return cached.clone();
        }
    }

    let compiled = Selector::parse(css).ok();
    let mut cache = SELECTOR_CACHE.write().unwrap();
    // Double-check after acquiring write lock (another thread may have inserted)
    if let Some(cached) = cache.get(css) {
        return cached.clone();
    }
    cache.insert(css.to_string(), compiled.clone());
    compiled
}

/// True when `selector` matches at least one element of `doc`, ignoring
/// non-structural pseudo segments.
pub fn selector_used(doc: &Html, selector: &str) -> bool {
    let stripped = strip_pseudos(selector);
    match get_or_compile(&stripped) {
        Some(sel) => doc.select(&sel).next().is_some(),
        None => true,
    }
}

/// Remove non-structural pseudo segments from a selector string.
///
/// A compound that consisted only of pseudo segments (e.g. `::selection`)
/// becomes `*`, keeping the surrounding combinators valid.
fn strip_pseudos(selector: &str) -> String {
    let mut out = String::with_capacity(selector.len());
    let mut chars = selector.chars().peekable();
    let mut compound_len = 0usize;
    let mut stripped = false;

    while let Some(c) = chars.next() {
        match c {
            ':' => {
                let double = chars.peek() == Some(&':');
                if double {
                    chars.next();
                }
                let mut name = String::new();
                while let Some(&n) = chars.peek() {
                    if n.is_ascii_alphanumeric() || n == '-' || n == '_' {
                        name.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let mut args = String::new();
                if chars.peek() == Some(&'(') {
                    let mut depth = 0usize;
                    for n in chars.by_ref() {
                        args.push(n);
                        if n == '(' {
                            depth += 1;
                        } else if n == ')' {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                    }
                }
                if !double && STRUCTURAL_PSEUDOS.contains(&name.to_ascii_lowercase().as_str()) {
                    out.push(':');
                    out.push_str(&name);
                    out.push_str(&args);
                    compound_len += 1;
                } else {
                    stripped = true;
                }
            }
            '[' => {
                // Attribute selector: copy through verbatim, honoring quotes
                compound_len += 1;
                out.push(c);
                let mut quote: Option<char> = None;
                for n in chars.by_ref() {
                    out.push(n);
                    match quote {
                        Some(q) if n == q => quote = None,
                        Some(_) => {}
                        None if n == '"' || n == '\'' => quote = Some(n),
                        None if n == ']' => break,
                        None => {}
                    }
                }
            }
            '\\' => {
                compound_len += 1;
                out.push(c);
                if let Some(n) = chars.next() {
                    out.push(n);
                }
            }
            ' ' | '\t' | '\n' | '>' | '+' | '~' | ',' => {
                if compound_len == 0 && stripped {
                    out.push('*');
                }
                compound_len = 0;
                stripped = false;
                out.push(c);
            }
            _ => {
                compound_len += 1;
                out.push(c);
            }
        }
    }

    if compound_len == 0 && stripped {
        out.push('*');
    }
    out
}

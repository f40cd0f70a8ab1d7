// ABOUTME: CSS minification capability and its lightningcss-backed implementation.
// ABOUTME: Parses, minifies, and reprints a stylesheet with whitespace stripped.

use anyhow::anyhow;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};

use crate::error::{ProcessError, Result};

/// Capability for producing a compact, semantically equivalent stylesheet.
pub trait Minify {
    fn minify(&self, css: &str) -> Result<String>;
}

/// Minifier backed by lightningcss.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssMinifier;

impl CssMinifier {
    pub fn new() -> Self {
        Self
    }
}

impl Minify for CssMinifier {
    fn minify(&self, css: &str) -> Result<String> {
        let mut stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| ProcessError::minify("parse stylesheet", Some(anyhow!(e.to_string()))))?;

        stylesheet
            .minify(MinifyOptions::default())
            .map_err(|e| ProcessError::minify("minify stylesheet", Some(anyhow!(e.to_string()))))?;

        let output = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| ProcessError::minify("print stylesheet", Some(anyhow!(e.to_string()))))?;
        Ok(output.code)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn strips_whitespace_and_redundancy() {
        let input = ".foo {\n  color: #000;\n}\n";
        assert_eq!(CssMinifier::new().minify(input).unwrap(), ".foo{color:#000}");
    }

    #[test]
    fn empty_input_minifies_to_empty() {
        assert_eq!(CssMinifier::new().minify("").unwrap(), "");
    }

    #[test]
    fn malformed_css_is_a_minify_error() {
        let err = CssMinifier::new().minify("?? {color:#000}").unwrap_err();
        assert!(err.is_minify());
    }
}

// ABOUTME: The style filter orchestrator tying document, filter, and minifier together.
// ABOUTME: Fans out per-style-block work and writes results back before reserializing.

//! The orchestrator.
//!
//! [`Processor::process`] parses the document, fans out one task per
//! non-exempt style block (usage-filter, then minify), joins them, and writes
//! the results back before serializing. Every task filters against the
//! original unmutated input text, so results are independent of block order.
//! A document without candidate blocks passes through byte-identical.

use futures::future::try_join_all;

use crate::document::Document;
use crate::error::Result;
use crate::filter::{FilterCss, UsageFilter};
use crate::minify::{CssMinifier, Minify};

/// Removes unused rules from the inline style blocks of an HTML document and
/// minifies what remains.
pub struct Processor<F = UsageFilter, M = CssMinifier> {
    filter: F,
    minifier: M,
}

impl Processor {
    /// Processor with the default lightningcss-backed collaborators.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Builder for a processor with custom collaborators.
    pub fn builder() -> ProcessorBuilder {
        ProcessorBuilder::new()
    }
}

impl Default for Processor {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FilterCss, M: Minify> Processor<F, M> {
    /// Filter and minify every non-exempt style block of `html`.
    ///
    /// Any filter or minifier failure aborts the whole call; no partially
    /// rewritten document is ever returned.
    pub async fn process(&self, html: &str) -> Result<String> {
        let blocks = Document::parse(html).candidate_styles();
        if blocks.is_empty() {
            return Ok(html.to_owned());
        }

        let tasks = blocks.iter().map(|css| async move {
            let filtered = self.filter.filter(html, css).await?;
            self.minifier.minify(&filtered)
        });
        let replacements = try_join_all(tasks).await?;

        let mut doc = Document::parse(html);
        doc.replace_candidate_styles(&replacements);
        Ok(doc.serialize())
    }
}

/// Builder for constructing Processor instances with custom collaborators.
pub struct ProcessorBuilder<F = UsageFilter, M = CssMinifier> {
    filter: F,
    minifier: M,
}

impl ProcessorBuilder {
    pub fn new() -> Self {
        Self {
            filter: UsageFilter::new(),
            minifier: CssMinifier::new(),
        }
    }
}

impl Default for ProcessorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<F, M> ProcessorBuilder<F, M> {
    /// Swap in a custom usage filter.
    pub fn filter<F2: FilterCss>(self, filter: F2) -> ProcessorBuilder<F2, M> {
        ProcessorBuilder {
            filter,
            minifier: self.minifier,
        }
    }

    /// Swap in a custom minifier.
    pub fn minifier<M2: Minify>(self, minifier: M2) -> ProcessorBuilder<F, M2> {
        ProcessorBuilder {
            filter: self.filter,
            minifier,
        }
    }

    pub fn build(self) -> Processor<F, M> {
        Processor {
            filter: self.filter,
            minifier: self.minifier,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::ProcessError;

    struct FixedFilter(&'static str);

    impl FilterCss for FixedFilter {
        fn filter(
            &self,
            _document: &str,
            _css: &str,
        ) -> impl Future<Output = Result<String>> + Send {
            let out = self.0.to_string();
            async move { Ok(out) }
        }
    }

    struct FailingFilter;

    impl FilterCss for FailingFilter {
        fn filter(
            &self,
            _document: &str,
            _css: &str,
        ) -> impl Future<Output = Result<String>> + Send {
            async move { Err(ProcessError::filter("boom", None)) }
        }
    }

    struct UppercaseMinifier;

    impl Minify for UppercaseMinifier {
        fn minify(&self, css: &str) -> Result<String> {
            Ok(css.to_uppercase())
        }
    }

    const PAGE: &str =
        "<html><head><style>.x{color:#000}</style></head><body><p>y</p></body></html>";

    #[tokio::test]
    async fn builder_swaps_collaborators() {
        let processor = Processor::builder()
            .filter(FixedFilter(".kept{}"))
            .minifier(UppercaseMinifier)
            .build();
        let out = processor.process(PAGE).await.unwrap();
        assert!(out.contains(".KEPT{}"));
    }

    #[tokio::test]
    async fn passthrough_without_candidate_blocks() {
        let input = "<p>no styles here</p>";
        let out = Processor::new().process(input).await.unwrap();
        assert_eq!(out, input);
    }

    #[tokio::test]
    async fn failing_filter_aborts_the_call() {
        let processor = Processor::builder().filter(FailingFilter).build();
        let err = processor.process(PAGE).await.unwrap_err();
        assert!(err.is_filter());
    }

    #[tokio::test]
    async fn default_collaborators_filter_and_minify() {
        let html = "<html><head><style>.a { color: #000; } .b { color: #111; }</style></head>\
                    <body><div class=\"a\">x</div></body></html>";
        let out = Processor::new().process(html).await.unwrap();
        assert!(out.contains("<style>.a{color:#000}</style>"));
        assert!(!out.contains(".b"));
    }
}

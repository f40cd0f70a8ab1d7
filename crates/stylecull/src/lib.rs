// ABOUTME: Main library entry point for the stylecull inline-style filter.
// ABOUTME: Re-exports the public API: Processor, ProcessorBuilder, collaborator traits, and errors.

//! stylecull - Removes unused CSS rules from the inline style blocks of an
//! HTML document and minifies what remains.
//!
//! This crate is a build-time post-processing step for static pages (AMP
//! pages in particular), where authored inline styles routinely carry rules
//! that match nothing in the final markup. Every `<style>` block is filtered
//! against the whole document and rewritten in place; blocks carrying the
//! `amp-boilerplate` attribute are platform-mandated and are never touched.
//!
//! # Example
//!
//! ```
//! use stylecull::Processor;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), stylecull::ProcessError> {
//!     let processor = Processor::new();
//!     let html = processor
//!         .process("<html><head><style>.a{color:#000}</style></head><body></body></html>")
//!         .await?;
//!     println!("{html}");
//!     Ok(())
//! }
//! ```

pub mod document;
pub mod error;
pub mod filter;
pub mod matcher;
pub mod minify;
pub mod processor;

pub use crate::document::Document;
pub use crate::error::{ErrorCode, ProcessError, Result};
pub use crate::filter::{FilterCss, UsageFilter};
pub use crate::minify::{CssMinifier, Minify};
pub use crate::processor::{Processor, ProcessorBuilder};

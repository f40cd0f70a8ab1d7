// ABOUTME: Error types for the style filter including ErrorCode enum and ProcessError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing different categories of processing failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Parse,
    Filter,
    Minify,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::Parse => "parse error",
            ErrorCode::Filter => "filter error",
            ErrorCode::Minify => "minify error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for process operations.
#[derive(Debug, thiserror::Error)]
pub struct ProcessError {
    pub code: ErrorCode,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stylecull: {}: {}", self.op, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ProcessError {
    /// Create a Parse error.
    pub fn parse(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self {
            code: ErrorCode::Parse,
            op: op.into(),
            source,
        }
    }

    /// Create a Filter error.
    pub fn filter(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self {
            code: ErrorCode::Filter,
            op: op.into(),
            source,
        }
    }

    /// Create a Minify error.
    pub fn minify(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self {
            code: ErrorCode::Minify,
            op: op.into(),
            source,
        }
    }

    /// Returns true if this is a Parse error.
    pub fn is_parse(&self) -> bool {
        self.code == ErrorCode::Parse
    }

    /// Returns true if this is a Filter error.
    pub fn is_filter(&self) -> bool {
        self.code == ErrorCode::Filter
    }

    /// Returns true if this is a Minify error.
    pub fn is_minify(&self) -> bool {
        self.code == ErrorCode::Minify
    }
}

/// Result alias for process operations.
pub type Result<T> = std::result::Result<T, ProcessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_op_and_code() {
        let err = ProcessError::filter("parse stylesheet", Some(anyhow::anyhow!("bad token")));
        let text = err.to_string();
        assert!(text.contains("parse stylesheet"));
        assert!(text.contains("filter error"));
        assert!(text.contains("bad token"));
    }

    #[test]
    fn helpers_match_code() {
        assert!(ProcessError::parse("x", None).is_parse());
        assert!(ProcessError::filter("x", None).is_filter());
        assert!(ProcessError::minify("x", None).is_minify());
        assert!(!ProcessError::minify("x", None).is_filter());
    }
}

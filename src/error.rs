//! Structured error types for the report engine.
//!
//! Four variants cover the real error sources: page geometry configuration,
//! JSON parsing, file I/O, and PDF generation failures.

use std::path::PathBuf;

use thiserror::Error;

/// The unified error type returned by the public rendering API.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Page geometry is missing a constant or has a non-positive one.
    /// Raised before any page is emitted.
    #[error("Invalid page geometry: {0}")]
    InvalidGeometry(String),

    /// JSON input failed to parse as a valid interview record or geometry.
    #[error("Failed to parse document: {source}{}", format_hint(.hint))]
    ParseError {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// PDF serialization failed.
    #[error("Render error: {0}")]
    RenderError(String),
}

fn format_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the expected schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        ReportError::ParseError { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_carries_syntax_hint() {
        let err: ReportError = serde_json::from_str::<serde_json::Value>("{\"a\": 1,}")
            .unwrap_err()
            .into();
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to parse document"));
        assert!(msg.contains("trailing commas"), "got: {}", msg);
    }

    #[test]
    fn geometry_error_message() {
        let err = ReportError::InvalidGeometry("margin must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid page geometry: margin must be positive");
    }
}

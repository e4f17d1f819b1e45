//! Structured error types for the pagination engine.
//!
//! Only failures that stop a render are errors. Geometry that does not fit,
//! undeclared page sizes and malformed auto-text patterns are recovered where
//! they happen, and cancellation is reported as "no more pages".

use thiserror::Error;

/// Failure reported by a [`crate::executor::ContentExecutor`].
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The master page for a page number could not be produced.
    #[error("master page for page {page_number} could not be executed: {reason}")]
    MasterPage { page_number: u32, reason: String },
    /// Body content could not be produced.
    #[error("content execution failed: {0}")]
    Content(String),
}

/// The unified error type returned by the public API.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The content executor failed; layout cannot continue without content.
    #[error(transparent)]
    Executor(#[from] ExecutorError),

    /// JSON input failed to parse as a report.
    #[error("failed to parse report: {source}{}", hint_suffix(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {hint}")
    }
}

impl From<serde_json::Error> for LayoutError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the report schema. Check field names and types."
                    .to_string()
            }
            serde_json::error::Category::Eof => "Unexpected end of input. Is the JSON truncated?".to_string(),
            serde_json::error::Category::Io => String::new(),
        };
        LayoutError::Parse { source: e, hint }
    }
}

//! Transformation-layer errors.

use feedhub_core::error::{AppError, ErrorKind};
use thiserror::Error;

/// Errors raised while parsing or generating feed documents.
///
/// Per-item problems are never reported through this type; they are
/// counted in [`crate::parse::ParseOutcome`].
#[derive(Debug, Error)]
pub enum FeedError {
    /// The document contained no bytes (after BOM and whitespace).
    #[error("feed document is empty")]
    EmptyDocument,
    /// The document could not be read as CSV.
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),
    /// The document is neither a JSON value nor NDJSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The document is not well-formed XML.
    #[error("invalid XML: {0}")]
    Xml(String),
    /// No item element or item collection could be located.
    #[error("no items found in feed")]
    NoItems,
    /// An unknown feed format name was supplied.
    #[error("unsupported feed format '{0}'")]
    UnsupportedFormat(String),
    /// Writing an export document failed.
    #[error("export failed: {0}")]
    Export(String),
}

impl From<quick_xml::Error> for FeedError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err.to_string())
    }
}

impl From<FeedError> for AppError {
    fn from(err: FeedError) -> Self {
        let kind = match err {
            FeedError::Export(_) => ErrorKind::Internal,
            _ => ErrorKind::Validation,
        };
        let message = err.to_string();
        AppError::with_source(kind, message, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_errors_become_validation() {
        let err: AppError = FeedError::NoItems.into();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "no items found in feed");
    }

    #[test]
    fn test_export_errors_are_internal() {
        let err: AppError = FeedError::Export("broken pipe".into()).into();
        assert!(err.kind.is_internal());
    }
}

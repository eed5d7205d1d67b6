//! Feed format detection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FeedError;
use crate::strip_bom;

/// Document format of a supplier feed or an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "feed_format", rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum FeedFormat {
    /// Delimited text with a header row.
    Csv,
    /// JSON document or newline-delimited JSON.
    Json,
    /// XML document with repeated item elements.
    Xml,
}

impl FeedFormat {
    /// Return the format as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }

    /// Canonical file extension.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    /// `Content-Type` used when serving a document of this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv; charset=utf-8",
            Self::Json => "application/json; charset=utf-8",
            Self::Xml => "application/xml; charset=utf-8",
        }
    }

    /// Map a file extension (without the dot, any case) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "tsv" | "txt" => Some(Self::Csv),
            "json" | "ndjson" | "jsonl" => Some(Self::Json),
            "xml" | "rss" | "atom" => Some(Self::Xml),
            _ => None,
        }
    }

    /// Map a MIME type (or any string containing one) to a format.
    pub fn from_mime(content_type: &str) -> Option<Self> {
        let mime = content_type.to_ascii_lowercase();
        if mime.contains("csv") || mime.contains("tab-separated") {
            Some(Self::Csv)
        } else if mime.contains("json") {
            Some(Self::Json)
        } else if mime.contains("xml") {
            Some(Self::Xml)
        } else {
            None
        }
    }

    /// Guess the format from the first meaningful byte of a sample.
    pub fn from_content(sample: &[u8]) -> Option<Self> {
        let first = strip_bom(sample)
            .iter()
            .find(|b| !b.is_ascii_whitespace())?;
        Some(match first {
            b'<' => Self::Xml,
            b'{' | b'[' => Self::Json,
            _ => Self::Csv,
        })
    }
}

impl fmt::Display for FeedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FeedFormat {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            _ => Err(FeedError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Extract the extension of the last path segment of a file name or URL.
///
/// Query strings and fragments are ignored.
pub fn path_extension(path: &str) -> Option<&str> {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let segment = path.rsplit('/').next().unwrap_or(path);
    let (stem, ext) = segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext)
}

/// Detect a feed's format.
///
/// Resolution order: explicit extension of `path`, then the MIME type,
/// then the content sample, falling back to JSON.
pub fn detect_feed_type(
    path: Option<&str>,
    content_type: Option<&str>,
    sample: Option<&[u8]>,
) -> FeedFormat {
    path.and_then(path_extension)
        .and_then(FeedFormat::from_extension)
        .or_else(|| content_type.and_then(FeedFormat::from_mime))
        .or_else(|| sample.and_then(FeedFormat::from_content))
        .unwrap_or(FeedFormat::Json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_wins() {
        let fmt = detect_feed_type(
            Some("https://supplier.example.com/export/Products.XML?token=abc#top"),
            Some("application/json"),
            Some(b"sku,price"),
        );
        assert_eq!(fmt, FeedFormat::Xml);
        assert_eq!(
            detect_feed_type(Some("items.ndjson"), None, None),
            FeedFormat::Json
        );
        assert_eq!(detect_feed_type(Some("items.tsv"), None, None), FeedFormat::Csv);
    }

    #[test]
    fn test_mime_then_content() {
        assert_eq!(
            detect_feed_type(Some("https://x.test/feed"), Some("text/tab-separated-values"), None),
            FeedFormat::Csv
        );
        assert_eq!(
            detect_feed_type(None, Some("application/rss+xml"), None),
            FeedFormat::Xml
        );
        assert_eq!(
            detect_feed_type(None, Some("application/octet-stream"), Some(b"\xEF\xBB\xBF  <rss>")),
            FeedFormat::Xml
        );
        assert_eq!(
            detect_feed_type(None, None, Some(b"\n[{\"a\":1}]")),
            FeedFormat::Json
        );
        assert_eq!(detect_feed_type(None, None, Some(b"sku;price")), FeedFormat::Csv);
    }

    #[test]
    fn test_default_is_json() {
        assert_eq!(detect_feed_type(None, None, None), FeedFormat::Json);
        assert_eq!(detect_feed_type(None, None, Some(b"   ")), FeedFormat::Json);
        assert_eq!(
            detect_feed_type(Some("https://x.test/download"), Some("application/octet-stream"), None),
            FeedFormat::Json
        );
    }

    #[test]
    fn test_path_extension() {
        assert_eq!(path_extension("a/b/c.csv"), Some("csv"));
        assert_eq!(path_extension("https://x.test/feed?f=a.csv"), None);
        assert_eq!(path_extension(".hidden"), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("JSON".parse::<FeedFormat>().unwrap(), FeedFormat::Json);
        assert!("yaml".parse::<FeedFormat>().is_err());
    }
}

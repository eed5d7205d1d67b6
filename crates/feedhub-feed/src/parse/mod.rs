//! Ingestion parsers.
//!
//! Each parser turns a whole feed document into [`ParsedItem`]s keyed by
//! the supplier's unique-identifier field. A bad item is counted and
//! sampled, never fatal; only an unreadable document is an error.

pub mod csv;
pub mod json;
pub mod xml;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::FieldMap;
use crate::error::FeedError;
use crate::format::FeedFormat;
use crate::strip_bom;

/// Maximum number of per-item error samples kept in an outcome.
pub const MAX_ERROR_SAMPLES: usize = 20;

/// One item that could not be ingested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemError {
    /// Zero-based position of the item in the document.
    pub index: usize,
    /// Why the item was rejected.
    pub reason: String,
}

/// One successfully parsed item.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedItem {
    /// Zero-based position of the item in the document.
    pub index: usize,
    /// Value of the unique-identifier field.
    pub external_id: String,
    /// Flattened field map of the item.
    pub data: FieldMap,
}

/// Result of parsing a feed document.
///
/// `total == items.len() + errors` always holds.
#[derive(Debug, Default)]
pub struct ParseOutcome {
    /// Number of items encountered.
    pub total: usize,
    /// Items with a usable external id.
    pub items: Vec<ParsedItem>,
    /// Number of rejected items.
    pub errors: usize,
    /// Up to [`MAX_ERROR_SAMPLES`] rejected items.
    pub error_samples: Vec<ItemError>,
    /// Document-level problems that did not abort the parse.
    pub warnings: Vec<String>,
}

impl ParseOutcome {
    /// Number of accepted items.
    pub fn ok_count(&self) -> usize {
        self.items.len()
    }

    /// Accept an item if it carries an external id under `unique_key`.
    pub fn push_item(&mut self, index: usize, data: FieldMap, unique_key: &str) {
        match extract_external_id(&data, unique_key) {
            Some(external_id) => {
                self.total += 1;
                self.items.push(ParsedItem {
                    index,
                    external_id,
                    data,
                });
            }
            None => self.push_error(index, format!("missing unique identifier '{unique_key}'")),
        }
    }

    /// Keep only the last item of each external id.
    ///
    /// Superseded items are counted as errors, so `items` holds exactly
    /// the distinct rows that will be stored, and one warning summarises
    /// them.
    pub fn collapse_duplicates(&mut self) {
        let mut last_position: HashMap<&str, usize> = HashMap::with_capacity(self.items.len());
        for (position, item) in self.items.iter().enumerate() {
            last_position.insert(item.external_id.as_str(), position);
        }
        if last_position.len() == self.items.len() {
            return;
        }
        let keep: Vec<bool> = self
            .items
            .iter()
            .enumerate()
            .map(|(position, item)| last_position.get(item.external_id.as_str()) == Some(&position))
            .collect();

        let mut superseded = 0;
        for (item, keep) in std::mem::take(&mut self.items).into_iter().zip(keep) {
            if keep {
                self.items.push(item);
                continue;
            }
            superseded += 1;
            self.errors += 1;
            if self.error_samples.len() < MAX_ERROR_SAMPLES {
                self.error_samples.push(ItemError {
                    index: item.index,
                    reason: format!(
                        "duplicate unique identifier '{}'; a later item replaces it",
                        item.external_id
                    ),
                });
            }
        }
        self.warnings.push(format!(
            "{superseded} items repeated a unique identifier; the last occurrence was kept"
        ));
    }

    /// Count a rejected item.
    pub fn push_error(&mut self, index: usize, reason: impl Into<String>) {
        self.total += 1;
        self.errors += 1;
        if self.error_samples.len() < MAX_ERROR_SAMPLES {
            self.error_samples.push(ItemError {
                index,
                reason: reason.into(),
            });
        }
    }
}

/// Read the external id of an item: a non-empty trimmed string or a number.
pub fn extract_external_id(data: &FieldMap, unique_key: &str) -> Option<String> {
    match data.get(unique_key)? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse a whole feed document.
///
/// Fails with [`FeedError::EmptyDocument`] for blank input and
/// [`FeedError::NoItems`] when no item at all could be located.
pub fn parse_feed(
    format: FeedFormat,
    document: &[u8],
    unique_key: &str,
) -> Result<ParseOutcome, FeedError> {
    if strip_bom(document).iter().all(u8::is_ascii_whitespace) {
        return Err(FeedError::EmptyDocument);
    }
    let mut outcome = match format {
        FeedFormat::Csv => csv::parse(document, unique_key)?,
        FeedFormat::Json => json::parse(document, unique_key)?,
        FeedFormat::Xml => xml::parse(document, unique_key)?,
    };
    if outcome.total == 0 {
        return Err(FeedError::NoItems);
    }
    outcome.collapse_duplicates();
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_external_id_rules() {
        let data = json!({"a": "  X1 ", "b": 42, "c": "  ", "d": true, "e": null});
        let data = data.as_object().unwrap();
        assert_eq!(extract_external_id(data, "a").as_deref(), Some("X1"));
        assert_eq!(extract_external_id(data, "b").as_deref(), Some("42"));
        assert_eq!(extract_external_id(data, "c"), None);
        assert_eq!(extract_external_id(data, "d"), None);
        assert_eq!(extract_external_id(data, "e"), None);
        assert_eq!(extract_external_id(data, "zz"), None);
    }

    #[test]
    fn test_error_samples_are_capped() {
        let mut outcome = ParseOutcome::default();
        for i in 0..50 {
            outcome.push_error(i, "bad");
        }
        assert_eq!(outcome.errors, 50);
        assert_eq!(outcome.total, 50);
        assert_eq!(outcome.error_samples.len(), MAX_ERROR_SAMPLES);
    }

    #[test]
    fn test_missing_id_counts_as_error() {
        let doc = b"sku,price\nA1,1\n,2\nA3,3\n";
        let outcome = parse_feed(FeedFormat::Csv, doc, "sku").unwrap();
        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.ok_count(), 2);
        assert_eq!(outcome.errors, 1);
        assert_eq!(outcome.total, outcome.ok_count() + outcome.errors);
        assert_eq!(outcome.error_samples[0].index, 1);
    }

    #[test]
    fn test_duplicate_ids_keep_last_occurrence() {
        let doc = b"sku,price\nA1,1\nA2,2\nA1,3\n";
        let outcome = parse_feed(FeedFormat::Csv, doc, "sku").unwrap();
        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.ok_count(), 2);
        assert_eq!(outcome.errors, 1);
        assert_eq!(outcome.items[0].external_id, "A2");
        assert_eq!(outcome.items[1].data["price"], json!("3"));
        assert_eq!(outcome.error_samples[0].index, 0);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_empty_document() {
        assert!(matches!(
            parse_feed(FeedFormat::Json, b"\xEF\xBB\xBF \n", "id"),
            Err(FeedError::EmptyDocument)
        ));
    }

    #[test]
    fn test_no_items() {
        assert!(matches!(
            parse_feed(FeedFormat::Json, b"[]", "id"),
            Err(FeedError::NoItems)
        ));
    }
}

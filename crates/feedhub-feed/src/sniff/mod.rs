//! Best-effort field-name discovery from a feed sample.
//!
//! Sniffers only feed the "map these fields" step. They never fail: an
//! unreadable sample yields an empty list.

pub mod csv;
pub mod json;
pub mod xml;

use crate::format::FeedFormat;

/// Default cap on the number of keys returned.
pub const DEFAULT_KEY_LIMIT: usize = 200;

/// Return the field names found in `sample`, deduplicated in first-seen
/// order and capped at `limit`.
pub fn sniff_keys(format: FeedFormat, sample: &[u8], limit: usize) -> Vec<String> {
    let mut keys = KeyCollector::new(limit);
    match format {
        FeedFormat::Csv => csv::sniff(sample, &mut keys),
        FeedFormat::Json => json::sniff(sample, &mut keys),
        FeedFormat::Xml => xml::sniff(sample, &mut keys),
    }
    keys.into_keys()
}

/// Ordered, deduplicating, capped key accumulator.
#[derive(Debug)]
pub struct KeyCollector {
    keys: Vec<String>,
    limit: usize,
}

impl KeyCollector {
    /// Create an empty collector accepting at most `limit` keys.
    pub fn new(limit: usize) -> Self {
        Self {
            keys: Vec::new(),
            limit,
        }
    }

    /// Add a key. Blank and duplicate keys are ignored.
    ///
    /// Returns `false` once the collector is full.
    pub fn push(&mut self, key: &str) -> bool {
        if self.is_full() {
            return false;
        }
        let key = key.trim();
        if !key.is_empty() && !self.keys.iter().any(|k| k == key) {
            self.keys.push(key.to_string());
        }
        !self.is_full()
    }

    /// Whether the cap has been reached.
    pub fn is_full(&self) -> bool {
        self.keys.len() >= self.limit
    }

    /// Consume the collector.
    pub fn into_keys(self) -> Vec<String> {
        self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_dedup_and_cap() {
        let mut keys = KeyCollector::new(2);
        assert!(keys.push("a"));
        assert!(keys.push("a"));
        assert!(keys.push("  "));
        assert!(!keys.push("b"));
        assert!(!keys.push("c"));
        assert_eq!(keys.into_keys(), vec!["a", "b"]);
    }

    #[test]
    fn test_sniff_keys_respects_limit() {
        let header: Vec<String> = (0..300).map(|i| format!("col{i}")).collect();
        let sample = header.join(",");
        let keys = sniff_keys(FeedFormat::Csv, sample.as_bytes(), DEFAULT_KEY_LIMIT);
        assert_eq!(keys.len(), DEFAULT_KEY_LIMIT);
        assert_eq!(keys[0], "col0");
    }
}

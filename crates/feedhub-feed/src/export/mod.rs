//! Export document generation.

pub mod csv;
pub mod filter;
pub mod json;
pub mod xml;

use uuid::Uuid;

use crate::FieldMap;
use crate::error::FeedError;
use crate::format::FeedFormat;

pub use filter::ExportFilters;

/// A mapped product handed to the generators.
#[derive(Debug, Clone, Copy)]
pub struct ExportRow<'a> {
    /// Coerced values keyed by custom field key.
    pub data: &'a FieldMap,
    /// Assigned category.
    pub category_id: Option<Uuid>,
}

/// Resolve the ordered list of keys an export emits.
///
/// - ordering and selection: the ordering restricted to selected keys,
///   followed by selected keys the ordering does not mention;
/// - only one of them: that list;
/// - neither: `default_fields` (the workspace's visible fields in sort order).
///
/// Duplicates are dropped.
pub fn effective_fields(
    selection: &[String],
    ordering: &[String],
    default_fields: &[String],
) -> Vec<String> {
    let candidates: Vec<&String> = match (selection.is_empty(), ordering.is_empty()) {
        (false, false) => ordering
            .iter()
            .filter(|k| selection.contains(k))
            .chain(selection.iter().filter(|k| !ordering.contains(k)))
            .collect(),
        (false, true) => selection.iter().collect(),
        (true, false) => ordering.iter().collect(),
        (true, true) => default_fields.iter().collect(),
    };
    let mut fields: Vec<String> = Vec::with_capacity(candidates.len());
    for key in candidates {
        if !fields.contains(key) {
            fields.push(key.clone());
        }
    }
    fields
}

/// Filter `rows` and render them in `format`.
pub fn generate(
    format: FeedFormat,
    fields: &[String],
    rows: &[ExportRow<'_>],
    filters: &ExportFilters,
) -> Result<Vec<u8>, FeedError> {
    let rows: Vec<ExportRow<'_>> = rows.iter().copied().filter(|r| filters.matches(r)).collect();
    match format {
        FeedFormat::Csv => csv::render(fields, &rows),
        FeedFormat::Json => json::render(fields, &rows),
        FeedFormat::Xml => Ok(xml::render(fields, &rows).into_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_effective_fields_rules() {
        let visible = keys(&["sku", "name"]);
        assert_eq!(
            effective_fields(&keys(&["price", "sku", "ean"]), &keys(&["sku", "name", "price"]), &visible),
            keys(&["sku", "price", "ean"])
        );
        assert_eq!(effective_fields(&keys(&["b", "a"]), &[], &visible), keys(&["b", "a"]));
        assert_eq!(effective_fields(&[], &keys(&["c", "c"]), &visible), keys(&["c"]));
        assert_eq!(effective_fields(&[], &[], &visible), visible);
    }

    #[test]
    fn test_generate_applies_filters() {
        let a = json!({"sku": "A1", "price": 9.99, "stock": 0});
        let b = json!({"sku": "A2", "price": 1200, "stock": 4});
        let rows = [
            ExportRow { data: a.as_object().unwrap(), category_id: None },
            ExportRow { data: b.as_object().unwrap(), category_id: None },
        ];
        let filters = ExportFilters {
            in_stock_only: true,
            ..ExportFilters::default()
        };
        let out = generate(FeedFormat::Csv, &keys(&["sku"]), &rows, &filters).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "sku\nA2\n");
    }
}

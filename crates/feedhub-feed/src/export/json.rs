//! JSON export.

use serde_json::Value;

use super::ExportRow;
use crate::FieldMap;
use crate::error::FeedError;

/// Render rows as a pretty-printed array of objects.
///
/// Every object carries exactly `fields`, in order; missing values are
/// `null`.
pub fn render(fields: &[String], rows: &[ExportRow<'_>]) -> Result<Vec<u8>, FeedError> {
    let documents: Vec<FieldMap> = rows
        .iter()
        .map(|row| {
            fields
                .iter()
                .map(|key| (key.clone(), row.data.get(key).cloned().unwrap_or(Value::Null)))
                .collect()
        })
        .collect();
    Ok(serde_json::to_vec_pretty(&documents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_selection_order_and_nulls() {
        let a = json!({"price": 9.99, "sku": "A1", "extra": 1});
        let b = json!({"sku": "A2"});
        let rows = [
            ExportRow { data: a.as_object().unwrap(), category_id: None },
            ExportRow { data: b.as_object().unwrap(), category_id: None },
        ];
        let out = render(&["sku".to_string(), "price".to_string()], &rows).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains('\n'));
        assert!(text.find("\"sku\"").unwrap() < text.find("\"price\"").unwrap());
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, json!([{"sku": "A1", "price": 9.99}, {"sku": "A2", "price": null}]));
    }

    #[test]
    fn test_empty_export() {
        let out = render(&["sku".to_string()], &[]).unwrap();
        assert_eq!(out, b"[]");
    }
}

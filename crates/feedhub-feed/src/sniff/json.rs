//! JSON key sniffing and item-collection discovery.

use serde_json::Value;

use super::KeyCollector;
use crate::FieldMap;
use crate::flatten::flatten_object;
use crate::strip_bom;

/// Wrapper keys searched first when a document is an object.
pub const PREFERRED_WRAPPER_KEYS: [&str; 8] = [
    "products", "items", "data", "offers", "entries", "rows", "records", "results",
];

/// How many nested wrapper objects are searched for an item array.
const MAX_WRAPPER_DEPTH: usize = 3;

/// Locate the array of items inside a wrapper object.
///
/// Preferred keys are checked before any other key, and arrays directly on
/// `object` before arrays in nested wrapper objects.
pub fn find_item_array(object: &FieldMap) -> Option<&Vec<Value>> {
    find_item_array_at(object, 1)
}

fn find_item_array_at(object: &FieldMap, depth: usize) -> Option<&Vec<Value>> {
    let preferred = PREFERRED_WRAPPER_KEYS.iter().filter_map(|k| object.get(*k));
    for value in preferred.chain(object.values()) {
        if let Value::Array(items) = value {
            if items.iter().any(Value::is_object) {
                return Some(items);
            }
        }
    }
    if depth >= MAX_WRAPPER_DEPTH {
        return None;
    }
    let preferred = PREFERRED_WRAPPER_KEYS.iter().filter_map(|k| object.get(*k));
    for value in preferred.chain(object.values()) {
        if let Value::Object(inner) = value {
            if let Some(items) = find_item_array_at(inner, depth + 1) {
                return Some(items);
            }
        }
    }
    None
}

/// The object whose keys represent the feed's items.
pub fn representative_item(document: &Value) -> Option<&FieldMap> {
    match document {
        Value::Array(items) => items.iter().find_map(Value::as_object),
        Value::Object(object) => match find_item_array(object) {
            Some(items) => items.iter().find_map(Value::as_object),
            None => Some(object),
        },
        _ => None,
    }
}

/// First complete element after the first `[` of a (possibly truncated)
/// document.
fn first_array_element(bytes: &[u8]) -> Option<Value> {
    let start = bytes.iter().position(|b| *b == b'[')?;
    serde_json::Deserializer::from_slice(&bytes[start + 1..])
        .into_iter::<Value>()
        .next()?
        .ok()
}

fn first_ndjson_object(bytes: &[u8]) -> Option<Value> {
    String::from_utf8_lossy(bytes)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|l| serde_json::from_str::<Value>(l).ok())
        .find(Value::is_object)
}

pub(crate) fn sniff(sample: &[u8], keys: &mut KeyCollector) {
    let bytes = strip_bom(sample);
    let document = serde_json::from_slice::<Value>(bytes)
        .ok()
        .or_else(|| first_ndjson_object(bytes))
        .or_else(|| first_array_element(bytes));
    let Some(document) = document else {
        return;
    };
    let Some(item) = representative_item(&document) else {
        return;
    };
    for key in flatten_object(item).keys() {
        if !keys.push(key) {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FeedFormat;
    use crate::sniff::sniff_keys;

    fn sniff_str(s: &str) -> Vec<String> {
        sniff_keys(FeedFormat::Json, s.as_bytes(), 200)
    }

    #[test]
    fn test_top_level_array() {
        let keys = sniff_str(r#"[{"sku":"A1","price":{"amount":1,"currency":"EUR"}},{"other":1}]"#);
        assert_eq!(keys, vec!["sku", "price.amount", "price.currency"]);
    }

    #[test]
    fn test_wrapper_prefers_known_keys() {
        let keys = sniff_str(r#"{"meta":[{"page":1}],"products":[{"id":1,"title":"x"}]}"#);
        assert_eq!(keys, vec!["id", "title"]);
    }

    #[test]
    fn test_nested_wrapper() {
        let keys = sniff_str(r#"{"response":{"data":{"items":[{"ean":"1"}]}}}"#);
        assert_eq!(keys, vec!["ean"]);
    }

    #[test]
    fn test_single_object() {
        assert_eq!(sniff_str(r#"{"sku":"A1","stock":3}"#), vec!["sku", "stock"]);
    }

    #[test]
    fn test_ndjson() {
        let keys = sniff_str("{\"sku\":\"A1\",\"qty\":1}\n{\"sku\":\"A2\",\"qty\":2}\n");
        assert_eq!(keys, vec!["sku", "qty"]);
    }

    #[test]
    fn test_truncated_array() {
        let keys = sniff_str(r#"[{"sku":"A1","name":"Phone"},{"sku":"A2","na"#);
        assert_eq!(keys, vec!["sku", "name"]);
    }

    #[test]
    fn test_truncated_wrapper() {
        let keys = sniff_str(r#"{"products": [ {"gtin":"1","brand":"b"}, {"gtin":"#);
        assert_eq!(keys, vec!["gtin", "brand"]);
    }

    #[test]
    fn test_garbage_yields_nothing() {
        assert!(sniff_str("not json at all").is_empty());
        assert!(sniff_str("[1,2,3]").is_empty());
    }
}

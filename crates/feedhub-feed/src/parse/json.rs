//! JSON and NDJSON ingestion parser.

use serde_json::Value;

use super::ParseOutcome;
use crate::error::FeedError;
use crate::flatten::flatten_object;
use crate::sniff::json::find_item_array;
use crate::strip_bom;

pub(crate) fn parse(document: &[u8], unique_key: &str) -> Result<ParseOutcome, FeedError> {
    let bytes = strip_bom(document);
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value) => parse_value(&value, unique_key),
        Err(err) => parse_ndjson(bytes, unique_key).ok_or(FeedError::Json(err)),
    }
}

fn parse_value(value: &Value, unique_key: &str) -> Result<ParseOutcome, FeedError> {
    let mut outcome = ParseOutcome::default();
    match value {
        Value::Array(items) => collect(&mut outcome, items, unique_key),
        Value::Object(object) => match find_item_array(object) {
            Some(items) => collect(&mut outcome, items, unique_key),
            None => outcome.push_item(0, flatten_object(object), unique_key),
        },
        _ => return Err(FeedError::NoItems),
    }
    Ok(outcome)
}

fn collect(outcome: &mut ParseOutcome, items: &[Value], unique_key: &str) {
    for (index, item) in items.iter().enumerate() {
        match item.as_object() {
            Some(object) => outcome.push_item(index, flatten_object(object), unique_key),
            None => outcome.push_error(index, "item is not an object"),
        }
    }
}

/// Parse one JSON value per line. `None` when no line is valid JSON.
fn parse_ndjson(bytes: &[u8], unique_key: &str) -> Option<ParseOutcome> {
    let text = String::from_utf8_lossy(bytes);
    let mut outcome = ParseOutcome::default();
    let mut parsed_any = false;
    let lines = text.lines().filter(|l| !l.trim().is_empty());
    for (index, line) in lines.enumerate() {
        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(object)) => {
                parsed_any = true;
                outcome.push_item(index, flatten_object(&object), unique_key);
            }
            Ok(_) => {
                parsed_any = true;
                outcome.push_error(index, "item is not an object");
            }
            Err(err) => outcome.push_error(index, format!("invalid JSON line: {err}")),
        }
    }
    parsed_any.then_some(outcome)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::error::FeedError;
    use crate::format::FeedFormat;
    use crate::parse::parse_feed;

    #[test]
    fn test_wrapper_with_nested_values() {
        let doc = br#"{"meta":{"count":2},"products":[
            {"sku":"A1","price":{"amount":9.99}},
            {"sku":"A2","price":{"amount":1200}},
            "junk"
        ]}"#;
        let outcome = parse_feed(FeedFormat::Json, doc, "sku").unwrap();
        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.ok_count(), 2);
        assert_eq!(outcome.items[0].data["price.amount"], json!(9.99));
        assert_eq!(outcome.error_samples[0].index, 2);
    }

    #[test]
    fn test_numeric_ids() {
        let outcome = parse_feed(FeedFormat::Json, br#"[{"id":7},{"id":"  "}]"#, "id").unwrap();
        assert_eq!(outcome.items[0].external_id, "7");
        assert_eq!(outcome.errors, 1);
    }

    #[test]
    fn test_single_object_document() {
        let outcome = parse_feed(FeedFormat::Json, br#"{"sku":"ONLY"}"#, "sku").unwrap();
        assert_eq!(outcome.ok_count(), 1);
    }

    #[test]
    fn test_ndjson_with_bad_line() {
        let doc = b"{\"sku\":\"A1\"}\n{broken\n\n{\"sku\":\"A3\"}\n";
        let outcome = parse_feed(FeedFormat::Json, doc, "sku").unwrap();
        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.ok_count(), 2);
        assert_eq!(outcome.errors, 1);
    }

    #[test]
    fn test_unparseable_document_fails() {
        assert!(matches!(
            parse_feed(FeedFormat::Json, b"{\"a\": [1,", "a"),
            Err(FeedError::Json(_))
        ));
        assert!(matches!(
            parse_feed(FeedFormat::Json, b"42", "a"),
            Err(FeedError::NoItems)
        ));
    }
}

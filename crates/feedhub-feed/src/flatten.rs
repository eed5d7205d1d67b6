//! Dotted-key flattening of nested JSON objects.

use serde_json::Value;

use crate::FieldMap;

/// Maximum number of key segments produced by flattening.
pub const MAX_DEPTH: usize = 3;

/// Flatten nested objects into dotted keys, up to [`MAX_DEPTH`] segments.
///
/// Objects at the depth limit, arrays and empty objects are kept as values.
pub fn flatten_object(object: &FieldMap) -> FieldMap {
    let mut out = FieldMap::new();
    flatten_into(&mut out, None, object, 1);
    out
}

fn flatten_into(out: &mut FieldMap, prefix: Option<&str>, object: &FieldMap, depth: usize) {
    for (key, value) in object {
        let path = match prefix {
            Some(p) => format!("{p}.{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(inner) if !inner.is_empty() && depth < MAX_DEPTH => {
                flatten_into(out, Some(&path), inner, depth + 1);
            }
            other => {
                out.insert(path, other.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> FieldMap {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_flatten_nested() {
        let input = obj(json!({
            "sku": "A1",
            "price": {"amount": 9.99, "currency": "EUR"},
            "tags": ["x", "y"],
            "meta": {}
        }));
        let flat = flatten_object(&input);
        let keys: Vec<_> = flat.keys().cloned().collect();
        assert_eq!(keys, vec!["sku", "price.amount", "price.currency", "tags", "meta"]);
        assert_eq!(flat["price.amount"], json!(9.99));
    }

    #[test]
    fn test_depth_limit() {
        let input = obj(json!({"a": {"b": {"c": {"d": 1}}}}));
        let flat = flatten_object(&input);
        assert_eq!(flat["a.b.c"], json!({"d": 1}));
    }
}

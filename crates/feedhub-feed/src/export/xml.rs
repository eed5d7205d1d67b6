//! XML export.

use quick_xml::escape::escape;

use super::ExportRow;
use crate::coerce::value_to_text;

/// Render rows as `<products><product>…</product></products>`.
///
/// One child element per field; text is escaped for `& < > " '`.
pub fn render(fields: &[String], rows: &[ExportRow<'_>]) -> String {
    let names: Vec<String> = fields.iter().map(|f| element_name(f)).collect();
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<products>\n");
    for row in rows {
        out.push_str("  <product>\n");
        for (key, name) in fields.iter().zip(&names) {
            let text = row.data.get(key).map(value_to_text).unwrap_or_default();
            out.push_str(&format!("    <{name}>{}</{name}>\n", escape(text.as_str())));
        }
        out.push_str("  </product>\n");
    }
    out.push_str("</products>\n");
    out
}

/// Turn a field key into a valid XML element name.
///
/// Invalid characters become `_`; names not starting with a letter or
/// `_`, and names starting with the reserved `xml` prefix in any case,
/// are prefixed with `_`.
pub fn element_name(key: &str) -> String {
    let mut name: String = key
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    match name.chars().next() {
        None => "field".to_string(),
        Some(first)
            if (first.is_alphabetic() || first == '_')
                && !name.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("xml")) =>
        {
            name
        }
        Some(_) => {
            name.insert(0, '_');
            name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escaping() {
        let a = json!({"name": "Tom & Jerry's <\"best\">", "price": 3});
        let rows = [ExportRow { data: a.as_object().unwrap(), category_id: None }];
        let out = render(&["name".to_string(), "price".to_string()], &rows);
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(out.contains("<name>Tom &amp; Jerry&apos;s &lt;&quot;best&quot;&gt;</name>"));
        assert!(out.contains("<price>3</price>"));
        assert!(out.trim_end().ends_with("</products>"));
    }

    #[test]
    fn test_missing_value_is_empty_element() {
        let a = json!({});
        let rows = [ExportRow { data: a.as_object().unwrap(), category_id: None }];
        let out = render(&["sku".to_string()], &rows);
        assert!(out.contains("<sku></sku>"));
    }

    #[test]
    fn test_element_names() {
        assert_eq!(element_name("price.amount"), "price.amount");
        assert_eq!(element_name("g:id"), "g_id");
        assert_eq!(element_name("unit price"), "unit_price");
        assert_eq!(element_name("2nd"), "_2nd");
        assert_eq!(element_name("  "), "field");
        assert_eq!(element_name("xmlns"), "_xmlns");
        assert_eq!(element_name("XML_Id"), "_XML_Id");
        assert_eq!(element_name("xm"), "xm");
    }
}

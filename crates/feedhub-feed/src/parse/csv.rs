//! CSV ingestion parser.

use serde_json::Value;

use super::ParseOutcome;
use crate::FieldMap;
use crate::error::FeedError;
use crate::sniff::csv::detect_delimiter;
use crate::strip_bom;

pub(crate) fn parse(document: &[u8], unique_key: &str) -> Result<ParseOutcome, FeedError> {
    let bytes = strip_bom(document);
    let delimiter = detect_delimiter(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();

    let mut outcome = ParseOutcome::default();
    for (index, record) in reader.byte_records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                outcome.push_error(index, format!("malformed record: {err}"));
                continue;
            }
        };
        let mut data = FieldMap::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            if header.is_empty() || data.contains_key(header) {
                continue;
            }
            data.insert(
                header.clone(),
                Value::String(String::from_utf8_lossy(cell).into_owned()),
            );
        }
        outcome.push_item(index, data, unique_key);
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::format::FeedFormat;
    use crate::parse::parse_feed;

    #[test]
    fn test_quoted_thousands() {
        let doc = b"sku,price\nA1,9.99\nA2,\"1,200\"";
        let outcome = parse_feed(FeedFormat::Csv, doc, "sku").unwrap();
        assert_eq!(outcome.ok_count(), 2);
        assert_eq!(outcome.items[0].external_id, "A1");
        assert_eq!(outcome.items[1].data["price"], json!("1,200"));
    }

    #[test]
    fn test_semicolon_and_flexible_rows() {
        let doc = "\u{feff}id;name;stock\n1;Phone;3;extra\n2;Case\n";
        let outcome = parse_feed(FeedFormat::Csv, doc.as_bytes(), "id").unwrap();
        assert_eq!(outcome.ok_count(), 2);
        let first = &outcome.items[0].data;
        assert_eq!(first.len(), 3);
        assert_eq!(first["stock"], json!("3"));
        let second = &outcome.items[1].data;
        assert_eq!(second.get("stock"), None);
        assert_eq!(second["name"], json!("Case"));
    }

    #[test]
    fn test_unknown_unique_key_rejects_everything() {
        let outcome = parse_feed(FeedFormat::Csv, b"a,b\n1,2\n3,4\n", "sku").unwrap();
        assert_eq!(outcome.total, 2);
        assert_eq!(outcome.errors, 2);
        assert!(outcome.items.is_empty());
    }
}

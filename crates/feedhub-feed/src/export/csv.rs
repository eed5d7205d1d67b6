//! CSV export.

use super::ExportRow;
use crate::coerce::value_to_text;
use crate::error::FeedError;

/// Render rows as CSV with a header row of `fields`.
///
/// Cells are quoted only when they contain a comma, quote, CR or LF.
pub fn render(fields: &[String], rows: &[ExportRow<'_>]) -> Result<Vec<u8>, FeedError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(fields)?;
    for row in rows {
        writer.write_record(
            fields
                .iter()
                .map(|key| row.data.get(key).map(value_to_text).unwrap_or_default()),
        )?;
    }
    writer
        .into_inner()
        .map_err(|e| FeedError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldMap;
    use serde_json::{Value, json};

    fn data(v: Value) -> FieldMap {
        v.as_object().cloned().unwrap()
    }

    fn fields(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_quoting_and_missing_values() {
        let a = data(json!({"sku": "A1", "name": "Phone, \"Pro\"", "price": 9.99}));
        let b = data(json!({"sku": "A2", "price": 1200, "tags": ["x"]}));
        let rows = [
            ExportRow { data: &a, category_id: None },
            ExportRow { data: &b, category_id: None },
        ];
        let out = render(&fields(&["sku", "name", "price", "tags"]), &rows).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "sku,name,price,tags\nA1,\"Phone, \"\"Pro\"\"\",9.99,\nA2,,1200,\"[\"\"x\"\"]\"\n"
        );
    }

    #[test]
    fn test_quoted_cells_split_back() {
        let original = "line1\nline2, \"quoted\"";
        let a = data(json!({"v": original}));
        let out = render(&fields(&["v"]), &[ExportRow { data: &a, category_id: None }]).unwrap();
        let mut reader = csv::Reader::from_reader(out.as_slice());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], original);
    }
}

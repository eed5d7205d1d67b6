//! CSV header sniffing and delimiter detection.

use super::KeyCollector;
use crate::strip_bom;

/// Candidate delimiters, in tie-break order.
pub const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Read the header record of `sample` split on `delimiter`.
///
/// Quoted cells may span lines; cells are trimmed. A sample cut inside
/// the header yields the cells read so far.
pub fn read_header(sample: &[u8], delimiter: u8) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(strip_bom(sample));
    match reader.byte_headers() {
        Ok(headers) => headers
            .iter()
            .map(|h| String::from_utf8_lossy(h).into_owned())
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Pick the delimiter whose header record has the most fields.
///
/// Ties go to the earlier entry of [`DELIMITERS`]; a header with none of
/// them is treated as comma-separated.
pub fn detect_delimiter(sample: &[u8]) -> u8 {
    let mut best = DELIMITERS[0];
    let mut best_count = 0;
    for delimiter in DELIMITERS {
        let count = read_header(sample, delimiter).len();
        if count > best_count {
            best = delimiter;
            best_count = count;
        }
    }
    best
}

pub(crate) fn sniff(sample: &[u8], keys: &mut KeyCollector) {
    let delimiter = detect_delimiter(sample);
    for cell in read_header(sample, delimiter) {
        if !keys.push(&cell) {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FeedFormat;
    use crate::parse::parse_feed;
    use crate::sniff::sniff_keys;

    #[test]
    fn test_header_in_file_order() {
        let keys = sniff_keys(FeedFormat::Csv, b"sku,name,price,sku\nA1,Phone,9.99,A1\n", 200);
        assert_eq!(keys, vec!["sku", "name", "price"]);
    }

    #[test]
    fn test_delimiter_selection() {
        assert_eq!(detect_delimiter(b"a;b;c\n1;2;3"), b';');
        assert_eq!(detect_delimiter(b"a\tb\tc"), b'\t');
        assert_eq!(detect_delimiter(b"a|b|c,d"), b'|');
        assert_eq!(detect_delimiter(b"a,b;c"), b',');
        assert_eq!(detect_delimiter(b"single"), b',');
    }

    #[test]
    fn test_quoted_header_cells() {
        let keys = sniff_keys(
            FeedFormat::Csv,
            b"\xEF\xBB\xBF\"Product ID\";\"Name; short\";  Price \r\n1;x;2",
            200,
        );
        assert_eq!(keys, vec!["Product ID", "Name; short", "Price"]);
    }

    #[test]
    fn test_escaped_quotes() {
        assert_eq!(read_header(br#""say ""hi""",b"#, b','), vec![r#"say "hi""#, "b"]);
    }

    #[test]
    fn test_multiline_header_matches_parsed_keys() {
        let doc = b"sku,\"Product\nName\",price\nA1,Phone,9\n";
        let sniffed = sniff_keys(FeedFormat::Csv, doc, 200);
        let parsed = parse_feed(FeedFormat::Csv, doc, "sku").unwrap();
        let parsed_keys: Vec<String> = parsed.items[0].data.keys().cloned().collect();
        assert_eq!(sniffed, vec!["sku", "Product\nName", "price"]);
        assert_eq!(sniffed, parsed_keys);
    }

    #[test]
    fn test_empty_sample() {
        assert!(sniff_keys(FeedFormat::Csv, b"  \n\n", 200).is_empty());
    }
}

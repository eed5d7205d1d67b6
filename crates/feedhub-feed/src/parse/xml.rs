//! Streaming XML ingestion parser.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::Value;

use super::ParseOutcome;
use crate::FieldMap;
use crate::error::FeedError;
use crate::flatten::MAX_DEPTH;
use crate::sniff::xml::detect_item_tag;
use crate::strip_bom;

/// Bytes scanned to choose the item element.
const DETECT_WINDOW: usize = 1024 * 1024;

struct Frame {
    name: String,
    text: String,
    has_children: bool,
}

/// Accumulates one item element.
struct ItemBuilder {
    data: FieldMap,
    stack: Vec<Frame>,
    error: Option<String>,
}

impl ItemBuilder {
    fn new(start: &BytesStart<'_>) -> Self {
        let mut data = FieldMap::new();
        let mut error = None;
        for attr in start.attributes() {
            let value = attr
                .map_err(quick_xml::Error::from)
                .and_then(|a| Ok((element_name(a.key.as_ref()), a.unescape_value()?.into_owned())));
            match value {
                Ok((key, value)) => {
                    data.insert(format!("@{key}"), Value::String(value));
                }
                Err(err) => error = Some(format!("invalid attribute: {err}")),
            }
        }
        Self {
            data,
            stack: Vec::new(),
            error,
        }
    }

    fn open(&mut self, name: String) {
        if let Some(parent) = self.stack.last_mut() {
            parent.has_children = true;
        }
        self.stack.push(Frame {
            name,
            text: String::new(),
            has_children: false,
        });
    }

    fn text(&mut self, text: &str) {
        if let Some(frame) = self.stack.last_mut() {
            frame.text.push_str(text);
        }
    }

    /// Close the innermost open element. Returns `true` when that element
    /// was the item itself.
    fn close(&mut self) -> bool {
        let Some(frame) = self.stack.pop() else {
            return true;
        };
        if !frame.has_children {
            let key = self
                .stack
                .iter()
                .map(|f| f.name.as_str())
                .chain(std::iter::once(frame.name.as_str()))
                .take(MAX_DEPTH)
                .collect::<Vec<_>>()
                .join(".");
            insert_repeated(&mut self.data, key, Value::String(frame.text));
        }
        false
    }

    fn finish(self, outcome: &mut ParseOutcome, index: usize, unique_key: &str) {
        match self.error {
            Some(reason) => outcome.push_error(index, reason),
            None => outcome.push_item(index, self.data, unique_key),
        }
    }
}

/// Insert a value, turning repeated keys into arrays.
fn insert_repeated(data: &mut FieldMap, key: String, value: Value) {
    match data.get_mut(&key) {
        Some(Value::Array(values)) => values.push(value),
        Some(existing) => {
            let previous = existing.take();
            *existing = Value::Array(vec![previous, value]);
        }
        None => {
            data.insert(key, value);
        }
    }
}

fn element_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

pub(crate) fn parse(document: &[u8], unique_key: &str) -> Result<ParseOutcome, FeedError> {
    let bytes = strip_bom(document);
    let window = &bytes[..bytes.len().min(DETECT_WINDOW)];
    let item_tag = detect_item_tag(window).ok_or(FeedError::NoItems)?;

    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut outcome = ParseOutcome::default();
    let mut current: Option<ItemBuilder> = None;
    let mut index = 0usize;
    let mut buf = Vec::new();

    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(event) => event,
            Err(err) => {
                if outcome.total == 0 {
                    return Err(err.into());
                }
                if current.take().is_some() {
                    outcome.push_error(index, format!("malformed XML: {err}"));
                }
                outcome
                    .warnings
                    .push(format!("document truncated after {} items: {err}", outcome.total));
                break;
            }
        };

        match event {
            Event::Start(e) => {
                let name = element_name(e.name().as_ref());
                match current.as_mut() {
                    Some(item) => item.open(name),
                    None if name == item_tag => current = Some(ItemBuilder::new(&e)),
                    None => {}
                }
            }
            Event::Empty(e) => {
                let name = element_name(e.name().as_ref());
                match current.as_mut() {
                    Some(item) => {
                        item.open(name);
                        item.close();
                    }
                    None if name == item_tag => {
                        ItemBuilder::new(&e).finish(&mut outcome, index, unique_key);
                        index += 1;
                    }
                    None => {}
                }
            }
            Event::Text(t) => {
                if let Some(item) = current.as_mut() {
                    match t.unescape() {
                        Ok(text) => item.text(&text),
                        Err(err) => item.error = Some(format!("invalid text: {err}")),
                    }
                }
            }
            Event::CData(c) => {
                if let Some(item) = current.as_mut() {
                    item.text(&String::from_utf8_lossy(&c));
                }
            }
            Event::End(_) => {
                let finished = current.as_mut().is_some_and(ItemBuilder::close);
                if finished {
                    if let Some(item) = current.take() {
                        item.finish(&mut outcome, index, unique_key);
                        index += 1;
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if current.is_some() {
        if outcome.total == 0 {
            return Err(FeedError::Xml("unexpected end of document".to_string()));
        }
        outcome.push_error(index, "unexpected end of document");
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::error::FeedError;
    use crate::format::FeedFormat;
    use crate::parse::parse_feed;

    const CATALOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<catalog>
  <product id="A1">
    <name>Phone &amp; Case</name>
    <price currency="EUR">9.99</price>
    <images><image>a.jpg</image><image>b.jpg</image></images>
    <desc><![CDATA[<b>bold</b>]]></desc>
    <spec><dims><w>1</w></dims></spec>
  </product>
  <product id="A2"><name>Charger</name><empty/></product>
  <product><name>No id</name></product>
</catalog>"#;

    #[test]
    fn test_catalog_items() {
        let outcome = parse_feed(FeedFormat::Xml, CATALOG.as_bytes(), "@id").unwrap();
        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.ok_count(), 2);
        assert_eq!(outcome.errors, 1);

        let first = &outcome.items[0].data;
        assert_eq!(outcome.items[0].external_id, "A1");
        assert_eq!(first["name"], json!("Phone & Case"));
        assert_eq!(first["price"], json!("9.99"));
        assert_eq!(first["images.image"], json!(["a.jpg", "b.jpg"]));
        assert_eq!(first["desc"], json!("<b>bold</b>"));
        assert_eq!(first["spec.dims.w"], json!("1"));

        let second = &outcome.items[1].data;
        assert_eq!(second["empty"], json!(""));
    }

    #[test]
    fn test_child_element_as_key() {
        let doc = "<rss><channel><item><g:id>7</g:id></item><item><g:id>8</g:id></item></channel></rss>";
        let outcome = parse_feed(FeedFormat::Xml, doc.as_bytes(), "g:id").unwrap();
        let ids: Vec<_> = outcome.items.iter().map(|i| i.external_id.as_str()).collect();
        assert_eq!(ids, vec!["7", "8"]);
    }

    #[test]
    fn test_malformed_after_items_keeps_items() {
        let doc = "<items><item><id>1</id></item><item><id>2</oops></item></items>";
        let outcome = parse_feed(FeedFormat::Xml, doc.as_bytes(), "id").unwrap();
        assert_eq!(outcome.ok_count(), 1);
        assert_eq!(outcome.errors, 1);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_malformed_before_any_item_fails() {
        let doc = "<items><item><id>1</oops></item></items>";
        assert!(matches!(
            parse_feed(FeedFormat::Xml, doc.as_bytes(), "id"),
            Err(FeedError::Xml(_))
        ));
    }

    #[test]
    fn test_no_item_element() {
        assert!(matches!(
            parse_feed(FeedFormat::Xml, b"<root><a>1</a></root>", "a"),
            Err(FeedError::NoItems)
        ));
    }
}

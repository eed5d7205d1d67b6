//! Regex-based XML key sniffing.
//!
//! This is a tag scan, not a parse: it tolerates truncated samples and
//! never fails.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::KeyCollector;
use crate::strip_bom;

/// Item element names tried first, case-insensitively.
pub const PREFERRED_ITEM_TAGS: [&str; 6] = ["item", "product", "entry", "offer", "row", "record"];

static NOISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?-->|<!\[CDATA\[.*?\]\]>|<\?.*?\?>|<!DOCTYPE[^>]*>")
        .expect("valid noise pattern")
});

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(/?)([A-Za-z_][\w:.\-]*)((?:[^<>"']|"[^"]*"|'[^']*')*?)(/?)>"#)
        .expect("valid tag pattern")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][\w:.\-]*)\s*=\s*(?:"[^"]*"|'[^']*')"#).expect("valid attribute pattern")
});

/// A start, end or self-closing tag found by the scanner.
struct Tag<'a> {
    name: &'a str,
    attrs: &'a str,
    closing: bool,
    self_closing: bool,
}

fn scan_tags(text: &str) -> impl Iterator<Item = Tag<'_>> {
    TAG_RE.captures_iter(text).filter_map(|caps| {
        Some(Tag {
            name: caps.get(2)?.as_str(),
            attrs: caps.get(3).map_or("", |m| m.as_str()),
            closing: !caps.get(1)?.as_str().is_empty(),
            self_closing: !caps.get(4)?.as_str().is_empty(),
        })
    })
}

fn strip_noise(sample: &[u8]) -> String {
    let text = String::from_utf8_lossy(strip_bom(sample));
    NOISE_RE.replace_all(&text, " ").into_owned()
}

/// Choose the repeating item element of an XML document.
///
/// The first of [`PREFERRED_ITEM_TAGS`] present wins (matching any case,
/// returning the document's spelling). Otherwise the most frequent
/// element occurring more than once, earliest first on ties.
pub fn detect_item_tag(sample: &[u8]) -> Option<String> {
    let text = strip_noise(sample);
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for tag in scan_tags(&text).filter(|t| !t.closing) {
        let count = counts.entry(tag.name).or_insert(0);
        if *count == 0 {
            order.push(tag.name);
        }
        *count += 1;
    }

    for preferred in PREFERRED_ITEM_TAGS {
        if let Some(name) = order.iter().find(|n| n.eq_ignore_ascii_case(preferred)) {
            return Some((*name).to_string());
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for name in &order {
        let count = counts.get(name).copied().unwrap_or(0);
        if count > 1 && best.is_none_or(|(_, c)| count > c) {
            best = Some((*name, count));
        }
    }
    best.map(|(name, _)| name.to_string())
}

pub(crate) fn sniff(sample: &[u8], keys: &mut KeyCollector) {
    let Some(item_tag) = detect_item_tag(sample) else {
        return;
    };
    let text = strip_noise(sample);
    let mut tags = scan_tags(&text).skip_while(|t| t.closing || t.name != item_tag);

    let Some(item) = tags.next() else {
        return;
    };
    for attr in ATTR_RE.captures_iter(item.attrs) {
        if !keys.push(&format!("@{}", &attr[1])) {
            return;
        }
    }
    if item.self_closing {
        return;
    }

    let mut depth = 0usize;
    for tag in tags {
        if tag.closing {
            if depth == 0 {
                break;
            }
            depth -= 1;
            continue;
        }
        if depth == 0 && !keys.push(tag.name) {
            return;
        }
        if !tag.self_closing {
            depth += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FeedFormat;
    use crate::sniff::sniff_keys;

    fn sniff_str(s: &str) -> Vec<String> {
        sniff_keys(FeedFormat::Xml, s.as_bytes(), 200)
    }

    #[test]
    fn test_preferred_item_tag() {
        let doc = r#"<?xml version="1.0"?>
            <catalog><Product id="1" status='new'><sku>A1</sku><price currency="EUR">9.99</price>
            <images><image>a.jpg</image><image>b.jpg</image></images><flag/></Product>
            <Product id="2"><sku>A2</sku></Product></catalog>"#;
        assert_eq!(detect_item_tag(doc.as_bytes()).as_deref(), Some("Product"));
        assert_eq!(
            sniff_str(doc),
            vec!["@id", "@status", "sku", "price", "images", "flag"]
        );
    }

    #[test]
    fn test_most_frequent_tag_fallback() {
        let doc = "<feed><article><ref>1</ref></article><article><ref>2</ref></article></feed>";
        assert_eq!(detect_item_tag(doc.as_bytes()).as_deref(), Some("article"));
        assert_eq!(sniff_str(doc), vec!["ref"]);
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let doc = "<a><b/><c/><b/><c/></a>";
        assert_eq!(detect_item_tag(doc.as_bytes()).as_deref(), Some("b"));
    }

    #[test]
    fn test_truncated_sample() {
        let doc = "<rss><channel><item><title>T</title><g:id>1</g:id><link>http://x";
        assert_eq!(sniff_str(doc), vec!["title", "g:id", "link"]);
    }

    #[test]
    fn test_ignores_comments_and_cdata() {
        let doc = "<items><!-- <bogus/> --><item><name><![CDATA[<b>bold</b>]]></name></item></items>";
        assert_eq!(sniff_str(doc), vec!["name"]);
    }

    #[test]
    fn test_no_repeating_tag() {
        assert!(sniff_str("<root><only>1</only></root>").is_empty());
        assert!(sniff_str("plain text").is_empty());
    }
}

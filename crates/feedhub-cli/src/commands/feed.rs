//! Local feed inspection: key sniffing and parse previews.

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use feedhub_core::config::AppConfig;
use feedhub_core::error::AppError;
use feedhub_feed::format::detect_feed_type;
use feedhub_feed::parse::parse_feed;
use feedhub_feed::sniff::sniff_keys;
use feedhub_feed::FeedFormat;

/// Arguments for the sniff command
#[derive(Debug, Args)]
pub struct SniffArgs {
    /// Feed file to inspect
    pub file: PathBuf,
    /// Force a feed format instead of detecting it
    #[arg(long = "feed-type")]
    pub feed_type: Option<FeedFormat>,
}

/// Arguments for the preview command
#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Feed file to parse
    pub file: PathBuf,
    /// Source key holding each item's unique identifier
    #[arg(long)]
    pub unique_key: String,
    /// Force a feed format instead of detecting it
    #[arg(long = "feed-type")]
    pub feed_type: Option<FeedFormat>,
    /// Number of items to show
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

#[derive(Debug, Serialize, Tabled)]
struct KeyRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Key")]
    key: String,
}

#[derive(Debug, Serialize, Tabled)]
struct ItemRow {
    #[tabled(rename = "External ID")]
    external_id: String,
    #[tabled(rename = "Fields")]
    fields: usize,
    #[tabled(rename = "Data")]
    data: String,
}

fn read_feed(path: &Path) -> Result<Vec<u8>, AppError> {
    std::fs::read(path).map_err(|e| {
        AppError::validation(format!("Cannot read '{}': {e}", path.display()))
    })
}

fn resolve_format(path: &Path, forced: Option<FeedFormat>, bytes: &[u8]) -> FeedFormat {
    forced.unwrap_or_else(|| detect_feed_type(path.to_str(), None, Some(bytes)))
}

/// List the keys found in the head of a feed file
pub fn sniff(args: &SniffArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let bytes = read_feed(&args.file)?;
    let feed_type = resolve_format(&args.file, args.feed_type, &bytes);
    let sample = &bytes[..bytes.len().min(config.feed.sample_bytes)];
    let keys = sniff_keys(feed_type, sample, config.feed.sniff_key_limit);

    if format == OutputFormat::Table {
        output::print_kv("Feed type", feed_type.as_str());
        output::print_kv("Keys", &keys.len().to_string());
        println!();
    }
    let rows: Vec<KeyRow> = keys
        .into_iter()
        .enumerate()
        .map(|(i, key)| KeyRow { position: i + 1, key })
        .collect();
    output::print_list(&rows, format);
    Ok(())
}

/// Parse a feed file and show its first items
pub fn preview(args: &PreviewArgs, format: OutputFormat) -> Result<(), AppError> {
    let bytes = read_feed(&args.file)?;
    let feed_type = resolve_format(&args.file, args.feed_type, &bytes);
    let outcome = parse_feed(feed_type, &bytes, &args.unique_key)?;

    if format == OutputFormat::Table {
        output::print_kv("Feed type", feed_type.as_str());
        output::print_kv("Items", &outcome.total.to_string());
        output::print_kv("Parsed", &outcome.ok_count().to_string());
        output::print_kv("Errors", &outcome.errors.to_string());
        println!();
    }

    let rows: Vec<ItemRow> = outcome
        .items
        .iter()
        .take(args.limit)
        .map(|item| ItemRow {
            external_id: item.external_id.clone(),
            fields: item.data.len(),
            data: output::truncate(&serde_json::Value::Object(item.data.clone()).to_string(), 80),
        })
        .collect();
    output::print_list(&rows, format);

    for warning in &outcome.warnings {
        output::print_warning(warning);
    }
    for sample in &outcome.error_samples {
        output::print_warning(&format!("item {}: {}", sample.index, sample.reason));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_resolve_format_prefers_forced_type() {
        let path = Path::new("feed.csv");
        assert_eq!(resolve_format(path, Some(FeedFormat::Json), b"a,b\n"), FeedFormat::Json);
        assert_eq!(resolve_format(path, None, b"a,b\n1,2\n"), FeedFormat::Csv);
    }

    #[test]
    fn test_read_feed_missing_file_is_validation_error() {
        let err = read_feed(Path::new("/nonexistent/feed.xml")).unwrap_err();
        assert_eq!(err.kind, feedhub_core::error::ErrorKind::Validation);
    }

    #[test]
    fn test_preview_reads_temp_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"[{{"sku":"A1","name":"Widget"}}]"#).unwrap();
        let args = PreviewArgs {
            file: file.path().to_path_buf(),
            unique_key: "sku".into(),
            feed_type: None,
            limit: 5,
        };
        assert!(preview(&args, OutputFormat::Json).is_ok());
    }
}

//! Output formatting.

use chrono::{Local, TimeZone};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use rust_i18n::t;
use serde::Serialize;

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table format
    Table,
    /// JSON format
    Json,
    /// Token-oriented object notation
    Toon,
    /// Plain text format
    #[default]
    Plain,
}

impl OutputFormat {
    pub fn is_plain(self) -> bool {
        matches!(self, OutputFormat::Plain)
    }
}

/// Trait for plain text output.
pub trait PlainPrint {
    /// Print as plain text with formatting.
    fn plain_print(&self);
}

/// Trait for table row generation.
pub trait TableRow {
    /// Get table headers.
    fn headers() -> Vec<&'static str>;
    /// Get row data as strings.
    fn row(&self) -> Vec<String>;
}

/// Print items in plain text format.
pub fn print_plain<T: PlainPrint>(items: &[T]) {
    if items.is_empty() {
        println!("{}", t!("no_results"));
        return;
    }
    for item in items {
        item.plain_print();
    }
}

/// Format a millisecond timestamp for display.
pub fn format_time(timestamp_ms: i64) -> String {
    if timestamp_ms == 0 {
        return "-".to_string();
    }

    match Local.timestamp_millis_opt(timestamp_ms).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

/// Format a millisecond timestamp relative to now.
pub fn format_relative_time(timestamp_ms: i64) -> String {
    if timestamp_ms == 0 {
        return "-".to_string();
    }

    let diff = (Local::now().timestamp_millis() - timestamp_ms) / 1000;

    if diff < 60 {
        format!("{}s ago", diff.max(0))
    } else if diff < 3600 {
        format!("{}m ago", diff / 60)
    } else if diff < 86400 {
        format!("{}h {}m ago", diff / 3600, (diff % 3600) / 60)
    } else if diff < 2592000 {
        format!("{}d {}h ago", diff / 86400, (diff % 86400) / 3600)
    } else {
        format_time(timestamp_ms)
    }
}

/// Five-star rendering of an average.
pub fn stars(average: f64) -> String {
    let filled = average.round().clamp(0.0, 5.0) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

fn print_encoded<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> bool {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
            true
        }
        OutputFormat::Toon => {
            let json_value = serde_json::to_value(value).unwrap_or_default();
            println!("{}", toon_format::encode_default(&json_value).unwrap_or_default());
            true
        }
        OutputFormat::Table | OutputFormat::Plain => false,
    }
}

/// Print a table of items with proper formatting for each output mode.
pub fn print_table<T: TableRow + Serialize + PlainPrint>(items: Vec<T>, format: OutputFormat) {
    if print_encoded(&items, format) {
        return;
    }
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("{}", t!("no_results"));
                return;
            }
            let mut table = Table::new();
            table.load_preset(UTF8_FULL_CONDENSED);
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(T::headers());
            for item in &items {
                table.add_row(item.row());
            }
            println!("{table}");
        }
        _ => print_plain(&items),
    }
}

/// Print one item.
pub fn print_item<T: Serialize + PlainPrint>(item: &T, format: OutputFormat) {
    if !print_encoded(item, format) {
        item.plain_print();
    }
}

/// Print a value that has no plain rendering.
pub fn print_value<T: Serialize + ?Sized>(value: &T, format: OutputFormat) {
    if !print_encoded(value, format) {
        println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
    }
}

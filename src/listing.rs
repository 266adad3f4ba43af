//! Sorting and text rendering for directory listings.
//!
//! Both views are derived independently from the already-sorted entry
//! sequence: a column-aligned table with truncated names, and a manifest
//! of full names for copy/paste.

use crate::models::DirectoryEntry;

const NAME_WIDTH: usize = 40;
const RULE_WIDTH: usize = 80;

/// Stable sort: directories before files, then case-insensitive name order.
/// Entries with equal keys keep their original relative order.
pub fn sort_entries(entries: &mut [DirectoryEntry]) {
    entries.sort_by_key(|e| (!e.is_directory, e.name.to_lowercase()));
}

/// Human-readable size with 1024-based units and one decimal place.
pub fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size < KB {
        format!("{} B", size)
    } else if size < MB {
        format!("{:.1} KB", size as f64 / KB as f64)
    } else if size < GB {
        format!("{:.1} MB", size as f64 / MB as f64)
    } else {
        format!("{:.1} GB", size as f64 / GB as f64)
    }
}

/// Names longer than the column render as their first 37 characters plus
/// an ellipsis marker, keeping the display width at exactly 40.
fn truncate_name(name: &str) -> String {
    if name.chars().count() > NAME_WIDTH {
        let head: String = name.chars().take(NAME_WIDTH - 3).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

fn type_label(entry: &DirectoryEntry) -> &'static str {
    if entry.is_directory {
        "DIR"
    } else {
        "FILE"
    }
}

/// Aligned table view: title, column headers, one row per entry, item count.
pub fn render_table(url: &str, entries: &[DirectoryEntry]) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str(&format!("Listing contents of: {}\n", url));
    out.push_str(&rule);
    out.push('\n');

    out.push_str(&format!(
        "{:<4} {:<width$} {:<10} {:<19}\n",
        "Type",
        "Name",
        "Size",
        "Modified",
        width = NAME_WIDTH
    ));
    out.push_str(&format!(
        "{} {} {} {}\n",
        "-".repeat(4),
        "-".repeat(NAME_WIDTH),
        "-".repeat(10),
        "-".repeat(19)
    ));

    for entry in entries {
        let size = if entry.is_directory {
            "-".to_string()
        } else {
            format_size(entry.size_bytes)
        };
        out.push_str(&format!(
            "{:<4} {:<width$} {:<10} {}\n",
            type_label(entry),
            truncate_name(&entry.name),
            size,
            entry.modified_at,
            width = NAME_WIDTH
        ));
    }

    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!("Total: {} items\n", entries.len()));
    out
}

/// Full-name manifest view: one `TYPE: name` line per entry, untruncated.
pub fn render_manifest(entries: &[DirectoryEntry]) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push('\n');
    out.push_str("Full filenames (for download references):\n");
    out.push_str(&rule);
    out.push('\n');

    for entry in entries {
        out.push_str(&format!("{}: {}\n", type_label(entry), entry.name));
    }

    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!("Total: {} items\n", entries.len()));
    out
}

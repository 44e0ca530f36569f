//! Text formatting of history entries for terminal output.

use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};

use crate::entry::Entry;

/// Format used when listing entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFormat {
    /// One entry per line.
    #[default]
    Plain,
    /// Aligned columns with a header.
    Table,
    /// A JSON array in the persisted layout.
    Json,
}

/// Width the text column is cut to in table output.
const TABLE_TEXT_WIDTH: usize = 48;

/// Format an instant in the local time zone.
#[must_use]
pub fn local_time(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// One-line summary: `#id  time  text`, with `(edited)` for edited entries.
#[must_use]
pub fn entry_line(entry: &Entry) -> String {
    let mut line = format!(
        "#{:<4} {}  {}",
        entry.id,
        local_time(entry.timestamp),
        single_line(&entry.text)
    );
    if entry.is_edited() {
        line.push_str("  (edited)");
    }
    line
}

/// Multi-line description of one entry.
#[must_use]
pub fn entry_details(entry: &Entry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Entry #{}", entry.id);
    let _ = writeln!(out, "  Text:     {}", entry.text);
    let _ = writeln!(out, "  Created:  {}", local_time(entry.created_at()));
    if entry.is_edited() {
        let _ = writeln!(out, "  Edited:   {}", local_time(entry.timestamp));
    }
    out
}

/// Render a list of entries in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_entries(entries: &[Entry], format: ListFormat) -> serde_json::Result<String> {
    match format {
        ListFormat::Json => serde_json::to_string_pretty(entries),
        ListFormat::Plain => Ok(entries.iter().fold(String::new(), |mut out, entry| {
            let _ = writeln!(out, "{}", entry_line(entry));
            out
        })),
        ListFormat::Table => Ok(table(entries)),
    }
}

fn table(entries: &[Entry]) -> String {
    let id_width = entries
        .iter()
        .map(|e| e.id.to_string().len())
        .max()
        .unwrap_or(0)
        .max(2);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<id_width$}  {:<19}  {:<19}  TEXT",
        "ID", "CREATED", "UPDATED"
    );
    for entry in entries {
        let _ = writeln!(
            out,
            "{:<id_width$}  {}  {}  {}",
            entry.id,
            local_time(entry.created_at()),
            local_time(entry.timestamp),
            truncate(&single_line(&entry.text), TABLE_TEXT_WIDTH)
        );
    }
    out
}

/// Collapse line breaks so an entry fits on one line.
fn single_line(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join(" ⏎ ")
}

/// Cut `text` to at most `max` characters, marking the cut with `…`.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryId;

    fn entry(id: u64, text: &str) -> Entry {
        Entry::new(EntryId::new(id), text.to_string())
    }

    #[test]
    fn test_entry_line() {
        let line = entry_line(&entry(3, "hello"));
        assert!(line.starts_with("#3"));
        assert!(line.ends_with("hello"));
        assert!(!line.contains("(edited)"));
    }

    #[test]
    fn test_entry_line_marks_edits() {
        let mut e: Entry =
            serde_json::from_str(r#"{"id":1,"text":"a","timestamp":"2024-05-01T10:00:00Z"}"#)
                .unwrap();
        e.replace_text("b".to_string());
        assert!(entry_line(&e).contains("(edited)"));
    }

    #[test]
    fn test_entry_line_flattens_newlines() {
        let line = entry_line(&entry(1, "first\nsecond"));
        assert!(!line.contains('\n'));
        assert!(line.contains("first ⏎ second"));
    }

    #[test]
    fn test_entry_details() {
        let details = entry_details(&entry(5, "https://example.com"));
        assert!(details.contains("Entry #5"));
        assert!(details.contains("https://example.com"));
        assert!(details.contains("Created:"));
        assert!(!details.contains("Edited:"));
    }

    #[test]
    fn test_format_plain() {
        let entries = vec![entry(2, "world"), entry(1, "hello")];
        let out = format_entries(&entries, ListFormat::Plain).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("world"));
        assert!(lines[1].contains("hello"));
    }

    #[test]
    fn test_format_table() {
        let entries = vec![entry(12, &"x".repeat(100))];
        let out = format_entries(&entries, ListFormat::Table).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].starts_with("12"));
        assert!(lines[1].ends_with('…'));
    }

    #[test]
    fn test_format_json_round_trips() {
        let entries = vec![entry(2, "world"), entry(1, "hello")];
        let out = format_entries(&entries, ListFormat::Json).unwrap();
        let back: Vec<Entry> = serde_json::from_str(&out).unwrap();
        assert_eq!(back, entries);
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_entries(&[], ListFormat::Plain).unwrap(), "");
        assert_eq!(format_entries(&[], ListFormat::Json).unwrap(), "[]");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("世界世界世界", 3), "世界…");
    }
}

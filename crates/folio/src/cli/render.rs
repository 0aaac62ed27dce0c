//! Terminal output. Every function returns a `String`; printing happens in
//! the handlers.

use chrono::{DateTime, Utc};
use console::style;
use folioapp::api::{Dashboard, SeedReport};
use folioapp::config::FolioConfig;
use folioapp::store::Collection;
use serde_json::Value;
use std::fmt::Write;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 16;
const ID_WIDTH: usize = 10;
const FEATURED_MARKER: &str = "★";

/// Fields tried, in order, to label a record in a listing.
const LABEL_FIELDS: [&str; 5] = ["title", "name", "siteName", "email", "company"];

fn label(record: &Value) -> String {
    LABEL_FIELDS
        .iter()
        .find_map(|field| record.get(*field).and_then(Value::as_str))
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("(untitled)")
        .to_string()
}

fn updated_at(record: &Value) -> Option<DateTime<Utc>> {
    record
        .get("updatedAt")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn records(collection: Collection, records: &[Value], now: DateTime<Utc>) -> String {
    if records.is_empty() {
        return format!("No {} found.\n", collection);
    }

    let mut out = String::new();
    for (i, record) in records.iter().enumerate() {
        let idx = format!("{:>3}. ", i + 1);
        let id = record.get("id").and_then(Value::as_str).unwrap_or("?");
        let id = truncate_to_width(id, ID_WIDTH);
        let id_padding = ID_WIDTH.saturating_sub(id.width());

        let featured = record.get("featured").and_then(Value::as_bool) == Some(true);
        let marker = if featured { FEATURED_MARKER } else { " " };

        let time = updated_at(record)
            .map(|at| format_time_ago(at, now))
            .unwrap_or_default();

        let fixed = idx.width() + ID_WIDTH + 1 + marker.width() + 1 + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed);
        let title = truncate_to_width(&label(record), available);
        let padding = available.saturating_sub(title.width());

        let _ = writeln!(
            out,
            "{}{}{} {} {}{}{:>width$}",
            idx,
            style(&id).dim(),
            " ".repeat(id_padding),
            style(marker).yellow(),
            title,
            " ".repeat(padding),
            style(time).dim(),
            width = TIME_WIDTH
        );
    }
    out
}

pub fn seed_report(report: &SeedReport) -> String {
    if report.total_written() == 0 {
        return "Nothing to seed: every collection already has content.\n".to_string();
    }
    let mut out = String::new();
    for entry in &report.entries {
        let line = match (entry.created, entry.updated) {
            (0, 0) => style(format!("  {:<18} kept", entry.collection))
                .dim()
                .to_string(),
            (created, 0) => style(format!("  {:<18} +{}", entry.collection, created))
                .green()
                .to_string(),
            (_, updated) => style(format!("  {:<18} ~{}", entry.collection, updated))
                .yellow()
                .to_string(),
        };
        let _ = writeln!(out, "{}", line);
    }
    out
}

pub fn dashboard(stats: &Dashboard) -> String {
    let check = |configured: bool| {
        if configured {
            style("set").green().to_string()
        } else {
            style("missing").red().to_string()
        }
    };
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Projects          {} ({} featured, {} regular)",
        stats.projects.total, stats.projects.featured, stats.projects.regular
    );
    let _ = writeln!(out, "Experiences       {}", stats.experiences);
    let _ = writeln!(out, "Skill categories  {}", stats.skill_categories);
    let _ = writeln!(out, "Personal info     {}", check(stats.configured.personal_info));
    let _ = writeln!(out, "About             {}", check(stats.configured.about_info));
    let _ = writeln!(out, "Contact           {}", check(stats.configured.contact_info));
    let _ = writeln!(out, "Site settings     {}", check(stats.configured.site_settings));
    out
}

pub fn config(config: &FolioConfig) -> String {
    let timeout = config
        .backend_timeout_ms
        .map(|ms| format!("{ms} ms"))
        .unwrap_or_else(|| "none".to_string());
    let admins = if config.admin_emails.is_empty() {
        style("(none)").dim().to_string()
    } else {
        config.admin_emails.join(", ")
    };

    let mut out = String::new();
    let _ = writeln!(out, "data_dir            = {}", config.data_dir().display());
    let _ = writeln!(out, "backend             = {}", config.backend);
    let _ = writeln!(out, "bind                = {}", config.bind);
    let _ = writeln!(out, "admin_emails        = {}", admins);
    let _ = writeln!(out, "identity_header     = {}", config.identity_header);
    let _ = writeln!(out, "backend_timeout_ms  = {}", timeout);
    out
}

fn format_time_ago(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - at).to_std().unwrap_or_default();
    Formatter::new().convert(elapsed)
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use folioapp::api::SeedEntry;
    use serde_json::json;

    #[test]
    fn truncation_respects_display_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        let cut = truncate_to_width("日本語のタイトル", 7);
        assert!(cut.ends_with('…'));
        assert!(cut.width() <= 7);
    }

    #[test]
    fn listing_shows_label_and_age() {
        let now = Utc::now();
        let record = json!({
            "id": "0f9c2a4e-aaaa-bbbb-cccc-000000000000",
            "title": "My Project",
            "featured": true,
            "updatedAt": (now - Duration::hours(2)).to_rfc3339(),
        });
        let out = records(Collection::Projects, &[record], now);
        assert!(out.contains("My Project"));
        assert!(out.contains("2 hours ago"));
        assert!(out.contains(FEATURED_MARKER));
    }

    #[test]
    fn empty_listing_says_so() {
        assert_eq!(
            records(Collection::Experiences, &[], Utc::now()),
            "No experiences found.\n"
        );
    }

    #[test]
    fn labels_fall_back_through_known_fields() {
        assert_eq!(label(&json!({"siteName": "Site"})), "Site");
        assert_eq!(label(&json!({"name": "  ", "email": "a@b.c"})), "(untitled)");
        assert_eq!(label(&json!({})), "(untitled)");
    }

    #[test]
    fn seed_report_lists_changes() {
        let report = SeedReport {
            entries: vec![SeedEntry {
                collection: Collection::Projects,
                created: 2,
                updated: 0,
            }],
        };
        assert!(seed_report(&report).contains("+2"));
        assert!(seed_report(&SeedReport::default()).starts_with("Nothing to seed"));
    }
}

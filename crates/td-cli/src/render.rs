//! Report rendering: Markdown, HTML, CSV and JSON.

use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use td_core::{Entry, Timeline};

/// Output format of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Bulleted Markdown list.
    #[default]
    Md,
    /// Standalone HTML page.
    Html,
    /// `date,time,source,summary` rows.
    Csv,
    /// Array of `{date, time, source, summary}` records.
    Json,
}

impl Format {
    /// File extension for saved reports.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Md => "md",
            Self::Html => "html",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Renders `timeline` in `format`. `generated_at` only appears in HTML.
pub fn render(
    format: Format,
    timeline: &Timeline,
    generated_at: NaiveDateTime,
) -> serde_json::Result<String> {
    match format {
        Format::Md => Ok(markdown(timeline)),
        Format::Html => Ok(html(timeline, generated_at)),
        Format::Csv => Ok(csv(timeline)),
        Format::Json => json(timeline),
    }
}

fn title(timeline: &Timeline) -> String {
    format!("{} Activity", timeline.date_label())
}

/// One bullet per entry: `- HH:MM · summary (source)`.
pub fn markdown(timeline: &Timeline) -> String {
    let mut lines = vec![format!("# {}", title(timeline))];
    if timeline.is_empty() {
        lines.push(
            "- (no entries) Use --add, --notes, or --git/--svn/--discover, \
             on the command line or in the config file."
                .to_string(),
        );
    }
    lines.extend(timeline.entries().iter().map(|entry| {
        format!(
            "- {} · {} ({})",
            entry.time_label(),
            entry.summary(),
            entry.source()
        )
    }));
    lines.join("\n") + "\n"
}

const STYLE: &str = "
body{font-family:system-ui,-apple-system,Segoe UI,Roboto,sans-serif;margin:24px;background:#f7f8fa;color:#1f2937}
.wrap{max-width:860px;margin:0 auto}
h1{font-size:22px;margin:0 0 16px}
.item{display:flex;align-items:center;gap:10px;background:#fff;border:1px solid #e5e7eb;border-radius:10px;padding:10px 12px;margin:8px 0;box-shadow:0 1px 2px rgba(0,0,0,.04)}
.time{font-weight:600;color:#2563eb;min-width:52px}
.summary{flex:1}
.badge{font-size:12px;padding:2px 8px;border-radius:999px;background:#eef2ff;color:#3730a3;border:1px solid #c7d2fe}
.badge.git{background:#ecfdf5;color:#065f46;border-color:#a7f3d0}
.badge.svn{background:#fff7ed;color:#9a3412;border-color:#fed7aa}
.badge.note,.badge.manual{background:#f1f5f9;color:#0f172a;border-color:#e2e8f0}
footer{margin-top:16px;font-size:12px;color:#6b7280}
";

/// Standalone HTML page with one row per entry.
pub fn html(timeline: &Timeline, generated_at: NaiveDateTime) -> String {
    let title = escape_html(&title(timeline));
    let rows = if timeline.is_empty() {
        r#"<div class="item"><div class="summary">(no entries)</div></div>"#.to_string()
    } else {
        timeline.entries().iter().map(html_row).collect()
    };
    let generated = generated_at.format("%Y-%m-%d %H:%M");

    format!(
        "<!doctype html>
<html lang=en>
<meta charset=utf-8>
<meta name=viewport content=\"width=device-width,initial-scale=1\">
<title>{title}</title>
<style>{STYLE}</style>
<body><div class=wrap>
<h1>{title}</h1>
{rows}
<footer>Generated {generated}</footer>
</div></body>
</html>"
    )
}

fn html_row(entry: &Entry) -> String {
    format!(
        r#"<div class="item"><div class="time">{}</div><div class="summary">{}</div><div><span class="badge {}">{}</span></div></div>"#,
        entry.time_label(),
        escape_html(entry.summary()),
        entry.source().kind(),
        escape_html(&entry.source().to_string()),
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// `date,time,source,summary` with source and summary always quoted.
pub fn csv(timeline: &Timeline) -> String {
    let date = timeline.date_label();
    let mut lines = vec!["date,time,source,summary".to_string()];
    lines.extend(timeline.entries().iter().map(|entry| {
        format!(
            "{date},{},{},{}",
            entry.time_label(),
            quote_csv(&entry.source().to_string()),
            quote_csv(entry.summary())
        )
    }));
    lines.join("\n") + "\n"
}

fn quote_csv(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// A report row as emitted in JSON.
#[derive(Debug, Serialize)]
struct Record<'a> {
    date: &'a str,
    time: String,
    source: String,
    summary: &'a str,
}

/// Pretty-printed array of records.
pub fn json(timeline: &Timeline) -> serde_json::Result<String> {
    let date = timeline.date_label();
    let records: Vec<Record<'_>> = timeline
        .entries()
        .iter()
        .map(|entry| Record {
            date: &date,
            time: entry.time_label(),
            source: entry.source().to_string(),
            summary: entry.summary(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&records)? + "\n")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use insta::assert_snapshot;
    use td_core::{Source, TimeRange};

    use super::*;

    fn range() -> TimeRange {
        TimeRange::for_date(NaiveDate::from_ymd_opt(2025, 9, 20).unwrap())
    }

    fn sample() -> Timeline {
        let at = |h, m| range().date().and_hms_opt(h, m, 0).unwrap();
        Timeline::merge(
            range(),
            [vec![
                Entry::new(at(9, 15), Source::Git("shop".into()), "fix bug"),
                Entry::new(at(14, 0), Source::Manual, "reviewed \"PR\" <42> & more"),
            ]],
        )
    }

    fn empty() -> Timeline {
        Timeline::merge(range(), Vec::<Vec<Entry>>::new())
    }

    #[test]
    fn test_markdown_lists_entries() {
        assert_snapshot!(markdown(&sample()), @r#"
# 2025-09-20 Activity
- 09:15 · fix bug (git:shop)
- 14:00 · reviewed "PR" <42> & more (manual)
"#);
    }

    #[test]
    fn test_markdown_empty_has_hint() {
        let output = markdown(&empty());
        assert!(output.starts_with("# 2025-09-20 Activity\n- (no entries)"));
        assert!(output.contains("--git/--svn/--discover"));
    }

    #[test]
    fn test_csv_quotes_source_and_summary() {
        assert_snapshot!(csv(&sample()), @r#"
date,time,source,summary
2025-09-20,09:15,"git:shop","fix bug"
2025-09-20,14:00,"manual","reviewed ""PR"" <42> & more"
"#);
    }

    #[test]
    fn test_csv_empty_is_header_only() {
        assert_eq!(csv(&empty()), "date,time,source,summary\n");
    }

    #[test]
    fn test_json_records() {
        assert_snapshot!(json(&sample()).unwrap(), @r#"
[
  {
    "date": "2025-09-20",
    "time": "09:15",
    "source": "git:shop",
    "summary": "fix bug"
  },
  {
    "date": "2025-09-20",
    "time": "14:00",
    "source": "manual",
    "summary": "reviewed \"PR\" <42> & more"
  }
]
"#);
    }

    #[test]
    fn test_json_keeps_non_ascii() {
        let at = range().date().and_hms_opt(10, 0, 0).unwrap();
        let entry = Entry::new(at, Source::Note, "크래시 분석");
        let timeline = Timeline::merge(range(), [vec![entry]]);
        assert!(json(&timeline).unwrap().contains("크래시 분석"));
    }

    #[test]
    fn test_html_escapes_and_badges() {
        let generated = range().date().and_hms_opt(18, 30, 0).unwrap();
        let output = html(&sample(), generated);
        assert!(output.starts_with("<!doctype html>"));
        assert!(output.contains("<title>2025-09-20 Activity</title>"));
        assert!(output.contains("reviewed \"PR\" &lt;42&gt; &amp; more"));
        assert!(output.contains(r#"<span class="badge git">git:shop</span>"#));
        assert!(output.contains(r#"<span class="badge manual">manual</span>"#));
        assert!(output.contains("<footer>Generated 2025-09-20 18:30</footer>"));
    }

    #[test]
    fn test_html_empty() {
        let generated = range().date().and_hms_opt(18, 30, 0).unwrap();
        assert!(html(&empty(), generated).contains("(no entries)"));
    }

    #[test]
    fn test_render_dispatches_on_format() {
        let generated = range().date().and_hms_opt(18, 30, 0).unwrap();
        let timeline = sample();
        assert!(render(Format::Csv, &timeline, generated).unwrap().starts_with("date,"));
        assert!(render(Format::Json, &timeline, generated).unwrap().starts_with('['));
        assert!(render(Format::Md, &timeline, generated).unwrap().starts_with('#'));
        assert!(render(Format::Html, &timeline, generated).unwrap().starts_with("<!doctype"));
    }

    #[test]
    fn test_extensions() {
        assert_eq!(Format::Md.extension(), "md");
        assert_eq!(Format::Html.extension(), "html");
        assert_eq!(Format::Csv.extension(), "csv");
        assert_eq!(Format::Json.extension(), "json");
    }
}

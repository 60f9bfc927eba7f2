//! Tooltip content for a hovered bar, and formatting of additional
//! column values shared with the left-hand table.

use crate::axis::short_date;
use crate::bars::progress_label;
use chrono::{DateTime, Utc};
use ganttline_core::{ChartInput, ColumnValue, Point, Task};
use regex::Regex;
use std::sync::OnceLock;

/// Offset of the tooltip box from the pointer
pub const POINTER_OFFSET: f64 = 10.0;

/// ISO-8601 UTC timestamp with milliseconds, as hosts serialize dates
fn is_iso_timestamp(text: &str) -> bool {
    static ISO: OnceLock<Option<Regex>> = OnceLock::new();
    ISO.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}Z$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(text))
}

/// Display text of an additional column value.
///
/// Missing values are empty; dates and ISO-8601 millisecond timestamps are
/// shown as short dates; everything else is shown as-is.
pub fn format_column_value(value: Option<&ColumnValue>) -> String {
    match value {
        None => String::new(),
        Some(ColumnValue::Date(instant)) => short_date(*instant),
        Some(ColumnValue::Number(n)) => n.to_string(),
        Some(ColumnValue::Text(text)) => {
            if is_iso_timestamp(text) {
                if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
                    return short_date(parsed.with_timezone(&Utc));
                }
            }
            text.clone()
        }
    }
}

/// One line of tooltip content
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TooltipLine {
    /// Emphasised heading (the task name)
    Title(String),
    /// `name: value`
    Field { name: String, value: String },
}

impl TooltipLine {
    fn field(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Field {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn text(&self) -> String {
        match self {
            Self::Title(title) => title.clone(),
            Self::Field { name, value } => format!("{}: {}", name, value),
        }
    }
}

/// Tooltip for one task, anchored next to the pointer
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    /// Index into the task list of the pass
    pub task: usize,
    pub anchor: Point,
    pub lines: Vec<TooltipLine>,
}

impl Tooltip {
    pub fn new(task_index: usize, task: &Task, input: &ChartInput, pointer: Point) -> Self {
        Self {
            task: task_index,
            anchor: pointer.offset(POINTER_OFFSET, POINTER_OFFSET),
            lines: tooltip_lines(task, input),
        }
    }

    /// One line per entry
    pub fn to_text(&self) -> String {
        self.lines.iter().map(TooltipLine::text).collect::<Vec<_>>().join("\n")
    }

    /// Escaped HTML fragment with `<br/>` separators
    pub fn to_html(&self) -> String {
        self.lines
            .iter()
            .map(|line| match line {
                TooltipLine::Title(title) => format!("<b>{}</b>", html_escape(title)),
                TooltipLine::Field { name, value } => {
                    format!("{}: {}", html_escape(name), html_escape(value))
                }
            })
            .collect::<Vec<_>>()
            .join("<br/>")
    }
}

/// Ordered tooltip lines for a task
pub fn tooltip_lines(task: &Task, input: &ChartInput) -> Vec<TooltipLine> {
    let date = |instant: Option<_>| instant.map(short_date).unwrap_or_default();

    let mut lines = vec![
        TooltipLine::Title(task.name.clone()),
        TooltipLine::field(input.label_parent_name.as_str(), task.group.as_str()),
        TooltipLine::field("Start", date(task.start)),
        TooltipLine::field("End", date(task.end)),
        TooltipLine::field("Progress", progress_label(task.progress)),
    ];

    if let Some(label_name) = input.label_display_name.as_deref() {
        lines.push(TooltipLine::field(label_name, task.label.as_str()));
    }

    for column in &input.additional_columns {
        lines.push(TooltipLine::field(
            column.display_name.as_str(),
            format_column_value(task.extra.get(&column.key)),
        ));
    }
    lines
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ganttline_core::AdditionalColumn;
    use pretty_assertions::assert_eq;

    fn utc(y: i32, m: u32, d: u32) -> ganttline_core::Instant {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn formats_iso_strings_as_short_dates() {
        let iso = ColumnValue::Text("2024-03-15T00:00:00.000Z".into());
        assert_eq!(format_column_value(Some(&iso)), "3/15/2024");
    }

    #[test]
    fn leaves_other_strings_alone() {
        let no_millis = ColumnValue::Text("2024-03-15T00:00:00Z".into());
        assert_eq!(format_column_value(Some(&no_millis)), "2024-03-15T00:00:00Z");
        assert_eq!(format_column_value(Some(&ColumnValue::Text("hello".into()))), "hello");
    }

    #[test]
    fn formats_numbers_dates_and_missing() {
        assert_eq!(format_column_value(Some(&ColumnValue::Number(3.0))), "3");
        assert_eq!(format_column_value(Some(&ColumnValue::Number(12.5))), "12.5");
        assert_eq!(format_column_value(Some(&ColumnValue::Date(utc(2024, 2, 29)))), "2/29/2024");
        assert_eq!(format_column_value(None), "");
    }

    #[test]
    fn tooltip_lines_in_order() {
        let input = ChartInput::new(800.0, 600.0)
            .label_parent_name("Phase")
            .label_display_name("Note")
            .column(AdditionalColumn::new("cost", "Cost"))
            .column(AdditionalColumn::new("missing", "Missing"));
        let task = Task::new("1")
            .name("Build")
            .group("A, B")
            .label("urgent")
            .span(utc(2024, 1, 1), utc(2024, 1, 20))
            .progress(0.42)
            .field("cost", 100_i64);

        let tooltip = Tooltip::new(0, &task, &input, Point::new(50.0, 60.0));
        assert_eq!(tooltip.anchor, Point::new(60.0, 70.0));
        assert_eq!(
            tooltip.to_text(),
            "Build\nPhase: A, B\nStart: 1/1/2024\nEnd: 1/20/2024\nProgress: 42%\nNote: urgent\nCost: 100\nMissing: "
        );
    }

    #[test]
    fn label_line_needs_display_name() {
        let input = ChartInput::new(800.0, 600.0);
        let task = Task::new("1").label("hidden");
        let lines = tooltip_lines(&task, &input);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[2].text(), "Start: ");
        assert_eq!(lines[4].text(), "Progress: 0%");
    }

    #[test]
    fn html_is_escaped() {
        let input = ChartInput::new(800.0, 600.0);
        let task = Task::new("1").name("<script>").group("R&D");
        let html = Tooltip::new(0, &task, &input, Point::default()).to_html();
        assert!(html.starts_with("<b>&lt;script&gt;</b><br/>Parent: R&amp;D<br/>"));
        assert!(!html.contains("<script>"));
    }
}

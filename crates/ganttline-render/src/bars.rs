//! Bar geometry for item rows with a valid interval.

use crate::scale::{ChartMetrics, TimeScale};
use ganttline_core::{Rect, Task};

/// Pixel geometry and text of one task bar, in body coordinates
#[derive(Clone, Debug, PartialEq)]
pub struct BarGeometry {
    /// Index into the flattened rows
    pub row: usize,
    /// Index into the task list of the pass
    pub task: usize,
    pub rect: Rect,
    /// Width of the darker overlay from the bar start
    pub progress_width: f64,
    /// Left-aligned percentage, always present
    pub progress_label: String,
    pub progress_label_x: f64,
    /// Baseline of both text runs
    pub text_y: f64,
    /// Centred task label; only set when the bar is wide enough
    pub label: Option<String>,
    pub label_x: f64,
    pub color: String,
}

impl BarGeometry {
    /// Build the bar for `task` on row `row`, or `None` when the task lacks
    /// either instant.
    pub fn build(row: usize, task_index: usize, task: &Task, scale: &TimeScale, metrics: &ChartMetrics) -> Option<Self> {
        let (start, end) = task.interval()?;

        let bar_start = scale.x(start).max(scale.left_column_width());
        let bar_end = scale.x(end);
        let width = (bar_end - bar_start).max(metrics.min_bar_width);
        let progress_width = (width * task.clamped_progress()).max(metrics.min_bar_width);

        let top = metrics.row_top(row);
        let label = (width > metrics.label_threshold).then(|| task.label.clone());

        Some(Self {
            row,
            task: task_index,
            rect: Rect::new(bar_start, top + metrics.bar_inset(), width, metrics.bar_height),
            progress_width,
            progress_label: progress_label(task.progress),
            progress_label_x: bar_start + 8.0,
            text_y: top + metrics.text_baseline(),
            label,
            label_x: bar_start + width / 2.0,
            color: task.color.clone(),
        })
    }

    /// Rectangle of the progress overlay
    pub fn progress_rect(&self) -> Rect {
        Rect::new(self.rect.x, self.rect.y, self.progress_width, self.rect.height)
    }
}

/// Rounded whole percent, `"0%"` for zero, negative or non-finite progress
pub fn progress_label(progress: f64) -> String {
    if progress.is_finite() && progress > 0.0 {
        format!("{}%", (progress.min(1.0) * 100.0).round() as i64)
    } else {
        "0%".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VisibleWindow;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone, Utc};
    use ganttline_core::Instant;

    fn utc(y: i32, m: u32, d: u32) -> Instant {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn scale() -> (TimeScale, ChartMetrics) {
        let metrics = ChartMetrics::default();
        let window = VisibleWindow {
            min: utc(2024, 1, 1),
            max: utc(2024, 1, 20),
        };
        (TimeScale::new(window, &metrics, 1000.0, 0), metrics)
    }

    #[test]
    fn full_span_bar() {
        let (scale, metrics) = scale();
        let task = Task::new("1").span(utc(2024, 1, 1), utc(2024, 1, 20)).progress(0.5);
        let bar = BarGeometry::build(1, 0, &task, &scale, &metrics).unwrap();

        assert_relative_eq!(bar.rect.x, 236.0);
        assert_relative_eq!(bar.rect.width, 748.0);
        assert_relative_eq!(bar.progress_width, 374.0);
        assert_eq!(bar.rect.y, 33.0);
        assert_eq!(bar.text_y, 46.0);
        assert_eq!(bar.progress_label, "50%");
        assert_relative_eq!(bar.progress_label_x, 244.0);
    }

    #[test]
    fn invalid_task_has_no_bar() {
        let (scale, metrics) = scale();
        assert!(BarGeometry::build(0, 0, &Task::new("1"), &scale, &metrics).is_none());
    }

    #[test]
    fn start_is_clamped_to_left_column() {
        let (scale, metrics) = scale();
        let task = Task::new("1").span(utc(2023, 6, 1), utc(2024, 1, 5));
        let bar = BarGeometry::build(0, 0, &task, &scale, &metrics).unwrap();
        assert_eq!(bar.rect.x, 220.0);
    }

    #[test]
    fn inverted_interval_gets_minimum_width() {
        let (scale, metrics) = scale();
        let task = Task::new("1").span(utc(2024, 1, 10), utc(2024, 1, 5));
        let bar = BarGeometry::build(0, 0, &task, &scale, &metrics).unwrap();
        assert_eq!(bar.rect.width, 2.0);
        assert_eq!(bar.progress_width, 2.0);
    }

    #[test]
    fn label_only_on_wide_bars() {
        let (scale, metrics) = scale();
        // 748px over 19 days: about 39.4px per day
        let narrow = Task::new("n").label("L").span(utc(2024, 1, 1), utc(2024, 1, 2));
        let wide = Task::new("w")
            .label("L")
            .span(utc(2024, 1, 1), utc(2024, 1, 1) + Duration::hours(72));
        assert_eq!(BarGeometry::build(0, 0, &narrow, &scale, &metrics).unwrap().label, None);
        assert_eq!(
            BarGeometry::build(0, 0, &wide, &scale, &metrics).unwrap().label.as_deref(),
            Some("L")
        );
    }

    #[test]
    fn progress_labels() {
        assert_eq!(progress_label(0.0), "0%");
        assert_eq!(progress_label(-1.0), "0%");
        assert_eq!(progress_label(f64::NAN), "0%");
        assert_eq!(progress_label(0.333), "33%");
        assert_eq!(progress_label(0.005), "1%");
        assert_eq!(progress_label(1.0), "100%");
    }
}

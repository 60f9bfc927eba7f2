//! Pixel sizing and the linear time-to-x mapping.

use crate::domain::VisibleWindow;
use ganttline_core::Instant;

/// Fixed pixel dimensions of the chart layout
#[derive(Clone, Debug, PartialEq)]
pub struct ChartMetrics {
    /// Width of the task-name column
    pub name_column_width: f64,
    /// Width of each additional column
    pub extra_column_width: f64,
    pub row_height: f64,
    pub bar_height: f64,
    pub padding_left: f64,
    pub padding_right: f64,
    pub padding_bottom: f64,
    /// Height of the axis header above the body
    pub header_height: f64,
    /// Height of the zoom strip below the body
    pub zoom_bar_height: f64,
    pub slider_height: f64,
    pub slider_margin: f64,
    /// Bars narrower than or equal to this get no centred label
    pub label_threshold: f64,
    /// Narrowest bar ever drawn
    pub min_bar_width: f64,
}

impl Default for ChartMetrics {
    fn default() -> Self {
        Self {
            name_column_width: 220.0,
            extra_column_width: 110.0,
            row_height: 28.0,
            bar_height: 18.0,
            padding_left: 16.0,
            padding_right: 16.0,
            padding_bottom: 16.0,
            header_height: 56.0,
            zoom_bar_height: 60.0,
            slider_height: 48.0,
            slider_margin: 8.0,
            label_threshold: 75.0,
            min_bar_width: 2.0,
        }
    }
}

impl ChartMetrics {
    /// Name column plus one fixed-width column per additional column
    pub fn left_column_width(&self, extra_columns: usize) -> f64 {
        self.name_column_width + extra_columns as f64 * self.extra_column_width
    }

    /// Drawable timeline width, never negative
    pub fn chart_width(&self, total_width: f64, extra_columns: usize) -> f64 {
        (total_width - self.left_column_width(extra_columns) - self.padding_left - self.padding_right)
            .max(0.0)
    }

    /// Top edge of row `index` in body space
    pub fn row_top(&self, index: usize) -> f64 {
        index as f64 * self.row_height
    }

    /// Vertical offset of the bar inside its row
    pub fn bar_inset(&self) -> f64 {
        (self.row_height - self.bar_height) / 2.0
    }

    /// Baseline of text inside a row
    pub fn text_baseline(&self) -> f64 {
        self.bar_inset() + 13.0
    }
}

/// Linear map from the visible window onto `[origin, origin + chart_width]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    window: VisibleWindow,
    left_column_width: f64,
    origin: f64,
    chart_width: f64,
}

impl TimeScale {
    pub fn new(window: VisibleWindow, metrics: &ChartMetrics, total_width: f64, extra_columns: usize) -> Self {
        let left_column_width = metrics.left_column_width(extra_columns);
        Self {
            window,
            left_column_width,
            origin: left_column_width + metrics.padding_left,
            chart_width: metrics.chart_width(total_width, extra_columns),
        }
    }

    pub fn window(&self) -> VisibleWindow {
        self.window
    }

    pub fn left_column_width(&self) -> f64 {
        self.left_column_width
    }

    pub fn chart_width(&self) -> f64 {
        self.chart_width
    }

    /// X of the window start
    pub fn origin(&self) -> f64 {
        self.origin
    }

    /// X of the window end
    pub fn right_edge(&self) -> f64 {
        self.origin + self.chart_width
    }

    /// Pixel x of an instant. Values outside the window fall outside the
    /// chart area; a zero-width window maps everything to the origin.
    pub fn x(&self, instant: Instant) -> f64 {
        let span = self.window.span_millis();
        if span == 0 {
            return self.origin;
        }
        let offset = (instant - self.window.min).num_milliseconds() as f64;
        offset / span as f64 * self.chart_width + self.origin
    }
}

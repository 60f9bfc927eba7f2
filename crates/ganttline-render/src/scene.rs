//! The visual tree of one layout pass.
//!
//! `ChartScene::compose` runs every component in order: task view, rows,
//! domain, scale, axis, bars, legend and tooltip. Body coordinates put row 0
//! at `y = 0`; the header and zoom strip are positioned by the renderer.

use crate::axis::AxisLayout;
use crate::bars::BarGeometry;
use crate::domain::TemporalDomain;
use crate::legend::{self, LegendLayout};
use crate::rows::{self, group_label, Grouping, Row, UNASSIGNED_LABEL};
use crate::scale::{ChartMetrics, TimeScale};
use crate::tooltip::{format_column_value, Tooltip};
use ganttline_core::{ChartInput, Instant, Point, Rect, Task, UiState, ZoomWindow};

/// X of the first header label (the parent role name)
const PARENT_HEADER_X: f64 = 8.0;
/// X of the item role header
const ITEM_HEADER_X: f64 = 120.0;
/// X of group header text, after the chevron
const GROUP_TEXT_X: f64 = 28.0;
/// X of item names
const ITEM_TEXT_X: f64 = 24.0;
/// X of the collapse chevron on group rows
pub const CHEVRON_X: f64 = 8.0;

/// A text run in the header strip
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnHeader {
    pub text: String,
    pub x: f64,
}

/// Additional column cell of an item row
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub text: String,
    pub x: f64,
}

/// What the left column shows for a row
#[derive(Clone, Debug, PartialEq)]
pub enum RowLabelKind {
    Group { collapsed: bool },
    /// `unnamed` marks a task with an empty name, drawn as a warning
    Item { unnamed: bool },
}

/// Left-column content of one row
#[derive(Clone, Debug, PartialEq)]
pub struct RowLabel {
    pub row: usize,
    pub kind: RowLabelKind,
    pub text: String,
    pub x: f64,
    /// Text baseline in body coordinates
    pub y: f64,
    pub cells: Vec<Cell>,
}

/// Horizontal line segment in body coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLine {
    pub y: f64,
    pub x1: f64,
    pub x2: f64,
}

/// Range slider state and handle labels
#[derive(Clone, Debug, PartialEq)]
pub struct ZoomSlider {
    pub start_percent: u8,
    pub end_percent: u8,
    /// Left edge of the track
    pub track_x: f64,
    pub track_width: f64,
    pub start_label: String,
    pub end_label: String,
}

/// What a body-space point lands on
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HitTarget {
    GroupHeader { row: usize, key: String },
    Bar { row: usize, task: usize },
}

/// Complete output of one layout pass
#[derive(Clone, Debug, PartialEq)]
pub struct ChartScene {
    pub width: f64,
    pub height: f64,
    pub metrics: ChartMetrics,
    /// Task list every index in the scene refers to
    pub tasks: Vec<Task>,
    pub rows: Vec<Row>,
    pub domain: TemporalDomain,
    pub zoom: ZoomWindow,
    pub scale: TimeScale,
    pub column_headers: Vec<ColumnHeader>,
    pub labels: Vec<RowLabel>,
    pub grid_lines: Vec<GridLine>,
    pub axis: AxisLayout,
    pub bars: Vec<BarGeometry>,
    pub legend: LegendLayout,
    pub tooltip: Option<Tooltip>,
    pub slider: ZoomSlider,
}

impl ChartScene {
    /// Lay out `input` under `ui`, reading the clock from `now`
    pub fn compose(input: &ChartInput, ui: &UiState, metrics: &ChartMetrics, now: Instant) -> Self {
        let tasks = rows::task_view(&input.tasks, input.dedup);
        let rows = Grouping::build(&tasks).flatten(&ui.collapse);

        let domain = TemporalDomain::resolve(&tasks, now);
        let window = domain.visible(ui.zoom);
        let extra_columns = input.additional_columns.len();
        let scale = TimeScale::new(window, metrics, input.width, extra_columns);
        let axis = AxisLayout::build(&scale, domain.has_valid_tasks, now);

        let bars = rows
            .iter()
            .enumerate()
            .filter_map(|(row, r)| {
                let task_index = r.task_index()?;
                BarGeometry::build(row, task_index, &tasks[task_index], &scale, metrics)
            })
            .collect();

        let labels = row_labels(&rows, &tasks, input, metrics);
        let grid_lines = (0..rows.len())
            .map(|row| GridLine {
                y: metrics.row_top(row),
                x1: scale.left_column_width(),
                x2: input.width - metrics.padding_right,
            })
            .collect();

        let legend = LegendLayout::build(
            legend::assemble(&tasks),
            input.legend_position,
            input.legend_font_size,
        );

        let tooltip = ui.hover.and_then(|hover| {
            let task_index = rows.get(hover.row)?.task_index()?;
            Some(Tooltip::new(task_index, &tasks[task_index], input, hover.pointer))
        });

        let (start_percent, end_percent) = ui.zoom.percent();
        let slider = ZoomSlider {
            start_percent,
            end_percent,
            track_x: scale.left_column_width(),
            track_width: (input.width - scale.left_column_width() - metrics.padding_right).max(0.0),
            start_label: axis.start_label.clone(),
            end_label: axis.end_label.clone(),
        };

        Self {
            width: input.width,
            height: input.height,
            metrics: metrics.clone(),
            tasks,
            rows,
            domain,
            zoom: ui.zoom,
            scale,
            column_headers: column_headers(input, metrics),
            labels,
            grid_lines,
            axis,
            bars,
            legend,
            tooltip,
            slider,
        }
    }

    /// Height of the scrollable body: every row plus the bottom padding
    pub fn body_height(&self) -> f64 {
        self.rows.len() as f64 * self.metrics.row_height + self.metrics.padding_bottom
    }

    /// Height available to the body once header, zoom strip and slider are
    /// taken out of the viewport
    pub fn viewport_body_height(&self) -> f64 {
        let m = &self.metrics;
        (self.height - m.header_height - m.zoom_bar_height - m.slider_height - m.slider_margin).max(0.0)
    }

    /// Y of the bottom axis line in body coordinates
    pub fn bottom_axis_y(&self) -> f64 {
        self.body_height() - self.metrics.padding_bottom
    }

    /// Click target of a group header row: the full left-column width
    pub fn group_header_rect(&self, row: usize) -> Rect {
        Rect::new(
            0.0,
            self.metrics.row_top(row),
            self.scale.left_column_width(),
            self.metrics.row_height,
        )
    }

    /// Bar drawn on `row`, if any
    pub fn bar_on_row(&self, row: usize) -> Option<&BarGeometry> {
        self.bars.iter().find(|bar| bar.row == row)
    }

    /// The task shown on `row`, if it is an item row
    pub fn task_on_row(&self, row: usize) -> Option<&Task> {
        let index = self.rows.get(row)?.task_index()?;
        self.tasks.get(index)
    }

    /// Resolve a body-space point to a group header or a bar
    pub fn hit_test(&self, point: Point) -> Option<HitTarget> {
        if point.y < 0.0 || self.metrics.row_height <= 0.0 {
            return None;
        }
        let row = (point.y / self.metrics.row_height).floor() as usize;

        if let Some(Row::Group { key, .. }) = self.rows.get(row) {
            if self.group_header_rect(row).contains(point) {
                return Some(HitTarget::GroupHeader {
                    row,
                    key: key.clone(),
                });
            }
        }

        self.bars
            .iter()
            .find(|bar| bar.rect.contains(point))
            .map(|bar| HitTarget::Bar {
                row: bar.row,
                task: bar.task,
            })
    }
}

fn column_headers(input: &ChartInput, metrics: &ChartMetrics) -> Vec<ColumnHeader> {
    let mut headers = vec![
        ColumnHeader {
            text: input.label_parent_name.clone(),
            x: PARENT_HEADER_X,
        },
        ColumnHeader {
            text: input.label_item_name.clone(),
            x: ITEM_HEADER_X,
        },
    ];
    headers.extend(input.additional_columns.iter().enumerate().map(|(idx, column)| ColumnHeader {
        text: column.display_name.clone(),
        x: column_x(metrics, idx),
    }));
    headers
}

fn column_x(metrics: &ChartMetrics, idx: usize) -> f64 {
    metrics.name_column_width + idx as f64 * metrics.extra_column_width
}

fn row_labels(rows: &[Row], tasks: &[Task], input: &ChartInput, metrics: &ChartMetrics) -> Vec<RowLabel> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let y = metrics.row_top(i) + metrics.text_baseline();
            match row {
                Row::Group { key, collapsed } => RowLabel {
                    row: i,
                    kind: RowLabelKind::Group {
                        collapsed: *collapsed,
                    },
                    text: group_label(key).to_string(),
                    x: GROUP_TEXT_X,
                    y,
                    cells: Vec::new(),
                },
                Row::Item { task, .. } => {
                    let task = &tasks[*task];
                    let unnamed = task.name.is_empty();
                    RowLabel {
                        row: i,
                        kind: RowLabelKind::Item { unnamed },
                        text: if unnamed {
                            UNASSIGNED_LABEL.to_string()
                        } else {
                            task.name.clone()
                        },
                        x: ITEM_TEXT_X,
                        y,
                        cells: input
                            .additional_columns
                            .iter()
                            .enumerate()
                            .map(|(idx, column)| Cell {
                                text: format_column_value(task.extra.get(&column.key)),
                                x: column_x(metrics, idx),
                            })
                            .collect(),
                    }
                }
            }
        })
        .collect()
}

//! SVG rendering of a laid-out [`ChartScene`].
//!
//! Vertical stacking, top to bottom: legend (when on top), header strip,
//! body, zoom strip, legend (when at the bottom). Left and right legends
//! float over the body edge below the header.

use crate::bars::BarGeometry;
use crate::scene::{ChartScene, RowLabel, RowLabelKind, CHEVRON_X};
use crate::tooltip::TooltipLine;
use crate::Renderer;
use ganttline_core::{LegendPosition, RenderError};
use svg::node::element::{Group, Line, Polygon, Rectangle, Text};
use svg::Document;

const LEGEND_MARGIN: f64 = 8.0;
const TOOLTIP_LINE_HEIGHT: f64 = 16.0;
const TOOLTIP_PADDING: f64 = 8.0;

/// SVG renderer configuration
#[derive(Clone, Debug)]
pub struct SvgRenderer {
    pub background_color: String,
    /// Row separators and month lines
    pub grid_color: String,
    pub week_color: String,
    pub axis_color: String,
    pub muted_text_color: String,
    pub text_color: String,
    /// Item rows whose task has no name
    pub warning_color: String,
    pub today_color: String,
    pub font_family: String,
    pub font_size: f64,
    /// Opacity of the darker progress overlay
    pub progress_opacity: f64,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            background_color: "#ffffff".into(),
            grid_color: "#e1e1e1".into(),
            week_color: "#f0f0f0".into(),
            axis_color: "#bbbbbb".into(),
            muted_text_color: "#888888".into(),
            text_color: "#222222".into(),
            warning_color: "red".into(),
            today_color: "#d83b01".into(),
            font_family: "Segoe UI, system-ui, sans-serif".into(),
            font_size: 12.0,
            progress_opacity: 0.18,
        }
    }
}

/// Vertical offsets of each strip in document coordinates
struct Frame {
    header_y: f64,
    body_y: f64,
    zoom_y: f64,
    bottom_legend_y: f64,
    width: f64,
    height: f64,
}

impl Frame {
    fn new(scene: &ChartScene) -> Self {
        let m = &scene.metrics;
        let legend = &scene.legend;
        let top_legend = if legend.position == LegendPosition::Top {
            legend.reserved_extent()
        } else {
            0.0
        };
        let bottom_legend = if legend.position == LegendPosition::Bottom {
            legend.reserved_extent()
        } else {
            0.0
        };

        let header_y = top_legend;
        let body_y = header_y + m.header_height;
        let zoom_y = body_y + scene.body_height() + m.slider_margin;
        let bottom_legend_y = zoom_y + m.slider_height;
        let width = scene
            .width
            .max(scene.scale.left_column_width() + m.padding_left + m.padding_right);

        Self {
            header_y,
            body_y,
            zoom_y,
            bottom_legend_y,
            width,
            height: bottom_legend_y + bottom_legend,
        }
    }
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the font family
    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Configure the today marker colour
    pub fn today_color(mut self, color: impl Into<String>) -> Self {
        self.today_color = color.into();
        self
    }

    fn text(&self, content: impl Into<String>, x: f64, y: f64, size: f64, fill: &str) -> Text {
        Text::new(content.into())
            .set("x", x)
            .set("y", y)
            .set("font-family", self.font_family.as_str())
            .set("font-size", size)
            .set("fill", fill)
    }

    fn render_header(&self, scene: &ChartScene, frame: &Frame) -> Group {
        let m = &scene.metrics;
        let h = m.header_height;
        let mut group = Group::new()
            .set("class", "header")
            .set("transform", format!("translate(0,{})", frame.header_y));

        for tick in &scene.axis.months {
            group = group
                .add(self.text(tick.label.as_str(), tick.x + 4.0, 22.0, self.font_size, &self.muted_text_color))
                .add(
                    Line::new()
                        .set("x1", tick.x)
                        .set("y1", 22)
                        .set("x2", tick.x)
                        .set("y2", h)
                        .set("stroke", self.grid_color.as_str())
                        .set("stroke-dasharray", "4 2")
                        .set("stroke-width", 1),
                );
        }
        for tick in &scene.axis.weeks {
            group = group.add(self.week_line(tick.x, 0.0, h));
        }

        let left = scene.scale.left_column_width();
        let right = frame.width - m.padding_right;
        group = group
            .add(
                Line::new()
                    .set("x1", left)
                    .set("y1", h - 1.0)
                    .set("x2", right)
                    .set("y2", h - 1.0)
                    .set("stroke", self.axis_color.as_str())
                    .set("stroke-width", 1.5),
            )
            .add(self.text(scene.axis.start_label.as_str(), left, h - 4.0, self.font_size, &self.muted_text_color))
            .add(self.text(scene.axis.end_label.as_str(), right - 60.0, h - 4.0, self.font_size, &self.muted_text_color))
            .add(self.today_line(scene.axis.today.x, h))
            .add(
                self.text(scene.axis.today.label.as_str(), scene.axis.today.x + 4.0, 12.0, 11.0, &self.today_color)
                    .set("font-weight", 700),
            )
            .add(self.left_mask(left, h));

        for header in &scene.column_headers {
            group = group.add(
                self.text(header.text.as_str(), header.x, h - 24.0, self.font_size + 1.0, &self.text_color)
                    .set("font-weight", 600),
            );
        }
        group
    }

    fn render_body(&self, scene: &ChartScene, frame: &Frame) -> Group {
        let m = &scene.metrics;
        let axis_y = scene.bottom_axis_y();
        let mut group = Group::new()
            .set("class", "body")
            .set("transform", format!("translate(0,{})", frame.body_y));

        for tick in &scene.axis.months {
            group = group.add(
                Line::new()
                    .set("x1", tick.x)
                    .set("y1", 0)
                    .set("x2", tick.x)
                    .set("y2", axis_y)
                    .set("stroke", self.grid_color.as_str())
                    .set("stroke-dasharray", "4 2")
                    .set("stroke-width", 1),
            );
        }
        for tick in &scene.axis.weeks {
            group = group.add(self.week_line(tick.x, 0.0, axis_y));
        }
        for line in &scene.grid_lines {
            group = group.add(
                Line::new()
                    .set("x1", line.x1)
                    .set("y1", line.y)
                    .set("x2", line.x2)
                    .set("y2", line.y)
                    .set("stroke", self.grid_color.as_str())
                    .set("stroke-width", 1),
            );
        }

        let left = scene.scale.left_column_width();
        let right = frame.width - m.padding_right;
        group = group
            .add(
                Line::new()
                    .set("x1", left)
                    .set("y1", axis_y)
                    .set("x2", right)
                    .set("y2", axis_y)
                    .set("stroke", self.axis_color.as_str())
                    .set("stroke-width", 1.5),
            )
            .add(self.text(scene.axis.start_label.as_str(), left, axis_y + 18.0, self.font_size, &self.muted_text_color))
            .add(self.text(scene.axis.end_label.as_str(), right - 60.0, axis_y + 18.0, self.font_size, &self.muted_text_color))
            .add(self.today_line(scene.axis.today.x, axis_y))
            .add(self.left_mask(left, scene.body_height()));

        for label in &scene.labels {
            group = group.add(self.render_row_label(scene, label));
        }
        for bar in &scene.bars {
            group = group.add(self.render_bar(bar));
        }
        group
    }

    fn render_row_label(&self, scene: &ChartScene, label: &RowLabel) -> Group {
        let mut group = Group::new().set("class", "row");
        match label.kind {
            RowLabelKind::Group { collapsed } => {
                let top = scene.metrics.row_top(label.row);
                let mid = top + scene.metrics.row_height / 2.0;
                let points = if collapsed {
                    // Pointing right
                    format!("{},{} {},{} {},{}", CHEVRON_X + 4.0, mid - 5.0, CHEVRON_X + 10.0, mid, CHEVRON_X + 4.0, mid + 5.0)
                } else {
                    format!("{},{} {},{} {},{}", CHEVRON_X + 2.0, mid - 3.0, CHEVRON_X + 12.0, mid - 3.0, CHEVRON_X + 7.0, mid + 3.0)
                };
                group = group
                    .set("cursor", "pointer")
                    .add(Polygon::new().set("points", points).set("fill", self.text_color.as_str()))
                    .add(
                        self.text(label.text.as_str(), label.x, label.y, 15.0, &self.text_color)
                            .set("font-weight", 700),
                    );
            }
            RowLabelKind::Item { unnamed } => {
                let fill = if unnamed { &self.warning_color } else { &self.text_color };
                group = group.add(
                    self.text(label.text.as_str(), label.x, label.y, 13.0, fill)
                        .set("font-weight", 600),
                );
                for cell in &label.cells {
                    group = group.add(self.text(cell.text.as_str(), cell.x, label.y, self.font_size, "#444444"));
                }
            }
        }
        group
    }

    fn render_bar(&self, bar: &BarGeometry) -> Group {
        let rect = bar.rect;
        let progress = bar.progress_rect();
        let mut group = Group::new()
            .set("class", "bar")
            .add(
                Rectangle::new()
                    .set("x", rect.x)
                    .set("y", rect.y)
                    .set("width", rect.width)
                    .set("height", rect.height)
                    .set("rx", 4)
                    .set("fill", bar.color.as_str()),
            )
            .add(
                Rectangle::new()
                    .set("x", progress.x)
                    .set("y", progress.y)
                    .set("width", progress.width)
                    .set("height", progress.height)
                    .set("rx", 4)
                    .set("fill", "#000")
                    .set("opacity", self.progress_opacity),
            )
            .add(
                self.text(bar.progress_label.as_str(), bar.progress_label_x, bar.text_y, self.font_size, "#fff")
                    .set("font-weight", 700),
            );

        if let Some(label) = &bar.label {
            group = group.add(
                self.text(label.as_str(), bar.label_x, bar.text_y, self.font_size, "#333")
                    .set("font-weight", 700)
                    .set("text-anchor", "middle"),
            );
        }
        group
    }

    fn render_zoom(&self, scene: &ChartScene, frame: &Frame) -> Group {
        let slider = &scene.slider;
        let track_y = 12.0;
        let handle_x = |percent: u8| slider.track_x + f64::from(percent) / 100.0 * slider.track_width;
        let start_x = handle_x(slider.start_percent);
        let end_x = handle_x(slider.end_percent);

        Group::new()
            .set("class", "zoom")
            .set("transform", format!("translate(0,{})", frame.zoom_y))
            .add(
                Line::new()
                    .set("x1", slider.track_x)
                    .set("y1", track_y)
                    .set("x2", slider.track_x + slider.track_width)
                    .set("y2", track_y)
                    .set("stroke", self.grid_color.as_str())
                    .set("stroke-width", 4),
            )
            .add(
                Line::new()
                    .set("x1", start_x)
                    .set("y1", track_y)
                    .set("x2", end_x)
                    .set("y2", track_y)
                    .set("stroke", "#0078d4")
                    .set("stroke-width", 4),
            )
            .add(self.handle(start_x, track_y))
            .add(self.handle(end_x, track_y))
            .add(
                self.text(slider.start_label.as_str(), start_x, track_y + 24.0, self.font_size, &self.text_color)
                    .set("text-anchor", "middle"),
            )
            .add(
                self.text(slider.end_label.as_str(), end_x, track_y + 24.0, self.font_size, &self.text_color)
                    .set("text-anchor", "middle"),
            )
    }

    fn render_legend(&self, scene: &ChartScene, frame: &Frame) -> Option<Group> {
        let legend = &scene.legend;
        if legend.is_empty() {
            return None;
        }
        let (x, y) = match legend.position {
            LegendPosition::Top => (LEGEND_MARGIN, 0.0),
            LegendPosition::Bottom => (LEGEND_MARGIN, frame.bottom_legend_y + LEGEND_MARGIN),
            LegendPosition::Left => (LEGEND_MARGIN, frame.body_y),
            LegendPosition::Right => (frame.width - legend.width - LEGEND_MARGIN, frame.body_y),
        };

        let mut group = Group::new()
            .set("class", "legend")
            .set("transform", format!("translate({},{})", x, y));
        for item in &legend.items {
            group = group
                .add(
                    Rectangle::new()
                        .set("x", item.swatch.x)
                        .set("y", item.swatch.y)
                        .set("width", item.swatch.width)
                        .set("height", item.swatch.height)
                        .set("rx", 4)
                        .set("fill", item.entry.color.as_str()),
                )
                .add(self.text(item.entry.value.as_str(), item.text_x, item.text_y, legend.font_size, &self.text_color));
        }
        Some(group)
    }

    fn render_tooltip(&self, scene: &ChartScene) -> Option<Group> {
        let tooltip = scene.tooltip.as_ref()?;
        let longest = tooltip.lines.iter().map(|l| l.text().chars().count()).max().unwrap_or(0);
        let width = longest as f64 * self.font_size * 0.6 + TOOLTIP_PADDING * 2.0;
        let height = tooltip.lines.len() as f64 * TOOLTIP_LINE_HEIGHT + TOOLTIP_PADDING * 2.0;

        let mut group = Group::new()
            .set("class", "tooltip")
            .set("transform", format!("translate({},{})", tooltip.anchor.x, tooltip.anchor.y))
            .add(
                Rectangle::new()
                    .set("width", width)
                    .set("height", height)
                    .set("rx", 4)
                    .set("fill", "#ffffff")
                    .set("stroke", self.axis_color.as_str()),
            );
        for (i, line) in tooltip.lines.iter().enumerate() {
            let y = TOOLTIP_PADDING + (i as f64 + 1.0) * TOOLTIP_LINE_HEIGHT - 4.0;
            let mut text = self.text(line.text(), TOOLTIP_PADDING, y, self.font_size, &self.text_color);
            if matches!(line, TooltipLine::Title(_)) {
                text = text.set("font-weight", 700);
            }
            group = group.add(text);
        }
        Some(group)
    }

    fn week_line(&self, x: f64, y1: f64, y2: f64) -> Line {
        Line::new()
            .set("x1", x)
            .set("y1", y1)
            .set("x2", x)
            .set("y2", y2)
            .set("stroke", self.week_color.as_str())
            .set("stroke-dasharray", "2 2")
            .set("stroke-width", 1)
    }

    fn today_line(&self, x: f64, height: f64) -> Line {
        Line::new()
            .set("x1", x)
            .set("y1", 0)
            .set("x2", x)
            .set("y2", height)
            .set("stroke", self.today_color.as_str())
            .set("stroke-width", 2)
    }

    /// Hides axis lines that extend under the left column
    fn left_mask(&self, width: f64, height: f64) -> Rectangle {
        Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", width)
            .set("height", height)
            .set("fill", self.background_color.as_str())
    }

    fn handle(&self, x: f64, y: f64) -> Rectangle {
        Rectangle::new()
            .set("x", x - 6.0)
            .set("y", y - 8.0)
            .set("width", 12)
            .set("height", 16)
            .set("rx", 3)
            .set("fill", "#ffffff")
            .set("stroke", "#0078d4")
            .set("stroke-width", 2)
    }
}

impl Renderer for SvgRenderer {
    type Output = String;

    fn render(&self, scene: &ChartScene) -> Result<String, RenderError> {
        if !scene.width.is_finite() || !scene.height.is_finite() {
            return Err(RenderError::InvalidData(format!(
                "viewport must be finite ({}x{})",
                scene.width, scene.height
            )));
        }

        let frame = Frame::new(scene);
        let mut document = Document::new()
            .set("width", frame.width)
            .set("height", frame.height)
            .set("viewBox", (0.0, 0.0, frame.width, frame.height))
            .set("xmlns", "http://www.w3.org/2000/svg")
            .add(
                Rectangle::new()
                    .set("width", "100%")
                    .set("height", "100%")
                    .set("fill", self.background_color.as_str()),
            )
            .add(self.render_header(scene, &frame))
            .add(self.render_body(scene, &frame))
            .add(self.render_zoom(scene, &frame));

        if let Some(legend) = self.render_legend(scene, &frame) {
            document = document.add(legend);
        }
        if let Some(tooltip) = self.render_tooltip(scene) {
            document = document.add(tooltip);
        }

        let mut output = Vec::new();
        svg::write(&mut output, &document)
            .map_err(|e| RenderError::Format(format!("Failed to write SVG: {}", e)))?;

        String::from_utf8(output).map_err(|e| RenderError::Format(format!("Invalid UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GanttChart;
    use chrono::{TimeZone, Utc};
    use ganttline_core::{ChartInput, Hover, Point, Task, UiState};

    fn input() -> ChartInput {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap();
        ChartInput::new(1000.0, 600.0)
            .now(start)
            .task(
                Task::new("1")
                    .name("Design")
                    .group("Phase A")
                    .label("core")
                    .legend("Ops")
                    .color("#0078d4")
                    .span(start, end)
                    .progress(0.5),
            )
            .task(Task::new("2").name("").group("Phase A"))
    }

    #[test]
    fn renders_document_with_rows_and_bars() {
        let scene = GanttChart::new().layout(&input(), &UiState::new());
        let svg = SvgRenderer::default().render(&scene).unwrap();

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Phase A"));
        assert!(svg.contains("Design"));
        assert!(svg.contains("50%"));
        assert!(svg.contains("Not Assigned"));
        assert!(svg.contains("Jan 2024"));
        assert!(svg.contains("class=\"legend\""));
        assert!(!svg.contains("class=\"tooltip\""));
    }

    #[test]
    fn renders_tooltip_when_hovered() {
        let mut ui = UiState::new();
        ui.hover = Some(Hover {
            row: 1,
            pointer: Point::new(400.0, 100.0),
        });
        let scene = GanttChart::new().layout(&input(), &ui);
        let svg = SvgRenderer::default().render(&scene).unwrap();
        assert!(svg.contains("class=\"tooltip\""));
        assert!(svg.contains("Progress: 50%"));
    }

    #[test]
    fn empty_chart_still_renders() {
        let input = ChartInput::new(120.0, 50.0);
        let scene = GanttChart::new().layout(&input, &UiState::new());
        let svg = SvgRenderer::default().render(&scene).unwrap();
        assert!(svg.contains("<svg"));
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn rejects_non_finite_viewport() {
        let input = ChartInput::new(f64::NAN, 600.0);
        let scene = GanttChart::new().layout(&input, &UiState::new());
        assert!(matches!(
            SvgRenderer::default().render(&scene),
            Err(RenderError::InvalidData(_))
        ));
    }
}

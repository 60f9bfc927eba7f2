//! # ganttline-render
//!
//! Layout and interaction engine for ganttline charts.
//!
//! This crate provides:
//! - Temporal domain resolution and zoom windows (`domain`)
//! - Grouping and row flattening with collapse support (`rows`)
//! - The time-to-pixel scale (`scale`)
//! - Month/week ticks and the today marker (`axis`)
//! - Bar geometry with progress overlays (`bars`)
//! - Legend assembly and placement (`legend`)
//! - Tooltip content (`tooltip`)
//! - Pointer event routing into UI state and host commands (`interaction`)
//! - The composed visual tree (`scene`) and an SVG renderer for it
//!
//! ## Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use ganttline_core::{ChartInput, Task, UiState};
//! use ganttline_render::{GanttChart, Renderer, SvgRenderer};
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let end = Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap();
//! let input = ChartInput::new(1000.0, 600.0)
//!     .now(start)
//!     .task(Task::new("1").name("Design").group("Phase A").span(start, end));
//!
//! let scene = GanttChart::new().layout(&input, &UiState::new());
//! assert_eq!(scene.rows.len(), 2);
//!
//! let svg = SvgRenderer::default().render(&scene).unwrap();
//! assert!(svg.contains("Design"));
//! ```

pub mod axis;
pub mod bars;
pub mod domain;
pub mod interaction;
pub mod legend;
pub mod rows;
pub mod scale;
pub mod scene;
pub mod svg;
pub mod tooltip;

pub use self::svg::SvgRenderer;
pub use axis::{short_date, AxisLayout, Tick, TodayMarker};
pub use bars::{progress_label, BarGeometry};
pub use domain::{TemporalDomain, VisibleWindow};
pub use interaction::{route, ChartEvent, RouteOutcome};
pub use legend::{LegendEntry, LegendLayout};
pub use rows::{Grouping, Row};
pub use scale::{ChartMetrics, TimeScale};
pub use scene::{ChartScene, HitTarget};
pub use tooltip::{format_column_value, Tooltip, TooltipLine};

use chrono::Utc;
use ganttline_core::{ChartInput, RenderError, UiState};
use tracing::debug;

/// Trait for scene renderers
pub trait Renderer {
    type Output;

    /// Render a laid-out scene to the output format
    fn render(&self, scene: &ChartScene) -> Result<Self::Output, RenderError>;
}

/// Layout entry point: input and UI state in, scene out
#[derive(Clone, Debug, Default)]
pub struct GanttChart {
    metrics: ChartMetrics,
}

impl GanttChart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use non-default pixel metrics
    pub fn with_metrics(metrics: ChartMetrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &ChartMetrics {
        &self.metrics
    }

    /// Run one layout pass. Pure apart from reading the clock when the
    /// input does not pin `now`.
    pub fn layout(&self, input: &ChartInput, ui: &UiState) -> ChartScene {
        let now = input.now.unwrap_or_else(Utc::now);
        let scene = ChartScene::compose(input, ui, &self.metrics, now);

        debug!(
            tasks = scene.tasks.len(),
            rows = scene.rows.len(),
            bars = scene.bars.len(),
            legend = scene.legend.items.len(),
            valid = scene.domain.has_valid_tasks,
            "laid out chart"
        );
        scene
    }
}

//! Chart options: TOML file values overridden by command-line flags.
//!
//! ```toml
//! width = 1200
//! height = 700
//! legend_position = "bottom"
//! legend_font_size = 12
//! dedup = "raw"
//! zoom = [25, 75]
//! collapsed = ["Phase A"]
//! now = "2024-01-08T00:00:00Z"
//! ```

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use ganttline_core::{ChartInput, DedupPolicy, LegendPosition, UiState, ZoomWindow};
use serde::Deserialize;
use std::path::Path;

use crate::document::TaskDocument;

const DEFAULT_WIDTH: f64 = 1200.0;
const DEFAULT_HEIGHT: f64 = 700.0;

/// Options read from a TOML file; every field is optional
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub legend_position: Option<LegendPosition>,
    pub legend_font_size: Option<f64>,
    pub dedup: Option<DedupPolicy>,
    /// Slider handles in percent
    pub zoom: Option<(u8, u8)>,
    /// Groups collapsed before the first pass
    pub collapsed: Vec<String>,
    /// Pinned clock for the today marker
    pub now: Option<DateTime<Utc>>,
}

impl ChartConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&source).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Overlay `other` on top of `self`; set values in `other` win and
    /// collapsed groups accumulate
    pub fn merge(mut self, other: Self) -> Self {
        self.width = other.width.or(self.width);
        self.height = other.height.or(self.height);
        self.legend_position = other.legend_position.or(self.legend_position);
        self.legend_font_size = other.legend_font_size.or(self.legend_font_size);
        self.dedup = other.dedup.or(self.dedup);
        self.zoom = other.zoom.or(self.zoom);
        self.now = other.now.or(self.now);
        for group in other.collapsed {
            if !self.collapsed.contains(&group) {
                self.collapsed.push(group);
            }
        }
        self
    }

    /// Build the layout input for a loaded document
    pub fn chart_input(&self, document: TaskDocument) -> ChartInput {
        let mut input = ChartInput::new(
            self.width.unwrap_or(DEFAULT_WIDTH),
            self.height.unwrap_or(DEFAULT_HEIGHT),
        )
        .tasks(document.tasks);
        input.additional_columns = document.additional_columns;
        input.label_display_name = document.label_display_name;
        if let Some(name) = document.label_parent_name {
            input.label_parent_name = name;
        }
        if let Some(name) = document.label_item_name {
            input.label_item_name = name;
        }
        if let Some(position) = self.legend_position {
            input.legend_position = position;
        }
        if let Some(size) = self.legend_font_size {
            input.legend_font_size = size;
        }
        if let Some(policy) = self.dedup {
            input.dedup = policy;
        }
        input.now = self.now;
        input
    }

    /// Initial UI state: zoom window and collapsed groups
    pub fn ui_state(&self) -> Result<UiState> {
        let mut ui = UiState::new();
        if let Some((start, end)) = self.zoom {
            ui.zoom = ZoomWindow::from_percent(start, end).context("invalid zoom window")?;
        }
        for group in &self.collapsed {
            if !ui.collapse.is_collapsed(group) {
                ui.collapse.toggle(group);
            }
        }
        Ok(ui)
    }
}

/// Parse `START:END` slider percentages
pub fn parse_zoom(raw: &str) -> Result<(u8, u8)> {
    let Some((start, end)) = raw.split_once(':') else {
        bail!("expected START:END, got '{}'", raw);
    };
    let start: u8 = start.trim().parse().with_context(|| format!("invalid zoom start '{}'", start))?;
    let end: u8 = end.trim().parse().with_context(|| format!("invalid zoom end '{}'", end))?;
    if end > 100 {
        bail!("zoom end must be at most 100, got {}", end);
    }
    Ok((start, end))
}

//! Inputs supplied afresh on every host update.

use crate::{AdditionalColumn, DedupPolicy, Identity, Instant, LegendPosition, Task};
use serde::{Deserialize, Serialize};

/// Everything one layout pass needs besides the UI state
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartInput {
    /// Viewport width in pixels
    pub width: f64,
    /// Viewport height in pixels
    pub height: f64,
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub additional_columns: Vec<AdditionalColumn>,
    /// Display name of the label role; `None` omits the label tooltip line
    #[serde(default)]
    pub label_display_name: Option<String>,
    /// Display name of the parent (group) role
    #[serde(default = "default_parent_name")]
    pub label_parent_name: String,
    /// Display name of the item role
    #[serde(default = "default_item_name")]
    pub label_item_name: String,
    #[serde(default)]
    pub legend_position: LegendPosition,
    #[serde(default = "default_legend_font_size")]
    pub legend_font_size: f64,
    /// Host selection, accepted for future highlight styling
    #[serde(default)]
    pub selected: Vec<Identity>,
    /// Clock override for the today marker; `None` reads the system clock
    #[serde(default)]
    pub now: Option<Instant>,
    #[serde(default)]
    pub dedup: DedupPolicy,
}

fn default_parent_name() -> String {
    "Parent".to_string()
}

fn default_item_name() -> String {
    "Item".to_string()
}

fn default_legend_font_size() -> f64 {
    14.0
}

impl ChartInput {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            tasks: Vec::new(),
            additional_columns: Vec::new(),
            label_display_name: None,
            label_parent_name: default_parent_name(),
            label_item_name: default_item_name(),
            legend_position: LegendPosition::default(),
            legend_font_size: default_legend_font_size(),
            selected: Vec::new(),
            now: None,
            dedup: DedupPolicy::default(),
        }
    }

    /// Append one task
    pub fn task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    /// Replace the task list
    pub fn tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    /// Declare an additional column
    pub fn column(mut self, column: AdditionalColumn) -> Self {
        self.additional_columns.push(column);
        self
    }

    /// Show the label line in tooltips under this name
    pub fn label_display_name(mut self, name: impl Into<String>) -> Self {
        self.label_display_name = Some(name.into());
        self
    }

    pub fn label_parent_name(mut self, name: impl Into<String>) -> Self {
        self.label_parent_name = name.into();
        self
    }

    pub fn label_item_name(mut self, name: impl Into<String>) -> Self {
        self.label_item_name = name.into();
        self
    }

    pub fn legend(mut self, position: LegendPosition, font_size: f64) -> Self {
        self.legend_position = position;
        self.legend_font_size = font_size;
        self
    }

    /// Pin the clock used for the today marker
    pub fn now(mut self, now: Instant) -> Self {
        self.now = Some(now);
        self
    }

    pub fn dedup(mut self, policy: DedupPolicy) -> Self {
        self.dedup = policy;
        self
    }
}

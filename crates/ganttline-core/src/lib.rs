//! # ganttline-core
//!
//! Core data model for the ganttline chart engine.
//!
//! This crate provides:
//! - Domain types: `Task`, `AdditionalColumn`, `ColumnValue`, `Identity`
//! - Per-chart UI state: `ZoomWindow`, `CollapseMap`, `UiState`
//! - The render entry input: `ChartInput`
//! - Host capabilities: the `Host` trait and `HostCommand`
//! - Legend colour assignment: `LegendPalette`
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use ganttline_core::{ChartInput, Task};
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let end = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
//!
//! let input = ChartInput::new(1200.0, 600.0).task(
//!     Task::new("1")
//!         .name("Design")
//!         .group("Phase A, Phase B")
//!         .span(start, end)
//!         .progress(0.5),
//! );
//! assert_eq!(input.tasks[0].group_keys(), vec!["Phase A", "Phase B"]);
//! ```

pub mod host;
pub mod input;
pub mod palette;
pub mod state;

pub use host::{ChannelHost, Host, HostCommand};
pub use input::ChartInput;
pub use palette::{LegendPalette, DEFAULT_COLOR, PALETTE};
pub use state::{CollapseMap, Hover, UiState, ZoomWindow};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Unique identifier for a task within one rendering pass
pub type TaskId = String;

/// Point in time used for every task instant
pub type Instant = DateTime<Utc>;

// ============================================================================
// Geometry
// ============================================================================

/// A point in pixel space
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset this point by `dx`, `dy`
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// An axis-aligned rectangle in pixel space
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Inclusive on the top/left edges, exclusive on the bottom/right edges
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

// ============================================================================
// Identity
// ============================================================================

/// Opaque host reference attached to a task for selection.
///
/// The engine never looks inside; it is handed back to the host verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Selection id minted by the host for context-menu invocations
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionId(String);

impl SelectionId {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SelectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Additional Columns
// ============================================================================

/// Declared extra column shown in the left table and in tooltips
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalColumn {
    /// Key into `Task::extra`
    pub key: String,
    /// Header text
    pub display_name: String,
    /// Declared host format string. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl AdditionalColumn {
    pub fn new(key: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            format: None,
        }
    }

    /// Set the declared format
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// Dynamically typed value of an extension field
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnValue {
    Number(f64),
    Text(String),
    Date(Instant),
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ColumnValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for ColumnValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for ColumnValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<Instant> for ColumnValue {
    fn from(value: Instant) -> Self {
        Self::Date(value)
    }
}

// ============================================================================
// Task
// ============================================================================

/// One schedulable record, already normalized by the data source
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique key within a rendering pass (deduplication key)
    pub id: TaskId,
    /// Group memberships, comma separated
    #[serde(default)]
    pub group: String,
    /// Row label
    #[serde(default)]
    pub name: String,
    /// Free-form label drawn inside wide bars
    #[serde(default)]
    pub label: String,
    /// Category driving the legend and the bar colour
    #[serde(default)]
    pub legend_value: String,
    #[serde(default)]
    pub owner: String,
    /// Start instant; `None` means the task has no bar
    #[serde(default, with = "instant_serde")]
    pub start: Option<Instant>,
    /// End instant; `None` means the task has no bar
    #[serde(default, with = "instant_serde")]
    pub end: Option<Instant>,
    /// Completion in [0, 1]; not validated upstream
    #[serde(default, deserialize_with = "lenient_number")]
    pub progress: f64,
    /// Resolved display colour (`#rrggbb`)
    #[serde(default)]
    pub color: String,
    /// Host selection token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
    /// Extension fields keyed by `AdditionalColumn::key`
    #[serde(
        default,
        deserialize_with = "extra_values",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub extra: IndexMap<String, ColumnValue>,
}

impl Task {
    /// Create a new task with the given ID; the name defaults to the ID
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            group: String::new(),
            label: String::new(),
            legend_value: String::new(),
            owner: String::new(),
            start: None,
            end: None,
            progress: 0.0,
            color: String::new(),
            identity: None,
            extra: IndexMap::new(),
        }
    }

    /// Set the task name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the group string (may list several groups separated by commas)
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Set the in-bar label
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the legend category; also used as the owner
    pub fn legend(mut self, value: impl Into<String>) -> Self {
        self.legend_value = value.into();
        self.owner = self.legend_value.clone();
        self
    }

    /// Set both instants
    pub fn span(mut self, start: Instant, end: Instant) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Set progress
    pub fn progress(mut self, progress: f64) -> Self {
        self.progress = progress;
        self
    }

    /// Set the display colour
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Attach a host selection token
    pub fn identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Set an extension field
    pub fn field(mut self, key: impl Into<String>, value: impl Into<ColumnValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Start and end, when both are present
    pub fn interval(&self) -> Option<(Instant, Instant)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// Whether this task can be drawn as a bar and contributes to the domain
    pub fn is_valid(&self) -> bool {
        self.interval().is_some()
    }

    /// Progress clamped to [0, 1]; non-finite values count as zero
    pub fn clamped_progress(&self) -> f64 {
        if self.progress.is_finite() {
            self.progress.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Distinct trimmed group keys in listed order.
    ///
    /// An empty or blank group string yields the single key `""`.
    pub fn group_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for token in self.group.split(',') {
            let key = token.trim();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }
}

// ============================================================================
// Chart Options
// ============================================================================

/// Where the legend is placed relative to the chart
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

impl LegendPosition {
    /// Left/right legends stack their entries vertically
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

impl fmt::Display for LegendPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        };
        f.write_str(name)
    }
}

impl FromStr for LegendPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(format!("unknown legend position '{}'", other)),
        }
    }
}

/// How duplicate task ids are treated before layout
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DedupPolicy {
    /// Keep the first task per id; grouping, domain and legend all see the
    /// same deduplicated list
    #[default]
    ById,
    /// Feed the raw list to every consumer
    Raw,
}

// ============================================================================
// Errors
// ============================================================================

/// Invalid zoom window bounds
#[derive(Debug, Error, PartialEq)]
pub enum ZoomError {
    #[error("zoom bounds must be finite (start={start}, end={end})")]
    NotFinite { start: f64, end: f64 },

    #[error("zoom bounds must satisfy 0 <= start < end <= 1 (start={start}, end={end})")]
    OutOfOrder { start: f64, end: f64 },
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Serde Helpers
// ============================================================================

/// Optional instants accepting RFC 3339 timestamps, bare `YYYY-MM-DD` dates
/// or epoch milliseconds.
///
/// Blank or unparseable values deserialize to `None`, so the task simply
/// renders without a bar.
mod instant_serde {
    use super::Instant;
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Millis(i64),
        Other(serde::de::IgnoredAny),
    }

    pub fn serialize<S>(value: &Option<Instant>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(instant) => serializer.serialize_str(&instant.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Instant>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let instant = match Raw::deserialize(deserializer)? {
            Raw::Text(s) => parse(&s),
            Raw::Millis(ms) => DateTime::from_timestamp_millis(ms),
            Raw::Other(_) => None,
        };
        Ok(instant)
    }

    pub(super) fn parse(raw: &str) -> Option<Instant> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}

/// Numbers that arrive as numbers, numeric strings, or junk (which reads as 0)
fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Number(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    let value = match Lenient::deserialize(deserializer)? {
        Lenient::Number(n) if n.is_finite() => n,
        Lenient::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()).unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(value)
}

/// Extension fields; nulls are dropped, booleans become text
fn extra_values<'de, D>(deserializer: D) -> Result<IndexMap<String, ColumnValue>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde_json::Value;

    let raw: IndexMap<String, Value> = IndexMap::deserialize(deserializer)?;
    let mut values = IndexMap::with_capacity(raw.len());
    for (key, value) in raw {
        let converted = match value {
            Value::Null => continue,
            Value::Bool(b) => ColumnValue::Text(b.to_string()),
            Value::Number(n) => match n.as_f64() {
                Some(f) => ColumnValue::Number(f),
                None => ColumnValue::Text(n.to_string()),
            },
            Value::String(s) => ColumnValue::Text(s),
            other => ColumnValue::Text(other.to_string()),
        };
        values.insert(key, converted);
    }
    Ok(values)
}

// ============================================================================
// Tests
// ============================================================================

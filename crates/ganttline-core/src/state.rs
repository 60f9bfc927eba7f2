//! Per-chart UI state threaded through every layout pass.
//!
//! Only the zoom window and the collapse map survive across data refreshes;
//! the hover slot is cleared whenever the pointer leaves a bar.

use crate::{Point, ZoomError};
use std::collections::HashMap;

/// Visible fraction of the full temporal domain.
///
/// Always satisfies `0 <= start < end <= 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomWindow {
    start: f64,
    end: f64,
}

impl Default for ZoomWindow {
    fn default() -> Self {
        Self::full()
    }
}

impl ZoomWindow {
    /// The whole domain
    pub const fn full() -> Self {
        Self {
            start: 0.0,
            end: 1.0,
        }
    }

    pub fn new(start: f64, end: f64) -> Result<Self, ZoomError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(ZoomError::NotFinite { start, end });
        }
        if start < 0.0 || end > 1.0 || start >= end {
            return Err(ZoomError::OutOfOrder { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build from the 0..=100 integer handles of a range slider
    pub fn from_percent(start: u8, end: u8) -> Result<Self, ZoomError> {
        Self::new(f64::from(start) / 100.0, f64::from(end) / 100.0)
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    /// Slider handle positions, rounded to whole percent
    pub fn percent(&self) -> (u8, u8) {
        let to_percent = |f: f64| (f * 100.0).round().clamp(0.0, 100.0) as u8;
        (to_percent(self.start), to_percent(self.end))
    }

    pub fn is_full(&self) -> bool {
        self.start == 0.0 && self.end == 1.0
    }
}

/// Group expansion flags keyed by group key.
///
/// Absence means expanded. An entry of `false` means the user collapsed the
/// group; `true` means it was collapsed and reopened.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollapseMap {
    expanded: HashMap<String, bool>,
}

impl CollapseMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_collapsed(&self, group: &str) -> bool {
        self.expanded.get(group) == Some(&false)
    }

    /// Flip a group: absent/expanded becomes collapsed, collapsed becomes expanded.
    ///
    /// Returns the new collapsed state.
    pub fn toggle(&mut self, group: &str) -> bool {
        let collapsed = self.is_collapsed(group);
        self.expanded.insert(group.to_string(), collapsed);
        !collapsed
    }

    /// Explicit state lookup; `None` when the group was never toggled
    pub fn entry(&self, group: &str) -> Option<bool> {
        self.expanded.get(group).copied()
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

/// Bar currently under the pointer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hover {
    /// Row index in the last laid-out scene
    pub row: usize,
    /// Pointer position in viewport coordinates
    pub pointer: Point,
}

/// Mutable chart state owned by the caller
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UiState {
    pub zoom: ZoomWindow,
    pub collapse: CollapseMap,
    pub hover: Option<Hover>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a zoom window other than the full domain
    pub fn with_zoom(mut self, zoom: ZoomWindow) -> Self {
        self.zoom = zoom;
        self
    }
}

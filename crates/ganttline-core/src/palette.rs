//! Legend colour assignment.
//!
//! Colours are handed out per distinct legend value in first-seen order,
//! cycling through a fixed palette.

use crate::Task;
use std::collections::HashMap;

/// Bar palette, cycled in order
pub const PALETTE: [&str; 8] = [
    "#0078d4", "#e3008c", "#ffaa44", "#00b7c3", "#bad80a", "#b146c2", "#ff8c00", "#a80000",
];

/// Colour for tasks without a legend value
pub const DEFAULT_COLOR: &str = "#0078d4";

/// Stateful colour allocator keyed by legend value
#[derive(Clone, Debug, Default)]
pub struct LegendPalette {
    assigned: HashMap<String, &'static str>,
    next: usize,
}

impl LegendPalette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Colour for a legend value, allocating the next palette slot on first sight
    pub fn color_for(&mut self, legend_value: &str) -> &'static str {
        if legend_value.is_empty() {
            return DEFAULT_COLOR;
        }
        if let Some(&color) = self.assigned.get(legend_value) {
            return color;
        }
        let color = PALETTE[self.next % PALETTE.len()];
        self.next += 1;
        self.assigned.insert(legend_value.to_string(), color);
        color
    }

    /// Fill in the colour of every task that arrived without one.
    ///
    /// Every legend value takes a palette slot, even when all its tasks
    /// already carry explicit colours, so slot order stays first-seen order.
    pub fn assign(&mut self, tasks: &mut [Task]) {
        for task in tasks.iter_mut() {
            let color = self.color_for(&task.legend_value);
            if task.color.trim().is_empty() {
                task.color = color.to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_seen_order() {
        let mut palette = LegendPalette::new();
        assert_eq!(palette.color_for("b"), PALETTE[0]);
        assert_eq!(palette.color_for("a"), PALETTE[1]);
        assert_eq!(palette.color_for("b"), PALETTE[0]);
    }

    #[test]
    fn empty_legend_uses_default() {
        let mut palette = LegendPalette::new();
        assert_eq!(palette.color_for(""), DEFAULT_COLOR);
        assert_eq!(palette.color_for("x"), PALETTE[0]);
    }

    #[test]
    fn palette_wraps() {
        let mut palette = LegendPalette::new();
        for i in 0..PALETTE.len() {
            palette.color_for(&format!("v{}", i));
        }
        assert_eq!(palette.color_for("ninth"), PALETTE[0]);
    }

    #[test]
    fn assign_keeps_explicit_colors() {
        let mut tasks = vec![
            Task::new("1").legend("Ops").color("#123456"),
            Task::new("2").legend("Dev"),
            Task::new("3"),
        ];
        LegendPalette::new().assign(&mut tasks);
        assert_eq!(tasks[0].color, "#123456");
        assert_eq!(tasks[1].color, PALETTE[1]);
        assert_eq!(tasks[2].color, DEFAULT_COLOR);
    }
}

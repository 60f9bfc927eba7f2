//! Legend entries and their placement.

use ganttline_core::{LegendPosition, Rect, Task};
use indexmap::IndexMap;

const SWATCH: f64 = 16.0;
const SWATCH_GAP: f64 = 6.0;
const ENTRY_SPACING: f64 = 16.0;
const MARGIN: f64 = 8.0;

/// One legend value and the colour of the first task that carried it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegendEntry {
    pub value: String,
    pub color: String,
}

/// Distinct non-empty legend values in first-seen order
pub fn assemble(tasks: &[Task]) -> Vec<LegendEntry> {
    let mut entries: IndexMap<&str, &str> = IndexMap::new();
    for task in tasks {
        if task.legend_value.is_empty() {
            continue;
        }
        entries.entry(task.legend_value.as_str()).or_insert(task.color.as_str());
    }
    entries
        .into_iter()
        .map(|(value, color)| LegendEntry {
            value: value.to_string(),
            color: color.to_string(),
        })
        .collect()
}

/// Placed legend entry
#[derive(Clone, Debug, PartialEq)]
pub struct LegendItem {
    pub entry: LegendEntry,
    pub swatch: Rect,
    pub text_x: f64,
    pub text_y: f64,
}

/// Legend block, positioned relative to the top-left corner of the block
#[derive(Clone, Debug, PartialEq)]
pub struct LegendLayout {
    pub position: LegendPosition,
    pub font_size: f64,
    pub items: Vec<LegendItem>,
    pub width: f64,
    pub height: f64,
}

impl LegendLayout {
    /// Lay the entries out in a row (top/bottom) or a column (left/right).
    ///
    /// Text width is estimated from the font size; no font metrics are
    /// available to the engine.
    pub fn build(entries: Vec<LegendEntry>, position: LegendPosition, font_size: f64) -> Self {
        let line_height = font_size.max(SWATCH);
        let mut items = Vec::with_capacity(entries.len());
        let mut cursor_x = 0.0_f64;
        let mut cursor_y = 0.0_f64;
        let mut width = 0.0_f64;

        for entry in entries {
            let text_width = estimate_text_width(&entry.value, font_size);
            let swatch = Rect::new(cursor_x, cursor_y + (line_height - SWATCH) / 2.0, SWATCH, SWATCH);
            let text_x = cursor_x + SWATCH + SWATCH_GAP;
            // Approximate baseline for a vertically centred run
            let text_y = cursor_y + line_height / 2.0 + font_size * 0.35;
            let entry_width = SWATCH + SWATCH_GAP + text_width;

            items.push(LegendItem {
                entry,
                swatch,
                text_x,
                text_y,
            });

            if position.is_vertical() {
                width = width.max(entry_width);
                cursor_y += line_height + ENTRY_SPACING / 2.0;
            } else {
                cursor_x += entry_width + ENTRY_SPACING;
                width = cursor_x - ENTRY_SPACING;
            }
        }

        let height = if items.is_empty() {
            0.0
        } else if position.is_vertical() {
            cursor_y - ENTRY_SPACING / 2.0
        } else {
            line_height
        };

        Self {
            position,
            font_size,
            items,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Space the legend takes from the chart along its edge, margin included
    pub fn reserved_extent(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else if self.position.is_vertical() {
            self.width + MARGIN
        } else {
            self.height + MARGIN
        }
    }
}

fn estimate_text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * 0.6
}

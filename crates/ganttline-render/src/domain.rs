//! Temporal domain: the full span of all drawable tasks and the zoomed
//! sub-window currently on screen.

use chrono::Duration;
use ganttline_core::{Instant, Task, ZoomWindow};

/// Minimum start and maximum end over every task with both instants
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TemporalDomain {
    pub min: Instant,
    pub max: Instant,
    /// Whether any task contributed; otherwise `min == max == now`
    pub has_valid_tasks: bool,
}

impl TemporalDomain {
    /// Resolve the domain, falling back to the single instant `now`
    pub fn resolve<'a>(tasks: impl IntoIterator<Item = &'a Task>, now: Instant) -> Self {
        let mut bounds: Option<(Instant, Instant)> = None;
        for (start, end) in tasks.into_iter().filter_map(Task::interval) {
            bounds = Some(match bounds {
                Some((min, max)) => (min.min(start), max.max(end)),
                None => (start, end),
            });
        }

        match bounds {
            Some((min, max)) => Self {
                min,
                max,
                has_valid_tasks: true,
            },
            None => Self {
                min: now,
                max: now,
                has_valid_tasks: false,
            },
        }
    }

    /// Full span in milliseconds; may be zero or negative
    pub fn span_millis(&self) -> i64 {
        (self.max - self.min).num_milliseconds()
    }

    /// Instant at a fraction of the full span, never past `max`
    pub fn instant_at(&self, fraction: f64) -> Instant {
        let offset = (self.span_millis() as f64 * fraction).trunc() as i64;
        self.min
            .checked_add_signed(Duration::milliseconds(offset))
            .map_or(self.max, |instant| instant.min(self.max))
    }

    /// The sub-window selected by the zoom slider
    pub fn visible(&self, zoom: ZoomWindow) -> VisibleWindow {
        VisibleWindow {
            min: self.instant_at(zoom.start()),
            max: self.instant_at(zoom.end()),
        }
    }
}

/// Zoomed window mapped onto the chart width
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibleWindow {
    pub min: Instant,
    pub max: Instant,
}

impl VisibleWindow {
    pub fn span_millis(&self) -> i64 {
        (self.max - self.min).num_milliseconds()
    }
}

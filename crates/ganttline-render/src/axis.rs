//! Date axis: month and week ticks, window boundary labels, and the
//! "today" marker.
//!
//! All calendar arithmetic is done in UTC.

use crate::domain::VisibleWindow;
use crate::scale::TimeScale;
use chrono::{Datelike, Duration, Months, NaiveDate};
use ganttline_core::Instant;
use tracing::debug;

/// Most ticks drawn per series; a window needing more draws none of that series
pub const MAX_TICKS: i64 = 10_000;

/// `M/D/YYYY`, used for window bounds, tooltips and date cells
pub fn short_date(instant: Instant) -> String {
    instant.format("%-m/%-d/%Y").to_string()
}

/// A labelled vertical grid line
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub instant: Instant,
    pub x: f64,
    pub label: String,
}

/// Marker for the current instant. May lie outside the chart area.
#[derive(Clone, Debug, PartialEq)]
pub struct TodayMarker {
    pub instant: Instant,
    pub x: f64,
    pub label: String,
}

/// Everything drawn along the time axis
#[derive(Clone, Debug, PartialEq)]
pub struct AxisLayout {
    pub months: Vec<Tick>,
    pub weeks: Vec<Tick>,
    pub today: TodayMarker,
    /// Short date of the window start
    pub start_label: String,
    /// Short date of the window end
    pub end_label: String,
}

impl AxisLayout {
    /// Build the axis for the visible window.
    ///
    /// Ticks only exist when some task had both instants; the today marker
    /// and the window labels are always produced.
    pub fn build(scale: &TimeScale, has_valid_tasks: bool, now: Instant) -> Self {
        let window = scale.window();
        let (months, weeks) = if has_valid_tasks {
            (month_ticks(scale, window), week_ticks(scale, window))
        } else {
            (Vec::new(), Vec::new())
        };

        Self {
            months,
            weeks,
            today: TodayMarker {
                instant: now,
                x: scale.x(now),
                label: short_date(now),
            },
            start_label: short_date(window.min),
            end_label: short_date(window.max),
        }
    }
}

/// First of `window.min`'s month, stepping one calendar month, while `<= window.max`
fn month_ticks(scale: &TimeScale, window: VisibleWindow) -> Vec<Tick> {
    if (window.max - window.min).num_days() / 28 > MAX_TICKS {
        debug!(min = %window.min, max = %window.max, "too many month ticks; skipped");
        return Vec::new();
    }
    let mut ticks = Vec::new();
    let min = window.min.date_naive();
    let mut date = NaiveDate::from_ymd_opt(min.year(), min.month(), 1);

    while let Some(day) = date {
        let Some(instant) = day.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc()) else {
            break;
        };
        if instant > window.max {
            break;
        }
        ticks.push(Tick {
            instant,
            x: scale.x(instant),
            label: instant.format("%b %Y").to_string(),
        });
        date = day.checked_add_months(Months::new(1));
    }
    ticks
}

/// Sunday 00:00 on or before `window.min`, stepping seven days, while `<= window.max`.
///
/// Ticks always sit on midnight UTC; `window.min`'s time of day is not
/// carried over, so week lines keep their calendar position when zooming.
/// No ticks when that Sunday is before the earliest representable date.
fn week_ticks(scale: &TimeScale, window: VisibleWindow) -> Vec<Tick> {
    if (window.max - window.min).num_days() / 7 > MAX_TICKS {
        debug!(min = %window.min, max = %window.max, "too many week ticks; skipped");
        return Vec::new();
    }
    let mut ticks = Vec::new();
    let min = window.min.date_naive();
    let back = Duration::days(i64::from(min.weekday().num_days_from_sunday()));
    let mut date = min.checked_sub_signed(back);

    while let Some(day) = date {
        let Some(instant) = day.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc()) else {
            break;
        };
        if instant > window.max {
            break;
        }
        ticks.push(Tick {
            instant,
            x: scale.x(instant),
            label: instant.format("%b %-d").to_string(),
        });
        date = day.checked_add_signed(Duration::days(7));
    }
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::ChartMetrics;
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn utc(y: i32, m: u32, d: u32) -> Instant {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn scale(min: Instant, max: Instant) -> TimeScale {
        TimeScale::new(VisibleWindow { min, max }, &ChartMetrics::default(), 1000.0, 0)
    }

    fn labels(ticks: &[Tick]) -> Vec<&str> {
        ticks.iter().map(|t| t.label.as_str()).collect()
    }

    #[test]
    fn short_date_format() {
        assert_eq!(short_date(utc(2024, 1, 5)), "1/5/2024");
        assert_eq!(short_date(utc(2023, 12, 31)), "12/31/2023");
    }

    #[test]
    fn month_ticks_start_at_first_of_month() {
        let axis = AxisLayout::build(&scale(utc(2024, 1, 15), utc(2024, 3, 1)), true, utc(2024, 2, 1));
        assert_eq!(labels(&axis.months), vec!["Jan 2024", "Feb 2024", "Mar 2024"]);
        assert_eq!(axis.months[0].instant, utc(2024, 1, 1));
        assert!(axis.months[0].x < 236.0);
    }

    #[test]
    fn week_ticks_start_on_sunday_midnight() {
        // 2024-01-03 is a Wednesday
        let min = Utc.with_ymd_and_hms(2024, 1, 3, 15, 30, 0).unwrap();
        let axis = AxisLayout::build(&scale(min, utc(2024, 1, 20)), true, min);
        assert_eq!(axis.weeks[0].instant, utc(2023, 12, 31));
        assert_eq!(labels(&axis.weeks), vec!["Dec 31", "Jan 7", "Jan 14"]);
    }

    #[test]
    fn week_ticks_include_max_boundary() {
        let axis = AxisLayout::build(&scale(utc(2024, 1, 7), utc(2024, 1, 14)), true, utc(2024, 1, 7));
        assert_eq!(labels(&axis.weeks), vec!["Jan 7", "Jan 14"]);
    }

    #[test]
    fn no_ticks_without_valid_tasks() {
        let now = utc(2024, 6, 1);
        let axis = AxisLayout::build(&scale(now, now), false, now);
        assert!(axis.months.is_empty());
        assert!(axis.weeks.is_empty());
        assert_eq!(axis.today.label, "6/1/2024");
        assert_eq!(axis.start_label, "6/1/2024");
        assert_eq!(axis.end_label, "6/1/2024");
    }

    #[test]
    fn today_marker_is_placed_even_outside_window() {
        let axis = AxisLayout::build(&scale(utc(2024, 1, 1), utc(2024, 1, 20)), true, utc(2025, 1, 1));
        assert!(axis.today.x > 984.0);
    }

    #[test]
    fn week_ticks_stop_at_earliest_date() {
        // -262143-01-01; the Sunday before it is not representable
        let min = DateTime::from_timestamp_millis(-8_334_601_228_800_000).unwrap();
        let max = min + Duration::days(20);
        let axis = AxisLayout::build(&scale(min, max), true, max);
        assert!(axis.weeks.is_empty());
        assert_eq!(axis.months.len(), 1);
        assert_eq!(axis.start_label, short_date(min));
    }

    #[test]
    fn oversized_window_skips_ticks() {
        let axis = AxisLayout::build(&scale(utc(1800, 1, 1), utc(2024, 1, 1)), true, utc(2024, 1, 1));
        assert!(axis.weeks.is_empty());
        assert_eq!(axis.months.len(), 2689);

        let min = DateTime::from_timestamp_millis(-8_334_601_228_800_000).unwrap();
        let axis = AxisLayout::build(&scale(min, utc(2024, 1, 1)), true, utc(2024, 1, 1));
        assert!(axis.weeks.is_empty());
        assert!(axis.months.is_empty());
        assert!(axis.today.x.is_finite());
    }

    #[test]
    fn month_ticks_cross_year_end() {
        let axis = AxisLayout::build(&scale(utc(2023, 11, 20), utc(2024, 2, 2)), true, utc(2024, 1, 1));
        assert_eq!(labels(&axis.months), vec!["Nov 2023", "Dec 2023", "Jan 2024", "Feb 2024"]);
    }
}

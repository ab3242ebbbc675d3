//! Shared date axis and bar placement for the timeline view.
//!
//! The axis spans every parseable date among the surviving children, padded
//! on both sides. Each child becomes a bar expressed as a left offset and a
//! width, both percentages of the axis, with `left + width <= 100`.

use chrono::{DateTime, TimeDelta, Utc};

use crate::config::TimelineConfig;
use crate::dates;
use crate::model::ChildRecord;

/// Why there is nothing to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyTimeline {
    /// No surviving child carries a parseable date
    NoDatedEvents,
    /// Every date collapses to one instant and there is no padding
    DegenerateAxis,
}

impl EmptyTimeline {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyTimeline::NoDatedEvents => "No dated events for this range",
            EmptyTimeline::DegenerateAxis => "Date range too narrow to draw",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimelineOutcome<'c, C> {
    Drawn(Timeline<'c, C>),
    Empty(EmptyTimeline),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Timeline<'c, C> {
    pub axis_start: DateTime<Utc>,
    pub axis_end: DateTime<Utc>,
    pub bars: Vec<TimelineBar<'c, C>>,
    /// Children skipped because neither date parsed
    pub undated: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineBar<'c, C> {
    pub child: &'c C,
    pub left_pct: f64,
    pub width_pct: f64,
}

struct Dated<'c, C> {
    child: &'c C,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// Lay out every child on one axis.
pub fn build_timeline<'c, C: ChildRecord + 'c>(
    children: impl IntoIterator<Item = &'c C>,
    config: &TimelineConfig,
) -> TimelineOutcome<'c, C> {
    let mut undated = 0;
    let dated: Vec<Dated<'c, C>> = children
        .into_iter()
        .filter_map(|child| {
            let start = dates::parse_optional(child.start_date());
            let end = dates::parse_optional(child.end_date());
            match (start, end) {
                (Some(start), Some(end)) => Some(Dated { child, start, end }),
                // one-sided: a point at the known date
                (Some(at), None) | (None, Some(at)) => Some(Dated {
                    child,
                    start: at,
                    end: at,
                }),
                (None, None) => {
                    undated += 1;
                    None
                }
            }
        })
        .collect();

    let Some((min, max)) = bounds(&dated) else {
        return TimelineOutcome::Empty(EmptyTimeline::NoDatedEvents);
    };

    let Some((axis_start, axis_end)) = padded_axis(min, max, config.buffer_days) else {
        return TimelineOutcome::Empty(EmptyTimeline::DegenerateAxis);
    };
    let span_ms = (axis_end - axis_start).num_milliseconds() as f64;
    if span_ms <= 0.0 {
        return TimelineOutcome::Empty(EmptyTimeline::DegenerateAxis);
    }

    let bars = dated
        .into_iter()
        .map(|d| {
            let offset_ms = (d.start - axis_start).num_milliseconds() as f64;
            let length_ms = (d.end - d.start).num_milliseconds() as f64;
            let (left_pct, width_pct) =
                place_bar(offset_ms / span_ms, length_ms / span_ms, config.min_bar_width_pct);
            TimelineBar {
                child: d.child,
                left_pct,
                width_pct,
            }
        })
        .collect();

    TimelineOutcome::Drawn(Timeline {
        axis_start,
        axis_end,
        bars,
        undated,
    })
}

fn bounds<C>(dated: &[Dated<'_, C>]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let min = dated.iter().map(|d| d.start.min(d.end)).min()?;
    let max = dated.iter().map(|d| d.start.max(d.end)).max()?;
    Some((min, max))
}

/// Pad both ends of the axis; `None` when the padding leaves chrono's range.
fn padded_axis(
    min: DateTime<Utc>,
    max: DateTime<Utc>,
    buffer_days: i64,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let buffer = TimeDelta::try_days(buffer_days.max(0))?;
    Some((min.checked_sub_signed(buffer)?, max.checked_add_signed(buffer)?))
}

/// Convert axis fractions to clipped percentages.
fn place_bar(offset: f64, length: f64, min_width: f64) -> (f64, f64) {
    let left = (offset * 100.0).clamp(0.0, 100.0);
    let width = (length * 100.0).max(min_width).min(100.0 - left);
    (left, width.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OcEvent;
    use chrono::TimeZone;

    fn event(id: &str, start: Option<&str>, end: Option<&str>) -> OcEvent {
        OcEvent {
            id: id.into(),
            start_date: start.map(str::to_string),
            end_date: end.map(str::to_string),
            ..Default::default()
        }
    }

    fn drawn<'c>(outcome: TimelineOutcome<'c, OcEvent>) -> Timeline<'c, OcEvent> {
        match outcome {
            TimelineOutcome::Drawn(t) => t,
            TimelineOutcome::Empty(reason) => panic!("expected a timeline, got {reason:?}"),
        }
    }

    #[test]
    fn test_axis_is_padded_by_buffer() {
        let events = vec![
            event("a", Some("2024-01-08"), Some("2024-01-18")),
            event("b", Some("2024-01-13"), Some("2024-01-23")),
        ];
        let t = drawn(build_timeline(&events, &TimelineConfig::default()));
        assert_eq!(t.axis_start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(t.axis_end, Utc.with_ymd_and_hms(2024, 1, 30, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_bar_positions() {
        // axis: 2024-01-01 .. 2024-01-31 (30 days) with no padding
        let config = TimelineConfig {
            buffer_days: 0,
            ..Default::default()
        };
        let events = vec![
            event("a", Some("2024-01-01"), Some("2024-01-31")),
            event("b", Some("2024-01-16"), Some("2024-01-19")),
        ];
        let t = drawn(build_timeline(&events, &config));
        assert_eq!(t.bars[0].left_pct, 0.0);
        assert_eq!(t.bars[0].width_pct, 100.0);
        assert!((t.bars[1].left_pct - 50.0).abs() < 1e-9);
        assert!((t.bars[1].width_pct - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_bars_stay_inside_axis() {
        let events = vec![
            event("a", Some("2024-01-01"), Some("2024-03-01")),
            event("b", Some("2024-03-01"), None),
            event("c", Some("2024-02-01"), Some("2024-01-15")),
        ];
        let t = drawn(build_timeline(&events, &TimelineConfig::default()));
        for bar in &t.bars {
            assert!(bar.left_pct >= 0.0);
            assert!(bar.width_pct >= 0.0);
            assert!(bar.left_pct + bar.width_pct <= 100.0 + 1e-9, "{bar:?}");
        }
    }

    #[test]
    fn test_single_date_child_gets_minimum_width() {
        let events = vec![
            event("a", Some("2024-01-01"), Some("2024-01-31")),
            event("b", None, Some("2024-01-10")),
        ];
        let t = drawn(build_timeline(&events, &TimelineConfig::default()));
        assert_eq!(t.bars[1].width_pct, 0.5);
    }

    #[test]
    fn test_undated_children_are_counted_not_drawn() {
        let events = vec![
            event("a", Some("2024-01-01"), Some("2024-01-31")),
            event("b", Some("not a date"), None),
        ];
        let t = drawn(build_timeline(&events, &TimelineConfig::default()));
        assert_eq!(t.bars.len(), 1);
        assert_eq!(t.undated, 1);
    }

    #[test]
    fn test_no_dated_children_reports_empty() {
        let events = vec![event("a", None, None), event("b", Some(""), Some("x"))];
        assert_eq!(
            build_timeline(&events, &TimelineConfig::default()),
            TimelineOutcome::Empty(EmptyTimeline::NoDatedEvents)
        );
        let none: Vec<OcEvent> = Vec::new();
        assert_eq!(
            build_timeline(&none, &TimelineConfig::default()),
            TimelineOutcome::Empty(EmptyTimeline::NoDatedEvents)
        );
    }

    #[test]
    fn test_huge_buffer_degrades_instead_of_overflowing() {
        let config = TimelineConfig {
            buffer_days: 200_000_000,
            ..Default::default()
        };
        let events = vec![event("a", Some("2024-01-01"), Some("2024-01-31"))];
        assert_eq!(
            build_timeline(&events, &config),
            TimelineOutcome::Empty(EmptyTimeline::DegenerateAxis)
        );

        let config = TimelineConfig {
            buffer_days: i64::MAX,
            ..Default::default()
        };
        assert_eq!(
            build_timeline(&events, &config),
            TimelineOutcome::Empty(EmptyTimeline::DegenerateAxis)
        );
    }

    #[test]
    fn test_single_instant_without_buffer_is_degenerate() {
        let config = TimelineConfig {
            buffer_days: 0,
            ..Default::default()
        };
        let events = vec![event("a", Some("2024-01-10"), Some("2024-01-10"))];
        assert_eq!(
            build_timeline(&events, &config),
            TimelineOutcome::Empty(EmptyTimeline::DegenerateAxis)
        );
    }
}

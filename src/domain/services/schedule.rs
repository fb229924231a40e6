use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

use crate::domain::models::center::{CenterSchedule, TimeRange};

pub const MINUTES_PER_DAY: u16 = 1440;

/// One contiguous open range on a single date, in minutes from local
/// midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenInterval {
    pub start_min: u16,
    pub end_min: u16,
}

/// Resolves a center's schedule configuration into the concrete open
/// intervals for one date. Exactly one source is consulted, in priority
/// order:
///
/// 1. a closed exception for the date -> closed;
/// 2. an exception with explicit ranges -> those ranges, verbatim;
/// 3. the weekly schedule entry for the weekday (its own `closed` flag
///    wins) -> its slot list;
/// 4. the legacy open/close pair, unless marked closed;
/// 5. nothing configured -> closed.
///
/// Sources are never merged, and absent or malformed configuration
/// resolves to closed rather than a guess.
pub fn resolve_open_intervals(schedule: &CenterSchedule, date: NaiveDate) -> Vec<OpenInterval> {
    if let Some(exception) = schedule.exception_for(date) {
        if exception.closed {
            return Vec::new();
        }
        if let Some(ref ranges) = exception.ranges {
            return parse_ranges(ranges);
        }
        // An exception that neither closes nor overrides falls through to
        // the recurring schedule.
    }

    if let Some(ref weekly) = schedule.weekly
        && let Some(day) = weekly.for_weekday(date.weekday()) {
        if day.closed {
            return Vec::new();
        }
        return parse_ranges(&day.slots);
    }

    if let Some(ref legacy) = schedule.legacy_hours
        && !legacy.closed {
        return parse_ranges(&[TimeRange {
            start: legacy.open.clone(),
            end: legacy.close.clone(),
        }]);
    }

    Vec::new()
}

/// Parses "HH:MM" ranges into minute offsets. Unparseable or inverted
/// ranges are dropped; "24:00" is accepted as end-of-day.
fn parse_ranges(ranges: &[TimeRange]) -> Vec<OpenInterval> {
    let mut intervals: Vec<OpenInterval> = ranges
        .iter()
        .filter_map(|r| {
            let start = parse_minute(&r.start)?;
            let end = parse_minute(&r.end)?;
            if end > start {
                Some(OpenInterval { start_min: start, end_min: end })
            } else {
                None
            }
        })
        .collect();
    intervals.sort_by_key(|i| i.start_min);
    intervals
}

fn parse_minute(value: &str) -> Option<u16> {
    if value == "24:00" {
        return Some(MINUTES_PER_DAY);
    }
    let time = NaiveTime::parse_from_str(value, "%H:%M").ok()?;
    Some((time.hour() * 60 + time.minute()) as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::center::{DaySchedule, LegacyHours, ScheduleException, WeeklySchedule};

    fn range(start: &str, end: &str) -> TimeRange {
        TimeRange { start: start.to_string(), end: end.to_string() }
    }

    fn weekly_all_days(slots: Vec<TimeRange>) -> WeeklySchedule {
        let day = Some(DaySchedule { closed: false, slots });
        WeeklySchedule {
            monday: day.clone(),
            tuesday: day.clone(),
            wednesday: day.clone(),
            thursday: day.clone(),
            friday: day.clone(),
            saturday: day.clone(),
            sunday: day,
        }
    }

    #[test]
    fn closed_exception_wins_over_weekly() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 25).unwrap();
        let schedule = CenterSchedule {
            weekly: Some(weekly_all_days(vec![range("09:00", "18:00")])),
            legacy_hours: None,
            exceptions: vec![ScheduleException { date, closed: true, ranges: None }],
        };
        assert!(resolve_open_intervals(&schedule, date).is_empty());
    }

    #[test]
    fn exception_ranges_replace_weekly_without_merging() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 7).unwrap();
        let schedule = CenterSchedule {
            weekly: Some(weekly_all_days(vec![range("09:00", "18:00")])),
            legacy_hours: None,
            exceptions: vec![ScheduleException {
                date,
                closed: false,
                ranges: Some(vec![range("13:00", "15:00")]),
            }],
        };
        assert_eq!(
            resolve_open_intervals(&schedule, date),
            vec![OpenInterval { start_min: 13 * 60, end_min: 15 * 60 }]
        );
    }

    #[test]
    fn exception_without_overrides_falls_through() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 7).unwrap();
        let schedule = CenterSchedule {
            weekly: Some(weekly_all_days(vec![range("09:00", "12:00")])),
            legacy_hours: None,
            exceptions: vec![ScheduleException { date, closed: false, ranges: None }],
        };
        assert_eq!(
            resolve_open_intervals(&schedule, date),
            vec![OpenInterval { start_min: 9 * 60, end_min: 12 * 60 }]
        );
    }

    #[test]
    fn weekly_closed_day_does_not_fall_back_to_legacy() {
        // 2026-09-07 is a Monday.
        let date = NaiveDate::from_ymd_opt(2026, 9, 7).unwrap();
        let schedule = CenterSchedule {
            weekly: Some(WeeklySchedule {
                monday: Some(DaySchedule { closed: true, slots: vec![range("09:00", "18:00")] }),
                ..Default::default()
            }),
            legacy_hours: Some(LegacyHours {
                open: "08:00".to_string(),
                close: "22:00".to_string(),
                closed: false,
            }),
            exceptions: Vec::new(),
        };
        assert!(resolve_open_intervals(&schedule, date).is_empty());
    }

    #[test]
    fn missing_weekday_entry_falls_back_to_legacy() {
        // Tuesday has no weekly entry.
        let date = NaiveDate::from_ymd_opt(2026, 9, 8).unwrap();
        let schedule = CenterSchedule {
            weekly: Some(WeeklySchedule {
                monday: Some(DaySchedule { closed: false, slots: vec![range("09:00", "18:00")] }),
                ..Default::default()
            }),
            legacy_hours: Some(LegacyHours {
                open: "08:00".to_string(),
                close: "22:00".to_string(),
                closed: false,
            }),
            exceptions: Vec::new(),
        };
        assert_eq!(
            resolve_open_intervals(&schedule, date),
            vec![OpenInterval { start_min: 8 * 60, end_min: 22 * 60 }]
        );
    }

    #[test]
    fn empty_configuration_is_closed() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 7).unwrap();
        assert!(resolve_open_intervals(&CenterSchedule::default(), date).is_empty());
    }

    #[test]
    fn invalid_and_inverted_ranges_are_dropped() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 7).unwrap();
        let schedule = CenterSchedule {
            weekly: Some(weekly_all_days(vec![
                range("garbage", "12:00"),
                range("15:00", "13:00"),
                range("18:00", "20:00"),
            ])),
            legacy_hours: None,
            exceptions: Vec::new(),
        };
        assert_eq!(
            resolve_open_intervals(&schedule, date),
            vec![OpenInterval { start_min: 18 * 60, end_min: 20 * 60 }]
        );
    }

    #[test]
    fn intervals_are_sorted_by_start() {
        let date = NaiveDate::from_ymd_opt(2026, 9, 7).unwrap();
        let schedule = CenterSchedule {
            weekly: Some(weekly_all_days(vec![
                range("16:00", "20:00"),
                range("08:00", "12:00"),
            ])),
            legacy_hours: None,
            exceptions: Vec::new(),
        };
        let intervals = resolve_open_intervals(&schedule, date);
        assert_eq!(intervals[0].start_min, 8 * 60);
        assert_eq!(intervals[1].start_min, 16 * 60);
    }
}

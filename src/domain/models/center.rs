use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc, Weekday};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Center {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub timezone: String,
    pub schedule_json: String,
    pub created_at: DateTime<Utc>,
}

impl Center {
    pub fn new(name: String, slug: String, timezone: String, schedule: &CenterSchedule) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            slug,
            timezone,
            schedule_json: serde_json::to_string(schedule).unwrap_or_else(|_| "{}".to_string()),
            created_at: Utc::now(),
        }
    }

    pub fn schedule(&self) -> CenterSchedule {
        serde_json::from_str(&self.schedule_json).unwrap_or_default()
    }
}

/// A "HH:MM".."HH:MM" range within one day.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DaySchedule {
    pub closed: bool,
    pub slots: Vec<TimeRange>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct WeeklySchedule {
    pub monday: Option<DaySchedule>,
    pub tuesday: Option<DaySchedule>,
    pub wednesday: Option<DaySchedule>,
    pub thursday: Option<DaySchedule>,
    pub friday: Option<DaySchedule>,
    pub saturday: Option<DaySchedule>,
    pub sunday: Option<DaySchedule>,
}

impl WeeklySchedule {
    pub fn for_weekday(&self, weekday: Weekday) -> Option<&DaySchedule> {
        match weekday {
            Weekday::Mon => self.monday.as_ref(),
            Weekday::Tue => self.tuesday.as_ref(),
            Weekday::Wed => self.wednesday.as_ref(),
            Weekday::Thu => self.thursday.as_ref(),
            Weekday::Fri => self.friday.as_ref(),
            Weekday::Sat => self.saturday.as_ref(),
            Weekday::Sun => self.sunday.as_ref(),
        }
    }
}

/// Pre-weekly format: a single open/close pair for every day.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LegacyHours {
    pub open: String,
    pub close: String,
    #[serde(default)]
    pub closed: bool,
}

/// Date-specific override. A closed exception wins over everything;
/// explicit ranges replace the weekly/legacy schedule for that date only.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScheduleException {
    pub date: NaiveDate,
    #[serde(default)]
    pub closed: bool,
    pub ranges: Option<Vec<TimeRange>>,
}

/// Typed schedule configuration stored in `centers.schedule_json`.
/// For any given date exactly one source is authoritative:
/// exception > weekly > legacy_hours. Sources are never merged.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CenterSchedule {
    pub weekly: Option<WeeklySchedule>,
    pub legacy_hours: Option<LegacyHours>,
    pub exceptions: Vec<ScheduleException>,
}

impl CenterSchedule {
    pub fn exception_for(&self, date: NaiveDate) -> Option<&ScheduleException> {
        self.exceptions.iter().find(|e| e.date == date)
    }
}

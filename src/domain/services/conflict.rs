use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::models::court::{CourtSports, SportRole};
use crate::domain::models::maintenance::MaintenanceWindow;
use crate::domain::models::reservation::Reservation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    Available,
    Booked,
    Maintenance,
    UserBooked,
    Past,
    Unavailable,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Available => "AVAILABLE",
            SlotStatus::Booked => "BOOKED",
            SlotStatus::Maintenance => "MAINTENANCE",
            SlotStatus::UserBooked => "USER_BOOKED",
            SlotStatus::Past => "PAST",
            SlotStatus::Unavailable => "UNAVAILABLE",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SlotDecision {
    pub status: SlotStatus,
    pub message: Option<String>,
}

impl SlotDecision {
    fn new(status: SlotStatus, message: Option<String>) -> Self {
        Self { status, message }
    }
}

/// Everything the conflict check needs about one court/date. Building the
/// context once and resolving many slots against it keeps the per-slot
/// work allocation-free.
pub struct SlotContext<'a> {
    pub sports: &'a CourtSports,
    pub reservations: &'a [Reservation],
    pub maintenance: &'a [MaintenanceWindow],
    pub requesting_user: Option<&'a str>,
    pub now: DateTime<Utc>,
}

impl SlotContext<'_> {
    /// Pure and deterministic: identical inputs always produce the same
    /// decision, so availability queries are idempotent.
    ///
    /// Priority rules for shared courts: a reservation for the court's
    /// primary sport occupies the court exclusively for its time range,
    /// and a primary-sport request never shares time with anything.
    /// Secondary-sport reservations coexist freely with each other.
    pub fn resolve(&self, start: DateTime<Utc>, end: DateTime<Utc>, requested: &str) -> SlotDecision {
        if start < self.now {
            return SlotDecision::new(SlotStatus::Past, None);
        }

        let Some(role) = self.sports.role_of(requested) else {
            return SlotDecision::new(
                SlotStatus::Unavailable,
                Some(format!("{} is not offered on this court", requested)),
            );
        };

        if self
            .maintenance
            .iter()
            .any(|w| w.is_active() && w.starts_at < end && w.ends_at() > start)
        {
            return SlotDecision::new(
                SlotStatus::Maintenance,
                Some("Court under maintenance".to_string()),
            );
        }

        let overlapping: Vec<&Reservation> = self
            .reservations
            .iter()
            .filter(|r| r.is_blocking() && r.overlaps(start, end))
            .collect();

        let is_own = |r: &&Reservation| self.requesting_user.is_some_and(|u| u == r.user_id);

        if let Some(primary_holder) = overlapping
            .iter()
            .find(|r| self.sports.role_of(&r.sport) == Some(SportRole::Primary))
        {
            let status = if is_own(primary_holder) {
                SlotStatus::UserBooked
            } else {
                SlotStatus::Booked
            };
            return SlotDecision::new(
                status,
                Some(format!("Reserved for {}", primary_holder.sport)),
            );
        }

        if role == SportRole::Primary && !overlapping.is_empty() {
            let status = if overlapping.iter().any(is_own) {
                SlotStatus::UserBooked
            } else {
                SlotStatus::Booked
            };
            return SlotDecision::new(
                status,
                Some(format!("{} needs the whole court", requested)),
            );
        }

        SlotDecision::new(SlotStatus::Available, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sports() -> CourtSports {
        CourtSports {
            primary: "Fútbol".to_string(),
            allowed: vec!["Voleibol".to_string(), "Básquet".to_string()],
        }
    }

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 7, hour, min, 0).unwrap()
    }

    fn reservation(sport: &str, user: &str, start: DateTime<Utc>, end: DateTime<Utc>, status: &str) -> Reservation {
        Reservation {
            id: "r1".to_string(),
            court_id: "c1".to_string(),
            user_id: user.to_string(),
            sport: sport.to_string(),
            start_time: start,
            end_time: end,
            status: status.to_string(),
            payment_status: "UNPAID".to_string(),
            payment_method: None,
            total_price: 20.0,
            paid_amount: None,
            created_at: at(0, 0),
        }
    }

    fn window(start: DateTime<Utc>, duration_min: i32, status: &str) -> MaintenanceWindow {
        MaintenanceWindow {
            id: "m1".to_string(),
            court_id: "c1".to_string(),
            starts_at: start,
            duration_min,
            status: status.to_string(),
            reason: None,
            created_at: at(0, 0),
        }
    }

    fn ctx<'a>(
        sports: &'a CourtSports,
        reservations: &'a [Reservation],
        maintenance: &'a [MaintenanceWindow],
    ) -> SlotContext<'a> {
        SlotContext {
            sports,
            reservations,
            maintenance,
            requesting_user: Some("me"),
            now: at(0, 0),
        }
    }

    #[test]
    fn primary_reservation_blocks_every_sport() {
        let sports = sports();
        let existing = [reservation("Fútbol", "other", at(10, 0), at(11, 0), "PAID")];
        let ctx = ctx(&sports, &existing, &[]);

        // Overlapping secondary request is rejected.
        assert_eq!(ctx.resolve(at(10, 30), at(11, 30), "Voleibol").status, SlotStatus::Booked);
        // So is a re-request of the primary sport itself.
        assert_eq!(ctx.resolve(at(10, 0), at(11, 0), "Fútbol").status, SlotStatus::Booked);
    }

    #[test]
    fn primary_request_never_shares_with_secondary() {
        let sports = sports();
        let existing = [reservation("Voleibol", "other", at(10, 0), at(11, 0), "PENDING")];
        let ctx = ctx(&sports, &existing, &[]);
        assert_eq!(ctx.resolve(at(10, 0), at(11, 0), "Fútbol").status, SlotStatus::Booked);
    }

    #[test]
    fn secondary_sports_coexist() {
        let sports = sports();
        let existing = [
            reservation("Voleibol", "a", at(10, 0), at(11, 0), "PAID"),
            reservation("Básquet", "b", at(10, 0), at(11, 0), "PENDING"),
        ];
        let ctx = ctx(&sports, &existing, &[]);
        assert_eq!(ctx.resolve(at(10, 0), at(11, 0), "Básquet").status, SlotStatus::Available);
        assert_eq!(ctx.resolve(at(10, 30), at(11, 30), "Voleibol").status, SlotStatus::Available);
    }

    #[test]
    fn maintenance_blocks_regardless_of_sport() {
        let sports = sports();
        let windows = [window(at(10, 0), 60, "IN_PROGRESS")];
        let ctx = ctx(&sports, &[], &windows);
        assert_eq!(ctx.resolve(at(10, 30), at(11, 30), "Voleibol").status, SlotStatus::Maintenance);
        assert_eq!(ctx.resolve(at(9, 30), at(10, 30), "Fútbol").status, SlotStatus::Maintenance);
    }

    #[test]
    fn cancelled_maintenance_and_reservations_do_not_block() {
        let sports = sports();
        let existing = [reservation("Fútbol", "other", at(10, 0), at(11, 0), "CANCELLED")];
        let windows = [window(at(10, 0), 60, "CANCELLED")];
        let ctx = ctx(&sports, &existing, &windows);
        assert_eq!(ctx.resolve(at(10, 0), at(11, 0), "Fútbol").status, SlotStatus::Available);
    }

    #[test]
    fn own_reservation_reports_user_booked() {
        let sports = sports();
        let existing = [reservation("Fútbol", "me", at(10, 0), at(11, 0), "PAID")];
        let ctx = ctx(&sports, &existing, &[]);
        assert_eq!(ctx.resolve(at(10, 0), at(11, 0), "Fútbol").status, SlotStatus::UserBooked);
    }

    #[test]
    fn unsupported_sport_is_unavailable() {
        let sports = sports();
        let ctx = ctx(&sports, &[], &[]);
        assert_eq!(ctx.resolve(at(10, 0), at(11, 0), "Tenis").status, SlotStatus::Unavailable);
    }

    #[test]
    fn past_slot_wins_over_everything() {
        let sports = sports();
        let existing = [reservation("Fútbol", "other", at(10, 0), at(11, 0), "PAID")];
        let mut ctx = ctx(&sports, &existing, &[]);
        ctx.now = at(12, 0);
        assert_eq!(ctx.resolve(at(10, 0), at(11, 0), "Voleibol").status, SlotStatus::Past);
    }

    #[test]
    fn touching_ranges_do_not_conflict() {
        let sports = sports();
        let existing = [reservation("Fútbol", "other", at(10, 0), at(11, 0), "PAID")];
        let ctx = ctx(&sports, &existing, &[]);
        assert_eq!(ctx.resolve(at(11, 0), at(12, 0), "Fútbol").status, SlotStatus::Available);
        assert_eq!(ctx.resolve(at(9, 0), at(10, 0), "Voleibol").status, SlotStatus::Available);
    }
}

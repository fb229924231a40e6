use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use std::collections::BTreeMap;
use std::sync::Arc;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::info;

use crate::api::dtos::requests::AvailabilityQuery;
use crate::api::dtos::responses::{AvailabilityResponse, AvailabilitySlot};
use crate::api::extractors::maybe_auth::MaybeAuthUser;
use crate::domain::services::conflict::SlotContext;
use crate::domain::services::schedule::{resolve_open_intervals, MINUTES_PER_DAY};
use crate::domain::services::slots::candidate_slots;
use crate::error::AppError;
use crate::state::AppState;

/// Availability for one court and date: schedule resolution, candidate
/// slot generation and conflict checking composed into the slot list the
/// booking UI renders.
pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(maybe_user): MaybeAuthUser,
    Path(court_id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, AppError> {
    let court = state.court_repo.find_by_id(&court_id).await?
        .ok_or(AppError::NotFound("Court not found".into()))?;

    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format".into()))?;

    if query.duration <= 0 || query.duration > MINUTES_PER_DAY as i64 {
        return Err(AppError::Validation("Duration must be between 1 and 1440 minutes".into()));
    }

    let sport = query.sport.unwrap_or_else(|| court.primary_sport.clone());
    let sports = court.sports();

    let mut slots = Vec::new();
    let mut summary: BTreeMap<&'static str, usize> = BTreeMap::new();

    // An inactive court publishes no slots at all.
    if court.is_active {
        let center = state.center_repo.find_by_id(&court.center_id).await?
            .ok_or(AppError::InternalWithMsg(format!("Center {} missing for court {}", court.center_id, court.id)))?;

        let tz: Tz = center.timezone.parse().unwrap_or(chrono_tz::UTC);

        let day_start = minute_to_utc(date, 0, &tz)
            .ok_or(AppError::Validation("Invalid date for center timezone".into()))?;
        let day_end = minute_to_utc(date, MINUTES_PER_DAY, &tz)
            .ok_or(AppError::Validation("Invalid date for center timezone".into()))?;

        let reservations = state.reservation_repo
            .list_blocking_for_range(&court.id, day_start, day_end)
            .await?;
        let maintenance = state.maintenance_repo
            .list_active_for_range(&court.id, day_start, day_end)
            .await?;

        let ctx = SlotContext {
            sports: &sports,
            reservations: &reservations,
            maintenance: &maintenance,
            requesting_user: maybe_user.as_ref().map(|u| u.id.as_str()),
            now: Utc::now(),
        };

        let intervals = resolve_open_intervals(&center.schedule(), date);
        for candidate in candidate_slots(&intervals, query.duration as u16, state.config.slot_step_minutes) {
            // DST gaps make some local minutes unrepresentable; skip those.
            let (Some(start), Some(end)) = (
                minute_to_utc(date, candidate.start_min, &tz),
                minute_to_utc(date, candidate.end_min, &tz),
            ) else {
                continue;
            };

            let decision = ctx.resolve(start, end, &sport);
            *summary.entry(decision.status.as_str()).or_insert(0) += 1;
            slots.push(AvailabilitySlot {
                start,
                end,
                status: decision.status,
                message: decision.message,
            });
        }
    }

    info!("Availability computed for court {} on {}: {} slots", court_id, query.date, slots.len());

    Ok(Json(AvailabilityResponse {
        court_id,
        date: query.date,
        sport,
        slots,
        summary,
    }))
}

/// Converts a minute-of-day on a local date to a UTC instant; minute 1440
/// is midnight of the following day.
pub fn minute_to_utc(date: NaiveDate, minute: u16, tz: &Tz) -> Option<chrono::DateTime<Utc>> {
    let (date, minute) = if minute >= MINUTES_PER_DAY {
        (date.succ_opt()?, minute - MINUTES_PER_DAY)
    } else {
        (date, minute)
    };
    let time = NaiveTime::from_hms_opt(minute as u32 / 60, minute as u32 % 60, 0)?;
    tz.from_local_datetime(&date.and_time(time))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

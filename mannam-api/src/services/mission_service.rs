use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use mannam_shared::errors::{AppError, AppResult, ErrorCode};

use crate::events::publisher;
use crate::matching::lifecycle::Role;
use crate::mission::planner::MissionPlanner;
use crate::models::{
    CheckStatus, Match, Mission, MissionStatus, NewMission, NewNoShowCheck, Profile,
};
use crate::schema::{matches, missions, no_show_checks, profiles};
use crate::AppState;

/// Default meeting point when either participant lacks coordinates
/// (Seoul city hall).
const DEFAULT_PLACE: (f64, f64) = (37.5665, 126.978);

const MEETING_OFFSET_DAYS: i64 = 3;
const MEETING_HOUR: u32 = 14;

/// Meetings are fixed at 14:00, three days out.
fn meeting_schedule(now: DateTime<Utc>) -> (NaiveDate, NaiveTime) {
    let date = (now + Duration::days(MEETING_OFFSET_DAYS)).date_naive();
    let time = NaiveTime::from_hms_opt(MEETING_HOUR, 0, 0).unwrap_or_default();
    (date, time)
}

/// Departure must be confirmed between one hour before the meeting and the
/// meeting itself; the window opens at exactly one hour before.
fn confirmation_open(now: DateTime<Utc>, meeting: DateTime<Utc>) -> bool {
    now >= meeting - Duration::hours(1)
}

fn midpoint(a: Option<(f64, f64)>, b: Option<(f64, f64)>) -> (f64, f64) {
    match (a, b) {
        (Some((lat_a, lng_a)), Some((lat_b, lng_b))) => {
            ((lat_a + lat_b) / 2.0, (lng_a + lng_b) / 2.0)
        }
        _ => DEFAULT_PLACE,
    }
}

/// Generates the mission for a freshly accepted match. Returns `None` on any
/// unrecoverable failure; the acceptance stands either way.
pub async fn generate(state: &AppState, accepted: &Match) -> Option<Uuid> {
    let mut conn = state
        .db
        .get()
        .map_err(|e| tracing::error!(error = %e, "no db connection for mission generation"))
        .ok()?;

    let profile_a: Option<Profile> = profiles::table
        .find(accepted.user_a_id)
        .first(&mut conn)
        .optional()
        .unwrap_or(None);
    let profile_b: Option<Profile> = profiles::table
        .find(accepted.user_b_id)
        .first(&mut conn)
        .optional()
        .unwrap_or(None);

    // The AI path needs both profiles; without them the random draw stands.
    let proposal = match (&profile_a, &profile_b) {
        (Some(a), Some(b)) => {
            MissionPlanner {
                ai: state.ai.as_ref(),
            }
            .plan(a, b)
            .await
        }
        _ => {
            let draft = crate::mission::planner::random_proposal(&mut rand::thread_rng());
            crate::mission::planner::validate(draft.clone()).unwrap_or(draft)
        }
    };

    let (place_lat, place_lng) = midpoint(
        profile_a.as_ref().map(|p| (p.activity_lat, p.activity_lng)),
        profile_b.as_ref().map(|p| (p.activity_lat, p.activity_lng)),
    );
    let (meeting_date, meeting_time) = meeting_schedule(Utc::now());
    let deadline = meeting_date.and_time(meeting_time).and_utc() - Duration::hours(1);

    let new_mission = NewMission {
        match_id: accepted.id,
        place_name: proposal.place_name.clone(),
        place_address: format!("{} (exact address shared on the day)", proposal.place_name),
        place_lat,
        place_lng,
        place_category: proposal.place_category,
        user_a_prop_category: proposal.prop_a_category,
        user_a_prop_name: proposal.prop_a_name,
        user_b_prop_category: proposal.prop_b_category,
        user_b_prop_name: proposal.prop_b_name,
        user_a_action: Some(proposal.action_a),
        user_b_action: Some(proposal.action_b),
        meeting_date,
        meeting_time,
        ai_place_rationale: proposal.place_rationale,
        ai_prop_rationale_a: proposal.prop_a_rationale,
        ai_prop_rationale_b: proposal.prop_b_rationale,
    };

    // The mission and its two checks live or die together; a crash mid-way
    // must not leave a mission nobody is held accountable for.
    let user_a_id = accepted.user_a_id;
    let user_b_id = accepted.user_b_id;
    let mission: Mission = conn
        .transaction::<Mission, diesel::result::Error, _>(|conn| {
            let mission: Mission = diesel::insert_into(missions::table)
                .values(&new_mission)
                .get_result(conn)?;

            diesel::insert_into(no_show_checks::table)
                .values(&vec![
                    NewNoShowCheck {
                        mission_id: mission.id,
                        user_id: user_a_id,
                        check_deadline: deadline,
                    },
                    NewNoShowCheck {
                        mission_id: mission.id,
                        user_id: user_b_id,
                        check_deadline: deadline,
                    },
                ])
                .execute(conn)?;

            Ok(mission)
        })
        .map_err(|e| {
            tracing::error!(error = %e, match_id = %accepted.id, "mission persistence failed")
        })
        .ok()?;

    tracing::info!(
        mission_id = %mission.id,
        match_id = %accepted.id,
        place = %mission.place_name,
        "mission generated"
    );

    publisher::publish_mission_created(
        &state.rabbitmq,
        mission.id,
        accepted.id,
        &mission.place_name,
        mission.meeting_datetime(),
    )
    .await;

    Some(mission.id)
}

#[derive(Debug, Serialize)]
pub struct MissionView {
    #[serde(flatten)]
    pub mission: Mission,
    pub role: &'static str,
    pub partner_id: Uuid,
    pub partner_nickname: String,
}

/// Participant-only mission read, resolved through the parent match.
pub fn get_mission(state: &AppState, mission_id: Uuid, user_id: Uuid) -> AppResult<MissionView> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let mission: Mission = missions::table
        .find(mission_id)
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::MissionNotFound, "mission not found"))?;

    let parent: Match = matches::table.find(mission.match_id).first(&mut conn)?;
    let role = Role::of(parent.user_a_id, parent.user_b_id, user_id).ok_or_else(|| {
        AppError::new(ErrorCode::NotParticipant, "you are not part of this mission")
    })?;

    let partner_id = match role {
        Role::UserA => parent.user_b_id,
        Role::UserB => parent.user_a_id,
    };
    let partner_nickname: String = profiles::table
        .find(partner_id)
        .select(profiles::nickname)
        .first(&mut conn)
        .optional()?
        .unwrap_or_default();

    Ok(MissionView {
        mission,
        role: match role {
            Role::UserA => "user_a",
            Role::UserB => "user_b",
        },
        partner_id,
        partner_nickname,
    })
}

#[derive(Debug, Serialize)]
pub struct DepartureOutcome {
    pub both_confirmed: bool,
}

/// Departure confirmation: flips the caller's mission flag and their
/// no-show check, inside the one-hour window before the meeting.
pub async fn confirm_departure(
    state: &AppState,
    mission_id: Uuid,
    user_id: Uuid,
) -> AppResult<DepartureOutcome> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let mission: Mission = missions::table
        .find(mission_id)
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::MissionNotFound, "mission not found"))?;

    if mission.status != MissionStatus::Scheduled.as_str() {
        return Err(AppError::new(
            ErrorCode::InvalidMissionState,
            "departure can only be confirmed for a scheduled mission",
        ));
    }

    let now = Utc::now();
    if !confirmation_open(now, mission.meeting_datetime()) {
        return Err(AppError::new(
            ErrorCode::TooEarlyToConfirm,
            "departure confirmation opens one hour before the meeting",
        ));
    }

    let parent: Match = matches::table.find(mission.match_id).first(&mut conn)?;
    let role = Role::of(parent.user_a_id, parent.user_b_id, user_id).ok_or_else(|| {
        AppError::new(ErrorCode::NotParticipant, "you are not part of this mission")
    })?;

    let updated: Mission = match role {
        Role::UserA => diesel::update(missions::table.find(mission_id))
            .set(missions::user_a_departure_confirmed.eq(true))
            .get_result(&mut conn)?,
        Role::UserB => diesel::update(missions::table.find(mission_id))
            .set(missions::user_b_departure_confirmed.eq(true))
            .get_result(&mut conn)?,
    };

    diesel::update(
        no_show_checks::table
            .filter(no_show_checks::mission_id.eq(mission_id))
            .filter(no_show_checks::user_id.eq(user_id))
            .filter(no_show_checks::status.eq(CheckStatus::Pending.as_str())),
    )
    .set((
        no_show_checks::status.eq(CheckStatus::Confirmed.as_str()),
        no_show_checks::confirmed_at.eq(Some(now)),
    ))
    .execute(&mut conn)?;

    let both_confirmed = updated.user_a_departure_confirmed && updated.user_b_departure_confirmed;

    publisher::publish_departure_confirmed(&state.rabbitmq, mission_id, user_id, both_confirmed)
        .await;

    tracing::info!(
        mission_id = %mission_id,
        user_id = %user_id,
        both_confirmed,
        "departure confirmed"
    );

    Ok(DepartureOutcome { both_confirmed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn meetings_are_three_days_out_at_1400() {
        let now = Utc.with_ymd_and_hms(2026, 7, 10, 9, 30, 0).unwrap();
        let (date, time) = meeting_schedule(now);
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 7, 13).unwrap());
        assert_eq!(time, NaiveTime::from_hms_opt(14, 0, 0).unwrap());
    }

    #[test]
    fn confirmation_window_opens_exactly_one_hour_before() {
        let meeting = Utc.with_ymd_and_hms(2026, 7, 13, 14, 0, 0).unwrap();
        let open = meeting - Duration::hours(1);
        assert!(confirmation_open(open, meeting));
        assert!(confirmation_open(open + Duration::seconds(1), meeting));
        assert!(!confirmation_open(open - Duration::seconds(1), meeting));
    }

    #[test]
    fn midpoint_averages_both_coordinates() {
        let (lat, lng) = midpoint(Some((37.0, 127.0)), Some((38.0, 126.0)));
        assert_eq!(lat, 37.5);
        assert_eq!(lng, 126.5);
    }

    #[test]
    fn missing_coordinates_fall_back_to_default_point() {
        assert_eq!(midpoint(None, Some((37.0, 127.0))), DEFAULT_PLACE);
        assert_eq!(midpoint(None, None), DEFAULT_PLACE);
    }
}

//! No-show enforcement. The sweep converts pending checks whose deadline has
//! passed into recorded no-shows, cancels the affected mission, and bans
//! repeat offenders. Reminders go out in the hour before the confirmation
//! window closes.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use mannam_shared::errors::{AppError, AppResult};

use crate::events::publisher;
use crate::models::{CheckStatus, Match, Mission, MissionStatus, NoShowCheck, NotificationKind};
use crate::schema::{matches, missions, no_show_checks, profiles};
use crate::services::notification_service::{self, Notify};
use crate::AppState;

const BAN_THRESHOLD: i32 = 3;

const NO_SHOW_BODY: &str = "You were marked as a no-show because you did not confirm departure";
const PARTNER_BODY: &str = "The other user did not show up, so the mission was cancelled";

/// One "Mission cancelled" notice per participant, body chosen by whether
/// that participant's own check flipped in this run. A double no-show gets
/// the no-show message on both sides, never two contradictory ones.
fn mission_notices(user_a: Uuid, user_b: Uuid, no_shows: &[Uuid]) -> Vec<(Uuid, &'static str)> {
    [user_a, user_b]
        .into_iter()
        .map(|user| {
            let body = if no_shows.contains(&user) {
                NO_SHOW_BODY
            } else {
                PARTNER_BODY
            };
            (user, body)
        })
        .collect()
}

/// Processes every overdue pending check. Each check is claimed with a
/// status-guarded update, so concurrent sweeps and late departure
/// confirmations cannot double-count the same check.
pub async fn sweep(state: &AppState) -> AppResult<usize> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let now = Utc::now();

    // Selection is by check state alone. A sweep that died between claiming
    // one participant's check and the other's leaves the mission already
    // cancelled; the partner's check must still be claimed on the next tick.
    let overdue: Vec<(NoShowCheck, Mission)> = no_show_checks::table
        .inner_join(missions::table)
        .filter(no_show_checks::status.eq(CheckStatus::Pending.as_str()))
        .filter(no_show_checks::check_deadline.lt(now))
        .load(&mut conn)?;

    let mut recorded = 0usize;
    let mut flipped: HashMap<Uuid, (Mission, Vec<Uuid>)> = HashMap::new();

    for (check, mission) in overdue {
        let claimed = diesel::update(
            no_show_checks::table
                .filter(no_show_checks::id.eq(check.id))
                .filter(no_show_checks::status.eq(CheckStatus::Pending.as_str())),
        )
        .set(no_show_checks::status.eq(CheckStatus::NoShow.as_str()))
        .execute(&mut conn)?;
        if claimed == 0 {
            continue;
        }
        recorded += 1;

        let no_show_count: i32 = diesel::update(profiles::table.find(check.user_id))
            .set(profiles::no_show_count.eq(profiles::no_show_count + 1))
            .returning(profiles::no_show_count)
            .get_result(&mut conn)?;

        let banned = no_show_count >= BAN_THRESHOLD;
        if banned {
            diesel::update(profiles::table.find(check.user_id))
                .set(profiles::status.eq("banned"))
                .execute(&mut conn)?;
            tracing::warn!(
                user_id = %check.user_id,
                no_show_count,
                "user banned after repeated no-shows"
            );
            publisher::publish_user_banned(&state.rabbitmq, check.user_id, no_show_count).await;
        }

        publisher::publish_noshow_recorded(
            &state.rabbitmq,
            check.id,
            mission.id,
            check.user_id,
            no_show_count,
            banned,
        )
        .await;

        let key = mission.id;
        flipped
            .entry(key)
            .or_insert_with(|| (mission, Vec::new()))
            .1
            .push(check.user_id);
    }

    for (mission, no_shows) in flipped.into_values() {
        close_mission(state, &mut conn, &mission, &no_shows).await?;
    }

    tracing::info!(recorded, "no-show sweep finished");
    Ok(recorded)
}

/// Cancels the mission the no-shows belong to and tells both sides what
/// happened, once each. A mission already cancelled by an earlier run is
/// left alone but the notifications for the newly claimed check still go out.
async fn close_mission(
    state: &AppState,
    conn: &mut PgConnection,
    mission: &Mission,
    no_shows: &[Uuid],
) -> AppResult<()> {
    let cancelled = diesel::update(
        missions::table
            .filter(missions::id.eq(mission.id))
            .filter(missions::status.eq(MissionStatus::Scheduled.as_str())),
    )
    .set(missions::status.eq(MissionStatus::Cancelled.as_str()))
    .execute(conn)?;

    if cancelled > 0 {
        publisher::publish_mission_cancelled(&state.rabbitmq, mission.id, mission.match_id, "no_show")
            .await;
    }

    let parent: Match = matches::table.find(mission.match_id).first(conn)?;
    for (user_id, body) in mission_notices(parent.user_a_id, parent.user_b_id, no_shows) {
        notification_service::notify(
            state,
            Notify {
                user_id,
                kind: NotificationKind::NoShow,
                title: "Mission cancelled",
                body,
                related_match_id: Some(mission.match_id),
                related_mission_id: Some(mission.id),
            },
        )
        .await;
    }

    Ok(())
}

/// Reminds users whose confirmation deadline falls between one and two hours
/// from now. Read-only: a user reminded this run falls out of the window by
/// the next one.
pub async fn send_departure_reminders(state: &AppState) -> AppResult<usize> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let now = Utc::now();
    let window_start = now + Duration::hours(1);
    let window_end = now + Duration::hours(2);

    let upcoming: Vec<(NoShowCheck, Mission)> = no_show_checks::table
        .inner_join(missions::table)
        .filter(no_show_checks::status.eq(CheckStatus::Pending.as_str()))
        .filter(no_show_checks::check_deadline.ge(window_start))
        .filter(no_show_checks::check_deadline.le(window_end))
        .filter(missions::status.eq(MissionStatus::Scheduled.as_str()))
        .load(&mut conn)?;

    let mut sent = 0usize;
    for (check, mission) in upcoming {
        notification_service::notify(
            state,
            Notify {
                user_id: check.user_id,
                kind: NotificationKind::DepartureReminder,
                title: "Your mission is coming up",
                body: "Confirm your departure before the deadline or you will be marked as a no-show",
                related_match_id: Some(mission.match_id),
                related_mission_id: Some(mission.id),
            },
        )
        .await;
        sent += 1;
    }

    tracing::info!(sent, "departure reminders sent");
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uuid(n: u8) -> Uuid {
        Uuid::from_bytes([n; 16])
    }

    #[test]
    fn no_show_user_and_partner_get_different_messages() {
        let notices = mission_notices(uuid(1), uuid(2), &[uuid(1)]);
        assert_eq!(
            notices,
            vec![(uuid(1), NO_SHOW_BODY), (uuid(2), PARTNER_BODY)]
        );
    }

    #[test]
    fn double_no_show_sends_one_notice_per_participant() {
        let notices = mission_notices(uuid(1), uuid(2), &[uuid(1), uuid(2)]);
        assert_eq!(notices.len(), 2);
        assert!(notices.iter().all(|(_, body)| *body == NO_SHOW_BODY));
    }

    #[test]
    fn late_claim_still_produces_both_notices() {
        // Second tick after a crash: only the partner's check flips now, the
        // mission is already cancelled, and both sides still hear about it.
        let notices = mission_notices(uuid(1), uuid(2), &[uuid(2)]);
        assert_eq!(
            notices,
            vec![(uuid(1), PARTNER_BODY), (uuid(2), NO_SHOW_BODY)]
        );
    }
}

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Duration, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use mannam_shared::errors::{AppError, AppResult, ErrorCode};

use crate::events::publisher;
use crate::matching::lifecycle::{self, AcceptanceView, PairKey, ResponseError, Role, Transition};
use crate::matching::scoring::{self, AnswerMap, AuthoredQuestions, Scores};
use crate::matching::selector::{self, CandidateView, RequesterView};
use crate::models::{Match, MatchStatus, NewMatch, NotificationKind, Profile};
use crate::schema::{custom_question_answers, custom_questions, matches, missions, profiles, questions, user_answers};
use crate::services::{mission_service, notification_service};
use crate::services::notification_service::Notify;
use crate::AppState;

const MIN_ANSWERS_FOR_MATCHING: i64 = 5;

#[derive(Debug, Serialize)]
pub struct MatchOutcome {
    pub match_id: Uuid,
    pub compatibility: f64,
    pub distance_km: f64,
}

/// Find-match: filter and rank candidates, persist the winning pair, then
/// run the best-effort extras (AI description, notifications).
pub async fn run_matching(state: &AppState, user_id: Uuid) -> AppResult<MatchOutcome> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let me: Profile = profiles::table
        .find(user_id)
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))?;

    if me.status != "active" {
        return Err(AppError::new(
            ErrorCode::ProfileInactive,
            "an active profile is required for matching",
        ));
    }

    let answered: i64 = user_answers::table
        .filter(user_answers::user_id.eq(user_id))
        .count()
        .get_result(&mut conn)?;
    if answered < MIN_ANSWERS_FOR_MATCHING {
        return Err(AppError::with_details(
            ErrorCode::InsufficientAnswers,
            "answer at least 5 questions before matching",
            serde_json::json!({ "answered": answered, "required": MIN_ANSWERS_FOR_MATCHING }),
        ));
    }

    // Anyone sharing a match row with the requester is permanently excluded,
    // whatever that match's status ended up as.
    let mut excluded = HashSet::from([user_id]);
    let prior: Vec<(Uuid, Uuid)> = matches::table
        .filter(matches::user_a_id.eq(user_id).or(matches::user_b_id.eq(user_id)))
        .select((matches::user_a_id, matches::user_b_id))
        .load(&mut conn)?;
    for (a, b) in prior {
        excluded.insert(a);
        excluded.insert(b);
    }

    let mut candidate_query = profiles::table
        .filter(profiles::status.eq("active"))
        .filter(profiles::id.ne(user_id))
        .into_boxed();
    if me.preferred_gender != "any" {
        candidate_query = candidate_query.filter(profiles::gender.eq(me.preferred_gender.clone()));
    }
    let candidate_profiles: Vec<Profile> = candidate_query.load(&mut conn)?;

    let requester = RequesterView {
        id: me.id,
        gender: me.gender.clone(),
        preferred_gender: me.preferred_gender.clone(),
        preferred_age_min: me.preferred_age_min,
        preferred_age_max: me.preferred_age_max,
        preferred_distance_km: me.preferred_distance_km,
        activity_lat: me.activity_lat,
        activity_lng: me.activity_lng,
    };
    let candidates: Vec<CandidateView> = candidate_profiles
        .iter()
        .map(|p| CandidateView {
            id: p.id,
            gender: p.gender.clone(),
            preferred_gender: p.preferred_gender.clone(),
            birth_year: p.birth_year,
            activity_lat: p.activity_lat,
            activity_lng: p.activity_lng,
        })
        .collect();

    let question_weights: HashMap<Uuid, i32> = questions::table
        .filter(questions::is_active.eq(true))
        .select((questions::id, questions::weight))
        .load::<(Uuid, i32)>(&mut conn)?
        .into_iter()
        .collect();
    let my_answers = load_answers(&mut conn, user_id)?;
    let my_questions = load_authored_questions(&mut conn, user_id)?;
    let my_custom_answers = load_custom_answers(&mut conn, user_id)?;

    let best = selector::find_best_match(
        &requester,
        &candidates,
        &excluded,
        Utc::now().year(),
        |candidate_id| {
            score_candidate(
                &mut conn,
                &question_weights,
                &my_answers,
                &my_questions,
                &my_custom_answers,
                candidate_id,
            )
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, candidate_id = %candidate_id, "candidate scoring failed");
                Scores {
                    similarity: 0.0,
                    custom_bonus: 0.0,
                    compatibility: 0.0,
                }
            })
        },
    )
    .ok_or_else(|| AppError::new(ErrorCode::NoCandidate, "no eligible candidate right now"))?;

    let pair = PairKey::new(user_id, best.candidate_id);
    let expires_at = Utc::now() + Duration::days(state.config.match_expiry_days);

    // The unique constraint on the ordered pair is the real race guard;
    // losing the race is a normal, user-visible outcome.
    let created: Match = diesel::insert_into(matches::table)
        .values(&NewMatch {
            user_a_id: pair.a,
            user_b_id: pair.b,
            similarity_score: best.similarity,
            compatibility_score: best.compatibility,
            distance_km: Some(best.distance_km),
            expires_at: Some(expires_at),
        })
        .get_result(&mut conn)
        .map_err(|e| {
            AppError::map_unique_violation(
                e,
                ErrorCode::AlreadyMatched,
                "you have already been matched with this user",
            )
        })?;

    tracing::info!(
        match_id = %created.id,
        user_a = %created.user_a_id,
        user_b = %created.user_b_id,
        compatibility = created.compatibility_score,
        "match created"
    );

    publisher::publish_match_created(
        &state.rabbitmq,
        created.id,
        created.user_a_id,
        created.user_b_id,
        created.compatibility_score,
        expires_at,
    )
    .await;

    describe_match_best_effort(state, &created, &me, &candidate_profiles, best.candidate_id).await;

    let body = format!(
        "You've been matched with {}% compatibility",
        (best.compatibility * 100.0).round() as i64
    );
    for participant in [created.user_a_id, created.user_b_id] {
        notification_service::notify(
            state,
            Notify {
                user_id: participant,
                kind: NotificationKind::MatchNew,
                title: "New match!",
                body: &body,
                related_match_id: Some(created.id),
                related_mission_id: None,
            },
        )
        .await;
    }

    Ok(MatchOutcome {
        match_id: created.id,
        compatibility: created.compatibility_score,
        distance_km: best.distance_km,
    })
}

/// AI compatibility description. Everything in here is optional; any failure
/// leaves the match exactly as created.
async fn describe_match_best_effort(
    state: &AppState,
    created: &Match,
    me: &Profile,
    candidates: &[Profile],
    candidate_id: Uuid,
) {
    let Some(ai) = &state.ai else { return };
    let Some(candidate) = candidates.iter().find(|p| p.id == candidate_id) else {
        return;
    };

    let (profile_a, profile_b) = if me.id == created.user_a_id {
        (me, candidate)
    } else {
        (candidate, me)
    };

    let Some(description) = ai
        .describe_match(profile_a, profile_b, created.similarity_score)
        .await
    else {
        return;
    };

    let update = state.db.get().map_err(|e| e.to_string()).and_then(|mut conn| {
        diesel::update(matches::table.find(created.id))
            .set(matches::ai_description.eq(&description))
            .execute(&mut conn)
            .map_err(|e| e.to_string())
    });
    if let Err(e) = update {
        tracing::warn!(error = %e, match_id = %created.id, "failed to store AI match description");
    }
}

fn score_candidate(
    conn: &mut PgConnection,
    question_weights: &HashMap<Uuid, i32>,
    my_answers: &AnswerMap,
    my_questions: &AuthoredQuestions,
    my_custom_answers: &AnswerMap,
    candidate_id: Uuid,
) -> AppResult<Scores> {
    let their_answers = load_answers(conn, candidate_id)?;
    let their_questions = load_authored_questions(conn, candidate_id)?;
    let their_custom_answers = load_custom_answers(conn, candidate_id)?;

    Ok(scoring::compute_scores(
        question_weights,
        my_answers,
        &their_answers,
        my_questions,
        &their_custom_answers,
        &their_questions,
        my_custom_answers,
    ))
}

fn load_answers(conn: &mut PgConnection, user_id: Uuid) -> AppResult<AnswerMap> {
    Ok(user_answers::table
        .filter(user_answers::user_id.eq(user_id))
        .select((user_answers::question_id, user_answers::answer))
        .load::<(Uuid, String)>(conn)?
        .into_iter()
        .collect())
}

fn load_authored_questions(conn: &mut PgConnection, user_id: Uuid) -> AppResult<AuthoredQuestions> {
    Ok(custom_questions::table
        .filter(custom_questions::author_id.eq(user_id))
        .filter(custom_questions::is_active.eq(true))
        .select((custom_questions::id, custom_questions::preferred_answer))
        .load(conn)?)
}

fn load_custom_answers(conn: &mut PgConnection, user_id: Uuid) -> AppResult<AnswerMap> {
    Ok(custom_question_answers::table
        .filter(custom_question_answers::user_id.eq(user_id))
        .select((custom_question_answers::question_id, custom_question_answers::answer))
        .load::<(Uuid, String)>(conn)?
        .into_iter()
        .collect())
}

#[derive(Debug, Serialize)]
pub struct RespondOutcome {
    pub status: String,
    pub my_accepted: bool,
    pub mission_id: Option<Uuid>,
}

/// Accept or reject a pending match. The read-decide-write runs inside a
/// `FOR UPDATE` transaction so both participants responding at once
/// serialize; exactly one response can observe "partner already accepted".
pub async fn respond(
    state: &AppState,
    match_id: Uuid,
    user_id: Uuid,
    accept: bool,
) -> AppResult<RespondOutcome> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let (updated, role, transition) = conn.transaction::<(Match, Role, Transition), AppError, _>(|conn| {
        let row: Match = matches::table
            .find(match_id)
            .for_update()
            .first(conn)
            .optional()?
            .ok_or_else(|| AppError::new(ErrorCode::MatchNotFound, "match not found"))?;

        let role = Role::of(row.user_a_id, row.user_b_id, user_id).ok_or_else(|| {
            AppError::new(ErrorCode::NotParticipant, "you are not part of this match")
        })?;

        let status = MatchStatus::parse(&row.status)
            .ok_or_else(|| AppError::internal(format!("unknown match status {}", row.status)))?;
        let view = AcceptanceView {
            status,
            user_a_accepted: row.user_a_accepted,
            user_b_accepted: row.user_b_accepted,
        };

        let transition = lifecycle::apply_response(view, role, accept).map_err(|e| match e {
            ResponseError::AlreadyResolved => {
                AppError::new(ErrorCode::AlreadyResolved, "this match has already been resolved")
            }
            ResponseError::AlreadyResponded => {
                AppError::new(ErrorCode::AlreadyResponded, "you have already responded to this match")
            }
        })?;

        let new_status = match transition {
            Transition::Rejected => MatchStatus::Rejected,
            Transition::MutualAccept => MatchStatus::Accepted,
            Transition::AcceptedPendingPartner => MatchStatus::Pending,
        };

        let updated: Match = match role {
            Role::UserA => diesel::update(matches::table.find(match_id))
                .set((
                    matches::user_a_accepted.eq(Some(accept)),
                    matches::status.eq(new_status.as_str()),
                ))
                .get_result(conn)?,
            Role::UserB => diesel::update(matches::table.find(match_id))
                .set((
                    matches::user_b_accepted.eq(Some(accept)),
                    matches::status.eq(new_status.as_str()),
                ))
                .get_result(conn)?,
        };

        Ok((updated, role, transition))
    })?;

    let partner_id = match role {
        Role::UserA => updated.user_b_id,
        Role::UserB => updated.user_a_id,
    };

    let mission_id = match transition {
        Transition::Rejected => {
            tracing::info!(match_id = %match_id, "match rejected");
            publisher::publish_match_resolved(
                &state.rabbitmq,
                updated.id,
                updated.user_a_id,
                updated.user_b_id,
                "rejected",
            )
            .await;
            notification_service::notify(
                state,
                Notify {
                    user_id: partner_id,
                    kind: NotificationKind::MatchRejected,
                    title: "Match declined",
                    body: "The other user declined the match",
                    related_match_id: Some(match_id),
                    related_mission_id: None,
                },
            )
            .await;
            None
        }
        Transition::AcceptedPendingPartner => {
            notification_service::notify(
                state,
                Notify {
                    user_id: partner_id,
                    kind: NotificationKind::MatchAccepted,
                    title: "Your match accepted!",
                    body: "Your match has accepted. Respond to make it official",
                    related_match_id: Some(match_id),
                    related_mission_id: None,
                },
            )
            .await;
            None
        }
        Transition::MutualAccept => {
            tracing::info!(match_id = %match_id, "match mutually accepted");
            publisher::publish_match_resolved(
                &state.rabbitmq,
                updated.id,
                updated.user_a_id,
                updated.user_b_id,
                "accepted",
            )
            .await;

            // Mission generation is best-effort: its failure never unwinds
            // the acceptance.
            let mission_id = mission_service::generate(state, &updated).await;

            for participant in [updated.user_a_id, updated.user_b_id] {
                notification_service::notify(
                    state,
                    Notify {
                        user_id: participant,
                        kind: NotificationKind::MatchAccepted,
                        title: "It's a match!",
                        body: "You both accepted and the match is official",
                        related_match_id: Some(match_id),
                        related_mission_id: mission_id,
                    },
                )
                .await;
            }
            if let Some(mission_id) = mission_id {
                for participant in [updated.user_a_id, updated.user_b_id] {
                    notification_service::notify(
                        state,
                        Notify {
                            user_id: participant,
                            kind: NotificationKind::MissionCreated,
                            title: "Your mission is ready!",
                            body: "Check the meetup mission for your new match",
                            related_match_id: Some(match_id),
                            related_mission_id: Some(mission_id),
                        },
                    )
                    .await;
                }
            }
            mission_id
        }
    };

    Ok(RespondOutcome {
        status: updated.status,
        my_accepted: accept,
        mission_id,
    })
}

/// Recipients of the "Match expired" notice, derived from the rows the
/// guarded update actually flipped. A concurrent sweep that claimed nothing
/// announces nothing.
fn expiry_notices(claimed: &[Match]) -> Vec<(Uuid, Uuid)> {
    claimed
        .iter()
        .flat_map(|m| [(m.user_a_id, m.id), (m.user_b_id, m.id)])
        .collect()
}

/// Expiry sweep: every pending match past its deadline flips to expired.
/// Safe to re-run; the status filter in the update makes each row one-shot,
/// and only the returned rows drive events and notifications.
pub async fn expire_matches(state: &AppState) -> AppResult<usize> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;
    let now = Utc::now();

    let claimed: Vec<Match> = diesel::update(
        matches::table
            .filter(matches::status.eq(MatchStatus::Pending.as_str()))
            .filter(matches::expires_at.lt(now)),
    )
    .set(matches::status.eq(MatchStatus::Expired.as_str()))
    .get_results(&mut conn)?;

    drop(conn);

    for m in &claimed {
        publisher::publish_match_expired(&state.rabbitmq, m.id, m.user_a_id, m.user_b_id).await;
    }
    for (user_id, match_id) in expiry_notices(&claimed) {
        notification_service::notify(
            state,
            Notify {
                user_id,
                kind: NotificationKind::MatchExpired,
                title: "Match expired",
                body: "The match expired without a response within 7 days",
                related_match_id: Some(match_id),
                related_mission_id: None,
            },
        )
        .await;
    }

    tracing::info!(count = claimed.len(), "expired pending matches");
    Ok(claimed.len())
}

/// Administrative accepted → completed transition, the only way a match
/// leaves `accepted`.
pub async fn complete_match(state: &AppState, match_id: Uuid) -> AppResult<Match> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let row: Match = matches::table
        .find(match_id)
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::MatchNotFound, "match not found"))?;

    if MatchStatus::parse(&row.status) != Some(MatchStatus::Accepted) {
        return Err(AppError::new(
            ErrorCode::InvalidMatchState,
            "only accepted matches can be completed",
        ));
    }

    let updated: Match = diesel::update(matches::table.find(match_id))
        .set(matches::status.eq(MatchStatus::Completed.as_str()))
        .get_result(&mut conn)?;

    publisher::publish_match_resolved(
        &state.rabbitmq,
        updated.id,
        updated.user_a_id,
        updated.user_b_id,
        "completed",
    )
    .await;

    Ok(updated)
}

#[derive(Debug, Serialize)]
pub struct PartnerBrief {
    pub id: Uuid,
    pub nickname: String,
    pub gender: String,
    pub birth_year: i32,
    pub occupation: String,
    pub mbti: Option<String>,
    pub activity_area: String,
}

#[derive(Debug, Serialize)]
pub struct MatchSummary {
    pub id: Uuid,
    pub status: String,
    pub similarity_score: f64,
    pub compatibility_score: f64,
    pub distance_km: Option<f64>,
    pub my_accepted: Option<bool>,
    pub ai_description: Option<String>,
    pub partner: Option<PartnerBrief>,
    pub mission_id: Option<Uuid>,
    pub expires_at: Option<chrono::DateTime<Utc>>,
    pub created_at: chrono::DateTime<Utc>,
}

/// The caller's matches, newest first, each with a partner brief and the
/// mission id when one exists.
pub fn list_matches(state: &AppState, user_id: Uuid) -> AppResult<Vec<MatchSummary>> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let rows: Vec<Match> = matches::table
        .filter(matches::user_a_id.eq(user_id).or(matches::user_b_id.eq(user_id)))
        .order(matches::created_at.desc())
        .load(&mut conn)?;

    let mut summaries = Vec::with_capacity(rows.len());
    for row in rows {
        let (partner_id, my_accepted) = if row.user_a_id == user_id {
            (row.user_b_id, row.user_a_accepted)
        } else {
            (row.user_a_id, row.user_b_accepted)
        };

        let partner = profiles::table
            .find(partner_id)
            .first::<Profile>(&mut conn)
            .optional()?
            .map(|p| PartnerBrief {
                id: p.id,
                nickname: p.nickname,
                gender: p.gender,
                birth_year: p.birth_year,
                occupation: p.occupation,
                mbti: p.mbti,
                activity_area: p.activity_area,
            });

        let mission_id: Option<Uuid> = missions::table
            .filter(missions::match_id.eq(row.id))
            .select(missions::id)
            .first(&mut conn)
            .optional()?;

        summaries.push(MatchSummary {
            id: row.id,
            status: row.status,
            similarity_score: row.similarity_score,
            compatibility_score: row.compatibility_score,
            distance_km: row.distance_km,
            my_accepted,
            ai_description: row.ai_description,
            partner,
            mission_id,
            expires_at: row.expires_at,
            created_at: row.created_at,
        });
    }

    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uuid(n: u8) -> Uuid {
        Uuid::from_bytes([n; 16])
    }

    fn expired_match(id: u8, user_a: u8, user_b: u8) -> Match {
        Match {
            id: uuid(id),
            user_a_id: uuid(user_a),
            user_b_id: uuid(user_b),
            similarity_score: 0.5,
            compatibility_score: 0.5,
            distance_km: None,
            user_a_accepted: None,
            user_b_accepted: None,
            status: MatchStatus::Expired.as_str().to_string(),
            ai_description: None,
            expires_at: Some(Utc::now()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn expiry_notifies_both_sides_of_each_claimed_match() {
        let claimed = vec![expired_match(1, 10, 11), expired_match(2, 12, 13)];
        let notices = expiry_notices(&claimed);
        assert_eq!(
            notices,
            vec![
                (uuid(10), uuid(1)),
                (uuid(11), uuid(1)),
                (uuid(12), uuid(2)),
                (uuid(13), uuid(2)),
            ]
        );
    }

    #[test]
    fn losing_sweep_notifies_nobody() {
        // The update claimed zero rows, so there is nothing to announce even
        // if a parallel run is expiring the same matches right now.
        assert!(expiry_notices(&[]).is_empty());
    }
}

use std::collections::HashSet;

use uuid::Uuid;

use super::geo;
use super::scoring::Scores;

/// The requesting user's matching preferences, extracted from their profile.
#[derive(Debug, Clone)]
pub struct RequesterView {
    pub id: Uuid,
    pub gender: String,
    pub preferred_gender: String,
    pub preferred_age_min: i32,
    pub preferred_age_max: i32,
    pub preferred_distance_km: i32,
    pub activity_lat: f64,
    pub activity_lng: f64,
}

/// One candidate row, already restricted to active profiles by the caller.
#[derive(Debug, Clone)]
pub struct CandidateView {
    pub id: Uuid,
    pub gender: String,
    pub preferred_gender: String,
    pub birth_year: i32,
    pub activity_lat: f64,
    pub activity_lng: f64,
}

/// The winning candidate with the scores that ranked it first.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked {
    pub candidate_id: Uuid,
    pub similarity: f64,
    pub compatibility: f64,
    pub distance_km: f64,
}

fn gender_accepts(preference: &str, gender: &str) -> bool {
    preference == "any" || preference == gender
}

/// Picks the best candidate for the requester, or `None` when nobody passes
/// the filters. `excluded` must hold the requester's id and every user that
/// shares any match row with them, whatever its status; a pair is matched
/// at most once, ever.
///
/// `score` is called once per surviving candidate; scoring needs the
/// candidates' answer sets, which the caller owns.
///
/// Tie-break on equal compatibility is explicit: lower distance first, then
/// lower candidate id, so the selection is deterministic.
pub fn find_best_match<F>(
    requester: &RequesterView,
    candidates: &[CandidateView],
    excluded: &HashSet<Uuid>,
    current_year: i32,
    mut score: F,
) -> Option<Ranked>
where
    F: FnMut(Uuid) -> Scores,
{
    let mut ranked: Vec<Ranked> = Vec::new();

    for candidate in candidates {
        if candidate.id == requester.id || excluded.contains(&candidate.id) {
            continue;
        }

        // Gender preferences must accept in both directions.
        if !gender_accepts(&requester.preferred_gender, &candidate.gender)
            || !gender_accepts(&candidate.preferred_gender, &requester.gender)
        {
            continue;
        }

        let age = current_year - candidate.birth_year;
        if age < requester.preferred_age_min || age > requester.preferred_age_max {
            continue;
        }

        let distance = geo::haversine_km(
            requester.activity_lat,
            requester.activity_lng,
            candidate.activity_lat,
            candidate.activity_lng,
        );
        if !geo::within_preferred_distance(distance, requester.preferred_distance_km) {
            continue;
        }

        let scores = score(candidate.id);
        ranked.push(Ranked {
            candidate_id: candidate.id,
            similarity: scores.similarity,
            compatibility: scores.compatibility,
            distance_km: geo::round1(distance),
        });
    }

    ranked.sort_by(|a, b| {
        b.compatibility
            .partial_cmp(&a.compatibility)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                a.distance_km
                    .partial_cmp(&b.distance_km)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.candidate_id.cmp(&b.candidate_id))
    });

    ranked.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::scoring::Scores;

    fn uuid(n: u8) -> Uuid {
        Uuid::from_bytes([n; 16])
    }

    fn requester() -> RequesterView {
        RequesterView {
            id: uuid(1),
            gender: "male".into(),
            preferred_gender: "female".into(),
            preferred_age_min: 25,
            preferred_age_max: 35,
            preferred_distance_km: 30,
            activity_lat: 37.5665,
            activity_lng: 126.978,
        }
    }

    fn candidate(n: u8) -> CandidateView {
        CandidateView {
            id: uuid(n),
            gender: "female".into(),
            preferred_gender: "male".into(),
            birth_year: 1996,
            activity_lat: 37.57,
            activity_lng: 126.98,
        }
    }

    fn flat_score(compatibility: f64) -> impl FnMut(Uuid) -> Scores {
        move |_| Scores {
            similarity: compatibility,
            custom_bonus: 0.0,
            compatibility,
        }
    }

    #[test]
    fn picks_the_only_eligible_candidate() {
        let best = find_best_match(
            &requester(),
            &[candidate(2)],
            &HashSet::from([uuid(1)]),
            2026,
            flat_score(1.0),
        )
        .unwrap();
        assert_eq!(best.candidate_id, uuid(2));
        assert_eq!(best.compatibility, 1.0);
    }

    #[test]
    fn excluded_users_never_come_back() {
        // A prior match row, whatever its status, keeps the pair apart.
        let excluded = HashSet::from([uuid(1), uuid(2)]);
        let best = find_best_match(&requester(), &[candidate(2)], &excluded, 2026, flat_score(1.0));
        assert!(best.is_none());
    }

    #[test]
    fn candidate_preference_must_accept_requester() {
        let mut c = candidate(2);
        c.preferred_gender = "female".into();
        let best = find_best_match(&requester(), &[c], &HashSet::new(), 2026, flat_score(1.0));
        assert!(best.is_none());
    }

    #[test]
    fn any_preference_accepts_either_gender() {
        let mut c = candidate(2);
        c.preferred_gender = "any".into();
        let mut r = requester();
        r.preferred_gender = "any".into();
        let best = find_best_match(&r, &[c], &HashSet::new(), 2026, flat_score(0.5));
        assert!(best.is_some());
    }

    #[test]
    fn age_outside_preferred_range_is_filtered() {
        let mut c = candidate(2);
        c.birth_year = 2004; // age 22, below preferred_age_min 25
        let best = find_best_match(&requester(), &[c], &HashSet::new(), 2026, flat_score(1.0));
        assert!(best.is_none());
    }

    #[test]
    fn distance_beyond_cutoff_is_filtered() {
        let mut c = candidate(2);
        c.activity_lat = 35.1796; // Busan, ~325 km away
        c.activity_lng = 129.0756;
        let best = find_best_match(&requester(), &[c], &HashSet::new(), 2026, flat_score(1.0));
        assert!(best.is_none());
    }

    #[test]
    fn highest_compatibility_wins() {
        let best = find_best_match(
            &requester(),
            &[candidate(2), candidate(3)],
            &HashSet::new(),
            2026,
            |id| {
                let c = if id == uuid(3) { 0.9 } else { 0.4 };
                Scores {
                    similarity: c,
                    custom_bonus: 0.0,
                    compatibility: c,
                }
            },
        )
        .unwrap();
        assert_eq!(best.candidate_id, uuid(3));
    }

    #[test]
    fn ties_break_on_distance_then_id() {
        let mut far = candidate(2);
        far.activity_lat = 37.70; // further out, still within 30 km
        let near_high_id = candidate(9);
        let near_low_id = candidate(3);

        let best = find_best_match(
            &requester(),
            &[far, near_high_id, near_low_id],
            &HashSet::new(),
            2026,
            flat_score(0.8),
        )
        .unwrap();
        // Equal scores: nearest wins; equal distance: lowest id wins.
        assert_eq!(best.candidate_id, uuid(3));
    }

    #[test]
    fn empty_candidate_set_yields_none() {
        let best = find_best_match(&requester(), &[], &HashSet::new(), 2026, flat_score(1.0));
        assert!(best.is_none());
    }
}

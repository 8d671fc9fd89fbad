use std::collections::HashMap;

use uuid::Uuid;

/// Scores produced for one candidate pair. All three values are clamped to
/// [0, 1] and rounded to two decimals before they ever reach storage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scores {
    pub similarity: f64,
    pub custom_bonus: f64,
    pub compatibility: f64,
}

/// Answers of one user, keyed by question id. Values are the chosen option
/// ("a" or "b") exactly as stored.
pub type AnswerMap = HashMap<Uuid, String>;

/// A user's authored custom questions as (question id, preferred answer).
pub type AuthoredQuestions = Vec<(Uuid, String)>;

const SIMILARITY_SHARE: f64 = 0.7;
const CUSTOM_BONUS_SHARE: f64 = 0.3;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Weighted agreement over questions both users answered. Questions only one
/// side answered contribute nothing, so a sparse answer set is never punished.
fn similarity(
    question_weights: &HashMap<Uuid, i32>,
    answers_a: &AnswerMap,
    answers_b: &AnswerMap,
) -> f64 {
    let mut matched_weight = 0i64;
    let mut total_weight = 0i64;

    for (question_id, weight) in question_weights {
        let (Some(ans_a), Some(ans_b)) = (answers_a.get(question_id), answers_b.get(question_id))
        else {
            continue;
        };
        total_weight += *weight as i64;
        if ans_a == ans_b {
            matched_weight += *weight as i64;
        }
    }

    if total_weight > 0 {
        matched_weight as f64 / total_weight as f64
    } else {
        0.0
    }
}

/// Bidirectional custom-question bonus: over A-authored questions B answered
/// and B-authored questions A answered, the fraction where the respondent
/// picked the author's preferred answer. 0 when no cross-answers exist.
fn custom_bonus(
    questions_a: &AuthoredQuestions,
    answers_by_b: &AnswerMap,
    questions_b: &AuthoredQuestions,
    answers_by_a: &AnswerMap,
) -> f64 {
    let mut matched = 0u32;
    let mut total = 0u32;

    for (question_id, preferred) in questions_a {
        if let Some(answer) = answers_by_b.get(question_id) {
            total += 1;
            if answer == preferred {
                matched += 1;
            }
        }
    }
    for (question_id, preferred) in questions_b {
        if let Some(answer) = answers_by_a.get(question_id) {
            total += 1;
            if answer == preferred {
                matched += 1;
            }
        }
    }

    if total > 0 {
        matched as f64 / total as f64
    } else {
        0.0
    }
}

/// Full score computation for one pair. The custom bonus only ever helps:
/// with no cross-answers the compatibility is the similarity alone.
pub fn compute_scores(
    question_weights: &HashMap<Uuid, i32>,
    answers_a: &AnswerMap,
    answers_b: &AnswerMap,
    questions_a: &AuthoredQuestions,
    custom_answers_by_b: &AnswerMap,
    questions_b: &AuthoredQuestions,
    custom_answers_by_a: &AnswerMap,
) -> Scores {
    let similarity = clamp01(similarity(question_weights, answers_a, answers_b));
    let bonus = clamp01(custom_bonus(
        questions_a,
        custom_answers_by_b,
        questions_b,
        custom_answers_by_a,
    ));

    let compatibility = if bonus > 0.0 {
        similarity * SIMILARITY_SHARE + bonus * CUSTOM_BONUS_SHARE
    } else {
        similarity
    };

    Scores {
        similarity: round2(similarity),
        custom_bonus: round2(bonus),
        compatibility: round2(clamp01(compatibility)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uuid(n: u8) -> Uuid {
        Uuid::from_bytes([n; 16])
    }

    fn answers(pairs: &[(Uuid, &str)]) -> AnswerMap {
        pairs
            .iter()
            .map(|(id, ans)| (*id, ans.to_string()))
            .collect()
    }

    fn empty_scores(weights: &HashMap<Uuid, i32>, a: &AnswerMap, b: &AnswerMap) -> Scores {
        compute_scores(
            weights,
            a,
            b,
            &Vec::new(),
            &AnswerMap::new(),
            &Vec::new(),
            &AnswerMap::new(),
        )
    }

    #[test]
    fn five_identical_answers_score_full_similarity() {
        let ids: Vec<Uuid> = (1..=5).map(uuid).collect();
        let weights: HashMap<Uuid, i32> = ids.iter().map(|id| (*id, 2)).collect();
        let a = answers(&ids.iter().map(|id| (*id, "a")).collect::<Vec<_>>());
        let b = a.clone();

        let scores = empty_scores(&weights, &a, &b);
        assert_eq!(scores.similarity, 1.0);
        assert_eq!(scores.compatibility, 1.0);
        assert_eq!(scores.custom_bonus, 0.0);
    }

    #[test]
    fn similarity_is_one_only_when_every_joint_answer_matches() {
        let q1 = uuid(1);
        let q2 = uuid(2);
        let weights = HashMap::from([(q1, 3), (q2, 1)]);
        let a = answers(&[(q1, "a"), (q2, "a")]);
        let b = answers(&[(q1, "a"), (q2, "b")]);

        let scores = empty_scores(&weights, &a, &b);
        assert_eq!(scores.similarity, 0.75);
        assert!(scores.similarity < 1.0);
    }

    #[test]
    fn no_overlap_means_zero_similarity() {
        let q1 = uuid(1);
        let q2 = uuid(2);
        let weights = HashMap::from([(q1, 1), (q2, 1)]);
        let a = answers(&[(q1, "a")]);
        let b = answers(&[(q2, "b")]);

        let scores = empty_scores(&weights, &a, &b);
        assert_eq!(scores.similarity, 0.0);
        assert_eq!(scores.compatibility, 0.0);
    }

    #[test]
    fn inactive_questions_are_ignored() {
        // Only questions present in the weight map count; an answered question
        // that was deactivated contributes nothing.
        let active = uuid(1);
        let inactive = uuid(2);
        let weights = HashMap::from([(active, 1)]);
        let a = answers(&[(active, "a"), (inactive, "a")]);
        let b = answers(&[(active, "b"), (inactive, "a")]);

        let scores = empty_scores(&weights, &a, &b);
        assert_eq!(scores.similarity, 0.0);
    }

    #[test]
    fn custom_bonus_blends_seventy_thirty() {
        let q1 = uuid(1);
        let weights = HashMap::from([(q1, 1)]);
        let a = answers(&[(q1, "a")]);
        let b = answers(&[(q1, "a")]);

        let cq = uuid(10);
        let authored_a = vec![(cq, "a".to_string())];
        let by_b = answers(&[(cq, "a")]);

        let scores = compute_scores(
            &weights,
            &a,
            &b,
            &authored_a,
            &by_b,
            &Vec::new(),
            &AnswerMap::new(),
        );
        assert_eq!(scores.similarity, 1.0);
        assert_eq!(scores.custom_bonus, 1.0);
        assert_eq!(scores.compatibility, 1.0);
    }

    #[test]
    fn missed_preferred_answer_gives_no_bonus() {
        let q1 = uuid(1);
        let weights = HashMap::from([(q1, 1)]);
        let a = answers(&[(q1, "a")]);
        let b = answers(&[(q1, "a")]);

        let cq = uuid(10);
        let authored_a = vec![(cq, "a".to_string())];
        let by_b = answers(&[(cq, "b")]);

        let scores = compute_scores(
            &weights,
            &a,
            &b,
            &authored_a,
            &by_b,
            &Vec::new(),
            &AnswerMap::new(),
        );
        // bonus exists but is 0/1 matched -> still treated as "no bonus"
        assert_eq!(scores.custom_bonus, 0.0);
        assert_eq!(scores.compatibility, scores.similarity);
    }

    #[test]
    fn bonus_counts_both_directions() {
        let weights = HashMap::new();
        let qa = uuid(10);
        let qb = uuid(11);
        let authored_a = vec![(qa, "a".to_string())];
        let authored_b = vec![(qb, "b".to_string())];
        let by_b = answers(&[(qa, "a")]);
        let by_a = answers(&[(qb, "a")]);

        let scores = compute_scores(
            &weights,
            &AnswerMap::new(),
            &AnswerMap::new(),
            &authored_a,
            &by_b,
            &authored_b,
            &by_a,
        );
        assert_eq!(scores.custom_bonus, 0.5);
        // similarity 0 -> 0.0 * 0.7 + 0.5 * 0.3
        assert_eq!(scores.compatibility, 0.15);
    }

    #[test]
    fn scores_round_to_two_decimals() {
        let q1 = uuid(1);
        let q2 = uuid(2);
        let q3 = uuid(3);
        let weights = HashMap::from([(q1, 1), (q2, 1), (q3, 1)]);
        let a = answers(&[(q1, "a"), (q2, "a"), (q3, "a")]);
        let b = answers(&[(q1, "a"), (q2, "b"), (q3, "b")]);

        let scores = empty_scores(&weights, &a, &b);
        assert_eq!(scores.similarity, 0.33);
    }
}

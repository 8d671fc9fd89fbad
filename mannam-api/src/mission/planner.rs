use rand::Rng;

use crate::ai::AiClient;
use crate::mission::catalog;
use crate::models::Profile;

/// A candidate mission assignment, before validation. Both strategies emit
/// this shape; only validated proposals reach persistence.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct MissionProposal {
    pub place_category: String,
    pub place_name: String,
    #[serde(default)]
    pub place_rationale: Option<String>,
    pub prop_a_category: String,
    pub prop_a_name: String,
    #[serde(default)]
    pub prop_a_rationale: Option<String>,
    pub prop_b_category: String,
    pub prop_b_name: String,
    #[serde(default)]
    pub prop_b_rationale: Option<String>,
    pub action_a: String,
    pub action_b: String,
}

/// A source of mission proposals. The planner treats every strategy the same
/// way: propose, then validate against the catalog.
#[axum::async_trait]
pub trait MissionStrategy: Send + Sync {
    async fn propose(&self, profile_a: &Profile, profile_b: &Profile) -> Option<MissionProposal>;
}

/// Deterministic fallback: independent draws from the catalog, with redraw
/// loops keeping the two prop categories and the two actions distinct.
pub struct RandomStrategy;

#[axum::async_trait]
impl MissionStrategy for RandomStrategy {
    async fn propose(&self, _a: &Profile, _b: &Profile) -> Option<MissionProposal> {
        Some(random_proposal(&mut rand::thread_rng()))
    }
}

pub fn random_proposal<R: Rng>(rng: &mut R) -> MissionProposal {
    let place_category = pick(rng, &catalog::PLACE_CATEGORIES);
    let place_name = pick(
        rng,
        catalog::place_examples(place_category).unwrap_or(&["Starbucks"]),
    );

    let prop_a_category = pick(rng, &catalog::PROP_CATEGORIES);
    let mut prop_b_category = pick(rng, &catalog::PROP_CATEGORIES);
    if catalog::PROP_CATEGORIES.len() > 1 {
        while prop_b_category == prop_a_category {
            prop_b_category = pick(rng, &catalog::PROP_CATEGORIES);
        }
    }
    let prop_a_name = pick(rng, catalog::prop_options(prop_a_category).unwrap_or(&["wristwatch"]));
    let prop_b_name = pick(rng, catalog::prop_options(prop_b_category).unwrap_or(&["wristwatch"]));

    let action_a = pick(rng, &catalog::IDENTIFICATION_ACTIONS);
    let mut action_b = pick(rng, &catalog::IDENTIFICATION_ACTIONS);
    if catalog::IDENTIFICATION_ACTIONS.len() > 1 {
        while action_b == action_a {
            action_b = pick(rng, &catalog::IDENTIFICATION_ACTIONS);
        }
    }

    MissionProposal {
        place_category: place_category.to_string(),
        place_name: place_name.to_string(),
        place_rationale: None,
        prop_a_category: prop_a_category.to_string(),
        prop_a_name: prop_a_name.to_string(),
        prop_a_rationale: None,
        prop_b_category: prop_b_category.to_string(),
        prop_b_name: prop_b_name.to_string(),
        prop_b_rationale: None,
        action_a: action_a.to_string(),
        action_b: action_b.to_string(),
    }
}

fn pick<'a, R: Rng>(rng: &mut R, options: &[&'a str]) -> &'a str {
    options[rng.gen_range(0..options.len())]
}

/// Profile-aware strategy backed by the AI assistant. Transport or parse
/// failures simply yield no proposal.
pub struct AiStrategy<'a> {
    pub client: &'a AiClient,
}

#[axum::async_trait]
impl MissionStrategy for AiStrategy<'_> {
    async fn propose(&self, profile_a: &Profile, profile_b: &Profile) -> Option<MissionProposal> {
        self.client.suggest_mission(profile_a, profile_b).await
    }
}

/// Cross-validates a proposal against the catalog. An unknown place or prop
/// category invalidates the whole proposal; an unknown name within a known
/// category falls back to that category's first entry, and an unknown action
/// to a fixed default per participant.
pub fn validate(mut proposal: MissionProposal) -> Option<MissionProposal> {
    if !catalog::is_place_category(&proposal.place_category) {
        return None;
    }
    if !catalog::is_allowed_place(&proposal.place_category, &proposal.place_name) {
        proposal.place_name = catalog::place_examples(&proposal.place_category)?[0].to_string();
    }

    for (category, name) in [
        (&proposal.prop_a_category, &mut proposal.prop_a_name),
        (&proposal.prop_b_category, &mut proposal.prop_b_name),
    ] {
        if !catalog::is_prop_category(category) {
            return None;
        }
        if !catalog::is_allowed_prop(category, name) {
            *name = catalog::prop_options(category)?[0].to_string();
        }
    }

    if !catalog::is_allowed_action(&proposal.action_a) {
        proposal.action_a = catalog::IDENTIFICATION_ACTIONS[0].to_string();
    }
    if !catalog::is_allowed_action(&proposal.action_b) {
        proposal.action_b = catalog::IDENTIFICATION_ACTIONS[1].to_string();
    }

    Some(proposal)
}

/// Plans one mission: always draws a validated random proposal first, then
/// lets a validated AI proposal replace it. AI absence, failure, or invalid
/// output can never make planning fail.
pub struct MissionPlanner<'a> {
    pub ai: Option<&'a AiClient>,
}

impl MissionPlanner<'_> {
    pub async fn plan(&self, profile_a: &Profile, profile_b: &Profile) -> MissionProposal {
        let random = random_proposal(&mut rand::thread_rng());
        let mut chosen = validate(random.clone()).unwrap_or(random);

        if let Some(client) = self.ai {
            let strategy = AiStrategy { client };
            if let Some(proposal) = strategy.propose(profile_a, profile_b).await {
                match validate(proposal) {
                    Some(valid) => chosen = valid,
                    None => {
                        tracing::warn!("AI mission proposal failed allow-list validation, keeping random draw");
                    }
                }
            }
        }

        chosen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn proposal() -> MissionProposal {
        MissionProposal {
            place_category: "cafe".into(),
            place_name: "Starbucks".into(),
            place_rationale: Some("both like coffee".into()),
            prop_a_category: "accessory".into(),
            prop_a_name: "eco bag".into(),
            prop_a_rationale: None,
            prop_b_category: "convenience_item".into(),
            prop_b_name: "banana milk".into(),
            prop_b_rationale: None,
            action_a: catalog::IDENTIFICATION_ACTIONS[4].into(),
            action_b: catalog::IDENTIFICATION_ACTIONS[7].into(),
        }
    }

    #[test]
    fn valid_proposal_passes_unchanged() {
        let p = proposal();
        assert_eq!(validate(p.clone()), Some(p));
    }

    #[test]
    fn unknown_place_category_discards_everything() {
        let mut p = proposal();
        p.place_category = "rooftop_bar".into();
        assert_eq!(validate(p), None);
    }

    #[test]
    fn unknown_place_name_falls_back_to_first_example() {
        let mut p = proposal();
        p.place_name = "Some Hidden Speakeasy".into();
        let validated = validate(p).unwrap();
        assert_eq!(
            validated.place_name,
            catalog::place_examples("cafe").unwrap()[0]
        );
    }

    #[test]
    fn unknown_prop_category_discards_everything() {
        let mut p = proposal();
        p.prop_b_category = "tattoo".into();
        assert_eq!(validate(p), None);
    }

    #[test]
    fn unknown_prop_name_falls_back_to_first_option() {
        let mut p = proposal();
        p.prop_a_name = "diamond ring".into();
        let validated = validate(p).unwrap();
        assert_eq!(
            validated.prop_a_name,
            catalog::prop_options("accessory").unwrap()[0]
        );
    }

    #[test]
    fn unknown_actions_get_fixed_defaults() {
        let mut p = proposal();
        p.action_a = "Doing a handstand".into();
        p.action_b = "Juggling".into();
        let validated = validate(p).unwrap();
        assert_eq!(validated.action_a, catalog::IDENTIFICATION_ACTIONS[0]);
        assert_eq!(validated.action_b, catalog::IDENTIFICATION_ACTIONS[1]);
    }

    #[test]
    fn random_proposals_are_catalog_valid_with_distinct_draws() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let p = random_proposal(&mut rng);
            assert_ne!(p.prop_a_category, p.prop_b_category);
            assert_ne!(p.action_a, p.action_b);
            // The random path must survive the same validation the AI path gets.
            assert_eq!(validate(p.clone()), Some(p));
        }
    }

    #[test]
    fn proposal_deserializes_from_ai_json() {
        let json = serde_json::json!({
            "place_category": "park",
            "place_name": "Seoul Forest",
            "place_rationale": "both listed walking as a hobby",
            "prop_a_category": "accessory",
            "prop_a_name": "beanie",
            "prop_a_rationale": "fits a casual style",
            "prop_b_category": "book_magazine",
            "prop_b_name": "any book",
            "prop_b_rationale": "an avid reader",
            "action_a": catalog::IDENTIFICATION_ACTIONS[0],
            "action_b": catalog::IDENTIFICATION_ACTIONS[1],
        });
        let p: MissionProposal = serde_json::from_value(json).unwrap();
        assert_eq!(validate(p.clone()), Some(p));
    }
}

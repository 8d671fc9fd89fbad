use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::mission::catalog;
use crate::mission::planner::MissionProposal;
use crate::models::Profile;

/// Client for an OpenAI-compatible chat-completions API. Strictly
/// best-effort: every failure path returns `None` and the caller proceeds
/// without AI output.
pub struct AiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl AiClient {
    /// `None` when no API key is configured; the service then runs the
    /// random planner alone.
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        let api_key = config.ai_api_key.clone()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.ai_timeout_secs))
            .build()
            .ok()?;
        Some(Self {
            http,
            base_url: config.ai_base_url.clone(),
            api_key,
            model: config.ai_model.clone(),
        })
    }

    async fn chat(&self, request: ChatRequest<'_>) -> Option<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| tracing::warn!(error = %e, "AI request failed"))
            .ok()?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "AI request returned an error status");
            return None;
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| tracing::warn!(error = %e, "AI response body unreadable"))
            .ok()?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
    }

    /// Short compatibility write-up for a fresh match. `None` on any failure;
    /// the match is then shown with its scores alone.
    pub async fn describe_match(
        &self,
        profile_a: &Profile,
        profile_b: &Profile,
        similarity: f64,
    ) -> Option<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: "You are a matchmaking analyst for a blind-date app. Based on the \
                              two profiles, write a warm, positive compatibility analysis in 2-3 \
                              natural sentences, mentioning concrete shared traits or \
                              complementary differences."
                        .into(),
                },
                ChatMessage {
                    role: "user".into(),
                    content: format!(
                        "User A: {}\nUser B: {}\nAnswer similarity: {}%\n\nAnalyze their compatibility.",
                        profile_brief(profile_a),
                        profile_brief(profile_b),
                        (similarity * 100.0).round()
                    ),
                },
            ],
            max_tokens: 200,
            temperature: 0.7,
            response_format: None,
        };

        self.chat(request).await
    }

    /// Asks the assistant for a mission proposal constrained to the catalog.
    /// The prompt embeds the full allow-lists; the planner still validates
    /// everything that comes back.
    pub async fn suggest_mission(
        &self,
        profile_a: &Profile,
        profile_b: &Profile,
    ) -> Option<MissionProposal> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: mission_system_prompt(),
                },
                ChatMessage {
                    role: "user".into(),
                    content: format!(
                        "User A: {}\nUser B: {}",
                        profile_brief(profile_a),
                        profile_brief(profile_b)
                    ),
                },
            ],
            max_tokens: 500,
            temperature: 0.8,
            response_format: Some(ResponseFormat { kind: "json_object" }),
        };

        let content = self.chat(request).await?;
        serde_json::from_str(&content)
            .map_err(|e| tracing::warn!(error = %e, "AI mission proposal is not valid JSON"))
            .ok()
    }
}

fn mission_system_prompt() -> String {
    let place_lines: Vec<String> = catalog::PLACE_CATEGORIES
        .iter()
        .filter_map(|c| Some(format!("{c}: [{}]", catalog::place_examples(c)?.join(", "))))
        .collect();
    let prop_lines: Vec<String> = catalog::PROP_CATEGORIES
        .iter()
        .filter_map(|c| Some(format!("{c}: [{}]", catalog::prop_options(c)?.join(", "))))
        .collect();

    format!(
        "You design first-meeting missions for a blind-date app. Pick a meeting place, one \
         identifying prop per user, and one identifying action per user, matched to the two \
         profiles.\n\n\
         You MUST choose only from these allow-lists:\n\n\
         Place categories: {}\n\
         Place names per category:\n{}\n\n\
         Prop categories: {}\n\
         Prop names per category:\n{}\n\n\
         Identifying actions: {}\n\n\
         Give the two users different prop categories and different actions.\n\n\
         Respond as a JSON object:\n\
         {{\"place_category\": \"...\", \"place_name\": \"...\", \"place_rationale\": \"one sentence\", \
         \"prop_a_category\": \"...\", \"prop_a_name\": \"...\", \"prop_a_rationale\": \"one sentence\", \
         \"prop_b_category\": \"...\", \"prop_b_name\": \"...\", \"prop_b_rationale\": \"one sentence\", \
         \"action_a\": \"...\", \"action_b\": \"...\"}}",
        catalog::PLACE_CATEGORIES.join(", "),
        place_lines.join("\n"),
        catalog::PROP_CATEGORIES.join(", "),
        prop_lines.join("\n"),
        catalog::IDENTIFICATION_ACTIONS.join(", "),
    )
}

fn profile_brief(profile: &Profile) -> String {
    format!(
        "{}, {}, hobbies: {}, personality: {}, ideal type: {}",
        profile.occupation,
        profile.mbti.as_deref().unwrap_or("MBTI not given"),
        json_list(&profile.hobbies),
        json_list(&profile.personality),
        json_list(&profile.ideal_type),
    )
}

/// Renders a jsonb string array as a comma list; anything else becomes "none".
fn json_list(value: &serde_json::Value) -> String {
    match value.as_array() {
        Some(items) if !items.is_empty() => items
            .iter()
            .filter_map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        _ => "none".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_list_formats_string_arrays() {
        assert_eq!(json_list(&serde_json::json!(["hiking", "films"])), "hiking, films");
        assert_eq!(json_list(&serde_json::json!([])), "none");
        assert_eq!(json_list(&serde_json::json!("not-a-list")), "none");
    }

    #[test]
    fn system_prompt_embeds_every_allow_list() {
        let prompt = mission_system_prompt();
        for category in catalog::PLACE_CATEGORIES {
            assert!(prompt.contains(category));
        }
        for category in catalog::PROP_CATEGORIES {
            assert!(prompt.contains(category));
        }
        assert!(prompt.contains(catalog::IDENTIFICATION_ACTIONS[0]));
        assert!(prompt.contains("JSON object"));
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// RabbitMQ event envelope wrapping all domain events.
///
/// Routing key format: `mannam.{domain}.{entity}.{action}`
/// Example: `mannam.matching.match.created`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event<T: Serialize> {
    pub id: Uuid,
    pub source: String,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: Option<Uuid>,
    pub data: T,
}

impl<T: Serialize> Event<T> {
    pub fn new(source: impl Into<String>, event_type: impl Into<String>, data: T) -> Self {
        Self {
            id: Uuid::now_v7(),
            source: source.into(),
            event_type: event_type.into(),
            timestamp: Utc::now(),
            user_id: None,
            data,
        }
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

/// RabbitMQ routing keys
pub mod routing_keys {
    // Matching events
    pub const MATCH_CREATED: &str = "mannam.matching.match.created";
    pub const MATCH_ACCEPTED: &str = "mannam.matching.match.accepted";
    pub const MATCH_REJECTED: &str = "mannam.matching.match.rejected";
    pub const MATCH_EXPIRED: &str = "mannam.matching.match.expired";
    pub const MATCH_COMPLETED: &str = "mannam.matching.match.completed";

    // Mission events
    pub const MISSION_CREATED: &str = "mannam.mission.mission.created";
    pub const MISSION_CANCELLED: &str = "mannam.mission.mission.cancelled";
    pub const DEPARTURE_CONFIRMED: &str = "mannam.mission.departure.confirmed";
    pub const NO_SHOW_RECORDED: &str = "mannam.mission.noshow.recorded";
    pub const USER_BANNED: &str = "mannam.mission.user.banned";

    // Notification events
    pub const NOTIFICATION_CREATED: &str = "mannam.notification.notification.created";

    // Safety events
    pub const SAFETY_REPORT_CREATED: &str = "mannam.safety.report.created";
}

/// Common event data payloads
pub mod payloads {
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MatchCreated {
        pub match_id: Uuid,
        pub user_a_id: Uuid,
        pub user_b_id: Uuid,
        pub compatibility_score: f64,
        pub expires_at: chrono::DateTime<chrono::Utc>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MatchResolved {
        pub match_id: Uuid,
        pub user_a_id: Uuid,
        pub user_b_id: Uuid,
        pub status: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MatchExpired {
        pub match_id: Uuid,
        pub user_a_id: Uuid,
        pub user_b_id: Uuid,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MissionCreated {
        pub mission_id: Uuid,
        pub match_id: Uuid,
        pub place_name: String,
        pub meeting_time: chrono::DateTime<chrono::Utc>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct MissionCancelled {
        pub mission_id: Uuid,
        pub match_id: Uuid,
        pub reason: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct DepartureConfirmed {
        pub mission_id: Uuid,
        pub user_id: Uuid,
        pub both_confirmed: bool,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct NoShowRecorded {
        pub check_id: Uuid,
        pub mission_id: Uuid,
        pub user_id: Uuid,
        pub no_show_count: i32,
        pub banned: bool,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct UserBanned {
        pub user_id: Uuid,
        pub no_show_count: i32,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct NotificationCreated {
        pub notification_id: Uuid,
        pub user_id: Uuid,
        pub kind: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct SafetyReportCreated {
        pub report_id: Uuid,
        pub reporter_id: Uuid,
        pub reported_id: Uuid,
        pub category: String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_carries_typed_data() {
        let event = Event::new(
            "mannam-api",
            routing_keys::MATCH_EXPIRED,
            payloads::MatchExpired {
                match_id: Uuid::nil(),
                user_a_id: Uuid::nil(),
                user_b_id: Uuid::nil(),
            },
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "mannam.matching.match.expired");
        assert_eq!(json["source"], "mannam-api");
        assert!(json["data"]["match_id"].is_string());
    }
}

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::{
    custom_question_answers, custom_questions, matches, missions, no_show_checks, notifications,
    profiles, questions, safety_reports, user_answers,
};

// --- Profile ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = profiles)]
pub struct Profile {
    pub id: Uuid,
    pub phone: String,
    pub nickname: String,
    pub birth_year: i32,
    pub gender: String,
    pub occupation: String,
    pub mbti: Option<String>,
    pub activity_area: String,
    pub activity_lat: f64,
    pub activity_lng: f64,
    pub hobbies: serde_json::Value,
    pub personality: serde_json::Value,
    pub ideal_type: serde_json::Value,
    pub preferred_gender: String,
    pub preferred_age_min: i32,
    pub preferred_age_max: i32,
    pub preferred_distance_km: i32,
    pub status: String,
    pub no_show_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = profiles)]
pub struct NewProfile {
    pub id: Uuid,
    pub phone: String,
    pub nickname: String,
    pub birth_year: i32,
    pub gender: String,
    pub occupation: String,
    pub mbti: Option<String>,
    pub activity_area: String,
    pub activity_lat: f64,
    pub activity_lng: f64,
    pub hobbies: serde_json::Value,
    pub personality: serde_json::Value,
    pub ideal_type: serde_json::Value,
    pub preferred_gender: String,
    pub preferred_age_min: i32,
    pub preferred_age_max: i32,
    pub preferred_distance_km: i32,
}

#[derive(Debug, AsChangeset, Deserialize, Default)]
#[diesel(table_name = profiles)]
pub struct UpdateProfile {
    pub nickname: Option<String>,
    pub occupation: Option<String>,
    pub mbti: Option<String>,
    pub activity_area: Option<String>,
    pub activity_lat: Option<f64>,
    pub activity_lng: Option<f64>,
    pub hobbies: Option<serde_json::Value>,
    pub personality: Option<serde_json::Value>,
    pub ideal_type: Option<serde_json::Value>,
    pub preferred_gender: Option<String>,
    pub preferred_age_min: Option<i32>,
    pub preferred_age_max: Option<i32>,
    pub preferred_distance_km: Option<i32>,
    pub status: Option<String>,
}

// --- Question / answers ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = questions)]
pub struct Question {
    pub id: Uuid,
    pub category: String,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub weight: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Queryable, Identifiable, Serialize)]
#[diesel(table_name = user_answers)]
pub struct UserAnswer {
    pub id: Uuid,
    pub user_id: Uuid,
    pub question_id: Uuid,
    pub answer: String,
    pub answered_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = user_answers)]
pub struct NewUserAnswer {
    pub user_id: Uuid,
    pub question_id: Uuid,
    pub answer: String,
}

// --- Custom questions ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = custom_questions)]
pub struct CustomQuestion {
    pub id: Uuid,
    pub author_id: Uuid,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub preferred_answer: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = custom_questions)]
pub struct NewCustomQuestion {
    pub author_id: Uuid,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub preferred_answer: String,
}

#[derive(Debug, Queryable, Identifiable, Serialize)]
#[diesel(table_name = custom_question_answers)]
pub struct CustomQuestionAnswer {
    pub id: Uuid,
    pub question_id: Uuid,
    pub user_id: Uuid,
    pub answer: String,
    pub answered_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = custom_question_answers)]
pub struct NewCustomQuestionAnswer {
    pub question_id: Uuid,
    pub user_id: Uuid,
    pub answer: String,
}

// --- Match ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = matches)]
pub struct Match {
    pub id: Uuid,
    pub user_a_id: Uuid,
    pub user_b_id: Uuid,
    pub similarity_score: f64,
    pub compatibility_score: f64,
    pub distance_km: Option<f64>,
    pub user_a_accepted: Option<bool>,
    pub user_b_accepted: Option<bool>,
    pub status: String,
    pub ai_description: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = matches)]
pub struct NewMatch {
    pub user_a_id: Uuid,
    pub user_b_id: Uuid,
    pub similarity_score: f64,
    pub compatibility_score: f64,
    pub distance_km: Option<f64>,
    pub expires_at: Option<DateTime<Utc>>,
}

// --- Mission ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = missions)]
pub struct Mission {
    pub id: Uuid,
    pub match_id: Uuid,
    pub place_name: String,
    pub place_address: String,
    pub place_lat: f64,
    pub place_lng: f64,
    pub place_category: String,
    pub user_a_prop_category: String,
    pub user_a_prop_name: String,
    pub user_a_prop_description: Option<String>,
    pub user_b_prop_category: String,
    pub user_b_prop_name: String,
    pub user_b_prop_description: Option<String>,
    pub user_a_action: Option<String>,
    pub user_b_action: Option<String>,
    pub meeting_date: NaiveDate,
    pub meeting_time: NaiveTime,
    pub user_a_departure_confirmed: bool,
    pub user_b_departure_confirmed: bool,
    pub status: String,
    pub ai_place_rationale: Option<String>,
    pub ai_prop_rationale_a: Option<String>,
    pub ai_prop_rationale_b: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Mission {
    /// Meeting date and time are stored as separate naive columns; all
    /// deadline math treats their combination as UTC.
    pub fn meeting_datetime(&self) -> DateTime<Utc> {
        self.meeting_date.and_time(self.meeting_time).and_utc()
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = missions)]
pub struct NewMission {
    pub match_id: Uuid,
    pub place_name: String,
    pub place_address: String,
    pub place_lat: f64,
    pub place_lng: f64,
    pub place_category: String,
    pub user_a_prop_category: String,
    pub user_a_prop_name: String,
    pub user_b_prop_category: String,
    pub user_b_prop_name: String,
    pub user_a_action: Option<String>,
    pub user_b_action: Option<String>,
    pub meeting_date: NaiveDate,
    pub meeting_time: NaiveTime,
    pub ai_place_rationale: Option<String>,
    pub ai_prop_rationale_a: Option<String>,
    pub ai_prop_rationale_b: Option<String>,
}

// --- No-show check ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = no_show_checks)]
pub struct NoShowCheck {
    pub id: Uuid,
    pub mission_id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub check_deadline: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = no_show_checks)]
pub struct NewNoShowCheck {
    pub mission_id: Uuid,
    pub user_id: Uuid,
    pub check_deadline: DateTime<Utc>,
}

// --- Notification ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = notifications)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub related_match_id: Option<Uuid>,
    pub related_mission_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = notifications)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub related_match_id: Option<Uuid>,
    pub related_mission_id: Option<Uuid>,
}

// --- Safety report ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = safety_reports)]
pub struct SafetyReport {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub reported_user_id: Uuid,
    pub mission_id: Option<Uuid>,
    pub report_type: String,
    pub description: Option<String>,
    pub reporter_lat: Option<f64>,
    pub reporter_lng: Option<f64>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = safety_reports)]
pub struct NewSafetyReport {
    pub reporter_id: Uuid,
    pub reported_user_id: Uuid,
    pub mission_id: Option<Uuid>,
    pub report_type: String,
    pub description: Option<String>,
    pub reporter_lat: Option<f64>,
    pub reporter_lng: Option<f64>,
}

// --- Status vocabularies ---
//
// Status columns are plain varchars with CHECK constraints; these enums are
// the only place the string values appear in Rust.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    Accepted,
    Rejected,
    Expired,
    Completed,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
            Self::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            "expired" => Some(Self::Expired),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl MissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pending,
    Confirmed,
    NoShow,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::NoShow => "no_show",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    MatchNew,
    MatchAccepted,
    MatchRejected,
    MatchExpired,
    MissionCreated,
    NoShow,
    DepartureReminder,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MatchNew => "match_new",
            Self::MatchAccepted => "match_accepted",
            Self::MatchRejected => "match_rejected",
            Self::MatchExpired => "match_expired",
            Self::MissionCreated => "mission_created",
            Self::NoShow => "no_show",
            Self::DepartureReminder => "departure_reminder",
        }
    }
}

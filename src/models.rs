use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// JSON field names follow the public API contract, which mixes camelCase with
/// a few historical spellings (`eMail`, `created_at`, `topTrackID`).
#[derive(Debug, Clone, FromRow, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    #[serde(rename = "eMail")]
    pub email: String,
    pub date_of_birth: NaiveDate,
    #[serde(rename = "created_at")]
    pub created_at: DateTime<Utc>,
    pub username: String,
    pub bio: Option<String>,
    pub gender: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub password_hash: String,
    pub genre_preferences: Option<Vec<String>>,
    pub image: Option<String>,
    #[serde(rename = "topTrackID")]
    pub top_track_id: Option<String>,
}

#[derive(Debug, Clone, FromRow, serde::Serialize, serde::Deserialize)]
pub struct SpotifyAuthInfo {
    pub access_token: String,
    pub token_type: String,
    pub scope: String,
    pub expires_in: i64,
    pub expires_timestamp: i64,
    pub refresh_token: String,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}

#[derive(Debug, Clone, FromRow, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: Uuid,
    pub creator: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub name: String,
}

#[derive(Debug, Clone, FromRow, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub user_id: Uuid,
    pub group_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, serde::Serialize, serde::Deserialize)]
#[sqlx(type_name = "event_type")]
pub enum EventType {
    Concert,
    Party,
    Festival,
}

#[derive(Debug, Clone, FromRow, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub creator: Uuid,
    pub event_name: String,
    pub event_type: EventType,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub is_private: bool,
}

/// One row means "invited" or "joined", depending on which handler created it.
#[derive(Debug, Clone, FromRow, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventParticipant {
    pub user_id: Uuid,
    pub event_id: Uuid,
}

/// Directional swipe. A mutual match is the pair (A,B) and (B,A) both existing;
/// it is never stored as its own entity.
#[derive(Debug, Clone, FromRow, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub user_a: Uuid,
    pub user_b: Uuid,
    pub result: Option<bool>,
    pub match_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, FromRow, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub composed_id: String,
    pub text: String,
    pub sender_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A message with its sender's username, as returned by the chat history
/// queries.
#[derive(Debug, Clone, FromRow, serde::Serialize)]
pub struct MessageWithSender {
    pub id: Uuid,
    pub composed_id: String,
    pub text: String,
    pub sender_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "senderUsername")]
    pub sender_username: String,
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::models::{Event, EventParticipant, EventType, Match, SpotifyAuthInfo, User};

//
// auth
//

#[derive(Debug, Deserialize, Clone)]
pub struct RegisterRequest {
    #[serde(rename = "eMail")]
    pub email: String,
    #[serde(rename = "dateOfBirth")]
    pub date_of_birth: String,
    pub username: String,
    pub password: String,
}

impl RegisterRequest {
    /// Checks every field and reports all failures at once. Returns the parsed
    /// date of birth on success.
    pub fn validate(&self) -> Result<NaiveDate, ApiError> {
        let mut errors = Vec::new();
        if !is_valid_email(&self.email) {
            errors.push("Invalid email format".to_string());
        }
        if self.password.len() < 6 {
            errors.push("Password must be at least 6 characters long".to_string());
        }
        if self.username.trim().is_empty() {
            errors.push("Username must not be empty".to_string());
        }
        let date_of_birth = match NaiveDate::parse_from_str(&self.date_of_birth, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                errors.push(
                    "Date of birth must be a string in the format YYYY-MM-DD".to_string(),
                );
                None
            }
        };
        match date_of_birth {
            Some(date) if errors.is_empty() => Ok(date),
            _ => Err(ApiError::Validation(errors)),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoginRequest {
    #[serde(rename = "eMail")]
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if !is_valid_email(&self.email) {
            errors.push("Invalid email format".to_string());
        }
        if self.password.is_empty() {
            errors.push("Password must not be empty".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(errors))
        }
    }
}

/// The subset of the user row echoed back by registration.
#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub id: Uuid,
    #[serde(rename = "eMail")]
    pub email: String,
    pub username: String,
    #[serde(rename = "dateOfBirth")]
    pub date_of_birth: NaiveDate,
    #[serde(rename = "passwordHash")]
    pub password_hash: String,
}

impl From<&User> for RegisteredUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            date_of_birth: user.date_of_birth,
            password_hash: user.password_hash.clone(),
        }
    }
}

/// Bearer token payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    #[serde(rename = "eMail")]
    pub email: String,
    pub username: String,
    pub exp: usize,
    pub iss: String,
}

//
// users
//

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(rename = "eMail")]
    pub email: Option<String>,
    pub gender: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub password_hash: Option<String>,
    pub genre_preferences: Option<Vec<String>>,
    #[serde(rename = "topTrackID")]
    pub top_track_id: Option<String>,
}

/// A user merged with its optional Spotify auth sub-record; the field is null
/// when no account is linked, never omitted.
#[derive(Debug, Serialize)]
pub struct UserWithSpotify {
    #[serde(flatten)]
    pub user: User,
    #[serde(rename = "spotifyAuthInfo")]
    pub spotify_auth_info: Option<SpotifyAuthInfo>,
}

//
// groups
//

#[derive(Debug, Deserialize, Clone)]
pub struct CreateGroupRequest {
    pub creator: Uuid,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpdateGroupRequest {
    pub creator: Option<Uuid>,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GroupInviteRequest {
    pub user_id: Uuid,
    pub group_id: Uuid,
}

//
// events
//

fn default_event_type() -> EventType {
    EventType::Party
}

fn default_is_private() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub creator: Uuid,
    pub event_name: String,
    #[serde(default = "default_event_type")]
    pub event_type: EventType,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: Option<String>,
    pub description: Option<String>,
    #[serde(default = "default_is_private")]
    pub is_private: bool,
}

/// Full-record replacement; absent optional fields become NULL.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub creator: Uuid,
    pub event_name: String,
    #[serde(default = "default_event_type")]
    pub event_type: EventType,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: Option<String>,
    pub description: Option<String>,
    #[serde(default = "default_is_private")]
    pub is_private: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventInviteRequest {
    pub invited_user_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct EventWithParticipants {
    pub event: Event,
    pub participants: Vec<EventParticipant>,
}

#[derive(Debug, Serialize)]
pub struct PublicEvents {
    pub events: Vec<Event>,
    pub participants: Vec<EventParticipant>,
}

//
// matches
//

/// A directional pair as swiped by the client; the server never reorders it.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MatchPair {
    pub user_a: Uuid,
    pub user_b: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct MatchesOfUserQuery {
    pub user: Uuid,
}

#[derive(Debug, Serialize)]
pub struct CheckMatchResponse {
    #[serde(rename = "AhasMatchedB")]
    pub a_has_matched_b: Vec<Match>,
    #[serde(rename = "BhasMatchedA")]
    pub b_has_matched_a: Vec<Match>,
}

//
// chat
//

#[derive(Debug, Deserialize, Clone)]
pub struct NewMessageRequest {
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub text: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NewGroupMessageRequest {
    pub composed_id: String,
    pub text: String,
    pub sender_id: Uuid,
}

//
// spotify
//

#[derive(Debug, Deserialize)]
pub struct SpotifyCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<Uuid>,
}

fn is_valid_email(value: &str) -> bool {
    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plausible_emails() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("a@"));
        assert!(!is_valid_email("a@nodot"));
        assert!(!is_valid_email("a@.com"));
    }

    #[test]
    fn register_validation_reports_every_failing_field() {
        let request = RegisterRequest {
            email: "nope".to_string(),
            date_of_birth: "31-12-2000".to_string(),
            username: "   ".to_string(),
            password: "abc".to_string(),
        };
        let err = request.validate().expect_err("invalid payload");
        match err {
            ApiError::Validation(messages) => {
                assert_eq!(messages.len(), 4);
                assert!(messages.contains(&"Invalid email format".to_string()));
                assert!(messages
                    .contains(&"Password must be at least 6 characters long".to_string()));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn register_validation_returns_the_parsed_date() {
        let request = RegisterRequest {
            email: "a@x.com".to_string(),
            date_of_birth: "2000-12-31".to_string(),
            username: "mingler".to_string(),
            password: "secret-enough".to_string(),
        };
        let date = request.validate().expect("valid payload");
        assert_eq!(date, NaiveDate::from_ymd_opt(2000, 12, 31).unwrap());
    }

    #[test]
    fn login_validation_requires_email_shape_and_password() {
        let request = LoginRequest {
            email: "broken".to_string(),
            password: String::new(),
        };
        let err = request.validate().expect_err("invalid payload");
        match err {
            ApiError::Validation(messages) => assert_eq!(messages.len(), 2),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub type UserId = u64;
pub type QuestionId = u64;
pub type AnswerId = u64;
pub type PaperId = u64;

// ============= Auth Types =============

/// Username/password pair sent to `/auth/` and `/register/student`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub user: UserRef,
    pub token: String,
    #[serde(default, deserialize_with = "de_lenient_i64")]
    pub privilege: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisteredUser {
    pub id: UserId,
    #[serde(default, deserialize_with = "de_lenient_i64")]
    pub privilege: i64,
}

// ============= Paper Types =============

/// One entry of the `/available-papers/` map, keyed by course code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CourseListing {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Years", deserialize_with = "de_years")]
    pub years: Vec<i32>,
}

pub type AvailablePapers = BTreeMap<String, CourseListing>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaperRecord {
    pub title: String,
    pub pdf: String,
    pub paper_id: PaperId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPaper {
    pub course: String,
    pub year: i32,
    pub title: String,
    pub pdf: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedPaper {
    pub id: PaperId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    #[serde(default)]
    pub id: QuestionId,
    pub number: String,
}

/// Body element of `/submit/{paperId}/questions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionNumber {
    pub number: String,
}

// ============= Answer Types =============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerAuthor {
    pub id: UserId,
    pub username: String,
}

/// Answer as serialized by the API.
///
/// `can_vote` is `1` when the requesting user may vote, `0` when they already
/// have, and `-1` when the server could not tell.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnswerRecord {
    pub id: AnswerId,
    pub user: AnswerAuthor,
    pub votes: i64,
    #[serde(deserialize_with = "de_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub html: String,
    pub question: QuestionId,
    #[serde(default = "default_can_vote")]
    pub can_vote: i64,
}

fn default_can_vote() -> i64 {
    -1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAnswer {
    /// The API expects the question id as a string here.
    pub question: String,
    pub user: AnswerAuthor,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditAnswer {
    pub id: AnswerId,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EditedAnswer {
    pub html: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct VoteCount {
    pub votes: i64,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Paper {paper_id} was created but its questions were rejected: {reason}")]
    PartialUpload { paper_id: PaperId, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Client-side rejection; the request was never sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, AppError::Auth(_))
    }

    /// Network failure or non-2xx response.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AppError::Transport(_) | AppError::Http { .. } | AppError::Decode(_)
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return AppError::Decode(err.to_string());
        }
        match err.status() {
            Some(status) => AppError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => AppError::Transport(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

// ============= Serde Helpers =============

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(i64),
    Text(String),
}

impl NumberOrText {
    fn into_i64(self) -> Option<i64> {
        match self {
            NumberOrText::Number(n) => Some(n),
            NumberOrText::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Accepts `1` as well as `"1"`; the API is not consistent about it.
fn de_lenient_i64<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = NumberOrText::deserialize(deserializer)?;
    raw.into_i64()
        .ok_or_else(|| serde::de::Error::custom("expected an integer"))
}

fn de_years<'de, D>(deserializer: D) -> std::result::Result<Vec<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<NumberOrText>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|year| {
            year.into_i64()
                .and_then(|y| i32::try_from(y).ok())
                .ok_or_else(|| serde::de::Error::custom("invalid paper year"))
        })
        .collect()
}

/// RFC 3339 timestamps, or naive ones (treated as UTC) when the server runs
/// without time zone support.
fn de_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_answer_record_from_api() {
        let record: AnswerRecord = serde_json::from_value(json!({
            "id": 7,
            "user": {"id": 3, "username": "ada"},
            "votes": 4,
            "timestamp": "2017-10-08T05:12:33.123456Z",
            "html": "<p>use induction</p>",
            "question": 12,
            "can_vote": 1
        }))
        .expect("answer record should decode");

        assert_eq!(record.user.username, "ada");
        assert_eq!(record.votes, 4);
        assert_eq!(record.can_vote, 1);
        assert_eq!(record.timestamp.timestamp(), 1_507_439_553);
    }

    #[test]
    fn test_naive_timestamp_is_utc() {
        let record: AnswerRecord = serde_json::from_value(json!({
            "id": 1,
            "user": {"id": 1, "username": "x"},
            "votes": 0,
            "timestamp": "2017-10-08T05:12:33",
            "html": "",
            "question": 1
        }))
        .expect("naive timestamp should decode");

        assert_eq!(record.timestamp.timestamp(), 1_507_439_553);
        assert_eq!(record.can_vote, -1);
    }

    #[test]
    fn test_course_listing_accepts_string_years() {
        let papers: AvailablePapers = serde_json::from_value(json!({
            "CS101": {"Name": "Intro", "Years": ["2018", 2019], "paper_id": 4}
        }))
        .expect("listing should decode");

        assert_eq!(papers["CS101"].years, vec![2018, 2019]);
    }

    #[test]
    fn test_auth_response_with_string_privilege() {
        let auth: AuthResponse = serde_json::from_value(json!({
            "user": {"id": 9},
            "token": "abc",
            "privilege": "1"
        }))
        .expect("auth response should decode");

        assert_eq!(auth.privilege, 1);
        assert_eq!(auth.user.id, 9);
    }

    #[test]
    fn test_error_classification() {
        assert!(AppError::Validation("short".into()).is_validation());
        assert!(AppError::Http {
            status: 500,
            message: "boom".into()
        }
        .is_transport());
        assert_eq!(
            AppError::Http {
                status: 404,
                message: String::new()
            }
            .status(),
            Some(404)
        );
        assert!(!AppError::Auth("nope".into()).is_transport());
    }
}

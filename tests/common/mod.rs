//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use biblio::auth::Session;
use biblio::views::Viewer;
use biblio::ApiClient;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use wiremock::MockServer;

/// Unsigned JWT whose only interesting claim is `exp`.
pub fn token_expiring_in(seconds: i64) -> String {
    let exp = (Utc::now() + Duration::seconds(seconds)).timestamp();
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let claims = URL_SAFE_NO_PAD.encode(json!({ "user_id": 1, "exp": exp }).to_string());
    format!("{}.{}.c2lnbmF0dXJl", header, claims)
}

pub fn session(user_id: u64, privilege: i64) -> Session {
    Session {
        user_id,
        username: format!("user{}", user_id),
        token: token_expiring_in(3600),
        privilege,
    }
}

pub fn student() -> Viewer {
    Viewer::from(&session(1, 0))
}

pub fn lecturer() -> Viewer {
    Viewer::from(&session(2, 1))
}

pub fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(server.uri())
}

pub fn signed_client(server: &MockServer) -> ApiClient {
    client(server).with_token("test-token")
}

pub fn answer_json(id: u64, user_id: u64, votes: i64, question: u64, can_vote: i64) -> Value {
    json!({
        "id": id,
        "user": { "id": user_id, "username": format!("user{}", user_id) },
        "votes": votes,
        "timestamp": "2017-10-08T05:12:33Z",
        "html": format!("<p>answer number {}</p>", id),
        "question": question,
        "can_vote": can_vote
    })
}

pub fn paper_json() -> Value {
    json!({ "title": "CS101 Final", "pdf": "JVBERi0xLjQ=", "paper_id": 42 })
}

pub fn questions_json() -> Value {
    json!([{ "id": 1, "number": "1a" }, { "id": 2, "number": "1b" }])
}

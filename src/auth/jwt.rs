use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::types::{AppError, Result};

#[derive(Debug, Deserialize)]
struct ExpiryClaim {
    #[serde(default)]
    exp: Option<f64>,
}

/// Reads the `exp` claim of a JWT without checking its signature.
///
/// Returns `Ok(None)` for a well-formed token that carries no expiry.
pub fn token_expiry(token: &str) -> Result<Option<DateTime<Utc>>> {
    let mut parts = token.split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => {
            return Err(AppError::Auth(
                "JWT must have three dot-separated parts".to_string(),
            ))
        }
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| AppError::Auth(format!("Cannot decode JWT payload: {}", e)))?;
    let claim: ExpiryClaim = serde_json::from_slice(&bytes)
        .map_err(|e| AppError::Auth(format!("Invalid JWT claims: {}", e)))?;

    match claim.exp {
        None => Ok(None),
        Some(exp) => DateTime::from_timestamp(exp as i64, 0)
            .map(Some)
            .ok_or_else(|| AppError::Auth(format!("JWT expiry out of range: {}", exp))),
    }
}

/// A token without an expiry never expires; one that cannot be decoded is
/// treated as expired.
pub fn is_token_expired(token: &str, now: DateTime<Utc>) -> bool {
    match token_expiry(token) {
        Ok(Some(exp)) => exp <= now,
        Ok(None) => false,
        Err(e) => {
            tracing::debug!("Rejecting token: {}", e);
            true
        }
    }
}

#[cfg(test)]
pub(crate) fn mint(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.signature", header, payload)
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::AppError;

/// Direction of a vote on an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Upvote,
    Downvote,
}

impl Vote {
    /// Path segment of the vote endpoint.
    pub fn as_uri(self) -> &'static str {
        match self {
            Vote::Upvote => "upvote",
            Vote::Downvote => "downvote",
        }
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_uri())
    }
}

impl FromStr for Vote {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "upvote" | "+" => Ok(Vote::Upvote),
            "down" | "downvote" | "-" => Ok(Vote::Downvote),
            other => Err(AppError::Validation(format!(
                "unknown vote '{}', expected 'up' or 'down'",
                other
            ))),
        }
    }
}

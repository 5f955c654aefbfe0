use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::vote::Vote;
use crate::types::{AnswerId, AnswerRecord, QuestionId, UserId};

/// An answer to one exam question.
///
/// `can_vote` is view state: it flips as soon as the user votes, before the
/// server has confirmed anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub id: AnswerId,
    pub user_id: UserId,
    pub username: String,
    pub votes: i64,
    pub timestamp: DateTime<Utc>,
    pub html: String,
    pub question_id: QuestionId,
    pub can_vote: bool,
}

impl Answer {
    /// Only the author may edit or delete an answer.
    pub fn can_edit(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    pub fn upvote(&mut self) {
        self.votes += 1;
        self.can_vote = false;
    }

    pub fn downvote(&mut self) {
        self.votes -= 1;
        self.can_vote = true;
    }

    pub fn apply(&mut self, vote: Vote) {
        match vote {
            Vote::Upvote => self.upvote(),
            Vote::Downvote => self.downvote(),
        }
    }
}

impl From<AnswerRecord> for Answer {
    fn from(record: AnswerRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user.id,
            username: record.user.username,
            votes: record.votes,
            timestamp: record.timestamp,
            html: record.html,
            question_id: record.question,
            can_vote: record.can_vote == 1,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::answer;
    use super::*;
    use crate::types::AnswerAuthor;

    #[test]
    fn test_upvote_blocks_further_voting() {
        let mut a = answer(1, 2, 5);
        a.upvote();
        assert_eq!(a.votes, 6);
        assert!(!a.can_vote);
    }

    #[test]
    fn test_downvote_reenables_voting() {
        let mut a = answer(1, 2, 5);
        a.can_vote = false;
        a.downvote();
        assert_eq!(a.votes, 4);
        assert!(a.can_vote);
    }

    #[test]
    fn test_only_author_can_edit() {
        let a = answer(1, 2, 0);
        assert!(a.can_edit(2));
        assert!(!a.can_edit(3));
    }

    #[test]
    fn test_can_vote_flag_from_record() {
        let record = |can_vote| AnswerRecord {
            id: 1,
            user: AnswerAuthor {
                id: 1,
                username: "ada".into(),
            },
            votes: 0,
            timestamp: Utc::now(),
            html: String::new(),
            question: 3,
            can_vote,
        };

        assert!(Answer::from(record(1)).can_vote);
        assert!(!Answer::from(record(0)).can_vote);
        assert!(!Answer::from(record(-1)).can_vote);
        assert_eq!(Answer::from(record(1)).question_id, 3);
    }
}

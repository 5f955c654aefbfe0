use serde::{Deserialize, Serialize};

use super::answer::Answer;
use super::vote::Vote;
use crate::types::{AnswerId, QuestionId, UserId};

/// What a solution panel currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolutionDisplay {
    Hidden,
    /// Only the top answer, with a "show more" control.
    FirstOnly,
    All,
}

/// All answers to one question plus the panel state used to display them.
///
/// Answers are kept sorted by vote count, highest first, after every
/// mutation. Ties keep their previous relative order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    id: QuestionId,
    question: String,
    answers: Vec<Answer>,
    hidden: bool,
    show_more: bool,
}

impl Solution {
    pub fn new(id: QuestionId, question: impl Into<String>, answers: Vec<Answer>) -> Self {
        let mut solution = Self {
            id,
            question: question.into(),
            answers,
            hidden: true,
            show_more: false,
        };
        solution.sort();
        solution
    }

    pub fn id(&self) -> QuestionId {
        self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn answer(&self, id: AnswerId) -> Option<&Answer> {
        self.answers.iter().find(|a| a.id == id)
    }

    // ============= Display =============

    /// Flip between hidden and expanded. Expanding always starts collapsed
    /// to the top answer.
    pub fn toggle_show(&mut self) {
        self.hidden = !self.hidden;
        self.show_more = false;
    }

    pub fn hide(&mut self) {
        self.hidden = true;
        self.show_more = false;
    }

    pub fn show_more(&mut self) {
        self.show_more = true;
    }

    /// True when answers are being held back behind "show more".
    pub fn has_more(&self) -> bool {
        !self.show_more && self.answers.len() > 1
    }

    pub fn display(&self) -> SolutionDisplay {
        if self.hidden {
            SolutionDisplay::Hidden
        } else if self.has_more() {
            SolutionDisplay::FirstOnly
        } else {
            SolutionDisplay::All
        }
    }

    /// The answers visible in the current display state.
    pub fn displayed(&self) -> &[Answer] {
        match self.display() {
            SolutionDisplay::Hidden => &[],
            SolutionDisplay::FirstOnly => &self.answers[..1],
            SolutionDisplay::All => &self.answers,
        }
    }

    pub fn header(&self) -> String {
        if self.answers.is_empty() {
            format!(
                "There are no answers for {}. Why not submit yours?",
                self.question
            )
        } else {
            format!("Answers for {}:", self.question)
        }
    }

    // ============= Mutation =============

    pub fn add_answer(&mut self, answer: Answer) {
        self.answers.push(answer);
        self.sort();
    }

    pub fn remove_answer(&mut self, id: AnswerId) -> Option<Answer> {
        let pos = self.answers.iter().position(|a| a.id == id)?;
        Some(self.answers.remove(pos))
    }

    /// Replace the body of an answer. Returns false if it is not present.
    pub fn update_answer(&mut self, id: AnswerId, html: impl Into<String>) -> bool {
        match self.answers.iter_mut().find(|a| a.id == id) {
            Some(answer) => {
                answer.html = html.into();
                true
            }
            None => false,
        }
    }

    /// Swap in a freshly fetched answer list, keeping the panel state.
    pub fn replace_answers(&mut self, answers: Vec<Answer>) {
        self.answers = answers;
        self.sort();
    }

    /// Apply a vote locally before the server has confirmed it.
    pub fn vote(&mut self, id: AnswerId, vote: Vote) -> bool {
        match self.answers.iter_mut().find(|a| a.id == id) {
            Some(answer) => {
                answer.apply(vote);
                self.sort();
                true
            }
            None => false,
        }
    }

    /// Overwrite the local count with the server's authoritative one.
    pub fn set_votes(&mut self, id: AnswerId, votes: i64) -> bool {
        match self.answers.iter_mut().find(|a| a.id == id) {
            Some(answer) => {
                answer.votes = votes;
                self.sort();
                true
            }
            None => false,
        }
    }

    /// A user gets one answer per question.
    pub fn can_submit_new_answer(&self, user_id: UserId) -> bool {
        !self.answers.iter().any(|a| a.user_id == user_id)
    }

    fn sort(&mut self) {
        self.answers.sort_by(|a, b| b.votes.cmp(&a.votes));
    }
}

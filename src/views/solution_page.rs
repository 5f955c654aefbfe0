use futures::future::join_all;
use scraper::Html;

use crate::api::ApiClient;
use crate::auth::Session;
use crate::model::{Answer, Paper, Solution, Vote};
use crate::types::{
    AnswerAuthor, AnswerId, AnswerRecord, AppError, EditAnswer, NewAnswer, QuestionId,
    QuestionRecord, Result, UserId,
};

pub const MIN_ANSWER_LEN: usize = 10;
pub const PAPER_DELETED_MESSAGE: &str = "Paper successfully deleted";

/// Visible text of an answer body, parsed as an HTML fragment so entities
/// are decoded and markup is dropped the way a browser renders it.
pub fn answer_text(html: &str) -> String {
    Html::parse_fragment(html)
        .root_element()
        .text()
        .collect::<String>()
        .replace('\u{a0}', " ")
}

pub fn validate_answer(html: &str) -> Result<()> {
    if answer_text(html).chars().count() < MIN_ANSWER_LEN {
        return Err(AppError::Validation(format!(
            "Minimum length of {} characters",
            MIN_ANSWER_LEN
        )));
    }
    Ok(())
}

/// The user looking at the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: UserId,
    pub username: String,
    pub privilege: i64,
}

impl Viewer {
    pub fn is_lecturer(&self) -> bool {
        self.privilege > 0
    }
}

impl From<&Session> for Viewer {
    fn from(session: &Session) -> Self {
        Self {
            user_id: session.user_id,
            username: session.username.clone(),
            privilege: session.privilege,
        }
    }
}

/// State of one paper's page: the paper, a solution per question, which
/// solution is expanded and which answer is being edited.
///
/// At most one solution is expanded and at most one answer is in edit at a
/// time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolutionPage {
    course_code: String,
    year: i32,
    paper: Option<Paper>,
    solutions: Vec<Solution>,
    active: Option<QuestionId>,
    editing: Option<AnswerId>,
}

impl SolutionPage {
    pub fn new(course_code: impl Into<String>, year: i32) -> Self {
        Self {
            course_code: course_code.into(),
            year,
            ..Self::default()
        }
    }

    pub fn course_code(&self) -> &str {
        &self.course_code
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn paper(&self) -> Option<&Paper> {
        self.paper.as_ref()
    }

    pub fn set_paper(&mut self, paper: Paper) {
        self.paper = Some(paper);
    }

    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    pub fn solution(&self, id: QuestionId) -> Option<&Solution> {
        self.solutions.iter().find(|s| s.id() == id)
    }

    fn solution_mut(&mut self, id: QuestionId) -> Option<&mut Solution> {
        self.solutions.iter_mut().find(|s| s.id() == id)
    }

    /// Look a question up by its printed number, e.g. `1a`.
    pub fn solution_by_number(&self, number: &str) -> Option<&Solution> {
        let number = number.trim();
        self.solutions
            .iter()
            .find(|s| s.question().eq_ignore_ascii_case(number))
    }

    /// One empty, hidden solution per question, in paper order.
    pub fn set_questions(&mut self, questions: Vec<QuestionRecord>) {
        self.solutions = questions
            .into_iter()
            .map(|q| Solution::new(q.id, q.number, Vec::new()))
            .collect();
        self.active = None;
        self.editing = None;
    }

    // ============= Expansion =============

    pub fn active(&self) -> Option<QuestionId> {
        self.active
    }

    /// Expand or collapse a solution, collapsing whichever one was expanded
    /// before. Returns true if `id` is now expanded.
    pub fn toggle(&mut self, id: QuestionId) -> bool {
        if self.solution(id).is_none() {
            return false;
        }
        if let Some(previous) = self.active.filter(|&prev| prev != id) {
            if let Some(solution) = self.solution_mut(previous) {
                solution.hide();
            }
        }
        self.active = Some(id);

        match self.solution_mut(id) {
            Some(solution) => {
                solution.toggle_show();
                !solution.is_hidden()
            }
            None => false,
        }
    }

    pub fn show_more(&mut self, id: QuestionId) {
        if let Some(solution) = self.solution_mut(id) {
            solution.show_more();
        }
    }

    /// Every question, for the slow whole-page refresh.
    pub fn page_refresh_targets(&self) -> Vec<QuestionId> {
        self.solutions.iter().map(Solution::id).collect()
    }

    /// The expanded question, for the fast refresh. None when nothing is
    /// expanded.
    pub fn active_refresh_target(&self) -> Option<QuestionId> {
        self.active
            .and_then(|id| self.solution(id))
            .filter(|s| !s.is_hidden())
            .map(Solution::id)
    }

    // ============= Answers =============

    pub fn apply_answers(&mut self, id: QuestionId, records: Vec<AnswerRecord>) -> bool {
        match self.solution_mut(id) {
            Some(solution) => {
                solution.replace_answers(records.into_iter().map(Answer::from).collect());
                true
            }
            None => false,
        }
    }

    /// Optimistic local vote.
    pub fn cast_vote(&mut self, id: QuestionId, answer_id: AnswerId, vote: Vote) -> bool {
        self.solution_mut(id)
            .is_some_and(|s| s.vote(answer_id, vote))
    }

    /// Server-confirmed total for an answer.
    pub fn confirm_vote(&mut self, id: QuestionId, answer_id: AnswerId, votes: i64) -> bool {
        self.solution_mut(id)
            .is_some_and(|s| s.set_votes(answer_id, votes))
    }

    /// A freshly submitted answer; the solution expands fully to show it.
    pub fn add_answer(&mut self, id: QuestionId, answer: Answer) -> bool {
        match self.solution_mut(id) {
            Some(solution) => {
                solution.add_answer(answer);
                solution.show_more();
                true
            }
            None => false,
        }
    }

    pub fn remove_answer(&mut self, id: QuestionId, answer_id: AnswerId) -> Option<Answer> {
        let removed = self.solution_mut(id)?.remove_answer(answer_id);
        if removed.is_some() && self.editing == Some(answer_id) {
            self.editing = None;
        }
        removed
    }

    pub fn find_answer(&self, answer_id: AnswerId) -> Option<(&Solution, &Answer)> {
        self.solutions
            .iter()
            .find_map(|s| s.answer(answer_id).map(|a| (s, a)))
    }

    // ============= Editing =============

    pub fn editing(&self) -> Option<AnswerId> {
        self.editing
    }

    pub fn is_editing(&self, answer_id: AnswerId) -> bool {
        self.editing == Some(answer_id)
    }

    /// Claim the single edit slot. Returns the answer whose edit was dropped.
    pub fn begin_edit(&mut self, answer_id: AnswerId) -> Option<AnswerId> {
        self.editing.replace(answer_id).filter(|&prev| prev != answer_id)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Store the saved body of `answer_id`. The edit slot is freed only if
    /// it still belongs to that answer.
    pub fn finish_edit(&mut self, answer_id: AnswerId, html: impl Into<String>) -> bool {
        if self.editing == Some(answer_id) {
            self.editing = None;
        }
        let html = html.into();
        self.solutions
            .iter_mut()
            .any(|s| s.update_answer(answer_id, html.clone()))
    }
}

/// Drives a [`SolutionPage`] against the API on behalf of one viewer.
pub struct SolutionPageController {
    client: ApiClient,
    viewer: Viewer,
    page: SolutionPage,
}

impl SolutionPageController {
    pub fn new(client: ApiClient, viewer: Viewer, course_code: impl Into<String>, year: i32) -> Self {
        Self {
            client,
            viewer,
            page: SolutionPage::new(course_code, year),
        }
    }

    pub fn page(&self) -> &SolutionPage {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut SolutionPage {
        &mut self.page
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    /// Fetch the paper and its questions, then every question's answers.
    ///
    /// A missing PDF does not stop the page from loading; missing questions
    /// do.
    pub async fn load(&mut self) -> Result<()> {
        let code = self.page.course_code().to_string();
        let year = self.page.year();

        match self.client.paper(&code, year).await {
            Ok(record) => self.page.set_paper(Paper::from_record(&code, year, record)),
            Err(e) => tracing::warn!(course = %code, year, "Could not load paper: {}", e),
        }

        let questions = self.client.questions(&code, year).await?;
        self.page.set_questions(questions);
        self.refresh_page().await;
        Ok(())
    }

    pub async fn toggle(&mut self, id: QuestionId) -> Result<()> {
        if self.page.toggle(id) {
            self.refresh_solution(id).await?;
        }
        Ok(())
    }

    pub async fn refresh_solution(&mut self, id: QuestionId) -> Result<()> {
        let records = self.client.answers(id).await?;
        self.page.apply_answers(id, records);
        Ok(())
    }

    /// Refresh every question. Failures are logged and skipped; returns how
    /// many questions were updated.
    pub async fn refresh_page(&mut self) -> usize {
        let targets = self.page.page_refresh_targets();
        let client = &self.client;
        let results = join_all(targets.iter().map(|&id| async move { (id, client.answers(id).await) })).await;

        let mut refreshed = 0;
        for (id, result) in results {
            match result {
                Ok(records) => {
                    self.page.apply_answers(id, records);
                    refreshed += 1;
                }
                Err(e) => tracing::warn!(question = id, "Refresh failed: {}", e),
            }
        }
        refreshed
    }

    /// Refresh the expanded question, if any. Returns whether one was.
    pub async fn refresh_active(&mut self) -> Result<bool> {
        match self.page.active_refresh_target() {
            Some(id) => self.refresh_solution(id).await.map(|_| true),
            None => Ok(false),
        }
    }

    /// Vote, showing the result before the server answers. A rejected vote
    /// is not rolled back.
    pub async fn vote(&mut self, id: QuestionId, answer_id: AnswerId, vote: Vote) -> Result<i64> {
        if !self.page.cast_vote(id, answer_id, vote) {
            return Err(AppError::Validation(format!(
                "No answer {} on question {}",
                answer_id, id
            )));
        }

        let count = self.client.vote(answer_id, vote).await.map_err(|e| {
            tracing::warn!(answer = answer_id, %vote, "Vote failed: {}", e);
            e
        })?;
        self.page.confirm_vote(id, answer_id, count.votes);
        Ok(count.votes)
    }

    pub async fn submit_answer(&mut self, id: QuestionId, html: &str) -> Result<AnswerId> {
        validate_answer(html)?;
        let solution = self
            .page
            .solution(id)
            .ok_or_else(|| AppError::Validation(format!("No question {}", id)))?;
        if !solution.can_submit_new_answer(self.viewer.user_id) {
            return Err(AppError::Validation(
                "You have already answered this question".to_string(),
            ));
        }

        let record = self
            .client
            .submit_answer(&NewAnswer {
                question: id.to_string(),
                user: AnswerAuthor {
                    id: self.viewer.user_id,
                    username: self.viewer.username.clone(),
                },
                html: html.to_string(),
            })
            .await?;

        let answer = Answer::from(record);
        let answer_id = answer.id;
        self.page.add_answer(id, answer);
        Ok(answer_id)
    }

    /// Start editing one of the viewer's own answers.
    pub fn begin_edit(&mut self, answer_id: AnswerId) -> Result<()> {
        self.own_answer(answer_id)?;
        self.page.begin_edit(answer_id);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.page.cancel_edit();
    }

    pub async fn submit_edit(&mut self, html: &str) -> Result<()> {
        let answer_id = self
            .page
            .editing()
            .ok_or_else(|| AppError::Validation("No answer is being edited".to_string()))?;
        validate_answer(html)?;

        let edited = self
            .client
            .edit_answer(&EditAnswer {
                id: answer_id,
                html: html.to_string(),
            })
            .await?;
        self.page.finish_edit(answer_id, edited.html);
        Ok(())
    }

    pub async fn delete_answer(&mut self, answer_id: AnswerId) -> Result<()> {
        let question = self.own_answer(answer_id)?;
        let status = self.client.delete_answer(answer_id).await?;
        tracing::debug!(answer = answer_id, status, "Answer deleted");
        self.page.remove_answer(question, answer_id);
        Ok(())
    }

    /// Lecturers only.
    pub async fn delete_paper(&mut self) -> Result<()> {
        if !self.viewer.is_lecturer() {
            return Err(AppError::Auth(
                "Only lecturers can delete papers".to_string(),
            ));
        }
        let paper_id = self
            .page
            .paper()
            .map(|p| p.paper_id)
            .ok_or_else(|| AppError::Validation("Paper has not been loaded".to_string()))?;

        self.client.delete_paper(paper_id).await?;
        tracing::info!(paper_id, "{}", PAPER_DELETED_MESSAGE);
        Ok(())
    }

    fn own_answer(&self, answer_id: AnswerId) -> Result<QuestionId> {
        let (solution, answer) = self
            .page
            .find_answer(answer_id)
            .ok_or_else(|| AppError::Validation(format!("No answer {}", answer_id)))?;
        if !answer.can_edit(self.viewer.user_id) {
            return Err(AppError::Auth(
                "You can only change your own answers".to_string(),
            ));
        }
        Ok(solution.id())
    }
}

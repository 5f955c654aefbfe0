use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::auth::Session;
use crate::model::Vote;
use crate::types::{
    AnswerId, AnswerRecord, AppError, AuthResponse, AvailablePapers, CreatedPaper, Credentials,
    EditAnswer, EditedAnswer, NewAnswer, NewPaper, PaperId, PaperRecord, QuestionId,
    QuestionNumber, QuestionRecord, RegisteredUser, Result, VoteCount,
};
use crate::utils::config::ClientConfig;

pub const DEFAULT_AUTH_PREFIX: &str = "JWT";

/// Thin mapping from portal operations to HTTP calls.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    endpoint: String,
    auth_prefix: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            auth_prefix: DEFAULT_AUTH_PREFIX.to_string(),
            token: None,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api_endpoint.clone()).with_auth_prefix(config.auth_header_prefix.clone())
    }

    /// Scheme word placed before the token, e.g. `JWT` or `Bearer`.
    pub fn with_auth_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.auth_prefix = prefix.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_session(&self, session: &Session) -> Self {
        self.clone().with_token(session.token.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Join path segments onto the endpoint. A trailing empty segment keeps
    /// a trailing slash.
    pub fn url(&self, segments: &[&str]) -> String {
        let mut url = self.endpoint.clone();
        for segment in segments {
            url.push('/');
            url.push_str(segment.trim_matches('/'));
        }
        url
    }

    // ============= Auth =============

    pub async fn authenticate(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let req = self
            .request(Method::POST, &["auth", ""])
            .json(credentials);
        self.send_json(req).await
    }

    pub async fn register_student(&self, credentials: &Credentials) -> Result<RegisteredUser> {
        let req = self
            .request(Method::POST, &["register", "student"])
            .json(credentials);
        self.send_json(req).await
    }

    // ============= Papers =============

    pub async fn available_papers(&self) -> Result<AvailablePapers> {
        self.send_json(self.request(Method::GET, &["available-papers", ""]))
            .await
    }

    pub async fn paper(&self, course_code: &str, year: i32) -> Result<PaperRecord> {
        let year = year.to_string();
        self.send_json(self.request(Method::GET, &[course_code, year.as_str(), "paper"]))
            .await
    }

    pub async fn questions(&self, course_code: &str, year: i32) -> Result<Vec<QuestionRecord>> {
        let year = year.to_string();
        self.send_json(self.request(Method::GET, &[course_code, year.as_str(), "questions"]))
            .await
    }

    pub async fn submit_paper(&self, paper: &NewPaper) -> Result<CreatedPaper> {
        let req = self
            .request(Method::POST, &["submit", "paper"])
            .json(paper);
        self.send_json(req).await
    }

    pub async fn submit_questions(
        &self,
        paper_id: PaperId,
        questions: &[QuestionNumber],
    ) -> Result<()> {
        let id = paper_id.to_string();
        let req = self
            .request(Method::POST, &["submit", id.as_str(), "questions"])
            .json(questions);
        self.send(req).await.map(|_| ())
    }

    pub async fn delete_paper(&self, paper_id: PaperId) -> Result<()> {
        let id = paper_id.to_string();
        self.send(self.request(Method::DELETE, &["delete", id.as_str(), "paper"]))
            .await
            .map(|_| ())
    }

    // ============= Answers =============

    pub async fn answers(&self, question_id: QuestionId) -> Result<Vec<AnswerRecord>> {
        let id = question_id.to_string();
        self.send_json(self.request(Method::GET, &[id.as_str(), "answer"]))
            .await
    }

    /// Posts with an empty body; the response carries the new total.
    pub async fn vote(&self, answer_id: AnswerId, vote: Vote) -> Result<VoteCount> {
        let id = answer_id.to_string();
        self.send_json(self.request(Method::POST, &[vote.as_uri(), id.as_str()]))
            .await
    }

    pub async fn submit_answer(&self, answer: &NewAnswer) -> Result<AnswerRecord> {
        let req = self
            .request(Method::POST, &["submit", "answer"])
            .json(answer);
        self.send_json(req).await
    }

    pub async fn edit_answer(&self, edit: &EditAnswer) -> Result<EditedAnswer> {
        let req = self
            .request(Method::POST, &["update", "answer"])
            .json(edit);
        self.send_json(req).await
    }

    /// Returns the response status; the body is empty.
    pub async fn delete_answer(&self, answer_id: AnswerId) -> Result<u16> {
        let id = answer_id.to_string();
        let response = self
            .send(self.request(Method::DELETE, &["delete", id.as_str(), "answer"]))
            .await?;
        Ok(response.status().as_u16())
    }

    // ============= Plumbing =============

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        tracing::debug!(%method, %url, "API request");

        let req = self.http.request(method, url);
        match &self.token {
            Some(token) => req.header(
                reqwest::header::AUTHORIZATION,
                format!("{} {}", self.auth_prefix, token),
            ),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response> {
        let response = req.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "API request failed: {}", text);
            return Err(AppError::Http {
                status: status.as_u16(),
                message: if text.is_empty() {
                    status.to_string()
                } else {
                    text
                },
            });
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let response = self.send(req).await?;
        response
            .json()
            .await
            .map_err(|e| AppError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = ApiClient::new("http://localhost:8000/api/");
        assert_eq!(client.endpoint(), "http://localhost:8000/api");
        assert_eq!(client.url(&["auth", ""]), "http://localhost:8000/api/auth/");
        assert_eq!(
            client.url(&["CS101", "2019", "paper"]),
            "http://localhost:8000/api/CS101/2019/paper"
        );
        assert_eq!(
            client.url(&[Vote::Downvote.as_uri(), "7"]),
            "http://localhost:8000/api/downvote/7"
        );
    }

    #[test]
    fn test_token_is_attached_per_client() {
        let anonymous = ApiClient::new("http://x");
        let signed = anonymous.clone().with_token("abc");
        assert_eq!(anonymous.token(), None);
        assert_eq!(signed.token(), Some("abc"));
    }
}

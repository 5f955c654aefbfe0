//! Browser glue around the API client

use biblio::types::{AppError, QuestionId};
use biblio::views::SolutionPage;
use biblio::ApiClient;
use leptos::prelude::*;

/// Blocking browser alert, used for rejected submissions.
pub fn alert(message: &str) {
    if window().alert_with_message(message).is_err() {
        tracing::warn!("alert suppressed: {}", message);
    }
}

/// Alert for a failed action. Validation messages are shown as written.
pub fn alert_error(err: &AppError) {
    match err {
        AppError::Validation(message) => alert(message),
        other => alert(&other.to_string()),
    }
}

/// Reload one question's answers. A response arriving after the page is gone
/// is dropped.
pub async fn refresh_solution(api: ApiClient, page: RwSignal<SolutionPage>, id: QuestionId) {
    match api.answers(id).await {
        Ok(records) => {
            page.try_update(|p| p.apply_answers(id, records));
        }
        Err(e) => tracing::warn!(question = id, "Refresh failed: {}", e),
    }
}

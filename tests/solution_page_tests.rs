//! Paper page orchestration: loading, refreshes, votes and answer changes.

mod common;

use biblio::model::SolutionDisplay;
use biblio::types::AppError;
use biblio::views::SolutionPageController;
use biblio::Vote;
use common::{answer_json, lecturer, paper_json, questions_json, signed_client, student};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_page(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/CS101/2019/paper"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paper_json()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/CS101/2019/questions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(questions_json()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/1/answer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            answer_json(10, 3, 1, 1, 1),
            answer_json(11, 1, 5, 1, 0),
            answer_json(12, 4, 3, 1, 1)
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/2/answer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
}

async fn loaded(server: &MockServer, viewer: biblio::views::Viewer) -> SolutionPageController {
    let mut controller = SolutionPageController::new(signed_client(server), viewer, "CS101", 2019);
    controller.load().await.unwrap();
    controller
}

#[tokio::test]
async fn test_load_builds_sorted_hidden_solutions() {
    let server = MockServer::start().await;
    mock_page(&server).await;

    let controller = loaded(&server, student()).await;
    let page = controller.page();

    assert_eq!(page.paper().map(|p| p.paper_id), Some(42));
    assert_eq!(page.solutions().len(), 2);

    let first = page.solution(1).unwrap();
    let ids: Vec<_> = first.answers().iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![11, 12, 10]);
    assert_eq!(first.display(), SolutionDisplay::Hidden);
    assert_eq!(
        page.solution(2).unwrap().header(),
        "There are no answers for 1b. Why not submit yours?"
    );
}

#[tokio::test]
async fn test_missing_pdf_does_not_block_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/CS101/2019/paper"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mock_page(&server).await;

    let controller = loaded(&server, student()).await;
    assert!(controller.page().paper().is_none());
    assert_eq!(controller.page().solutions().len(), 2);
}

#[tokio::test]
async fn test_toggle_expands_and_refreshes() {
    let server = MockServer::start().await;
    mock_page(&server).await;
    let mut controller = loaded(&server, student()).await;

    controller.toggle(1).await.unwrap();
    assert_eq!(controller.page().active_refresh_target(), Some(1));
    assert_eq!(
        controller.page().solution(1).unwrap().display(),
        SolutionDisplay::FirstOnly
    );
    assert!(controller.refresh_active().await.unwrap());

    controller.toggle(2).await.unwrap();
    assert!(controller.page().solution(1).unwrap().is_hidden());

    controller.toggle(2).await.unwrap();
    assert!(!controller.refresh_active().await.unwrap());
}

#[tokio::test]
async fn test_refresh_page_skips_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2/answer"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mock_page(&server).await;

    let mut controller = loaded(&server, student()).await;
    assert_eq!(controller.refresh_page().await, 1);
}

#[tokio::test]
async fn test_vote_is_optimistic_then_confirmed() {
    let server = MockServer::start().await;
    mock_page(&server).await;
    Mock::given(method("POST"))
        .and(path("/upvote/10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "votes": 9 })))
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = loaded(&server, student()).await;
    let votes = controller.vote(1, 10, Vote::Upvote).await.unwrap();
    assert_eq!(votes, 9);

    let solution = controller.page().solution(1).unwrap();
    let top = &solution.answers()[0];
    assert_eq!((top.id, top.votes, top.can_vote), (10, 9, false));
    assert!(solution.answers().windows(2).all(|w| w[0].votes >= w[1].votes));
}

#[tokio::test]
async fn test_rejected_vote_is_not_rolled_back() {
    let server = MockServer::start().await;
    mock_page(&server).await;
    Mock::given(method("POST"))
        .and(path("/upvote/12"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut controller = loaded(&server, student()).await;
    let err = controller.vote(1, 12, Vote::Upvote).await.unwrap_err();
    assert!(err.is_transport());

    let answer = controller
        .page()
        .solution(1)
        .and_then(|s| s.answer(12))
        .unwrap();
    assert_eq!(answer.votes, 4);
    assert!(!answer.can_vote);
}

#[tokio::test]
async fn test_short_answer_is_rejected_locally() {
    let server = MockServer::start().await;
    mock_page(&server).await;
    Mock::given(method("POST"))
        .and(path("/submit/answer"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut controller = loaded(&server, student()).await;
    // Nine visible characters; the markup does not count.
    let err = controller
        .submit_answer(2, "<p>too short</p>")
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(controller.page().solution(2).unwrap().answers().is_empty());
}

#[tokio::test]
async fn test_submitted_answer_is_added_and_shown() {
    let server = MockServer::start().await;
    mock_page(&server).await;
    Mock::given(method("POST"))
        .and(path("/submit/answer"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(answer_json(20, 1, 0, 2, 0)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = loaded(&server, student()).await;
    let id = controller
        .submit_answer(2, "<p>integrate by parts</p>")
        .await
        .unwrap();
    assert_eq!(id, 20);

    let solution = controller.page().solution(2).unwrap();
    assert_eq!(solution.answers().len(), 1);
    assert!(!solution.can_submit_new_answer(1));
}

#[tokio::test]
async fn test_second_answer_from_same_user_is_refused() {
    let server = MockServer::start().await;
    mock_page(&server).await;

    // Viewer 1 already wrote answer 11 on question 1.
    let mut controller = loaded(&server, student()).await;
    let err = controller
        .submit_answer(1, "<p>another attempt at this</p>")
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_edit_own_answer() {
    let server = MockServer::start().await;
    mock_page(&server).await;
    Mock::given(method("POST"))
        .and(path("/update/answer"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "html": "<p>edited on server</p>" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = loaded(&server, student()).await;
    assert!(matches!(controller.begin_edit(10), Err(AppError::Auth(_))));

    controller.begin_edit(11).unwrap();
    controller.submit_edit("<p>edited locally</p>").await.unwrap();

    let page = controller.page();
    assert_eq!(page.editing(), None);
    assert_eq!(
        page.find_answer(11).map(|(_, a)| a.html.as_str()),
        Some("<p>edited on server</p>")
    );
}

#[tokio::test]
async fn test_delete_own_answer() {
    let server = MockServer::start().await;
    mock_page(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/delete/11/answer"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = loaded(&server, student()).await;
    assert!(controller.delete_answer(12).await.is_err());

    controller.delete_answer(11).await.unwrap();
    assert!(controller.page().find_answer(11).is_none());
    assert!(controller.page().solution(1).unwrap().can_submit_new_answer(1));
}

#[tokio::test]
async fn test_only_lecturers_delete_papers() {
    let server = MockServer::start().await;
    mock_page(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/delete/42/paper"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let mut as_student = loaded(&server, student()).await;
    assert!(as_student.delete_paper().await.unwrap_err().is_auth());

    let mut as_lecturer = loaded(&server, lecturer()).await;
    as_lecturer.delete_paper().await.unwrap();
}

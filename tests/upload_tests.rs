//! Two-step paper upload: create the paper, then attach its questions.

mod common;

use biblio::types::AppError;
use biblio::views::UploadForm;
use common::signed_client;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn form(year: i32) -> UploadForm {
    let mut form = UploadForm {
        course_code: "CS101".into(),
        year: Some(year),
        title: "Final".into(),
        questions: "1A, 1b,2".into(),
        pdf: None,
    };
    form.attach_pdf(b"%PDF-1.4");
    form
}

#[tokio::test]
async fn test_upload_creates_paper_then_questions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/submit/paper"))
        .and(body_json(json!({
            "course": "CS101",
            "year": 2015,
            "title": "Final",
            "pdf": "JVBERi0xLjQ="
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 77, "course": "CS101" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/submit/77/questions"))
        .and(body_json(json!([{ "number": "1a" }, { "number": "1b" }, { "number": "2" }])))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let upload = form(2015).validate().unwrap();
    let paper_id = upload.submit(&signed_client(&server)).await.unwrap();

    assert_eq!(paper_id, 77);
    assert_eq!(upload.route().path(), "/CS101/2015");
}

#[tokio::test]
async fn test_out_of_range_year_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = form(1999).validate().unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_question_failure_leaves_paper_created() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/submit/paper"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 78 })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/submit/78/questions"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let upload = form(2016).validate().unwrap();
    let err = upload.submit(&signed_client(&server)).await.unwrap_err();

    assert!(matches!(err, AppError::PartialUpload { paper_id: 78, .. }));
}

#[tokio::test]
async fn test_paper_failure_skips_questions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/submit/paper"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/submit/1/questions"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = form(2016)
        .validate()
        .unwrap()
        .submit(&signed_client(&server))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
}

// tests/api_tests.rs

use quiz_grader::{config::Config, routes, state::AppState};
use reqwest::multipart::{Form, Part};

const QUIZ_CSV: &str = "student_name,question,student_answer\n\
                        Alice,Q1,I think it's Paris\n\
                        Alice,Q2,The blue whale\n\
                        Bob,Q1,London\n\
                        Bob,Q2,A big mammal\n\
                        Cara,Q1,\n\
                        Cara,Q3,No criteria for this one\n";

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app() -> String {
    let config = Config {
        rust_log: "error".to_string(),
        static_dir: "static".to_string(),
        ..Config::default()
    };

    let state = AppState::from_config(config).expect("Failed to build state");
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

fn upload_form(filename: &str, content: &str) -> Form {
    Form::new().part(
        "file",
        Part::bytes(content.as_bytes().to_vec()).file_name(filename.to_string()),
    )
}

#[tokio::test]
async fn unknown_path_is_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn serves_upload_page() {
    let address = spawn_app().await;

    let response = reqwest::get(&format!("{}/", address))
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("/api/quiz/upload"));
}

#[tokio::test]
async fn upload_grades_csv() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .post(&format!("{}/api/quiz/upload", address))
        .multipart(upload_form("quiz.csv", QUIZ_CSV))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let report: serde_json::Value = response.json().await.unwrap();

    assert_eq!(
        report["question_performance"]["Q1"],
        serde_json::json!({ "correct": 1, "total": 3, "percentage": (1.0_f64 / 3.0) * 100.0 })
    );
    assert_eq!(
        report["question_performance"]["Q2"],
        serde_json::json!({ "correct": 2, "total": 2, "percentage": 100.0 })
    );
    assert_eq!(report["question_performance"]["Q3"]["correct"], 0);
    assert_eq!(report["average_scores"]["Alice"], 1.0);
    assert_eq!(report["average_scores"]["Bob"], 0.5);
    assert_eq!(report["average_scores"]["Cara"], 0.0);
    assert!(report.get("results").is_none());
}

#[tokio::test]
async fn upload_with_details_lists_every_record() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let report: serde_json::Value = client
        .post(&format!("{}/api/quiz/upload?details=true", address))
        .multipart(upload_form("quiz.csv", QUIZ_CSV))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();

    let results = report["results"].as_array().expect("results missing");
    assert_eq!(results.len(), 6);
    assert_eq!(results[2]["student_name"], "Bob");
    assert_eq!(results[2]["question"], "Q1");
    assert_eq!(results[2]["correct"], false);
}

#[tokio::test]
async fn header_only_file_gives_empty_report() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/quiz/upload", address))
        .multipart(upload_form(
            "empty.csv",
            "student_name,question,student_answer\n",
        ))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let report: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        report,
        serde_json::json!({ "question_performance": {}, "average_scores": {} })
    );
}

#[tokio::test]
async fn missing_column_is_rejected() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/quiz/upload", address))
        .multipart(upload_form(
            "quiz.csv",
            "student_name,question\nAlice,Q1\n",
        ))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("student_answer"));
    assert!(body.get("question_performance").is_none());
}

#[tokio::test]
async fn unsupported_extension_is_rejected() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/quiz/upload", address))
        .multipart(upload_form("quiz.txt", QUIZ_CSV))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Invalid file format"));
}

#[tokio::test]
async fn non_multipart_body_is_rejected() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/quiz/upload", address))
        .json(&serde_json::json!({ "file": "quiz.csv" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid content type");
}

#[tokio::test]
async fn form_without_file_is_rejected() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/quiz/upload", address))
        .multipart(Form::new().text("note", "no file here"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Missing file upload");
}

#[tokio::test]
async fn criteria_endpoint_lists_builtin_questions() {
    let address = spawn_app().await;

    let criteria: serde_json::Value = reqwest::get(&format!("{}/api/quiz/criteria", address))
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();

    assert_eq!(criteria["Q1"]["ideal_answer"], "The capital of France is Paris.");
    assert_eq!(criteria["Q2"]["keywords"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn health_reports_local_strategy() {
    let address = spawn_app().await;

    let body: serde_json::Value = reqwest::get(&format!("{}/api/health", address))
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();

    assert_eq!(body, serde_json::json!({ "status": "ok", "strategy": "local" }));
}

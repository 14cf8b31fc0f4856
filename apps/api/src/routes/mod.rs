pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::criteria::handlers::handle_extract_criteria;
use crate::scoring::handlers::handle_score_resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/extract-criteria", post(handle_extract_criteria))
        .route("/score-resumes", post(handle_score_resumes))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::scoring::handlers::FAILED_DOCUMENTS_HEADER;
    use crate::testing::{PlainTextExtractor, Script, ScriptedOracle};

    const BOUNDARY: &str = "ranker-test-boundary";

    const CRITERIA_REPLY: &str =
        r#"{"MustHave":{"a":true},"GoodToHave":{"b":"2 years"},"NiceToHave":{"c":1}}"#;
    const ABC_8_4_2: &str =
        r#"{"scores":{"MustHave":{"a":8},"GoodToHave":{"b":4},"NiceToHave":{"c":2}},"total_score":14}"#;

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a str),
    }

    fn multipart(parts: &[Part]) -> Body {
        let mut body = String::new();
        for part in parts {
            body.push_str(&format!("--{BOUNDARY}\r\n"));
            match part {
                Part::Text(name, value) => {
                    body.push_str(&format!(
                        "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                    ));
                }
                Part::File(name, filename, contents) => {
                    body.push_str(&format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n{contents}\r\n"
                    ));
                }
            }
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        Body::from(body)
    }

    fn app(oracle: Arc<ScriptedOracle>) -> Router {
        let config = Config::from_lookup(|key| match key {
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            _ => None,
        })
        .unwrap();
        build_router(AppState {
            config,
            oracle,
            extractor: Arc::new(PlainTextExtractor),
        })
    }

    async fn send_form(router: Router, uri: &str, parts: &[Part<'_>]) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(multipart(parts))
            .unwrap();
        router.oneshot(request).await.unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn error_code(response: Response) -> String {
        let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
        json["error"]["code"].as_str().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let oracle = Arc::new(ScriptedOracle::new());
        let response = app(oracle)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_extract_criteria_returns_envelope() {
        let oracle = Arc::new(ScriptedOracle::new().otherwise(Script::reply(CRITERIA_REPLY)));
        let response = send_form(
            app(oracle),
            "/extract-criteria",
            &[Part::File("file", "jd.pdf", "We need a Rust engineer.")],
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let json: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["criteria"]["MustHave"]["a"], Value::Bool(true));
        assert_eq!(json["criteria"]["GoodToHave"]["b"], "2 years");
    }

    #[tokio::test]
    async fn test_extract_criteria_requires_file() {
        let oracle = Arc::new(ScriptedOracle::new());
        let response = send_form(app(oracle), "/extract-criteria", &[Part::Text("note", "hi")]).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_extract_criteria_rejects_unsupported_format() {
        let oracle = Arc::new(ScriptedOracle::new().otherwise(Script::reply(CRITERIA_REPLY)));
        let response = send_form(
            app(oracle.clone()),
            "/extract-criteria",
            &[Part::File("file", "jd.txt", "We need a Rust engineer.")],
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "UNSUPPORTED_FORMAT");
        assert_eq!(oracle.calls(), 0);
    }

    #[tokio::test]
    async fn test_extract_criteria_model_failure_is_bad_gateway() {
        let oracle = Arc::new(ScriptedOracle::new());
        let response = send_form(
            app(oracle),
            "/extract-criteria",
            &[Part::File("file", "jd.docx", "We need a Rust engineer.")],
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(error_code(response).await, "MODEL_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_score_resumes_returns_csv() {
        let oracle = Arc::new(ScriptedOracle::new().otherwise(Script::reply(ABC_8_4_2)));
        let criteria = format!(r#"{{"criteria":{CRITERIA_REPLY}}}"#);
        let response = send_form(
            app(oracle),
            "/score-resumes",
            &[
                Part::Text("criteria", &criteria),
                Part::File("files", "alice.pdf", "Rust for 5 years"),
                Part::File("files", "bob.docx", "Go for 2 years"),
            ],
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/csv"));
        assert_eq!(response.headers()[FAILED_DOCUMENTS_HEADER], "0");

        let body = body_text(response).await;
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Candidate Name,Must have: a,Good to have: b,Nice to have: c,Total Score",
                "alice,8,4,2,14",
                "bob,8,4,2,14",
            ]
        );
    }

    #[tokio::test]
    async fn test_score_resumes_reports_partial_failures() {
        let oracle = Arc::new(ScriptedOracle::new().with("alice", Script::reply(ABC_8_4_2)));
        let response = send_form(
            app(oracle),
            "/score-resumes",
            &[
                Part::Text("criteria", CRITERIA_REPLY),
                Part::File("files", "alice.pdf", "Rust"),
                Part::File("files", "bob.pdf", "Java"),
            ],
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[FAILED_DOCUMENTS_HEADER], "1");
        let body = body_text(response).await;
        assert_eq!(body.lines().nth(2), Some("bob,,,,MODEL_UNAVAILABLE"));
    }

    #[tokio::test]
    async fn test_score_resumes_rejects_malformed_criteria() {
        let oracle = Arc::new(ScriptedOracle::new().otherwise(Script::reply(ABC_8_4_2)));
        let response = send_form(
            app(oracle.clone()),
            "/score-resumes",
            &[
                Part::Text("criteria", "{\"MustHave\": [1, 2]}"),
                Part::File("files", "alice.pdf", "Rust"),
            ],
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "MALFORMED_CRITERIA");
        assert_eq!(oracle.calls(), 0);
    }

    #[tokio::test]
    async fn test_score_resumes_requires_criteria_field() {
        let oracle = Arc::new(ScriptedOracle::new());
        let response = send_form(
            app(oracle),
            "/score-resumes",
            &[Part::File("files", "alice.pdf", "Rust")],
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "MALFORMED_CRITERIA");
    }

    #[tokio::test]
    async fn test_score_resumes_without_files_is_empty_batch() {
        let oracle = Arc::new(ScriptedOracle::new().otherwise(Script::reply(ABC_8_4_2)));
        let response = send_form(
            app(oracle.clone()),
            "/score-resumes",
            &[Part::Text("criteria", CRITERIA_REPLY)],
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "EMPTY_BATCH");
        assert_eq!(oracle.calls(), 0);
    }

    #[tokio::test]
    async fn test_score_resumes_all_unsupported_is_bad_request() {
        let oracle = Arc::new(ScriptedOracle::new().otherwise(Script::reply(ABC_8_4_2)));
        let response = send_form(
            app(oracle.clone()),
            "/score-resumes",
            &[
                Part::Text("criteria", CRITERIA_REPLY),
                Part::File("files", "alice.txt", "Rust"),
                Part::File("files", "bob.txt", "Java"),
            ],
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "UNSUPPORTED_FORMAT");
        assert_eq!(oracle.calls(), 0);
    }

    #[tokio::test]
    async fn test_score_resumes_all_unreadable_is_bad_request() {
        let oracle = Arc::new(ScriptedOracle::new().otherwise(Script::reply(ABC_8_4_2)));
        let response = send_form(
            app(oracle.clone()),
            "/score-resumes",
            &[
                Part::Text("criteria", CRITERIA_REPLY),
                Part::File("files", "blank.pdf", "   "),
                Part::File("files", "notes.txt", "Java"),
            ],
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "EXTRACTION_FAILED");
        assert_eq!(oracle.calls(), 0);
    }

    #[tokio::test]
    async fn test_score_resumes_all_failed_is_bad_gateway() {
        let oracle = Arc::new(ScriptedOracle::new());
        let response = send_form(
            app(oracle),
            "/score-resumes",
            &[
                Part::Text("criteria", CRITERIA_REPLY),
                Part::File("files", "alice.pdf", "Rust"),
                Part::File("files", "bob.txt", "Java"),
            ],
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(error_code(response).await, "ALL_DOCUMENTS_FAILED");
    }
}

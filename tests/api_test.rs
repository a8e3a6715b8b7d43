use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use aura::analyzer::Backend;
use aura::analyzer::mock::MockBackend;
use aura::config::{Config, Provider};
use aura::server::{AppState, app};

fn config(api_key: Option<&str>) -> Config {
    Config {
        provider: Provider::OpenAi,
        api_key: api_key.map(str::to_string),
    }
}

/// Router wired to a mock backend, plus a handle to inspect the mock after
/// requests have run.
fn app_with_mock(mock: MockBackend) -> (Router, Arc<MockBackend>) {
    let mock = Arc::new(mock);
    let backend: Arc<dyn Backend> = mock.clone();
    let router = app(AppState::new(config(Some("sk-test")), Some(backend)));
    (router, mock)
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_text(router: Router, text: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/process_text")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "text": text }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn root_reports_running() {
    let (router, _) = app_with_mock(MockBackend::replying("{}"));
    let (status, body) = get(router, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Sentiment Aura API");
    assert_eq!(body["status"], "running");
    assert_eq!(body["api"], "openai");
}

#[tokio::test]
async fn health_reports_configured_when_key_is_set() {
    let (router, _) = app_with_mock(MockBackend::replying("{}"));
    let (status, body) = get(router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["api_configured"], json!(true));
    assert_eq!(body["using_api"], "openai");
}

#[tokio::test]
async fn health_reports_unconfigured_without_key() {
    let router = app(AppState::new(config(None), None));
    let (status, body) = get(router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["api_configured"], json!(false));
}

#[tokio::test]
async fn short_text_is_rejected_before_the_backend_is_called() {
    let (router, mock) = app_with_mock(MockBackend::replying("{}"));
    let (status, body) = post_text(router, "a").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("2 characters"));
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn empty_text_is_rejected() {
    let (router, mock) = app_with_mock(MockBackend::replying("{}"));
    let (status, _) = post_text(router, "").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn whitespace_only_text_is_rejected() {
    let (router, mock) = app_with_mock(MockBackend::replying("{}"));
    let (status, _) = post_text(router, "   \n  ").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn short_text_beats_missing_configuration() {
    // 400 for bad input even when no backend is configured
    let router = app(AppState::new(config(None), None));
    let (status, _) = post_text(router, "a").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn full_reply_is_returned_unchanged() {
    let reply =
        r#"{"sentiment":0.9,"emotion":"joy","keywords":["love"],"intensity":0.7,"valence":0.8}"#;
    let (router, _) = app_with_mock(MockBackend::replying(reply));
    let (status, body) = post_text(router, "I love this!").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::from_str::<Value>(reply).unwrap());
}

#[tokio::test]
async fn missing_fields_are_defaulted() {
    let (router, _) = app_with_mock(MockBackend::replying(
        r#"{"sentiment":-0.6,"emotion":"sadness"}"#,
    ));
    let (status, body) = post_text(router, "what a gloomy day").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sentiment"], json!(-0.6));
    assert_eq!(body["emotion"], "sadness");
    assert_eq!(body["keywords"], json!([]));
    assert_eq!(body["intensity"], json!(0.0));
    assert_eq!(body["valence"], json!(0.0));
}

#[tokio::test]
async fn fenced_reply_is_unwrapped() {
    let reply = "```json\n{\"sentiment\":0.3,\"emotion\":\"neutral\",\"keywords\":[\"day\"],\"intensity\":0.1,\"valence\":0.2}\n```";
    let (router, _) = app_with_mock(MockBackend::replying(reply));
    let (status, body) = post_text(router, "an ordinary day").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sentiment"], json!(0.3));
    assert_eq!(body["emotion"], "neutral");
}

#[tokio::test]
async fn fence_without_language_tag_is_unwrapped() {
    let reply = "```\n{\"sentiment\":0.3}\n```";
    let (router, _) = app_with_mock(MockBackend::replying(reply));
    let (status, body) = post_text(router, "an ordinary day").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sentiment"], json!(0.3));
}

#[tokio::test]
async fn unparseable_reply_is_a_500_with_parse_detail() {
    let (router, _) = app_with_mock(MockBackend::replying("the mood is upbeat"));
    let (status, body) = post_text(router, "hello world").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("not valid JSON"));
}

#[tokio::test]
async fn backend_failure_is_a_500_with_upstream_detail() {
    let (router, _) = app_with_mock(MockBackend::failing("429 Too Many Requests"));
    let (status, body) = post_text(router, "hello world").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .contains("429 Too Many Requests")
    );
}

#[tokio::test]
async fn missing_credential_is_a_500_naming_the_env_var() {
    let router = app(AppState::new(config(None), None));
    let (status, body) = post_text(router, "hello world").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["detail"],
        "API not configured. Set OPENAI_API_KEY in the environment"
    );
}

#[tokio::test]
async fn failure_does_not_poison_later_requests() {
    let (router, _) = app_with_mock(MockBackend::replying("not json"));

    let (status, _) = post_text(router.clone(), "first one fails").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, body) = get(router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

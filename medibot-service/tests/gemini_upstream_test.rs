//! End-to-end tests through the real Gemini client against a local stand-in API.

mod common;

use axum::http::StatusCode;
use common::{gemini_response, test_config, StubReply, StubUpstream, TestApp};
use medibot_service::models::FALLBACK_REPLY;
use serde_json::{json, Value};
use std::time::{Duration, Instant};

async fn spawn_against(upstream: &StubUpstream, timeout_ms: &str) -> TestApp {
    let config = test_config(&[
        ("GEMINI_API_KEY", "test-key"),
        ("GEMINI_API_BASE", upstream.base_url.as_str()),
        ("UPSTREAM_TIMEOUT_MS", timeout_ms),
    ]);
    TestApp::spawn(config, None).await
}

#[tokio::test]
async fn relays_classified_reply_from_gemini() {
    let upstream = StubUpstream::spawn(StubReply::Json(gemini_response(
        "```json\n{\"response\":\"That's elevated — please sit down and monitor it.\",\"conditionLevel\":\"risky\",\"note\":\"Seek care if it persists.\"}\n```",
    )))
    .await;
    let app = spawn_against(&upstream, "5000").await;

    let response = app
        .post_message("My heart rate is 130 bpm and I feel dizzy")
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "reply": "That's elevated — please sit down and monitor it.",
            "conditionLevel": "risky",
            "note": "Seek care if it persists."
        })
    );

    let requests = upstream.requests();
    assert_eq!(requests.len(), 1);
    let (path, payload) = &requests[0];
    assert_eq!(
        path,
        "/v1beta/models/gemini-1.5-pro-002:generateContent?key=test-key"
    );
    assert_eq!(payload["contents"].as_array().unwrap().len(), 1);
    assert_eq!(payload["contents"][0]["role"], "user");
    let prompt = payload["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.ends_with("User input: My heart rate is 130 bpm and I feel dizzy"));
}

#[tokio::test]
async fn missing_candidates_yield_fallback_reply() {
    let upstream = StubUpstream::spawn(StubReply::Json(json!({
        "promptFeedback": { "blockReason": "SAFETY" }
    })))
    .await;
    let app = spawn_against(&upstream, "5000").await;

    let response = app.post_message("hello").await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["reply"], FALLBACK_REPLY);
    assert_eq!(body["conditionLevel"], "");
}

#[tokio::test]
async fn free_text_candidate_is_relayed_raw() {
    let upstream =
        StubUpstream::spawn(StubReply::Json(gemini_response("Drink water and rest."))).await;
    let app = spawn_against(&upstream, "5000").await;

    let body: Value = app.post_message("tired").await.json().await.unwrap();

    assert_eq!(body["reply"], "Drink water and rest.");
    assert_eq!(body["conditionLevel"], "");
    assert_eq!(body["note"], "");
}

#[tokio::test]
async fn upstream_error_status_is_a_500() {
    let upstream = StubUpstream::spawn(StubReply::Status(
        StatusCode::BAD_REQUEST,
        "{\"error\":{\"message\":\"API key not valid\"}}".to_string(),
    ))
    .await;
    let app = spawn_against(&upstream, "5000").await;

    let response = app.post_message("hello").await;

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Something went wrong with Gemini API." }));
}

#[tokio::test]
async fn non_json_upstream_body_is_a_500() {
    let upstream = StubUpstream::spawn(StubReply::Raw("<html>gateway</html>".to_string())).await;
    let app = spawn_against(&upstream, "5000").await;

    let response = app.post_message("hello").await;

    assert_eq!(response.status().as_u16(), 500);
}

#[tokio::test]
async fn slow_upstream_is_cut_off_at_the_deadline() {
    let upstream = StubUpstream::spawn(StubReply::Delayed(
        Duration::from_secs(10),
        gemini_response("too late"),
    ))
    .await;
    let app = spawn_against(&upstream, "200").await;

    let start = Instant::now();
    let response = app.post_message("hello").await;

    assert_eq!(response.status().as_u16(), 500);
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn unreachable_upstream_is_a_500_and_service_survives() {
    // Bind then drop a listener to get a port nothing is listening on
    let port = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };
    let base = format!("http://127.0.0.1:{}/v1beta", port);
    let config = test_config(&[
        ("GEMINI_API_BASE", base.as_str()),
        ("UPSTREAM_TIMEOUT_MS", "2000"),
    ]);
    let app = TestApp::spawn(config, None).await;

    for _ in 0..2 {
        let response = app.post_message("hello").await;
        assert_eq!(response.status().as_u16(), 500);
    }

    let response = reqwest::get(format!("{}/", app.address)).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
}

#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use http_body_util::BodyExt;
use medibot_service::config::MedibotConfig;
use medibot_service::services::providers::mock::{MockBehavior, MockTextProvider};
use medibot_service::services::providers::TextProvider;
use medibot_service::startup::{build_router, AppState, Application};
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const FRONTEND_ORIGIN: &str = "https://rathoreprachi05.github.io";

/// Service configuration on an ephemeral port with the given overrides.
pub fn test_config(overrides: &[(&str, &str)]) -> MedibotConfig {
    let vars: HashMap<String, String> = overrides
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    MedibotConfig::from_lookup(CoreConfig { port: 0 }, |key| vars.get(key).cloned())
        .expect("Failed to build test config")
}

/// Router backed by a mock provider, for `oneshot` tests.
pub fn mock_router(behavior: MockBehavior, overrides: &[(&str, &str)]) -> (Router, Arc<MockTextProvider>) {
    let provider = Arc::new(MockTextProvider::new(behavior));
    let router = build_router(AppState::new(test_config(overrides), provider.clone()));
    (router, provider)
}

pub async fn body_string(response: Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_string(response).await).expect("Body is not JSON")
}

pub fn json_request(uri: &str, body: impl Into<Body>) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

/// A running relay reachable over real HTTP.
pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    pub async fn spawn(config: MedibotConfig, provider: Option<Arc<dyn TextProvider>>) -> Self {
        let app = match provider {
            Some(provider) => Application::build_with_provider(config, provider).await,
            None => Application::build(config).await,
        }
        .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to accept connections
        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client.get(format!("{}/", address)).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        TestApp { address, port }
    }

    pub async fn post_message(&self, message: &str) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/api/message", self.address))
            .json(&serde_json::json!({ "message": message }))
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .expect("Failed to send request")
    }
}

/// How the stand-in Gemini endpoint answers.
#[derive(Clone)]
pub enum StubReply {
    Json(Value),
    Status(StatusCode, String),
    Raw(String),
    Delayed(Duration, Value),
}

#[derive(Clone)]
struct StubState {
    reply: StubReply,
    requests: Arc<Mutex<Vec<(String, Value)>>>,
}

/// Local HTTP server standing in for the Gemini API.
pub struct StubUpstream {
    pub base_url: String,
    requests: Arc<Mutex<Vec<(String, Value)>>>,
}

impl StubUpstream {
    pub async fn spawn(reply: StubReply) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            reply,
            requests: requests.clone(),
        };

        let router = Router::new().fallback(stub_handler).with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub upstream");
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        StubUpstream {
            base_url: format!("http://127.0.0.1:{}/v1beta", port),
            requests,
        }
    }

    /// Received requests as (path and query, JSON body).
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }
}

async fn stub_handler(State(state): State<StubState>, uri: Uri, body: Bytes) -> Response {
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_default();
    state.requests.lock().unwrap().push((path, body));

    match state.reply {
        StubReply::Json(value) => axum::Json(value).into_response(),
        StubReply::Status(status, text) => (status, text).into_response(),
        StubReply::Raw(text) => (StatusCode::OK, text).into_response(),
        StubReply::Delayed(delay, value) => {
            tokio::time::sleep(delay).await;
            axum::Json(value).into_response()
        }
    }
}

/// A Gemini `generateContent` response whose first candidate says `text`.
pub fn gemini_response(text: &str) -> Value {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": {
            "promptTokenCount": 120,
            "candidatesTokenCount": 40,
            "totalTokenCount": 160
        }
    })
}

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value as JsonValue, json};

use itinera_ai::{LlmProvider, OpenAiClient, OpenAiConfig, ProviderError};
use itinera_api::app::services::AppServices;
use itinera_core::{JobId, JobStatus};
use itinera_infra::jobs::{InMemoryJobStore, JobStore};

/// Provider that answers with an itinerary of the requested length, parsed
/// from the prompt, or with a fixed failure.
struct ScriptedProvider {
    fail_with: Option<u16>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    fn ok() -> Self {
        Self { fail_with: None, calls: AtomicUsize::new(0) }
    }

    fn failing(status: u16) -> Self {
        Self { fail_with: Some(status), calls: AtomicUsize::new(0) }
    }
}

fn days_in_prompt(prompt: &str) -> u32 {
    prompt
        .split("-day trip")
        .next()
        .and_then(|head| head.rsplit(' ').next())
        .and_then(|n| n.parse().ok())
        .unwrap_or(1)
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete_json(&self, prompt: &str) -> Result<JsonValue, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.fail_with {
            return Err(ProviderError::Api { status, body: r#"{"error":"simulated"}"#.into() });
        }
        let days = (1..=days_in_prompt(prompt))
            .map(|d| json!({"day": d, "theme": "Sights", "activities": [
                {"time": "Morning", "description": "Museum", "location": "Centre"}
            ]}))
            .collect::<Vec<_>>();
        Ok(json!({ "itinerary": days }))
    }
}

struct TestServer {
    base_url: String,
    services: Arc<AppServices>,
    store: Arc<InMemoryJobStore>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(provider: Arc<dyn LlmProvider>) -> Self {
        let store = Arc::new(InMemoryJobStore::new());
        let services = Arc::new(AppServices::new(store.clone(), provider));

        // Same router as prod, bound to an ephemeral port.
        let app = itinera_api::app::build_app(services.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, services, store, handle }
    }

    async fn settle(&self) {
        self.services.tasks.drain().await;
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn submit(client: &reqwest::Client, base_url: &str, body: JsonValue) -> reqwest::Response {
    client
        .post(format!("{}/itineraries", base_url))
        .json(&body)
        .send()
        .await
        .unwrap()
}

async fn accepted_job_id(res: reqwest::Response) -> JobId {
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let body: JsonValue = res.json().await.unwrap();
    body["jobId"].as_str().unwrap().parse().expect("jobId is a uuid")
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn(Arc::new(ScriptedProvider::ok())).await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn paris_request_completes_with_three_days() {
    let srv = TestServer::spawn(Arc::new(ScriptedProvider::ok())).await;
    let client = reqwest::Client::new();

    let res = submit(&client, &srv.base_url, json!({"destination": "Paris", "durationDays": 3})).await;
    let job_id = accepted_job_id(res).await;

    srv.settle().await;

    let rec = srv.store.get(job_id).await.unwrap().expect("record exists");
    assert_eq!(rec.status, JobStatus::Completed);
    assert_eq!(rec.destination, "Paris");
    assert_eq!(rec.duration_days, 3);
    assert_eq!(rec.itinerary.as_ref().unwrap().as_array().unwrap().len(), 3);
    assert!(rec.error.is_none());
    assert!(rec.completed_at.unwrap() >= rec.created_at);
}

#[tokio::test]
async fn root_path_accepts_requests_too() {
    let srv = TestServer::spawn(Arc::new(ScriptedProvider::ok())).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/", srv.base_url))
        .json(&json!({"destination": "Rome", "durationDays": 1}))
        .send()
        .await
        .unwrap();
    accepted_job_id(res).await;
}

#[tokio::test]
async fn provider_failure_leaves_failed_record() {
    let srv = TestServer::spawn(Arc::new(ScriptedProvider::failing(500))).await;
    let client = reqwest::Client::new();

    let res = submit(&client, &srv.base_url, json!({"destination": "Berlin", "durationDays": 2})).await;
    let job_id = accepted_job_id(res).await;

    srv.settle().await;

    let rec = srv.store.get(job_id).await.unwrap().unwrap();
    assert_eq!(rec.status, JobStatus::Failed);
    assert!(rec.error.as_deref().unwrap().contains("500"));
    assert!(rec.itinerary.is_none());
    assert!(rec.completed_at.is_some());
}

#[tokio::test]
async fn identical_requests_get_distinct_jobs() {
    let srv = TestServer::spawn(Arc::new(ScriptedProvider::ok())).await;
    let client = reqwest::Client::new();
    let body = json!({"destination": "Tokyo", "durationDays": 4});

    let a = accepted_job_id(submit(&client, &srv.base_url, body.clone()).await).await;
    let b = accepted_job_id(submit(&client, &srv.base_url, body).await).await;
    assert_ne!(a, b);

    srv.settle().await;
    assert_eq!(srv.store.len(), 2);
}

#[tokio::test]
async fn invalid_input_is_rejected_without_a_record() {
    let provider = Arc::new(ScriptedProvider::ok());
    let srv = TestServer::spawn(provider.clone()).await;
    let client = reqwest::Client::new();

    let bodies = [
        json!({"durationDays": 3}),
        json!({"destination": 7, "durationDays": 3}),
        json!({"destination": "", "durationDays": 3}),
        json!({"destination": "Paris"}),
        json!({"destination": "Paris", "durationDays": "3"}),
        json!({"destination": "Paris", "durationDays": 0}),
        json!({"destination": "Paris", "durationDays": -1}),
    ];

    for body in bodies {
        let res = submit(&client, &srv.base_url, body.clone()).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let err: JsonValue = res.json().await.unwrap();
        assert!(err["error"].as_str().unwrap().starts_with("Invalid input"));
    }

    srv.settle().await;
    assert!(srv.store.is_empty());
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_body_is_rejected_without_a_record() {
    let srv = TestServer::spawn(Arc::new(ScriptedProvider::ok())).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/itineraries", srv.base_url))
        .header("content-type", "application/json")
        .body("{destination: Paris")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: JsonValue = res.json().await.unwrap();
    assert!(err["error"].as_str().unwrap().starts_with("Failed to parse request body"));

    srv.settle().await;
    assert!(srv.store.is_empty());
}

#[tokio::test]
async fn other_methods_are_not_allowed() {
    let srv = TestServer::spawn(Arc::new(ScriptedProvider::ok())).await;
    let client = reqwest::Client::new();
    let url = format!("{}/itineraries", srv.base_url);

    for method in [reqwest::Method::GET, reqwest::Method::PUT, reqwest::Method::DELETE, reqwest::Method::PATCH] {
        let res = client
            .request(method.clone(), &url)
            .json(&json!({"destination": "Paris", "durationDays": 3}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED, "method: {method}");
        let err: JsonValue = res.json().await.unwrap();
        assert_eq!(err, json!({"error": "Method Not Allowed"}));
    }

    srv.settle().await;
    assert!(srv.store.is_empty());
}

/// Real client against a local stand-in for the chat-completion endpoint.
#[tokio::test]
async fn openai_client_error_status_is_recorded() {
    use axum::{Json, Router, http::StatusCode as AxumStatus, routing::post};

    let fake = Router::new().route(
        "/v1/chat/completions",
        post(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, Json(json!({"error": {"message": "down"}}))) }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let fake_url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, fake).await.unwrap();
    });

    let client = OpenAiClient::new(OpenAiConfig::new("sk-test").with_base_url(fake_url)).unwrap();
    let srv = TestServer::spawn(Arc::new(client)).await;

    let res = submit(&reqwest::Client::new(), &srv.base_url, json!({"destination": "Lima", "durationDays": 2})).await;
    let job_id = accepted_job_id(res).await;

    srv.settle().await;

    let rec = srv.store.get(job_id).await.unwrap().unwrap();
    assert_eq!(rec.status, JobStatus::Failed);
    let error = rec.error.unwrap();
    assert!(error.contains("500"), "error: {error}");
    assert!(error.contains("down"), "error: {error}");
}

//! Shared helpers for the API, client and persistence tests.
//!
//! Builds stores with known contents and sends requests through the router
//! without opening a socket.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use assignment_tracker::api::{app_router, ApiState};
use assignment_tracker::store::{Assignment, AssignmentStore};

/// Assignment with id `id`, named `HW<id>`, due on a fixed date.
pub fn sample_assignment(id: u64) -> Assignment {
    Assignment {
        id,
        name: Some(format!("HW{}", id)),
        due_date: Some("2024-05-01".to_string()),
        submitted: Some(false),
    }
}

/// Store holding assignments with ids `1..=n` in order.
pub fn seeded_store(n: u64) -> AssignmentStore {
    AssignmentStore::from_records((1..=n).map(sample_assignment).collect())
}

/// App router over a store holding `n` assignments, plus its state.
pub fn test_app(n: u64) -> (Router, ApiState) {
    let state = ApiState::new(seeded_store(n));
    (app_router(state.clone()), state)
}

/// Response status, content type and body collected from the router.
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: String,
    pub location: Option<String>,
    pub body: Vec<u8>,
}

#[allow(dead_code)]
impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }
}

async fn dispatch(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.into_body().collect().await.unwrap().to_bytes();

    TestResponse {
        status,
        content_type,
        location,
        body: body.to_vec(),
    }
}

/// Send a request with an optional JSON body.
pub async fn send(app: &Router, method: Method, uri: &str, json: Option<Value>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match json {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    dispatch(app, request).await
}

/// Send a urlencoded form, as a browser would.
#[allow(dead_code)]
pub async fn send_form(app: &Router, uri: &str, form: &str) -> TestResponse {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    dispatch(app, request).await
}

/// Send a request with a raw body and content type.
#[allow(dead_code)]
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    content_type: &str,
    body: &str,
) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .unwrap();
    dispatch(app, request).await
}

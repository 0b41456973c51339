use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tower::ServiceExt;

use crate::config::ClientConfig;
use crate::error::{Result, TrackerError};
use crate::store::{Assignment, AssignmentInput};

/// Operations the client needs from the assignments API.
#[async_trait]
pub trait AssignmentApi: Send + Sync {
    async fn count(&self) -> Result<u64>;
    async fn list(&self, page: u32, limit: u32) -> Result<Vec<Assignment>>;
    async fn get(&self, id: u64) -> Result<Assignment>;
    async fn create(&self, input: &AssignmentInput) -> Result<Assignment>;
    async fn update(&self, id: u64, input: &AssignmentInput) -> Result<Assignment>;
    async fn delete(&self, id: u64) -> Result<()>;
}

#[derive(Deserialize)]
struct CountBody {
    count: u64,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Turn a non-success response into an error. A 404 about a known id becomes
/// `NotFound`; otherwise the `{error}` field or the raw text is kept.
fn error_from_response(status: u16, body: &[u8], id: Option<u64>) -> TrackerError {
    if let (404, Some(id)) = (status, id) {
        return TrackerError::NotFound(id);
    }
    let message = serde_json::from_slice::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| String::from_utf8_lossy(body).into_owned());
    TrackerError::Api { status, message }
}

fn decode<T: DeserializeOwned>(status: u16, body: &[u8], id: Option<u64>) -> Result<T> {
    if !(200..300).contains(&status) {
        return Err(error_from_response(status, body, id));
    }
    Ok(serde_json::from_slice(body)?)
}

fn expect_success(status: u16, body: &[u8], id: Option<u64>) -> Result<()> {
    if !(200..300).contains(&status) {
        return Err(error_from_response(status, body, id));
    }
    Ok(())
}

/// Talks to a running server over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpApi {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}{}", self.config.assignments_url(), suffix)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<(u16, Vec<u8>)> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok((status, body.to_vec()))
    }
}

#[async_trait]
impl AssignmentApi for HttpApi {
    async fn count(&self) -> Result<u64> {
        let (status, body) = self.send(self.client.get(self.url("/count"))).await?;
        decode::<CountBody>(status, &body, None).map(|b| b.count)
    }

    async fn list(&self, page: u32, limit: u32) -> Result<Vec<Assignment>> {
        let request = self
            .client
            .get(self.url(""))
            .query(&[("page", page), ("limit", limit)]);
        let (status, body) = self.send(request).await?;
        decode(status, &body, None)
    }

    async fn get(&self, id: u64) -> Result<Assignment> {
        let (status, body) = self.send(self.client.get(self.url(&format!("/{}", id)))).await?;
        decode(status, &body, Some(id))
    }

    async fn create(&self, input: &AssignmentInput) -> Result<Assignment> {
        let (status, body) = self.send(self.client.post(self.url("")).json(input)).await?;
        decode(status, &body, None)
    }

    async fn update(&self, id: u64, input: &AssignmentInput) -> Result<Assignment> {
        let request = self.client.put(self.url(&format!("/{}", id))).json(input);
        let (status, body) = self.send(request).await?;
        decode(status, &body, Some(id))
    }

    async fn delete(&self, id: u64) -> Result<()> {
        let request = self.client.delete(self.url(&format!("/{}", id)));
        let (status, body) = self.send(request).await?;
        expect_success(status, &body, Some(id))
    }
}

/// Dispatches API calls through an axum [`Router`] in the same process.
#[derive(Clone)]
pub struct RouterApi {
    router: Router,
}

impl RouterApi {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    async fn send(
        &self,
        method: Method,
        uri: String,
        json: Option<&AssignmentInput>,
    ) -> Result<(u16, Vec<u8>)> {
        let builder = Request::builder().method(method).uri(uri);
        let request = match json {
            Some(input) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(input)?)),
            None => builder.body(Body::empty()),
        }
        .map_err(|e| TrackerError::Internal(format!("invalid request: {}", e)))?;

        let response = match self.router.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };
        let status = response.status().as_u16();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| TrackerError::Internal(format!("failed to read body: {}", e)))?;
        Ok((status, body.to_vec()))
    }
}

#[async_trait]
impl AssignmentApi for RouterApi {
    async fn count(&self) -> Result<u64> {
        let (status, body) = self
            .send(Method::GET, "/api/assignments/count".to_string(), None)
            .await?;
        decode::<CountBody>(status, &body, None).map(|b| b.count)
    }

    async fn list(&self, page: u32, limit: u32) -> Result<Vec<Assignment>> {
        let uri = format!("/api/assignments?page={}&limit={}", page, limit);
        let (status, body) = self.send(Method::GET, uri, None).await?;
        decode(status, &body, None)
    }

    async fn get(&self, id: u64) -> Result<Assignment> {
        let uri = format!("/api/assignments/{}", id);
        let (status, body) = self.send(Method::GET, uri, None).await?;
        decode(status, &body, Some(id))
    }

    async fn create(&self, input: &AssignmentInput) -> Result<Assignment> {
        let (status, body) = self
            .send(Method::POST, "/api/assignments".to_string(), Some(input))
            .await?;
        decode(status, &body, None)
    }

    async fn update(&self, id: u64, input: &AssignmentInput) -> Result<Assignment> {
        let uri = format!("/api/assignments/{}", id);
        let (status, body) = self.send(Method::PUT, uri, Some(input)).await?;
        decode(status, &body, Some(id))
    }

    async fn delete(&self, id: u64) -> Result<()> {
        let uri = format!("/api/assignments/{}", id);
        let (status, body) = self.send(Method::DELETE, uri, None).await?;
        expect_success(status, &body, Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_with_id_maps_to_not_found() {
        let err = error_from_response(404, b"Assignment not found", Some(9));
        assert!(matches!(err, TrackerError::NotFound(9)));
    }

    #[test]
    fn error_field_is_extracted() {
        let err = error_from_response(400, br#"{"error":"Missing required field: name"}"#, None);
        match err {
            TrackerError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Missing required field: name");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn plain_text_error_is_kept() {
        let err = error_from_response(500, b"Something went wrong!", None);
        assert_eq!(
            err.to_string(),
            "Server responded with 500: Something went wrong!"
        );
    }
}

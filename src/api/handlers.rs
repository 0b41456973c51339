use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ROUTE_NOT_FOUND_BODY};
use crate::api::ApiState;
use crate::error::TrackerError;
use crate::store::pagination::parse_int_prefix;
use crate::store::{Assignment, AssignmentInput, PageRequest};

/// Raw pagination parameters. Kept as text so non-numeric values reach the
/// pagination logic instead of being rejected.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    page: Option<String>,
    limit: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: usize,
}

/// Create and update body.
///
/// A request without a JSON content type, or with an empty body, reads as an
/// empty object so it reaches validation like any other incomplete input.
#[derive(Debug)]
pub struct InputBody(pub AssignmentInput);

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

#[async_trait]
impl<S: Send + Sync> FromRequest<S> for InputBody {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = has_json_content_type(req.headers());
        let bytes = Bytes::from_request(req, state).await?;
        if !is_json || bytes.is_empty() {
            return Ok(Self(AssignmentInput::default()));
        }
        let Json(input) = Json::<AssignmentInput>::from_bytes(&bytes)?;
        Ok(Self(input))
    }
}

/// Path ids that are not integers can never match a record.
fn parse_id(raw: &str) -> Result<u64, ApiError> {
    parse_int_prefix(raw)
        .and_then(|id| u64::try_from(id).ok())
        .ok_or(ApiError::Tracker(TrackerError::NotFound(0)))
}

pub async fn welcome() -> &'static str {
    "Welcome to the REST API"
}

pub async fn route_not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, ROUTE_NOT_FOUND_BODY)
}

pub async fn list_assignments(
    State(state): State<ApiState>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Assignment>> {
    let page = PageRequest::from_query(params.page.as_deref(), params.limit.as_deref());
    let store = state.store.read().await;
    Json(store.list(&page).to_vec())
}

pub async fn count_assignments(State(state): State<ApiState>) -> Json<CountResponse> {
    let store = state.store.read().await;
    Json(CountResponse {
        count: store.count(),
    })
}

pub async fn get_assignment(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Assignment>, ApiError> {
    let id = parse_id(&id)?;
    let store = state.store.read().await;
    Ok(Json(store.get(id)?.clone()))
}

pub async fn create_assignment(
    State(state): State<ApiState>,
    InputBody(input): InputBody,
) -> Result<(StatusCode, Json<Assignment>), ApiError> {
    tracing::debug!(body = ?input, "Create assignment request");

    let assignment = state.store.write().await.create(input)?;
    tracing::info!(id = assignment.id, "Assignment created");
    Ok((StatusCode::CREATED, Json(assignment)))
}

pub async fn update_assignment(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    InputBody(input): InputBody,
) -> Result<Json<Assignment>, ApiError> {
    let id = parse_id(&id)?;

    let assignment = state.store.write().await.update(id, input)?;
    tracing::info!(id, "Assignment updated");
    Ok(Json(assignment))
}

pub async fn delete_assignment(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.store.write().await.delete(id)?;
    tracing::info!(id, "Assignment deleted");
    Ok(StatusCode::NO_CONTENT)
}

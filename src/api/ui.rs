//! Browser pages for the assignment list.
//!
//! Each request builds a [`Controller`] over the in-process JSON API, replays
//! the page state carried in the query or form, and renders the result.

use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;

use crate::client::{Controller, FormFields, FormMode, RouterApi};
use crate::config::CLIENT_PAGE_LIMIT;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    page: Option<u32>,
    edit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    name: String,
    #[serde(default, rename = "dueDate")]
    due_date: String,
    /// Present only when the checkbox is ticked.
    #[serde(default)]
    submitted: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageForm {
    #[serde(default)]
    page: Option<u32>,
    /// Assignment being edited when the delete was clicked.
    #[serde(default)]
    edit: Option<u64>,
}

pub fn router(api: RouterApi) -> Router {
    Router::new()
        .route("/ui", get(show_page))
        .route("/ui/submit", post(submit_form))
        .route("/ui/assignments/:id/delete", post(delete_assignment))
        .with_state(api)
}

fn controller(api: RouterApi, page: Option<u32>) -> Controller<RouterApi> {
    Controller::new(api, CLIENT_PAGE_LIMIT).with_page(page.unwrap_or(1))
}

async fn show_page(State(api): State<RouterApi>, Query(query): Query<PageQuery>) -> Html<String> {
    let mut controller = controller(api, query.page);
    if let Err(e) = controller.refresh().await {
        tracing::warn!(error = %e, "Failed to load assignments");
    }
    if let Some(id) = query.edit {
        if let Err(e) = controller.begin_edit(id).await {
            tracing::warn!(id, error = %e, "Failed to load assignment for editing");
        }
    }
    Html(controller.render())
}

async fn submit_form(State(api): State<RouterApi>, Form(form): Form<SubmitForm>) -> Redirect {
    let page = form.page.unwrap_or(1).max(1);
    let mut controller = controller(api, Some(page));

    let state = controller.state_mut();
    if let Some(id) = form.id.as_deref().and_then(|id| id.trim().parse().ok()) {
        state.mode = FormMode::Editing(id);
    }
    state.form = FormFields {
        name: form.name,
        due_date: form.due_date,
        submitted: form.submitted.is_some(),
    };

    if let Err(e) = controller.submit().await {
        tracing::debug!(error = %e, "Form submission rejected");
    }
    Redirect::to(&format!("/ui?page={}", page))
}

async fn delete_assignment(
    State(api): State<RouterApi>,
    Path(id): Path<u64>,
    Form(form): Form<PageForm>,
) -> Html<String> {
    let mut controller = controller(api, form.page);
    if let Err(e) = controller.refresh().await {
        tracing::warn!(error = %e, "Failed to load assignments");
    }
    if let Err(e) = controller.delete(id).await {
        tracing::warn!(id, error = %e, "Failed to delete assignment");
    }
    // Deleting the row being edited ends the edit.
    if let Some(editing) = form.edit.filter(|&editing| editing != id) {
        if let Err(e) = controller.begin_edit(editing).await {
            tracing::warn!(id = editing, error = %e, "Failed to load assignment for editing");
        }
    }
    Html(controller.render())
}

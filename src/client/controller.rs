use crate::client::api::AssignmentApi;
use crate::client::render::render_page;
use crate::client::state::{PageNav, Submission, UiState};
use crate::error::Result;
use crate::store::Assignment;

/// Drives a [`UiState`] against an [`AssignmentApi`].
///
/// Every mutation is followed by the refresh cycle: fetch the total count, then
/// the current page.
pub struct Controller<A> {
    api: A,
    state: UiState,
}

impl<A: AssignmentApi> Controller<A> {
    pub fn new(api: A, limit: u32) -> Self {
        Self {
            api,
            state: UiState::new(limit),
        }
    }

    /// Start on `page` instead of the first page.
    pub fn with_page(mut self, page: u32) -> Self {
        self.state.current_page = page.max(1);
        self
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut UiState {
        &mut self.state
    }

    pub fn render(&self) -> String {
        render_page(&self.state)
    }

    /// Re-fetch the count and the current page.
    pub async fn refresh(&mut self) -> Result<()> {
        self.state.total_assignments = self.api.count().await?;
        self.load_page(self.state.current_page).await
    }

    async fn load_page(&mut self, page: u32) -> Result<()> {
        self.state.rows = self.api.list(page, self.state.limit).await?;
        self.state.current_page = page;
        Ok(())
    }

    /// Follow a pagination button. Returns false when the button is disabled.
    pub async fn navigate(&mut self, nav: PageNav) -> Result<bool> {
        match self.state.target_page(nav) {
            Some(page) => {
                self.load_page(page).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Fill the form from an assignment and switch to edit mode.
    ///
    /// Uses the row on the current page when present, otherwise fetches it.
    pub async fn begin_edit(&mut self, id: u64) -> Result<()> {
        let assignment = match self.state.rows.iter().find(|a| a.id == id) {
            Some(row) => row.clone(),
            None => self.api.get(id).await?,
        };
        tracing::debug!(id, "Editing assignment");
        self.state.begin_edit(&assignment);
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.state.cancel_edit();
    }

    /// Create or update from the form, depending on the mode.
    ///
    /// On success the form is reset and the page refreshed. Failures are
    /// logged and leave the state untouched.
    pub async fn submit(&mut self) -> Result<Assignment> {
        let result = match self.state.submission() {
            Submission::Create(input) => self.api.create(&input).await,
            Submission::Update(id, input) => self.api.update(id, &input).await,
        };

        match result {
            Ok(assignment) => {
                tracing::info!(id = assignment.id, "Assignment saved");
                self.state.reset_form();
                self.refresh().await?;
                Ok(assignment)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save assignment");
                Err(e)
            }
        }
    }

    /// Delete an assignment and report the outcome in the notice.
    pub async fn delete(&mut self, id: u64) -> Result<()> {
        match self.api.delete(id).await {
            Ok(()) => {
                tracing::info!(id, "Assignment deleted");
                self.refresh().await?;
                self.state.notice = Some(format!("Assignment {} deleted", id));
                Ok(())
            }
            Err(e) => {
                self.state.notice = Some(format!("Error deleting assignment: {}", e));
                Err(e)
            }
        }
    }
}

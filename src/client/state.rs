use crate::store::{Assignment, AssignmentInput};

/// Whether the form creates a new assignment or edits an existing one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Adding,
    Editing(u64),
}

/// Values currently in the assignment form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub due_date: String,
    pub submitted: bool,
}

impl FormFields {
    pub fn from_assignment(assignment: &Assignment) -> Self {
        Self {
            name: assignment.name.clone().unwrap_or_default(),
            due_date: assignment.due_date.clone().unwrap_or_default(),
            submitted: assignment.is_submitted(),
        }
    }

    pub fn to_input(&self) -> AssignmentInput {
        AssignmentInput {
            name: Some(self.name.clone()),
            due_date: Some(self.due_date.clone()),
            submitted: Some(self.submitted),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNav {
    First,
    Prev,
    Next,
    Last,
}

/// Which pagination buttons are disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationControls {
    pub first_disabled: bool,
    pub prev_disabled: bool,
    pub next_disabled: bool,
    pub last_disabled: bool,
}

/// The request a form submission turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(AssignmentInput),
    Update(u64, AssignmentInput),
}

/// Everything the assignment page shows, independent of how it is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub current_page: u32,
    pub limit: u32,
    pub total_assignments: u64,
    pub mode: FormMode,
    pub form: FormFields,
    pub rows: Vec<Assignment>,
    /// Message for the user after a delete, success or failure.
    pub notice: Option<String>,
}

impl UiState {
    pub fn new(limit: u32) -> Self {
        Self {
            current_page: 1,
            limit: limit.max(1),
            total_assignments: 0,
            mode: FormMode::Adding,
            form: FormFields::default(),
            rows: Vec::new(),
            notice: None,
        }
    }

    /// `ceil(total / limit)`; zero when there are no assignments.
    pub fn total_pages(&self) -> u32 {
        let pages = self.total_assignments.div_ceil(u64::from(self.limit));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn controls(&self) -> PaginationControls {
        let at_start = self.current_page <= 1;
        let at_end = self.current_page >= self.total_pages();
        PaginationControls {
            first_disabled: at_start,
            prev_disabled: at_start,
            next_disabled: at_end,
            last_disabled: at_end,
        }
    }

    /// Page a navigation button leads to, or `None` while it is disabled.
    pub fn target_page(&self, nav: PageNav) -> Option<u32> {
        let controls = self.controls();
        match nav {
            PageNav::First if !controls.first_disabled => Some(1),
            PageNav::Prev if !controls.prev_disabled => Some(self.current_page - 1),
            PageNav::Next if !controls.next_disabled => Some(self.current_page + 1),
            PageNav::Last if !controls.last_disabled => Some(self.total_pages()),
            _ => None,
        }
    }

    pub fn begin_edit(&mut self, assignment: &Assignment) {
        self.form = FormFields::from_assignment(assignment);
        self.mode = FormMode::Editing(assignment.id);
    }

    /// Leave edit mode without submitting.
    pub fn cancel_edit(&mut self) {
        self.reset_form();
    }

    pub fn reset_form(&mut self) {
        self.form = FormFields::default();
        self.mode = FormMode::Adding;
    }

    pub fn submission(&self) -> Submission {
        let input = self.form.to_input();
        match self.mode {
            FormMode::Adding => Submission::Create(input),
            FormMode::Editing(id) => Submission::Update(id, input),
        }
    }

    /// Id of the assignment being edited, if any.
    pub fn editing_id(&self) -> Option<u64> {
        match self.mode {
            FormMode::Editing(id) => Some(id),
            FormMode::Adding => None,
        }
    }

    pub fn form_title(&self) -> String {
        match self.mode {
            FormMode::Adding => "Add Assignment".to_string(),
            FormMode::Editing(id) => format!("Edit Assignment {}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(total: u64, page: u32) -> UiState {
        let mut state = UiState::new(5);
        state.total_assignments = total;
        state.current_page = page;
        state
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(state_with(0, 1).total_pages(), 0);
        assert_eq!(state_with(5, 1).total_pages(), 1);
        assert_eq!(state_with(6, 1).total_pages(), 2);
        assert_eq!(state_with(12, 1).total_pages(), 3);
    }

    #[test]
    fn controls_on_first_page() {
        let controls = state_with(12, 1).controls();
        assert!(controls.first_disabled);
        assert!(controls.prev_disabled);
        assert!(!controls.next_disabled);
        assert!(!controls.last_disabled);
    }

    #[test]
    fn controls_on_last_page() {
        let controls = state_with(12, 3).controls();
        assert!(!controls.first_disabled);
        assert!(!controls.prev_disabled);
        assert!(controls.next_disabled);
        assert!(controls.last_disabled);
    }

    #[test]
    fn controls_with_no_assignments_are_all_disabled() {
        let controls = state_with(0, 1).controls();
        assert!(controls.first_disabled && controls.prev_disabled);
        assert!(controls.next_disabled && controls.last_disabled);
    }

    #[test]
    fn target_page_follows_controls() {
        let state = state_with(12, 2);
        assert_eq!(state.target_page(PageNav::First), Some(1));
        assert_eq!(state.target_page(PageNav::Prev), Some(1));
        assert_eq!(state.target_page(PageNav::Next), Some(3));
        assert_eq!(state.target_page(PageNav::Last), Some(3));

        let state = state_with(12, 3);
        assert_eq!(state.target_page(PageNav::Next), None);
        assert_eq!(state.target_page(PageNav::Last), None);
    }

    #[test]
    fn edit_then_cancel_returns_to_adding() {
        let mut state = UiState::new(5);
        let assignment = Assignment {
            id: 4,
            name: Some("Lab".to_string()),
            due_date: Some("2024-03-01".to_string()),
            submitted: Some(true),
        };

        state.begin_edit(&assignment);
        assert_eq!(state.mode, FormMode::Editing(4));
        assert_eq!(state.form_title(), "Edit Assignment 4");
        assert!(state.form.submitted);
        assert!(matches!(state.submission(), Submission::Update(4, _)));

        state.cancel_edit();
        assert_eq!(state.mode, FormMode::Adding);
        assert_eq!(state.form, FormFields::default());
        assert_eq!(state.form_title(), "Add Assignment");
        assert!(matches!(state.submission(), Submission::Create(_)));
    }
}

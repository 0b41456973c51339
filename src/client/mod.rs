pub mod api;
pub mod controller;
pub mod render;
pub mod state;

pub use api::{AssignmentApi, HttpApi, RouterApi};
pub use controller::Controller;
pub use state::{FormFields, FormMode, PageNav, UiState};

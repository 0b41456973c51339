pub mod assignment;
pub mod assignments;
pub mod pagination;
pub mod persist;

pub use assignment::{Assignment, AssignmentInput};
pub use assignments::{AssignmentStore, IdStrategy, PersistMode};
pub use pagination::PageRequest;
pub use persist::{PersistHandle, Persister};

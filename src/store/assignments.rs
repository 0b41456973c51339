use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};
use crate::store::assignment::{Assignment, AssignmentInput};
use crate::store::pagination::PageRequest;
use crate::store::persist::PersistHandle;

/// How ids are chosen for newly created assignments.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum IdStrategy {
    /// Counter seeded from the highest loaded id. Ids are never reissued.
    #[default]
    Monotonic,
    /// One past the id of the last record in the sequence.
    LastRecord,
}

/// Which mutations rewrite the data file.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum PersistMode {
    /// Only creates are written; updates and deletes live in memory until restart.
    #[default]
    CreateOnly,
    /// Creates, updates and deletes are all written.
    AllMutations,
}

/// Ordered, in-memory sequence of assignments backed by a JSON file.
///
/// The sequence is loaded once at startup and is authoritative from then on.
/// Writes to the file go through a [`PersistHandle`]; without one the store is
/// purely in-memory.
#[derive(Debug, Default)]
pub struct AssignmentStore {
    records: Vec<Assignment>,
    next_id: u64,
    id_strategy: IdStrategy,
    persist_mode: PersistMode,
    persister: Option<PersistHandle>,
}

impl AssignmentStore {
    pub fn new() -> Self {
        Self::from_records(Vec::new())
    }

    pub fn from_records(records: Vec<Assignment>) -> Self {
        let next_id = records.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        Self {
            records,
            next_id,
            ..Default::default()
        }
    }

    pub fn with_id_strategy(mut self, id_strategy: IdStrategy) -> Self {
        self.id_strategy = id_strategy;
        self
    }

    pub fn with_persist_mode(mut self, persist_mode: PersistMode) -> Self {
        self.persist_mode = persist_mode;
        self
    }

    pub fn with_persister(mut self, persister: PersistHandle) -> Self {
        self.persister = Some(persister);
        self
    }

    /// Read the JSON array stored at `path`.
    ///
    /// A missing file is an empty store; the first persisted write creates it.
    pub async fn load(path: &Path) -> Result<Vec<Assignment>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Data file not found, starting empty");
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Records on the requested page, clipped to what exists.
    pub fn list(&self, page: &PageRequest) -> &[Assignment] {
        &self.records[page.range(self.records.len())]
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Assignment] {
        &self.records
    }

    pub fn get(&self, id: u64) -> Result<&Assignment> {
        self.records
            .iter()
            .find(|a| a.id == id)
            .ok_or(TrackerError::NotFound(id))
    }

    /// Validate, assign an id, append, and queue the full sequence for writing.
    pub fn create(&mut self, input: AssignmentInput) -> Result<Assignment> {
        input.validate_for_create()?;

        let id = self.allocate_id();
        let assignment = Assignment::from_input(id, input);
        self.records.push(assignment.clone());
        tracing::debug!(id, "Assignment created");

        self.persist();
        Ok(assignment)
    }

    /// Overwrite name, due date and submitted of the matching record.
    ///
    /// Fields missing from `input` become empty; nothing is merged.
    pub fn update(&mut self, id: u64, input: AssignmentInput) -> Result<Assignment> {
        let assignment = self
            .records
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(TrackerError::NotFound(id))?;
        assignment.overwrite(input);
        let updated = assignment.clone();
        tracing::debug!(id, "Assignment updated");

        if self.persist_mode == PersistMode::AllMutations {
            self.persist();
        }
        Ok(updated)
    }

    /// Remove exactly one record with the given id.
    pub fn delete(&mut self, id: u64) -> Result<Assignment> {
        let index = self
            .records
            .iter()
            .position(|a| a.id == id)
            .ok_or(TrackerError::NotFound(id))?;
        let removed = self.records.remove(index);
        tracing::debug!(id, "Assignment deleted");

        if self.persist_mode == PersistMode::AllMutations {
            self.persist();
        }
        Ok(removed)
    }

    fn allocate_id(&mut self) -> u64 {
        let id = match self.id_strategy {
            IdStrategy::Monotonic => self.next_id.max(1),
            IdStrategy::LastRecord => self.records.last().map_or(0, |a| a.id) + 1,
        };
        self.next_id = self.next_id.max(id + 1);
        id
    }

    fn persist(&self) {
        let Some(persister) = &self.persister else {
            return;
        };
        if let Err(e) = persister.submit(self.records.clone()) {
            tracing::error!(error = %e, "Failed to queue assignments for writing");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64) -> Assignment {
        Assignment::from_input(id, AssignmentInput::new(format!("HW{id}"), "2024-01-01"))
    }

    #[test]
    fn monotonic_ids_are_not_reissued_after_delete() {
        let mut store = AssignmentStore::from_records(vec![record(1), record(2)]);
        store.delete(2).unwrap();
        let created = store.create(AssignmentInput::new("x", "d")).unwrap();
        assert_eq!(created.id, 3);
    }

    #[test]
    fn last_record_ids_follow_the_tail() {
        let mut store = AssignmentStore::from_records(vec![record(9), record(2)])
            .with_id_strategy(IdStrategy::LastRecord);
        let created = store.create(AssignmentInput::new("x", "d")).unwrap();
        assert_eq!(created.id, 3);
    }

    #[test]
    fn monotonic_seeds_from_highest_id() {
        let mut store = AssignmentStore::from_records(vec![record(9), record(2)]);
        let created = store.create(AssignmentInput::new("x", "d")).unwrap();
        assert_eq!(created.id, 10);
    }

    #[test]
    fn last_record_with_zero_id_starts_at_one() {
        let mut store = AssignmentStore::from_records(vec![record(0)])
            .with_id_strategy(IdStrategy::LastRecord);
        let created = store.create(AssignmentInput::new("x", "d")).unwrap();
        assert_eq!(created.id, 1);
    }

    #[test]
    fn failed_validation_does_not_consume_an_id() {
        let mut store = AssignmentStore::new();
        assert!(store.create(AssignmentInput::default()).is_err());
        assert!(store.is_empty());
        let created = store.create(AssignmentInput::new("x", "d")).unwrap();
        assert_eq!(created.id, 1);
    }
}

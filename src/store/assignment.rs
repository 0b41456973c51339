use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};

/// A single tracked assignment.
///
/// `name`, `due_date` and `submitted` are optional because an update overwrites
/// all three from the request body, so a record can lose any of them. Missing
/// values are left out of the JSON representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    #[serde(default)]
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted: Option<bool>,
}

/// Request body for create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted: Option<bool>,
}

impl AssignmentInput {
    pub fn new(name: impl Into<String>, due_date: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            due_date: Some(due_date.into()),
            submitted: None,
        }
    }

    pub fn with_submitted(mut self, submitted: bool) -> Self {
        self.submitted = Some(submitted);
        self
    }

    /// Check the fields a new assignment cannot do without.
    ///
    /// Fields are checked in the order `name`, `dueDate`; the first missing or
    /// empty one is reported.
    pub fn validate_for_create(&self) -> Result<()> {
        if is_blank(&self.name) {
            return Err(TrackerError::Validation("name"));
        }
        if is_blank(&self.due_date) {
            return Err(TrackerError::Validation("dueDate"));
        }
        Ok(())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

impl Assignment {
    /// Build a freshly created record. `submitted` defaults to false.
    pub fn from_input(id: u64, input: AssignmentInput) -> Self {
        Self {
            id,
            name: input.name,
            due_date: input.due_date,
            submitted: Some(input.submitted.unwrap_or(false)),
        }
    }

    /// Replace every mutable field with the input, including absent ones.
    pub fn overwrite(&mut self, input: AssignmentInput) {
        self.name = input.name;
        self.due_date = input.due_date;
        self.submitted = input.submitted;
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_requires_name_first() {
        let input = AssignmentInput::default();
        assert!(matches!(
            input.validate_for_create(),
            Err(TrackerError::Validation("name"))
        ));
    }

    #[test]
    fn validate_requires_due_date() {
        let input = AssignmentInput {
            name: Some("x".to_string()),
            ..Default::default()
        };
        let err = input.validate_for_create().unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: dueDate");
    }

    #[test]
    fn validate_rejects_empty_strings() {
        let input = AssignmentInput::new("", "2024-01-01");
        assert!(matches!(
            input.validate_for_create(),
            Err(TrackerError::Validation("name"))
        ));
    }

    #[test]
    fn from_input_defaults_submitted_to_false() {
        let a = Assignment::from_input(3, AssignmentInput::new("HW1", "2024-05-01"));
        assert_eq!(a.id, 3);
        assert_eq!(a.submitted, Some(false));
    }

    #[test]
    fn overwrite_clears_missing_fields() {
        let mut a = Assignment::from_input(
            1,
            AssignmentInput::new("A", "D").with_submitted(true),
        );
        a.overwrite(AssignmentInput {
            name: Some("B".to_string()),
            ..Default::default()
        });
        assert_eq!(a.name.as_deref(), Some("B"));
        assert!(a.due_date.is_none());
        assert!(a.submitted.is_none());
        assert_eq!(a.id, 1);
    }

    #[test]
    fn serializes_camel_case_and_skips_missing() {
        let a = Assignment {
            id: 7,
            name: Some("Essay".to_string()),
            due_date: None,
            submitted: Some(true),
        };
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 7, "name": "Essay", "submitted": true})
        );

        let parsed: Assignment =
            serde_json::from_str(r#"{"id":2,"name":"Lab","dueDate":"2024-02-02"}"#).unwrap();
        assert_eq!(parsed.due_date.as_deref(), Some("2024-02-02"));
        assert!(parsed.submitted.is_none());
    }
}

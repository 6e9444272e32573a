//! Operation record persisted through the backend
//!
//! Operations are mutable while in flight and immutable once they reach a
//! terminal state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationState {
    Created,
    InProgress,
    Completed,
    Failed,
}

/// A cluster operation such as an install, expand or upgrade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Unique operation ID
    pub id: String,
    /// Cluster the operation runs against
    pub cluster: String,
    /// Operation type, e.g. "install"
    pub kind: String,
    /// Current state
    pub state: OperationState,
    /// Creation time
    pub created: DateTime<Utc>,
    /// Last update time
    pub updated: DateTime<Utc>,
    /// Optional human-readable status message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Operation {
    /// Creates a new operation in the `Created` state.
    pub fn new(
        id: impl Into<String>,
        cluster: impl Into<String>,
        kind: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            cluster: cluster.into(),
            kind: kind.into(),
            state: OperationState::Created,
            created: now,
            updated: now,
            message: None,
        }
    }

    /// Returns a copy moved to `state` at `now`.
    pub fn with_state(&self, state: OperationState, now: DateTime<Utc>) -> Self {
        Self {
            state,
            updated: now,
            ..self.clone()
        }
    }

    /// Returns true if the operation reached a terminal state.
    ///
    /// Completed operations are never rewritten.
    pub fn is_completed(&self) -> bool {
        matches!(
            self.state,
            OperationState::Completed | OperationState::Failed
        )
    }

    /// Validates the record before it is written.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.id.is_empty() {
            return Some("Operation ID cannot be empty".to_string());
        }
        if self.id.contains('/') {
            return Some("Operation ID cannot contain '/'".to_string());
        }
        if self.cluster.is_empty() {
            return Some("Cluster cannot be empty".to_string());
        }
        None
    }
}

//! Shared types and errors for the bizplan workspace.
//!
//! This crate provides the foundational types used across the other bizplan crates:
//! - `BizPlanError`: unified error taxonomy
//! - `ObjectType`: the closed set of goal object types
//! - `Priority`: branch priorities used when building sort keys

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unified error type for all bizplan subsystems.
#[derive(Debug, thiserror::Error)]
pub enum BizPlanError {
    // === Ordering Errors ===
    #[error("Invalid object type '{value}' for goal '{title}'. Must be one of [Objective, Outcome, Action]")]
    InvalidObjectType { title: String, value: String },

    #[error("No parent goal found in alignment for {object_type}: {title}")]
    MissingParent { object_type: ObjectType, title: String },

    #[error("More than one parent goal found in alignment for {object_type}: {title} ({count} parents)")]
    AmbiguousParent {
        object_type: ObjectType,
        title: String,
        count: usize,
    },

    #[error("Cyclic alignment detected: {}", .chain.join(" -> "))]
    CyclicAlignment { chain: Vec<String> },

    // === Loading Errors ===
    #[error("Error processing row {row}: {message}")]
    MalformedRow { row: usize, message: String },

    #[error("Required column '{0}' is missing from the table header")]
    MissingColumn(String),

    // === Lint Errors ===
    #[error("Goal table validation failed: {0}")]
    ValidationError(String),

    // === Generic ===
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl BizPlanError {
    /// Returns `true` if the error concerns a single input row, which is
    /// skipped while the rest of the table is still used.
    pub fn is_row_level(&self) -> bool {
        matches!(self, BizPlanError::MalformedRow { .. })
    }

    /// Returns `true` if the error is structural and must stop output
    /// generation entirely.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            BizPlanError::InvalidObjectType { .. }
                | BizPlanError::MissingParent { .. }
                | BizPlanError::AmbiguousParent { .. }
                | BizPlanError::CyclicAlignment { .. }
        )
    }
}

/// A convenience alias for `Result<T, BizPlanError>`.
pub type Result<T> = std::result::Result<T, BizPlanError>;

// ---------------------------------------------------------------------------
// ObjectType: the closed set of non-root goal types
// ---------------------------------------------------------------------------

/// Type of a non-root goal. Theme roots are identified by their tag, not by
/// an object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    Objective,
    Outcome,
    Action,
}

impl ObjectType {
    pub const ALL: [ObjectType; 3] = [ObjectType::Objective, ObjectType::Outcome, ObjectType::Action];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Objective => "Objective",
            ObjectType::Outcome => "Outcome",
            ObjectType::Action => "Action",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = String;

    /// Exact, case-sensitive match against the export's type names.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ObjectType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Priority: position of a child inside its parent's branch
// ---------------------------------------------------------------------------

/// Branch priority. `First` children are shown before `Second` children of
/// the same parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    First = 0,
    Second = 1,
}

impl Priority {
    pub fn rank(self) -> usize {
        self as usize
    }
}

//! Error types for credence.
//!
//! All errors are strongly typed using thiserror. Construction-time
//! failures (malformed networks and queries) are kept separate from
//! query-time failures so callers can pattern match on the condition
//! that actually occurred. The core performs no recovery: every error
//! propagates, and a failed query leaves the caller free to process
//! the next one independently.

use thiserror::Error;

/// Validation errors raised while building networks and queries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Variable '{variable}' has an empty outcome domain")]
    EmptyDomain {
        variable: String,
    },

    #[error("Variable '{variable}' is already present in the network")]
    DuplicateVariable {
        variable: String,
    },

    #[error("Variable '{variable}' names unknown parent '{parent}'")]
    UnknownParent {
        variable: String,
        parent: String,
    },

    #[error("Variable '{variable}' declares parent '{parent}' more than once")]
    DuplicateParent {
        variable: String,
        parent: String,
    },

    #[error("Malformed network definition: {reason}")]
    MalformedDefinition {
        reason: String,
    },

    #[error("Network is cyclic: variable '{variable}' participates in a cycle")]
    CyclicNetwork {
        variable: String,
    },

    #[error("CPT for '{variable}' has {actual} probabilities, expected {expected}")]
    DomainMismatch {
        variable: String,
        expected: usize,
        actual: usize,
    },

    #[error("Probability {value} for '{variable}' is out of range [0.0, 1.0]")]
    ProbabilityOutOfRange {
        variable: String,
        value: f64,
    },

    #[error("Evidence variable '{variable}' appears more than once")]
    DuplicateEvidence {
        variable: String,
    },

    #[error("Variable '{variable}' cannot be both the query target and {role}")]
    RoleConflict {
        variable: String,
        role: &'static str,
    },
}

/// Inference errors raised while answering a query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("Variable '{name}' not found in the network")]
    NodeNotFound {
        name: String,
    },

    #[error("Variable '{variable}' is not a column of the factor")]
    VariableNotFound {
        variable: String,
    },

    #[error("Hidden variable '{variable}' is not present in any live factor")]
    UnresolvableQuery {
        variable: String,
    },

    #[error("Evidence assignment carries no probability mass")]
    InconsistentEvidence,
}

/// Top-level error type for credence.
///
/// This enum encompasses all possible errors that can occur when
/// constructing networks or answering queries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CredenceError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),
}

impl CredenceError {
    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is an inference error.
    #[must_use]
    pub const fn is_inference(&self) -> bool {
        matches!(self, Self::Inference(_))
    }

    /// Returns true if this error indicates an internal invariant
    /// violation rather than bad input.
    ///
    /// A factor-level `VariableNotFound` can only be produced by the
    /// engine requesting elimination of a column it never created;
    /// callers should report it as a bug, not retry.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Inference(InferenceError::VariableNotFound { .. })
        )
    }
}

/// Result type alias for credence operations.
pub type CredenceResult<T> = Result<T, CredenceError>;

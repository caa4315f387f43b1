//! Structured queries against a network.
//!
//! A query is one of two unrelated shapes, so it is modeled as a tagged
//! union rather than a single struct with fields that are only sometimes
//! valid. Consumers match exhaustively:
//! - [`IndependenceQuery`] asks whether two variables are conditionally
//!   independent given a set of observed variables (values irrelevant).
//! - [`EliminationQuery`] asks for `P(target = value | evidence)` with a
//!   caller-supplied elimination order over the hidden variables.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A structural independence question: is `a` independent of `b` given the
/// evidence variables?
///
/// Only evidence *membership* matters here; the observed values play no
/// role in the structural test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndependenceQuery {
    /// First variable.
    pub a: String,

    /// Second variable.
    pub b: String,

    /// Names of the observed variables.
    #[serde(default)]
    pub evidence: HashSet<String>,
}

impl IndependenceQuery {
    /// Creates an independence query.
    #[must_use]
    pub fn new(
        a: impl Into<String>,
        b: impl Into<String>,
        evidence: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            evidence: evidence.into_iter().collect(),
        }
    }
}

/// A probability question: `P(target = value | evidence)`, eliminating the
/// hidden variables in the given order.
///
/// The evidence list is ordered and duplicate-free; the hidden list is the
/// elimination order, supplied by the caller and not optimized by the
/// engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EliminationQuery {
    target: String,
    value: String,
    #[serde(default)]
    evidence: Vec<(String, String)>,
    #[serde(default)]
    hidden: Vec<String>,
}

impl EliminationQuery {
    /// Creates a validated elimination query.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::DuplicateEvidence` if a variable appears
    /// twice in the evidence, or `ValidationError::RoleConflict` if the
    /// target also appears among the evidence or hidden variables.
    pub fn new(
        target: impl Into<String>,
        value: impl Into<String>,
        evidence: Vec<(String, String)>,
        hidden: Vec<String>,
    ) -> Result<Self, ValidationError> {
        let query = Self {
            target: target.into(),
            value: value.into(),
            evidence,
            hidden,
        };
        query.validate()?;
        Ok(query)
    }

    /// Re-checks the structural invariants.
    ///
    /// Deserialized queries bypass [`EliminationQuery::new`]; the engine
    /// validates before running.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for (variable, _) in &self.evidence {
            if !seen.insert(variable.as_str()) {
                return Err(ValidationError::DuplicateEvidence {
                    variable: variable.clone(),
                });
            }
        }
        if seen.contains(self.target.as_str()) {
            return Err(ValidationError::RoleConflict {
                variable: self.target.clone(),
                role: "an evidence variable",
            });
        }
        if self.hidden.iter().any(|h| h == &self.target) {
            return Err(ValidationError::RoleConflict {
                variable: self.target.clone(),
                role: "a hidden variable",
            });
        }
        Ok(())
    }

    /// The query variable.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The queried outcome of the target variable.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Ordered `(variable, value)` evidence pairs.
    #[must_use]
    pub fn evidence(&self) -> &[(String, String)] {
        &self.evidence
    }

    /// The hidden variables, in elimination order.
    #[must_use]
    pub fn hidden(&self) -> &[String] {
        &self.hidden
    }

    /// The evidence variable names, as a set.
    #[must_use]
    pub fn evidence_variables(&self) -> HashSet<String> {
        self.evidence.iter().map(|(name, _)| name.clone()).collect()
    }

    pub(crate) fn remove_hidden(&mut self, name: &str) {
        self.hidden.retain(|h| h != name);
    }
}

/// A query to be answered against a network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Query {
    /// Structural conditional-independence test.
    Independence(IndependenceQuery),

    /// Exact probability via variable elimination.
    Elimination(EliminationQuery),
}

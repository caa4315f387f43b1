//! Construction IR for networks.
//!
//! Serde already provides JSON (and other) serialization; this module
//! defines the already-parsed shape the core accepts from its external
//! collaborators — one record per variable carrying its outcome domain,
//! parent list, and flat CPT — plus convenience JSON helpers. Reading the
//! definition out of whatever storage format is in use (XML, files, CLI
//! input) is the collaborator's job, not the core's.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{CredenceResult, ValidationError};
use crate::network::Network;
use crate::variable::Variable;

/// One variable of a network definition.
///
/// `probabilities` is the flat CPT list: one entry per assignment over
/// `[parents.., self]`, first parent varying slowest, the variable itself
/// varying fastest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDefinition {
    /// Unique variable name.
    pub name: String,

    /// Ordered outcome domain.
    pub outcomes: Vec<String>,

    /// Parent names, in CPT declaration order.
    #[serde(default)]
    pub parents: Vec<String>,

    /// Flat CPT probabilities.
    pub probabilities: Vec<f64>,
}

/// An already-parsed network definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDefinition {
    /// Variable records, in declaration order.
    pub variables: Vec<VariableDefinition>,
}

impl Network {
    /// Builds a validated network from a definition.
    ///
    /// Variables are added first, then edges are wired in declaration
    /// order, the graph is checked for cycles, and finally every CPT is
    /// generated.
    ///
    /// # Errors
    ///
    /// `DuplicateVariable`, `EmptyDomain`, `UnknownParent`,
    /// `DuplicateParent`, `CyclicNetwork`, `DomainMismatch`, or
    /// `ProbabilityOutOfRange`, depending on what is wrong with the
    /// definition.
    pub fn from_definition(definition: &NetworkDefinition) -> CredenceResult<Self> {
        let mut network = Network::new();

        for record in &definition.variables {
            network.add_variable(Variable::new(&record.name, record.outcomes.clone())?)?;
        }

        for record in &definition.variables {
            let mut seen: HashSet<&str> = HashSet::new();
            for parent in &record.parents {
                if !seen.insert(parent.as_str()) {
                    return Err(ValidationError::DuplicateParent {
                        variable: record.name.clone(),
                        parent: parent.clone(),
                    }
                    .into());
                }
                if !network.contains(parent) {
                    return Err(ValidationError::UnknownParent {
                        variable: record.name.clone(),
                        parent: parent.clone(),
                    }
                    .into());
                }
                network.add_edge(parent, &record.name)?;
            }
        }

        network.validate_acyclic()?;

        for record in &definition.variables {
            network.assign_cpt(&record.name, &record.probabilities)?;
        }

        Ok(network)
    }
}

/// Serialize a definition to pretty JSON.
pub fn to_json_pretty(definition: &NetworkDefinition) -> CredenceResult<String> {
    serde_json::to_string_pretty(definition).map_err(|e| {
        ValidationError::MalformedDefinition {
            reason: format!("serialize definition: {e}"),
        }
        .into()
    })
}

/// Deserialize a definition from JSON.
pub fn from_json(s: &str) -> CredenceResult<NetworkDefinition> {
    serde_json::from_str::<NetworkDefinition>(s).map_err(|e| {
        ValidationError::MalformedDefinition {
            reason: format!("deserialize definition: {e}"),
        }
        .into()
    })
}

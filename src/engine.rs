//! The variable elimination engine.
//!
//! Holds the unordered set of live factors for one query and drives it to a
//! single answer factor: initialization with evidence instantiation,
//! ordered elimination of the hidden variables, final reduction, and
//! normalization. Every join reports its multiplications and every
//! summation its additions; the counters are part of the engine's output
//! contract, not incidental bookkeeping.
//!
//! The factor list is re-sorted by [`Factor::cmp_size`] after every
//! mutation so the two smallest factors are always joined first. That
//! keeps intermediate tables small; it never changes the final answer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{CredenceResult, InferenceError};
use crate::factor::Factor;
use crate::network::Network;
use crate::query::EliminationQuery;
use crate::relevance;

/// The observable result of an elimination query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EliminationAnswer {
    /// The normalized probability `P(target = value | evidence)`.
    pub probability: f64,

    /// Total multiplications performed across all joins.
    pub multiplications: u64,

    /// Total additions performed across all summations, including the
    /// final normalization.
    pub additions: u64,
}

/// Variable elimination over a network's factors.
#[derive(Debug, Default)]
pub struct VariableElimination {
    factors: Vec<Factor>,
}

impl VariableElimination {
    /// Creates an engine with an empty factor list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factors: Vec::new(),
        }
    }

    /// Runs variable elimination, without pruning, and normalizes.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if the query's structural invariants fail.
    /// - `NodeNotFound` if the target or an evidence variable is absent.
    /// - `UnresolvableQuery` if a hidden variable occurs in no live factor,
    ///   or a residual answer column is neither the target nor evidence.
    /// - `InconsistentEvidence` if the evidence carries no probability
    ///   mass.
    pub fn run(
        network: &Network,
        query: &EliminationQuery,
    ) -> CredenceResult<EliminationAnswer> {
        query.validate()?;
        network.require(query.target())?;
        for (name, _) in query.evidence() {
            network.require(name)?;
        }

        let mut engine = Self::new();
        engine.initialize(network, query.evidence());
        debug!(factors = engine.factors.len(), "initialized live factors");

        let mut multiplications = 0u64;
        let mut additions = 0u64;

        for hidden in query.hidden() {
            loop {
                match engine.find_pair(hidden) {
                    (None, _) => {
                        return Err(InferenceError::UnresolvableQuery {
                            variable: hidden.clone(),
                        }
                        .into());
                    }
                    (Some(first), Some(second)) => {
                        let joined = engine.factors[first].join(&engine.factors[second]);
                        trace!(
                            variable = %hidden,
                            multiplications = joined.multiplications,
                            "joined factors"
                        );
                        multiplications += joined.multiplications;
                        // `second` was found after `first`, so removing it
                        // first keeps `first` stable.
                        engine.factors.remove(second);
                        engine.factors.remove(first);
                        engine.factors.push(joined.factor);
                        engine.sort();
                    }
                    (Some(last), None) => {
                        let summed = engine.factors[last].eliminate(hidden)?;
                        trace!(
                            variable = %hidden,
                            additions = summed.additions,
                            "summed out hidden variable"
                        );
                        additions += summed.additions;
                        engine.factors.remove(last);
                        if !summed.factor.can_be_discarded() {
                            engine.factors.push(summed.factor);
                            engine.sort();
                        }
                        break;
                    }
                }
            }
        }

        while engine.factors.len() > 1 {
            let joined = engine.factors[0].join(&engine.factors[1]);
            multiplications += joined.multiplications;
            engine.factors.drain(0..2);
            engine.factors.push(joined.factor);
            engine.sort();
        }

        let Some(answer) = engine.factors.pop() else {
            return Err(InferenceError::UnresolvableQuery {
                variable: query.target().to_string(),
            }
            .into());
        };

        let evidence_values: HashMap<&str, &str> = query
            .evidence()
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();

        let numerator_key =
            assignment_for(&answer, query.target(), query.value(), &evidence_values)?;
        let numerator = answer.table().get(&numerator_key).copied().unwrap_or(0.0);

        // Normalization: sum the answer factor over the query variable.
        // Grouping n rows into one costs n - 1 additions, and those count.
        let normalization = answer.eliminate(query.target())?;
        additions += normalization.additions;
        let constant_key = assignment_for(
            &normalization.factor,
            query.target(),
            query.value(),
            &evidence_values,
        )?;
        let constant = normalization
            .factor
            .table()
            .get(&constant_key)
            .copied()
            .unwrap_or(0.0);
        if constant == 0.0 {
            return Err(InferenceError::InconsistentEvidence.into());
        }

        Ok(EliminationAnswer {
            probability: numerator / constant,
            multiplications,
            additions,
        })
    }

    /// Derives one factor per network variable, instantiates each against
    /// the evidence, discards single-row factors, and sorts.
    fn initialize(&mut self, network: &Network, evidence: &[(String, String)]) {
        for variable in network.variables() {
            let mut factor = variable.to_factor();
            for (name, value) in evidence {
                if factor.contains_variable(name) {
                    factor = factor.instantiate(name, value);
                }
            }
            if !factor.can_be_discarded() {
                self.factors.push(factor);
            }
        }
        self.sort();
    }

    fn sort(&mut self) {
        self.factors.sort_by(Factor::cmp_size);
    }

    /// Indices of the first two factors, in current sort order, whose
    /// columns include `variable`.
    fn find_pair(&self, variable: &str) -> (Option<usize>, Option<usize>) {
        let mut matching = self
            .factors
            .iter()
            .enumerate()
            .filter(|(_, factor)| factor.contains_variable(variable))
            .map(|(index, _)| index);
        (matching.next(), matching.next())
    }
}

/// Builds a lookup key over `factor`'s columns: the target column maps to
/// the queried value, evidence columns map to their observed values.
fn assignment_for(
    factor: &Factor,
    target: &str,
    value: &str,
    evidence: &HashMap<&str, &str>,
) -> CredenceResult<Vec<String>> {
    factor
        .columns()
        .iter()
        .map(|column| {
            if column == target {
                Ok(value.to_string())
            } else if let Some(observed) = evidence.get(column.as_str()) {
                Ok((*observed).to_string())
            } else {
                Err(InferenceError::UnresolvableQuery {
                    variable: column.clone(),
                }
                .into())
            }
        })
        .collect()
}

/// Answers an elimination query: prunes a working copy of the network,
/// then eliminates.
///
/// # Errors
///
/// See [`VariableElimination::run`]; pruning adds no error cases of its
/// own beyond `NodeNotFound` for an absent query target.
pub fn answer_elimination_query(
    network: &Network,
    query: &EliminationQuery,
) -> CredenceResult<EliminationAnswer> {
    let (pruned, reduced) = relevance::prune_irrelevant(network, query)?;
    debug!(
        before = network.len(),
        after = pruned.len(),
        "pruned network for elimination"
    );
    VariableElimination::run(&pruned, &reduced)
}

#[cfg(test)]
mod tests {
    use crate::definition::{NetworkDefinition, VariableDefinition};
    use crate::error::CredenceError;

    use super::*;

    fn variable(name: &str, parents: &[&str], probabilities: &[f64]) -> VariableDefinition {
        VariableDefinition {
            name: name.to_string(),
            outcomes: vec!["T".to_string(), "F".to_string()],
            parents: parents.iter().map(|s| (*s).to_string()).collect(),
            probabilities: probabilities.to_vec(),
        }
    }

    /// The textbook five-node alarm network.
    fn alarm_network() -> Network {
        Network::from_definition(&NetworkDefinition {
            variables: vec![
                variable("Burglary", &[], &[0.001, 0.999]),
                variable("Earthquake", &[], &[0.002, 0.998]),
                variable(
                    "Alarm",
                    &["Burglary", "Earthquake"],
                    &[0.95, 0.05, 0.94, 0.06, 0.29, 0.71, 0.001, 0.999],
                ),
                variable("JohnCalls", &["Alarm"], &[0.90, 0.10, 0.05, 0.95]),
                variable("MaryCalls", &["Alarm"], &[0.70, 0.30, 0.01, 0.99]),
            ],
        })
        .unwrap()
    }

    fn pairs(entries: &[(&str, &str)]) -> Vec<(String, String)> {
        entries
            .iter()
            .map(|(a, b)| ((*a).to_string(), (*b).to_string()))
            .collect()
    }

    fn names(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn alarm_query_matches_textbook_value() {
        let network = alarm_network();
        let query = EliminationQuery::new(
            "Burglary",
            "T",
            pairs(&[("JohnCalls", "T"), ("MaryCalls", "T")]),
            names(&["Earthquake", "Alarm"]),
        )
        .unwrap();

        let answer = VariableElimination::run(&network, &query).unwrap();
        assert!((answer.probability - 0.284_171_8).abs() < 1e-5);
        assert_eq!(answer.multiplications, 16);
        assert_eq!(answer.additions, 7);
    }

    #[test]
    fn counts_are_reproducible_for_a_fixed_order() {
        let network = alarm_network();
        let query = EliminationQuery::new(
            "Burglary",
            "T",
            pairs(&[("JohnCalls", "T"), ("MaryCalls", "T")]),
            names(&["Earthquake", "Alarm"]),
        )
        .unwrap();

        let first = VariableElimination::run(&network, &query).unwrap();
        let second = VariableElimination::run(&network, &query).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn reversed_elimination_order_agrees_on_probability() {
        let network = alarm_network();
        let query = EliminationQuery::new(
            "Burglary",
            "T",
            pairs(&[("JohnCalls", "T"), ("MaryCalls", "T")]),
            names(&["Alarm", "Earthquake"]),
        )
        .unwrap();

        let answer = VariableElimination::run(&network, &query).unwrap();
        assert!((answer.probability - 0.284_171_8).abs() < 1e-5);
    }

    #[test]
    fn two_node_posterior() {
        let network = Network::from_definition(&NetworkDefinition {
            variables: vec![
                variable("Rain", &[], &[0.2, 0.8]),
                variable("WetGrass", &["Rain"], &[0.9, 0.1, 0.1, 0.9]),
            ],
        })
        .unwrap();
        let query = EliminationQuery::new(
            "Rain",
            "T",
            pairs(&[("WetGrass", "T")]),
            vec![],
        )
        .unwrap();

        let answer = VariableElimination::run(&network, &query).unwrap();
        assert!((answer.probability - 0.18 / 0.26).abs() < 1e-12);
        assert_eq!(answer.multiplications, 2);
        assert_eq!(answer.additions, 1);
    }

    #[test]
    fn missing_target_is_reported() {
        let network = alarm_network();
        let query = EliminationQuery::new("Smoke", "T", vec![], vec![]).unwrap();
        let err = VariableElimination::run(&network, &query).unwrap_err();
        assert!(matches!(
            err,
            CredenceError::Inference(InferenceError::NodeNotFound { .. })
        ));
    }

    #[test]
    fn unknown_hidden_variable_is_unresolvable() {
        let network = alarm_network();
        let query =
            EliminationQuery::new("Burglary", "T", vec![], names(&["Ghost"])).unwrap();
        let err = VariableElimination::run(&network, &query).unwrap_err();
        assert_eq!(
            err,
            CredenceError::Inference(InferenceError::UnresolvableQuery {
                variable: "Ghost".to_string()
            })
        );
    }

    #[test]
    fn impossible_evidence_is_inconsistent() {
        let network = Network::from_definition(&NetworkDefinition {
            variables: vec![
                variable("A", &[], &[0.5, 0.5]),
                variable("B", &["A"], &[0.0, 1.0, 0.0, 1.0]),
            ],
        })
        .unwrap();
        let query =
            EliminationQuery::new("A", "T", pairs(&[("B", "T")]), vec![]).unwrap();

        let err = VariableElimination::run(&network, &query).unwrap_err();
        assert_eq!(
            err,
            CredenceError::Inference(InferenceError::InconsistentEvidence)
        );
    }

    #[test]
    fn pruned_run_matches_unpruned_probability() {
        let network = alarm_network();
        let query = EliminationQuery::new(
            "JohnCalls",
            "T",
            pairs(&[("Burglary", "T")]),
            names(&["MaryCalls", "Earthquake", "Alarm"]),
        )
        .unwrap();

        let unpruned = VariableElimination::run(&network, &query).unwrap();
        let pruned = answer_elimination_query(&network, &query).unwrap();
        assert!((unpruned.probability - pruned.probability).abs() < 1e-12);
    }
}

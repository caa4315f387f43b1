//! Discrete random variables and their conditional probability tables.
//!
//! A [`Variable`] is identified by its name and carries an ordered, finite
//! outcome domain. Ordering matters twice over:
//! - the domain order defines CPT row indexing, and
//! - the parent declaration order defines the column layout of the CPT and
//!   of the factor derived from it.
//!
//! Edges are stored as name lists rather than references, so removing a
//! variable from a network is a plain map update with no dangling pointers.

use std::collections::HashMap;
use std::fmt;

use crate::error::ValidationError;
use crate::factor::Factor;

/// A node in a Bayesian network: a named discrete random variable.
///
/// The outcome domain is fixed at construction. Parents, children, and the
/// CPT are populated while the owning network is being built and are not
/// mutated afterward, except when the whole network is deep-copied for
/// pruning.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    outcomes: Vec<String>,
    parents: Vec<String>,
    children: Vec<String>,
    cpt: HashMap<Vec<String>, f64>,
}

impl Variable {
    /// Creates a variable with the given name and outcome domain.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyDomain` if `outcomes` is empty.
    pub fn new(name: impl Into<String>, outcomes: Vec<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if outcomes.is_empty() {
            return Err(ValidationError::EmptyDomain { variable: name });
        }
        Ok(Self {
            name,
            outcomes,
            parents: Vec::new(),
            children: Vec::new(),
            cpt: HashMap::new(),
        })
    }

    /// The variable's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ordered outcome domain.
    #[must_use]
    pub fn outcomes(&self) -> &[String] {
        &self.outcomes
    }

    /// Parent names, in declaration order.
    #[must_use]
    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    /// Child names, in declaration order.
    #[must_use]
    pub fn children(&self) -> &[String] {
        &self.children
    }

    /// The conditional probability table.
    ///
    /// Keys are assignments `[parent_1, .., parent_k, self]` in declaration
    /// order.
    #[must_use]
    pub fn cpt(&self) -> &HashMap<Vec<String>, f64> {
        &self.cpt
    }

    /// Returns true if this variable has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn add_parent(&mut self, name: String) {
        self.parents.push(name);
    }

    pub(crate) fn add_child(&mut self, name: String) {
        self.children.push(name);
    }

    /// Drops `name` from both edge lists.
    pub(crate) fn unlink(&mut self, name: &str) {
        self.parents.retain(|p| p != name);
        self.children.retain(|c| c != name);
    }

    pub(crate) fn set_cpt(&mut self, cpt: HashMap<Vec<String>, f64>) {
        self.cpt = cpt;
    }

    /// Reframes the CPT as a factor whose columns are
    /// `[parent_1, .., parent_k, self]`, in the order used for generation.
    #[must_use]
    pub fn to_factor(&self) -> Factor {
        let mut columns = self.parents.clone();
        columns.push(self.name.clone());
        Factor::new(columns, self.cpt.clone())
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Variable: {}", self.name)?;
        writeln!(f, "Outcomes: {:?}", self.outcomes)?;
        writeln!(f, "Parents: {:?}", self.parents)?;
        writeln!(f, "Children: {:?}", self.children)?;
        writeln!(f, "CPT:")?;
        let mut rows: Vec<_> = self.cpt.iter().collect();
        rows.sort_by(|a, b| a.0.cmp(b.0));
        for (key, value) in rows {
            writeln!(f, "{key:?} : {value}")?;
        }
        Ok(())
    }
}

/// Builds a CPT table from a flat probability list by mixed-radix
/// decomposition over `domains` (one domain per column, the variable's own
/// domain last).
///
/// The first-listed domain varies slowest and the last varies fastest:
/// standard row-major enumeration. Flat index `i` maps to the assignment
/// whose column `c` holds `domains[c][(i / stride_c) % |domains[c]|]`.
pub(crate) fn cpt_from_flat(
    variable: &str,
    domains: &[&[String]],
    probabilities: &[f64],
) -> Result<HashMap<Vec<String>, f64>, ValidationError> {
    let expected: usize = domains.iter().map(|d| d.len()).product();
    if probabilities.len() != expected {
        return Err(ValidationError::DomainMismatch {
            variable: variable.to_string(),
            expected,
            actual: probabilities.len(),
        });
    }
    for &p in probabilities {
        if !(0.0..=1.0).contains(&p) {
            return Err(ValidationError::ProbabilityOutOfRange {
                variable: variable.to_string(),
                value: p,
            });
        }
    }

    let mut strides = vec![1usize; domains.len()];
    let mut size = 1usize;
    for (c, domain) in domains.iter().enumerate().rev() {
        strides[c] = size;
        size *= domain.len();
    }

    let mut table = HashMap::with_capacity(probabilities.len());
    for (index, &p) in probabilities.iter().enumerate() {
        let key: Vec<String> = domains
            .iter()
            .zip(&strides)
            .map(|(domain, stride)| domain[(index / stride) % domain.len()].clone())
            .collect();
        table.insert(key, p);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcomes(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| (*s).to_string()).collect()
    }

    fn key(labels: &[&str]) -> Vec<String> {
        outcomes(labels)
    }

    #[test]
    fn empty_domain_is_rejected() {
        let err = Variable::new("A", vec![]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::EmptyDomain {
                variable: "A".to_string()
            }
        );
    }

    #[test]
    fn root_variable_cpt() {
        let domain = outcomes(&["T", "F"]);
        let table = cpt_from_flat("A", &[&domain], &[0.2, 0.8]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[&key(&["T"])], 0.2);
        assert_eq!(table[&key(&["F"])], 0.8);
    }

    #[test]
    fn own_outcome_varies_fastest() {
        // One binary parent, binary child. The flat list enumerates the
        // parent slowest and the child fastest; swapping the convention
        // would silently misplace 0.1 and 0.2.
        let parent = outcomes(&["T", "F"]);
        let own = outcomes(&["T", "F"]);
        let table = cpt_from_flat("B", &[&parent, &own], &[0.9, 0.1, 0.2, 0.8]).unwrap();
        assert_eq!(table[&key(&["T", "T"])], 0.9);
        assert_eq!(table[&key(&["T", "F"])], 0.1);
        assert_eq!(table[&key(&["F", "T"])], 0.2);
        assert_eq!(table[&key(&["F", "F"])], 0.8);
    }

    #[test]
    fn mixed_radix_with_uneven_domains() {
        let p1 = outcomes(&["a", "b"]);
        let p2 = outcomes(&["x", "y", "z"]);
        let own = outcomes(&["T", "F"]);
        let probabilities: Vec<f64> = (0..12).map(|i| f64::from(i) / 100.0).collect();
        let table = cpt_from_flat("C", &[&p1, &p2, &own], &probabilities).unwrap();
        assert_eq!(table.len(), 12);
        // index 0 -> (a, x, T); index 7 -> (b, x, F)
        assert_eq!(table[&key(&["a", "x", "T"])], 0.00);
        assert_eq!(table[&key(&["a", "x", "F"])], 0.01);
        assert_eq!(table[&key(&["a", "y", "T"])], 0.02);
        assert_eq!(table[&key(&["b", "x", "F"])], 0.07);
        assert_eq!(table[&key(&["b", "z", "F"])], 0.11);
    }

    #[test]
    fn flat_list_length_must_match() {
        let domain = outcomes(&["T", "F"]);
        let err = cpt_from_flat("A", &[&domain], &[0.2, 0.3, 0.5]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DomainMismatch {
                variable: "A".to_string(),
                expected: 2,
                actual: 3,
            }
        );
    }

    #[test]
    fn probabilities_must_be_in_range() {
        let domain = outcomes(&["T", "F"]);
        let err = cpt_from_flat("A", &[&domain], &[1.2, -0.2]).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::ProbabilityOutOfRange { .. }
        ));
    }

    #[test]
    fn to_factor_preserves_column_order() {
        let mut var = Variable::new("C", outcomes(&["T", "F"])).unwrap();
        var.add_parent("A".to_string());
        var.add_parent("B".to_string());
        let factor = var.to_factor();
        assert_eq!(factor.columns(), &["A", "B", "C"]);
    }

    #[test]
    fn unlink_drops_both_edge_directions() {
        let mut var = Variable::new("C", outcomes(&["T", "F"])).unwrap();
        var.add_parent("A".to_string());
        var.add_child("D".to_string());
        var.unlink("A");
        var.unlink("D");
        assert!(var.parents().is_empty());
        assert!(var.children().is_empty());
    }
}

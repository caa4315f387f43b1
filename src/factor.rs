//! Factor algebra for variable elimination.
//!
//! A [`Factor`] is an immutable table over a set of variables, mapping
//! positional assignments to non-negative weights. It generalizes a CPT and
//! every intermediate product formed during elimination. Operations never
//! mutate in place; they return a new factor together with the number of
//! arithmetic operations performed, so the engine can fold costs without
//! hidden counters.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use crate::error::InferenceError;

/// A factor: an ordered column list plus an assignment-to-weight table.
///
/// Invariant: every key holds exactly one outcome per column, in column
/// order. Two factors are equal iff their column lists and tables are equal
/// (order-sensitive on columns, content-equal on the table).
#[derive(Debug, Clone, PartialEq)]
pub struct Factor {
    columns: Vec<String>,
    table: HashMap<Vec<String>, f64>,
}

/// The outcome of a factor operation: the new factor plus the arithmetic
/// cost of producing it.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct OperationResult {
    /// The resulting factor.
    pub factor: Factor,
    /// Multiplications performed (joins).
    pub multiplications: u64,
    /// Additions performed (eliminations).
    pub additions: u64,
}

impl Factor {
    /// Creates a factor from column names and a table.
    #[must_use]
    pub fn new(columns: Vec<String>, table: HashMap<Vec<String>, f64>) -> Self {
        debug_assert!(
            table.keys().all(|k| k.len() == columns.len()),
            "every table key must have one entry per column"
        );
        Self { columns, table }
    }

    /// The ordered column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The assignment-to-weight table.
    #[must_use]
    pub fn table(&self) -> &HashMap<Vec<String>, f64> {
        &self.table
    }

    /// Returns true if the factor's columns include `variable`.
    #[must_use]
    pub fn contains_variable(&self, variable: &str) -> bool {
        self.columns.iter().any(|c| c == variable)
    }

    /// Returns true if exactly one row remains.
    ///
    /// Such a factor carries no decision information and may be dropped
    /// without affecting the normalized answer.
    #[must_use]
    pub fn can_be_discarded(&self) -> bool {
        self.table.len() == 1
    }

    /// Joins this factor with another: the pointwise product over shared
    /// columns.
    ///
    /// The result's columns are this factor's columns followed by the
    /// other's columns not already present, order preserved. One row is
    /// emitted (and one multiplication counted) per pair of rows that agree
    /// on every shared column. Duplicate combined keys merge by summation.
    pub fn join(&self, other: &Factor) -> OperationResult {
        let mut columns = self.columns.clone();
        for col in &other.columns {
            if !columns.contains(col) {
                columns.push(col.clone());
            }
        }

        // Shared columns as (self index, other index) pairs; other-only
        // columns by index, in the other factor's order.
        let shared: Vec<(usize, usize)> = self
            .columns
            .iter()
            .enumerate()
            .filter_map(|(i, col)| {
                other.columns.iter().position(|o| o == col).map(|j| (i, j))
            })
            .collect();
        let extra: Vec<usize> = other
            .columns
            .iter()
            .enumerate()
            .filter(|(_, col)| !self.columns.contains(col))
            .map(|(j, _)| j)
            .collect();

        let mut table: HashMap<Vec<String>, f64> = HashMap::new();
        let mut multiplications = 0u64;

        for (key1, value1) in &self.table {
            for (key2, value2) in &other.table {
                if shared.iter().all(|&(i, j)| key1[i] == key2[j]) {
                    let mut key = key1.clone();
                    key.extend(extra.iter().map(|&j| key2[j].clone()));
                    multiplications += 1;
                    *table.entry(key).or_insert(0.0) += value1 * value2;
                }
            }
        }

        OperationResult {
            factor: Factor::new(columns, table),
            multiplications,
            additions: 0,
        }
    }

    /// Sums `variable` out of the factor.
    ///
    /// Rows are grouped by the key with the variable's column removed; a
    /// group of n original rows costs n − 1 additions.
    ///
    /// # Errors
    ///
    /// Returns `InferenceError::VariableNotFound` if `variable` is not a
    /// column of this factor.
    pub fn eliminate(&self, variable: &str) -> Result<OperationResult, InferenceError> {
        let index = self
            .columns
            .iter()
            .position(|c| c == variable)
            .ok_or_else(|| InferenceError::VariableNotFound {
                variable: variable.to_string(),
            })?;

        let mut table: HashMap<Vec<String>, f64> = HashMap::new();
        let mut additions = 0u64;
        for (key, value) in &self.table {
            let mut new_key = key.clone();
            new_key.remove(index);
            match table.entry(new_key) {
                Entry::Occupied(mut slot) => {
                    *slot.get_mut() += value;
                    additions += 1;
                }
                Entry::Vacant(slot) => {
                    slot.insert(*value);
                }
            }
        }

        let mut columns = self.columns.clone();
        columns.remove(index);

        Ok(OperationResult {
            factor: Factor::new(columns, table),
            multiplications: 0,
            additions,
        })
    }

    /// Fixes `variable` to `value`: keeps only matching rows and drops the
    /// column.
    ///
    /// If `variable` is not a column of this factor, the factor is returned
    /// unchanged — callers apply evidence defensively to arbitrary factors.
    #[must_use]
    pub fn instantiate(&self, variable: &str, value: &str) -> Factor {
        let Some(index) = self.columns.iter().position(|c| c == variable) else {
            return self.clone();
        };

        let table: HashMap<Vec<String>, f64> = self
            .table
            .iter()
            .filter(|(key, _)| key[index] == value)
            .map(|(key, weight)| {
                let mut new_key = key.clone();
                new_key.remove(index);
                (new_key, *weight)
            })
            .collect();

        let mut columns = self.columns.clone();
        columns.remove(index);
        Factor::new(columns, table)
    }

    /// Scheduling order: column count ascending, ties broken by
    /// lexicographic comparison of the column names.
    ///
    /// The elimination engine always joins the two smallest factors first;
    /// this comparator is what "smallest" means. It affects intermediate
    /// table sizes, not the final answer.
    #[must_use]
    pub fn cmp_size(&self, other: &Self) -> Ordering {
        self.columns
            .len()
            .cmp(&other.columns.len())
            .then_with(|| self.columns.cmp(&other.columns))
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Factor:")?;
        writeln!(f, "{:?}", self.columns)?;
        let mut rows: Vec<_> = self.table.iter().collect();
        rows.sort_by(|a, b| a.0.cmp(b.0));
        for (key, value) in rows {
            writeln!(f, "{key:?} : {value}")?;
        }
        Ok(())
    }
}

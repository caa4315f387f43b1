//! # credence - exact inference over discrete Bayesian networks
//!
//! credence answers probability queries against directed acyclic graphs of
//! discrete random variables. Given an already-parsed network and a
//! structured query it either runs a structural independence test (Bayes
//! Ball / d-separation) or eliminates nuisance variables through factor
//! algebra, optionally pruning query-irrelevant parts of the network first.
//!
//! ## Core Concepts
//!
//! - **Variable**: a named node with an ordered outcome domain and a CPT
//! - **Network**: the acyclic, name-keyed variable store
//! - **Factor**: an immutable assignment-to-weight table; join, eliminate,
//!   and instantiate produce new factors plus their arithmetic cost
//! - **Query**: a tagged union of independence and elimination questions
//!
//! ## Usage
//!
//! ```rust
//! use credence::{
//!     answer_elimination_query, CredenceError, EliminationQuery, Network,
//!     NetworkDefinition, VariableDefinition,
//! };
//!
//! let definition = NetworkDefinition {
//!     variables: vec![
//!         VariableDefinition {
//!             name: "Rain".to_string(),
//!             outcomes: vec!["T".to_string(), "F".to_string()],
//!             parents: vec![],
//!             probabilities: vec![0.2, 0.8],
//!         },
//!         VariableDefinition {
//!             name: "WetGrass".to_string(),
//!             outcomes: vec!["T".to_string(), "F".to_string()],
//!             parents: vec!["Rain".to_string()],
//!             probabilities: vec![0.9, 0.1, 0.1, 0.9],
//!         },
//!     ],
//! };
//!
//! let network = Network::from_definition(&definition)?;
//! let query = EliminationQuery::new(
//!     "Rain",
//!     "T",
//!     vec![("WetGrass".to_string(), "T".to_string())],
//!     vec![],
//! )?;
//!
//! let answer = answer_elimination_query(&network, &query)?;
//! assert!((answer.probability - 0.6923).abs() < 1e-4);
//! # Ok::<(), CredenceError>(())
//! ```
//!
//! Network-definition storage formats, textual query parsing, and output
//! formatting are external collaborators' concerns; the core consumes and
//! produces only the structured types above.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod definition;
pub mod engine;
pub mod error;
pub mod factor;
pub mod network;
pub mod query;
pub mod reachability;
pub mod relevance;
pub mod variable;

// Re-export primary types at the crate root for convenience
pub use definition::{NetworkDefinition, VariableDefinition};
pub use engine::{answer_elimination_query, EliminationAnswer, VariableElimination};
pub use error::{CredenceError, CredenceResult, InferenceError, ValidationError};
pub use factor::{Factor, OperationResult};
pub use network::Network;
pub use query::{EliminationQuery, IndependenceQuery, Query};
pub use reachability::{answer_independence_query, is_independent};
pub use relevance::prune_irrelevant;
pub use variable::Variable;

//! Query-relevance pruning.
//!
//! Before elimination, hidden variables that cannot affect the query can be
//! stripped from a working copy of the network, shrinking every factor the
//! engine has to build. A hidden variable is irrelevant when it is a leaf,
//! or when it is d-separated from the query variable given the evidence —
//! tested in both argument orders, since the traversal rules are
//! directional and symmetry is checked rather than assumed.
//!
//! The caller's network and query are never touched: pruning deep-copies
//! both and returns the reduced pair.

use std::collections::HashSet;

use tracing::debug;

use crate::error::CredenceResult;
use crate::network::Network;
use crate::query::EliminationQuery;
use crate::reachability;

/// Removes query-irrelevant hidden variables (and their orphaned subtrees)
/// from a copy of the network, dropping them from the returned query's
/// hidden list.
///
/// A subtree is only removed when it contains neither the query variable
/// nor any evidence variable; removal is then pure barren-subtree
/// elimination and cannot change the normalized answer.
///
/// # Errors
///
/// Propagates `NodeNotFound` from the independence traversal.
pub fn prune_irrelevant(
    network: &Network,
    query: &EliminationQuery,
) -> CredenceResult<(Network, EliminationQuery)> {
    let mut working = network.clone();
    let mut reduced = query.clone();
    let evidence = query.evidence_variables();

    for hidden in query.hidden().to_vec() {
        if !working.contains(&hidden) {
            if network.contains(&hidden) {
                // Removed as part of an earlier subtree.
                reduced.remove_hidden(&hidden);
            }
            // A name the caller's network never held is left on the hidden
            // list; the engine reports it as unresolvable.
            continue;
        }

        let is_leaf = working.require(&hidden)?.is_leaf();
        let removable = is_leaf
            || (reachability::is_independent(&working, query.target(), &hidden, &evidence)?
                && reachability::is_independent(&working, &hidden, query.target(), &evidence)?);
        if !removable {
            continue;
        }

        let subtree = descendant_closure(&working, &hidden);
        if subtree
            .iter()
            .any(|name| name == query.target() || evidence.contains(name))
        {
            continue;
        }

        debug!(variable = %hidden, subtree = subtree.len(), "pruning irrelevant variable");
        for name in &subtree {
            working.remove_variable(name);
        }
        reduced.remove_hidden(&hidden);
    }

    Ok((working, reduced))
}

/// The hidden variable together with every variable reachable from it
/// through child edges.
fn descendant_closure(network: &Network, root: &str) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut stack = vec![root.to_string()];
    let mut closure = Vec::new();

    while let Some(name) = stack.pop() {
        if !seen.insert(name.clone()) {
            continue;
        }
        if let Some(variable) = network.get(&name) {
            for child in variable.children() {
                stack.push(child.clone());
            }
        }
        closure.push(name);
    }

    closure
}

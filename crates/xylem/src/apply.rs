//! Driving a route search against real data.
//!
//! [`apply`] runs a greedy search and invokes each attempted edge's
//! converter on the values gathered so far, feeding the outcome back into
//! the search, until every target type has a value.

use crate::graph::ConversionGraph;
use crate::search::{Search, SearchError};
use indexmap::IndexMap;
use std::fmt;
use std::hash::Hash;

/// Counters describing how much work an apply call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyStats {
    /// Edges the search handed out for conversion.
    pub edges_attempted: usize,
    /// Attempted edges whose converter produced at least one value.
    pub edges_succeeded: usize,
}

/// Outcome of a successful [`apply_with_stats`] call.
#[derive(Debug, Clone)]
pub struct ApplyResult<T, V> {
    /// The requested target values, in target order.
    pub values: IndexMap<T, V>,
    /// Work counters.
    pub stats: ApplyStats,
}

/// Convert `sources` into values for every type in `targets`.
///
/// The caller's `sources` map is never mutated; conversions accumulate in a
/// private working copy. Returns the values for exactly the requested
/// targets, or [`SearchError::NoPathFound`] when no sequence of
/// conversions covers them all. Partial results are never returned.
///
/// A converter returning [`ConvertError`](crate::ConvertError) is a
/// recoverable dead end: its edge is abandoned and the search falls back
/// onto other routes.
///
/// # Panics
///
/// Panics if two converters produce unequal values for the same type. That
/// is a defect in the graph's converter set, not a runtime condition, and
/// silently picking one value would hide it.
pub fn apply<T, V>(
    graph: &ConversionGraph<T, V>,
    sources: &IndexMap<T, V>,
    targets: impl IntoIterator<Item = T>,
) -> Result<IndexMap<T, V>, SearchError<T>>
where
    T: Clone + Eq + Hash + fmt::Debug,
    V: Clone + PartialEq + fmt::Debug,
{
    apply_with_stats(graph, sources, targets).map(|r| r.values)
}

/// Like [`apply`], additionally reporting how many edges were attempted
/// and how many of those produced output.
pub fn apply_with_stats<T, V>(
    graph: &ConversionGraph<T, V>,
    sources: &IndexMap<T, V>,
    targets: impl IntoIterator<Item = T>,
) -> Result<ApplyResult<T, V>, SearchError<T>>
where
    T: Clone + Eq + Hash + fmt::Debug,
    V: Clone + PartialEq + fmt::Debug,
{
    let targets: Vec<T> = targets.into_iter().collect();
    let mut data = sources.clone();
    let mut stats = ApplyStats::default();

    let mut search = Search::greedy(graph, data.keys().cloned(), targets.iter().cloned())?;

    while let Some(edge) = search.next_edge()? {
        stats.edges_attempted += 1;

        // A predecessor can be reached without holding a value when an
        // earlier converter under-delivered on its declared successors;
        // such an edge cannot run.
        let inputs: Option<IndexMap<T, V>> = edge
            .preds()
            .iter()
            .map(|p| data.get(p).map(|v| (p.clone(), v.clone())))
            .collect();
        let Some(inputs) = inputs else {
            search.record_result(false);
            continue;
        };

        let produced = edge.convert(&inputs).unwrap_or_default();
        let success = !produced.is_empty();

        for (t, v) in produced {
            match data.get(&t) {
                Some(existing) => {
                    assert_eq!(
                        existing, &v,
                        "converters disagree on the value for type {t:?}"
                    );
                }
                None => {
                    data.insert(t, v);
                }
            }
        }

        stats.edges_succeeded += usize::from(success);
        // Success advances the search by the edge's full declared successor
        // set, even when the output only covered part of it.
        search.record_result(success);
    }

    // The search can mark a target reached that no converter actually
    // produced a value for (declared successors are an upper bound on
    // output). Surface that as unreachable rather than returning a partial
    // mapping.
    let mut values = IndexMap::with_capacity(targets.len());
    let mut missing = Vec::new();
    for t in &targets {
        match data.get(t) {
            Some(v) => {
                values.insert(t.clone(), v.clone());
            }
            None => missing.push(t.clone()),
        }
    }
    if !missing.is_empty() {
        return Err(SearchError::NoPathFound(missing));
    }

    Ok(ApplyResult { values, stats })
}

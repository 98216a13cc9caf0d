//! Route search over the conversion graph.
//!
//! The search is an explicit state machine standing in for a generator:
//! [`Search::next_edge`] picks the next attemptable edge, the driver tries
//! it, and [`Search::record_result`] reports whether the conversion
//! succeeded. A failed edge is abandoned (every edge is attempted at most
//! once) and the search falls back onto whatever other routes remain.

use crate::graph::{ConversionGraph, Edge, TypeSet};
use std::hash::Hash;

/// Errors that can occur while searching for a conversion route.
#[derive(Debug, thiserror::Error)]
pub enum SearchError<T> {
    /// A source type no edge of the graph touches. Such a type can never
    /// participate in any conversion, so the caller handed us a bad set.
    #[error("source types unknown to the conversion graph: {0:?}")]
    InvalidSource(Vec<T>),

    /// Every attemptable edge was tried and some targets are still not
    /// covered. Carries the unreached targets.
    #[error("no conversion route reaches targets: {0:?}")]
    NoPathFound(Vec<T>),
}

/// An in-progress route search.
///
/// One `Search` value owns all per-call state; construct a fresh one per
/// search and never share it. Dropping a search mid-flight abandons it with
/// no side effects.
pub struct Search<'g, T, V> {
    graph: &'g ConversionGraph<T, V>,
    /// Types reached so far. Grows monotonically.
    founds: TypeSet<T>,
    /// Greedy mode stops once all of these are in `founds`; `None` means
    /// exploration (enumerate the full reachable closure).
    targets: Option<TypeSet<T>>,
    /// Indices into the graph's edge list, in declaration order, not yet
    /// attempted.
    unused: Vec<usize>,
    /// Edge handed out by `next_edge` and still awaiting its reply.
    pending: Option<usize>,
}

impl<T: std::fmt::Debug, V> std::fmt::Debug for Search<'_, T, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Search")
            .field("founds", &self.founds)
            .field("targets", &self.targets)
            .field("unused", &self.unused)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl<'g, T, V> Search<'g, T, V>
where
    T: Clone + Eq + Hash,
{
    /// Untargeted search: enumerate every conversion reachable from
    /// `sources`.
    pub fn explore(
        graph: &'g ConversionGraph<T, V>,
        sources: impl IntoIterator<Item = T>,
    ) -> Result<Self, SearchError<T>> {
        Self::with_targets(graph, sources, None)
    }

    /// Targeted search: stop as soon as every type in `targets` is reached.
    pub fn greedy(
        graph: &'g ConversionGraph<T, V>,
        sources: impl IntoIterator<Item = T>,
        targets: impl IntoIterator<Item = T>,
    ) -> Result<Self, SearchError<T>> {
        Self::with_targets(graph, sources, Some(targets.into_iter().collect()))
    }

    fn with_targets(
        graph: &'g ConversionGraph<T, V>,
        sources: impl IntoIterator<Item = T>,
        targets: Option<TypeSet<T>>,
    ) -> Result<Self, SearchError<T>> {
        let founds: TypeSet<T> = sources.into_iter().collect();
        let unknown: Vec<T> = founds
            .iter()
            .filter(|t| !graph.contains_type(t))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(SearchError::InvalidSource(unknown));
        }
        Ok(Self {
            graph,
            founds,
            targets,
            unused: (0..graph.len()).collect(),
            pending: None,
        })
    }

    /// Pick the next edge to attempt.
    ///
    /// Qualifying edges have all predecessors reached and at least one new
    /// successor; ties break by declaration order. The chosen edge is
    /// removed from the unattempted set whatever its outcome. If the
    /// previous edge never got a [`record_result`](Self::record_result)
    /// call, it counts as a success.
    ///
    /// Returns `Ok(None)` on normal termination: for exploration, when the
    /// rest of the graph is unreachable; for greedy search, when the
    /// targets are covered (remaining edges are abandoned unattempted).
    /// Greedy search terminating with targets unmet is
    /// [`SearchError::NoPathFound`].
    pub fn next_edge(&mut self) -> Result<Option<&'g Edge<T, V>>, SearchError<T>> {
        if self.pending.is_some() {
            self.record_result(true);
        }

        if self.targets_met() {
            return Ok(None);
        }

        let graph = self.graph;
        let pos = self.unused.iter().position(|&idx| {
            let edge = &graph.edges()[idx];
            edge.preds().is_subset(&self.founds) && !edge.succs().is_subset(&self.founds)
        });

        match pos {
            Some(pos) => {
                let idx = self.unused.remove(pos);
                self.pending = Some(idx);
                Ok(Some(&graph.edges()[idx]))
            }
            None => match &self.targets {
                Some(targets) => {
                    let missing: Vec<T> = targets.difference(&self.founds).cloned().collect();
                    Err(SearchError::NoPathFound(missing))
                }
                None => Ok(None),
            },
        }
    }

    /// Report whether the conversion for the last yielded edge succeeded.
    ///
    /// On success the edge's full successor set becomes reached; on failure
    /// `founds` is left untouched. Either way the edge is spent. A reply
    /// with no edge outstanding is ignored.
    pub fn record_result(&mut self, success: bool) {
        let Some(idx) = self.pending.take() else {
            return;
        };
        if success {
            let succs = self.graph.edges()[idx].succs();
            self.founds.extend(succs.iter().cloned());
        }
    }

    /// Types reached so far. Once the search terminates this is the full
    /// reachable closure.
    pub fn founds(&self) -> &TypeSet<T> {
        &self.founds
    }

    /// Consume the search, keeping only the reached set.
    pub fn into_founds(self) -> TypeSet<T> {
        self.founds
    }

    /// True in greedy mode once every target is covered. Always false for
    /// exploration.
    pub fn targets_met(&self) -> bool {
        self.targets
            .as_ref()
            .is_some_and(|t| t.is_subset(&self.founds))
    }

    /// Number of edges not yet attempted.
    pub fn unattempted(&self) -> usize {
        self.unused.len()
    }

    /// Drive the search to completion, asking `verdict` whether each
    /// attempted edge's conversion succeeded, and return the final reached
    /// set.
    pub fn run(
        mut self,
        mut verdict: impl FnMut(&Edge<T, V>) -> bool,
    ) -> Result<TypeSet<T>, SearchError<T>> {
        while let Some(edge) = self.next_edge()? {
            let success = verdict(edge);
            self.record_result(success);
        }
        Ok(self.founds)
    }
}

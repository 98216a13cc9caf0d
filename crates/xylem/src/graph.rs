//! The conversion graph: typed edges carrying converters.

use crate::converter::{ConvertError, Converter};
use indexmap::{IndexMap, IndexSet};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// A set of type tokens identifying a node in the conversion graph.
///
/// Insertion-order iteration matters: searches break ties by declaration
/// order, which `IndexSet` preserves.
pub type TypeSet<T> = IndexSet<T>;

/// One edge of the graph: a converter taking `preds` to `succs`.
pub struct Edge<T, V> {
    preds: TypeSet<T>,
    succs: TypeSet<T>,
    converter: Arc<dyn Converter<T, V>>,
}

impl<T, V> Edge<T, V> {
    /// Types this edge's converter requires.
    pub fn preds(&self) -> &TypeSet<T> {
        &self.preds
    }

    /// Types this edge's converter declares to produce.
    pub fn succs(&self) -> &TypeSet<T> {
        &self.succs
    }

    /// Invoke the converter on inputs restricted to `preds`.
    pub fn convert(&self, inputs: &IndexMap<T, V>) -> Result<IndexMap<T, V>, ConvertError> {
        self.converter.convert(inputs)
    }
}

impl<T: Clone, V> Clone for Edge<T, V> {
    fn clone(&self) -> Self {
        Self {
            preds: self.preds.clone(),
            succs: self.succs.clone(),
            converter: Arc::clone(&self.converter),
        }
    }
}

impl<T: fmt::Debug, V> fmt::Debug for Edge<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Edge")
            .field("preds", &self.preds)
            .field("succs", &self.succs)
            .finish_non_exhaustive()
    }
}

/// Graph of available conversions.
///
/// Edges keep declaration order, and searches attempt them in that order.
/// At most one converter exists per (preds, succs) pair: the first declared
/// wins and later duplicates are ignored.
///
/// The graph is read-only for the lifetime of any search over it.
pub struct ConversionGraph<T, V> {
    edges: Vec<Edge<T, V>>,
}

impl<T, V> Default for ConversionGraph<T, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, V> ConversionGraph<T, V> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self { edges: Vec::new() }
    }

    /// All edges in declaration order.
    pub fn edges(&self) -> &[Edge<T, V>] {
        &self.edges
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Check if the graph has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl<T, V> ConversionGraph<T, V>
where
    T: Eq + Hash,
{
    /// Register a conversion from `preds` to `succs`.
    ///
    /// If an edge with the same predecessor and successor sets already
    /// exists, the existing converter is kept and this one is dropped.
    pub fn insert<P, S>(&mut self, preds: P, succs: S, converter: impl Converter<T, V> + 'static)
    where
        P: IntoIterator<Item = T>,
        S: IntoIterator<Item = T>,
    {
        let preds: TypeSet<T> = preds.into_iter().collect();
        let succs: TypeSet<T> = succs.into_iter().collect();
        if self
            .edges
            .iter()
            .any(|e| e.preds == preds && e.succs == succs)
        {
            return;
        }
        self.edges.push(Edge {
            preds,
            succs,
            converter: Arc::new(converter),
        });
    }

    /// Check whether a type appears anywhere in the graph's vocabulary.
    pub fn contains_type(&self, t: &T) -> bool {
        self.edges
            .iter()
            .any(|e| e.preds.contains(t) || e.succs.contains(t))
    }

    /// Union of every predecessor and successor set.
    pub fn vocabulary(&self) -> TypeSet<T>
    where
        T: Clone,
    {
        let mut vocab = TypeSet::new();
        for edge in &self.edges {
            vocab.extend(edge.preds.iter().cloned());
            vocab.extend(edge.succs.iter().cloned());
        }
        vocab
    }
}

impl<T: Clone, V> Clone for ConversionGraph<T, V> {
    fn clone(&self) -> Self {
        Self {
            edges: self.edges.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(
        key: &'static str,
        value: i64,
    ) -> impl Converter<&'static str, i64> + 'static {
        move |_: &IndexMap<&'static str, i64>| Ok(IndexMap::from([(key, value)]))
    }

    #[test]
    fn test_edges_keep_declaration_order() {
        let mut graph = ConversionGraph::new();
        graph.insert(["a"], ["b"], constant("b", 1));
        graph.insert(["a"], ["c"], constant("c", 2));
        graph.insert(["b", "c"], ["d"], constant("d", 3));

        let succs: Vec<_> = graph
            .edges()
            .iter()
            .map(|e| e.succs().iter().copied().collect::<Vec<_>>())
            .collect();
        assert_eq!(succs, vec![vec!["b"], vec!["c"], vec!["d"]]);
    }

    #[test]
    fn test_duplicate_edge_keeps_first_converter() {
        let mut graph = ConversionGraph::new();
        graph.insert(["a"], ["b"], constant("b", 1));
        graph.insert(["a"], ["b"], constant("b", 99));

        assert_eq!(graph.len(), 1);
        let out = graph.edges()[0]
            .convert(&IndexMap::from([("a", 0)]))
            .unwrap();
        assert_eq!(out.get("b"), Some(&1));
    }

    #[test]
    fn test_duplicate_check_ignores_declaration_order_of_types() {
        let mut graph = ConversionGraph::new();
        graph.insert(["a", "b"], ["c"], constant("c", 1));
        // Same pair of sets, spelled in a different order.
        graph.insert(["b", "a"], ["c"], constant("c", 2));

        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_vocabulary_and_contains_type() {
        let mut graph = ConversionGraph::new();
        graph.insert(["a"], ["b"], constant("b", 1));
        graph.insert(["b"], ["c"], constant("c", 2));

        let vocab = graph.vocabulary();
        assert_eq!(vocab.iter().copied().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert!(graph.contains_type(&"a"));
        assert!(!graph.contains_type(&"z"));
    }

    #[test]
    fn test_empty_graph() {
        let graph: ConversionGraph<&str, i64> = ConversionGraph::new();
        assert!(graph.is_empty());
        assert!(graph.vocabulary().is_empty());
    }
}

//! Interference Graph
//!
//! The conflict structure register allocation operates on: an undirected
//! graph over symbolic names (variables and registers) whose edges mean
//! "must not share a physical register". The graph is built once from a
//! known vertex set and only ever grows; there is no removal operation.
//!
//! Symmetry is maintained eagerly: every `add_edge(u, v)` records both
//! directions immediately, so `adjacent` never has to close over edges.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

/// Undirected interference graph over vertices of type `V`.
#[derive(Clone, Debug, Default)]
pub struct InterferenceGraph<V> {
    adjacency: HashMap<V, HashSet<V>>,
}

impl<V> InterferenceGraph<V>
where
    V: Eq + Hash + Clone + fmt::Debug,
{
    /// Create a graph whose adjacency mapping holds every given vertex
    /// with an empty neighbor set. Duplicate vertices overwrite earlier
    /// entries.
    pub fn new(vertices: impl IntoIterator<Item = V>) -> Self {
        let adjacency = vertices
            .into_iter()
            .map(|v| (v, HashSet::new()))
            .collect();
        InterferenceGraph { adjacency }
    }

    /// Add the undirected edge `(u, v)`.
    ///
    /// Both directions are recorded, each as its own insertion. Endpoints
    /// that are not yet vertices start from an empty neighbor set rather
    /// than failing.
    pub fn add_edge(&mut self, u: V, v: V) {
        self.adjacency
            .entry(u.clone())
            .or_default()
            .insert(v.clone());
        self.adjacency.entry(v).or_default().insert(u);
    }

    /// The neighbor set of `v`.
    ///
    /// Panics if `v` is not a vertex; callers are expected to only query
    /// vertices that exist.
    pub fn adjacent(&self, v: &V) -> &HashSet<V> {
        match self.adjacency.get(v) {
            Some(neighbors) => neighbors,
            None => panic!("adjacent: unknown vertex {:?}", v),
        }
    }

    /// Whether `v` is a vertex of the graph.
    pub fn contains(&self, v: &V) -> bool {
        self.adjacency.contains_key(v)
    }

    /// Number of neighbors of `v` (0 for unknown vertices).
    pub fn degree(&self, v: &V) -> usize {
        self.adjacency.get(v).map_or(0, |s| s.len())
    }

    /// Iterate over the vertex set.
    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.adjacency.keys()
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construct_empty_neighbor_sets() {
        let graph = InterferenceGraph::new(["a", "b", "c"]);
        assert_eq!(graph.len(), 3);
        for v in ["a", "b", "c"] {
            assert!(graph.contains(&v));
            assert!(graph.adjacent(&v).is_empty());
        }
    }

    #[test]
    fn test_add_edge_is_symmetric() {
        let mut graph = InterferenceGraph::new(["x", "y", "z"]);
        graph.add_edge("x", "y");

        assert!(graph.adjacent(&"x").contains("y"));
        assert!(graph.adjacent(&"y").contains("x"));
        assert!(graph.adjacent(&"z").is_empty());
    }

    #[test]
    fn test_add_edge_creates_missing_vertices() {
        let mut graph = InterferenceGraph::new(["a"]);
        graph.add_edge("a", "t0");
        graph.add_edge("t1", "t2");

        assert!(graph.contains(&"t0"));
        assert!(graph.adjacent(&"t0").contains("a"));
        assert!(graph.adjacent(&"t1").contains("t2"));
        assert!(graph.adjacent(&"t2").contains("t1"));
        assert_eq!(graph.len(), 4);
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let mut graph = InterferenceGraph::new(["u", "v"]);
        graph.add_edge("u", "v");
        graph.add_edge("u", "v");
        graph.add_edge("v", "u");

        assert_eq!(graph.degree(&"u"), 1);
        assert_eq!(graph.degree(&"v"), 1);
    }

    #[test]
    fn test_self_loop_not_prevented() {
        let mut graph = InterferenceGraph::new(["w"]);
        graph.add_edge("w", "w");
        assert!(graph.adjacent(&"w").contains("w"));
    }

    #[test]
    fn test_degree_of_unknown_vertex_is_zero() {
        let graph: InterferenceGraph<&str> = InterferenceGraph::new([]);
        assert_eq!(graph.degree(&"nowhere"), 0);
        assert!(graph.is_empty());
    }

    #[test]
    #[should_panic(expected = "unknown vertex")]
    fn test_adjacent_panics_on_unknown_vertex() {
        let graph: InterferenceGraph<&str> = InterferenceGraph::new(["a"]);
        graph.adjacent(&"missing");
    }

    #[test]
    fn test_every_edge_symmetric_after_many_insertions() {
        let names: Vec<String> = (0..8).map(|i| format!("t{}", i)).collect();
        let mut graph = InterferenceGraph::new(names.clone());
        for i in 0..names.len() {
            for j in (i + 1)..names.len() {
                if (i + j) % 3 == 0 {
                    graph.add_edge(names[i].clone(), names[j].clone());
                }
            }
        }
        for u in graph.vertices() {
            for v in graph.adjacent(u) {
                assert!(
                    graph.adjacent(v).contains(u),
                    "edge ({:?}, {:?}) missing its mirror",
                    u,
                    v
                );
            }
        }
    }
}

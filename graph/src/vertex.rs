//! Graph vertices.

use std::fmt;

/// Dense handle of a vertex inside one graph.
///
/// Handles are assigned in insertion order and stay valid for the lifetime
/// of the graph; they are meaningless across graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub(crate) usize);

impl VertexId {
    /// Position of the vertex in insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A named node of the graph.
///
/// Only the identity and the adjacency list live here. Tentative weights
/// and back-pointers belong to a single search and are kept in
/// [`SearchState`](crate::search::SearchState).
#[derive(Debug, Clone)]
pub struct Vertex<V> {
    id: V,
    adjacent: Vec<VertexId>,
}

impl<V> Vertex<V> {
    pub(crate) fn new(id: V) -> Self {
        Self {
            id,
            adjacent: Vec::new(),
        }
    }

    /// The application value this vertex represents.
    pub fn id(&self) -> &V {
        &self.id
    }

    /// Neighbors reachable through exactly one edge, in insertion order.
    pub fn adjacent(&self) -> &[VertexId] {
        &self.adjacent
    }

    /// Number of outgoing edges.
    pub fn out_degree(&self) -> usize {
        self.adjacent.len()
    }

    pub(crate) fn add_adjacent(&mut self, vertex: VertexId) {
        self.adjacent.push(vertex);
    }
}

impl<V: PartialEq> PartialEq for Vertex<V> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<V: Eq> Eq for Vertex<V> {}

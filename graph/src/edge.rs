//! Directed, weighted graph edges.

/// Dense handle of an edge inside one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    /// Position of the edge in insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A directed connection between two vertices.
///
/// Identity is the `(source, destination)` pair. The cost only orders the
/// search; the payload is opaque to the graph.
#[derive(Debug, Clone)]
pub struct Edge<V, D> {
    source: V,
    destination: V,
    cost: u32,
    payload: D,
}

impl<V, D> Edge<V, D> {
    pub(crate) fn new(source: V, destination: V, cost: u32, payload: D) -> Self {
        Self {
            source,
            destination,
            cost,
            payload,
        }
    }

    /// Identity of the source vertex.
    pub fn source(&self) -> &V {
        &self.source
    }

    /// Identity of the destination vertex.
    pub fn destination(&self) -> &V {
        &self.destination
    }

    /// Search cost of traversing this edge.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Data attached to the edge.
    pub fn payload(&self) -> &D {
        &self.payload
    }

    pub(crate) fn set_payload(&mut self, payload: D) -> D {
        std::mem::replace(&mut self.payload, payload)
    }
}

impl<V: PartialEq, D> PartialEq for Edge<V, D> {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.destination == other.destination
    }
}

impl<V: Eq, D> Eq for Edge<V, D> {}

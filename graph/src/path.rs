//! Ranked search results and borrowed path views.

use std::sync::Arc;

use crate::edge::{Edge, EdgeId};
use crate::graph::Graph;

/// Number of ranked paths produced by one search.
pub const RANKS: usize = 3;

/// An edge sequence from a search origin to its target, in travel order.
///
/// Routes store edge handles rather than edge copies, so reading one always
/// reflects the current payload of each edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    edges: Vec<EdgeId>,
    cost: u64,
}

impl Route {
    pub(crate) fn new(edges: Vec<EdgeId>, cost: u64) -> Self {
        Self { edges, cost }
    }

    /// A route that does not exist at this rank.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Sum of edge costs along the route.
    pub fn cost(&self) -> u64 {
        self.cost
    }
}

/// The three ranked routes of one `(source, destination)` query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedRoutes {
    routes: [Route; RANKS],
}

impl RankedRoutes {
    pub(crate) fn new(routes: [Route; RANKS]) -> Self {
        Self { routes }
    }

    /// Result for an unknown or unreachable destination.
    pub fn none() -> Self {
        Self::default()
    }

    /// Route at `index` (0 is the best route).
    pub fn get(&self, index: usize) -> Option<&Route> {
        self.routes.get(index)
    }

    pub fn best(&self) -> &Route {
        &self.routes[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// Number of ranks that hold a route.
    pub fn found(&self) -> usize {
        self.routes.iter().filter(|r| !r.is_empty()).count()
    }
}

/// Ranked search results bound to the graph that produced them.
pub struct RankedPaths<'g, V, D> {
    graph: &'g Graph<V, D>,
    routes: Arc<RankedRoutes>,
}

impl<'g, V, D> RankedPaths<'g, V, D> {
    pub(crate) fn new(graph: &'g Graph<V, D>, routes: Arc<RankedRoutes>) -> Self {
        Self { graph, routes }
    }

    /// The rank-1 path. Empty when the destination is unreachable.
    pub fn best(&self) -> Path<'_, V, D> {
        Path::new(self.graph, self.routes.best())
    }

    /// Path at `index` (0 is the best path).
    pub fn get(&self, index: usize) -> Option<Path<'_, V, D>> {
        self.routes.get(index).map(|route| Path::new(self.graph, route))
    }

    /// All three ranks, best first. Missing ranks are empty paths.
    pub fn iter(&self) -> impl Iterator<Item = Path<'_, V, D>> {
        self.routes.iter().map(move |route| Path::new(self.graph, route))
    }

    /// The shared, cached result backing this view.
    pub fn routes(&self) -> &Arc<RankedRoutes> {
        &self.routes
    }
}

/// A single path read through its graph.
pub struct Path<'a, V, D> {
    graph: &'a Graph<V, D>,
    route: &'a Route,
}

impl<'a, V, D> Path<'a, V, D> {
    fn new(graph: &'a Graph<V, D>, route: &'a Route) -> Self {
        Self { graph, route }
    }

    /// Edges in travel order, first hop first.
    pub fn edges(&self) -> impl Iterator<Item = &'a Edge<V, D>> + 'a {
        let graph = self.graph;
        self.route.edges().iter().map(move |&id| graph.edge_at(id))
    }

    pub fn len(&self) -> usize {
        self.route.len()
    }

    pub fn is_empty(&self) -> bool {
        self.route.is_empty()
    }

    /// First hop, leaving the search origin.
    pub fn first(&self) -> Option<&'a Edge<V, D>> {
        self.route.edges().first().map(|&id| self.graph.edge_at(id))
    }

    /// Last hop, arriving at the destination.
    pub fn last(&self) -> Option<&'a Edge<V, D>> {
        self.route.edges().last().map(|&id| self.graph.edge_at(id))
    }

    pub fn total_cost(&self) -> u64 {
        self.route.cost()
    }

    pub fn route(&self) -> &'a Route {
        self.route
    }
}

impl<'a, V: Clone, D> Path<'a, V, D> {
    /// Vertex identities visited, origin first. Empty for an empty path.
    pub fn vertices(&self) -> Vec<V> {
        let mut vertices = Vec::with_capacity(self.len() + 1);
        if let Some(first) = self.first() {
            vertices.push(first.source().clone());
        }
        vertices.extend(self.edges().map(|edge| edge.destination().clone()));
        vertices
    }
}

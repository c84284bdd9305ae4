//! Weighted directed graph with cached ranked path queries.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::cache::{PathCache, PathCacheStats};
use crate::edge::{Edge, EdgeId};
use crate::path::{RankedPaths, RankedRoutes};
use crate::search::ranked_search;
use crate::vertex::{Vertex, VertexId};

/// A directed graph over vertex identities `V` with edge payloads `D`.
///
/// Vertices and edges keep their insertion order and are indexed by
/// identity. Path queries go through a shared [`PathCache`]; cached results
/// are never invalidated, so build the graph completely before querying it
/// and build a new graph to change its data.
pub struct Graph<V, D> {
    vertices: Vec<Vertex<V>>,
    edges: Vec<Edge<V, D>>,
    vertex_index: HashMap<V, VertexId>,
    edge_index: HashMap<(VertexId, VertexId), EdgeId>,
    cache: PathCache<V>,
}

impl<V, D> Graph<V, D>
where
    V: Eq + Hash + Clone + fmt::Debug,
{
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            vertex_index: HashMap::new(),
            edge_index: HashMap::new(),
            cache: PathCache::new(),
        }
    }

    /// Insert the edge `source -> destination`, creating missing vertices.
    ///
    /// Returns false without touching the existing edge when one with the
    /// same `(source, destination)` identity is already present.
    pub fn add_edge(&mut self, source: V, destination: V, cost: u32, payload: D) -> bool {
        let from = self.ensure_vertex(&source);
        let to = self.ensure_vertex(&destination);

        if self.edge_index.contains_key(&(from, to)) {
            trace!(?source, ?destination, "Edge already present");
            return false;
        }

        let id = EdgeId(self.edges.len());
        self.edges.push(Edge::new(source, destination, cost, payload));
        self.edge_index.insert((from, to), id);
        self.vertices[from.0].add_adjacent(to);
        true
    }

    /// Find the three best paths from `source` to `destination`.
    ///
    /// Unknown identities and unreachable destinations produce empty paths.
    /// The first result computed for a key is cached and returned verbatim
    /// by every later query for it.
    pub fn find_shortest_path(&self, source: &V, destination: &V) -> RankedPaths<'_, V, D> {
        if let Some(cached) = self.cache.get(source, destination) {
            debug!(?source, ?destination, "Path cache hit");
            return RankedPaths::new(self, cached);
        }

        let routes = self.search(source, destination);

        debug!(
            ?source,
            ?destination,
            found = routes.found(),
            best_hops = routes.best().len(),
            "Ranked search finished"
        );

        let committed = self
            .cache
            .insert(source.clone(), destination.clone(), routes);
        RankedPaths::new(self, committed)
    }

    /// Run the search without reading or populating the path cache.
    pub fn find_shortest_path_uncached(&self, source: &V, destination: &V) -> RankedPaths<'_, V, D> {
        RankedPaths::new(self, Arc::new(self.search(source, destination)))
    }

    /// Replace the payload of an existing edge, returning the old one.
    ///
    /// Path selection does not depend on payloads, so cached paths stay
    /// valid and read the new payload.
    pub fn set_payload(&mut self, source: &V, destination: &V, payload: D) -> Option<D> {
        let id = self.edge_id(source, destination)?;
        Some(self.edges[id.0].set_payload(payload))
    }

    /// Look up the edge `source -> destination`.
    pub fn edge(&self, source: &V, destination: &V) -> Option<&Edge<V, D>> {
        self.edge_id(source, destination).map(|id| self.edge_at(id))
    }

    pub fn contains_vertex(&self, id: &V) -> bool {
        self.vertex_index.contains_key(id)
    }

    /// Identities reachable from `id` through one edge, in insertion order.
    pub fn neighbors(&self, id: &V) -> Vec<&V> {
        self.vertex_id(id)
            .map(|vertex| {
                self.vertex_at(vertex)
                    .adjacent()
                    .iter()
                    .map(|&next| self.vertex_at(next).id())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get path cache statistics.
    pub fn cache_stats(&self) -> PathCacheStats {
        self.cache.stats()
    }

    fn search(&self, source: &V, destination: &V) -> RankedRoutes {
        match (self.vertex_id(source), self.vertex_id(destination)) {
            (Some(from), Some(to)) => ranked_search(self, from, to),
            _ => RankedRoutes::none(),
        }
    }

    fn ensure_vertex(&mut self, id: &V) -> VertexId {
        if let Some(&vertex) = self.vertex_index.get(id) {
            return vertex;
        }
        let vertex = VertexId(self.vertices.len());
        self.vertices.push(Vertex::new(id.clone()));
        self.vertex_index.insert(id.clone(), vertex);
        vertex
    }

    fn vertex_id(&self, id: &V) -> Option<VertexId> {
        self.vertex_index.get(id).copied()
    }

    fn edge_id(&self, source: &V, destination: &V) -> Option<EdgeId> {
        let from = self.vertex_id(source)?;
        let to = self.vertex_id(destination)?;
        self.edge_between(from, to)
    }
}

impl<V, D> Graph<V, D> {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex<V>> {
        self.vertices.iter()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge<V, D>> {
        self.edges.iter()
    }

    pub(crate) fn vertex_at(&self, id: VertexId) -> &Vertex<V> {
        &self.vertices[id.0]
    }

    pub(crate) fn edge_at(&self, id: EdgeId) -> &Edge<V, D> {
        &self.edges[id.0]
    }

    pub(crate) fn edge_between(&self, from: VertexId, to: VertexId) -> Option<EdgeId> {
        self.edge_index.get(&(from, to)).copied()
    }
}

impl<V, D> Default for Graph<V, D>
where
    V: Eq + Hash + Clone + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug, D> fmt::Debug for Graph<V, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("vertices", &self.vertices.len())
            .field("edges", &self.edges.len())
            .finish()
    }
}

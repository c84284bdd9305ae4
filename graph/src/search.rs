//! Ranked single-source search.
//!
//! A Dijkstra-style relaxation that, besides the shortest path to one
//! destination, keeps the second and third best arrivals at it. All
//! tentative weights and back-pointers live in a [`SearchState`] created for
//! the query, so any number of searches may run against one graph at once.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::edge::EdgeId;
use crate::graph::Graph;
use crate::path::{RankedRoutes, Route, RANKS};
use crate::vertex::VertexId;

const UNREACHED: u64 = u64::MAX;

/// Scratch space of one search, indexed by vertex handle.
#[derive(Debug, Clone)]
pub struct SearchState {
    weights: Vec<u64>,
    previous: Vec<Option<(VertexId, EdgeId)>>,
    settled: Vec<bool>,
}

impl SearchState {
    /// Fresh state: the origin at weight zero, everything else unreached and
    /// without back-pointers.
    pub fn new(vertex_count: usize, origin: VertexId) -> Self {
        let mut weights = vec![UNREACHED; vertex_count];
        weights[origin.0] = 0;
        Self {
            weights,
            previous: vec![None; vertex_count],
            settled: vec![false; vertex_count],
        }
    }

    /// Best known weight of `vertex`, or `None` while it is unreached.
    pub fn weight(&self, vertex: VertexId) -> Option<u64> {
        match self.weights[vertex.0] {
            UNREACHED => None,
            weight => Some(weight),
        }
    }

    /// Back-pointer of `vertex`.
    pub fn previous(&self, vertex: VertexId) -> Option<VertexId> {
        self.previous[vertex.0].map(|(vertex, _)| vertex)
    }

    pub fn is_settled(&self, vertex: VertexId) -> bool {
        self.settled[vertex.0]
    }

    fn relax(&mut self, vertex: VertexId, via: VertexId, edge: EdgeId, weight: u64) {
        self.weights[vertex.0] = weight;
        self.previous[vertex.0] = Some((via, edge));
    }

    fn settle(&mut self, vertex: VertexId) {
        self.settled[vertex.0] = true;
    }

    /// Edges from the origin to `vertex`, first hop first.
    fn route_to(&self, vertex: VertexId) -> Vec<EdgeId> {
        let mut edges = Vec::new();
        let mut current = vertex;
        while let Some((previous, edge)) = self.previous[current.0] {
            edges.push(edge);
            current = previous;
        }
        edges.reverse();
        edges
    }
}

/// One arrival at the destination: the settled vertex it came from, the
/// final hop and the total cost.
#[derive(Debug, Clone, Copy)]
struct Arrival {
    via: VertexId,
    edge: EdgeId,
    cost: u64,
}

/// The best distinct arrivals seen so far, best first.
#[derive(Debug, Default)]
struct Ranking {
    slots: [Option<Arrival>; RANKS],
}

impl Ranking {
    fn cost(&self, rank: usize) -> u64 {
        self.slots[rank].map_or(UNREACHED, |arrival| arrival.cost)
    }

    /// Rank an arrival. Returns true when it became the new best.
    ///
    /// Every arrival comes from a distinct settled vertex whose chain never
    /// passes the destination, since the destination is expanded last.
    fn offer(&mut self, arrival: Arrival) -> bool {
        if arrival.cost < self.cost(0) {
            self.slots.rotate_right(1);
            self.slots[0] = Some(arrival);
            return true;
        }

        if arrival.cost > self.cost(0) && arrival.cost < self.cost(1) {
            self.slots[2] = self.slots[1];
            self.slots[1] = Some(arrival);
        } else if arrival.cost > self.cost(1) && arrival.cost < self.cost(2) {
            self.slots[2] = Some(arrival);
        }
        false
    }

    fn into_routes(self, state: &SearchState) -> RankedRoutes {
        RankedRoutes::new(self.slots.map(|slot| match slot {
            Some(arrival) => {
                let mut edges = state.route_to(arrival.via);
                edges.push(arrival.edge);
                Route::new(edges, arrival.cost)
            }
            None => Route::empty(),
        }))
    }
}

/// Run the ranked search from `origin` to `destination`.
///
/// The destination is never expanded while any other frontier vertex is
/// pending, so arrivals from every reachable vertex get ranked. Unreached
/// vertices are never expanded.
pub(crate) fn ranked_search<V, D>(
    graph: &Graph<V, D>,
    origin: VertexId,
    destination: VertexId,
) -> RankedRoutes {
    if origin == destination {
        return RankedRoutes::none();
    }

    let mut state = SearchState::new(graph.vertex_count(), origin);
    let mut ranking = Ranking::default();
    let mut frontier = BinaryHeap::new();
    let mut sequence = 0u64;
    frontier.push(Reverse((0u64, sequence, origin)));

    loop {
        let current = match pop_frontier(&mut frontier, &state) {
            Some(vertex) => vertex,
            None if state.weight(destination).is_some() && !state.is_settled(destination) => {
                destination
            }
            None => break,
        };
        state.settle(current);
        let base = state.weights[current.0];

        for &next in graph.vertex_at(current).adjacent() {
            if state.is_settled(next) {
                continue;
            }
            let Some(edge) = graph.edge_between(current, next) else {
                continue;
            };
            let weight = base.saturating_add(u64::from(graph.edge_at(edge).cost()));

            if next == destination {
                let arrival = Arrival {
                    via: current,
                    edge,
                    cost: weight,
                };
                if ranking.offer(arrival) {
                    state.relax(next, current, edge, weight);
                }
            } else if weight < state.weights[next.0] {
                state.relax(next, current, edge, weight);
                sequence += 1;
                frontier.push(Reverse((weight, sequence, next)));
            }
        }
    }

    ranking.into_routes(&state)
}

/// Pop the lightest live frontier entry, skipping stale ones.
fn pop_frontier(
    frontier: &mut BinaryHeap<Reverse<(u64, u64, VertexId)>>,
    state: &SearchState,
) -> Option<VertexId> {
    while let Some(Reverse((weight, _, vertex))) = frontier.pop() {
        if !state.is_settled(vertex) && weight == state.weights[vertex.0] {
            return Some(vertex);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_starts_clean() {
        let state = SearchState::new(3, VertexId(1));

        assert_eq!(state.weight(VertexId(1)), Some(0));
        assert_eq!(state.weight(VertexId(0)), None);
        assert_eq!(state.previous(VertexId(2)), None);
        assert!(!state.is_settled(VertexId(1)));
    }

    #[test]
    fn test_route_follows_back_pointers() {
        let mut state = SearchState::new(3, VertexId(0));
        state.relax(VertexId(1), VertexId(0), EdgeId(5), 1);
        state.relax(VertexId(2), VertexId(1), EdgeId(7), 2);

        assert_eq!(state.route_to(VertexId(2)), vec![EdgeId(5), EdgeId(7)]);
        assert_eq!(state.previous(VertexId(2)), Some(VertexId(1)));
        assert_eq!(state.previous(VertexId(0)), None);
    }

    #[test]
    fn test_ranking_demotes_on_improvement() {
        let mut ranking = Ranking::default();
        let arrival = |via, cost| Arrival {
            via: VertexId(via),
            edge: EdgeId(via),
            cost,
        };

        assert!(ranking.offer(arrival(1, 5)));
        assert!(ranking.offer(arrival(2, 3)));
        assert!(!ranking.offer(arrival(0, 4)));

        assert_eq!(ranking.cost(0), 3);
        assert_eq!(ranking.cost(1), 4);
        assert_eq!(ranking.cost(2), 5);
    }

    #[test]
    fn test_ranking_drops_equal_cost() {
        let mut ranking = Ranking::default();
        let arrival = |via, cost| Arrival {
            via: VertexId(via),
            edge: EdgeId(via),
            cost,
        };

        ranking.offer(arrival(1, 2));
        ranking.offer(arrival(2, 2));

        assert_eq!(ranking.cost(0), 2);
        assert_eq!(ranking.cost(1), UNREACHED);
    }
}

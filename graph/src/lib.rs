//! RateBridge Graph
//!
//! Generic weighted directed graph with a ranked shortest-path search.
//!
//! # Features
//!
//! - Identity-keyed vertices and edges carrying an opaque payload
//! - Dijkstra-style search returning the three best distinct paths
//! - Concurrent path cache shared by every caller of the graph
//! - Search scratch state isolated per query
//!
//! # Example
//!
//! ```rust
//! use ratebridge_graph::Graph;
//!
//! let mut graph: Graph<&str, f64> = Graph::new();
//! graph.add_edge("USD", "CAD", 1, 1.34);
//! graph.add_edge("CAD", "GBP", 1, 0.58);
//!
//! let paths = graph.find_shortest_path(&"USD", &"GBP");
//! let best = paths.best();
//! assert_eq!(best.len(), 2);
//! assert_eq!(best.vertices(), vec!["USD", "CAD", "GBP"]);
//! ```

pub mod vertex;
pub mod edge;
pub mod graph;
pub mod search;
pub mod cache;
pub mod path;

pub use vertex::{Vertex, VertexId};
pub use edge::{Edge, EdgeId};
pub use graph::Graph;
pub use cache::{PathCache, PathCacheStats};
pub use path::{Path, RankedPaths, RankedRoutes, Route, RANKS};

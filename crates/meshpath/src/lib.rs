//! Graph pathfinding over meshes of nodes that can be baked once or mutated
//! at runtime.
//!
//! - [`Mesh`] owns the nodes, hands out [`NodeId`] handles and keeps
//!   neighbour links consistent as nodes are added and removed.
//! - [`GridBake`] wires a rectangular grid into a static mesh.
//! - [`Pathfinder`] runs shortest-path searches driven by an
//!   [`IndexedHeap`], either to completion or one expansion at a time
//!   through [`PathSearch`].
//!
//! Search state (costs, parents, open/closed) lives in a [`SearchScratch`]
//! owned by the pathfinder, never on the nodes, so any number of
//! pathfinders can query the same `&Mesh`.
//!
//! The default [`Heuristic::LastEdge`] ranks ties by the cost of the last
//! step and returns the cheapest path only when every edge costs the same.
//! For weighted meshes configure [`Heuristic::Distance`] through
//! [`SearchConfig`].
//!
//! # Example
//!
//! ```
//! use meshpath::{GridBake, Pathfinder};
//! use meshpath_core::{Point, Range};
//!
//! let grid = GridBake::new(Range::new(0, 0, 3, 3)).bake(|p| p != Point::new(1, 1));
//! let start = grid.node_at(Point::new(0, 0)).unwrap();
//! let goal = grid.node_at(Point::new(2, 2)).unwrap();
//!
//! let path = Pathfinder::new().find_path(grid.mesh(), start, goal).unwrap();
//! assert_eq!(path.cost(), 4);
//! assert_eq!(path.len(), 5);
//! ```

mod bake;
mod config;
mod error;
pub mod heap;
mod mesh;
mod node;
mod scratch;
mod search;
mod traits;

pub use bake::{BakedGrid, Connectivity, GridBake};
pub use config::{Heuristic, SearchConfig};
pub use error::{HeapError, MeshError, PathError};
pub use heap::{HeapKey, IndexedHeap};
pub use mesh::{Bake, Mesh};
pub use node::{MeshId, Node, NodeId};
pub use scratch::{NodeState, Priority, SearchScratch};
pub use search::{Path, PathSearch, Pathfinder, Step, find_path};
pub use traits::Position;

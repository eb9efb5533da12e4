//! Shortest-path search over a [`Mesh`].
//!
//! A [`Pathfinder`] owns the open set and the per-node scratch records, so
//! repeated queries reuse their allocations. Each query either runs to
//! completion ([`Pathfinder::find_path`]) or is driven one expansion at a
//! time through a [`PathSearch`], which lets callers spread a long search
//! over several frames or abandon it.

use crate::config::{Heuristic, SearchConfig};
use crate::error::PathError;
use crate::heap::IndexedHeap;
use crate::mesh::{Mesh, edge_cost};
use crate::node::NodeId;
use crate::scratch::{NodeState, Priority, SearchScratch};
use crate::traits::Position;

/// An ordered route from a start node to a destination node, both included.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    nodes: Vec<NodeId>,
    cost: u32,
}

impl Path {
    #[inline]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Sum of the edge costs along the path.
    #[inline]
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Number of nodes, endpoints included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn start(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// Position data of every node on the path, in order. Nodes removed
    /// from `mesh` since the search are skipped.
    pub fn positions<'m, T>(&self, mesh: &'m Mesh<T>) -> Vec<&'m T> {
        self.nodes.iter().filter_map(|&id| mesh.data(id)).collect()
    }

    pub fn into_nodes(self) -> Vec<NodeId> {
        self.nodes
    }
}

/// Progress report from [`PathSearch::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The node was closed and its neighbours relaxed.
    Expanded(NodeId),
    /// The search is over; [`PathSearch::finish`] returns the outcome.
    Finished,
}

/// Reusable shortest-path engine.
#[derive(Debug, Default)]
pub struct Pathfinder {
    config: SearchConfig,
    open: IndexedHeap<NodeId, Priority>,
    scratch: SearchScratch,
}

impl Pathfinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SearchConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[inline]
    pub fn config(&self) -> SearchConfig {
        self.config
    }

    pub fn set_config(&mut self, config: SearchConfig) {
        self.config = config;
    }

    /// Costs, parents and visit states left by the last search.
    #[inline]
    pub fn scratch(&self) -> &SearchScratch {
        &self.scratch
    }

    /// Find a path from `start` to `destination` in `mesh`.
    ///
    /// The path is the cheapest one when the configured heuristic is
    /// [`Heuristic::Distance`], or with the default
    /// [`Heuristic::LastEdge`] on graphs where every edge costs the same.
    /// On weighted graphs the default may settle for a dearer path.
    ///
    /// Fails with a precondition error if the endpoints coincide or are not
    /// live members of `mesh`, and with [`PathError::NoPath`] if the
    /// destination is unreachable.
    pub fn find_path<T: Position>(
        &mut self,
        mesh: &Mesh<T>,
        start: NodeId,
        destination: NodeId,
    ) -> Result<Path, PathError> {
        self.search(mesh, start, destination)?.finish()
    }

    /// Validate the query, reset the scratch state and return a search
    /// positioned before its first expansion.
    pub fn search<'a, T: Position>(
        &'a mut self,
        mesh: &'a Mesh<T>,
        start: NodeId,
        destination: NodeId,
    ) -> Result<PathSearch<'a, T>, PathError> {
        if start == destination {
            return Err(PathError::SameNode(start));
        }
        mesh.check(start)?;
        mesh.check(destination)?;

        mesh.reset_nodes(&mut self.scratch);
        self.open.clear();
        self.scratch.record_mut(start).state = NodeState::Open;
        self.open.insert(start, Priority::default())?;

        log::debug!(
            "search {start} -> {destination} over mesh {} ({} nodes, {:?})",
            mesh.id(),
            mesh.size(),
            self.config.heuristic
        );

        Ok(PathSearch {
            mesh,
            finder: self,
            start,
            destination,
            expanded: 0,
            outcome: None,
        })
    }
}

/// One in-progress query. Borrowing the mesh for its whole life keeps the
/// graph from changing under the search.
#[derive(Debug)]
pub struct PathSearch<'a, T> {
    mesh: &'a Mesh<T>,
    finder: &'a mut Pathfinder,
    start: NodeId,
    destination: NodeId,
    expanded: usize,
    outcome: Option<Result<Path, PathError>>,
}

impl<'a, T: Position> PathSearch<'a, T> {
    /// Number of nodes closed so far.
    #[inline]
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Scratch state as of the last step.
    #[inline]
    pub fn scratch(&self) -> &SearchScratch {
        &self.finder.scratch
    }

    /// Expand at most one node.
    pub fn step(&mut self) -> Step {
        if self.outcome.is_some() {
            return Step::Finished;
        }
        match self.advance() {
            Ok(Some(id)) => Step::Expanded(id),
            Ok(None) => Step::Finished,
            Err(err) => {
                if let PathError::HeapInvariant(heap_err) = err {
                    log::error!(
                        "search {} -> {}: {heap_err}",
                        self.start,
                        self.destination
                    );
                    debug_assert!(false, "open set corrupted: {heap_err}");
                }
                self.outcome = Some(Err(err));
                Step::Finished
            }
        }
    }

    /// Run the search to completion and return its outcome.
    pub fn finish(mut self) -> Result<Path, PathError> {
        while let Step::Expanded(_) = self.step() {}
        let outcome = self.outcome.take().unwrap_or(Err(PathError::NoPath {
            start: self.start,
            destination: self.destination,
        }));
        match &outcome {
            Ok(path) => log::debug!(
                "search {} -> {}: {} nodes, cost {}, {} expansions",
                self.start,
                self.destination,
                path.len(),
                path.cost(),
                self.expanded
            ),
            Err(err) => log::debug!(
                "search {} -> {}: {err} after {} expansions",
                self.start,
                self.destination,
                self.expanded
            ),
        }
        outcome
    }

    // Ok(Some(id)) after closing `id`; Ok(None) once `outcome` is set.
    fn advance(&mut self) -> Result<Option<NodeId>, PathError> {
        let mesh = self.mesh;
        let config = self.finder.config;
        let Pathfinder { open, scratch, .. } = &mut *self.finder;

        if open.is_empty() {
            self.outcome = Some(Err(PathError::NoPath {
                start: self.start,
                destination: self.destination,
            }));
            return Ok(None);
        }
        let (current, _) = open.extract_min()?;
        if current == self.destination {
            scratch.record_mut(current).state = NodeState::Closed;
            self.outcome = Some(retrace(mesh, scratch, self.start, self.destination));
            return Ok(None);
        }
        // Reaching the destination is not an expansion, so the limit only
        // applies to nodes that would be expanded.
        if config.max_expansions.is_some_and(|limit| self.expanded >= limit) {
            return Err(PathError::ExpansionLimit {
                expanded: self.expanded,
            });
        }

        scratch.record_mut(current).state = NodeState::Closed;
        self.expanded += 1;
        log::trace!("expand {current} g={}", scratch.g_cost(current));

        let node = mesh.node(current).ok_or(PathError::NotInMesh(current))?;
        let goal = mesh
            .node(self.destination)
            .ok_or(PathError::NotInMesh(self.destination))?;
        let current_g = scratch.g_cost(current);

        for &next in node.neighbours() {
            let Some(next_node) = mesh.node(next) else {
                continue;
            };
            if !next_node.is_available() || scratch.state(next) == NodeState::Closed {
                continue;
            }

            let edge = edge_cost(node, next_node);
            let tentative = current_g.saturating_add(edge);
            let queued = open.contains(next);
            if queued && tentative >= scratch.g_cost(next) {
                continue;
            }

            let h = match config.heuristic {
                Heuristic::LastEdge => edge,
                Heuristic::Distance => next_node.data().distance(goal.data()),
            };
            let r = scratch.record_mut(next);
            r.g = tentative;
            r.h = h;
            r.parent = Some(current);
            r.state = NodeState::Open;

            let priority = Priority { g: tentative, h };
            if queued {
                open.resift(next, priority)?;
            } else {
                open.insert(next, priority)?;
            }
        }

        Ok(Some(current))
    }
}

impl<T: Position> Iterator for PathSearch<'_, T> {
    type Item = NodeId;

    /// Yields each expanded node; ends when the search finishes.
    fn next(&mut self) -> Option<NodeId> {
        match self.step() {
            Step::Expanded(id) => Some(id),
            Step::Finished => None,
        }
    }
}

fn retrace<T>(
    mesh: &Mesh<T>,
    scratch: &SearchScratch,
    start: NodeId,
    destination: NodeId,
) -> Result<Path, PathError> {
    let mut nodes = vec![destination];
    let mut current = destination;
    while current != start {
        // A parent chain longer than the mesh means the records are corrupt.
        let parent = scratch
            .parent(current)
            .filter(|_| nodes.len() <= mesh.capacity())
            .ok_or(PathError::NoPath { start, destination })?;
        nodes.push(parent);
        current = parent;
    }
    nodes.reverse();
    Ok(Path {
        nodes,
        cost: scratch.g_cost(destination),
    })
}

/// One-shot convenience wrapper around [`Pathfinder::find_path`] with the
/// default configuration.
///
/// The default [`Heuristic::LastEdge`] only guarantees the cheapest path
/// when all edges cost the same. Use a [`Pathfinder`] configured with
/// [`Heuristic::Distance`] for weighted meshes.
pub fn find_path<T: Position>(
    mesh: &Mesh<T>,
    start: NodeId,
    destination: NodeId,
) -> Result<Path, PathError> {
    Pathfinder::new().find_path(mesh, start, destination)
}

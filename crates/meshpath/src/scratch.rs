use std::cmp::Ordering;

use crate::node::{MeshId, NodeId};

/// Where a node stands in the current search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeState {
    #[default]
    Unvisited,
    /// Discovered and queued; its cost may still improve.
    Open,
    /// Finalized; never reopened.
    Closed,
}

/// Heap key of a queued node: ordered by `g + h`, ties broken by the
/// smaller `h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Priority {
    pub g: u32,
    pub h: u32,
}

impl Priority {
    #[inline]
    pub fn f(&self) -> u32 {
        self.g.saturating_add(self.h)
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f()
            .cmp(&other.f())
            .then(self.h.cmp(&other.h))
            .then(self.g.cmp(&other.g))
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Record {
    pub(crate) g: u32,
    pub(crate) h: u32,
    pub(crate) parent: Option<NodeId>,
    pub(crate) state: NodeState,
    generation: u32,
}

/// Per-query search state, kept apart from the mesh.
///
/// Records are indexed by node slot and stamped with a generation, so a
/// reset only bumps a counter instead of rewriting every record. Nodes whose
/// record carries an older stamp read as zero cost, no parent, unvisited.
#[derive(Debug, Clone, Default)]
pub struct SearchScratch {
    mesh: Option<MeshId>,
    records: Vec<Record>,
    generation: u32,
}

impl SearchScratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated cost from the start, or 0 if `id` was not reached.
    pub fn g_cost(&self, id: NodeId) -> u32 {
        self.record(id).map_or(0, |r| r.g)
    }

    /// Secondary priority term of `id`, or 0 if `id` was not reached.
    pub fn h_cost(&self, id: NodeId) -> u32 {
        self.record(id).map_or(0, |r| r.h)
    }

    /// `g_cost + h_cost`.
    pub fn f_cost(&self, id: NodeId) -> u32 {
        self.g_cost(id).saturating_add(self.h_cost(id))
    }

    /// The node `id` was reached from in the last search.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.record(id).and_then(|r| r.parent)
    }

    pub fn state(&self, id: NodeId) -> NodeState {
        self.record(id).map_or(NodeState::Unvisited, |r| r.state)
    }

    pub(crate) fn reset(&mut self, mesh: MeshId, capacity: usize) {
        self.mesh = Some(mesh);
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Stamps wrapped around: old records could look current.
            for r in self.records.iter_mut() {
                *r = Record::default();
            }
            self.generation = 1;
        }
        if self.records.len() < capacity {
            self.records.resize(capacity, Record::default());
        }
    }

    /// Record for `id`, reinitialized if it is stale.
    pub(crate) fn record_mut(&mut self, id: NodeId) -> &mut Record {
        let slot = id.slot();
        if slot >= self.records.len() {
            self.records.resize(slot + 1, Record::default());
        }
        let current = self.generation;
        let r = &mut self.records[slot];
        if r.generation != current {
            *r = Record {
                generation: current,
                ..Record::default()
            };
        }
        r
    }

    fn record(&self, id: NodeId) -> Option<&Record> {
        if self.mesh != Some(id.mesh()) {
            return None;
        }
        self.records
            .get(id.slot())
            .filter(|r| r.generation == self.generation)
    }
}

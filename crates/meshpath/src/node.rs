use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::heap::HeapKey;

static NEXT_MESH_ID: AtomicU32 = AtomicU32::new(1);

/// Identity of a [`Mesh`](crate::Mesh). Unique within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeshId(u32);

impl MeshId {
    pub(crate) fn next() -> Self {
        Self(NEXT_MESH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for MeshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// Handle to a node inside a mesh.
///
/// The handle names its owning mesh, so a query can tell a foreign node
/// from a local one without the node pointing back at the mesh. The
/// generation makes handles to removed nodes stale even once their slot is
/// reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId {
    pub(crate) mesh: MeshId,
    pub(crate) slot: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    /// The mesh this node was created in.
    #[inline]
    pub fn mesh(&self) -> MeshId {
        self.mesh
    }

    /// Dense slot index inside the owning mesh.
    #[inline]
    pub fn slot(&self) -> usize {
        self.slot as usize
    }
}

impl HeapKey for NodeId {
    #[inline]
    fn key_index(&self) -> usize {
        self.slot as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}v{}", self.mesh, self.slot, self.generation)
    }
}

/// Persistent state of one mesh node.
///
/// Search bookkeeping (costs, parent, open/closed) is not stored here;
/// it lives in [`SearchScratch`](crate::SearchScratch).
#[derive(Debug, Clone)]
pub struct Node<T> {
    pub(crate) data: T,
    pub(crate) base_cost: u32,
    pub(crate) available: bool,
    pub(crate) neighbours: Vec<NodeId>,
}

impl<T> Node<T> {
    pub(crate) fn new(data: T) -> Self {
        Self {
            data,
            base_cost: 0,
            available: true,
            neighbours: Vec::new(),
        }
    }

    /// Owner-defined position/identity data.
    #[inline]
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Extra cost paid for entering this node.
    #[inline]
    pub fn base_cost(&self) -> u32 {
        self.base_cost
    }

    /// Unavailable nodes are never expanded nor queued by a search.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.available
    }

    #[inline]
    pub fn neighbours(&self) -> &[NodeId] {
        &self.neighbours
    }

    #[inline]
    pub fn has_neighbour(&self, id: NodeId) -> bool {
        self.neighbours.contains(&id)
    }

    // Returns false if the link already existed.
    pub(crate) fn add_neighbour(&mut self, id: NodeId) -> bool {
        if self.has_neighbour(id) {
            return false;
        }
        self.neighbours.push(id);
        true
    }

    pub(crate) fn remove_neighbour(&mut self, id: NodeId) -> bool {
        let before = self.neighbours.len();
        self.neighbours.retain(|&n| n != id);
        self.neighbours.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(slot: u32) -> NodeId {
        NodeId {
            mesh: MeshId(0),
            slot,
            generation: 0,
        }
    }

    #[test]
    fn mesh_ids_are_unique() {
        let a = MeshId::next();
        let b = MeshId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn neighbour_set_ignores_duplicates() {
        let mut n = Node::new(());
        assert!(n.add_neighbour(id(1)));
        assert!(!n.add_neighbour(id(1)));
        assert!(n.add_neighbour(id(2)));
        assert_eq!(n.neighbours(), &[id(1), id(2)]);
        assert!(n.remove_neighbour(id(1)));
        assert!(!n.remove_neighbour(id(1)));
        assert_eq!(n.neighbours(), &[id(2)]);
    }

    #[test]
    fn new_node_is_available_and_free() {
        let n = Node::new(7u8);
        assert!(n.is_available());
        assert_eq!(n.base_cost(), 0);
        assert_eq!(*n.data(), 7);
    }

    #[test]
    fn display_names_mesh_slot_and_generation() {
        let n = NodeId {
            mesh: MeshId(3),
            slot: 5,
            generation: 2,
        };
        assert_eq!(n.to_string(), "m3:5v2");
    }
}

//! The node container searched by a [`Pathfinder`](crate::Pathfinder).
//!
//! A [`Mesh`] owns its nodes in a slot arena and hands out generation-checked
//! [`NodeId`] handles. Every membership change notifies the remaining members,
//! so neighbour lists never hold a handle to a node that is gone.

use crate::error::MeshError;
use crate::node::{MeshId, Node, NodeId};
use crate::scratch::SearchScratch;
use crate::traits::Position;

/// How a mesh wires adjacency when nodes join it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bake {
    /// Adjacency is wired explicitly, once, by whoever populates the mesh
    /// (see [`GridBake`](crate::GridBake)). Adding a node links it only to
    /// the neighbours it is given.
    #[default]
    Static,
    /// Freely placed nodes. A new node is additionally linked, both ways, to
    /// every member whose position lies within `link_range` of it.
    Dynamic { link_range: u32 },
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    node: Option<Node<T>>,
}

/// A graph of nodes carrying position data `T`.
#[derive(Debug, Clone)]
pub struct Mesh<T> {
    id: MeshId,
    bake: Bake,
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Mesh<T> {
    /// Create an empty mesh using the given bake strategy.
    pub fn new(bake: Bake) -> Self {
        Self {
            id: MeshId::next(),
            bake,
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Empty mesh with [`Bake::Static`] wiring.
    pub fn static_bake() -> Self {
        Self::new(Bake::Static)
    }

    /// Empty mesh with [`Bake::Dynamic`] wiring.
    pub fn dynamic(link_range: u32) -> Self {
        Self::new(Bake::Dynamic { link_range })
    }

    #[inline]
    pub fn id(&self) -> MeshId {
        self.id
    }

    #[inline]
    pub fn bake(&self) -> Bake {
        self.bake
    }

    /// Number of member nodes.
    #[inline]
    pub fn size(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots ever allocated. Every live [`NodeId::slot`] is below
    /// this bound.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Whether `id` names a live member of this mesh.
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.check(id).is_ok()
    }

    /// Validate that `id` is a live member of this mesh.
    pub fn check(&self, id: NodeId) -> Result<(), MeshError> {
        if id.mesh != self.id {
            return Err(MeshError::ForeignMesh {
                node: id,
                expected: self.id,
                found: id.mesh,
            });
        }
        match self.slots.get(id.slot()) {
            Some(slot) if slot.generation == id.generation && slot.node.is_some() => Ok(()),
            _ => Err(MeshError::NotInMesh(id)),
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.check(id).ok()?;
        self.slots[id.slot()].node.as_ref()
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node<T>, MeshError> {
        self.check(id)?;
        self.slots[id.slot()]
            .node
            .as_mut()
            .ok_or(MeshError::NotInMesh(id))
    }

    /// Position data of `id`.
    pub fn data(&self, id: NodeId) -> Option<&T> {
        self.node(id).map(Node::data)
    }

    /// Neighbours of `id`; empty if `id` is not a member.
    pub fn neighbours(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::neighbours).unwrap_or(&[])
    }

    /// Iterate over every member and its node.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node<T>)> + '_ {
        self.slots.iter().enumerate().filter_map(move |(i, slot)| {
            slot.node.as_ref().map(|node| (self.make_id(i, slot.generation), node))
        })
    }

    /// Iterate over every member handle.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes().map(|(id, _)| id)
    }

    /// Mark `id` as available or blocked for future searches.
    pub fn set_available(&mut self, id: NodeId, available: bool) -> Result<(), MeshError> {
        self.node_mut(id)?.available = available;
        Ok(())
    }

    /// Set the penalty paid for entering `id`.
    pub fn set_base_cost(&mut self, id: NodeId, base_cost: u32) -> Result<(), MeshError> {
        self.node_mut(id)?.base_cost = base_cost;
        Ok(())
    }

    /// Link `a` and `b` in both directions. Returns `false` if they were
    /// already linked.
    pub fn link(&mut self, a: NodeId, b: NodeId) -> Result<bool, MeshError> {
        self.check(a)?;
        self.check(b)?;
        if a == b {
            return Err(MeshError::SelfLink(a));
        }
        let added_ab = self.node_mut(a)?.add_neighbour(b);
        let added_ba = self.node_mut(b)?.add_neighbour(a);
        log::trace!("mesh {}: link {a} <-> {b}", self.id);
        Ok(added_ab || added_ba)
    }

    /// Remove the link between `a` and `b` in both directions. Returns
    /// `false` if they were not linked.
    pub fn unlink(&mut self, a: NodeId, b: NodeId) -> Result<bool, MeshError> {
        self.check(a)?;
        self.check(b)?;
        let removed_ab = self.node_mut(a)?.remove_neighbour(b);
        let removed_ba = self.node_mut(b)?.remove_neighbour(a);
        Ok(removed_ab || removed_ba)
    }

    /// Deregister `id` and return its position data.
    ///
    /// Every remaining member is notified and drops `id` from its neighbour
    /// list, whether or not the removed node listed it in return.
    pub fn remove_node(&mut self, id: NodeId) -> Result<T, MeshError> {
        self.check(id)?;
        let slot = &mut self.slots[id.slot()];
        let node = slot.node.take().ok_or(MeshError::NotInMesh(id))?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.slot);
        self.len -= 1;

        let mut pruned = 0usize;
        for slot in self.slots.iter_mut() {
            if let Some(member) = slot.node.as_mut() {
                if member.remove_neighbour(id) {
                    pruned += 1;
                }
            }
        }
        log::trace!(
            "mesh {}: removed {id}, pruned {pruned} neighbour links",
            self.id
        );
        Ok(node.data)
    }

    /// Clear per-node search state in `scratch` for every member: costs are
    /// zeroed and parents/visit states forgotten.
    ///
    /// Touches neither neighbours, availability, nor position data.
    /// Idempotent.
    pub fn reset_nodes(&self, scratch: &mut SearchScratch) {
        scratch.reset(self.id, self.capacity());
    }

    // Bake-time linking of handles the caller just allocated.
    pub(crate) fn wire(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        for (from, to) in [(a, b), (b, a)] {
            if let Some(node) = self.slots.get_mut(from.slot()).and_then(|s| s.node.as_mut()) {
                node.add_neighbour(to);
            }
        }
    }

    fn make_id(&self, slot: usize, generation: u32) -> NodeId {
        NodeId {
            mesh: self.id,
            slot: slot as u32,
            generation,
        }
    }

    // Registers without notifying members; callers wire links themselves.
    pub(crate) fn alloc(&mut self, node: Node<T>) -> NodeId {
        self.len += 1;
        if let Some(slot) = self.free.pop() {
            let entry = &mut self.slots[slot as usize];
            entry.node = Some(node);
            let generation = entry.generation;
            return self.make_id(slot as usize, generation);
        }
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        self.make_id(self.slots.len() - 1, 0)
    }
}

impl<T: Position> Mesh<T> {
    /// Register a new node.
    ///
    /// With [`Bake::Dynamic`] every member within `link_range` is linked to
    /// it; with [`Bake::Static`] it starts without neighbours.
    pub fn add_node(&mut self, data: T) -> NodeId {
        let id = self.alloc(Node::new(data));
        self.notify_added(id);
        log::trace!("mesh {}: added {id}", self.id);
        id
    }

    /// Register a new node linked both ways to `neighbours`, then notify the
    /// other members as [`add_node`](Self::add_node) does.
    ///
    /// All neighbour handles are validated before anything is inserted.
    pub fn add_node_with(&mut self, data: T, neighbours: &[NodeId]) -> Result<NodeId, MeshError> {
        for &n in neighbours {
            self.check(n)?;
        }
        let id = self.alloc(Node::new(data));
        for &n in neighbours {
            self.link(id, n)?;
        }
        self.notify_added(id);
        log::trace!(
            "mesh {}: added {id} with {} explicit neighbours",
            self.id,
            neighbours.len()
        );
        Ok(id)
    }

    /// Price of stepping from `from` to `to`: their distance plus the base
    /// cost of `to`. The nodes need not be adjacent.
    pub fn cost_to_node(&self, from: NodeId, to: NodeId) -> Result<u32, MeshError> {
        let a = self.node(from).ok_or(MeshError::NotInMesh(from))?;
        let b = self.node(to).ok_or(MeshError::NotInMesh(to))?;
        Ok(edge_cost(a, b))
    }

    // Let existing members adopt the new node when the bake strategy says
    // it is theirs too.
    fn notify_added(&mut self, id: NodeId) {
        let Bake::Dynamic { link_range } = self.bake else {
            return;
        };
        let Some(new_node) = self.node(id) else {
            return;
        };
        let in_range: Vec<NodeId> = self
            .nodes()
            .filter(|&(other, node)| {
                other != id && node.data.distance(&new_node.data) <= link_range
            })
            .map(|(other, _)| other)
            .collect();
        for other in in_range {
            if let Err(err) = self.link(id, other) {
                log::warn!("mesh {}: could not link {id} to {other}: {err}", self.id);
            }
        }
    }
}

#[inline]
pub(crate) fn edge_cost<T: Position>(from: &Node<T>, to: &Node<T>) -> u32 {
    from.data.distance(&to.data).saturating_add(to.base_cost)
}

//! Static bake of a rectangular grid into a [`Mesh<Point>`].

use meshpath_core::{Point, Range};

use crate::mesh::Mesh;
use crate::node::{Node, NodeId};

/// Which grid cells count as adjacent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Connectivity {
    /// Cardinal neighbours only.
    #[default]
    Four,
    /// Cardinal and diagonal neighbours.
    ///
    /// Edges are priced by the Manhattan metric of [`Point`], so a diagonal
    /// step costs 2, the same as two cardinal steps. Diagonals never make a
    /// path cheaper; they only let it slip past wall corners that would
    /// otherwise seal it in.
    Eight,
}

impl Connectivity {
    fn neighbours(self, p: Point) -> impl Iterator<Item = Point> {
        let all = p.neighbors_8();
        let cardinal_only = self == Connectivity::Four;
        // neighbors_8 alternates cardinal (even) and diagonal (odd) entries.
        all.into_iter()
            .enumerate()
            .filter(move |(i, _)| !cardinal_only || i % 2 == 0)
            .map(|(_, n)| n)
    }
}

/// Builder that turns a grid rectangle into a statically wired mesh.
///
/// Every cell becomes a node. Cells rejected by the walkability predicate
/// are still nodes, but start unavailable, so they can be toggled later
/// without re-baking.
#[derive(Debug, Clone, Copy)]
pub struct GridBake {
    range: Range,
    connectivity: Connectivity,
}

impl GridBake {
    pub fn new(range: Range) -> Self {
        Self {
            range,
            connectivity: Connectivity::Four,
        }
    }

    pub fn connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Bake with every cell at base cost 0.
    pub fn bake(&self, walkable: impl Fn(Point) -> bool) -> BakedGrid {
        self.bake_weighted(walkable, |_| 0)
    }

    /// Bake with a per-cell base cost.
    pub fn bake_weighted(
        &self,
        walkable: impl Fn(Point) -> bool,
        base_cost: impl Fn(Point) -> u32,
    ) -> BakedGrid {
        let mut mesh = Mesh::static_bake();
        let mut cells = Vec::with_capacity(self.range.len());
        let mut blocked = 0usize;

        for p in self.range.iter() {
            let mut node = Node::new(p);
            node.available = walkable(p);
            node.base_cost = base_cost(p);
            if !node.available {
                blocked += 1;
            }
            cells.push(mesh.alloc(node));
        }

        // Each pair is wired once, from the cell that comes first.
        for (i, p) in self.range.iter().enumerate() {
            for n in self.connectivity.neighbours(p) {
                if let Some(j) = self.range.index_of(n) {
                    if j > i {
                        mesh.wire(cells[i], cells[j]);
                    }
                }
            }
        }

        log::debug!(
            "baked {} grid {}: {} nodes, {} blocked",
            match self.connectivity {
                Connectivity::Four => "4-way",
                Connectivity::Eight => "8-way",
            },
            self.range,
            cells.len(),
            blocked
        );

        BakedGrid {
            mesh,
            range: self.range,
            cells,
        }
    }
}

/// A baked grid mesh plus the cell → node lookup.
#[derive(Debug, Clone)]
pub struct BakedGrid {
    mesh: Mesh<Point>,
    range: Range,
    cells: Vec<NodeId>,
}

impl BakedGrid {
    #[inline]
    pub fn mesh(&self) -> &Mesh<Point> {
        &self.mesh
    }

    /// Mutable access for toggling availability, costs, or removing cells.
    #[inline]
    pub fn mesh_mut(&mut self) -> &mut Mesh<Point> {
        &mut self.mesh
    }

    pub fn into_mesh(self) -> Mesh<Point> {
        self.mesh
    }

    #[inline]
    pub fn range(&self) -> Range {
        self.range
    }

    /// Node baked for `p`, if `p` is in range and the node was not removed.
    pub fn node_at(&self, p: Point) -> Option<NodeId> {
        let id = *self.cells.get(self.range.index_of(p)?)?;
        self.mesh.contains_node(id).then_some(id)
    }

    /// Grid position of `id`.
    pub fn point_of(&self, id: NodeId) -> Option<Point> {
        self.mesh.data(id).copied()
    }
}

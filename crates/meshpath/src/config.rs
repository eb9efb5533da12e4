/// How a search fills in the secondary priority term (`h`) of a node it
/// relaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Heuristic {
    /// `h` is the cost of the edge just traversed. Nodes are expanded in
    /// nearly uniform-cost order, with cheap last steps preferred on ties.
    /// Optimal whenever all edges cost the same.
    #[default]
    LastEdge,
    /// `h` is the position distance from the node to the destination, which
    /// makes the search goal-directed. Optimal as long as
    /// [`Position::distance`](crate::Position::distance) obeys the triangle
    /// inequality.
    Distance,
}

/// Tunables for a [`Pathfinder`](crate::Pathfinder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    pub heuristic: Heuristic,
    /// Give up with [`PathError::ExpansionLimit`](crate::PathError) after
    /// closing this many nodes. `None` searches until the open set drains.
    pub max_expansions: Option<usize>,
}

impl SearchConfig {
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = Some(limit);
        self
    }
}

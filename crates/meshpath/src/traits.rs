use meshpath_core::Point;

/// Position data carried by a mesh node.
///
/// The mesh never interprets positions itself; it only asks for distances
/// when pricing an edge, when deciding proximity links for
/// [`Bake::Dynamic`](crate::Bake::Dynamic), and for the goal-distance
/// heuristic.
pub trait Position {
    /// Distance from `self` to `other`.
    ///
    /// Must be deterministic. For [`Heuristic::Distance`](crate::Heuristic)
    /// to return optimal paths it must also obey the triangle inequality.
    fn distance(&self, other: &Self) -> u32;
}

/// Grid positions use Manhattan distance, so cardinal steps cost 1.
impl Position for Point {
    #[inline]
    fn distance(&self, other: &Self) -> u32 {
        self.manhattan(*other)
    }
}

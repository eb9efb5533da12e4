use thiserror::Error;

use crate::node::{MeshId, NodeId};

/// Internal-consistency violations of an [`IndexedHeap`](crate::IndexedHeap).
///
/// None of these occur while the heap is driven correctly; seeing one means
/// the caller's bookkeeping is corrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    #[error("heap: item with key index {0} is already present")]
    DuplicateInsert(usize),
    #[error("heap: extract from an empty heap")]
    Empty,
    #[error("heap: item with key index {0} is not present")]
    Missing(usize),
}

/// Errors returned by [`Mesh`](crate::Mesh) mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MeshError {
    #[error("node {0} is not a member of this mesh")]
    NotInMesh(NodeId),
    #[error("node {node} belongs to mesh {found}, not mesh {expected}")]
    ForeignMesh {
        node: NodeId,
        expected: MeshId,
        found: MeshId,
    },
    #[error("node {0} cannot be linked to itself")]
    SelfLink(NodeId),
}

/// Errors returned by a path search.
///
/// [`SameNode`](Self::SameNode), [`ForeignMesh`](Self::ForeignMesh) and
/// [`NotInMesh`](Self::NotInMesh) are caller misuse and are reported before
/// any search work happens. [`NoPath`](Self::NoPath) is an ordinary outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("start and destination are the same node {0}")]
    SameNode(NodeId),
    #[error("node {node} belongs to mesh {found}, not mesh {expected}")]
    ForeignMesh {
        node: NodeId,
        expected: MeshId,
        found: MeshId,
    },
    #[error("node {0} is not a member of the searched mesh")]
    NotInMesh(NodeId),
    #[error("no path from {start} to {destination}")]
    NoPath { start: NodeId, destination: NodeId },
    #[error("search gave up after expanding {expanded} nodes")]
    ExpansionLimit { expanded: usize },
    #[error("open set corrupted: {0}")]
    HeapInvariant(#[from] HeapError),
}

impl PathError {
    /// Whether the error reports a malformed query rather than a search
    /// outcome.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::SameNode(_) | Self::ForeignMesh { .. } | Self::NotInMesh(_)
        )
    }
}

impl From<MeshError> for PathError {
    fn from(err: MeshError) -> Self {
        match err {
            MeshError::NotInMesh(node) => Self::NotInMesh(node),
            MeshError::SelfLink(node) => Self::SameNode(node),
            MeshError::ForeignMesh {
                node,
                expected,
                found,
            } => Self::ForeignMesh {
                node,
                expected,
                found,
            },
        }
    }
}

use std::error::Error;
use std::fmt;

/// Returned by [`RbTree::add`](crate::RbTree::add) when the tree rejects
/// duplicates and an equal key is already stored. Carries the refused payload
/// back to the caller untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected<T>(pub T);

impl<T> Rejected<T> {
    /// Recovers the payload that was refused.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an equal key is already present")
    }
}

impl<T: fmt::Debug> Error for Rejected<T> {}

/// A structural invariant found broken by [`RbTree::audit`](crate::RbTree::audit).
///
/// Node numbers are arena slots; they are only meaningful for debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    /// The shared leaf sentinel was recolored, linked or given a payload.
    LeafSentinelTouched,
    /// The root is Red.
    RootNotBlack,
    /// The root has a parent link.
    RootHasParent,
    /// The end sentinel is not the right-most node.
    EndNotRightmost,
    /// A child does not point back at its parent.
    BrokenParentLink {
        /// Slot of the child.
        node: usize,
    },
    /// A Red node has a Red child.
    RedRed {
        /// Slot of the Red child.
        node: usize,
    },
    /// The two subtrees of a node have different black-heights.
    BlackHeight {
        /// Slot of the node.
        node: usize,
        /// Black-height through the left child.
        left: usize,
        /// Black-height through the right child.
        right: usize,
    },
    /// In-order neighbours compare in the wrong order.
    Unordered {
        /// In-order position of the second element of the bad pair.
        position: usize,
    },
    /// The number of reachable nodes disagrees with the recorded length.
    LengthMismatch {
        /// Elements reachable from the root.
        counted: usize,
        /// Elements the tree believes it holds.
        expected: usize,
    },
}

impl fmt::Display for AuditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditError::LeafSentinelTouched => f.write_str("leaf sentinel was modified"),
            AuditError::RootNotBlack => f.write_str("root is red"),
            AuditError::RootHasParent => f.write_str("root has a parent"),
            AuditError::EndNotRightmost => f.write_str("end sentinel is not the right-most node"),
            AuditError::BrokenParentLink { node } => {
                write!(f, "node {} does not link back to its parent", node)
            }
            AuditError::RedRed { node } => write!(f, "red node {} has a red parent", node),
            AuditError::BlackHeight { node, left, right } => write!(
                f,
                "black-height mismatch under node {}: left {} vs right {}",
                node, left, right
            ),
            AuditError::Unordered { position } => {
                write!(f, "elements out of order at position {}", position)
            }
            AuditError::LengthMismatch { counted, expected } => write!(
                f,
                "counted {} elements but length is {}",
                counted, expected
            ),
        }
    }
}

impl Error for AuditError {}

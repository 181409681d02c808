use std::fmt;

/// Errors reported by [`RbTree`](crate::RbTree) operations.
///
/// None of these leave the tree in a modified state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Memory for the tree or a new node could not be reserved.
    AllocationFailure,
    /// A [`NodeId`](crate::NodeId) does not name a live node of the tree.
    InvalidArgument,
    /// The key is not present in the tree.
    NotFound,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailure => write!(f, "memory allocation failed"),
            Self::InvalidArgument => {
                write!(f, "node handle does not name a live node")
            }
            Self::NotFound => write!(f, "key not found"),
        }
    }
}

impl std::error::Error for Error {}

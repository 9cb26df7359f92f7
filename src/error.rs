//! The two-kind error taxonomy shared by every public operation (spec §7).

use core::fmt;

/// Everything a public operation in this crate can fail with.
///
/// Collapses to exactly the two kinds spec §7 defines: [`GraphError::InvalidArgument`]
/// for caller preconditions the library can cheaply check (null/out-of-range
/// ids, undersized capacity, a cycle found during topological sort), and
/// [`GraphError::OperationFailed`] for legitimate resource/state denials
/// (push to a full container, pop from an empty one, no such edge, pool
/// exhaustion). Nothing here is retried internally; the caller decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    /// A caller precondition was violated.
    InvalidArgument(InvalidArgument),
    /// The precondition held but the operation could not be completed.
    OperationFailed(OperationFailed),
}

/// The specific precondition that was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidArgument {
    /// A vertex id does not refer to a live vertex.
    VertexNotLive,
    /// `addEdge(v, v)` was attempted.
    SelfEdge,
    /// `getVertexEdges`'s `expected_degree` did not match the vertex's actual degree.
    DegreeMismatch,
    /// A capacity or buffer-sizing argument was smaller than required.
    CapacityTooSmall,
    /// A structural consistency check (`validate`) found a violated invariant.
    InvariantViolated,
    /// A topological sort was requested on an undirected graph, or found a cycle.
    NotATopologicalOrder,
    /// A traversal state's captured graph generation no longer matches the
    /// graph (the graph was mutated after the state was created).
    StaleGeneration,
}

/// The specific resource/state denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationFailed {
    /// The pool/heap/graph capacity is exhausted.
    Exhausted,
    /// `pop`/`peek` was called on an empty container.
    Empty,
    /// `removeEdge` found no matching edge.
    NoSuchEdge,
    /// Topological sort was attempted on an undirected graph.
    RequiresDirectedGraph,
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::InvalidArgument(kind) => write!(f, "invalid argument: {kind}"),
            GraphError::OperationFailed(kind) => write!(f, "operation failed: {kind}"),
        }
    }
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            InvalidArgument::VertexNotLive => "vertex id does not refer to a live vertex",
            InvalidArgument::SelfEdge => "self-edges are not permitted",
            InvalidArgument::DegreeMismatch => "expected_degree did not match the vertex's actual degree",
            InvalidArgument::CapacityTooSmall => "supplied capacity is smaller than required",
            InvalidArgument::InvariantViolated => "structural invariant violated",
            InvalidArgument::NotATopologicalOrder => "graph contains a cycle or is not directed",
            InvalidArgument::StaleGeneration => "traversal state was created for an earlier graph generation",
        };
        f.write_str(msg)
    }
}

impl fmt::Display for OperationFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            OperationFailed::Exhausted => "container is at capacity",
            OperationFailed::Empty => "container is empty",
            OperationFailed::NoSuchEdge => "no matching edge to remove",
            OperationFailed::RequiresDirectedGraph => "topological sort requires a directed graph",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for GraphError {}

impl From<InvalidArgument> for GraphError {
    fn from(kind: InvalidArgument) -> Self {
        GraphError::InvalidArgument(kind)
    }
}

impl From<OperationFailed> for GraphError {
    fn from(kind: OperationFailed) -> Self {
        GraphError::OperationFailed(kind)
    }
}

/// Convenience alias used throughout the crate's public API.
pub type GraphResult<T> = Result<T, GraphError>;

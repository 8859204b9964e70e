//! Read-only access to diagram data
//!
//! Layout and rendering only ever read a diagram; edits go through the
//! owning type's draft API. This trait is the read side that layout
//! algorithms are generic over.

/// Core trait for diagram data
///
/// The associated types let each diagram kind expose its own node and edge
/// records.
pub trait Database {
    /// Identifier type of a node
    type Id: Copy + Eq + std::hash::Hash + std::fmt::Debug;

    /// The node data type for this database
    type Node;

    /// The edge data type for this database
    type Edge;

    /// Get a node by ID
    fn get_node(&self, id: Self::Id) -> Option<&Self::Node>;

    /// Iterate over all nodes, in their significant order
    fn nodes(&self) -> impl Iterator<Item = &Self::Node>;

    /// Iterate over all edges
    fn edges(&self) -> impl Iterator<Item = &Self::Edge>;

    /// Get the number of nodes
    fn node_count(&self) -> usize;

    /// Get the number of edges
    fn edge_count(&self) -> usize;
}

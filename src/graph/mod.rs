//! Graph representation for PPI networks

pub mod adjacency;

pub use adjacency::{Graph, NodeId, Subgraph};

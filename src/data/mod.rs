//! Input handling for interaction networks

pub mod edgelist;

pub use edgelist::{parse_edge_list, read_edge_list};

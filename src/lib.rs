//! Core library for detecting protein complexes in PPI networks
//!
//! Four density-based clustering heuristics (COACH, DPCLUS, IPCA, MCODE)
//! over a shared string-interned adjacency graph.

pub mod config;
pub mod data;
pub mod graph;
pub mod cluster;
pub mod error;
pub mod storage;

pub use anyhow::{Result, anyhow};
pub use error::GraphError;

//! Complex detection strategies and their shared types

pub mod coach;
pub mod dpclus;
pub mod ipca;
pub mod mcode;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::graph::{Graph, NodeId};

pub use coach::Coach;
pub use dpclus::Dpclus;
pub use ipca::Ipca;
pub use mcode::Mcode;

/// One predicted protein complex
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cluster {
    /// Position of this cluster in its run's result collection
    pub id: u32,

    /// Member node indices, ascending
    pub members: Vec<NodeId>,

    /// Number of members
    pub size: usize,

    /// Fraction of possible undirected edges realized within the members
    pub density: f64,
}

impl Cluster {
    /// Freeze a member set into a cluster, computing its density
    pub fn from_members(id: u32, members: BTreeSet<NodeId>, graph: &Graph) -> Self {
        let density = member_density(graph, &members);
        Self {
            id,
            size: members.len(),
            members: members.into_iter().collect(),
            density,
        }
    }

    /// Resolve member indices back to their input identifiers
    pub fn labels<'g>(&self, graph: &'g Graph) -> Vec<&'g str> {
        self.members.iter().map(|&n| graph.label(n)).collect()
    }
}

/// Density of a node subset: actual / potential undirected edges
///
/// Singleton (and empty) sets report 1.0 by convention.
pub fn member_density(graph: &Graph, members: &BTreeSet<NodeId>) -> f64 {
    let n = members.len();
    if n <= 1 {
        return 1.0;
    }

    let internal_edges: usize = members
        .iter()
        .map(|&v| graph.neighbors(v).intersection(members).count())
        .sum::<usize>()
        / 2;

    2.0 * internal_edges as f64 / (n * (n - 1)) as f64
}

/// A complex-detection algorithm over one owned graph
///
/// Each implementation owns its graph and the result collection of its last
/// run. Persistence is a free function over the collection
/// ([`crate::storage::save_clusters`]), not part of the strategy contract.
pub trait ClusteringStrategy {
    /// Short lowercase algorithm name, used for logging and output files
    fn name(&self) -> &'static str;

    /// The graph this strategy operates on
    fn graph(&self) -> &Graph;

    /// Run the algorithm, storing and returning the detected clusters
    ///
    /// `verbose` emits per-cluster progress through the `log` facade; the
    /// emitted text is informational only.
    fn cluster(&mut self, verbose: bool) -> &[Cluster];

    /// Clusters from the most recent run (empty before the first run)
    fn clusters(&self) -> &[Cluster];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_counts_undirected_edges_once() {
        let g = Graph::from_edges(vec![("A", "B"), ("B", "C"), ("C", "A"), ("C", "D")]);
        let triangle: BTreeSet<NodeId> = [0, 1, 2].into_iter().collect();
        assert_eq!(member_density(&g, &triangle), 1.0);

        let all: BTreeSet<NodeId> = [0, 1, 2, 3].into_iter().collect();
        // 4 of 6 possible edges
        assert!((member_density(&g, &all) - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn singleton_density_is_one() {
        let g = Graph::from_edges(vec![("A", "B")]);
        let single: BTreeSet<NodeId> = [0].into_iter().collect();
        assert_eq!(member_density(&g, &single), 1.0);
    }

    #[test]
    fn cluster_members_are_sorted() {
        let g = Graph::from_edges(vec![("A", "B"), ("B", "C"), ("C", "A")]);
        let members: BTreeSet<NodeId> = [2, 0, 1].into_iter().collect();
        let c = Cluster::from_members(0, members, &g);
        assert_eq!(c.members, vec![0, 1, 2]);
        assert_eq!(c.size, 3);
        assert_eq!(c.labels(&g), vec!["A", "B", "C"]);
    }
}

//! MCODE molecular complex detection
//!
//! Bader and Hogue, "An automated method for finding molecular complexes in
//! large protein interaction networks" (BMC Bioinformatics, 2003). Stage one
//! weights each vertex by the highest k-core of its closed neighborhood;
//! stage two grows complexes from the heaviest unvisited seeds and trims
//! them back to a 2-core.

use std::collections::BTreeSet;

use crate::cluster::{Cluster, ClusteringStrategy};
use crate::config::McodeParams;
use crate::graph::{Graph, NodeId};

/// MCODE strategy instance
pub struct Mcode {
    graph: Graph,
    params: McodeParams,
    clusters: Vec<Cluster>,
}

/// Density of a node subset by the average-degree formula,
/// `avg_deg / (n - 1)`; degenerate sizes report 1.0
fn core_density(graph: &Graph, core: &BTreeSet<NodeId>) -> f64 {
    let n = core.len();
    if n <= 1 {
        return 1.0;
    }
    let avg_deg = core
        .iter()
        .map(|&v| graph.neighbors(v).intersection(core).count())
        .sum::<usize>() as f64
        / n as f64;
    avg_deg / (n - 1) as f64
}

/// Stage one: weight every vertex by its neighborhood's highest k-core
///
/// The closed neighborhood is peeled at increasing degree thresholds until
/// it empties; the last non-empty core at level `k` gives the weight
/// `(k - 1) * density(core)`. Neighborhoods of two or fewer nodes weigh 1.0.
fn vertex_weights(graph: &Graph) -> Vec<f64> {
    let mut weights = vec![1.0; graph.node_count()];

    for v in graph.nodes() {
        let mut neighborhood = graph.closed_neighborhood(v);
        if neighborhood.len() <= 2 {
            continue;
        }

        let mut k = 1usize;
        let mut last_core = BTreeSet::new();
        let mut last_k = 1usize;
        while !neighborhood.is_empty() {
            last_core = neighborhood.clone();
            last_k = k;
            // peel nodes of degree <= k until the remainder stabilizes
            loop {
                let invalid: Vec<NodeId> = neighborhood
                    .iter()
                    .copied()
                    .filter(|&n| {
                        graph.neighbors(n).intersection(&neighborhood).count() <= k
                    })
                    .collect();
                if invalid.is_empty() {
                    break;
                }
                for n in invalid {
                    neighborhood.remove(&n);
                }
                if neighborhood.is_empty() {
                    break;
                }
            }
            k += 1;
        }

        weights[v as usize] =
            (last_k - 1) as f64 * core_density(graph, &last_core);
    }
    weights
}

impl Mcode {
    pub fn new(graph: Graph) -> Self {
        Self::with_params(graph, McodeParams::default())
    }

    pub fn with_params(graph: Graph, params: McodeParams) -> Self {
        Self {
            graph,
            params,
            clusters: Vec::new(),
        }
    }
}

impl ClusteringStrategy for Mcode {
    fn name(&self) -> &'static str {
        "mcode"
    }

    fn graph(&self) -> &Graph {
        &self.graph
    }

    fn cluster(&mut self, verbose: bool) -> &[Cluster] {
        let graph = &self.graph;
        let weights = vertex_weights(graph);
        log::info!("mcode: weighted {} vertices", graph.node_count());

        // heaviest seeds first, ties to the earlier-seen node
        let mut seed_order: Vec<NodeId> = graph.nodes().collect();
        seed_order.sort_by(|&a, &b| {
            weights[b as usize]
                .total_cmp(&weights[a as usize])
                .then(a.cmp(&b))
        });

        let mut unvisited: BTreeSet<NodeId> = graph.nodes().collect();
        let mut clusters: Vec<Cluster> = Vec::new();

        for seed in seed_order {
            if !unvisited.contains(&seed) {
                continue;
            }

            // absorb unvisited neighbors whose weight stays within the
            // threshold band of the seed's weight
            let cutoff =
                weights[seed as usize] * (1.0 - self.params.weight_threshold);
            let mut cluster: BTreeSet<NodeId> = BTreeSet::new();
            let mut frontier: BTreeSet<NodeId> = BTreeSet::from([seed]);
            while !frontier.is_empty() {
                cluster.extend(frontier.iter().copied());
                for f in &frontier {
                    unvisited.remove(f);
                }
                frontier = frontier
                    .iter()
                    .flat_map(|&f| graph.neighbors(f).iter().copied())
                    .filter(|n| {
                        unvisited.contains(n) && weights[*n as usize] > cutoff
                    })
                    .collect();
            }

            // haircut: keep only the 2-core
            loop {
                let invalid: Vec<NodeId> = cluster
                    .iter()
                    .copied()
                    .filter(|&n| graph.neighbors(n).intersection(&cluster).count() < 2)
                    .collect();
                if invalid.is_empty() {
                    break;
                }
                for n in invalid {
                    cluster.remove(&n);
                }
                if cluster.is_empty() {
                    break;
                }
            }

            if !cluster.is_empty() {
                if verbose {
                    log::debug!(
                        "mcode: cluster {} with {} members, seed {}",
                        clusters.len(),
                        cluster.len(),
                        graph.label(seed)
                    );
                }
                clusters.push(Cluster::from_members(
                    clusters.len() as u32,
                    cluster,
                    graph,
                ));
            }
        }

        log::info!("mcode: found {} complexes", clusters.len());
        self.clusters = clusters;
        &self.clusters
    }

    fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clique_vertices_weigh_two() {
        // 4-clique: highest peelable core is k = 3 with density 1.0
        let g = Graph::from_edges(vec![
            ("A", "B"),
            ("A", "C"),
            ("A", "D"),
            ("B", "C"),
            ("B", "D"),
            ("C", "D"),
        ]);
        for w in vertex_weights(&g) {
            assert!((w - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn small_neighborhoods_weigh_one() {
        let g = Graph::from_edges(vec![("A", "B")]);
        assert_eq!(vertex_weights(&g), vec![1.0, 1.0]);
    }

    #[test]
    fn haircut_strips_the_pendant() {
        let g = Graph::from_edges(vec![("A", "B"), ("B", "C"), ("C", "A"), ("C", "D")]);
        let mut mcode = Mcode::new(g);
        let clusters = mcode.cluster(false);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].members, vec![0, 1, 2]);
        assert_eq!(clusters[0].density, 1.0);
    }

    #[test]
    fn graphs_without_a_two_core_yield_nothing() {
        let g = Graph::from_edges(vec![("A", "B"), ("A", "C")]);
        let mut mcode = Mcode::new(g);
        assert!(mcode.cluster(false).is_empty());
    }

    #[test]
    fn empty_graph_yields_no_clusters() {
        let mut mcode = Mcode::new(Graph::default());
        assert!(mcode.cluster(false).is_empty());
    }

    #[test]
    fn runs_are_deterministic() {
        let edges = vec![
            ("A", "B"),
            ("B", "C"),
            ("C", "A"),
            ("C", "D"),
            ("D", "E"),
            ("E", "C"),
        ];
        let mut first = Mcode::new(Graph::from_edges(edges.clone()));
        let mut second = Mcode::new(Graph::from_edges(edges));
        assert_eq!(first.cluster(false), second.cluster(false));
    }
}

//! COACH core-attachment clustering
//!
//! Wu, Li, Kwoh and Ng, "A core-attachment based method to detect protein
//! complexes in PPI networks" (BMC Bioinformatics, 2009). For every node the
//! algorithm extracts its ego network, peels it down to a dense core via
//! recursive core removal, refines the core to the density threshold, drops
//! redundant cores by NA-score similarity, and finally attaches closely
//! connected peripheral proteins.

use std::collections::{BTreeSet, HashSet};

use crate::cluster::{Cluster, ClusteringStrategy};
use crate::config::CoachParams;
use crate::graph::{Graph, NodeId, Subgraph};

/// COACH strategy instance
pub struct Coach {
    graph: Graph,
    params: CoachParams,
    clusters: Vec<Cluster>,
}

/// Squared-intersection-over-product similarity between two node sets
fn na_score(a: &BTreeSet<NodeId>, b: &BTreeSet<NodeId>) -> f64 {
    let inter = a.intersection(b).count() as f64;
    inter * inter / (a.len() as f64 * b.len() as f64)
}

/// Recursively peel core nodes off a subgraph until the remainder is dense
///
/// Returns one or more owned candidate subgraphs. A graph that already meets
/// the density threshold (or has at most one node) is returned unchanged.
/// Otherwise the core nodes are removed, the remainder is partitioned into
/// connected components (merged to a fixpoint on neighbor-set overlap), each
/// component is recursed on, and the removed core nodes are re-linked into
/// every recursive result.
fn core_removal(threshold: f64, graph: &Subgraph) -> Vec<Subgraph> {
    if graph.len() <= 1 {
        return vec![graph.clone()];
    }

    let (avg_deg, density) = graph.stats();
    if density >= threshold {
        return vec![graph.clone()];
    }

    let core_nodes = graph.core_nodes(avg_deg);

    // partition the non-core remainder by remaining-neighbor overlap
    let mut components: Vec<BTreeSet<NodeId>> = Vec::new();
    for (v, neighbors) in graph.iter() {
        if core_nodes.contains(&v) {
            continue;
        }
        let remaining: BTreeSet<NodeId> =
            neighbors.difference(&core_nodes).copied().collect();
        match components.iter_mut().find(|c| !remaining.is_disjoint(c)) {
            Some(c) => c.extend(remaining),
            None => {
                let mut c = remaining;
                c.insert(v);
                components.push(c);
            }
        }
    }

    // merge overlapping components to a fixpoint
    let mut merged = true;
    while merged {
        merged = false;
        let mut i = 0;
        while i < components.len() {
            let mut j = i + 1;
            while j < components.len() {
                if !components[i].is_disjoint(&components[j]) {
                    let taken = components.remove(j);
                    components[i].extend(taken);
                    merged = true;
                } else {
                    j += 1;
                }
            }
            i += 1;
        }
    }

    let mut result = Vec::new();
    for component in components {
        let restricted = graph.restrict(&component);
        let mut sub_results = core_removal(threshold, &restricted);
        for sub in &mut sub_results {
            let nodes = sub.node_set();
            // re-link each surviving node to the core nodes it touched
            for &v in &nodes {
                let back: BTreeSet<NodeId> = graph
                    .neighbors(v)
                    .map(|n| n.intersection(&core_nodes).copied().collect())
                    .unwrap_or_default();
                if let Some(nb) = sub.neighbors_mut(v) {
                    nb.extend(back);
                }
            }
            // re-insert the core nodes themselves, restricted to this branch
            let universe: BTreeSet<NodeId> =
                nodes.union(&core_nodes).copied().collect();
            for &c in &core_nodes {
                let nb: BTreeSet<NodeId> = graph
                    .neighbors(c)
                    .map(|n| n.intersection(&universe).copied().collect())
                    .unwrap_or_default();
                sub.insert(c, nb);
            }
        }
        result.append(&mut sub_results);
    }
    result
}

/// Remove minimum-degree nodes (ties to the lowest index) until the
/// subgraph meets the density threshold or shrinks to a single node
fn trim_to_density(sg: &mut Subgraph, threshold: f64) {
    loop {
        let (_, density) = sg.stats();
        if density >= threshold {
            break;
        }
        let Some(w) = sg.min_degree_node() else { break };
        sg.remove_node(w);
    }
}

/// Single-pass peripheral attachment: core plus every outside neighbor whose
/// fraction of edges into the core exceeds the closeness threshold
fn attach_periphery(
    graph: &Graph,
    core: &BTreeSet<NodeId>,
    closeness_threshold: f64,
) -> BTreeSet<NodeId> {
    if core.is_empty() {
        return BTreeSet::new();
    }

    let mut candidates: BTreeSet<NodeId> = BTreeSet::new();
    for &v in core {
        candidates.extend(graph.neighbors(v).iter().copied());
    }

    let mut members = core.clone();
    for v in candidates.difference(core) {
        let closeness =
            graph.neighbors(*v).intersection(core).count() as f64 / core.len() as f64;
        if closeness > closeness_threshold {
            members.insert(*v);
        }
    }
    members
}

impl Coach {
    pub fn new(graph: Graph) -> Self {
        Self::with_params(graph, CoachParams::default())
    }

    pub fn with_params(graph: Graph, params: CoachParams) -> Self {
        Self {
            graph,
            params,
            clusters: Vec::new(),
        }
    }

    /// Detect preliminary cores for every seed node
    fn detect_cores(&self, verbose: bool) -> Vec<Subgraph> {
        let graph = &self.graph;
        let mut cores: Vec<Subgraph> = Vec::new();

        for vertex in graph.nodes() {
            // ego extraction: induced neighborhood, minus induced degree <= 1
            let vertices = graph.closed_neighborhood(vertex);
            let mut ego = Subgraph::default();
            let mut size1: BTreeSet<NodeId> = BTreeSet::new();
            for &v in &vertices {
                let induced: BTreeSet<NodeId> =
                    graph.neighbors(v).intersection(&vertices).copied().collect();
                if induced.len() > 1 {
                    ego.insert(v, induced);
                } else {
                    size1.insert(v);
                }
            }
            if ego.len() < 2 {
                continue;
            }
            if let Some(nb) = ego.neighbors_mut(vertex) {
                for s in &size1 {
                    nb.remove(s);
                }
            }

            // restrict to nodes of at least average degree
            let (avg_deg, _) = ego.stats();
            let core_graph = ego.restrict(&ego.core_nodes(avg_deg));
            if core_graph.len() < 2 {
                continue;
            }
            let graph_nodes = core_graph.node_set();

            for mut sg in core_removal(self.params.density_threshold, &core_graph) {
                trim_to_density(&mut sg, self.params.density_threshold);

                // greedy re-growth: repeatedly add the outside node sharing
                // the most neighbors with the candidate, while density holds
                let mut sg_nodes = sg.node_set();
                loop {
                    let Some(w) = graph_nodes
                        .difference(&sg_nodes)
                        .copied()
                        .max_by_key(|&v| {
                            let shared = core_graph
                                .neighbors(v)
                                .map_or(0, |n| n.intersection(&sg_nodes).count());
                            (shared, std::cmp::Reverse(v))
                        })
                    else {
                        break;
                    };

                    let mut grown = sg.clone();
                    for &v in &sg_nodes {
                        let adjacent = core_graph
                            .neighbors(v)
                            .is_some_and(|n| n.contains(&w));
                        if adjacent {
                            if let Some(nb) = grown.neighbors_mut(v) {
                                nb.insert(w);
                            }
                        }
                    }
                    let w_neighbors: BTreeSet<NodeId> = core_graph
                        .neighbors(w)
                        .map(|n| n.intersection(&sg_nodes).copied().collect())
                        .unwrap_or_default();
                    grown.insert(w, w_neighbors);

                    let (_, density) = grown.stats();
                    if density < self.params.density_threshold {
                        break;
                    }
                    sg_nodes.insert(w);
                    sg = grown;
                }

                // redundancy filter: fold over accepted cores, best NA score wins
                let mut best: Option<(f64, usize)> = None;
                for (i, core) in cores.iter().enumerate() {
                    let sim = na_score(&core.node_set(), &sg_nodes);
                    if best.map_or(true, |(s, _)| sim > s) {
                        best = Some((sim, i));
                    }
                }
                match best {
                    Some((sim, i)) if sim >= self.params.affinity_threshold => {
                        let (_, d_new) = sg.stats();
                        let (_, d_old) = cores[i].stats();
                        if d_new * sg.len() as f64 > d_old * cores[i].len() as f64 {
                            if verbose {
                                log::debug!(
                                    "seed {}: replacing redundant core (NA {:.3})",
                                    graph.label(vertex),
                                    sim
                                );
                            }
                            cores[i] = sg;
                        }
                    }
                    _ => cores.push(sg),
                }
            }
        }
        cores
    }
}

impl ClusteringStrategy for Coach {
    fn name(&self) -> &'static str {
        "coach"
    }

    fn graph(&self) -> &Graph {
        &self.graph
    }

    fn cluster(&mut self, verbose: bool) -> &[Cluster] {
        let cores = self.detect_cores(verbose);

        // attach peripheral proteins once per core, dedup by membership
        let mut seen: HashSet<Vec<NodeId>> = HashSet::new();
        let mut clusters: Vec<Cluster> = Vec::new();
        for core in &cores {
            let members = attach_periphery(
                &self.graph,
                &core.node_set(),
                self.params.closeness_threshold,
            );
            if members.is_empty() {
                continue;
            }
            let key: Vec<NodeId> = members.iter().copied().collect();
            if seen.insert(key) {
                if verbose {
                    log::debug!(
                        "coach: cluster {} with {} members",
                        clusters.len(),
                        members.len()
                    );
                }
                clusters.push(Cluster::from_members(
                    clusters.len() as u32,
                    members,
                    &self.graph,
                ));
            }
        }

        log::info!("coach: found {} complexes", clusters.len());
        self.clusters = clusters;
        &self.clusters
    }

    fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }
}

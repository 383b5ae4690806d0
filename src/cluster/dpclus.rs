//! DPCLUS periphery-tracking cluster growth
//!
//! Altaf-Ul-Amin et al., "Development and implementation of an algorithm for
//! detection of protein complexes in large interaction networks" (BMC
//! Bioinformatics, 2006). Clusters grow greedily from the heaviest seed,
//! admitting the frontier node of highest priority while density and
//! cluster-property tests hold, then re-admit overlapping neighbors in a
//! second pass. All ties break to the earlier-seen node index.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

use itertools::Itertools;

use crate::cluster::{Cluster, ClusteringStrategy};
use crate::config::DpclusParams;
use crate::graph::{Graph, NodeId};

/// DPCLUS strategy instance
pub struct Dpclus {
    graph: Graph,
    params: DpclusParams,
    clusters: Vec<Cluster>,
}

/// Shared-neighbor weights of all adjacent unvisited pairs
///
/// `edge_weights` holds an entry for every adjacent pair (zero included, in
/// both orientations); `node_weights` accumulates each node's total.
fn shared_neighbor_weights(
    graph: &Graph,
    unvisited: &BTreeSet<NodeId>,
) -> (HashMap<(NodeId, NodeId), usize>, HashMap<NodeId, usize>) {
    let mut edge_weights = HashMap::new();
    let mut node_weights: HashMap<NodeId, usize> = HashMap::new();
    for (&a, &b) in unvisited.iter().tuple_combinations() {
        if !graph.neighbors(a).contains(&b) {
            continue;
        }
        let shared = graph
            .neighbors(a)
            .intersection(graph.neighbors(b))
            .filter(|v| unvisited.contains(v))
            .count();
        edge_weights.insert((a, b), shared);
        edge_weights.insert((b, a), shared);
        *node_weights.entry(a).or_default() += shared;
        *node_weights.entry(b).or_default() += shared;
    }
    (edge_weights, node_weights)
}

/// The cluster member a frontier node hangs off: the lowest-index member
/// with a shared-weight entry for it, falling back to plain adjacency
fn attached_cluster_node(
    node: NodeId,
    cluster: &BTreeSet<NodeId>,
    edge_weights: &HashMap<(NodeId, NodeId), usize>,
    graph: &Graph,
) -> NodeId {
    for &c in cluster {
        if edge_weights.contains_key(&(c, node)) {
            return c;
        }
    }
    for &c in cluster {
        if graph.neighbors(c).contains(&node) {
            return c;
        }
    }
    // unreachable for nodes drawn from a cluster frontier
    *cluster.iter().next_back().expect("cluster is never empty")
}

/// Overlap-phase candidate bookkeeping
struct OverlapEntry {
    e_nk: usize,
    weight_sum: usize,
    fine_tune: i64,
    node: NodeId,
}

impl Dpclus {
    pub fn new(graph: Graph) -> Self {
        Self::with_params(graph, DpclusParams::default())
    }

    pub fn with_params(graph: Graph, params: DpclusParams) -> Self {
        Self {
            graph,
            params,
            clusters: Vec::new(),
        }
    }

    /// Grow one cluster from the chosen seed; returns the frozen member set
    fn grow_cluster(
        &self,
        seed: NodeId,
        mut frontier: BTreeSet<NodeId>,
        unvisited: &BTreeSet<NodeId>,
        edge_weights: &HashMap<(NodeId, NodeId), usize>,
        verbose: bool,
    ) -> BTreeSet<NodeId> {
        let graph = &self.graph;
        let mut cluster: BTreeSet<NodeId> = BTreeSet::from([seed]);
        let mut cluster_degrees: HashMap<NodeId, usize> = HashMap::from([(seed, 0)]);
        let mut nn = 1usize; // nodes in cluster
        let mut ne = 0usize; // edges in cluster

        while !frontier.is_empty() {
            // priority: edges into cluster, then shared-weight sum, then
            // the earlier-seen node
            let (e_nk, _, mut chosen) = frontier
                .iter()
                .map(|&n| {
                    let e_nk = graph.neighbors(n).intersection(&cluster).count();
                    let weight_sum: usize = cluster
                        .iter()
                        .map(|&c| edge_weights.get(&(n, c)).copied().unwrap_or(0))
                        .sum();
                    (e_nk, weight_sum, n)
                })
                .max_by_key(|&(e, w, n)| (e, w, Reverse(n)))
                .expect("frontier is non-empty");

            let density = 2.0 * (ne + e_nk) as f64 / (nn * (nn + 1)) as f64;
            if density < self.params.d_threshold {
                break;
            }

            // fine-tuning: every candidate hangs off the cluster by a single
            // edge, so re-rank by frontier connectivity minus the internal
            // degree of the attaching member
            let mut cp = self.params.cp_threshold;
            if e_nk == 1 && cluster.len() > 1 {
                let (score, node) = frontier
                    .iter()
                    .map(|&n| {
                        let c = attached_cluster_node(n, &cluster, edge_weights, graph);
                        let score = graph.neighbors(n).intersection(&frontier).count()
                            as i64
                            - cluster_degrees[&c] as i64;
                        (score, n)
                    })
                    .max_by_key(|&(s, n)| (s, Reverse(n)))
                    .expect("frontier is non-empty");
                chosen = node;
                if score > 0 {
                    cp /= 2.0;
                }
            }
            if (e_nk as f64 / density / (nn + 1) as f64) < cp {
                break;
            }

            if verbose {
                log::debug!("dpclus: admitting {}", graph.label(chosen));
            }

            cluster.insert(chosen);
            nn += 1;
            ne += e_nk;
            cluster_degrees.insert(chosen, e_nk);
            let in_cluster: Vec<NodeId> = graph
                .neighbors(chosen)
                .intersection(&cluster)
                .copied()
                .collect();
            for n in in_cluster {
                *cluster_degrees.get_mut(&n).expect("member has a degree entry") += 1;
            }

            frontier = cluster
                .iter()
                .flat_map(|&n| graph.neighbors(n).iter().copied())
                .filter(|v| !cluster.contains(v) && unvisited.contains(v))
                .collect();
        }

        // overlap re-admission: visited neighbors may join too
        let frontier_nodes: BTreeSet<NodeId> = cluster
            .iter()
            .flat_map(|&c| graph.neighbors(c).iter().copied())
            .filter(|v| !cluster.contains(v))
            .collect();
        let mut entries: Vec<OverlapEntry> = frontier_nodes
            .iter()
            .map(|&n| OverlapEntry {
                e_nk: graph.neighbors(n).intersection(&cluster).count(),
                weight_sum: cluster
                    .iter()
                    .map(|&c| edge_weights.get(&(n, c)).copied().unwrap_or(0))
                    .sum(),
                fine_tune: 0,
                node: n,
            })
            .collect();
        entries.sort_by_key(|e| (e.e_nk, e.weight_sum, e.fine_tune, Reverse(e.node)));

        let mut fine_tuning = false;
        if entries.last().is_some_and(|e| e.e_nk == 1) {
            for e in &mut entries {
                let c = attached_cluster_node(e.node, &cluster, edge_weights, graph);
                e.fine_tune = graph
                    .neighbors(e.node)
                    .intersection(&frontier_nodes)
                    .count() as i64
                    - cluster_degrees[&c] as i64;
            }
            entries.sort_by_key(|e| (e.fine_tune, Reverse(e.node)));
            fine_tuning = true;
        }

        // pop highest-priority candidates and admit the ones that pass
        while let Some(entry) = entries.pop() {
            let cp = if fine_tuning && entry.fine_tune > 0 {
                self.params.cp_threshold / 2.0
            } else {
                self.params.cp_threshold
            };
            let density = 2.0 * (ne + entry.e_nk) as f64 / (nn * (nn + 1)) as f64;
            if density < self.params.d_threshold
                || (entry.e_nk as f64 / density / (nn + 1) as f64) < cp
            {
                continue;
            }

            if verbose {
                log::debug!("dpclus: re-admitting {}", graph.label(entry.node));
            }

            cluster.insert(entry.node);
            nn += 1;
            ne += entry.e_nk;
            cluster_degrees.insert(entry.node, entry.e_nk);
            let in_cluster: Vec<NodeId> = graph
                .neighbors(entry.node)
                .intersection(&cluster)
                .copied()
                .collect();
            for n in in_cluster {
                *cluster_degrees.get_mut(&n).expect("member has a degree entry") += 1;
            }

            // the admitted node raises remaining candidates' edge counts
            for rem in &mut entries {
                if graph.neighbors(entry.node).contains(&rem.node) {
                    rem.e_nk += 1;
                }
            }
        }

        cluster
    }
}

impl ClusteringStrategy for Dpclus {
    fn name(&self) -> &'static str {
        "dpclus"
    }

    fn graph(&self) -> &Graph {
        &self.graph
    }

    fn cluster(&mut self, verbose: bool) -> &[Cluster] {
        let graph = &self.graph;
        let mut unvisited: BTreeSet<NodeId> = graph.nodes().collect();
        let mut clusters: Vec<Cluster> = Vec::new();

        while !unvisited.is_empty() {
            // highest degree within the unvisited set, ties to earliest-seen
            let seed = unvisited
                .iter()
                .copied()
                .max_by_key(|&v| {
                    let degree =
                        graph.neighbors(v).intersection(&unvisited).count();
                    (degree, Reverse(v))
                })
                .expect("unvisited is non-empty");
            let mut frontier: BTreeSet<NodeId> = graph
                .neighbors(seed)
                .intersection(&unvisited)
                .copied()
                .collect();
            if frontier.is_empty() {
                break; // no connections left to analyze
            }

            // re-seed at the node with the heaviest shared-neighbor total
            let (edge_weights, node_weights) =
                shared_neighbor_weights(graph, &unvisited);
            let seed = match node_weights
                .iter()
                .map(|(&n, &w)| (w, n))
                .max_by_key(|&(w, n)| (w, Reverse(n)))
            {
                Some((w, n)) if w > 0 => {
                    frontier =
                        graph.neighbors(n).intersection(&unvisited).copied().collect();
                    n
                }
                _ => seed,
            };

            let members =
                self.grow_cluster(seed, frontier, &unvisited, &edge_weights, verbose);

            for v in &members {
                unvisited.remove(v);
            }
            if verbose {
                log::debug!(
                    "dpclus: cluster {} with {} members, {} nodes left",
                    clusters.len(),
                    members.len(),
                    unvisited.len()
                );
            }
            clusters.push(Cluster::from_members(
                clusters.len() as u32,
                members,
                graph,
            ));
        }

        log::info!("dpclus: found {} complexes", clusters.len());
        self.clusters = clusters;
        &self.clusters
    }

    fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }
}

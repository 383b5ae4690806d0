//! Undirected adjacency-set graph with string interning
//!
//! Node identifiers are interned to `u32` indices in first-seen order while
//! edges are added. That order doubles as the crate-wide deterministic
//! tie-break: wherever an algorithm must choose between equally-scored
//! nodes, the lower (earlier-seen) index wins. Neighbor sets are `BTreeSet`s
//! so iteration is always ascending-index and therefore reproducible.

use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Interned node identifier, assigned in first-seen input order
pub type NodeId = u32;

/// Undirected simple graph over interned string identifiers
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Mapping from protein identifier to interned index
    id_to_index: HashMap<String, NodeId>,

    /// Original string identifier per node
    node_ids: Vec<String>,

    /// Neighbor sets, indexed by `NodeId`
    adjacency: Vec<BTreeSet<NodeId>>,
}

impl Graph {
    /// Build a graph from a sequence of undirected edges
    pub fn from_edges<I, S>(edges: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let mut graph = Self::default();
        for (a, b) in edges {
            graph.add_edge(a.as_ref(), b.as_ref());
        }
        graph
    }

    /// Get or create the interned index for the given string identifier
    pub fn get_or_create_node(&mut self, id: &str) -> NodeId {
        if let Some(&idx) = self.id_to_index.get(id) {
            return idx;
        }

        let idx = self.node_ids.len() as NodeId;
        self.id_to_index.insert(id.to_string(), idx);
        self.node_ids.push(id.to_string());
        self.adjacency.push(BTreeSet::new());
        idx
    }

    /// Insert the undirected edge `a -- b`
    ///
    /// Both endpoints are interned; duplicate edges collapse. Identical
    /// endpoints are dropped (the input is assumed to be a simple graph).
    pub fn add_edge(&mut self, a: &str, b: &str) {
        let a_idx = self.get_or_create_node(a);
        let b_idx = self.get_or_create_node(b);
        if a_idx == b_idx {
            return;
        }

        self.adjacency[a_idx as usize].insert(b_idx);
        self.adjacency[b_idx as usize].insert(a_idx);
    }

    /// Number of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges in the graph
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(|n| n.len()).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// All node indices, in interning order
    ///
    /// The concrete `Range` return type keeps the iterator `Clone`, which
    /// the pair-enumeration passes in the weighting stages rely on.
    pub fn nodes(&self) -> std::ops::Range<NodeId> {
        0..self.node_count() as NodeId
    }

    /// Neighbor set of a node
    pub fn neighbors(&self, node: NodeId) -> &BTreeSet<NodeId> {
        &self.adjacency[node as usize]
    }

    /// Degree of a node
    pub fn degree(&self, node: NodeId) -> usize {
        self.adjacency[node as usize].len()
    }

    /// The node together with its neighbors
    pub fn closed_neighborhood(&self, node: NodeId) -> BTreeSet<NodeId> {
        let mut set = self.adjacency[node as usize].clone();
        set.insert(node);
        set
    }

    /// Original string identifier of a node
    pub fn label(&self, node: NodeId) -> &str {
        &self.node_ids[node as usize]
    }

    /// Interned index of a string identifier, if present
    pub fn node_id(&self, id: &str) -> Option<NodeId> {
        self.id_to_index.get(id).copied()
    }

    /// Owned subgraph induced on `keep`: each kept node's neighbor set
    /// intersected with `keep`. Never aliases this graph's storage.
    pub fn induced(&self, keep: &BTreeSet<NodeId>) -> Subgraph {
        let mut sub = Subgraph::default();
        for &v in keep {
            let neighbors = self.adjacency[v as usize]
                .intersection(keep)
                .copied()
                .collect();
            sub.insert(v, neighbors);
        }
        sub
    }
}

/// Owned restriction of a [`Graph`] to a node subset
///
/// Algorithms mutate subgraphs freely per branch; restriction always copies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subgraph {
    adj: BTreeMap<NodeId, BTreeSet<NodeId>>,
}

impl Subgraph {
    pub fn len(&self) -> usize {
        self.adj.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adj.is_empty()
    }

    /// Node indices in ascending order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.adj.keys().copied()
    }

    /// Owned set of the subgraph's nodes
    pub fn node_set(&self) -> BTreeSet<NodeId> {
        self.adj.keys().copied().collect()
    }

    /// `(node, neighbor set)` pairs in ascending node order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &BTreeSet<NodeId>)> {
        self.adj.iter().map(|(&v, n)| (v, n))
    }

    pub fn neighbors(&self, node: NodeId) -> Option<&BTreeSet<NodeId>> {
        self.adj.get(&node)
    }

    pub fn neighbors_mut(&mut self, node: NodeId) -> Option<&mut BTreeSet<NodeId>> {
        self.adj.get_mut(&node)
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.adj.get(&node).map_or(0, |n| n.len())
    }

    /// Insert a node with the given neighbor set, replacing any existing one
    pub fn insert(&mut self, node: NodeId, neighbors: BTreeSet<NodeId>) {
        self.adj.insert(node, neighbors);
    }

    /// Remove a node and unlink it from every remaining neighbor set
    pub fn remove_node(&mut self, node: NodeId) {
        self.adj.remove(&node);
        for neighbors in self.adj.values_mut() {
            neighbors.remove(&node);
        }
    }

    /// Average degree and density
    ///
    /// Density is `avg_deg / (n - 1)`; the degenerate single-node (and
    /// empty) cases report density 1.0 so callers never divide by zero.
    pub fn stats(&self) -> (f64, f64) {
        let n = self.adj.len();
        if n <= 1 {
            return (0.0, 1.0);
        }
        let avg_deg =
            self.adj.values().map(|nb| nb.len()).sum::<usize>() as f64 / n as f64;
        let density = avg_deg / (n - 1) as f64;
        (avg_deg, density)
    }

    /// Nodes whose degree meets or exceeds the average degree
    pub fn core_nodes(&self, avg_deg: f64) -> BTreeSet<NodeId> {
        self.adj
            .iter()
            .filter(|(_, nb)| nb.len() as f64 >= avg_deg)
            .map(|(&v, _)| v)
            .collect()
    }

    /// Node of minimum degree; ties go to the lowest index
    pub fn min_degree_node(&self) -> Option<NodeId> {
        self.adj
            .iter()
            .min_by_key(|(&v, nb)| (nb.len(), v))
            .map(|(&v, _)| v)
    }

    /// Owned copy restricted to `keep`, neighbor sets intersected with `keep`
    pub fn restrict(&self, keep: &BTreeSet<NodeId>) -> Subgraph {
        let mut sub = Subgraph::default();
        for (&v, neighbors) in &self.adj {
            if keep.contains(&v) {
                sub.insert(v, neighbors.intersection(keep).copied().collect());
            }
        }
        sub
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_with_pendant() -> Graph {
        Graph::from_edges(vec![
            ("A", "B"),
            ("B", "C"),
            ("C", "A"),
            ("C", "D"),
        ])
    }

    #[test]
    fn neighbor_sets_are_symmetric() {
        let g = triangle_with_pendant();
        for a in g.nodes() {
            for &b in g.neighbors(a) {
                assert!(
                    g.neighbors(b).contains(&a),
                    "edge {}--{} missing reverse direction",
                    g.label(a),
                    g.label(b)
                );
            }
        }
    }

    #[test]
    fn duplicate_edges_collapse() {
        let g = Graph::from_edges(vec![("A", "B"), ("B", "A"), ("A", "B")]);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn self_loops_are_dropped() {
        let g = Graph::from_edges(vec![("A", "A"), ("A", "B")]);
        assert_eq!(g.degree(g.node_id("A").unwrap()), 1);
    }

    #[test]
    fn interning_order_is_first_seen() {
        let g = triangle_with_pendant();
        assert_eq!(g.node_id("A"), Some(0));
        assert_eq!(g.node_id("B"), Some(1));
        assert_eq!(g.node_id("C"), Some(2));
        assert_eq!(g.node_id("D"), Some(3));
    }

    #[test]
    fn node_iterator_supports_pair_enumeration() {
        use itertools::Itertools;

        // the weighting stages walk all node pairs off this iterator, so it
        // must be cloneable
        let g = triangle_with_pendant();
        let pairs: Vec<(NodeId, NodeId)> = g.nodes().tuple_combinations().collect();
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[0], (0, 1));
    }

    #[test]
    fn induced_subgraph_restricts_neighbors() {
        let g = triangle_with_pendant();
        let c = g.node_id("C").unwrap();
        let d = g.node_id("D").unwrap();
        let keep: BTreeSet<NodeId> = [c, d].into_iter().collect();
        let sub = g.induced(&keep);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.degree(c), 1);
        assert_eq!(sub.degree(d), 1);
    }

    #[test]
    fn induced_subgraph_is_an_owned_copy() {
        let g = triangle_with_pendant();
        let keep = g.closed_neighborhood(g.node_id("C").unwrap());
        let mut sub = g.induced(&keep);
        sub.remove_node(g.node_id("A").unwrap());
        // the source graph is untouched
        assert_eq!(g.degree(g.node_id("A").unwrap()), 2);
    }

    #[test]
    fn stats_guard_degenerate_sizes() {
        let mut single = Subgraph::default();
        single.insert(0, BTreeSet::new());
        assert_eq!(single.stats(), (0.0, 1.0));
        assert_eq!(Subgraph::default().stats(), (0.0, 1.0));
    }

    #[test]
    fn triangle_density_is_one() {
        let g = triangle_with_pendant();
        let keep: BTreeSet<NodeId> = [0, 1, 2].into_iter().collect();
        let (avg, density) = g.induced(&keep).stats();
        assert_eq!(avg, 2.0);
        assert_eq!(density, 1.0);
    }

    #[test]
    fn min_degree_ties_break_to_lowest_index() {
        let g = Graph::from_edges(vec![("A", "B"), ("C", "D")]);
        let sub = g.induced(&g.nodes().collect());
        assert_eq!(sub.min_degree_node(), g.node_id("A"));
    }
}

//! End-to-end pipeline tests: edge-list file in, cluster file out

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use ppi_cluster_analyzer::cluster::{
    Coach, ClusteringStrategy, Dpclus, Ipca, Mcode,
};
use ppi_cluster_analyzer::data::read_edge_list;
use ppi_cluster_analyzer::error::GraphError;
use ppi_cluster_analyzer::graph::NodeId;
use ppi_cluster_analyzer::storage::save_clusters;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("ppi_pipeline_{}_{}", std::process::id(), name))
}

fn write_network(name: &str, contents: &str) -> PathBuf {
    let path = temp_path(name);
    fs::write(&path, contents).unwrap();
    path
}

fn all_strategies(
    graph: &ppi_cluster_analyzer::graph::Graph,
) -> Vec<Box<dyn ClusteringStrategy>> {
    vec![
        Box::new(Coach::new(graph.clone())),
        Box::new(Dpclus::new(graph.clone())),
        Box::new(Ipca::new(graph.clone())),
        Box::new(Mcode::new(graph.clone())),
    ]
}

#[test]
fn triangle_with_pendant_end_to_end() {
    let path = write_network("triangle", "A B\nB C\nC A\nC D\n");
    let graph = read_edge_list(&path).unwrap();
    fs::remove_file(&path).unwrap();

    // MCODE absorbs D during expansion, then the 2-core haircut strips it
    let mut mcode = Mcode::new(graph.clone());
    let clusters = mcode.cluster(false);
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].labels(&graph), vec!["A", "B", "C"]);

    // DPCLUS rejects D in both the growth and overlap phases
    let mut dpclus = Dpclus::new(graph.clone());
    let clusters = dpclus.cluster(false);
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].labels(&graph), vec!["A", "B", "C"]);
}

#[test]
fn every_strategy_returns_valid_clusters() {
    let path = write_network(
        "valid",
        "A B\nB C\nC A\nC D\nD E\nE F\nF D\nE G\nG H\nH F\n",
    );
    let graph = read_edge_list(&path).unwrap();
    fs::remove_file(&path).unwrap();

    let node_count = graph.node_count() as NodeId;
    for mut strategy in all_strategies(&graph) {
        let name = strategy.name();
        let clusters = strategy.cluster(false).to_vec();
        for cluster in clusters {
            assert!(
                !cluster.members.is_empty(),
                "{name} produced an empty cluster"
            );
            assert!(
                cluster.members.iter().all(|&m| m < node_count),
                "{name} produced members outside the graph"
            );
            let unique: BTreeSet<NodeId> = cluster.members.iter().copied().collect();
            assert_eq!(unique.len(), cluster.members.len());
        }
    }
}

#[test]
fn strategies_are_deterministic_across_runs() {
    let contents = "A B\nB C\nC A\nC D\nD E\nE F\nF D\nB E\n";
    let path_a = write_network("det_a", contents);
    let path_b = write_network("det_b", contents);
    let graph_a = read_edge_list(&path_a).unwrap();
    let graph_b = read_edge_list(&path_b).unwrap();
    fs::remove_file(&path_a).unwrap();
    fs::remove_file(&path_b).unwrap();

    for (mut first, mut second) in
        all_strategies(&graph_a).into_iter().zip(all_strategies(&graph_b))
    {
        let name = first.name();
        let first_run = first.cluster(false).to_vec();
        let second_run = second.cluster(false).to_vec();
        assert_eq!(first_run, second_run, "{name} differed between identical runs");
    }
}

#[test]
fn malformed_input_aborts_before_clustering() {
    let path = write_network("malformed", "A B\nB\n");
    let err = read_edge_list(&path).unwrap_err();
    fs::remove_file(&path).unwrap();
    assert!(matches!(err, GraphError::MalformedInput { line: 2 }));
}

#[test]
fn saved_clusters_round_trip_through_text() {
    let path = write_network("save_in", "A B\nB C\nC A\nC D\n");
    let graph = read_edge_list(&path).unwrap();
    fs::remove_file(&path).unwrap();

    let mut mcode = Mcode::new(graph.clone());
    let clusters = mcode.cluster(false).to_vec();

    let out = temp_path("save_out.txt");
    save_clusters(&clusters, &graph, &out).unwrap();
    let contents = fs::read_to_string(&out).unwrap();
    fs::remove_file(&out).unwrap();

    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), clusters.len());
    assert_eq!(lines[0], "A B C");
}

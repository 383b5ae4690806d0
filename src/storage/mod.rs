//! Results persistence module

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Result;
use serde_json::{json, to_string_pretty};

use crate::cluster::Cluster;
use crate::graph::Graph;

/// Save clusters as plain text: one line per cluster, member identifiers
/// joined by a single space, in discovery order
pub fn save_clusters<P: AsRef<Path>>(
    clusters: &[Cluster],
    graph: &Graph,
    path: P,
) -> Result<()> {
    log::info!(
        "Saving {} clusters to {}",
        clusters.len(),
        path.as_ref().display()
    );

    let mut writer = BufWriter::new(File::create(path)?);
    for cluster in clusters {
        writeln!(writer, "{}", cluster.labels(graph).join(" "))?;
    }
    writer.flush()?;
    Ok(())
}

/// Save graph and cluster statistics as JSON
pub fn save_summary<P: AsRef<Path>>(
    runs: &[(&str, &[Cluster])],
    graph: &Graph,
    path: P,
) -> Result<()> {
    log::info!("Saving summary to {}", path.as_ref().display());

    let node_count = graph.node_count();
    let edge_count = graph.edge_count();
    let summary = json!({
        "graph_stats": {
            "node_count": node_count,
            "edge_count": edge_count,
            "avg_degree": if node_count == 0 {
                0.0
            } else {
                2.0 * edge_count as f64 / node_count as f64
            },
        },
        "runs": runs.iter().map(|(name, clusters)| {
            json!({
                "algorithm": name,
                "cluster_count": clusters.len(),
                "total_clustered_nodes": clusters.iter().map(|c| c.size).sum::<usize>(),
                "largest_cluster_size": clusters.iter().map(|c| c.size).max().unwrap_or(0),
                "avg_density": clusters.iter().map(|c| c.density).sum::<f64>()
                    / if clusters.is_empty() { 1.0 } else { clusters.len() as f64 },
            })
        }).collect::<Vec<_>>(),
    });

    let mut file = File::create(path)?;
    file.write_all(to_string_pretty(&summary)?.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{ClusteringStrategy, Mcode};

    #[test]
    fn clusters_serialize_one_per_line() {
        let graph =
            Graph::from_edges(vec![("A", "B"), ("B", "C"), ("C", "A"), ("C", "D")]);
        let mut mcode = Mcode::new(graph.clone());
        let clusters = mcode.cluster(false).to_vec();

        let path = std::env::temp_dir().join(format!(
            "ppi_cluster_save_test_{}.txt",
            std::process::id()
        ));
        save_clusters(&clusters, &graph, &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(contents, "A B C\n");
    }
}

use std::path::Path;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use rayon::prelude::*;

use ppi_cluster_analyzer::cluster::{
    Coach, ClusteringStrategy, Dpclus, Ipca, Mcode,
};
use ppi_cluster_analyzer::config::{
    CoachParams, DpclusParams, IpcaParams, McodeParams,
};
use ppi_cluster_analyzer::data::read_edge_list;
use ppi_cluster_analyzer::storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    Coach,
    Dpclus,
    Ipca,
    Mcode,
    All,
}

#[derive(Parser, Debug)]
#[clap(
    name = "ppi-cluster-analyzer",
    about = "Protein complex detection in PPI networks"
)]
struct Cli {
    /// Path to the input edge list (two whitespace-separated ids per line)
    #[clap(long)]
    input: String,

    /// Output directory for results
    #[clap(long, default_value = "cluster_results")]
    output_dir: String,

    /// Clustering algorithm to run
    #[clap(long, value_enum, default_value_t = Algorithm::All)]
    algorithm: Algorithm,

    /// COACH: minimum core density
    #[clap(long, default_value = "0.7")]
    density_threshold: f64,

    /// COACH: NA-score redundancy threshold
    #[clap(long, default_value = "0.225")]
    affinity_threshold: f64,

    /// COACH: peripheral closeness threshold
    #[clap(long, default_value = "0.5")]
    closeness_threshold: f64,

    /// DPCLUS: minimum cluster density
    #[clap(long, default_value = "0.9")]
    d_threshold: f64,

    /// DPCLUS: cluster-property threshold
    #[clap(long, default_value = "0.5")]
    cp_threshold: f64,

    /// IPCA: minimum in-cluster connectivity fraction
    #[clap(long, default_value = "0.5")]
    t_in: f64,

    /// MCODE: vertex weight percentage threshold
    #[clap(long, default_value = "0.2")]
    weight_threshold: f64,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

impl Cli {
    fn strategies(
        &self,
        graph: &ppi_cluster_analyzer::graph::Graph,
    ) -> Vec<Box<dyn ClusteringStrategy + Send>> {
        let selected = |a: Algorithm| {
            self.algorithm == a || self.algorithm == Algorithm::All
        };
        let mut strategies: Vec<Box<dyn ClusteringStrategy + Send>> = Vec::new();
        if selected(Algorithm::Coach) {
            strategies.push(Box::new(Coach::with_params(
                graph.clone(),
                CoachParams {
                    density_threshold: self.density_threshold,
                    affinity_threshold: self.affinity_threshold,
                    closeness_threshold: self.closeness_threshold,
                },
            )));
        }
        if selected(Algorithm::Dpclus) {
            strategies.push(Box::new(Dpclus::with_params(
                graph.clone(),
                DpclusParams {
                    d_threshold: self.d_threshold,
                    cp_threshold: self.cp_threshold,
                },
            )));
        }
        if selected(Algorithm::Ipca) {
            strategies.push(Box::new(Ipca::with_params(
                graph.clone(),
                IpcaParams { t_in: self.t_in },
            )));
        }
        if selected(Algorithm::Mcode) {
            strategies.push(Box::new(Mcode::with_params(
                graph.clone(),
                McodeParams {
                    weight_threshold: self.weight_threshold,
                },
            )));
        }
        strategies
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };
    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    log::info!("Starting complex detection");
    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    std::fs::create_dir_all(&args.output_dir)?;

    let graph = read_edge_list(&args.input)?;

    // each strategy owns its graph copy, so independent runs are safe to
    // execute in parallel; the algorithms themselves stay single-threaded
    let mut strategies = args.strategies(&graph);
    strategies.par_iter_mut().for_each(|strategy| {
        strategy.cluster(args.verbose);
    });

    let output_dir = Path::new(&args.output_dir);
    for strategy in &strategies {
        let path = output_dir.join(format!("{}_clusters.txt", strategy.name()));
        storage::save_clusters(strategy.clusters(), strategy.graph(), &path)?;
    }

    let runs: Vec<(&str, &[ppi_cluster_analyzer::cluster::Cluster])> = strategies
        .iter()
        .map(|s| (s.name(), s.clusters()))
        .collect();
    storage::save_summary(&runs, &graph, output_dir.join("summary.json"))?;

    log::info!("Analysis complete. Results saved to {}", args.output_dir);

    Ok(())
}

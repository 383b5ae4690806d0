//! Whitespace-separated edge-list reader
//!
//! Each non-empty line names one undirected interaction: at least two
//! whitespace-separated tokens, of which only the first two are used.
//! Trailing columns (weights, annotations) are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::GraphError;
use crate::graph::Graph;

/// Read an edge-list file into a graph
pub fn read_edge_list<P: AsRef<Path>>(path: P) -> Result<Graph, GraphError> {
    log::info!("Reading edge list: {}", path.as_ref().display());
    let file = File::open(path)?;
    let graph = parse_edge_list(BufReader::new(file))?;
    log::info!(
        "Loaded graph with {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

/// Parse edge-list text from any buffered reader
///
/// Fails with [`GraphError::MalformedInput`] on the first line that yields
/// fewer than two tokens; no partial graph is returned.
pub fn parse_edge_list<R: BufRead>(reader: R) -> Result<Graph, GraphError> {
    let mut graph = Graph::default();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let a = tokens.next();
        let b = tokens.next();
        match (a, b) {
            (Some(a), Some(b)) => graph.add_edge(a, b),
            _ => return Err(GraphError::MalformedInput { line: line_no + 1 }),
        }
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_pairs_and_skips_blank_lines() {
        let input = "A B\n\nB C extra_column 0.9\nC A\n";
        let g = parse_edge_list(Cursor::new(input)).unwrap();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn single_token_line_is_malformed() {
        let err = parse_edge_list(Cursor::new("A B\nlonely\n")).unwrap_err();
        match err {
            GraphError::MalformedInput { line } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_input_yields_empty_graph() {
        let g = parse_edge_list(Cursor::new("")).unwrap();
        assert!(g.is_empty());
    }
}

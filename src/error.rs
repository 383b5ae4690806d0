//! Library error types

use thiserror::Error;

/// Errors raised while reading an interaction network into a graph
#[derive(Debug, Error)]
pub enum GraphError {
    /// An edge-list line did not contain at least two whitespace-separated tokens
    #[error("malformed edge list at line {line}: expected at least two whitespace-separated tokens")]
    MalformedInput { line: usize },

    /// Underlying I/O failure while reading the edge list
    #[error("failed to read edge list")]
    Io(#[from] std::io::Error),
}

use crate::NodeIdx;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("dimension mismatch: operator has dimension {expected}, got input {input} and output {output}")]
  DimensionMismatch {
    expected: usize,
    input: usize,
    output: usize,
  },
  #[error("degenerate mesh: no edges, so there is no representative edge length")]
  DegenerateMesh,
  #[error("conjugate gradient did not converge in {iterations} iterations (residual {residual:.3e})")]
  NonConvergence { iterations: usize, residual: f64 },
  #[error("node index {index} out of range for graph with {nnodes} nodes")]
  NodeOutOfRange { index: NodeIdx, nnodes: usize },
  #[error("self loop on node {0}")]
  SelfLoop(NodeIdx),
  #[error("parse error on line {line}: {reason}")]
  Parse { line: usize, reason: String },
  #[error("failed to read gmsh file: {0}")]
  Gmsh(String),
  #[error("direct solve failed: {0}")]
  DirectSolve(String),
  #[error(transparent)]
  Io(#[from] std::io::Error),
}

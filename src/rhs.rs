//! Right-hand side of the discrete Poisson system.
//!
//! Has to mirror how [`GraphLaplacian`](crate::operator::GraphLaplacian)
//! rewrites Dirichlet rows: a fixed node gets its prescribed value, a free
//! node gets the scaled forcing plus the values of its fixed neighbours,
//! whose columns were decoupled from the operator.

use crate::{
  boundary::{ForcingFunction, NodeConstraints},
  error::{Error, Result},
  graph::Graph,
};

use tracing::debug;

pub fn assemble_rhs(
  graph: &Graph,
  constraints: &NodeConstraints,
  forcing: &impl ForcingFunction,
) -> Result<na::DVector<f64>> {
  if constraints.len() != graph.nnodes() {
    return Err(Error::DimensionMismatch {
      expected: graph.nnodes(),
      input: constraints.len(),
      output: graph.nnodes(),
    });
  }
  let h = graph.mesh_width()?;
  let h2 = h * h;
  debug!("assembling rhs with mesh width h={h:.3e}");

  let rhs = na::DVector::from_fn(graph.nnodes(), |i, _| match constraints.fixed_value(i) {
    Some(v) => v,
    None => {
      let boundary_sum: f64 = graph
        .neighbors(i)
        .filter_map(|j| constraints.fixed_value(j))
        .sum();
      h2 * forcing.eval(graph.position(i)) + boundary_sum
    }
  });
  Ok(rhs)
}

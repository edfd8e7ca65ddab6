//! One Poisson problem on one graph snapshot.

use crate::{
  boundary::{BoundaryClassifier, ForcingFunction, NodeConstraints},
  error::Result,
  graph::Graph,
  operator::GraphLaplacian,
  rhs::assemble_rhs,
  solver::{self, precond::Preconditioner, CgConfig, CgOutcome},
};

use tracing::{info, warn};

/// Graph, classification and right-hand side, built together so that the
/// operator and the rhs always see the same constraints.
///
/// The graph is borrowed for the lifetime of the problem, it can't be
/// edited while a solve is pending.
#[derive(Debug, Clone)]
pub struct PoissonProblem<'g> {
  graph: &'g Graph,
  constraints: NodeConstraints,
  rhs: na::DVector<f64>,
  mesh_width: f64,
}

impl<'g> PoissonProblem<'g> {
  pub fn new(
    graph: &'g Graph,
    classifier: &impl BoundaryClassifier,
    forcing: &impl ForcingFunction,
  ) -> Result<Self> {
    let mesh_width = graph.mesh_width()?;
    let constraints = NodeConstraints::classify(graph, classifier);
    let rhs = assemble_rhs(graph, &constraints, forcing)?;

    // such a row of the operator is zero, so the system is singular
    let nisolated = (0..graph.nnodes())
      .filter(|&i| !constraints.is_fixed(i) && graph.degree(i) == 0)
      .count();
    if nisolated > 0 {
      warn!("{nisolated} free nodes have no neighbours, the system is singular");
    }
    info!(
      "poisson problem: {} nodes ({} fixed), {} edges, h={mesh_width:.3e}",
      graph.nnodes(),
      constraints.nfixed(),
      graph.nedges()
    );
    Ok(Self {
      graph,
      constraints,
      rhs,
      mesh_width,
    })
  }

  // getters
  pub fn graph(&self) -> &'g Graph {
    self.graph
  }
  pub fn constraints(&self) -> &NodeConstraints {
    &self.constraints
  }
  pub fn rhs(&self) -> &na::DVector<f64> {
    &self.rhs
  }
  pub fn mesh_width(&self) -> f64 {
    self.mesh_width
  }
  pub fn nnodes(&self) -> usize {
    self.graph.nnodes()
  }

  pub fn operator(&self) -> GraphLaplacian<'_> {
    GraphLaplacian::new_unchecked(self.graph, &self.constraints)
  }

  /// Fixed values on constrained nodes and `interior` everywhere else.
  ///
  /// The initial residual then vanishes on all constrained rows, which keeps
  /// the iteration inside the interior block, where the operator is definite.
  pub fn initial_guess(&self, interior: f64) -> na::DVector<f64> {
    na::DVector::from_iterator(
      self.nnodes(),
      self
        .constraints
        .iter()
        .map(|c| c.fixed_value().unwrap_or(interior)),
    )
  }

  /// Runs conjugate gradients from `initial_guess(1.0)`.
  pub fn solve(&self, config: CgConfig, precond: &impl Preconditioner) -> Result<CgOutcome> {
    let operator = self.operator();
    solver::solve(&operator, &self.rhs, self.initial_guess(1.0), precond, config)
  }
}

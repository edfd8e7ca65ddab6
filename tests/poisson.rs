//! End to end solves of the graph Poisson problem.
//!
//! The system reads $-deg(i) u_i + sum_(j "free") u_j = h^2 f_i + sum_(j "fixed") g_j$
//! on free nodes and $u_i = g_i$ on fixed nodes.

extern crate nalgebra as na;

use graph_poisson::{
  boundary::{Constraint, CosineForcing, NodeConstraints, PlateWithHoles},
  geometry::Point,
  graph::Graph,
  linalg::solve_direct,
  mesh::cartesian::CartesianGrid,
  operator::{GraphLaplacian, LinearOperator},
  problem::PoissonProblem,
  solver::{
    self,
    precond::{Identity, Jacobi},
    CgConfig, Termination,
  },
  Error,
};

use approx::assert_relative_eq;

/// Unit square boundary with a linear boundary function.
fn linear_boundary(p: &Point) -> Constraint {
  if p.x == 0.0 || p.x == 1.0 || p.y == 0.0 || p.y == 1.0 {
    Constraint::Fixed(1.0 + 3.0 * p.x + 7.0 * p.y)
  } else {
    Constraint::Forcing
  }
}

fn plate_graph(ncells_axis: usize) -> Graph {
  let mut graph = CartesianGrid::new(ncells_axis)
    .unwrap()
    .build_graph(|p| p * 2.0 - Point::new(1.0, 1.0, 0.0))
    .unwrap();
  let h = graph.mesh_width().unwrap();
  for bb in PlateWithHoles::default().excavations(h) {
    graph.remove_box(&bb);
  }
  graph
}

#[test]
fn three_by_three_closed_form() {
  let graph = CartesianGrid::new(2).unwrap().build_graph(|p| *p).unwrap();
  assert_eq!(graph.nnodes(), 9);

  // side midpoints 1, 3, 5, 7 carry 2.5, 4.5, 7.5, 9.5
  let problem = PoissonProblem::new(&graph, &linear_boundary, &|_: &Point| 0.0).unwrap();
  let outcome = problem.solve(CgConfig::default(), &Identity).unwrap();
  assert!(outcome.is_converged());
  assert_relative_eq!(outcome.solution[4], -24.0 / 4.0, epsilon = 1e-12);

  // h = 1/2, so a constant forcing of 8 adds h^2 f = 2
  let problem = PoissonProblem::new(&graph, &linear_boundary, &|_: &Point| 8.0).unwrap();
  let outcome = problem.solve(CgConfig::default(), &Identity).unwrap();
  assert_relative_eq!(outcome.solution[4], -26.0 / 4.0, epsilon = 1e-12);

  for inode in [0, 1, 2, 3, 5, 6, 7, 8] {
    let v = problem.constraints().fixed_value(inode).unwrap();
    assert_eq!(outcome.solution[inode], v, "node {inode}");
  }
}

#[test]
fn all_fixed_converges_immediately() {
  let graph = CartesianGrid::new(5).unwrap().build_graph(|p| *p).unwrap();
  let constraints = NodeConstraints::classify(&graph, &|_: &Point| Constraint::Fixed(3.0));
  let operator = GraphLaplacian::new(&graph, &constraints).unwrap();
  let rhs = na::DVector::from_element(graph.nnodes(), 3.0);

  let outcome = solver::solve(
    &operator,
    &rhs,
    na::DVector::zeros(graph.nnodes()),
    &Identity,
    CgConfig::default(),
  )
  .unwrap();
  assert!(outcome.is_converged());
  assert!(outcome.iterations <= 1);
  for &x in outcome.solution.iter() {
    assert_relative_eq!(x, 3.0, epsilon = 1e-12);
  }
}

#[test]
fn plate_cg_matches_sparse_lu() {
  let graph = plate_graph(20);
  let problem = PoissonProblem::new(
    &graph,
    &PlateWithHoles::default(),
    &CosineForcing::default(),
  )
  .unwrap();
  let operator = problem.operator();
  let jacobi = Jacobi::new(&operator.diagonal());

  let config = CgConfig::default().with_max_iterations(2000);
  let outcome = problem.solve(config, &jacobi).unwrap();
  assert!(
    outcome.is_converged(),
    "{:?} after {} iterations",
    outcome.termination,
    outcome.iterations
  );

  let direct = solve_direct(&operator, problem.rhs()).unwrap();
  let error = (&outcome.solution - &direct).norm() / direct.norm();
  assert!(error < 1e-7, "relative error {error:e}");

  let residual = problem.rhs() - operator.mul(&outcome.solution).unwrap();
  assert!(residual.norm() <= 1e-9 * problem.rhs().norm());

  for inode in 0..graph.nnodes() {
    if let Some(v) = problem.constraints().fixed_value(inode) {
      assert_eq!(outcome.solution[inode], v, "node {inode}");
    }
  }
}

#[test]
fn preconditioners_agree() {
  let graph = plate_graph(16);
  let problem = PoissonProblem::new(
    &graph,
    &PlateWithHoles::default(),
    &CosineForcing::default(),
  )
  .unwrap();
  let config = CgConfig::default().with_max_iterations(2000);

  let plain = problem.solve(config, &Identity).unwrap();
  let jacobi = Jacobi::new(&problem.operator().diagonal());
  let scaled = problem.solve(config, &jacobi).unwrap();
  assert!(plain.is_converged() && scaled.is_converged());

  let diff = (&plain.solution - &scaled.solution).norm() / plain.solution.norm();
  assert!(diff < 1e-7, "relative difference {diff:e}");
}

#[test]
fn iteration_cap_is_reported() {
  let graph = plate_graph(40);
  let problem = PoissonProblem::new(
    &graph,
    &PlateWithHoles::default(),
    &CosineForcing::default(),
  )
  .unwrap();
  let config = CgConfig::default().with_max_iterations(5);
  let outcome = problem.solve(config, &Identity).unwrap();
  assert_eq!(outcome.termination, Termination::IterationLimit);
  assert_eq!(outcome.residual_history.len(), 6);
  assert!(matches!(
    outcome.into_converged(),
    Err(Error::NonConvergence { iterations: 5, .. })
  ));
}

#[test]
fn solution_written_back_to_graph() {
  let mut graph = CartesianGrid::new(2).unwrap().build_graph(|p| *p).unwrap();
  let solution = {
    let problem = PoissonProblem::new(&graph, &linear_boundary, &|_: &Point| 0.0).unwrap();
    problem
      .solve(CgConfig::default(), &Identity)
      .unwrap()
      .into_converged()
      .unwrap()
  };
  graph.set_values(&solution).unwrap();
  assert_eq!(graph.values(), solution);
  assert_relative_eq!(graph.node(4).value(), -6.0, epsilon = 1e-12);
}

#[test]
fn isolated_free_node_keeps_finite_iterate() {
  // 0 - 1 plus node 2 without neighbours, its operator row is zero
  let mut graph = Graph::new();
  graph.add_node(Point::new(0.0, 0.0, 0.0));
  graph.add_node(Point::new(1.0, 0.0, 0.0));
  graph.add_node(Point::new(5.0, 0.0, 0.0));
  graph.add_edge(0, 1).unwrap();
  let fix_origin = |p: &Point| {
    if p.x == 0.0 {
      Constraint::Fixed(1.0)
    } else {
      Constraint::Forcing
    }
  };
  let problem = PoissonProblem::new(&graph, &fix_origin, &|_: &Point| 1.0).unwrap();
  assert_eq!(problem.rhs().as_slice(), &[1.0, 2.0, 1.0]);

  let outcome = problem.solve(CgConfig::default(), &Identity).unwrap();
  assert_eq!(outcome.termination, Termination::Breakdown);
  assert!(outcome.solution.iter().all(|x| x.is_finite()));
  assert_eq!(outcome.solution[0], 1.0);

  let residual = problem.rhs() - problem.operator().mul(&outcome.solution).unwrap();
  assert!(residual.norm() <= outcome.residual_history[0]);
  assert_relative_eq!(residual.norm(), outcome.final_residual(), epsilon = 1e-12);
}

#[test]
fn plate_solve_is_bit_identical() {
  let graph = plate_graph(16);
  let problem = PoissonProblem::new(
    &graph,
    &PlateWithHoles::default(),
    &CosineForcing::default(),
  )
  .unwrap();
  let jacobi = Jacobi::new(&problem.operator().diagonal());
  let config = CgConfig::default().with_max_iterations(2000);

  let first = problem.solve(config, &jacobi).unwrap();
  let second = problem.solve(config, &jacobi).unwrap();
  assert_eq!(first.termination, second.termination);
  assert_eq!(first.iterations, second.iterations);
  assert_eq!(first.solution, second.solution);
  assert_eq!(first.residual_history, second.residual_history);
}

//! Solves the Poisson problem on a square plate with four square holes and a
//! rectangular source, and writes `x y z value` per node to
//! `out/plate_with_holes.txt`.
//!
//! Usage: `plate_with_holes [NODES_FILE QUADS_FILE]`.
//! Without arguments a structured mesh of the unit square is generated.
//! Either way the mesh is mapped from $[0,1]^2$ onto $[-1,1]^2$.

extern crate nalgebra as na;

use graph_poisson::{
  boundary::{CosineForcing, PlateWithHoles},
  geometry::Point,
  io::save_node_values,
  mesh::{self, cartesian::CartesianGrid},
  problem::PoissonProblem,
  solver::{precond::Jacobi, CgConfig},
};

fn main() {
  tracing_subscriber::fmt::init();

  let to_plate = |p: &Point| p * 2.0 - Point::new(1.0, 1.0, 0.0);

  let args: Vec<String> = std::env::args().skip(1).collect();
  let mut graph = match args.as_slice() {
    [nodes, quads] => mesh::load_text(nodes, quads, to_plate).unwrap(),
    [] => CartesianGrid::new(40).unwrap().build_graph(to_plate).unwrap(),
    _ => {
      eprintln!("usage: plate_with_holes [NODES_FILE QUADS_FILE]");
      std::process::exit(1);
    }
  };

  let plate = PlateWithHoles::default();
  let h = graph.mesh_width().unwrap();
  for bb in plate.excavations(h) {
    graph.remove_box(&bb);
  }

  let solution: na::DVector<f64> = {
    let problem = PoissonProblem::new(&graph, &plate, &CosineForcing::default()).unwrap();
    let jacobi = Jacobi::new(&problem.operator().diagonal());
    let config = CgConfig::default().with_max_iterations(10 * graph.nnodes());
    let outcome = problem.solve(config, &jacobi).unwrap();
    println!(
      "{:?} after {} iterations, residual {:.3e}",
      outcome.termination,
      outcome.iterations,
      outcome.final_residual()
    );
    outcome.solution
  };
  graph.set_values(&solution).unwrap();

  std::fs::create_dir_all("out").unwrap();
  save_node_values(&graph, "out/plate_with_holes.txt").unwrap();
}

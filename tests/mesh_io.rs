use graph_poisson::{
  boundary::{CosineForcing, PlateWithHoles},
  geometry::Point,
  io::save_node_values,
  mesh::{self, cartesian::CartesianGrid},
  problem::PoissonProblem,
  solver::{precond::Identity, CgConfig},
  Error,
};

use std::{fs, path::PathBuf};

fn scratch_dir(name: &str) -> PathBuf {
  let dir = std::env::temp_dir().join(format!("graph-poisson-{}-{name}", std::process::id()));
  fs::create_dir_all(&dir).unwrap();
  dir
}

fn to_plate(p: &Point) -> Point {
  p * 2.0 - Point::new(1.0, 1.0, 0.0)
}

#[test]
fn text_files_reproduce_grid() {
  let dir = scratch_dir("roundtrip");
  let (points_path, quads_path) = (dir.join("nodes.txt"), dir.join("quads.txt"));

  let grid = CartesianGrid::new(6).unwrap();
  grid.write_text(&points_path, &quads_path).unwrap();

  let loaded = mesh::load_text(&points_path, &quads_path, to_plate).unwrap();
  let built = grid.build_graph(to_plate).unwrap();
  assert_eq!(loaded.nnodes(), built.nnodes());
  assert_eq!(loaded.nedges(), built.nedges());
  for inode in 0..built.nnodes() {
    assert_eq!(loaded.position(inode), built.position(inode));
  }
  assert!(loaded.edges().eq(built.edges()));

  fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn loaded_plate_solves_like_generated_plate() {
  let dir = scratch_dir("plate");
  let (points_path, quads_path) = (dir.join("nodes.txt"), dir.join("quads.txt"));
  let grid = CartesianGrid::new(10).unwrap();
  grid.write_text(&points_path, &quads_path).unwrap();

  let solve = |mut graph: graph_poisson::graph::Graph| {
    let h = graph.mesh_width().unwrap();
    for bb in PlateWithHoles::default().excavations(h) {
      graph.remove_box(&bb);
    }
    let problem = PoissonProblem::new(
      &graph,
      &PlateWithHoles::default(),
      &CosineForcing::default(),
    )
    .unwrap();
    let solution = problem
      .solve(CgConfig::default().with_max_iterations(500), &Identity)
      .unwrap()
      .into_converged()
      .unwrap();
    graph.set_values(&solution).unwrap();
    graph
  };

  let loaded = solve(mesh::load_text(&points_path, &quads_path, to_plate).unwrap());
  let built = solve(grid.build_graph(to_plate).unwrap());
  assert_eq!(loaded.values(), built.values());

  let out = dir.join("solution.txt");
  save_node_values(&loaded, &out).unwrap();
  let text = fs::read_to_string(&out).unwrap();
  assert_eq!(text.lines().count(), loaded.nnodes());
  let first: Vec<f64> = text
    .lines()
    .next()
    .unwrap()
    .split_whitespace()
    .map(|t| t.parse().unwrap())
    .collect();
  assert_eq!(first.len(), 4);
  assert_eq!(first[3], loaded.node(0).value());

  fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn quads_must_reference_existing_points() {
  let points = vec![Point::zeros(), Point::x(), Point::y()];
  let err = mesh::graph_from_quads(&points, &[[0, 1, 2, 3]]).unwrap_err();
  assert!(matches!(err, Error::NodeOutOfRange { index: 3, nnodes: 3 }), "{err}");
}

#[test]
fn missing_file_is_io_error() {
  let dir = scratch_dir("missing");
  let err = mesh::load_text(dir.join("nope.txt"), dir.join("nope.txt"), |p| *p).unwrap_err();
  assert!(matches!(err, Error::Io(_)));
  fs::remove_dir_all(&dir).unwrap();
}

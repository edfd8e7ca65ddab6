use crate::graph::Graph;

use std::{
  fs::File,
  io::{BufWriter, Write},
  path::Path,
};

/// One value per line.
pub fn save_vector(mu: &na::DVector<f64>, path: impl AsRef<Path>) -> std::io::Result<()> {
  let file = File::create(path)?;
  let writer = BufWriter::new(file);
  write_vector(writer, mu)
}

pub fn write_vector<W: Write>(mut writer: W, mu: &na::DVector<f64>) -> std::io::Result<()> {
  for v in mu.iter() {
    writeln!(writer, "{v}")?;
  }
  writer.flush()
}

/// `x y z value` per node, in node order.
pub fn save_node_values(graph: &Graph, path: impl AsRef<Path>) -> std::io::Result<()> {
  let file = File::create(path)?;
  let writer = BufWriter::new(file);
  write_node_values(writer, graph)
}

pub fn write_node_values<W: Write>(mut writer: W, graph: &Graph) -> std::io::Result<()> {
  for node in graph.nodes() {
    let p = node.position();
    writeln!(writer, "{} {} {} {}", p.x, p.y, p.z, node.value())?;
  }
  writer.flush()
}

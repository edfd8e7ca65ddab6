//! Structured quad meshes of the unit square.

use super::{graph_from_quads, Quad};
use crate::{
  error::{Error, Result},
  geometry::Point,
  graph::Graph,
  NodeIdx,
};

use std::{
  fs::File,
  io::{BufWriter, Write},
  path::Path,
};

/// converts linear index to cartesian index in 2D
pub fn linear_index2cartesian_index(lin_idx: usize, dim_len: usize) -> [usize; 2] {
  [lin_idx % dim_len, lin_idx / dim_len]
}

/// converts cartesian index to linear index in 2D
pub fn cartesian_index2linear_index(cart_idx: [usize; 2], dim_len: usize) -> usize {
  cart_idx[0] + dim_len * cart_idx[1]
}

/// The unit square $[0,1]^2$ in the plane $z = 0$, split into
/// `ncells_axis` x `ncells_axis` square cells.
/// Nodes are numbered lexicographically, x running fastest.
#[derive(Debug, Clone, Copy)]
pub struct CartesianGrid {
  ncells_axis: usize,
}
impl CartesianGrid {
  /// Fails with [`Error::DegenerateMesh`] for zero cells, which would leave
  /// a single node without edges.
  pub fn new(ncells_axis: usize) -> Result<Self> {
    if ncells_axis == 0 {
      return Err(Error::DegenerateMesh);
    }
    Ok(Self { ncells_axis })
  }

  pub fn ncells_axis(&self) -> usize {
    self.ncells_axis
  }
  pub fn nnodes_axis(&self) -> usize {
    self.ncells_axis + 1
  }
  pub fn ncells(&self) -> usize {
    self.ncells_axis.pow(2)
  }
  pub fn nnodes(&self) -> usize {
    self.nnodes_axis().pow(2)
  }
  pub fn mesh_width(&self) -> f64 {
    (self.ncells_axis as f64).recip()
  }

  pub fn node_pos(&self, inode: NodeIdx) -> Point {
    let [ix, iy] = linear_index2cartesian_index(inode, self.nnodes_axis());
    let n = self.ncells_axis as f64;
    Point::new(ix as f64 / n, iy as f64 / n, 0.0)
  }

  pub fn points(&self) -> Vec<Point> {
    (0..self.nnodes()).map(|inode| self.node_pos(inode)).collect()
  }

  /// One quad `[a, b, c, d]` per cell, with `b = a + e_x`, `c = a + e_y`
  /// and `d = a + e_x + e_y`.
  pub fn quads(&self) -> Vec<Quad> {
    let nnodes_axis = self.nnodes_axis();
    (0..self.ncells())
      .map(|icell| {
        let [cx, cy] = linear_index2cartesian_index(icell, self.ncells_axis);
        let node = |ix, iy| cartesian_index2linear_index([ix, iy], nnodes_axis);
        [
          node(cx, cy),
          node(cx + 1, cy),
          node(cx, cy + 1),
          node(cx + 1, cy + 1),
        ]
      })
      .collect()
  }

  /// Builds the grid graph, mapping every node position through `transform`.
  pub fn build_graph<F>(&self, transform: F) -> Result<Graph>
  where
    F: Fn(&Point) -> Point,
  {
    let points: Vec<_> = self.points().iter().map(transform).collect();
    graph_from_quads(&points, &self.quads())
  }

  /// Writes the grid in the points/quads text format.
  pub fn write_text(
    &self,
    points_path: impl AsRef<Path>,
    quads_path: impl AsRef<Path>,
  ) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(points_path)?);
    for p in self.points() {
      writeln!(writer, "{} {} {}", p.x, p.y, p.z)?;
    }
    writer.flush()?;

    let mut writer = BufWriter::new(File::create(quads_path)?);
    for [a, b, c, d] in self.quads() {
      writeln!(writer, "{a} {b} {c} {d}")?;
    }
    writer.flush()
  }
}

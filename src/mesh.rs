//! Building mesh graphs from external descriptions.
//!
//! The text format consists of two files. The points file has one point per
//! line, given by three floats. The quads file has one cell per line, given
//! by four node indices `[a, b, c, d]`, which contributes the edges
//! `(a,b), (a,c), (b,d), (c,d)`. Blank lines and lines starting with `#` are
//! skipped.

pub mod cartesian;
pub mod gmsh;

use crate::{
  error::{Error, Result},
  geometry::Point,
  graph::Graph,
  NodeIdx,
};

use itertools::Itertools;
use std::{
  fs::File,
  io::{BufRead, BufReader},
  path::Path,
  str::FromStr,
};
use tracing::info;

pub type Quad = [NodeIdx; 4];

/// The four edges of a quad, as local vertex pairs.
pub const QUAD_EDGES: [(usize, usize); 4] = [(0, 1), (0, 2), (1, 3), (2, 3)];

pub fn read_points<R: BufRead>(reader: R) -> Result<Vec<Point>> {
  read_records(reader, |[x, y, z]: [f64; 3]| Point::new(x, y, z))
}

pub fn read_quads<R: BufRead>(reader: R) -> Result<Vec<Quad>> {
  read_records(reader, |quad: Quad| quad)
}

/// Builds a graph from points and quads.
/// The node indices of the graph are the indices into `points`.
pub fn graph_from_quads(points: &[Point], quads: &[Quad]) -> Result<Graph> {
  let mut graph = Graph::new();
  for p in points {
    graph.add_node(*p);
  }
  for quad in quads {
    for (a, b) in QUAD_EDGES {
      graph.add_edge(quad[a], quad[b])?;
    }
  }
  Ok(graph)
}

/// Loads a graph from a points file and a quads file.
///
/// `transform` is applied to every point before it is inserted.
pub fn load_text<F>(
  points_path: impl AsRef<Path>,
  quads_path: impl AsRef<Path>,
  transform: F,
) -> Result<Graph>
where
  F: Fn(&Point) -> Point,
{
  let points: Vec<_> = read_points(BufReader::new(File::open(points_path)?))?
    .iter()
    .map(transform)
    .collect();
  let quads = read_quads(BufReader::new(File::open(quads_path)?))?;
  let graph = graph_from_quads(&points, &quads)?;
  info!(
    "loaded mesh graph with {} nodes and {} edges",
    graph.nnodes(),
    graph.nedges()
  );
  Ok(graph)
}

/// Parses every non-empty, non-comment line into `N` whitespace separated
/// values of type `T`.
fn read_records<R, T, U, const N: usize>(reader: R, f: impl Fn([T; N]) -> U) -> Result<Vec<U>>
where
  R: BufRead,
  T: FromStr,
  T::Err: std::fmt::Display,
{
  let mut records = Vec::new();
  for (iline, line) in reader.lines().enumerate() {
    let line = line?;
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
      continue;
    }
    let parse_error = |reason: String| Error::Parse {
      line: iline + 1,
      reason,
    };

    let tokens = line.split_whitespace().collect_vec();
    if tokens.len() != N {
      return Err(parse_error(format!(
        "expected {N} values, found {}",
        tokens.len()
      )));
    }
    let values = tokens
      .into_iter()
      .map(|t| t.parse::<T>().map_err(|e| parse_error(format!("`{t}`: {e}"))))
      .collect::<Result<Vec<T>>>()?;
    let values = <[T; N]>::try_from(values)
      .map_err(|_| parse_error(format!("expected {N} values")))?;
    records.push(f(values));
  }
  Ok(records)
}

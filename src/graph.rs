//! Undirected mesh graph.
//!
//! Nodes carry a position and a scalar value, edges are unordered node pairs.
//! Node indices are always dense (`0..nnodes`) and double as row indices of
//! the linear system. Removing nodes re-densifies the indices.

use crate::{
  error::{Error, Result},
  geometry::{BoundingBox, Point},
  EdgeIdx, NodeIdx,
};

use indexmap::IndexSet;
use tracing::trace;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
  position: Point,
  value: f64,
}
impl Node {
  pub fn position(&self) -> &Point {
    &self.position
  }
  pub fn value(&self) -> f64 {
    self.value
  }
}

/// Edge between two nodes without orientation.
/// Always use `Self::new` never construct tuple directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge(NodeIdx, NodeIdx);
impl Edge {
  pub fn new(a: NodeIdx, b: NodeIdx) -> Self {
    if a < b {
      Self(a, b)
    } else {
      Self(b, a)
    }
  }
  pub fn node1(&self) -> NodeIdx {
    self.0
  }
  pub fn node2(&self) -> NodeIdx {
    self.1
  }
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
  nodes: Vec<Node>,
  /// Neighbours of each node, in insertion order.
  adjacency: Vec<IndexSet<NodeIdx>>,
  edges: IndexSet<Edge>,
}

// getters
impl Graph {
  pub fn new() -> Self {
    Self::default()
  }
  pub fn nnodes(&self) -> usize {
    self.nodes.len()
  }
  pub fn nedges(&self) -> usize {
    self.edges.len()
  }
  pub fn node(&self, inode: NodeIdx) -> &Node {
    &self.nodes[inode]
  }
  pub fn nodes(&self) -> &[Node] {
    &self.nodes
  }
  pub fn position(&self, inode: NodeIdx) -> &Point {
    &self.nodes[inode].position
  }
  pub fn edge(&self, iedge: EdgeIdx) -> Edge {
    self.edges[iedge]
  }
  pub fn edges(&self) -> impl ExactSizeIterator<Item = Edge> + '_ {
    self.edges.iter().copied()
  }
  pub fn degree(&self, inode: NodeIdx) -> usize {
    self.adjacency[inode].len()
  }
  pub fn neighbors(&self, inode: NodeIdx) -> impl ExactSizeIterator<Item = NodeIdx> + '_ {
    self.adjacency[inode].iter().copied()
  }
  pub fn has_edge(&self, a: NodeIdx, b: NodeIdx) -> bool {
    self.edges.contains(&Edge::new(a, b))
  }

  pub fn edge_length(&self, iedge: EdgeIdx) -> f64 {
    let edge = self.edges[iedge];
    (self.position(edge.node2()) - self.position(edge.node1())).norm()
  }

  /// The representative mesh width $h$.
  ///
  /// Taken from the first edge. All edges are assumed to have about the same
  /// length, which holds for the structured meshes this crate targets.
  pub fn mesh_width(&self) -> Result<f64> {
    if self.edges.is_empty() {
      return Err(Error::DegenerateMesh);
    }
    Ok(self.edge_length(0))
  }

  /// The node values as a vector indexed by node.
  pub fn values(&self) -> na::DVector<f64> {
    na::DVector::from_iterator(self.nnodes(), self.nodes.iter().map(|n| n.value))
  }
}

// mutation
impl Graph {
  pub fn add_node(&mut self, position: Point) -> NodeIdx {
    self.nodes.push(Node {
      position,
      value: 0.0,
    });
    self.adjacency.push(IndexSet::new());
    self.nodes.len() - 1
  }

  /// Adds the edge `{a, b}` and returns its index.
  /// Adding an existing edge returns the index of the existing one.
  pub fn add_edge(&mut self, a: NodeIdx, b: NodeIdx) -> Result<EdgeIdx> {
    self.check_node(a)?;
    self.check_node(b)?;
    if a == b {
      return Err(Error::SelfLoop(a));
    }
    let (iedge, is_new) = self.edges.insert_full(Edge::new(a, b));
    if is_new {
      self.adjacency[a].insert(b);
      self.adjacency[b].insert(a);
    }
    Ok(iedge)
  }

  pub fn set_value(&mut self, inode: NodeIdx, value: f64) {
    self.nodes[inode].value = value;
  }

  /// Writes one value per node, e.g. a solution vector.
  pub fn set_values(&mut self, values: &na::DVector<f64>) -> Result<()> {
    if values.len() != self.nnodes() {
      return Err(Error::DimensionMismatch {
        expected: self.nnodes(),
        input: values.len(),
        output: self.nnodes(),
      });
    }
    for (node, &v) in self.nodes.iter_mut().zip(values.iter()) {
      node.value = v;
    }
    Ok(())
  }

  /// Removes a single node together with its incident edges.
  pub fn remove_node(&mut self, inode: NodeIdx) -> Result<()> {
    self.check_node(inode)?;
    self.retain_nodes(|i, _| i != inode);
    Ok(())
  }

  /// Removes all nodes inside `bb`. Returns the number of removed nodes.
  pub fn remove_box(&mut self, bb: &BoundingBox) -> usize {
    let nnodes_old = self.nnodes();
    self.retain_nodes(|_, node| !bb.contains(node.position()));
    nnodes_old - self.nnodes()
  }

  /// Keeps only the nodes for which `keep` holds, dropping all edges incident
  /// to removed nodes.
  ///
  /// Surviving nodes and edges keep their relative order and are renumbered
  /// densely.
  pub fn retain_nodes<F>(&mut self, keep: F)
  where
    F: Fn(NodeIdx, &Node) -> bool,
  {
    let nnodes_old = self.nnodes();
    let mut old2new = vec![None; nnodes_old];
    let mut nodes = Vec::new();
    for (iold, node) in std::mem::take(&mut self.nodes).into_iter().enumerate() {
      if keep(iold, &node) {
        old2new[iold] = Some(nodes.len());
        nodes.push(node);
      }
    }

    let edges: IndexSet<Edge> = self
      .edges
      .iter()
      .filter_map(|e| Some(Edge::new(old2new[e.0]?, old2new[e.1]?)))
      .collect();

    let mut adjacency = vec![IndexSet::new(); nodes.len()];
    for (iold, neighbors) in std::mem::take(&mut self.adjacency).into_iter().enumerate() {
      let Some(inew) = old2new[iold] else {
        continue;
      };
      adjacency[inew] = neighbors.into_iter().filter_map(|j| old2new[j]).collect();
    }

    trace!(
      "retained {} of {nnodes_old} nodes and {} of {} edges",
      nodes.len(),
      edges.len(),
      self.edges.len()
    );

    self.nodes = nodes;
    self.adjacency = adjacency;
    self.edges = edges;
  }

  fn check_node(&self, inode: NodeIdx) -> Result<()> {
    if inode >= self.nnodes() {
      return Err(Error::NodeOutOfRange {
        index: inode,
        nnodes: self.nnodes(),
      });
    }
    Ok(())
  }
}

//! Boundary classification and forcing.
//!
//! Both are pure functions of a node position. The classification of a whole
//! graph is computed once into [`NodeConstraints`], which is then shared by
//! the operator and the right-hand side, so the two always agree on which
//! rows are fixed.

use crate::{
  geometry::{norm_1, norm_inf, BoundingBox, Point},
  graph::Graph,
  NodeIdx,
};

/// What determines the solution value at a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
  /// Dirichlet node with a prescribed value.
  Fixed(f64),
  /// Free node, governed by the PDE and its forcing term.
  Forcing,
}
impl Constraint {
  pub fn fixed_value(&self) -> Option<f64> {
    match *self {
      Self::Fixed(v) => Some(v),
      Self::Forcing => None,
    }
  }
  pub fn is_fixed(&self) -> bool {
    matches!(self, Self::Fixed(_))
  }
}

pub trait BoundaryClassifier {
  fn classify(&self, p: &Point) -> Constraint;
}
impl<F> BoundaryClassifier for F
where
  F: Fn(&Point) -> Constraint,
{
  fn classify(&self, p: &Point) -> Constraint {
    self(p)
  }
}

pub trait ForcingFunction {
  fn eval(&self, p: &Point) -> f64;
}
impl<F> ForcingFunction for F
where
  F: Fn(&Point) -> f64,
{
  fn eval(&self, p: &Point) -> f64 {
    self(p)
  }
}

/// Square plate $[-1,1]^2$ with four square holes and a rectangular source.
///
/// Rules are checked in order, the first match wins:
/// outer boundary, hole boundaries, source box, free interior.
#[derive(Debug, Clone)]
pub struct PlateWithHoles {
  pub outer_radius: f64,
  pub outer_value: f64,
  pub hole_centers: [Point; 4],
  pub hole_radius: f64,
  pub hole_value: f64,
  pub source: BoundingBox,
  pub source_value: f64,
}
impl Default for PlateWithHoles {
  fn default() -> Self {
    Self {
      outer_radius: 1.0,
      outer_value: 0.0,
      hole_centers: [
        Point::new(0.6, 0.6, 0.0),
        Point::new(-0.6, 0.6, 0.0),
        Point::new(0.6, -0.6, 0.0),
        Point::new(-0.6, -0.6, 0.0),
      ],
      hole_radius: 0.2,
      hole_value: -0.2,
      source: BoundingBox::new(Point::new(-0.6, -0.2, -1.0), Point::new(0.6, 0.2, 1.0)),
      source_value: 1.0,
    }
  }
}
impl PlateWithHoles {
  /// Boxes to cut out of a structured plate mesh of width `h`: the interiors
  /// of the four holes and of the source, leaving one ring of nodes on each
  /// inner boundary.
  pub fn excavations(&self, h: f64) -> [BoundingBox; 5] {
    let shrink = |bb: BoundingBox| {
      let inset = Point::new(h, h, 0.0);
      BoundingBox::new(bb.min() + inset, bb.max() - inset)
    };
    let hole = |c: &Point| {
      let r = Point::new(self.hole_radius, self.hole_radius, 1.0);
      shrink(BoundingBox::new(c - r, c + r))
    };
    [
      hole(&self.hole_centers[0]),
      hole(&self.hole_centers[1]),
      hole(&self.hole_centers[2]),
      hole(&self.hole_centers[3]),
      shrink(self.source),
    ]
  }
}
impl BoundaryClassifier for PlateWithHoles {
  fn classify(&self, p: &Point) -> Constraint {
    if norm_inf(p) == self.outer_radius {
      Constraint::Fixed(self.outer_value)
    } else if self
      .hole_centers
      .iter()
      .any(|c| norm_inf(&(p - c)) < self.hole_radius)
    {
      Constraint::Fixed(self.hole_value)
    } else if self.source.contains(p) {
      Constraint::Fixed(self.source_value)
    } else {
      Constraint::Forcing
    }
  }
}

/// $f(x) = a cos(norm(x)_1)$
#[derive(Debug, Clone, Copy)]
pub struct CosineForcing {
  pub amplitude: f64,
}
impl Default for CosineForcing {
  fn default() -> Self {
    Self { amplitude: 5.0 }
  }
}
impl ForcingFunction for CosineForcing {
  fn eval(&self, p: &Point) -> f64 {
    self.amplitude * norm_1(p).cos()
  }
}

/// The classification of every node of one graph snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeConstraints {
  constraints: Vec<Constraint>,
}
impl NodeConstraints {
  pub fn classify(graph: &Graph, classifier: &impl BoundaryClassifier) -> Self {
    let constraints = graph
      .nodes()
      .iter()
      .map(|node| classifier.classify(node.position()))
      .collect();
    Self { constraints }
  }

  pub fn from_vec(constraints: Vec<Constraint>) -> Self {
    Self { constraints }
  }

  pub fn len(&self) -> usize {
    self.constraints.len()
  }
  pub fn is_empty(&self) -> bool {
    self.constraints.is_empty()
  }
  pub fn get(&self, inode: NodeIdx) -> Constraint {
    self.constraints[inode]
  }
  pub fn is_fixed(&self, inode: NodeIdx) -> bool {
    self.constraints[inode].is_fixed()
  }
  pub fn fixed_value(&self, inode: NodeIdx) -> Option<f64> {
    self.constraints[inode].fixed_value()
  }
  pub fn iter(&self) -> impl ExactSizeIterator<Item = Constraint> + '_ {
    self.constraints.iter().copied()
  }
  pub fn nfixed(&self) -> usize {
    self.constraints.iter().filter(|c| c.is_fixed()).count()
  }
}

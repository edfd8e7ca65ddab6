pub type Point = na::Vector3<f64>;

/// Maximum absolute coordinate.
pub fn norm_inf(p: &Point) -> f64 {
  p.amax()
}

/// Sum of absolute coordinates.
pub fn norm_1(p: &Point) -> f64 {
  p.lp_norm(1)
}

/// Axis-aligned box in 3D. Containment is inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
  min: Point,
  max: Point,
}
impl BoundingBox {
  /// The corners may be given in any order, the box is normalized per axis.
  pub fn new(a: Point, b: Point) -> Self {
    let min = a.inf(&b);
    let max = a.sup(&b);
    Self { min, max }
  }

  pub fn min(&self) -> &Point {
    &self.min
  }
  pub fn max(&self) -> &Point {
    &self.max
  }
  pub fn side_lengths(&self) -> Point {
    self.max - self.min
  }

  pub fn contains(&self, p: &Point) -> bool {
    (0..3).all(|i| self.min[i] <= p[i] && p[i] <= self.max[i])
  }
}

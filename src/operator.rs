//! Matrix-free linear operators.
//!
//! [`GraphLaplacian`] is the system matrix of the Poisson problem, defined
//! directly on the graph adjacency. Dirichlet nodes get identity rows and
//! their columns are decoupled, which keeps the operator symmetric without
//! changing the system size:
//! $mat(L_0, 0; 0, I) vec(u_0, u_diff) = vec(b_0, g)$

use crate::{
  boundary::NodeConstraints,
  error::{Error, Result},
  graph::Graph,
  NodeIdx,
};

use rayon::prelude::*;

/// How a computed product is written into the output vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Assign {
  /// `y = A x`
  #[default]
  Set,
  /// `y += A x`
  Add,
  /// `y -= A x`
  Sub,
}
impl Assign {
  #[inline]
  pub fn apply(self, target: &mut f64, value: f64) {
    match self {
      Self::Set => *target = value,
      Self::Add => *target += value,
      Self::Sub => *target -= value,
    }
  }
}

pub trait LinearOperator {
  fn dim(&self) -> usize;

  /// Computes the matrix-vector product and combines it into `output`.
  ///
  /// Fails without touching `output` if either vector does not have length
  /// [`Self::dim`].
  fn apply(
    &self,
    input: &na::DVector<f64>,
    output: &mut na::DVector<f64>,
    assign: Assign,
  ) -> Result<()>;

  fn mul(&self, input: &na::DVector<f64>) -> Result<na::DVector<f64>> {
    let mut output = na::DVector::zeros(self.dim());
    self.apply(input, &mut output, Assign::Set)?;
    Ok(output)
  }

  fn check_dims(&self, input: usize, output: usize) -> Result<()> {
    let expected = self.dim();
    if input != expected || output != expected {
      return Err(Error::DimensionMismatch {
        expected,
        input,
        output,
      });
    }
    Ok(())
  }
}

/// Graph Laplacian with Dirichlet rows, as a borrowed view.
#[derive(Debug, Clone, Copy)]
pub struct GraphLaplacian<'g> {
  graph: &'g Graph,
  constraints: &'g NodeConstraints,
}

impl<'g> GraphLaplacian<'g> {
  pub fn new(graph: &'g Graph, constraints: &'g NodeConstraints) -> Result<Self> {
    if constraints.len() != graph.nnodes() {
      return Err(Error::DimensionMismatch {
        expected: graph.nnodes(),
        input: constraints.len(),
        output: constraints.len(),
      });
    }
    Ok(Self::new_unchecked(graph, constraints))
  }
  /// Caller guarantees that `constraints` covers exactly the graph's nodes.
  pub(crate) fn new_unchecked(graph: &'g Graph, constraints: &'g NodeConstraints) -> Self {
    debug_assert_eq!(constraints.len(), graph.nnodes());
    Self { graph, constraints }
  }

  pub fn graph(&self) -> &'g Graph {
    self.graph
  }
  pub fn constraints(&self) -> &'g NodeConstraints {
    self.constraints
  }

  /// Plain graph Laplacian $L$, ignoring boundary conditions.
  pub fn laplacian_entry(&self, i: NodeIdx, j: NodeIdx) -> f64 {
    if i == j {
      -(self.graph.degree(i) as f64)
    } else if self.graph.has_edge(i, j) {
      1.0
    } else {
      0.0
    }
  }

  /// System matrix entry $A_(i j)$.
  pub fn entry(&self, i: NodeIdx, j: NodeIdx) -> f64 {
    let fixed_i = self.constraints.is_fixed(i);
    let fixed_j = self.constraints.is_fixed(j);
    if i == j && fixed_i {
      1.0
    } else if i != j && (fixed_i || fixed_j) {
      0.0
    } else {
      self.laplacian_entry(i, j)
    }
  }

  pub fn diagonal(&self) -> na::DVector<f64> {
    na::DVector::from_fn(self.dim(), |i, _| self.entry(i, i))
  }

  /// $(A x)_i$, visiting only the neighbours of `i`.
  #[inline]
  fn row_product(&self, i: NodeIdx, x: &na::DVector<f64>) -> f64 {
    if self.constraints.is_fixed(i) {
      return x[i];
    }
    let mut sum = -(self.graph.degree(i) as f64) * x[i];
    for j in self.graph.neighbors(i) {
      if !self.constraints.is_fixed(j) {
        sum += x[j];
      }
    }
    sum
  }

  /// Same as [`LinearOperator::apply`], with rows computed in parallel.
  /// Every row is summed in the same order, so the result is identical.
  pub fn apply_par(
    &self,
    input: &na::DVector<f64>,
    output: &mut na::DVector<f64>,
    assign: Assign,
  ) -> Result<()> {
    self.check_dims(input.len(), output.len())?;
    output
      .as_mut_slice()
      .par_iter_mut()
      .enumerate()
      .for_each(|(i, y)| assign.apply(y, self.row_product(i, input)));
    Ok(())
  }

  /// Materializes the operator, for verification and direct solves only.
  pub fn to_coo(&self) -> nas::CooMatrix<f64> {
    let n = self.dim();
    let mut coo = nas::CooMatrix::new(n, n);
    for i in 0..n {
      for j in std::iter::once(i).chain(self.graph.neighbors(i)) {
        let v = self.entry(i, j);
        if v != 0.0 {
          coo.push(i, j, v);
        }
      }
    }
    coo
  }
}

impl LinearOperator for GraphLaplacian<'_> {
  fn dim(&self) -> usize {
    self.graph.nnodes()
  }

  fn apply(
    &self,
    input: &na::DVector<f64>,
    output: &mut na::DVector<f64>,
    assign: Assign,
  ) -> Result<()> {
    self.check_dims(input.len(), output.len())?;
    for (i, y) in output.iter_mut().enumerate() {
      assign.apply(y, self.row_product(i, input));
    }
    Ok(())
  }
}

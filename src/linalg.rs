//! Sparse direct solves through faer, used to cross-check the iterative solver.

use crate::{
  error::{Error, Result},
  operator::{GraphLaplacian, LinearOperator},
};

use faer::solvers::SpSolver;
use itertools::Itertools;
use tracing::debug;

/// Sparse LU factorization of a square matrix.
pub struct FaerLu {
  raw: faer::sparse::linalg::solvers::Lu<usize, f64>,
  dim: usize,
}
impl FaerLu {
  /// Factorizes the matrix given by `coo`. Duplicate entries are summed.
  pub fn new(coo: &nas::CooMatrix<f64>) -> Result<Self> {
    let dim = coo.nrows();
    if coo.ncols() != dim {
      return Err(Error::DirectSolve(format!(
        "matrix is not square: {dim}x{}",
        coo.ncols()
      )));
    }
    let triplets = coo.triplet_iter().map(|(i, j, &v)| (i, j, v)).collect_vec();
    let raw = faer::sparse::SparseColMat::try_new_from_triplets(dim, dim, &triplets)
      .map_err(|e| Error::DirectSolve(format!("{e:?}")))?
      .sp_lu()
      .map_err(|e| Error::DirectSolve(format!("{e:?}")))?;
    Ok(Self { raw, dim })
  }

  pub fn dim(&self) -> usize {
    self.dim
  }

  pub fn solve(&self, b: &na::DVector<f64>) -> Result<na::DVector<f64>> {
    if b.len() != self.dim {
      return Err(Error::DimensionMismatch {
        expected: self.dim,
        input: b.len(),
        output: self.dim,
      });
    }
    let b = faer::col::from_slice(b.as_slice());
    Ok(na::DVector::from_vec(self.raw.solve(b).as_slice().to_vec()))
  }
}

/// Materializes the operator and solves the system exactly.
pub fn solve_direct(operator: &GraphLaplacian, rhs: &na::DVector<f64>) -> Result<na::DVector<f64>> {
  operator.check_dims(rhs.len(), rhs.len())?;
  let coo = operator.to_coo();
  debug!("sparse LU of {0}x{0} matrix with {1} non-zeros", coo.nrows(), coo.nnz());
  FaerLu::new(&coo)?.solve(rhs)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lu_solves_small_system() {
    let mut coo = nas::CooMatrix::new(3, 3);
    coo.push(0, 0, 4.0);
    coo.push(0, 1, 1.0);
    coo.push(1, 0, 1.0);
    coo.push(1, 1, 3.0);
    coo.push(2, 2, -2.0);
    let x_exact = na::DVector::from_vec(vec![1.0, -2.0, 0.5]);
    let b = &nas::CscMatrix::from(&coo) * &x_exact;

    let lu = FaerLu::new(&coo).unwrap();
    assert_eq!(lu.dim(), 3);
    let x = lu.solve(&b).unwrap();
    assert!((x - x_exact).norm() < 1e-12);
  }

  #[test]
  fn duplicate_entries_are_summed() {
    let mut coo = nas::CooMatrix::new(2, 2);
    coo.push(0, 0, 1.0);
    coo.push(0, 0, 1.0);
    coo.push(1, 1, 4.0);
    let x = FaerLu::new(&coo)
      .unwrap()
      .solve(&na::DVector::from_vec(vec![2.0, 2.0]))
      .unwrap();
    assert!((x - na::DVector::from_vec(vec![1.0, 0.5])).norm() < 1e-14);
  }

  #[test]
  fn rejects_bad_shapes() {
    let mut coo = nas::CooMatrix::new(2, 2);
    coo.push(0, 0, 1.0);
    coo.push(1, 1, 1.0);
    let lu = FaerLu::new(&coo).unwrap();
    assert!(matches!(
      lu.solve(&na::DVector::zeros(3)),
      Err(Error::DimensionMismatch { .. })
    ));

    let rect = nas::CooMatrix::<f64>::new(2, 3);
    assert!(matches!(FaerLu::new(&rect), Err(Error::DirectSolve(_))));
  }
}

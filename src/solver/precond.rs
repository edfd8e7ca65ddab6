//! Preconditioners $M approx A^(-1)$ for conjugate gradients.

pub trait Preconditioner {
  /// Computes `z = M r`.
  fn apply(&self, r: &na::DVector<f64>, z: &mut na::DVector<f64>);
}

/// No preconditioning, `z = r`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;
impl Preconditioner for Identity {
  fn apply(&self, r: &na::DVector<f64>, z: &mut na::DVector<f64>) {
    z.copy_from(r);
  }
}

/// Diagonal scaling, `z_i = r_i / a_(i i)`.
/// Rows with a zero diagonal are passed through unscaled.
#[derive(Debug, Clone)]
pub struct Jacobi {
  inv_diagonal: na::DVector<f64>,
}
impl Jacobi {
  pub fn new(diagonal: &na::DVector<f64>) -> Self {
    let inv_diagonal = diagonal.map(|d| if d != 0.0 { d.recip() } else { 1.0 });
    Self { inv_diagonal }
  }
}
impl Preconditioner for Jacobi {
  fn apply(&self, r: &na::DVector<f64>, z: &mut na::DVector<f64>) {
    z.copy_from(&r.component_mul(&self.inv_diagonal));
  }
}

//! Preconditioned conjugate gradients on matrix-free operators.
//!
//! The solver is a small state machine: [`ConjugateGradient::new`] initializes
//! the iterate and residual, [`ConjugateGradient::step`] performs one update
//! and checks for termination, [`ConjugateGradient::run`] steps until a
//! terminal state is reached.

pub mod precond;

use crate::{
  error::{Error, Result},
  operator::{Assign, LinearOperator},
};
use precond::Preconditioner;

use tracing::{debug, info, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CgConfig {
  pub max_iterations: usize,
  /// Converged once $norm(r) <= "rel" norm(b)$.
  pub rel_tolerance: f64,
  /// Converged once $norm(r) <= "abs"$.
  pub abs_tolerance: f64,
  /// Log progress every this many iterations. Zero disables it.
  pub log_cycle: usize,
}
impl Default for CgConfig {
  fn default() -> Self {
    Self {
      max_iterations: 100,
      rel_tolerance: 1e-10,
      abs_tolerance: 0.0,
      log_cycle: 100,
    }
  }
}
impl CgConfig {
  pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
    self.max_iterations = max_iterations;
    self
  }
  pub fn with_rel_tolerance(mut self, rel_tolerance: f64) -> Self {
    self.rel_tolerance = rel_tolerance;
    self
  }
  pub fn with_abs_tolerance(mut self, abs_tolerance: f64) -> Self {
    self.abs_tolerance = abs_tolerance;
    self
  }
  pub fn with_log_cycle(mut self, log_cycle: usize) -> Self {
    self.log_cycle = log_cycle;
    self
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
  RelativeResidual,
  AbsoluteResidual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
  Converged(Criterion),
  /// The iteration cap was reached before any tolerance was met.
  IterationLimit,
  /// The search direction lost all curvature, $p^T A p = 0$.
  Breakdown,
}

#[derive(Debug, Clone)]
pub struct CgOutcome {
  /// The converged iterate. Otherwise the iterate with the smallest
  /// residual seen, which need not be the last one.
  pub solution: na::DVector<f64>,
  /// Residual norm of `solution`.
  pub residual: f64,
  pub iterations: usize,
  /// Residual norms, starting with the initial residual.
  pub residual_history: Vec<f64>,
  pub termination: Termination,
}
impl CgOutcome {
  pub fn is_converged(&self) -> bool {
    matches!(self.termination, Termination::Converged(_))
  }
  pub fn final_residual(&self) -> f64 {
    self.residual
  }

  /// The solution, or [`Error::NonConvergence`] if no tolerance was met.
  pub fn into_converged(self) -> Result<na::DVector<f64>> {
    if self.is_converged() {
      Ok(self.solution)
    } else {
      Err(Error::NonConvergence {
        iterations: self.iterations,
        residual: self.final_residual(),
      })
    }
  }
}

pub struct ConjugateGradient<'a, A, P> {
  operator: &'a A,
  precond: &'a P,
  config: CgConfig,
  rhs_norm: f64,
  /// iterate
  x: na::DVector<f64>,
  /// residual $b - A x$
  r: na::DVector<f64>,
  /// preconditioned residual
  z: na::DVector<f64>,
  /// search direction
  p: na::DVector<f64>,
  /// $A p$
  q: na::DVector<f64>,
  /// $r^T z$
  rho: f64,
  /// iterate with the smallest residual so far
  best: na::DVector<f64>,
  best_residual: f64,
  iterations: usize,
  history: Vec<f64>,
  termination: Option<Termination>,
}

impl<'a, A, P> ConjugateGradient<'a, A, P>
where
  A: LinearOperator,
  P: Preconditioner,
{
  pub fn new(
    operator: &'a A,
    rhs: &na::DVector<f64>,
    initial_guess: na::DVector<f64>,
    precond: &'a P,
    config: CgConfig,
  ) -> Result<Self> {
    let n = operator.dim();
    operator.check_dims(initial_guess.len(), rhs.len())?;

    let x = initial_guess;
    let mut r = rhs.clone();
    operator.apply(&x, &mut r, Assign::Sub)?;
    let mut z = na::DVector::zeros(n);
    precond.apply(&r, &mut z);
    let rho = r.dot(&z);
    let p = z.clone();
    let residual = r.norm();

    let mut this = Self {
      operator,
      precond,
      config,
      rhs_norm: rhs.norm(),
      history: vec![residual],
      best: x.clone(),
      best_residual: residual,
      x,
      r,
      z,
      p,
      q: na::DVector::zeros(n),
      rho,
      iterations: 0,
      termination: None,
    };
    debug!(
      "cg: {n} unknowns, |b|={:.3e}, |r0|={:.3e}",
      this.rhs_norm,
      this.residual_norm()
    );
    this.termination = this.check_termination();
    Ok(this)
  }

  pub fn iterate(&self) -> &na::DVector<f64> {
    &self.x
  }
  pub fn iterations(&self) -> usize {
    self.iterations
  }
  pub fn residual_norm(&self) -> f64 {
    self.history.last().copied().unwrap_or(0.0)
  }
  pub fn residual_history(&self) -> &[f64] {
    &self.history
  }
  pub fn termination(&self) -> Option<Termination> {
    self.termination
  }

  fn check_termination(&self) -> Option<Termination> {
    let res = self.residual_norm();
    if self.rhs_norm > 0.0 && res <= self.config.rel_tolerance * self.rhs_norm {
      Some(Termination::Converged(Criterion::RelativeResidual))
    } else if res <= self.config.abs_tolerance {
      Some(Termination::Converged(Criterion::AbsoluteResidual))
    } else if self.iterations >= self.config.max_iterations {
      Some(Termination::IterationLimit)
    } else {
      None
    }
  }

  /// Performs one iteration and returns the terminal state, if reached.
  /// Stepping a terminated solver does nothing.
  pub fn step(&mut self) -> Result<Option<Termination>> {
    if self.termination.is_some() {
      return Ok(self.termination);
    }

    self.operator.apply(&self.p, &mut self.q, Assign::Set)?;
    let curvature = self.p.dot(&self.q);
    // relative to |p|^2, a vanishing curvature would blow up the step length
    let flat = curvature.abs() <= f64::EPSILON * self.p.norm_squared();
    if flat || !curvature.is_finite() || self.rho == 0.0 {
      self.termination = Some(Termination::Breakdown);
      return Ok(self.termination);
    }
    let alpha = self.rho / curvature;
    self.x.axpy(alpha, &self.p, 1.0);
    self.r.axpy(-alpha, &self.q, 1.0);

    self.iterations += 1;
    let residual = self.r.norm();
    self.history.push(residual);
    if residual < self.best_residual {
      self.best.copy_from(&self.x);
      self.best_residual = residual;
    }
    self.log_progress();

    self.termination = self.check_termination();
    if self.termination.is_none() {
      self.precond.apply(&self.r, &mut self.z);
      let rho_new = self.r.dot(&self.z);
      let beta = rho_new / self.rho;
      // p = z + beta p
      self.p.axpy(1.0, &self.z, beta);
      self.rho = rho_new;
    }
    Ok(self.termination)
  }

  pub fn run(mut self) -> Result<CgOutcome> {
    let termination = loop {
      if let Some(termination) = self.step()? {
        break termination;
      }
    };

    let (solution, residual) = match termination {
      Termination::Converged(_) => {
        let residual = self.residual_norm();
        (self.x, residual)
      }
      Termination::IterationLimit | Termination::Breakdown => (self.best, self.best_residual),
    };
    match termination {
      Termination::Converged(criterion) => info!(
        "cg converged ({criterion:?}) after {} iterations, residual {residual:.3e}",
        self.iterations
      ),
      Termination::IterationLimit => warn!(
        "cg reached the iteration limit of {} with residual {residual:.3e}",
        self.config.max_iterations
      ),
      Termination::Breakdown => warn!(
        "cg broke down after {} iterations with residual {residual:.3e}",
        self.iterations
      ),
    }

    Ok(CgOutcome {
      solution,
      residual,
      iterations: self.iterations,
      residual_history: self.history,
      termination,
    })
  }

  fn log_progress(&self) {
    let res = self.residual_norm();
    let cycle = self.config.log_cycle;
    if cycle > 0 && self.iterations % cycle == 0 {
      info!("cg iteration {:>5}: residual {res:.3e}", self.iterations);
    } else {
      trace!("cg iteration {:>5}: residual {res:.3e}", self.iterations);
    }
  }
}

/// Solves $A x = b$ starting from `initial_guess`.
///
/// Not reaching a tolerance is not an error, the outcome carries the
/// termination state next to the best iterate.
pub fn solve<A, P>(
  operator: &A,
  rhs: &na::DVector<f64>,
  initial_guess: na::DVector<f64>,
  precond: &P,
  config: CgConfig,
) -> Result<CgOutcome>
where
  A: LinearOperator,
  P: Preconditioner,
{
  ConjugateGradient::new(operator, rhs, initial_guess, precond, config)?.run()
}

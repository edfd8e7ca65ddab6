//! Poisson problems on mesh graphs, solved with a matrix-free graph Laplacian
//! and preconditioned conjugate gradients.

extern crate nalgebra as na;
extern crate nalgebra_sparse as nas;

pub mod boundary;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod io;
pub mod linalg;
pub mod mesh;
pub mod operator;
pub mod problem;
pub mod rhs;
pub mod solver;

pub use error::{Error, Result};

pub type NodeIdx = usize;
pub type EdgeIdx = usize;

//! SMPSO: speed-constrained multi-objective particle swarm optimization.
//!
//! # References
//!
//! - Nebro, Durillo, García-Nieto, Coello Coello, Luna, Alba (2009),
//!   *SMPSO: A New PSO-based Metaheuristic for Multi-objective
//!   Optimization*

mod config;
mod policy;

pub use config::SmpsoConfig;
pub use policy::SmpsoPolicy;

use crate::core::Problem;
use crate::engine::GenerationalEngine;

/// Engine type produced by [`SmpsoConfig::build`].
pub type Smpso<P> = GenerationalEngine<P, SmpsoPolicy<<P as Problem>::Var>>;

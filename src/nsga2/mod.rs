//! NSGA-II: elitist multi-objective search by non-dominated sorting.
//!
//! # References
//!
//! - Deb, Pratap, Agarwal, Meyarivan (2002), *A Fast and Elitist
//!   Multiobjective Genetic Algorithm: NSGA-II*

mod config;
mod policy;

pub use config::Nsga2Config;
pub use policy::Nsga2Policy;

use crate::core::Problem;
use crate::engine::GenerationalEngine;

/// Engine type produced by [`Nsga2Config::build`].
pub type Nsga2<P> = GenerationalEngine<P, Nsga2Policy<<P as Problem>::Var>>;

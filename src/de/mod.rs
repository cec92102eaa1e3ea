//! Differential evolution, rand/1/bin.
//!
//! # References
//!
//! - Storn, Price (1997), *Differential Evolution: A Simple and Efficient
//!   Heuristic for Global Optimization over Continuous Spaces*

mod config;
mod policy;

pub use config::DeConfig;
pub use policy::DePolicy;

use crate::core::Problem;
use crate::engine::GenerationalEngine;

/// Engine type produced by [`DeConfig::build`].
pub type De<P> = GenerationalEngine<P, DePolicy<<P as Problem>::Var>>;

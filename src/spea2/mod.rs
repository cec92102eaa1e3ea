//! SPEA2: strength-Pareto archive evolution.
//!
//! # References
//!
//! - Zitzler, Laumanns, Thiele (2001), *SPEA2: Improving the Strength
//!   Pareto Evolutionary Algorithm*

mod config;
mod policy;

pub use config::Spea2Config;
pub use policy::Spea2Policy;

use crate::core::Problem;
use crate::engine::GenerationalEngine;

/// Engine type produced by [`Spea2Config::build`].
pub type Spea2<P> = GenerationalEngine<P, Spea2Policy<<P as Problem>::Var>>;

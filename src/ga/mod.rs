//! Single-objective genetic algorithm.
//!
//! Generational GA with a full-size mating pool, configurable selection,
//! crossover and mutation, and an elitist sort-and-truncate replacement.
//! Used for cost-only pipe sizing runs where a scalar fitness is enough.
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*

mod config;
mod policy;

pub use config::GaConfig;
pub use policy::GaPolicy;

use crate::core::Problem;
use crate::engine::GenerationalEngine;

/// Engine type produced by [`GaConfig::build`].
pub type GeneticAlgorithm<P> = GenerationalEngine<P, GaPolicy<<P as Problem>::Var>>;

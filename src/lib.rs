//! Evolutionary optimization engine for water distribution network design.
//!
//! A [`core::Problem`] wraps the hydraulic simulator; solutions carry the
//! decision variables (pipe diameters, pump schedules) plus objective and
//! constraint vectors. A family of evolutionary algorithms searches the
//! design space:
//!
//! - **GA** ([`ga`]): single-objective genetic algorithm with elitist
//!   generational replacement.
//! - **NSGA-II** ([`nsga2`]): Pareto search by non-dominated sorting and
//!   crowding distance.
//! - **SPEA2** ([`spea2`]): strength-Pareto fitness with a truncated
//!   external archive.
//! - **SMPSO** ([`smpso`]): speed-constrained particle swarm over a
//!   crowding-pruned leaders archive.
//! - **DE** ([`de`]): differential evolution, rand/1/bin.
//!
//! Every variant is a [`engine::GenerationalEngine`] behind the resumable
//! [`engine::Algorithm`] trait: hosts drive a run one generation at a time,
//! read its status between steps, and stop it cooperatively. The
//! [`experiment`] module batches independent runs over the [`catalog`] of
//! variants and reduces completed multi-objective runs to a reference
//! Pareto front.
//!
//! Config and spec types derive `Serialize`/`Deserialize` behind the
//! `serde` feature.
//!
//! ```
//! use hydroevo::core::{Bounds, Problem, Solution};
//! use hydroevo::engine::Algorithm;
//! use hydroevo::error::EvaluationError;
//! use hydroevo::ga::GaConfig;
//!
//! struct Quadratic {
//!     bounds: Bounds<f64>,
//! }
//!
//! impl Problem for Quadratic {
//!     type Var = f64;
//!
//!     fn name(&self) -> &str {
//!         "quadratic"
//!     }
//!
//!     fn bounds(&self) -> &Bounds<f64> {
//!         &self.bounds
//!     }
//!
//!     fn number_of_objectives(&self) -> usize {
//!         1
//!     }
//!
//!     fn evaluate(&self, solution: &mut Solution<f64>) -> Result<(), EvaluationError> {
//!         let x = solution.variables()[0];
//!         solution.objectives_mut()[0] = (x - 3.0) * (x - 3.0);
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> Result<(), hydroevo::error::EvolveError> {
//! let problem = Quadratic {
//!     bounds: Bounds::uniform(1, 0.0, 10.0)?,
//! };
//! let mut ga = GaConfig::default()
//!     .with_population_size(20)
//!     .with_max_evaluations(2000)
//!     .with_seed(1)
//!     .build(problem)?;
//! ga.run()?;
//! let best = &ga.result()[0];
//! assert!((best.variables()[0] - 3.0).abs() < 0.5);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod core;
pub mod de;
pub mod engine;
pub mod error;
pub mod experiment;
pub mod ga;
pub mod nsga2;
pub mod operators;
pub mod ranking;
pub mod smpso;
pub mod spea2;

//! Multi-objective comparison and diversity machinery.
//!
//! Comparators, fast non-dominated sorting, crowding distance, and the
//! bounded crowded archive. Everything here is shared by the NSGA-II,
//! SPEA2, and SMPSO variants and by the experiment layer's reference-front
//! reduction.
//!
//! References:
//! - Deb et al.: "A fast and elitist multiobjective genetic algorithm:
//!   NSGA-II" (2002)
//! - Zitzler, Laumanns, Thiele: "SPEA2: Improving the Strength Pareto
//!   Evolutionary Algorithm" (2001)

mod archive;
mod dominance;
mod sorting;

pub use archive::CrowdedArchive;
pub use dominance::{crowded_compare, dominance_compare, pareto_compare, single_objective_compare};
pub use sorting::{crowding_distance, non_dominated_sort, non_dominated_subset, rank_and_crowd, Ranking};

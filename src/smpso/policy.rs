//! Constrained velocity updates and the leaders archive.

use std::cmp::Ordering;

use rand::{Rng, RngCore};

use crate::core::{attr, Bounds, Solution, Variable};
use crate::engine::{Replacement, SearchPolicy};
use crate::error::ConfigError;
use crate::operators::{MutationOperator, SelectionOperator, TournamentSelection};
use crate::ranking::{dominance_compare, CrowdedArchive};

const INERTIA: f64 = 0.1;
const TURBULENCE_INTERVAL: usize = 6;

/// Orders leaders by descending crowding distance, so tournaments pull
/// global guides from the sparsest regions of the archive.
fn leader_compare<T: Variable>(a: &Solution<T>, b: &Solution<T>) -> Ordering {
    let da = a.attribute(attr::CROWDING_DISTANCE).unwrap_or(0.0);
    let db = b.attribute(attr::CROWDING_DISTANCE).unwrap_or(0.0);
    db.total_cmp(&da)
}

/// Clerc's constriction coefficient: active once `c1 + c2` exceeds 4,
/// neutral below that.
fn constriction(c1: f64, c2: f64) -> f64 {
    let phi = c1 + c2;
    if phi > 4.0 {
        2.0 / (2.0 - phi - (phi * phi - 4.0 * phi).sqrt()).abs()
    } else {
        1.0
    }
}

/// Swarm update rules for SMPSO.
///
/// Velocities carry over between generations and are clamped per variable
/// to half the variable's range. A particle hitting a wall is pinned to the
/// bound and has its velocity reversed. Every sixth particle additionally
/// passes through the turbulence mutation after moving.
pub struct SmpsoPolicy<T: Variable> {
    leader_selection: TournamentSelection<T>,
    turbulence: Box<dyn MutationOperator<T>>,
    bounds: Bounds<T>,
    speeds: Vec<Vec<f64>>,
    personal_best: Vec<Solution<T>>,
    leaders: CrowdedArchive<T>,
}

impl<T: Variable> SmpsoPolicy<T> {
    pub fn new(
        turbulence: Box<dyn MutationOperator<T>>,
        bounds: Bounds<T>,
        archive_capacity: usize,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            leader_selection: TournamentSelection::binary(leader_compare),
            turbulence,
            bounds,
            speeds: Vec::new(),
            personal_best: Vec::new(),
            leaders: CrowdedArchive::new(archive_capacity)?,
        })
    }

    /// Current contents of the leaders archive.
    pub fn leaders(&self) -> &[Solution<T>] {
        self.leaders.contents()
    }
}

impl<T: Variable> SearchPolicy<T> for SmpsoPolicy<T> {
    fn after_initialisation(&mut self, population: &mut [Solution<T>], _rng: &mut dyn RngCore) {
        self.speeds = vec![vec![0.0; self.bounds.len()]; population.len()];
        self.personal_best = population.to_vec();
        for particle in population.iter() {
            self.leaders.try_insert(particle.clone());
        }
        self.leaders.refresh_crowding();
    }

    fn offspring(
        &mut self,
        population: &[Solution<T>],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Solution<T>>, ConfigError> {
        let mut moved = Vec::with_capacity(population.len());
        for (index, particle) in population.iter().enumerate() {
            let leader = self
                .leader_selection
                .execute(self.leaders.contents(), rng)?
                .clone();
            let r1: f64 = rng.random_range(0.0..=1.0);
            let r2: f64 = rng.random_range(0.0..=1.0);
            let c1: f64 = rng.random_range(1.5..=2.5);
            let c2: f64 = rng.random_range(1.5..=2.5);
            let chi = constriction(c1, c2);

            let mut next = particle.fresh_copy();
            for j in 0..self.bounds.len() {
                let x = particle.variables()[j].as_f64();
                let cognitive = c1 * r1 * (self.personal_best[index].variables()[j].as_f64() - x);
                let social = c2 * r2 * (leader.variables()[j].as_f64() - x);
                let limit = self.bounds.range(j) / 2.0;
                let mut speed = (chi * (INERTIA * self.speeds[index][j] + cognitive + social))
                    .clamp(-limit, limit);

                let mut position = x + speed;
                let lower = self.bounds.lower(j).as_f64();
                let upper = self.bounds.upper(j).as_f64();
                if position < lower {
                    position = lower;
                    speed = -speed;
                } else if position > upper {
                    position = upper;
                    speed = -speed;
                }
                self.speeds[index][j] = speed;
                next.variables_mut()[j] = T::from_f64(position);
            }
            if index % TURBULENCE_INTERVAL == 0 {
                self.turbulence.execute(&mut next, &self.bounds, rng);
            }
            moved.push(next);
        }
        Ok(moved)
    }

    fn replace(&mut self, _parents: Vec<Solution<T>>, offspring: Vec<Solution<T>>) -> Replacement<T> {
        for (index, particle) in offspring.iter().enumerate() {
            if dominance_compare(particle, &self.personal_best[index]) != Ordering::Greater {
                self.personal_best[index] = particle.clone();
            }
            self.leaders.try_insert(particle.clone());
        }
        self.leaders.refresh_crowding();
        Replacement {
            population: offspring,
            improved: true,
        }
    }

    fn result(&self, _population: &[Solution<T>]) -> Vec<Solution<T>> {
        self.leaders.contents().to_vec()
    }
}

//! Crossover operators.

use rand::{Rng, RngCore};

use crate::core::{Bounds, Solution, Variable};
use crate::error::ConfigError;
use crate::operators::{distribution_index_valid, probability_in_unit};

const EPS: f64 = 1.0e-14;

/// Recombines parents into children.
///
/// Implementations declare how many parents they need and how many children
/// they produce; `execute` fails with [`ConfigError::ParentCount`] when the
/// caller supplies the wrong number. Parents are never modified; children
/// start unevaluated.
pub trait CrossoverOperator<T: Variable>: Send {
    fn number_of_required_parents(&self) -> usize;

    fn number_of_generated_children(&self) -> usize;

    fn execute(
        &self,
        parents: &[Solution<T>],
        bounds: &Bounds<T>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Solution<T>>, ConfigError>;
}

fn check_parents<T: Variable>(parents: &[Solution<T>], required: usize) -> Result<(), ConfigError> {
    if parents.len() != required {
        return Err(ConfigError::ParentCount {
            required,
            supplied: parents.len(),
        });
    }
    Ok(())
}

/// Single-point crossover.
///
/// With the configured probability picks a uniform cut index and swaps the
/// tails of the two parents; otherwise the children are exact variable
/// copies.
pub struct SinglePointCrossover {
    probability: f64,
}

impl SinglePointCrossover {
    pub fn new(probability: f64) -> Result<Self, ConfigError> {
        probability_in_unit("crossover probability", probability)?;
        Ok(Self { probability })
    }
}

impl<T: Variable> CrossoverOperator<T> for SinglePointCrossover {
    fn number_of_required_parents(&self) -> usize {
        2
    }

    fn number_of_generated_children(&self) -> usize {
        2
    }

    fn execute(
        &self,
        parents: &[Solution<T>],
        _bounds: &Bounds<T>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Solution<T>>, ConfigError> {
        check_parents(parents, 2)?;
        let mut first = parents[0].fresh_copy();
        let mut second = parents[1].fresh_copy();
        if rng.random_range(0.0..1.0) < self.probability {
            let n = first.variables().len();
            let cut = rng.random_range(0..n);
            for i in cut..n {
                std::mem::swap(&mut first.variables_mut()[i], &mut second.variables_mut()[i]);
            }
        }
        Ok(vec![first, second])
    }
}

/// Simulated binary crossover (Deb and Agrawal, 1995).
///
/// Blends each variable pair with a spread factor drawn from a polynomial
/// distribution; larger distribution indices keep children closer to their
/// parents. Out-of-bound results are clamped; integer variables blend
/// through `f64` and round.
pub struct SbxCrossover {
    probability: f64,
    distribution_index: f64,
}

impl SbxCrossover {
    pub fn new(probability: f64, distribution_index: f64) -> Result<Self, ConfigError> {
        probability_in_unit("crossover probability", probability)?;
        distribution_index_valid("crossover distribution index", distribution_index)?;
        Ok(Self {
            probability,
            distribution_index,
        })
    }
}

impl<T: Variable> CrossoverOperator<T> for SbxCrossover {
    fn number_of_required_parents(&self) -> usize {
        2
    }

    fn number_of_generated_children(&self) -> usize {
        2
    }

    fn execute(
        &self,
        parents: &[Solution<T>],
        bounds: &Bounds<T>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Solution<T>>, ConfigError> {
        check_parents(parents, 2)?;
        let mut first = parents[0].fresh_copy();
        let mut second = parents[1].fresh_copy();
        if rng.random_range(0.0..1.0) < self.probability {
            let n = first.variables().len();
            for i in 0..n {
                // each variable is crossed with probability 0.5
                if rng.random_range(0.0..1.0) > 0.5 {
                    continue;
                }
                let y1 = parents[0].variables()[i].as_f64();
                let y2 = parents[1].variables()[i].as_f64();
                if (y1 - y2).abs() <= EPS {
                    continue;
                }
                let (c1, c2) = sbx_children(
                    y1,
                    y2,
                    bounds.lower(i).as_f64(),
                    bounds.upper(i).as_f64(),
                    self.distribution_index,
                    rng,
                );
                let (c1, c2) = if rng.random_range(0.0..1.0) <= 0.5 {
                    (c2, c1)
                } else {
                    (c1, c2)
                };
                first.variables_mut()[i] = bounds.clamp(i, T::from_f64(c1));
                second.variables_mut()[i] = bounds.clamp(i, T::from_f64(c2));
            }
        }
        Ok(vec![first, second])
    }
}

fn sbx_children(
    y1: f64,
    y2: f64,
    lower: f64,
    upper: f64,
    eta: f64,
    rng: &mut dyn RngCore,
) -> (f64, f64) {
    let (lo_y, hi_y) = if y1 < y2 { (y1, y2) } else { (y2, y1) };
    let u: f64 = rng.random_range(0.0..1.0);

    let spread = |beta: f64| -> f64 {
        let alpha = 2.0 - beta.powf(-(eta + 1.0));
        if u <= 1.0 / alpha {
            (u * alpha).powf(1.0 / (eta + 1.0))
        } else {
            (1.0 / (2.0 - u * alpha)).powf(1.0 / (eta + 1.0))
        }
    };

    let beta_lower = 1.0 + 2.0 * (lo_y - lower) / (hi_y - lo_y);
    let c1 = 0.5 * (lo_y + hi_y - spread(beta_lower) * (hi_y - lo_y));

    let beta_upper = 1.0 + 2.0 * (upper - hi_y) / (hi_y - lo_y);
    let c2 = 0.5 * (lo_y + hi_y + spread(beta_upper) * (hi_y - lo_y));

    (c1, c2)
}

/// Differential crossover, rand/1/bin.
///
/// Expects four parents: three distinct donors `r1, r2, r3` followed by the
/// current target. Produces one trial child whose variables take
/// `r1 + f * (r2 - r3)` with probability `cr` (and always at one random
/// index), falling back to the target's variable otherwise. Results are
/// clamped into bounds.
pub struct DifferentialCrossover {
    cr: f64,
    f: f64,
}

impl DifferentialCrossover {
    pub fn new(cr: f64, f: f64) -> Result<Self, ConfigError> {
        probability_in_unit("differential crossover rate", cr)?;
        if !(0.0..=2.0).contains(&f) {
            return Err(ConfigError::ParameterRange {
                name: "differential weight",
                value: f,
                min: 0.0,
                max: 2.0,
            });
        }
        Ok(Self { cr, f })
    }
}

impl<T: Variable> CrossoverOperator<T> for DifferentialCrossover {
    fn number_of_required_parents(&self) -> usize {
        4
    }

    fn number_of_generated_children(&self) -> usize {
        1
    }

    fn execute(
        &self,
        parents: &[Solution<T>],
        bounds: &Bounds<T>,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Solution<T>>, ConfigError> {
        check_parents(parents, 4)?;
        let (r1, r2, r3, target) = (&parents[0], &parents[1], &parents[2], &parents[3]);
        let n = target.variables().len();
        let mut trial = target.fresh_copy();
        let forced = rng.random_range(0..n);
        for i in 0..n {
            if i == forced || rng.random_range(0.0..1.0) < self.cr {
                let value = r1.variables()[i].as_f64()
                    + self.f * (r2.variables()[i].as_f64() - r3.variables()[i].as_f64());
                trial.variables_mut()[i] = bounds.clamp(i, T::from_f64(value));
            }
        }
        Ok(vec![trial])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn solution(variables: &[f64]) -> Solution<f64> {
        Solution::new(variables.to_vec(), 2, 0)
    }

    fn bounds(n: usize) -> Bounds<f64> {
        Bounds::uniform(n, 0.0, 10.0).unwrap()
    }

    // ---- parent count contract ----

    #[test]
    fn wrong_parent_count_is_a_config_error() {
        let op = SinglePointCrossover::new(1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(20);
        let parents = vec![solution(&[1.0]), solution(&[2.0]), solution(&[3.0])];
        assert_eq!(
            op.execute(&parents, &bounds(1), &mut rng).unwrap_err(),
            ConfigError::ParentCount {
                required: 2,
                supplied: 3
            }
        );

        let op = DifferentialCrossover::new(0.5, 0.5).unwrap();
        let parents = vec![solution(&[1.0]), solution(&[2.0])];
        assert_eq!(
            op.execute(&parents, &bounds(1), &mut rng).unwrap_err(),
            ConfigError::ParentCount {
                required: 4,
                supplied: 2
            }
        );
    }

    // ---- SinglePointCrossover ----

    #[test]
    fn probabilities_outside_the_unit_interval_are_rejected() {
        assert!(SinglePointCrossover::new(-0.1).is_err());
        assert!(SinglePointCrossover::new(1.1).is_err());
    }

    #[test]
    fn single_point_children_are_tail_swaps() {
        let op = SinglePointCrossover::new(1.0).unwrap();
        let a = solution(&[1.0, 1.0, 1.0, 1.0]);
        let b = solution(&[2.0, 2.0, 2.0, 2.0]);
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..50 {
            let children = op.execute(&[a.clone(), b.clone()], &bounds(4), &mut rng).unwrap();
            assert_eq!(children.len(), 2);
            for (va, vb) in children[0].variables().iter().zip(children[1].variables()) {
                // each position holds one value from each parent
                assert!((*va == 1.0 && *vb == 2.0) || (*va == 2.0 && *vb == 1.0));
            }
            // the swap is a contiguous tail: once it switches it stays switched
            let flips = children[0]
                .variables()
                .windows(2)
                .filter(|w| w[0] != w[1])
                .count();
            assert!(flips <= 1);
        }
    }

    #[test]
    fn zero_probability_copies_the_parents() {
        let op = SinglePointCrossover::new(0.0).unwrap();
        let a = solution(&[1.0, 2.0, 3.0]);
        let b = solution(&[4.0, 5.0, 6.0]);
        let mut rng = StdRng::seed_from_u64(22);
        let children = op.execute(&[a.clone(), b.clone()], &bounds(3), &mut rng).unwrap();
        assert_eq!(children[0].variables(), a.variables());
        assert_eq!(children[1].variables(), b.variables());
        assert!(!children[0].is_evaluated());
    }

    #[test]
    fn parents_are_left_untouched() {
        let op = SinglePointCrossover::new(1.0).unwrap();
        let a = solution(&[1.0, 1.0]);
        let b = solution(&[2.0, 2.0]);
        let mut rng = StdRng::seed_from_u64(23);
        op.execute(&[a.clone(), b.clone()], &bounds(2), &mut rng).unwrap();
        assert_eq!(a.variables(), &[1.0, 1.0]);
        assert_eq!(b.variables(), &[2.0, 2.0]);
    }

    // ---- SbxCrossover ----

    #[test]
    fn sbx_children_stay_inside_bounds() {
        let op = SbxCrossover::new(1.0, 20.0).unwrap();
        let b = bounds(3);
        let mut rng = StdRng::seed_from_u64(24);
        for _ in 0..200 {
            let a = solution(&[0.5, 5.0, 9.5]);
            let c = solution(&[9.5, 5.5, 0.5]);
            let children = op.execute(&[a, c], &b, &mut rng).unwrap();
            for child in &children {
                for (i, v) in child.variables().iter().enumerate() {
                    assert!(*v >= b.lower(i) && *v <= b.upper(i), "escaped: {v}");
                }
            }
        }
    }

    #[test]
    fn high_distribution_index_keeps_children_near_parents() {
        let tight = SbxCrossover::new(1.0, 100.0).unwrap();
        let b = bounds(1);
        let mut rng = StdRng::seed_from_u64(25);
        let mut max_drift: f64 = 0.0;
        for _ in 0..500 {
            let children = tight
                .execute(&[solution(&[4.0]), solution(&[6.0])], &b, &mut rng)
                .unwrap();
            for child in &children {
                let v = child.variables()[0];
                let drift = (v - 4.0).abs().min((v - 6.0).abs());
                max_drift = max_drift.max(drift);
            }
        }
        assert!(max_drift < 1.0, "max drift {max_drift}");
    }

    #[test]
    fn sbx_rounds_integer_variables() {
        let op = SbxCrossover::new(1.0, 5.0).unwrap();
        let b = Bounds::uniform(2, 0, 10).unwrap();
        let a = Solution::new(vec![2, 8], 1, 0);
        let c = Solution::new(vec![7, 3], 1, 0);
        let mut rng = StdRng::seed_from_u64(26);
        for _ in 0..100 {
            let children = op.execute(&[a.clone(), c.clone()], &b, &mut rng).unwrap();
            for child in &children {
                for v in child.variables() {
                    assert!((0..=10).contains(v));
                }
            }
        }
    }

    // ---- DifferentialCrossover ----

    #[test]
    fn differential_weight_outside_range_is_rejected() {
        assert!(DifferentialCrossover::new(0.5, -0.1).is_err());
        assert!(DifferentialCrossover::new(0.5, 2.5).is_err());
        assert!(DifferentialCrossover::new(1.5, 0.5).is_err());
    }

    #[test]
    fn trial_mixes_donor_combination_and_target() {
        let op = DifferentialCrossover::new(0.5, 0.5).unwrap();
        let b = bounds(4);
        let parents = vec![
            solution(&[2.0, 2.0, 2.0, 2.0]), // r1
            solution(&[4.0, 4.0, 4.0, 4.0]), // r2
            solution(&[2.0, 2.0, 2.0, 2.0]), // r3
            solution(&[9.0, 9.0, 9.0, 9.0]), // target
        ];
        // donor combination = 2 + 0.5 * (4 - 2) = 3
        let mut rng = StdRng::seed_from_u64(27);
        for _ in 0..100 {
            let trial = &op.execute(&parents, &b, &mut rng).unwrap()[0];
            for v in trial.variables() {
                assert!(*v == 3.0 || *v == 9.0);
            }
            // the forced index guarantees at least one donor-derived variable
            assert!(trial.variables().iter().any(|v| *v == 3.0));
        }
    }

    #[test]
    fn cr_zero_still_crosses_the_forced_index() {
        let op = DifferentialCrossover::new(0.0, 1.0).unwrap();
        let b = bounds(3);
        let parents = vec![
            solution(&[1.0, 1.0, 1.0]),
            solution(&[2.0, 2.0, 2.0]),
            solution(&[1.5, 1.5, 1.5]),
            solution(&[8.0, 8.0, 8.0]),
        ];
        // donor combination = 1 + 1 * (2 - 1.5) = 1.5
        let mut rng = StdRng::seed_from_u64(28);
        let trial = &op.execute(&parents, &b, &mut rng).unwrap()[0];
        let donor_derived = trial.variables().iter().filter(|v| **v == 1.5).count();
        assert_eq!(donor_derived, 1);
    }

    #[test]
    fn trial_values_are_clamped_into_bounds() {
        let op = DifferentialCrossover::new(1.0, 2.0).unwrap();
        let b = bounds(1);
        let parents = vec![
            solution(&[9.0]),
            solution(&[10.0]),
            solution(&[0.0]),
            solution(&[5.0]),
        ];
        // 9 + 2 * (10 - 0) = 29, clamped to 10
        let mut rng = StdRng::seed_from_u64(29);
        let trial = &op.execute(&parents, &b, &mut rng).unwrap()[0];
        assert_eq!(trial.variables()[0], 10.0);
    }
}

//! Uniform handle over the algorithm variants.

use crate::core::Problem;
use crate::de::DeConfig;
use crate::engine::Algorithm;
use crate::error::ConfigError;
use crate::ga::GaConfig;
use crate::nsga2::Nsga2Config;
use crate::smpso::SmpsoConfig;
use crate::spea2::Spea2Config;

/// A configured algorithm choice, detached from any problem instance.
///
/// Experiments carry a list of these and bind each one to a fresh problem
/// per run.
///
/// ```
/// use hydroevo::catalog::AlgorithmSpec;
/// use hydroevo::nsga2::Nsga2Config;
///
/// let spec = AlgorithmSpec::Nsga2(Nsga2Config::default().with_population_size(50));
/// assert_eq!(spec.tag(), "nsga-ii");
/// assert!(spec.is_multi_objective());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlgorithmSpec {
    Ga(GaConfig),
    Nsga2(Nsga2Config),
    Spea2(Spea2Config),
    Smpso(SmpsoConfig),
    De(DeConfig),
}

impl AlgorithmSpec {
    /// Short identifier, also the directory name in experiment output.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Ga(_) => "ga",
            Self::Nsga2(_) => "nsga-ii",
            Self::Spea2(_) => "spea2",
            Self::Smpso(_) => "smpso",
            Self::De(_) => "de",
        }
    }

    /// Whether the variant reports a Pareto front rather than a single
    /// best solution.
    pub fn is_multi_objective(&self) -> bool {
        matches!(self, Self::Nsga2(_) | Self::Spea2(_) | Self::Smpso(_))
    }

    pub fn seed(&self) -> Option<u64> {
        match self {
            Self::Ga(config) => config.seed,
            Self::Nsga2(config) => config.seed,
            Self::Spea2(config) => config.seed,
            Self::Smpso(config) => config.seed,
            Self::De(config) => config.seed,
        }
    }

    pub fn with_seed(self, seed: u64) -> Self {
        match self {
            Self::Ga(config) => Self::Ga(config.with_seed(seed)),
            Self::Nsga2(config) => Self::Nsga2(config.with_seed(seed)),
            Self::Spea2(config) => Self::Spea2(config.with_seed(seed)),
            Self::Smpso(config) => Self::Smpso(config.with_seed(seed)),
            Self::De(config) => Self::De(config.with_seed(seed)),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Ga(config) => config.validate(),
            Self::Nsga2(config) => config.validate(),
            Self::Spea2(config) => config.validate(),
            Self::Smpso(config) => config.validate(),
            Self::De(config) => config.validate(),
        }
    }

    /// Validates the inner configuration and binds it to `problem`.
    pub fn build<P: Problem + 'static>(
        &self,
        problem: P,
    ) -> Result<Box<dyn Algorithm<P::Var>>, ConfigError> {
        Ok(match self {
            Self::Ga(config) => Box::new(config.build(problem)?),
            Self::Nsga2(config) => Box::new(config.build(problem)?),
            Self::Spea2(config) => Box::new(config.build(problem)?),
            Self::Smpso(config) => Box::new(config.build(problem)?),
            Self::De(config) => Box::new(config.build(problem)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Bounds, Solution};
    use crate::error::EvaluationError;

    fn all_specs() -> Vec<AlgorithmSpec> {
        vec![
            AlgorithmSpec::Ga(GaConfig::default()),
            AlgorithmSpec::Nsga2(Nsga2Config::default()),
            AlgorithmSpec::Spea2(Spea2Config::default()),
            AlgorithmSpec::Smpso(SmpsoConfig::default()),
            AlgorithmSpec::De(DeConfig::default()),
        ]
    }

    #[test]
    fn tags_are_stable() {
        let tags: Vec<&str> = all_specs().iter().map(AlgorithmSpec::tag).collect();
        assert_eq!(tags, vec!["ga", "nsga-ii", "spea2", "smpso", "de"]);
    }

    #[test]
    fn only_the_pareto_variants_are_multi_objective() {
        let flags: Vec<bool> = all_specs()
            .iter()
            .map(AlgorithmSpec::is_multi_objective)
            .collect();
        assert_eq!(flags, vec![false, true, true, true, false]);
    }

    #[test]
    fn default_specs_validate() {
        for spec in all_specs() {
            assert!(spec.validate().is_ok(), "{} failed validation", spec.tag());
        }
    }

    #[test]
    fn with_seed_reaches_the_inner_config() {
        for spec in all_specs() {
            let seeded = spec.with_seed(77);
            assert_eq!(seeded.seed(), Some(77));
        }
    }

    struct TwoObjective {
        bounds: Bounds<f64>,
    }

    impl Problem for TwoObjective {
        type Var = f64;

        fn name(&self) -> &str {
            "two-objective"
        }

        fn bounds(&self) -> &Bounds<f64> {
            &self.bounds
        }

        fn number_of_objectives(&self) -> usize {
            2
        }

        fn evaluate(&self, solution: &mut Solution<f64>) -> Result<(), EvaluationError> {
            let x = solution.variables()[0];
            solution.objectives_mut()[0] = x;
            solution.objectives_mut()[1] = 1.0 - x;
            Ok(())
        }
    }

    #[test]
    fn built_algorithms_report_their_tag_as_name() {
        for spec in all_specs() {
            let problem = TwoObjective {
                bounds: Bounds::uniform(1, 0.0, 1.0).unwrap(),
            };
            let algorithm = spec.build(problem).unwrap();
            assert_eq!(algorithm.name(), spec.tag());
        }
    }
}

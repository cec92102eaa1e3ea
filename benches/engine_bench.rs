//! Criterion benchmarks for the evolutionary engine.
//!
//! Uses synthetic problems (Sphere, Schaffer) to measure pure algorithm
//! overhead independent of any hydraulic simulator.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use hydroevo::core::{Bounds, Problem, Solution};
use hydroevo::engine::Algorithm;
use hydroevo::error::EvaluationError;
use hydroevo::ga::GaConfig;
use hydroevo::nsga2::Nsga2Config;
use hydroevo::ranking::non_dominated_sort;

// ===========================================================================
// Sphere: minimize sum(x_i^2)
// ===========================================================================

struct Sphere {
    bounds: Bounds<f64>,
}

impl Sphere {
    fn new(dim: usize) -> Self {
        Self {
            bounds: Bounds::uniform(dim, -5.0, 5.0).unwrap(),
        }
    }
}

impl Problem for Sphere {
    type Var = f64;

    fn name(&self) -> &str {
        "sphere"
    }

    fn bounds(&self) -> &Bounds<f64> {
        &self.bounds
    }

    fn number_of_objectives(&self) -> usize {
        1
    }

    fn evaluate(&self, solution: &mut Solution<f64>) -> Result<(), EvaluationError> {
        solution.objectives_mut()[0] = solution.variables().iter().map(|x| x * x).sum();
        Ok(())
    }
}

// ===========================================================================
// Schaffer: two-objective benchmark
// ===========================================================================

struct Schaffer {
    bounds: Bounds<f64>,
}

impl Schaffer {
    fn new() -> Self {
        Self {
            bounds: Bounds::uniform(1, -5.0, 10.0).unwrap(),
        }
    }
}

impl Problem for Schaffer {
    type Var = f64;

    fn name(&self) -> &str {
        "schaffer"
    }

    fn bounds(&self) -> &Bounds<f64> {
        &self.bounds
    }

    fn number_of_objectives(&self) -> usize {
        2
    }

    fn evaluate(&self, solution: &mut Solution<f64>) -> Result<(), EvaluationError> {
        let x = solution.variables()[0];
        solution.objectives_mut()[0] = x * x;
        solution.objectives_mut()[1] = (x - 2.0) * (x - 2.0);
        Ok(())
    }
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_ga_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga_sphere");
    group.sample_size(10);

    for &dim in &[10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(dim), &dim, |b, &dim| {
            b.iter(|| {
                let mut ga = GaConfig::default()
                    .with_population_size(50)
                    .with_max_evaluations(2500)
                    .with_seed(42)
                    .build(Sphere::new(dim))
                    .unwrap();
                ga.run().unwrap();
                black_box(ga.result())
            })
        });
    }
    group.finish();
}

fn bench_nsga2_schaffer(c: &mut Criterion) {
    let mut group = c.benchmark_group("nsga2_schaffer");
    group.sample_size(10);

    for &pop in &[20usize, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(pop), &pop, |b, &pop| {
            b.iter(|| {
                let mut nsga2 = Nsga2Config::default()
                    .with_population_size(pop)
                    .with_max_evaluations(pop * 50)
                    .with_seed(42)
                    .build(Schaffer::new())
                    .unwrap();
                nsga2.run().unwrap();
                black_box(nsga2.result())
            })
        });
    }
    group.finish();
}

fn bench_non_dominated_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("non_dominated_sort");

    for &n in &[100usize, 500, 1000] {
        let mut rng = StdRng::seed_from_u64(42);
        let population: Vec<Solution<f64>> = (0..n)
            .map(|_| {
                let mut s = Solution::new(vec![0.0], 3, 0);
                for objective in s.objectives_mut() {
                    *objective = rng.random_range(0.0..1.0);
                }
                s
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &population, |b, p| {
            b.iter(|| black_box(non_dominated_sort(black_box(p))))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_ga_sphere,
    bench_nsga2_schaffer,
    bench_non_dominated_sort
);
criterion_main!(benches);

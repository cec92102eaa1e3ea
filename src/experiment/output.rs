//! TSV persistence for experiment results.
//!
//! One directory per (algorithm, problem, run) holding `FUN.tsv`
//! (objectives) and `VAR.tsv` (variables), one row per solution, plus a
//! `reference_fronts` directory with the aggregated front per problem.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::{Solution, Variable};

/// Directory holding one run's output files.
pub(crate) fn run_directory(
    root: &Path,
    experiment: &str,
    algorithm: &str,
    problem: &str,
    run: usize,
) -> PathBuf {
    root.join(experiment)
        .join(algorithm)
        .join(problem)
        .join(format!("run_{run}"))
}

fn write_rows<I>(path: &Path, rows: I) -> io::Result<()>
where
    I: Iterator<Item = Vec<f64>>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    for row in rows {
        let line = row
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .join("\t");
        writeln!(writer, "{line}")?;
    }
    writer.flush()
}

/// Writes `FUN.tsv` and `VAR.tsv` for one run, creating the directory.
pub(crate) fn write_run<T: Variable>(
    directory: &Path,
    solutions: &[Solution<T>],
) -> io::Result<()> {
    fs::create_dir_all(directory)?;
    write_rows(
        &directory.join("FUN.tsv"),
        solutions.iter().map(|s| s.objectives().to_vec()),
    )?;
    write_rows(
        &directory.join("VAR.tsv"),
        solutions
            .iter()
            .map(|s| s.variables().iter().map(|v| v.as_f64()).collect()),
    )
}

/// Writes the aggregated front under `reference_fronts/<problem>.tsv`.
pub(crate) fn write_reference_front<T: Variable>(
    root: &Path,
    experiment: &str,
    problem: &str,
    front: &[Solution<T>],
) -> io::Result<()> {
    let directory = root.join(experiment).join("reference_fronts");
    fs::create_dir_all(&directory)?;
    write_rows(
        &directory.join(format!("{problem}.tsv")),
        front.iter().map(|s| s.objectives().to_vec()),
    )
}

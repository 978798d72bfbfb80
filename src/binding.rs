//! Problem bindings.
//!
//! A binding is the problem-specific wrapper around a [`Population`]: it
//! knows how to read an instance file into an initial population and how
//! to write the best individual back out. [`solve`] drives one binding
//! end to end.

use crate::error::Result;
use crate::ga::{Individual, Population, RunConfig, RunReport, RunStatus};
use rand::Rng;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// A problem instance together with the population solving it.
pub trait SolutionBinding: Sized {
    /// Candidate solution type.
    type Individual: Individual;

    /// Random source owned by the population.
    type Rng: Rng;

    /// Reads a problem instance and builds a population of
    /// `population_size` individuals for it.
    fn read(path: &Path, population_size: usize) -> Result<Self>;

    /// Writes the current best individual.
    fn write(&self, path: &Path) -> Result<()>;

    /// The population being evolved.
    fn population(&self) -> &Population<Self::Individual, Self::Rng>;

    /// Mutable access for running the population.
    fn population_mut(&mut self) -> &mut Population<Self::Individual, Self::Rng>;
}

/// Reads `input`, evolves it, and writes the best individual to `output`.
///
/// The output is written whenever the instance was read, including after
/// a cancelled run or a run that failed part-way; in the latter case the
/// run error is returned after writing.
pub fn solve<B: SolutionBinding>(
    input: &Path,
    output: &Path,
    population_size: usize,
    config: &RunConfig,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<RunReport> {
    let mut solution = B::read(input, population_size)?;

    let started = Instant::now();
    let outcome = solution.population_mut().run_with_cancel(config, cancel);
    if matches!(&outcome, Ok(report) if report.status == RunStatus::Cancelled) {
        info!("interrupted");
    }
    debug!(elapsed_secs = started.elapsed().as_secs_f64(), "run time");
    info!(
        best_fitness = solution.population().best_fitness(),
        output = %output.display(),
        "writing best individual"
    );

    let written = solution.write(output);
    let report = outcome?;
    written?;
    Ok(report)
}

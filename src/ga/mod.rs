//! Genetic algorithm engine.
//!
//! Users describe a candidate solution by implementing [`Individual`]
//! (fitness, mutate, breed). A [`Population`] owns a generation of them
//! together with its own random source and evolves it epoch by epoch.
//!
//! # Key Types
//!
//! - [`Individual`]: Candidate solution contract
//! - [`Population`]: Sorted generation plus the `evolve` step and `run` loop
//! - [`RunConfig`] / [`EvolveParams`]: Stopping condition and per-epoch rates
//! - [`RunReport`]: Outcome of a run
//!
//! # Submodules
//!
//! - [`operators`]: Gene-vector crossover and mutation helpers
//!
//! # Epoch
//!
//! 1. Sort by fitness, best first
//! 2. Keep the top `retain` fraction as parents
//! 3. Promote each remaining individual with probability `random_select`
//! 4. Replace each parent by a mutant with probability `mutate_rate`
//! 5. Breed random pairs of distinct parents until the size is restored
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
pub mod operators;
mod population;
mod runner;
mod types;

pub use config::{EvolveParams, RunConfig};
pub use population::{retain_count, Population};
pub use runner::{RunReport, RunStatus};
pub use types::Individual;

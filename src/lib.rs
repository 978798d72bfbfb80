//! Population-based genetic algorithm engine.
//!
//! The crate provides the problem-independent half of a genetic algorithm:
//!
//! - **Individual contract** ([`ga::Individual`]): what a candidate
//!   solution must do: report its fitness, mutate and breed.
//! - **Population** ([`ga::Population`]): retain, random-select, mutate and
//!   breed, one epoch at a time, until a fitness threshold or an epoch
//!   budget is reached. Cancellable between epochs.
//! - **Solution binding** ([`binding::SolutionBinding`]): the narrow seam
//!   through which problem-specific code reads an instance into a
//!   population and writes the best individual back out.
//!
//! Every population owns an explicit, seedable random source, so runs are
//! reproducible and independent of each other.
//!
//! # Features
//!
//! - `parallel`: score new individuals on the rayon thread pool
//! - `serde`: derive `Serialize`/`Deserialize` for configuration and reports

pub mod binding;
pub mod error;
pub mod ga;
pub mod random;

pub use error::{GaError, Result};

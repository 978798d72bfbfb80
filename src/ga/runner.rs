//! The convergence loop.
//!
//! [`Population::run`] repeats [`Population::advance`] until the best
//! individual reaches the threshold, the epoch budget is spent, or a
//! cancellation flag is raised between epochs.

use super::config::RunConfig;
use super::population::Population;
use super::types::Individual;
use crate::error::Result;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunStatus {
    /// The best individual reached the threshold.
    Converged,
    /// The epoch budget ran out first.
    Exhausted,
    /// The cancellation flag was raised.
    Cancelled,
}

/// Result of [`Population::run`].
///
/// The best individual itself stays in the population; read it with
/// [`Population::best`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunReport {
    /// Why the loop stopped.
    pub status: RunStatus,

    /// Number of epochs fully executed.
    pub epochs: usize,

    /// Best fitness at the end of the run.
    pub best_fitness: f64,

    /// Best fitness before the first epoch and after each epoch.
    pub fitness_history: Vec<f64>,
}

impl RunReport {
    /// Whether the run was stopped by the cancellation flag.
    pub fn cancelled(&self) -> bool {
        self.status == RunStatus::Cancelled
    }
}

impl<I: Individual, R: Rng> Population<I, R> {
    /// Evolves until convergence or until `config.epochs` is reached.
    pub fn run(&mut self, config: &RunConfig) -> Result<RunReport> {
        self.run_observed(config, None, |_, _| {})
    }

    /// Runs with an optional cancellation flag.
    ///
    /// The flag is checked before every epoch and before the threshold and
    /// epoch budget, so a request raised during the last epoch is still
    /// reported as [`RunStatus::Cancelled`]. The population stays as the
    /// last completed epoch left it.
    pub fn run_with_cancel(
        &mut self,
        config: &RunConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<RunReport> {
        self.run_observed(config, cancel, |_, _| {})
    }

    /// Runs with a cancellation flag and a progress observer.
    ///
    /// `observer` receives the zero-based epoch index and the best
    /// individual after every
    /// [`effective_report_interval`](RunConfig::effective_report_interval)
    /// epochs.
    ///
    /// # Errors
    /// Invalid configuration, plus anything [`Population::advance`]
    /// returns. The population keeps the last fully computed generation.
    pub fn run_observed<F>(
        &mut self,
        config: &RunConfig,
        cancel: Option<Arc<AtomicBool>>,
        mut observer: F,
    ) -> Result<RunReport>
    where
        F: FnMut(usize, &I),
    {
        config.validate()?;
        info!(
            epochs = config.epochs,
            threshold = config.threshold,
            population = self.len(),
            retain = config.params.retain,
            select = config.params.random_select,
            mutate = config.params.mutate_rate,
            "genetic algorithm parameters"
        );

        let every = config.effective_report_interval();
        let mut fitness_history = Vec::with_capacity(config.epochs + 1);
        fitness_history.push(self.best_fitness());

        let mut epoch = 0;
        let mut cancelled = false;
        loop {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }
            if self.best_fitness() >= config.threshold || epoch >= config.epochs {
                break;
            }

            self.advance_with(&config.params, config.parallel)?;
            fitness_history.push(self.best_fitness());

            if epoch % every == 0 {
                debug!(epoch, best_fitness = self.best_fitness(), "epoch");
                observer(epoch, self.best());
            }
            epoch += 1;
        }

        let status = if cancelled {
            warn!(epoch, "evolution cancelled");
            RunStatus::Cancelled
        } else if self.best_fitness() >= config.threshold {
            RunStatus::Converged
        } else {
            RunStatus::Exhausted
        };
        info!(?status, epochs = epoch, best_fitness = self.best_fitness(), "evolution finished");

        Ok(RunReport {
            status,
            epochs: epoch,
            best_fitness: self.best_fitness(),
            fitness_history,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::operators::{flip_mutation, invert_mutation, single_point_crossover, swap_mutation};
    use crate::GaError;

    // ---- OneMax: fraction of set bits, scaled so 1.0 is out of reach ----

    #[derive(Clone, Debug)]
    struct BitString {
        bits: Vec<bool>,
        scale: f64,
    }

    impl Individual for BitString {
        fn fitness(&self) -> Result<f64> {
            let ones = self.bits.iter().filter(|&&b| b).count();
            Ok(ones as f64 / self.bits.len() as f64 * self.scale)
        }

        fn mutate<R: Rng>(&self, rng: &mut R) -> Result<Self> {
            let mut bits = self.bits.clone();
            flip_mutation(&mut bits, rng);
            Ok(BitString {
                bits,
                scale: self.scale,
            })
        }

        fn breed<R: Rng>(&self, mother: &Self, rng: &mut R) -> Result<Self> {
            Ok(BitString {
                bits: single_point_crossover(&self.bits, &mother.bits, rng),
                scale: self.scale,
            })
        }
    }

    fn onemax(n: usize, size: usize, scale: f64, seed: u64) -> Population<BitString> {
        Population::generate(size, crate::random::create_rng(seed), |rng| {
            let bits = (0..n).map(|_| rng.random_bool(0.3)).collect();
            Ok(BitString { bits, scale })
        })
        .unwrap()
    }

    #[test]
    fn test_onemax_convergence() {
        let mut pop = onemax(20, 50, 1.0, 42);
        let config = RunConfig::default()
            .with_threshold(1.0)
            .with_epochs(300)
            .with_retain(0.2)
            .with_select(0.05)
            .with_mutate(0.2);

        let report = pop.run(&config).unwrap();

        assert!(
            pop.best_fitness() >= 0.8,
            "expected at least 16/20 bits set, got {}",
            pop.best_fitness()
        );
        assert!(report.epochs <= 300);
        assert_eq!(report.fitness_history.len(), report.epochs + 1);
    }

    #[test]
    fn test_converged_run_stops_early() {
        let mut pop = onemax(8, 30, 1.0, 7);
        let config = RunConfig::default()
            .with_threshold(0.5)
            .with_epochs(1000)
            .with_retain(0.3);

        let report = pop.run(&config).unwrap();

        assert_eq!(report.status, RunStatus::Converged);
        assert!(report.epochs < 1000);
        assert!(pop.best_fitness() >= 0.5);
    }

    #[test]
    fn test_already_converged_runs_no_epochs() {
        let mut pop = onemax(4, 10, 1.0, 3);
        let threshold = pop.best_fitness();
        let report = pop.run(&RunConfig::default().with_threshold(threshold)).unwrap();
        assert_eq!(report.status, RunStatus::Converged);
        assert_eq!(report.epochs, 0);
        assert_eq!(report.fitness_history.len(), 1);
    }

    #[test]
    fn test_exhausted_within_epoch_budget() {
        let mut pop = onemax(16, 20, 0.5, 11);
        let config = RunConfig::default()
            .with_threshold(1.0)
            .with_epochs(25)
            .with_retain(0.3);

        let report = pop.run(&config).unwrap();

        assert_eq!(report.status, RunStatus::Exhausted);
        assert_eq!(report.epochs, 25);
        assert_eq!(report.fitness_history.len(), 26);
        assert_eq!(pop.len(), 20);
    }

    #[test]
    fn test_elitism_without_mutation_never_regresses() {
        let mut pop = onemax(16, 20, 1.0, 5);
        let config = RunConfig::default()
            .with_threshold(1.0)
            .with_epochs(40)
            .with_retain(0.25)
            .with_mutate(0.0);

        let report = pop.run(&config).unwrap();

        for window in report.fitness_history.windows(2) {
            assert!(
                window[1] >= window[0],
                "best fitness regressed: {} -> {}",
                window[0],
                window[1]
            );
        }
    }

    #[test]
    fn test_cancellation_at_epoch_five() {
        let mut pop = onemax(32, 40, 0.5, 21);
        let config = RunConfig::default()
            .with_threshold(1.0)
            .with_epochs(100)
            .with_retain(0.3)
            .with_report_interval(1);

        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        let mut observed = Vec::new();

        let report = pop
            .run_observed(&config, Some(cancel), |epoch, best| {
                observed.push((epoch, best.fitness().unwrap()));
                if epoch == 4 {
                    flag.store(true, Ordering::Relaxed);
                }
            })
            .unwrap();

        assert!(report.cancelled());
        assert_eq!(report.epochs, 5);
        assert_eq!(observed.len(), 5);
        let (last_epoch, last_best) = observed[observed.len() - 1];
        assert_eq!(last_epoch, 4);
        assert!((pop.best_fitness() - last_best).abs() < 1e-12);
        assert!((report.best_fitness - last_best).abs() < 1e-12);
    }

    #[test]
    fn test_cancel_before_start() {
        let mut pop = onemax(8, 10, 0.5, 2);
        let before = pop.best_fitness();
        let cancel = Arc::new(AtomicBool::new(true));

        let report = pop
            .run_with_cancel(&RunConfig::default().with_retain(0.5), Some(cancel))
            .unwrap();

        assert_eq!(report.status, RunStatus::Cancelled);
        assert_eq!(report.epochs, 0);
        assert!((pop.best_fitness() - before).abs() < 1e-12);
    }

    #[test]
    fn test_cancel_during_last_epoch() {
        let mut pop = onemax(16, 20, 0.5, 13);
        let config = RunConfig::default()
            .with_threshold(1.0)
            .with_epochs(3)
            .with_retain(0.3)
            .with_report_interval(1);

        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        let report = pop
            .run_observed(&config, Some(cancel), |epoch, _| {
                if epoch == 2 {
                    flag.store(true, Ordering::Relaxed);
                }
            })
            .unwrap();

        assert_eq!(report.status, RunStatus::Cancelled);
        assert_eq!(report.epochs, 3);
        assert_eq!(report.fitness_history.len(), 4);
    }

    #[test]
    fn test_cancel_wins_over_converged() {
        let mut pop = onemax(4, 10, 1.0, 3);
        let threshold = pop.best_fitness();
        let cancel = Arc::new(AtomicBool::new(true));

        let report = pop
            .run_with_cancel(&RunConfig::default().with_threshold(threshold), Some(cancel))
            .unwrap();

        assert_eq!(report.status, RunStatus::Cancelled);
        assert_eq!(report.epochs, 0);
    }

    // ---- Permutation: count of genes already in their sorted position ----

    #[derive(Clone, Debug)]
    struct Tour {
        order: Vec<usize>,
    }

    impl Individual for Tour {
        fn fitness(&self) -> Result<f64> {
            let fixed = self.order.iter().enumerate().filter(|&(i, &c)| i == c).count();
            Ok(fixed as f64 / self.order.len() as f64)
        }

        fn mutate<R: Rng>(&self, rng: &mut R) -> Result<Self> {
            let mut order = self.order.clone();
            if rng.random_bool(0.5) {
                swap_mutation(&mut order, rng);
            } else {
                invert_mutation(&mut order, rng);
            }
            Ok(Tour { order })
        }

        fn breed<R: Rng>(&self, mother: &Self, rng: &mut R) -> Result<Self> {
            if self.order.len() != mother.order.len() {
                return Err(GaError::TypeMismatch("tours of different length".into()));
            }
            // father's prefix, then the mother's remaining cities in her order
            let cut = rng.random_range(0..=self.order.len());
            let mut order = self.order[..cut].to_vec();
            order.extend(mother.order.iter().filter(|c| !self.order[..cut].contains(*c)));
            Ok(Tour { order })
        }
    }

    #[test]
    fn test_permutation_operators_keep_tours_valid() {
        let n = 12;
        let mut pop = Population::generate(40, crate::random::create_rng(31), |rng| {
            let mut order: Vec<usize> = (0..n).collect();
            for _ in 0..n {
                swap_mutation(&mut order, rng);
            }
            Ok(Tour { order })
        })
        .unwrap();

        let config = RunConfig::default()
            .with_threshold(1.0)
            .with_epochs(150)
            .with_retain(0.25)
            .with_mutate(0.3);
        let report = pop.run(&config).unwrap();
        assert!(report.epochs > 0);

        for tour in pop.individuals() {
            let mut sorted = tour.order.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..n).collect::<Vec<_>>(), "not a permutation: {:?}", tour.order);
        }
    }

    #[test]
    fn test_default_report_cadence() {
        let mut pop = onemax(16, 20, 0.5, 8);
        let config = RunConfig::default()
            .with_threshold(1.0)
            .with_epochs(30)
            .with_retain(0.3);

        let mut seen = Vec::new();
        pop.run_observed(&config, None, |epoch, _| seen.push(epoch))
            .unwrap();

        assert_eq!(seen, vec![0, 3, 6, 9, 12, 15, 18, 21, 24, 27]);
    }

    #[test]
    fn test_small_epoch_budget_reports_every_epoch() {
        let mut pop = onemax(16, 20, 0.5, 8);
        let config = RunConfig::default()
            .with_threshold(1.0)
            .with_epochs(3)
            .with_retain(0.3);

        let mut seen = Vec::new();
        pop.run_observed(&config, None, |epoch, _| seen.push(epoch))
            .unwrap();

        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut pop = onemax(8, 10, 1.0, 1);
        let err = pop.run(&RunConfig::default().with_epochs(0)).unwrap_err();
        assert!(matches!(err, GaError::InvalidParameter(_)));
    }

    #[test]
    fn test_empty_parent_pool_propagates() {
        let mut pop = onemax(8, 10, 0.5, 1);
        let config = RunConfig::default().with_retain(0.0).with_select(0.0);
        let err = pop.run(&config).unwrap_err();
        assert!(matches!(err, GaError::InvalidParameter(_)));
        assert_eq!(pop.len(), 10);
    }

    #[test]
    fn test_same_seed_same_history() {
        let config = RunConfig::default()
            .with_threshold(1.0)
            .with_epochs(20)
            .with_retain(0.3)
            .with_select(0.1)
            .with_mutate(0.1);

        let mut a = onemax(24, 30, 1.0, 99);
        let mut b = onemax(24, 30, 1.0, 99);
        let ra = a.run(&config).unwrap();
        let rb = b.run(&config).unwrap();

        assert_eq!(ra.fitness_history, rb.fitness_history);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let config = RunConfig::default()
            .with_threshold(1.0)
            .with_epochs(20)
            .with_retain(0.3)
            .with_mutate(0.1);

        let mut seq = onemax(24, 30, 1.0, 4);
        let mut par = onemax(24, 30, 1.0, 4);
        let rs = seq.run(&config).unwrap();
        let rp = par.run(&config.clone().with_parallel(true)).unwrap();

        assert_eq!(rs.fitness_history, rp.fitness_history);
    }
}

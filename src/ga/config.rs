//! Run configuration.
//!
//! [`RunConfig`] holds the stopping condition and the three rates that
//! drive each epoch.

use crate::error::{GaError, Result};

/// Parameters for one epoch of evolution.
///
/// All three rates are probabilities in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolveParams {
    /// Fraction of the best-ranked individuals kept unconditionally.
    pub retain: f64,
    /// Chance that each remaining individual is promoted to parent.
    pub random_select: f64,
    /// Chance that each parent is replaced by a mutated copy.
    pub mutate_rate: f64,
}

impl EvolveParams {
    /// Creates parameters, clamping each rate into `[0, 1]`.
    pub fn new(retain: f64, random_select: f64, mutate_rate: f64) -> Self {
        Self {
            retain: clamp_rate(retain),
            random_select: clamp_rate(random_select),
            mutate_rate: clamp_rate(mutate_rate),
        }
    }
}

impl Default for EvolveParams {
    fn default() -> Self {
        Self {
            retain: 0.2,
            random_select: 0.05,
            mutate_rate: 0.01,
        }
    }
}

/// Configuration for [`Population::run`](super::Population::run).
///
/// # Defaults
///
/// ```
/// use u_evolve::ga::RunConfig;
///
/// let config = RunConfig::default();
/// assert_eq!(config.epochs, 100);
/// assert!((config.threshold - 0.9).abs() < 1e-12);
/// assert!((config.params.retain - 0.2).abs() < 1e-12);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_evolve::ga::RunConfig;
///
/// let config = RunConfig::default()
///     .with_epochs(500)
///     .with_threshold(0.99)
///     .with_retain(0.3)
///     .with_mutate(0.05);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunConfig {
    /// Target fitness in `(0, 1]`. The run stops once the best individual
    /// reaches it.
    pub threshold: f64,

    /// Maximum number of epochs.
    pub epochs: usize,

    /// Per-epoch rates.
    pub params: EvolveParams,

    /// Epochs between progress reports.
    ///
    /// `None` reports every `epochs / 10` epochs, and never less than every
    /// epoch.
    pub report_interval: Option<usize>,

    /// Score new individuals on the rayon pool.
    ///
    /// Has no effect unless the `parallel` feature is enabled.
    pub parallel: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            threshold: 0.9,
            epochs: 100,
            params: EvolveParams::default(),
            report_interval: None,
            parallel: false,
        }
    }
}

impl RunConfig {
    /// Sets the target fitness.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the maximum number of epochs.
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Sets the retain rate.
    pub fn with_retain(mut self, rate: f64) -> Self {
        self.params.retain = clamp_rate(rate);
        self
    }

    /// Sets the random-select rate.
    pub fn with_select(mut self, rate: f64) -> Self {
        self.params.random_select = clamp_rate(rate);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutate(mut self, rate: f64) -> Self {
        self.params.mutate_rate = clamp_rate(rate);
        self
    }

    /// Sets an explicit progress reporting interval.
    pub fn with_report_interval(mut self, every: usize) -> Self {
        self.report_interval = Some(every);
        self
    }

    /// Enables or disables parallel fitness evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Epochs between progress reports.
    pub fn effective_report_interval(&self) -> usize {
        self.report_interval
            .unwrap_or(self.epochs / 10)
            .max(1)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(GaError::invalid_parameter(format!(
                "threshold must be in (0, 1], got {}",
                self.threshold
            )));
        }
        if self.epochs == 0 {
            return Err(GaError::invalid_parameter("epochs must be at least 1"));
        }
        let rates = [
            ("retain", self.params.retain),
            ("select", self.params.random_select),
            ("mutate", self.params.mutate_rate),
        ];
        for (name, rate) in rates {
            if !(0.0..=1.0).contains(&rate) {
                return Err(GaError::invalid_parameter(format!(
                    "{name} must be in [0, 1], got {rate}"
                )));
            }
        }
        if self.report_interval == Some(0) {
            return Err(GaError::invalid_parameter(
                "report_interval must be positive or None",
            ));
        }
        Ok(())
    }
}

/// NaN collapses to 0.
fn clamp_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        0.0
    } else {
        rate.clamp(0.0, 1.0)
    }
}

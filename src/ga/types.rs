//! Core trait definitions for the GA engine.
//!
//! [`Individual`] is the whole contract between the generic engine and a
//! problem-specific candidate solution: the engine only ever scores,
//! mutates and breeds, it never looks inside.

use crate::error::Result;
use rand::Rng;

/// A candidate solution in the population.
///
/// Higher fitness is better. `fitness` must be a pure function of the
/// individual's state: the engine caches the value and does not re-score
/// individuals that survive an epoch unchanged.
///
/// `mutate` and `breed` return newly owned values, so an offspring never
/// shares state with its parents.
///
/// # Implementing
///
/// ```
/// use rand::Rng;
/// use u_evolve::ga::Individual;
/// use u_evolve::Result;
///
/// #[derive(Clone)]
/// struct Bits(Vec<bool>);
///
/// impl Individual for Bits {
///     fn fitness(&self) -> Result<f64> {
///         let ones = self.0.iter().filter(|&&b| b).count();
///         Ok(ones as f64 / self.0.len() as f64)
///     }
///
///     fn mutate<R: Rng>(&self, rng: &mut R) -> Result<Self> {
///         let mut bits = self.0.clone();
///         let i = rng.random_range(0..bits.len());
///         bits[i] = !bits[i];
///         Ok(Bits(bits))
///     }
///
///     fn breed<R: Rng>(&self, mother: &Self, rng: &mut R) -> Result<Self> {
///         let cut = rng.random_range(0..self.0.len());
///         let mut bits = self.0[..cut].to_vec();
///         bits.extend_from_slice(&mother.0[cut..]);
///         Ok(Bits(bits))
///     }
/// }
/// ```
pub trait Individual: Clone + Send + Sync {
    /// How good this individual is. Higher is better.
    ///
    /// Implementations return [`GaError::InvalidState`] when the internal
    /// state does not allow a score to be computed.
    ///
    /// [`GaError::InvalidState`]: crate::GaError::InvalidState
    fn fitness(&self) -> Result<f64>;

    /// Returns a small randomized perturbation of this individual.
    fn mutate<R: Rng>(&self, rng: &mut R) -> Result<Self>;

    /// Crossover of `self` (father) and `mother` into a new individual.
    ///
    /// Implementations over a sum type return
    /// [`GaError::TypeMismatch`] when the two variants cannot be combined.
    ///
    /// [`GaError::TypeMismatch`]: crate::GaError::TypeMismatch
    fn breed<R: Rng>(&self, mother: &Self, rng: &mut R) -> Result<Self>;
}

/// An individual paired with its cached fitness.
#[derive(Debug, Clone)]
pub(crate) struct Scored<I> {
    pub(crate) individual: I,
    pub(crate) fitness: f64,
}

impl<I: Individual> Scored<I> {
    /// Scores `individual`, rejecting NaN so the population stays totally
    /// ordered.
    pub(crate) fn new(individual: I) -> Result<Self> {
        let fitness = individual.fitness()?;
        if fitness.is_nan() {
            return Err(crate::GaError::InvalidState(
                "fitness evaluated to NaN".into(),
            ));
        }
        Ok(Self {
            individual,
            fitness,
        })
    }
}

/// Stable sort by descending fitness; ties keep their current order.
pub(crate) fn sort_descending<I>(members: &mut [Scored<I>]) {
    members.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
}

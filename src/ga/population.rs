//! Population ownership and the single-epoch evolution step.
//!
//! One epoch is: sort by fitness, retain the top fraction, randomly
//! promote some of the rest, mutate some parents, then breed random pairs
//! of parents until the population is back to its original size.

use super::config::EvolveParams;
use super::types::{sort_descending, Individual, Scored};
use crate::error::{GaError, Result};
use crate::random::create_rng;
use rand::rngs::StdRng;
use rand::Rng;

/// The current generation and the random source that evolves it.
///
/// Members are kept sorted by descending fitness at all times, so
/// [`best`](Population::best) is always the first one.
///
/// # Usage
///
/// ```ignore
/// let mut population = Population::seeded(initial, 100, 42)?;
/// let report = population.run(&RunConfig::default())?;
/// println!("best fitness: {}", population.best_fitness());
/// ```
pub struct Population<I, R = StdRng> {
    pub(crate) members: Vec<Scored<I>>,
    pub(crate) rng: R,
}

/// A parent slot during an epoch: either carried over with its cached
/// fitness, or freshly mutated and not yet scored.
enum Parent<I> {
    Kept(Scored<I>),
    Fresh(I),
}

impl<I> Parent<I> {
    fn individual(&self) -> &I {
        match self {
            Parent::Kept(scored) => &scored.individual,
            Parent::Fresh(individual) => individual,
        }
    }
}

impl<I: Individual> Population<I, StdRng> {
    /// Builds a population driven by [`create_rng(seed)`](create_rng).
    pub fn seeded(individuals: Vec<I>, size: usize, seed: u64) -> Result<Self> {
        Self::new(individuals, size, create_rng(seed))
    }
}

impl<I: Individual, R: Rng> Population<I, R> {
    /// Builds a population of `size` individuals from the given seeds.
    ///
    /// Surplus seeds are dropped. When fewer seeds than `size` are given,
    /// the rest is filled with mutations of the seeds, round-robin.
    ///
    /// # Errors
    /// [`GaError::InvalidParameter`] if `individuals` is empty or `size` is
    /// zero. Fitness and mutation failures are propagated.
    pub fn new(mut individuals: Vec<I>, size: usize, mut rng: R) -> Result<Self> {
        if individuals.is_empty() {
            return Err(GaError::invalid_parameter(
                "population needs at least one initial individual",
            ));
        }
        if size == 0 {
            return Err(GaError::invalid_parameter("population size must be positive"));
        }

        individuals.truncate(size);
        let seeds = individuals.len();
        let mut next = 0;
        while individuals.len() < size {
            let mutant = individuals[next % seeds].mutate(&mut rng)?;
            individuals.push(mutant);
            next += 1;
        }

        Self::from_individuals(individuals, rng)
    }

    /// Builds a population by calling `create` `size` times.
    pub fn generate<F>(size: usize, mut rng: R, mut create: F) -> Result<Self>
    where
        F: FnMut(&mut R) -> Result<I>,
    {
        if size == 0 {
            return Err(GaError::invalid_parameter("population size must be positive"));
        }
        let individuals = (0..size)
            .map(|_| create(&mut rng))
            .collect::<Result<Vec<_>>>()?;
        Self::from_individuals(individuals, rng)
    }

    fn from_individuals(individuals: Vec<I>, rng: R) -> Result<Self> {
        let mut members = score_all(individuals, false)?;
        sort_descending(&mut members);
        Ok(Self { members, rng })
    }

    /// The fittest individual.
    pub fn best(&self) -> &I {
        &self.members[0].individual
    }

    /// Fitness of [`best`](Self::best).
    pub fn best_fitness(&self) -> f64 {
        self.members[0].fitness
    }

    /// Consumes the population and returns its fittest individual.
    pub fn into_best(mut self) -> I {
        self.members.swap_remove(0).individual
    }

    /// Individuals from fittest to least fit.
    pub fn individuals(&self) -> impl Iterator<Item = &I> + '_ {
        self.members.iter().map(|m| &m.individual)
    }

    /// Cached fitness values, in the same order as
    /// [`individuals`](Self::individuals).
    pub fn fitnesses(&self) -> impl Iterator<Item = f64> + '_ {
        self.members.iter().map(|m| m.fitness)
    }

    /// Number of individuals. Constant across epochs.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false`: a population is never empty once built.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Mutable access to the random source.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Computes the next generation without installing it.
    ///
    /// The returned individuals are sorted by descending fitness and there
    /// are exactly [`len`](Self::len) of them. Only the random source is
    /// advanced.
    ///
    /// # Errors
    /// [`GaError::InvalidParameter`] when fewer than two parents survive
    /// selection but children are still needed. Errors from the
    /// individuals' `fitness`, `mutate` and `breed` are propagated.
    pub fn evolve(&mut self, params: &EvolveParams) -> Result<Vec<I>> {
        let next = self.next_generation(params, false)?;
        Ok(next.into_iter().map(|m| m.individual).collect())
    }

    /// Computes the next generation and replaces the current one with it.
    ///
    /// On error the current generation is left untouched.
    pub fn advance(&mut self, params: &EvolveParams) -> Result<()> {
        self.advance_with(params, false)
    }

    pub(crate) fn advance_with(&mut self, params: &EvolveParams, parallel: bool) -> Result<()> {
        self.members = self.next_generation(params, parallel)?;
        Ok(())
    }

    fn next_generation(
        &mut self,
        params: &EvolveParams,
        parallel: bool,
    ) -> Result<Vec<Scored<I>>> {
        let params = EvolveParams::new(params.retain, params.random_select, params.mutate_rate);
        let n = self.members.len();

        // 1. Sort (a no-op unless members were reordered since the last epoch)
        sort_descending(&mut self.members);

        // 2. Retain the best performers
        let retained = retain_count(n, params.retain);
        let mut parents: Vec<Parent<I>> = self.members[..retained]
            .iter()
            .cloned()
            .map(Parent::Kept)
            .collect();

        // 3. Promote some of the rest for diversity
        for member in &self.members[retained..] {
            if self.rng.random_range(0.0..1.0) < params.random_select {
                parents.push(Parent::Kept(member.clone()));
            }
        }

        // 4. Mutation
        for parent in parents.iter_mut() {
            if self.rng.random_range(0.0..1.0) < params.mutate_rate {
                let mutant = parent.individual().mutate(&mut self.rng)?;
                *parent = Parent::Fresh(mutant);
            }
        }

        // 5. Crossover to refill
        let missing = n - parents.len();
        if missing > 0 && parents.len() < 2 {
            return Err(GaError::invalid_parameter(format!(
                "cannot breed {missing} children from {} parent(s); raise retain or select",
                parents.len()
            )));
        }
        let mut children = Vec::with_capacity(missing);
        while parents.len() + children.len() < n {
            let father = self.rng.random_range(0..parents.len());
            let mut mother = self.rng.random_range(0..parents.len());
            while mother == father {
                mother = self.rng.random_range(0..parents.len());
            }
            let child = parents[father]
                .individual()
                .breed(parents[mother].individual(), &mut self.rng)?;
            children.push(child);
        }

        // 6. Score what is new, keep parent-then-child order for stable ties
        let mut slots = Vec::with_capacity(n);
        let mut pending = Vec::with_capacity(missing);
        for parent in parents {
            match parent {
                Parent::Kept(scored) => slots.push(Some(scored)),
                Parent::Fresh(individual) => {
                    slots.push(None);
                    pending.push(individual);
                }
            }
        }
        slots.extend(children.iter().map(|_| None));
        pending.extend(children);

        let mut scored = score_all(pending, parallel)?.into_iter();
        let mut next: Vec<Scored<I>> = slots
            .into_iter()
            .filter_map(|slot| slot.or_else(|| scored.next()))
            .collect();
        sort_descending(&mut next);
        Ok(next)
    }
}

/// Number of top-ranked individuals kept unconditionally:
/// `floor(n * retain)`.
pub fn retain_count(n: usize, retain: f64) -> usize {
    ((n as f64 * retain.clamp(0.0, 1.0)).floor() as usize).min(n)
}

/// Scores individuals in order, on the rayon pool when asked and available.
fn score_all<I: Individual>(individuals: Vec<I>, parallel: bool) -> Result<Vec<Scored<I>>> {
    #[cfg(feature = "parallel")]
    {
        if parallel {
            use rayon::prelude::*;
            return individuals.into_par_iter().map(Scored::new).collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    individuals.into_iter().map(Scored::new).collect()
}

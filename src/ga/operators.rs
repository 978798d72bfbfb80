//! Generic gene-vector operators.
//!
//! Building blocks for [`Individual::mutate`](super::Individual::mutate) and
//! [`Individual::breed`](super::Individual::breed) implementations whose
//! genome is a flat slice. They know nothing about fitness.
//!
//! # Crossover
//!
//! - [`single_point_crossover`]: prefix of the father, suffix of the mother
//! - [`uniform_crossover`]: each gene drawn from either parent with equal odds
//!
//! # Mutation
//!
//! - [`flip_mutation`]: negate one random boolean gene
//! - [`swap_mutation`]: exchange two random positions
//! - [`invert_mutation`]: reverse a random segment

use rand::Rng;

// ============================================================================
// Crossover operators
// ============================================================================

/// Single-point crossover.
///
/// Picks a cut point in `0..=n` and returns `father[..cut]` followed by
/// `mother[cut..]`.
///
/// # Panics
/// Panics if the parents have different lengths.
pub fn single_point_crossover<T: Clone, R: Rng>(father: &[T], mother: &[T], rng: &mut R) -> Vec<T> {
    assert_eq!(father.len(), mother.len(), "parents must have equal length");
    let cut = rng.random_range(0..=father.len());
    let mut child = Vec::with_capacity(father.len());
    child.extend_from_slice(&father[..cut]);
    child.extend_from_slice(&mother[cut..]);
    child
}

/// Uniform crossover: every gene comes from either parent with probability
/// one half.
///
/// # Panics
/// Panics if the parents have different lengths.
pub fn uniform_crossover<T: Clone, R: Rng>(father: &[T], mother: &[T], rng: &mut R) -> Vec<T> {
    assert_eq!(father.len(), mother.len(), "parents must have equal length");
    father
        .iter()
        .zip(mother)
        .map(|(f, m)| if rng.random_bool(0.5) { f.clone() } else { m.clone() })
        .collect()
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Negates one random gene. No-op on an empty slice.
pub fn flip_mutation<R: Rng>(genes: &mut [bool], rng: &mut R) {
    if genes.is_empty() {
        return;
    }
    let i = rng.random_range(0..genes.len());
    genes[i] = !genes[i];
}

/// Swaps two distinct random positions. No-op below two genes.
pub fn swap_mutation<T, R: Rng>(genes: &mut [T], rng: &mut R) {
    let n = genes.len();
    if n < 2 {
        return;
    }
    let i = rng.random_range(0..n);
    let mut j = rng.random_range(0..n - 1);
    if j >= i {
        j += 1;
    }
    genes.swap(i, j);
}

/// Reverses a random segment `[start, end]`. No-op below two genes.
pub fn invert_mutation<T, R: Rng>(genes: &mut [T], rng: &mut R) {
    let n = genes.len();
    if n < 2 {
        return;
    }
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    let (start, end) = if a <= b { (a, b) } else { (b, a) };
    genes[start..=end].reverse();
}

//! Random source construction.
//!
//! Every [`Population`](crate::ga::Population) owns its own generator, so
//! runs seeded with the same value are reproducible and independent
//! populations never share state.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic generator from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator seeded from the operating system.
pub fn entropy_rng() -> StdRng {
    StdRng::from_os_rng()
}

//! Seeded fixture data for sift test surfaces: the shared people table
//! and deterministic well-formed query generation.

use rand_chacha::ChaCha8Rng;

// public exports are one module level down
pub mod query;
pub mod table;

pub(crate) use rand_chacha::rand_core::{Rng, SeedableRng};

/// Uniform-ish pick in `0..bound`. Modulo bias is irrelevant at fixture
/// scale.
pub(crate) fn pick(rng: &mut ChaCha8Rng, bound: usize) -> usize {
    (rng.next_u64() % bound.max(1) as u64) as usize
}

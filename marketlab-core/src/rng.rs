//! Deterministic RNG hierarchy.
//!
//! A master seed generates deterministic sub-seeds for each
//! `(generation, scope, key)` tuple: one stream per instrument and one per
//! exchange-rate row. Sub-seeds are derived via BLAKE3 hashing, independently
//! of build order, so a snapshot is identical regardless of thread count.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Scope for instrument series streams.
pub const SCOPE_INSTRUMENT: &str = "instrument";
/// Scope for exchange-rate table streams.
pub const SCOPE_EXCHANGE: &str = "exchange";

/// Deterministic RNG hierarchy.
#[derive(Debug, Clone)]
pub struct RngHierarchy {
    master_seed: u64,
}

impl RngHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    /// Hierarchy rooted at a master seed drawn from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Derive a deterministic sub-seed for a specific (generation, scope, key).
    ///
    /// Length-prefixing `scope` keeps `("ab", "c")` and `("a", "bc")` apart.
    pub fn sub_seed(&self, generation: u64, scope: &str, key: &str) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(&generation.to_le_bytes());
        hasher.update(&(scope.len() as u64).to_le_bytes());
        hasher.update(scope.as_bytes());
        hasher.update(key.as_bytes());
        let hash = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(head)
    }

    /// Create a seeded StdRng from a sub-seed.
    pub fn rng_for(&self, generation: u64, scope: &str, key: &str) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(generation, scope, key))
    }
}

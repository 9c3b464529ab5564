//! Deterministic hashing for the crate's maps and for deriving RNG seeds.
//!
//! The hashing data structures in the standard library are randomly seeded, so iteration order
//! and seed derivation would differ between runs. The `HashMap` alias here uses
//! `rustc-hash`'s Fx hasher instead. Use `HashMap::default()` to construct one.

use xxhash_rust::xxh3::xxh3_64;

pub use rustc_hash::FxHashMap as HashMap;

/// Computes a stable 64 bit hash of a `&str`. Used to offset the base seed of each RNG stream.
pub fn hash_str(data: &str) -> u64 {
    xxh3_64(data.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_strings() {
        assert_eq!(hash_str("PlacementRng"), hash_str("PlacementRng"));
        assert_ne!(hash_str("PlacementRng"), hash_str("VelocityRng"));
    }
}

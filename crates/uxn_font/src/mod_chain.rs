//! Two stage modulo hashing.
//!
//! The VM has no hash tables, so characters are looked up with
//! `prehash(c) % a % b`. The search below finds a pair `(a, b)` that maps the
//! keys of one program without collisions, with `b` (the table width) as small
//! as possible.

use std::collections::BTreeSet;

use rayon::prelude::*;

use crate::{FontPackError, Result};

/// Below this many candidates per level the search stays on one thread.
const PARALLEL_THRESHOLD: usize = 64;

/// The moduli of a `x % a % b` hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModChain {
    pub a: u16,
    pub b: u16,
}

impl ModChain {
    pub fn slot(&self, key: u16) -> usize {
        (key % self.a % self.b) as usize
    }

    /// True if no two keys share a slot.
    pub fn is_injective(&self, keys: &[u16]) -> bool {
        injective(keys, self.a as usize, self.b as usize)
    }
}

/// Search settings for [`ModChainSolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModChainSolver {
    /// Only accept powers of two for `b`.
    pub pow2_modulus: bool,
    /// Step between candidate values of `a`. Values above 1 are faster but
    /// may miss the smallest possible `b`.
    pub coarseness: usize,
    /// Explore the candidates of one level on the rayon pool.
    pub parallel: bool,
}

impl Default for ModChainSolver {
    fn default() -> Self {
        Self {
            pow2_modulus: false,
            coarseness: 7,
            parallel: true,
        }
    }
}

impl ModChainSolver {
    /// Finds `(a, b)` such that `key % a % b` is distinct for all keys.
    ///
    /// `b` runs upwards from the number of keys to the largest key, for every
    /// `b` all candidate `a` from `b` to the largest key are tried before the
    /// next `b`. The first hit wins, so `b` is minimal for the explored `a`.
    pub fn solve(&self, keys: &[u16]) -> Result<ModChain> {
        if self.coarseness == 0 {
            return Err(FontPackError::InvalidCoarseness);
        }
        let keys: Vec<u16> = keys.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        let Some(&max_key) = keys.last() else {
            return Err(FontPackError::EmptyKeySet);
        };
        let max_key = max_key as usize;

        for b in keys.len().max(1)..=max_key {
            if self.pow2_modulus && !b.is_power_of_two() {
                continue;
            }
            if let Some(a) = self.search_level(&keys, b, max_key) {
                let chain = ModChain { a: a as u16, b: b as u16 };
                log::info!("mod chain for {} keys: a={a} b={b}", keys.len());
                return Ok(chain);
            }
        }
        Err(FontPackError::NoModChain { keys: keys.len() })
    }

    /// Smallest explored `a` that works with `b`.
    fn search_level(&self, keys: &[u16], b: usize, max_key: usize) -> Option<usize> {
        let candidates = (max_key - b) / self.coarseness + 1;
        let candidate = |i: usize| b + i * self.coarseness;

        if self.parallel && candidates >= PARALLEL_THRESHOLD {
            (0..candidates)
                .into_par_iter()
                .map(candidate)
                .find_first(|a| injective(keys, *a, b))
        } else {
            (0..candidates).map(candidate).find(|a| injective(keys, *a, b))
        }
    }
}

/// Finds a mod chain with the default search settings.
pub fn find_mod_chain(keys: &[u16]) -> Result<ModChain> {
    ModChainSolver::default().solve(keys)
}

fn injective(keys: &[u16], a: usize, b: usize) -> bool {
    let mut seen = vec![0u64; b.div_ceil(64)];
    for key in keys {
        let slot = *key as usize % a % b;
        let (word, bit) = (slot / 64, 1u64 << (slot % 64));
        if seen[word] & bit != 0 {
            return false;
        }
        seen[word] |= bit;
    }
    true
}

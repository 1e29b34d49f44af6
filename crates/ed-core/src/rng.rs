//! Deterministic simulation RNG and weighted discrete choice.
//!
//! The whole run draws from one seeded `SmallRng` owned by the dispatch
//! world.  Because the scheduler resumes exactly one process at a time in a
//! deterministic order, the sequence of draws (and therefore the run) is
//! reproducible from the seed alone.

use rand::distributions::WeightedIndex;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{CoreError, CoreResult};

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG.  Never shared across threads.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}

// ── WeightedTable ─────────────────────────────────────────────────────────────

/// A fixed set of outcomes with relative weights, sampled in O(log n).
///
/// Built once from configuration; every draw takes the RNG explicitly so the
/// table itself is immutable and shareable.
#[derive(Clone, Debug)]
pub struct WeightedTable<T> {
    items: Vec<T>,
    index: WeightedIndex<f64>,
}

impl<T: Copy> WeightedTable<T> {
    /// Build from `(item, weight)` pairs.
    ///
    /// Fails if there are no items, any weight is negative or non-finite, or
    /// all weights are zero.
    pub fn new(pairs: impl IntoIterator<Item = (T, f64)>) -> CoreResult<Self> {
        let (items, weights): (Vec<T>, Vec<f64>) = pairs.into_iter().unzip();
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(CoreError::Config("weights must be finite".into()));
        }
        let index = WeightedIndex::new(&weights)
            .map_err(|e| CoreError::Config(format!("invalid weight table: {e}")))?;
        Ok(Self { items, index })
    }

    /// Draw one item.
    #[inline]
    pub fn pick(&self, rng: &mut SimRng) -> T {
        self.items[rng.inner().sample(&self.index)]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

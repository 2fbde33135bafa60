//! Weighted random choice over alternatives.

use rand::distributions::{Distribution, WeightedIndex};

use lu_core::SimRng;

/// Draw an index with probability proportional to `weights`.
///
/// Non-finite and negative weights count as zero.  Returns `None` when every
/// alternative has zero weight (or there are none).
pub fn choose_weighted(rng: &mut SimRng, weights: &[f64]) -> Option<usize> {
    let clean = weights.iter().map(|w| if w.is_finite() && *w > 0.0 { *w } else { 0.0 });
    let dist = WeightedIndex::new(clean).ok()?;
    Some(dist.sample(rng.inner()))
}

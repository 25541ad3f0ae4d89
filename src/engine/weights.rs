//! Selection weights and the weighted draw.
//!
//! A game's weight is its catalog weight scaled by how far it trails the
//! most-picked game: `weight * (max_occurrence + 1 - occurrences)`. The most
//! picked game keeps a factor of 1, so nothing is ever excluded outright;
//! everything else is pulled up in proportion to how rarely it came up.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::Serialize;

use crate::catalog::ItemId;
use crate::error::{RandomizerError, RandomizerResult};

/// One game the next pick may choose, with the numbers behind its chance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    /// The game.
    pub id: ItemId,
    /// Weight assigned in the catalog.
    pub catalog_weight: f64,
    /// Times picked so far.
    pub occurrences: u64,
    /// Weight used for the draw.
    pub weight: f64,
    /// Chance of being picked next, in `(0, 1]`.
    pub probability: f64,
}

/// Weight of a game picked `occurrences` times when the most-picked game
/// has `max_occurrence` picks.
///
/// `occurrences` above `max_occurrence` is clamped to a factor of 1.
#[must_use]
pub fn selection_weight(catalog_weight: f64, occurrences: u64, max_occurrence: u64) -> f64 {
    let factor = max_occurrence.saturating_sub(occurrences).saturating_add(1);
    #[allow(clippy::cast_precision_loss)]
    let factor = factor as f64;
    catalog_weight * factor
}

/// Fills in `probability` for each candidate from the weight total.
pub(crate) fn normalize(candidates: &mut [Candidate]) {
    let total: f64 = candidates.iter().map(|c| c.weight).sum();
    if total > 0.0 && total.is_finite() {
        for candidate in candidates.iter_mut() {
            candidate.probability = candidate.weight / total;
        }
    }
}

/// Draws one candidate index with probability proportional to its weight.
///
/// # Errors
/// `Internal` if the list is empty or the weights have no finite positive
/// total, which catalog validation rules out in practice.
pub(crate) fn draw<R: Rng + ?Sized>(candidates: &[Candidate], rng: &mut R) -> RandomizerResult<usize> {
    let total: f64 = candidates.iter().map(|c| c.weight).sum();
    // WeightedIndex panics instead of erroring when the total is not finite.
    if !(total.is_finite() && total > 0.0) {
        return Err(RandomizerError::internal(format!(
            "cannot sample selection weights: total is {total}"
        )));
    }
    let dist = WeightedIndex::new(candidates.iter().map(|c| c.weight))
        .map_err(|e| RandomizerError::internal(format!("cannot sample selection weights: {e}")))?;
    Ok(dist.sample(rng))
}

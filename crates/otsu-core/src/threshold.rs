//! Within-class variance threshold selection.
//!
//! For every candidate `t` in `MIN_THRESHOLD..=MAX_THRESHOLD` the histogram is
//! split into a low and a high band and scored with
//!
//! `J(t) = w_low * var_low + w_high * var_high`
//!
//! where the weights are raw pixel counts. The candidate with the smallest
//! score wins; on equal scores the lowest `t` is kept.

use crate::{BandConvention, Histogram, OtsuError, OtsuParams};
use log::trace;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Smallest candidate threshold.
pub const MIN_THRESHOLD: u8 = 1;
/// Largest candidate threshold. At 255 the high band is always empty.
pub const MAX_THRESHOLD: u8 = 254;

/// Weight, mean and variance of one contiguous intensity band.
///
/// `weight` is the number of pixels in the band. An empty band has all
/// three fields equal to zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BandStats {
    pub weight: f64,
    pub mean: f64,
    pub variance: f64,
}

impl BandStats {
    /// Contribution of this band to the within-class variance.
    #[inline]
    pub fn cost(&self) -> f64 {
        self.weight * self.variance
    }
}

/// One evaluated candidate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdCandidate {
    pub threshold: u8,
    pub score: f64,
}

/// Result of [`select_threshold`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSelection {
    /// Pixels strictly above this value are foreground.
    pub threshold: u8,
    /// Within-class variance at `threshold`.
    pub score: f64,
    pub low: BandStats,
    pub high: BandStats,
    /// All candidates in ascending threshold order, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<ThresholdCandidate>>,
}

/// Statistics of the histogram restricted to `levels`.
pub fn band_stats(hist: &Histogram, levels: RangeInclusive<u8>) -> BandStats {
    if levels.is_empty() {
        return BandStats::default();
    }
    let lo = *levels.start() as usize;
    let hi = *levels.end() as usize;
    let band = &hist.counts()[lo..=hi];

    let weight: f64 = band.iter().map(|&c| c as f64).sum();
    if weight == 0.0 {
        return BandStats::default();
    }

    let mean = band
        .iter()
        .zip(lo..)
        .map(|(&c, v)| c as f64 * v as f64)
        .sum::<f64>()
        / weight;
    let variance = band
        .iter()
        .zip(lo..)
        .map(|(&c, v)| {
            let d = v as f64 - mean;
            c as f64 * d * d
        })
        .sum::<f64>()
        / weight;

    BandStats {
        weight,
        mean,
        variance,
    }
}

fn split_levels(t: u8, convention: BandConvention) -> (RangeInclusive<u8>, RangeInclusive<u8>) {
    #[allow(clippy::reversed_empty_ranges)]
    let high = match t.checked_add(1) {
        Some(next) => next..=u8::MAX,
        None => 1..=0,
    };
    (convention.first_level()..=t, high)
}

fn split_bands(hist: &Histogram, t: u8, convention: BandConvention) -> (BandStats, BandStats) {
    let (low, high) = split_levels(t, convention);
    (band_stats(hist, low), band_stats(hist, high))
}

/// `J(t)` for a single threshold.
pub fn within_class_variance(hist: &Histogram, t: u8, convention: BandConvention) -> f64 {
    let (low, high) = split_bands(hist, t, convention);
    low.cost() + high.cost()
}

/// Pick the threshold minimizing the within-class variance.
///
/// Every candidate re-sums its two bands, which keeps the result identical
/// to the textbook formula at a fixed cost of 254 x 256 bin visits.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(hist, params), fields(total = hist.total()))
)]
pub fn select_threshold(
    hist: &Histogram,
    params: &OtsuParams,
) -> Result<ThresholdSelection, OtsuError> {
    if hist.total() == 0 {
        return Err(OtsuError::EmptyHistogram);
    }

    let mut candidates = params
        .keep_candidates
        .then(|| Vec::with_capacity((MAX_THRESHOLD - MIN_THRESHOLD) as usize + 1));
    let mut best = ThresholdSelection {
        threshold: MIN_THRESHOLD,
        score: f64::INFINITY,
        low: BandStats::default(),
        high: BandStats::default(),
        candidates: None,
    };

    for t in MIN_THRESHOLD..=MAX_THRESHOLD {
        let (low, high) = split_bands(hist, t, params.band_convention);
        let score = low.cost() + high.cost();
        if let Some(list) = candidates.as_mut() {
            list.push(ThresholdCandidate {
                threshold: t,
                score,
            });
        }
        // strict: equal scores keep the earlier threshold
        if score < best.score {
            best.threshold = t;
            best.score = score;
            best.low = low;
            best.high = high;
        }
    }

    trace!(
        "otsu threshold {} (score {:.3}, low w={} high w={})",
        best.threshold,
        best.score,
        best.low.weight,
        best.high.weight
    );

    best.candidates = candidates;
    Ok(best)
}

//! 256-bin intensity histogram.

use crate::GrayImageView;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Number of intensity levels of an 8-bit image.
pub const NUM_LEVELS: usize = 256;

/// Pixel count per intensity level; `counts[v]` is the number of pixels equal to `v`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    #[serde(with = "counts_serde")]
    counts: [u64; NUM_LEVELS],
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            counts: [0; NUM_LEVELS],
        }
    }
}

impl Histogram {
    /// Count every pixel of `img` in a single pass.
    pub fn from_view(img: &GrayImageView<'_>) -> Self {
        let mut hist = Self::default();
        hist.accumulate(img.data);
        hist
    }

    /// Partial histogram over a row range of `img`.
    ///
    /// Rows past `img.height` are ignored. Partial histograms over disjoint
    /// row ranges [`merge`](Self::merge) into the full histogram.
    pub fn from_rows(img: &GrayImageView<'_>, rows: Range<usize>) -> Self {
        let end = rows.end.min(img.height);
        let start = rows.start.min(end);
        let mut hist = Self::default();
        hist.accumulate(&img.data[start * img.width..end * img.width]);
        hist
    }

    pub fn from_counts(counts: [u64; NUM_LEVELS]) -> Self {
        Self { counts }
    }

    fn accumulate(&mut self, values: &[u8]) {
        for &v in values {
            self.counts[v as usize] += 1;
        }
    }

    /// Add the counts of `other` into `self`.
    pub fn merge(&mut self, other: &Histogram) {
        for (dst, &src) in self.counts.iter_mut().zip(other.counts.iter()) {
            *dst += src;
        }
    }

    #[inline]
    pub fn counts(&self) -> &[u64; NUM_LEVELS] {
        &self.counts
    }

    #[inline]
    pub fn count(&self, level: u8) -> u64 {
        self.counts[level as usize]
    }

    /// Total number of samples, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.counts
            .iter()
            .fold(0u64, |acc, &c| acc.saturating_add(c))
    }

    /// Every count multiplied by `factor`, or `None` if any bin overflows.
    pub fn scaled(&self, factor: u64) -> Option<Self> {
        let mut counts = self.counts;
        for c in counts.iter_mut() {
            *c = c.checked_mul(factor)?;
        }
        Some(Self { counts })
    }
}

// serde only derives fixed arrays up to 32 elements.
mod counts_serde {
    use super::NUM_LEVELS;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(counts: &[u64; NUM_LEVELS], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(counts.iter())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u64; NUM_LEVELS], D::Error> {
        let v = Vec::<u64>::deserialize(d)?;
        let len = v.len();
        v.try_into()
            .map_err(|_| D::Error::invalid_length(len, &"256 histogram bins"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GrayImage;

    fn ramp(width: usize, height: usize) -> GrayImage {
        let data = (0..width * height).map(|i| (i * 7 % 256) as u8).collect();
        GrayImage::new(width, height, data).expect("valid ramp")
    }

    #[test]
    fn counts_sum_to_pixel_count() {
        let img = ramp(37, 11);
        let hist = Histogram::from_view(&img.view());
        assert_eq!(hist.total(), 37 * 11);
    }

    #[test]
    fn counts_each_level() {
        let img = GrayImage::from_rows(&[vec![0, 0, 255], vec![7, 0, 255]]).expect("valid rows");
        let hist = Histogram::from_view(&img.view());
        assert_eq!(hist.count(0), 3);
        assert_eq!(hist.count(7), 1);
        assert_eq!(hist.count(255), 2);
        assert_eq!(hist.counts().iter().filter(|&&c| c > 0).count(), 3);
    }

    #[test]
    fn merged_row_partials_equal_full_histogram() {
        let img = ramp(16, 9);
        let view = img.view();
        let mut merged = Histogram::from_rows(&view, 0..4);
        merged.merge(&Histogram::from_rows(&view, 4..7));
        merged.merge(&Histogram::from_rows(&view, 7..100));
        assert_eq!(merged, Histogram::from_view(&view));
        assert_eq!(Histogram::from_rows(&view, 20..30).total(), 0);
    }

    #[test]
    fn scaled_multiplies_counts() {
        let mut counts = [0u64; NUM_LEVELS];
        counts[3] = 2;
        counts[200] = 5;
        let hist = Histogram::from_counts(counts).scaled(4).expect("no overflow");
        assert_eq!(hist.count(3), 8);
        assert_eq!(hist.count(200), 20);
        assert_eq!(hist.total(), 28);
    }

    #[test]
    fn scaling_past_u64_is_refused() {
        let mut counts = [0u64; NUM_LEVELS];
        counts[17] = 1 << 40;
        let hist = Histogram::from_counts(counts);
        assert!(hist.scaled(1 << 30).is_none());
        assert_eq!(hist.scaled(1 << 20).map(|h| h.count(17)), Some(1 << 60));
    }

    #[test]
    fn total_saturates() {
        let mut counts = [0u64; NUM_LEVELS];
        counts[0] = u64::MAX - 1;
        counts[255] = 5;
        assert_eq!(Histogram::from_counts(counts).total(), u64::MAX);
    }

    #[test]
    fn json_round_trip_keeps_all_bins() {
        let img = ramp(8, 8);
        let hist = Histogram::from_view(&img.view());
        let json = serde_json::to_string(&hist).expect("serialize");
        let back: Histogram = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, hist);
        assert!(serde_json::from_str::<Histogram>(r#"{"counts":[1,2,3]}"#).is_err());
    }
}

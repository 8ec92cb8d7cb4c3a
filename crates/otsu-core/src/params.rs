use serde::{Deserialize, Serialize};

/// Which intensities take part in the low band for a candidate threshold `t`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandConvention {
    /// Low band `[0, t]`, high band `[t + 1, 255]`.
    #[default]
    IncludeZero,
    /// Low band `[1, t]`, high band `[t + 1, 255]`.
    ///
    /// Intensity 0 never contributes to the cost. Kept for parity with
    /// results produced by older tooling.
    ExcludeZero,
}

impl BandConvention {
    /// Lowest intensity that belongs to the low band.
    #[inline]
    pub fn first_level(self) -> u8 {
        match self {
            Self::IncludeZero => 0,
            Self::ExcludeZero => 1,
        }
    }
}

/// Parameters for threshold selection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtsuParams {
    pub band_convention: BandConvention,
    /// Keep the full list of `(threshold, score)` candidates in the result.
    pub keep_candidates: bool,
}

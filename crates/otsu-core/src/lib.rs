//! Core types and algorithms for global Otsu binarization.
//!
//! The crate is purely computational. It works on 8-bit row-major intensity
//! matrices and does *not* depend on any concrete image decoding library;
//! loading and saving live in the `otsu` facade crate.
//!
//! ```
//! use otsu_core::{segment, GrayImage, OtsuParams};
//!
//! # fn main() -> Result<(), otsu_core::OtsuError> {
//! let img = GrayImage::from_rows(&[vec![50, 50, 200], vec![200, 50, 200]])?;
//! let seg = segment(&img.view(), &OtsuParams::default())?;
//! assert_eq!(seg.binary.data, vec![0, 0, 255, 255, 0, 255]);
//! # Ok(())
//! # }
//! ```

mod binarize;
mod error;
mod histogram;
mod image;
mod logger;
mod params;
mod segment;
mod threshold;

pub use binarize::{binarize, binarize_in_place, BACKGROUND, FOREGROUND};
pub use error::OtsuError;
pub use histogram::{Histogram, NUM_LEVELS};
pub use image::{GrayImage, GrayImageView};
pub use params::{BandConvention, OtsuParams};
pub use segment::{segment, Segmentation};
pub use threshold::{
    band_stats, select_threshold, within_class_variance, BandStats, ThresholdCandidate,
    ThresholdSelection, MAX_THRESHOLD, MIN_THRESHOLD,
};

#[cfg(feature = "tracing")]
pub use logger::{init_tracing, LOG_ENV};

pub use logger::init_with_level;

//! Global Otsu binarization.
//!
//! This crate provides:
//! - a re-export of the computational core (`otsu-core`) as [`core`],
//! - JSON configuration and report types in [`io`],
//! - (feature `image`) conversion between `image` buffers and intensity
//!   matrices, plus end-to-end helpers in [`image_io`],
//! - (feature `cli`) the `otsu` command line tool.
//!
//! ## Quickstart
//!
//! ```no_run
//! use otsu::image_io;
//! use otsu::OtsuParams;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = image::ImageReader::open("page.png")?.decode()?;
//! let seg = image_io::segment_image(&img, &OtsuParams::default())?;
//! println!("threshold: {}", seg.threshold());
//! image_io::save_binary("page_otsu.png", &seg.binary)?;
//! # Ok(())
//! # }
//! ```
//!
//! Grayscale conversion averages the three color channels with integer
//! division, `(r + g + b) / 3`, rather than using perceptual luma weights.

pub use otsu_core as core;

pub use otsu_core::{
    binarize, segment, BandConvention, GrayImage, GrayImageView, Histogram, OtsuError,
    OtsuParams, Segmentation, ThresholdSelection,
};

#[cfg(feature = "image")]
pub mod image_io;
pub mod io;

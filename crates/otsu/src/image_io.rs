//! Conversion between `image` buffers and intensity matrices.

use crate::core::{self, GrayImage, GrayImageView, OtsuError, OtsuParams, Segmentation};
use image::{DynamicImage, ImageReader, RgbImage};
use std::path::Path;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced while decoding, converting or encoding images.
#[derive(thiserror::Error, Debug)]
pub enum ImageIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Otsu(#[from] OtsuError),

    #[error("intensity matrix {width}x{height} does not fit an image buffer")]
    Dimensions { width: usize, height: usize },
}

/// Average the three channels of every pixel: `(r + g + b) / 3`.
pub fn gray_from_rgb(img: &RgbImage) -> Result<GrayImage, OtsuError> {
    let data = img
        .pixels()
        .map(|p| {
            let [r, g, b] = p.0;
            ((r as u16 + g as u16 + b as u16) / 3) as u8
        })
        .collect();
    GrayImage::new(img.width() as usize, img.height() as usize, data)
}

/// Convert any decoded image to an intensity matrix.
///
/// Non-RGB8 inputs go through `to_rgb8` first, so alpha is dropped and
/// 16-bit or float channels are rescaled to 8 bits.
pub fn gray_from_dynamic(img: &DynamicImage) -> Result<GrayImage, OtsuError> {
    match img {
        DynamicImage::ImageRgb8(rgb) => gray_from_rgb(rgb),
        other => gray_from_rgb(&other.to_rgb8()),
    }
}

/// Borrow an `image::GrayImage` as a core view.
pub fn gray_view(img: &image::GrayImage) -> Result<GrayImageView<'_>, OtsuError> {
    GrayImageView::new(img.width() as usize, img.height() as usize, img.as_raw())
}

/// Build an intensity matrix from a raw row-major grayscale buffer.
pub fn gray_image_from_slice(
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<GrayImage, OtsuError> {
    GrayImage::new(width as usize, height as usize, pixels.to_vec())
}

/// Copy an intensity matrix into an `image::GrayImage`.
pub fn to_luma_image(img: &GrayImage) -> Result<image::GrayImage, ImageIoError> {
    let dims_err = || ImageIoError::Dimensions {
        width: img.width,
        height: img.height,
    };
    let width = u32::try_from(img.width).map_err(|_| dims_err())?;
    let height = u32::try_from(img.height).map_err(|_| dims_err())?;
    image::GrayImage::from_raw(width, height, img.data.clone()).ok_or_else(dims_err)
}

/// Decode an image file into an intensity matrix.
pub fn load_gray(path: impl AsRef<Path>) -> Result<GrayImage, ImageIoError> {
    let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(gray_from_dynamic(&img)?)
}

/// Encode an intensity matrix; the format follows the file extension.
pub fn save_binary(path: impl AsRef<Path>, img: &GrayImage) -> Result<(), ImageIoError> {
    to_luma_image(img)?.save(path)?;
    Ok(())
}

/// Convert and segment a decoded image end-to-end.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, params), fields(width = img.width(), height = img.height()))
)]
pub fn segment_image(
    img: &DynamicImage,
    params: &OtsuParams,
) -> Result<Segmentation, ImageIoError> {
    let gray = gray_from_dynamic(img)?;
    Ok(core::segment(&gray.view(), params)?)
}

use crate::{GrayImage, GrayImageView};

/// Output level for pixels strictly above the threshold.
pub const FOREGROUND: u8 = 255;
/// Output level for pixels at or below the threshold.
pub const BACKGROUND: u8 = 0;

#[inline]
fn level(v: u8, threshold: u8) -> u8 {
    if v > threshold {
        FOREGROUND
    } else {
        BACKGROUND
    }
}

/// Map every pixel of `img` to [`FOREGROUND`] or [`BACKGROUND`].
pub fn binarize(img: &GrayImageView<'_>, threshold: u8) -> GrayImage {
    GrayImage {
        width: img.width,
        height: img.height,
        data: img.data.iter().map(|&v| level(v, threshold)).collect(),
    }
}

pub fn binarize_in_place(img: &mut GrayImage, threshold: u8) {
    for v in img.data.iter_mut() {
        *v = level(*v, threshold);
    }
}

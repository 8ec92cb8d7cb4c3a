//! End-to-end segmentation: histogram, threshold, binary matrix.

use crate::{
    binarize, select_threshold, GrayImage, GrayImageView, Histogram, OtsuError, OtsuParams,
    ThresholdSelection, FOREGROUND,
};
use log::debug;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Output of [`segment`].
#[derive(Clone, Debug)]
pub struct Segmentation {
    pub selection: ThresholdSelection,
    pub histogram: Histogram,
    /// Same shape as the input, every value is 0 or 255.
    pub binary: GrayImage,
}

impl Segmentation {
    #[inline]
    pub fn threshold(&self) -> u8 {
        self.selection.threshold
    }

    /// Number of input pixels strictly above the threshold.
    pub fn foreground_pixels(&self) -> u64 {
        self.histogram.counts()[self.threshold() as usize + 1..]
            .iter()
            .sum()
    }

    pub fn background_pixels(&self) -> u64 {
        self.histogram.total() - self.foreground_pixels()
    }
}

/// Binarize `img` with its global Otsu threshold.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, params), fields(width = img.width, height = img.height))
)]
pub fn segment(img: &GrayImageView<'_>, params: &OtsuParams) -> Result<Segmentation, OtsuError> {
    GrayImageView::new(img.width, img.height, img.data)?;

    let histogram = Histogram::from_view(img);
    let selection = select_threshold(&histogram, params)?;
    let binary = binarize(img, selection.threshold);

    debug!(
        "segmented {}x{} image at threshold {} ({} foreground px)",
        img.width,
        img.height,
        selection.threshold,
        binary.data.iter().filter(|&&v| v == FOREGROUND).count()
    );

    Ok(Segmentation {
        selection,
        histogram,
        binary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BandConvention;

    #[test]
    fn bimodal_image_maps_levels_apart() {
        let rows: Vec<Vec<i32>> = (0..8)
            .map(|y| (0..8).map(|x| if (x + y) % 2 == 0 { 50 } else { 200 }).collect())
            .collect();
        let img = GrayImage::from_rows(&rows).expect("rows");
        let seg = segment(&img.view(), &OtsuParams::default()).expect("segment");

        assert!(seg.threshold() >= 50 && seg.threshold() < 200);
        for (src, out) in img.data.iter().zip(seg.binary.data.iter()) {
            let expected = if *src == 50 { 0 } else { 255 };
            assert_eq!(*out, expected);
        }
        assert_eq!(seg.foreground_pixels(), 32);
        assert_eq!(seg.background_pixels(), 32);
        assert_eq!(seg.histogram.total(), 64);
    }

    #[test]
    fn uniform_image_becomes_all_foreground() {
        let img = GrayImage::filled(4, 4, 100).expect("4x4");
        let seg = segment(&img.view(), &OtsuParams::default()).expect("segment");
        assert_eq!(seg.threshold(), 1);
        assert!(seg.binary.data.iter().all(|&v| v == 255));
    }

    #[test]
    fn black_image_stays_black() {
        let img = GrayImage::filled(3, 5, 0).expect("3x5");
        for convention in [BandConvention::IncludeZero, BandConvention::ExcludeZero] {
            let params = OtsuParams {
                band_convention: convention,
                ..OtsuParams::default()
            };
            let seg = segment(&img.view(), &params).expect("segment");
            assert_eq!(seg.threshold(), 1);
            assert!(seg.binary.data.iter().all(|&v| v == 0));
            assert_eq!(seg.foreground_pixels(), 0);
        }
    }

    #[test]
    fn output_has_input_shape() {
        let img = GrayImage::new(7, 3, (0..21).map(|v| v * 12).collect()).expect("7x3");
        let seg = segment(&img.view(), &OtsuParams::default()).expect("segment");
        assert_eq!((seg.binary.width, seg.binary.height), (7, 3));
        assert!(seg.binary.data.iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn malformed_view_fails_fast() {
        let data = [1u8, 2, 3];
        let view = GrayImageView {
            width: 2,
            height: 2,
            data: &data,
        };
        assert_eq!(
            segment(&view, &OtsuParams::default()).unwrap_err(),
            OtsuError::BufferLength {
                expected: 4,
                got: 3
            }
        );
        let view = GrayImageView {
            width: 0,
            height: 2,
            data: &[],
        };
        assert!(matches!(
            segment(&view, &OtsuParams::default()),
            Err(OtsuError::ZeroDimension { .. })
        ));
    }
}

//! JSON configuration and report helpers for segmentation runs.

use crate::core::{BandConvention, BandStats, OtsuParams, Segmentation, ThresholdCandidate};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum SegmentIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Configuration for one segmentation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentConfig {
    pub image_path: String,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub report_path: Option<String>,
    #[serde(default)]
    pub params: OtsuParams,
}

impl SegmentConfig {
    pub fn new(image_path: impl Into<String>) -> Self {
        Self {
            image_path: image_path.into(),
            output_path: None,
            report_path: None,
            params: OtsuParams::default(),
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SegmentIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SegmentIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the binary image path, defaulting to `<stem>_otsu.png` next to the input.
    pub fn output_path(&self) -> PathBuf {
        if let Some(path) = self.output_path.as_ref() {
            return PathBuf::from(path);
        }
        let input = Path::new(&self.image_path);
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        input.with_file_name(format!("{stem}_otsu.png"))
    }

    pub fn report_path(&self) -> Option<PathBuf> {
        self.report_path.as_ref().map(PathBuf::from)
    }
}

/// Wall-clock timings of a run, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingsMs {
    pub load_image: u64,
    pub segment: u64,
    pub save_output: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentReport {
    pub image_path: String,
    pub output_path: String,
    pub width: usize,
    pub height: usize,
    pub band_convention: BandConvention,
    pub threshold: u8,
    pub score: f64,
    pub low: BandStats,
    pub high: BandStats,
    pub foreground_pixels: u64,
    pub background_pixels: u64,
    pub histogram: Vec<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<ThresholdCandidate>>,
    #[serde(default)]
    pub timings_ms: TimingsMs,
}

impl SegmentReport {
    /// Summarize a finished segmentation.
    pub fn new(cfg: &SegmentConfig, seg: &Segmentation, timings_ms: TimingsMs) -> Self {
        Self {
            image_path: cfg.image_path.clone(),
            output_path: cfg.output_path().to_string_lossy().into_owned(),
            width: seg.binary.width,
            height: seg.binary.height,
            band_convention: cfg.params.band_convention,
            threshold: seg.threshold(),
            score: seg.selection.score,
            low: seg.selection.low,
            high: seg.selection.high,
            foreground_pixels: seg.foreground_pixels(),
            background_pixels: seg.background_pixels(),
            histogram: seg.histogram.counts().to_vec(),
            candidates: seg.selection.candidates.clone(),
            timings_ms,
        }
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SegmentIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SegmentIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{segment, GrayImage};
    use approx::assert_relative_eq;

    #[test]
    fn config_defaults_fill_missing_fields() {
        let cfg: SegmentConfig =
            serde_json::from_str(r#"{"image_path":"scans/page.jpg"}"#).expect("minimal config");
        assert_eq!(cfg, SegmentConfig::new("scans/page.jpg"));
        assert_eq!(cfg.output_path(), PathBuf::from("scans/page_otsu.png"));
        assert_eq!(cfg.report_path(), None);
    }

    #[test]
    fn explicit_output_path_wins() {
        let cfg: SegmentConfig = serde_json::from_str(
            r#"{
                "image_path": "a.png",
                "output_path": "out/b.png",
                "report_path": "out/b.json",
                "params": { "band_convention": "exclude_zero" }
            }"#,
        )
        .expect("full config");
        assert_eq!(cfg.output_path(), PathBuf::from("out/b.png"));
        assert_eq!(cfg.report_path(), Some(PathBuf::from("out/b.json")));
        assert_eq!(cfg.params.band_convention, BandConvention::ExcludeZero);
        assert!(!cfg.params.keep_candidates);
    }

    #[test]
    fn report_summarizes_segmentation() {
        let img = GrayImage::from_rows(&[vec![20, 20, 20], vec![220, 220, 20]]).expect("rows");
        let cfg = SegmentConfig::new("two_tone.png");
        let seg = segment(&img.view(), &cfg.params).expect("segment");
        let report = SegmentReport::new(&cfg, &seg, TimingsMs::default());

        assert_eq!(report.threshold, 20);
        assert_eq!((report.width, report.height), (3, 2));
        assert_eq!(report.foreground_pixels, 2);
        assert_eq!(report.background_pixels, 4);
        assert_eq!(report.histogram.len(), 256);
        assert_eq!(report.histogram[20], 4);
        assert_relative_eq!(report.score, 0.0);
        assert_relative_eq!(report.high.mean, 220.0);
        assert!(report.candidates.is_none());
        assert_eq!(report.output_path, "two_tone_otsu.png");
    }
}

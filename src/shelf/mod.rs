pub mod gap_detection;
pub mod row_clustering;

pub use gap_detection::detect_gaps;
pub use row_clustering::{cluster_rows, Row};

use crate::bbox::{BBox, ImageBoxMap};
use crate::config::RowGapConfig;

/// Out-of-stock region finder working on product detections.
///
/// Every image is split into shelf rows, and the gaps inside each row become
/// candidate out-of-stock boxes.
#[derive(Debug, Clone)]
pub struct OosDetector {
    config: RowGapConfig,
}

impl OosDetector {
    pub fn new(config: RowGapConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &RowGapConfig {
        &self.config
    }

    /// Gap boxes of a single image, row after row in row creation order.
    pub fn detect_image(&self, boxes: &[BBox]) -> Vec<BBox> {
        let rows = cluster_rows(boxes, self.config.row_tol_px);

        let gaps: Vec<_> = rows
            .iter()
            .flat_map(|row| {
                detect_gaps(&row.boxes(boxes), self.config.gap_factor, self.config.min_abs_gap)
            })
            .collect();

        tracing::trace!(boxes = boxes.len(), rows = rows.len(), gaps = gaps.len(), "image processed");

        gaps
    }

    /// Gap boxes for every image of `detections`. Images without gaps are
    /// kept with an empty list.
    pub fn detect(&self, detections: &ImageBoxMap) -> ImageBoxMap {
        let out: ImageBoxMap = detections
            .iter()
            .map(|(name, boxes)| {
                let gaps = self.detect_image(boxes);
                tracing::debug!(image = %name, gaps = gaps.len(), "gaps detected");

                (name.clone(), gaps)
            })
            .collect();

        tracing::info!(
            images = out.len(),
            gaps = out.values().map(Vec::len).sum::<usize>(),
            "out-of-stock regions computed"
        );

        out
    }
}

impl Default for OosDetector {
    fn default() -> Self {
        Self::new(RowGapConfig::default())
    }
}

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

use crate::bbox::ImageBoxMap;
use crate::eval::iou_matching::MatchResult;
use crate::eval::metrics::{aggregate, image_union, match_image};

const CI_LOW: f64 = 2.5;
const CI_HIGH: f64 = 97.5;

/// One resampled dataset: indices into the sorted image list, drawn with
/// replacement. An image drawn twice is evaluated twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapSample {
    pub draws: Vec<usize>,
}

impl BootstrapSample {
    pub fn draw<R: Rng + ?Sized>(n_images: usize, rng: &mut R) -> Self {
        Self {
            draws: (0..n_images).map(|_| rng.gen_range(0..n_images)).collect(),
        }
    }

    /// Precision and recall of this sample given the per-image counts.
    fn evaluate(&self, per_image: &[MatchResult]) -> (f64, f64) {
        let m = aggregate(self.draws.iter().map(|&i| per_image[i]));

        (m.precision, m.recall)
    }
}

/// Bootstrap means and 95% percentile intervals of precision and recall.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize)]
pub struct BootstrapEstimate {
    pub mean_precision: f64,
    pub mean_recall: f64,
    pub precision_ci: (f64, f64),
    pub recall_ci: (f64, f64),
}

impl BootstrapEstimate {
    fn from_values(precisions: &[f64], recalls: &[f64]) -> Self {
        if precisions.is_empty() {
            return Self::default();
        }

        Self {
            mean_precision: mean(precisions),
            mean_recall: mean(recalls),
            precision_ci: (percentile(precisions, CI_LOW), percentile(precisions, CI_HIGH)),
            recall_ci: (percentile(recalls, CI_LOW), percentile(recalls, CI_HIGH)),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// `q`-th percentile (0..=100) with linear interpolation between the two
/// closest ranks. Returns 0.0 for an empty slice.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = (q / 100.0).max(0.0).min(1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;

    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

// Images are sorted and matched once; every sample just re-sums the counts.
fn per_image_counts(pred: &ImageBoxMap, gt: &ImageBoxMap, iou_thr: f64) -> Vec<MatchResult> {
    image_union(pred, gt)
        .into_iter()
        .map(|image| match_image(pred, gt, image, iou_thr))
        .collect()
}

/// Bootstrap confidence intervals with a caller supplied random source.
/// Parameters
/// ----------
/// pred : &ImageBoxMap
///     Predicted boxes per image.
/// gt : &ImageBoxMap
///     Ground truth boxes per image.
/// iou_thr : f64
///     Matching threshold of a true positive.
/// iterations : usize
///     Number of resampling rounds.
/// rng : &mut R
///     Random source; consumed `len(images)` draws per round, in round
///     order.
/// Returns
/// -------
/// BootstrapEstimate
///     All zeros when neither map holds an image.
pub fn bootstrap_with_rng<R: Rng + ?Sized>(pred: &ImageBoxMap, gt: &ImageBoxMap, iou_thr: f64, iterations: usize, rng: &mut R) -> BootstrapEstimate {
    let per_image = per_image_counts(pred, gt, iou_thr);
    if per_image.is_empty() {
        return BootstrapEstimate::default();
    }

    let (mut precisions, mut recalls) = (Vec::with_capacity(iterations), Vec::with_capacity(iterations));

    for _ in 0..iterations {
        let (p, r) = BootstrapSample::draw(per_image.len(), rng).evaluate(&per_image);
        precisions.push(p);
        recalls.push(r);
    }

    tracing::debug!(images = per_image.len(), iterations, "bootstrap finished");

    BootstrapEstimate::from_values(&precisions, &recalls)
}

/// Bootstrap confidence intervals seeded from `seed`.
pub fn bootstrap(pred: &ImageBoxMap, gt: &ImageBoxMap, iou_thr: f64, iterations: usize, seed: u64) -> BootstrapEstimate {
    let mut rng = StdRng::seed_from_u64(seed);

    bootstrap_with_rng(pred, gt, iou_thr, iterations, &mut rng)
}

/// Same as [`bootstrap`] but evaluates the rounds on the rayon pool.
///
/// All samples are drawn up front from one seeded stream in round order, so
/// the result is identical to the sequential run.
pub fn bootstrap_par(pred: &ImageBoxMap, gt: &ImageBoxMap, iou_thr: f64, iterations: usize, seed: u64) -> BootstrapEstimate {
    let per_image = per_image_counts(pred, gt, iou_thr);
    if per_image.is_empty() {
        return BootstrapEstimate::default();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let samples: Vec<_> = (0..iterations)
        .map(|_| BootstrapSample::draw(per_image.len(), &mut rng))
        .collect();

    let (precisions, recalls): (Vec<f64>, Vec<f64>) = samples
        .par_iter()
        .map(|s| s.evaluate(&per_image))
        .unzip();

    tracing::debug!(images = per_image.len(), iterations, "parallel bootstrap finished");

    BootstrapEstimate::from_values(&precisions, &recalls)
}

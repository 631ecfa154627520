use ndarray::prelude::*;

use crate::bbox::BBox;

/// Compute intersection over union.
/// Parameters
/// ----------
/// a, b : BBox
///     Bounding boxes in format `(x1, y1, x2, y2)`.
/// Returns
/// -------
/// f64
///     The intersection over union in [0, 1]. Boxes sharing no area
///     return exactly 0.0.
pub fn iou(a: &BBox, b: &BBox) -> f64 {
    let i_xmin = a.left().max(b.left());
    let i_ymin = a.top().max(b.top());

    let i_xmax = a.right().min(b.right());
    let i_ymax = a.bottom().min(b.bottom());

    let intersection_area = (i_xmax - i_xmin).max(0.0) * (i_ymax - i_ymin).max(0.0);
    if intersection_area <= 0.0 {
        return 0.0;
    }

    let union_area = a.area() + b.area() - intersection_area;

    if union_area > 0.0 {
        intersection_area / union_area
    } else {
        0.0
    }
}

/// Pairwise IoU table.
/// Returns
/// -------
/// Array2<f64>
///     A matrix of shape `len(rows), len(cols)` where entry (i, j) is
///     `iou(rows[i], cols[j])`.
pub fn iou_matrix(rows: &[BBox], cols: &[BBox]) -> Array2<f64> {
    let mut matrix = Array2::zeros((rows.len(), cols.len()));

    for (mut row, a) in matrix.axis_iter_mut(Axis(0)).zip(rows.iter()) {
        for (val, b) in row.iter_mut().zip(cols.iter()) {
            *val = iou(a, b);
        }
    }

    matrix
}

/// Per-image matching outcome.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl std::ops::Add for MatchResult {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            true_positives: self.true_positives + other.true_positives,
            false_positives: self.false_positives + other.false_positives,
            false_negatives: self.false_negatives + other.false_negatives,
        }
    }
}

impl std::iter::Sum for MatchResult {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, x| acc + x)
    }
}

/// Greedily associate predictions with ground truth.
///
/// Predictions are visited in the given order. Each one takes the still
/// unmatched ground truth box with the highest IoU (the first one on ties)
/// and keeps it when that IoU reaches `iou_thr`. The result depends on the
/// order of `pred`; it is not an optimal assignment.
/// Parameters
/// ----------
/// pred : &[BBox]
///     Predicted boxes of one image.
/// gt : &[BBox]
///     Ground truth boxes of the same image.
/// iou_thr : f64
///     Minimum IoU of an accepted association.
/// Returns
/// -------
/// (Vec<(usize, usize)>, Vec<usize>, Vec<usize>)
///     Returns a tuple with the following three entries:
///     * A list of matched prediction and ground truth indices.
///     * A list of unmatched prediction indices.
///     * A list of unmatched ground truth indices.
pub fn greedy_matching(pred: &[BBox], gt: &[BBox], iou_thr: f64) -> (Vec<(usize, usize)>, Vec<usize>, Vec<usize>) {
    let ious = iou_matrix(pred, gt);
    let mut matched = vec![false; gt.len()];
    let (mut matches, mut unmatched_pred) = (vec![], vec![]);

    for (pred_idx, row) in ious.axis_iter(Axis(0)).enumerate() {
        let mut best: Option<(usize, f64)> = None;

        for (gt_idx, &value) in row.iter().enumerate() {
            if matched[gt_idx] {
                continue;
            }

            match best {
                Some((_, best_iou)) if value <= best_iou => {}
                _ => best = Some((gt_idx, value)),
            }
        }

        match best {
            Some((gt_idx, best_iou)) if best_iou >= iou_thr => {
                matched[gt_idx] = true;
                matches.push((pred_idx, gt_idx));
            }
            _ => unmatched_pred.push(pred_idx),
        }
    }

    let unmatched_gt = matched
        .iter()
        .enumerate()
        .filter_map(|(idx, &m)| if m { None } else { Some(idx) })
        .collect();

    (matches, unmatched_pred, unmatched_gt)
}

/// TP/FP/FN counts of [`greedy_matching`].
pub fn greedy_match(pred: &[BBox], gt: &[BBox], iou_thr: f64) -> MatchResult {
    let (matches, unmatched_pred, unmatched_gt) = greedy_matching(pred, gt, iou_thr);

    MatchResult {
        true_positives: matches.len(),
        false_positives: unmatched_pred.len(),
        false_negatives: unmatched_gt.len(),
    }
}

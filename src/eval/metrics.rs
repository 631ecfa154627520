use std::collections::BTreeSet;

use serde::Serialize;

use crate::bbox::ImageBoxMap;
use crate::eval::iou_matching::{greedy_match, MatchResult};

/// Dataset level detection quality.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub precision: f64,
    pub recall: f64,
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl From<MatchResult> for Metrics {
    fn from(counts: MatchResult) -> Self {
        let MatchResult { true_positives: tp, false_positives: fp, false_negatives: fn_ } = counts;

        Self {
            precision: ratio(tp, tp + fp),
            recall: ratio(tp, tp + fn_),
            true_positives: tp,
            false_positives: fp,
            false_negatives: fn_,
        }
    }
}

#[inline]
fn ratio(num: usize, den: usize) -> f64 {
    if den > 0 {
        num as f64 / den as f64
    } else {
        0.0
    }
}

/// Sum per-image counts into precision and recall.
pub fn aggregate<I: IntoIterator<Item = MatchResult>>(results: I) -> Metrics {
    results.into_iter().sum::<MatchResult>().into()
}

/// Sorted union of the image names of both maps.
pub fn image_union<'a>(pred: &'a ImageBoxMap, gt: &'a ImageBoxMap) -> Vec<&'a str> {
    pred.keys()
        .chain(gt.keys())
        .map(String::as_str)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Match one image, treating a missing entry on either side as no boxes.
pub fn match_image(pred: &ImageBoxMap, gt: &ImageBoxMap, image: &str, iou_thr: f64) -> MatchResult {
    let p = pred.get(image).map(Vec::as_slice).unwrap_or(&[]);
    let g = gt.get(image).map(Vec::as_slice).unwrap_or(&[]);

    greedy_match(p, g, iou_thr)
}

/// Precision and recall of `pred` against `gt` over every image present in
/// either map.
/// Parameters
/// ----------
/// pred : &ImageBoxMap
///     Predicted boxes per image.
/// gt : &ImageBoxMap
///     Ground truth boxes per image.
/// iou_thr : f64
///     Matching threshold of a true positive.
/// Returns
/// -------
/// Metrics
///     Precision and recall (0.0 when undefined) with the summed counts.
pub fn precision_recall(pred: &ImageBoxMap, gt: &ImageBoxMap, iou_thr: f64) -> Metrics {
    aggregate(
        image_union(pred, gt)
            .into_iter()
            .map(|image| match_image(pred, gt, image, iou_thr)),
    )
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::bbox::BBox;

    fn map(entries: Vec<(&str, Vec<[f64; 4]>)>) -> ImageBoxMap {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.into_iter().map(BBox::from).collect()))
            .collect()
    }

    #[test]
    fn identical_maps() {
        let boxes = map(vec![
            ("a.jpg", vec![[0.0, 0.0, 10.0, 10.0], [20.0, 0.0, 30.0, 10.0]]),
            ("b.jpg", vec![[5.0, 5.0, 50.0, 50.0]]),
            ("c.jpg", vec![]),
        ]);

        let m = precision_recall(&boxes, &boxes, 1.0);

        assert_eq!(m.precision, 1.0);
        assert_eq!(m.recall, 1.0);
        assert_eq!(m.true_positives, 3);
        assert_eq!(m.false_positives, 0);
        assert_eq!(m.false_negatives, 0);
    }

    #[test]
    fn empty_predictions() {
        let pred = map(vec![]);
        let gt = map(vec![("a.jpg", vec![[0.0, 0.0, 10.0, 10.0]])]);

        let m = precision_recall(&pred, &gt, 0.3);

        assert_eq!(m, Metrics {
            precision: 0.0,
            recall: 0.0,
            true_positives: 0,
            false_positives: 0,
            false_negatives: 1,
        });
    }

    #[test]
    fn images_missing_from_one_side() {
        let pred = map(vec![
            ("a.jpg", vec![[0.0, 0.0, 10.0, 10.0]]),
            ("only_pred.jpg", vec![[0.0, 0.0, 10.0, 10.0]]),
        ]);
        let gt = map(vec![
            ("a.jpg", vec![[0.0, 0.0, 10.0, 10.0]]),
            ("only_gt.jpg", vec![[0.0, 0.0, 10.0, 10.0], [20.0, 0.0, 30.0, 10.0]]),
        ]);

        let m = precision_recall(&pred, &gt, 0.3);

        assert_eq!((m.true_positives, m.false_positives, m.false_negatives), (1, 1, 2));
        assert_eq!(m.precision, 0.5);
        assert_abs_diff_eq!(m.recall, 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn union_is_sorted_and_unique() {
        let pred = map(vec![("b", vec![]), ("a", vec![])]);
        let gt = map(vec![("c", vec![]), ("a", vec![])]);

        assert_eq!(image_union(&pred, &gt), vec!["a", "b", "c"]);
    }

    #[test]
    fn nothing_at_all() {
        let m = precision_recall(&ImageBoxMap::new(), &ImageBoxMap::new(), 0.3);
        assert_eq!(m, Metrics::default());
    }
}

pub mod bootstrap;
pub mod iou_matching;
pub mod metrics;

pub use bootstrap::{bootstrap, bootstrap_par, bootstrap_with_rng, percentile, BootstrapEstimate, BootstrapSample};
pub use iou_matching::{greedy_match, greedy_matching, iou, iou_matrix, MatchResult};
pub use metrics::{aggregate, image_union, precision_recall, Metrics};

use std::fmt;

use serde::Serialize;

use crate::bbox::ImageBoxMap;
use crate::config::EvalConfig;

/// Point estimate and bootstrap intervals of one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalReport {
    pub iou_thr: f64,
    pub base: Metrics,
    pub bootstrap: BootstrapEstimate,
}

impl fmt::Display for EvalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.base;
        let e = &self.bootstrap;

        writeln!(
            f,
            "Base (all images): Precision={:.3} Recall={:.3}  TP={} FP={} FN={}  (IoU>={})",
            b.precision, b.recall, b.true_positives, b.false_positives, b.false_negatives, self.iou_thr
        )?;
        writeln!(f, "Bootstrap means:   Precision={:.3} Recall={:.3}", e.mean_precision, e.mean_recall)?;
        writeln!(f, "95% CI (Precision): [{:.3}, {:.3}]", e.precision_ci.0, e.precision_ci.1)?;
        write!(f, "95% CI (Recall):    [{:.3}, {:.3}]", e.recall_ci.0, e.recall_ci.1)
    }
}

/// Score `pred` against `gt`: point estimate over all images plus bootstrap
/// intervals.
pub fn evaluate(pred: &ImageBoxMap, gt: &ImageBoxMap, config: &EvalConfig) -> EvalReport {
    let base = precision_recall(pred, gt, config.iou_thr);

    tracing::info!(
        tp = base.true_positives,
        fp = base.false_positives,
        fn_ = base.false_negatives,
        "base evaluation complete"
    );

    let bootstrap = if config.parallel {
        bootstrap_par(pred, gt, config.iou_thr, config.iterations, config.seed)
    } else {
        bootstrap(pred, gt, config.iou_thr, config.iterations, config.seed)
    };

    EvalReport {
        iou_thr: config.iou_thr,
        base,
        bootstrap,
    }
}

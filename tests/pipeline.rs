use shelf_oos::{evaluate, io, BBox, EvalConfig, ImageBoxMap, OosDetector, RowGapConfig};

fn detections() -> ImageBoxMap {
    let json = r#"{
        "shelf_1.jpg": [
            [0, 0, 40, 60], [45, 2, 85, 58], [200, 4, 240, 64],
            [0, 200, 40, 260], [160, 205, 200, 262]
        ],
        "shelf_2.jpg": [
            [0, 0, 30, 50], [32, 0, 62, 50], [64, 0, 94, 50]
        ],
        "shelf_3.jpg": [],
        "broken.jpg": [[10, 10, 10, 40]]
    }"#;

    io::read_box_map(json.as_bytes()).unwrap()
}

#[test]
fn gaps_then_evaluate() {
    let gaps = OosDetector::new(RowGapConfig::default()).detect(&detections());

    assert_eq!(gaps.len(), 4);
    assert_eq!(gaps["shelf_1.jpg"], vec![
        BBox::ltrb(85.0, 4.0, 200.0, 58.0),
        BBox::ltrb(40.0, 205.0, 160.0, 260.0),
    ]);
    assert!(gaps["shelf_2.jpg"].is_empty());
    assert!(gaps["shelf_3.jpg"].is_empty());
    assert!(gaps["broken.jpg"].is_empty());

    // The upper gap of shelf_1 is labelled a bit tighter, its lower gap is not
    // labelled, and shelf_2 has a labelled gap no prediction covers.
    let gt: ImageBoxMap = io::read_box_map(r#"{
        "shelf_1.jpg": [[90, 4, 195, 58]],
        "shelf_2.jpg": [[94, 0, 130, 50]],
        "shelf_3.jpg": [],
        "broken.jpg": []
    }"#.as_bytes()).unwrap();

    let report = evaluate(&gaps, &gt, &EvalConfig { iterations: 200, ..Default::default() });

    assert_eq!(report.base.true_positives, 1);
    assert_eq!(report.base.false_positives, 1);
    assert_eq!(report.base.false_negatives, 1);
    assert_eq!(report.base.precision, 0.5);
    assert_eq!(report.base.recall, 0.5);

    let b = report.bootstrap;
    assert!(b.precision_ci.0 <= b.precision_ci.1);
    assert!(b.recall_ci.0 <= b.recall_ci.1);
    assert!((0.0..=1.0).contains(&b.mean_precision));
    assert!((0.0..=1.0).contains(&b.mean_recall));

    let again = evaluate(&gaps, &gt, &EvalConfig { iterations: 200, ..Default::default() });
    assert_eq!(report, again);

    let text = report.to_string();
    assert!(text.starts_with("Base (all images): Precision=0.500 Recall=0.500  TP=1 FP=1 FN=1  (IoU>=0.3)"));
    assert_eq!(text.lines().count(), 4);
}

#[test]
fn predictions_scored_against_themselves() {
    let gaps = OosDetector::default().detect(&detections());
    let report = evaluate(&gaps, &gaps, &EvalConfig { iterations: 1, ..Default::default() });

    assert_eq!(report.base.precision, 1.0);
    assert_eq!(report.base.recall, 1.0);
    assert_eq!(report.base.false_positives, 0);
    assert_eq!(report.base.false_negatives, 0);
}

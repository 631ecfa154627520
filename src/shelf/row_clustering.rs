use crate::bbox::BBox;

/// A group of boxes assumed to stand on the same shelf level.
/// Attributes
/// ----------
/// indices : Vec<usize>
///     Indices into the clustered box slice, in the order the boxes joined.
/// mean : f64
///     Arithmetic mean of the vertical centers of the member boxes.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub indices: Vec<usize>,
    pub mean: f64,
}

impl Row {
    fn new(idx: usize, center: f64) -> Self {
        Self {
            indices: vec![idx],
            mean: center,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Member boxes in joining order.
    pub fn boxes(&self, boxes: &[BBox]) -> Vec<BBox> {
        self.indices.iter().map(|&i| boxes[i]).collect()
    }

    fn push(&mut self, idx: usize, boxes: &[BBox]) {
        self.indices.push(idx);
        self.mean = self.indices.iter().map(|&j| boxes[j].cy()).sum::<f64>()
            / self.indices.len() as f64;
    }
}

/// Group boxes into shelf rows by vertical center.
///
/// Boxes are visited in ascending order of their vertical center (ties keep
/// input order). Each box joins the first row, in creation order, whose
/// running mean is within `tolerance` of the box center, and the mean of
/// that row is recomputed over all its members. A box no row accepts starts
/// a new row.
///
/// The assignment is first-fit and a row mean drifts as members join, so the
/// grouping depends on the visiting order.
/// Parameters
/// ----------
/// boxes : &[BBox]
///     Boxes of a single image.
/// tolerance : f64
///     Maximum allowed distance between a box center and a row mean.
/// Returns
/// -------
/// Vec<Row>
///     Rows in creation order, each with at least one box.
pub fn cluster_rows(boxes: &[BBox], tolerance: f64) -> Vec<Row> {
    let mut order: Vec<usize> = (0..boxes.len()).collect();
    order.sort_by(|&a, &b| boxes[a].cy().total_cmp(&boxes[b].cy()));

    let mut rows: Vec<Row> = Vec::new();

    for idx in order {
        let center = boxes[idx].cy();

        match rows.iter_mut().find(|r| (center - r.mean).abs() <= tolerance) {
            Some(row) => row.push(idx, boxes),
            None => rows.push(Row::new(idx, center)),
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn bx(x1: f64, y1: f64, x2: f64, y2: f64) -> BBox {
        BBox::ltrb(x1, y1, x2, y2)
    }

    #[test]
    fn empty_input_has_no_rows() {
        assert!(cluster_rows(&[], 30.0).is_empty());
    }

    #[test]
    fn two_shelves() {
        let boxes = [
            bx(0.0, 100.0, 10.0, 120.0),
            bx(0.0, 0.0, 10.0, 20.0),
            bx(20.0, 4.0, 30.0, 24.0),
            bx(20.0, 102.0, 30.0, 124.0),
        ];

        let rows = cluster_rows(&boxes, 30.0);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].indices, vec![1, 2]);
        assert_eq!(rows[0].mean, 12.0);
        assert_eq!(rows[1].indices, vec![0, 3]);
        assert_eq!(rows[1].mean, 111.5);
        assert!(rows.iter().all(|r| !r.is_empty()));
    }

    #[test]
    fn running_mean_drifts() {
        let boxes = [
            bx(0.0, -5.0, 10.0, 5.0),   // cy 0
            bx(0.0, 5.0, 10.0, 15.0),   // cy 10
            bx(0.0, 19.0, 10.0, 29.0),  // cy 24
            bx(0.0, 10.0, 10.0, 20.0),  // cy 15
        ];

        // The box at 15 is farther than 10 from the first member but close
        // enough to the mean of 0 and 10.
        let rows = cluster_rows(&boxes, 10.0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].indices, vec![0, 1, 3]);
        assert_abs_diff_eq!(rows[0].mean, 25.0 / 3.0, epsilon = 1e-12);
        assert_eq!(rows[1].indices, vec![2]);
        assert_eq!(rows[1].mean, 24.0);
    }

    #[test]
    fn members_join_in_center_order() {
        let boxes = [
            bx(0.0, -5.0, 10.0, 5.0),   // cy 0
            bx(0.0, 5.0, 10.0, 15.0),   // cy 10
            bx(0.0, 2.0, 10.0, 12.0),   // cy 7
        ];

        let rows = cluster_rows(&boxes, 5.0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].indices, vec![0]);
        assert_eq!(rows[1].indices, vec![2, 1]);
        assert_eq!(rows[1].mean, 8.5);
        assert_eq!(rows[1].boxes(&boxes), vec![boxes[2], boxes[1]]);
    }

    #[test]
    fn zero_tolerance_splits_distinct_centers() {
        let boxes = [
            bx(0.0, 0.0, 10.0, 10.0),
            bx(20.0, 0.0, 30.0, 10.0),
            bx(40.0, 1.0, 50.0, 11.0),
        ];

        let rows = cluster_rows(&boxes, 0.0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[1].len(), 1);
    }

    #[test]
    fn ties_keep_input_order() {
        let boxes = [
            bx(50.0, 0.0, 60.0, 10.0),
            bx(0.0, 0.0, 10.0, 10.0),
        ];

        let rows = cluster_rows(&boxes, 1.0);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].indices, vec![0, 1]);
    }
}

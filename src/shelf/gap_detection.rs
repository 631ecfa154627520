use crate::bbox::BBox;

/// Representative box width of a row: the element at index `n / 2` of the
/// ascending width list (the upper middle one for even `n`).
fn representative_width(boxes: &[BBox]) -> f64 {
    let mut widths: Vec<f64> = boxes.iter().map(|b| b.width()).collect();
    widths.sort_by(|a, b| a.total_cmp(b));

    widths.get(widths.len() / 2).copied().unwrap_or(0.0)
}

/// Find empty shelf space between horizontally adjacent boxes of one row.
/// Parameters
/// ----------
/// row_boxes : &[BBox]
///     Boxes of a single shelf row, in any order.
/// gap_factor : f64
///     A gap qualifies when it is at least `gap_factor` times the
///     representative box width of the row.
/// min_abs_gap : f64
///     Absolute lower bound of the gap threshold in pixels.
/// Returns
/// -------
/// Vec<BBox>
///     One box per qualifying gap, spanning from the right edge of the
///     left neighbor to the left edge of the right neighbor and covering
///     the vertical overlap of both neighbors. Pairs that share no height
///     produce nothing.
pub fn detect_gaps(row_boxes: &[BBox], gap_factor: f64, min_abs_gap: f64) -> Vec<BBox> {
    if row_boxes.len() < 2 {
        return vec![];
    }

    let mut sorted = row_boxes.to_vec();
    sorted.sort_by(|a, b| a.cx().total_cmp(&b.cx()));

    let width = representative_width(&sorted);
    if width <= 0.0 {
        return vec![];
    }

    let threshold = min_abs_gap.max(gap_factor * width);

    sorted
        .windows(2)
        .filter_map(|pair| {
            let (a, b) = (&pair[0], &pair[1]);

            if b.left() - a.right() < threshold {
                return None;
            }

            let y1 = a.top().max(b.top());
            let y2 = a.bottom().min(b.bottom());

            if y2 > y1 {
                Some(BBox::ltrb(a.right(), y1, b.left(), y2))
            } else {
                None
            }
        })
        .collect()
}

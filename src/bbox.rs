use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Boxes of every image of a dataset, keyed by image file name.
///
/// Used for detections, predicted gaps and ground truth alike. Keys iterate
/// in sorted order, box order inside an image is kept as given.
pub type ImageBoxMap = BTreeMap<String, Vec<BBox>>;

/// Axis-aligned box in pixel corner coordinates `(x1, y1, x2, y2)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BBox([f64; 4]);

impl BBox {
    #[inline]
    pub fn ltrb(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        BBox([x1, y1, x2, y2])
    }

    #[inline]
    pub fn to_array(&self) -> [f64; 4] {
        self.0
    }

    #[inline(always)]
    pub fn left(&self) -> f64 {
        self.0[0]
    }

    #[inline(always)]
    pub fn top(&self) -> f64 {
        self.0[1]
    }

    #[inline(always)]
    pub fn right(&self) -> f64 {
        self.0[2]
    }

    #[inline(always)]
    pub fn bottom(&self) -> f64 {
        self.0[3]
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.right() - self.left()
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.bottom() - self.top()
    }

    /// Area with negative extents clamped to zero.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    /// Horizontal center `(x1 + x2) / 2`.
    #[inline]
    pub fn cx(&self) -> f64 {
        (self.left() + self.right()) / 2.0
    }

    /// Vertical center `(y1 + y2) / 2`.
    #[inline]
    pub fn cy(&self) -> f64 {
        (self.top() + self.bottom()) / 2.0
    }

    /// Returns true if the box is finite and has positive width and height.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
            && self.width() > 0.0
            && self.height() > 0.0
    }
}

impl From<[f64; 4]> for BBox {
    #[inline]
    fn from(v: [f64; 4]) -> Self {
        Self(v)
    }
}

// On the wire a box is a plain `[x1, y1, x2, y2]` array.
impl Serialize for BBox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BBox {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <[f64; 4]>::deserialize(deserializer).map(Into::into)
    }
}

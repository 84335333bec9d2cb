//!
//! # Rectangular Bounding Boxes and Associated Trait
//!

// Crates.io
use serde::{Deserialize, Serialize};

// Local imports
use crate::geom::{Int, Path, Point, Polygon, Rect, Shape};

/// # Rectangular Bounding Box
///
/// Points `p0` and `p1` represent opposite corners of a bounding rectangle.
/// `p0` is always closest to negative-infinity, in both x and y,
/// and `p1` is always closest to positive-infinity.
///
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct BoundBox {
    pub p0: Point,
    pub p1: Point,
}
impl BoundBox {
    /// Create a new [BoundBox] from two [Point]s.
    /// Callers are responsible for ensuring that p0.x <= p1.x, and p0.y <= p1.y.
    fn new(p0: Point, p1: Point) -> Self {
        Self { p0, p1 }
    }
    /// Create a new [BoundBox] from a single [Point].
    /// The resultant [BoundBox] comprises solely the point, having zero area.
    pub fn from_point(pt: Point) -> Self {
        Self { p0: pt, p1: pt }
    }
    /// Create a new [BoundBox] from two points
    pub fn from_points(p0: Point, p1: Point) -> Self {
        Self {
            p0: Point::new(p0.x.min(p1.x), p0.y.min(p1.y)),
            p1: Point::new(p0.x.max(p1.x), p0.y.max(p1.y)),
        }
    }
    /// Create an empty, otherwise invalid [BoundBox]
    pub fn empty() -> Self {
        Self {
            p0: Point::new(Int::MAX, Int::MAX),
            p1: Point::new(Int::MIN, Int::MIN),
        }
    }
    /// Boolean indication of whether a box is empty
    pub fn is_empty(&self) -> bool {
        self.p0.x > self.p1.x || self.p0.y > self.p1.y
    }
    /// Boolean indication of whether [Point] `pt` lies inside out box.
    pub fn contains(&self, pt: &Point) -> bool {
        self.p0.x <= pt.x && self.p1.x >= pt.x && self.p0.y <= pt.y && self.p1.y >= pt.y
    }
    /// Boolean indication of whether `other` lies entirely inside our box
    pub fn encloses(&self, other: &BoundBox) -> bool {
        self.contains(&other.p0) && self.contains(&other.p1)
    }
    /// Boolean indication of whether our interior overlaps that of `other`.
    /// Boxes which merely share an edge do not overlap.
    pub fn overlaps(&self, other: &BoundBox) -> bool {
        self.p0.x < other.p1.x
            && other.p0.x < self.p1.x
            && self.p0.y < other.p1.y
            && other.p0.y < self.p1.y
    }
    /// Expand an existing [BoundBox] in all directions by `delta`.
    /// Negative values of `delta` shrink the box, possibly rendering it empty.
    pub fn expand(&mut self, delta: Int) {
        if self.is_empty() {
            return;
        }
        self.p0.x -= delta;
        self.p0.y -= delta;
        self.p1.x += delta;
        self.p1.y += delta;
    }
    /// Create a copy expanded by `delta`
    pub fn expanded(&self, delta: Int) -> Self {
        let mut b = *self;
        b.expand(delta);
        b
    }
    /// Get the box's size as an (x,y) tuple
    pub fn size(&self) -> (Int, Int) {
        (self.p1.x - self.p0.x, self.p1.y - self.p0.y)
    }
    pub fn width(&self) -> Int {
        self.p1.x - self.p0.x
    }
    pub fn height(&self) -> Int {
        self.p1.y - self.p0.y
    }
    /// Center point, rounded toward negative infinity
    pub fn center(&self) -> Point {
        Point::new(
            (self.p0.x + self.p1.x).div_euclid(2),
            (self.p0.y + self.p1.y).div_euclid(2),
        )
    }
    /// Convert to a [Rect]
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.p0, self.p1)
    }
}
impl Default for BoundBox {
    fn default() -> Self {
        Self::empty()
    }
}

///
/// # Bounding Box Trait
///
/// Methods for interacting with [BoundBox]s.
/// Implementations for [Point]s, [Shape]s, and [BoundBox]s
/// enable geometric transformations such as union and intersection.
///
pub trait BoundBoxTrait {
    /// Compute a rectangular bounding box around the implementing type.
    fn bbox(&self) -> BoundBox;
    /// Compute the intersection with rectangular bounding box `bbox`.
    /// Creates and returns a new [BoundBox].
    fn intersection(&self, bbox: &BoundBox) -> BoundBox {
        let sbox = self.bbox();
        let pmin = Point::new(sbox.p0.x.max(bbox.p0.x), sbox.p0.y.max(bbox.p0.y));
        let pmax = Point::new(sbox.p1.x.min(bbox.p1.x), sbox.p1.y.min(bbox.p1.y));
        if pmin.x > pmax.x || pmin.y > pmax.y {
            return BoundBox::empty();
        }
        BoundBox::new(pmin, pmax)
    }
    /// Compute the union with rectangular bounding box `bbox`.
    /// Creates and returns a new [BoundBox].
    fn union(&self, bbox: &BoundBox) -> BoundBox {
        let sbox = self.bbox();
        if sbox.is_empty() {
            return *bbox;
        }
        if bbox.is_empty() {
            return sbox;
        }
        BoundBox::new(
            Point::new(sbox.p0.x.min(bbox.p0.x), sbox.p0.y.min(bbox.p0.y)),
            Point::new(sbox.p1.x.max(bbox.p1.x), sbox.p1.y.max(bbox.p1.y)),
        )
    }
}

impl BoundBoxTrait for BoundBox {
    fn bbox(&self) -> BoundBox {
        *self
    }
}
impl BoundBoxTrait for Point {
    fn bbox(&self) -> BoundBox {
        BoundBox::from_point(*self)
    }
}
impl BoundBoxTrait for Vec<Point> {
    fn bbox(&self) -> BoundBox {
        self.iter()
            .fold(BoundBox::empty(), |bbox, pt| pt.union(&bbox))
    }
}
impl BoundBoxTrait for Rect {
    fn bbox(&self) -> BoundBox {
        BoundBox::from_points(self.p0, self.p1)
    }
}
impl BoundBoxTrait for Polygon {
    fn bbox(&self) -> BoundBox {
        self.points.bbox()
    }
}
impl BoundBoxTrait for Path {
    fn bbox(&self) -> BoundBox {
        self.points.bbox().expanded(self.width / 2)
    }
}
impl BoundBoxTrait for Shape {
    fn bbox(&self) -> BoundBox {
        match self {
            Shape::Rect(r) => r.bbox(),
            Shape::Polygon(p) => p.bbox(),
            Shape::Path(p) => p.bbox(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_with_empty() {
        let r = Rect::new(Point::new(0, 0), Point::new(5, 3));
        let b = r.union(&BoundBox::empty());
        assert_eq!(b.size(), (5, 3));
        assert!(BoundBox::empty().union(&BoundBox::empty()).is_empty());
    }
    #[test]
    fn test_overlaps() {
        let a = BoundBox::from_points(Point::new(0, 0), Point::new(10, 10));
        let b = BoundBox::from_points(Point::new(10, 0), Point::new(20, 10));
        let c = BoundBox::from_points(Point::new(9, 9), Point::new(20, 20));
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(a.expanded(1).overlaps(&b));
        assert!(a.expanded(-6).is_empty());
    }
}

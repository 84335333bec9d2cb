//!
//! # Translation & Alignment
//!
//! Move instances by their bounding boxes: set an edge or the center to a coordinate,
//! or shift along an axis.
//!

use crate::{BoundBoxTrait, Int, Point, Rect};

pub trait Translate {
    fn translate(&mut self, v: Point);
}

impl Translate for Point {
    fn translate(&mut self, v: Point) {
        self.x += v.x;
        self.y += v.y;
    }
}

impl Translate for Rect {
    fn translate(&mut self, v: Point) {
        self.p0.translate(v);
        self.p1.translate(v);
    }
}

pub trait AlignRect: Translate + BoundBoxTrait {
    /// Move so that our left edge sits at `x`
    fn set_xmin(&mut self, x: Int) -> &mut Self {
        let b = self.bbox();
        if !b.is_empty() {
            self.translate(Point::new(x - b.p0.x, 0));
        }
        self
    }
    /// Move so that our right edge sits at `x`
    fn set_xmax(&mut self, x: Int) -> &mut Self {
        let b = self.bbox();
        if !b.is_empty() {
            self.translate(Point::new(x - b.p1.x, 0));
        }
        self
    }
    /// Move so that our bottom edge sits at `y`
    fn set_ymin(&mut self, y: Int) -> &mut Self {
        let b = self.bbox();
        if !b.is_empty() {
            self.translate(Point::new(0, y - b.p0.y));
        }
        self
    }
    /// Move so that our bounding-box center sits at `pt`
    fn set_center(&mut self, pt: Point) -> &mut Self {
        let b = self.bbox();
        if !b.is_empty() {
            self.translate(pt - b.center());
        }
        self
    }
    fn movex(&mut self, dx: Int) -> &mut Self {
        self.translate(Point::new(dx, 0));
        self
    }
    fn movey(&mut self, dy: Int) -> &mut Self {
        self.translate(Point::new(0, dy));
        self
    }
}

impl<T: Translate + BoundBoxTrait> AlignRect for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_rect() {
        let mut r = Rect::new(Point::new(0, 0), Point::new(10, 4));
        r.set_xmin(105).movey(110);
        assert_eq!(r.p0, Point::new(105, 110));
        r.set_xmax(0).set_ymin(-2);
        assert_eq!(r, Rect::new(Point::new(-10, -2), Point::new(0, 2)));
        r.set_center(Point::new(-7, 3));
        assert_eq!(r, Rect::new(Point::new(-12, 1), Point::new(-2, 5)));
        r.movex(-3);
        assert_eq!(r.center(), Point::new(-10, 3));
    }
}

//!
//! # Geometry Module
//!
//! Defines the core geometric types including [Point], [Shape], [Angle], and [Placement],
//! and their core operations.
//!
//! All coordinates are integer database units, one nanometer each.
//! Cell parameters arrive in microns, and are snapped to the database grid by [um].
//!

// Crates.io
use derive_more::{Add, AddAssign, Neg, Sub, SubAssign};
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

// Local imports
use crate::bbox::BoundBoxTrait;
use crate::error::{LayoutError, LayoutResult};

/// # Location Integer Type-Alias
///
/// Used for all layout spatial coordinates.
///
pub type Int = isize;

/// Database units per micron
pub const DBU_PER_UM: Int = 1000;

/// Convert a micron-valued length to the nearest database unit
pub fn um(x: f64) -> Int {
    (x * DBU_PER_UM as f64).round() as Int
}
/// Convert a database-unit length to microns
pub fn to_um(x: Int) -> f64 {
    x as f64 / DBU_PER_UM as f64
}

/// # Point in two-dimensional layout-space
#[derive(
    Debug,
    Copy,
    Clone,
    Default,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Add,
    Sub,
    AddAssign,
    SubAssign,
    Neg,
)]
pub struct Point {
    pub x: Int,
    pub y: Int,
}
impl Point {
    /// Create a new [Point] from (x,y) coordinates
    pub fn new(x: Int, y: Int) -> Self {
        Self { x, y }
    }
    /// Create a new [Point] from micron-valued (x,y) coordinates
    pub fn um(x: f64, y: f64) -> Self {
        Self::new(um(x), um(y))
    }
    /// The origin
    pub fn zero() -> Self {
        Self::default()
    }
    /// Create a new [Point] which serves as an offset in direction `dir`
    pub fn offset(val: Int, dir: Dir) -> Self {
        match dir {
            Dir::Horiz => Self { x: val, y: 0 },
            Dir::Vert => Self { x: 0, y: val },
        }
    }
    /// Create a new point shifted by `x` in the x-dimension and by `y` in the y-dimension
    pub fn shift(&self, p: &Point) -> Point {
        Point {
            x: p.x + self.x,
            y: p.y + self.y,
        }
    }
    /// Get the coordinate associated with direction `dir`
    pub fn coord(&self, dir: Dir) -> Int {
        match dir {
            Dir::Horiz => self.x,
            Dir::Vert => self.y,
        }
    }
    /// Rotate counter-clockwise about the origin by `angle`
    pub fn rotate(&self, angle: Angle) -> Point {
        match angle {
            Angle::R0 => *self,
            Angle::R90 => Point::new(-self.y, self.x),
            Angle::R180 => Point::new(-self.x, -self.y),
            Angle::R270 => Point::new(self.y, -self.x),
        }
    }
    /// Reflect about the x-axis
    pub fn reflect_vert(&self) -> Point {
        Point::new(self.x, -self.y)
    }
    /// Create a new [Point], transformed from our original location by `place`
    pub fn transform(&self, place: &Placement) -> Point {
        place.apply(self)
    }
    /// Manhattan distance to `other`
    pub fn manhattan(&self, other: &Point) -> Int {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}
impl From<(Int, Int)> for Point {
    fn from(xy: (Int, Int)) -> Self {
        Self::new(xy.0, xy.1)
    }
}

/// Direction Enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Dir {
    Horiz,
    Vert,
}
impl Dir {
    /// Whichever direction we are, return the other one.
    pub fn other(self) -> Self {
        match self {
            Self::Horiz => Self::Vert,
            Self::Vert => Self::Horiz,
        }
    }
}
impl std::ops::Not for Dir {
    type Output = Self;
    /// Exclamation Operator returns the opposite direction
    fn not(self) -> Self::Output {
        self.other()
    }
}

///
/// # Manhattan Angle
///
/// Port orientations and instance rotations, in degrees counter-clockwise from the +x axis.
/// Restricted to multiples of 90 degrees, which keeps every transform exact on the integer grid.
///
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub enum Angle {
    #[default]
    R0,
    R90,
    R180,
    R270,
}
impl Angle {
    /// Create from integer degrees. Fails for non-multiples of 90.
    pub fn from_degrees(deg: i32) -> LayoutResult<Self> {
        match deg.rem_euclid(360) {
            0 => Ok(Self::R0),
            90 => Ok(Self::R90),
            180 => Ok(Self::R180),
            270 => Ok(Self::R270),
            _ => LayoutError::invalid(format!("Non-Manhattan angle {}", deg)),
        }
    }
    /// Create from a count of quarter-turns
    pub fn from_quarters(n: i32) -> Self {
        match n.rem_euclid(4) {
            0 => Self::R0,
            1 => Self::R90,
            2 => Self::R180,
            _ => Self::R270,
        }
    }
    /// Number of counter-clockwise quarter-turns, in [0, 3]
    pub fn quarters(&self) -> i32 {
        match self {
            Self::R0 => 0,
            Self::R90 => 1,
            Self::R180 => 2,
            Self::R270 => 3,
        }
    }
    /// Angle in degrees, in [0, 360)
    pub fn degrees(&self) -> i32 {
        90 * self.quarters()
    }
    /// The angle pointing the opposite way
    pub fn opposite(&self) -> Self {
        *self + Self::R180
    }
    /// The angle mirrored about the x-axis
    pub fn reflect_vert(&self) -> Self {
        Self::from_quarters(-self.quarters())
    }
    /// Unit vector in our direction, scaled by `len`
    pub fn unit(&self, len: Int) -> Point {
        Point::new(len, 0).rotate(*self)
    }
    /// The axis along which we point
    pub fn dir(&self) -> Dir {
        match self {
            Self::R0 | Self::R180 => Dir::Horiz,
            Self::R90 | Self::R270 => Dir::Vert,
        }
    }
}
impl std::ops::Add for Angle {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::from_quarters(self.quarters() + rhs.quarters())
    }
}
impl std::ops::Sub for Angle {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::from_quarters(self.quarters() - rhs.quarters())
    }
}

///
/// # Placement
///
/// Location, reflection, and rotation of an instance.
/// Applied in the order: reflect about the x-axis, rotate, then translate to `loc`.
///
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Rotation, applied *after* reflection
    pub angle: Angle,
    /// Vertical reflection, applied *before* rotation
    pub reflect_vert: bool,
    /// Location of the instance's origin
    pub loc: Point,
}
impl Placement {
    /// The identity placement, at the origin
    pub fn identity() -> Self {
        Self::default()
    }
    /// Un-rotated placement at `loc`
    pub fn at(loc: Point) -> Self {
        Self {
            loc,
            ..Default::default()
        }
    }
    /// Apply to [Point] `pt`
    pub fn apply(&self, pt: &Point) -> Point {
        let pt = if self.reflect_vert {
            pt.reflect_vert()
        } else {
            *pt
        };
        pt.rotate(self.angle) + self.loc
    }
    /// Apply to [Angle] `angle`
    pub fn apply_angle(&self, angle: Angle) -> Angle {
        let angle = if self.reflect_vert {
            angle.reflect_vert()
        } else {
            angle
        };
        angle + self.angle
    }
    /// Create a new placement moved by `by`
    pub fn translated(&self, by: Point) -> Self {
        Self {
            loc: self.loc + by,
            ..*self
        }
    }
    /// Create a new [Placement] that is the cascade of `parent` and `child`.
    ///
    /// "Parents" and "children" refer to typical layout-instance hierarchies,
    /// in which each layer of instance has a nested placement relative to its top-level parent.
    /// Note this operation *is not* commutative.
    ///
    pub fn cascade(parent: &Placement, child: &Placement) -> Placement {
        // Reflection conjugates rotation: reflecting after rotating by `a` equals rotating by `-a` after reflecting.
        let angle = if parent.reflect_vert {
            parent.angle - child.angle
        } else {
            parent.angle + child.angle
        };
        Placement {
            angle,
            reflect_vert: parent.reflect_vert ^ child.reflect_vert,
            loc: parent.apply(&child.loc),
        }
    }
    /// Create the [Placement] which lands local point `pt`, facing `facing`,
    /// on `target` and facing `target_facing`.
    pub fn landing(
        pt: &Point,
        facing: Angle,
        reflect_vert: bool,
        target: &Point,
        target_facing: Angle,
    ) -> Self {
        let (pt, facing) = if reflect_vert {
            (pt.reflect_vert(), facing.reflect_vert())
        } else {
            (*pt, facing)
        };
        let angle = target_facing - facing;
        Self {
            angle,
            reflect_vert,
            loc: *target - pt.rotate(angle),
        }
    }
}

/// # Path
///
/// Open-ended geometric path with non-zero width.
/// Primarily consists of a series of ordered [Point]s.
///
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Path {
    pub width: Int,
    pub points: Vec<Point>,
}
impl Path {
    /// Center-line length. Exact for Manhattan paths.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| {
                let (dx, dy) = ((w[1].x - w[0].x) as f64, (w[1].y - w[0].y) as f64);
                dx.hypot(dy)
            })
            .sum()
    }
}
/// # Polygon
///
/// Closed n-sided polygon with arbitrary number of vertices.
/// Closure from the last point back to the first is implied.
///
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Polygon {
    pub points: Vec<Point>,
}
/// # Rectangle
///
/// Axis-aligned rectangle, specified by two opposite corners.
///
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub p0: Point,
    pub p1: Point,
}
impl Rect {
    /// Create a new [Rect] from two opposite corners, in any order
    pub fn new(p0: Point, p1: Point) -> Self {
        Self {
            p0: Point::new(p0.x.min(p1.x), p0.y.min(p1.y)),
            p1: Point::new(p0.x.max(p1.x), p0.y.max(p1.y)),
        }
    }
    /// Create a [Rect] of size (`w`, `h`) centered on `center`
    pub fn centered(center: Point, w: Int, h: Int) -> Self {
        Self::new(
            Point::new(center.x - w / 2, center.y - h / 2),
            Point::new(center.x - w / 2 + w, center.y - h / 2 + h),
        )
    }
    /// Calculate our center-point
    pub fn center(&self) -> Point {
        Point::new((self.p0.x + self.p1.x) / 2, (self.p0.y + self.p1.y) / 2)
    }
    pub fn width(&self) -> Int {
        (self.p1.x - self.p0.x).abs()
    }
    pub fn height(&self) -> Int {
        (self.p1.y - self.p0.y).abs()
    }
    /// Area, in square database units
    pub fn area(&self) -> Int {
        self.width() * self.height()
    }
}

/// # Shape
///
/// The primary geometric primitive comprising raw layout.
/// Variants include [Rect], [Polygon], and [Path].
/// Serialized internally tagged, as a `kind` field alongside the variant's own,
/// which keeps each shape a single TOML table.
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind")]
#[enum_dispatch(ShapeTrait)]
pub enum Shape {
    Rect(Rect),
    Polygon(Polygon),
    Path(Path),
}
impl Default for Shape {
    fn default() -> Self {
        Self::Rect(Rect::default())
    }
}

/// # ShapeTrait
///
/// Common shape operations, dispatched from the [Shape] enum to its variants by [enum_dispatch].
///
#[enum_dispatch]
pub trait ShapeTrait {
    /// Retrieve our "origin", or first [Point]
    fn point0(&self) -> Point;
    /// Shift coordinates by the (x,y) values specified in `pt`
    fn shift(&mut self, pt: &Point);
    /// Boolean indication of whether the [Shape] contains [Point] `pt`.
    /// Containment is *inclusive* for all [Shape] types.
    fn contains(&self, pt: &Point) -> bool;
}

impl ShapeTrait for Rect {
    fn point0(&self) -> Point {
        self.p0
    }
    fn shift(&mut self, pt: &Point) {
        self.p0 += *pt;
        self.p1 += *pt;
    }
    fn contains(&self, pt: &Point) -> bool {
        let (p0, p1) = (&self.p0, &self.p1);
        p0.x.min(p1.x) <= pt.x
            && p0.x.max(p1.x) >= pt.x
            && p0.y.min(p1.y) <= pt.y
            && p0.y.max(p1.y) >= pt.y
    }
}
impl ShapeTrait for Polygon {
    fn point0(&self) -> Point {
        self.points.first().copied().unwrap_or_default()
    }
    fn shift(&mut self, pt: &Point) {
        for p in self.points.iter_mut() {
            *p += *pt;
        }
    }
    fn contains(&self, pt: &Point) -> bool {
        // Fast way out: outside the bounding box
        if self.points.is_empty() || !self.points.bbox().contains(pt) {
            return false;
        }
        // Winding-number test against the semi-infinite horizontal line at `y=pt.y`
        let mut winding_num: isize = 0;
        for idx in 0..self.points.len() {
            let (past, next) = (
                &self.points[idx],
                &self.points[(idx + 1) % self.points.len()],
            );
            if past.y.min(next.y) <= pt.y && past.y.max(next.y) >= pt.y {
                if next.y == past.y {
                    // Horizontal segment at our y-level. A hit if x is in range.
                    if past.x.min(next.x) <= pt.x && past.x.max(next.x) >= pt.x {
                        return true;
                    }
                } else {
                    let xsolve = (next.x - past.x) * (pt.y - past.y) / (next.y - past.y) + past.x;
                    if xsolve == pt.x {
                        return true;
                    } else if xsolve > pt.x {
                        if next.y > past.y {
                            winding_num += 1;
                        } else {
                            winding_num -= 1;
                        }
                    }
                }
            }
        }
        winding_num != 0
    }
}
impl ShapeTrait for Path {
    fn point0(&self) -> Point {
        self.points.first().copied().unwrap_or_default()
    }
    fn shift(&mut self, pt: &Point) {
        for p in self.points.iter_mut() {
            *p += *pt;
        }
    }
    fn contains(&self, pt: &Point) -> bool {
        // Break into segments, and check each. Only Manhattan segments are considered.
        let half = self.width / 2;
        for seg in self.points.windows(2) {
            let (a, b) = (seg[0], seg[1]);
            let rect = if a.x == b.x {
                Rect::new(Point::new(a.x - half, a.y), Point::new(a.x + half, b.y))
            } else if a.y == b.y {
                Rect::new(Point::new(a.x, a.y - half), Point::new(b.x, a.y + half))
            } else {
                continue;
            };
            if rect.contains(pt) {
                return true;
            }
        }
        false
    }
}

pub trait TransformTrait {
    /// Apply [Placement] `place`.
    /// Creates a new shape at a location equal to the transformation of our own.
    fn transform(&self, place: &Placement) -> Self;
}
impl TransformTrait for Shape {
    fn transform(&self, place: &Placement) -> Self {
        match self {
            Shape::Rect(r) => Shape::Rect(r.transform(place)),
            Shape::Polygon(p) => Shape::Polygon(p.transform(place)),
            Shape::Path(p) => Shape::Path(p.transform(place)),
        }
    }
}
impl TransformTrait for Rect {
    fn transform(&self, place: &Placement) -> Self {
        // Manhattan placements keep rectangles axis-aligned
        Rect::new(place.apply(&self.p0), place.apply(&self.p1))
    }
}
impl TransformTrait for Polygon {
    fn transform(&self, place: &Placement) -> Self {
        Polygon {
            points: self.points.iter().map(|p| place.apply(p)).collect(),
        }
    }
}
impl TransformTrait for Path {
    fn transform(&self, place: &Placement) -> Self {
        Path {
            width: self.width,
            points: self.points.iter().map(|p| place.apply(p)).collect(),
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn transform_identity() {
        let shape1 = Shape::Rect(Rect::new(Point::new(0, 0), Point::new(1, 1)));
        let shape2 = shape1.transform(&Placement::identity());
        assert_eq!(shape2, shape1);
    }
    #[test]
    fn transform_rotate() {
        let p = Point::new(1, 0);
        let place = Placement {
            angle: Angle::R90,
            ..Default::default()
        };
        let p1 = p.transform(&place);
        assert_eq!(p1, Point::new(0, 1));
        let p2 = p1.transform(&place);
        assert_eq!(p2, Point::new(-1, 0));
        let p3 = p2.transform(&place);
        assert_eq!(p3, Point::new(0, -1));
        assert_eq!(p3.transform(&place), p);
    }
    #[test]
    fn test_cascade() {
        let refl = Placement {
            reflect_vert: true,
            ..Default::default()
        };
        let shift = Placement::at(Point::new(1, 1));

        let p = Point::new(1, 1);
        let cascade1 = Placement::cascade(&refl, &shift);
        assert_eq!(p.transform(&cascade1), Point::new(2, -2));
        let cascade2 = Placement::cascade(&shift, &refl);
        assert_eq!(p.transform(&cascade2), Point::new(2, 0));
    }
    #[test]
    fn test_cascade_matches_nesting() {
        // Cascading must agree with applying child-then-parent for every combination
        let pt = Point::new(3, 7);
        for pa in 0..4 {
            for ca in 0..4 {
                for (pr, cr) in [(false, false), (true, false), (false, true), (true, true)] {
                    let parent = Placement {
                        angle: Angle::from_quarters(pa),
                        reflect_vert: pr,
                        loc: Point::new(10, -4),
                    };
                    let child = Placement {
                        angle: Angle::from_quarters(ca),
                        reflect_vert: cr,
                        loc: Point::new(-2, 5),
                    };
                    let nested = parent.apply(&child.apply(&pt));
                    let cascaded = Placement::cascade(&parent, &child).apply(&pt);
                    assert_eq!(nested, cascaded);
                    let nested_angle = parent.apply_angle(child.apply_angle(Angle::R90));
                    let cascaded_angle = Placement::cascade(&parent, &child).apply_angle(Angle::R90);
                    assert_eq!(nested_angle, cascaded_angle);
                }
            }
        }
    }
    #[test]
    fn test_landing() {
        // A port at (10, 0) facing east, landed on (0, 5) facing north
        let place = Placement::landing(
            &Point::new(10, 0),
            Angle::R0,
            false,
            &Point::new(0, 5),
            Angle::R90,
        );
        assert_eq!(place.apply(&Point::new(10, 0)), Point::new(0, 5));
        assert_eq!(place.apply_angle(Angle::R0), Angle::R90);
    }
    #[test]
    fn test_angles() -> LayoutResult<()> {
        assert_eq!(Angle::from_degrees(-90)?, Angle::R270);
        assert_eq!(Angle::from_degrees(450)?, Angle::R90);
        assert!(Angle::from_degrees(45).is_err());
        assert_eq!(Angle::R90.opposite(), Angle::R270);
        assert_eq!(Angle::R90.reflect_vert(), Angle::R270);
        assert_eq!(Angle::R180.unit(3), Point::new(-3, 0));
        Ok(())
    }
    #[test]
    fn test_um() {
        assert_eq!(um(0.125), 125);
        assert_eq!(um(0.1 + 0.05), 150);
        assert_eq!(to_um(2500), 2.5);
    }
    #[test]
    fn test_polygon_contains() {
        let triangle = Polygon {
            points: vec![Point::new(0, 0), Point::new(2, 0), Point::new(0, 2)],
        };
        assert!(triangle.contains(&Point::new(0, 0)));
        assert!(triangle.contains(&Point::new(1, 1)));
        assert!(!triangle.contains(&Point::new(2, 2)));

        let u = Polygon {
            points: vec![
                Point::new(0, 0),
                Point::new(0, 10),
                Point::new(2, 10),
                Point::new(2, 2),
                Point::new(8, 2),
                Point::new(8, 10),
                Point::new(10, 10),
                Point::new(10, 0),
            ],
        };
        assert!(u.contains(&Point::new(1, 9)));
        assert!(u.contains(&Point::new(9, 1)));
        assert!(!u.contains(&Point::new(3, 3)));
        assert!(!u.contains(&Point::new(7, 9)));
    }
    #[test]
    fn test_path_length() {
        let path = Path {
            width: 500,
            points: vec![Point::new(0, 0), Point::new(100, 0), Point::new(100, -40)],
        };
        assert_eq!(path.length(), 140.0);
        assert!(path.contains(&Point::new(50, 200)));
        assert!(!path.contains(&Point::new(50, 300)));
    }
}

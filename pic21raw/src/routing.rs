//!
//! # Routing
//!
//! Bundle routing between two ordered lists of ports.
//!
//! Each pair is joined by a Manhattan path which never doubles back on itself.
//! Ports facing one another along a shared axis are joined by a straight,
//! and anti-parallel ports offset sideways by a Z with its jog at the midpoint.
//! Everything else leaves each port by one bend radius, and is searched for over a grid of channels
//! running alongside the obstacles, trading off length against the number of bends.
//! No collision-avoidance is attempted between the routes of a bundle.
//!

// Crates.io
use log::{debug, warn};
use pathfinding::prelude::dijkstra;
use serde::{Deserialize, Serialize};

// Local Imports
use crate::bbox::{BoundBox, BoundBoxTrait};
use crate::component::Component;
use crate::ctx::Ctx;
use crate::error::{LayoutError, LayoutResult};
use crate::geom::{to_um, um, Angle, Int, Point};
use crate::layers::{CrossSection, LayerSpec};
use crate::port::Port;
use crate::prims::euler_length;

/// # Route
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Route {
    /// Center-line vertices, from the first port to the second
    pub points: Vec<Point>,
    pub width: Int,
    pub layer: LayerSpec,
    /// Number of bends, one per interior vertex
    pub bends: usize,
    /// Center-line length in microns, with each corner replaced by an Euler bend
    pub length: f64,
}

/// # Bundle Routing Options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BundleOptions {
    pub cross_section: String,
    /// Bend radius in microns. Defaults to that of `cross_section`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    /// Sort each port list along its side before pairing
    pub sort_ports: bool,
    /// Euler fraction of the bends
    pub p: f64,
}
impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            cross_section: "strip".into(),
            radius: None,
            sort_ports: false,
            p: 0.5,
        }
    }
}

///
/// Route `ports1[i]` to `ports2[i]` for each `i`, adding each route's path to `comp`.
///
/// Routes keep clear of the instances and arrays already in `comp`.
/// With `sort_ports`, each list is first sorted along the side its first port faces out of:
/// by y for east or west-facing ports, by x for north or south-facing.
///
pub fn route_bundle(
    ctx: &Ctx,
    comp: &mut Component,
    ports1: &[Port],
    ports2: &[Port],
    opts: &BundleOptions,
) -> LayoutResult<Vec<Route>> {
    if ports1.len() != ports2.len() {
        return LayoutError::invalid(format!(
            "Cannot route {} ports to {}",
            ports1.len(),
            ports2.len()
        ));
    }
    let xs = ctx.cross_section(&opts.cross_section)?;
    let radius = match opts.radius {
        Some(r) if r > 0.0 => um(r),
        Some(r) => return LayoutError::invalid(format!("Bend radius must be positive, got {}", r)),
        None => xs.radius,
    };
    let (mut ports1, mut ports2) = (ports1.to_vec(), ports2.to_vec());
    if opts.sort_ports {
        sort_ports(&mut ports1);
        sort_ports(&mut ports2);
    }
    let obstacles: Vec<BoundBox> = comp
        .insts
        .iter()
        .map(|i| i.bbox())
        .chain(comp.arrays.iter().map(|a| a.bbox()))
        .filter(|b| !b.is_empty())
        .collect();
    let mut routes = Vec::with_capacity(ports1.len());
    for (a, b) in ports1.iter().zip(ports2.iter()) {
        for p in [a, b] {
            if p.width != xs.width || p.layer != xs.layer {
                warn!(
                    "Port `{}` ({} wide on {}) differs from cross-section `{}`",
                    p.name, p.width, p.layer, xs.name
                );
            }
        }
        let route = route_single(a, b, radius, opts.p, xs, &obstacles)?;
        debug!(
            "Routed `{}` to `{}`: {} bends, length {:.3}",
            a.name, b.name, route.bends, route.length
        );
        comp.add_path(route.layer, route.width, route.points.clone());
        routes.push(route);
    }
    Ok(routes)
}

/// Sort `ports` along the side the first of them faces out of
fn sort_ports(ports: &mut [Port]) {
    let dir = match ports.first() {
        Some(p) => p.orientation.dir(),
        None => return,
    };
    ports.sort_by_key(|p| p.center.coord(dir.other()));
}

///
/// Route a single pair of ports with cross-section `xs` and bend radius `radius`,
/// keeping clear of the interiors of `obstacles`.
///
/// Fails if no such route exists.
///
pub fn route_single(
    a: &Port,
    b: &Port,
    radius: Int,
    p: f64,
    xs: &CrossSection,
    obstacles: &[BoundBox],
) -> LayoutResult<Route> {
    let points = match direct(a, b, radius, obstacles) {
        Some(points) => points,
        None => search(a, b, radius, obstacles).ok_or_else(|| {
            LayoutError::msg(format!(
                "No route from `{}` at {:?} to `{}` at {:?}",
                a.name, a.center, b.name, b.center
            ))
        })?,
    };
    let points = simplify(points);
    let bends = points.len().saturating_sub(2);
    let straight: Int = points.windows(2).map(|w| w[0].manhattan(&w[1])).sum();
    let length = straight as f64 - (bends as Int * 2 * radius) as f64
        + bends as f64 * euler_length(radius, p);
    Ok(Route {
        points,
        width: xs.width,
        layer: xs.layer,
        bends,
        length: to_um(length.round() as Int),
    })
}

/// Component of `d` along `dir`
fn along(d: Point, dir: Angle) -> Int {
    let u = dir.unit(1);
    d.x * u.x + d.y * u.y
}

/// Component of `d` to the left of `dir`
fn across(d: Point, dir: Angle) -> Int {
    let u = dir.unit(1);
    u.x * d.y - u.y * d.x
}

/// Straight or Z-shaped routes between anti-parallel ports, where those are clear
fn direct(a: &Port, b: &Port, radius: Int, obstacles: &[BoundBox]) -> Option<Vec<Point>> {
    if a.orientation != b.orientation.opposite() {
        return None;
    }
    let (s, e) = (a.center, b.center);
    let d = e - s;
    let (ahead, aside) = (along(d, a.orientation), across(d, a.orientation));
    if aside == 0 && ahead >= 0 {
        return Some(vec![s, e]);
    }
    if ahead < 2 * radius {
        return None;
    }
    let jog = ahead / 2;
    let m1 = s + a.orientation.unit(jog);
    let m2 = m1 + (e - s - a.orientation.unit(ahead));
    let points = vec![s, m1, m2, e];
    match points.windows(2).all(|w| clear(w[0], w[1], obstacles)) {
        true => Some(points),
        false => None,
    }
}

/// Boolean indication of whether the axis-aligned segment `p0`-`p1` stays out of every obstacle's interior.
/// Running along an obstacle's edge is permitted.
fn clear(p0: Point, p1: Point, obstacles: &[BoundBox]) -> bool {
    let (lo, hi) = (
        Point::new(p0.x.min(p1.x), p0.y.min(p1.y)),
        Point::new(p0.x.max(p1.x), p0.y.max(p1.y)),
    );
    !obstacles
        .iter()
        .any(|ob| lo.x < ob.p1.x && hi.x > ob.p0.x && lo.y < ob.p1.y && hi.y > ob.p0.y)
}

/// Search state: a grid vertex and the heading it was reached with, or arrival at the end port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Node {
    At(usize, usize, Angle),
    Done,
}

/// Sorted, de-duplicated coordinates
fn axis(mut vals: Vec<Int>) -> Vec<Int> {
    vals.sort_unstable();
    vals.dedup();
    vals
}

///
/// Least-cost Manhattan route from `a` to `b`, leaving and entering each by a one-radius stub.
///
/// The grid's lines run through both stub ends, halfway between them,
/// and one radius outside each side of each obstacle.
/// Each bend costs as much as four radii of length. Reversals are never taken.
///
fn search(a: &Port, b: &Port, radius: Int, obstacles: &[BoundBox]) -> Option<Vec<Point>> {
    let (s, e) = (a.center, b.center);
    let p0 = s + a.orientation.unit(radius);
    let p1 = e + b.orientation.unit(radius);
    if !clear(s, p0, obstacles) || !clear(p1, e, obstacles) {
        return None;
    }
    let mut xv = vec![p0.x, p1.x, (p0.x + p1.x).div_euclid(2)];
    let mut yv = vec![p0.y, p1.y, (p0.y + p1.y).div_euclid(2)];
    for ob in obstacles {
        xv.extend([ob.p0.x - radius, ob.p1.x + radius]);
        yv.extend([ob.p0.y - radius, ob.p1.y + radius]);
    }
    let (xv, yv) = (axis(xv), axis(yv));
    let index = |pt: Point| Some((xv.binary_search(&pt.x).ok()?, yv.binary_search(&pt.y).ok()?));
    let (start, goal) = (index(p0)?, index(p1)?);
    let arrive = b.orientation.opposite();
    let bend_cost = 4 * radius.max(1);
    let turn = |from: Angle, to: Angle| if from == to { 0 } else { bend_cost };

    let successors = |node: &Node| -> Vec<(Node, Int)> {
        let (i, j, heading) = match *node {
            Node::At(i, j, h) => (i, j, h),
            Node::Done => return Vec::new(),
        };
        let mut next = Vec::with_capacity(5);
        if (i, j) == goal && heading != b.orientation {
            next.push((Node::Done, turn(heading, arrive)));
        }
        let here = Point::new(xv[i], yv[j]);
        for dir in [Angle::R0, Angle::R90, Angle::R180, Angle::R270] {
            if dir == heading.opposite() {
                continue;
            }
            let (ni, nj) = match dir {
                Angle::R0 if i + 1 < xv.len() => (i + 1, j),
                Angle::R180 if i > 0 => (i - 1, j),
                Angle::R90 if j + 1 < yv.len() => (i, j + 1),
                Angle::R270 if j > 0 => (i, j - 1),
                _ => continue,
            };
            let there = Point::new(xv[ni], yv[nj]);
            if clear(here, there, obstacles) {
                let cost = here.manhattan(&there) + turn(heading, dir);
                next.push((Node::At(ni, nj, dir), cost));
            }
        }
        next
    };
    let start = Node::At(start.0, start.1, a.orientation);
    let (nodes, _cost) = dijkstra(&start, successors, |n| *n == Node::Done)?;

    let mut points = vec![s];
    for node in nodes {
        if let Node::At(i, j, _) = node {
            points.push(Point::new(xv[i], yv[j]));
        }
    }
    points.push(e);
    Some(points)
}

/// Remove repeated points, and interior points which continue straight on
fn simplify(points: Vec<Point>) -> Vec<Point> {
    let mut pts: Vec<Point> = Vec::with_capacity(points.len());
    for pt in points {
        if pts.last() != Some(&pt) {
            pts.push(pt);
        }
    }
    let mut out: Vec<Point> = Vec::with_capacity(pts.len());
    for pt in pts {
        if out.len() >= 2 {
            let (a, b) = (out[out.len() - 2], out[out.len() - 1]);
            let (d1, d2) = (b - a, pt - b);
            let collinear = d1.x * d2.y - d1.y * d2.x == 0;
            let onward = d1.x * d2.x + d1.y * d2.y > 0;
            if collinear && onward {
                out.pop();
            }
        }
        out.push(pt);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xs() -> CrossSection {
        CrossSection::new("strip", (1, 0), 0.5, 10.0)
    }
    fn port(name: &str, x: Int, y: Int, orientation: Angle) -> Port {
        Port::optical(name, Point::new(x, y), orientation, &xs())
    }
    /// Check a route never reverses, and stays out of `obstacles`
    fn check_route(r: &Route, obstacles: &[BoundBox]) {
        for w in r.points.windows(2) {
            assert!(clear(w[0], w[1], obstacles), "{:?} crosses an obstacle", w);
        }
        for w in r.points.windows(3) {
            let (d1, d2) = (w[1] - w[0], w[2] - w[1]);
            assert!(d1.x * d2.y - d1.y * d2.x != 0, "{:?} is not a bend", w);
        }
    }

    #[test]
    fn test_straight() -> LayoutResult<()> {
        let a = port("a", 0, 0, Angle::R0);
        let b = port("b", 50_000, 0, Angle::R180);
        let r = route_single(&a, &b, 10_000, 0.5, &xs(), &[])?;
        assert_eq!(r.points, vec![Point::new(0, 0), Point::new(50_000, 0)]);
        assert_eq!(r.bends, 0);
        assert_eq!(r.length, 50.0);
        Ok(())
    }
    #[test]
    fn test_l_route() -> LayoutResult<()> {
        let a = port("a", 0, 0, Angle::R0);
        let b = port("b", 50_000, 40_000, Angle::R270);
        let r = route_single(&a, &b, 10_000, 0.0, &xs(), &[])?;
        assert_eq!(
            r.points,
            vec![Point::new(0, 0), Point::new(50_000, 0), Point::new(50_000, 40_000)]
        );
        assert_eq!(r.bends, 1);
        // Corner replaced by a quarter circle
        let expected = 90.0 - 20.0 + 10.0 * std::f64::consts::FRAC_PI_2;
        approx::assert_abs_diff_eq!(r.length, expected, epsilon = 2e-3);
        Ok(())
    }
    #[test]
    fn test_z_route() -> LayoutResult<()> {
        let a = port("a", 0, 0, Angle::R0);
        let b = port("b", 100_000, 40_000, Angle::R180);
        let r = route_single(&a, &b, 10_000, 0.5, &xs(), &[])?;
        assert_eq!(
            r.points,
            vec![
                Point::new(0, 0),
                Point::new(50_000, 0),
                Point::new(50_000, 40_000),
                Point::new(100_000, 40_000)
            ]
        );
        assert_eq!(r.bends, 2);
        Ok(())
    }
    #[test]
    fn test_u_turn() -> LayoutResult<()> {
        let a = port("a", 0, 0, Angle::R0);
        let b = port("b", 0, 100_000, Angle::R0);
        let r = route_single(&a, &b, 10_000, 0.5, &xs(), &[])?;
        assert_eq!(
            r.points,
            vec![
                Point::new(0, 0),
                Point::new(10_000, 0),
                Point::new(10_000, 100_000),
                Point::new(0, 100_000)
            ]
        );
        assert_eq!(r.bends, 2);
        Ok(())
    }
    #[test]
    fn test_around_blocks() -> LayoutResult<()> {
        // A south-facing port under one block, to a north-facing port atop another block above it
        let lower = BoundBox::from_points(Point::new(0, 0), Point::new(20_000, 20_000));
        let upper = BoundBox::from_points(Point::new(0, 100_000), Point::new(20_000, 120_000));
        let obstacles = [lower, upper];
        let a = port("a", 5_000, 0, Angle::R270);
        let b = port("b", 15_000, 120_000, Angle::R90);
        let r = route_single(&a, &b, 5_000, 0.5, &xs(), &obstacles)?;
        check_route(&r, &obstacles);
        assert_eq!(r.points.first(), Some(&a.center));
        assert_eq!(r.points.last(), Some(&b.center));
        assert_eq!(r.bends, 4);

        // Back-to-back ports can not be joined by a straight through their blocks
        let a = port("a", 20_000, 10_000, Angle::R0);
        let b = port("b", 0, 110_000, Angle::R180);
        let r = route_single(&a, &b, 5_000, 0.5, &xs(), &obstacles)?;
        check_route(&r, &obstacles);
        Ok(())
    }
    #[test]
    fn test_length_matches_geometry() -> LayoutResult<()> {
        let a = port("a", 0, 0, Angle::R90);
        let b = port("b", 60_000, 0, Angle::R90);
        let r = route_single(&a, &b, 10_000, 0.5, &xs(), &[])?;
        check_route(&r, &[]);
        let drawn: Int = r.points.windows(2).map(|w| w[0].manhattan(&w[1])).sum();
        let per_bend = euler_length(10_000, 0.5) - 20_000.0;
        let expected = (drawn as f64 + r.bends as f64 * per_bend) / 1000.0;
        approx::assert_abs_diff_eq!(r.length, expected, epsilon = 1e-3);
        Ok(())
    }
    #[test]
    fn test_no_route() {
        // Start port buried inside an obstacle
        let ob = BoundBox::from_points(Point::new(-50_000, -50_000), Point::new(50_000, 50_000));
        let a = port("a", 0, 0, Angle::R0);
        let b = port("b", 200_000, 200_000, Angle::R180);
        assert!(route_single(&a, &b, 10_000, 0.5, &xs(), &[ob]).is_err());
    }
    #[test]
    fn test_sort_ports() {
        let mut ports = vec![
            port("a", 30, 0, Angle::R90),
            port("b", 10, 0, Angle::R90),
            port("c", 20, 0, Angle::R90),
        ];
        sort_ports(&mut ports);
        let names: Vec<&str> = ports.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
    }
}

//!
//! # Spirals
//!
//! Manhattan double spirals of exact total length, with both ends on the outside.
//!
//! Two interleaved arms wind outward counter-clockwise, each the other rotated a half-turn,
//! and meet in an S-bend at the center. Segment `k` of each arm runs `base + (k / 2) * 2 * spacing`,
//! so every parallel run clears its neighbors by `spacing`.
//! The S-bend adds exactly what it trims from the two innermost segments,
//! so the base length solves directly from the requested total.
//! Any rounding remainder goes to the final segment.
//!

// Std-Lib
use std::sync::Arc;

// Crates.io
use log::debug;
use serde::{Deserialize, Serialize};

// Local Imports
use super::positive;
use crate::component::Component;
use crate::ctx::Ctx;
use crate::error::{LayoutError, LayoutResult};
use crate::geom::{to_um, um, Angle, Int, Point};
use crate::port::Port;

/// # Spiral Parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SpiralParams {
    /// Total center-line length in microns
    pub length: f64,
    pub cross_section: String,
    /// Center-to-center distance between adjacent turns, in microns
    pub spacing: f64,
    /// Maximum number of full loops
    pub n_loops: usize,
}
impl Default for SpiralParams {
    fn default() -> Self {
        Self {
            length: 100.0,
            cross_section: "strip".into(),
            spacing: 3.0,
            n_loops: 6,
        }
    }
}

/// Vertices of one arm: `nseg` segments from the origin, the first heading east
fn arm(base: Int, pitch: Int, nseg: Int) -> Vec<Point> {
    let mut pt = Point::zero();
    let mut pts = vec![pt];
    for k in 0..nseg {
        pt += Angle::from_quarters(k as i32).unit(base + (k / 2) * pitch);
        pts.push(pt);
    }
    pts
}

/// Center-line vertices of a double spiral of total length `length` with `n_loops` loops per arm,
/// or `None` if its innermost segments would come out shorter than twice `spacing`.
fn spiral_points(length: Int, spacing: Int, n_loops: usize) -> Option<Vec<Point>> {
    let nseg = 4 * n_loops as Int;
    let pitch = 2 * spacing;
    let half = nseg / 2;
    // Sum over one arm's segments of `(k / 2) * pitch`
    let growth = pitch * half * (half - 1);
    let base = (length - 2 * growth).div_euclid(2 * nseg);
    if base < 2 * spacing {
        return None;
    }
    let remainder = length - 2 * growth - 2 * nseg * base;

    // Arm `a` starts at the origin. Arm `b` is its half-turn about `center / 2`.
    let a = arm(base, pitch, nseg);
    let center = Point::new(base - spacing, base - spacing);
    let b: Vec<Point> = a.iter().map(|p| center - *p).collect();
    let mid = (base - spacing) / 2;

    // Arm `b` inward, the S-bend, then arm `a` outward
    let mut pts: Vec<Point> = b[1..].iter().rev().copied().collect();
    pts.push(Point::new(mid, base - spacing));
    pts.push(Point::new(mid, 0));
    pts.extend(a[1..].iter().copied());
    if let Some(last) = pts.last_mut() {
        *last += Angle::from_quarters(nseg as i32 - 1).unit(remainder);
    }
    Some(pts)
}

/// Direction of travel from `from` to `to`, along an axis
fn heading(from: Point, to: Point) -> Angle {
    if to.x > from.x {
        Angle::R0
    } else if to.x < from.x {
        Angle::R180
    } else if to.y > from.y {
        Angle::R90
    } else {
        Angle::R270
    }
}

///
/// Spiral delay line.
///
/// Both ports sit on the outside: `o1` at the outer end of one arm, `o2` at the outer end of the other,
/// each facing away from the spiral.
/// Uses as many loops as fit, up to `n_loops`; if none fit, the spiral degenerates to a straight
/// from the origin, with `o1` facing west.
///
pub fn spiral(ctx: &Ctx, params: &SpiralParams) -> LayoutResult<Arc<Component>> {
    ctx.cell("spiral", params, |ctx, comp| {
        positive("length", params.length)?;
        let xs = ctx.cross_section(&params.cross_section)?;
        let (length, spacing) = (um(params.length), um(params.spacing));
        if spacing <= xs.width {
            return LayoutError::invalid(format!(
                "spiral spacing {} must exceed waveguide width {}",
                params.spacing,
                to_um(xs.width)
            ));
        }
        let pts = (1..=params.n_loops)
            .rev()
            .find_map(|n| spiral_points(length, spacing, n))
            .unwrap_or_else(|| vec![Point::zero(), Point::new(length, 0)]);
        debug!("Spiral of length {} with {} segments", params.length, pts.len() - 1);

        let n = pts.len();
        let (start, end) = (pts[0], pts[n - 1]);
        let o1 = heading(pts[1], start);
        let o2 = heading(pts[n - 2], end);
        comp.add_path(xs.layer, xs.width, pts);
        comp.add_ports([
            Port::optical("o1", start, o1, xs),
            Port::optical("o2", end, o2, xs),
        ])?;
        comp.set_info("length", to_um(length));
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Path, Shape};

    fn path_of(points: Vec<Point>) -> Path {
        Path { width: 0, points }
    }

    #[test]
    fn test_exact_length() {
        for length in [50_000, 123_457, 200_000, 1_000_001] {
            for loops in 1..=6 {
                if let Some(pts) = spiral_points(length, 3000, loops) {
                    assert_eq!(path_of(pts).length(), length as f64);
                }
            }
        }
    }
    #[test]
    fn test_turns_clear() {
        let spacing = 3000;
        let pts = spiral_points(1_000_001, spacing, 4).unwrap();
        let segs: Vec<(Point, Point)> = pts.windows(2).map(|w| (w[0], w[1])).collect();
        let span = |a: Int, b: Int| (a.min(b), a.max(b));
        for (i, &(a0, a1)) in segs.iter().enumerate() {
            for &(b0, b1) in segs.iter().skip(i + 2) {
                let (ax, ay) = (span(a0.x, a1.x), span(a0.y, a1.y));
                let (bx, by) = (span(b0.x, b1.x), span(b0.y, b1.y));
                let (a_horiz, b_horiz) = (a0.y == a1.y, b0.y == b1.y);
                if a_horiz == b_horiz {
                    // Parallel runs which overlap sit at least `spacing` apart
                    let overlap = match a_horiz {
                        true => ax.0 < bx.1 && bx.0 < ax.1,
                        false => ay.0 < by.1 && by.0 < ay.1,
                    };
                    let gap = match a_horiz {
                        true => (a0.y - b0.y).abs(),
                        false => (a0.x - b0.x).abs(),
                    };
                    assert!(
                        !overlap || gap >= spacing,
                        "{:?} and {:?} too close",
                        (a0, a1),
                        (b0, b1)
                    );
                } else {
                    // Crossing runs never touch
                    let touch = ax.0 <= bx.1 && bx.0 <= ax.1 && ay.0 <= by.1 && by.0 <= ay.1;
                    assert!(!touch, "{:?} crosses {:?}", (a0, a1), (b0, b1));
                }
            }
        }
    }
    #[test]
    fn test_ports_outside() -> LayoutResult<()> {
        let ctx = Ctx::new(crate::EngineConfig::default(), crate::Pdk::generic()?)?;
        let s = spiral(&ctx, &SpiralParams::default())?;
        let pts = match &s.elems[0].inner {
            Shape::Path(p) => p.points.clone(),
            _ => panic!("Expected a path"),
        };
        let xmin = pts.iter().map(|p| p.x).min().unwrap();
        let xmax = pts.iter().map(|p| p.x).max().unwrap();
        let ymin = pts.iter().map(|p| p.y).min().unwrap();
        let ymax = pts.iter().map(|p| p.y).max().unwrap();
        // Each port sits on the outer edge it faces, with nothing beyond it
        for name in ["o1", "o2"] {
            let p = s.port(name)?;
            let edge = match p.orientation {
                Angle::R0 => p.center.x == xmax,
                Angle::R90 => p.center.y == ymax,
                Angle::R180 => p.center.x == xmin,
                Angle::R270 => p.center.y == ymin,
            };
            assert!(edge, "{} at {:?} faces into the spiral", name, p.center);
        }
        assert_eq!(s.port("o1")?.orientation, Angle::R90);
        assert_eq!(s.port("o2")?.orientation, Angle::R270);
        Ok(())
    }
    #[test]
    fn test_too_short_falls_back() -> LayoutResult<()> {
        let ctx = Ctx::new(crate::EngineConfig::default(), crate::Pdk::generic()?)?;
        let params = SpiralParams {
            length: 5.0,
            ..Default::default()
        };
        let s = spiral(&ctx, &params)?;
        match &s.elems[0].inner {
            Shape::Path(p) => assert_eq!(p.points, vec![Point::zero(), Point::new(5000, 0)]),
            _ => panic!("Expected a path"),
        }
        assert_eq!(s.port("o2")?.orientation, Angle::R0);
        Ok(())
    }
}

//!
//! # Euler Bends
//!
//! Ninety-degree bends whose curvature ramps linearly from zero,
//! holds at a peak through a circular middle section, and ramps back down.
//! Fraction `p` of the turn is spent in the two ramps.
//!

// Std-Lib
use std::f64::consts::FRAC_PI_2;
use std::sync::Arc;

// Crates.io
use serde::{Deserialize, Serialize};

// Local Imports
use super::positive;
use crate::component::Component;
use crate::ctx::Ctx;
use crate::error::{LayoutError, LayoutResult};
use crate::geom::{to_um, um, Angle, Int, Point};
use crate::port::Port;

/// Integration steps per bend
const STEPS: usize = 200;

/// # Euler Bend Parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BendEulerParams {
    /// Turn angle in degrees. Only 90 is supported.
    pub angle: f64,
    /// Fraction of the turn spent in the Euler ramps, in [0, 1]
    pub p: f64,
    pub cross_section: String,
    /// Effective radius in microns: the bend's end sits at (radius, radius).
    /// Defaults to that of `cross_section`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}
impl Default for BendEulerParams {
    fn default() -> Self {
        Self {
            angle: 90.0,
            p: 0.5,
            cross_section: "strip".into(),
            radius: None,
        }
    }
}

/// Sampled center-line of a unit-peak-curvature bend
struct EulerCurve {
    /// (x, y, heading) samples
    samples: Vec<(f64, f64, f64)>,
    /// Curve length
    length: f64,
}
impl EulerCurve {
    fn new(p: f64) -> Self {
        let theta = FRAC_PI_2;
        // Each ramp turns `p/2` of the total, and is twice as long as the arc turning the same angle
        let ramp = p * theta;
        let arc = theta * (1.0 - p);
        let length = 2.0 * ramp + arc;
        let heading = |s: f64| {
            if s < ramp {
                s * s / (2.0 * ramp)
            } else if s <= ramp + arc {
                ramp / 2.0 + (s - ramp)
            } else if ramp > 0.0 {
                let t = (length - s).max(0.0);
                theta - t * t / (2.0 * ramp)
            } else {
                theta
            }
        };
        let ds = length / STEPS as f64;
        let mut samples = Vec::with_capacity(STEPS + 1);
        let (mut x, mut y) = (0.0, 0.0);
        samples.push((x, y, 0.0));
        for i in 0..STEPS {
            let phi = heading((i as f64 + 0.5) * ds);
            x += phi.cos() * ds;
            y += phi.sin() * ds;
            samples.push((x, y, heading((i + 1) as f64 * ds)));
        }
        Self { samples, length }
    }
    /// Ratio between a requested effective radius and this unit curve's
    fn scale(&self, radius: f64) -> f64 {
        let (xend, _, _) = self.samples[self.samples.len() - 1];
        radius / xend
    }
}

/// Center-line length of a 90-degree Euler bend with effective radius `radius`, in database units
pub fn euler_length(radius: Int, p: f64) -> f64 {
    let curve = EulerCurve::new(p.clamp(0.0, 1.0));
    curve.length * curve.scale(radius as f64)
}

///
/// Ninety-degree Euler bend.
///
/// Port `o1` sits at the origin facing west, and the waveguide turns left
/// to port `o2` at (radius, radius), facing north.
///
pub fn bend_euler(ctx: &Ctx, params: &BendEulerParams) -> LayoutResult<Arc<Component>> {
    ctx.cell("bend_euler", params, |ctx, comp| {
        if params.angle != 90.0 {
            return LayoutError::invalid(format!(
                "Only 90-degree Euler bends are supported, got {}",
                params.angle
            ));
        }
        if !(0.0..=1.0).contains(&params.p) {
            return LayoutError::invalid(format!("Euler fraction p must be in [0, 1], got {}", params.p));
        }
        let xs = ctx.cross_section(&params.cross_section)?;
        let radius = match params.radius {
            Some(r) => {
                positive("radius", r)?;
                um(r)
            }
            None => xs.radius,
        };
        let curve = EulerCurve::new(params.p);
        let scale = curve.scale(radius as f64);
        let half = xs.width as f64 / 2.0;
        let last = curve.samples.len() - 1;

        let mut left = Vec::with_capacity(curve.samples.len());
        let mut right = Vec::with_capacity(curve.samples.len());
        for (idx, (x, y, phi)) in curve.samples.iter().enumerate() {
            // Pin both ends to their exact grid locations and headings
            let (x, y, phi) = match idx {
                0 => (0.0, 0.0, 0.0),
                i if i == last => (radius as f64, radius as f64, FRAC_PI_2),
                _ => (x * scale, y * scale, *phi),
            };
            let (nx, ny) = (-phi.sin() * half, phi.cos() * half);
            left.push(Point::new((x + nx).round() as Int, (y + ny).round() as Int));
            right.push(Point::new((x - nx).round() as Int, (y - ny).round() as Int));
        }
        right.reverse();
        left.extend(right);
        comp.add_polygon(xs.layer, left);

        comp.add_ports([
            Port::optical("o1", Point::zero(), Angle::R180, xs),
            Port::optical("o2", Point::new(radius, radius), Angle::R90, xs),
        ])?;
        comp.set_info("length", to_um((curve.length * scale).round() as Int));
        comp.set_info("radius", to_um(radius));
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circular_limit() {
        // With no ramps, the bend is a quarter circle
        let len = euler_length(10_000, 0.0);
        approx::assert_relative_eq!(len, 10_000.0 * FRAC_PI_2, max_relative = 1e-4);
    }
    #[test]
    fn test_euler_longer_than_circular() {
        let circ = euler_length(10_000, 0.0);
        let euler = euler_length(10_000, 0.5);
        assert!(euler > circ);
        // But not absurdly so
        assert!(euler < 1.2 * circ);
    }
    #[test]
    fn test_symmetric() {
        let curve = EulerCurve::new(0.5);
        let (x, y, phi) = curve.samples[curve.samples.len() - 1];
        approx::assert_relative_eq!(x, y, max_relative = 1e-6);
        approx::assert_relative_eq!(phi, FRAC_PI_2, max_relative = 1e-9);
    }
}

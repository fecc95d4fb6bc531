// stroke-core/src/curve.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `Curve` primitive (spec §3, §4.B): a uniform line/cubic/conic representation with
//! endpoint/tangent queries, De Casteljau splitting, sub-curve extraction, and reversal.
//!
//! This generalizes the source library's `Segment`/`CubicSegment` (`pathfinder_content::segment`)
//! to a third kind, `Conic`, which the source library's line/cubic-only `SegmentKind` has no
//! counterpart for.

use stroke_geometry::util::EPSILON;
use stroke_geometry::vecmath;
use stroke_geometry::vector::Vector2F;

/// A single line, cubic Bézier, or rational-quadratic (conic) segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Curve {
    Line { p0: Vector2F, p1: Vector2F },
    Cubic { p0: Vector2F, p1: Vector2F, p2: Vector2F, p3: Vector2F },
    /// A rational quadratic Bézier. `p1` is the (unnormalized) interior control point and
    /// `weight` is its associated weight; `p0`/`p2` implicitly have weight 1, matching spec §3's
    /// unified representation where endpoints always occupy the first and last slot.
    Conic { p0: Vector2F, p1: Vector2F, p2: Vector2F, weight: f32 },
}

impl Curve {
    #[inline]
    pub fn line(p0: Vector2F, p1: Vector2F) -> Curve {
        Curve::Line { p0, p1 }
    }

    #[inline]
    pub fn cubic(p0: Vector2F, p1: Vector2F, p2: Vector2F, p3: Vector2F) -> Curve {
        Curve::Cubic { p0, p1, p2, p3 }
    }

    #[inline]
    pub fn conic(p0: Vector2F, p1: Vector2F, p2: Vector2F, weight: f32) -> Curve {
        debug_assert!(weight > 0.0);
        Curve::Conic { p0, p1, p2, weight }
    }

    #[inline]
    pub fn start_point(&self) -> Vector2F {
        match *self {
            Curve::Line { p0, .. } => p0,
            Curve::Cubic { p0, .. } => p0,
            Curve::Conic { p0, .. } => p0,
        }
    }

    #[inline]
    pub fn end_point(&self) -> Vector2F {
        match *self {
            Curve::Line { p1, .. } => p1,
            Curve::Cubic { p3, .. } => p3,
            Curve::Conic { p2, .. } => p2,
        }
    }

    /// The unit tangent direction at parametric `t = 0`.
    ///
    /// Degenerate leading control points (a cubic whose `p1 == p0`, say) are skipped in favor of
    /// the first control point that differs from `p0`, falling back to the chord `p0 -> end` for
    /// fully collapsed curves.
    pub fn start_tangent(&self) -> Vector2F {
        match *self {
            Curve::Line { p0, p1 } => vecmath::tangent(p0, p1),
            Curve::Cubic { p0, p1, p2, p3 } => {
                for candidate in [p1, p2, p3] {
                    if !candidate.approx_eq(p0, EPSILON) {
                        return vecmath::tangent(p0, candidate);
                    }
                }
                vecmath::tangent(p0, p3)
            }
            Curve::Conic { p0, p1, p2, .. } => {
                if !p1.approx_eq(p0, EPSILON) {
                    vecmath::tangent(p0, p1)
                } else {
                    vecmath::tangent(p0, p2)
                }
            }
        }
    }

    /// The unit tangent direction at parametric `t = 1`.
    pub fn end_tangent(&self) -> Vector2F {
        match *self {
            Curve::Line { p0, p1 } => vecmath::tangent(p0, p1),
            Curve::Cubic { p0, p1, p2, p3 } => {
                for candidate in [p2, p1, p0] {
                    if !candidate.approx_eq(p3, EPSILON) {
                        return vecmath::tangent(candidate, p3);
                    }
                }
                vecmath::tangent(p0, p3)
            }
            Curve::Conic { p0, p1, p2, .. } => {
                if !p1.approx_eq(p2, EPSILON) {
                    vecmath::tangent(p1, p2)
                } else {
                    vecmath::tangent(p0, p2)
                }
            }
        }
    }

    /// True if this curve's endpoints (and, for cubic/conic, all controls) collapse to a single
    /// point within `ε = 1e-3` (spec §3). Degenerate curves are skipped by the driver.
    pub fn is_degenerate(&self) -> bool {
        match *self {
            Curve::Line { p0, p1 } => p0.approx_eq(p1, EPSILON),
            Curve::Cubic { p0, p1, p2, p3 } => {
                p0.approx_eq(p1, EPSILON) && p0.approx_eq(p2, EPSILON) && p0.approx_eq(p3, EPSILON)
            }
            Curve::Conic { p0, p1, p2, .. } => {
                p0.approx_eq(p1, EPSILON) && p0.approx_eq(p2, EPSILON)
            }
        }
    }

    /// Splits this curve at parametric `t` via De Casteljau (rational De Casteljau for conics).
    pub fn split(&self, t: f32) -> (Curve, Curve) {
        match *self {
            Curve::Line { p0, p1 } => {
                let mid = p0.lerp(p1, t);
                (Curve::line(p0, mid), Curve::line(mid, p1))
            }
            Curve::Cubic { p0, p1, p2, p3 } => {
                let p01 = p0.lerp(p1, t);
                let p12 = p1.lerp(p2, t);
                let p23 = p2.lerp(p3, t);
                let p012 = p01.lerp(p12, t);
                let p123 = p12.lerp(p23, t);
                let p0123 = p012.lerp(p123, t);
                (
                    Curve::cubic(p0, p01, p012, p0123),
                    Curve::cubic(p0123, p123, p23, p3),
                )
            }
            Curve::Conic { p0, p1, p2, weight } => split_conic(p0, p1, p2, weight, t),
        }
    }

    /// Returns the sub-curve between parametric positions `t0` and `t1` (`0.0 <= t0 <= t1 <=
    /// 1.0`).
    pub fn segment(&self, t0: f32, t1: f32) -> Curve {
        if t0 <= 0.0 {
            return self.split(t1).0;
        }
        let after_t0 = self.split(t0).1;
        if t1 >= 1.0 {
            return after_t0;
        }
        let remaining = (t1 - t0) / (1.0 - t0);
        after_t0.split(remaining).0
    }

    /// Reverses control-point order, swapping the curve's start and end.
    pub fn reverse(&self) -> Curve {
        match *self {
            Curve::Line { p0, p1 } => Curve::line(p1, p0),
            Curve::Cubic { p0, p1, p2, p3 } => Curve::cubic(p3, p2, p1, p0),
            Curve::Conic { p0, p1, p2, weight } => Curve::conic(p2, p1, p0, weight),
        }
    }

    #[inline]
    pub fn is_line(&self) -> bool {
        matches!(self, Curve::Line { .. })
    }

    #[inline]
    pub fn is_cubic(&self) -> bool {
        matches!(self, Curve::Cubic { .. })
    }

    #[inline]
    pub fn is_conic(&self) -> bool {
        matches!(self, Curve::Conic { .. })
    }
}

/// Rational De Casteljau split of a 3-point conic at `t`, per the standard
/// weighted-homogeneous-coordinate construction (equivalent to Skia's `SkConic::chopAt`).
fn split_conic(p0: Vector2F, p1: Vector2F, p2: Vector2F, weight: f32, t: f32) -> (Curve, Curve) {
    // Homogeneous weights: the endpoints carry weight 1, the interior control carries `weight`.
    let (w0, w1, w2) = (1.0_f32, weight, 1.0_f32);

    let h0 = (p0.scale(w0), w0);
    let h1 = (p1.scale(w1), w1);
    let h2 = (p2.scale(w2), w2);

    fn lerp_h(a: (Vector2F, f32), b: (Vector2F, f32), t: f32) -> (Vector2F, f32) {
        (a.0.lerp(b.0, t), a.1 + (b.1 - a.1) * t)
    }

    let h01 = lerp_h(h0, h1, t);
    let h12 = lerp_h(h1, h2, t);
    let h012 = lerp_h(h01, h12, t);

    let dehomogenize = |h: (Vector2F, f32)| h.0.scale(1.0 / h.1);

    let mid = dehomogenize(h012);

    let left_weight = h01.1 / (h0.1 * h012.1).sqrt();
    let right_weight = h12.1 / (h012.1 * h2.1).sqrt();

    (
        Curve::conic(p0, dehomogenize(h01), mid, left_weight),
        Curve::conic(mid, dehomogenize(h12), p2, right_weight),
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_line_split_midpoint() {
        let c = Curve::line(Vector2F::new(0.0, 0.0), Vector2F::new(10.0, 0.0));
        let (a, b) = c.split(0.5);
        assert_eq!(a.end_point(), Vector2F::new(5.0, 0.0));
        assert_eq!(b.start_point(), Vector2F::new(5.0, 0.0));
    }

    #[test]
    fn test_cubic_split_endpoints_match() {
        let c = Curve::cubic(
            Vector2F::new(0.0, 0.0),
            Vector2F::new(0.0, 10.0),
            Vector2F::new(10.0, 10.0),
            Vector2F::new(10.0, 0.0),
        );
        let (a, b) = c.split(0.25);
        assert_eq!(a.start_point(), c.start_point());
        assert_eq!(b.end_point(), c.end_point());
        assert!(a.end_point().approx_eq(b.start_point(), 1e-4));
    }

    #[test]
    fn test_cubic_segment_is_subset() {
        let c = Curve::cubic(
            Vector2F::new(0.0, 0.0),
            Vector2F::new(0.0, 10.0),
            Vector2F::new(10.0, 10.0),
            Vector2F::new(10.0, 0.0),
        );
        let whole = c.segment(0.0, 1.0);
        assert_eq!(whole, c);
    }

    #[test]
    fn test_reverse_swaps_endpoints() {
        let c = Curve::cubic(
            Vector2F::new(0.0, 0.0),
            Vector2F::new(0.0, 10.0),
            Vector2F::new(10.0, 10.0),
            Vector2F::new(10.0, 0.0),
        );
        let r = c.reverse();
        assert_eq!(r.start_point(), c.end_point());
        assert_eq!(r.end_point(), c.start_point());
    }

    #[test]
    fn test_conic_split_endpoints_match() {
        // A quarter-circle conic: p0=(1,0), p1=(1,1) weight=1/sqrt(2), p2=(0,1).
        let w = std::f32::consts::FRAC_1_SQRT_2;
        let c = Curve::conic(
            Vector2F::new(1.0, 0.0),
            Vector2F::new(1.0, 1.0),
            Vector2F::new(0.0, 1.0),
            w,
        );
        let (a, b) = c.split(0.5);
        assert_eq!(a.start_point(), c.start_point());
        assert_eq!(b.end_point(), c.end_point());
        assert!(a.end_point().approx_eq(b.start_point(), 1e-4));
    }

    #[test]
    fn test_degenerate_curve_detected() {
        let p = Vector2F::new(3.0, 3.0);
        assert!(Curve::line(p, p).is_degenerate());
        assert!(Curve::cubic(p, p, p, p).is_degenerate());
        assert!(!Curve::line(p, Vector2F::new(3.0, 4.0)).is_degenerate());
    }
}

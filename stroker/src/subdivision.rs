// stroke-core/src/subdivision.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The simplicity test and subdivision driver (spec §4.D).
//!
//! A curve is "simple" when the Tiller–Hanson offset in `offset.rs` is a good enough
//! approximation of its true parallel curve: its control polygon doesn't fold back on itself and
//! its two endpoint tangents don't differ by more than 60°. Curves that fail the test are split
//! at their curvature inflection (where the offset approximation breaks down most visibly) or,
//! failing to find one, at their midpoint, down to a recursion limit.

use log::{debug, trace};
use smallvec::SmallVec;
use stroke_geometry::util::EPSILON;
use stroke_geometry::vecmath;
use stroke_geometry::vector::Vector2F;

use crate::curve::Curve;

/// Recursion limit for `subdivide_simple`. Past this depth a curve is emitted as-is regardless of
/// simplicity, so pathological input can't recurse forever.
pub const MAX_LEVEL: u32 = 8;

/// The maximum angle, in radians, between a curve's two endpoint tangents before it's considered
/// to be turning too sharply for a single offset segment (60°, spec §4.D).
const MAX_TANGENT_ANGLE: f32 = std::f32::consts::FRAC_PI_3;

/// True if `curve` is flat/gentle enough to offset directly.
pub fn is_simple(curve: &Curve) -> bool {
    let turn = vecmath::angle_between(curve.start_tangent(), curve.end_tangent()).abs();
    if turn >= MAX_TANGENT_ANGLE {
        return false;
    }
    match *curve {
        Curve::Line { .. } => true,
        Curve::Cubic { p0, p1, p2, p3 } => hull_tangents_consistent(p0, p1, p2, p3),
        Curve::Conic { .. } => true,
    }
}

/// The control polygon's two interior turns (`p0->p1->p2` and `p1->p2->p3`) must curve the same
/// way; a sign change means the hull itself has an inflection, which the offset approximation
/// cannot follow faithfully without splitting.
fn hull_tangents_consistent(p0: Vector2F, p1: Vector2F, p2: Vector2F, p3: Vector2F) -> bool {
    let turn_a = (p1 - p0).det(p2 - p1);
    let turn_b = (p2 - p1).det(p3 - p2);
    turn_a * turn_b >= 0.0
}

/// Recursively splits `curve` until every piece is simple or `MAX_LEVEL` recursion budget is
/// exhausted, appending results to `out` in start-to-end order.
///
/// `level` counts *down* from `MAX_LEVEL`, per spec §4.D: the outermost call always takes the
/// curvature-point partition (the `level < MAX_LEVEL` guard on the simplicity shortcut excludes
/// it), so even an already-simple curve is offered once to `cubic_curvature_ts` before the usual
/// simple-check/midpoint-split recursion takes over for its pieces. When no curvature point falls
/// strictly inside `(0, 1)` that partition is just `{0, 1}`, i.e. a no-op.
pub fn subdivide_simple(curve: &Curve, out: &mut SmallVec<[Curve; 8]>) {
    subdivide_at_level(curve, MAX_LEVEL, out, true);
}

fn subdivide_at_level(curve: &Curve, level: u32, out: &mut SmallVec<[Curve; 8]>, is_outermost: bool) {
    if level == 0 || (level < MAX_LEVEL && is_simple(curve)) {
        if level == 0 && !is_simple(curve) {
            debug!("subdivision recursion limit reached; emitting curve unsplit");
        }
        out.push(*curve);
        return;
    }

    if is_outermost {
        if let Curve::Cubic { p0, p1, p2, p3 } = *curve {
            let mut partition: SmallVec<[f32; 5]> = SmallVec::new();
            partition.push(0.0);
            partition.extend(cubic_curvature_ts(p0, p1, p2, p3));
            partition.push(1.0);
            trace!("cubic curvature partition: {:?}", &partition[..]);
            for window in partition.windows(2) {
                let piece = curve.segment(window[0], window[1]);
                subdivide_at_level(&piece, level - 1, out, false);
            }
            return;
        }
    }

    let (lo, hi) = curve.split(0.5);
    subdivide_at_level(&lo, level - 1, out, false);
    subdivide_at_level(&hi, level - 1, out, false);
}

/// Finds the parameters in the open interval `(0, 1)` where the cubic `p0 p1 p2 p3`'s signed
/// curvature is zero, maximal, or minimal (spec §4.D).
///
/// Rotates and translates the curve so that `P0` sits at the origin and `P0 -> P3` is horizontal,
/// then forms the quadratic `x*t^2 + y*t + z` whose roots are the curvature zero-crossings; the
/// quadratic's own vertex `t = -y / (2x)` is the curvature extremum and is collected alongside the
/// zero-crossings even when it isn't one itself. At most three values are returned (two roots plus
/// the vertex), already restricted to `(0, 1)` and sorted ascending.
fn cubic_curvature_ts(p0: Vector2F, p1: Vector2F, p2: Vector2F, p3: Vector2F) -> SmallVec<[f32; 3]> {
    let mut roots = SmallVec::new();

    let chord = p3 - p0;
    if chord.square_length() <= EPSILON * EPSILON {
        return roots;
    }
    let dir = chord.normalize();
    let perp = dir.rotate_right();
    let local = |p: Vector2F| -> Vector2F {
        let d = p - p0;
        Vector2F::new(d.dot(dir), d.dot(perp))
    };

    let p1l = local(p1);
    let p2l = local(p2);
    let p3l = local(p3);

    let a = p2l.x() * p1l.y();
    let b = p3l.x() * p1l.y();
    let c = p1l.x() * p2l.y();
    let coef_d = p3l.x() * p2l.y();

    let x = -3.0 * a + 2.0 * b + 3.0 * c - coef_d;
    let y = 3.0 * a - b - 3.0 * c;
    let z = c - a;

    let in_range = |t: f32| t > 0.0 && t < 1.0;

    if x.abs() >= EPSILON {
        let disc = y * y - 4.0 * x * z;
        if disc >= 0.0 {
            let sqrt_disc = disc.sqrt();
            for root in [(-y + sqrt_disc) / (2.0 * x), (-y - sqrt_disc) / (2.0 * x)] {
                if in_range(root) {
                    roots.push(root);
                }
            }
        }
        let vertex = -y / (2.0 * x);
        if in_range(vertex) {
            roots.push(vertex);
        }
    } else if y.abs() >= EPSILON {
        let root = -z / y;
        if in_range(root) {
            roots.push(root);
        }
    }

    roots.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    roots.dedup_by(|a, b| (*a - *b).abs() < 1e-4);
    roots
}

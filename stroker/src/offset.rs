// stroke-core/src/offset.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Parallel (offset) curves (spec §4.C): exact for lines, Tiller–Hanson control-polygon offset
//! for cubics and conics.
//!
//! The Tiller–Hanson construction offsets each edge of the control polygon perpendicular to
//! itself by `distance`, then rebuilds interior control points from the intersections of
//! consecutive offset edges. It does not produce the true parallel curve (which is not
//! expressible as a cubic or a rational quadratic in general) but matches endpoint tangents
//! exactly, which is what the join/cap logic downstream relies on.

use log::warn;
use stroke_geometry::vecmath;
use stroke_geometry::vector::Vector2F;

use crate::curve::Curve;

/// Offsets `curve` by `distance` along its left-hand normal (spec §4.A's sign convention:
/// positive distance is to the left of the direction of travel).
///
/// Falls back to a uniform chord-normal translation, logging at `warn`, if the Tiller–Hanson
/// construction produces a non-finite control point (spec §7: total function, no error path).
pub fn offset(curve: &Curve, distance: f32) -> Curve {
    let result = match *curve {
        Curve::Line { p0, p1 } => offset_line(p0, p1, distance),
        Curve::Cubic { p0, p1, p2, p3 } => offset_cubic(p0, p1, p2, p3, distance),
        Curve::Conic { p0, p1, p2, weight } => offset_conic(p0, p1, p2, weight, distance),
    };
    if result.is_finite() {
        result
    } else {
        warn!("offset produced a non-finite control point; falling back to chord translation");
        fallback_translate(curve, distance)
    }
}

fn offset_line(p0: Vector2F, p1: Vector2F, distance: f32) -> Curve {
    let n = vecmath::normal(p0, p1).scale(distance);
    Curve::line(p0 + n, p1 + n)
}

fn offset_cubic(p0: Vector2F, p1: Vector2F, p2: Vector2F, p3: Vector2F, distance: f32) -> Curve {
    let n0 = edge_normal(p0, p1, p0, p3).scale(distance);
    let n1 = edge_normal(p1, p2, p0, p3).scale(distance);
    let n2 = edge_normal(p2, p3, p0, p3).scale(distance);

    let e0 = (p0 + n0, p1 + n0);
    let e1 = (p1 + n1, p2 + n1);
    let e2 = (p2 + n2, p3 + n2);

    let new_p0 = e0.0;
    let new_p3 = e2.1;
    let new_p1 = vecmath::line_intersect(e0.0, e0.1 - e0.0, e1.0, e1.1 - e1.0).unwrap_or(e0.1);
    let new_p2 = vecmath::line_intersect(e1.0, e1.1 - e1.0, e2.0, e2.1 - e2.0).unwrap_or(e1.1);

    Curve::cubic(new_p0, new_p1, new_p2, new_p3)
}

fn offset_conic(p0: Vector2F, p1: Vector2F, p2: Vector2F, weight: f32, distance: f32) -> Curve {
    let n0 = edge_normal(p0, p1, p0, p2).scale(distance);
    let n1 = edge_normal(p1, p2, p0, p2).scale(distance);

    let e0 = (p0 + n0, p1 + n0);
    let e1 = (p1 + n1, p2 + n1);

    let new_p0 = e0.0;
    let new_p2 = e1.1;
    let new_p1 = vecmath::line_intersect(e0.0, e0.1 - e0.0, e1.0, e1.1 - e1.0).unwrap_or(e0.1);

    Curve::conic(new_p0, new_p1, new_p2, weight)
}

/// The normal of the edge `a -> b`, falling back to the normal of the chord `chord_a -> chord_b`
/// when the edge itself has collapsed to a point (a repeated control point).
fn edge_normal(a: Vector2F, b: Vector2F, chord_a: Vector2F, chord_b: Vector2F) -> Vector2F {
    if a.approx_eq(b, stroke_geometry::util::EPSILON) {
        vecmath::normal(chord_a, chord_b)
    } else {
        vecmath::normal(a, b)
    }
}

fn fallback_translate(curve: &Curve, distance: f32) -> Curve {
    let n = vecmath::normal(curve.start_point(), curve.end_point()).scale(distance);
    match *curve {
        Curve::Line { p0, p1 } => Curve::line(p0 + n, p1 + n),
        Curve::Cubic { p0, p1, p2, p3 } => Curve::cubic(p0 + n, p1 + n, p2 + n, p3 + n),
        Curve::Conic { p0, p1, p2, weight } => Curve::conic(p0 + n, p1 + n, p2 + n, weight),
    }
}

trait CurveFinite {
    fn is_finite(&self) -> bool;
}

impl CurveFinite for Curve {
    fn is_finite(&self) -> bool {
        match *self {
            Curve::Line { p0, p1 } => p0.is_finite() && p1.is_finite(),
            Curve::Cubic { p0, p1, p2, p3 } => {
                p0.is_finite() && p1.is_finite() && p2.is_finite() && p3.is_finite()
            }
            Curve::Conic { p0, p1, p2, weight } => {
                p0.is_finite() && p1.is_finite() && p2.is_finite() && weight.is_finite()
            }
        }
    }
}

// stroke-core/src/join.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Join and cap synthesis (spec §4.E).
//!
//! A join or cap is a short run of connector geometry appended between two offset curves that
//! don't already meet. Unlike the offset curves themselves, this geometry is already final: it is
//! never re-offset or re-intersected, so it doesn't need to be a `Curve`. Round joins/caps are
//! handed to the output sink as `svg_arc_to` (spec §15), so a connector is either a line, or an
//! arc described by its SVG parameters — hence `StrokeOp` alongside `Curve`.

use log::debug;
use stroke_geometry::util::EPSILON;
use stroke_geometry::vecmath;
use stroke_geometry::vector::Vector2F;

use crate::curve::Curve;
use crate::sink::{push_curve, ArcSweep, Sink};
use crate::style::{LineCap, LineJoin, StrokeStyle};

/// One piece of already-final connector or offset geometry accumulated by a contour's side
/// builder (`state.rs`). `Curve` pieces come from `add_curve`/`add_segments`; `Arc` pieces come
/// from `round_join`/`round_cap`.
#[derive(Clone, Copy, Debug)]
pub enum StrokeOp {
    Curve(Curve),
    Arc(ArcOp),
}

#[derive(Clone, Copy, Debug)]
pub struct ArcOp {
    pub from: Vector2F,
    pub to: Vector2F,
    pub radius: f32,
    pub sweep: ArcSweep,
}

impl StrokeOp {
    #[inline]
    pub fn start_point(&self) -> Vector2F {
        match *self {
            StrokeOp::Curve(c) => c.start_point(),
            StrokeOp::Arc(a) => a.from,
        }
    }

    #[inline]
    pub fn end_point(&self) -> Vector2F {
        match *self {
            StrokeOp::Curve(c) => c.end_point(),
            StrokeOp::Arc(a) => a.to,
        }
    }

    /// Reverses this op in place, matching `Curve::reverse` for curves and flipping the SVG
    /// sweep-flag (not the large-arc-flag) for arcs, per the standard rule for retracing an arc
    /// backward.
    #[inline]
    pub fn reverse(&self) -> StrokeOp {
        match *self {
            StrokeOp::Curve(c) => StrokeOp::Curve(c.reverse()),
            StrokeOp::Arc(a) => StrokeOp::Arc(ArcOp {
                from: a.to,
                to: a.from,
                radius: a.radius,
                sweep: a.sweep.flipped(),
            }),
        }
    }

    pub fn append_to<S: Sink>(&self, sink: &mut S) {
        match *self {
            StrokeOp::Curve(c) => push_curve(&c, sink),
            StrokeOp::Arc(a) => {
                let radius = Vector2F::splat(a.radius);
                // A join/cap arc never sweeps more than a half turn (joins turn by < pi, and a
                // cap's semicircle is split into two quarter-turns by the caller), so the
                // large-arc-flag is always false.
                sink.svg_arc_to(radius, 0.0, false, a.sweep, a.to);
            }
        }
    }
}

impl From<Curve> for StrokeOp {
    #[inline]
    fn from(curve: Curve) -> StrokeOp {
        StrokeOp::Curve(curve)
    }
}

/// The factor by which a miter's apex distance exceeds the stroke's half-width, for a join that
/// turns by `turn_angle` radians (spec §4.E: `1 / |sin((pi - alpha) / 2)|`, `alpha = |angle|`).
fn miter_length_factor(turn_angle: f32) -> f32 {
    let alpha = turn_angle.abs();
    let half_exterior = (std::f32::consts::PI - alpha) * 0.5;
    1.0 / half_exterior.sin().abs()
}

/// Emits the join between two consecutive offset curves on the outer side of a turn.
///
/// `a` is the arrival point (end of the incoming offset curve), `b` the departure point (start of
/// the outgoing one); `tan_a`/`tan_b` are the corresponding original-path tangents (used to aim
/// the miter rays and the arc center); `corner` is the vertex on the *original* (unoffset) path;
/// `turn_angle` is the signed `angle_between` computed at that corner (its sign selects the arc
/// sweep direction for `Round`).
pub fn join(
    out: &mut Vec<StrokeOp>,
    style: &StrokeStyle,
    a: Vector2F,
    tan_a: Vector2F,
    b: Vector2F,
    tan_b: Vector2F,
    corner: Vector2F,
    turn_angle: f32,
) {
    match style.line_join {
        LineJoin::Miter => miter(out, style, a, tan_a, b, tan_b, corner, turn_angle, false),
        LineJoin::MiterClip => miter(out, style, a, tan_a, b, tan_b, corner, turn_angle, true),
        LineJoin::Round => round_join(out, style, a, b, corner, turn_angle),
        LineJoin::Bevel => {
            debug!("bevel join at corner {:?}", corner);
            out.push(StrokeOp::Curve(Curve::line(a, b)));
        }
    }
}

fn miter(
    out: &mut Vec<StrokeOp>,
    style: &StrokeStyle,
    a: Vector2F,
    tan_a: Vector2F,
    b: Vector2F,
    tan_b: Vector2F,
    corner: Vector2F,
    turn_angle: f32,
    clip: bool,
) {
    let apex = vecmath::line_intersect(a, tan_a, b, tan_b);
    let factor = miter_length_factor(turn_angle);

    let apex = match apex {
        Some(p) if factor.is_finite() && factor <= style.miter_limit => p,
        Some(p) if clip => {
            debug!(
                "miter-clip at corner {:?}: factor {} exceeds limit {}, clipping",
                corner, factor, style.miter_limit
            );
            return miter_clip(out, a, tan_a, b, tan_b, corner, p);
        }
        _ => {
            debug!(
                "miter at corner {:?}: factor {} exceeds limit {} (or ill-conditioned), falling back to bevel",
                corner, factor, style.miter_limit
            );
            out.push(StrokeOp::Curve(Curve::line(a, b)));
            return;
        }
    };

    out.push(StrokeOp::Curve(Curve::line(a, apex)));
    out.push(StrokeOp::Curve(Curve::line(apex, b)));
}

/// The perpendicular-bisector clip construction of spec §4.E. Falls back to a bevel when the
/// bisector is ill-conditioned (near-degenerate `corner`-to-`apex` segment, spec §9's open
/// question on `alpha -> pi`).
fn miter_clip(
    out: &mut Vec<StrokeOp>,
    a: Vector2F,
    tan_a: Vector2F,
    b: Vector2F,
    tan_b: Vector2F,
    corner: Vector2F,
    apex: Vector2F,
) {
    let mid = corner.lerp(apex, 0.5);
    let to_apex = apex - corner;
    if to_apex.square_length() <= EPSILON * EPSILON {
        out.push(StrokeOp::Curve(Curve::line(a, b)));
        return;
    }
    let bisector_dir = to_apex.rotate_right();

    let clip_points = (
        vecmath::line_intersect(mid, bisector_dir, a, tan_a),
        vecmath::line_intersect(mid, bisector_dir, b, tan_b),
    );
    match clip_points {
        (Some(a1), Some(b1)) => {
            out.push(StrokeOp::Curve(Curve::line(a, a1)));
            out.push(StrokeOp::Curve(Curve::line(a1, b1)));
            out.push(StrokeOp::Curve(Curve::line(b1, b)));
        }
        _ => out.push(StrokeOp::Curve(Curve::line(a, b))),
    }
}

fn round_join(out: &mut Vec<StrokeOp>, style: &StrokeStyle, a: Vector2F, b: Vector2F, corner: Vector2F, turn_angle: f32) {
    let _ = style;
    out.push(StrokeOp::Arc(ArcOp {
        from: a,
        to: b,
        radius: (a - corner).length(),
        sweep: if turn_angle > 0.0 { ArcSweep::Positive } else { ArcSweep::Negative },
    }));
}

/// Emits the cap that finishes an open contour's start or end (spec §4.E). `r`/`l` are the two
/// offset endpoints at this end of the contour; `outward` is the unit vector pointing away from
/// the stroked body along the path's tangent at this end (the forward tangent for an end cap, the
/// negated start tangent for a start cap).
pub fn cap(out: &mut Vec<StrokeOp>, style: &StrokeStyle, half_width: f32, r: Vector2F, l: Vector2F, outward: Vector2F) {
    match style.line_cap {
        LineCap::Butt => out.push(StrokeOp::Curve(Curve::line(r, l))),
        LineCap::Square => {
            let d = outward.scale(half_width);
            out.push(StrokeOp::Curve(Curve::line(r, r + d)));
            out.push(StrokeOp::Curve(Curve::line(r + d, l + d)));
            out.push(StrokeOp::Curve(Curve::line(l + d, l)));
        }
        LineCap::Round => round_cap(out, r, l, outward, half_width),
    }
}

/// A semicircle can't be represented by a single conic (weight would be `cos(pi/2) = 0`), so two
/// quarter-turn arcs are used instead, meeting at the point `half_width` out along `outward` from
/// the cap's center.
fn round_cap(out: &mut Vec<StrokeOp>, r: Vector2F, l: Vector2F, outward: Vector2F, half_width: f32) {
    let center = r.lerp(l, 0.5);
    let mid = center + outward.scale(half_width);
    // `r -> l` sweeps through `mid`; a cap always turns the same way regardless of sign
    // convention upstream, so the sweep direction is fixed rather than angle-derived.
    out.push(StrokeOp::Arc(ArcOp { from: r, to: mid, radius: half_width, sweep: ArcSweep::Positive }));
    out.push(StrokeOp::Arc(ArcOp { from: mid, to: l, radius: half_width, sweep: ArcSweep::Positive }));
}

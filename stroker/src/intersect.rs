// stroke-core/src/intersect.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Curve–curve intersection, used by the stroke state machine to trim the inner side of a turn
//! back to its first self-crossing (spec §4.F).
//!
//! Two lines are solved exactly. Any other pairing is handled by recursive bounding-box
//! subdivision: each curve is halved until both halves are flat (or a depth limit is hit), at
//! which point their chords are tested as lines and the local parameter is mapped back into the
//! original curve's `0.0..=1.0` range.

use smallvec::SmallVec;
use stroke_geometry::line_segment::LineSegment2F;
use stroke_geometry::rect::RectF;
use stroke_geometry::util::{lerp, EPSILON};
use stroke_geometry::vector::Vector2F;

use crate::curve::Curve;

const MAX_DEPTH: u32 = 16;

/// One intersection: parametric positions on `a` and `b`, and the shared point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    pub t_a: f32,
    pub t_b: f32,
    pub point: Vector2F,
}

/// Finds up to `max_results` intersections between `a` and `b`, ordered by `t_a` ascending.
///
/// Callers intersecting a curve against itself (or against its immediate neighbor in a contour)
/// are responsible for discarding the trivial match at the shared endpoint; this routine reports
/// every crossing its subdivision passes find.
pub fn intersect(a: &Curve, b: &Curve, max_results: usize) -> SmallVec<[Intersection; 2]> {
    let mut out = SmallVec::new();
    if max_results == 0 {
        return out;
    }

    if let (Curve::Line { p0: a0, p1: a1 }, Curve::Line { p0: b0, p1: b1 }) = (a, b) {
        if let Some(hit) = line_line(*a0, *a1, *b0, *b1) {
            out.push(hit);
        }
        return out;
    }

    subdivide(a, (0.0, 1.0), b, (0.0, 1.0), 0, max_results, &mut out);
    out.sort_by(|x, y| x.t_a.partial_cmp(&y.t_a).unwrap_or(std::cmp::Ordering::Equal));
    out.truncate(max_results);
    out
}

fn line_line(a0: Vector2F, a1: Vector2F, b0: Vector2F, b1: Vector2F) -> Option<Intersection> {
    let seg_a = LineSegment2F::new(a0, a1);
    let seg_b = LineSegment2F::new(b0, b1);
    let t_a = seg_a.intersection_t(&seg_b)?;
    let t_b = seg_b.intersection_t(&seg_a)?;
    if !(-EPSILON..=1.0 + EPSILON).contains(&t_a) || !(-EPSILON..=1.0 + EPSILON).contains(&t_b) {
        return None;
    }
    Some(Intersection { t_a: t_a.max(0.0).min(1.0), t_b: t_b.max(0.0).min(1.0), point: seg_a.sample(t_a) })
}

fn subdivide(
    a: &Curve,
    ta: (f32, f32),
    b: &Curve,
    tb: (f32, f32),
    depth: u32,
    max_results: usize,
    out: &mut SmallVec<[Intersection; 2]>,
) {
    if out.len() >= max_results {
        return;
    }
    if !bounding_rect(a).dilate(Vector2F::splat(EPSILON)).intersects(&bounding_rect(b)) {
        return;
    }

    let flat = flatness(a) <= EPSILON && flatness(b) <= EPSILON;
    if depth >= MAX_DEPTH || flat {
        if let Some(mut hit) = line_line(a.start_point(), a.end_point(), b.start_point(), b.end_point()) {
            hit.t_a = lerp(ta.0, ta.1, hit.t_a);
            hit.t_b = lerp(tb.0, tb.1, hit.t_b);
            out.push(hit);
        }
        return;
    }

    let (a_lo, a_hi) = a.split(0.5);
    let (b_lo, b_hi) = b.split(0.5);
    let ta_mid = lerp(ta.0, ta.1, 0.5);
    let tb_mid = lerp(tb.0, tb.1, 0.5);

    subdivide(&a_lo, (ta.0, ta_mid), &b_lo, (tb.0, tb_mid), depth + 1, max_results, out);
    subdivide(&a_lo, (ta.0, ta_mid), &b_hi, (tb_mid, tb.1), depth + 1, max_results, out);
    subdivide(&a_hi, (ta_mid, ta.1), &b_lo, (tb.0, tb_mid), depth + 1, max_results, out);
    subdivide(&a_hi, (ta_mid, ta.1), &b_hi, (tb_mid, tb.1), depth + 1, max_results, out);
}

/// Max perpendicular distance of a curve's interior control points from its chord. Zero for
/// lines. Ignores the conic weight (see spec's discussion of the simplicity test); the control
/// polygon is a conservative bound on the true (weight-adjusted) curve regardless of weight sign
/// as long as the weight is positive, which `Curve::conic` enforces.
fn flatness(curve: &Curve) -> f32 {
    match *curve {
        Curve::Line { .. } => 0.0,
        Curve::Cubic { p0, p1, p2, p3 } => {
            let chord = LineSegment2F::new(p0, p3);
            distance_to_chord(&chord, p1).max(distance_to_chord(&chord, p2))
        }
        Curve::Conic { p0, p1, p2, .. } => {
            let chord = LineSegment2F::new(p0, p2);
            distance_to_chord(&chord, p1)
        }
    }
}

fn distance_to_chord(chord: &LineSegment2F, point: Vector2F) -> f32 {
    let chord_vector = chord.vector();
    let len = chord_vector.length();
    if len <= EPSILON {
        return (point - chord.from()).length();
    }
    (point - chord.from()).det(chord_vector).abs() / len
}

fn bounding_rect(curve: &Curve) -> RectF {
    let points: &[Vector2F] = match curve {
        Curve::Line { p0, p1 } => &[*p0, *p1],
        Curve::Cubic { p0, p1, p2, p3 } => &[*p0, *p1, *p2, *p3],
        Curve::Conic { p0, p1, p2, .. } => &[*p0, *p1, *p2],
    };
    let mut rect = RectF::from_points(points[0], points[0]);
    for &p in &points[1..] {
        rect = rect.union_point(p);
    }
    rect
}

trait RectExt {
    fn intersects(&self, other: &RectF) -> bool;
}

impl RectExt for RectF {
    fn intersects(&self, other: &RectF) -> bool {
        self.origin().x() <= other.lower_right().x()
            && other.origin().x() <= self.lower_right().x()
            && self.origin().y() <= other.lower_right().y()
            && other.origin().y() <= self.lower_right().y()
    }
}

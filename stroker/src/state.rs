// stroke-core/src/state.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The per-contour stroke state machine (spec §4.F): `StrokeState` consumes one contour's worth
//! of input curves and produces either one capped subpath (open contour) or two closed subpaths
//! (closed contour, inner and outer offsets).
//!
//! This generalizes the source library's `ContourStrokeToFill`/`OutlineStrokeToFill`
//! (`pathfinder_geometry::stroke`), which always writes both offset passes immediately and only
//! ever closes its single output contour the same way regardless of whether the input was open or
//! closed. Here the very first curve's two offsets are held back (`first`) rather than written:
//! whether a contour closes is only known once a `CLOSE` or the next `MOVE`/end-of-input arrives,
//! and a closed contour's first join may trim the first curve from *both* ends (once against its
//! neighbor during streaming, once against the wraparound join at `close_contours` time), which a
//! single eagerly-written copy could not retroactively shorten.
//!
//! Because of that double-sided trim, a closed contour's finished side sequence is assembled as
//! `[first curve] ++ [connector geometry recorded while it was held back] ++ [everything recorded
//! once streaming]` rather than appended in read order: the first curve's *final* geometry is only
//! known at `close_contours` time, but it still belongs at the front of the ring.

use arrayvec::ArrayVec;
use stroke_geometry::util::EPSILON;
use stroke_geometry::vecmath;

use crate::curve::Curve;
use crate::intersect;
use crate::join::{self, StrokeOp};
use crate::offset;
use crate::sink::Sink;
use crate::style::StrokeStyle;

/// Below this angle between two consecutive tangents, a join is "smooth": both sides are
/// connected by a straight line rather than a join/trim (spec §4.F, 5 degrees).
const SMOOTH_ANGLE: f32 = 0.0872665; // 5 degrees in radians

type Triple = (Curve, Curve, Curve);

pub struct StrokeState {
    style: StrokeStyle,
    half_width: f32,

    has_current_point: bool,
    has_current_curve: bool,
    is_first_curve: bool,

    /// `(c, l, r)`: the most recently added input curve and its two offsets, held back because
    /// the join at its end may still shorten `l` or `r`.
    pending: Option<Triple>,
    /// `(c0, l0, r0)`: the first non-degenerate curve of the contour and its offsets.
    first: Option<Triple>,

    /// Connector/join geometry recorded while `is_first_curve` was still true (i.e. generated by
    /// the join between the first and second curves), kept separate from `first` itself because
    /// it has to be replayed right after the first curve regardless of how `first` is ultimately
    /// trimmed. A join never emits more than three ops (`miter_clip`'s `a -> a1 -> b1 -> b`), so a
    /// fixed small capacity avoids a heap allocation for the common case.
    right_head: ArrayVec<[StrokeOp; 4]>,
    left_head: ArrayVec<[StrokeOp; 4]>,
    /// Everything recorded from the second `add_segments` call onward.
    right_body: Vec<StrokeOp>,
    left_body: Vec<StrokeOp>,
}

impl StrokeState {
    pub fn new(style: StrokeStyle) -> StrokeState {
        StrokeState {
            half_width: style.half_width(),
            style,
            has_current_point: false,
            has_current_curve: false,
            is_first_curve: false,
            pending: None,
            first: None,
            right_head: ArrayVec::new(),
            left_head: ArrayVec::new(),
            right_body: vec![],
            left_body: vec![],
        }
    }

    #[inline]
    pub fn has_current_point(&self) -> bool {
        self.has_current_point
    }

    #[inline]
    pub fn has_current_curve(&self) -> bool {
        self.has_current_curve
    }

    /// Resets all per-contour state for a new `MOVE`.
    pub fn begin_contour(&mut self) {
        self.clear();
        self.has_current_point = true;
    }

    /// Resets per-contour state once a contour has been flushed (by `close_contours` or
    /// `cap_and_connect_contours`), so a later end-of-input check doesn't flush it twice.
    pub fn finish_contour(&mut self) {
        self.clear();
    }

    fn clear(&mut self) {
        self.has_current_point = false;
        self.has_current_curve = false;
        self.is_first_curve = false;
        self.pending = None;
        self.first = None;
        self.right_head.clear();
        self.left_head.clear();
        self.right_body.clear();
        self.left_body.clear();
    }

    /// Adds one non-degenerate input curve to the contour (spec §4.F `add_curve`).
    pub fn add_curve(&mut self, curve: Curve) {
        let l = offset::offset(&curve, self.half_width);
        let r = offset::offset(&curve, -self.half_width);

        if self.pending.is_none() {
            self.pending = Some((curve, l, r));
            self.first = Some((curve, l, r));
            self.is_first_curve = true;
            self.has_current_curve = true;
            return;
        }

        self.add_segments(curve, l, r);
        self.is_first_curve = false;
    }

    /// Joins the pending curve to the incoming one `k` (with precomputed offsets `l_k`/`r_k`),
    /// trimming the inner side and inserting a join on the outer side, then makes `(k, l_k, r_k)`
    /// (possibly trimmed) the new pending triple (spec §4.F `add_segments`).
    fn add_segments(&mut self, k: Curve, l_k: Curve, r_k: Curve) {
        let (c, l, r) = self.pending.expect("add_segments requires a pending curve");

        let tan1 = c.end_tangent();
        let tan2 = k.start_tangent();
        let alpha = vecmath::angle_between(tan1, tan2);
        let corner = k.start_point();

        let (new_l, new_r);
        if alpha.abs() < SMOOTH_ANGLE {
            self.emit_right(r);
            self.connect_right(r.end_point(), r_k.start_point());
            self.emit_left(l);
            self.connect_left(l.end_point(), l_k.start_point());
            new_l = l_k;
            new_r = r_k;
        } else if alpha > 0.0 {
            // Left turn: the right offset is outer (gets a join), the left offset is inner (gets
            // trimmed at its self-intersection with the next curve's left offset).
            self.emit_right(r);
            let mut ops = vec![];
            join::join(&mut ops, &self.style, r.end_point(), tan1, r_k.start_point(), tan2, corner, alpha);
            self.push_right(ops);

            new_l = self.trim_inner(l, l_k, true);
            new_r = r_k;
        } else {
            // Right turn: symmetric, with sides swapped.
            self.emit_left(l);
            let mut ops = vec![];
            join::join(&mut ops, &self.style, l.end_point(), tan1, l_k.start_point(), tan2, corner, alpha);
            self.push_left(ops);

            new_r = self.trim_inner(r, r_k, false);
            new_l = l_k;
        }

        self.pending = Some((k, new_l, new_r));
    }

    /// Trims `inner` (the pending curve's inner-side offset) and `inner_k` (the incoming curve's
    /// inner-side offset) at their first mutual intersection, emitting the trimmed prefix of
    /// `inner`; falls back to a straight connector when no intersection is found (spec §4.F, §7).
    /// Returns the trimmed suffix of `inner_k`, which becomes the new pending inner offset.
    fn trim_inner(&mut self, inner: Curve, inner_k: Curve, is_left: bool) -> Curve {
        let hit = intersect::intersect(&inner, &inner_k, 1)
            .into_iter()
            .find(|hit| hit.t_a > 0.0 && hit.t_a < 1.0 && hit.t_b > 0.0 && hit.t_b < 1.0);

        match hit {
            Some(hit) => {
                let trimmed = inner.segment(0.0, hit.t_a);
                if is_left {
                    self.emit_left(trimmed);
                } else {
                    self.emit_right(trimmed);
                }
                inner_k.segment(hit.t_b, 1.0)
            }
            None => {
                if is_left {
                    self.emit_left(inner);
                    self.connect_left(inner.end_point(), inner_k.start_point());
                } else {
                    self.emit_right(inner);
                    self.connect_right(inner.end_point(), inner_k.start_point());
                }
                inner_k
            }
        }
    }

    /// "Emit" a side's pending offset curve (spec §4.F): held back into `first` while this is
    /// still the contour's first curve, otherwise appended to the body in progress.
    fn emit_right(&mut self, curve: Curve) {
        if self.is_first_curve {
            self.first.as_mut().expect("first curve not set").2 = curve;
        } else {
            self.right_body.push(StrokeOp::Curve(curve));
        }
    }

    fn emit_left(&mut self, curve: Curve) {
        if self.is_first_curve {
            self.first.as_mut().expect("first curve not set").1 = curve;
        } else {
            self.left_body.push(StrokeOp::Curve(curve));
        }
    }

    fn connect_right(&mut self, from: stroke_geometry::vector::Vector2F, to: stroke_geometry::vector::Vector2F) {
        if !from.approx_eq(to, EPSILON) {
            self.push_right(vec![StrokeOp::Curve(Curve::line(from, to))]);
        }
    }

    fn connect_left(&mut self, from: stroke_geometry::vector::Vector2F, to: stroke_geometry::vector::Vector2F) {
        if !from.approx_eq(to, EPSILON) {
            self.push_left(vec![StrokeOp::Curve(Curve::line(from, to))]);
        }
    }

    fn push_right(&mut self, ops: Vec<StrokeOp>) {
        if self.is_first_curve {
            self.right_head.extend(ops);
        } else {
            self.right_body.extend(ops);
        }
    }

    fn push_left(&mut self, ops: Vec<StrokeOp>) {
        if self.is_first_curve {
            self.left_head.extend(ops);
        } else {
            self.left_body.extend(ops);
        }
    }

    /// Closes the contour (spec §4.F `close_contours`): joins the last curve back to the first,
    /// then hands the two trimmed offset contours to `sink` as separate, independently closed
    /// subpaths (spec P4).
    pub fn close_contours<S: Sink>(&mut self, sink: &mut S) {
        if self.pending.is_none() {
            return;
        }
        let (c0, l0, r0) = self.first.expect("pending curve implies a first curve");
        self.add_segments(c0, l0, r0);

        // The wraparound join's bookkeeping reassigns `pending` to `(c0, trimmed l0, trimmed
        // r0)`; that final value *is* the first curve's finished geometry.
        self.first = self.pending.take();
        let (_, l0_final, r0_final) = self.first.expect("close_contours always resolves a first curve");

        let mut right = vec![StrokeOp::Curve(r0_final)];
        right.extend(self.right_head.drain(..));
        right.extend(self.right_body.drain(..));

        let mut left = vec![StrokeOp::Curve(l0_final)];
        left.extend(self.left_head.drain(..));
        left.extend(self.left_body.drain(..));

        emit_subpath(sink, &right);
        emit_subpath(sink, &left);
    }

    /// Finishes an open contour (spec §4.F `cap_and_connect_contours`): caps both ends and
    /// stitches the two offset contours into a single closed ring (spec P4).
    pub fn cap_and_connect_contours<S: Sink>(&mut self, sink: &mut S) {
        if self.pending.is_none() {
            return;
        }
        let (_, first_l, first_r) = self.first.expect("pending curve implies a first curve");
        let (_, last_l, last_r) = self.pending.expect("checked above");

        let mut right = vec![];
        let mut left = vec![];
        if !self.is_first_curve {
            right.extend(self.right_head.drain(..));
            right.extend(self.right_body.drain(..));
            left.extend(self.left_head.drain(..));
            left.extend(self.left_body.drain(..));
        }
        right.push(StrokeOp::Curve(last_r));
        left.push(StrokeOp::Curve(last_l));

        let mut end_cap = vec![];
        join::cap(&mut end_cap, &self.style, self.half_width, last_r.end_point(), last_l.end_point(), last_r.end_tangent());
        right.extend(end_cap);

        right.extend(left.iter().rev().map(StrokeOp::reverse));

        if !self.is_first_curve {
            right.push(StrokeOp::Curve(first_l.reverse()));
        }

        let mut start_cap = vec![];
        let outward = first_l.start_tangent().scale(-1.0);
        join::cap(&mut start_cap, &self.style, self.half_width, first_l.start_point(), first_r.start_point(), outward);
        right.extend(start_cap);

        if !self.is_first_curve {
            right.push(StrokeOp::Curve(first_r));
        }

        emit_subpath(sink, &right);
    }
}

fn emit_subpath<S: Sink>(sink: &mut S, ops: &[StrokeOp]) {
    if ops.is_empty() {
        return;
    }
    sink.move_to(ops[0].start_point());
    for op in ops {
        op.append_to(sink);
    }
    sink.close();
}

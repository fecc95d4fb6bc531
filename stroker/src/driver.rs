// stroke-core/src/driver.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Driving a source path into a [`StrokeState`] (spec §4.G) and the public [`stroke`] entry
//! point (spec §6).

use log::warn;
use smallvec::SmallVec;
use stroke_geometry::util::EPSILON;
use stroke_geometry::vector::Vector2F;

use crate::curve::Curve;
use crate::sink::Sink;
use crate::state::StrokeState;
use crate::style::StrokeStyle;
use crate::subdivision;

/// One primitive of a source path, in drawing order, with an implicit current point (the
/// endpoint of the previous op, or the most recent `MoveTo`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathOp {
    MoveTo(Vector2F),
    LineTo(Vector2F),
    CubicTo(Vector2F, Vector2F, Vector2F),
    ConicTo(Vector2F, Vector2F, f32),
    Close,
}

/// Strokes `path` with `style`, appending the resulting subpaths to `sink` (spec §6).
///
/// `path` must be a finite sequence; the core does not support infinite paths. A well-formed path
/// starts with `MoveTo`; any primitive encountered before the first `MoveTo` is ignored (there is
/// no current point to build a segment from).
pub fn stroke<I, S>(path: I, style: &StrokeStyle, sink: &mut S)
where
    I: IntoIterator<Item = PathOp>,
    S: Sink,
{
    let mut state = StrokeState::new(*style);
    let mut current = Vector2F::zero();
    let mut contour_start = Vector2F::zero();

    for op in path {
        match op {
            PathOp::MoveTo(p) => {
                if state.has_current_point() {
                    state.cap_and_connect_contours(sink);
                }
                state.begin_contour();
                current = p;
                contour_start = p;
            }
            PathOp::LineTo(p) => {
                if !state.has_current_point() {
                    warn!("LineTo before the first MoveTo; ignoring");
                    continue;
                }
                add_curve_checked(&mut state, Curve::line(current, p));
                current = p;
            }
            PathOp::CubicTo(p1, p2, p3) => {
                if !state.has_current_point() {
                    warn!("CubicTo before the first MoveTo; ignoring");
                    continue;
                }
                add_subdivided(&mut state, Curve::cubic(current, p1, p2, p3));
                current = p3;
            }
            PathOp::ConicTo(p1, p2, weight) => {
                if !state.has_current_point() {
                    warn!("ConicTo before the first MoveTo; ignoring");
                    continue;
                }
                if !weight.is_finite() || weight <= 0.0 {
                    warn!("skipping conic with non-finite or non-positive weight");
                    current = p2;
                    continue;
                }
                add_subdivided(&mut state, Curve::conic(current, p1, p2, weight));
                current = p2;
            }
            PathOp::Close => {
                if !state.has_current_point() {
                    continue;
                }
                if !current.approx_eq(contour_start, EPSILON) {
                    add_curve_checked(&mut state, Curve::line(current, contour_start));
                }
                state.close_contours(sink);
                state.finish_contour();
                current = contour_start;
            }
        }
    }

    if state.has_current_point() {
        state.cap_and_connect_contours(sink);
    }
}

fn add_curve_checked(state: &mut StrokeState, curve: Curve) {
    if curve.is_degenerate() {
        warn!("skipping degenerate primitive");
        return;
    }
    if !curve_is_finite(&curve) {
        warn!("skipping primitive with non-finite control point");
        return;
    }
    state.add_curve(curve);
}

fn add_subdivided(state: &mut StrokeState, curve: Curve) {
    if curve.is_degenerate() {
        warn!("skipping degenerate primitive");
        return;
    }
    if !curve_is_finite(&curve) {
        warn!("skipping primitive with non-finite control point");
        return;
    }
    let mut pieces: SmallVec<[Curve; 8]> = SmallVec::new();
    subdivision::subdivide_simple(&curve, &mut pieces);
    for piece in pieces {
        state.add_curve(piece);
    }
}

fn curve_is_finite(curve: &Curve) -> bool {
    match *curve {
        Curve::Line { p0, p1 } => p0.is_finite() && p1.is_finite(),
        Curve::Cubic { p0, p1, p2, p3 } => {
            p0.is_finite() && p1.is_finite() && p2.is_finite() && p3.is_finite()
        }
        Curve::Conic { p0, p1, p2, weight } => {
            p0.is_finite() && p1.is_finite() && p2.is_finite() && weight.is_finite()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sink::test_sink::RecordedSink;
    use crate::style::{LineCap, LineJoin};

    #[test]
    fn test_open_path_produces_one_subpath() {
        let path = [
            PathOp::MoveTo(Vector2F::new(0.0, 0.0)),
            PathOp::LineTo(Vector2F::new(10.0, 0.0)),
        ];
        let style = StrokeStyle::new(2.0);
        let mut sink = RecordedSink::new();
        stroke(path, &style, &mut sink);
        assert_eq!(sink.subpaths().len(), 1);
    }

    #[test]
    fn test_closed_path_produces_two_subpaths() {
        let path = [
            PathOp::MoveTo(Vector2F::new(0.0, 0.0)),
            PathOp::LineTo(Vector2F::new(10.0, 0.0)),
            PathOp::LineTo(Vector2F::new(5.0, 8.0)),
            PathOp::Close,
        ];
        let style = StrokeStyle { line_join: LineJoin::Miter, miter_limit: 10.0, ..StrokeStyle::new(2.0) };
        let mut sink = RecordedSink::new();
        stroke(path, &style, &mut sink);
        assert_eq!(sink.subpaths().len(), 2);
    }

    #[test]
    fn test_two_open_subpaths_both_flush() {
        let path = [
            PathOp::MoveTo(Vector2F::new(0.0, 0.0)),
            PathOp::LineTo(Vector2F::new(10.0, 0.0)),
            PathOp::MoveTo(Vector2F::new(0.0, 20.0)),
            PathOp::LineTo(Vector2F::new(10.0, 20.0)),
        ];
        let style = StrokeStyle::new(2.0);
        let mut sink = RecordedSink::new();
        stroke(path, &style, &mut sink);
        assert_eq!(sink.subpaths().len(), 2);
    }

    #[test]
    fn test_degenerate_line_is_skipped() {
        let path = [
            PathOp::MoveTo(Vector2F::new(0.0, 0.0)),
            PathOp::LineTo(Vector2F::new(0.0, 0.0)),
            PathOp::LineTo(Vector2F::new(10.0, 0.0)),
        ];
        let style = StrokeStyle::new(2.0);
        let mut sink = RecordedSink::new();
        stroke(path, &style, &mut sink);
        assert_eq!(sink.subpaths().len(), 1);
    }

    #[test]
    fn test_sharp_spike_exceeds_miter_limit_and_bevels() {
        let path = [
            PathOp::MoveTo(Vector2F::new(0.0, 0.0)),
            PathOp::LineTo(Vector2F::new(10.0, 0.0)),
            PathOp::LineTo(Vector2F::new(0.0, 0.1)),
        ];
        let style = StrokeStyle {
            line_join: LineJoin::Miter,
            miter_limit: 4.0,
            line_cap: LineCap::Butt,
            ..StrokeStyle::new(2.0)
        };
        let mut sink = RecordedSink::new();
        stroke(path, &style, &mut sink);
        assert_eq!(sink.subpaths().len(), 1);
    }

    #[test]
    fn test_empty_path_emits_nothing() {
        let path: [PathOp; 0] = [];
        let style = StrokeStyle::new(2.0);
        let mut sink = RecordedSink::new();
        stroke(path, &style, &mut sink);
        assert!(sink.ops.is_empty());
    }
}

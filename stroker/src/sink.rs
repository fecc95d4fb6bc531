// stroke-core/src/sink.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The output-side contract (spec §6): a `Sink` trait the stroker appends finished subpaths to.
//!
//! The stroker never flattens curves and never converts arcs to Béziers itself (spec §15): a
//! round join or cap is handed to the sink as `svg_arc_to`, mirroring the source library's
//! `Contour::push_svg_arc`, which likewise keeps arc math separate from whatever primitive the
//! consumer ultimately stores Béziers as.

use stroke_geometry::vector::Vector2F;

use crate::curve::Curve;

/// Direction a round join or cap sweeps, mirroring the SVG arc `sweep-flag` (spec §4.E: positive
/// turn angle sweeps the large-arc-flag-0 way, i.e. `Positive`; negative sweeps `Negative`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArcSweep {
    Positive,
    Negative,
}

impl ArcSweep {
    #[inline]
    pub fn flipped(self) -> ArcSweep {
        match self {
            ArcSweep::Positive => ArcSweep::Negative,
            ArcSweep::Negative => ArcSweep::Positive,
        }
    }
}

/// A path builder that the stroker appends finished subpaths to (spec §6).
///
/// The core only ever *appends*: the sink's state before and after a `stroke()` call is the
/// caller's responsibility.
pub trait Sink {
    fn move_to(&mut self, to: Vector2F);
    fn line_to(&mut self, to: Vector2F);
    fn curve_to(&mut self, ctrl1: Vector2F, ctrl2: Vector2F, to: Vector2F);
    fn conic_to(&mut self, ctrl: Vector2F, to: Vector2F, weight: f32);
    fn svg_arc_to(
        &mut self,
        radius: Vector2F,
        x_axis_rotation: f32,
        large_arc: bool,
        sweep: ArcSweep,
        to: Vector2F,
    );
    fn close(&mut self);
}

/// Appends `curve` to `sink`, assuming the sink's current point already sits at `curve`'s start.
pub fn push_curve<S: Sink + ?Sized>(curve: &Curve, sink: &mut S) {
    match *curve {
        Curve::Line { p1, .. } => sink.line_to(p1),
        Curve::Cubic { p1, p2, p3, .. } => sink.curve_to(p1, p2, p3),
        Curve::Conic { p1, p2, weight, .. } => sink.conic_to(p1, p2, weight),
    }
}

#[cfg(test)]
pub(crate) mod test_sink {
    use super::*;
    use bitflags::bitflags;

    bitflags! {
        /// Flags recorded alongside each op in a `RecordedSink`, mirroring the source library's
        /// `PointFlags`/`SegmentFlags` bitflags convention.
        pub struct OpFlags: u8 {
            const FIRST_IN_SUBPATH = 0x01;
            const CLOSES_SUBPATH = 0x02;
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    pub enum RecordedOp {
        MoveTo(Vector2F),
        LineTo(Vector2F),
        CurveTo(Vector2F, Vector2F, Vector2F),
        ConicTo(Vector2F, Vector2F, f32),
        ArcTo(Vector2F, f32, bool, ArcSweep, Vector2F),
        Close,
    }

    /// A minimal in-memory `Sink` used only by this crate's own tests.
    #[derive(Clone, Debug, Default)]
    pub struct RecordedSink {
        pub ops: Vec<RecordedOp>,
        pub flags: Vec<OpFlags>,
    }

    impl RecordedSink {
        pub fn new() -> RecordedSink {
            RecordedSink::default()
        }

        fn push(&mut self, op: RecordedOp, flags: OpFlags) {
            self.ops.push(op);
            self.flags.push(flags);
        }

        /// Splits the recorded ops into subpaths, each running from a `MoveTo` through its
        /// matching `Close`.
        pub fn subpaths(&self) -> Vec<&[RecordedOp]> {
            let mut out = vec![];
            let mut start = 0;
            for (i, op) in self.ops.iter().enumerate() {
                if *op == RecordedOp::Close {
                    out.push(&self.ops[start..=i]);
                    start = i + 1;
                }
            }
            out
        }
    }

    impl Sink for RecordedSink {
        fn move_to(&mut self, to: Vector2F) {
            self.push(RecordedOp::MoveTo(to), OpFlags::FIRST_IN_SUBPATH);
        }

        fn line_to(&mut self, to: Vector2F) {
            self.push(RecordedOp::LineTo(to), OpFlags::empty());
        }

        fn curve_to(&mut self, ctrl1: Vector2F, ctrl2: Vector2F, to: Vector2F) {
            self.push(RecordedOp::CurveTo(ctrl1, ctrl2, to), OpFlags::empty());
        }

        fn conic_to(&mut self, ctrl: Vector2F, to: Vector2F, weight: f32) {
            self.push(RecordedOp::ConicTo(ctrl, to, weight), OpFlags::empty());
        }

        fn svg_arc_to(
            &mut self,
            radius: Vector2F,
            x_axis_rotation: f32,
            large_arc: bool,
            sweep: ArcSweep,
            to: Vector2F,
        ) {
            self.push(
                RecordedOp::ArcTo(radius, x_axis_rotation, large_arc, sweep, to),
                OpFlags::empty(),
            );
        }

        fn close(&mut self) {
            self.push(RecordedOp::Close, OpFlags::CLOSES_SUBPATH);
        }
    }
}

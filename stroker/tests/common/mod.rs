// Shared test-only `Sink` for the integration tests in this directory. The crate's own
// `RecordedSink` (in `src/sink.rs`) is `#[cfg(test)]`-gated to the crate's unit tests and isn't
// visible from here, so integration tests get their own minimal recorder.

use stroke_core::{ArcSweep, Sink};
use stroke_geometry::vector::Vector2F;

#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    MoveTo(Vector2F),
    LineTo(Vector2F),
    CurveTo(Vector2F, Vector2F, Vector2F),
    ConicTo(Vector2F, Vector2F, f32),
    ArcTo(Vector2F, f32, bool, ArcSweep, Vector2F),
    Close,
}

#[derive(Clone, Debug, Default)]
pub struct RecordedSink {
    pub ops: Vec<Op>,
}

impl RecordedSink {
    pub fn new() -> RecordedSink {
        RecordedSink::default()
    }

    /// Splits the recorded ops into subpaths, each spanning a `MoveTo` through its `Close`.
    pub fn subpaths(&self) -> Vec<&[Op]> {
        let mut out = vec![];
        let mut start = 0;
        for (i, op) in self.ops.iter().enumerate() {
            if *op == Op::Close {
                out.push(&self.ops[start..=i]);
                start = i + 1;
            }
        }
        out
    }

    /// The straight-line vertices of a subpath (`MoveTo`/`LineTo` endpoints only), in order.
    pub fn vertices(ops: &[Op]) -> Vec<Vector2F> {
        ops.iter()
            .filter_map(|op| match op {
                Op::MoveTo(p) | Op::LineTo(p) => Some(*p),
                _ => None,
            })
            .collect()
    }
}

impl Sink for RecordedSink {
    fn move_to(&mut self, to: Vector2F) {
        self.ops.push(Op::MoveTo(to));
    }

    fn line_to(&mut self, to: Vector2F) {
        self.ops.push(Op::LineTo(to));
    }

    fn curve_to(&mut self, ctrl1: Vector2F, ctrl2: Vector2F, to: Vector2F) {
        self.ops.push(Op::CurveTo(ctrl1, ctrl2, to));
    }

    fn conic_to(&mut self, ctrl: Vector2F, to: Vector2F, weight: f32) {
        self.ops.push(Op::ConicTo(ctrl, to, weight));
    }

    fn svg_arc_to(&mut self, radius: Vector2F, x_axis_rotation: f32, large_arc: bool, sweep: ArcSweep, to: Vector2F) {
        self.ops.push(Op::ArcTo(radius, x_axis_rotation, large_arc, sweep, to));
    }

    fn close(&mut self) {
        self.ops.push(Op::Close);
    }
}

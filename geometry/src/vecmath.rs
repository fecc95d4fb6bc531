// stroke-geometry/src/vecmath.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Small vector-geometry utilities shared by the offset, simplicity-test, and join/cap modules:
//! tangents, normals, signed angles between directions, and line–line intersection.

use crate::util::EPSILON;
use crate::vector::Vector2F;

/// The unit tangent direction from `a` to `b`.
///
/// `a` and `b` must not coincide; producers are responsible for guarding against that (spec §3).
#[inline]
pub fn tangent(a: Vector2F, b: Vector2F) -> Vector2F {
    (b - a).normalize()
}

/// The unit normal of the line from `a` to `b`, rotated 90° to the left of the direction of
/// travel (spec §4.A: `normalize((a.y-b.y, b.x-a.x))`).
#[inline]
pub fn normal(a: Vector2F, b: Vector2F) -> Vector2F {
    tangent(a, b).rotate_left()
}

/// The signed angle, in `(-π, π]`, from `t1` to `t2`.
///
/// Positive means a left turn, negative a right turn, values near zero mean "going straight".
#[inline]
pub fn angle_between(t1: Vector2F, t2: Vector2F) -> f32 {
    let mut angle = f32::atan2(t2.y(), t2.x()) - f32::atan2(t1.y(), t1.x());
    while angle > std::f32::consts::PI {
        angle -= 2.0 * std::f32::consts::PI;
    }
    while angle <= -std::f32::consts::PI {
        angle += 2.0 * std::f32::consts::PI;
    }
    angle
}

/// Intersects the line through `a` in direction `dir_a` with the line through `c` in direction
/// `dir_c`. Returns `None` when the two directions are parallel (`|det| <= EPSILON`).
#[inline]
pub fn line_intersect(a: Vector2F, dir_a: Vector2F, c: Vector2F, dir_c: Vector2F) -> Option<Vector2F> {
    let denom = dir_a.det(dir_c);
    if denom.abs() <= EPSILON {
        return None;
    }
    let diff = c - a;
    let t = diff.det(dir_c) / denom;
    Some(a + dir_a.scale(t))
}

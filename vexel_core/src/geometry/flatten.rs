// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
//! Module: adaptive path flattening
//!
//! Reduces the command stream to per-subpath polylines. Cubics subdivide at
//! the midpoint until both control points sit within the flatness tolerance
//! of the chord; arcs and ellipses go through the four-cubic quadrant
//! decomposition first.

use smallvec::SmallVec;
use std::f64::consts::{FRAC_PI_2, TAU};

use crate::geometry::path::{Path, PathCommand};
use crate::types::{Point, GEOM_EPSILON};

/// Default flatness tolerance in device pixels.
pub const DEFAULT_TOLERANCE: f64 = 0.25;

/// Recursion cap for cubic subdivision.
const MAX_DEPTH: u32 = 18;

/// One flattened subpath.
#[derive(Debug, Clone, Default)]
pub struct FlatSubpath {
    /// Polyline vertices in order
    pub points: Vec<Point>,
    /// Whether the subpath was closed explicitly
    pub closed: bool,
}

impl FlatSubpath {
    /// Shoelace signed area, treating the polyline as closed.
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.points)
    }
}

/// Shoelace signed area of a closed polygon.
pub fn signed_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        sum += a.cross(b);
    }
    sum * 0.5
}

/// Flatten a path into polylines within `tolerance`.
///
/// A subpath starting without a `MoveTo` gets an implicit one at the
/// origin. `Close` marks the subpath closed; the closing segment itself is
/// implied by the `closed` flag rather than duplicated in `points`.
pub fn flatten_path(path: &Path, tolerance: f64) -> Vec<FlatSubpath> {
    let tol = if tolerance > 0.0 { tolerance } else { DEFAULT_TOLERANCE };
    let mut subpaths = Vec::new();
    let mut current = FlatSubpath::default();
    let mut cursor = Point::ZERO;

    let mut flush = |sub: &mut FlatSubpath, subpaths: &mut Vec<FlatSubpath>| {
        if sub.points.len() > 1 {
            subpaths.push(std::mem::take(sub));
        } else {
            sub.points.clear();
            sub.closed = false;
        }
    };

    for cmd in &path.commands {
        match *cmd {
            PathCommand::MoveTo(p) => {
                flush(&mut current, &mut subpaths);
                current.points.push(p);
                cursor = p;
            }
            PathCommand::LineTo(p) => {
                if current.points.is_empty() {
                    current.points.push(cursor);
                }
                push_vertex(&mut current.points, p);
                cursor = p;
            }
            PathCommand::CubicTo(c1, c2, p) => {
                if current.points.is_empty() {
                    current.points.push(cursor);
                }
                flatten_cubic(cursor, c1, c2, p, tol, 0, &mut current.points);
                cursor = p;
            }
            PathCommand::Arc { center, radius, start_angle, end_angle, ccw } => {
                cursor = flatten_arc(
                    &mut current.points,
                    cursor,
                    center,
                    radius,
                    radius,
                    0.0,
                    start_angle,
                    end_angle,
                    ccw,
                    tol,
                );
            }
            PathCommand::Ellipse {
                center,
                radius_x,
                radius_y,
                rotation,
                start_angle,
                end_angle,
            } => {
                cursor = flatten_arc(
                    &mut current.points,
                    cursor,
                    center,
                    radius_x,
                    radius_y,
                    rotation,
                    start_angle,
                    end_angle,
                    false,
                    tol,
                );
            }
            PathCommand::Close => {
                if !current.points.is_empty() {
                    cursor = current.points[0];
                    current.closed = true;
                    flush(&mut current, &mut subpaths);
                }
            }
        }
    }
    flush(&mut current, &mut subpaths);
    subpaths
}

/// Reorder subpaths by |signed area| descending.
///
/// Glyph outlines with inconsistent winding fill correctly under even-odd
/// when outer contours rasterize before the holes they contain.
pub fn sort_subpaths_by_area(subpaths: &mut [FlatSubpath]) {
    subpaths.sort_by(|a, b| {
        b.signed_area()
            .abs()
            .partial_cmp(&a.signed_area().abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

fn push_vertex(points: &mut Vec<Point>, p: Point) {
    if let Some(&last) = points.last() {
        if last.distance_squared(p) < GEOM_EPSILON * GEOM_EPSILON {
            return;
        }
    }
    points.push(p);
}

fn flatten_cubic(
    p0: Point,
    c1: Point,
    c2: Point,
    p3: Point,
    tolerance: f64,
    depth: u32,
    out: &mut Vec<Point>,
) {
    if depth >= MAX_DEPTH || cubic_flat_enough(p0, c1, c2, p3, tolerance) {
        push_vertex(out, p3);
        return;
    }
    let (first, second) = split_cubic(p0, c1, c2, p3);
    flatten_cubic(first.p0, first.c1, first.c2, first.p3, tolerance, depth + 1, out);
    flatten_cubic(second.p0, second.c1, second.c2, second.p3, tolerance, depth + 1, out);
}

fn cubic_flat_enough(p0: Point, c1: Point, c2: Point, p3: Point, tol: f64) -> bool {
    let d1 = point_line_distance_sq(c1, p0, p3);
    let d2 = point_line_distance_sq(c2, p0, p3);
    d1 <= tol * tol && d2 <= tol * tol
}

fn point_line_distance_sq(p: Point, a: Point, b: Point) -> f64 {
    let v = b - a;
    let len_sq = v.dot(v);
    if len_sq < GEOM_EPSILON {
        return p.distance_squared(a);
    }
    let u = (p - a).dot(v) / len_sq;
    p.distance_squared(a.lerp(b, u.clamp(0.0, 1.0)))
}

/// One cubic Bézier segment with its start point.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CubicSeg {
    /// Start point
    pub p0: Point,
    /// First control point
    pub c1: Point,
    /// Second control point
    pub c2: Point,
    /// End point
    pub p3: Point,
}

/// De Casteljau split at t = 0.5.
fn split_cubic(p0: Point, c1: Point, c2: Point, p3: Point) -> (CubicSeg, CubicSeg) {
    let m1 = p0.midpoint(c1);
    let m2 = c1.midpoint(c2);
    let m3 = c2.midpoint(p3);
    let m4 = m1.midpoint(m2);
    let m5 = m2.midpoint(m3);
    let m6 = m4.midpoint(m5);
    (
        CubicSeg { p0, c1: m1, c2: m4, p3: m6 },
        CubicSeg { p0: m6, c1: m5, c2: m3, p3 },
    )
}

/// Point on a rotated ellipse at parameter `angle`.
pub(crate) fn ellipse_point(center: Point, rx: f64, ry: f64, rotation: f64, angle: f64) -> Point {
    let (sin_a, cos_a) = angle.sin_cos();
    let local = Point::new(rx * cos_a, ry * sin_a);
    center + local.rotate(rotation)
}

fn ellipse_derivative(rx: f64, ry: f64, rotation: f64, angle: f64) -> Point {
    let (sin_a, cos_a) = angle.sin_cos();
    Point::new(-rx * sin_a, ry * cos_a).rotate(rotation)
}

/// Normalize an arc's angular range into `(start, sweep)`.
///
/// Canvas semantics: equal angles are a zero arc; a span of a full turn or
/// more is exactly one turn; otherwise the sweep runs from start toward
/// `end_angle` in the requested direction.
pub(crate) fn arc_sweep(start_angle: f64, end_angle: f64, ccw: bool) -> (f64, f64) {
    let span = end_angle - start_angle;
    if span == 0.0 {
        return (start_angle, 0.0);
    }
    if span.abs() >= TAU {
        return (start_angle, if ccw { -TAU } else { TAU });
    }
    let sweep = if ccw {
        let d = span.rem_euclid(TAU);
        if d == 0.0 { 0.0 } else { d - TAU }
    } else {
        span.rem_euclid(TAU)
    };
    (start_angle, sweep)
}

/// Convert an arc of a rotated ellipse into cubic segments.
///
/// Splits the sweep into quarter-turn pieces, each approximated with the
/// `4/3 * tan(sweep/4)` control-point distance.
pub(crate) fn arc_cubics(
    center: Point,
    rx: f64,
    ry: f64,
    rotation: f64,
    start_angle: f64,
    end_angle: f64,
    ccw: bool,
) -> SmallVec<[CubicSeg; 4]> {
    let mut out = SmallVec::new();
    if rx <= 0.0 || ry <= 0.0 {
        return out;
    }
    let (start, sweep) = arc_sweep(start_angle, end_angle, ccw);
    if sweep == 0.0 {
        return out;
    }
    let segments = (sweep.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
    let delta = sweep / segments as f64;
    let kappa = 4.0 / 3.0 * (delta / 4.0).tan();
    let mut a0 = start;
    for _ in 0..segments {
        let a1 = a0 + delta;
        let p0 = ellipse_point(center, rx, ry, rotation, a0);
        let p3 = ellipse_point(center, rx, ry, rotation, a1);
        let c1 = p0 + ellipse_derivative(rx, ry, rotation, a0) * kappa;
        let c2 = p3 - ellipse_derivative(rx, ry, rotation, a1) * kappa;
        out.push(CubicSeg { p0, c1, c2, p3 });
        a0 = a1;
    }
    out
}

/// Flatten an arc into `points`, connecting from `cursor` with a line when
/// a subpath is already open. Returns the new cursor.
#[allow(clippy::too_many_arguments)]
fn flatten_arc(
    points: &mut Vec<Point>,
    cursor: Point,
    center: Point,
    rx: f64,
    ry: f64,
    rotation: f64,
    start_angle: f64,
    end_angle: f64,
    ccw: bool,
    tolerance: f64,
) -> Point {
    let segs = arc_cubics(center, rx, ry, rotation, start_angle, end_angle, ccw);
    let Some(first) = segs.first() else {
        return cursor;
    };
    if points.is_empty() {
        points.push(first.p0);
    } else {
        push_vertex(points, first.p0);
    }
    let mut end = first.p0;
    for seg in &segs {
        flatten_cubic(seg.p0, seg.c1, seg.c2, seg.p3, tolerance, 0, points);
        end = seg.p3;
    }
    end
}

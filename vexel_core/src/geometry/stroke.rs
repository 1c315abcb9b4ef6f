// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
//! Module: stroke outline expansion
//!
//! Turns a path into a fillable outline: the input is flattened, optionally
//! dashed, then each polyline is offset on both sides at half the stroke
//! width with joins at interior vertices and caps at open ends. Round joins
//! and caps are emitted as symbolic arcs so the flattener owns all curve
//! subdivision. The outline fills correctly under the non-zero rule.

use crate::geometry::flatten::flatten_path;
use crate::geometry::path::{Path, PathCommand};
use crate::types::{LineCap, LineJoin, Point, GEOM_EPSILON};

/// Stroke parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    /// Stroke width; non-positive widths stroke nothing
    pub width: f64,
    /// End-cap shape for open subpaths
    pub cap: LineCap,
    /// Corner shape at interior vertices
    pub join: LineJoin,
    /// Miter length ratio above which miters fall back to bevel
    pub miter_limit: f64,
    /// Dash lengths, alternating on/off; empty or all-zero means solid
    pub dash_pattern: Vec<f64>,
    /// Starting offset into the dash pattern
    pub dash_offset: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            cap: LineCap::default(),
            join: LineJoin::default(),
            miter_limit: 10.0,
            dash_pattern: Vec::new(),
            dash_offset: 0.0,
        }
    }
}

impl StrokeStyle {
    fn dashed(&self) -> bool {
        self.dash_pattern.iter().any(|&d| d > 0.0)
    }
}

/// Expand a path into its stroke outline.
///
/// Returns an empty path for non-positive widths or empty input.
pub fn stroke_path(path: &Path, style: &StrokeStyle, tolerance: f64) -> Path {
    if style.width <= 0.0 || path.is_empty() {
        if style.width <= 0.0 && !path.is_empty() {
            log::debug!("stroke skipped, width {} <= 0", style.width);
        }
        return Path::new();
    }
    let half = style.width / 2.0;
    let mut outline = Path::new();
    for sub in flatten_path(path, tolerance) {
        let points = dedup(&sub.points);
        if points.len() < 2 {
            if let Some(&p) = points.first() {
                if !style.dashed() {
                    cap_dot(&mut outline, p, half, style.cap);
                }
            }
            continue;
        }
        if style.dashed() {
            for piece in apply_dash(&points, sub.closed, &style.dash_pattern, style.dash_offset) {
                let piece = dedup(&piece);
                if piece.len() >= 2 {
                    outline_open(&mut outline, &piece, half, style);
                }
            }
        } else if sub.closed && points.len() >= 3 {
            outline_closed(&mut outline, &points, half, style);
        } else {
            outline_open(&mut outline, &points, half, style);
        }
    }
    outline
}

fn dedup(points: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if let Some(&last) = out.last() {
            if last.distance_squared(p) < GEOM_EPSILON * GEOM_EPSILON {
                continue;
            }
        }
        out.push(p);
    }
    out
}

/// Left-hand offset of a unit direction, scaled to `h`.
#[inline]
fn offset_of(dir: Point, h: f64) -> Point {
    Point::new(dir.y * h, -dir.x * h)
}

fn segment_dirs(points: &[Point], closed: bool) -> Vec<Point> {
    let n = points.len();
    let count = if closed { n } else { n - 1 };
    (0..count)
        .map(|i| (points[(i + 1) % n] - points[i]).normalized())
        .collect()
}

/// Outline one open polyline: forward on the offset side, end cap, back on
/// the opposite side, start cap, close.
fn outline_open(out: &mut Path, points: &[Point], h: f64, style: &StrokeStyle) {
    let n = points.len();
    let dirs = segment_dirs(points, false);
    let offs: Vec<Point> = dirs.iter().map(|&d| offset_of(d, h)).collect();

    out.commands.push(PathCommand::MoveTo(points[0] + offs[0]));
    for i in 1..n - 1 {
        join_at(out, points[i], dirs[i - 1], dirs[i], offs[i - 1], offs[i], h, style);
    }
    out.commands.push(PathCommand::LineTo(points[n - 1] + offs[n - 2]));
    cap_at(out, points[n - 1], dirs[n - 2], offs[n - 2], h, style.cap);
    for i in (1..n - 1).rev() {
        join_at(
            out,
            points[i],
            dirs[i] * -1.0,
            dirs[i - 1] * -1.0,
            offs[i] * -1.0,
            offs[i - 1] * -1.0,
            h,
            style,
        );
    }
    out.commands.push(PathCommand::LineTo(points[0] - offs[0]));
    cap_at(out, points[0], dirs[0] * -1.0, offs[0] * -1.0, h, style.cap);
    out.commands.push(PathCommand::Close);
}

/// Outline one closed polyline as two rings with opposite orientation.
fn outline_closed(out: &mut Path, points: &[Point], h: f64, style: &StrokeStyle) {
    let n = points.len();
    let dirs = segment_dirs(points, true);
    let offs: Vec<Point> = dirs.iter().map(|&d| offset_of(d, h)).collect();

    // outer ring, forward
    out.commands.push(PathCommand::MoveTo(points[0] + offs[0]));
    for i in 1..n {
        join_at(out, points[i], dirs[i - 1], dirs[i], offs[i - 1], offs[i], h, style);
    }
    join_at(out, points[0], dirs[n - 1], dirs[0], offs[n - 1], offs[0], h, style);
    out.commands.push(PathCommand::Close);

    // inner ring, walked backward so it winds opposite
    out.commands.push(PathCommand::MoveTo(points[0] - offs[n - 1]));
    for i in (1..n).rev() {
        join_at(
            out,
            points[i],
            dirs[i % n] * -1.0,
            dirs[i - 1] * -1.0,
            offs[i % n] * -1.0,
            offs[i - 1] * -1.0,
            h,
            style,
        );
    }
    join_at(
        out,
        points[0],
        dirs[0] * -1.0,
        dirs[n - 1] * -1.0,
        offs[0] * -1.0,
        offs[n - 1] * -1.0,
        h,
        style,
    );
    out.commands.push(PathCommand::Close);
}

/// Connect the offset corner at vertex `v` between two segments.
///
/// The configured join applies on the outer side of the turn; the inner
/// side gets a straight connection, whose overlap the non-zero fill
/// absorbs.
#[allow(clippy::too_many_arguments)]
fn join_at(
    out: &mut Path,
    v: Point,
    d_in: Point,
    d_out: Point,
    off_in: Point,
    off_out: Point,
    h: f64,
    style: &StrokeStyle,
) {
    let a = v + off_in;
    let b = v + off_out;
    out.commands.push(PathCommand::LineTo(a));
    let cross = d_in.cross(d_out);
    if cross.abs() < GEOM_EPSILON {
        out.commands.push(PathCommand::LineTo(b));
        return;
    }
    // walking with left-hand offsets, a positive cross turns away from them
    let outer = cross > 0.0;
    if !outer {
        out.commands.push(PathCommand::LineTo(b));
        return;
    }
    match style.join {
        LineJoin::Bevel => {
            out.commands.push(PathCommand::LineTo(b));
        }
        LineJoin::Miter => {
            let t = (b - a).cross(d_out) / cross;
            let m = a + d_in * t;
            if m.distance(v) / h > style.miter_limit {
                out.commands.push(PathCommand::LineTo(b));
            } else {
                out.commands.push(PathCommand::LineTo(m));
                out.commands.push(PathCommand::LineTo(b));
            }
        }
        LineJoin::Round => {
            push_arc_between(out, v, h, a, b);
        }
    }
}

/// Arc from `a` to `b` around `center`, the short way.
fn push_arc_between(out: &mut Path, center: Point, radius: f64, a: Point, b: Point) {
    let a0 = (a.y - center.y).atan2(a.x - center.x);
    let a1 = (b.y - center.y).atan2(b.x - center.x);
    let mut delta = a1 - a0;
    while delta > std::f64::consts::PI {
        delta -= std::f64::consts::TAU;
    }
    while delta < -std::f64::consts::PI {
        delta += std::f64::consts::TAU;
    }
    out.commands.push(PathCommand::Arc {
        center,
        radius,
        start_angle: a0,
        end_angle: a0 + delta,
        ccw: delta < 0.0,
    });
}

/// Cap the stroke at endpoint `e`; the walk arrives at `e + off` and the
/// cap must land on `e - off`.
fn cap_at(out: &mut Path, e: Point, dir: Point, off: Point, h: f64, cap: LineCap) {
    match cap {
        LineCap::Butt => {
            out.commands.push(PathCommand::LineTo(e - off));
        }
        LineCap::Square => {
            let ext = dir * h;
            out.commands.push(PathCommand::LineTo(e + off + ext));
            out.commands.push(PathCommand::LineTo(e - off + ext));
            out.commands.push(PathCommand::LineTo(e - off));
        }
        LineCap::Round => {
            let a0 = (off.y).atan2(off.x);
            out.commands.push(PathCommand::Arc {
                center: e,
                radius: h,
                start_angle: a0,
                end_angle: a0 + std::f64::consts::PI,
                ccw: false,
            });
        }
    }
}

/// A single-point subpath: round caps mark a dot, square caps a square,
/// butt caps nothing.
fn cap_dot(out: &mut Path, p: Point, h: f64, cap: LineCap) {
    match cap {
        LineCap::Butt => {}
        LineCap::Round => {
            out.commands.push(PathCommand::MoveTo(Point::new(p.x + h, p.y)));
            out.commands.push(PathCommand::Arc {
                center: p,
                radius: h,
                start_angle: 0.0,
                end_angle: std::f64::consts::TAU,
                ccw: false,
            });
            out.commands.push(PathCommand::Close);
        }
        LineCap::Square => {
            out.commands.push(PathCommand::MoveTo(Point::new(p.x - h, p.y - h)));
            out.commands.push(PathCommand::LineTo(Point::new(p.x + h, p.y - h)));
            out.commands.push(PathCommand::LineTo(Point::new(p.x + h, p.y + h)));
            out.commands.push(PathCommand::LineTo(Point::new(p.x - h, p.y + h)));
            out.commands.push(PathCommand::Close);
        }
    }
}

/// Split a polyline into its "on" runs under a dash pattern.
///
/// The phase starts at `offset` into the pattern and resets for every
/// subpath; closed polylines are walked around their closing segment and
/// their dashes come back as open runs.
fn apply_dash(points: &[Point], closed: bool, pattern: &[f64], offset: f64) -> Vec<Vec<Point>> {
    let pat: Vec<f64> = pattern.iter().map(|&d| d.max(0.0)).collect();
    let total: f64 = pat.iter().sum();
    if total <= 0.0 {
        let mut whole = points.to_vec();
        if closed {
            whole.push(points[0]);
        }
        return vec![whole];
    }

    let mut idx = 0usize;
    let mut remaining = {
        let mut phase = offset.rem_euclid(total);
        while phase >= pat[idx] {
            phase -= pat[idx];
            idx = (idx + 1) % pat.len();
        }
        pat[idx] - phase
    };
    let mut on = idx % 2 == 0;

    let mut pieces: Vec<Vec<Point>> = Vec::new();
    let mut piece: Vec<Point> = Vec::new();
    if on {
        piece.push(points[0]);
    }

    let count = if closed { points.len() } else { points.len() - 1 };
    for i in 0..count {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        let seg_len = a.distance(b);
        if seg_len < GEOM_EPSILON {
            continue;
        }
        let dir = (b - a) * (1.0 / seg_len);
        let mut travelled = 0.0;
        while seg_len - travelled > remaining {
            travelled += remaining;
            let split = a + dir * travelled;
            if on {
                piece.push(split);
                if piece.len() >= 2 {
                    pieces.push(std::mem::take(&mut piece));
                } else {
                    piece.clear();
                }
            } else {
                piece.clear();
                piece.push(split);
            }
            on = !on;
            // advance past zero-length entries
            loop {
                idx = (idx + 1) % pat.len();
                remaining = pat[idx];
                if remaining > 0.0 {
                    break;
                }
                on = !on;
            }
        }
        remaining -= seg_len - travelled;
        if on {
            piece.push(b);
        }
    }
    if on && piece.len() >= 2 {
        pieces.push(piece);
    }
    pieces
}

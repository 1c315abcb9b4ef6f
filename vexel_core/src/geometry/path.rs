// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
//! Module: vector path representation
//!
//! The command stream model: an ordered sequence of absolute drawing
//! commands. Arcs and ellipses stay symbolic until flattening or a
//! non-similarity transform forces conversion to cubics.

use crate::geometry::flatten::{self, flatten_path, DEFAULT_TOLERANCE};
use crate::types::{FillRule, Matrix, Point, Rect, GEOM_EPSILON};

/// One absolute path drawing command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Begin a new subpath at the point.
    MoveTo(Point),
    /// Straight segment to the point.
    LineTo(Point),
    /// Cubic Bézier with two control points and an end point.
    CubicTo(Point, Point, Point),
    /// Circular arc, kept symbolic until flattened or transformed.
    Arc {
        /// Arc center
        center: Point,
        /// Radius
        radius: f64,
        /// Start angle in radians
        start_angle: f64,
        /// End angle in radians
        end_angle: f64,
        /// Sweep toward decreasing angles when set
        ccw: bool,
    },
    /// Elliptical arc, kept symbolic until flattened or transformed.
    Ellipse {
        /// Ellipse center
        center: Point,
        /// Semi-axis along x before rotation
        radius_x: f64,
        /// Semi-axis along y before rotation
        radius_y: f64,
        /// Rotation of the axes in radians
        rotation: f64,
        /// Start angle in radians
        start_angle: f64,
        /// End angle in radians
        end_angle: f64,
    },
    /// Close the current subpath back to its starting point.
    Close,
}

/// An ordered sequence of [`PathCommand`] values.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Path {
    /// Ordered command list
    pub commands: Vec<PathCommand>,
}

impl Path {
    /// Create an empty path.
    pub fn new() -> Self {
        Self { commands: Vec::new() }
    }

    /// True when the path holds no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Tight bounds of the path geometry.
    ///
    /// Cubic extrema come from the derivative quadratic; arcs and ellipses
    /// are converted to cubics first. An empty path yields an empty rect.
    pub fn bounds(&self) -> Rect {
        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        let mut include = |p: Point| {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        };
        let mut current = Point::ZERO;
        let mut seen = false;
        for cmd in self.expand_curves().commands {
            match cmd {
                PathCommand::MoveTo(p) => {
                    include(p);
                    current = p;
                    seen = true;
                }
                PathCommand::LineTo(p) => {
                    include(p);
                    current = p;
                    seen = true;
                }
                PathCommand::CubicTo(c1, c2, p) => {
                    include(current);
                    include(p);
                    for t in cubic_extrema(current, c1, c2, p) {
                        include(cubic_point(current, c1, c2, p, t));
                    }
                    current = p;
                    seen = true;
                }
                PathCommand::Close => {}
                // expand_curves leaves no symbolic segments behind
                PathCommand::Arc { .. } | PathCommand::Ellipse { .. } => unreachable!(),
            }
        }
        if !seen {
            return Rect::default();
        }
        Rect::from_points(min, max)
    }

    /// Apply an affine transform, producing a new path.
    ///
    /// Arcs survive translate-plus-uniform-scale transforms; anything else
    /// (rotation, shear, non-uniform scale) converts them to cubics first.
    pub fn transform(&self, m: &Matrix) -> Path {
        let source = if self.has_symbolic_curves() && !m.preserves_circles() {
            self.expand_curves()
        } else {
            self.clone()
        };
        let commands = source
            .commands
            .into_iter()
            .map(|cmd| match cmd {
                PathCommand::MoveTo(p) => PathCommand::MoveTo(m.map_point(p)),
                PathCommand::LineTo(p) => PathCommand::LineTo(m.map_point(p)),
                PathCommand::CubicTo(c1, c2, p) => {
                    PathCommand::CubicTo(m.map_point(c1), m.map_point(c2), m.map_point(p))
                }
                PathCommand::Arc { center, radius, start_angle, end_angle, ccw } => {
                    PathCommand::Arc {
                        center: m.map_point(center),
                        radius: radius * m.a,
                        start_angle,
                        end_angle,
                        ccw,
                    }
                }
                PathCommand::Ellipse {
                    center,
                    radius_x,
                    radius_y,
                    rotation,
                    start_angle,
                    end_angle,
                } => PathCommand::Ellipse {
                    center: m.map_point(center),
                    radius_x: radius_x * m.a,
                    radius_y: radius_y * m.a,
                    rotation,
                    start_angle,
                    end_angle,
                },
                PathCommand::Close => PathCommand::Close,
            })
            .collect();
        Path { commands }
    }

    /// Hit-test a point against the filled interior.
    pub fn contains(&self, p: Point, rule: FillRule) -> bool {
        let mut winding = 0i32;
        let mut crossings = 0u32;
        for sub in flatten_path(self, DEFAULT_TOLERANCE) {
            let pts = &sub.points;
            if pts.len() < 2 {
                continue;
            }
            // filling always treats subpaths as closed
            let n = pts.len();
            for i in 0..n {
                let a = pts[i];
                let b = pts[(i + 1) % n];
                if a.y <= p.y {
                    if b.y > p.y && (b - a).cross(p - a) > 0.0 {
                        winding += 1;
                        crossings += 1;
                    }
                } else if b.y <= p.y && (b - a).cross(p - a) < 0.0 {
                    winding -= 1;
                    crossings += 1;
                }
            }
        }
        match rule {
            FillRule::NonZero => winding != 0,
            FillRule::EvenOdd => crossings % 2 == 1,
        }
    }

    /// Reduce the path to a polyline within `tolerance`, dropping duplicate
    /// and collinear vertices.
    pub fn simplify(&self, tolerance: f64) -> Path {
        let tol = if tolerance > 0.0 { tolerance } else { DEFAULT_TOLERANCE };
        let mut out = Path::new();
        for sub in flatten_path(self, tol) {
            let pts = prune_polyline(&sub.points, tol);
            if pts.len() < 2 {
                continue;
            }
            out.commands.push(PathCommand::MoveTo(pts[0]));
            for &p in &pts[1..] {
                out.commands.push(PathCommand::LineTo(p));
            }
            if sub.closed {
                out.commands.push(PathCommand::Close);
            }
        }
        out
    }

    /// True when any command is a symbolic arc or ellipse.
    fn has_symbolic_curves(&self) -> bool {
        self.commands
            .iter()
            .any(|c| matches!(c, PathCommand::Arc { .. } | PathCommand::Ellipse { .. }))
    }

    /// Rewrite symbolic arcs and ellipses as connecting lines plus cubics.
    pub(crate) fn expand_curves(&self) -> Path {
        if !self.has_symbolic_curves() {
            return self.clone();
        }
        let mut out = Path::new();
        let mut has_current = false;
        for cmd in &self.commands {
            match *cmd {
                PathCommand::Arc { center, radius, start_angle, end_angle, ccw } => {
                    let segs = flatten::arc_cubics(
                        center, radius, radius, 0.0, start_angle, end_angle, ccw,
                    );
                    emit_cubics(&mut out, &segs, &mut has_current);
                }
                PathCommand::Ellipse {
                    center,
                    radius_x,
                    radius_y,
                    rotation,
                    start_angle,
                    end_angle,
                } => {
                    let segs = flatten::arc_cubics(
                        center, radius_x, radius_y, rotation, start_angle, end_angle, false,
                    );
                    emit_cubics(&mut out, &segs, &mut has_current);
                }
                PathCommand::MoveTo(p) => {
                    out.commands.push(PathCommand::MoveTo(p));
                    has_current = true;
                }
                PathCommand::Close => {
                    out.commands.push(PathCommand::Close);
                    has_current = false;
                }
                other => {
                    out.commands.push(other);
                    has_current = true;
                }
            }
        }
        out
    }
}

fn emit_cubics(out: &mut Path, segs: &[flatten::CubicSeg], has_current: &mut bool) {
    let Some(first) = segs.first() else { return };
    if *has_current {
        out.commands.push(PathCommand::LineTo(first.p0));
    } else {
        out.commands.push(PathCommand::MoveTo(first.p0));
        *has_current = true;
    }
    for seg in segs {
        out.commands.push(PathCommand::CubicTo(seg.c1, seg.c2, seg.p3));
    }
}

/// Evaluate a cubic Bézier at `t`.
pub(crate) fn cubic_point(p0: Point, c1: Point, c2: Point, p3: Point, t: f64) -> Point {
    let u = 1.0 - t;
    let w0 = u * u * u;
    let w1 = 3.0 * u * u * t;
    let w2 = 3.0 * u * t * t;
    let w3 = t * t * t;
    Point::new(
        w0 * p0.x + w1 * c1.x + w2 * c2.x + w3 * p3.x,
        w0 * p0.y + w1 * c1.y + w2 * c2.y + w3 * p3.y,
    )
}

/// Parameter values in (0, 1) where the cubic's derivative vanishes on
/// either axis.
fn cubic_extrema(p0: Point, c1: Point, c2: Point, p3: Point) -> Vec<f64> {
    let mut roots = Vec::new();
    for (d0, d1, d2) in [
        (c1.x - p0.x, c2.x - c1.x, p3.x - c2.x),
        (c1.y - p0.y, c2.y - c1.y, p3.y - c2.y),
    ] {
        // derivative/3 = (d0 - 2*d1 + d2) t^2 + 2 (d1 - d0) t + d0
        let a = d0 - 2.0 * d1 + d2;
        let b = 2.0 * (d1 - d0);
        let c = d0;
        if a.abs() < GEOM_EPSILON {
            if b.abs() > GEOM_EPSILON {
                roots.push(-c / b);
            }
            continue;
        }
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            continue;
        }
        let sq = disc.sqrt();
        roots.push((-b + sq) / (2.0 * a));
        roots.push((-b - sq) / (2.0 * a));
    }
    roots.retain(|t| *t > 0.0 && *t < 1.0);
    roots
}

fn prune_polyline(points: &[Point], tolerance: f64) -> Vec<Point> {
    let mut kept: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if let Some(&last) = kept.last() {
            if last.distance_squared(p) < GEOM_EPSILON {
                continue;
            }
        }
        while kept.len() >= 2 {
            let a = kept[kept.len() - 2];
            let b = kept[kept.len() - 1];
            if point_segment_distance(b, a, p) <= tolerance {
                kept.pop();
            } else {
                break;
            }
        }
        kept.push(p);
    }
    kept
}

/// Distance from `p` to the segment `a..b`.
pub(crate) fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.dot(ab);
    if len_sq < GEOM_EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a.lerp(b, t))
}

/// Incremental [`Path`] constructor with canvas-style helpers.
#[derive(Debug, Default, Clone)]
pub struct PathBuilder {
    commands: Vec<PathCommand>,
    current: Option<Point>,
    subpath_start: Point,
}

impl PathBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new subpath.
    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        let p = Point::new(x, y);
        self.commands.push(PathCommand::MoveTo(p));
        self.current = Some(p);
        self.subpath_start = p;
        self
    }

    /// Straight segment to the point, starting a subpath at the origin when
    /// none is open.
    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        let p = Point::new(x, y);
        self.commands.push(PathCommand::LineTo(p));
        self.current = Some(p);
        self
    }

    /// Cubic Bézier segment.
    pub fn cubic_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) -> &mut Self {
        let p = Point::new(x, y);
        self.commands
            .push(PathCommand::CubicTo(Point::new(c1x, c1y), Point::new(c2x, c2y), p));
        self.current = Some(p);
        self
    }

    /// Quadratic Bézier segment, promoted to a cubic.
    pub fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) -> &mut Self {
        let p0 = self.current.unwrap_or(Point::ZERO);
        let q = Point::new(cx, cy);
        let p = Point::new(x, y);
        let c1 = p0.lerp(q, 2.0 / 3.0);
        let c2 = p.lerp(q, 2.0 / 3.0);
        self.commands.push(PathCommand::CubicTo(c1, c2, p));
        self.current = Some(p);
        self
    }

    /// Circular arc around `(cx, cy)`.
    ///
    /// Sweeps from `start_angle` to `end_angle`, toward decreasing angles
    /// when `ccw` is set, mirroring the canvas `arc` call.
    pub fn arc(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        ccw: bool,
    ) -> &mut Self {
        if radius <= 0.0 {
            return self;
        }
        let center = Point::new(cx, cy);
        self.commands.push(PathCommand::Arc { center, radius, start_angle, end_angle, ccw });
        let (_, sweep) = flatten::arc_sweep(start_angle, end_angle, ccw);
        self.current = Some(flatten::ellipse_point(center, radius, radius, 0.0, start_angle + sweep));
        self
    }

    /// Elliptical arc with rotated axes.
    pub fn ellipse(
        &mut self,
        cx: f64,
        cy: f64,
        radius_x: f64,
        radius_y: f64,
        rotation: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> &mut Self {
        if radius_x <= 0.0 || radius_y <= 0.0 {
            return self;
        }
        let center = Point::new(cx, cy);
        self.commands.push(PathCommand::Ellipse {
            center,
            radius_x,
            radius_y,
            rotation,
            start_angle,
            end_angle,
        });
        let (_, sweep) = flatten::arc_sweep(start_angle, end_angle, false);
        self.current =
            Some(flatten::ellipse_point(center, radius_x, radius_y, rotation, start_angle + sweep));
        self
    }

    /// Full circle as a closed subpath.
    pub fn circle(&mut self, cx: f64, cy: f64, radius: f64) -> &mut Self {
        if radius <= 0.0 {
            return self;
        }
        self.move_to(cx + radius, cy);
        self.arc(cx, cy, radius, 0.0, std::f64::consts::TAU, false);
        self.close()
    }

    /// Axis-aligned rectangle as a closed subpath.
    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> &mut Self {
        if w <= 0.0 || h <= 0.0 {
            return self;
        }
        self.move_to(x, y);
        self.line_to(x + w, y);
        self.line_to(x + w, y + h);
        self.line_to(x, y + h);
        self.close()
    }

    /// Rectangle with circular corners of the given radius.
    pub fn round_rect(&mut self, x: f64, y: f64, w: f64, h: f64, radius: f64) -> &mut Self {
        if w <= 0.0 || h <= 0.0 {
            return self;
        }
        let r = radius.max(0.0).min(w / 2.0).min(h / 2.0);
        if r == 0.0 {
            return self.rect(x, y, w, h);
        }
        use std::f64::consts::{FRAC_PI_2, PI};
        self.move_to(x + r, y);
        self.line_to(x + w - r, y);
        self.arc(x + w - r, y + r, r, -FRAC_PI_2, 0.0, false);
        self.line_to(x + w, y + h - r);
        self.arc(x + w - r, y + h - r, r, 0.0, FRAC_PI_2, false);
        self.line_to(x + r, y + h);
        self.arc(x + r, y + h - r, r, FRAC_PI_2, PI, false);
        self.line_to(x, y + r);
        self.arc(x + r, y + r, r, PI, 1.5 * PI, false);
        self.close()
    }

    /// Canvas-style tangent arc: a line to the tangent point on the segment
    /// toward `(x1, y1)`, then an arc of `radius` to the tangent point on
    /// the segment toward `(x2, y2)`.
    ///
    /// Degenerate inputs (collinear points, zero radius) fall back to a
    /// straight line to `(x1, y1)`.
    pub fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) -> &mut Self {
        let p0 = self.current.unwrap_or(Point::ZERO);
        let p1 = Point::new(x1, y1);
        let p2 = Point::new(x2, y2);
        let v0 = (p0 - p1).normalized();
        let v1 = (p2 - p1).normalized();
        let cross = v0.cross(v1);
        if radius <= 0.0 || cross.abs() < GEOM_EPSILON {
            return self.line_to(x1, y1);
        }
        let half_angle = (v0.dot(v1).clamp(-1.0, 1.0)).acos() / 2.0;
        let tangent_dist = radius / half_angle.tan();
        let t0 = p1 + v0 * tangent_dist;
        let t1 = p1 + v1 * tangent_dist;
        let center = p1 + (v0 + v1).normalized() * (radius / half_angle.sin());
        let a0 = (t0.y - center.y).atan2(t0.x - center.x);
        let a1 = (t1.y - center.y).atan2(t1.x - center.x);
        self.line_to(t0.x, t0.y);
        // a positive cross means the short sweep runs toward decreasing angles
        self.arc(center.x, center.y, radius, a0, a1, cross > 0.0);
        self.current = Some(t1);
        self
    }

    /// Close the current subpath.
    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self.current = Some(self.subpath_start);
        self
    }

    /// Append another path, optionally transformed.
    pub fn add_path(&mut self, path: &Path, transform: Option<&Matrix>) -> &mut Self {
        let src = match transform {
            Some(m) if !m.is_identity() => path.transform(m),
            _ => path.clone(),
        };
        for cmd in &src.commands {
            match *cmd {
                PathCommand::MoveTo(p) => {
                    self.current = Some(p);
                    self.subpath_start = p;
                }
                PathCommand::LineTo(p) | PathCommand::CubicTo(_, _, p) => self.current = Some(p),
                PathCommand::Close => self.current = Some(self.subpath_start),
                PathCommand::Arc { .. } | PathCommand::Ellipse { .. } => {}
            }
            self.commands.push(*cmd);
        }
        self
    }

    /// Finish and return the built path.
    pub fn build(self) -> Path {
        Path { commands: self.commands }
    }
}

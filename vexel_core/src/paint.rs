// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
//! Module: paint variants and sampling
//!
//! Paints are immutable value objects sampled per destination pixel in
//! device space. Gradient and pattern geometry lives in the paint's own
//! transform; the context bakes the CTM in when a paint is set, so sampling
//! only ever applies one cached inverse. All interpolation runs on
//! premultiplied colors.

use std::f64::consts::TAU;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::bitmap::Bitmap;
use crate::types::{Color, Matrix, Point, PatternRepeat, PremulColor, SpreadMode, GEOM_EPSILON};

/// One gradient color stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position along the gradient, clamped to [0, 1]
    pub offset: f64,
    /// Color at this stop
    pub color: Color,
}

impl GradientStop {
    /// Create a stop, clamping the offset.
    pub fn new(offset: f64, color: Color) -> Self {
        Self { offset: offset.clamp(0.0, 1.0), color }
    }
}

/// Prepared stop ramp: sorted offsets with premultiplied colors.
#[derive(Debug, Clone, PartialEq)]
struct StopRamp {
    stops: Vec<(f64, PremulColor)>,
}

impl StopRamp {
    fn new(stops: &[GradientStop]) -> Self {
        let mut prepared: Vec<(f64, PremulColor)> = stops
            .iter()
            .map(|s| (s.offset.clamp(0.0, 1.0), s.color.premultiply()))
            .collect();
        prepared.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        Self { stops: prepared }
    }

    fn sample(&self, t: f64) -> PremulColor {
        let stops = &self.stops;
        if stops.is_empty() {
            return PremulColor::TRANSPARENT;
        }
        if t <= stops[0].0 {
            return stops[0].1;
        }
        for win in stops.windows(2) {
            let (o0, c0) = win[0];
            let (o1, c1) = win[1];
            if t <= o1 {
                if o1 - o0 < GEOM_EPSILON {
                    return c1;
                }
                return lerp_premul(c0, c1, (t - o0) / (o1 - o0));
            }
        }
        stops.last().unwrap().1
    }
}

fn lerp_premul(a: PremulColor, b: PremulColor, t: f64) -> PremulColor {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    PremulColor {
        a: mix(a.a, b.a),
        r: mix(a.r, b.r),
        g: mix(a.g, b.g),
        b: mix(a.b, b.b),
    }
}

fn apply_spread(t: f64, mode: SpreadMode) -> f64 {
    match mode {
        SpreadMode::Pad => t.clamp(0.0, 1.0),
        SpreadMode::Repeat => t.rem_euclid(1.0),
        SpreadMode::Reflect => {
            let cycle = t.rem_euclid(2.0);
            if cycle > 1.0 {
                2.0 - cycle
            } else {
                cycle
            }
        }
    }
}

/// Linear gradient between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    /// Start point in paint space
    pub start: Point,
    /// End point in paint space
    pub end: Point,
    /// Behavior outside [0, 1]
    pub spread: SpreadMode,
    ramp: StopRamp,
    inverse: Matrix,
}

/// Radial gradient, optionally with a focal point.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    /// Center of the end circle
    pub center: Point,
    /// Radius of the end circle
    pub radius: f64,
    /// Optional focal point for the two-circle formulation
    pub focal: Option<Point>,
    /// Behavior outside [0, 1]
    pub spread: SpreadMode,
    ramp: StopRamp,
    inverse: Matrix,
}

/// Conic (angular) gradient around a center.
#[derive(Debug, Clone, PartialEq)]
pub struct ConicGradient {
    /// Rotation center
    pub center: Point,
    /// Angle mapped to t = 0
    pub start_angle: f64,
    ramp: StopRamp,
    inverse: Matrix,
}

/// Tiled bitmap paint.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// Source pixels, shared and immutable
    pub bitmap: Arc<Bitmap>,
    /// Tiling behavior
    pub repeat: PatternRepeat,
    inverse: Matrix,
}

/// Polymorphic paint: `sample` maps a device-space point to a premultiplied
/// color.
#[derive(Debug, Clone)]
pub enum Paint {
    /// Uniform color
    Solid(Color),
    /// Linear gradient fill
    Linear(LinearGradient),
    /// Radial gradient fill
    Radial(RadialGradient),
    /// Conic gradient fill
    Conic(ConicGradient),
    /// Tiled bitmap fill
    Pattern(Pattern),
}

impl Paint {
    /// Uniform color paint.
    pub fn solid(color: Color) -> Paint {
        Paint::Solid(color)
    }

    /// Linear gradient from `start` to `end`.
    pub fn linear_gradient(
        start: Point,
        end: Point,
        stops: &[GradientStop],
        spread: SpreadMode,
    ) -> Paint {
        Paint::Linear(LinearGradient {
            start,
            end,
            spread,
            ramp: StopRamp::new(stops),
            inverse: Matrix::IDENTITY,
        })
    }

    /// Radial gradient centered on `center`.
    pub fn radial_gradient(
        center: Point,
        radius: f64,
        stops: &[GradientStop],
        spread: SpreadMode,
    ) -> Paint {
        Paint::Radial(RadialGradient {
            center,
            radius,
            focal: None,
            spread,
            ramp: StopRamp::new(stops),
            inverse: Matrix::IDENTITY,
        })
    }

    /// Radial gradient whose rays emanate from a focal point.
    pub fn focal_gradient(
        center: Point,
        radius: f64,
        focal: Point,
        stops: &[GradientStop],
        spread: SpreadMode,
    ) -> Paint {
        Paint::Radial(RadialGradient {
            center,
            radius,
            focal: Some(focal),
            spread,
            ramp: StopRamp::new(stops),
            inverse: Matrix::IDENTITY,
        })
    }

    /// Conic gradient sweeping from `start_angle`.
    pub fn conic_gradient(center: Point, start_angle: f64, stops: &[GradientStop]) -> Paint {
        Paint::Conic(ConicGradient {
            center,
            start_angle,
            ramp: StopRamp::new(stops),
            inverse: Matrix::IDENTITY,
        })
    }

    /// Bitmap pattern with the given tiling, optionally placed by
    /// `transform` (pattern space to user space).
    pub fn pattern(bitmap: Arc<Bitmap>, repeat: PatternRepeat, transform: Option<Matrix>) -> Paint {
        let inverse = transform
            .and_then(|m| m.invert())
            .unwrap_or(Matrix::IDENTITY);
        Paint::Pattern(Pattern { bitmap, repeat, inverse })
    }

    /// Bake an outer transform (usually the CTM at set time) into the
    /// paint geometry.
    pub fn transformed(&self, outer: &Matrix) -> Paint {
        if outer.is_identity() {
            return self.clone();
        }
        let inv = outer.invert().unwrap_or(Matrix::IDENTITY);
        let mut paint = self.clone();
        match &mut paint {
            Paint::Solid(_) => {}
            Paint::Linear(g) => g.inverse = g.inverse.concat(&inv),
            Paint::Radial(g) => g.inverse = g.inverse.concat(&inv),
            Paint::Conic(g) => g.inverse = g.inverse.concat(&inv),
            Paint::Pattern(p) => p.inverse = p.inverse.concat(&inv),
        }
        paint
    }

    /// True for a solid paint, letting span fills sample once per run.
    pub fn is_solid(&self) -> bool {
        matches!(self, Paint::Solid(_))
    }

    /// Sample the paint at a device-space point.
    pub fn sample(&self, device: Point) -> PremulColor {
        match self {
            Paint::Solid(c) => c.premultiply(),
            Paint::Linear(g) => {
                let p = g.inverse.map_point(device);
                let d = g.end - g.start;
                let len_sq = d.dot(d);
                let t = if len_sq < GEOM_EPSILON {
                    0.0
                } else {
                    (p - g.start).dot(d) / len_sq
                };
                g.ramp.sample(apply_spread(t, g.spread))
            }
            Paint::Radial(g) => {
                let p = g.inverse.map_point(device);
                let t = match g.focal {
                    None => {
                        if g.radius < GEOM_EPSILON {
                            0.0
                        } else {
                            p.distance(g.center) / g.radius
                        }
                    }
                    Some(focal) => focal_parameter(p, g.center, g.radius, focal),
                };
                g.ramp.sample(apply_spread(t, g.spread))
            }
            Paint::Conic(g) => {
                let p = g.inverse.map_point(device);
                let angle = (p.y - g.center.y).atan2(p.x - g.center.x);
                let t = ((angle - g.start_angle) / TAU).rem_euclid(1.0);
                g.ramp.sample(t)
            }
            Paint::Pattern(p) => sample_pattern(p, device),
        }
    }
}

/// Gradient parameter for a focal radial: the fraction of the way from the
/// focal point to the end circle along the ray through `p`.
fn focal_parameter(p: Point, center: Point, radius: f64, focal: Point) -> f64 {
    let d = p - focal;
    let dist_sq = d.dot(d);
    if dist_sq < GEOM_EPSILON {
        return 0.0;
    }
    let fc = focal - center;
    let a = dist_sq;
    let b = 2.0 * d.dot(fc);
    let c = fc.dot(fc) - radius * radius;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        // focal outside the circle; treat the ray as never reaching it
        return 1.0;
    }
    let s = (-b + disc.sqrt()) / (2.0 * a);
    if s <= 0.0 {
        1.0
    } else {
        1.0 / s
    }
}

fn sample_pattern(pattern: &Pattern, device: Point) -> PremulColor {
    let bmp = &pattern.bitmap;
    let w = bmp.width() as i64;
    let h = bmp.height() as i64;
    if w == 0 || h == 0 {
        return PremulColor::TRANSPARENT;
    }
    let local = pattern.inverse.map_point(device);
    // sample between texel centers
    let u = local.x - 0.5;
    let v = local.y - 0.5;
    let x0 = u.floor();
    let y0 = v.floor();
    let fx = ((u - x0) * 256.0) as u32;
    let fy = ((v - y0) * 256.0) as u32;

    let fetch = |ix: i64, iy: i64| -> PremulColor {
        let x = wrap_axis(ix, w, pattern.repeat, true);
        let y = wrap_axis(iy, h, pattern.repeat, false);
        match (x, y) {
            (Some(x), Some(y)) => bmp.get_pixel(x as i32, y as i32).premultiply(),
            _ => PremulColor::TRANSPARENT,
        }
    };

    let c00 = fetch(x0 as i64, y0 as i64);
    let c10 = fetch(x0 as i64 + 1, y0 as i64);
    let c01 = fetch(x0 as i64, y0 as i64 + 1);
    let c11 = fetch(x0 as i64 + 1, y0 as i64 + 1);

    let w00 = (256 - fx) * (256 - fy);
    let w10 = fx * (256 - fy);
    let w01 = (256 - fx) * fy;
    let w11 = fx * fy;
    let mix = |f: fn(PremulColor) -> u8| -> u8 {
        ((f(c00) as u32 * w00
            + f(c10) as u32 * w10
            + f(c01) as u32 * w01
            + f(c11) as u32 * w11
            + 0x8000)
            >> 16) as u8
    };
    PremulColor { a: mix(|c| c.a), r: mix(|c| c.r), g: mix(|c| c.g), b: mix(|c| c.b) }
}

/// Map a texel index onto the pattern under the repeat mode; `None` means
/// transparent.
fn wrap_axis(i: i64, size: i64, repeat: PatternRepeat, is_x: bool) -> Option<i64> {
    let tiled = match repeat {
        PatternRepeat::Repeat => true,
        PatternRepeat::NoRepeat => false,
        PatternRepeat::RepeatX => is_x,
        PatternRepeat::RepeatY => !is_x,
        PatternRepeat::Mirror => {
            let m = i.rem_euclid(2 * size);
            return Some(if m >= size { 2 * size - 1 - m } else { m });
        }
    };
    if tiled {
        Some(i.rem_euclid(size))
    } else if i >= 0 && i < size {
        Some(i)
    } else {
        None
    }
}

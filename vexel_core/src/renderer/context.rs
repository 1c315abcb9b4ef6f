// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
//! Module: graphics context
//!
//! The drawing front end: a state stack over an owned bitmap. A fill runs
//! transform -> flatten -> rasterize -> span pipeline -> clip -> paint
//! sample -> blend; a stroke expands through the stroker in user space
//! before transforming. Pixels are stored top-down, so user-space y grows
//! downward all the way to the buffer.

use crate::bitmap::Bitmap;
use crate::geometry::flatten::DEFAULT_TOLERANCE;
use crate::geometry::path::{Path, PathBuilder};
use crate::geometry::stroke::{stroke_path, StrokeStyle};
use crate::paint::Paint;
use crate::raster::clip::ClipRegion;
use crate::raster::scanline::rasterize_path;
use crate::raster::span::{pipeline, Span};
use crate::renderer::blend::blend;
use crate::types::{
    BlendMode, Color, EngineError, FillRule, LineCap, LineJoin, Matrix, Point, PremulColor,
};

/// One entry of the state stack.
#[derive(Debug, Clone)]
struct GraphicsState {
    transform: Matrix,
    fill_paint: Paint,
    stroke_paint: Paint,
    fill_rule: FillRule,
    stroke: StrokeStyle,
    blend_mode: BlendMode,
    global_alpha: f64,
    clip: Option<ClipRegion>,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            transform: Matrix::IDENTITY,
            fill_paint: Paint::solid(Color::BLACK),
            stroke_paint: Paint::solid(Color::BLACK),
            fill_rule: FillRule::default(),
            stroke: StrokeStyle::default(),
            blend_mode: BlendMode::default(),
            global_alpha: 1.0,
            clip: None,
        }
    }
}

/// Drawing context owning an ARGB32 bitmap and a LIFO state stack.
#[derive(Debug)]
pub struct Context {
    bitmap: Bitmap,
    states: Vec<GraphicsState>,
}

impl Context {
    /// Allocate a transparent canvas. Dimensions must be positive.
    pub fn new(width: i32, height: i32) -> Result<Self, EngineError> {
        Ok(Self {
            bitmap: Bitmap::new(width, height)?,
            states: vec![GraphicsState::default()],
        })
    }

    /// Wrap an existing bitmap.
    pub fn with_bitmap(bitmap: Bitmap) -> Self {
        Self { bitmap, states: vec![GraphicsState::default()] }
    }

    fn state(&self) -> &GraphicsState {
        self.states.last().expect("state stack never empties")
    }

    fn state_mut(&mut self) -> &mut GraphicsState {
        self.states.last_mut().expect("state stack never empties")
    }

    // --- state stack ---

    /// Push a copy of the current state.
    pub fn save(&mut self) {
        let top = self.state().clone();
        self.states.push(top);
    }

    /// Pop back to the previous state; keeps the bottom state as-is.
    pub fn restore(&mut self) {
        if self.states.len() > 1 {
            self.states.pop();
        }
    }

    /// Drop every saved state and reset the bottom one to defaults.
    ///
    /// Pixels are left untouched.
    pub fn reset(&mut self) {
        self.states.clear();
        self.states.push(GraphicsState::default());
    }

    // --- transform ---

    /// Append a translation in local coordinates.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        let m = self.state().transform.translate(dx, dy);
        self.state_mut().transform = m;
    }

    /// Append a rotation in local coordinates.
    pub fn rotate(&mut self, radians: f64) {
        let m = self.state().transform.rotate(radians);
        self.state_mut().transform = m;
    }

    /// Append a scale in local coordinates.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        let m = self.state().transform.scale(sx, sy);
        self.state_mut().transform = m;
    }

    /// Append a shear in local coordinates.
    pub fn shear(&mut self, sx: f64, sy: f64) {
        let m = self.state().transform.shear(sx, sy);
        self.state_mut().transform = m;
    }

    /// Compose an arbitrary matrix onto the current transform.
    pub fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) {
        let m = self.state().transform.concat(&Matrix::new(a, b, c, d, tx, ty));
        self.state_mut().transform = m;
    }

    /// Replace the current transform.
    pub fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) {
        self.state_mut().transform = Matrix::new(a, b, c, d, tx, ty);
    }

    /// Back to the identity transform.
    pub fn reset_transform(&mut self) {
        self.state_mut().transform = Matrix::IDENTITY;
    }

    /// The current transform.
    pub fn current_transform(&self) -> Matrix {
        self.state().transform
    }

    // --- paint ---

    /// Set the fill paint; the current transform is baked into its geometry.
    pub fn set_fill_paint(&mut self, paint: Paint) {
        let baked = paint.transformed(&self.state().transform);
        self.state_mut().fill_paint = baked;
    }

    /// Set the stroke paint; the current transform is baked in.
    pub fn set_stroke_paint(&mut self, paint: Paint) {
        let baked = paint.transformed(&self.state().transform);
        self.state_mut().stroke_paint = baked;
    }

    /// Solid fill color shorthand.
    pub fn set_fill_color(&mut self, color: Color) {
        self.state_mut().fill_paint = Paint::solid(color);
    }

    /// Solid stroke color shorthand.
    pub fn set_stroke_color(&mut self, color: Color) {
        self.state_mut().stroke_paint = Paint::solid(color);
    }

    /// Fill rule for subsequent fills and clips.
    pub fn set_fill_rule(&mut self, rule: FillRule) {
        self.state_mut().fill_rule = rule;
    }

    // --- stroke style ---

    /// Stroke width in user-space units.
    pub fn set_line_width(&mut self, width: f64) {
        self.state_mut().stroke.width = width;
    }

    /// End-cap style.
    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.state_mut().stroke.cap = cap;
    }

    /// Corner style.
    pub fn set_line_join(&mut self, join: LineJoin) {
        self.state_mut().stroke.join = join;
    }

    /// Miter ratio limit.
    pub fn set_miter_limit(&mut self, limit: f64) {
        self.state_mut().stroke.miter_limit = limit;
    }

    /// Dash pattern and starting offset; an empty or all-zero pattern
    /// strokes solid.
    pub fn set_line_dash(&mut self, pattern: &[f64], offset: f64) {
        self.state_mut().stroke.dash_pattern = pattern.to_vec();
        self.state_mut().stroke.dash_offset = offset;
    }

    /// Remove any dash pattern.
    pub fn clear_line_dash(&mut self) {
        self.state_mut().stroke.dash_pattern.clear();
        self.state_mut().stroke.dash_offset = 0.0;
    }

    // --- compositing state ---

    /// Blend mode for subsequent drawing.
    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.state_mut().blend_mode = mode;
    }

    /// Global alpha multiplied into every paint sample, clamped to [0, 1].
    pub fn set_global_alpha(&mut self, alpha: f64) {
        self.state_mut().global_alpha = alpha.clamp(0.0, 1.0);
    }

    // --- drawing ---

    /// Fill a path with the current fill paint.
    pub fn fill(&mut self, path: &Path) {
        let state = self.state();
        let device = path.transform(&state.transform);
        let spans = rasterize_path(
            &device,
            state.fill_rule,
            DEFAULT_TOLERANCE,
            self.bitmap.width(),
            self.bitmap.height(),
        );
        self.paint_spans(spans, PaintSlot::Fill);
    }

    /// Stroke a path with the current stroke paint and style.
    ///
    /// The outline is built in user space so dashes and caps follow the
    /// path's own geometry, then transformed into device space.
    pub fn stroke(&mut self, path: &Path) {
        let state = self.state();
        if state.stroke.width <= 0.0 {
            return;
        }
        let tolerance = DEFAULT_TOLERANCE / transform_scale(&state.transform).max(1e-6);
        let outline = stroke_path(path, &state.stroke, tolerance);
        let device = outline.transform(&state.transform);
        let spans = rasterize_path(
            &device,
            FillRule::NonZero,
            DEFAULT_TOLERANCE,
            self.bitmap.width(),
            self.bitmap.height(),
        );
        self.paint_spans(spans, PaintSlot::Stroke);
    }

    /// Intersect the clip with a path under the current transform.
    pub fn clip(&mut self, path: &Path) {
        let state = self.state();
        let region = ClipRegion::from_path(
            path,
            &state.transform,
            state.fill_rule,
            self.bitmap.width(),
            self.bitmap.height(),
        );
        let merged = match &state.clip {
            Some(existing) => existing.intersect(&region),
            None => region,
        };
        self.state_mut().clip = Some(merged);
    }

    /// Clip to an axis-aligned rectangle in user space.
    pub fn clip_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let mut b = PathBuilder::new();
        b.rect(x, y, w, h);
        self.clip(&b.build());
    }

    /// Remove the clip for the current state.
    pub fn reset_clip(&mut self) {
        self.state_mut().clip = None;
    }

    /// Fill the whole buffer with `color` (default transparent), ignoring
    /// transform, clip and blend mode.
    pub fn clear(&mut self, color: Option<Color>) {
        self.bitmap.clear(color.unwrap_or(Color::TRANSPARENT));
    }

    /// Fill an axis-aligned rectangle in user space.
    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let mut b = PathBuilder::new();
        b.rect(x, y, w, h);
        self.fill(&b.build());
    }

    /// Stroke an axis-aligned rectangle in user space.
    pub fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let mut b = PathBuilder::new();
        b.rect(x, y, w, h);
        self.stroke(&b.build());
    }

    // --- pixels ---

    /// The finished bitmap.
    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// Mutable access to the bitmap.
    pub fn bitmap_mut(&mut self) -> &mut Bitmap {
        &mut self.bitmap
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }

    /// Packed ARGB32 pixels, top-down.
    pub fn pixels(&self) -> &[u32] {
        self.bitmap.pixels()
    }

    /// Read one pixel; transparent outside the canvas.
    pub fn get_pixel(&self, x: i32, y: i32) -> Color {
        self.bitmap.get_pixel(x, y)
    }

    /// Write one pixel; out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.bitmap.set_pixel(x, y, color);
    }

    // --- span filling ---

    fn paint_spans(&mut self, spans: Vec<Span>, slot: PaintSlot) {
        let state = self.state();
        if let Some(clip) = &state.clip {
            if clip.is_empty() {
                return;
            }
        }
        let mut spans = pipeline(spans, self.bitmap.width(), self.bitmap.height());
        if let Some(clip) = &state.clip {
            spans = clip.clip_spans(spans);
        }
        if spans.is_empty() {
            return;
        }
        let paint = match slot {
            PaintSlot::Fill => state.fill_paint.clone(),
            PaintSlot::Stroke => state.stroke_paint.clone(),
        };
        let mode = state.blend_mode;
        let alpha8 = (state.global_alpha * 255.0).round() as u8;

        let width = self.bitmap.width() as usize;
        let solid = if paint.is_solid() {
            Some(paint.sample(Point::ZERO).scaled(alpha8))
        } else {
            None
        };
        for span in spans {
            let row = span.y as usize * width;
            let start = span.x as usize;
            let pixels = self.bitmap.pixels_mut();
            match solid {
                Some(base) => {
                    let src = base.scaled(span.coverage);
                    // opaque src-over is a plain store
                    if mode == BlendMode::SrcOver && src.a == 255 {
                        let packed = src.unpremultiply().to_u32();
                        for px in pixels[row + start..row + start + span.len as usize].iter_mut() {
                            *px = packed;
                        }
                    } else {
                        for px in pixels[row + start..row + start + span.len as usize].iter_mut() {
                            *px = blend_pixel(mode, src, *px);
                        }
                    }
                }
                None => {
                    for i in 0..span.len as usize {
                        let x = start + i;
                        let sample_at = Point::new(x as f64 + 0.5, span.y as f64 + 0.5);
                        let src = paint.sample(sample_at).scaled(alpha8).scaled(span.coverage);
                        let px = &mut pixels[row + x];
                        *px = blend_pixel(mode, src, *px);
                    }
                }
            }
        }
    }
}

#[derive(Clone, Copy)]
enum PaintSlot {
    Fill,
    Stroke,
}

#[inline]
fn blend_pixel(mode: BlendMode, src: PremulColor, dst_packed: u32) -> u32 {
    let dst = Color::from_u32(dst_packed).premultiply();
    blend(mode, src, dst).unpremultiply().to_u32()
}

/// Approximate uniform scale factor of a transform, for tolerance scaling.
fn transform_scale(m: &Matrix) -> f64 {
    let sx = (m.a * m.a + m.b * m.b).sqrt();
    let sy = (m.c * m.c + m.d * m.d).sqrt();
    (sx + sy) / 2.0
}

// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
//! Module: vexel core library
//!
//! A software 2D vector graphics engine: paths of lines, cubic Béziers and
//! arcs are flattened, rasterized with 8-bit anti-aliased coverage,
//! clipped, painted with solids, gradients or patterns, and composited
//! into an in-memory ARGB32 buffer.

pub mod bitmap;
pub mod geometry;
pub mod paint;
pub mod raster;
pub mod renderer;
pub mod types;

pub use bitmap::Bitmap;
pub use geometry::boolean::{difference, intersection, union, xor};
pub use geometry::{Path, PathBuilder, PathCommand, StrokeStyle};
pub use paint::{GradientStop, Paint};
pub use raster::{ClipRegion, Span};
pub use renderer::Context;
pub use types::{
    BlendMode, Color, EngineError, FillRule, LineCap, LineJoin, Matrix, PatternRepeat, Point,
    PremulColor, Rect, SpreadMode,
};

// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
//! Module: scanline rasterization
//!
//! Coverage span generation, the span pipeline and clip regions.

pub mod clip;
pub mod scanline;
pub mod span;

pub use clip::ClipRegion;
pub use scanline::{rasterize, rasterize_path, SUB_SAMPLES};
pub use span::{clip_to_viewport, merge_spans, optimize_spans, pipeline, Span};

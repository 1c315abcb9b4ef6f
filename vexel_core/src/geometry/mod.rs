// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
//! Module: path geometry
//!
//! The path model plus everything that reshapes it: flattening, stroke
//! expansion and boolean region combination.

pub mod boolean;
pub mod flatten;
pub mod path;
pub mod stroke;

pub use flatten::{flatten_path, sort_subpaths_by_area, FlatSubpath, DEFAULT_TOLERANCE};
pub use path::{Path, PathBuilder, PathCommand};
pub use stroke::{stroke_path, StrokeStyle};

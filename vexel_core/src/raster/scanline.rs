// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
//! Module: anti-aliased scanline rasterizer
//!
//! Converts flattened subpaths into coverage spans. Every device scanline is
//! sampled on 16 sub-scanlines; signed edge crossings per sub-scanline are
//! sorted, resolved under the fill rule into intervals and accumulated into
//! per-column coverage, then grouped into spans of equal coverage.

use smallvec::SmallVec;

use crate::geometry::flatten::{flatten_path, sort_subpaths_by_area, FlatSubpath};
use crate::geometry::path::Path;
use crate::raster::span::Span;
use crate::types::FillRule;

/// Sub-scanlines sampled per device scanline.
pub const SUB_SAMPLES: u32 = 16;

/// Coverage accumulated by one fully covered column across all sub-scanlines:
/// 256 units per sub-scanline.
const FULL_ACC: u32 = SUB_SAMPLES * 256;

/// One non-horizontal polygon edge, y-monotonic with `top < bottom`.
#[derive(Debug, Clone, Copy)]
struct Edge {
    top: f64,
    bottom: f64,
    x_at_top: f64,
    dx_dy: f64,
    /// +1 for a downward-going source edge, -1 for upward
    dir: i32,
}

impl Edge {
    fn from_segment(a: crate::types::Point, b: crate::types::Point) -> Option<Edge> {
        if a.y == b.y {
            return None;
        }
        let (top_p, bottom_p, dir) = if a.y < b.y { (a, b, 1) } else { (b, a, -1) };
        Some(Edge {
            top: top_p.y,
            bottom: bottom_p.y,
            x_at_top: top_p.x,
            dx_dy: (bottom_p.x - top_p.x) / (bottom_p.y - top_p.y),
            dir,
        })
    }

    #[inline]
    fn x_at(&self, y: f64) -> f64 {
        self.x_at_top + (y - self.top) * self.dx_dy
    }
}

/// Flatten a path and rasterize it under the fill rule.
///
/// Subpaths are ordered by |area| descending under even-odd so glyph-style
/// holes land correctly regardless of contour winding.
pub fn rasterize_path(
    path: &Path,
    rule: FillRule,
    tolerance: f64,
    width: u32,
    height: u32,
) -> Vec<Span> {
    let mut subpaths = flatten_path(path, tolerance);
    if rule == FillRule::EvenOdd {
        sort_subpaths_by_area(&mut subpaths);
    }
    rasterize(&subpaths, rule, width, height)
}

/// Rasterize flattened subpaths into coverage spans.
///
/// Spans come out ascending (y, x) with coverage in 1..=255, clamped to the
/// viewport. Filling always treats subpaths as closed.
pub fn rasterize(subpaths: &[FlatSubpath], rule: FillRule, width: u32, height: u32) -> Vec<Span> {
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let mut edges: Vec<Edge> = Vec::new();
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for sub in subpaths {
        let pts = &sub.points;
        if pts.len() < 2 {
            continue;
        }
        for i in 0..pts.len() {
            let a = pts[i];
            let b = pts[(i + 1) % pts.len()];
            if let Some(edge) = Edge::from_segment(a, b) {
                y_min = y_min.min(edge.top);
                y_max = y_max.max(edge.bottom);
                edges.push(edge);
            }
        }
    }
    if edges.is_empty() {
        return Vec::new();
    }
    edges.sort_by(|a, b| a.top.partial_cmp(&b.top).unwrap_or(std::cmp::Ordering::Equal));

    let y_start = (y_min.floor().max(0.0)) as i32;
    let y_end = (y_max.ceil().min(height as f64)) as i32;
    if y_end <= y_start {
        return Vec::new();
    }

    let mut spans = Vec::new();
    let mut acc = vec![0u32; width as usize];
    let mut active: Vec<Edge> = Vec::new();
    let mut next_edge = 0usize;
    // skip edges entirely above the viewport
    while next_edge < edges.len() && edges[next_edge].bottom <= y_start as f64 {
        next_edge += 1;
    }
    let mut pending: Vec<Edge> = edges[next_edge..].to_vec();
    let mut pending_idx = 0usize;

    let mut crossings: SmallVec<[(f64, i32); 32]> = SmallVec::new();
    for y in y_start..y_end {
        let row_top = y as f64;
        let row_bottom = row_top + 1.0;
        while pending_idx < pending.len() && pending[pending_idx].top < row_bottom {
            active.push(pending[pending_idx]);
            pending_idx += 1;
        }
        active.retain(|e| e.bottom > row_top);
        if active.is_empty() {
            continue;
        }

        let mut touched_min = width as usize;
        let mut touched_max = 0usize;
        for s in 0..SUB_SAMPLES {
            let sub_y = row_top + (s as f64 + 0.5) / SUB_SAMPLES as f64;
            crossings.clear();
            for e in &active {
                if e.top <= sub_y && sub_y < e.bottom {
                    crossings.push((e.x_at(sub_y), e.dir));
                }
            }
            if crossings.len() < 2 {
                continue;
            }
            crossings.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

            let mut winding = 0i32;
            let mut interval_start = 0.0f64;
            for &(x, dir) in crossings.iter() {
                let was_inside = inside(winding, rule);
                winding += dir;
                let now_inside = inside(winding, rule);
                if !was_inside && now_inside {
                    interval_start = x;
                } else if was_inside && !now_inside {
                    accumulate(
                        &mut acc,
                        interval_start,
                        x,
                        width,
                        &mut touched_min,
                        &mut touched_max,
                    );
                }
            }
        }

        if touched_min <= touched_max {
            emit_row(&mut spans, &mut acc, y, touched_min, touched_max);
        }
    }
    spans
}

#[inline]
fn inside(winding: i32, rule: FillRule) -> bool {
    match rule {
        FillRule::NonZero => winding != 0,
        FillRule::EvenOdd => winding % 2 != 0,
    }
}

/// Add one sub-scanline interval `[x0, x1)` into the column accumulator,
/// 256 units per fully covered column.
fn accumulate(
    acc: &mut [u32],
    x0: f64,
    x1: f64,
    width: u32,
    touched_min: &mut usize,
    touched_max: &mut usize,
) {
    let x0 = x0.max(0.0);
    let x1 = x1.min(width as f64);
    if x1 <= x0 {
        return;
    }
    let first = x0.floor() as usize;
    let last = (x1.ceil() as usize).min(width as usize) - 1;
    *touched_min = (*touched_min).min(first);
    *touched_max = (*touched_max).max(last);
    if first == last {
        acc[first] += ((x1 - x0) * 256.0).round() as u32;
        return;
    }
    acc[first] += (((first + 1) as f64 - x0) * 256.0).round() as u32;
    for cell in acc.iter_mut().take(last).skip(first + 1) {
        *cell += 256;
    }
    acc[last] += ((x1 - last as f64) * 256.0).round() as u32;
}

/// Convert the accumulated row into spans and reset the touched range.
fn emit_row(spans: &mut Vec<Span>, acc: &mut [u32], y: i32, min_x: usize, max_x: usize) {
    let mut run_start = 0usize;
    let mut run_cov = 0u8;
    let mut in_run = false;
    for x in min_x..=max_x {
        let cov = ((acc[x].min(FULL_ACC) * 255 + FULL_ACC / 2) / FULL_ACC) as u8;
        acc[x] = 0;
        if cov == 0 {
            if in_run {
                spans.push(Span {
                    y,
                    x: run_start as i32,
                    len: (x - run_start) as u32,
                    coverage: run_cov,
                });
                in_run = false;
            }
            continue;
        }
        if in_run && cov == run_cov {
            continue;
        }
        if in_run {
            spans.push(Span {
                y,
                x: run_start as i32,
                len: (x - run_start) as u32,
                coverage: run_cov,
            });
        }
        run_start = x;
        run_cov = cov;
        in_run = true;
    }
    if in_run {
        spans.push(Span {
            y,
            x: run_start as i32,
            len: (max_x + 1 - run_start) as u32,
            coverage: run_cov,
        });
    }
}

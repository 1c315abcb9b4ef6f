// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
//! Module: span-indexed clip regions
//!
//! A clip region is a binary mask stored as sorted disjoint column ranges
//! per scanline. It is built by rasterizing a transformed path and forcing
//! every emitted span to full coverage; rendering intersects its spans
//! against the region row by row.

use std::collections::BTreeMap;

use crate::geometry::path::Path;
use crate::raster::scanline::rasterize_path;
use crate::raster::span::Span;
use crate::types::{FillRule, Matrix, Rect};

/// Binary clip mask keyed by scanline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipRegion {
    /// Sorted disjoint half-open column ranges per scanline
    rows: BTreeMap<i32, Vec<(i32, i32)>>,
    bounds: Rect,
}

impl ClipRegion {
    /// The empty region; blocks everything.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Rasterize a path under `transform` into a clip mask.
    ///
    /// Any partially covered pixel joins the mask at full coverage; the mask
    /// stays binary.
    pub fn from_path(
        path: &Path,
        transform: &Matrix,
        rule: FillRule,
        width: u32,
        height: u32,
    ) -> Self {
        let device_path = if transform.is_identity() {
            path.clone()
        } else {
            path.transform(transform)
        };
        let spans = rasterize_path(&device_path, rule, crate::geometry::flatten::DEFAULT_TOLERANCE, width, height);
        let mut rows: BTreeMap<i32, Vec<(i32, i32)>> = BTreeMap::new();
        for s in spans {
            let ranges = rows.entry(s.y).or_default();
            push_range(ranges, (s.x, s.end()));
        }
        let mut region = ClipRegion { rows, bounds: Rect::default() };
        region.recompute_bounds();
        if region.is_empty() {
            log::debug!("clip path produced an empty region");
        }
        region
    }

    /// Region covering the whole `width x height` viewport.
    pub fn full(width: u32, height: u32) -> Self {
        let mut rows = BTreeMap::new();
        for y in 0..height as i32 {
            rows.insert(y, vec![(0, width as i32)]);
        }
        let mut region = ClipRegion { rows, bounds: Rect::default() };
        region.recompute_bounds();
        region
    }

    /// True when no pixel passes the mask.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Enclosing rectangle of the mask.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Whether the mask covers device pixel `(x, y)`.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let Some(ranges) = self.rows.get(&y) else {
            return false;
        };
        // binary search on range start
        let idx = ranges.partition_point(|&(x0, _)| x0 <= x);
        idx > 0 && x < ranges[idx - 1].1
    }

    /// Scanline-wise geometric intersection with `other`.
    pub fn intersect(&self, other: &ClipRegion) -> ClipRegion {
        let mut rows = BTreeMap::new();
        for (y, mine) in &self.rows {
            let Some(theirs) = other.rows.get(y) else {
                continue;
            };
            let merged = intersect_ranges(mine, theirs);
            if !merged.is_empty() {
                rows.insert(*y, merged);
            }
        }
        let mut region = ClipRegion { rows, bounds: Rect::default() };
        region.recompute_bounds();
        region
    }

    /// Intersect paint spans with the mask, preserving span coverage.
    pub fn clip_spans(&self, spans: Vec<Span>) -> Vec<Span> {
        let mut out = Vec::with_capacity(spans.len());
        for s in spans {
            let Some(ranges) = self.rows.get(&s.y) else {
                continue;
            };
            for &(x0, x1) in ranges {
                let start = s.x.max(x0);
                let end = s.end().min(x1);
                if end > start {
                    out.push(Span { y: s.y, x: start, len: (end - start) as u32, coverage: s.coverage });
                }
                if x0 >= s.end() {
                    break;
                }
            }
        }
        out
    }

    fn recompute_bounds(&mut self) {
        if self.rows.is_empty() {
            self.bounds = Rect::default();
            return;
        }
        let mut min_x = i32::MAX;
        let mut max_x = i32::MIN;
        let y0 = *self.rows.keys().next().unwrap();
        let y1 = *self.rows.keys().next_back().unwrap();
        for ranges in self.rows.values() {
            if let Some(&(x0, _)) = ranges.first() {
                min_x = min_x.min(x0);
            }
            if let Some(&(_, x1)) = ranges.last() {
                max_x = max_x.max(x1);
            }
        }
        self.bounds = Rect::new(
            min_x as f64,
            y0 as f64,
            (max_x - min_x) as f64,
            (y1 - y0 + 1) as f64,
        );
    }
}

/// Insert a range into a sorted disjoint list, merging overlaps.
fn push_range(ranges: &mut Vec<(i32, i32)>, range: (i32, i32)) {
    if let Some(last) = ranges.last_mut() {
        if range.0 <= last.1 {
            last.1 = last.1.max(range.1);
            return;
        }
    }
    ranges.push(range);
}

fn intersect_ranges(a: &[(i32, i32)], b: &[(i32, i32)]) -> Vec<(i32, i32)> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let lo = a[i].0.max(b[j].0);
        let hi = a[i].1.min(b[j].1);
        if hi > lo {
            out.push((lo, hi));
        }
        if a[i].1 <= b[j].1 {
            i += 1;
        } else {
            j += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::path::PathBuilder;

    fn rect_region(x: f64, y: f64, w: f64, h: f64) -> ClipRegion {
        let mut b = PathBuilder::new();
        b.rect(x, y, w, h);
        ClipRegion::from_path(&b.build(), &Matrix::IDENTITY, FillRule::NonZero, 64, 64)
    }

    #[test]
    fn contains_inside_and_outside() {
        let region = rect_region(10.0, 10.0, 20.0, 20.0);
        assert!(region.contains(10, 10));
        assert!(region.contains(29, 29));
        assert!(!region.contains(30, 15));
        assert!(!region.contains(15, 9));
        assert_eq!(region.bounds(), Rect::new(10.0, 10.0, 20.0, 20.0));
    }

    #[test]
    fn intersection_shrinks() {
        let a = rect_region(0.0, 0.0, 30.0, 30.0);
        let b = rect_region(20.0, 20.0, 30.0, 30.0);
        let i = a.intersect(&b);
        assert!(i.contains(25, 25));
        assert!(!i.contains(10, 10));
        assert_eq!(i.bounds(), Rect::new(20.0, 20.0, 10.0, 10.0));
        let disjoint = a.intersect(&rect_region(40.0, 40.0, 5.0, 5.0));
        assert!(disjoint.is_empty());
    }

    #[test]
    fn clip_spans_preserves_coverage() {
        let region = rect_region(10.0, 0.0, 10.0, 4.0);
        let spans = vec![
            Span { y: 1, x: 5, len: 10, coverage: 77 },
            Span { y: 10, x: 12, len: 4, coverage: 200 },
        ];
        let clipped = region.clip_spans(spans);
        assert_eq!(clipped, vec![Span { y: 1, x: 10, len: 5, coverage: 77 }]);
    }

    #[test]
    fn empty_region_blocks_everything() {
        let empty = ClipRegion::empty();
        assert!(empty.is_empty());
        assert!(!empty.contains(0, 0));
        assert!(empty.clip_spans(vec![Span { y: 0, x: 0, len: 5, coverage: 255 }]).is_empty());
    }

    #[test]
    fn clip_idempotence() {
        let a = rect_region(5.0, 5.0, 12.0, 9.0);
        assert_eq!(a.intersect(&a), a);
    }
}

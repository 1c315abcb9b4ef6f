// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
//! Module: path boolean operations
//!
//! Region combination over flattened polygons: both operands are flattened,
//! every edge is split at its crossings with the other operand, each split
//! edge is classified by the winding of its midpoint against the other
//! region, and the kept edges are rechained into closed loops. Results fill
//! correctly under the non-zero rule. Self-intersecting input yields a
//! deterministic result and never panics; edges that fail to rechain are
//! dropped.

use std::collections::HashMap;

use crate::geometry::flatten::{flatten_path, DEFAULT_TOLERANCE};
use crate::geometry::path::{Path, PathCommand};
use crate::types::{Point, GEOM_EPSILON};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoolOp {
    Union,
    Intersection,
    Difference,
    Xor,
}

/// Region covered by either path.
pub fn union(a: &Path, b: &Path) -> Path {
    boolean_op(a, b, BoolOp::Union)
}

/// Region covered by both paths.
pub fn intersection(a: &Path, b: &Path) -> Path {
    boolean_op(a, b, BoolOp::Intersection)
}

/// Region covered by `a` but not `b`.
pub fn difference(a: &Path, b: &Path) -> Path {
    boolean_op(a, b, BoolOp::Difference)
}

/// Region covered by exactly one of the paths.
pub fn xor(a: &Path, b: &Path) -> Path {
    boolean_op(a, b, BoolOp::Xor)
}

/// One directed edge kept for reassembly.
#[derive(Debug, Clone, Copy)]
struct BoolEdge {
    from: Point,
    to: Point,
}

fn boolean_op(a: &Path, b: &Path, op: BoolOp) -> Path {
    let polys_a = polygons(a);
    let polys_b = polygons(b);
    if polys_a.is_empty() && polys_b.is_empty() {
        return Path::new();
    }

    let edges_a = split_against(&polys_a, &polys_b);
    let edges_b = split_against(&polys_b, &polys_a);

    let mut kept: Vec<BoolEdge> = Vec::new();
    for e in edges_a {
        let inside_other = winding(&polys_b, e.from.midpoint(e.to)) != 0;
        match op {
            BoolOp::Union => {
                if !inside_other {
                    kept.push(e);
                }
            }
            BoolOp::Intersection => {
                if inside_other {
                    kept.push(e);
                }
            }
            BoolOp::Difference => {
                if !inside_other {
                    kept.push(e);
                }
            }
            BoolOp::Xor => {
                if inside_other {
                    kept.push(BoolEdge { from: e.to, to: e.from });
                } else {
                    kept.push(e);
                }
            }
        }
    }
    for e in edges_b {
        let inside_other = winding(&polys_a, e.from.midpoint(e.to)) != 0;
        match op {
            BoolOp::Union => {
                if !inside_other {
                    kept.push(e);
                }
            }
            BoolOp::Intersection => {
                if inside_other {
                    kept.push(e);
                }
            }
            BoolOp::Difference => {
                // kept with reversed orientation so the cut becomes a hole
                if inside_other {
                    kept.push(BoolEdge { from: e.to, to: e.from });
                }
            }
            BoolOp::Xor => {
                if inside_other {
                    kept.push(BoolEdge { from: e.to, to: e.from });
                } else {
                    kept.push(e);
                }
            }
        }
    }

    chain_loops(kept)
}

/// Flatten to closed polygons, dropping degenerate subpaths.
fn polygons(path: &Path) -> Vec<Vec<Point>> {
    flatten_path(path, DEFAULT_TOLERANCE)
        .into_iter()
        .map(|s| s.points)
        .filter(|p| p.len() >= 3)
        .collect()
}

/// All edges of `polys`, each split at its crossings with `others`.
fn split_against(polys: &[Vec<Point>], others: &[Vec<Point>]) -> Vec<BoolEdge> {
    let mut out = Vec::new();
    let mut params: Vec<f64> = Vec::new();
    for poly in polys {
        let n = poly.len();
        for i in 0..n {
            let p = poly[i];
            let q = poly[(i + 1) % n];
            if p.distance_squared(q) < GEOM_EPSILON {
                continue;
            }
            params.clear();
            for other in others {
                let m = other.len();
                for j in 0..m {
                    let r = other[j];
                    let s = other[(j + 1) % m];
                    if let Some((t, _)) = segment_intersection(p, q, r, s) {
                        if t > 1e-9 && t < 1.0 - 1e-9 {
                            params.push(t);
                        }
                    }
                }
            }
            params.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            params.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
            let mut prev = p;
            for &t in params.iter() {
                let split = p.lerp(q, t);
                out.push(BoolEdge { from: prev, to: split });
                prev = split;
            }
            out.push(BoolEdge { from: prev, to: q });
        }
    }
    out
}

/// Intersection parameters of segments `a0..a1` and `b0..b1`, if any.
fn segment_intersection(a0: Point, a1: Point, b0: Point, b1: Point) -> Option<(f64, f64)> {
    let e1 = a1 - a0;
    let e2 = b1 - b0;
    let denom = e1.cross(e2);
    if denom.abs() < GEOM_EPSILON {
        // parallel or collinear; overlaps resolve through midpoint winding
        return None;
    }
    let d = b0 - a0;
    let t = d.cross(e2) / denom;
    let u = d.cross(e1) / denom;
    if (-1e-9..=1.0 + 1e-9).contains(&t) && (-1e-9..=1.0 + 1e-9).contains(&u) {
        Some((t, u))
    } else {
        None
    }
}

/// Non-zero winding of `p` with respect to a polygon set.
fn winding(polys: &[Vec<Point>], p: Point) -> i32 {
    let mut w = 0i32;
    for poly in polys {
        let n = poly.len();
        for i in 0..n {
            let a = poly[i];
            let b = poly[(i + 1) % n];
            if a.y <= p.y {
                if b.y > p.y && (b - a).cross(p - a) > 0.0 {
                    w += 1;
                }
            } else if b.y <= p.y && (b - a).cross(p - a) < 0.0 {
                w -= 1;
            }
        }
    }
    w
}

const QUANT: f64 = 1.0 / 16384.0;

fn quantize(p: Point) -> (i64, i64) {
    ((p.x / QUANT).round() as i64, (p.y / QUANT).round() as i64)
}

/// Rechain directed edges into closed loops by endpoint matching.
fn chain_loops(edges: Vec<BoolEdge>) -> Path {
    let mut by_start: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (i, e) in edges.iter().enumerate() {
        by_start.entry(quantize(e.from)).or_default().push(i);
    }
    let mut used = vec![false; edges.len()];
    let mut out = Path::new();
    let mut dropped = 0usize;

    for start in 0..edges.len() {
        if used[start] {
            continue;
        }
        let mut ring: Vec<Point> = vec![edges[start].from];
        let ring_key = quantize(edges[start].from);
        used[start] = true;
        let mut cursor = edges[start].to;
        let mut closed = false;
        loop {
            let key = quantize(cursor);
            if key == ring_key {
                closed = true;
                break;
            }
            let Some(candidates) = by_start.get(&key) else {
                break;
            };
            let Some(&next) = candidates.iter().find(|&&i| !used[i]) else {
                break;
            };
            used[next] = true;
            ring.push(edges[next].from);
            cursor = edges[next].to;
        }
        if closed && ring.len() >= 3 {
            out.commands.push(PathCommand::MoveTo(ring[0]));
            for &p in &ring[1..] {
                out.commands.push(PathCommand::LineTo(p));
            }
            out.commands.push(PathCommand::Close);
        } else {
            dropped += ring.len();
        }
    }
    if dropped > 0 {
        log::debug!("boolean reassembly dropped {dropped} dangling edges");
    }
    out
}

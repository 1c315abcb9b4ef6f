// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
use proptest::prelude::*;
use vexel_core::raster::rasterize_path;
use vexel_core::{Color, Context, FillRule, Matrix, PathBuilder, Point};

proptest! {
    #[test]
    fn matrix_serde_roundtrip(m in testutil::matrix_strategy()) {
        let json = serde_json::to_string(&m).unwrap();
        let parsed: Matrix = serde_json::from_str(&json).unwrap();
        prop_assert!((m.a - parsed.a).abs() < 1e-9);
        prop_assert!((m.b - parsed.b).abs() < 1e-9);
        prop_assert!((m.c - parsed.c).abs() < 1e-9);
        prop_assert!((m.d - parsed.d).abs() < 1e-9);
        prop_assert!((m.tx - parsed.tx).abs() < 1e-9);
        prop_assert!((m.ty - parsed.ty).abs() < 1e-9);
    }

    #[test]
    fn transform_roundtrip_within_tolerance(
        m in testutil::matrix_strategy(),
        p in testutil::point_strategy(),
    ) {
        let inv = m.invert().unwrap();
        let back = inv.map_point(m.map_point(p));
        prop_assert!(back.distance(p) < 1e-6);
    }

    #[test]
    fn path_transform_roundtrip(
        m in testutil::matrix_strategy(),
        a in testutil::point_strategy(),
        b in testutil::point_strategy(),
        c in testutil::point_strategy(),
    ) {
        let mut builder = PathBuilder::new();
        builder.move_to(a.x, a.y);
        builder.line_to(b.x, b.y);
        builder.quad_to(c.x, c.y, a.x, a.y);
        builder.close();
        let path = builder.build();
        let back = path.transform(&m).transform(&m.invert().unwrap());
        let eps = 1e-6;
        let b0 = path.bounds();
        let b1 = back.bounds();
        prop_assert!((b0.left - b1.left).abs() < eps);
        prop_assert!((b0.top - b1.top).abs() < eps);
        prop_assert!((b0.width - b1.width).abs() < eps);
        prop_assert!((b0.height - b1.height).abs() < eps);
    }

    #[test]
    fn spans_satisfy_universal_invariants(r in testutil::rect_strategy()) {
        let mut b = PathBuilder::new();
        b.rect(r.left, r.top, r.width, r.height);
        let spans = rasterize_path(&b.build(), FillRule::NonZero, 0.25, 64, 64);
        let mut prev = None;
        for s in &spans {
            prop_assert!(s.coverage > 0);
            prop_assert!(s.len >= 1);
            prop_assert!(s.x >= 0 && s.y >= 0);
            prop_assert!(s.y < 64);
            prop_assert!(s.x + s.len as i32 <= 64);
            if let Some((py, px)) = prev {
                prop_assert!((py, px) < (s.y, s.x));
            }
            prev = Some((s.y, s.x));
        }
    }

    #[test]
    fn untouched_pixels_survive_fill(r in testutil::rect_strategy(), color in testutil::color_strategy()) {
        let mut ctx = Context::new(64, 64).unwrap();
        ctx.clear(Some(Color::from_rgb(9, 9, 9)));
        ctx.set_fill_color(color);
        let mut b = PathBuilder::new();
        b.rect(r.left, r.top, r.width, r.height);
        let path = b.build();
        let spans = rasterize_path(&path, FillRule::NonZero, 0.25, 64, 64);
        let mut covered = vec![false; 64 * 64];
        for s in &spans {
            for x in s.x..s.x + s.len as i32 {
                covered[(s.y * 64 + x) as usize] = true;
            }
        }
        ctx.fill(&path);
        for y in 0..64 {
            for x in 0..64 {
                if !covered[(y * 64 + x) as usize] {
                    prop_assert_eq!(ctx.get_pixel(x, y), Color::from_rgb(9, 9, 9));
                }
            }
        }
    }

    #[test]
    fn save_restore_balance(depth in 1usize..6) {
        let mut ctx = Context::new(16, 16).unwrap();
        ctx.translate(2.0, 3.0);
        ctx.set_global_alpha(0.7);
        let before = ctx.current_transform();
        for i in 0..depth {
            ctx.save();
            ctx.rotate(0.3 * (i as f64 + 1.0));
            ctx.translate(i as f64, -(i as f64));
        }
        for _ in 0..depth {
            ctx.restore();
        }
        let after = ctx.current_transform();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn contains_matches_rasterizer(r in testutil::rect_strategy(), p in testutil::canvas_point_strategy()) {
        let mut b = PathBuilder::new();
        b.rect(r.left, r.top, r.width, r.height);
        let path = b.build();
        // stay away from the anti-aliased boundary band
        let inset = Point::new(p.x, p.y);
        let well_inside = inset.x > r.left + 1.0
            && inset.x < r.right() - 1.0
            && inset.y > r.top + 1.0
            && inset.y < r.bottom() - 1.0;
        let well_outside = inset.x < r.left - 1.0
            || inset.x > r.right() + 1.0
            || inset.y < r.top - 1.0
            || inset.y > r.bottom() + 1.0;
        if well_inside {
            prop_assert!(path.contains(inset, FillRule::NonZero));
        } else if well_outside {
            prop_assert!(!path.contains(inset, FillRule::NonZero));
        }
    }
}

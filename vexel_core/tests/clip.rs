// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
use vexel_core::{Color, Context, PathBuilder};

fn full_rect(ctx: &mut Context) {
    let mut b = PathBuilder::new();
    b.rect(0.0, 0.0, ctx.width() as f64, ctx.height() as f64);
    ctx.fill(&b.build());
}

fn circle_path(cx: f64, cy: f64, r: f64) -> vexel_core::Path {
    let mut b = PathBuilder::new();
    b.circle(cx, cy, r);
    b.build()
}

#[test]
fn circle_clip_scenario() {
    let mut ctx = Context::new(200, 200).unwrap();
    ctx.set_fill_color(Color::BLACK);
    full_rect(&mut ctx);
    ctx.clip(&circle_path(100.0, 100.0, 50.0));
    ctx.set_fill_color(Color::from_rgb(0, 0, 255));
    full_rect(&mut ctx);

    assert_eq!(ctx.get_pixel(100, 100), Color::from_rgb(0, 0, 255));
    assert_eq!(ctx.get_pixel(10, 10), Color::BLACK);
    assert_eq!(ctx.get_pixel(160, 160), Color::BLACK);
    // well inside the rim
    assert_eq!(ctx.get_pixel(100, 145), Color::from_rgb(0, 0, 255));
    // well outside the rim
    assert_eq!(ctx.get_pixel(100, 160), Color::BLACK);
    // every pixel stays fully opaque
    assert!(ctx.pixels().iter().all(|&p| p >> 24 == 0xFF));
}

#[test]
fn clip_is_idempotent() {
    let mut a = Context::new(80, 80).unwrap();
    let mut b = Context::new(80, 80).unwrap();
    let clip = circle_path(40.0, 40.0, 25.0);
    a.clip(&clip);
    b.clip(&clip);
    b.clip(&clip);
    a.set_fill_color(Color::from_rgb(200, 10, 10));
    b.set_fill_color(Color::from_rgb(200, 10, 10));
    full_rect(&mut a);
    full_rect(&mut b);
    assert_eq!(a.pixels(), b.pixels());
}

#[test]
fn nested_clips_intersect() {
    let mut ctx = Context::new(60, 60).unwrap();
    ctx.clip_rect(0.0, 0.0, 40.0, 60.0);
    ctx.clip_rect(20.0, 0.0, 40.0, 60.0);
    full_rect(&mut ctx);
    assert_eq!(ctx.get_pixel(30, 30), Color::BLACK);
    assert_eq!(ctx.get_pixel(10, 30), Color::TRANSPARENT);
    assert_eq!(ctx.get_pixel(50, 30), Color::TRANSPARENT);
}

#[test]
fn reset_clip_restores_full_canvas() {
    let mut ctx = Context::new(30, 30).unwrap();
    ctx.clip_rect(0.0, 0.0, 5.0, 5.0);
    ctx.reset_clip();
    full_rect(&mut ctx);
    assert_eq!(ctx.get_pixel(25, 25), Color::BLACK);
}

#[test]
fn clip_respects_transform() {
    let mut ctx = Context::new(60, 60).unwrap();
    ctx.translate(30.0, 30.0);
    ctx.clip_rect(-5.0, -5.0, 10.0, 10.0);
    ctx.reset_transform();
    full_rect(&mut ctx);
    assert_eq!(ctx.get_pixel(30, 30), Color::BLACK);
    assert_eq!(ctx.get_pixel(10, 10), Color::TRANSPARENT);
}

#[test]
fn save_restore_scopes_clip() {
    let mut ctx = Context::new(40, 40).unwrap();
    ctx.save();
    ctx.clip_rect(0.0, 0.0, 10.0, 10.0);
    ctx.restore();
    full_rect(&mut ctx);
    assert_eq!(ctx.get_pixel(30, 30), Color::BLACK);
}

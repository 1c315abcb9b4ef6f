// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use vexel_core::{
    Bitmap, Color, Context, GradientStop, Paint, PathBuilder, PatternRepeat, Point, SpreadMode,
};

fn red_blue() -> Vec<GradientStop> {
    vec![
        GradientStop::new(0.0, Color::from_rgb(255, 0, 0)),
        GradientStop::new(1.0, Color::from_rgb(0, 0, 255)),
    ]
}

fn rect_path(x: f64, y: f64, w: f64, h: f64) -> vexel_core::Path {
    let mut b = PathBuilder::new();
    b.rect(x, y, w, h);
    b.build()
}

#[test]
fn linear_gradient_scenario() {
    let mut ctx = Context::new(100, 60).unwrap();
    ctx.set_fill_paint(Paint::linear_gradient(
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
        &red_blue(),
        SpreadMode::Pad,
    ));
    ctx.fill(&rect_path(0.0, 0.0, 100.0, 50.0));

    let left = ctx.get_pixel(0, 25);
    assert!(left.r > 200 && left.b < 60, "left {left:?}");
    let mid = ctx.get_pixel(50, 25);
    assert!(mid.r > 100 && mid.b > 100 && mid.g < 40, "mid {mid:?}");
    let right = ctx.get_pixel(99, 25);
    assert!(right.b > 200 && right.r < 60, "right {right:?}");
    // outside the filled rect
    assert_eq!(ctx.get_pixel(50, 55), Color::TRANSPARENT);
}

#[test]
fn gradient_follows_baked_transform() {
    let mut ctx = Context::new(100, 40).unwrap();
    ctx.translate(50.0, 0.0);
    ctx.set_fill_paint(Paint::linear_gradient(
        Point::new(0.0, 0.0),
        Point::new(50.0, 0.0),
        &red_blue(),
        SpreadMode::Pad,
    ));
    ctx.fill(&rect_path(0.0, 0.0, 50.0, 40.0));
    // gradient origin moved with the transform
    let origin = ctx.get_pixel(51, 20);
    assert!(origin.r > 200);
    let end = ctx.get_pixel(98, 20);
    assert!(end.b > 180);
}

#[test]
fn radial_gradient_rings() {
    let mut ctx = Context::new(100, 100).unwrap();
    ctx.set_fill_paint(Paint::radial_gradient(
        Point::new(50.0, 50.0),
        40.0,
        &red_blue(),
        SpreadMode::Pad,
    ));
    ctx.fill(&rect_path(0.0, 0.0, 100.0, 100.0));
    let center = ctx.get_pixel(50, 50);
    assert!(center.r > 200);
    let rim = ctx.get_pixel(50, 95);
    assert!(rim.b > 200);
    let halfway = ctx.get_pixel(50, 30);
    assert!(halfway.r > 80 && halfway.b > 80);
}

#[test]
fn conic_gradient_sweeps() {
    let mut ctx = Context::new(100, 100).unwrap();
    ctx.set_fill_paint(Paint::conic_gradient(Point::new(50.0, 50.0), 0.0, &red_blue()));
    ctx.fill(&rect_path(0.0, 0.0, 100.0, 100.0));
    // just above the +x axis the sweep has barely begun
    let near_start = ctx.get_pixel(90, 51);
    assert!(near_start.r > 200);
    // just below the axis it has nearly wrapped
    let near_end = ctx.get_pixel(90, 49);
    assert!(near_end.b > 200);
}

#[test]
fn reflect_spread_bounces() {
    let mut ctx = Context::new(60, 20).unwrap();
    ctx.set_fill_paint(Paint::linear_gradient(
        Point::new(0.0, 0.0),
        Point::new(20.0, 0.0),
        &red_blue(),
        SpreadMode::Reflect,
    ));
    ctx.fill(&rect_path(0.0, 0.0, 60.0, 20.0));
    // t = 1.5 reflects to 0.5, t = 2.0 back to red
    let reflected = ctx.get_pixel(30, 10);
    assert!(reflected.r > 80 && reflected.b > 80);
    let wrapped = ctx.get_pixel(40, 10);
    assert!(wrapped.r > 200, "wrapped {wrapped:?}");
}

#[test]
fn pattern_fill_tiles() {
    let mut tile = Bitmap::new(2, 2).unwrap();
    tile.set_pixel(0, 0, Color::from_rgb(255, 0, 0));
    tile.set_pixel(1, 0, Color::from_rgb(0, 255, 0));
    tile.set_pixel(0, 1, Color::from_rgb(0, 0, 255));
    tile.set_pixel(1, 1, Color::from_rgb(255, 255, 255));

    let mut ctx = Context::new(8, 8).unwrap();
    ctx.set_fill_paint(Paint::pattern(Arc::new(tile), PatternRepeat::Repeat, None));
    ctx.fill(&rect_path(0.0, 0.0, 8.0, 8.0));
    // texel centers land exactly on pixel centers, so tiling is crisp
    assert_eq!(ctx.get_pixel(0, 0), Color::from_rgb(255, 0, 0));
    assert_eq!(ctx.get_pixel(1, 0), Color::from_rgb(0, 255, 0));
    assert_eq!(ctx.get_pixel(2, 0), Color::from_rgb(255, 0, 0));
    assert_eq!(ctx.get_pixel(0, 1), Color::from_rgb(0, 0, 255));
    assert_eq!(ctx.get_pixel(5, 3), ctx.get_pixel(1, 1));
}

#[test]
fn no_repeat_pattern_is_transparent_outside() {
    let mut tile = Bitmap::new(2, 2).unwrap();
    tile.clear(Color::from_rgb(40, 80, 120));
    let mut ctx = Context::new(10, 10).unwrap();
    ctx.set_fill_paint(Paint::pattern(Arc::new(tile), PatternRepeat::NoRepeat, None));
    ctx.fill(&rect_path(0.0, 0.0, 10.0, 10.0));
    assert_eq!(ctx.get_pixel(0, 0), Color::from_rgb(40, 80, 120));
    assert_eq!(ctx.get_pixel(6, 6), Color::TRANSPARENT);
}

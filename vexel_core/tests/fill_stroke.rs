// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
use vexel_core::{Color, Context, LineCap, PathBuilder};

fn rect_path(x: f64, y: f64, w: f64, h: f64) -> vexel_core::Path {
    let mut b = PathBuilder::new();
    b.rect(x, y, w, h);
    b.build()
}

#[test]
fn fill_rectangle_scenario() {
    let mut ctx = Context::new(100, 100).unwrap();
    ctx.clear(None);
    ctx.set_fill_color(Color::from_u32(0xFFFF0000));
    let mut b = PathBuilder::new();
    b.move_to(10.0, 10.0);
    b.line_to(40.0, 10.0);
    b.line_to(40.0, 30.0);
    b.line_to(10.0, 30.0);
    b.close();
    ctx.fill(&b.build());
    assert_eq!(ctx.get_pixel(25, 20).to_u32(), 0xFFFF0000);
    assert_eq!(ctx.get_pixel(5, 5).to_u32(), 0x00000000);
    assert_eq!(ctx.get_pixel(50, 25).to_u32(), 0x00000000);
}

#[test]
fn integer_rect_fills_exact_pixel_count() {
    let mut ctx = Context::new(64, 64).unwrap();
    let color = Color::from_rgb(0, 128, 255);
    ctx.set_fill_color(color);
    ctx.fill(&rect_path(7.0, 11.0, 13.0, 5.0));
    let count = ctx
        .pixels()
        .iter()
        .filter(|&&p| p == color.to_u32())
        .count();
    assert_eq!(count, 13 * 5);
    assert_eq!(ctx.get_pixel(7, 11), color);
    assert_eq!(ctx.get_pixel(19, 15), color);
    assert_eq!(ctx.get_pixel(20, 15), Color::TRANSPARENT);
}

#[test]
fn butt_stroke_extents() {
    let mut ctx = Context::new(100, 100).unwrap();
    ctx.set_stroke_color(Color::BLACK);
    ctx.set_line_width(20.0);
    ctx.set_line_cap(LineCap::Butt);
    let mut b = PathBuilder::new();
    b.move_to(10.0, 50.0);
    b.line_to(90.0, 50.0);
    ctx.stroke(&b.build());
    // interior of the band
    assert_eq!(ctx.get_pixel(48, 50), Color::BLACK);
    assert_eq!(ctx.get_pixel(50, 59), Color::BLACK);
    assert_eq!(ctx.get_pixel(50, 41), Color::BLACK);
    // beyond the butt caps
    assert_eq!(ctx.get_pixel(5, 50), Color::TRANSPARENT);
    assert_eq!(ctx.get_pixel(95, 50), Color::TRANSPARENT);
    // beyond the half width
    assert_eq!(ctx.get_pixel(50, 62), Color::TRANSPARENT);
    assert_eq!(ctx.get_pixel(50, 37), Color::TRANSPARENT);
}

#[test]
fn square_cap_overshoots_butt() {
    let mut ctx = Context::new(60, 40).unwrap();
    ctx.set_line_width(10.0);
    ctx.set_line_cap(LineCap::Square);
    let mut b = PathBuilder::new();
    b.move_to(20.0, 20.0);
    b.line_to(40.0, 20.0);
    ctx.stroke(&b.build());
    // square caps extend half the width past each end
    assert_eq!(ctx.get_pixel(17, 20), Color::BLACK);
    assert_eq!(ctx.get_pixel(43, 20), Color::BLACK);
    assert_eq!(ctx.get_pixel(12, 20), Color::TRANSPARENT);
}

#[test]
fn dash_pattern_scenario() {
    let mut ctx = Context::new(100, 60).unwrap();
    ctx.set_line_width(10.0);
    ctx.set_line_dash(&[20.0, 10.0], 0.0);
    let mut b = PathBuilder::new();
    b.move_to(10.0, 30.0);
    b.line_to(90.0, 30.0);
    ctx.stroke(&b.build());
    // on runs: [10,30) [40,60) [70,90); gaps between
    for x in [12, 20, 28, 42, 50, 58, 72, 80, 88] {
        assert_eq!(ctx.get_pixel(x, 30), Color::BLACK, "x = {x}");
    }
    for x in [32, 35, 38, 62, 65, 68, 93] {
        assert_eq!(ctx.get_pixel(x, 30), Color::TRANSPARENT, "x = {x}");
    }
}

#[test]
fn clear_line_dash_returns_solid() {
    let mut ctx = Context::new(100, 60).unwrap();
    ctx.set_line_width(10.0);
    ctx.set_line_dash(&[20.0, 10.0], 0.0);
    ctx.clear_line_dash();
    let mut b = PathBuilder::new();
    b.move_to(10.0, 30.0);
    b.line_to(90.0, 30.0);
    ctx.stroke(&b.build());
    assert_eq!(ctx.get_pixel(35, 30), Color::BLACK);
    assert_eq!(ctx.get_pixel(65, 30), Color::BLACK);
}

#[test]
fn transformed_fill_lands_in_device_space() {
    let mut ctx = Context::new(100, 100).unwrap();
    ctx.translate(50.0, 50.0);
    ctx.rotate(std::f64::consts::FRAC_PI_2);
    ctx.set_fill_color(Color::from_rgb(255, 0, 255));
    // a rect along +x in local space ends up along +y after rotation
    ctx.fill(&rect_path(10.0, -2.0, 20.0, 4.0));
    assert_eq!(ctx.get_pixel(50, 70), Color::from_rgb(255, 0, 255));
    assert_eq!(ctx.get_pixel(70, 50), Color::TRANSPARENT);
}

#[test]
fn empty_path_draws_nothing() {
    let mut ctx = Context::new(20, 20).unwrap();
    ctx.fill(&vexel_core::Path::new());
    ctx.stroke(&vexel_core::Path::new());
    assert!(ctx.pixels().iter().all(|&p| p == 0));
}

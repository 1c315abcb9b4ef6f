// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
use vexel_core::{difference, intersection, union, xor, Color, Context, PathBuilder};

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> vexel_core::Path {
    let mut b = PathBuilder::new();
    b.rect(x0, y0, x1 - x0, y1 - y0);
    b.build()
}

#[test]
fn intersection_fill_scenario() {
    let a = rect(10.0, 10.0, 40.0, 40.0);
    let b = rect(25.0, 25.0, 55.0, 55.0);
    let result = intersection(&a, &b);

    let mut ctx = Context::new(100, 100).unwrap();
    ctx.set_fill_color(Color::from_rgb(0, 255, 0));
    ctx.fill(&result);
    assert_eq!(ctx.get_pixel(30, 30), Color::from_rgb(0, 255, 0));
    assert_eq!(ctx.get_pixel(15, 15), Color::TRANSPARENT);
    assert_eq!(ctx.get_pixel(50, 50), Color::TRANSPARENT);
}

#[test]
fn union_fill_covers_both_operands() {
    let result = union(&rect(5.0, 5.0, 25.0, 25.0), &rect(15.0, 15.0, 35.0, 35.0));
    let mut ctx = Context::new(40, 40).unwrap();
    ctx.fill(&result);
    assert_eq!(ctx.get_pixel(10, 10), Color::BLACK);
    assert_eq!(ctx.get_pixel(30, 30), Color::BLACK);
    assert_eq!(ctx.get_pixel(20, 20), Color::BLACK);
    assert_eq!(ctx.get_pixel(30, 10), Color::TRANSPARENT);
}

#[test]
fn difference_fill_leaves_hole() {
    let result = difference(&rect(5.0, 5.0, 35.0, 35.0), &rect(15.0, 15.0, 25.0, 25.0));
    let mut ctx = Context::new(40, 40).unwrap();
    ctx.fill(&result);
    assert_eq!(ctx.get_pixel(10, 20), Color::BLACK);
    assert_eq!(ctx.get_pixel(20, 20), Color::TRANSPARENT);
    assert_eq!(ctx.get_pixel(30, 20), Color::BLACK);
}

#[test]
fn xor_fill_excludes_overlap() {
    let result = xor(&rect(5.0, 5.0, 25.0, 25.0), &rect(15.0, 15.0, 35.0, 35.0));
    let mut ctx = Context::new(40, 40).unwrap();
    ctx.fill(&result);
    assert_eq!(ctx.get_pixel(10, 10), Color::BLACK);
    assert_eq!(ctx.get_pixel(30, 30), Color::BLACK);
    assert_eq!(ctx.get_pixel(20, 20), Color::TRANSPARENT);
}

#[test]
fn operations_return_valid_paths_for_degenerate_input() {
    let mut b = PathBuilder::new();
    b.move_to(0.0, 0.0);
    b.line_to(30.0, 30.0);
    b.line_to(30.0, 0.0);
    b.line_to(0.0, 30.0);
    b.close();
    let bowtie = b.build();
    let square = rect(10.0, 10.0, 20.0, 20.0);
    // deterministic, no panic, fillable output
    for result in [
        union(&bowtie, &square),
        intersection(&bowtie, &square),
        difference(&bowtie, &square),
        xor(&bowtie, &square),
        union(&square, &vexel_core::Path::new()),
    ] {
        let mut ctx = Context::new(40, 40).unwrap();
        ctx.fill(&result);
    }
}

// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
//! Renders a showcase scene with every major engine feature and writes it
//! to `showcase.png`.

use image::{ImageBuffer, Rgba};
use vexel_core::{
    difference, BlendMode, Color, Context, GradientStop, LineCap, LineJoin, Paint, PathBuilder,
    Point, SpreadMode,
};

fn main() {
    let width = 480;
    let height = 320;
    let mut ctx = Context::new(width, height).expect("canvas dimensions are positive");
    ctx.clear(Some(Color::from_hex("#101018").unwrap()));

    // gradient backdrop card
    ctx.set_fill_paint(Paint::linear_gradient(
        Point::new(0.0, 0.0),
        Point::new(480.0, 320.0),
        &[
            GradientStop::new(0.0, Color::from_hex("#24345a").unwrap()),
            GradientStop::new(1.0, Color::from_hex("#5a2440").unwrap()),
        ],
        SpreadMode::Pad,
    ));
    let mut card = PathBuilder::new();
    card.round_rect(20.0, 20.0, 440.0, 280.0, 24.0);
    ctx.fill(&card.build());

    // a ring cut with a boolean difference, filled through a circular clip
    let mut outer = PathBuilder::new();
    outer.circle(150.0, 160.0, 90.0);
    let mut inner = PathBuilder::new();
    inner.circle(150.0, 160.0, 55.0);
    let ring = difference(&outer.build(), &inner.build());
    ctx.save();
    let mut clip = PathBuilder::new();
    clip.rect(40.0, 40.0, 400.0, 200.0);
    ctx.clip(&clip.build());
    ctx.set_fill_paint(Paint::radial_gradient(
        Point::new(150.0, 160.0),
        95.0,
        &[
            GradientStop::new(0.0, Color::from_hex("#ffd24a").unwrap()),
            GradientStop::new(1.0, Color::from_hex("#ff7a1a").unwrap()),
        ],
        SpreadMode::Pad,
    ));
    ctx.fill(&ring);
    ctx.restore();

    // overlapping translucent squares with a separable blend
    ctx.save();
    ctx.set_blend_mode(BlendMode::Screen);
    ctx.set_global_alpha(0.85);
    ctx.translate(300.0, 90.0);
    ctx.rotate(0.35);
    ctx.set_fill_color(Color::from_hex("#2ab7a9").unwrap());
    ctx.fill_rect(0.0, 0.0, 110.0, 110.0);
    ctx.translate(40.0, 40.0);
    ctx.set_fill_color(Color::from_hex("#b72a7e").unwrap());
    ctx.fill_rect(0.0, 0.0, 110.0, 110.0);
    ctx.restore();

    // dashed stroke with round joins across the card
    ctx.set_stroke_color(Color::from_hex("#e8e8f0").unwrap());
    ctx.set_line_width(7.0);
    ctx.set_line_cap(LineCap::Round);
    ctx.set_line_join(LineJoin::Round);
    ctx.set_line_dash(&[24.0, 14.0], 0.0);
    let mut wave = PathBuilder::new();
    wave.move_to(40.0, 270.0);
    wave.cubic_to(140.0, 220.0, 200.0, 310.0, 300.0, 260.0);
    wave.quad_to(380.0, 225.0, 440.0, 265.0);
    ctx.stroke(&wave.build());

    let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
            let c = ctx.get_pixel(x as i32, y as i32);
            Rgba([c.r, c.g, c.b, c.a])
        });
    img.save("showcase.png").expect("write showcase.png");
    println!("wrote showcase.png ({width}x{height})");
}

// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
#![no_main]
use libfuzzer_sys::fuzz_target;
use vexel_core::{Context, PathBuilder};

fn coord(bytes: &mut impl Iterator<Item = u8>) -> f64 {
    match bytes.next() {
        Some(b) => b as f64 - 96.0,
        None => 0.0,
    }
}

// Arbitrary command streams must never panic the pipeline.
fuzz_target!(|data: &[u8]| {
    let mut bytes = data.iter().copied();
    let mut builder = PathBuilder::new();
    while let Some(op) = bytes.next() {
        match op % 7 {
            0 => {
                builder.move_to(coord(&mut bytes), coord(&mut bytes));
            }
            1 => {
                builder.line_to(coord(&mut bytes), coord(&mut bytes));
            }
            2 => {
                builder.cubic_to(
                    coord(&mut bytes),
                    coord(&mut bytes),
                    coord(&mut bytes),
                    coord(&mut bytes),
                    coord(&mut bytes),
                    coord(&mut bytes),
                );
            }
            3 => {
                builder.arc(
                    coord(&mut bytes),
                    coord(&mut bytes),
                    coord(&mut bytes).abs(),
                    coord(&mut bytes),
                    coord(&mut bytes),
                    op & 8 != 0,
                );
            }
            4 => {
                builder.quad_to(
                    coord(&mut bytes),
                    coord(&mut bytes),
                    coord(&mut bytes),
                    coord(&mut bytes),
                );
            }
            5 => {
                builder.close();
            }
            _ => {
                builder.rect(
                    coord(&mut bytes),
                    coord(&mut bytes),
                    coord(&mut bytes).abs(),
                    coord(&mut bytes).abs(),
                );
            }
        }
    }
    let path = builder.build();
    let mut ctx = Context::new(64, 64).expect("fixed dimensions");
    ctx.fill(&path);
    ctx.set_line_width(3.0);
    ctx.set_line_dash(&[5.0, 2.0], 1.0);
    ctx.stroke(&path);
    ctx.clip(&path);
    ctx.fill_rect(0.0, 0.0, 64.0, 64.0);
});

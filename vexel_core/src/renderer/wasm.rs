// Copyright © SoftOboros Technology, Inc.
// SPDX-License-Identifier: MIT
//! Module: wasm canvas surface
//!
//! Browser-facing wrapper exporting the context's pixels as `ImageData`.

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
use wasm_bindgen::prelude::*;
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
use wasm_bindgen::Clamped;
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
use web_sys::ImageData;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
use crate::{renderer::Context, types::Color};

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
#[wasm_bindgen]
pub struct VexelSurface {
    ctx: Context,
    rgba: Vec<u8>,
}

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
#[wasm_bindgen]
impl VexelSurface {
    /// Create a surface with a transparent canvas.
    #[wasm_bindgen(constructor)]
    pub fn new(width: i32, height: i32) -> Result<VexelSurface, JsValue> {
        let ctx = Context::new(width, height).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { ctx, rgba: Vec::new() })
    }

    /// Fill the canvas with a solid hex color.
    #[wasm_bindgen]
    pub fn clear(&mut self, hex: &str) -> Result<(), JsValue> {
        let color = Color::from_hex(hex).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.ctx.clear(Some(color));
        Ok(())
    }

    /// Snapshot the canvas as browser `ImageData` (RGBA byte order).
    #[wasm_bindgen]
    pub fn image_data(&mut self) -> Result<ImageData, JsValue> {
        let width = self.ctx.width();
        let height = self.ctx.height();
        self.rgba.clear();
        self.rgba.reserve(width as usize * height as usize * 4);
        for &argb in self.ctx.pixels() {
            let c = Color::from_u32(argb);
            self.rgba.extend_from_slice(&[c.r, c.g, c.b, c.a]);
        }
        ImageData::new_with_u8_clamped_array_and_sh(Clamped(&self.rgba), width, height)
    }
}

#[cfg(not(all(target_arch = "wasm32", feature = "wasm")))]
pub struct VexelSurface;

#[cfg(not(all(target_arch = "wasm32", feature = "wasm")))]
impl VexelSurface {
    /// Stub constructor when compiled for non-wasm targets.
    pub fn new(_width: i32, _height: i32) -> Result<Self, &'static str> {
        Err("wasm feature requires wasm32 target")
    }
}

//! Layer placement onto the output canvas.
//!
//! Every layer goes through the same two steps: the prepared raster is pasted (clipped)
//! into a canvas-sized scratch buffer that starts out transparent, then the whole scratch
//! buffer is composited source-over onto the canvas. The scratch buffer is allocated once
//! and cleared between layers.

use image::{DynamicImage, RgbaImage};

use crate::{
    effects::composite::over_in_place,
    foundation::error::{PressError, PressResult},
    layout::geometry::DeviceGeometry,
    render::{
        canvas::Canvas,
        transform::{resize_exact, rotate_expand},
    },
};

/// Canvas plus the reusable per-layer scratch buffer.
pub struct Compositor {
    canvas: Canvas,
    scratch: Vec<u8>,
}

impl Compositor {
    /// Start from a transparent `width x height` canvas.
    pub fn new(width: u32, height: u32) -> PressResult<Self> {
        let canvas = Canvas::new(width, height)?;
        let scratch = vec![0; canvas.data().len()];
        Ok(Self { canvas, scratch })
    }

    /// The canvas as composited so far.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Finish and hand back the canvas.
    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }

    /// Place `raster` with its top-left corner at `(left, top)` and
    /// composite it over everything drawn before. Parts outside the canvas are clipped.
    pub fn draw(&mut self, raster: &RgbaImage, left: i32, top: i32) -> PressResult<()> {
        self.scratch.fill(0);
        if !self.paste(raster, left, top) {
            tracing::trace!(left, top, "layer lies entirely outside the canvas");
            return Ok(());
        }
        over_in_place(self.canvas.data_mut(), &self.scratch)
    }

    /// Copy the visible part of `raster` into scratch. Returns whether anything landed.
    fn paste(&mut self, raster: &RgbaImage, left: i32, top: i32) -> bool {
        let cw = i64::from(self.canvas.width());
        let ch = i64::from(self.canvas.height());
        let (rw, rh) = (i64::from(raster.width()), i64::from(raster.height()));
        let (left, top) = (i64::from(left), i64::from(top));

        let x0 = left.max(0);
        let x1 = (left + rw).min(cw);
        let y0 = top.max(0);
        let y1 = (top + rh).min(ch);
        if x0 >= x1 || y0 >= y1 {
            return false;
        }

        let src = raster.as_raw();
        let row_bytes = ((x1 - x0) * 4) as usize;
        for y in y0..y1 {
            let sy = y - top;
            let s = ((sy * rw + (x0 - left)) * 4) as usize;
            let d = ((y * cw + x0) * 4) as usize;
            self.scratch[d..d + row_bytes].copy_from_slice(&src[s..s + row_bytes]);
        }
        true
    }
}

/// Resize `source` to the layer's device size, then rotate it.
pub fn prepare_image_raster(
    source: &DynamicImage,
    geometry: &DeviceGeometry,
) -> PressResult<RgbaImage> {
    let (w, h) = geometry.size().ok_or_else(|| {
        PressError::render(format!(
            "image layer has non-positive device size {}x{}",
            geometry.width, geometry.height
        ))
    })?;
    let resized = resize_exact(&source.to_rgba8(), w, h)?;
    rotate_expand(&resized, geometry.angle)
}

/// Rotate a rendered text raster. Text keeps its natural size; only the angle applies.
pub fn prepare_text_raster(text: &RgbaImage, geometry: &DeviceGeometry) -> PressResult<RgbaImage> {
    rotate_expand(text, geometry.angle)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;

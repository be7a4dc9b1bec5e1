use std::path::Path;

use image::RgbaImage;

use crate::foundation::error::{PressError, PressResult};

/// Output surface, stored as row-major straight-alpha RGBA8 and fully transparent when new.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    /// Allocate a transparent `width x height` canvas.
    pub fn new(width: u32, height: u32) -> PressResult<Self> {
        if width == 0 || height == 0 {
            return Err(PressError::config(format!(
                "canvas size must be > 0, got {width}x{height}"
            )));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| PressError::config(format!("canvas {width}x{height} is too large")))?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Pixel at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.data[i..i + 4]);
        Some(px)
    }

    /// Copy of the canvas as an image buffer.
    pub fn to_rgba_image(&self) -> PressResult<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| PressError::render("canvas buffer does not match its size"))
    }

    /// Encode the canvas as RGBA PNG at `path`, creating parent directories.
    pub fn save_png(&self, path: &Path) -> PressResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                PressError::render(format!("create output dir '{}': {e}", parent.display()))
            })?;
        }
        let img = self.to_rgba_image()?;
        img.save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| PressError::render(format!("write png '{}': {e}", path.display())))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;

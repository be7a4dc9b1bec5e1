use crate::{layout::scale::ScaleContext, scene::model::Placement};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// Pixel-space geometry of one layer on the output canvas.
pub struct DeviceGeometry {
    /// Target width in pixels.
    pub width: i32,
    /// Target height in pixels.
    pub height: i32,
    /// Left offset of the (rotated) layer box in pixels; may be negative.
    pub left: i32,
    /// Top offset of the (rotated) layer box in pixels; may be negative.
    pub top: i32,
    /// Rotation in degrees, counter-clockwise. Not rounded and not normalized.
    pub angle: f64,
}

impl DeviceGeometry {
    /// Map design-space `placement` into device pixels.
    ///
    /// Lengths and offsets truncate toward zero. Angles outside `[0, 360)` are passed through
    /// unchanged; the rotation primitive decides what they look like.
    pub fn from_placement(placement: &Placement, scale: &ScaleContext) -> Self {
        Self {
            width: to_px(placement.hi_width * scale.ratio),
            height: to_px(placement.hi_height * scale.ratio),
            left: to_px(placement.hi_left * scale.landw_scale * scale.ratio),
            top: to_px(placement.hi_top * scale.landh_scale * scale.ratio),
            angle: placement.angle * 180.0 / std::f64::consts::PI,
        }
    }

    /// Target size as unsigned pixels, or `None` when either side is empty.
    pub fn size(&self) -> Option<(u32, u32)> {
        let w = u32::try_from(self.width).ok().filter(|w| *w > 0)?;
        let h = u32::try_from(self.height).ok().filter(|h| *h > 0)?;
        Some((w, h))
    }
}

// Saturating float-to-int cast; NaN maps to 0.
fn to_px(v: f64) -> i32 {
    v.trunc() as i32
}

#[cfg(test)]
#[path = "../../tests/unit/layout/geometry.rs"]
mod tests;

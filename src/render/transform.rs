use image::{Rgba, RgbaImage, imageops::FilterType};
use imageproc::geometric_transformations::{Interpolation, warp_into_with};

use crate::foundation::error::{PressError, PressResult};

/// Resample `src` to exactly `width x height` with a Lanczos3 kernel.
pub fn resize_exact(src: &RgbaImage, width: u32, height: u32) -> PressResult<RgbaImage> {
    if width == 0 || height == 0 {
        return Err(PressError::render(format!(
            "cannot resize to empty size {width}x{height}"
        )));
    }
    if src.dimensions() == (width, height) {
        return Ok(src.clone());
    }
    Ok(image::imageops::resize(src, width, height, FilterType::Lanczos3))
}

/// Size of the box that holds a `width x height` rectangle rotated by `angle_deg`
/// around its center.
pub fn expanded_size(width: u32, height: u32, angle_deg: f64) -> (u32, u32) {
    let theta = angle_deg.to_radians();
    let (sin, cos) = (snap(theta.sin()), snap(theta.cos()));
    let (w, h) = (f64::from(width), f64::from(height));

    let ext_w = snap((w * cos).abs() + (h * sin).abs());
    let ext_h = snap((w * sin).abs() + (h * cos).abs());
    let (cx, cy) = (w / 2.0, h / 2.0);

    let nw = snap(cx + ext_w / 2.0).ceil() - snap(cx - ext_w / 2.0).floor();
    let nh = snap(cy + ext_h / 2.0).ceil() - snap(cy - ext_h / 2.0).floor();
    (nw.max(1.0) as u32, nh.max(1.0) as u32)
}

/// Rotate `src` counter-clockwise by `angle_deg` with bicubic sampling, growing the
/// output so no corner is clipped. Uncovered pixels are fully transparent.
///
/// Output pixel centers that land inside the source rectangle are always covered; the
/// bicubic kernel reads clamped edge pixels there instead of transparent ones.
///
/// The angle is used as given: `360.0` and `0.0` differ only by resampling cost, and
/// non-finite angles are rejected.
pub fn rotate_expand(src: &RgbaImage, angle_deg: f64) -> PressResult<RgbaImage> {
    if !angle_deg.is_finite() {
        return Err(PressError::render(format!(
            "rotation angle must be finite, got {angle_deg}"
        )));
    }
    if angle_deg == 0.0 {
        return Ok(src.clone());
    }

    let (w, h) = src.dimensions();
    if w == 0 || h == 0 {
        return Err(PressError::render("cannot rotate an empty raster"));
    }
    let (nw, nh) = expanded_size(w, h, angle_deg);
    let padded = pad_clamped(src, EDGE_PAD);

    let theta = angle_deg.to_radians();
    let (sin, cos) = (snap(theta.sin()) as f32, snap(theta.cos()) as f32);
    let (half_nw, half_nh) = (nw as f32 / 2.0, nh as f32 / 2.0);
    let (half_w, half_h) = (w as f32 / 2.0, h as f32 / 2.0);
    let (src_w, src_h) = (w as f32, h as f32);
    let shift = EDGE_PAD as f32 - 0.5;

    // Inverse map from an output pixel center to continuous source coordinates (y down).
    let mapping = move |x: f32, y: f32| {
        let dx = x + 0.5 - half_nw;
        let dy = y + 0.5 - half_nh;
        let u = dx * cos - dy * sin + half_w;
        let v = dx * sin + dy * cos + half_h;
        if (0.0..src_w).contains(&u) && (0.0..src_h).contains(&v) {
            (u + shift, v + shift)
        } else {
            (f32::NAN, f32::NAN)
        }
    };

    let mut out = RgbaImage::new(nw, nh);
    warp_into_with(
        &padded,
        mapping,
        Interpolation::Bicubic,
        Rgba([0, 0, 0, 0]),
        &mut out,
    );
    Ok(out)
}

// imageproc's bicubic sampler only answers when the whole 4x4 neighborhood, plus one
// pixel of slack on the far side, is in bounds.
const EDGE_PAD: u32 = 3;

fn pad_clamped(src: &RgbaImage, pad: u32) -> RgbaImage {
    let (w, h) = src.dimensions();
    RgbaImage::from_fn(w + 2 * pad, h + 2 * pad, |x, y| {
        let sx = x.saturating_sub(pad).min(w - 1);
        let sy = y.saturating_sub(pad).min(h - 1);
        *src.get_pixel(sx, sy)
    })
}

fn snap(v: f64) -> f64 {
    let r = v.round();
    if (v - r).abs() < 1e-9 { r } else { v }
}

#[cfg(test)]
#[path = "../../tests/unit/render/transform.rs"]
mod tests;

//! CSS-like color filters applied to a layer's source raster before compositing.
//!
//! Every filter is a pure function from one raster to a new raster of the same size. The
//! math works on 8-bit channels the way classic raster libraries do it, so results are
//! approximate rather than colorimetric.

use image::{DynamicImage, RgbImage, RgbaImage};

use crate::{
    assets::color::TintColor,
    foundation::error::{PressError, PressResult},
    scene::model::FilterSpec,
};

/// Apply `filter` to `src`.
#[tracing::instrument(level = "debug", skip(src), fields(filter = filter.name(), w = src.width(), h = src.height()))]
pub fn apply_filter(src: &DynamicImage, filter: &FilterSpec) -> PressResult<DynamicImage> {
    match filter {
        FilterSpec::HueRotate { amount } => hue_tint(src, *amount).map(DynamicImage::ImageRgba8),
        FilterSpec::Invert {} => invert(src).map(DynamicImage::ImageRgba8),
        FilterSpec::SaturateTint { tint, .. } => luminosity_tint(src, *tint),
    }
}

/// Recolor every pixel to hue `amount` at full saturation, keeping value and alpha.
///
/// Despite the wire name (`css_hue_rotate`) this replaces the hue with a constant; it does
/// not rotate the existing hue.
pub fn hue_tint(src: &DynamicImage, amount: u8) -> PressResult<RgbaImage> {
    let rgba = src.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut out = rgba.into_raw();
    for px in out.chunks_exact_mut(4) {
        let [_, _, v] = rgb_to_hsv([px[0], px[1], px[2]]);
        let [r, g, b] = hsv_to_rgb([amount, 255, v]);
        px[0] = r;
        px[1] = g;
        px[2] = b;
    }

    RgbaImage::from_raw(width, height, out)
        .ok_or_else(|| PressError::filter("hue tint produced a mismatched buffer"))
}

/// Invert R, G and B (`255 - c`); alpha is left untouched.
pub fn invert(src: &DynamicImage) -> PressResult<RgbaImage> {
    let rgba = src.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut out = rgba.into_raw();
    for px in out.chunks_exact_mut(4) {
        for c in &mut px[..3] {
            *c = 255 - *c;
        }
    }

    RgbaImage::from_raw(width, height, out)
        .ok_or_else(|| PressError::filter("invert produced a mismatched buffer"))
}

/// Per-channel lookup tables mapping a gray level to the tinted channel value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TintLuts {
    /// Red table.
    pub r: [u8; 256],
    /// Green table.
    pub g: [u8; 256],
    /// Blue table.
    pub b: [u8; 256],
}

impl TintLuts {
    /// Build tables that keep the tint's luminosity: channel scale is `tint_c / L(tint)`.
    ///
    /// Scales above 1 would push bright grays past 255; those entries saturate at 255.
    pub fn for_tint(tint: TintColor) -> Self {
        let l = match tint.luminosity() {
            0 => 1.0,
            l => f64::from(l),
        };
        let table = |c: u8| -> [u8; 256] {
            let s = f64::from(c) / l;
            std::array::from_fn(|v| ((v as f64) * s + 0.5).floor().min(255.0) as u8)
        };
        Self {
            r: table(tint.r),
            g: table(tint.g),
            b: table(tint.b),
        }
    }
}

/// Recolor the grayscale of `src` with `tint`.
///
/// RGB input yields RGB output; RGBA input yields RGBA output carrying the original alpha.
/// Grayscale sources are rejected.
pub fn luminosity_tint(src: &DynamicImage, tint: TintColor) -> PressResult<DynamicImage> {
    let luts = TintLuts::for_tint(tint);
    let map_rgb = |px: &mut [u8]| {
        let l = luma([px[0], px[1], px[2]]);
        px[0] = luts.r[usize::from(l)];
        px[1] = luts.g[usize::from(l)];
        px[2] = luts.b[usize::from(l)];
    };

    match src {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgb16(_) | DynamicImage::ImageRgb32F(_) => {
            let rgb = src.to_rgb8();
            let (width, height) = rgb.dimensions();
            let mut out = rgb.into_raw();
            out.chunks_exact_mut(3).for_each(map_rgb);
            RgbImage::from_raw(width, height, out)
                .map(DynamicImage::ImageRgb8)
                .ok_or_else(|| PressError::filter("tint produced a mismatched rgb buffer"))
        }
        DynamicImage::ImageRgba8(_)
        | DynamicImage::ImageRgba16(_)
        | DynamicImage::ImageRgba32F(_) => {
            let rgba = src.to_rgba8();
            let (width, height) = rgba.dimensions();
            let mut out = rgba.into_raw();
            out.chunks_exact_mut(4).for_each(map_rgb);
            RgbaImage::from_raw(width, height, out)
                .map(DynamicImage::ImageRgba8)
                .ok_or_else(|| PressError::filter("tint produced a mismatched rgba buffer"))
        }
        other => Err(PressError::config(format!(
            "unsupported source color mode for tint: {:?}",
            other.color()
        ))),
    }
}

/// 8-bit luminosity, ITU-R 601-2 weights in 16.16 fixed point.
pub(crate) fn luma([r, g, b]: [u8; 3]) -> u8 {
    ((u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471 + 0x8000) >> 16) as u8
}

/// RGB to 8-bit HSV, hue scaled to `0..=255`.
pub(crate) fn rgb_to_hsv([r, g, b]: [u8; 3]) -> [u8; 3] {
    let maxc = r.max(g).max(b);
    let minc = r.min(g).min(b);
    if maxc == minc {
        return [0, 0, maxc];
    }

    let (rf, gf, bf) = (f64::from(r), f64::from(g), f64::from(b));
    let maxf = f64::from(maxc);
    let cr = maxf - f64::from(minc);
    let s = cr / maxf;
    let rc = (maxf - rf) / cr;
    let gc = (maxf - gf) / cr;
    let bc = (maxf - bf) / cr;
    let h = if r == maxc {
        bc - gc
    } else if g == maxc {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    let h = (h / 6.0 + 1.0).rem_euclid(1.0);

    [clip8(h * 255.0), clip8(s * 255.0), maxc]
}

/// 8-bit HSV back to RGB using the six-sextant split.
pub(crate) fn hsv_to_rgb([h, s, v]: [u8; 3]) -> [u8; 3] {
    if s == 0 {
        return [v, v, v];
    }

    let fh = f64::from(h) * 6.0 / 255.0;
    let i = fh.floor();
    let f = fh - i;
    let fs = f64::from(s) / 255.0;
    let vf = f64::from(v);
    let p = clip8((vf * (1.0 - fs)).round());
    let q = clip8((vf * (1.0 - fs * f)).round());
    let t = clip8((vf * (1.0 - fs * (1.0 - f))).round());

    match (i as u32) % 6 {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

fn clip8(x: f64) -> u8 {
    x.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/filters.rs"]
mod tests;

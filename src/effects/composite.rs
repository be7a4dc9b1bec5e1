use crate::foundation::error::{PressError, PressResult};

/// One straight-alpha RGBA8 pixel.
pub type Rgba8 = [u8; 4];

// Fixed-point fraction bits for the color coefficients.
const PRECISION_BITS: u32 = 7;

/// `x / 255` by shifts; exact for the rounded products below.
fn shift_div255(x: u32) -> u32 {
    ((x >> 8) + x) >> 8
}

/// Straight-alpha source-over-destination.
///
/// A fully transparent destination returns `src` unchanged, and a transparent `src`
/// leaves `dst` untouched. Colors are weighted by each side's share of the output alpha.
pub fn over(dst: Rgba8, src: Rgba8) -> Rgba8 {
    let sa = u32::from(src[3]);
    if sa == 0 {
        return dst;
    }

    let blend = u32::from(dst[3]) * (255 - sa);
    let out_a255 = sa * 255 + blend;
    let coef_src = sa * 255 * 255 * (1 << PRECISION_BITS) / out_a255;
    let coef_dst = 255 * (1 << PRECISION_BITS) - coef_src;

    let mut out = [0u8; 4];
    for i in 0..3 {
        let mixed = u32::from(src[i]) * coef_src + u32::from(dst[i]) * coef_dst;
        out[i] = (shift_div255(mixed + (0x80 << PRECISION_BITS)) >> PRECISION_BITS) as u8;
    }
    out[3] = shift_div255(out_a255 + 0x80) as u8;
    out
}

/// Composite a whole straight-alpha `src` buffer over `dst`, pixel for pixel.
pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> PressResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(PressError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;

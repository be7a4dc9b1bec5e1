use image::DynamicImage;

use crate::foundation::error::{PressError, PressResult};

/// Decode an encoded raster (PNG, JPEG, ...) keeping its native color mode.
///
/// Filters care whether the source had an alpha channel, so nothing is converted here.
pub fn decode_image(bytes: &[u8]) -> PressResult<DynamicImage> {
    if bytes.is_empty() {
        return Err(PressError::asset("image data is empty"));
    }
    let format = image::guess_format(bytes)
        .map_err(|e| PressError::asset(format!("unrecognized image format: {e}")))?;
    image::load_from_memory_with_format(bytes, format)
        .map_err(|e| PressError::asset(format!("decode {format:?} image: {e}")))
}

use super::*;

fn system_font_or_skip() -> Option<FontHandle> {
    match crate::assets::font::system_font(32.0) {
        Ok(font) => Some(font),
        Err(e) => {
            eprintln!("skipping text raster test: {e}");
            None
        }
    }
}

#[test]
fn empty_text_draws_nothing() {
    let font = FontHandle::from_bytes(b"not a font".to_vec(), 0, 12.0, "mem").unwrap();
    let mut r = TextRasterizer::new();
    assert!(r.rasterize("", &font).unwrap().is_none());
}

#[test]
fn garbage_font_bytes_are_an_asset_error() {
    let font = FontHandle::from_bytes(b"not a font".to_vec(), 0, 12.0, "mem").unwrap();
    let mut r = TextRasterizer::new();
    let err = r.rasterize("hello", &font).unwrap_err();
    assert!(matches!(err, PressError::Asset(_)), "{err}");
}

#[test]
fn text_renders_black_ink_on_transparent_background() {
    let Some(font) = system_font_or_skip() else {
        return;
    };
    let mut r = TextRasterizer::new();
    let img = r.rasterize("Hello", &font).unwrap().unwrap();

    assert!(img.width() > 10 && img.height() > 10);
    let mut inked = 0;
    for px in img.pixels() {
        if px[3] > 0 {
            inked += 1;
            assert!(px[0] <= 1 && px[1] <= 1 && px[2] <= 1, "{px:?}");
        }
    }
    assert!(inked > 0);
    assert!(img.pixels().any(|p| p[3] == 0));
}

#[test]
fn repeated_text_is_deterministic_and_families_are_cached() {
    let Some(font) = system_font_or_skip() else {
        return;
    };
    let mut r = TextRasterizer::new();
    let a = r.rasterize("abc", &font).unwrap();
    let b = r.rasterize("abc", &font).unwrap();
    assert_eq!(a, b);
    assert_eq!(r.families.len(), 1);
}

#[test]
fn longer_text_is_wider() {
    let Some(font) = system_font_or_skip() else {
        return;
    };
    let mut r = TextRasterizer::new();
    let short = r.rasterize("ab", &font).unwrap().unwrap();
    let long = r.rasterize("abababab", &font).unwrap().unwrap();
    assert!(long.width() > short.width());
}

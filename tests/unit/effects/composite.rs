use super::*;

#[test]
fn transparent_src_leaves_dst() {
    let dst = [10, 20, 30, 40];
    assert_eq!(over(dst, [255, 255, 255, 0]), dst);
}

#[test]
fn opaque_src_replaces_dst() {
    assert_eq!(over([0, 0, 0, 255], [255, 0, 0, 255]), [255, 0, 0, 255]);
}

#[test]
fn transparent_dst_returns_src_exactly() {
    for src in [[100, 110, 120, 200], [100, 200, 50, 3], [7, 0, 255, 1]] {
        assert_eq!(over([0, 0, 0, 0], src), src);
    }
}

#[test]
fn half_alpha_blends_toward_src() {
    assert_eq!(over([0, 0, 255, 255], [255, 0, 0, 128]), [128, 0, 127, 255]);
}

#[test]
fn translucent_over_translucent_accumulates_alpha() {
    let out = over([0, 0, 255, 128], [255, 0, 0, 128]);
    // 128 + 128 * (1 - 128/255) ~= 192
    assert!(out[3].abs_diff(192) <= 1, "{out:?}");
    // The source holds about two thirds of the result.
    assert!(out[0].abs_diff(170) <= 2, "{out:?}");
    assert!(out[2].abs_diff(85) <= 2, "{out:?}");
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4]).is_err());
    let mut odd = vec![0u8; 6];
    assert!(over_in_place(&mut odd, &[0u8; 6]).is_err());
}

#[test]
fn over_in_place_composites_every_pixel() {
    let mut dst = [0u8, 0, 0, 255].repeat(2);
    let src = [[255u8, 255, 255, 255], [0, 0, 0, 0]].concat();
    over_in_place(&mut dst, &src).unwrap();
    assert_eq!(&dst[0..4], &[255, 255, 255, 255]);
    assert_eq!(&dst[4..8], &[0, 0, 0, 255]);
}

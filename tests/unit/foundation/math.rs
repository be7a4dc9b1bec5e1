use super::*;

#[test]
fn fnv_split_writes_match_single_write() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"layerpress");
    let mut b = Fnv1a64::new_default();
    b.write_u8(b'l');
    b.write_bytes(b"ayerpress");
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn fnv_fields_do_not_alias() {
    let mut a = Fnv1a64::new_default();
    a.write_field("ab");
    a.write_field("c");
    let mut b = Fnv1a64::new_default();
    b.write_field("a");
    b.write_field("bc");
    assert_ne!(a.finish(), b.finish());
}

#[test]
fn unpremultiply_keeps_opaque_and_clears_transparent() {
    let mut px = vec![10u8, 20, 30, 255, 200, 100, 50, 0];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, [10, 20, 30, 255, 0, 0, 0, 0]);
}

#[test]
fn unpremultiply_scales_partial_alpha_back_up() {
    let mut px = vec![64u8, 32, 0, 128];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, [128, 64, 0, 128]);
}

use super::*;

fn tmp_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("unit_font")
        .join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn last_web_font_entry_wins() {
    let raw = r#"{
        "mono": {"file": "mono.ttf", "web_font": true},
        "plain": {"file": "plain.ttf"},
        "serif": {"file": "serif.ttf", "web_font": 1},
        "off": {"file": "off.ttf", "web_font": false}
    }"#;
    assert_eq!(parse_web_font_file(raw).unwrap().as_deref(), Some("serif.ttf"));
}

#[test]
fn config_without_web_fonts_yields_none() {
    let raw = r#"{"a": {"file": "a.ttf"}, "b": {"file": "b.ttf", "web_font": ""}}"#;
    assert_eq!(parse_web_font_file(raw).unwrap(), None);
}

#[test]
fn malformed_config_is_a_config_error() {
    assert!(matches!(
        parse_web_font_file("{not json").unwrap_err(),
        PressError::Config(_)
    ));
    assert!(matches!(
        parse_web_font_file("[1, 2]").unwrap_err(),
        PressError::Config(_)
    ));
    assert!(matches!(
        parse_web_font_file(r#"{"x": {"web_font": true}}"#).unwrap_err(),
        PressError::Config(_)
    ));
}

#[test]
fn missing_config_file_is_not_an_error() {
    let dir = tmp_dir("missing_config");
    assert_eq!(web_font_file(&dir.join("nope.json")).unwrap(), None);
}

#[test]
fn handle_rejects_bad_sizes_and_empty_data() {
    assert!(FontHandle::from_bytes(vec![1, 2, 3], 0, 0.0, "x").is_err());
    assert!(FontHandle::from_bytes(vec![1, 2, 3], 0, f32::NAN, "x").is_err());
    assert!(matches!(
        FontHandle::from_bytes(Vec::new(), 0, 12.0, "x").unwrap_err(),
        PressError::Asset(_)
    ));
}

#[test]
fn fingerprint_and_digest_track_content() {
    let a = FontHandle::from_bytes(b"abc".to_vec(), 0, 12.0, "a").unwrap();
    let b = FontHandle::from_bytes(b"abd".to_vec(), 0, 12.0, "b").unwrap();
    let a2 = FontHandle::from_bytes(b"abc".to_vec(), 0, 30.0, "elsewhere").unwrap();
    assert_ne!(a.fingerprint(), b.fingerprint());
    assert_eq!(a.fingerprint(), a2.fingerprint());
    assert_ne!(
        a.fingerprint(),
        FontHandle::from_bytes(b"abc".to_vec(), 1, 12.0, "a").unwrap().fingerprint()
    );
    assert!(Arc::ptr_eq(&a.shared_bytes(), &a.clone().shared_bytes()));
    assert_eq!(
        a.sha256_hex(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn configured_web_font_is_loaded_from_fonts_dir() {
    let dir = tmp_dir("configured");
    std::fs::write(dir.join("brand.ttf"), b"font-bytes").unwrap();
    std::fs::write(
        dir.join("fonts.json"),
        r#"{"brand": {"file": "brand.ttf", "web_font": true}}"#,
    )
    .unwrap();

    let resolver = ConfiguredFontResolver {
        config_path: Some(dir.join("fonts.json")),
        fonts_dir: dir.clone(),
        font_path: None,
        size_px: 31.0,
        system_fallback: false,
    };
    let font = resolver.resolve().unwrap();
    assert_eq!(font.bytes(), b"font-bytes");
    assert_eq!(font.size_px(), 31.0);
    assert!(font.source().ends_with("brand.ttf"));
}

#[test]
fn missing_web_font_file_is_an_asset_error() {
    let dir = tmp_dir("missing_web_font");
    std::fs::write(
        dir.join("fonts.json"),
        r#"{"brand": {"file": "gone.ttf", "web_font": true}}"#,
    )
    .unwrap();
    std::fs::write(dir.join("explicit.ttf"), b"explicit").unwrap();

    let resolver = ConfiguredFontResolver {
        config_path: Some(dir.join("fonts.json")),
        fonts_dir: dir.clone(),
        font_path: Some(dir.join("explicit.ttf")),
        size_px: DEFAULT_FONT_SIZE_PX,
        system_fallback: true,
    };
    let err = resolver.resolve().unwrap_err();
    assert!(matches!(err, PressError::Asset(_)), "{err}");
    assert!(err.to_string().contains("gone.ttf"), "{err}");
}

#[test]
fn config_without_web_font_falls_through_to_font_path() {
    let dir = tmp_dir("fallthrough");
    std::fs::write(dir.join("fonts.json"), r#"{"plain": {"file": "plain.ttf"}}"#).unwrap();
    std::fs::write(dir.join("explicit.ttf"), b"explicit").unwrap();

    let resolver = ConfiguredFontResolver {
        config_path: Some(dir.join("fonts.json")),
        fonts_dir: dir.clone(),
        font_path: Some(dir.join("explicit.ttf")),
        size_px: DEFAULT_FONT_SIZE_PX,
        system_fallback: false,
    };
    assert_eq!(resolver.resolve().unwrap().bytes(), b"explicit");
}

#[test]
fn nothing_configured_and_no_system_fallback_is_an_asset_error() {
    let resolver = ConfiguredFontResolver {
        system_fallback: false,
        ..ConfiguredFontResolver::default()
    };
    assert!(matches!(resolver.resolve().unwrap_err(), PressError::Asset(_)));
}

#[test]
fn fixed_resolver_returns_its_font() {
    let font = FontHandle::from_bytes(b"f".to_vec(), 2, 10.0, "mem").unwrap();
    let resolved = FixedFontResolver(font).resolve().unwrap();
    assert_eq!(resolved.index(), 2);
    assert_eq!(resolved.source(), "mem");
}

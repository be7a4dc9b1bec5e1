use super::*;

fn input(cwidth: u32, cheight: u32, small_w: u32, small_h: u32) -> ScaleInput {
    ScaleInput {
        cwidth,
        cheight,
        small_w,
        small_h,
    }
}

#[test]
fn square_canvas_has_unit_landscape_scales() {
    for (c, s) in [(100u32, 50u32), (600, 300), (1455, 291), (7, 7)] {
        let ctx = ScaleContext::from_input(&input(c, c, s, s)).unwrap();
        assert_eq!(ctx.landw_scale, 1.0);
        assert_eq!(ctx.landh_scale, 1.0);
        assert_eq!(ctx.ratio, f64::from(c) / f64::from(s));
    }
}

#[test]
fn portrait_canvas_follows_width() {
    let ctx = ScaleContext::from_input(&input(1455, 1800, 291, 360)).unwrap();
    assert_eq!(ctx.ratio, 5.0);
    assert_eq!(ctx.landw_scale, 1.0);
    assert_eq!(ctx.landh_scale, 1.0);
}

#[test]
fn landscape_canvas_ratio_follows_height_exactly() {
    let ctx = ScaleContext::from_input(&input(800, 600, 400, 300)).unwrap();
    assert_eq!(ctx.ratio, 600.0 / 300.0);
    assert_eq!(ctx.landw_scale, 1.0);
    assert_eq!(ctx.landh_scale, 1.0);

    let ctx = ScaleContext::from_input(&input(1600, 600, 400, 300)).unwrap();
    assert_eq!(ctx.ratio, 2.0);
    assert_eq!(ctx.landw_scale, 2.0);
    assert_eq!(ctx.landh_scale, 1.0);
}

#[test]
fn zero_dimensions_are_config_errors() {
    for bad in [
        input(0, 10, 1, 1),
        input(10, 0, 1, 1),
        input(10, 10, 0, 1),
        input(10, 10, 1, 0),
    ] {
        let err = ScaleContext::from_input(&bad).unwrap_err();
        assert!(matches!(err, PressError::Config(_)), "{err}");
    }
}

#[test]
fn ratio_record_parses_from_json_and_rejects_extras() {
    let parsed: ScaleInput = serde_json::from_str(
        r#"{"cwidth": 1455, "cheight": 1800, "small_w": 291, "small_h": 360}"#,
    )
    .unwrap();
    assert_eq!(parsed, input(1455, 1800, 291, 360));

    let extra = serde_json::from_str::<ScaleInput>(
        r#"{"cwidth": 1, "cheight": 1, "small_w": 1, "small_h": 1, "dpi": 300}"#,
    );
    assert!(extra.is_err());
}

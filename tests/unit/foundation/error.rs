use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PressError::config("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(PressError::asset("x").to_string().contains("asset error:"));
    assert!(PressError::filter("x").to_string().contains("filter error:"));
    assert!(PressError::render("x").to_string().contains("render error:"));
    assert!(
        PressError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PressError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn only_filter_errors_report_is_filter() {
    assert!(PressError::filter("x").is_filter());
    assert!(!PressError::render("x").is_filter());
    assert!(!PressError::config("x").is_filter());
}

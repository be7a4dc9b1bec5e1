use super::*;
use serde_json::json;

#[test]
fn parses_long_short_and_alpha_forms() {
    assert_eq!(
        TintColor::parse_hex("#ff8000").unwrap(),
        TintColor {
            r: 255,
            g: 128,
            b: 0
        }
    );
    assert_eq!(
        TintColor::parse_hex("F80").unwrap(),
        TintColor {
            r: 255,
            g: 136,
            b: 0
        }
    );
    assert_eq!(
        TintColor::parse_hex("#0000ff80").unwrap(),
        TintColor { r: 0, g: 0, b: 255 }
    );
}

#[test]
fn rejects_bad_lengths_and_digits() {
    assert!(TintColor::parse_hex("#ffff").is_err());
    assert!(TintColor::parse_hex("#gggggg").is_err());
    assert!(TintColor::parse_hex("").is_err());
    assert!(TintColor::parse_hex("#ééé").is_err());
    assert!(TintColor::parse_hex("+f+f+f").is_err());
}

#[test]
fn luminosity_uses_integer_601_weights() {
    assert_eq!(TintColor::WHITE.luminosity(), 255);
    assert_eq!(TintColor { r: 0, g: 0, b: 0 }.luminosity(), 0);
    assert_eq!(TintColor { r: 255, g: 0, b: 0 }.luminosity(), 76);
    assert_eq!(TintColor { r: 0, g: 255, b: 0 }.luminosity(), 149);
    assert_eq!(TintColor { r: 0, g: 0, b: 255 }.luminosity(), 29);
}

#[test]
fn serde_round_trips_through_hex_string() {
    let c: TintColor = serde_json::from_value(json!("#12ABef")).unwrap();
    assert_eq!(c.to_hex(), "#12abef");
    assert_eq!(serde_json::to_value(c).unwrap(), json!("#12abef"));
    assert_eq!(TintColor::default(), TintColor::WHITE);
}

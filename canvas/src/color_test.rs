use super::*;

#[test]
fn parse_hex_accepts_both_cases() {
    assert_eq!(Rgb::parse_hex("#FF3B30"), Some(Rgb::new(255, 59, 48)));
    assert_eq!(Rgb::parse_hex("#a1b2c3"), Some(Rgb::new(161, 178, 195)));
    assert_eq!(Rgb::parse_hex("#A1b2C3"), Some(Rgb::new(161, 178, 195)));
}

#[test]
fn parse_hex_rejects_short_and_malformed_forms() {
    assert_eq!(Rgb::parse_hex("#abc"), None);
    assert_eq!(Rgb::parse_hex("FF3B30"), None);
    assert_eq!(Rgb::parse_hex("#FF3B3"), None);
    assert_eq!(Rgb::parse_hex("#FF3B300"), None);
    assert_eq!(Rgb::parse_hex("#12GG34"), None);
    assert_eq!(Rgb::parse_hex(" #FF3B30"), None);
    assert_eq!(Rgb::parse_hex("#FF3B30 "), None);
    assert_eq!(Rgb::parse_hex("red"), None);
    assert_eq!(Rgb::parse_hex(""), None);
}

#[test]
fn parse_hex_rejects_multibyte_input_without_panicking() {
    assert_eq!(Rgb::parse_hex("#ééé"), None);
}

#[test]
fn to_hex_is_canonical_lowercase() {
    assert_eq!(Rgb::new(255, 59, 48).to_hex(), "#ff3b30");
    assert_eq!(Rgb::new(0, 0, 0).to_string(), "#000000");
}

#[test]
fn serde_uses_hex_strings() {
    let json = serde_json::to_string(&Rgb::new(0, 122, 255)).unwrap();
    assert_eq!(json, "\"#007aff\"");
    let back: Rgb = serde_json::from_str("\"#007AFF\"").unwrap();
    assert_eq!(back, Rgb::new(0, 122, 255));
    assert!(serde_json::from_str::<Rgb>("\"blue\"").is_err());
}

// crates/canopen-od/src/utils.rs

//! Small number-parsing helpers shared by the readers.

/// Parses an unsigned literal written either as `0x`-prefixed hex or decimal.
pub fn parse_u64(text: &str) -> Option<u64> {
    let text = text.trim();
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

/// Like [`parse_u64`] but checked against the target width.
pub fn parse_unsigned<T: TryFrom<u64>>(text: &str) -> Option<T> {
    parse_u64(text).and_then(|v| T::try_from(v).ok())
}

/// Parses `0`/`1`/`true`/`false`.
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

/// Parses a hex index string such as `1018` or `0x1018`.
pub fn parse_hex_u16(text: &str) -> Option<u16> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.is_empty() || digits.len() > 4 {
        return None;
    }
    u16::from_str_radix(digits, 16).ok()
}

/// Parses a hex sub-index string such as `1`, `0A` or `0x0A`.
pub fn parse_hex_u8(text: &str) -> Option<u8> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.is_empty() || digits.len() > 2 {
        return None;
    }
    u8::from_str_radix(digits, 16).ok()
}

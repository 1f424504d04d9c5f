use alloy::primitives::utils::format_units;
use alloy::primitives::U256;
use serde::Serializer;

/// Shorten an address for display: `0x1234...abcd`.
pub fn format_address(address: &str, chars: usize) -> String {
    if address.is_empty() {
        return String::new();
    }
    if address.len() <= chars * 2 + 2 || !address.is_ascii() {
        return address.to_string();
    }
    format!(
        "{}...{}",
        &address[..chars + 2],
        &address[address.len() - chars..]
    )
}

/// Full-precision decimal rendering of a base-unit amount with trailing
/// zeros removed (`1000000000000000000` at 18 decimals is `"1"`).
pub fn format_balance(value: U256, decimals: u8) -> String {
    let formatted = match format_units(value, decimals) {
        Ok(s) => s,
        Err(_) => return value.to_string(),
    };
    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    }
}

/// Render a base-unit amount with exactly `places` decimals, rounding half up.
pub fn format_native_fixed(value: U256, decimals: u8, places: u8) -> String {
    let places = places.min(decimals);
    let ten = U256::from(10u64);
    let dropped = ten.pow(U256::from(decimals - places));
    let scaled = if dropped > U256::from(1u64) {
        value.saturating_add(dropped / U256::from(2u64)) / dropped
    } else {
        value
    };

    if places == 0 {
        return scaled.to_string();
    }

    let unit = ten.pow(U256::from(places));
    let whole = scaled / unit;
    let frac = (scaled % unit).to_string();
    format!("{}.{:0>width$}", whole, frac, width = places as usize)
}

pub fn format_native_amount(value: U256, decimals: u8, symbol: &str) -> String {
    format!("{} {}", format_balance(value, decimals), symbol)
}

/// Cut `s` to at most `max_len` characters, ending in `...` when shortened.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Serialize a U256 as a plain decimal string rather than hex.
pub fn serialize_u256_decimal<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

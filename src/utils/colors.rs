/// Stable display hue (0..360) for a series, hashed from its symbol so the
/// same asset keeps the same color across rebuilds.
pub fn symbol_hue(symbol: &str) -> u16 {
    let mut h: i32 = 0;
    for unit in symbol.encode_utf16() {
        h = i32::from(unit).wrapping_add((h << 5).wrapping_sub(h));
    }
    (h.unsigned_abs() % 360) as u16
}

/// CSS-style color string for a hue, matching the dashboard palette.
pub fn hue_to_hsl(hue: u16) -> String {
    format!("hsl({hue} 70% 45%)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hue_is_deterministic_and_in_range() {
        for symbol in ["BTC", "ETH", "DOGE", "", "A-VERY-LONG-SYMBOL-NAME"] {
            let hue = symbol_hue(symbol);
            assert!(hue < 360);
            assert_eq!(hue, symbol_hue(symbol));
        }
    }

    #[test]
    fn short_symbols_hash_like_the_web_palette() {
        // "BTC": 66 -> 66*31+84 = 2130 -> 2130*31+67 = 66097 -> 66097 % 360 = 217
        assert_eq!(symbol_hue("BTC"), 217);
        assert_eq!(hue_to_hsl(217), "hsl(217 70% 45%)");
    }
}

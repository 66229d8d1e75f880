//! Number formatting for prices, supplies and market caps.

/// `$`-less price text: two decimals with thousands separators at or above 1,
/// three significant digits below it. Non-finite values render as "-".
pub fn format_price(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    if value.abs() >= 1.0 {
        group_thousands(&format!("{:.2}", value))
    } else {
        significant_digits(value, 3)
    }
}

/// Integer amount with thousands separators (supply, market cap).
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    group_thousands(&format!("{:.0}", value))
}

/// Signed percent with two decimals, e.g. "-1.23%".
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    format!("{:.2}%", value)
}

fn significant_digits(value: f64, digits: i32) -> String {
    if value == 0.0 {
        return format!("{:.*}", (digits - 1) as usize, 0.0);
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (digits - 1 - magnitude).max(0) as usize;
    format!("{:.*}", decimals, value)
}

fn group_thousands(text: &str) -> String {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // Trailing zeros after the point carry no information ("1,234.50" -> "1,234.5")
    match frac_part.map(|f| f.trim_end_matches('0')) {
        Some(f) if !f.is_empty() => format!("{sign}{grouped}.{f}"),
        _ => format!("{sign}{grouped}"),
    }
}

//! Display formatting for counts and rates.

/// Group digits in thousands: `1234567` -> `"1,234,567"`.
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

/// Two decimals with a trailing `%`; non-finite values render as `-`.
pub fn percent(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}%", value)
    } else {
        "-".to_string()
    }
}

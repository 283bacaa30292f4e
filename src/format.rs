//! Number formatting for reports.
//!
//! Rust's `{:e}` prints exponents without padding (`1.2e-7`). Reports use the
//! conventional two-digit form (`1.20e-07`) that spreadsheet tools and the instrument
//! software emit.

/// Scientific notation with `decimals` fractional digits and a signed, zero-padded
/// exponent of at least two digits.
pub fn scientific(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let raw = format!("{:.*e}", decimals, value);
    match raw.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => raw,
    }
}

/// General format with `significant` significant digits, like C's `%g`.
///
/// Uses fixed notation when the decimal exponent lies in `[-4, significant)` and
/// scientific notation otherwise. Trailing zeros are removed.
pub fn general(value: f64, significant: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let significant = significant.max(1);

    // Round first so that 9.99 -> 10 moves the exponent
    let rounded = format!("{:.*e}", significant - 1, value);
    let exponent: i32 = rounded
        .split_once('e')
        .and_then(|(_, e)| e.parse().ok())
        .unwrap_or(0);

    if exponent < -4 || exponent >= significant as i32 {
        let formatted = scientific(value, significant - 1);
        match formatted.split_once('e') {
            Some((mantissa, exp)) => format!("{}e{}", trim_fraction(mantissa), exp),
            None => formatted,
        }
    } else {
        let decimals = (significant as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

use crate::fmt;

/// Formats `value` with exactly `decimals` fraction digits and `,` thousands
/// separators, e.g. `1234.5` with 2 decimals becomes `1,234.50`.
pub fn format_grouped(value: f64, decimals: u8) -> String {
    if !value.is_finite() {
        return fmt!("{value}");
    }

    let plain = fmt!("{:.*}", decimals as usize, value.abs());
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (plain.as_str(), None),
    };

    let mut grouped = String::with_capacity(plain.len() + int_part.len() / 3 + 1);
    if value < 0.0 {
        grouped.push('-');
    }
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}

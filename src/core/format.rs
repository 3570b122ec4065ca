const NBSP: char = '\u{a0}';

/// Whole-unit euro amount with German grouping, e.g. `400.000 €`.
pub fn format_currency(value: f64) -> String {
    let mut out = format_number(value, 0);
    out.push(NBSP);
    out.push('€');
    out
}

/// `value` as a fraction, e.g. `0.35` with one decimal is `35.0%`.
pub fn format_percentage(value: f64, decimals: usize) -> String {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return format!("{}%", non_finite(scaled));
    }
    format!("{:.*}%", decimals, round_half_away(scaled, decimals))
}

/// German-style grouping: `.` between thousands and `,` before decimals.
pub fn format_number(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return non_finite(value).to_string();
    }

    let rounded = round_half_away(value, decimals);
    let digits = format!("{:.*}", decimals, rounded.abs());
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 && digits.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    if let Some(frac_part) = frac_part {
        out.push(',');
        out.push_str(frac_part);
    }
    out
}

fn round_half_away(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

fn non_finite(value: f64) -> &'static str {
    if value.is_nan() {
        "NaN"
    } else if value > 0.0 {
        "∞"
    } else {
        "-∞"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands_with_dots() {
        assert_eq!(format_currency(400_000.0), "400.000\u{a0}€");
        assert_eq!(format_currency(1_234_567.4), "1.234.567\u{a0}€");
        assert_eq!(format_currency(999.5), "1.000\u{a0}€");
        assert_eq!(format_currency(0.0), "0\u{a0}€");
    }

    #[test]
    fn currency_keeps_sign_for_losses() {
        assert_eq!(format_currency(-1_234.6), "-1.235\u{a0}€");
        assert_eq!(format_currency(-0.2), "0\u{a0}€");
    }

    #[test]
    fn number_uses_comma_decimal_separator() {
        assert_eq!(format_number(1_234_567.0, 0), "1.234.567");
        assert_eq!(format_number(1_601.994, 2), "1.601,99");
        assert_eq!(format_number(12.5, 1), "12,5");
    }

    #[test]
    fn percentage_scales_fraction() {
        assert_eq!(format_percentage(0.35, 1), "35.0%");
        assert_eq!(format_percentage(3.5, 0), "350%");
        assert_eq!(format_percentage(0.0021, 2), "0.21%");
    }

    #[test]
    fn non_finite_values_are_spelled_out() {
        assert_eq!(format_number(f64::NAN, 0), "NaN");
        assert_eq!(format_currency(f64::NEG_INFINITY), "-∞\u{a0}€");
        assert_eq!(format_percentage(f64::INFINITY, 1), "∞%");
    }
}

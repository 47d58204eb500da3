/// Round half away from zero to `decimals` places.
pub fn round_to(val: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (val * factor).round() / factor
}

/// Format an amount with a currency symbol and thousands separators: R1,234.56
pub fn format_amount(val: f64, symbol: &str, decimals: u32) -> String {
    let rounded = round_to(val, decimals);
    let negative = rounded < 0.0;
    let fixed = format!("{:.*}", decimals as usize, rounded.abs());
    let (int_part, dec_part) = match fixed.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (fixed.as_str(), None),
    };

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    let sign = if negative { "-" } else { "" };
    match dec_part {
        Some(d) => format!("{sign}{symbol}{with_commas}.{d}"),
        None => format!("{sign}{symbol}{with_commas}"),
    }
}

/// Rand amount: R1,234.56
pub fn money(val: f64) -> String {
    format_amount(val, "R", 2)
}

pub fn percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234.56), "R1,234.56");
        assert_eq!(money(-500.00), "-R500.00");
        assert_eq!(money(0.0), "R0.00");
        assert_eq!(money(1000000.99), "R1,000,000.99");
        assert_eq!(money(42.10), "R42.10");
    }

    #[test]
    fn test_format_amount_without_decimals() {
        assert_eq!(format_amount(12345.6, "¥", 0), "¥12,346");
        assert_eq!(format_amount(-0.4, "$", 0), "$0");
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(1.234, 2), 1.23);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0.8), "80%");
        assert_eq!(percent(1.25), "125%");
    }
}

//! Numeric literal parsing (spec.md §4.1 "Numbers").
//!
//! The raw scanner only recognizes number *shape*; underscore stripping and
//! the actual `i64`/`f64` conversion happen here. No error code in the
//! external contract covers numeric overflow, so out-of-range literals
//! saturate rather than fail.

pub(crate) fn parse_decimal_int(text: &str) -> i64 {
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    cleaned
        .parse()
        .unwrap_or(if cleaned.starts_with('-') { i64::MIN } else { i64::MAX })
}

pub(crate) fn parse_float(text: &str) -> f64 {
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    cleaned.parse().unwrap_or(f64::NAN)
}

/// Parses a `0x…`/`0X…`/`0b…`/`0B…` literal, stripping the two-character
/// prefix and any underscores before converting.
pub(crate) fn parse_radix_int(text: &str, radix: u32) -> i64 {
    let digits: String = text
        .chars()
        .skip(2)
        .filter(|&c| c != '_')
        .collect();
    i64::from_str_radix(&digits, radix).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_underscores_from_decimal() {
        assert_eq!(parse_decimal_int("1_000_000"), 1_000_000);
    }

    #[test]
    fn parses_float_with_underscores() {
        assert_eq!(parse_float("3_000.5"), 3000.5);
    }

    #[test]
    fn parses_hex_and_binary() {
        assert_eq!(parse_radix_int("0x1A", 16), 0x1A);
        assert_eq!(parse_radix_int("0b101", 2), 0b101);
    }

    #[test]
    fn negative_decimal_saturates_to_min_on_overflow() {
        let huge = format!("-{}", "9".repeat(30));
        assert_eq!(parse_decimal_int(&huge), i64::MIN);
    }
}

//! Typed attribute extraction with typed defaults.
//!
//! Attribute text is read leniently: a number is taken from the longest
//! valid leading prefix, and anything unreadable degrades to the type's
//! default instead of failing. Effect libraries written by different
//! editor versions rely on this.

/// Parse a leading signed integer. `"12.7"` gives 12, `"0x1F"` gives 31, garbage gives 0.
pub fn parse_int(text: &str) -> i32 {
    parse_leading_int(text, true)
}

/// Parse a leading signed decimal integer, as element text is read.
///
/// Unlike [`parse_int`] there is no hex prefix: `"0x10"` gives 0.
pub fn parse_decimal(text: &str) -> i32 {
    parse_leading_int(text, false)
}

fn parse_leading_int(text: &str, allow_hex: bool) -> i32 {
    let s = text.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = match s.get(..2) {
        Some("0x") | Some("0X") if allow_hex => (16, &s[2..]),
        _ => (10, s),
    };

    let mut value: i64 = 0;
    for c in digits.chars() {
        let Some(d) = c.to_digit(radix) else { break };
        value = value * radix as i64 + d as i64;
        if value > i32::MAX as i64 + 1 {
            break;
        }
    }

    let value = if negative { -value } else { value };
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Parse the leading floating point prefix. Garbage gives 0.0.
pub fn parse_float(text: &str) -> f32 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return 0.0;
    }

    // Exponent only counts when at least one digit follows it.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'-' | b'+') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    s[..end].trim_end_matches('.').parse().unwrap_or(0.0)
}

/// True iff the first character is one of `1 t T y Y`.
#[inline]
pub fn parse_bool(text: &str) -> bool {
    matches!(text.trim_start().as_bytes().first(), Some(b'1' | b't' | b'T' | b'y' | b'Y'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("42"), 42);
        assert_eq!(parse_int("  -7"), -7);
        assert_eq!(parse_int("+3"), 3);
        assert_eq!(parse_int("12.7"), 12);
        assert_eq!(parse_int("0x1F"), 31);
        assert_eq!(parse_int("abc"), 0);
        assert_eq!(parse_int(""), 0);
        assert_eq!(parse_int("99999999999"), i32::MAX);
        assert_eq!(parse_int("-99999999999"), i32::MIN);
    }

    #[test]
    fn test_parse_decimal_has_no_hex() {
        assert_eq!(parse_decimal("0x10"), 0);
        assert_eq!(parse_decimal(" 17 "), 17);
        assert_eq!(parse_decimal("-4"), -4);
        assert_eq!(parse_decimal("99999999999"), i32::MAX);
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float("1.5"), 1.5);
        assert_eq!(parse_float("-0.25"), -0.25);
        assert_eq!(parse_float("3"), 3.0);
        assert_eq!(parse_float("2."), 2.0);
        assert_eq!(parse_float(".5"), 0.5);
        assert_eq!(parse_float("1e3"), 1000.0);
        assert_eq!(parse_float("1e"), 1.0);
        assert_eq!(parse_float("4.5px"), 4.5);
        assert_eq!(parse_float("nope"), 0.0);
        assert_eq!(parse_float("-"), 0.0);
        assert_eq!(parse_float(""), 0.0);
    }

    #[test]
    fn test_parse_bool() {
        for t in ["1", "true", "True", "yes", "Y"] {
            assert!(parse_bool(t), "{t}");
        }
        for f in ["0", "false", "no", "", "2"] {
            assert!(!parse_bool(f), "{f}");
        }
    }
}

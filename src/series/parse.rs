// Timestamp token parsing (bd-5rc)
//
// Event timestamps are plain decimal numbers with an optional sign and
// exponent. Anything else — including NaN/inf spellings, which parse but
// cannot be ordered — is rejected.

/// Parse a timestamp token. Returns `Some` only for finite values.
pub fn parse_timestamp(input: &[u8]) -> Option<f64> {
    let trimmed = trim_ascii(input);
    if trimmed.is_empty() {
        return None;
    }
    let text = std::str::from_utf8(trimmed).ok()?;
    // `f64::from_str` accepts "NaN", "inf" and friends; only finite values
    // are ordered timestamps.
    let value = text.parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(value)
}

fn trim_ascii(input: &[u8]) -> &[u8] {
    let mut start = 0;
    let mut end = input.len();
    while start < end && input[start].is_ascii_whitespace() {
        start += 1;
    }
    while end > start && input[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    &input[start..end]
}

#[cfg(test)]
mod tests {
    use super::parse_timestamp;

    #[test]
    fn parses_plain_and_exponent_forms() {
        assert_eq!(parse_timestamp(b"1234"), Some(1234.0));
        assert_eq!(parse_timestamp(b"1234.5"), Some(1234.5));
        assert_eq!(parse_timestamp(b"-0.25"), Some(-0.25));
        assert_eq!(parse_timestamp(b"+3"), Some(3.0));
        assert_eq!(parse_timestamp(b"1.5e3"), Some(1500.0));
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(parse_timestamp(b"  42.0\t"), Some(42.0));
    }

    #[test]
    fn rejects_non_numeric_tokens() {
        assert_eq!(parse_timestamp(b""), None);
        assert_eq!(parse_timestamp(b"   "), None);
        assert_eq!(parse_timestamp(b"n/a"), None);
        assert_eq!(parse_timestamp(b"12,5"), None);
        assert_eq!(parse_timestamp(b"\xff\xfe"), None);
    }

    #[test]
    fn rejects_unordered_values() {
        assert_eq!(parse_timestamp(b"NaN"), None);
        assert_eq!(parse_timestamp(b"inf"), None);
        assert_eq!(parse_timestamp(b"-inf"), None);
        assert_eq!(parse_timestamp(b"1e999"), None);
    }
}

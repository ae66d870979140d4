//! `grpc-timeout` header parsing.
//!
//! The value is at most eight ASCII digits followed by one unit character:
//! `H` hours, `M` minutes, `S` seconds, `m` milliseconds, `u` microseconds,
//! `n` nanoseconds.

use std::time::Duration;

use http::HeaderMap;

/// Header carrying the client's deadline
pub const GRPC_TIMEOUT_HEADER: &str = "grpc-timeout";

const MAX_DIGITS: usize = 8;

/// Parse a `grpc-timeout` value
pub fn parse_grpc_timeout(value: &str) -> Option<Duration> {
    if !value.is_ascii() || value.len() < 2 || value.len() > MAX_DIGITS + 1 {
        return None;
    }

    let (digits, unit) = value.split_at(value.len() - 1);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let amount: u64 = digits.parse().ok()?;

    match unit {
        "H" => amount.checked_mul(3600).map(Duration::from_secs),
        "M" => amount.checked_mul(60).map(Duration::from_secs),
        "S" => Some(Duration::from_secs(amount)),
        "m" => Some(Duration::from_millis(amount)),
        "u" => Some(Duration::from_micros(amount)),
        "n" => Some(Duration::from_nanos(amount)),
        _ => None,
    }
}

/// Read and parse the `grpc-timeout` header, if present and well-formed
pub fn grpc_timeout(headers: &HeaderMap) -> Option<Duration> {
    let raw = headers.get(GRPC_TIMEOUT_HEADER)?;
    let parsed = raw.to_str().ok().and_then(parse_grpc_timeout);
    if parsed.is_none() {
        tracing::debug!(value = ?raw, "ignoring malformed grpc-timeout header");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn parses_each_unit() {
        assert_eq!(parse_grpc_timeout("2H"), Some(Duration::from_secs(7200)));
        assert_eq!(parse_grpc_timeout("3M"), Some(Duration::from_secs(180)));
        assert_eq!(parse_grpc_timeout("10S"), Some(Duration::from_secs(10)));
        assert_eq!(parse_grpc_timeout("250m"), Some(Duration::from_millis(250)));
        assert_eq!(parse_grpc_timeout("99u"), Some(Duration::from_micros(99)));
        assert_eq!(parse_grpc_timeout("5n"), Some(Duration::from_nanos(5)));
    }

    #[test]
    fn rejects_malformed_values() {
        assert_eq!(parse_grpc_timeout(""), None);
        assert_eq!(parse_grpc_timeout("m"), None);
        assert_eq!(parse_grpc_timeout("10"), None);
        assert_eq!(parse_grpc_timeout("10x"), None);
        assert_eq!(parse_grpc_timeout("-1S"), None);
        assert_eq!(parse_grpc_timeout("1.5S"), None);
        assert_eq!(parse_grpc_timeout("123456789S"), None);
        assert_eq!(parse_grpc_timeout("1µ"), None);
    }

    #[test]
    fn accepts_eight_digits() {
        assert_eq!(
            parse_grpc_timeout("99999999m"),
            Some(Duration::from_millis(99_999_999))
        );
    }

    #[test]
    fn reads_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(grpc_timeout(&headers), None);

        headers.insert(GRPC_TIMEOUT_HEADER, HeaderValue::from_static("100m"));
        assert_eq!(grpc_timeout(&headers), Some(Duration::from_millis(100)));

        headers.insert(GRPC_TIMEOUT_HEADER, HeaderValue::from_static("soon"));
        assert_eq!(grpc_timeout(&headers), None);
    }

    proptest! {
        #[test]
        fn millis_round_trip(amount in 0u64..100_000_000) {
            let value = format!("{amount}m");
            prop_assert_eq!(parse_grpc_timeout(&value), Some(Duration::from_millis(amount)));
        }

        #[test]
        fn never_panics(value in "\\PC{0,12}") {
            let _ = parse_grpc_timeout(&value);
        }
    }
}

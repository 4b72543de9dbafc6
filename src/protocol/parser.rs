use std::sync::LazyLock;

use regex::Regex;

use super::types::{BATTERY_REQUEST, BatteryReport};
use crate::error::ProtocolError;

// Space-separated two-digit hex bytes, as printed by the device utility
static HEX_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Fa-f]{2}(?:\s+[0-9A-Fa-f]{2})*$").unwrap());

/// Parse a line of hex bytes, e.g. `11 ff 08 00 0f 3c 01`
pub fn parse_hex_bytes(input: &str) -> Result<Vec<u8>, ProtocolError> {
    let trimmed = input.trim();

    if !HEX_LINE_REGEX.is_match(trimmed) {
        return Err(ProtocolError::InvalidHex(trimmed.to_string()));
    }

    trimmed
        .split_whitespace()
        .map(|byte| {
            u8::from_str_radix(byte, 16).map_err(|_| ProtocolError::InvalidHex(byte.to_string()))
        })
        .collect()
}

/// Drop the echoed request header if present
pub fn strip_request_header(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(&BATTERY_REQUEST[..]).unwrap_or(bytes)
}

/// Parse a full battery response line into a report
pub fn parse_response_line(input: &str) -> Result<BatteryReport, ProtocolError> {
    let bytes = parse_hex_bytes(input)?;
    let payload = strip_request_header(&bytes);

    let report = BatteryReport::from_bytes(payload)?;

    tracing::debug!(
        "Decoded battery report: voltage={} mV, status={}",
        report.voltage_mv,
        report.status
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_bytes() {
        let bytes = parse_hex_bytes("11 ff 08 00 0f 3c 01").unwrap();
        assert_eq!(bytes, vec![0x11, 0xff, 0x08, 0x00, 0x0f, 0x3c, 0x01]);
    }

    #[test]
    fn test_parse_hex_bytes_uppercase_and_whitespace() {
        let bytes = parse_hex_bytes("  0F\t3C  07\n").unwrap();
        assert_eq!(bytes, vec![0x0f, 0x3c, 0x07]);
    }

    #[test]
    fn test_parse_hex_bytes_invalid() {
        assert!(matches!(
            parse_hex_bytes("0f zz 01"),
            Err(ProtocolError::InvalidHex(_))
        ));
        // Single-digit bytes are not produced by the utility
        assert!(parse_hex_bytes("f 3c 01").is_err());
        assert!(parse_hex_bytes("0f3c01").is_err());
        assert!(parse_hex_bytes("").is_err());
    }

    #[test]
    fn test_strip_request_header() {
        let bytes = [0x11, 0xff, 0x08, 0x00, 0x0f, 0x3c, 0x01];
        assert_eq!(strip_request_header(&bytes), &[0x0f, 0x3c, 0x01]);

        let bytes = [0x0f, 0x3c, 0x01];
        assert_eq!(strip_request_header(&bytes), &[0x0f, 0x3c, 0x01]);
    }

    #[test]
    fn test_parse_response_line_with_header() {
        let line = "11 ff 08 00 0e d8 03 00 00 00 00 00 00 00 00 00 00 00 00 00";
        let report = parse_response_line(line).unwrap();

        assert_eq!(report.voltage_mv, 3800);
        assert_eq!(report.status, 3);
    }

    #[test]
    fn test_parse_response_line_payload_only() {
        let report = parse_response_line("10 68 07").unwrap();

        assert_eq!(report.voltage_mv, 4200);
        assert_eq!(report.status, 7);
    }

    #[test]
    fn test_parse_response_line_header_only() {
        assert_eq!(
            parse_response_line("11 ff 08 00 0f"),
            Err(ProtocolError::TooShort { len: 1 })
        );
    }
}

/*
    DvFox

    Copyright 2024 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------

    src/util.rs

    Helpers for the text representation of pack fields, and for the binary
    coded decimal digits that most packs store their numbers in.
*/
use crate::pack::PackError;
use std::{fmt::Display, str::FromStr};

/// Format an integer as uppercase hexadecimal with a `0x` prefix, zero padded to `digits`.
pub fn hex_int(value: u32, digits: usize) -> String {
    format!("0x{:0width$X}", value, width = digits)
}

/// Format a byte slice as a single `0x` prefixed run of uppercase hexadecimal digits.
pub fn hex_bytes(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(2 + bytes.len() * 2);
    text.push_str("0x");
    for byte in bytes {
        text.push_str(&format!("{:02X}", byte));
    }
    text
}

/// Parse an unsigned integer, accepting `0x`, `0o` and `0b` radix prefixes in addition to plain
/// decimal.
pub fn parse_int(text: &str) -> Option<u32> {
    let lower = text.trim().to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        u32::from_str_radix(hex, 16).ok()
    }
    else if let Some(oct) = lower.strip_prefix("0o") {
        u32::from_str_radix(oct, 8).ok()
    }
    else if let Some(bin) = lower.strip_prefix("0b") {
        u32::from_str_radix(bin, 2).ok()
    }
    else {
        lower.parse::<u32>().ok()
    }
}

/// Parse a case-insensitive `TRUE` or `FALSE`.
pub fn parse_bool(text: &str) -> Result<bool, PackError> {
    match text.to_ascii_uppercase().as_str() {
        "TRUE" => Ok(true),
        "FALSE" => Ok(false),
        _ => Err(PackError::text_parse("boolean", text)),
    }
}

pub fn bool_text(value: bool) -> &'static str {
    match value {
        true => "TRUE",
        false => "FALSE",
    }
}

/// Run a text parser, treating the empty string as an absent value.
pub(crate) fn parse_optional<T>(
    text: &str,
    parser: impl FnOnce(&str) -> Result<T, PackError>,
) -> Result<Option<T>, PackError> {
    if text.is_empty() {
        Ok(None)
    }
    else {
        parser(text).map(Some)
    }
}

/// Parse an optional enum value by its name.
pub(crate) fn parse_name<T: FromStr>(what: &'static str, text: &str) -> Result<Option<T>, PackError> {
    parse_optional(text, |t| T::from_str(t).map_err(|_| PackError::text_parse(what, t)))
}

/// Parse an optional integer with [`parse_int`], checking that it fits within `max`.
pub(crate) fn parse_int_max(what: &'static str, text: &str, max: u32) -> Result<Option<u32>, PackError> {
    parse_optional(text, |t| match parse_int(t) {
        Some(value) if value <= max => Ok(value),
        _ => Err(PackError::text_parse(what, t)),
    })
}

pub(crate) fn parse_u8(what: &'static str, text: &str) -> Result<Option<u8>, PackError> {
    Ok(parse_int_max(what, text, 0xFF)?.map(|v| v as u8))
}

pub(crate) fn parse_u16(what: &'static str, text: &str) -> Result<Option<u16>, PackError> {
    Ok(parse_int_max(what, text, 0xFFFF)?.map(|v| v as u16))
}

pub(crate) fn parse_u32(what: &'static str, text: &str) -> Result<Option<u32>, PackError> {
    parse_int_max(what, text, u32::MAX)
}

pub(crate) fn parse_bool_optional(text: &str) -> Result<Option<bool>, PackError> {
    parse_optional(text, parse_bool)
}

/// Text for an optional displayable value; absent values are the empty string.
pub(crate) fn optional_text<T: Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

pub(crate) fn optional_hex(value: Option<u32>, digits: usize) -> String {
    value.map(|v| hex_int(v, digits)).unwrap_or_default()
}

pub(crate) fn optional_bool_text(value: Option<bool>) -> String {
    value.map(|v| bool_text(v).to_string()).unwrap_or_default()
}

/// Split a value of 0-99 into binary coded decimal tens and units digits.
#[inline]
pub(crate) fn to_bcd(value: u8) -> (u8, u8) {
    (value / 10, value % 10)
}

/// Combine binary coded decimal digits, returning `None` if either digit is out of range.
#[inline]
pub(crate) fn from_bcd(tens: u8, max_tens: u8, units: u8) -> Option<u8> {
    if tens > max_tens || units > 9 {
        None
    }
    else {
        Some(tens * 10 + units)
    }
}

/// Decode an optional binary coded decimal value, where the `absent_tens` and `0xF` digit pair
/// marks a missing value. The outer `None` means the digits are out of range.
pub(crate) fn decode_optional_bcd(tens: u8, units: u8, absent_tens: u8, max_tens: u8) -> Option<Option<u8>> {
    if tens == absent_tens && units == 0xF {
        Some(None)
    }
    else {
        from_bcd(tens, max_tens, units).map(Some)
    }
}

pub(crate) fn encode_optional_bcd(value: Option<u8>, absent_tens: u8) -> (u8, u8) {
    value.map(to_bcd).unwrap_or((absent_tens, 0xF))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_formatting() {
        assert_eq!(hex_int(0x7, 1), "0x7");
        assert_eq!(hex_int(0x1F, 4), "0x001F");
        assert_eq!(hex_bytes(&[0x01, 0xAB, 0x00, 0xFF]), "0x01AB00FF");
    }

    #[test]
    fn int_prefixes() {
        assert_eq!(parse_int("0x1f"), Some(31));
        assert_eq!(parse_int("0b101"), Some(5));
        assert_eq!(parse_int("0o17"), Some(15));
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("0xZZ"), None);
    }

    #[test]
    fn bool_parsing_is_case_insensitive() {
        assert!(parse_bool("true").unwrap());
        assert!(!parse_bool("False").unwrap());
        assert!(parse_bool("yes").is_err());
        assert_eq!(parse_bool_optional("").unwrap(), None);
    }

    #[test]
    fn bcd_digits() {
        assert_eq!(to_bcd(59), (5, 9));
        assert_eq!(from_bcd(5, 5, 9), Some(59));
        assert_eq!(from_bcd(6, 5, 0), None);
        assert_eq!(from_bcd(1, 2, 10), None);
        assert_eq!(decode_optional_bcd(0x3, 0xF, 0x3, 2), Some(None));
        assert_eq!(decode_optional_bcd(0x3, 0x1, 0x3, 2), None);
        assert_eq!(encode_optional_bcd(None, 0x7), (0x7, 0xF));
        assert_eq!(encode_optional_bcd(Some(42), 0x7), (4, 2));
    }
}

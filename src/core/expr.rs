// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Numeric literal parsing for SAN source.

/// Parse a numeric literal.
///
/// Accepts decimal, `$`/`0x` hex, `%`/`0b` binary and `0o` octal, with an
/// optional leading `-` and `_` separators.
pub fn parse_number(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let (is_neg, text) = if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else {
        (false, text)
    };

    let text: String = text.chars().filter(|&c| c != '_').collect();
    let text = text.as_str();
    if text.is_empty() {
        return None;
    }

    let val = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        parse_radix(hex, 16)?
    } else if let Some(oct) = text.strip_prefix("0o").or_else(|| text.strip_prefix("0O")) {
        parse_radix(oct, 8)?
    } else if let Some(bin) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
        parse_radix(bin, 2)?
    } else if let Some(bin) = text.strip_prefix('%') {
        parse_radix(bin, 2)?
    } else if let Some(hex) = text.strip_prefix('$') {
        parse_radix(hex, 16)?
    } else if text.chars().all(|c| c.is_ascii_digit()) {
        text.parse::<i64>().ok()?
    } else {
        return None;
    };

    Some(if is_neg { -val } else { val })
}

fn parse_radix(digits: &str, radix: u32) -> Option<i64> {
    // from_str_radix would accept a second sign here.
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    i64::from_str_radix(digits, radix).ok()
}

/// Returns true if the value fits in a signed or unsigned 16-bit word (-32768..=65535).
pub fn value_fits_word(value: i64) -> bool {
    (-32768..=0xffff).contains(&value)
}

/// Map a literal onto a 16-bit operand cell; negatives use two's complement.
pub fn value_to_cell(value: i64) -> Option<u16> {
    if value_fits_word(value) {
        Some(value as u16)
    } else {
        None
    }
}

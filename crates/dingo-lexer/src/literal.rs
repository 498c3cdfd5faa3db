// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Literal scanning and decoding: numbers, escapes, strings and runes.

use dingo_ast::token::{Radix, TokenKind};

use crate::error::LexErrorKind;

// ============================================================================
// Numbers
// ============================================================================

/// Maximal-munch end of the number starting at `start`.
///
/// Scanning is permissive (`0b102`, `09` stay one token) and
/// [`number_token`] rejects malformed forms afterwards.
pub(crate) fn scan_number_end(src: &[u8], start: usize) -> usize {
    let n = src.len();
    let mut i = start;
    let mut hex = false;

    if src.get(i) == Some(&b'.') {
        i = consume_digits(src, i + 1, false);
    } else {
        if src.get(i) == Some(&b'0') {
            if let Some(p) = src.get(i + 1).map(u8::to_ascii_lowercase) {
                if matches!(p, b'x' | b'b' | b'o') {
                    hex = p == b'x';
                    i += 2;
                }
            }
        }
        i = consume_digits(src, i, hex);
        // Don't take the first dot of `..`.
        if i < n && src[i] == b'.' && src.get(i + 1) != Some(&b'.') {
            i = consume_digits(src, i + 1, hex);
        }
    }

    if i < n {
        let e = src[i].to_ascii_lowercase();
        if (e == b'e' && !hex) || (e == b'p' && hex) {
            let mut j = i + 1;
            if matches!(src.get(j), Some(b'+' | b'-')) {
                j += 1;
            }
            if src.get(j).is_some_and(u8::is_ascii_digit) {
                i = consume_digits(src, j, false);
            }
        }
    }

    if src.get(i) == Some(&b'i') && !src.get(i + 1).is_some_and(|&b| is_ident_byte(b)) {
        i += 1;
    }
    i
}

fn consume_digits(src: &[u8], mut i: usize, hex: bool) -> usize {
    while let Some(&b) = src.get(i) {
        if b.is_ascii_digit() || b == b'_' || (hex && b.is_ascii_hexdigit()) {
            i += 1;
        } else {
            break;
        }
    }
    i
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

/// Classify and clean a scanned number.
pub(crate) fn number_token(text: &str) -> Result<TokenKind, LexErrorKind> {
    let (body, imaginary) = match text.strip_suffix('i') {
        Some(body) => (body, true),
        None => (text, false),
    };

    let prefix = body
        .get(..2)
        .map(|p| p.to_ascii_lowercase())
        .filter(|p| matches!(p.as_str(), "0x" | "0b" | "0o"));
    let (radix, digits) = match prefix.as_deref() {
        Some("0x") => (Radix::Hex, &body[2..]),
        Some("0b") => (Radix::Binary, &body[2..]),
        Some("0o") => (Radix::Octal, &body[2..]),
        _ => (Radix::Decimal, body),
    };

    if !underscores_ok(digits, prefix.is_some(), radix) {
        return Err(LexErrorKind::InvalidNumber);
    }
    let cleaned: String = digits.chars().filter(|&c| c != '_').collect();

    let kind = match radix {
        Radix::Hex => {
            if cleaned.contains(['.', 'p', 'P']) {
                hex_float_ok(&cleaned).then(|| TokenKind::Float(format!("0x{cleaned}")))
            } else {
                all_digits(&cleaned, 16).then(|| TokenKind::Int { radix, digits: cleaned.clone() })
            }
        }
        Radix::Binary | Radix::Octal => all_digits(&cleaned, radix.base())
            .then(|| TokenKind::Int { radix, digits: cleaned.clone() }),
        Radix::Decimal => {
            if cleaned.contains(['.', 'e', 'E']) {
                decimal_float_ok(&cleaned).then(|| TokenKind::Float(cleaned.clone()))
            } else if cleaned.len() > 1 && cleaned.starts_with('0') && !imaginary {
                // Legacy octal: `0755`.
                all_digits(&cleaned[1..], 8).then(|| TokenKind::Int {
                    radix: Radix::Octal,
                    digits: cleaned[1..].to_string(),
                })
            } else {
                all_digits(&cleaned, 10).then(|| TokenKind::Int { radix, digits: cleaned.clone() })
            }
        }
    };

    match kind {
        Some(_) if imaginary => {
            let prefix = prefix.unwrap_or_default();
            Ok(TokenKind::Imaginary(format!("{prefix}{cleaned}")))
        }
        Some(kind) => Ok(kind),
        None => Err(LexErrorKind::InvalidNumber),
    }
}

/// `_` must sit between two digits of the literal's radix, or directly
/// after a base prefix.
fn underscores_ok(digits: &str, prefixed: bool, radix: Radix) -> bool {
    let is_digit = |c: &u8| char::from(*c).is_digit(radix.base());
    let b = digits.as_bytes();
    b.iter().enumerate().all(|(i, &c)| {
        if c != b'_' {
            return true;
        }
        let prev_ok = if i == 0 { prefixed } else { is_digit(&b[i - 1]) };
        let next_ok = b.get(i + 1).is_some_and(is_digit);
        prev_ok && next_ok
    })
}

fn all_digits(s: &str, base: u32) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_digit(base))
}

fn decimal_float_ok(s: &str) -> bool {
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
        None => (s, None),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let mantissa_ok = (int_part.chars().all(|c| c.is_ascii_digit()))
        && frac_part.chars().all(|c| c.is_ascii_digit())
        && (!int_part.is_empty() || !frac_part.is_empty());
    mantissa_ok && exponent.map_or(true, exponent_ok)
}

fn hex_float_ok(s: &str) -> bool {
    let Some(pos) = s.find(['p', 'P']) else {
        return false;
    };
    let mantissa = &s[..pos];
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    int_part.chars().all(|c| c.is_ascii_hexdigit())
        && frac_part.chars().all(|c| c.is_ascii_hexdigit())
        && (!int_part.is_empty() || !frac_part.is_empty())
        && exponent_ok(&s[pos + 1..])
}

fn exponent_ok(exp: &str) -> bool {
    let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
    all_digits(digits, 10)
}

// ============================================================================
// Escapes
// ============================================================================

/// One decoded unit of an interpreted literal.
enum Unit {
    /// `\xHH` and `\OOO` produce raw bytes.
    Byte(u8),
    Char(char),
}

/// Decode the escape at `s[i..]` (which starts with `\`).
/// Returns the unit and the number of bytes consumed.
fn decode_escape(s: &str, i: usize, in_rune: bool) -> Option<(Unit, usize)> {
    let b = s.as_bytes();
    let c = *b.get(i + 1)?;
    let simple = match c {
        b'a' => Some('\u{07}'),
        b'b' => Some('\u{08}'),
        b'f' => Some('\u{0C}'),
        b'n' => Some('\n'),
        b'r' => Some('\r'),
        b't' => Some('\t'),
        b'v' => Some('\u{0B}'),
        b'\\' => Some('\\'),
        b'\'' => Some('\''),
        b'"' if !in_rune => Some('"'),
        _ => None,
    };
    if let Some(ch) = simple {
        return Some((Unit::Char(ch), 2));
    }

    match c {
        b'x' => {
            let v = hex_digits(s, i + 2, 2)?;
            Some((Unit::Byte(v as u8), 4))
        }
        b'u' => {
            let v = hex_digits(s, i + 2, 4)?;
            Some((Unit::Char(char::from_u32(v)?), 6))
        }
        b'U' => {
            let v = hex_digits(s, i + 2, 8)?;
            Some((Unit::Char(char::from_u32(v)?), 10))
        }
        b'0'..=b'7' => {
            let digits = s.get(i + 1..i + 4)?;
            if !digits.bytes().all(|d| (b'0'..=b'7').contains(&d)) {
                return None;
            }
            let v = u32::from_str_radix(digits, 8).ok()?;
            u8::try_from(v).ok().map(|byte| (Unit::Byte(byte), 4))
        }
        _ => None,
    }
}

fn hex_digits(s: &str, start: usize, count: usize) -> Option<u32> {
    let digits = s.get(start..start + count)?;
    if !digits.bytes().all(|d| d.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Decode the body of an interpreted string (without quotes).
///
/// On a bad escape, returns its byte offset within `body`. Byte escapes
/// that do not form valid UTF-8 are replaced with U+FFFD.
pub(crate) fn decode_string(body: &str) -> Result<String, usize> {
    let mut out = Vec::with_capacity(body.len());
    let mut i = 0;
    while i < body.len() {
        if body.as_bytes()[i] == b'\\' {
            let (unit, len) = decode_escape(body, i, false).ok_or(i)?;
            match unit {
                Unit::Byte(b) => out.push(b),
                Unit::Char(c) => {
                    let mut buf = [0u8; 4];
                    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                }
            }
            i += len;
        } else if let Some(ch) = body[i..].chars().next() {
            let mut buf = [0u8; 4];
            out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            i += ch.len_utf8();
        } else {
            break;
        }
    }
    Ok(String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()))
}

/// Decode the body of a rune literal (without quotes).
pub(crate) fn decode_rune(body: &str) -> Result<char, LexErrorKind> {
    if body.is_empty() {
        return Err(LexErrorKind::EmptyRune);
    }
    if body.starts_with('\\') {
        let (unit, len) = decode_escape(body, 0, true).ok_or(LexErrorKind::InvalidEscape)?;
        if len != body.len() {
            return Err(LexErrorKind::MultiCharRune);
        }
        return Ok(match unit {
            Unit::Byte(b) => char::from(b),
            Unit::Char(c) => c,
        });
    }
    let mut chars = body.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(LexErrorKind::MultiCharRune),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn int(radix: Radix, digits: &str) -> TokenKind {
        TokenKind::Int { radix, digits: digits.to_string() }
    }

    #[test]
    fn number_prefixes_and_separators() {
        assert_eq!(number_token("0x_FF_ff"), Ok(int(Radix::Hex, "FFff")));
        assert_eq!(number_token("0b1010"), Ok(int(Radix::Binary, "1010")));
        assert_eq!(number_token("0o17"), Ok(int(Radix::Octal, "17")));
        assert_eq!(number_token("0755"), Ok(int(Radix::Octal, "755")));
        assert_eq!(number_token("1_000_000"), Ok(int(Radix::Decimal, "1000000")));
        assert_eq!(number_token("0x1_e"), Ok(int(Radix::Hex, "1e")));
        assert_eq!(number_token("0"), Ok(int(Radix::Decimal, "0")));
    }

    #[test]
    fn number_floats_and_imaginary() {
        assert_eq!(number_token("3.14"), Ok(TokenKind::Float("3.14".into())));
        assert_eq!(number_token("1e9"), Ok(TokenKind::Float("1e9".into())));
        assert_eq!(number_token(".5"), Ok(TokenKind::Float(".5".into())));
        assert_eq!(number_token("1_0.2_5e-1_0"), Ok(TokenKind::Float("10.25e-10".into())));
        assert_eq!(number_token("0x1p-2"), Ok(TokenKind::Float("0x1p-2".into())));
        assert_eq!(number_token("2.5i"), Ok(TokenKind::Imaginary("2.5".into())));
        assert_eq!(number_token("0123i"), Ok(TokenKind::Imaginary("0123".into())));
    }

    #[test]
    fn number_rejects_malformed() {
        for bad in ["0b102", "09", "0x", "1__0", "1_", "0x1.8", "1e", "0o8", "1_e5", "1_.5", "0b1_2"] {
            assert_eq!(number_token(bad), Err(LexErrorKind::InvalidNumber), "{bad}");
        }
    }

    #[test]
    fn scan_stops_before_double_dot() {
        assert_eq!(scan_number_end(b"1..2", 0), 1);
        assert_eq!(scan_number_end(b"1.5+x", 0), 3);
        assert_eq!(scan_number_end(b"0x1fp+3)", 0), 7);
        assert_eq!(scan_number_end(b"2i)", 0), 2);
        assert_eq!(scan_number_end(b"2if", 0), 1);
    }

    #[test]
    fn string_escapes_decode() {
        assert_eq!(decode_string(r#"a\tb\n"#), Ok("a\tb\n".to_string()));
        assert_eq!(decode_string(r#"\x41\101é\U0001F600"#), Ok("AAé😀".to_string()));
        assert_eq!(decode_string(r#"say \"hi\""#), Ok("say \"hi\"".to_string()));
        assert_eq!(decode_string(r#"ok \q"#), Err(3));
        assert_eq!(decode_string(r#"\400"#), Err(0));
        assert_eq!(decode_string(r#"\uD800"#), Err(0));
    }

    #[test]
    fn rune_bodies() {
        assert_eq!(decode_rune("a"), Ok('a'));
        assert_eq!(decode_rune("世"), Ok('世'));
        assert_eq!(decode_rune(r"\n"), Ok('\n'));
        assert_eq!(decode_rune(r"\'"), Ok('\''));
        assert_eq!(decode_rune(r"\xff"), Ok('\u{ff}'));
        assert_eq!(decode_rune(""), Err(LexErrorKind::EmptyRune));
        assert_eq!(decode_rune("ab"), Err(LexErrorKind::MultiCharRune));
        assert_eq!(decode_rune(r#"\""#), Err(LexErrorKind::InvalidEscape));
    }
}

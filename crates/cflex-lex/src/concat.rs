//! String-literal concatenation: the promotion rule and the decode/re-encode
//! machinery shared by inline concatenation during literal lexing and the
//! standalone post-tokenization pass.

use crate::token::{StringEncoding, StringUnits};
use crate::unicode::{decode_utf8_scalar, validate_ucn_scalar};

/// Widest-wins promotion with the non-narrowing override: if the naively
/// ranked winner's code-unit width is narrower than some input's width, the
/// result is forced to `Utf32` instead, since that is always wide enough.
pub fn promote(kinds: &[StringEncoding], wchar_bits: u32) -> StringEncoding {
    let winner = kinds.iter().copied().max().unwrap_or(StringEncoding::Plain);
    let winner_bits = winner.code_unit_bits(wchar_bits);
    let narrows = kinds
        .iter()
        .any(|&k| k.code_unit_bits(wchar_bits) > winner_bits);
    if narrows {
        StringEncoding::Utf32
    } else {
        winner
    }
}

/// Decodes a code-unit sequence (excluding the trailing NUL) to Unicode
/// scalar values, substituting U+FFFD for anything malformed.
pub fn decode_to_scalars(units: &StringUnits, encoding: StringEncoding) -> Vec<u32> {
    match (units, encoding) {
        (StringUnits::Bytes(bytes), StringEncoding::Plain) => {
            bytes.iter().take(bytes.len().saturating_sub(1)).map(|&b| b as u32).collect()
        }
        (StringUnits::Bytes(bytes), StringEncoding::Utf8) => {
            let body = &bytes[..bytes.len().saturating_sub(1)];
            let mut scalars = Vec::new();
            let mut i = 0;
            while i < body.len() {
                let (value, len) = decode_utf8_scalar(&body[i..]);
                scalars.push(value);
                i += len.max(1);
            }
            scalars
        }
        (StringUnits::U16(units), _) => {
            let body = &units[..units.len().saturating_sub(1)];
            char::decode_utf16(body.iter().copied())
                .map(|r| r.map(|c| c as u32).unwrap_or(0xFFFD))
                .collect()
        }
        (StringUnits::U32(units), _) => {
            units[..units.len().saturating_sub(1)].iter().map(|&u| validate_ucn_scalar(u)).collect()
        }
        _ => Vec::new(),
    }
}

/// Re-encodes `scalars` into the code units of `encoding`, appending a
/// trailing NUL.
pub fn encode_from_scalars(scalars: &[u32], encoding: StringEncoding, wchar_bits: u32) -> StringUnits {
    match encoding {
        StringEncoding::Plain => {
            let mut bytes: Vec<u8> = scalars.iter().map(|&s| s as u8).collect();
            bytes.push(0);
            StringUnits::Bytes(bytes)
        }
        StringEncoding::Utf8 => {
            let mut bytes = Vec::new();
            for &s in scalars {
                crate::unicode::encode_utf8(s, &mut bytes);
            }
            bytes.push(0);
            StringUnits::Bytes(bytes)
        }
        StringEncoding::Utf16 => {
            let mut units = Vec::new();
            for &s in scalars {
                crate::unicode::encode_utf16(s, &mut units);
            }
            units.push(0);
            StringUnits::U16(units)
        }
        StringEncoding::Utf32 => {
            let mut units: Vec<u32> = scalars.to_vec();
            units.push(0);
            StringUnits::U32(units)
        }
        StringEncoding::Wide => {
            if wchar_bits == 16 {
                let mut units = Vec::new();
                for &s in scalars {
                    crate::unicode::encode_utf16(s, &mut units);
                }
                units.push(0);
                StringUnits::U16(units)
            } else {
                let mut units: Vec<u32> = scalars.to_vec();
                units.push(0);
                StringUnits::U32(units)
            }
        }
    }
}

/// Merges a maximal run of adjacent string literals into one, applying the
/// promotion rule. Used both for inline concatenation during lexing and for
/// a standalone post-tokenization pass over an already-lexed stream.
pub fn concatenate(
    parts: &[(StringUnits, StringEncoding)],
    wchar_bits: u32,
) -> (StringUnits, StringEncoding) {
    let kinds: Vec<StringEncoding> = parts.iter().map(|(_, k)| *k).collect();
    let result_kind = promote(&kinds, wchar_bits);

    let mut scalars = Vec::new();
    for (units, encoding) in parts {
        scalars.extend(decode_to_scalars(units, *encoding));
    }
    (encode_from_scalars(&scalars, result_kind, wchar_bits), result_kind)
}

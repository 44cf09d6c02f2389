//! Minimal UTF-8 decoding for the `any_utf8` terminal.
//!
//! This deliberately does not reach for a crate like `unicode-ident` or the
//! standard library's own (private) UTF-8 machinery: the only thing the
//! grammar core needs is "how many bytes does this code point take, and is
//! it well-formed", which a 256-entry lookup table on the lead byte answers
//! directly. Anything heavier would pull in Unicode tables this library has
//! no other use for.

/// For a lead byte, the number of bytes its code point occupies, or `0` if
/// the byte can never legally start a code point (a continuation byte or an
/// otherwise-invalid lead byte).
const SEQUENCE_LEN: [u8; 256] = build_sequence_len_table();

const fn build_sequence_len_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut b = 0usize;
    while b < 256 {
        table[b] = if b < 0x80 {
            1
        } else if b < 0xC0 {
            0 // continuation byte, not a valid lead byte
        } else if b < 0xE0 {
            2
        } else if b < 0xF0 {
            3
        } else if b < 0xF5 {
            4
        } else {
            0 // 0xF5..=0xFF can never appear in valid UTF-8
        };
        b += 1;
    }
    table
}

/// Decode one UTF-8 code point from the start of `bytes`, returning the
/// decoded `char` and the number of bytes it occupied.
///
/// Returns `None` if `bytes` is empty, the lead byte is invalid, there
/// aren't enough continuation bytes, a continuation byte is malformed, or
/// the decoded scalar value is out of Unicode's range or is a surrogate
/// (surrogates never appear in valid UTF-8).
pub fn decode(bytes: &[u8]) -> Option<(char, usize)> {
    let lead = *bytes.first()?;
    let len = SEQUENCE_LEN[lead as usize] as usize;
    if len == 0 || bytes.len() < len {
        return None;
    }

    let scalar = match len {
        1 => lead as u32,
        2 => {
            let b1 = continuation(bytes[1])?;
            ((lead as u32 & 0x1F) << 6) | b1
        }
        3 => {
            let b1 = continuation(bytes[1])?;
            let b2 = continuation(bytes[2])?;
            ((lead as u32 & 0x0F) << 12) | (b1 << 6) | b2
        }
        4 => {
            let b1 = continuation(bytes[1])?;
            let b2 = continuation(bytes[2])?;
            let b3 = continuation(bytes[3])?;
            ((lead as u32 & 0x07) << 18) | (b1 << 12) | (b2 << 6) | b3
        }
        _ => unreachable!("SEQUENCE_LEN only ever produces 0..=4"),
    };

    // Reject overlong encodings: the scalar must actually need `len` bytes.
    let minimum = match len {
        1 => 0,
        2 => 0x80,
        3 => 0x800,
        4 => 0x10000,
        _ => unreachable!(),
    };
    if scalar < minimum {
        return None;
    }

    char::from_u32(scalar).map(|c| (c, len))
}

fn continuation(byte: u8) -> Option<u32> {
    if byte & 0xC0 == 0x80 {
        Some((byte & 0x3F) as u32)
    } else {
        None
    }
}

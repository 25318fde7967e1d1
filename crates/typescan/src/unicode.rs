//! Encoding-generic Unicode codec layer.
//!
//! Scanning operates over three encodings, selected by code-unit width:
//! UTF-8 (`u8`), UTF-16 (`u16`) and UTF-32 (`u32`). This module provides the
//! primitives the engine needs over all three: whole-view validation,
//! starting-unit length classification, single-code-point decoding (both the
//! checked and the validated-precondition flavor), transcoding between
//! encodings, and sizing helpers for preallocation.
//!
//! Invalid input is never skipped silently: [`next_code_point`] reports an
//! invalid sequence as `None` and advances to the next plausible
//! resynchronization boundary, so that [`transcode_invalid`] emits exactly
//! one U+FFFD per maximal invalid subsequence.

use alloc::vec::Vec;

use crate::error::ErrorKind;

/// The Unicode replacement character, substituted for invalid sequences.
pub const REPLACEMENT: char = '\u{FFFD}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Utf16,
    Utf32,
}

/// A code unit of one of the three supported encodings.
///
/// Implemented for `u8` (UTF-8), `u16` (UTF-16) and `u32` (UTF-32). The
/// engine is generic over this trait; everything encoding-specific lives in
/// the three impls below.
pub trait CodeUnit: Copy + Eq + core::fmt::Debug + 'static {
    const ENCODING: Encoding;

    /// Units needed for the widest code point in this encoding.
    const MAX_UNITS: usize;

    /// Code-point length implied by `self` as a starting unit, or 0 if
    /// `self` cannot begin a code point.
    fn unit_len(self) -> usize;

    /// Decodes a view whose length equals the starting unit's `unit_len`.
    /// Returns `None` for any malformed sequence (overlong forms, lone
    /// surrogates, out-of-range values).
    fn decode(units: &[Self]) -> Option<char>;

    /// Whole-view well-formedness. The empty view is valid.
    fn validate(input: &[Self]) -> bool;

    /// Appends the encoding of one code point.
    fn encode(cp: char, out: &mut Vec<Self>);

    /// Units `cp` occupies in this encoding.
    fn width_of(cp: char) -> usize;
}

impl CodeUnit for u8 {
    const ENCODING: Encoding = Encoding::Utf8;
    const MAX_UNITS: usize = 4;

    fn unit_len(self) -> usize {
        match self {
            0x00..=0x7F => 1,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            // Continuation bytes and 0xF8..=0xFF cannot start a code point.
            _ => 0,
        }
    }

    fn decode(units: &[u8]) -> Option<char> {
        let b0 = units[0];
        let cont = |b: u8| b & 0xC0 == 0x80;
        let cp = match units.len() {
            1 => {
                if b0 >= 0x80 {
                    return None;
                }
                u32::from(b0)
            }
            2 => {
                // 0xC0 and 0xC1 only produce overlong forms.
                if b0 < 0xC2 || !cont(units[1]) {
                    return None;
                }
                (u32::from(b0 & 0x1F) << 6) | u32::from(units[1] & 0x3F)
            }
            3 => {
                if !cont(units[1]) || !cont(units[2]) {
                    return None;
                }
                // Overlong (E0 A0 is the smallest valid lead pair).
                if b0 == 0xE0 && units[1] < 0xA0 {
                    return None;
                }
                (u32::from(b0 & 0x0F) << 12)
                    | (u32::from(units[1] & 0x3F) << 6)
                    | u32::from(units[2] & 0x3F)
            }
            4 => {
                if !cont(units[1]) || !cont(units[2]) || !cont(units[3]) {
                    return None;
                }
                if (b0 == 0xF0 && units[1] < 0x90) || b0 > 0xF4 {
                    return None;
                }
                (u32::from(b0 & 0x07) << 18)
                    | (u32::from(units[1] & 0x3F) << 12)
                    | (u32::from(units[2] & 0x3F) << 6)
                    | u32::from(units[3] & 0x3F)
            }
            _ => return None,
        };
        char::from_u32(cp)
    }

    fn validate(input: &[u8]) -> bool {
        simdutf8::basic::from_utf8(input).is_ok()
    }

    fn encode(cp: char, out: &mut Vec<u8>) {
        let mut buf = [0u8; 4];
        out.extend_from_slice(cp.encode_utf8(&mut buf).as_bytes());
    }

    fn width_of(cp: char) -> usize {
        cp.len_utf8()
    }
}

impl CodeUnit for u16 {
    const ENCODING: Encoding = Encoding::Utf16;
    const MAX_UNITS: usize = 2;

    fn unit_len(self) -> usize {
        // A lone low surrogate still classifies as length 1; decoding it
        // fails, which is what drives resynchronization.
        if (0xD800..=0xDBFF).contains(&self) {
            2
        } else {
            1
        }
    }

    fn decode(units: &[u16]) -> Option<char> {
        match units.len() {
            1 => char::from_u32(u32::from(units[0])),
            2 => {
                let (hi, lo) = (units[0], units[1]);
                if !(0xD800..=0xDBFF).contains(&hi) || !(0xDC00..=0xDFFF).contains(&lo) {
                    return None;
                }
                let cp = 0x10000 + ((u32::from(hi) - 0xD800) << 10) + (u32::from(lo) - 0xDC00);
                char::from_u32(cp)
            }
            _ => None,
        }
    }

    fn validate(input: &[u16]) -> bool {
        let mut i = 0;
        while i < input.len() {
            match input[i] {
                0xD800..=0xDBFF => {
                    if i + 1 >= input.len() || !(0xDC00..=0xDFFF).contains(&input[i + 1]) {
                        return false;
                    }
                    i += 2;
                }
                0xDC00..=0xDFFF => return false,
                _ => i += 1,
            }
        }
        true
    }

    fn encode(cp: char, out: &mut Vec<u16>) {
        let mut buf = [0u16; 2];
        out.extend_from_slice(cp.encode_utf16(&mut buf));
    }

    fn width_of(cp: char) -> usize {
        cp.len_utf16()
    }
}

impl CodeUnit for u32 {
    const ENCODING: Encoding = Encoding::Utf32;
    const MAX_UNITS: usize = 1;

    fn unit_len(self) -> usize {
        1
    }

    fn decode(units: &[u32]) -> Option<char> {
        if units.len() != 1 {
            return None;
        }
        char::from_u32(units[0])
    }

    fn validate(input: &[u32]) -> bool {
        input.iter().all(|&u| char::from_u32(u).is_some())
    }

    fn encode(cp: char, out: &mut Vec<u32>) {
        out.push(cp as u32);
    }

    fn width_of(_cp: char) -> usize {
        1
    }
}

/// Whole-view validation in the encoding implied by the unit width.
pub fn validate<U: CodeUnit>(input: &[U]) -> bool {
    U::validate(input)
}

/// Code-point length implied by a starting code unit; 0 if the unit cannot
/// begin a code point.
pub fn unit_len<U: CodeUnit>(unit: U) -> usize {
    unit.unit_len()
}

/// Decodes a view whose length must equal its starting unit's implied
/// length. `None` when the view is malformed or mis-sized.
pub fn decode_exhaustive<U: CodeUnit>(input: &[U]) -> Option<char> {
    if input.is_empty() || input[0].unit_len() != input.len() {
        return None;
    }
    U::decode(input)
}

/// Index of the next unit that can plausibly begin a code point.
fn resync<U: CodeUnit>(input: &[U]) -> usize {
    input
        .iter()
        .position(|u| u.unit_len() != 0)
        .unwrap_or(input.len())
}

/// Reads one code point from the front of `input`.
///
/// Returns the number of units to advance, and the decoded scalar. On
/// malformed input the scalar is `None` and the advance covers the whole
/// maximal invalid subsequence, up to the next plausible starting unit.
/// `input` must be non-empty.
pub fn next_code_point<U: CodeUnit>(input: &[U]) -> (usize, Option<char>) {
    debug_assert!(!input.is_empty());
    let len = input[0].unit_len();
    if len == 0 || len > input.len() {
        return (1 + resync(&input[1..]), None);
    }
    match U::decode(&input[..len]) {
        Some(cp) => (len, Some(cp)),
        None => (1 + resync(&input[1..]), None),
    }
}

/// [`next_code_point`] with the precondition that `input` starts with a
/// valid code point. Infallible.
pub fn next_code_point_valid<U: CodeUnit>(input: &[U]) -> (usize, char) {
    let (len, cp) = next_code_point(input);
    debug_assert!(cp.is_some(), "input must start with a valid code point");
    (len, cp.unwrap_or(REPLACEMENT))
}

/// Number of code points in a validated view.
pub fn count_code_points<U: CodeUnit>(input: &[U]) -> usize {
    let mut rest = input;
    let mut count = 0;
    while !rest.is_empty() {
        let len = rest[0].unit_len().clamp(1, rest.len());
        rest = &rest[len..];
        count += 1;
    }
    count
}

/// Number of `Dst` units a validated view occupies after transcoding.
pub fn count_transcoded_units<Src: CodeUnit, Dst: CodeUnit>(input: &[Src]) -> usize {
    let mut rest = input;
    let mut count = 0;
    while !rest.is_empty() {
        let (len, cp) = next_code_point_valid(rest);
        rest = &rest[len..];
        count += Dst::width_of(cp);
    }
    count
}

/// Transcodes a validated view into `out`; returns units written.
pub fn transcode_valid<Src: CodeUnit, Dst: CodeUnit>(input: &[Src], out: &mut Vec<Dst>) -> usize {
    let before = out.len();
    out.reserve(count_transcoded_units::<Src, Dst>(input));
    let mut rest = input;
    while !rest.is_empty() {
        let (len, cp) = next_code_point_valid(rest);
        rest = &rest[len..];
        Dst::encode(cp, out);
    }
    out.len() - before
}

/// Transcodes a possibly-invalid view into `out`, substituting exactly one
/// U+FFFD per maximal invalid subsequence and preserving all valid code
/// points unchanged.
pub fn transcode_invalid<Src: CodeUnit, Dst: CodeUnit>(input: &[Src], out: &mut Vec<Dst>) {
    let mut rest = input;
    while !rest.is_empty() {
        let (len, cp) = next_code_point(rest);
        rest = &rest[len..];
        Dst::encode(cp.unwrap_or(REPLACEMENT), out);
    }
}

/// Narrows a code point into a single 16-bit unit.
///
/// Non-BMP code points do not fit; with `error_on_overflow` that is a
/// [`ErrorKind::ValueOutOfRange`] failure, otherwise the first (high)
/// surrogate half is returned.
pub fn encode_wide(cp: char, error_on_overflow: bool) -> Result<u16, ErrorKind> {
    let v = cp as u32;
    if v <= 0xFFFF {
        #[allow(clippy::cast_possible_truncation)]
        return Ok(v as u16);
    }
    if error_on_overflow {
        return Err(ErrorKind::ValueOutOfRange);
    }
    #[allow(clippy::cast_possible_truncation)]
    Ok((0xD800 + ((v - 0x10000) >> 10)) as u16)
}

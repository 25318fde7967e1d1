//! Per-type value parsers.
//!
//! Each parser consumes code points through a [`ScanCursor`], reads the
//! maximal matching prefix allowed by the specifier (bounded by width, in
//! code points), and produces the value. The dispatcher assigns to the
//! destination only on success and restores the pre-advance cursor position
//! on failure, so the reported suffix always points at the start of the
//! value that failed.

use alloc::string::String;
use alloc::vec::Vec;

use crate::args::ArgSlot;
use crate::error::ErrorKind;
use crate::locale::Locale;
use crate::range::ScanCursor;
use crate::specifier::{Align, FormatSpec, Presentation};

fn is_space(cp: char, loc: Option<&dyn Locale>) -> bool {
    loc.map_or_else(|| cp.is_whitespace(), |l| l.is_space(cp))
}

fn skip_ws(cur: &mut dyn ScanCursor, loc: Option<&dyn Locale>) -> Result<(), ErrorKind> {
    while let Some((cp, len)) = cur.peek()? {
        if !is_space(cp, loc) {
            break;
        }
        cur.advance(len);
    }
    Ok(())
}

/// Matches a literal run from the format string against the source: a
/// whitespace code point in the format skips any whitespace run (possibly
/// empty) in the source; anything else must match exactly.
pub(crate) fn match_literal(cur: &mut dyn ScanCursor, lit: &str) -> Result<(), ErrorKind> {
    for cp in lit.chars() {
        if cp.is_whitespace() {
            skip_ws(cur, None)?;
        } else {
            match cur.peek()? {
                None => return Err(ErrorKind::EndOfInput),
                Some((c, len)) if c == cp => cur.advance(len),
                Some(_) => {
                    return Err(ErrorKind::InvalidScannedValue(
                        "source does not match format literal",
                    ))
                }
            }
        }
    }
    Ok(())
}

/// Consumes `word` case-sensitively; on partial match restores the cursor
/// and reports false.
fn match_word(cur: &mut dyn ScanCursor, word: &str) -> Result<bool, ErrorKind> {
    let m = cur.mark();
    for expect in word.chars() {
        match cur.peek()? {
            Some((c, len)) if c == expect => cur.advance(len),
            _ => {
                cur.reset(m);
                return Ok(false);
            }
        }
    }
    Ok(true)
}

fn match_word_ci(cur: &mut dyn ScanCursor, word: &str) -> Result<bool, ErrorKind> {
    let m = cur.mark();
    for expect in word.chars() {
        match cur.peek()? {
            Some((c, len)) if c.to_ascii_lowercase() == expect => cur.advance(len),
            _ => {
                cur.reset(m);
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// Parses one value into `slot`. Restores the pre-advance cursor position
/// on any failure.
pub(crate) fn dispatch(
    slot: &mut ArgSlot<'_>,
    cur: &mut dyn ScanCursor,
    spec: &FormatSpec,
    locale: Option<&dyn Locale>,
) -> Result<(), ErrorKind> {
    let loc = if spec.localized { locale } else { None };
    let mark = cur.mark();
    let res = dispatch_value(slot, cur, spec, loc);
    if res.is_err() {
        cur.reset(mark);
    }
    res
}

fn dispatch_value(
    slot: &mut ArgSlot<'_>,
    cur: &mut dyn ScanCursor,
    spec: &FormatSpec,
    loc: Option<&dyn Locale>,
) -> Result<(), ErrorKind> {
    match slot {
        ArgSlot::I8(dst) => **dst = parse_int::<i8>(cur, spec, loc)?,
        ArgSlot::I16(dst) => **dst = parse_int::<i16>(cur, spec, loc)?,
        ArgSlot::I32(dst) => **dst = parse_int::<i32>(cur, spec, loc)?,
        ArgSlot::I64(dst) => **dst = parse_int::<i64>(cur, spec, loc)?,
        ArgSlot::U8(dst) => **dst = parse_int::<u8>(cur, spec, loc)?,
        ArgSlot::U16(dst) => **dst = parse_int::<u16>(cur, spec, loc)?,
        ArgSlot::U32(dst) => **dst = parse_int::<u32>(cur, spec, loc)?,
        ArgSlot::U64(dst) => **dst = parse_int::<u64>(cur, spec, loc)?,
        ArgSlot::F32(dst) => **dst = parse_float::<f32>(cur, spec, loc)?,
        ArgSlot::F64(dst) => **dst = parse_float::<f64>(cur, spec, loc)?,
        ArgSlot::Bool(dst) => **dst = parse_bool(cur, spec, loc)?,
        ArgSlot::Char(dst) => **dst = parse_char(cur)?,
        ArgSlot::Str(dst) => {
            let mut out = String::new();
            scan_text(cur, spec, loc, &mut |cp| out.push(cp))?;
            **dst = out;
        }
        ArgSlot::Utf16Str(dst) => {
            let mut out = Vec::new();
            scan_text(cur, spec, loc, &mut |cp| {
                let mut buf = [0u16; 2];
                out.extend_from_slice(cp.encode_utf16(&mut buf));
            })?;
            **dst = out;
        }
        ArgSlot::CodePoints(dst) => {
            let mut out = Vec::new();
            scan_text(cur, spec, loc, &mut |cp| out.push(cp))?;
            **dst = out;
        }
        ArgSlot::Custom(custom) => custom.scan(cur, spec)?,
    }
    Ok(())
}

// ------------------------------------------------------------------------
// Integers
// ------------------------------------------------------------------------

trait ScanInt: Sized {
    fn from_parts(mag: u128, negative: bool) -> Result<Self, ErrorKind>;
}

macro_rules! impl_scan_int_signed {
    ($($t:ty),+) => {$(
        impl ScanInt for $t {
            fn from_parts(mag: u128, negative: bool) -> Result<Self, ErrorKind> {
                let v = i128::try_from(mag).map_err(|_| ErrorKind::ValueOutOfRange)?;
                let v = if negative { -v } else { v };
                Self::try_from(v).map_err(|_| ErrorKind::ValueOutOfRange)
            }
        }
    )+};
}

macro_rules! impl_scan_int_unsigned {
    ($($t:ty),+) => {$(
        impl ScanInt for $t {
            fn from_parts(mag: u128, negative: bool) -> Result<Self, ErrorKind> {
                if negative && mag != 0 {
                    return Err(ErrorKind::ValueOutOfRange);
                }
                Self::try_from(mag).map_err(|_| ErrorKind::ValueOutOfRange)
            }
        }
    )+};
}

impl_scan_int_signed!(i8, i16, i32, i64);
impl_scan_int_unsigned!(u8, u16, u32, u64);

fn parse_int<T: ScanInt>(
    cur: &mut dyn ScanCursor,
    spec: &FormatSpec,
    loc: Option<&dyn Locale>,
) -> Result<T, ErrorKind> {
    skip_ws(cur, loc)?;
    let width = spec.width.unwrap_or(usize::MAX);
    let mut taken = 0usize;

    let Some((first, first_len)) = cur.peek()? else {
        return Err(ErrorKind::EndOfInput);
    };
    let mut negative = false;
    if first == '+' || first == '-' {
        if spec.presentation == Presentation::Unsigned {
            return Err(ErrorKind::InvalidScannedValue("sign not allowed with 'u'"));
        }
        negative = first == '-';
        cur.advance(first_len);
        taken += 1;
    }

    // 0 means detect from a prefix ('i' presentation).
    let mut base: u32 = match spec.presentation {
        Presentation::Binary => 2,
        Presentation::Octal => 8,
        Presentation::Hex => 16,
        Presentation::Int => 0,
        _ => 10,
    };

    let mut acc: u128 = 0;
    let mut digits = 0usize;

    // Leading zero: by itself a digit, possibly introducing a base prefix.
    if taken < width && matches!(cur.peek()?, Some(('0', _))) {
        cur.advance(1);
        taken += 1;
        digits += 1;
        if taken < width {
            let prefix = match cur.peek()? {
                Some(('x' | 'X', _)) if base == 16 || base == 0 => Some(16),
                Some(('b' | 'B', _)) if base == 2 || base == 0 => Some(2),
                Some(('o' | 'O', _)) if base == 8 || base == 0 => Some(8),
                _ => None,
            };
            if let Some(b) = prefix {
                // Only take the prefix when a digit follows it.
                let m = cur.mark();
                cur.advance(1);
                if taken + 1 < width && matches!(cur.peek()?, Some((c, _)) if c.is_digit(b)) {
                    base = b;
                    taken += 1;
                } else {
                    cur.reset(m);
                }
            }
        }
        if base == 0 {
            base = 8;
        }
    }
    if base == 0 {
        base = 10;
    }

    let sep = loc.and_then(Locale::thousands_sep);
    loop {
        if taken >= width {
            break;
        }
        let Some((cp, len)) = cur.peek()? else { break };
        if let Some(d) = cp.to_digit(base) {
            acc = acc
                .checked_mul(u128::from(base))
                .and_then(|a| a.checked_add(u128::from(d)))
                .ok_or(ErrorKind::ValueOutOfRange)?;
            cur.advance(len);
            taken += 1;
            digits += 1;
        } else if digits > 0 && sep == Some(cp) {
            // Grouping separator: consume only when another digit follows.
            let m = cur.mark();
            cur.advance(len);
            if matches!(cur.peek()?, Some((c, _)) if c.is_digit(base)) {
                taken += 1;
            } else {
                cur.reset(m);
                break;
            }
        } else {
            break;
        }
    }

    if digits == 0 {
        return Err(ErrorKind::InvalidScannedValue("expected digits"));
    }
    T::from_parts(acc, negative)
}

// ------------------------------------------------------------------------
// Floating point
// ------------------------------------------------------------------------

trait ScanFloat: Sized {
    fn parse_decimal(text: &str) -> Option<Self>;
    fn from_f64(v: f64) -> Self;
}

impl ScanFloat for f64 {
    fn parse_decimal(text: &str) -> Option<Self> {
        text.parse().ok()
    }
    fn from_f64(v: f64) -> Self {
        v
    }
}

impl ScanFloat for f32 {
    fn parse_decimal(text: &str) -> Option<Self> {
        text.parse().ok()
    }
    #[allow(clippy::cast_possible_truncation)]
    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

/// Exact scaling by powers of two; overflow and underflow saturate the way
/// f64 arithmetic does.
fn scale_by_pow2(mut x: f64, exp: i32) -> f64 {
    let clamped = exp.clamp(-5000, 5000);
    if clamped >= 0 {
        for _ in 0..clamped {
            x *= 2.0;
        }
    } else {
        for _ in 0..-clamped {
            x *= 0.5;
        }
    }
    x
}

fn parse_float<T: ScanFloat>(
    cur: &mut dyn ScanCursor,
    spec: &FormatSpec,
    loc: Option<&dyn Locale>,
) -> Result<T, ErrorKind> {
    skip_ws(cur, loc)?;
    if cur.peek()?.is_none() {
        return Err(ErrorKind::EndOfInput);
    }

    let width = spec.width.unwrap_or(usize::MAX);
    let mut taken = 0usize;
    let mut negative = false;
    if let Some((c @ ('+' | '-'), len)) = cur.peek()? {
        negative = c == '-';
        cur.advance(len);
        taken += 1;
    }

    if match_word_ci(cur, "inf")? {
        let _ = match_word_ci(cur, "inity")?;
        let v = if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        return Ok(T::from_f64(v));
    }
    if match_word_ci(cur, "nan")? {
        return Ok(T::from_f64(if negative { -f64::NAN } else { f64::NAN }));
    }

    // Hex form: mandatory for 'a'/'A', otherwise engaged by a 0x prefix.
    let hex = {
        let m = cur.mark();
        let mut engaged = false;
        if taken + 2 < width && matches!(cur.peek()?, Some(('0', _))) {
            cur.advance(1);
            if matches!(cur.peek()?, Some(('x' | 'X', _))) {
                cur.advance(1);
                engaged = true;
                taken += 2;
            }
        }
        if !engaged {
            cur.reset(m);
        }
        engaged || spec.presentation == Presentation::FloatHex
    };
    if hex {
        let v = parse_hex_float(cur, width, &mut taken)?;
        return Ok(T::from_f64(if negative { -v } else { v }));
    }

    // Decimal form, normalized into a buffer for core's float parser.
    let mut buf = String::new();
    if negative {
        buf.push('-');
    }
    let point = loc.map_or('.', Locale::decimal_point);
    let sep = loc.and_then(Locale::thousands_sep);
    let mut digits = 0usize;

    while taken < width {
        let Some((cp, len)) = cur.peek()? else { break };
        if cp.is_ascii_digit() {
            buf.push(cp);
            cur.advance(len);
            taken += 1;
            digits += 1;
        } else if digits > 0 && sep == Some(cp) {
            let m = cur.mark();
            cur.advance(len);
            if matches!(cur.peek()?, Some((c, _)) if c.is_ascii_digit()) {
                taken += 1;
            } else {
                cur.reset(m);
                break;
            }
        } else {
            break;
        }
    }

    if taken < width && matches!(cur.peek()?, Some((c, _)) if c == point) {
        if let Some((_, len)) = cur.peek()? {
            cur.advance(len);
        }
        taken += 1;
        buf.push('.');
        while taken < width {
            let Some((cp, len)) = cur.peek()? else { break };
            if !cp.is_ascii_digit() {
                break;
            }
            buf.push(cp);
            cur.advance(len);
            taken += 1;
            digits += 1;
        }
    }

    if digits == 0 {
        return Err(ErrorKind::InvalidScannedValue("expected a number"));
    }

    // Exponent, only committed when at least one digit follows.
    if taken < width && matches!(cur.peek()?, Some(('e' | 'E', _))) {
        let m = cur.mark();
        let mut tentative = String::from("e");
        cur.advance(1);
        let mut exp_taken = 1;
        if let Some((c @ ('+' | '-'), len)) = cur.peek()? {
            tentative.push(c);
            cur.advance(len);
            exp_taken += 1;
        }
        let mut exp_digits = 0;
        while taken + exp_taken < width {
            let Some((cp, len)) = cur.peek()? else { break };
            if !cp.is_ascii_digit() {
                break;
            }
            tentative.push(cp);
            cur.advance(len);
            exp_taken += 1;
            exp_digits += 1;
        }
        if exp_digits > 0 {
            buf.push_str(&tentative);
        } else {
            cur.reset(m);
        }
    }

    T::parse_decimal(&buf).ok_or(ErrorKind::InvalidScannedValue("malformed floating-point"))
}

/// Hex-float mantissa and binary exponent, after any `0x` prefix.
fn parse_hex_float(
    cur: &mut dyn ScanCursor,
    width: usize,
    taken: &mut usize,
) -> Result<f64, ErrorKind> {
    let mut mant: u64 = 0;
    let mut digits = 0usize;
    let mut dropped_int_digits = 0i32;
    let mut frac_digits = 0i32;
    let mut saw_point = false;

    while *taken < width {
        let Some((cp, len)) = cur.peek()? else { break };
        if let Some(d) = cp.to_digit(16) {
            // 15 hex digits saturate the mantissa; beyond that only the
            // magnitude matters.
            if digits < 15 {
                mant = mant * 16 + u64::from(d);
                if saw_point {
                    frac_digits += 1;
                }
            } else if !saw_point {
                dropped_int_digits += 1;
            }
            digits += 1;
            cur.advance(len);
            *taken += 1;
        } else if cp == '.' && !saw_point {
            saw_point = true;
            cur.advance(len);
            *taken += 1;
        } else {
            break;
        }
    }
    if digits == 0 {
        return Err(ErrorKind::InvalidScannedValue("expected hex digits"));
    }

    let mut exp: i32 = 0;
    if *taken < width && matches!(cur.peek()?, Some(('p' | 'P', _))) {
        let m = cur.mark();
        cur.advance(1);
        let mut exp_negative = false;
        if let Some((c @ ('+' | '-'), len)) = cur.peek()? {
            exp_negative = c == '-';
            cur.advance(len);
        }
        let mut exp_digits = 0;
        while let Some((cp, len)) = cur.peek()? {
            let Some(d) = cp.to_digit(10) else { break };
            exp = exp.saturating_mul(10).saturating_add(d as i32);
            cur.advance(len);
            exp_digits += 1;
        }
        if exp_digits == 0 {
            cur.reset(m);
            exp = 0;
        } else if exp_negative {
            exp = -exp;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let value = scale_by_pow2(mant as f64, exp + 4 * (dropped_int_digits - frac_digits));
    Ok(value)
}

// ------------------------------------------------------------------------
// Bool, char
// ------------------------------------------------------------------------

fn parse_bool(
    cur: &mut dyn ScanCursor,
    spec: &FormatSpec,
    loc: Option<&dyn Locale>,
) -> Result<bool, ErrorKind> {
    skip_ws(cur, loc)?;
    let numeric = matches!(
        spec.presentation,
        Presentation::Default | Presentation::Decimal | Presentation::Int
    );
    let textual = matches!(spec.presentation, Presentation::Default | Presentation::Str);

    match cur.peek()? {
        None => Err(ErrorKind::EndOfInput),
        Some(('0', len)) if numeric => {
            cur.advance(len);
            Ok(false)
        }
        Some(('1', len)) if numeric => {
            cur.advance(len);
            Ok(true)
        }
        Some(('t', _)) if textual => {
            if match_word(cur, "true")? {
                Ok(true)
            } else {
                Err(ErrorKind::InvalidScannedValue("expected a boolean"))
            }
        }
        Some(('f', _)) if textual => {
            if match_word(cur, "false")? {
                Ok(false)
            } else {
                Err(ErrorKind::InvalidScannedValue("expected a boolean"))
            }
        }
        Some(_) => Err(ErrorKind::InvalidScannedValue("expected a boolean")),
    }
}

fn parse_char(cur: &mut dyn ScanCursor) -> Result<char, ErrorKind> {
    // No whitespace skipping: the next code point is the value.
    match cur.peek()? {
        None => Err(ErrorKind::EndOfInput),
        Some((cp, len)) => {
            cur.advance(len);
            Ok(cp)
        }
    }
}

// ------------------------------------------------------------------------
// Strings, code-point lists and character classes
// ------------------------------------------------------------------------

fn skip_fill(cur: &mut dyn ScanCursor, fill: char) -> Result<(), ErrorKind> {
    while let Some((cp, len)) = cur.peek()? {
        if cp != fill {
            break;
        }
        cur.advance(len);
    }
    Ok(())
}

fn scan_text(
    cur: &mut dyn ScanCursor,
    spec: &FormatSpec,
    loc: Option<&dyn Locale>,
    push: &mut dyn FnMut(char),
) -> Result<(), ErrorKind> {
    let width = spec.width.unwrap_or(usize::MAX);
    let skip_leading_fill = matches!(spec.align, Align::Right | Align::Center);
    let trim_trailing_fill = matches!(spec.align, Align::Left | Align::Center);

    if spec.presentation == Presentation::Char {
        // Exact read: the specifier validated that a width is present.
        let want = spec.width.unwrap_or(1);
        for _ in 0..want {
            match cur.peek()? {
                None => return Err(ErrorKind::LengthTooShort),
                Some((cp, len)) => {
                    push(cp);
                    cur.advance(len);
                }
            }
        }
        return Ok(());
    }

    if let Some(class) = &spec.class {
        if skip_leading_fill {
            skip_fill(cur, spec.fill)?;
        }
        let mut taken = 0usize;
        while taken < width {
            let Some((cp, len)) = cur.peek()? else { break };
            if !class.contains(cp) {
                break;
            }
            push(cp);
            cur.advance(len);
            taken += 1;
        }
        if taken == 0 {
            return Err(if cur.peek()?.is_none() {
                ErrorKind::EndOfInput
            } else {
                ErrorKind::InvalidScannedValue("no characters matched the set")
            });
        }
        if trim_trailing_fill {
            skip_fill(cur, spec.fill)?;
        }
        return Ok(());
    }

    // Whitespace-delimited token.
    skip_ws(cur, loc)?;
    if skip_leading_fill {
        skip_fill(cur, spec.fill)?;
    }
    let trim = spec.align != Align::Unspecified;
    let mut taken = 0usize;
    while taken < width {
        let Some((cp, len)) = cur.peek()? else { break };
        if is_space(cp, loc) || (trim && cp == spec.fill) {
            break;
        }
        push(cp);
        cur.advance(len);
        taken += 1;
    }
    if taken == 0 {
        return Err(if cur.peek()?.is_none() {
            ErrorKind::EndOfInput
        } else {
            ErrorKind::InvalidScannedValue("empty value")
        });
    }
    if trim_trailing_fill {
        skip_fill(cur, spec.fill)?;
    }
    Ok(())
}

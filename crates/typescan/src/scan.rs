//! Scanning entry points.
//!
//! The typed functions here reduce their argument tuples to the erased
//! [`ScanArgs`] list and hand off to the `vscan*` drivers, which are
//! monomorphic per source kind. The driver walks the format string once;
//! literal runs are matched against the source as they are encountered, and
//! each replacement field claims its argument slot, parses its specifier,
//! and runs the per-type parser.

use crate::args::{IntoScanArgs, ScanArgs, Scannable};
use crate::error::ScanError;
use crate::error::ErrorKind;
use crate::format::{parse_format_string, FormatHandler};
use crate::locale::Locale;
use crate::parsers;
use crate::range::{ByteStream, ScanCursor, SliceCursor, StreamCursor};
use crate::result::ScanResult;
use crate::specifier::parse_spec_body;
use crate::unicode::CodeUnit;

struct ScanDriver<'e, 'dst> {
    cursor: &'e mut dyn ScanCursor,
    args: &'e mut ScanArgs<'dst>,
    locale: Option<&'e dyn Locale>,
}

impl FormatHandler for ScanDriver<'_, '_> {
    fn on_literal(&mut self, literal: &str) -> Result<(), ErrorKind> {
        parsers::match_literal(self.cursor, literal)
    }

    fn on_field(&mut self, id: usize, spec_body: &str) -> Result<usize, ErrorKind> {
        let slot = self.args.take(id)?;
        let (spec, used) = parse_spec_body(slot.kind(), spec_body)?;
        parsers::dispatch(slot, self.cursor, &spec, self.locale)?;
        Ok(used)
    }
}

fn run(
    cursor: &mut dyn ScanCursor,
    format: &str,
    args: &mut ScanArgs<'_>,
    locale: Option<&dyn Locale>,
) -> Result<(), ErrorKind> {
    let mut driver = ScanDriver {
        cursor,
        args,
        locale,
    };
    parse_format_string(format, &mut driver)
}

/// Erased-argument driver over a UTF-8 string source.
pub fn vscan<'s>(source: &'s str, format: &str, args: &mut ScanArgs<'_>) -> ScanResult<&'s str> {
    vscan_str(source, format, args, None)
}

/// Erased-argument driver over a UTF-8 string source with a locale.
pub fn vscan_localized<'s>(
    locale: &dyn Locale,
    source: &'s str,
    format: &str,
    args: &mut ScanArgs<'_>,
) -> ScanResult<&'s str> {
    vscan_str(source, format, args, Some(locale))
}

fn vscan_str<'s>(
    source: &'s str,
    format: &str,
    args: &mut ScanArgs<'_>,
    locale: Option<&dyn Locale>,
) -> ScanResult<&'s str> {
    let mut cursor = SliceCursor::new(source.as_bytes());
    match run(&mut cursor, format, args, locale) {
        Ok(()) => ScanResult::ok_with(&source[cursor.consumed()..]),
        Err(kind) => {
            let offset = cursor.consumed();
            ScanResult::err_with(&source[offset..], ScanError::new(kind, offset))
        }
    }
}

/// Erased-argument driver over a contiguous slice of 8-, 16- or 32-bit
/// code units. The source is validated lazily, as the cursor reaches it.
pub fn vscan_units<'s, U: CodeUnit>(
    source: &'s [U],
    format: &str,
    args: &mut ScanArgs<'_>,
) -> ScanResult<&'s [U]> {
    let mut cursor = SliceCursor::new(source);
    match run(&mut cursor, format, args, None) {
        Ok(()) => ScanResult::ok_with(&source[cursor.consumed()..]),
        Err(kind) => {
            let offset = cursor.consumed();
            ScanResult::err_with(&source[offset..], ScanError::new(kind, offset))
        }
    }
}

/// Erased-argument driver over a byte stream.
pub fn vscan_and_sync<I: Iterator<Item = u8>>(
    stream: &mut ByteStream<I>,
    format: &str,
    args: &mut ScanArgs<'_>,
) -> ScanResult<usize> {
    let mut cursor = StreamCursor::new(stream);
    let outcome = run(&mut cursor, format, args, None);
    let consumed = cursor.consumed();
    drop(cursor);
    match outcome {
        Ok(()) => ScanResult::ok_with(consumed),
        Err(kind) => ScanResult::err_with(consumed, ScanError::new(kind, consumed)),
    }
}

/// Scans typed values out of `source` as directed by `format`.
///
/// Destinations are passed as a tuple of `&mut` bindings; they are written
/// in format-string order, and on failure every destination before the
/// failing field keeps its scanned value. The result carries the
/// unconsumed suffix of `source` either way.
///
/// ```
/// let mut a = 0i32;
/// let mut b = 0i32;
/// let result = typescan::scan("42 -7 rest", "{} {}", (&mut a, &mut b));
/// assert!(result.is_ok());
/// assert_eq!((a, b), (42, -7));
/// assert_eq!(*result.range(), " rest");
/// ```
pub fn scan<'s, 'a>(
    source: &'s str,
    format: &str,
    args: impl IntoScanArgs<'a>,
) -> ScanResult<&'s str> {
    let mut args = args.into_scan_args();
    vscan(source, format, &mut args)
}

/// Scans a contiguous slice of code units in the encoding implied by the
/// unit width: UTF-8 for `u8`, UTF-16 for `u16`, UTF-32 for `u32`.
///
/// ```
/// let source: &[u32] = &[0x65E5, 0x672C];
/// let mut cp = '\0';
/// let result = typescan::scan_units(source, "{}", (&mut cp,));
/// assert!(result.is_ok());
/// assert_eq!(cp, '日');
/// assert_eq!(*result.range(), &[0x672C][..]);
/// ```
pub fn scan_units<'s, 'a, U: CodeUnit>(
    source: &'s [U],
    format: &str,
    args: impl IntoScanArgs<'a>,
) -> ScanResult<&'s [U]> {
    let mut args = args.into_scan_args();
    vscan_units(source, format, &mut args)
}

/// Scans a single value; equivalent to [`scan`] with the format `"{}"`.
pub fn scan_value<'s, T: Scannable>(source: &'s str, out: &mut T) -> ScanResult<&'s str> {
    scan(source, "{}", (out,))
}

/// [`scan`] with a locale supplied; only fields carrying the `L` flag
/// consult it.
pub fn scan_localized<'s, 'a>(
    locale: &dyn Locale,
    source: &'s str,
    format: &str,
    args: impl IntoScanArgs<'a>,
) -> ScanResult<&'s str> {
    let mut args = args.into_scan_args();
    vscan_localized(locale, source, format, &mut args)
}

/// Scans from a [`ByteStream`], leaving the stream positioned after the
/// consumed prefix so the caller can keep scanning from it. The result
/// range is the number of bytes consumed.
///
/// ```
/// use typescan::ByteStream;
///
/// let mut stream = ByteStream::from_slice(b"10 20 rest");
/// let mut a = 0u32;
/// let mut b = 0u32;
/// assert!(typescan::scan_and_sync(&mut stream, "{}", (&mut a,)).is_ok());
/// assert!(typescan::scan_and_sync(&mut stream, "{}", (&mut b,)).is_ok());
/// assert_eq!((a, b), (10, 20));
/// let rest: Vec<u8> = stream.into_remaining().collect();
/// assert_eq!(rest, b" rest");
/// ```
pub fn scan_and_sync<'a, I: Iterator<Item = u8>>(
    stream: &mut ByteStream<I>,
    format: &str,
    args: impl IntoScanArgs<'a>,
) -> ScanResult<usize> {
    let mut args = args.into_scan_args();
    vscan_and_sync(stream, format, &mut args)
}

//! Typed, format-string-directed scanning: the dual of formatted output.
//!
//! A scan call takes a character source and a format string, extracts a
//! sequence of typed values, and returns the unconsumed suffix of the
//! source:
//!
//! ```
//! let mut key = String::new();
//! let mut value = 0i64;
//! let result = typescan::scan("retries = 3; done", "{:[a-z_]} = {}", (&mut key, &mut value));
//! assert!(result.is_ok());
//! assert_eq!((key.as_str(), value), ("retries", 3));
//! assert_eq!(*result.range(), "; done");
//! ```
//!
//! Sources may be `&str`, contiguous slices of 8/16/32-bit code units
//! ([`scan_units`]), or erased byte streams ([`ByteStream`] with
//! [`scan_and_sync`]). Format strings follow the `{[id][:spec]}` grammar
//! with `{{`/`}}` escapes; [`check_format_for`] runs the same validation
//! against a destination tuple type at definition time.

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod args;
mod checker;
mod error;
mod format;
mod locale;
mod parsers;
mod range;
mod result;
mod scan;
mod specifier;

pub mod unicode;

pub use args::{ArgKind, ArgSlot, CustomScannable, IntoScanArgs, ScanArgs, ScanKinds, Scannable};
pub use checker::{check_format, check_format_for};
pub use error::{ErrorKind, ScanError};
pub use locale::{CLocale, Locale};
pub use range::{ByteStream, ScanCursor};
pub use result::ScanResult;
pub use scan::{
    scan, scan_and_sync, scan_localized, scan_units, scan_value, vscan, vscan_and_sync,
    vscan_localized, vscan_units,
};
pub use specifier::{Align, CharClass, FormatSpec, Presentation};
pub use unicode::{CodeUnit, Encoding};

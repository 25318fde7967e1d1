//! Definition-time format-string checking.
//!
//! Runs the same grammar as the scan driver, but against argument kind tags
//! instead of values: no source is consumed and no value parser executes.
//! Beyond the shared grammar and specifier validation, the checker also
//! requires that every argument slot is referenced. Runtime format strings
//! simply skip this pass.

use alloc::vec::Vec;

use crate::args::{ArgKind, ScanKinds};
use crate::error::{ErrorKind, ScanError};
use crate::format::{parse_format_string, FormatHandler};
use crate::specifier::parse_spec_body;

struct CheckHandler<'k> {
    kinds: &'k [ArgKind],
    visited: Vec<bool>,
}

impl FormatHandler for CheckHandler<'_> {
    fn on_literal(&mut self, _literal: &str) -> Result<(), ErrorKind> {
        Ok(())
    }

    fn on_field(&mut self, id: usize, spec_body: &str) -> Result<usize, ErrorKind> {
        if id >= self.kinds.len() {
            return Err(ErrorKind::InvalidFormatString("argument id out of range"));
        }
        if self.visited[id] {
            return Err(ErrorKind::ArgumentAlreadyScanned);
        }
        self.visited[id] = true;
        let (_, used) = parse_spec_body(self.kinds[id], spec_body)?;
        Ok(used)
    }
}

/// Validates `format` against an ordered list of argument kinds.
pub fn check_format(format: &str, kinds: &[ArgKind]) -> Result<(), ScanError> {
    let mut handler = CheckHandler {
        kinds,
        visited: alloc::vec![false; kinds.len()],
    };
    parse_format_string(format, &mut handler).map_err(|kind| ScanError::new(kind, 0))?;
    if handler.visited.iter().any(|seen| !seen) {
        return Err(ScanError::new(
            ErrorKind::InvalidFormatString("argument list not exhausted"),
            0,
        ));
    }
    Ok(())
}

/// [`check_format`] with the kind list derived from a destination tuple
/// type.
///
/// ```
/// assert!(typescan::check_format_for::<(i32, String)>("{} {}").is_ok());
/// assert!(typescan::check_format_for::<(i32,)>("{:e}").is_err());
/// ```
pub fn check_format_for<K: ScanKinds>(format: &str) -> Result<(), ScanError> {
    check_format(format, &K::kinds())
}

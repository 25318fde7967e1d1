use crate::error::ScanError;

/// The outcome of a scan call: the unconsumed suffix of the source, plus the
/// error if the scan stopped early.
///
/// Both halves are always present. On success every argument referenced by
/// the format string holds a defined value and [`error`](Self::error) is
/// `None`. On failure, arguments earlier in the format keep their scanned
/// values and the suffix points at the first unconsumed code unit as of the
/// failure.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult<R> {
    range: R,
    error: Option<ScanError>,
}

impl<R> ScanResult<R> {
    pub(crate) fn ok_with(range: R) -> Self {
        Self { range, error: None }
    }

    pub(crate) fn err_with(range: R, error: ScanError) -> Self {
        Self {
            range,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn error(&self) -> Option<ScanError> {
        self.error
    }

    /// The unconsumed suffix of the source.
    pub fn range(&self) -> &R {
        &self.range
    }

    pub fn into_parts(self) -> (R, Option<ScanError>) {
        (self.range, self.error)
    }

    /// Converts into a `Result`, discarding the suffix on failure.
    pub fn ok(self) -> Result<R, ScanError> {
        match self.error {
            None => Ok(self.range),
            Some(err) => Err(err),
        }
    }
}

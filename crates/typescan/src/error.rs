use thiserror::Error;

/// The closed set of failure classes a scan can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("invalid format string: {0}")]
    InvalidFormatString(&'static str),
    #[error("source is not valid Unicode in its declared encoding")]
    InvalidSourceEncoding,
    #[error("invalid scanned value: {0}")]
    InvalidScannedValue(&'static str),
    #[error("value out of range")]
    ValueOutOfRange,
    #[error("source too short for the requested width")]
    LengthTooShort,
    #[error("unexpected end of input")]
    EndOfInput,
    #[error("argument with this id already scanned")]
    ArgumentAlreadyScanned,
}

/// An error produced by a scan call, anchored to a source position.
///
/// `offset` is the number of code units already consumed from the source when
/// the error was raised. For failures inside a value parser the cursor is
/// restored first, so the offset points at the start of the value that failed
/// to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} at offset {offset}")]
pub struct ScanError {
    pub kind: ErrorKind,
    pub offset: usize,
}

impl ScanError {
    pub(crate) fn new(kind: ErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

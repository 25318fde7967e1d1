//! Source-range adapters.
//!
//! A scan source is either a contiguous slice of code units or an erased
//! forward sequence of bytes. Both are presented to the engine through
//! [`ScanCursor`]: peek one decoded code point ahead, advance by units, and
//! mark/reset so a failed value parse can restore the pre-advance position.
//!
//! The streaming adapter keeps every byte it has pulled from the underlying
//! iterator in a ring until the cursor is dropped; only then is the consumed
//! prefix committed. The unconsumed tail stays buffered in the
//! [`ByteStream`], which is how the caller resumes scanning (or recovers the
//! byte-exact suffix) after the call.

use alloc::collections::VecDeque;

use crate::error::ErrorKind;
use crate::unicode::{self, CodeUnit};

/// A scannable view of a source, one decoded code point at a time.
///
/// Positions are measured in code units of the underlying source. `peek`
/// does not consume; `advance` moves by the unit length `peek` reported.
pub trait ScanCursor {
    /// The code point at the cursor and its length in units, `None` at the
    /// end of the source, or [`ErrorKind::InvalidSourceEncoding`] when the
    /// source is malformed at the cursor.
    fn peek(&mut self) -> Result<Option<(char, usize)>, ErrorKind>;

    /// Moves the cursor forward by `units`.
    fn advance(&mut self, units: usize);

    /// Units consumed since the start of the scan call.
    fn consumed(&self) -> usize;

    /// An opaque position usable with [`reset`](Self::reset).
    fn mark(&self) -> usize {
        self.consumed()
    }

    /// Restores a position previously obtained from [`mark`](Self::mark).
    fn reset(&mut self, mark: usize);
}

/// Cursor over a contiguous slice of code units. The suffix is a subslice
/// of the same buffer.
#[derive(Debug)]
pub(crate) struct SliceCursor<'a, U: CodeUnit> {
    input: &'a [U],
    pos: usize,
}

impl<'a, U: CodeUnit> SliceCursor<'a, U> {
    pub(crate) fn new(input: &'a [U]) -> Self {
        Self { input, pos: 0 }
    }

    /// The unconsumed suffix.
    pub(crate) fn rest(&self) -> &'a [U] {
        &self.input[self.pos..]
    }
}

impl<U: CodeUnit> ScanCursor for SliceCursor<'_, U> {
    fn peek(&mut self) -> Result<Option<(char, usize)>, ErrorKind> {
        let rest = &self.input[self.pos..];
        if rest.is_empty() {
            return Ok(None);
        }
        match unicode::next_code_point(rest) {
            (len, Some(cp)) => Ok(Some((cp, len))),
            (_, None) => Err(ErrorKind::InvalidSourceEncoding),
        }
    }

    fn advance(&mut self, units: usize) {
        self.pos = (self.pos + units).min(self.input.len());
    }

    fn consumed(&self) -> usize {
        self.pos
    }

    fn reset(&mut self, mark: usize) {
        debug_assert!(mark <= self.pos);
        self.pos = mark;
    }
}

/// An erased forward byte sequence usable as a streaming scan source.
///
/// Wraps any `Iterator<Item = u8>`. The stream itself is the resumable
/// cursor: bytes left unconsumed by a scan call stay buffered here, so a
/// subsequent [`scan_and_sync`](crate::scan_and_sync) call, or
/// [`into_remaining`](Self::into_remaining), continues exactly where the
/// previous call stopped. The declared encoding of a byte stream is UTF-8.
#[derive(Debug)]
pub struct ByteStream<I> {
    iter: I,
    ring: VecDeque<u8>,
}

impl<I: Iterator<Item = u8>> ByteStream<I> {
    pub fn new(iter: I) -> Self {
        Self {
            iter,
            ring: VecDeque::new(),
        }
    }

    /// Pulls from the iterator until the ring holds `target` bytes or the
    /// iterator is exhausted.
    fn fill(&mut self, target: usize) {
        while self.ring.len() < target {
            match self.iter.next() {
                Some(b) => self.ring.push_back(b),
                None => break,
            }
        }
    }

    /// The unconsumed tail: buffered lookahead first, then the rest of the
    /// underlying iterator.
    pub fn into_remaining(self) -> impl Iterator<Item = u8> {
        self.ring.into_iter().chain(self.iter)
    }
}

impl<'s> ByteStream<core::iter::Copied<core::slice::Iter<'s, u8>>> {
    /// Convenience constructor over a byte slice.
    pub fn from_slice(bytes: &'s [u8]) -> Self {
        Self::new(bytes.iter().copied())
    }
}

/// Per-call cursor over a [`ByteStream`].
///
/// Fetched bytes are retained in the stream's ring for the whole call so
/// that `reset` can restore any earlier mark. Dropping the cursor commits
/// the consumed prefix and leaves the tail buffered, on every exit path.
pub(crate) struct StreamCursor<'a, I: Iterator<Item = u8>> {
    stream: &'a mut ByteStream<I>,
    pos: usize,
}

impl<'a, I: Iterator<Item = u8>> StreamCursor<'a, I> {
    pub(crate) fn new(stream: &'a mut ByteStream<I>) -> Self {
        Self { stream, pos: 0 }
    }
}

impl<I: Iterator<Item = u8>> Drop for StreamCursor<'_, I> {
    fn drop(&mut self) {
        self.stream.ring.drain(..self.pos);
    }
}

impl<I: Iterator<Item = u8>> ScanCursor for StreamCursor<'_, I> {
    fn peek(&mut self) -> Result<Option<(char, usize)>, ErrorKind> {
        self.stream.fill(self.pos + u8::MAX_UNITS);
        let avail = self.stream.ring.len() - self.pos;
        if avail == 0 {
            return Ok(None);
        }
        let mut window = [0u8; 4];
        let take = avail.min(u8::MAX_UNITS);
        for (i, slot) in window.iter_mut().enumerate().take(take) {
            *slot = self.stream.ring[self.pos + i];
        }
        let len = window[0].unit_len();
        if len == 0 || len > avail {
            // Malformed, or the stream ended inside a code point.
            return Err(ErrorKind::InvalidSourceEncoding);
        }
        match u8::decode(&window[..len]) {
            Some(cp) => Ok(Some((cp, len))),
            None => Err(ErrorKind::InvalidSourceEncoding),
        }
    }

    fn advance(&mut self, units: usize) {
        self.pos = (self.pos + units).min(self.stream.ring.len());
    }

    fn consumed(&self) -> usize {
        self.pos
    }

    fn reset(&mut self, mark: usize) {
        debug_assert!(mark <= self.pos);
        self.pos = mark;
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn slice_cursor_suffix_is_subview() {
        let src = "a日b";
        let mut cur = SliceCursor::new(src.as_bytes());
        assert_eq!(cur.peek().unwrap(), Some(('a', 1)));
        cur.advance(1);
        assert_eq!(cur.peek().unwrap(), Some(('日', 3)));
        cur.advance(3);
        assert_eq!(cur.rest(), b"b");
        assert_eq!(cur.consumed(), 4);
    }

    #[test]
    fn slice_cursor_reports_invalid_encoding() {
        let mut cur = SliceCursor::new(&[0xFFu8, b'a'][..]);
        assert_eq!(cur.peek(), Err(ErrorKind::InvalidSourceEncoding));
        assert_eq!(cur.consumed(), 0);
    }

    #[test]
    fn slice_cursor_wide_units() {
        let src: &[u32] = &[0x65E5, 0x672C];
        let mut cur = SliceCursor::new(src);
        assert_eq!(cur.peek().unwrap(), Some(('日', 1)));
        cur.advance(1);
        assert_eq!(cur.rest(), &[0x672C]);
    }

    #[test]
    fn stream_cursor_reset_and_commit() {
        let mut stream = ByteStream::from_slice(b"12 rest");
        {
            let mut cur = StreamCursor::new(&mut stream);
            let m = cur.mark();
            cur.advance(1);
            cur.advance(1);
            cur.reset(m);
            assert_eq!(cur.peek().unwrap(), Some(('1', 1)));
            cur.advance(2);
        }
        // Consumed prefix committed on drop; tail still buffered.
        let rest: Vec<u8> = stream.into_remaining().collect();
        assert_eq!(rest, b" rest");
    }

    #[test]
    fn stream_cursor_multibyte_lookahead() {
        let mut stream = ByteStream::from_slice("日本".as_bytes());
        let mut cur = StreamCursor::new(&mut stream);
        assert_eq!(cur.peek().unwrap(), Some(('日', 3)));
        cur.advance(3);
        assert_eq!(cur.peek().unwrap(), Some(('本', 3)));
    }

    #[test]
    fn stream_cursor_truncated_code_point() {
        let mut stream = ByteStream::from_slice(&"日".as_bytes()[..2]);
        let mut cur = StreamCursor::new(&mut stream);
        assert_eq!(cur.peek(), Err(ErrorKind::InvalidSourceEncoding));
    }
}

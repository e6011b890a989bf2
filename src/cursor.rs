use core::ops::Range;

use crate::{Error, Result};

/// A position within the logical content `[0, size]` of a byte sequence.
///
/// The cursor does not hold the data itself; every operation takes the size it is checked
/// against. Operations that would move the position outside `[0, size]` fail with
/// [`Error::OutOfBounds`] and leave the position unchanged.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Cursor {
    position: usize,
}

impl Cursor {
    /// A cursor at position 0.
    pub const fn new() -> Self {
        Self { position: 0 }
    }

    /// A cursor at `position`, which must lie in `[0, size]`.
    pub fn at(position: usize, size: usize) -> Result<Self> {
        let mut cursor = Self::new();
        cursor.seek(position, size)?;
        Ok(cursor)
    }

    /// Current position.
    #[inline(always)]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves to the absolute position `pos`.
    pub fn seek(&mut self, pos: usize, size: usize) -> Result<()> {
        if pos > size {
            return Err(Error::out_of_bounds(pos, 0, size));
        }
        self.position = pos;
        Ok(())
    }

    /// Moves by `delta` bytes relative to the current position. Negative deltas move backward.
    pub fn seek_by(&mut self, delta: isize, size: usize) -> Result<()> {
        match self.position.checked_add_signed(delta) {
            Some(pos) => self.seek(pos, size),
            None => Err(Error::out_of_bounds(
                self.position,
                delta.unsigned_abs(),
                size,
            )),
        }
    }

    /// Advances by `n` bytes.
    pub fn skip(&mut self, n: usize, size: usize) -> Result<()> {
        self.take(n, size).map(|_| ())
    }

    /// Advances to the next multiple of `alignment`. Does nothing if already aligned.
    pub fn align(&mut self, alignment: usize, size: usize) -> Result<()> {
        let padding = padding_for(self.position, alignment)?;
        self.skip(padding, size)
    }

    /// Claims the next `len` bytes, returning their range and advancing past them.
    #[inline(always)]
    pub fn take(&mut self, len: usize, size: usize) -> Result<Range<usize>> {
        let start = self.position;
        match start.checked_add(len) {
            Some(end) if end <= size => {
                self.position = end;
                Ok(start..end)
            }
            _ => Err(Error::out_of_bounds(start, len, size)),
        }
    }
}

/// Number of bytes needed to move `offset` up to a multiple of `alignment`.
pub(crate) fn padding_for(offset: usize, alignment: usize) -> Result<usize> {
    if alignment == 0 {
        return Err(Error::invalid_argument("alignment must be non-zero"));
    }
    Ok((alignment - offset % alignment) % alignment)
}

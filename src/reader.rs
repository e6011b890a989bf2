use alloc::borrow::Cow;
use alloc::string::String;

use crate::{Cursor, Error, Result};

/// Maximum number of bytes in an encoded varint. Ten groups of 7 bits cover 64 bits.
pub const MAX_VARINT_LEN: usize = 10;

/// Width of the unsigned length prefix in front of a length-prefixed string.
///
/// The prefix counts encoded UTF-8 bytes, not characters.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum LengthPrefix {
    /// 8-bit prefix, at most 255 bytes.
    U8,
    /// 16-bit prefix, at most 65535 bytes.
    U16,
    /// 32-bit prefix.
    U32,
}

impl LengthPrefix {
    /// Number of bytes the prefix itself occupies.
    pub fn width(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }

    /// Largest byte length the prefix can express.
    pub fn max_len(self) -> u64 {
        match self {
            Self::U8 => u8::MAX.into(),
            Self::U16 => u16::MAX.into(),
            Self::U32 => u32::MAX.into(),
        }
    }
}

/// Reads values from a slice of bytes, starting at a cursor position.
///
/// Fixed-size scalars are little-endian. Variable-length values (strings, varints) describe
/// their encoding on the method that decodes them.
///
/// The reader borrows its input and never modifies it. To read back a buffer you own, keep the
/// [`ByteBuffer`](crate::ByteBuffer) and use [`ByteBuffer::reader`](crate::ByteBuffer::reader).
///
/// Every `read_*` method checks bounds before interpreting any bytes and fails with
/// [`Error::OutOfBounds`] rather than producing a partial value. A failed read leaves the
/// position where it was before the call.
#[derive(Clone, Debug)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    cursor: Cursor,
}

impl<'a> BinaryReader<'a> {
    /// Constructor. The reader starts at position 0.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            cursor: Cursor::new(),
        }
    }

    /// Creates a reader starting at `position`, which must lie in `[0, data.len()]`.
    pub fn at(data: &'a [u8], position: usize) -> Result<Self> {
        Ok(Self {
            data,
            cursor: Cursor::at(position, data.len())?,
        })
    }

    /// Switches to reading `data`, from position 0.
    pub fn set_buffer(&mut self, data: &'a [u8]) {
        self.data = data;
        self.cursor = Cursor::new();
    }

    /// The whole input, regardless of position.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// The input that has not been read yet.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.cursor.position()..]
    }

    /// Size of the input in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the input is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if every byte has been read.
    pub fn is_at_end(&self) -> bool {
        self.cursor.position() == self.data.len()
    }

    /// Current position.
    pub fn tell(&self) -> usize {
        self.cursor.position()
    }

    /// Moves to the absolute position `pos`, which may equal the input size but not exceed it.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        self.cursor.seek(pos, self.data.len())
    }

    /// Moves by `delta` bytes. Fails if the result would fall before 0 or past the end.
    pub fn seek_by(&mut self, delta: isize) -> Result<()> {
        self.cursor.seek_by(delta, self.data.len())
    }

    /// Advances by `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.cursor.skip(n, self.data.len())
    }

    /// Advances to the next multiple of `alignment`.
    pub fn align(&mut self, alignment: usize) -> Result<()> {
        self.cursor.align(alignment, self.data.len())
    }

    /// Runs `f`, restoring the position if it fails.
    pub(crate) fn restoring<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let start = self.cursor;
        let result = f(self);
        if result.is_err() {
            self.cursor = start;
        }
        result
    }

    /// Reads a single `u8` value.
    #[inline(always)]
    pub fn read_u8(&mut self) -> Result<u8> {
        let [b] = self.read_cbytes()?;
        Ok(b)
    }

    /// Reads a slice of bytes whose length is `len`. This function returns a slice reference
    /// to the bytes; it does not copy them.
    #[inline(always)]
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let range = self.cursor.take(len, self.data.len())?;
        Ok(&self.data[range])
    }

    /// Reads a small array of bytes, with a constant length.
    #[inline(always)]
    pub fn read_cbytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let start = self.cursor.position();
        let bytes = self.read_bytes(N)?;
        <[u8; N]>::try_from(bytes).map_err(|_| Error::out_of_bounds(start, N, self.data.len()))
    }

    /// Reads a `u16` in little-endian byte order.
    #[inline(always)]
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_cbytes()?))
    }

    /// Reads a `u32` in little-endian byte order.
    #[inline(always)]
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_cbytes()?))
    }

    /// Reads a `u64` in little-endian byte order.
    #[inline(always)]
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_cbytes()?))
    }

    /// Reads a single `i8` value.
    #[inline(always)]
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(i8::from_le_bytes(self.read_cbytes()?))
    }

    /// Reads a `i16` in little-endian byte order.
    #[inline(always)]
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_cbytes()?))
    }

    /// Reads a `i32` in little-endian byte order.
    #[inline(always)]
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_cbytes()?))
    }

    /// Reads a `i64` in little-endian byte order.
    #[inline(always)]
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_cbytes()?))
    }

    /// Reads an `f32` from its 4-byte little-endian IEEE-754 representation.
    #[inline(always)]
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_cbytes()?))
    }

    /// Reads an `f64` from its 8-byte little-endian IEEE-754 representation.
    #[inline(always)]
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_cbytes()?))
    }

    /// Reads a `bool`. Any non-zero byte is `true`.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Reads an unsigned variable-length integer.
    ///
    /// Each byte carries 7 bits of the value, least-significant group first. The high bit of a
    /// byte is set if more bytes follow. Values up to `u64::MAX` are supported, which takes at
    /// most [`MAX_VARINT_LEN`] bytes. An encoding that continues past 64 bits, or whose 10th
    /// byte carries bits above the 64th, is [`Error::MalformedInput`].
    pub fn read_varint(&mut self) -> Result<u64> {
        const MORE: u8 = 0x80;
        // The 10th byte sits at shift 63 and may only hold bit 0.
        const LAST_SHIFT: u32 = 63;

        self.restoring(|r| {
            let start = r.tell();
            let mut shift: u32 = 0;
            let mut n: u64 = 0;

            loop {
                let b = r.read_u8()?;
                if shift == LAST_SHIFT && (b & 0x7e) != 0 {
                    return Err(Error::malformed(start, "varint exceeds u64"));
                }
                n |= u64::from(b & 0x7f) << shift;

                if (b & MORE) == 0 {
                    return Ok(n);
                }

                shift += 7;
                if shift >= 64 {
                    return Err(Error::malformed(start, "varint longer than 64 bits"));
                }
            }
        })
    }

    /// Reads `len` bytes and validates them as UTF-8.
    ///
    /// This does not copy any data. Invalid UTF-8 fails with [`Error::MalformedInput`] at the
    /// offset of the first invalid byte.
    pub fn read_str_of_size(&mut self, len: usize) -> Result<&'a str> {
        self.restoring(|r| {
            let start = r.tell();
            let bytes = r.read_bytes(len)?;
            core::str::from_utf8(bytes)
                .map_err(|e| Error::malformed(start + e.valid_up_to(), "invalid UTF-8"))
        })
    }

    /// Reads `len` bytes as UTF-8, replacing invalid sequences with U+FFFD.
    pub fn read_str_of_size_lossy(&mut self, len: usize) -> Result<Cow<'a, str>> {
        Ok(String::from_utf8_lossy(self.read_bytes(len)?))
    }

    /// Reads an unsigned length of the given prefix width.
    pub fn read_length(&mut self, prefix: LengthPrefix) -> Result<usize> {
        self.restoring(|r| {
            let start = r.tell();
            let len = match prefix {
                LengthPrefix::U8 => u32::from(r.read_u8()?),
                LengthPrefix::U16 => u32::from(r.read_u16()?),
                LengthPrefix::U32 => r.read_u32()?,
            };
            usize::try_from(len).map_err(|_| Error::malformed(start, "length exceeds usize"))
        })
    }

    /// Reads a length-prefixed span of bytes.
    ///
    /// This does not copy any data. It reads the prefixed length, locates the contents, then
    /// returns them as a `&[u8]`. The caller must handle validating that the contents are
    /// well-formed UTF-8, if necessary.
    pub fn read_prefixed_bytes(&mut self, prefix: LengthPrefix) -> Result<&'a [u8]> {
        self.restoring(|r| {
            let len = r.read_length(prefix)?;
            r.read_bytes(len)
        })
    }

    /// Reads a length-prefixed UTF-8 string and returns it as `&str`.
    ///
    /// The encoded stream does not record the prefix width, so the caller must request the
    /// same width that was written.
    pub fn read_prefixed_str(&mut self, prefix: LengthPrefix) -> Result<&'a str> {
        self.restoring(|r| {
            let len = r.read_length(prefix)?;
            r.read_str_of_size(len)
        })
    }

    /// Reads a length-prefixed UTF-8 string, replacing invalid sequences with U+FFFD.
    pub fn read_prefixed_str_lossy(&mut self, prefix: LengthPrefix) -> Result<Cow<'a, str>> {
        Ok(String::from_utf8_lossy(self.read_prefixed_bytes(prefix)?))
    }

    /// Reads a length-prefixed string and returns it as a `bstr::BStr`, without validating it.
    #[cfg(feature = "bstr")]
    pub fn read_prefixed_bstr(&mut self, prefix: LengthPrefix) -> Result<&'a bstr::BStr> {
        Ok(bstr::BStr::new(self.read_prefixed_bytes(prefix)?))
    }

    /// Reads a UTF-8 string with an 8-bit byte-length prefix.
    pub fn read_str_u8(&mut self) -> Result<&'a str> {
        self.read_prefixed_str(LengthPrefix::U8)
    }

    /// Reads a UTF-8 string with a 16-bit byte-length prefix.
    pub fn read_str_u16(&mut self) -> Result<&'a str> {
        self.read_prefixed_str(LengthPrefix::U16)
    }

    /// Reads a UTF-8 string with a 32-bit byte-length prefix.
    pub fn read_str_u32(&mut self) -> Result<&'a str> {
        self.read_prefixed_str(LengthPrefix::U32)
    }

    /// Reads a UTF-8 string with the default 32-bit byte-length prefix.
    pub fn read_str(&mut self) -> Result<&'a str> {
        self.read_str_u32()
    }

    /// Reads the bytes of a null-terminated string, without the terminator.
    ///
    /// Fails with [`Error::MalformedInput`] if no `0x00` byte occurs before the end of the
    /// input. On success the position moves past the terminator.
    pub fn read_cstr_bytes(&mut self) -> Result<&'a [u8]> {
        let start = self.tell();
        let rest = self.remaining();
        let Some(len) = rest.iter().position(|&b| b == 0) else {
            return Err(Error::malformed(start, "string is not null-terminated"));
        };
        self.skip(len + 1)?;
        Ok(&rest[..len])
    }

    /// Reads a null-terminated UTF-8 string.
    pub fn read_cstr(&mut self) -> Result<&'a str> {
        self.restoring(|r| {
            let start = r.tell();
            let bytes = r.read_cstr_bytes()?;
            core::str::from_utf8(bytes)
                .map_err(|e| Error::malformed(start + e.valid_up_to(), "invalid UTF-8"))
        })
    }

    /// Reads a null-terminated string, replacing invalid UTF-8 sequences with U+FFFD.
    pub fn read_cstr_lossy(&mut self) -> Result<Cow<'a, str>> {
        Ok(String::from_utf8_lossy(self.read_cstr_bytes()?))
    }
}

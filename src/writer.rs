use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

use zerocopy::byteorder::{F32, F64, I16, I32, I64, LE, U16, U32, U64};
use zerocopy::{Immutable, IntoBytes};

use crate::cursor::padding_for;
use crate::{ByteBuffer, Error, LengthPrefix, Result};

/// Encodes values by appending them to an owned [`ByteBuffer`].
///
/// The writer is append-only: its position is always the size of the buffer. Fixed-size
/// scalars are written in little-endian byte order, and the buffer grows as needed.
#[derive(Clone, Debug, Default)]
pub struct BinaryWriter {
    buf: ByteBuffer,
}

impl BinaryWriter {
    /// Creates a new `BinaryWriter` over an empty buffer.
    pub fn new() -> Self {
        Self {
            buf: ByteBuffer::new(),
        }
    }

    /// Creates a new `BinaryWriter` with the given initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: ByteBuffer::with_capacity(capacity),
        }
    }

    /// Continues writing at the end of an existing buffer.
    pub fn wrap(buf: ByteBuffer) -> Self {
        Self { buf }
    }

    /// Accesses the inner buffer.
    pub fn buffer(&self) -> &ByteBuffer {
        &self.buf
    }

    /// Extracts the inner buffer.
    pub fn into_inner(self) -> ByteBuffer {
        self.buf
    }

    /// Extracts the written bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.buf.into_vec()
    }

    /// The bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_slice()
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Writes `bytes` to the output.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.append(bytes);
    }

    /// Writes a small, fixed-size array of bytes.
    pub fn write_cbytes<const N: usize>(&mut self, value: [u8; N]) {
        self.write_bytes(&value)
    }

    fn write_le<T: IntoBytes + Immutable>(&mut self, value: T) {
        self.write_bytes(value.as_bytes())
    }

    /// Writes a single `u8` value
    pub fn write_u8(&mut self, value: u8) {
        self.write_bytes(&[value])
    }

    /// Writes a single `i8` value
    pub fn write_i8(&mut self, value: i8) {
        self.write_bytes(&[value as u8])
    }

    /// Writes a single `u16` value
    pub fn write_u16(&mut self, value: u16) {
        self.write_le(U16::<LE>::new(value))
    }

    /// Writes a single `u32` value
    pub fn write_u32(&mut self, value: u32) {
        self.write_le(U32::<LE>::new(value))
    }

    /// Writes a single `u64` value
    pub fn write_u64(&mut self, value: u64) {
        self.write_le(U64::<LE>::new(value))
    }

    /// Writes a single `i16` value
    pub fn write_i16(&mut self, value: i16) {
        self.write_le(I16::<LE>::new(value))
    }

    /// Writes a single `i32` value
    pub fn write_i32(&mut self, value: i32) {
        self.write_le(I32::<LE>::new(value))
    }

    /// Writes a single `i64` value
    pub fn write_i64(&mut self, value: i64) {
        self.write_le(I64::<LE>::new(value))
    }

    /// Writes an `f32` value. The value is encoded using its 4-byte little-endian in-memory
    /// representation.
    pub fn write_f32(&mut self, value: f32) {
        self.write_le(F32::<LE>::new(value))
    }

    /// Writes an `f64` value. The value is encoded using its 8-byte little-endian in-memory
    /// representation.
    pub fn write_f64(&mut self, value: f64) {
        self.write_le(F64::<LE>::new(value))
    }

    /// Writes a `bool` value. True is encoded as 1. False is encoded as 0.
    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(value as u8)
    }

    /// Encodes a `u64` value using the unsigned variable-length encoding read by
    /// [`BinaryReader::read_varint`](crate::BinaryReader::read_varint).
    ///
    /// `300` is encoded as `[0xac, 0x02]`.
    pub fn write_varint(&mut self, value: u64) {
        let mut n = value;
        loop {
            if n < 0x80 {
                self.write_u8(n as u8);
                break;
            }
            self.write_u8((n & 0x7f) as u8 | 0x80);
            n >>= 7;
        }
    }

    /// Writes exactly `size` bytes of the UTF-8 encoding of `s`.
    ///
    /// Longer encodings are truncated, which may split a multi-byte character. Shorter ones are
    /// padded with zero bytes. No length is recorded.
    pub fn write_str_of_size(&mut self, s: &str, size: usize) -> Result<()> {
        let offset = self.buf.grow(size)?;
        let n = s.len().min(size);
        self.buf.as_mut_slice()[offset..offset + n].copy_from_slice(&s.as_bytes()[..n]);
        Ok(())
    }

    /// Writes `bytes` preceded by their length, using the given prefix width.
    ///
    /// Fails with [`Error::InvalidArgument`] if the length does not fit in the prefix. Nothing
    /// is written in that case.
    pub fn write_prefixed_bytes(&mut self, prefix: LengthPrefix, bytes: &[u8]) -> Result<()> {
        let too_long = || Error::invalid_argument("data too long for its length prefix");
        let len = u64::try_from(bytes.len()).map_err(|_| too_long())?;
        if len > prefix.max_len() {
            return Err(too_long());
        }
        match prefix {
            LengthPrefix::U8 => self.write_u8(len as u8),
            LengthPrefix::U16 => self.write_u16(len as u16),
            LengthPrefix::U32 => self.write_u32(len as u32),
        }
        self.write_bytes(bytes);
        Ok(())
    }

    /// Writes a UTF-8 string in length-prefixed form. The prefix holds the encoded byte count,
    /// not the number of characters.
    pub fn write_prefixed_str(&mut self, prefix: LengthPrefix, s: &str) -> Result<()> {
        self.write_prefixed_bytes(prefix, s.as_bytes())
    }

    /// Writes a UTF-8 string with an 8-bit byte-length prefix.
    pub fn write_str_u8(&mut self, s: &str) -> Result<()> {
        self.write_prefixed_str(LengthPrefix::U8, s)
    }

    /// Writes a UTF-8 string with a 16-bit byte-length prefix.
    pub fn write_str_u16(&mut self, s: &str) -> Result<()> {
        self.write_prefixed_str(LengthPrefix::U16, s)
    }

    /// Writes a UTF-8 string with a 32-bit byte-length prefix.
    pub fn write_str_u32(&mut self, s: &str) -> Result<()> {
        self.write_prefixed_str(LengthPrefix::U32, s)
    }

    /// Writes a UTF-8 string with the default 32-bit byte-length prefix.
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_str_u32(s)
    }

    /// Writes a UTF-8 string followed by a single `0x00` terminator.
    ///
    /// Fails with [`Error::MalformedInput`] if `s` contains a NUL character, since a reader
    /// would stop there. The offset in the error is where the NUL would have been written.
    pub fn write_cstr(&mut self, s: &str) -> Result<()> {
        if let Some(i) = s.bytes().position(|b| b == 0) {
            return Err(Error::malformed(
                self.len() + i,
                "embedded NUL in null-terminated string",
            ));
        }
        self.write_bytes(s.as_bytes());
        self.write_u8(0);
        Ok(())
    }

    /// Appends `fill` bytes until the length is a multiple of `alignment`.
    pub fn pad_to_alignment(&mut self, alignment: usize, fill: u8) -> Result<()> {
        let padding = padding_for(self.len(), alignment)?;
        let offset = self.buf.grow(padding)?;
        self.buf.as_mut_slice()[offset..].fill(fill);
        Ok(())
    }

    /// Appends `count` zero bytes.
    pub fn write_zeros(&mut self, count: usize) -> Result<()> {
        self.buf.grow(count).map(|_| ())
    }

    /// Appends the UTF-8 encoding of `s`, repeated `count` times.
    ///
    /// Fails with [`Error::InvalidArgument`] if the total length overflows `usize`. Nothing is
    /// written in that case.
    pub fn write_byte_repeated(&mut self, s: &str, count: usize) -> Result<()> {
        let total = s
            .len()
            .checked_mul(count)
            .ok_or(Error::invalid_argument("repeated data length overflows usize"))?;
        let offset = self.buf.grow(total)?;
        for chunk in self.buf.as_mut_slice()[offset..].chunks_exact_mut(s.len().max(1)) {
            chunk.copy_from_slice(s.as_bytes());
        }
        Ok(())
    }

    /// Renders the written bytes as space-separated hex pairs. See [`ByteBuffer::to_hex`].
    pub fn to_hex(&self) -> String {
        self.buf.to_hex()
    }

    /// Returns the written bytes as `&str`, if they are well-formed UTF-8.
    pub fn as_str(&self) -> Result<&str> {
        core::str::from_utf8(self.as_bytes())
            .map_err(|e| Error::malformed(e.valid_up_to(), "invalid UTF-8"))
    }

    /// Decodes the written bytes as UTF-8, replacing invalid sequences with U+FFFD.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }
}

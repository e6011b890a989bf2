use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::mem::size_of;
use core::ops::Range;

use zerocopy::{FromBytes, Immutable, IntoBytes};

use crate::{BinaryReader, Error, Result};

/// Smallest capacity allocated when an empty buffer first grows.
const MIN_GROWTH: usize = 16;

/// An owned, contiguous byte store with a logical size and an allocated capacity.
///
/// Bytes in `[0, len())` are the content of the buffer. Bytes in `[len(), capacity())` are
/// allocated but carry no meaning. The buffer never shrinks its capacity on its own.
///
/// Growth through [`grow`](Self::grow) (which [`BinaryWriter`](crate::BinaryWriter) uses for
/// every write) is geometric, so appending `n` bytes one at a time costs amortized `O(n)`.
/// [`reserve`](Self::reserve) and [`reallocate`](Self::reallocate) set the capacity exactly.
#[derive(Clone, Default)]
pub struct ByteBuffer {
    /// The allocated store. `bytes.len()` is the capacity.
    bytes: Vec<u8>,
    size: usize,
}

impl ByteBuffer {
    /// An empty buffer with no allocated store.
    pub const fn new() -> Self {
        Self {
            bytes: Vec::new(),
            size: 0,
        }
    }

    /// An empty buffer with a zeroed store of exactly `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buffer = Self::new();
        buffer.create(capacity);
        buffer
    }

    /// A buffer whose content is `bytes`. Size and capacity both equal `bytes.len()`.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        let size = bytes.len();
        Self { bytes, size }
    }

    /// Replaces the store with a zeroed one of exactly `capacity` bytes. The previous content
    /// is discarded and the size becomes 0.
    pub fn create(&mut self, capacity: usize) {
        self.bytes = vec![0; capacity];
        self.size = 0;
    }

    /// Logical size in bytes.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the buffer has no content.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Allocated length of the store.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// The content of the buffer.
    #[inline(always)]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.size]
    }

    /// The content of the buffer, mutably. The size cannot be changed through this slice.
    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes[..self.size]
    }

    /// Consumes the buffer, returning its content.
    pub fn into_vec(mut self) -> Vec<u8> {
        self.bytes.truncate(self.size);
        self.bytes
    }

    /// Sets the size to 0, keeping the store.
    pub fn clear(&mut self) {
        self.size = 0;
    }

    /// Grows the store to exactly `new_capacity` bytes if it is currently smaller. Every
    /// allocated byte is preserved, not just the content. Never shrinks.
    pub fn reserve(&mut self, new_capacity: usize) {
        if new_capacity > self.capacity() {
            self.bytes.resize(new_capacity, 0);
        }
    }

    /// Replaces the store with one of exactly `new_capacity` bytes, carrying over only the
    /// content. Can grow or shrink, but never below the current size.
    pub fn reallocate(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity < self.size {
            return Err(Error::invalid_argument(
                "reallocation would discard buffer content",
            ));
        }
        let mut bytes = vec![0; new_capacity];
        bytes[..self.size].copy_from_slice(self.as_slice());
        self.bytes = bytes;
        Ok(())
    }

    /// Extends the content by `additional` zero bytes and returns the offset of the first one.
    ///
    /// If the store is too small it is grown to at least twice its capacity. Fails with
    /// [`Error::InvalidArgument`] if the new size would overflow `usize`.
    pub fn grow(&mut self, additional: usize) -> Result<usize> {
        let needed = self
            .size
            .checked_add(additional)
            .ok_or(Error::invalid_argument("buffer size overflows usize"))?;
        Ok(self.grow_to(needed))
    }

    fn grow_to(&mut self, needed: usize) -> usize {
        let offset = self.size;
        if needed > self.capacity() {
            let doubled = self.capacity().saturating_mul(2);
            self.reserve(needed.max(doubled).max(MIN_GROWTH));
        }
        self.bytes[offset..needed].fill(0);
        self.size = needed;
        offset
    }

    /// Appends `data` to the content.
    pub fn append(&mut self, data: &[u8]) {
        // Both lengths describe live allocations, so their sum fits in `usize`.
        let offset = self.grow_to(self.size + data.len());
        self.bytes[offset..offset + data.len()].copy_from_slice(data);
    }

    fn span(&self, offset: usize, len: usize) -> Result<Range<usize>> {
        match offset.checked_add(len) {
            Some(end) if end <= self.size => Ok(offset..end),
            _ => Err(Error::out_of_bounds(offset, len, self.size)),
        }
    }

    /// Reads a value of type `T` from its in-memory representation at `offset`.
    ///
    /// Use the byte-order aware types of `zerocopy::byteorder` to read little-endian values,
    /// e.g. `buffer.get::<U32<LE>>(4)?.get()`.
    pub fn get<T: FromBytes>(&self, offset: usize) -> Result<T> {
        let range = self.span(offset, size_of::<T>())?;
        T::read_from_bytes(&self.bytes[range])
            .map_err(|_| Error::out_of_bounds(offset, size_of::<T>(), self.size))
    }

    /// Overwrites the bytes at `offset` with the in-memory representation of `value`. The
    /// bytes must already be part of the content.
    pub fn set<T: IntoBytes + Immutable>(&mut self, offset: usize, value: T) -> Result<()> {
        let range = self.span(offset, size_of::<T>())?;
        self.bytes[range].copy_from_slice(value.as_bytes());
        Ok(())
    }

    /// Returns a reader over the content, positioned at 0.
    pub fn reader(&self) -> BinaryReader<'_> {
        BinaryReader::new(self.as_slice())
    }

    /// Renders the content as lowercase hex pairs, each followed by a single space.
    ///
    /// `[0x1a, 0x2b]` renders as `"1a 2b "`.
    pub fn to_hex(&self) -> String {
        let digits = hex::encode(self.as_slice());
        let mut out = String::with_capacity(digits.len() / 2 * 3);
        for pair in digits.as_bytes().chunks(2) {
            out.extend(pair.iter().map(|&d| char::from(d)));
            out.push(' ');
        }
        out
    }

    /// Replaces the content with the bytes encoded by the hex text `text`.
    ///
    /// The text is first scrubbed with [`clean_hex`], so whitespace, a leading `0x` and any
    /// other non-hex characters are ignored. Fails with [`Error::MalformedInput`] if an odd
    /// number of hex digits remains; the buffer is left unchanged in that case.
    pub fn assign_hex(&mut self, text: &str) -> Result<()> {
        let digits = clean_hex(text);
        let bytes = hex::decode(&digits).map_err(|e| match e {
            hex::FromHexError::InvalidHexCharacter { index, .. } => {
                Error::malformed(index, "invalid hex digit")
            }
            _ => Error::malformed(digits.len(), "hex string has an odd number of digits"),
        })?;
        *self = Self::from_vec(bytes);
        Ok(())
    }

    /// Maps each content byte to the character with the same code point (`U+0000..=U+00FF`).
    ///
    /// This is Latin-1, not windows-1252: bytes `0x80..=0x9F` become C1 control characters.
    pub fn to_ascii(&self) -> String {
        self.as_slice().iter().map(|&b| char::from(b)).collect()
    }

    /// Replaces the content with the low 8 bits of each UTF-16 code unit of `text`.
    ///
    /// This is lossy for text outside `U+0000..=U+00FF`: higher code units are truncated, not
    /// rejected. It is intended only for legacy 8-bit payloads.
    pub fn assign_ascii(&mut self, text: &str) {
        let bytes = text.encode_utf16().map(|unit| unit as u8).collect();
        *self = Self::from_vec(bytes);
    }
}

/// Removes whitespace, then an optional leading `0x`/`0X`, then every character that is not a
/// hex digit.
pub fn clean_hex(text: &str) -> String {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let body = compact
        .strip_prefix("0x")
        .or_else(|| compact.strip_prefix("0X"))
        .unwrap_or(&compact);
    body.chars().filter(char::is_ascii_hexdigit).collect()
}

impl PartialEq for ByteBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for ByteBuffer {}

impl fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("size", &self.size)
            .field("capacity", &self.capacity())
            .field("hex", &self.to_hex().trim_end())
            .finish()
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_vec(bytes)
    }
}

impl From<&[u8]> for ByteBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self::from_vec(bytes.to_vec())
    }
}

impl From<ByteBuffer> for Vec<u8> {
    fn from(buffer: ByteBuffer) -> Self {
        buffer.into_vec()
    }
}

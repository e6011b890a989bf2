use core::fmt;

/// Result type used throughout this crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Error type for buffer, reader and writer operations.
///
/// Every error is raised at the point of violation. Errors that refer to a position in the
/// data carry that byte offset, so that a caller can report where decoding stopped.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Error {
    /// A seek, skip or read needed `len` bytes starting at `offset`, but the data only has
    /// `size` bytes.
    OutOfBounds {
        /// Position at which the access was attempted.
        offset: usize,
        /// Number of bytes the access needed. Zero for a seek.
        len: usize,
        /// Logical size of the data.
        size: usize,
    },

    /// The input is structurally invalid, e.g. a null-terminated string without its
    /// terminator, an odd number of hex digits or invalid UTF-8.
    MalformedInput {
        /// Offset of the offending byte (or hex digit, for hex text).
        offset: usize,
        /// What was wrong.
        reason: &'static str,
    },

    /// The caller passed an argument that cannot be honored, such as a zero alignment or a
    /// string too long for its length prefix.
    InvalidArgument {
        /// What was wrong.
        reason: &'static str,
    },
}

/// The category of an [`Error`], without its context.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum ErrorKind {
    /// See [`Error::OutOfBounds`].
    OutOfBounds,
    /// See [`Error::MalformedInput`].
    MalformedInput,
    /// See [`Error::InvalidArgument`].
    InvalidArgument,
}

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::OutOfBounds { .. } => ErrorKind::OutOfBounds,
            Self::MalformedInput { .. } => ErrorKind::MalformedInput,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
        }
    }

    /// Returns the byte offset at which the error occurred, if it refers to one.
    pub fn offset(&self) -> Option<usize> {
        match *self {
            Self::OutOfBounds { offset, .. } | Self::MalformedInput { offset, .. } => Some(offset),
            Self::InvalidArgument { .. } => None,
        }
    }

    pub(crate) fn out_of_bounds(offset: usize, len: usize, size: usize) -> Self {
        Self::OutOfBounds { offset, len, size }
    }

    pub(crate) fn malformed(offset: usize, reason: &'static str) -> Self {
        Self::MalformedInput { offset, reason }
    }

    pub(crate) fn invalid_argument(reason: &'static str) -> Self {
        Self::InvalidArgument { reason }
    }
}

impl core::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { offset, len, size } => write!(
                f,
                "out of bounds: {len} bytes at offset {offset} do not fit in {size} bytes"
            ),
            Self::MalformedInput { offset, reason } => {
                write!(f, "malformed input at offset {offset}: {reason}")
            }
            Self::InvalidArgument { reason } => write!(f, "invalid argument: {reason}"),
        }
    }
}

//! A growable byte buffer with cursor-based readers and append-only writers.
//!
//! All multi-byte values use little-endian byte order. The wire format is schema-free: nothing
//! records which types were written, so a reader must request the same sequence of types that
//! the writer produced.
//!
//! Supported encodings:
//! * fixed-width integers and IEEE-754 floats
//! * unsigned base-128 variable-length integers (least-significant group first)
//! * UTF-8 strings, either fixed-size, length-prefixed (8, 16 or 32 bit byte count) or
//!   null-terminated
//! * vectors, colors and poses built from the scalar encodings
//! * hex and raw 8-bit text views of a buffer

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]
#![forbid(unused_must_use)]
#![warn(missing_docs)]

extern crate alloc;

mod buffer;
mod composite;
mod cursor;
mod error;
mod reader;
mod writer;


pub use buffer::{clean_hex, ByteBuffer};
pub use composite::{Color3, Color4, Component, Pose, Vector2, Vector3, Vector4};
pub use cursor::Cursor;
pub use error::{Error, ErrorKind, Result};
pub use reader::{BinaryReader, LengthPrefix, MAX_VARINT_LEN};
pub use writer::BinaryWriter;

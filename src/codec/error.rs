//! Error types for shape stream and file decoding.

use std::io;

use thiserror::Error;

use crate::domain::ShapeParseError;

/// Errors that can occur while reading or writing shape streams.
#[derive(Debug, Error)]
pub enum CodecError {
    /// An I/O error occurred, including input that ended early.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The data does not start with the shape file magic number.
    #[error("Invalid shape file: wrong magic number")]
    InvalidMagic,

    /// The shape file was written by a newer format version.
    #[error("Unsupported shape file version: {0}")]
    UnsupportedVersion(u32),

    /// A string length prefix that cannot hold UTF-16 code units.
    #[error("String byte length {0} is not a multiple of two")]
    OddStringLength(u32),

    #[error("Invalid UTF-16 string in stream")]
    InvalidUtf16,

    #[error("Invalid type name in stream")]
    InvalidTypeName,

    /// A shape label that names no known shape kind.
    #[error(transparent)]
    Shape(#[from] ShapeParseError),

    /// A color stored in a spec other than RGB (HSV, CMYK, HSL, extended RGB).
    #[error("Unsupported color spec: {0}")]
    UnsupportedColorSpec(i8),

    /// A variant carries a type name nobody registered.
    #[error("Unknown type name: {0}")]
    UnknownTypeName(String),

    /// A dynamic value holds a different type than requested.
    #[error("Expected {expected}, found {found}")]
    UnexpectedType {
        expected: &'static str,
        found: &'static str,
    },

    /// A variant stored with a builtin type id instead of a user type.
    #[error("Unsupported variant type id: {0}")]
    UnsupportedVariantType(u32),
}

pub type CodecResult<T> = Result<T, CodecError>;

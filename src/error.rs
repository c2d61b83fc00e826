//! Error types for exif-io

use std::io;

/// Result type for exif-io operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading, writing, or splicing metadata
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A structural assumption about the container was violated
    #[error("Malformed container at offset {offset}: {reason}")]
    MalformedContainer { offset: usize, reason: String },

    /// Serialized EXIF exceeds the 16-bit segment length budget
    #[error("EXIF too large: {size} bytes (max: {max})")]
    ExifTooLarge { size: usize, max: usize },

    /// Integer packing given a value outside the target byte width
    #[error("Value {value} does not fit in {width} bytes")]
    Overflow { value: i64, width: usize },

    /// Operation requested on a container type with no defined rule
    #[error("Unsupported container format")]
    UnsupportedFormat,
}

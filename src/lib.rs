//! EXIF parsing, synthesis, and container surgery for image byte buffers.
//!
//! This crate is the binary metadata core of a batch image pipeline:
//! it classifies a file by magic bytes, reads embedded EXIF capture-time
//! data and image dimensions, serializes a minimal two-level TIFF/EXIF
//! directory from a structured record, and splices or strips metadata
//! chunks inside JPEG, PNG, and WebP containers without touching the image
//! payload. Decoding, resizing, and UI concerns live outside; the only
//! boundary is byte-buffer in, byte-buffer/record out.
//!
//! # Design principles
//!
//! - **Untrusted input degrades, trusted output raises**: the reader treats
//!   every offset in a file as hostile and falls back to absent fields; the
//!   writer and surgeon raise on structural violations, because this
//!   pipeline is the sole producer of the buffers they receive.
//! - **No in-place mutation**: every operation borrows its input and
//!   returns a freshly assembled buffer.
//! - **Exhaustive dispatch**: per-format behavior hangs off a closed
//!   [`ContainerFormat`] enum, one handler per variant.
//!
//! # Quick start
//!
//! ```
//! use exif_io::{read_metadata, strip_metadata, embed_metadata, MetadataRecord};
//!
//! # fn main() -> exif_io::Result<()> {
//! # let file_bytes: Vec<u8> = exif_io::test_fixtures::jpeg_with_metadata();
//! // Classify and read what the file already carries
//! let meta = read_metadata(&file_bytes);
//!
//! // Drop every metadata segment the container holds
//! let clean = strip_metadata(meta.format, &file_bytes)?
//!     .expect("jpeg has a stripping rule");
//!
//! // Write back a fresh record
//! let record = MetadataRecord::new()
//!     .with_artist("A. Photographer")
//!     .with_copyright("CC BY 4.0");
//! let tagged = embed_metadata(meta.format, &clean, &record)?;
//! # assert!(tagged.len() > clean.len());
//! # Ok(())
//! # }
//! ```

mod container;
mod error;
mod metadata;
mod reader;
mod tiff;
mod writer;

pub mod batch;
pub mod codec;
pub mod formats;

pub use container::ContainerFormat;
pub use error::{Error, Result};
pub use formats::{insert_exif, strip_metadata};
pub use metadata::{ExifDateTime, ExifRecord, MetadataRecord};
pub use reader::{read_metadata, ImageMetadata, READ_PREFIX_LIMIT};
pub use tiff::parse_exif;
pub use writer::{serialize_exif, MAX_EXIF_SIZE};

// Test fixtures - only compiled for tests or when explicitly enabled
#[cfg(any(test, feature = "test-utils"))]
pub mod test_fixtures;

/// Serialize a metadata record and splice it into a metadata-free image.
///
/// An all-absent record produces no EXIF block and the image is returned
/// unchanged, as are formats the surgeon does not mutate.
pub fn embed_metadata(
    format: ContainerFormat,
    data: &[u8],
    record: &MetadataRecord,
) -> Result<Vec<u8>> {
    match serialize_exif(record)? {
        Some(exif) => insert_exif(format, data, &exif),
        None => Ok(data.to_vec()),
    }
}

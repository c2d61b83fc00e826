//! Format-specific container surgery
//!
//! One handler module per mutated container type, dispatched through a
//! single exhaustive match over [`ContainerFormat`]. Adding a format means
//! adding a variant and a handler arm, not nesting conditionals.

use crate::container::ContainerFormat;
use crate::error::Result;

pub mod jpeg;
pub mod png;
pub mod webp;

/// Splice a serialized EXIF buffer into a metadata-free image.
///
/// Only JPEG and PNG blobs are mutated. WebP insertion is not wired up
/// (the chunk belongs after the image data), and every other format passes
/// through unchanged — a no-op, not an error.
pub fn insert_exif(format: ContainerFormat, data: &[u8], exif: &[u8]) -> Result<Vec<u8>> {
    match format {
        ContainerFormat::Jpeg => jpeg::insert_exif(data, exif),
        ContainerFormat::Png => png::insert_exif(data, exif),
        ContainerFormat::Webp
        | ContainerFormat::Gif
        | ContainerFormat::Tiff
        | ContainerFormat::Bmp
        | ContainerFormat::Ico
        | ContainerFormat::Avif
        | ContainerFormat::Unknown => Ok(data.to_vec()),
    }
}

/// Strip metadata-carrying segments/chunks from a raw file.
///
/// Returns `Ok(None)` for formats with no stripping rule defined.
pub fn strip_metadata(format: ContainerFormat, data: &[u8]) -> Result<Option<Vec<u8>>> {
    match format {
        ContainerFormat::Jpeg => jpeg::strip(data).map(Some),
        ContainerFormat::Png => png::strip(data).map(Some),
        ContainerFormat::Webp => webp::strip(data).map(Some),
        ContainerFormat::Gif
        | ContainerFormat::Tiff
        | ContainerFormat::Bmp
        | ContainerFormat::Ico
        | ContainerFormat::Avif
        | ContainerFormat::Unknown => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_noop_for_unhandled_formats() {
        let data = b"GIF89a...".to_vec();
        let out = insert_exif(ContainerFormat::Gif, &data, &[0x01, 0x02]).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn strip_undefined_for_unhandled_formats() {
        assert!(strip_metadata(ContainerFormat::Bmp, b"BM\x00\x00")
            .unwrap()
            .is_none());
        assert!(strip_metadata(ContainerFormat::Unknown, b"")
            .unwrap()
            .is_none());
    }
}

//! Metadata reader
//!
//! Classifies a raw file buffer by magic bytes, then walks the container's
//! structural records for the first embedded EXIF block and the
//! dimension-bearing segment. Only a bounded prefix of the file is
//! consulted; metadata that some PNG/WebP producers place at end-of-file is
//! not found (documented limitation, not a defect).
//!
//! All input is untrusted: malformed lengths and offsets degrade to absent
//! fields, never to a panic or an out-of-range read.

use crate::codec::{region_equals, unpack_uint, Endian};
use crate::container::ContainerFormat;
use crate::metadata::ExifRecord;
use crate::tiff;
use log::debug;

/// The reader looks at most this far into the file.
pub const READ_PREFIX_LIMIT: usize = 80 * 1024;

/// What the reader recovered from a file prefix
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImageMetadata {
    pub format: ContainerFormat,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Present only when a well-formed DateTimeOriginal was found
    pub exif: Option<ExifRecord>,
}

/// Read container type, dimensions, and capture-time EXIF from a raw file
/// buffer.
pub fn read_metadata(bytes: &[u8]) -> ImageMetadata {
    let bytes = &bytes[..bytes.len().min(READ_PREFIX_LIMIT)];
    let mut meta = ImageMetadata {
        format: ContainerFormat::detect(bytes),
        ..Default::default()
    };

    match meta.format {
        ContainerFormat::Jpeg => scan_jpeg(bytes, &mut meta),
        ContainerFormat::Png => scan_png(bytes, &mut meta),
        ContainerFormat::Webp => scan_webp(bytes, &mut meta),
        _ => {}
    }

    debug!(
        "read_metadata: {:?} {:?}x{:?} exif date: {}",
        meta.format,
        meta.width,
        meta.height,
        meta.exif.is_some()
    );
    meta
}

/// Marker-by-marker walk. SOF0 carries the frame dimensions; an APP1
/// segment with the `Exif\0\0` signature carries the TIFF directory.
fn scan_jpeg(bytes: &[u8], meta: &mut ImageMetadata) {
    let mut i = 0;
    while i < bytes.len() {
        while bytes.get(i) == Some(&0xFF) {
            i += 1;
        }
        let marker = match bytes.get(i) {
            Some(&m) => m,
            None => break,
        };
        i += 1;
        match marker {
            0xD0..=0xD7 | 0xD8 | 0x01 | 0x00 => continue, // RST, SOI, TEM, escaped 0xFF
            0xD9 => break,                                // EOI
            _ => {}
        }
        let len = match unpack_uint(bytes, i, 2, Endian::Big) {
            Some(len) => len as usize,
            None => break,
        };
        if len < 2 {
            break;
        }
        i += 2;

        if marker == 0xE1 && region_equals(bytes, i, 6, Endian::Big, b"Exif\0\0") {
            if let Some(tiff_bytes) = bytes.get(i + 6..) {
                meta.exif = tiff::parse_exif(tiff_bytes)
                    .map(|record| record.exif)
                    .filter(|exif| exif.date_time_original.is_some());
            }
        }
        if marker == 0xC0 {
            // SOF0: precision (1), height (2), width (2)
            meta.height = unpack_uint(bytes, i + 1, 2, Endian::Big).map(|v| v as u32);
            meta.width = unpack_uint(bytes, i + 3, 2, Endian::Big).map(|v| v as u32);
            break;
        }
        i += len - 2;
    }
}

/// IHDR sits at a fixed offset right after the signature; its first two
/// fields are width and height. EXIF chunks are commonly written after
/// IDAT, outside the prefix this reader consults.
fn scan_png(bytes: &[u8], meta: &mut ImageMetadata) {
    meta.width = unpack_uint(bytes, 16, 4, Endian::Big).map(|v| v as u32);
    meta.height = unpack_uint(bytes, 20, 4, Endian::Big).map(|v| v as u32);
}

/// RIFF sub-chunk walk from offset 12. The `VP8 ` lossy bitstream header
/// carries 14-bit width/height fields.
fn scan_webp(bytes: &[u8], meta: &mut ImageMetadata) {
    let mut i = 12;
    while i < bytes.len() {
        if region_equals(bytes, i, 4, Endian::Big, b"VP8 ") {
            meta.width = unpack_uint(bytes, i + 14, 2, Endian::Little).map(|v| (v & 0x3FFF) as u32);
            meta.height = unpack_uint(bytes, i + 16, 2, Endian::Little).map(|v| (v & 0x3FFF) as u32);
            break; // metadata chunks past the image data are not scanned
        }
        let size = match unpack_uint(bytes, i + 4, 4, Endian::Little) {
            Some(size) => size as usize,
            None => break,
        };
        i += 8 + size + (size & 1);
    }
}

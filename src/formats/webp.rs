//! WebP RIFF surgery
//!
//! Strip drops EXIF and XMP sub-chunks, clears their presence flags in
//! VP8X, and re-frames the RIFF header so its size field matches the new
//! total. Insertion is not wired up for WebP: the EXIF chunk belongs after
//! the image data and this pipeline's reader does not scan there either.

use crate::codec::{unpack_uint, Endian};
use crate::error::{Error, Result};
use byteorder::{LittleEndian, WriteBytesExt};

/// VP8X feature-flag bits for embedded EXIF and XMP
const VP8X_METADATA_FLAGS: u8 = 0x0C;

/// Remove EXIF/XMP sub-chunks and rewrite the RIFF framing.
pub fn strip(data: &[u8]) -> Result<Vec<u8>> {
    if !data.starts_with(b"RIFF") || data.get(8..12) != Some(b"WEBP") {
        return Err(Error::MalformedContainer {
            offset: 0,
            reason: "missing RIFF/WEBP header".into(),
        });
    }

    let mut body: Vec<u8> = Vec::with_capacity(data.len());
    let mut i = 12;
    while i < data.len() {
        let Some(chunk_type) = data.get(i..i + 4).and_then(|s| <[u8; 4]>::try_from(s).ok()) else {
            break;
        };
        let Some(size) = unpack_uint(data, i + 4, 4, Endian::Little) else {
            break;
        };
        let size = size as usize;
        let Some(chunk) = data.get(i..i + 8 + size) else {
            return Err(Error::MalformedContainer {
                offset: i,
                reason: "sub-chunk extends past end of file".into(),
            });
        };

        match &chunk_type {
            b"VP8X" => {
                if chunk.len() < 9 {
                    return Err(Error::MalformedContainer {
                        offset: i,
                        reason: "VP8X chunk has no flags byte".into(),
                    });
                }
                // keep the chunk, clear the EXIF and XMP presence bits
                body.extend_from_slice(&chunk[..8]);
                body.push(chunk[8] & !VP8X_METADATA_FLAGS);
                body.extend_from_slice(&chunk[9..]);
            }
            b"EXIF" | b"XMP " => {}
            _ => body.extend_from_slice(chunk),
        }
        if !matches!(&chunk_type, b"EXIF" | b"XMP ") && size % 2 == 1 {
            body.push(0); // sub-chunks are padded to even length
        }
        i += 8 + size + (size % 2);
    }

    let mut out = Vec::with_capacity(body.len() + 12);
    out.extend_from_slice(b"RIFF");
    // RIFF size field: everything after the 8-byte RIFF header
    out.write_u32::<LittleEndian>((body.len() + 4) as u32)?;
    out.extend_from_slice(b"WEBP");
    out.extend_from_slice(&body);
    Ok(out)
}

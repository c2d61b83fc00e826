//! JPEG marker-segment surgery
//!
//! Insert assumes the JFIF layout the rest of this pipeline produces:
//! SOI, optional APP0, then the first quantization table. Strip walks the
//! raw marker stream of an untrusted file and drops every metadata-bearing
//! segment while keeping the scan data byte-identical.

use crate::codec::{region_equals, unpack_uint, Endian};
use crate::error::{Error, Result};
use crate::writer::MAX_EXIF_SIZE;
use byteorder::{BigEndian, WriteBytesExt};

/// The first DQT marker must appear within this many leading bytes.
const DQT_SCAN_WINDOW: usize = 30;

/// Core JFIF APP0 payload length: identifier, version, units, densities,
/// zeroed thumbnail dimensions.
const JFIF_CORE_LEN: u16 = 16;

const EXIF_SIGNATURE: &[u8] = b"Exif\0\0";

/// Splice an APP1/EXIF segment immediately before the first DQT marker.
///
/// `data` is assumed to be metadata-free. Fails with
/// [`Error::MalformedContainer`] when no DQT marker appears in the leading
/// window, which means the blob did not come from this pipeline's encoder.
pub fn insert_exif(data: &[u8], exif: &[u8]) -> Result<Vec<u8>> {
    if exif.len() > MAX_EXIF_SIZE {
        return Err(Error::ExifTooLarge {
            size: exif.len(),
            max: MAX_EXIF_SIZE,
        });
    }

    let window = &data[..data.len().min(DQT_SCAN_WINDOW)];
    let dqt = (2..window.len().saturating_sub(1))
        .find(|&i| window[i] == 0xFF && window[i + 1] == 0xDB)
        .ok_or_else(|| Error::MalformedContainer {
            offset: 2,
            reason: "no DQT marker in the JFIF preamble".into(),
        })?;

    let mut out = Vec::with_capacity(data.len() + exif.len() + 10);
    out.extend_from_slice(&data[..dqt]); // SOI + JFIF APP0
    out.write_u16::<BigEndian>(0xFFE1)?;
    out.write_u16::<BigEndian>((exif.len() + 8) as u16)?;
    out.extend_from_slice(EXIF_SIGNATURE);
    out.extend_from_slice(exif);
    out.extend_from_slice(&data[dqt..]);
    Ok(out)
}

/// Remove metadata-carrying segments from a raw JPEG.
///
/// APP0/JFIF keeps its 14-byte core header with zeroed thumbnail dimensions
/// and a re-framed length; APP0/JFXX, APP1 (EXIF/XMP), APP13 (Photoshop),
/// and COM segments are dropped whole. The first marker outside that set
/// ends the walk and the remainder is copied verbatim.
pub fn strip(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;
    let mut span_start = 0;

    while i < data.len() {
        while data.get(i) == Some(&0xFF) {
            i += 1;
        }
        let marker = match data.get(i) {
            Some(&m) => m,
            None => break,
        };
        i += 1;
        match marker {
            0xD0..=0xD7 | 0xD8 | 0x01 | 0x00 => continue,
            0xD9 => break,
            _ => {}
        }
        let len = match unpack_uint(data, i, 2, Endian::Big) {
            Some(len) => len as usize,
            None => break,
        };
        if len < 2 {
            return Err(Error::MalformedContainer {
                offset: i,
                reason: format!("segment 0x{marker:02X} declares impossible length {len}"),
            });
        }
        i += 2;
        let segment_end = (i + len - 2).min(data.len());

        match marker {
            0xE0 if region_equals(data, i, 5, Endian::Big, b"JFIF\0") => {
                if data.len() < i + 12 {
                    return Err(Error::MalformedContainer {
                        offset: i,
                        reason: "truncated JFIF APP0 segment".into(),
                    });
                }
                // Keep the core header, zero the thumbnail dimensions, drop
                // any trailing JFXX-style thumbnail data, and re-frame the
                // declared length to match.
                out.extend_from_slice(&data[span_start..i - 4]);
                out.write_u16::<BigEndian>(0xFFE0)?;
                out.write_u16::<BigEndian>(JFIF_CORE_LEN)?;
                out.extend_from_slice(&data[i..i + 12]);
                out.extend_from_slice(&[0x00, 0x00]);
                span_start = segment_end;
            }
            0xE0 if region_equals(data, i, 5, Endian::Big, b"JFXX\0") => {
                out.extend_from_slice(&data[span_start..i - 4]);
                span_start = segment_end;
            }
            0xE1 | 0xED | 0xFE => {
                out.extend_from_slice(&data[span_start..i - 4]);
                span_start = segment_end;
            }
            _ => {
                // Start of entropy-coded data; everything from here on is
                // image payload.
                out.extend_from_slice(&data[span_start..]);
                return Ok(out);
            }
        }
        i = segment_end;
    }

    Ok(out)
}

//! PNG chunk surgery
//!
//! Insert places an `eXIf` chunk right after IHDR; strip keeps only the
//! structural allow-list. Chunk CRCs are computed with the restartable
//! CRC-32 so the type and payload hash as one sequence.

use crate::codec;
use crate::error::{Error, Result};
use byteorder::{BigEndian, WriteBytesExt};

pub(crate) const SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Signature plus the complete IHDR chunk
const HEADER_PREFIX: usize = 33;

/// Chunk types that survive stripping
const STRUCTURAL_CHUNKS: [&[u8; 4]; 14] = [
    b"IHDR", b"PLTE", b"IDAT", b"IEND", b"tRNS", b"gAMA", b"cHRM", b"sRGB", b"iCCP", b"sBIT",
    b"bKGD", b"hIST", b"pHYs", b"sPLT",
];

/// Insert an `eXIf` chunk immediately after IHDR.
///
/// `data` is assumed to be metadata-free; the new chunk lands before every
/// remaining original chunk.
pub fn insert_exif(data: &[u8], exif: &[u8]) -> Result<Vec<u8>> {
    if data.len() < HEADER_PREFIX || !data.starts_with(SIGNATURE) {
        return Err(Error::MalformedContainer {
            offset: 0,
            reason: "missing PNG signature or IHDR".into(),
        });
    }

    let mut out = Vec::with_capacity(data.len() + exif.len() + 12);
    out.extend_from_slice(&data[..HEADER_PREFIX]);
    out.write_u32::<BigEndian>(exif.len() as u32)?;
    out.extend_from_slice(b"eXIf");
    out.extend_from_slice(exif);
    let mut crc = codec::crc32_init();
    crc = codec::crc32_update(crc, b"eXIf");
    crc = codec::crc32_update(crc, exif);
    out.write_u32::<BigEndian>(codec::crc32_final(crc))?;
    out.extend_from_slice(&data[HEADER_PREFIX..]);
    Ok(out)
}

/// Copy the signature and every allow-listed chunk, stopping after IEND.
pub fn strip(data: &[u8]) -> Result<Vec<u8>> {
    if !data.starts_with(SIGNATURE) {
        return Err(Error::MalformedContainer {
            offset: 0,
            reason: "missing PNG signature".into(),
        });
    }

    let mut out = data[..8].to_vec();
    let mut i = 8;
    while i < data.len() {
        let Some(size) = codec::unpack_uint(data, i, 4, codec::Endian::Big) else {
            break;
        };
        let Some(chunk_type) = data.get(i + 4..i + 8) else {
            break;
        };
        let total = size as usize + 12; // length + type + payload + CRC
        let Some(chunk) = data.get(i..i + total) else {
            return Err(Error::MalformedContainer {
                offset: i,
                reason: "chunk extends past end of file".into(),
            });
        };
        if STRUCTURAL_CHUNKS.iter().any(|t| *t as &[u8] == chunk_type) {
            out.extend_from_slice(chunk);
        }
        if chunk_type == b"IEND" {
            break;
        }
        i += total;
    }
    Ok(out)
}

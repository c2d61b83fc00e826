//! Synthetic in-memory fixtures shared by unit and integration tests
//!
//! Minimal but structurally valid files: every declared length matches the
//! bytes actually present, so strip/insert arithmetic can be checked
//! byte-for-byte.

use crate::codec::crc32;
use byteorder::{BigEndian, ByteOrder};

/// Complete JFIF APP0 segment: marker, length 16, core header, zeroed
/// thumbnail dimensions.
pub const JFIF_APP0: [u8; 18] = [
    0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00, 0x01, 0x00,
    0x01, 0x00, 0x00,
];

/// DQT, SOF0, SOS, and fake scan data: the part of a JPEG the surgeon never
/// touches.
fn jpeg_tail() -> Vec<u8> {
    let mut tail = Vec::new();
    // DQT with a 4-byte fake table
    tail.extend_from_slice(&[0xFF, 0xDB, 0x00, 0x06, 0x00, 0x11, 0x22, 0x33]);
    // SOF0: 8-bit, 2x2, one component
    tail.extend_from_slice(&[
        0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x00, 0x02, 0x00, 0x02, 0x01, 0x01, 0x11, 0x00,
    ]);
    // SOS + entropy-coded bytes (no 0xFF sequences) + EOI
    tail.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
    tail.extend_from_slice(&[0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC]);
    tail.extend_from_slice(&[0xFF, 0xD9]);
    tail
}

/// SOI + JFIF APP0 + image data, no metadata segments
pub fn plain_jpeg() -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];
    data.extend_from_slice(&JFIF_APP0);
    data.extend_from_slice(&jpeg_tail());
    data
}

fn jpeg_segment(marker: u8, payload: &[u8]) -> Vec<u8> {
    let mut segment = vec![0xFF, marker];
    segment.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    segment.extend_from_slice(payload);
    segment
}

/// Like [`plain_jpeg`] but carrying APP1/EXIF, APP13, and COM segments
pub fn jpeg_with_metadata() -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];
    data.extend_from_slice(&JFIF_APP0);

    let mut exif_payload = b"Exif\0\0".to_vec();
    exif_payload.extend_from_slice(b"MM\x00\x2A\x00\x00\x00\x08\x00\x01\x00\x00\x00\x00");
    data.extend_from_slice(&jpeg_segment(0xE1, &exif_payload));
    data.extend_from_slice(&jpeg_segment(0xED, b"Photoshop 3.0\0"));
    data.extend_from_slice(&jpeg_segment(0xFE, b"a comment"));

    data.extend_from_slice(&jpeg_tail());
    data
}

/// Frame a PNG chunk: length, type, payload, CRC over type then payload.
pub fn png_chunk(chunk_type: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut chunk = Vec::with_capacity(payload.len() + 12);
    chunk.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    chunk.extend_from_slice(chunk_type);
    chunk.extend_from_slice(payload);
    let mut covered = chunk_type.to_vec();
    covered.extend_from_slice(payload);
    chunk.extend_from_slice(&crc32(&covered).to_be_bytes());
    chunk
}

fn ihdr_payload(width: u32, height: u32) -> [u8; 13] {
    let mut payload = [0u8; 13];
    BigEndian::write_u32(&mut payload[0..4], width);
    BigEndian::write_u32(&mut payload[4..8], height);
    payload[8] = 8; // bit depth
    payload[9] = 6; // color type RGBA
    payload
}

/// Signature + IHDR + one IDAT + IEND, no ancillary chunks
pub fn plain_png() -> Vec<u8> {
    let mut data = b"\x89PNG\r\n\x1a\n".to_vec();
    data.extend_from_slice(&png_chunk(b"IHDR", &ihdr_payload(2, 2)));
    data.extend_from_slice(&png_chunk(b"IDAT", &[0x78, 0x9C, 0x01, 0x02]));
    data.extend_from_slice(&png_chunk(b"IEND", &[]));
    data
}

/// Like [`plain_png`] but with a tEXt chunk between IHDR and IDAT
pub fn png_with_text_chunk() -> Vec<u8> {
    let mut data = b"\x89PNG\r\n\x1a\n".to_vec();
    data.extend_from_slice(&png_chunk(b"IHDR", &ihdr_payload(2, 2)));
    data.extend_from_slice(&png_chunk(b"tEXt", b"Comment\0scrub me"));
    data.extend_from_slice(&png_chunk(b"IDAT", &[0x78, 0x9C, 0x01, 0x02]));
    data.extend_from_slice(&png_chunk(b"IEND", &[]));
    data
}

fn riff_chunk(chunk_type: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut chunk = chunk_type.to_vec();
    chunk.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    chunk.extend_from_slice(payload);
    if payload.len() % 2 == 1 {
        chunk.push(0);
    }
    chunk
}

/// VP8X WebP with EXIF and XMP presence flags set and both chunks present
pub fn webp_with_metadata() -> Vec<u8> {
    let mut body = Vec::new();
    // VP8X: flags (EXIF 0x08 | XMP 0x04 | alpha 0x10), reserved, 2x2 canvas
    body.extend_from_slice(&riff_chunk(
        b"VP8X",
        &[0x1C, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00],
    ));
    body.extend_from_slice(&riff_chunk(b"VP8 ", &[0x00, 0x01, 0x02, 0x03, 0x04, 0x05]));
    body.extend_from_slice(&riff_chunk(b"EXIF", b"MM\x00\x2A\x00\x00\x00\x08"));
    body.extend_from_slice(&riff_chunk(b"XMP ", b"<x:xmpmeta/>\n"));

    let mut data = b"RIFF".to_vec();
    data.extend_from_slice(&((body.len() + 4) as u32).to_le_bytes());
    data.extend_from_slice(b"WEBP");
    data.extend_from_slice(&body);
    data
}

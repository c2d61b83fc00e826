//! Byte-level codec utilities
//!
//! The leaf layer of the crate: endianness-aware integer packing and
//! unpacking, byte-region comparison, and the PNG CRC-32. Everything here
//! operates on plain byte slices and is bounds-checked; the unpack functions
//! return `None` instead of reading past the end of a buffer.

use crate::error::{Error, Result};
use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Byte order for multi-byte integer fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

/// Pack an integer into `width` bytes (1..=8) in the requested byte order.
///
/// Negative signed values are encoded as two's complement. Returns
/// [`Error::Overflow`] when the value does not fit in `width` bytes given
/// the requested signedness.
pub fn pack_int(value: i64, width: usize, endian: Endian, signed: bool) -> Result<Vec<u8>> {
    assert!((1..=8).contains(&width), "width must be 1..=8");
    let bits = width as u32 * 8;
    let fits = if signed {
        bits == 64 || (value >= -(1i64 << (bits - 1)) && value < (1i64 << (bits - 1)))
    } else {
        value >= 0 && (bits == 64 || (value as u64) < (1u64 << bits))
    };
    if !fits {
        return Err(Error::Overflow { value, width });
    }

    let mask = if bits == 64 { u64::MAX } else { (1u64 << bits) - 1 };
    let raw = value as u64 & mask;
    let mut buf = vec![0u8; width];
    match endian {
        Endian::Big => BigEndian::write_uint(&mut buf, raw, width),
        Endian::Little => LittleEndian::write_uint(&mut buf, raw, width),
    }
    Ok(buf)
}

/// Unpack an unsigned integer of `width` bytes (1..=8) at `offset`.
///
/// Returns `None` if the region falls outside the buffer.
pub fn unpack_uint(buf: &[u8], offset: usize, width: usize, endian: Endian) -> Option<u64> {
    if width == 0 || width > 8 {
        return None;
    }
    let region = buf.get(offset..offset.checked_add(width)?)?;
    Some(match endian {
        Endian::Big => BigEndian::read_uint(region, width),
        Endian::Little => LittleEndian::read_uint(region, width),
    })
}

/// Unpack a signed integer, sign-extending the top bit of the region.
pub fn unpack_int(buf: &[u8], offset: usize, width: usize, endian: Endian) -> Option<i64> {
    if width == 0 || width > 8 {
        return None;
    }
    let region = buf.get(offset..offset.checked_add(width)?)?;
    Some(match endian {
        Endian::Big => BigEndian::read_int(region, width),
        Endian::Little => LittleEndian::read_int(region, width),
    })
}

/// Compare a byte region against a literal pattern, honoring byte order.
///
/// In little-endian mode the region is compared back to front, matching the
/// way multi-byte tag values are laid out in Intel-order TIFF data. Returns
/// `false` (never panics) when the region falls outside the buffer.
pub fn region_equals(buf: &[u8], offset: usize, len: usize, endian: Endian, expected: &[u8]) -> bool {
    if expected.len() < len {
        return false;
    }
    let Some(region) = offset.checked_add(len).and_then(|end| buf.get(offset..end)) else {
        return false;
    };
    match endian {
        Endian::Big => region == &expected[..len],
        Endian::Little => region.iter().rev().eq(expected[..len].iter()),
    }
}

const CRC_TABLE: [u32; 256] = build_crc_table();

const fn build_crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            c = if c & 1 != 0 { 0xEDB8_8320 ^ (c >> 1) } else { c >> 1 };
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

/// Start a new CRC-32 computation (PNG polynomial, reflected).
pub fn crc32_init() -> u32 {
    0xFFFF_FFFF
}

/// Feed bytes into a running CRC register.
///
/// The register can be threaded across calls so that a chunk type and its
/// payload hash as one sequence without concatenating them.
pub fn crc32_update(mut crc: u32, data: &[u8]) -> u32 {
    for &byte in data {
        crc = CRC_TABLE[((crc ^ byte as u32) & 0xFF) as usize] ^ (crc >> 8);
    }
    crc
}

/// Finalize a running CRC register.
pub fn crc32_final(crc: u32) -> u32 {
    crc ^ 0xFFFF_FFFF
}

/// One-shot CRC-32 of a byte slice.
pub fn crc32(data: &[u8]) -> u32 {
    crc32_final(crc32_update(crc32_init(), data))
}

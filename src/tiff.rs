//! Minimal TIFF/EXIF directory parser
//!
//! Decodes the two-level IFD0 → EXIF SubIFD structure this crate produces
//! and consumes: the three IFD0 strings (Artist, ImageDescription,
//! Copyright) and the three SubIFD capture-time tags. Both `II` and `MM`
//! byte orders are handled with uniform base-256 arithmetic.
//!
//! Input files are untrusted, so every computed offset is bounds-checked
//! before dereference and malformed data degrades to absent fields rather
//! than raising.
//!
//! TIFF structure:
//! - Header: byte order (II/MM), magic (0x002A), IFD0 offset
//! - IFD: entry count, entries (12 bytes each), next-IFD offset
//! - Entry: tag (2), format (2), component count (4), value/offset (4)

use crate::codec::{unpack_int, unpack_uint, Endian};
use crate::metadata::{ExifDateTime, ExifRecord, MetadataRecord};
use log::debug;

/// TIFF/EXIF tag IDs used by this crate
pub(crate) mod tag {
    pub const IMAGE_DESCRIPTION: u16 = 0x010E;
    pub const ARTIST: u16 = 0x013B;
    pub const COPYRIGHT: u16 = 0x8298;
    pub const EXIF_IFD_POINTER: u16 = 0x8769;
    pub const TIME_ZONE_OFFSET: u16 = 0x882A;
    pub const DATE_TIME_ORIGINAL: u16 = 0x9003;
    pub const SUB_SEC_TIME_ORIGINAL: u16 = 0x9291;
}

/// TIFF data format codes
pub(crate) mod kind {
    pub const SHORT: u16 = 1;
    pub const ASCII: u16 = 2;
    pub const LONG: u16 = 4;
}

/// Maximum number of entries accepted in one IFD (prevents DOS via a
/// fabricated entry count)
const MAX_IFD_ENTRIES: usize = 1000;

/// Length of a DateTimeOriginal payload, `YYYY:MM:DD HH:MM:SS`
const DATE_TIME_LEN: usize = 19;

struct Entry {
    tag: u16,
    count: u32,
    value_or_offset: u32,
    /// Offset of the 4-byte value area within the TIFF buffer
    value_pos: usize,
}

fn read_entry(data: &[u8], pos: usize, endian: Endian) -> Option<Entry> {
    Some(Entry {
        tag: unpack_uint(data, pos, 2, endian)? as u16,
        count: unpack_uint(data, pos + 4, 4, endian)? as u32,
        value_or_offset: unpack_uint(data, pos + 8, 4, endian)? as u32,
        value_pos: pos + 8,
    })
}

/// Number of entries declared at `pos`, corrected for the writer's
/// convention of counting the IFD1-link placeholder as an entry.
fn entry_count(data: &[u8], pos: usize, endian: Endian) -> Option<usize> {
    let declared = unpack_uint(data, pos, 2, endian)? as usize;
    let count = declared.checked_sub(1)?;
    if count > MAX_IFD_ENTRIES {
        return None;
    }
    Some(count)
}

/// Read an ASCII tag payload: inline in the value area when the component
/// count fits 4 bytes, otherwise out-of-line at an absolute offset.
fn read_ascii(data: &[u8], entry: &Entry) -> Option<String> {
    let len = entry.count as usize;
    if len == 0 {
        return None;
    }
    let bytes = if len <= 4 {
        data.get(entry.value_pos..entry.value_pos + len)?
    } else {
        let start = entry.value_or_offset as usize;
        data.get(start..start.checked_add(len)?)?
    };
    let text: Vec<u8> = bytes.iter().take_while(|&&b| b != 0).copied().collect();
    String::from_utf8(text).ok().filter(|s| !s.is_empty())
}

/// Parse an EXIF-in-TIFF buffer into a [`MetadataRecord`].
///
/// `data` must start at the TIFF header, i.e. after any `Exif\0\0`
/// signature. Returns `None` when the buffer is not a TIFF directory or
/// carries none of the modeled tags. A DateTimeOriginal that does not match
/// `YYYY:MM:DD HH:MM:SS` discards the whole capture-time record.
pub fn parse_exif(data: &[u8]) -> Option<MetadataRecord> {
    let endian = match data.get(0..2)? {
        b"II" => Endian::Little,
        b"MM" => Endian::Big,
        _ => return None,
    };
    if unpack_uint(data, 2, 2, endian)? != 0x002A {
        return None;
    }

    let ifd0 = unpack_uint(data, 4, 4, endian)? as usize;
    let count = entry_count(data, ifd0, endian)?;

    let mut record = MetadataRecord::default();
    let mut subifd = None;
    for i in 0..count {
        let Some(entry) = read_entry(data, ifd0 + 2 + 12 * i, endian) else {
            break;
        };
        match entry.tag {
            tag::ARTIST => record.artist = read_ascii(data, &entry),
            tag::IMAGE_DESCRIPTION => record.title = read_ascii(data, &entry),
            tag::COPYRIGHT => record.copyright = read_ascii(data, &entry),
            tag::EXIF_IFD_POINTER => subifd = Some(entry.value_or_offset as usize),
            _ => {}
        }
    }

    if let Some(pos) = subifd {
        record.exif = parse_sub_ifd(data, pos, endian).unwrap_or_default();
    }

    if record.artist.is_none()
        && record.title.is_none()
        && record.copyright.is_none()
        && record.exif.is_empty()
    {
        None
    } else {
        Some(record)
    }
}

/// Walk the EXIF SubIFD for the three capture-time tags, stopping early once
/// all are found.
fn parse_sub_ifd(data: &[u8], pos: usize, endian: Endian) -> Option<ExifRecord> {
    let count = entry_count(data, pos, endian)?;

    let mut date_ascii: Option<&[u8]> = None;
    let mut tz: Option<i16> = None;
    let mut subsec: Option<String> = None;

    for j in 0..count {
        let Some(entry) = read_entry(data, pos + 2 + 12 * j, endian) else {
            break;
        };
        match entry.tag {
            tag::DATE_TIME_ORIGINAL if date_ascii.is_none() => {
                let start = entry.value_or_offset as usize;
                date_ascii = data.get(start..start.checked_add(DATE_TIME_LEN)?);
            }
            tag::TIME_ZONE_OFFSET if tz.is_none() => {
                tz = unpack_int(data, entry.value_pos, 2, endian).map(|v| v as i16);
            }
            tag::SUB_SEC_TIME_ORIGINAL if subsec.is_none() => {
                subsec = read_ascii(data, &entry)
                    .map(|s| s.chars().take_while(char::is_ascii_digit).collect())
                    .filter(|s: &String| !s.is_empty());
            }
            _ => {}
        }
        if date_ascii.is_some() && tz.is_some() && subsec.is_some() {
            break;
        }
    }

    // A malformed or absent date discards the whole capture-time record.
    let mut date = ExifDateTime::from_ascii(date_ascii?)?;
    debug!("found exif date {}", date);
    if let Some(digits) = &subsec {
        date.set_subsec(digits);
    }
    date.utc_offset_minutes = tz;
    Some(ExifRecord {
        date_time_original: Some(date),
        time_zone_offset: tz,
        sub_sec_time_original: subsec,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_tiff() {
        assert!(parse_exif(b"").is_none());
        assert!(parse_exif(b"XX\x00\x2A\x00\x00\x00\x08").is_none());
        assert!(parse_exif(b"MM\x00\x2B\x00\x00\x00\x08").is_none());
    }

    #[test]
    fn rejects_out_of_range_ifd_offset() {
        // Header points IFD0 far past the end of the buffer.
        let data = b"MM\x00\x2A\x00\xFF\xFF\xFF";
        assert!(parse_exif(data).is_none());
    }

    #[test]
    fn rejects_fabricated_entry_count() {
        let mut data = b"MM\x00\x2A\x00\x00\x00\x08".to_vec();
        data.extend_from_slice(&0xFFFFu16.to_be_bytes());
        assert!(parse_exif(&data).is_none());
    }

    #[test]
    fn parses_little_endian_header() {
        // II header with an IFD0 declaring only the IFD1-link placeholder.
        let mut data = b"II\x2A\x00\x08\x00\x00\x00".to_vec();
        data.extend_from_slice(&1u16.to_le_bytes());
        data.extend_from_slice(&[0u8; 4]);
        // Structurally valid but carries no modeled tags.
        assert!(parse_exif(&data).is_none());
    }
}

//! EXIF serializer
//!
//! Turns a [`MetadataRecord`] into a minimal big-endian TIFF/EXIF buffer:
//! IFD0 with the three string tags, plus an EXIF SubIFD for the
//! capture-time tags when any are present. Layout is an explicit two-pass
//! algorithm: the first pass assigns out-of-line payload offsets, the second
//! emits bytes against that table. Offsets are absolute from the first byte
//! of the TIFF header, as EXIF requires.

use crate::codec::{pack_int, Endian};
use crate::error::{Error, Result};
use crate::metadata::MetadataRecord;
use crate::tiff::{kind, tag};
use byteorder::{BigEndian, WriteBytesExt};

/// Largest EXIF body that still fits a 16-bit APP1 segment length after the
/// 6-byte `Exif\0\0` signature
pub const MAX_EXIF_SIZE: usize = 65_535 - 6;

const TIFF_HEADER_LEN: usize = 8;
const ENTRY_LEN: usize = 12;
/// Entry count word + next-IFD terminator
const IFD_FIXED_LEN: usize = 2 + 4;

struct IfdEntry {
    tag: u16,
    format: u16,
    count: u32,
    payload: Vec<u8>,
}

impl IfdEntry {
    fn ascii(tag: u16, text: &str) -> IfdEntry {
        let payload: Vec<u8> = text.bytes().collect();
        IfdEntry {
            tag,
            format: kind::ASCII,
            count: payload.len() as u32,
            payload,
        }
    }

    fn sshort(tag: u16, value: i16) -> Result<IfdEntry> {
        Ok(IfdEntry {
            tag,
            format: kind::SHORT,
            count: 1,
            payload: pack_int(value as i64, 2, Endian::Big, true)?,
        })
    }

    fn inline(&self) -> bool {
        self.payload.len() <= 4
    }
}

/// Serialize a metadata record as an EXIF body (TIFF header onward, no
/// `Exif\0\0` signature).
///
/// Returns `Ok(None)` when every field is absent or empty: "no metadata" is
/// a valid outcome distinct from an empty EXIF block. Fails with
/// [`Error::ExifTooLarge`] before emitting anything if the result would
/// exceed [`MAX_EXIF_SIZE`].
pub fn serialize_exif(record: &MetadataRecord) -> Result<Option<Vec<u8>>> {
    if record.is_empty() {
        return Ok(None);
    }

    let present = |s: &Option<String>| s.clone().filter(|s| !s.is_empty());

    let mut ifd0 = Vec::new();
    if let Some(artist) = present(&record.artist) {
        ifd0.push(IfdEntry::ascii(tag::ARTIST, &artist));
    }
    if let Some(title) = present(&record.title) {
        ifd0.push(IfdEntry::ascii(tag::IMAGE_DESCRIPTION, &title));
    }
    if let Some(copyright) = present(&record.copyright) {
        ifd0.push(IfdEntry::ascii(tag::COPYRIGHT, &copyright));
    }

    let mut sub = Vec::new();
    if let Some(date) = &record.exif.date_time_original {
        let local = match record.exif.time_zone_offset {
            Some(tz) => date.shifted(tz),
            None => date.clone(),
        };
        sub.push(IfdEntry::ascii(tag::DATE_TIME_ORIGINAL, &local.to_string()));
    }
    if let Some(tz) = record.exif.time_zone_offset {
        sub.push(IfdEntry::sshort(tag::TIME_ZONE_OFFSET, tz)?);
    }
    if let Some(subsec) = present(&record.exif.sub_sec_time_original) {
        sub.push(IfdEntry::ascii(tag::SUB_SEC_TIME_ORIGINAL, &subsec));
    }

    if ifd0.is_empty() && sub.is_empty() {
        return Ok(None);
    }

    // Pass 1: layout. The SubIFD pointer entry counts toward IFD0's size.
    let ifd0_entries = ifd0.len() + usize::from(!sub.is_empty());
    let ifd0_data_start = TIFF_HEADER_LEN + IFD_FIXED_LEN + ifd0_entries * ENTRY_LEN;
    let (ifd0_offsets, sub_start) = layout(&ifd0, ifd0_data_start);

    let (sub_offsets, total) = if sub.is_empty() {
        (Vec::new(), sub_start)
    } else {
        layout(&sub, sub_start + IFD_FIXED_LEN + sub.len() * ENTRY_LEN)
    };

    if total > MAX_EXIF_SIZE {
        return Err(Error::ExifTooLarge {
            size: total,
            max: MAX_EXIF_SIZE,
        });
    }

    // Pass 2: emission against the offset tables.
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&[0x4D, 0x4D, 0x00, 0x2A]); // "MM", magic
    out.write_u32::<BigEndian>(TIFF_HEADER_LEN as u32)?; // IFD0 offset

    // The declared count includes one placeholder for the absent IFD1 link.
    out.write_u16::<BigEndian>((ifd0_entries + 1) as u16)?;
    for (entry, offset) in ifd0.iter().zip(&ifd0_offsets) {
        emit_entry(&mut out, entry, *offset)?;
    }
    if !sub.is_empty() {
        out.write_u16::<BigEndian>(tag::EXIF_IFD_POINTER)?;
        out.write_u16::<BigEndian>(kind::LONG)?;
        out.write_u32::<BigEndian>(1)?;
        out.write_u32::<BigEndian>(sub_start as u32)?;
    }
    out.write_u32::<BigEndian>(0)?; // next-IFD link, none
    for (entry, offset) in ifd0.iter().zip(&ifd0_offsets) {
        if offset.is_some() {
            out.extend_from_slice(&entry.payload);
        }
    }

    if !sub.is_empty() {
        out.write_u16::<BigEndian>((sub.len() + 1) as u16)?;
        for (entry, offset) in sub.iter().zip(&sub_offsets) {
            emit_entry(&mut out, entry, *offset)?;
        }
        out.write_u32::<BigEndian>(0)?;
        for (entry, offset) in sub.iter().zip(&sub_offsets) {
            if offset.is_some() {
                out.extend_from_slice(&entry.payload);
            }
        }
    }

    debug_assert_eq!(out.len(), total);
    Ok(Some(out))
}

/// Assign out-of-line payload offsets in insertion order, starting at
/// `data_start`. Inline payloads get `None`. Returns the offset table and
/// the end of the data area.
fn layout(entries: &[IfdEntry], data_start: usize) -> (Vec<Option<usize>>, usize) {
    let mut offsets = Vec::with_capacity(entries.len());
    let mut next = data_start;
    for entry in entries {
        if entry.inline() {
            offsets.push(None);
        } else {
            offsets.push(Some(next));
            next += entry.payload.len();
        }
    }
    (offsets, next)
}

fn emit_entry(out: &mut Vec<u8>, entry: &IfdEntry, offset: Option<usize>) -> Result<()> {
    out.write_u16::<BigEndian>(entry.tag)?;
    out.write_u16::<BigEndian>(entry.format)?;
    out.write_u32::<BigEndian>(entry.count)?;
    match offset {
        None => {
            out.extend_from_slice(&entry.payload);
            // inline values are right-padded with zero bytes
            out.resize(out.len() + 4 - entry.payload.len(), 0);
        }
        Some(offset) => out.write_u32::<BigEndian>(offset as u32)?,
    }
    Ok(())
}

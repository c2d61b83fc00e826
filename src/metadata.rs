//! Metadata data model
//!
//! [`MetadataRecord`] is the structured record exchanged with the outside
//! world: the three IFD0 strings plus the capture-time fields of
//! [`ExifRecord`]. Every field is independently optional; an all-absent
//! record serializes to "no EXIF block".

use std::fmt;

/// A capture timestamp as EXIF stores it: civil (wall-clock) fields plus a
/// millisecond subsecond part and an optional UTC offset in minutes.
///
/// The civil fields are local to `utc_offset_minutes` when that is known,
/// otherwise to whatever clock produced the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExifDateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Fractional milliseconds derived from SubSecTimeOriginal
    pub millisecond: u16,
    /// UTC offset in minutes, when the file carried a TimeZoneOffset tag
    pub utc_offset_minutes: Option<i16>,
}

impl ExifDateTime {
    /// Parse the 19-character EXIF form `YYYY:MM:DD HH:MM:SS`.
    ///
    /// Anything that does not match the pattern digit-for-digit yields
    /// `None`; partial dates are not reported.
    pub fn from_ascii(data: &[u8]) -> Option<ExifDateTime> {
        if data.len() < 19 {
            return None;
        }
        let data = &data[..19];
        for (i, &b) in data.iter().enumerate() {
            match i {
                4 | 7 => {
                    if b != b':' {
                        return None;
                    }
                }
                10 => {
                    if b != b' ' {
                        return None;
                    }
                }
                13 | 16 => {
                    if b != b':' {
                        return None;
                    }
                }
                _ => {
                    if !b.is_ascii_digit() {
                        return None;
                    }
                }
            }
        }
        Some(ExifDateTime {
            year: atou(&data[0..4]) as u16,
            month: atou(&data[5..7]) as u8,
            day: atou(&data[8..10]) as u8,
            hour: atou(&data[11..13]) as u8,
            minute: atou(&data[14..16]) as u8,
            second: atou(&data[17..19]) as u8,
            millisecond: 0,
            utc_offset_minutes: None,
        })
    }

    /// Interpret a SubSecTime-like digit string as a decimal fraction of a
    /// second, rounded down to milliseconds ("5" is 500 ms, "987654" is 987).
    pub fn set_subsec(&mut self, digits: &str) {
        let mut millis: u32 = 0;
        let mut ndigits = 0;
        for c in digits.chars().take_while(|c| c.is_ascii_digit()).take(3) {
            millis = millis * 10 + c.to_digit(10).unwrap_or(0);
            ndigits += 1;
        }
        for _ in ndigits..3 {
            millis *= 10;
        }
        self.millisecond = millis as u16;
    }

    /// Re-express this timestamp in the wall clock of `target` (a UTC offset
    /// in minutes).
    ///
    /// When the record's own offset is unknown the civil fields are taken to
    /// already be in the target zone and only the annotation changes.
    pub fn shifted(&self, target: i16) -> ExifDateTime {
        let delta = match self.utc_offset_minutes {
            Some(own) => target as i64 - own as i64,
            None => 0,
        };
        let total = days_from_civil(self.year as i64, self.month as i64, self.day as i64) * 86_400
            + self.hour as i64 * 3_600
            + self.minute as i64 * 60
            + self.second as i64
            + delta * 60;
        let (days, secs) = (total.div_euclid(86_400), total.rem_euclid(86_400));
        let (year, month, day) = civil_from_days(days);
        ExifDateTime {
            year: year as u16,
            month,
            day,
            hour: (secs / 3_600) as u8,
            minute: (secs % 3_600 / 60) as u8,
            second: (secs % 60) as u8,
            millisecond: self.millisecond,
            utc_offset_minutes: Some(target),
        }
    }
}

impl fmt::Display for ExifDateTime {
    /// Formats in the EXIF ASCII form `YYYY:MM:DD HH:MM:SS`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}:{:02}:{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

fn atou(digits: &[u8]) -> u32 {
    digits.iter().fold(0, |n, &b| n * 10 + (b - b'0') as u32)
}

// Civil-calendar conversions over the proleptic Gregorian calendar,
// epoch 1970-01-01.
fn days_from_civil(y: i64, m: i64, d: i64) -> i64 {
    let y = if m <= 2 { y - 1 } else { y };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = (m + 9) % 12;
    let doy = (153 * mp + 2) / 5 + d - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

fn civil_from_days(z: i64) -> (i64, u8, u8) {
    let z = z + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    (if m <= 2 { y + 1 } else { y }, m as u8, d as u8)
}

/// Capture-time EXIF fields
///
/// `time_zone_offset` and `sub_sec_time_original` are only meaningful when
/// `date_time_original` is present; all three absent is the canonical
/// "no EXIF date" state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExifRecord {
    pub date_time_original: Option<ExifDateTime>,
    /// Signed UTC offset in minutes
    pub time_zone_offset: Option<i16>,
    /// Decimal-digit subsecond string, preserved verbatim
    pub sub_sec_time_original: Option<String>,
}

impl ExifRecord {
    pub fn is_empty(&self) -> bool {
        self.date_time_original.is_none()
            && self.time_zone_offset.is_none()
            && self.sub_sec_time_original.is_none()
    }
}

/// Structured metadata record consumed by the EXIF writer and produced by
/// the TIFF parser
///
/// A present-but-empty string field is treated identically to an absent one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRecord {
    /// Artist (tag 0x013B)
    pub artist: Option<String>,
    /// ImageDescription (tag 0x010E)
    pub title: Option<String>,
    /// Copyright (tag 0x8298)
    pub copyright: Option<String>,
    /// Capture-time fields stored in the EXIF SubIFD
    pub exif: ExifRecord,
}

impl MetadataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyright = Some(copyright.into());
        self
    }

    pub fn with_date_time_original(mut self, date: ExifDateTime) -> Self {
        self.exif.date_time_original = Some(date);
        self
    }

    pub fn with_time_zone_offset(mut self, minutes: i16) -> Self {
        self.exif.time_zone_offset = Some(minutes);
        self
    }

    pub fn with_sub_sec_time_original(mut self, digits: impl Into<String>) -> Self {
        self.exif.sub_sec_time_original = Some(digits.into());
        self
    }

    /// True when every field is absent or empty, i.e. the record serializes
    /// to no EXIF block at all.
    pub fn is_empty(&self) -> bool {
        fn blank(s: &Option<String>) -> bool {
            s.as_deref().map_or(true, str::is_empty)
        }
        blank(&self.artist)
            && blank(&self.title)
            && blank(&self.copyright)
            && self.exif.date_time_original.is_none()
            && self.exif.time_zone_offset.is_none()
            && blank(&self.exif.sub_sec_time_original)
    }
}

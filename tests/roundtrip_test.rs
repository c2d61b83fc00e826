// Write-then-parse round trips through the EXIF serializer and the TIFF
// parser, plus the end-to-end strip → embed → read pipeline.

use exif_io::{
    embed_metadata, parse_exif, read_metadata, serialize_exif, strip_metadata, ContainerFormat,
    Error, ExifDateTime, MetadataRecord,
};

fn full_record() -> MetadataRecord {
    MetadataRecord::new()
        .with_artist("A. Photographer")
        .with_title("Harbor at dusk")
        .with_copyright("© 2024 A. Photographer")
        .with_date_time_original(ExifDateTime::from_ascii(b"2024:06:15 19:42:07").unwrap())
        .with_time_zone_offset(120)
        .with_sub_sec_time_original("250")
}

#[test]
fn write_parse_recovers_every_field() {
    let exif = serialize_exif(&full_record()).unwrap().unwrap();
    let parsed = parse_exif(&exif).expect("own output must parse");

    assert_eq!(parsed.artist.as_deref(), Some("A. Photographer"));
    assert_eq!(parsed.title.as_deref(), Some("Harbor at dusk"));
    assert_eq!(parsed.copyright.as_deref(), Some("© 2024 A. Photographer"));

    let date = parsed.exif.date_time_original.as_ref().unwrap();
    assert_eq!(date.to_string(), "2024:06:15 19:42:07");
    assert_eq!(date.millisecond, 250);
    assert_eq!(date.utc_offset_minutes, Some(120));
    assert_eq!(parsed.exif.time_zone_offset, Some(120));
    assert_eq!(parsed.exif.sub_sec_time_original.as_deref(), Some("250"));
}

#[test]
fn reserialization_is_byte_stable() {
    let first = serialize_exif(&full_record()).unwrap().unwrap();
    let parsed = parse_exif(&first).unwrap();
    let second = serialize_exif(&parsed).unwrap().unwrap();
    assert_eq!(first, second);
}

#[test]
fn ascii_only_record_round_trips() {
    let record = MetadataRecord::new().with_artist("Solo").with_title("x");
    let exif = serialize_exif(&record).unwrap().unwrap();
    let parsed = parse_exif(&exif).unwrap();
    assert_eq!(parsed.artist.as_deref(), Some("Solo"));
    assert_eq!(parsed.title.as_deref(), Some("x"));
    assert!(parsed.exif.is_empty());
}

#[test]
fn out_of_line_subsec_round_trips() {
    // five digits forces the subsecond payload out of the value area
    let record = MetadataRecord::new()
        .with_date_time_original(ExifDateTime::from_ascii(b"2024:01:02 03:04:05").unwrap())
        .with_sub_sec_time_original("98765");
    let exif = serialize_exif(&record).unwrap().unwrap();
    let parsed = parse_exif(&exif).unwrap();
    assert_eq!(parsed.exif.sub_sec_time_original.as_deref(), Some("98765"));
    // fractional milliseconds, rounded down
    assert_eq!(
        parsed.exif.date_time_original.unwrap().millisecond,
        987
    );
}

#[test]
fn absence_law() {
    assert!(serialize_exif(&MetadataRecord::new()).unwrap().is_none());
}

#[test]
fn size_bound_rejected_before_any_write() {
    let record = MetadataRecord::new()
        .with_artist("a".repeat(40_000))
        .with_copyright("c".repeat(40_000));
    assert!(matches!(
        serialize_exif(&record),
        Err(Error::ExifTooLarge { .. })
    ));
}

#[test]
fn time_zone_shift_applies_to_emitted_date() {
    // The record's clock is UTC; asking for UTC+2 must shift the wall time.
    let mut date = ExifDateTime::from_ascii(b"2024:06:15 23:30:00").unwrap();
    date.utc_offset_minutes = Some(0);
    let record = MetadataRecord::new()
        .with_date_time_original(date)
        .with_time_zone_offset(120);

    let exif = serialize_exif(&record).unwrap().unwrap();
    let parsed = parse_exif(&exif).unwrap();
    assert_eq!(
        parsed.exif.date_time_original.unwrap().to_string(),
        "2024:06:16 01:30:00"
    );
}

#[test]
fn strip_embed_read_pipeline() {
    let original = exif_io::test_fixtures::jpeg_with_metadata();
    let meta = read_metadata(&original);
    assert_eq!(meta.format, ContainerFormat::Jpeg);

    let clean = strip_metadata(meta.format, &original).unwrap().unwrap();
    assert!(read_metadata(&clean).exif.is_none());

    let tagged = embed_metadata(meta.format, &clean, &full_record()).unwrap();
    let reread = read_metadata(&tagged);
    assert_eq!(reread.format, ContainerFormat::Jpeg);
    let exif = reread.exif.expect("embedded date must be readable");
    assert_eq!(
        exif.date_time_original.unwrap().to_string(),
        "2024:06:15 19:42:07"
    );
    assert_eq!(exif.time_zone_offset, Some(120));
    assert_eq!(exif.sub_sec_time_original.as_deref(), Some("250"));
}

#[test]
fn embedding_an_empty_record_is_identity() {
    let clean = strip_metadata(
        ContainerFormat::Jpeg,
        &exif_io::test_fixtures::jpeg_with_metadata(),
    )
    .unwrap()
    .unwrap();
    let out = embed_metadata(ContainerFormat::Jpeg, &clean, &MetadataRecord::new()).unwrap();
    assert_eq!(out, clean);
}

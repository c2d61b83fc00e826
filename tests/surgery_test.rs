// Container surgery through the public API: placement, idempotence,
// allow-list behavior, RIFF re-framing, and batch isolation.

use exif_io::test_fixtures::{
    jpeg_with_metadata, plain_jpeg, plain_png, png_with_text_chunk, webp_with_metadata, JFIF_APP0,
};
use exif_io::{
    batch, insert_exif, read_metadata, serialize_exif, strip_metadata, ContainerFormat, Error,
    MetadataRecord,
};

#[test]
fn jpeg_insertion_grows_by_exif_plus_ten() {
    let image = plain_jpeg();
    let exif = serialize_exif(&MetadataRecord::new().with_artist("Somebody"))
        .unwrap()
        .unwrap();
    let out = insert_exif(ContainerFormat::Jpeg, &image, &exif).unwrap();
    assert_eq!(out.len(), image.len() + exif.len() + 10);

    // new APP1 sits between APP0 and the original DQT
    let app1 = 2 + JFIF_APP0.len();
    assert_eq!(&out[app1..app1 + 2], &[0xFF, 0xE1]);
    let dqt = app1 + 10 + exif.len();
    assert_eq!(&out[dqt..dqt + 2], &[0xFF, 0xDB]);
}

#[test]
fn strip_is_idempotent_for_jpeg_and_png() {
    for (format, dirty) in [
        (ContainerFormat::Jpeg, jpeg_with_metadata()),
        (ContainerFormat::Png, png_with_text_chunk()),
    ] {
        let once = strip_metadata(format, &dirty).unwrap().unwrap();
        let twice = strip_metadata(format, &once).unwrap().unwrap();
        assert_eq!(once, twice);
    }
}

#[test]
fn png_strip_keeps_structural_chunks_byte_identical() {
    let clean = strip_metadata(ContainerFormat::Png, &png_with_text_chunk())
        .unwrap()
        .unwrap();
    assert_eq!(clean, plain_png());
}

#[test]
fn png_insert_is_readable_and_well_framed() {
    let exif = serialize_exif(&MetadataRecord::new().with_artist("Somebody"))
        .unwrap()
        .unwrap();
    let out = insert_exif(ContainerFormat::Png, &plain_png(), &exif).unwrap();

    // the image still classifies and its IHDR is untouched
    let meta = read_metadata(&out);
    assert_eq!(meta.format, ContainerFormat::Png);
    assert_eq!(meta.width, Some(2));
    assert_eq!(meta.height, Some(2));

    // declared chunk lengths still tile the whole file
    let mut i = 8;
    let mut seen_exif = false;
    while i < out.len() {
        let size = u32::from_be_bytes(out[i..i + 4].try_into().unwrap()) as usize;
        let chunk_type = &out[i + 4..i + 8];
        seen_exif |= chunk_type == b"eXIf";
        i += size + 12;
    }
    assert_eq!(i, out.len());
    assert!(seen_exif);
}

#[test]
fn webp_strip_reframes_riff_size() {
    let clean = strip_metadata(ContainerFormat::Webp, &webp_with_metadata())
        .unwrap()
        .unwrap();
    let declared = u32::from_le_bytes(clean[4..8].try_into().unwrap()) as usize;
    assert_eq!(declared, clean.len() - 8);
    assert!(!clean.windows(4).any(|w| w == b"EXIF"));
}

#[test]
fn webp_insert_passes_through_unchanged() {
    let image = webp_with_metadata();
    let out = insert_exif(ContainerFormat::Webp, &image, &[0x01, 0x02]).unwrap();
    assert_eq!(out, image);
}

#[test]
fn strip_has_no_rule_outside_jpeg_png_webp() {
    for format in [
        ContainerFormat::Gif,
        ContainerFormat::Tiff,
        ContainerFormat::Bmp,
        ContainerFormat::Ico,
        ContainerFormat::Avif,
        ContainerFormat::Unknown,
    ] {
        assert!(strip_metadata(format, b"irrelevant").unwrap().is_none());
    }
}

#[test]
fn batch_isolates_per_file_failures() {
    let _ = env_logger::builder().is_test(true).try_init();
    let files = vec![
        ("good.jpg".to_string(), jpeg_with_metadata()),
        ("bad.bin".to_string(), b"not an image at all".to_vec()),
        ("good.png".to_string(), png_with_text_chunk()),
    ];

    let report = batch::process(files, |_, bytes| {
        let meta = read_metadata(&bytes);
        strip_metadata(meta.format, &bytes)?.ok_or(Error::UnsupportedFormat)
    });

    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.failures[0].0, "bad.bin");
    assert!(matches!(report.failures[0].1, Error::UnsupportedFormat));
    assert_eq!(report.to_string(), "2 files processed, 1 files failed");
}

//! Container format classification
//!
//! A [`ContainerFormat`] is determined solely by leading magic bytes; it says
//! how a file is framed (JPEG marker segments, PNG chunks, RIFF sub-chunks),
//! not what the pixels are encoded with.

/// Closed set of container formats recognized by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContainerFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
    Tiff,
    Bmp,
    Ico,
    Avif,
    /// Unclassifiable header; no further parsing is attempted
    #[default]
    Unknown,
}

impl ContainerFormat {
    /// Classify a buffer by its leading magic bytes.
    ///
    /// Only the first 12 bytes are ever inspected. Buffers too short for a
    /// signature classify as `Unknown`.
    pub fn detect(buf: &[u8]) -> ContainerFormat {
        if buf.starts_with(&[0xFF, 0xD8]) {
            ContainerFormat::Jpeg
        } else if buf.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            ContainerFormat::Png
        } else if buf.starts_with(b"GIF8") {
            ContainerFormat::Gif
        } else if buf.get(8..12) == Some(b"WEBP") {
            ContainerFormat::Webp
        } else if buf.starts_with(&[0x4D, 0x4D, 0x00, 0x2A]) || buf.starts_with(&[0x49, 0x49, 0x2A, 0x00]) {
            ContainerFormat::Tiff
        } else if buf.starts_with(b"BM") {
            ContainerFormat::Bmp
        } else if buf.starts_with(&[0x00, 0x00, 0x01, 0x00]) {
            ContainerFormat::Ico
        } else if buf.get(4..12) == Some(b"ftypavif") {
            ContainerFormat::Avif
        } else {
            ContainerFormat::Unknown
        }
    }

    /// Primary MIME type for this container, if it has one
    pub fn to_mime(&self) -> Option<&'static str> {
        match self {
            ContainerFormat::Jpeg => Some("image/jpeg"),
            ContainerFormat::Png => Some("image/png"),
            ContainerFormat::Gif => Some("image/gif"),
            ContainerFormat::Webp => Some("image/webp"),
            ContainerFormat::Tiff => Some("image/tiff"),
            ContainerFormat::Bmp => Some("image/bmp"),
            ContainerFormat::Ico => Some("image/x-icon"),
            ContainerFormat::Avif => Some("image/avif"),
            ContainerFormat::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_by_magic() {
        assert_eq!(ContainerFormat::detect(&[0xFF, 0xD8, 0xFF, 0xE0]), ContainerFormat::Jpeg);
        assert_eq!(
            ContainerFormat::detect(b"\x89PNG\r\n\x1a\n"),
            ContainerFormat::Png
        );
        assert_eq!(ContainerFormat::detect(b"GIF89a"), ContainerFormat::Gif);
        assert_eq!(
            ContainerFormat::detect(b"RIFF\x10\x00\x00\x00WEBPVP8 "),
            ContainerFormat::Webp
        );
        assert_eq!(
            ContainerFormat::detect(&[0x4D, 0x4D, 0x00, 0x2A]),
            ContainerFormat::Tiff
        );
        assert_eq!(
            ContainerFormat::detect(&[0x49, 0x49, 0x2A, 0x00]),
            ContainerFormat::Tiff
        );
        assert_eq!(ContainerFormat::detect(b"BM\x00\x00"), ContainerFormat::Bmp);
        assert_eq!(
            ContainerFormat::detect(&[0x00, 0x00, 0x01, 0x00]),
            ContainerFormat::Ico
        );
        assert_eq!(
            ContainerFormat::detect(b"\x00\x00\x00\x1cftypavif"),
            ContainerFormat::Avif
        );
    }

    #[test]
    fn detect_unknown() {
        assert_eq!(ContainerFormat::detect(&[]), ContainerFormat::Unknown);
        assert_eq!(ContainerFormat::detect(&[0x00]), ContainerFormat::Unknown);
        assert_eq!(ContainerFormat::detect(b"not an image"), ContainerFormat::Unknown);
    }
}

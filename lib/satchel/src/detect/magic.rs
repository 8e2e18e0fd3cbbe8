//! Magic-byte sniffing.

use std::path::Path;

use super::TypeDetector;

/// Signatures found at a fixed offset.
///
/// Short printable signatures (`BM`, `BZh`, `ID3`) are not listed here: they
/// need the structural checks below or they would match plain text.
const SIGNATURES: &[(usize, &[u8], &str)] = &[
    // Images
    (0, b"\x89PNG\r\n\x1a\n", "image/png"),
    (0, b"\xff\xd8\xff", "image/jpeg"),
    (0, b"GIF87a", "image/gif"),
    (0, b"GIF89a", "image/gif"),
    (0, b"\x00\x00\x01\x00", "image/x-icon"),
    (0, b"II*\x00", "image/tiff"),
    (0, b"MM\x00*", "image/tiff"),
    // Documents
    (0, b"%PDF-", "application/pdf"),
    // Archives
    (0, b"PK\x03\x04", "application/zip"),
    (0, b"PK\x05\x06", "application/zip"),
    (0, b"\x1f\x8b", "application/gzip"),
    (0, b"7z\xbc\xaf\x27\x1c", "application/x-7z-compressed"),
    (0, b"Rar!\x1a\x07", "application/vnd.rar"),
    (257, b"ustar", "application/x-tar"),
    // Audio/Video
    (0, b"OggS", "audio/ogg"),
    (0, b"fLaC", "audio/flac"),
    (0, b"\x1a\x45\xdf\xa3", "video/webm"),
    (4, b"ftyp", "video/mp4"),
    // Other
    (0, b"\x00asm", "application/wasm"),
];

/// Recognises common formats from their leading bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MagicSniffer;

impl MagicSniffer {
    /// MIME type for the given contents, if recognised.
    #[must_use]
    pub fn sniff(contents: &[u8]) -> Option<&'static str> {
        let structured: [fn(&[u8]) -> Option<&'static str>; 4] =
            [sniff_riff, sniff_bmp, sniff_bzip2, sniff_id3];
        if let Some(mime) = structured.iter().find_map(|sniff| sniff(contents)) {
            return Some(mime);
        }

        SIGNATURES
            .iter()
            .find(|(offset, magic, _)| {
                contents
                    .get(*offset..offset + magic.len())
                    .is_some_and(|window| window == *magic)
            })
            .map(|(_, _, mime)| *mime)
            .or_else(|| sniff_markup(contents))
    }
}

impl TypeDetector for MagicSniffer {
    fn name(&self) -> &'static str {
        "magic"
    }

    fn detect(&self, _path: &Path, contents: &[u8]) -> Option<String> {
        Self::sniff(contents).map(str::to_string)
    }
}

/// RIFF containers carry their format at offset 8.
fn sniff_riff(contents: &[u8]) -> Option<&'static str> {
    if !contents.starts_with(b"RIFF") {
        return None;
    }
    match contents.get(8..12)? {
        b"WEBP" => Some("image/webp"),
        b"WAVE" => Some("audio/wav"),
        b"AVI " => Some("video/x-msvideo"),
        _ => None,
    }
}

/// `BM`, four size bytes, four zero reserved bytes, then a known DIB header size.
fn sniff_bmp(contents: &[u8]) -> Option<&'static str> {
    if !contents.starts_with(b"BM") || contents.len() < 26 {
        return None;
    }
    if contents.get(6..10)?.iter().any(|byte| *byte != 0) {
        return None;
    }
    let dib = u32::from_le_bytes(contents.get(14..18)?.try_into().ok()?);
    matches!(dib, 12 | 40 | 52 | 56 | 64 | 108 | 124).then_some("image/bmp")
}

/// `BZh`, a block size digit, then a block or end-of-stream marker.
fn sniff_bzip2(contents: &[u8]) -> Option<&'static str> {
    if !contents.starts_with(b"BZh") || !matches!(contents.get(3)?, b'1'..=b'9') {
        return None;
    }
    match contents.get(4..10)? {
        b"1AY&SY" | b"\x17\x72\x45\x38\x50\x90" => Some("application/x-bzip2"),
        _ => None,
    }
}

/// ID3v2 tag header: version 2 to 4, no unknown flag bits, synchsafe size.
fn sniff_id3(contents: &[u8]) -> Option<&'static str> {
    if !contents.starts_with(b"ID3") {
        return None;
    }
    let header = contents.get(3..10)?;
    let (version, flags, size) = (header.first()?, header.get(2)?, header.get(3..)?);
    let plausible = matches!(version, 2..=4)
        && flags & 0x0f == 0
        && size.iter().all(|byte| byte & 0x80 == 0);
    plausible.then_some("audio/mpeg")
}

fn sniff_markup(contents: &[u8]) -> Option<&'static str> {
    let text = contents.strip_prefix(b"\xef\xbb\xbf").unwrap_or(contents);
    let start = text.iter().position(|byte| !byte.is_ascii_whitespace())?;
    let text = text.get(start..)?;

    let head = text.get(..text.len().min(16))?.to_ascii_lowercase();
    if head.starts_with(b"<?xml") {
        Some("application/xml")
    } else if head.starts_with(b"<!doctype html") || head.starts_with(b"<html") {
        Some("text/html")
    } else if head.starts_with(b"<svg") {
        Some("image/svg+xml")
    } else {
        None
    }
}

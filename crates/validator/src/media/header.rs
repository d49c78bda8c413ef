//! Magic-byte sniffing and header-level dimension reading.

use super::{Dimensions, MediaProbe, declared_category};
use crate::error::ProbeError;
use crate::foundation::{FileCandidate, FileCategory};
use async_trait::async_trait;

/// Probe that reads file headers only.
///
/// Categories come from magic bytes when recognised, otherwise from the
/// declared MIME type and extension. A plain zip declared as a document
/// (docx, odt, ...) stays a document. PNG, GIF, JPEG, BMP and WebP dimensions
/// are read from their headers. Duration and recompression are unsupported.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderProbe;

const SIGNATURES: &[(&[u8], &str)] = &[
    (b"\x89PNG\r\n\x1a\n", "image/png"),
    (b"\xFF\xD8\xFF", "image/jpeg"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"BM", "image/bmp"),
    (b"%PDF-", "application/pdf"),
    (b"\x1F\x8B", "application/gzip"),
    (b"7z\xBC\xAF\x27\x1C", "application/x-7z-compressed"),
    (b"Rar!\x1A\x07", "application/vnd.rar"),
    (b"OggS", "audio/ogg"),
    (b"fLaC", "audio/flac"),
    (b"ID3", "audio/mpeg"),
    (b"\x1A\x45\xDF\xA3", "video/x-matroska"),
];

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const ZIP_MIME: &str = "application/zip";

const OOXML_PARTS: &[(&[u8], &str)] = &[
    (
        b"word/",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    (
        b"xl/",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    (
        b"ppt/",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
];

const ODF_TYPES: &[&str] = &[
    "application/vnd.oasis.opendocument.text",
    "application/vnd.oasis.opendocument.spreadsheet",
    "application/vnd.oasis.opendocument.presentation",
];

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

/// Office container type of a zip: the stored `mimetype` entry of ODF files,
/// or the part directories next to `[Content_Types].xml` for OOXML.
fn zip_container_mime(bytes: &[u8]) -> Option<&'static str> {
    let name_len = usize::from(read_u16_le(bytes, 26)?);
    let extra_len = usize::from(read_u16_le(bytes, 28)?);
    if bytes.get(30..30 + name_len) == Some(b"mimetype".as_slice()) {
        let content = bytes.get(30 + name_len + extra_len..)?;
        return ODF_TYPES
            .iter()
            .find(|mime| content.starts_with(mime.as_bytes()))
            .copied();
    }
    if !contains(bytes, b"[Content_Types].xml") {
        return None;
    }
    OOXML_PARTS
        .iter()
        .find(|(part, _)| contains(bytes, part))
        .map(|(_, mime)| *mime)
}

/// MIME type implied by the leading bytes, if recognised.
///
/// Zip archives holding an OOXML or ODF document report the document type.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(ZIP_MAGIC) {
        return Some(zip_container_mime(bytes).unwrap_or(ZIP_MIME));
    }
    if bytes.len() >= 12 && &bytes[..4] == b"RIFF" {
        return match &bytes[8..12] {
            b"WEBP" => Some("image/webp"),
            b"WAVE" => Some("audio/wav"),
            b"AVI " => Some("video/x-msvideo"),
            _ => None,
        };
    }
    if bytes.len() >= 12 && &bytes[4..8] == b"ftyp" {
        return match &bytes[8..12] {
            b"avif" => Some("image/avif"),
            b"heic" | b"heix" => Some("image/heic"),
            b"qt  " => Some("video/quicktime"),
            b"M4A " => Some("audio/mp4"),
            _ => Some("video/mp4"),
        };
    }
    SIGNATURES
        .iter()
        .find(|(magic, _)| bytes.starts_with(magic))
        .map(|(_, mime)| *mime)
}

fn read_u16_be(bytes: &[u8], at: usize) -> Option<u16> {
    bytes.get(at..at + 2).map(|b| u16::from_be_bytes([b[0], b[1]]))
}

fn read_u16_le(bytes: &[u8], at: usize) -> Option<u16> {
    bytes.get(at..at + 2).map(|b| u16::from_le_bytes([b[0], b[1]]))
}

fn read_u24_le(bytes: &[u8], at: usize) -> Option<u32> {
    bytes
        .get(at..at + 3)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], 0]))
}

fn read_u32_le(bytes: &[u8], at: usize) -> Option<u32> {
    bytes
        .get(at..at + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

fn read_u32_be(bytes: &[u8], at: usize) -> Option<u32> {
    bytes
        .get(at..at + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

fn png_dimensions(bytes: &[u8]) -> Result<Dimensions, ProbeError> {
    if bytes.get(12..16) != Some(b"IHDR".as_slice()) {
        return Err(ProbeError::malformed("png", "missing IHDR chunk"));
    }
    match (read_u32_be(bytes, 16), read_u32_be(bytes, 20)) {
        (Some(width), Some(height)) => Ok(Dimensions::new(width, height)),
        _ => Err(ProbeError::malformed("png", "truncated IHDR chunk")),
    }
}

fn gif_dimensions(bytes: &[u8]) -> Result<Dimensions, ProbeError> {
    match (read_u16_le(bytes, 6), read_u16_le(bytes, 8)) {
        (Some(width), Some(height)) => Ok(Dimensions::new(width.into(), height.into())),
        _ => Err(ProbeError::malformed("gif", "truncated logical screen descriptor")),
    }
}

/// BITMAPINFOHEADER width and height; top-down bitmaps store a negative
/// height.
fn bmp_dimensions(bytes: &[u8]) -> Result<Dimensions, ProbeError> {
    let read_i32_le = |at: usize| {
        bytes
            .get(at..at + 4)
            .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    };
    match (read_i32_le(18), read_i32_le(22)) {
        (Some(width), Some(height)) => Ok(Dimensions::new(
            width.unsigned_abs(),
            height.unsigned_abs(),
        )),
        _ => Err(ProbeError::malformed("bmp", "truncated info header")),
    }
}

/// Reads the first chunk of a WebP file: lossy `VP8 `, lossless `VP8L` or
/// extended `VP8X`.
fn webp_dimensions(bytes: &[u8]) -> Result<Dimensions, ProbeError> {
    let truncated = || ProbeError::malformed("webp", "truncated chunk header");
    match bytes.get(12..16) {
        Some(b"VP8 ") => {
            if bytes.get(23..26) != Some([0x9D, 0x01, 0x2A].as_slice()) {
                return Err(ProbeError::malformed("webp", "missing VP8 start code"));
            }
            match (read_u16_le(bytes, 26), read_u16_le(bytes, 28)) {
                (Some(width), Some(height)) => Ok(Dimensions::new(
                    u32::from(width & 0x3FFF),
                    u32::from(height & 0x3FFF),
                )),
                _ => Err(truncated()),
            }
        }
        Some(b"VP8L") => {
            if bytes.get(20) != Some(&0x2F) {
                return Err(ProbeError::malformed("webp", "missing VP8L signature"));
            }
            let bits = read_u32_le(bytes, 21).ok_or_else(truncated)?;
            Ok(Dimensions::new((bits & 0x3FFF) + 1, ((bits >> 14) & 0x3FFF) + 1))
        }
        Some(b"VP8X") => match (read_u24_le(bytes, 24), read_u24_le(bytes, 27)) {
            (Some(width), Some(height)) => Ok(Dimensions::new(width + 1, height + 1)),
            _ => Err(truncated()),
        },
        _ => Err(ProbeError::malformed("webp", "unknown first chunk")),
    }
}

/// Walks JPEG segments up to the first start-of-frame marker.
fn jpeg_dimensions(bytes: &[u8]) -> Result<Dimensions, ProbeError> {
    let mut at = 2;
    while at + 4 <= bytes.len() {
        if bytes[at] != 0xFF {
            return Err(ProbeError::malformed("jpeg", "expected segment marker"));
        }
        let marker = bytes[at + 1];
        if marker == 0xFF {
            at += 1;
            continue;
        }
        let Some(length) = read_u16_be(bytes, at + 2) else {
            break;
        };
        let is_frame = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_frame {
            return match (read_u16_be(bytes, at + 5), read_u16_be(bytes, at + 7)) {
                (Some(height), Some(width)) => Ok(Dimensions::new(width.into(), height.into())),
                _ => Err(ProbeError::malformed("jpeg", "truncated frame header")),
            };
        }
        at += 2 + usize::from(length);
    }
    Err(ProbeError::malformed("jpeg", "no frame header found"))
}

#[async_trait]
impl MediaProbe for HeaderProbe {
    async fn category(&self, file: &FileCandidate) -> Result<FileCategory, ProbeError> {
        let declared = declared_category(file);
        Ok(match sniff_mime(file.bytes()) {
            Some(ZIP_MIME) if declared == FileCategory::Document => declared,
            Some(mime) => FileCategory::from_mime(mime),
            None => declared,
        })
    }

    async fn dimensions(&self, file: &FileCandidate) -> Result<Dimensions, ProbeError> {
        let bytes = file.bytes();
        match sniff_mime(bytes) {
            Some("image/png") => png_dimensions(bytes),
            Some("image/gif") => gif_dimensions(bytes),
            Some("image/jpeg") => jpeg_dimensions(bytes),
            Some("image/bmp") => bmp_dimensions(bytes),
            Some("image/webp") => webp_dimensions(bytes),
            _ => Err(ProbeError::unsupported("read dimensions of", file.mime_type())),
        }
    }

    async fn duration(&self, file: &FileCandidate) -> Result<f64, ProbeError> {
        Err(ProbeError::unsupported("measure duration of", file.mime_type()))
    }

    async fn recompress(
        &self,
        file: &FileCandidate,
        _target_bytes: u64,
        _quality: f32,
    ) -> Result<FileCandidate, ProbeError> {
        Err(ProbeError::unsupported("recompress", file.mime_type()))
    }
}

/// Minimal PNG header with the given dimensions.
#[cfg(test)]
pub(crate) fn png_header(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0DIHDR".to_vec();
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
    bytes
}

/// Extended WebP header with the given canvas size.
#[cfg(test)]
pub(crate) fn webp_header(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = b"RIFF\0\0\0\0WEBPVP8X\x0A\0\0\0\0\0\0\0".to_vec();
    bytes.extend_from_slice(&(width - 1).to_le_bytes()[..3]);
    bytes.extend_from_slice(&(height - 1).to_le_bytes()[..3]);
    bytes
}

/// Zip local file header for `name` followed by `content`, stored.
#[cfg(test)]
pub(crate) fn zip_entry(name: &str, content: &[u8]) -> Vec<u8> {
    let mut bytes = ZIP_MAGIC.to_vec();
    bytes.extend_from_slice(&[0u8; 22]);
    bytes.extend_from_slice(&(name.len() as u16).to_le_bytes());
    bytes.extend_from_slice(&0u16.to_le_bytes());
    bytes.extend_from_slice(name.as_bytes());
    bytes.extend_from_slice(content);
    bytes
}

//! Broad file categories and the extension table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Broad media category of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Image,
    Video,
    Audio,
    Document,
    Archive,
    Other,
}

/// Known extensions and the category each implies.
pub const EXTENSION_TABLE: &[(&str, FileCategory)] = &[
    ("jpg", FileCategory::Image),
    ("jpeg", FileCategory::Image),
    ("png", FileCategory::Image),
    ("gif", FileCategory::Image),
    ("webp", FileCategory::Image),
    ("bmp", FileCategory::Image),
    ("svg", FileCategory::Image),
    ("avif", FileCategory::Image),
    ("heic", FileCategory::Image),
    ("mp4", FileCategory::Video),
    ("mov", FileCategory::Video),
    ("avi", FileCategory::Video),
    ("mkv", FileCategory::Video),
    ("webm", FileCategory::Video),
    ("mp3", FileCategory::Audio),
    ("wav", FileCategory::Audio),
    ("ogg", FileCategory::Audio),
    ("flac", FileCategory::Audio),
    ("aac", FileCategory::Audio),
    ("m4a", FileCategory::Audio),
    ("pdf", FileCategory::Document),
    ("doc", FileCategory::Document),
    ("docx", FileCategory::Document),
    ("txt", FileCategory::Document),
    ("rtf", FileCategory::Document),
    ("odt", FileCategory::Document),
    ("xls", FileCategory::Document),
    ("xlsx", FileCategory::Document),
    ("ppt", FileCategory::Document),
    ("pptx", FileCategory::Document),
    ("csv", FileCategory::Document),
    ("md", FileCategory::Document),
    ("zip", FileCategory::Archive),
    ("tar", FileCategory::Archive),
    ("gz", FileCategory::Archive),
    ("rar", FileCategory::Archive),
    ("7z", FileCategory::Archive),
];

impl FileCategory {
    /// Category implied by a MIME type.
    #[must_use]
    pub fn from_mime(mime_type: &str) -> Self {
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        let (top, sub) = essence.split_once('/').unwrap_or((essence.as_str(), ""));
        match top {
            "image" => Self::Image,
            "video" => Self::Video,
            "audio" => Self::Audio,
            "text" => Self::Document,
            "application" => match sub {
                "pdf" | "msword" | "rtf" => Self::Document,
                s if s.starts_with("vnd.oasis.opendocument") => Self::Document,
                s if s.starts_with("vnd.openxmlformats-officedocument")
                    || s.starts_with("vnd.ms-") =>
                {
                    Self::Document
                }
                "zip" | "x-tar" | "gzip" | "x-gzip" | "x-7z-compressed" | "vnd.rar"
                | "x-rar-compressed" => Self::Archive,
                _ => Self::Other,
            },
            _ => Self::Other,
        }
    }

    /// Category the extension table assigns, if the extension is known.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        EXTENSION_TABLE
            .iter()
            .find(|(ext, _)| *ext == extension)
            .map(|(_, category)| *category)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Document => "document",
            Self::Archive => "archive",
            Self::Other => "other",
        }
    }

    /// Audio and video carry a duration.
    #[must_use]
    pub fn is_timed(self) -> bool {
        matches!(self, Self::Audio | Self::Video)
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mime() {
        assert_eq!(FileCategory::from_mime("image/png"), FileCategory::Image);
        assert_eq!(FileCategory::from_mime("video/mp4"), FileCategory::Video);
        assert_eq!(FileCategory::from_mime("audio/mpeg"), FileCategory::Audio);
        assert_eq!(FileCategory::from_mime("application/pdf"), FileCategory::Document);
        assert_eq!(
            FileCategory::from_mime("text/plain; charset=utf-8"),
            FileCategory::Document
        );
        assert_eq!(FileCategory::from_mime("application/zip"), FileCategory::Archive);
        assert_eq!(
            FileCategory::from_mime("application/octet-stream"),
            FileCategory::Other
        );
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(FileCategory::from_extension("JPG"), Some(FileCategory::Image));
        assert_eq!(FileCategory::from_extension(".mkv"), Some(FileCategory::Video));
        assert_eq!(FileCategory::from_extension("7z"), Some(FileCategory::Archive));
        assert_eq!(FileCategory::from_extension("exe"), None);
    }

    #[test]
    fn test_table_has_no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        for (ext, _) in EXTENSION_TABLE {
            assert!(seen.insert(*ext), "duplicate extension {ext}");
        }
    }

    #[test]
    fn test_display_and_serde_agree() {
        for category in [FileCategory::Image, FileCategory::Archive, FileCategory::Other] {
            assert_eq!(
                serde_json::to_value(category).unwrap(),
                serde_json::Value::String(category.to_string())
            );
        }
    }
}

//! Media probing
//!
//! File refinements never decode media themselves; they ask a [`MediaProbe`]
//! carried by the [`EvalContext`](crate::EvalContext). [`HeaderProbe`] is the
//! bundled implementation; [`StaticProbe`] answers from fixed values.

mod fixed;
mod header;

pub use fixed::StaticProbe;
pub use header::{HeaderProbe, sniff_mime};
#[cfg(test)]
pub(crate) use header::{webp_header, zip_entry};

use crate::error::ProbeError;
use crate::foundation::{FileCandidate, FileCategory};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Platform collaborator that inspects and transforms file content.
#[async_trait]
pub trait MediaProbe: Send + Sync {
    /// Broad category of the file.
    ///
    /// The default uses the declared MIME type and falls back to the
    /// extension table.
    async fn category(&self, file: &FileCandidate) -> Result<FileCategory, ProbeError> {
        Ok(declared_category(file))
    }

    /// Pixel dimensions of an image.
    async fn dimensions(&self, file: &FileCandidate) -> Result<Dimensions, ProbeError>;

    /// Playback duration of audio or video, in seconds.
    async fn duration(&self, file: &FileCandidate) -> Result<f64, ProbeError>;

    /// Lossy re-encoding aiming at `target_bytes`.
    ///
    /// `quality` is in `0.0..=1.0`. The result may still exceed the target.
    async fn recompress(
        &self,
        file: &FileCandidate,
        target_bytes: u64,
        quality: f32,
    ) -> Result<FileCandidate, ProbeError>;
}

/// Category from the declared MIME type, or the extension table when the MIME
/// type says nothing useful.
pub fn declared_category(file: &FileCandidate) -> FileCategory {
    match FileCategory::from_mime(file.mime_type()) {
        FileCategory::Other => file
            .extension()
            .and_then(|ext| FileCategory::from_extension(&ext))
            .unwrap_or(FileCategory::Other),
        category => category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_declared_category_falls_back_to_extension() {
        let file = FileCandidate::new("clip.MKV", "application/octet-stream", Bytes::new());
        assert_eq!(declared_category(&file), FileCategory::Video);
        let file = FileCandidate::new("data.bin", "", Bytes::new());
        assert_eq!(declared_category(&file), FileCategory::Other);
        let file = FileCandidate::new("photo", "image/png", Bytes::new());
        assert_eq!(declared_category(&file), FileCategory::Image);
    }

    #[test]
    fn test_dimensions_display() {
        assert_eq!(Dimensions::new(640, 480).to_string(), "640x480");
    }
}

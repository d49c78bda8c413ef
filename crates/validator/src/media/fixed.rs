use super::{Dimensions, MediaProbe, declared_category};
use crate::error::ProbeError;
use crate::foundation::{FileCandidate, FileCategory};
use async_trait::async_trait;

/// Probe answering from fixed values.
///
/// Useful where real decoding is unavailable, and in tests. The category
/// comes from the declared MIME type unless overridden. Recompression keeps
/// the file name and type and truncates the content to `ratio` of its size.
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    category: Option<FileCategory>,
    dimensions: Option<Dimensions>,
    duration: Option<f64>,
    ratio: Option<f64>,
}

impl StaticProbe {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_category(mut self, category: FileCategory) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Some(Dimensions::new(width, height));
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Fraction of the original size recompression produces.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_compression_ratio(mut self, ratio: f64) -> Self {
        self.ratio = Some(ratio.clamp(0.0, 1.0));
        self
    }
}

#[async_trait]
impl MediaProbe for StaticProbe {
    async fn category(&self, file: &FileCandidate) -> Result<FileCategory, ProbeError> {
        Ok(self.category.unwrap_or_else(|| declared_category(file)))
    }

    async fn dimensions(&self, file: &FileCandidate) -> Result<Dimensions, ProbeError> {
        self.dimensions
            .ok_or_else(|| ProbeError::unsupported("read dimensions of", file.mime_type()))
    }

    async fn duration(&self, file: &FileCandidate) -> Result<f64, ProbeError> {
        self.duration
            .ok_or_else(|| ProbeError::unsupported("measure duration of", file.mime_type()))
    }

    async fn recompress(
        &self,
        file: &FileCandidate,
        _target_bytes: u64,
        _quality: f32,
    ) -> Result<FileCandidate, ProbeError> {
        let ratio = self
            .ratio
            .ok_or_else(|| ProbeError::unsupported("recompress", file.mime_type()))?;
        let keep = (file.size() as f64 * ratio) as usize;
        Ok(FileCandidate::new(
            file.name(),
            file.mime_type(),
            file.bytes().slice(..keep),
        ))
    }
}

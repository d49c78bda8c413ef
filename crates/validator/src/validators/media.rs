//! Image and timed-media refinements.

use super::files::{megabytes_to_bytes, probe_category};
use crate::foundation::{EvalContext, FileCandidate, FileCategory, FileLike, Outcome};
use crate::media::Dimensions;
use crate::node::{Node, Output};
use crate::validators::types::file;
use serde::{Deserialize, Serialize};

// ============================================================================
// DIMENSION BOUNDS
// ============================================================================

/// Optional pixel bounds; only the edges that are set are checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionBounds {
    pub min_width: Option<u32>,
    pub max_width: Option<u32>,
    pub min_height: Option<u32>,
    pub max_height: Option<u32>,
}

impl DimensionBounds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn min_width(mut self, pixels: u32) -> Self {
        self.min_width = Some(pixels);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn max_width(mut self, pixels: u32) -> Self {
        self.max_width = Some(pixels);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn min_height(mut self, pixels: u32) -> Self {
        self.min_height = Some(pixels);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn max_height(mut self, pixels: u32) -> Self {
        self.max_height = Some(pixels);
        self
    }

    /// No edge is set.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        *self == Self::default()
    }

    /// Every violated edge, in width-then-height order.
    #[must_use]
    pub fn violations(&self, dimensions: Dimensions) -> Vec<String> {
        let Dimensions { width, height } = dimensions;
        let mut violations = Vec::new();
        if let Some(min) = self.min_width.filter(|min| width < *min) {
            violations.push(format!("width must be at least {min}px"));
        }
        if let Some(max) = self.max_width.filter(|max| width > *max) {
            violations.push(format!("width must be at most {max}px"));
        }
        if let Some(min) = self.min_height.filter(|min| height < *min) {
            violations.push(format!("height must be at least {min}px"));
        }
        if let Some(max) = self.max_height.filter(|max| height > *max) {
            violations.push(format!("height must be at most {max}px"));
        }
        violations
    }
}

// ============================================================================
// REFINEMENTS
// ============================================================================

impl<T: Output + FileLike> Node<T> {
    /// Checks image dimensions against `bounds`. Non-images pass.
    pub fn dimensions(&self, bounds: DimensionBounds, message: Option<&str>) -> Self {
        let message = message.map(str::to_owned);
        self.refine_with(move |value: T, ctx: EvalContext| {
            let message = message.clone();
            async move {
                let Some(file) = value.file().cloned() else {
                    return Ok(Outcome::Valid(value));
                };
                if bounds.is_unbounded() || probe_category(&ctx, &file).await? != FileCategory::Image {
                    return Ok(Outcome::Valid(value));
                }
                let probe = ctx.probe();
                let dimensions = ctx.guard(probe.dimensions(&file)).await??;
                let violations = bounds.violations(dimensions);
                if violations.is_empty() {
                    return Ok(Outcome::Valid(value));
                }
                let message = message.unwrap_or_else(|| {
                    format!("Image is {dimensions}: {}", violations.join(", "))
                });
                Ok(Outcome::invalid(ctx.description(), message))
            }
        })
    }

    /// Rejects audio or video longer than `seconds`. Other files pass.
    pub fn max_duration(&self, seconds: f64, message: Option<&str>) -> Self {
        let message = message.map_or_else(
            || format!("Duration must be at most {seconds} seconds"),
            str::to_owned,
        );
        self.refine_with(move |value: T, ctx: EvalContext| {
            let message = message.clone();
            async move {
                let Some(file) = value.file().cloned() else {
                    return Ok(Outcome::Valid(value));
                };
                if !probe_category(&ctx, &file).await?.is_timed() {
                    return Ok(Outcome::Valid(value));
                }
                let probe = ctx.probe();
                let duration = ctx.guard(probe.duration(&file)).await??;
                if duration > seconds {
                    Ok(Outcome::invalid(ctx.description(), message))
                } else {
                    Ok(Outcome::Valid(value))
                }
            }
        })
    }

    /// Recompresses images above `max_megabytes` and replaces the value with
    /// the smaller file.
    ///
    /// `quality` is clamped to `0.0..=1.0`. Fails when the recompressed file
    /// is still above the ceiling. Non-images pass unchanged.
    pub fn compress(&self, max_megabytes: f64, quality: f32, message: Option<&str>) -> Self {
        let ceiling = megabytes_to_bytes(max_megabytes);
        let quality = quality.clamp(0.0, 1.0);
        let message = message.map_or_else(
            || format!("Could not compress file below {max_megabytes} MB"),
            str::to_owned,
        );
        self.refine_with(move |value: T, ctx: EvalContext| {
            let message = message.clone();
            async move {
                let Some(file) = value.file().cloned() else {
                    return Ok(Outcome::Valid(value));
                };
                if file.size() as f64 <= ceiling
                    || probe_category(&ctx, &file).await? != FileCategory::Image
                {
                    return Ok(Outcome::Valid(value));
                }

                let reporter = ctx.reporter();
                reporter.stage("compressing");
                let probe = ctx.probe();
                let compressed = ctx
                    .guard(probe.recompress(&file, ceiling as u64, quality))
                    .await??;
                reporter.percent(100);
                tracing::debug!(
                    path = ctx.path(),
                    before = file.size(),
                    after = compressed.size(),
                    "recompressed image"
                );

                if compressed.size() as f64 > ceiling {
                    return Ok(Outcome::invalid(ctx.description(), message));
                }
                Ok(Outcome::Valid(value.replace_file(compressed)))
            }
        })
    }
}

/// Image upload: `file()` restricted to images, `max_megabytes` and `bounds`.
pub fn image(max_megabytes: f64, bounds: DimensionBounds) -> Node<FileCandidate> {
    file()
        .accept([FileCategory::Image], Some("File must be an image"))
        .max_size(max_megabytes, None)
        .dimensions(bounds, None)
}

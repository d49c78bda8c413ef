//! File refinements
//!
//! Each applies only when the validated value carries a file (see
//! [`FileLike`]); anything else passes through unchanged. Sizes are given in
//! megabytes and compared as `bytes > megabytes * 1024 * 1024`.

use crate::error::{BoxError, Fault};
use crate::foundation::{
    EvalContext, FileCandidate, FileCategory, FileLike, Outcome, ProgressReporter,
};
use crate::media::Dimensions;
use crate::node::{Node, Output};
use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;
use std::sync::Arc;

/// Bytes in one megabyte.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

pub(crate) fn megabytes_to_bytes(megabytes: f64) -> f64 {
    megabytes * BYTES_PER_MB
}

pub(crate) async fn probe_category(
    ctx: &EvalContext,
    file: &FileCandidate,
) -> Result<FileCategory, Fault> {
    let probe = ctx.probe();
    Ok(ctx.guard(probe.category(file)).await??)
}

fn join_display<I, D>(items: I) -> String
where
    I: IntoIterator<Item = D>,
    D: std::fmt::Display,
{
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// METADATA
// ============================================================================

/// Everything known about a file, gathered for [`Node::metadata`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileMetadata {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub extension: Option<String>,
    pub category: FileCategory,
    /// Present for images the probe can measure
    pub dimensions: Option<Dimensions>,
    /// Present for audio and video the probe can measure
    pub duration: Option<f64>,
    pub last_modified: Option<i64>,
}

impl FileMetadata {
    /// Collects metadata through the context's probe. Measurements the probe
    /// does not support are left empty.
    pub async fn gather(ctx: &EvalContext, file: &FileCandidate) -> Result<Self, Fault> {
        use crate::error::ProbeError;

        let probe = ctx.probe();
        let category = probe_category(ctx, file).await?;
        let dimensions = if category == FileCategory::Image {
            match ctx.guard(probe.dimensions(file)).await? {
                Ok(dimensions) => Some(dimensions),
                Err(ProbeError::Unsupported { .. }) => None,
                Err(err) => return Err(err.into()),
            }
        } else {
            None
        };
        let duration = if category.is_timed() {
            match ctx.guard(probe.duration(file)).await? {
                Ok(seconds) => Some(seconds),
                Err(ProbeError::Unsupported { .. }) => None,
                Err(err) => return Err(err.into()),
            }
        } else {
            None
        };

        Ok(Self {
            name: file.name().to_owned(),
            mime_type: file.mime_type().to_owned(),
            size: file.size(),
            extension: file.extension(),
            category,
            dimensions,
            duration,
            last_modified: file.last_modified(),
        })
    }
}

// ============================================================================
// EXTERNAL VERIFICATION
// ============================================================================

/// Result of an external verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    /// Rejected, optionally with a reason shown instead of the default message
    Rejected(Option<String>),
}

/// External service that inspects a file, e.g. a malware scanner.
#[async_trait]
pub trait Verifier: Send + Sync {
    /// Name used in faults and logs.
    fn name(&self) -> &str;

    /// Inspects the file, reporting progress through `progress`.
    async fn verify(
        &self,
        file: &FileCandidate,
        progress: &ProgressReporter,
    ) -> Result<Verdict, BoxError>;
}

// ============================================================================
// REFINEMENTS
// ============================================================================

impl<T: Output + FileLike> Node<T> {
    /// Restricts the probed category to `categories`.
    pub fn accept(
        &self,
        categories: impl IntoIterator<Item = FileCategory>,
        message: Option<&str>,
    ) -> Self {
        let allowed: Arc<[FileCategory]> = categories.into_iter().collect();
        let message = message.map_or_else(
            || format!("File type must be one of: {}", join_display(allowed.iter())),
            str::to_owned,
        );
        self.refine_with(move |value: T, ctx: EvalContext| {
            let allowed = Arc::clone(&allowed);
            let message = message.clone();
            async move {
                let Some(file) = value.file().cloned() else {
                    return Ok(Outcome::Valid(value));
                };
                let category = probe_category(&ctx, &file).await?;
                if allowed.contains(&category) {
                    Ok(Outcome::Valid(value))
                } else {
                    Ok(Outcome::invalid(ctx.description(), message))
                }
            }
        })
    }

    /// Rejects files larger than `megabytes`.
    pub fn max_size(&self, megabytes: f64, message: Option<&str>) -> Self {
        let limit = megabytes_to_bytes(megabytes);
        let message = message.map_or_else(
            || format!("File must be at most {megabytes} MB"),
            str::to_owned,
        );
        self.refine_sync(move |value, ctx| {
            if value.file().is_some_and(|file| file.size() as f64 > limit) {
                return Outcome::invalid(ctx.description(), message.clone());
            }
            Outcome::Valid(value)
        })
    }

    /// Requires the file name to match `pattern`.
    pub fn name_matches(&self, pattern: Regex, message: Option<&str>) -> Self {
        let message = message.map_or_else(
            || format!("File name must match pattern {}", pattern.as_str()),
            str::to_owned,
        );
        self.refine_sync(move |value, ctx| {
            if value.file().is_some_and(|file| !pattern.is_match(file.name())) {
                return Outcome::invalid(ctx.description(), message.clone());
            }
            Outcome::Valid(value)
        })
    }

    /// Restricts the file extension to `allowed`.
    ///
    /// When the extension table knows the extension, the probed category must
    /// also match the table's category.
    pub fn extensions<I, S>(&self, allowed: I, message: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed: Arc<[String]> = allowed
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        let caller_message = message.map(str::to_owned);
        let not_allowed = caller_message
            .clone()
            .unwrap_or_else(|| format!("File extension must be one of: {}", allowed.join(", ")));
        self.refine_with(move |value: T, ctx: EvalContext| {
            let allowed = Arc::clone(&allowed);
            let caller_message = caller_message.clone();
            let not_allowed = not_allowed.clone();
            async move {
                let Some(file) = value.file().cloned() else {
                    return Ok(Outcome::Valid(value));
                };
                let Some(extension) = file.extension().filter(|ext| allowed.contains(ext)) else {
                    return Ok(Outcome::invalid(ctx.description(), not_allowed));
                };
                if let Some(expected) = FileCategory::from_extension(&extension) {
                    let actual = probe_category(&ctx, &file).await?;
                    if actual != expected {
                        let message = caller_message.unwrap_or_else(|| {
                            format!("File content does not match its .{extension} extension")
                        });
                        return Ok(Outcome::invalid(ctx.description(), message));
                    }
                }
                Ok(Outcome::Valid(value))
            }
        })
    }

    /// Checks a predicate over the gathered [`FileMetadata`].
    pub fn metadata<F>(&self, predicate: F, message: Option<&str>) -> Self
    where
        F: Fn(&FileMetadata) -> bool + Send + Sync + 'static,
    {
        let predicate = Arc::new(predicate);
        let message = message.unwrap_or("File metadata is invalid").to_owned();
        self.refine_with(move |value: T, ctx: EvalContext| {
            let predicate = Arc::clone(&predicate);
            let message = message.clone();
            async move {
                let Some(file) = value.file().cloned() else {
                    return Ok(Outcome::Valid(value));
                };
                let metadata = FileMetadata::gather(&ctx, &file).await?;
                if predicate(&metadata) {
                    Ok(Outcome::Valid(value))
                } else {
                    Ok(Outcome::invalid(ctx.description(), message))
                }
            }
        })
    }

    /// Delegates the decision to an external [`Verifier`].
    ///
    /// A rejection becomes a validation error; a verifier error aborts the
    /// evaluation with [`Fault::External`].
    pub fn verify_with(&self, verifier: Arc<dyn Verifier>, message: Option<&str>) -> Self {
        let message = message.map(str::to_owned);
        self.refine_with(move |value: T, ctx: EvalContext| {
            let verifier = Arc::clone(&verifier);
            let message = message.clone();
            async move {
                let Some(file) = value.file().cloned() else {
                    return Ok(Outcome::Valid(value));
                };
                let reporter = ctx.reporter();
                match ctx.guard(verifier.verify(&file, &reporter)).await? {
                    Ok(Verdict::Accepted) => Ok(Outcome::Valid(value)),
                    Ok(Verdict::Rejected(reason)) => {
                        let message = message
                            .or(reason)
                            .unwrap_or_else(|| "File was rejected".to_owned());
                        Ok(Outcome::invalid(ctx.description(), message))
                    }
                    Err(source) => {
                        tracing::warn!(
                            verifier = verifier.name(),
                            path = ctx.path(),
                            error = %source,
                            "file verification failed"
                        );
                        Err(Fault::External {
                            check: verifier.name().to_owned(),
                            source,
                        })
                    }
                }
            }
        })
    }
}

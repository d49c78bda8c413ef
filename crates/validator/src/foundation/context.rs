//! Evaluation context threaded through a node tree.

use super::Candidate;
use crate::error::Fault;
use crate::media::{HeaderProbe, MediaProbe};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Stage every node registers at construction.
pub const DEFAULT_STAGE: &str = "default";

// ============================================================================
// PROGRESS
// ============================================================================

/// A single progress report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ProgressUpdate {
    /// Completion percentage, 0 to 100
    Percent(u8),
    /// Free-form stage label such as "uploading"
    Stage(String),
}

/// Progress report qualified by the field path that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub path: String,
    pub update: ProgressUpdate,
}

/// Receiver of progress reports.
pub type ProgressSink = Arc<dyn Fn(Progress) + Send + Sync>;

/// Handle given to verifiers for reporting progress at one field path.
#[derive(Clone)]
pub struct ProgressReporter {
    path: Arc<str>,
    sink: Option<ProgressSink>,
}

impl ProgressReporter {
    /// Reports a completion percentage. Values above 100 are clamped.
    pub fn percent(&self, percent: u8) {
        self.emit(ProgressUpdate::Percent(percent.min(100)));
    }

    /// Reports a stage label.
    pub fn stage(&self, label: impl Into<String>) {
        self.emit(ProgressUpdate::Stage(label.into()));
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    fn emit(&self, update: ProgressUpdate) {
        if let Some(sink) = &self.sink {
            sink(Progress {
                path: self.path.to_string(),
                update,
            });
        }
    }
}

impl fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("path", &self.path)
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

// ============================================================================
// EVAL CONTEXT
// ============================================================================

/// Per-call evaluation context.
///
/// Carries the parent structure, the stage name, the cancellation token, the
/// progress sink and the media probe. Combinators derive child contexts that
/// qualify the field path; everything else is shared.
#[derive(Clone)]
pub struct EvalContext {
    parent: Option<Arc<Candidate>>,
    stage: Arc<str>,
    cancellation: CancellationToken,
    progress: Option<ProgressSink>,
    probe: Arc<dyn MediaProbe>,
    path: Arc<str>,
    description: Arc<str>,
}

impl EvalContext {
    /// A context on the default stage with the bundled [`HeaderProbe`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: None,
            stage: Arc::from(DEFAULT_STAGE),
            cancellation: CancellationToken::new(),
            progress: None,
            probe: Arc::new(HeaderProbe),
            path: Arc::from(""),
            description: Arc::from(crate::node::DEFAULT_DESCRIPTION),
        }
    }

    /// Sets the parent structure seen by conditional nodes.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_parent(mut self, parent: Candidate) -> Self {
        self.parent = Some(Arc::new(parent));
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_stage(mut self, stage: &str) -> Self {
        self.stage = Arc::from(stage);
        self
    }

    /// Attach a cancellation token.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_progress<F>(mut self, sink: F) -> Self
    where
        F: Fn(Progress) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(sink));
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_probe(mut self, probe: Arc<dyn MediaProbe>) -> Self {
        self.probe = probe;
        self
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Candidate> {
        self.parent.as_deref()
    }

    #[must_use]
    pub fn stage(&self) -> &str {
        &self.stage
    }

    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Shared handle to the media probe.
    #[must_use]
    pub fn probe(&self) -> Arc<dyn MediaProbe> {
        Arc::clone(&self.probe)
    }

    /// Dot-joined field path of the node being evaluated; empty at the root.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Description of the node being evaluated, used as the error key for
    /// failures detected at that node.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Progress handle for the current field path.
    #[must_use]
    pub fn reporter(&self) -> ProgressReporter {
        ProgressReporter {
            path: Arc::clone(&self.path),
            sink: self.progress.clone(),
        }
    }

    pub(crate) fn child(&self, segment: &str) -> Self {
        let mut child = self.clone();
        child.path = if self.path.is_empty() {
            Arc::from(segment)
        } else {
            Arc::from(format!("{}.{segment}", self.path))
        };
        child
    }

    pub(crate) fn with_parent_shared(mut self, parent: Arc<Candidate>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub(crate) fn for_node(&self, description: &Arc<str>) -> Self {
        let mut scoped = self.clone();
        scoped.description = Arc::clone(description);
        scoped
    }

    pub(crate) fn ensure_active(&self) -> Result<(), Fault> {
        if self.cancellation.is_cancelled() {
            return Err(Fault::Cancelled);
        }
        Ok(())
    }

    /// Races `fut` against the cancellation token.
    pub(crate) async fn guard<F>(&self, fut: F) -> Result<F::Output, Fault>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            () = self.cancellation.cancelled() => Err(Fault::Cancelled),
            output = fut => Ok(output),
        }
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EvalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvalContext")
            .field("stage", &self.stage)
            .field("path", &self.path)
            .field("description", &self.description)
            .field("has_parent", &self.parent.is_some())
            .field("has_progress", &self.progress.is_some())
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_child_paths() {
        let ctx = EvalContext::new();
        assert_eq!(ctx.path(), "");
        let photos = ctx.child("photos");
        assert_eq!(photos.child("2").path(), "photos.2");
    }

    #[test]
    fn test_reporter_qualifies_path_and_clamps() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let ctx = EvalContext::new().with_progress(move |p| sink.lock().unwrap().push(p));
        let reporter = ctx.child("avatar").reporter();
        reporter.percent(250);
        reporter.stage("scanning");
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                Progress {
                    path: "avatar".into(),
                    update: ProgressUpdate::Percent(100)
                },
                Progress {
                    path: "avatar".into(),
                    update: ProgressUpdate::Stage("scanning".into())
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_guard_returns_cancelled() {
        let token = CancellationToken::new();
        let ctx = EvalContext::new().with_cancellation(token.clone());
        token.cancel();
        let result = ctx.guard(std::future::pending::<()>()).await;
        assert!(matches!(result, Err(Fault::Cancelled)));
        assert!(ctx.ensure_active().is_err());
    }

    #[tokio::test]
    async fn test_guard_passes_output() {
        let ctx = EvalContext::new();
        assert_eq!(ctx.guard(async { 7 }).await.unwrap(), 7);
    }
}

//! Form controller wiring change, blur and submit events to validation.

use crate::state::FormState;
use formguard_validator::media::MediaProbe;
use formguard_validator::{Candidate, EvalContext, Fault, FieldErrors, Node, Outcome, Progress};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
struct Shared {
    state: FormState,
    /// Identifies the latest validation; older ones may not write state
    generation: u64,
    pending: CancellationToken,
}

/// Headless controller holding a form's value and validation state.
///
/// Every event stores the new value, marks the field touched and evaluates
/// the node against the full current value. A newer event cancels the
/// validation still in flight, and only the latest validation writes errors.
/// Handles are cheap to clone and share the same state.
pub struct FormController<T> {
    node: Node<T>,
    initial: Candidate,
    stage: Option<String>,
    submit_stage: Option<String>,
    probe: Option<Arc<dyn MediaProbe>>,
    shared: Arc<Mutex<Shared>>,
}

impl<T> Clone for FormController<T> {
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
            initial: self.initial.clone(),
            stage: self.stage.clone(),
            submit_stage: self.submit_stage.clone(),
            probe: self.probe.clone(),
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> std::fmt::Debug for FormController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("node", &self.node)
            .field("stage", &self.stage)
            .field("submit_stage", &self.submit_stage)
            .field("state", &self.shared.lock().state)
            .finish()
    }
}

impl<T: Clone + Send + Sync + 'static> FormController<T> {
    pub fn new(node: Node<T>, initial: impl Into<Candidate>) -> Self {
        let initial = initial.into();
        Self {
            node,
            shared: Arc::new(Mutex::new(Shared {
                state: FormState::new(initial.clone()),
                generation: 0,
                pending: CancellationToken::new(),
            })),
            initial,
            stage: None,
            submit_stage: None,
            probe: None,
        }
    }

    /// Stage used for change and blur validation.
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    /// Stage used for submit validation; defaults to the change stage.
    pub fn with_submit_stage(mut self, stage: impl Into<String>) -> Self {
        self.submit_stage = Some(stage.into());
        self
    }

    pub fn with_probe(mut self, probe: Arc<dyn MediaProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    // ------------------------------------------------------------------------
    // State access
    // ------------------------------------------------------------------------

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> FormState {
        self.shared.lock().state.clone()
    }

    #[must_use]
    pub fn value(&self) -> Candidate {
        self.shared.lock().state.value.clone()
    }

    #[must_use]
    pub fn errors(&self) -> FieldErrors {
        self.shared.lock().state.errors.clone()
    }

    #[must_use]
    pub fn error(&self, field: &str) -> Option<String> {
        self.shared.lock().state.error(field).map(str::to_owned)
    }

    #[must_use]
    pub fn is_touched(&self, field: &str) -> bool {
        self.shared.lock().state.is_touched(field)
    }

    #[must_use]
    pub fn is_validating(&self) -> bool {
        self.shared.lock().state.validating
    }

    /// The value differs from the initial one.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.shared.lock().state.value != self.initial
    }

    // ------------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------------

    /// Stores `value` at the dot-separated `field` path and validates.
    pub async fn change(
        &self,
        field: &str,
        value: impl Into<Candidate>,
    ) -> Result<Outcome<T>, Fault> {
        {
            let mut shared = self.shared.lock();
            shared.state.value.set_pointer(field, value.into());
            shared.state.touched.insert(field.to_owned());
        }
        tracing::trace!(field, "form change");
        self.validate(self.stage.as_deref()).await
    }

    /// Marks `field` touched and validates.
    pub async fn blur(&self, field: &str) -> Result<Outcome<T>, Fault> {
        self.shared.lock().state.touched.insert(field.to_owned());
        tracing::trace!(field, "form blur");
        self.validate(self.stage.as_deref()).await
    }

    /// Marks every field touched, counts the attempt and validates with the
    /// submit stage.
    pub async fn submit(&self) -> Result<Outcome<T>, Fault> {
        {
            let mut shared = self.shared.lock();
            let paths = shared.state.field_paths();
            shared.state.touched.extend(paths);
            shared.state.submit_count += 1;
        }
        let stage = self.submit_stage.as_deref().or(self.stage.as_deref());
        let outcome = self.validate(stage).await?;
        if let Outcome::Invalid(errors) = &outcome {
            let mut shared = self.shared.lock();
            shared.state.touched.extend(errors.keys().map(str::to_owned));
        }
        tracing::debug!(valid = outcome.is_valid(), "form submitted");
        Ok(outcome)
    }

    /// Restores the initial value and clears all validation state. A
    /// validation in flight is cancelled.
    pub fn reset(&self) {
        let mut shared = self.shared.lock();
        shared.pending.cancel();
        shared.pending = CancellationToken::new();
        shared.generation += 1;
        shared.state = FormState::new(self.initial.clone());
    }

    async fn validate(&self, stage: Option<&str>) -> Result<Outcome<T>, Fault> {
        let (value, token, generation) = {
            let mut shared = self.shared.lock();
            shared.pending.cancel();
            shared.pending = CancellationToken::new();
            shared.generation += 1;
            shared.state.validating = true;
            shared.state.progress.clear();
            (
                shared.state.value.clone(),
                shared.pending.clone(),
                shared.generation,
            )
        };

        let sink = Arc::clone(&self.shared);
        let mut ctx = EvalContext::new()
            .with_cancellation(token)
            .with_progress(move |progress: Progress| {
                let mut shared = sink.lock();
                if shared.generation == generation {
                    shared.state.progress.insert(progress.path, progress.update);
                }
            });
        if let Some(stage) = stage {
            ctx = ctx.with_stage(stage);
        }
        if let Some(probe) = &self.probe {
            ctx = ctx.with_probe(Arc::clone(probe));
        }

        let result = self.node.evaluate_safe(value, &ctx).await;

        let mut shared = self.shared.lock();
        if shared.generation == generation {
            shared.state.validating = false;
            match &result {
                Ok(Outcome::Valid(_)) => shared.state.errors = FieldErrors::new(),
                Ok(Outcome::Invalid(errors)) => shared.state.errors = errors.clone(),
                Err(fault) => tracing::warn!(error = %fault, "form validation aborted"),
            }
        } else {
            tracing::trace!(generation, "discarding superseded validation");
        }
        result
    }
}

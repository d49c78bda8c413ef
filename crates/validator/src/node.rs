//! The validation node.
//!
//! A [`Node`] wraps one evaluation function per stage together with a
//! description, an optional output transform and an optional outcome cache.
//! Every builder method takes `&self` and returns a new node; the receiver
//! and its evaluation functions are never mutated.
//!
//! ```rust,ignore
//! use formguard_validator::prelude::*;
//!
//! let username = text()
//!     .min_length(3, None)
//!     .max_length(20, Some("Pick a shorter name"))
//!     .describe("username");
//!
//! let outcome = username.evaluate("al".into()).await?;
//! assert_eq!(outcome.errors().unwrap().get("username"), Some("Must be at least 3 characters"));
//! ```

use crate::combinators::cached::{CacheStats, DEFAULT_CACHE_CAPACITY, OutcomeCache, cache_key};
use crate::error::{BoxError, Error, Fault, Result};
use crate::foundation::{Candidate, DEFAULT_STAGE, EvalContext, Outcome, Record};
use futures::future::{self, BoxFuture};
use indexmap::IndexMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Description carried by nodes nobody has described yet.
pub const DEFAULT_DESCRIPTION: &str = "value";

/// Bound shared by every node output type.
pub trait Output: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Output for T {}

pub(crate) type EvalFuture<T> = BoxFuture<'static, std::result::Result<Outcome<T>, Fault>>;

/// Type-erased evaluation function of one stage.
pub(crate) type EvalFn<T> = Arc<dyn Fn(Candidate, EvalContext) -> EvalFuture<T> + Send + Sync>;

type TransformFn<T> = Arc<dyn Fn(T) -> T + Send + Sync>;

static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

fn next_revision() -> u64 {
    NEXT_REVISION.fetch_add(1, Ordering::Relaxed)
}

// ============================================================================
// STAGE TABLE
// ============================================================================

/// Stage name to evaluation function. The default stage always exists.
pub(crate) struct StageTable<T> {
    default: EvalFn<T>,
    named: IndexMap<String, EvalFn<T>>,
}

impl<T> Clone for StageTable<T> {
    fn clone(&self) -> Self {
        Self {
            default: Arc::clone(&self.default),
            named: self.named.clone(),
        }
    }
}

impl<T> StageTable<T> {
    fn new(default: EvalFn<T>) -> Self {
        Self {
            default,
            named: IndexMap::new(),
        }
    }

    fn resolve(&self, stage: &str) -> &EvalFn<T> {
        if stage == DEFAULT_STAGE {
            return &self.default;
        }
        self.named.get(stage).unwrap_or_else(|| {
            tracing::debug!(stage, "stage not registered, using default");
            &self.default
        })
    }

    fn map(&self, f: impl Fn(EvalFn<T>) -> EvalFn<T>) -> Self {
        Self {
            default: f(Arc::clone(&self.default)),
            named: self
                .named
                .iter()
                .map(|(name, eval)| (name.clone(), f(Arc::clone(eval))))
                .collect(),
        }
    }
}

// ============================================================================
// NODE
// ============================================================================

/// Immutable validator descriptor producing `Outcome<T>`.
pub struct Node<T> {
    description: Arc<str>,
    stages: StageTable<T>,
    transform: Option<TransformFn<T>>,
    cache: Option<OutcomeCache<T>>,
    revision: u64,
}

impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        Self {
            description: Arc::clone(&self.description),
            stages: self.stages.clone(),
            transform: self.transform.clone(),
            cache: self.cache.clone(),
            revision: self.revision,
        }
    }
}

impl<T> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("description", &self.description)
            .field("stages", &self.stage_names().collect::<Vec<_>>())
            .field("has_transform", &self.transform.is_some())
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

impl<T> Node<T> {
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Registered stage names, `"default"` first.
    pub fn stage_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(DEFAULT_STAGE).chain(self.stages.named.keys().map(String::as_str))
    }

    #[must_use]
    pub fn has_stage(&self, name: &str) -> bool {
        name == DEFAULT_STAGE || self.stages.named.contains_key(name)
    }

    #[must_use]
    pub fn has_transform(&self) -> bool {
        self.transform.is_some()
    }

    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    /// The chain-wide cache storage, if caching is enabled.
    #[must_use]
    pub fn cache_handle(&self) -> Option<&OutcomeCache<T>> {
        self.cache.as_ref()
    }

    /// Clone with a fresh cache namespace.
    fn derive(&self) -> Self {
        let mut node = self.clone();
        node.revision = next_revision();
        node
    }
}

impl<T: Output> Node<T> {
    /// Creates a node from an asynchronous validator.
    pub fn new<F, Fut>(validator: F) -> Self
    where
        F: Fn(Candidate, EvalContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<Outcome<T>, Fault>> + Send + 'static,
    {
        Self::from_eval(Arc::new(move |candidate: Candidate, ctx: EvalContext| -> EvalFuture<T> {
            Box::pin(validator(candidate, ctx))
        }))
    }

    /// Creates a node from a synchronous validator.
    pub fn from_fn<F>(validator: F) -> Self
    where
        F: Fn(Candidate, &EvalContext) -> Outcome<T> + Send + Sync + 'static,
    {
        Self::from_eval(Arc::new(move |candidate: Candidate, ctx: EvalContext| -> EvalFuture<T> {
            Box::pin(future::ready(Ok(validator(candidate, &ctx))))
        }))
    }

    pub(crate) fn from_eval(eval: EvalFn<T>) -> Self {
        Self {
            description: Arc::from(DEFAULT_DESCRIPTION),
            stages: StageTable::new(eval),
            transform: None,
            cache: None,
            revision: next_revision(),
        }
    }

    // ------------------------------------------------------------------------
    // Evaluation
    // ------------------------------------------------------------------------

    /// Evaluates the candidate and returns the outcome.
    ///
    /// With a cache enabled, a hit returns the stored outcome without running
    /// any validator.
    pub async fn evaluate_safe(
        &self,
        candidate: Candidate,
        ctx: &EvalContext,
    ) -> std::result::Result<Outcome<T>, Fault> {
        self.execute(candidate, ctx.clone(), true).await
    }

    /// Evaluates the candidate and returns the validated value, or the first
    /// error of the map as [`Error::Invalid`].
    pub async fn evaluate_or_throw(&self, candidate: Candidate, ctx: &EvalContext) -> Result<T> {
        match self.execute(candidate, ctx.clone(), false).await? {
            Outcome::Valid(value) => Ok(value),
            Outcome::Invalid(errors) => Err(Error::invalid(errors, &self.description)),
        }
    }

    /// [`evaluate_safe`](Self::evaluate_safe) with a default context.
    pub async fn evaluate(&self, candidate: Candidate) -> std::result::Result<Outcome<T>, Fault> {
        self.evaluate_safe(candidate, &EvalContext::new()).await
    }

    /// Evaluation used by parents for their children.
    pub(crate) fn run(&self, candidate: Candidate, ctx: EvalContext) -> EvalFuture<T> {
        let node = self.clone();
        Box::pin(async move { node.execute(candidate, ctx, true).await })
    }

    /// Evaluation used by wrappers (`optional`, `map`, `when` branches) that
    /// stand in for this node. An undescribed node reports under the wrapper's description.
    pub(crate) fn run_delegated(&self, candidate: Candidate, ctx: EvalContext) -> EvalFuture<T> {
        let mut node = self.clone();
        if *node.description == *DEFAULT_DESCRIPTION {
            node.description = Arc::from(ctx.description());
        }
        Box::pin(async move { node.execute(candidate, ctx, true).await })
    }

    async fn execute(
        &self,
        candidate: Candidate,
        ctx: EvalContext,
        use_cache: bool,
    ) -> std::result::Result<Outcome<T>, Fault> {
        ctx.ensure_active()?;

        let cache = self.cache.as_ref().filter(|_| use_cache);
        let key = cache.map(|_| cache_key(ctx.stage(), &candidate));
        if let (Some(cache), Some(key)) = (cache, key.as_deref()) {
            if let Some(hit) = cache.get(self.revision, &self.description, key) {
                tracing::debug!(node = %self.description, key, "cache hit");
                return Ok(hit);
            }
            tracing::debug!(node = %self.description, key, "cache miss");
        }

        let eval = Arc::clone(self.stages.resolve(ctx.stage()));
        let outcome = match eval(candidate, ctx.for_node(&self.description)).await? {
            Outcome::Valid(value) => Outcome::Valid(match &self.transform {
                Some(transform) => transform(value),
                None => value,
            }),
            invalid @ Outcome::Invalid(_) => invalid,
        };

        if let (Some(cache), Some(key)) = (cache, key) {
            cache.insert(self.revision, &self.description, key, outcome.clone());
        }
        Ok(outcome)
    }

    // ------------------------------------------------------------------------
    // Derivation
    // ------------------------------------------------------------------------

    /// Sets the description used as the error key.
    pub fn describe(&self, description: impl Into<String>) -> Self {
        let mut node = self.derive();
        node.description = Arc::from(description.into());
        node
    }

    /// Sets the transform applied to successful results.
    pub fn with_transform<F>(&self, transform: F) -> Self
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        let mut node = self.derive();
        node.transform = Some(Arc::new(transform));
        node
    }

    /// Enables an outcome cache with the default capacity.
    pub fn cached(&self) -> Self {
        self.cached_with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Enables an outcome cache holding at most `capacity` outcomes.
    pub fn cached_with_capacity(&self, capacity: u64) -> Self {
        let mut node = self.derive();
        node.cache = Some(OutcomeCache::new(capacity));
        node
    }

    /// Disables caching for the returned node.
    pub fn uncached(&self) -> Self {
        let mut node = self.derive();
        node.cache = None;
        node
    }

    /// Clears the cache storage shared by this node's chain.
    pub fn reset_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    #[must_use]
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(OutcomeCache::stats)
    }

    /// Registers a named stage.
    ///
    /// The returned node carries a copy of this node's stages plus `name`,
    /// evaluated by the default stage of `build(self)`. Transforms of the
    /// built node are not carried over; the transform stays a property of the
    /// returned node.
    pub fn with_stage(&self, name: impl Into<String>, build: impl FnOnce(&Self) -> Self) -> Self {
        let staged = build(self);
        let mut node = self.derive();
        let name = name.into();
        if name == DEFAULT_STAGE {
            node.stages.default = staged.stages.default;
        } else {
            node.stages.named.insert(name, staged.stages.default);
        }
        node
    }

    /// Chooses between two derived nodes per call.
    ///
    /// `predicate` sees the parent context (an empty record when there is
    /// none). Only the chosen branch is evaluated, as a node of its own: its
    /// description, transform and cache apply. An undescribed branch reports
    /// under this node's description. The transform of `self` is left to the
    /// branches, so a branch derived from `self` applies it once.
    pub fn when<P>(
        &self,
        predicate: P,
        then: impl FnOnce(&Self) -> Self,
        otherwise: impl FnOnce(&Self) -> Self,
    ) -> Self
    where
        P: Fn(&Candidate) -> bool + Send + Sync + 'static,
    {
        let then_branch = then(self);
        let otherwise_branch = otherwise(self);
        let empty = Candidate::Record(Record::new());
        let dispatch: EvalFn<T> = Arc::new(move |candidate: Candidate, ctx: EvalContext| -> EvalFuture<T> {
            let branch = if predicate(ctx.parent().unwrap_or(&empty)) {
                &then_branch
            } else {
                &otherwise_branch
            };
            branch.run_delegated(candidate, ctx)
        });
        let mut node = self.derive();
        node.stages = StageTable::new(dispatch);
        node.transform = None;
        node
    }

    /// Accepts an absent candidate as `None`; anything else is delegated.
    pub fn optional(&self) -> Node<Option<T>> {
        let inner = self.clone();
        let mut node = Node::from_eval(Arc::new(move |candidate: Candidate, ctx: EvalContext| -> EvalFuture<Option<T>> {
            if candidate.is_absent() {
                return Box::pin(future::ready(Ok(Outcome::Valid(None))));
            }
            let run = inner.run_delegated(candidate, ctx);
            Box::pin(async move { Ok(run.await?.map(Some)) })
        }));
        node.description = Arc::clone(&self.description);
        node
    }

    /// Maps the validated value into another type.
    pub fn map<U, F>(&self, f: F) -> Node<U>
    where
        U: Output,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let inner = self.clone();
        let f = Arc::new(f);
        let mut node = Node::from_eval(Arc::new(move |candidate: Candidate, ctx: EvalContext| -> EvalFuture<U> {
            let run = inner.run_delegated(candidate, ctx);
            let f = Arc::clone(&f);
            Box::pin(async move { Ok(run.await?.map(|value| f(value))) })
        }));
        node.description = Arc::clone(&self.description);
        node
    }

    /// Type-erased view producing a [`Candidate`].
    pub fn erased(&self) -> Node<Candidate>
    where
        T: Into<Candidate>,
    {
        self.map(Into::into)
    }

    // ------------------------------------------------------------------------
    // Refinement
    // ------------------------------------------------------------------------

    /// Wraps every stage with `check`, which runs only on a valid base.
    pub(crate) fn refine_with<F, Fut>(&self, check: F) -> Self
    where
        F: Fn(T, EvalContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<Outcome<T>, Fault>> + Send + 'static,
    {
        let check = Arc::new(check);
        let mut node = self.derive();
        node.stages = self.stages.map(|base| {
            let check = Arc::clone(&check);
            Arc::new(move |candidate: Candidate, ctx: EvalContext| -> EvalFuture<T> {
                let base = Arc::clone(&base);
                let check = Arc::clone(&check);
                Box::pin(async move {
                    match base(candidate, ctx.clone()).await? {
                        Outcome::Valid(value) => check(value, ctx).await,
                        invalid @ Outcome::Invalid(_) => Ok(invalid),
                    }
                })
            })
        });
        node
    }

    /// Synchronous variant of [`refine_with`](Self::refine_with).
    pub(crate) fn refine_sync<F>(&self, check: F) -> Self
    where
        F: Fn(T, &EvalContext) -> Outcome<T> + Send + Sync + 'static,
    {
        let check = Arc::new(check);
        self.refine_with(move |value, ctx| {
            let outcome = check(value, &ctx);
            future::ready(Ok(outcome))
        })
    }

    /// Adds a synchronous predicate.
    pub fn refine<F>(&self, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        self.refine_sync(move |value, ctx| {
            if predicate(&value) {
                Outcome::Valid(value)
            } else {
                Outcome::invalid(ctx.description(), message.clone())
            }
        })
    }

    /// Adds an externally delegated asynchronous check.
    ///
    /// `Ok(false)` rejects the value with `message` (or `"Invalid value"`);
    /// an `Err` aborts the evaluation with [`Fault::External`].
    pub fn check_async<F, Fut>(&self, name: &str, check: F, message: Option<&str>) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<bool, BoxError>> + Send + 'static,
    {
        let name: Arc<str> = Arc::from(name);
        let message = message.unwrap_or("Invalid value").to_owned();
        let check = Arc::new(check);
        self.refine_with(move |value: T, ctx| {
            let pending = check(value.clone());
            let name = Arc::clone(&name);
            let message = message.clone();
            async move {
                match ctx.guard(pending).await? {
                    Ok(true) => Ok(Outcome::Valid(value)),
                    Ok(false) => Ok(Outcome::invalid(ctx.description(), message)),
                    Err(source) => {
                        tracing::warn!(check = %name, path = ctx.path(), error = %source, "external check failed");
                        Err(Fault::External {
                            check: name.to_string(),
                            source,
                        })
                    }
                }
            }
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{number, text};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::AtomicUsize;
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn test_default_description_is_error_key() {
        let outcome = text().evaluate(Candidate::from(5)).await.unwrap();
        assert_eq!(outcome, Outcome::invalid("value", "Expected a string"));
    }

    #[tokio::test]
    async fn test_describe_changes_key_and_keeps_receiver() {
        let base = text();
        let named = base.describe("username");
        assert_eq!(base.description(), "value");
        assert_eq!(
            named.evaluate(Candidate::Null).await.unwrap(),
            Outcome::invalid("username", "Expected a string")
        );
    }

    #[tokio::test]
    async fn test_transform_applies_on_success() {
        let node = text().with_transform(|s| s.trim().to_lowercase());
        assert_eq!(
            node.evaluate(Candidate::from("  Alice ")).await.unwrap(),
            Outcome::Valid("alice".to_owned())
        );
        assert!(!text().has_transform());
    }

    #[tokio::test]
    async fn test_evaluate_or_throw_returns_first_error() {
        let err = number()
            .describe("age")
            .evaluate_or_throw(Candidate::from("x"), &EvalContext::new())
            .await
            .unwrap_err();
        match err {
            Error::Invalid { field, message, .. } => {
                assert_eq!(field, "age");
                assert_eq!(message, "Expected a number");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_evaluate_or_throw_bypasses_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let node = Node::from_fn(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Outcome::Valid(1u8)
        })
        .cached();
        node.evaluate(Candidate::Null).await.unwrap();
        node.evaluate_or_throw(Candidate::Null, &EvalContext::new())
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_refine_short_circuits_on_base_failure() {
        let refined = text().refine(|s| s.len() > 100, "too short");
        assert_eq!(
            refined.evaluate(Candidate::Bool(true)).await.unwrap(),
            text().evaluate(Candidate::Bool(true)).await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_with_stage_returns_new_node() {
        let base = text();
        let staged = base.with_stage("strict", |n| n.min_length(5, None));
        assert!(!base.has_stage("strict"));
        assert_eq!(staged.stage_names().collect::<Vec<_>>(), vec!["default", "strict"]);

        let strict = EvalContext::new().with_stage("strict");
        assert!(staged.evaluate(Candidate::from("abc")).await.unwrap().is_valid());
        assert!(
            staged
                .evaluate_safe(Candidate::from("abc"), &strict)
                .await
                .unwrap()
                .is_invalid()
        );
    }

    #[tokio::test]
    async fn test_unknown_stage_falls_back_to_default() {
        let staged = text().with_stage("strict", |n| n.min_length(5, None));
        let ctx = EvalContext::new().with_stage("missing");
        assert!(staged.evaluate_safe(Candidate::from("abc"), &ctx).await.unwrap().is_valid());
    }

    #[tokio::test]
    async fn test_refinement_after_stage_wraps_every_stage() {
        let node = text()
            .with_stage("strict", |n| n.min_length(2, None))
            .max_length(4, None);
        let strict = EvalContext::new().with_stage("strict");
        assert!(
            node.evaluate_safe(Candidate::from("toolong"), &strict)
                .await
                .unwrap()
                .is_invalid()
        );
    }

    #[tokio::test]
    async fn test_when_selects_branch_from_parent() {
        let node = text().when(
            |parent| parent.get("kind").and_then(Candidate::as_text) == Some("premium"),
            |n| n.min_length(5, Some("premium needs 5")),
            |n| n.clone(),
        );
        let premium = EvalContext::new().with_parent(Candidate::record([("kind", "premium".into())]));
        let basic = EvalContext::new().with_parent(Candidate::record([("kind", "basic".into())]));

        assert_eq!(
            node.evaluate_safe(Candidate::from("abc"), &premium).await.unwrap(),
            Outcome::invalid("value", "premium needs 5")
        );
        assert!(node.evaluate_safe(Candidate::from("abc"), &basic).await.unwrap().is_valid());
        assert!(node.evaluate(Candidate::from("abc")).await.unwrap().is_valid());
    }

    #[tokio::test]
    async fn test_when_branch_keeps_its_description() {
        let node = text().describe("company").when(
            |parent| parent.get("employed").and_then(Candidate::as_bool) == Some(true),
            |n| n.min_length(2, Some("too short")).describe("employer"),
            |n| n.clone(),
        );
        let employed = EvalContext::new().with_parent(Candidate::record([("employed", true.into())]));
        let idle = EvalContext::new().with_parent(Candidate::record([("employed", false.into())]));

        assert_eq!(
            node.evaluate_safe(Candidate::from("a"), &employed).await.unwrap(),
            Outcome::invalid("employer", "too short")
        );
        assert_eq!(
            node.evaluate_safe(Candidate::from(1), &idle).await.unwrap(),
            Outcome::invalid("company", "Expected a string")
        );
    }

    #[tokio::test]
    async fn test_when_applies_base_transform_once() {
        let node = text()
            .with_transform(|s| format!("{s}!"))
            .when(|_| true, |n| n.clone(), |n| n.clone());
        assert_eq!(
            node.evaluate(Candidate::from("hi")).await.unwrap(),
            Outcome::Valid("hi!".to_owned())
        );
    }

    #[tokio::test]
    async fn test_when_branch_cache_is_used() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let node = Node::from_fn(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Outcome::Valid(1u8)
        })
        .when(|_| true, Node::cached, |n| n.clone());
        node.evaluate(Candidate::Null).await.unwrap();
        node.evaluate(Candidate::Null).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_optional_accepts_absent_only() {
        let node = text().optional();
        assert_eq!(node.evaluate(Candidate::Absent).await.unwrap(), Outcome::Valid(None));
        assert_eq!(
            node.evaluate(Candidate::from("x")).await.unwrap(),
            Outcome::Valid(Some("x".to_owned()))
        );
        assert!(node.evaluate(Candidate::Null).await.unwrap().is_invalid());
    }

    #[tokio::test]
    async fn test_cancelled_context_faults() {
        let token = CancellationToken::new();
        token.cancel();
        let ctx = EvalContext::new().with_cancellation(token);
        let result = text().evaluate_safe(Candidate::from("x"), &ctx).await;
        assert!(matches!(result, Err(Fault::Cancelled)));
    }

    #[tokio::test]
    async fn test_check_async_rejects_and_faults() {
        let node = number().check_async(
            "positive",
            |n| async move {
                if n > 1000.0 {
                    Err::<bool, BoxError>("service unavailable".into())
                } else {
                    Ok(n > 0.0)
                }
            },
            Some("Must be positive"),
        );
        assert_eq!(
            node.evaluate(Candidate::from(-1)).await.unwrap(),
            Outcome::invalid("value", "Must be positive")
        );
        assert!(node.evaluate(Candidate::from(1)).await.unwrap().is_valid());
        let fault = node.evaluate(Candidate::from(5000)).await.unwrap_err();
        assert!(matches!(fault, Fault::External { ref check, .. } if check == "positive"));
    }
}

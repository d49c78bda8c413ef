//! Form controller behavior against real validation nodes.

use async_trait::async_trait;
use formguard_form::FormController;
use formguard_validator::prelude::*;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

fn signup() -> Node<Record> {
    record(
        Shape::new()
            .field("username", text().min_length(3, None))
            .field(
                "bio",
                text()
                    .optional()
                    .with_stage("submit", |base| {
                        base.refine(Option::is_some, "Tell us about yourself")
                    }),
            ),
    )
}

fn empty() -> Candidate {
    Candidate::record::<&str, _>([])
}

#[tokio::test]
async fn change_marks_touched_and_stores_errors() {
    let form = FormController::new(signup(), empty());

    let outcome = form.change("username", "al").await.unwrap();
    assert!(outcome.is_invalid());

    let state = form.snapshot();
    assert!(state.is_touched("username"));
    assert!(!state.is_touched("bio"));
    assert_eq!(state.error("username"), Some("Must be at least 3 characters"));
    assert_eq!(
        state.value.pointer("username").and_then(Candidate::as_text),
        Some("al")
    );
    assert!(!state.validating);
    assert!(form.is_dirty());
}

#[tokio::test]
async fn errors_clear_when_valid() {
    let form = FormController::new(signup(), empty());
    form.change("username", "al").await.unwrap();
    form.change("username", "alice").await.unwrap();
    assert!(form.errors().is_empty());
}

#[tokio::test]
async fn blur_touches_without_changing_value() {
    let form = FormController::new(signup(), empty());
    form.blur("username").await.unwrap();

    let state = form.snapshot();
    assert!(state.is_touched("username"));
    assert_eq!(state.value, empty());
    assert_eq!(state.error("username"), Some("Expected a string"));
    assert_eq!(state.visible_errors().count(), 1);
}

#[tokio::test]
async fn submit_uses_submit_stage_and_touches_everything() {
    let form = FormController::new(signup(), empty()).with_submit_stage("submit");
    form.change("username", "alice").await.unwrap();
    assert!(form.errors().is_empty());

    let outcome = form.submit().await.unwrap();
    assert!(outcome.is_invalid());

    let state = form.snapshot();
    assert_eq!(state.submit_count, 1);
    assert!(state.is_touched("bio"));
    assert_eq!(state.error("bio"), Some("Tell us about yourself"));
}

#[tokio::test]
async fn reset_restores_initial_state() {
    let form = FormController::new(signup(), empty());
    form.change("username", "al").await.unwrap();
    form.reset();

    let state = form.snapshot();
    assert_eq!(state.value, empty());
    assert!(state.errors.is_empty());
    assert!(state.touched.is_empty());
    assert!(!form.is_dirty());
}

#[tokio::test]
async fn state_serializes_for_bindings() {
    let form = FormController::new(signup(), empty());
    form.change("username", "al").await.unwrap();

    let json = serde_json::to_value(form.snapshot()).unwrap();
    assert_eq!(json["touched"], serde_json::json!(["username"]));
    assert_eq!(json["errors"]["username"], "Must be at least 3 characters");
    assert_eq!(json["validating"], false);
}

// ============================================================================
// PROGRESS AND SUPERSEDED VALIDATIONS
// ============================================================================

struct SlowScanner;

#[async_trait]
impl Verifier for SlowScanner {
    fn name(&self) -> &str {
        "slow-scanner"
    }

    async fn verify(
        &self,
        _file: &FileCandidate,
        progress: &ProgressReporter,
    ) -> Result<Verdict, BoxError> {
        progress.percent(50);
        tokio::time::sleep(Duration::from_secs(10)).await;
        progress.percent(100);
        Ok(Verdict::Accepted)
    }
}

fn gallery() -> Node<Record> {
    record(Shape::new().field(
        "photos",
        sequence(file().verify_with(Arc::new(SlowScanner), None)),
    ))
}

fn photos(count: usize) -> Candidate {
    Candidate::list(
        (0..count)
            .map(|i| FileCandidate::new(format!("{i}.png"), "image/png", vec![0u8; 4]))
            .collect::<Vec<_>>(),
    )
}

#[tokio::test(start_paused = true)]
async fn progress_is_visible_while_validating() {
    let form = FormController::new(gallery(), empty());
    let task = {
        let form = form.clone();
        tokio::spawn(async move { form.change("photos", photos(2)).await })
    };

    tokio::time::sleep(Duration::from_secs(1)).await;
    let state = form.snapshot();
    assert!(state.validating);
    assert_eq!(
        state.progress.get("photos.1"),
        Some(&ProgressUpdate::Percent(50))
    );

    assert!(task.await.unwrap().unwrap().is_valid());
    let state = form.snapshot();
    assert!(!state.validating);
    assert_eq!(
        state.progress.get("photos.1"),
        Some(&ProgressUpdate::Percent(100))
    );
}

#[tokio::test(start_paused = true)]
async fn newer_change_cancels_validation_in_flight() {
    let form = FormController::new(gallery(), empty());
    let first = {
        let form = form.clone();
        tokio::spawn(async move { form.change("photos", photos(1)).await })
    };
    tokio::time::sleep(Duration::from_secs(1)).await;

    let second = form.change("photos", Candidate::from("not a list")).await.unwrap();
    assert!(second.is_invalid());
    assert!(matches!(first.await.unwrap(), Err(Fault::Cancelled)));

    let state = form.snapshot();
    assert!(!state.validating);
    assert_eq!(state.error("photos"), Some("Expected an array"));
}

//! Bundled schemas.

use anyhow::Context;
use formguard_validator::prelude::*;
use formguard_validator::ValidatorConfig;
use regex::Regex;

/// Names accepted by `formguard check`.
pub const NAMES: &[&str] = &["signup", "gallery"];

/// Builds the schema called `name`.
pub fn build(name: &str, config: &ValidatorConfig) -> anyhow::Result<Node<Candidate>> {
    match name {
        "signup" => signup(),
        "gallery" => gallery(config),
        other => anyhow::bail!(
            "unknown schema '{other}' (available: {})",
            NAMES.join(", ")
        ),
    }
}

fn regex(pattern: &str) -> anyhow::Result<Regex> {
    Regex::new(pattern).with_context(|| format!("invalid pattern {pattern}"))
}

/// Account signup.
///
/// Usernames are stored lowercased. `company` is required for business plans,
/// and `bio` only when the form is checked with the `submit` stage.
pub fn signup() -> anyhow::Result<Node<Candidate>> {
    let username = text()
        .min_length(3, None)
        .max_length(20, None)
        .pattern(
            regex(r"^[A-Za-z0-9_]+$")?,
            Some("Only letters, digits and underscores"),
        )
        .with_transform(|name| name.to_lowercase());
    let email = text().pattern(
        regex(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")?,
        Some("Enter a valid email address"),
    );
    let plan = text().refine(
        |plan| matches!(plan.as_str(), "basic" | "business"),
        "Plan must be basic or business",
    );
    let company = text().optional().when(
        |parent| parent.get("plan").and_then(Candidate::as_text) == Some("business"),
        |base| base.refine(Option::is_some, "Company is required for business plans"),
        Clone::clone,
    );
    let bio = text()
        .max_length(280, None)
        .optional()
        .with_stage("submit", |base| {
            base.refine(Option::is_some, "Tell us about yourself")
        });

    let shape = Shape::new()
        .field("username", username)
        .field("email", email)
        .field("plan", plan)
        .field("company", company)
        .field("bio", bio)
        .field("password", text().min_length(8, None))
        .field("confirm", text());

    Ok(record(shape)
        .form_rule(|values| {
            if values.get("password") == values.get("confirm") {
                Ok(())
            } else {
                Err("Passwords do not match".to_owned())
            }
        })
        .describe("signup")
        .erased())
}

/// Photo gallery with an optional cover image.
pub fn gallery(config: &ValidatorConfig) -> anyhow::Result<Node<Candidate>> {
    let photo = image(5.0, DimensionBounds::new().min_width(320).min_height(240))
        .extensions(["jpg", "jpeg", "png", "gif", "webp"], None);
    let cover = image(2.0, DimensionBounds::new().max_width(4096).max_height(4096)).optional();

    let shape = Shape::new()
        .field("title", text().min_length(1, None).max_length(80, None))
        .field("photos", config.sequence(photo)?)
        .field("cover", cover);

    Ok(record(shape).describe("gallery").erased())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn errors(outcome: Outcome<Candidate>) -> Vec<String> {
        outcome
            .errors()
            .map(|errors| errors.keys().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    fn signup_input(plan: &str, company: Option<&str>) -> Candidate {
        Candidate::record([
            ("username", Candidate::from("Ann_42")),
            ("email", "ann@example.com".into()),
            ("plan", plan.into()),
            ("company", company.into()),
            ("password", "hunter22".into()),
            ("confirm", "hunter22".into()),
        ])
    }

    #[tokio::test]
    async fn signup_accepts_basic_plan() {
        let schema = signup().unwrap();
        let outcome = schema.evaluate(signup_input("basic", None)).await.unwrap();
        let values = outcome.value().unwrap();
        assert_eq!(values.get("username").and_then(Candidate::as_text), Some("ann_42"));
    }

    #[tokio::test]
    async fn signup_business_requires_company() {
        let schema = signup().unwrap();
        let outcome = schema.evaluate(signup_input("business", None)).await.unwrap();
        assert_eq!(errors(outcome), ["company"]);

        let outcome = schema
            .evaluate(signup_input("business", Some("Acme")))
            .await
            .unwrap();
        assert!(outcome.is_valid());
    }

    #[tokio::test]
    async fn signup_submit_stage_requires_bio() {
        let schema = signup().unwrap();
        let submit = EvalContext::new().with_stage("submit");
        let outcome = schema
            .evaluate_safe(signup_input("basic", None), &submit)
            .await
            .unwrap();
        assert_eq!(errors(outcome), ["bio"]);
    }

    #[tokio::test]
    async fn signup_password_mismatch_is_a_form_error() {
        let mut input = signup_input("basic", None);
        input.set_pointer("confirm", "hunter23".into());
        let outcome = signup().unwrap().evaluate(input).await.unwrap();
        assert_eq!(errors(outcome), [FORM_ERROR_KEY]);
    }

    #[tokio::test]
    async fn gallery_reports_photo_index() {
        let schema = gallery(&ValidatorConfig::default()).unwrap();
        let input = Candidate::record([
            ("title", Candidate::from("Trip")),
            (
                "photos",
                Candidate::list(vec![FileCandidate::new("notes.txt", "text/plain", &b"hi"[..])]),
            ),
        ]);
        let outcome = schema.evaluate(input).await.unwrap();
        assert_eq!(
            outcome.errors().and_then(|e| e.get("0.value")),
            Some("File must be an image")
        );
    }

    #[test]
    fn unknown_schema_lists_names() {
        let err = build("checkout", &ValidatorConfig::default()).unwrap_err();
        assert!(err.to_string().contains("signup, gallery"));
    }
}

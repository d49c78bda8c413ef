//! Text refinements
//!
//! Length is measured in Unicode scalar values (chars). Values that carry no
//! text (an absent optional, a non-text candidate) pass through.

use crate::foundation::{Outcome, TextLike};
use crate::node::{Node, Output};
use regex::Regex;

impl<T: Output + TextLike> Node<T> {
    /// Requires at least `min` characters.
    pub fn min_length(&self, min: usize, message: Option<&str>) -> Self {
        let message = message.map_or_else(
            || format!("Must be at least {min} characters"),
            str::to_owned,
        );
        self.refine_sync(move |value, ctx| {
            if value.text().is_some_and(|text| text.chars().count() < min) {
                return Outcome::invalid(ctx.description(), message.clone());
            }
            Outcome::Valid(value)
        })
    }

    /// Allows at most `max` characters.
    pub fn max_length(&self, max: usize, message: Option<&str>) -> Self {
        let message = message.map_or_else(
            || format!("Must be at most {max} characters"),
            str::to_owned,
        );
        self.refine_sync(move |value, ctx| {
            if value.text().is_some_and(|text| text.chars().count() > max) {
                return Outcome::invalid(ctx.description(), message.clone());
            }
            Outcome::Valid(value)
        })
    }

    /// Requires the text to match `pattern`.
    pub fn pattern(&self, pattern: Regex, message: Option<&str>) -> Self {
        let message = message.map_or_else(
            || format!("Must match pattern {}", pattern.as_str()),
            str::to_owned,
        );
        self.refine_sync(move |value, ctx| {
            if value.text().is_some_and(|text| !pattern.is_match(text)) {
                return Outcome::invalid(ctx.description(), message.clone());
            }
            Outcome::Valid(value)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::foundation::{Candidate, Outcome};
    use crate::{any, text};
    use pretty_assertions::assert_eq;
    use regex::Regex;

    #[tokio::test]
    async fn test_min_length_counts_chars() {
        let node = text().min_length(3, None);
        assert!(node.evaluate("héé".into()).await.unwrap().is_valid());
        assert_eq!(
            node.evaluate("hé".into()).await.unwrap(),
            Outcome::invalid("value", "Must be at least 3 characters")
        );
    }

    #[tokio::test]
    async fn test_max_length_custom_message() {
        let node = text().max_length(2, Some("Too long")).describe("code");
        assert_eq!(
            node.evaluate("abc".into()).await.unwrap(),
            Outcome::invalid("code", "Too long")
        );
    }

    #[tokio::test]
    async fn test_pattern() {
        let node = text().pattern(Regex::new("^[a-z]+$").unwrap(), None);
        assert!(node.evaluate("abc".into()).await.unwrap().is_valid());
        assert_eq!(
            node.evaluate("ab1".into()).await.unwrap(),
            Outcome::invalid("value", "Must match pattern ^[a-z]+$")
        );
    }

    #[tokio::test]
    async fn test_optional_text_passes_when_absent() {
        let node = text().optional().min_length(5, None);
        assert_eq!(node.evaluate(Candidate::Absent).await.unwrap(), Outcome::Valid(None));
        assert!(node.evaluate("abc".into()).await.unwrap().is_invalid());
    }

    #[tokio::test]
    async fn test_non_text_candidate_passes() {
        let node = any().max_length(1, None);
        assert!(node.evaluate(42.into()).await.unwrap().is_valid());
        assert!(node.evaluate("ab".into()).await.unwrap().is_invalid());
    }
}

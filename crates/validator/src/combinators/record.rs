//! RECORD combinator - validates a keyed structure field by field
//!
//! Every declared field is evaluated concurrently with the whole raw
//! candidate as its parent context, so conditional fields can look at their
//! siblings. Field errors are merged flat, unprefixed.

use crate::foundation::{Candidate, EvalContext, FieldErrors, Outcome, Record};
use crate::node::{DEFAULT_DESCRIPTION, EvalFuture, Node, Output};
use futures::future::{self, join_all};
use std::sync::Arc;

/// Error key of a failed form rule.
pub const FORM_ERROR_KEY: &str = "form";

/// Declared fields of a record, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    fields: Vec<(String, Node<Candidate>)>,
}

impl Shape {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a field.
    ///
    /// A node still carrying the default description is labelled with the
    /// field name, which then keys its errors.
    #[must_use = "builder methods must be chained or built"]
    pub fn field<T>(mut self, name: impl Into<String>, node: Node<T>) -> Self
    where
        T: Output + Into<Candidate>,
    {
        let name = name.into();
        let node = if node.description() == DEFAULT_DESCRIPTION {
            node.describe(name.clone())
        } else {
            node
        };
        self.fields.push((name, node.erased()));
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Validates a record against `shape`.
pub fn record(shape: Shape) -> Node<Record> {
    let fields = Arc::new(shape.fields);
    Node::from_eval(Arc::new(
        move |candidate: Candidate, ctx: EvalContext| -> EvalFuture<Record> {
            let fields = Arc::clone(&fields);
            Box::pin(async move {
                let parent = Arc::new(candidate);
                let Candidate::Record(raw) = parent.as_ref() else {
                    return Ok(Outcome::invalid(ctx.description(), "Expected an object"));
                };
                let scope = ctx.clone().with_parent_shared(Arc::clone(&parent));

                let results = join_all(fields.iter().map(|(name, node)| {
                    let value = raw.get(name).cloned().unwrap_or_default();
                    let run = node.run(value, scope.child(name));
                    async move { (name, run.await) }
                }))
                .await;

                let mut values = Record::with_capacity(fields.len());
                let mut errors = FieldErrors::new();
                for (name, result) in results {
                    match result? {
                        Outcome::Valid(value) => {
                            values.insert(name.clone(), value);
                        }
                        Outcome::Invalid(field_errors) => errors.merge(field_errors),
                    }
                }

                if errors.is_empty() {
                    Ok(Outcome::Valid(values))
                } else {
                    Ok(Outcome::Invalid(errors))
                }
            })
        },
    ))
}

impl Node<Record> {
    /// Attaches a cross-field rule run after every field succeeded.
    ///
    /// An `Err(message)` becomes a single [`FORM_ERROR_KEY`] entry.
    pub fn form_rule<F>(&self, rule: F) -> Self
    where
        F: Fn(&Record) -> Result<(), String> + Send + Sync + 'static,
    {
        self.refine_with(move |values, _ctx| {
            future::ready(Ok(match rule(&values) {
                Ok(()) => Outcome::Valid(values),
                Err(message) => Outcome::invalid(FORM_ERROR_KEY, message),
            }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{number, text};
    use pretty_assertions::assert_eq;

    fn person() -> Node<Record> {
        record(Shape::new().field("name", text()).field("age", text()))
    }

    #[tokio::test]
    async fn test_record_reports_only_failing_fields() {
        let candidate = Candidate::record([("name", 123.into()), ("age", "5".into())]);
        assert_eq!(
            person().evaluate(candidate).await.unwrap(),
            Outcome::invalid("name", "Expected a string")
        );
    }

    #[tokio::test]
    async fn test_record_unions_errors() {
        let candidate = Candidate::record([("name", 1.into()), ("age", 2.into())]);
        let outcome = person().evaluate(candidate).await.unwrap();
        assert_eq!(outcome.errors().unwrap().keys().collect::<Vec<_>>(), vec!["name", "age"]);
    }

    #[tokio::test]
    async fn test_missing_fields_are_absent() {
        let node = record(Shape::new().field("nickname", text().optional()));
        let outcome = node.evaluate(Candidate::record::<&str, _>([])).await.unwrap();
        assert_eq!(outcome.value().map(Record::len), Some(1));
        assert_eq!(outcome.value().and_then(|r| r.get("nickname")), Some(&Candidate::Absent));
    }

    #[tokio::test]
    async fn test_explicit_description_is_kept() {
        let node = record(Shape::new().field("age", number().describe("Age in years")));
        let candidate = Candidate::record([("age", "old".into())]);
        assert_eq!(
            node.evaluate(candidate).await.unwrap(),
            Outcome::invalid("Age in years", "Expected a number")
        );
    }

    #[tokio::test]
    async fn test_record_rejects_non_record() {
        assert_eq!(
            person().evaluate(Candidate::list(["a"])).await.unwrap(),
            Outcome::invalid("value", "Expected an object")
        );
    }

    #[tokio::test]
    async fn test_nested_errors_are_not_prefixed() {
        let node = record(Shape::new().field("profile", person()));
        let candidate = Candidate::record([(
            "profile",
            Candidate::record([("name", "x".into()), ("age", false.into())]),
        )]);
        assert_eq!(
            node.evaluate(candidate).await.unwrap(),
            Outcome::invalid("age", "Expected a string")
        );
    }

    #[tokio::test]
    async fn test_fields_see_siblings_as_parent() {
        let company = text().optional().when(
            |parent| parent.get("plan").and_then(Candidate::as_text) == Some("business"),
            |n| n.refine(Option::is_some, "Company is required"),
            |n| n.clone(),
        );
        let node = record(Shape::new().field("plan", text()).field("company", company));

        let business = Candidate::record([("plan", "business".into())]);
        assert_eq!(
            node.evaluate(business).await.unwrap(),
            Outcome::invalid("company", "Company is required")
        );
        let basic = Candidate::record([("plan", "basic".into())]);
        assert!(node.evaluate(basic).await.unwrap().is_valid());
    }

    #[tokio::test]
    async fn test_form_rule_runs_after_fields() {
        let node = record(
            Shape::new()
                .field("password", text())
                .field("confirm", text()),
        )
        .form_rule(|values| {
            if values.get("password") == values.get("confirm") {
                Ok(())
            } else {
                Err("Passwords do not match".to_owned())
            }
        });

        let mismatch = Candidate::record([("password", "a".into()), ("confirm", "b".into())]);
        assert_eq!(
            node.evaluate(mismatch).await.unwrap(),
            Outcome::invalid(FORM_ERROR_KEY, "Passwords do not match")
        );

        let broken = Candidate::record([("password", 1.into()), ("confirm", "b".into())]);
        assert_eq!(
            node.evaluate(broken).await.unwrap(),
            Outcome::invalid("password", "Expected a string")
        );
    }
}

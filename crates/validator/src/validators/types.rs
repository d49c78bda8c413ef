//! Base-type constructors
//!
//! Each accepts exactly one [`Candidate`] variant and fails with a single
//! entry keyed by the node's description otherwise.

use crate::foundation::{Candidate, EvalContext, FileCandidate, Outcome};
use crate::node::{Node, Output};

/// Accepts text.
pub fn text() -> Node<String> {
    Node::from_fn(|candidate, ctx| match candidate {
        Candidate::Text(value) => Outcome::Valid(value),
        _ => Outcome::invalid(ctx.description(), "Expected a string"),
    })
}

/// Accepts finite numbers.
pub fn number() -> Node<f64> {
    Node::from_fn(|candidate, ctx| match candidate {
        Candidate::Number(value) if value.is_finite() => Outcome::Valid(value),
        _ => Outcome::invalid(ctx.description(), "Expected a number"),
    })
}

/// Accepts booleans.
pub fn boolean() -> Node<bool> {
    Node::from_fn(|candidate, ctx| match candidate {
        Candidate::Bool(value) => Outcome::Valid(value),
        _ => Outcome::invalid(ctx.description(), "Expected a boolean"),
    })
}

/// Accepts file-like values.
pub fn file() -> Node<FileCandidate> {
    Node::from_fn(|candidate, ctx| match candidate {
        Candidate::Binary(value) => Outcome::Valid(value),
        _ => Outcome::invalid(ctx.description(), "Expected a file"),
    })
}

/// Accepts anything, including an absent value.
pub fn any() -> Node<Candidate> {
    Node::from_fn(|candidate, _| Outcome::Valid(candidate))
}

/// Node built from a caller-supplied synchronous validator.
pub fn custom<T, F>(validator: F) -> Node<T>
where
    T: Output,
    F: Fn(Candidate, &EvalContext) -> Outcome<T> + Send + Sync + 'static,
{
    Node::from_fn(validator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_base_types_accept_their_variant() {
        assert_eq!(
            text().evaluate("a".into()).await.unwrap(),
            Outcome::Valid("a".to_owned())
        );
        assert_eq!(number().evaluate(2.5.into()).await.unwrap(), Outcome::Valid(2.5));
        assert_eq!(boolean().evaluate(true.into()).await.unwrap(), Outcome::Valid(true));
        let upload = FileCandidate::new("a.txt", "text/plain", b"hi".to_vec());
        assert_eq!(
            file().evaluate(upload.clone().into()).await.unwrap(),
            Outcome::Valid(upload)
        );
        assert_eq!(any().evaluate(Candidate::Absent).await.unwrap(), Outcome::Valid(Candidate::Absent));
    }

    #[tokio::test]
    async fn test_wrong_variant_yields_single_entry() {
        assert_eq!(
            text().evaluate(1.into()).await.unwrap(),
            Outcome::invalid("value", "Expected a string")
        );
        assert_eq!(
            file().evaluate("x".into()).await.unwrap(),
            Outcome::invalid("value", "Expected a file")
        );
        assert_eq!(
            number().evaluate(Candidate::Number(f64::INFINITY)).await.unwrap(),
            Outcome::invalid("value", "Expected a number")
        );
        assert_eq!(
            boolean().describe("agree").evaluate(Candidate::Absent).await.unwrap(),
            Outcome::invalid("agree", "Expected a boolean")
        );
    }

    #[tokio::test]
    async fn test_custom() {
        let even = custom(|candidate, ctx| match candidate.as_number() {
            Some(n) if n % 2.0 == 0.0 => Outcome::Valid(n as i64),
            _ => Outcome::invalid(ctx.description(), "Expected an even number"),
        });
        assert_eq!(even.evaluate(4.into()).await.unwrap(), Outcome::Valid(4));
        assert!(even.evaluate(3.into()).await.unwrap().is_invalid());
    }
}

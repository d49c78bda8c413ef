//! SEQUENCE combinator - validates every element of a list
//!
//! Items are evaluated in fixed-size batches: the futures of one batch are
//! joined, and the next batch starts only after the previous one finished.
//! Errors of all batches are merged and keyed `"<index>.<child key>"`.

use crate::error::{Error, Result};
use crate::foundation::{Candidate, EvalContext, FieldErrors, Outcome};
use crate::node::{EvalFuture, Node, Output};
use futures::future::join_all;
use std::sync::Arc;

/// Items evaluated concurrently by [`sequence`].
pub const DEFAULT_BATCH_SIZE: usize = 4;

/// Validates a list whose items all satisfy `item`.
pub fn sequence<T: Output>(item: Node<T>) -> Node<Vec<T>> {
    build(item, DEFAULT_BATCH_SIZE)
}

/// [`sequence`] with an explicit batch size.
pub fn sequence_batched<T: Output>(item: Node<T>, batch_size: usize) -> Result<Node<Vec<T>>> {
    if batch_size == 0 {
        return Err(Error::Configuration(
            "sequence batch size must be at least 1".to_owned(),
        ));
    }
    Ok(build(item, batch_size))
}

fn build<T: Output>(item: Node<T>, batch_size: usize) -> Node<Vec<T>> {
    Node::from_eval(Arc::new(
        move |candidate: Candidate, ctx: EvalContext| -> EvalFuture<Vec<T>> {
            let item = item.clone();
            Box::pin(async move {
                let Candidate::List(items) = candidate else {
                    return Ok(Outcome::invalid(ctx.description(), "Expected an array"));
                };

                let total = items.len();
                let mut values = Vec::with_capacity(total);
                let mut errors = FieldErrors::new();
                let mut pending = items.into_iter().enumerate();

                loop {
                    let batch: Vec<_> = pending.by_ref().take(batch_size).collect();
                    let Some(&(first, _)) = batch.first() else {
                        break;
                    };
                    ctx.ensure_active()?;
                    tracing::trace!(path = ctx.path(), first, len = batch.len(), total, "sequence batch");

                    let results = join_all(batch.into_iter().map(|(index, element)| {
                        let child = ctx.child(&index.to_string());
                        let run = item.run(element, child);
                        async move { (index, run.await) }
                    }))
                    .await;

                    for (index, result) in results {
                        match result? {
                            Outcome::Valid(value) => values.push(value),
                            Outcome::Invalid(child) => {
                                errors.merge(child.prefixed(&index.to_string()));
                            }
                        }
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

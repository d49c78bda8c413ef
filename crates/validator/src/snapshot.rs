//! Serializable node snapshots.
//!
//! Evaluation functions cannot be serialized, so a snapshot records them as
//! the `"opaque"` placeholder. A node rebuilt from a snapshot accepts anything
//! and keeps only the description.

use crate::foundation::Candidate;
use crate::node::{Node, Output};
use crate::validators::any;
use serde::{Deserialize, Serialize};

/// Placeholder for non-serializable functions.
pub const OPAQUE: &str = "opaque";

/// Serialized form of a [`Node`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub description: String,
    pub validator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
}

impl<T: Output> Node<T> {
    /// Captures the serializable parts of this node.
    #[must_use]
    pub fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot {
            description: self.description().to_owned(),
            validator: OPAQUE.to_owned(),
            transform: self.has_transform().then(|| OPAQUE.to_owned()),
        }
    }
}

impl Node<Candidate> {
    /// Rebuilds a pass-through node carrying the snapshot's description.
    #[must_use]
    pub fn from_snapshot(snapshot: &NodeSnapshot) -> Self {
        any().describe(snapshot.description.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_snapshot_json() {
        let node = text().describe("username");
        assert_eq!(
            serde_json::to_value(node.snapshot()).unwrap(),
            json!({"description": "username", "validator": "opaque"})
        );
        let trimmed = node.with_transform(|s| s.trim().to_owned());
        assert_eq!(
            serde_json::to_value(trimmed.snapshot()).unwrap(),
            json!({"description": "username", "validator": "opaque", "transform": "opaque"})
        );
    }

    #[tokio::test]
    async fn test_restored_node_loses_validation() {
        let snapshot: NodeSnapshot =
            serde_json::from_value(json!({"description": "age", "validator": "opaque"})).unwrap();
        let restored = Node::from_snapshot(&snapshot);
        assert_eq!(restored.description(), "age");
        assert!(restored.evaluate(Candidate::Bool(false)).await.unwrap().is_valid());
        assert_eq!(restored.snapshot(), snapshot);
    }
}

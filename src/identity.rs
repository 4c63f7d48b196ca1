//! Local node identity binding.
//!
//! Signing, verifying, and sending all run on behalf of a node identity:
//! the node name plus the process identifier of the client on that node.
//! Without both, the client operates disconnected (reads only).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Node name, e.g. `alice.os`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Process identifier on a node, e.g. `sigil:sigil:template.os`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessId(pub String);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bound node identity. Both halves are required; a partial identity is
/// no identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub node: NodeId,
    pub process: ProcessId,
}

impl Identity {
    /// Build an identity when both parts are present.
    pub fn from_parts(node: Option<String>, process: Option<String>) -> Option<Self> {
        match (node, process) {
            (Some(node), Some(process)) => Some(Self {
                node: NodeId(node),
                process: ProcessId(process),
            }),
            _ => None,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.node, self.process)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_requires_both() {
        assert!(Identity::from_parts(Some("alice.os".into()), Some("sigil:sigil:x".into())).is_some());
        assert!(Identity::from_parts(Some("alice.os".into()), None).is_none());
        assert!(Identity::from_parts(None, Some("sigil:sigil:x".into())).is_none());
        assert!(Identity::from_parts(None, None).is_none());
    }

    #[test]
    fn test_display() {
        let identity = Identity::from_parts(
            Some("alice.os".to_string()),
            Some("sigil:sigil:template.os".to_string()),
        )
        .unwrap();
        assert_eq!(identity.to_string(), "alice.os@sigil:sigil:template.os");
    }
}

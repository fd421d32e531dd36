//! Back-reference stripping and tree serialization.

use serde_json::Value;

use crate::node::IntermediateNode;

/// Remove every host back-reference from the trees in place.
///
/// Total and idempotent: the tree shape is untouched and a second pass
/// changes nothing.
pub fn strip_origins(nodes: &mut [IntermediateNode]) {
    for node in nodes {
        node.origin = None;
        strip_origins(&mut node.children);
    }
}

/// A stripped copy of the trees.
pub fn stripped(nodes: &[IntermediateNode]) -> Vec<IntermediateNode> {
    let mut copy = nodes.to_vec();
    strip_origins(&mut copy);
    copy
}

/// JSON form of the trees without back-references.
pub fn to_json(nodes: &[IntermediateNode]) -> Value {
    serde_json::to_value(stripped(nodes)).unwrap_or(Value::Null)
}

//! Host type tag classification.

use scenecode_core::HostNode;

/// What a host type tag means before style is considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    Container,
    Rectangle,
    Text,
    Vector,
    Boolean,
    Unsupported,
}

/// Classify a host node by its type tag.
pub fn classify(node: &HostNode) -> HostKind {
    match node.node_type.as_str() {
        "FRAME" | "GROUP" | "COMPONENT" | "COMPONENT_SET" | "INSTANCE" | "SECTION" => {
            HostKind::Container
        }
        "RECTANGLE" => HostKind::Rectangle,
        "TEXT" => HostKind::Text,
        "VECTOR" | "STAR" | "LINE" | "ELLIPSE" | "POLYGON" => HostKind::Vector,
        "BOOLEAN_OPERATION" => HostKind::Boolean,
        _ => HostKind::Unsupported,
    }
}

/// Whether a subtree is made only of vector content and can be flattened
/// into a single image.
///
/// Leaves qualify when they are vectors or boolean operations; containers
/// qualify when they have at least one visible child and every visible child
/// qualifies.
pub fn is_vector_subtree(node: &HostNode) -> bool {
    match classify(node) {
        HostKind::Vector | HostKind::Boolean => true,
        HostKind::Container => {
            node.image_fill().is_none() && {
                let mut visible = node.children.iter().filter(|c| c.visible).peekable();
                visible.peek().is_some() && visible.all(is_vector_subtree)
            }
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenecode_core::Paint;

    #[test]
    fn test_classify_tags() {
        assert_eq!(classify(&HostNode::new("1", "a", "INSTANCE")), HostKind::Container);
        assert_eq!(classify(&HostNode::new("1", "a", "ELLIPSE")), HostKind::Vector);
        assert_eq!(classify(&HostNode::new("1", "a", "STICKY")), HostKind::Unsupported);
    }

    #[test]
    fn test_vector_subtree() {
        let icon = HostNode::new("g", "Icon", "GROUP")
            .with_child(HostNode::new("v1", "Path", "VECTOR"))
            .with_child(HostNode::new("b", "Union", "BOOLEAN_OPERATION"));
        assert!(is_vector_subtree(&icon));

        let mixed = icon.clone().with_child(HostNode::new("t", "Label", "TEXT"));
        assert!(!is_vector_subtree(&mixed));

        assert!(!is_vector_subtree(&HostNode::new("e", "Empty", "FRAME")));

        let with_image = icon.with_fill(Paint::image("abc"));
        assert!(!is_vector_subtree(&with_image));
    }
}

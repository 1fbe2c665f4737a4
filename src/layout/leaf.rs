use std::sync::Arc;

use super::core::Layoutable;
use super::final_node::FinalLayoutable;
use super::specs::{EdgeInsets, InsetLayoutSpec};

/// Leaf node standing in for a displayable element (text, image, view).
#[derive(Debug, Clone, PartialEq)]
pub struct LeafNode {
    id: String,
    final_insets: Option<EdgeInsets>,
}

impl LeafNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            final_insets: None,
        }
    }

    /// Lay this leaf out inside a final inset spec wrapping itself.
    pub fn with_final_insets(mut self, insets: EdgeInsets) -> Self {
        self.final_insets = Some(insets);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn final_insets(&self) -> Option<EdgeInsets> {
        self.final_insets
    }
}

impl Layoutable for LeafNode {
    fn kind(&self) -> &str {
        "leaf"
    }

    fn identifier(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn final_layoutable(self: Arc<Self>) -> Option<FinalLayoutable> {
        let insets = self.final_insets?;
        Some(FinalLayoutable::build(move |spec| {
            let mut inset = InsetLayoutSpec::with_spec(spec, insets);
            inset.set_child(self);
            inset
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutElement, same_node, substitute_for};

    #[test]
    fn leaf_without_insets_has_no_substitute() {
        let node: LayoutElement = Arc::new(LeafNode::new("plain"));
        assert!(Arc::clone(&node).final_layoutable().is_none());
        assert!(same_node(&substitute_for(&node), &node));
    }

    #[test]
    fn leaf_with_insets_wraps_itself() {
        let insets = EdgeInsets::uniform(10.0);
        let node: LayoutElement = Arc::new(LeafNode::new("padded").with_final_insets(insets));

        let substitute = substitute_for(&node);
        assert_eq!(substitute.kind(), "inset");
        let spec = substitute.as_spec().unwrap();
        assert!(spec.is_final());
        assert!(same_node(spec.child_at(0).unwrap(), &node));
    }

    #[test]
    fn each_query_builds_a_fresh_substitute() {
        let node: LayoutElement =
            Arc::new(LeafNode::new("padded").with_final_insets(EdgeInsets::uniform(1.0)));
        let first = substitute_for(&node);
        let second = substitute_for(&node);
        assert!(!same_node(&first, &second));
    }
}

use std::collections::BTreeMap;
use std::sync::Arc;

use super::core::{LayoutElement, Layoutable, substitute_for};

/// Indexed child storage shared by every layout spec.
///
/// Indices are caller chosen and may be sparse. Concrete specs give the
/// indices meaning through named accessors (an inset spec keeps its child at
/// `0`, a background spec keeps its background at `1`, and so on).
///
/// A spec is only marked final at construction, through
/// [`FinalLayoutable::build`](super::FinalLayoutable::build). There is no way
/// to flip the flag once children are attached:
///
/// ```compile_fail
/// use std::sync::Arc;
/// use layout_spec::{LayoutElement, LayoutSpec, LeafNode};
///
/// let mut spec = LayoutSpec::new();
/// let leaf: LayoutElement = Arc::new(LeafNode::new("title"));
/// spec.set_child(leaf, 0);
/// spec.set_final(true);
/// ```
#[derive(Debug, Default)]
pub struct LayoutSpec {
    children: BTreeMap<usize, LayoutElement>,
    is_final: bool,
}

impl LayoutSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty spec already flagged final. Only the substitute builder hands
    /// these out, so no child can be attached before the flag is set.
    pub(super) fn new_final() -> Self {
        Self {
            children: BTreeMap::new(),
            is_final: true,
        }
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Store `child` at `index`, returning the previous occupant if any.
    pub fn set_child(&mut self, child: LayoutElement, index: usize) -> Option<LayoutElement> {
        self.children.insert(index, child)
    }

    pub fn child_at(&self, index: usize) -> Option<&LayoutElement> {
        self.children.get(&index)
    }

    pub fn remove_child(&mut self, index: usize) -> Option<LayoutElement> {
        self.children.remove(&index)
    }

    /// Convenience for single-child specs: the child at index `0`.
    pub fn set_primary_child(&mut self, child: LayoutElement) -> Option<LayoutElement> {
        self.set_child(child, 0)
    }

    pub fn primary_child(&self) -> Option<&LayoutElement> {
        self.child_at(0)
    }

    /// Replace every child with `children`, stored at `0..n`.
    pub fn set_children(&mut self, children: impl IntoIterator<Item = LayoutElement>) {
        self.children = children.into_iter().enumerate().collect();
    }

    /// Children in ascending index order.
    pub fn children(&self) -> impl Iterator<Item = (usize, &LayoutElement)> {
        self.children.iter().map(|(index, child)| (*index, child))
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// One past the highest occupied index, or `None` once `usize::MAX` is taken.
    pub fn next_index(&self) -> Option<usize> {
        match self.children.last_key_value() {
            Some((index, _)) => index.checked_add(1),
            None => Some(0),
        }
    }

    /// The node to lay out for `child` during this pass.
    ///
    /// A final spec never substitutes its children. That is what stops a
    /// substitute wrapping its original node from asking it again.
    pub fn resolve_substitute(&self, child: &LayoutElement) -> LayoutElement {
        if self.is_final {
            return Arc::clone(child);
        }
        substitute_for(child)
    }
}

impl Layoutable for LayoutSpec {
    fn kind(&self) -> &str {
        "spec"
    }

    fn as_spec(&self) -> Option<&LayoutSpec> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{EdgeInsets, LeafNode, same_node};

    fn leaf(id: &str) -> LayoutElement {
        Arc::new(LeafNode::new(id))
    }

    #[test]
    fn child_absent_until_set() {
        let mut spec = LayoutSpec::new();
        assert!(spec.child_at(3).is_none());

        let node = leaf("a");
        spec.set_child(Arc::clone(&node), 3);
        assert!(same_node(spec.child_at(3).unwrap(), &node));
    }

    #[test]
    fn overwrite_releases_previous_child() {
        let mut spec = LayoutSpec::new();
        let first = leaf("first");
        let second = leaf("second");

        assert!(spec.set_child(Arc::clone(&first), 0).is_none());
        let previous = spec.set_child(Arc::clone(&second), 0).unwrap();

        assert!(same_node(&previous, &first));
        assert!(same_node(spec.child_at(0).unwrap(), &second));
        drop(previous);
        assert_eq!(Arc::strong_count(&first), 1);
    }

    #[test]
    fn sparse_indices() {
        let a = leaf("a");
        let b = leaf("b");
        let mut spec = LayoutSpec::new();
        spec.set_child(Arc::clone(&a), 0);
        spec.set_child(Arc::clone(&b), 2);

        assert!(spec.child_at(1).is_none());
        assert!(same_node(spec.child_at(0).unwrap(), &a));
        assert!(same_node(spec.child_at(2).unwrap(), &b));
        assert_eq!(spec.child_count(), 2);
        assert_eq!(spec.next_index(), Some(3));
    }

    #[test]
    fn children_iterate_in_index_order() {
        let mut spec = LayoutSpec::new();
        spec.set_child(leaf("late"), 9);
        spec.set_child(leaf("early"), 1);
        spec.set_child(leaf("middle"), 4);

        let ids: Vec<_> = spec
            .children()
            .map(|(index, child)| (index, child.identifier().unwrap().to_string()))
            .collect();
        assert_eq!(
            ids,
            vec![
                (1, "early".to_string()),
                (4, "middle".to_string()),
                (9, "late".to_string()),
            ]
        );
    }

    #[test]
    fn set_children_replaces_everything() {
        let mut spec = LayoutSpec::new();
        spec.set_child(leaf("stale"), 7);
        spec.set_children([leaf("x"), leaf("y")]);

        assert!(spec.child_at(7).is_none());
        assert_eq!(spec.child_at(1).unwrap().identifier(), Some("y"));
        assert_eq!(spec.child_count(), 2);
    }

    #[test]
    fn next_index_stops_at_last_slot() {
        let mut spec = LayoutSpec::new();
        assert_eq!(spec.next_index(), Some(0));

        spec.set_child(leaf("last"), usize::MAX);
        assert_eq!(spec.next_index(), None);
        assert!(spec.child_at(usize::MAX).is_some());
    }

    #[test]
    fn remove_child_leaves_hole() {
        let mut spec = LayoutSpec::new();
        spec.set_primary_child(leaf("only"));
        assert!(spec.remove_child(0).is_some());
        assert!(spec.primary_child().is_none());
        assert!(spec.is_empty());
        assert!(spec.remove_child(0).is_none());
    }

    #[test]
    fn plain_child_resolves_to_itself() {
        let spec = LayoutSpec::new();
        let node = leaf("plain");
        assert!(same_node(&spec.resolve_substitute(&node), &node));
    }

    #[test]
    fn substitute_replaces_child_and_is_terminal() {
        let spec = LayoutSpec::new();
        let node: LayoutElement =
            Arc::new(LeafNode::new("padded").with_final_insets(EdgeInsets::uniform(4.0)));

        let substitute = spec.resolve_substitute(&node);
        assert!(!same_node(&substitute, &node));
        assert!(substitute.is_final_layoutable());
        assert_eq!(substitute.kind(), "inset");

        let wrapped = substitute.as_spec().unwrap().child_at(0).unwrap();
        assert!(same_node(wrapped, &node));

        let again = spec.resolve_substitute(&substitute);
        assert!(same_node(&again, &substitute));
    }

    #[test]
    fn final_spec_does_not_substitute_children() {
        let node: LayoutElement =
            Arc::new(LeafNode::new("padded").with_final_insets(EdgeInsets::uniform(1.0)));
        let final_spec = LayoutSpec::new_final();
        assert!(same_node(&final_spec.resolve_substitute(&node), &node));
    }

    #[test]
    fn plain_spec_is_not_final() {
        let spec: LayoutElement = Arc::new(LayoutSpec::new());
        assert!(!spec.is_final_layoutable());
    }
}

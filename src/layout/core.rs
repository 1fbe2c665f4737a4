use std::fmt;
use std::sync::Arc;

use super::final_node::FinalLayoutable;
use super::spec::LayoutSpec;

/// Shared handle to a node in the layout tree.
///
/// A substitute usually wraps the node it replaces while the caller's tree
/// still points at that node, so handles are reference counted.
pub type LayoutElement = Arc<dyn Layoutable>;

/// Anything that can sit in a layout tree.
pub trait Layoutable: fmt::Debug + Send + Sync {
    /// Short name used in logs, audits and fingerprints.
    fn kind(&self) -> &str;

    /// Caller-facing identifier, if the node carries one.
    fn identifier(&self) -> Option<&str> {
        None
    }

    /// Child storage, for nodes that are layout specs.
    fn as_spec(&self) -> Option<&LayoutSpec> {
        None
    }

    /// The node to lay out in place of this one, if any.
    ///
    /// Never called on a final node, nor on children of a final spec.
    fn final_layoutable(self: Arc<Self>) -> Option<FinalLayoutable> {
        None
    }
}

impl dyn Layoutable {
    /// Whether this node is already a terminal substitute.
    ///
    /// Read straight from the node's spec storage, so implementors cannot
    /// claim finality without holding a spec built by
    /// [`FinalLayoutable::build`].
    pub fn is_final_layoutable(&self) -> bool {
        self.as_spec().is_some_and(LayoutSpec::is_final)
    }
}

/// Pointer identity between two handles.
pub fn same_node(a: &LayoutElement, b: &LayoutElement) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Substitute `child` as a non-final owner would.
///
/// Final nodes come back untouched; others are asked once for a
/// substitute and returned unchanged when they have none.
pub fn substitute_for(child: &LayoutElement) -> LayoutElement {
    if child.is_final_layoutable() {
        return Arc::clone(child);
    }
    match Arc::clone(child).final_layoutable() {
        Some(substitute) => substitute.into_element(),
        None => Arc::clone(child),
    }
}

use std::sync::Arc;

use super::core::{LayoutElement, Layoutable};
use super::spec::LayoutSpec;

/// A terminal substitute returned from [`Layoutable::final_layoutable`].
///
/// The only constructor is [`FinalLayoutable::build`], which marks the spec
/// final before the caller can attach anything to it. A substitute therefore
/// always stops the substitution chain, even when it wraps the node that
/// produced it.
#[derive(Debug, Clone)]
pub struct FinalLayoutable {
    element: LayoutElement,
}

impl FinalLayoutable {
    /// Build a substitute on top of an empty spec that is already final.
    ///
    /// `make` wraps the spec in whatever concrete spec type it needs and
    /// attaches children:
    ///
    /// ```
    /// use std::sync::Arc;
    /// use layout_spec::{EdgeInsets, FinalLayoutable, InsetLayoutSpec, LayoutElement, LeafNode};
    ///
    /// let title: LayoutElement = Arc::new(LeafNode::new("title"));
    /// let substitute = FinalLayoutable::build(|spec| {
    ///     let mut inset = InsetLayoutSpec::with_spec(spec, EdgeInsets::uniform(10.0));
    ///     inset.set_child(Arc::clone(&title));
    ///     inset
    /// });
    /// assert!(substitute.element().is_final_layoutable());
    /// ```
    ///
    /// # Panics
    /// Panics if `make` returns a node that is not final, which happens when it
    /// discards the spec it was handed and builds its own.
    pub fn build<S, F>(make: F) -> Self
    where
        S: Layoutable + 'static,
        F: FnOnce(LayoutSpec) -> S,
    {
        let node = make(LayoutSpec::new_final());
        assert!(
            node.as_spec().is_some_and(LayoutSpec::is_final),
            "substitute `{}` must be built on the final spec it was handed",
            node.kind()
        );
        Self {
            element: Arc::new(node),
        }
    }

    pub fn element(&self) -> &LayoutElement {
        &self.element
    }

    pub fn into_element(self) -> LayoutElement {
        self.element
    }
}

impl From<FinalLayoutable> for LayoutElement {
    fn from(value: FinalLayoutable) -> Self {
        value.into_element()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{
        BackgroundLayoutSpec, EdgeInsets, InsetLayoutSpec, LeafNode, StackLayoutSpec, same_node,
        substitute_for,
    };

    /// Exposes a plain spec holding the node that produced it.
    #[derive(Debug)]
    struct Impostor {
        spec: LayoutSpec,
    }

    impl Layoutable for Impostor {
        fn kind(&self) -> &str {
            "impostor"
        }

        fn as_spec(&self) -> Option<&LayoutSpec> {
            Some(&self.spec)
        }
    }

    /// Nominates an [`Impostor`] wrapping itself instead of using the final spec.
    #[derive(Debug)]
    struct Nominator;

    impl Layoutable for Nominator {
        fn kind(&self) -> &str {
            "nominator"
        }

        fn final_layoutable(self: Arc<Self>) -> Option<FinalLayoutable> {
            Some(FinalLayoutable::build(move |_spec| {
                let mut spec = LayoutSpec::new();
                spec.set_child(self, 0);
                Impostor { spec }
            }))
        }
    }

    #[test]
    fn build_marks_spec_final_before_children() {
        let content: LayoutElement = Arc::new(LeafNode::new("content"));
        let backdrop: LayoutElement = Arc::new(LeafNode::new("backdrop"));

        let substitute = FinalLayoutable::build(|spec| {
            assert!(spec.is_final());
            let mut background = BackgroundLayoutSpec::with_spec(spec);
            background.set_child(Arc::clone(&content));
            background.set_background(Arc::clone(&backdrop));
            background
        });

        let element = substitute.into_element();
        let spec = element.as_spec().unwrap();
        assert!(spec.is_final());
        assert!(same_node(spec.child_at(0).unwrap(), &content));
        assert!(same_node(spec.child_at(1).unwrap(), &backdrop));
    }

    #[test]
    #[should_panic(expected = "must be built on the final spec it was handed")]
    fn discarding_the_final_spec_is_flagged() {
        let _ = FinalLayoutable::build(|_spec| {
            let mut stack = StackLayoutSpec::vertical();
            stack.push_child(Arc::new(LeafNode::new("orphan"))).unwrap();
            stack
        });
    }

    #[test]
    #[should_panic(expected = "must be built on the final spec it was handed")]
    fn leaf_cannot_be_a_substitute() {
        let _ = FinalLayoutable::build(|_spec| LeafNode::new("not a spec"));
    }

    #[test]
    #[should_panic(expected = "substitute `impostor` must be built on the final spec")]
    fn substitute_wrapping_original_in_plain_spec_is_flagged() {
        let node: LayoutElement = Arc::new(Nominator);
        let _ = substitute_for(&node);
    }

    #[test]
    fn finality_comes_from_spec_storage() {
        let wrapper = FinalLayoutable::build(|spec| {
            let mut inset = InsetLayoutSpec::with_spec(spec, EdgeInsets::uniform(2.0));
            inset.set_child(Arc::new(LeafNode::new("content")));
            inset
        });
        assert!(wrapper.element().is_final_layoutable());

        let plain: LayoutElement = Arc::new(StackLayoutSpec::vertical());
        assert!(!plain.is_final_layoutable());
    }

    #[test]
    fn converts_into_element() {
        let substitute = FinalLayoutable::build(|spec| spec);
        let element: LayoutElement = substitute.clone().into();
        assert!(same_node(&element, substitute.element()));
    }
}

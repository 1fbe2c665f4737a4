//! Concrete layout specs.
//!
//! Each spec embeds a [`LayoutSpec`] and maps its named slots onto fixed
//! indices. Measurement lives with the renderer; these types only carry the
//! tree shape and the parameters a measuring pass would need.

use std::sync::Arc;

use super::core::{LayoutElement, Layoutable};
use super::spec::LayoutSpec;
use crate::error::{LayoutError, Result};

const CHILD_INDEX: usize = 0;
const BACKGROUND_INDEX: usize = 1;
const OVERLAY_INDEX: usize = 1;

/// Padding applied around a child.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeInsets {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl EdgeInsets {
    pub const fn new(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub const fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Single child with insets around it.
#[derive(Debug)]
pub struct InsetLayoutSpec {
    spec: LayoutSpec,
    insets: EdgeInsets,
}

impl InsetLayoutSpec {
    pub fn new(insets: EdgeInsets, child: LayoutElement) -> Self {
        let mut inset = Self::with_spec(LayoutSpec::new(), insets);
        inset.set_child(child);
        inset
    }

    /// Wrap existing storage, typically the final spec handed out by
    /// [`FinalLayoutable::build`](super::FinalLayoutable::build).
    pub fn with_spec(spec: LayoutSpec, insets: EdgeInsets) -> Self {
        Self { spec, insets }
    }

    pub fn insets(&self) -> EdgeInsets {
        self.insets
    }

    pub fn set_insets(&mut self, insets: EdgeInsets) {
        self.insets = insets;
    }

    pub fn child(&self) -> Option<&LayoutElement> {
        self.spec.child_at(CHILD_INDEX)
    }

    pub fn set_child(&mut self, child: LayoutElement) -> Option<LayoutElement> {
        self.spec.set_child(child, CHILD_INDEX)
    }
}

impl Layoutable for InsetLayoutSpec {
    fn kind(&self) -> &str {
        "inset"
    }

    fn as_spec(&self) -> Option<&LayoutSpec> {
        Some(&self.spec)
    }
}

/// A child drawn over a background that stretches to the child's size.
#[derive(Debug, Default)]
pub struct BackgroundLayoutSpec {
    spec: LayoutSpec,
}

impl BackgroundLayoutSpec {
    pub fn new(child: LayoutElement, background: LayoutElement) -> Self {
        let mut spec = Self::default();
        spec.set_child(child);
        spec.set_background(background);
        spec
    }

    pub fn with_spec(spec: LayoutSpec) -> Self {
        Self { spec }
    }

    pub fn child(&self) -> Option<&LayoutElement> {
        self.spec.child_at(CHILD_INDEX)
    }

    pub fn set_child(&mut self, child: LayoutElement) -> Option<LayoutElement> {
        self.spec.set_child(child, CHILD_INDEX)
    }

    pub fn background(&self) -> Option<&LayoutElement> {
        self.spec.child_at(BACKGROUND_INDEX)
    }

    pub fn set_background(&mut self, background: LayoutElement) -> Option<LayoutElement> {
        self.spec.set_child(background, BACKGROUND_INDEX)
    }
}

impl Layoutable for BackgroundLayoutSpec {
    fn kind(&self) -> &str {
        "background"
    }

    fn as_spec(&self) -> Option<&LayoutSpec> {
        Some(&self.spec)
    }
}

/// A child with another node laid over it.
#[derive(Debug, Default)]
pub struct OverlayLayoutSpec {
    spec: LayoutSpec,
}

impl OverlayLayoutSpec {
    pub fn new(child: LayoutElement, overlay: LayoutElement) -> Self {
        let mut spec = Self::default();
        spec.set_child(child);
        spec.set_overlay(overlay);
        spec
    }

    pub fn with_spec(spec: LayoutSpec) -> Self {
        Self { spec }
    }

    pub fn child(&self) -> Option<&LayoutElement> {
        self.spec.child_at(CHILD_INDEX)
    }

    pub fn set_child(&mut self, child: LayoutElement) -> Option<LayoutElement> {
        self.spec.set_child(child, CHILD_INDEX)
    }

    pub fn overlay(&self) -> Option<&LayoutElement> {
        self.spec.child_at(OVERLAY_INDEX)
    }

    pub fn set_overlay(&mut self, overlay: LayoutElement) -> Option<LayoutElement> {
        self.spec.set_child(overlay, OVERLAY_INDEX)
    }
}

impl Layoutable for OverlayLayoutSpec {
    fn kind(&self) -> &str {
        "overlay"
    }

    fn as_spec(&self) -> Option<&LayoutSpec> {
        Some(&self.spec)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StackDirection {
    Horizontal,
    #[default]
    Vertical,
}

/// Any number of children laid out along one axis.
#[derive(Debug, Default)]
pub struct StackLayoutSpec {
    spec: LayoutSpec,
    direction: StackDirection,
    spacing: f32,
}

impl StackLayoutSpec {
    pub fn new(
        direction: StackDirection,
        spacing: f32,
        children: impl IntoIterator<Item = LayoutElement>,
    ) -> Self {
        let mut stack = Self::with_spec(LayoutSpec::new(), direction);
        stack.spacing = spacing;
        stack.set_children(children);
        stack
    }

    pub fn vertical() -> Self {
        Self::with_spec(LayoutSpec::new(), StackDirection::Vertical)
    }

    pub fn horizontal() -> Self {
        Self::with_spec(LayoutSpec::new(), StackDirection::Horizontal)
    }

    pub fn with_spec(spec: LayoutSpec, direction: StackDirection) -> Self {
        Self {
            spec,
            direction,
            spacing: 0.0,
        }
    }

    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn direction(&self) -> StackDirection {
        self.direction
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    pub fn set_children(&mut self, children: impl IntoIterator<Item = LayoutElement>) {
        self.spec.set_children(children);
    }

    /// Append after the highest occupied index, returning the index used.
    ///
    /// Fails without touching existing children once `usize::MAX` is taken.
    pub fn push_child(&mut self, child: LayoutElement) -> Result<usize> {
        let index = self
            .spec
            .next_index()
            .ok_or_else(|| LayoutError::SlotsExhausted {
                kind: self.kind().to_string(),
            })?;
        self.spec.set_child(child, index);
        Ok(index)
    }

    pub fn children(&self) -> Vec<&LayoutElement> {
        self.spec.children().map(|(_, child)| child).collect()
    }

    pub fn len(&self) -> usize {
        self.spec.child_count()
    }

    pub fn is_empty(&self) -> bool {
        self.spec.is_empty()
    }
}

impl Layoutable for StackLayoutSpec {
    fn kind(&self) -> &str {
        "stack"
    }

    fn as_spec(&self) -> Option<&LayoutSpec> {
        Some(&self.spec)
    }
}

/// Wrap `child` in a non-final inset spec.
pub fn inset(insets: EdgeInsets, child: LayoutElement) -> LayoutElement {
    Arc::new(InsetLayoutSpec::new(insets, child))
}

//! Layout node contract and indexed child storage.
//!
//! Concrete specs and leaves live in their own files; everything callers need
//! is re-exported from here.

mod core;
mod final_node;
mod leaf;
mod spec;
pub mod specs;

pub use core::{LayoutElement, Layoutable, same_node, substitute_for};
pub use final_node::FinalLayoutable;
pub use leaf::LeafNode;
pub use spec::LayoutSpec;
pub use specs::{
    BackgroundLayoutSpec, EdgeInsets, InsetLayoutSpec, OverlayLayoutSpec, StackDirection,
    StackLayoutSpec,
};

//! Layout spec composition for declarative UI trees.
//!
//! Nodes implement [`Layoutable`]. Specs hold children in sparse indexed
//! slots ([`LayoutSpec`]) and concrete specs name those slots. Any node may
//! report a [`FinalLayoutable`] to be laid out in its place; the [`Resolver`]
//! applies those substitutions in one pass while keeping the caller's
//! original nodes for identity.

pub mod error;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod resolve;

pub use error::{LayoutError, Result};
pub use layout::{
    BackgroundLayoutSpec, EdgeInsets, FinalLayoutable, InsetLayoutSpec, LayoutElement, LayoutSpec,
    Layoutable, LeafNode, OverlayLayoutSpec, StackDirection, StackLayoutSpec, same_node,
    substitute_for,
};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{MetricSnapshot, ResolutionMetrics};
pub use resolve::{
    NullResolveAudit, PassStats, RecordingAudit, ResolveAudit, ResolveAuditEvent,
    ResolveAuditStage, ResolvedNode, ResolvedTree, Resolver, ResolverConfig,
};

use thiserror::Error;

use crate::logging::LoggingError;

/// Unified result type for the layout spec crate.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors surfaced while resolving a layout tree.
///
/// A missing child is never an error; `child_at` simply returns `None`.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("layout spec `{kind}` has no children")]
    EmptySpec { kind: String },
    #[error("layout spec `{kind}` has no free index after the last slot")]
    SlotsExhausted { kind: String },
    #[error("resolution exceeded depth {depth} at `{kind}`")]
    DepthExceeded { depth: usize, kind: String },
    #[error("logging failure: {0}")]
    Logging(#[from] LoggingError),
}

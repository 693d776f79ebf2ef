//! Error types produced while resolving resources and loading fragments.

mod aggregate;
mod constructors;
mod types;

pub use aggregate::AggregatedErrors;
pub use types::OverlayError;

/// Result alias used across the crate.
///
/// Errors are shared behind an [`std::sync::Arc`] so a failed reload can be
/// reported to the caller and recorded in an aggregate at the same time.
pub type OverlayResult<T> = Result<T, std::sync::Arc<OverlayError>>;

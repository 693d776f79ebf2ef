//! Aggregation container for multiple `OverlayError` values.

use std::{error::Error, fmt, sync::Arc};

use super::OverlayError;

/// Collection of [`OverlayError`]s produced by a single operation, such as
/// reloading every registered component.
#[derive(Debug, Default)]
pub struct AggregatedErrors(Vec<Arc<OverlayError>>);

impl AggregatedErrors {
    /// Create a new aggregation from a vector of errors.
    #[must_use]
    pub const fn new(errors: Vec<Arc<OverlayError>>) -> Self {
        Self(errors)
    }

    /// Number of errors in the aggregation.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the aggregation is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AggregatedErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {e}", i + 1)?;
        }
        Ok(())
    }
}

impl Error for AggregatedErrors {}

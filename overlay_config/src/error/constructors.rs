//! Constructors and aggregation helpers for `OverlayError`.

use std::error::Error;
use std::sync::Arc;

use camino::Utf8Path;

use super::{AggregatedErrors, OverlayError};

impl OverlayError {
    /// Tries to build an [`OverlayError`] from an iterator of errors.
    ///
    /// Returns:
    /// * `None` when no errors are supplied;
    /// * the inner error when a single [`Arc`] is uniquely owned;
    /// * [`Self::Aggregate`] wrapping that single [`Arc`] when it is shared; and
    /// * [`Self::Aggregate`] combining every error for two or more inputs.
    #[must_use]
    pub fn try_aggregate<I, E>(errors: I) -> Option<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<Self>>,
    {
        let mut arcs: Vec<Arc<Self>> = errors.into_iter().map(Into::into).collect();
        if arcs.len() > 1 {
            return Some(Self::Aggregate(Box::new(AggregatedErrors::new(arcs))));
        }
        let last = arcs.pop()?;
        Some(match Arc::try_unwrap(last) {
            Ok(err) => err,
            Err(shared) => Self::Aggregate(Box::new(AggregatedErrors::new(vec![shared]))),
        })
    }

    /// Construct a [`OverlayError::File`] wrapped in an [`Arc`].
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use overlay_config::OverlayError;
    ///
    /// let err = OverlayError::file(Utf8Path::new("/srv/app"), std::io::Error::other("boom"));
    /// assert!(matches!(&*err, OverlayError::File { .. }));
    /// ```
    #[must_use]
    pub fn file(path: &Utf8Path, source: impl Into<Box<dyn Error + Send + Sync>>) -> Arc<Self> {
        Arc::new(Self::File {
            path: path.to_path_buf(),
            source: source.into(),
        })
    }

    /// Construct a [`OverlayError::NotFound`] wrapped in an [`Arc`].
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::NotFound { name: name.into() })
    }

    /// Construct a [`OverlayError::InvalidName`] wrapped in an [`Arc`].
    #[must_use]
    pub fn invalid_name(name: impl Into<String>, reason: &'static str) -> Arc<Self> {
        Arc::new(Self::InvalidName {
            name: name.into(),
            reason,
        })
    }

    /// Whether this error reports a missing resource.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

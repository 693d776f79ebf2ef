//! Extensions for mapping errors to `OverlayResult` concisely.
//!
//! These helpers reduce repetitive `.map_err(|e| OverlayError::file(path, e))`
//! chains when converting filesystem and XML errors into the crate's
//! `OverlayResult<T>` alias (`Result<T, Arc<OverlayError>>`).
//!
//! Use [`IoResultExt::at_path`] for I/O failures tied to a location.

use camino::Utf8Path;

use crate::{OverlayError, OverlayResult};

/// Extension tailored to attaching a path to I/O failures.
pub trait IoResultExt<T> {
    /// Convert `std::io::Result<T>` into `OverlayResult<T>` as an
    /// [`OverlayError::File`] naming `path`.
    ///
    /// # Errors
    ///
    /// Returns an `OverlayError::File` wrapped in `Arc` when the input is `Err`.
    fn at_path(self, path: &Utf8Path) -> OverlayResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn at_path(self, path: &Utf8Path) -> OverlayResult<T> {
        self.map_err(|e| OverlayError::file(path, e))
    }
}

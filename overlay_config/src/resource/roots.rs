//! The ordered list of directory roots searched by the resolver.

use std::io::{self, ErrorKind};

use camino::{Utf8Path, Utf8PathBuf};

use crate::{OverlayError, OverlayResult};

#[derive(Debug)]
pub(super) struct Root {
    pub(super) path: Utf8PathBuf,
}

/// Ordered directory roots, index 0 has the highest priority.
///
/// Resource names never climb above a root through `..`, but symlinks inside
/// a root are followed wherever they point. The set is immutable once built.
#[derive(Debug)]
pub struct ResourceRoots {
    top_level: Utf8PathBuf,
    roots: Vec<Root>,
}

impl ResourceRoots {
    /// Open `paths` as roots, highest priority first.
    ///
    /// Roots that do not exist are skipped with a warning. The first
    /// configured path remains the write target even when it was skipped.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::NoRoots`] when `paths` is empty and
    /// [`OverlayError::File`] when an existing root is not a readable
    /// directory.
    pub fn new<I, P>(paths: I) -> OverlayResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        let mut top_level = None;
        let mut roots = Vec::new();
        for candidate in paths {
            let path: Utf8PathBuf = candidate.into();
            top_level.get_or_insert_with(|| path.clone());
            match path.metadata() {
                Ok(meta) if meta.is_dir() => roots.push(Root { path }),
                Ok(_) => {
                    return Err(OverlayError::file(
                        &path,
                        io::Error::new(ErrorKind::NotADirectory, "resource root is not a directory"),
                    ));
                }
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    tracing::warn!(root = %path, "skipping missing resource root");
                }
                Err(err) => return Err(OverlayError::file(&path, err)),
            }
        }
        let top_level = top_level.ok_or_else(|| std::sync::Arc::new(OverlayError::NoRoots))?;
        tracing::debug!(
            top_level = %top_level,
            roots = roots.len(),
            "prepared resource roots"
        );
        Ok(Self { top_level, roots })
    }

    /// Location that receives newly written resources.
    #[must_use]
    pub fn top_level(&self) -> &Utf8Path {
        &self.top_level
    }

    /// Root directories in priority order, without the skipped ones.
    pub fn paths(&self) -> impl Iterator<Item = &Utf8Path> {
        self.roots.iter().map(|root| root.path.as_path())
    }

    /// Number of roots in use.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.roots.len()
    }

    /// Whether every configured root was skipped.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub(super) fn iter(&self) -> impl Iterator<Item = (usize, &Root)> {
        self.roots.iter().enumerate()
    }
}

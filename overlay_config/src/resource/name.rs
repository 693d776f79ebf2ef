//! Resource name parsing and construction.

use camino::Utf8Path;

use crate::{OverlayError, OverlayResult};

/// Prefix marking a resource name as a literal OS path.
pub const DIRECT_PREFIX: &str = "file://";

/// Build a resource name that resolves `path` directly, bypassing the roots.
///
/// # Examples
///
/// ```
/// use overlay_config::resource::{is_direct, mark_direct};
///
/// let name = mark_direct("/etc/app/override.config.xml");
/// assert_eq!(name, "file:///etc/app/override.config.xml");
/// assert!(is_direct(&name));
/// ```
#[must_use]
pub fn mark_direct(path: impl AsRef<Utf8Path>) -> String {
    format!("{DIRECT_PREFIX}{}", path.as_ref())
}

/// Whether `name` carries the [`DIRECT_PREFIX`].
#[must_use]
pub fn is_direct(name: &str) -> bool {
    name.starts_with(DIRECT_PREFIX)
}

/// Parsed form of a resource name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Lookup<'a> {
    /// Path relative to each root; `.` names the root itself.
    Overlay(&'a str),
    /// Literal OS path.
    Direct(&'a Utf8Path),
}

impl<'a> Lookup<'a> {
    pub(crate) fn parse(name: &'a str) -> OverlayResult<Self> {
        if let Some(path) = name.strip_prefix(DIRECT_PREFIX) {
            if path.is_empty() {
                return Err(OverlayError::invalid_name(name, "direct name has no path"));
            }
            return Ok(Self::Direct(Utf8Path::new(path)));
        }
        if !name.starts_with('/') {
            return Err(OverlayError::invalid_name(name, "must start with '/'"));
        }
        let relative = name.trim_start_matches('/');
        if relative.split('/').any(|segment| segment == "..") {
            return Err(OverlayError::invalid_name(
                name,
                "must not contain '..' segments",
            ));
        }
        let relative = relative.trim_end_matches('/');
        Ok(Self::Overlay(if relative.is_empty() { "." } else { relative }))
    }
}

/// Name of the child `entry` of directory resource `dir`.
///
/// Directories are reported with a trailing `/`.
pub(crate) fn child_name(dir: &str, entry: &str, is_dir: bool) -> String {
    let mut name = String::with_capacity(dir.len() + entry.len() + 2);
    name.push_str(dir);
    if !name.ends_with('/') {
        name.push('/');
    }
    name.push_str(entry);
    if is_dir {
        name.push('/');
    }
    name
}

//! First-match resource lookup over [`ResourceRoots`].

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, ErrorKind};

use camino::{Utf8Path, Utf8PathBuf};
use url::Url;

use super::roots::{ResourceRoots, Root};
use super::{Lookup, child_name};
use crate::result_ext::IoResultExt;
use crate::{OverlayError, OverlayResult};

/// Where a resolved resource was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Found under the root at this priority index.
    Root(usize),
    /// Named directly through the `file://` prefix.
    Direct,
}

/// A resource name bound to the concrete location that provides it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    name: String,
    path: Utf8PathBuf,
    layer: Layer,
}

impl Resource {
    /// Resource name as requested.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Concrete filesystem location.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Layer that provided the resource.
    #[must_use]
    pub const fn layer(&self) -> Layer {
        self.layer
    }
}

/// Lookups that mean "not here" rather than "broken".
fn is_absent(err: &io::Error) -> bool {
    matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory)
}

/// Resolves resource names against stacked roots.
///
/// # Examples
///
/// ```no_run
/// use overlay_config::resource::{OverlayResolver, ResourceRoots};
///
/// # fn run() -> overlay_config::OverlayResult<()> {
/// let roots = ResourceRoots::new(["/srv/app/overlay", "/srv/app/base"])?;
/// let resolver = OverlayResolver::new(roots);
/// let meta = resolver.resolve("/WEB-INF/conf/metaConf.txt")?;
/// println!("metaConf provided by {}", meta.path());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct OverlayResolver {
    roots: ResourceRoots,
}

impl OverlayResolver {
    /// Wrap `roots` in a resolver.
    #[must_use]
    pub const fn new(roots: ResourceRoots) -> Self {
        Self { roots }
    }

    /// The roots searched by this resolver.
    #[must_use]
    pub const fn roots(&self) -> &ResourceRoots {
        &self.roots
    }

    /// Find the highest-priority location of `name`.
    ///
    /// Returns `Ok(None)` when no root contains the resource.
    ///
    /// # Errors
    ///
    /// Returns an error when `name` is malformed or a root cannot be queried.
    pub fn find(&self, name: &str) -> OverlayResult<Option<Resource>> {
        match Lookup::parse(name)? {
            Lookup::Direct(path) => Ok(direct_exists(path)?.then(|| Resource {
                name: name.to_owned(),
                path: path.to_path_buf(),
                layer: Layer::Direct,
            })),
            Lookup::Overlay(relative) => {
                for (index, root) in self.roots.iter() {
                    if exists_in(root, relative)? {
                        return Ok(Some(overlay_resource(name, root, relative, index)));
                    }
                }
                Ok(None)
            }
        }
    }

    /// Find the highest-priority location of `name`, failing when absent.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::NotFound`] when no root contains the resource.
    pub fn resolve(&self, name: &str) -> OverlayResult<Resource> {
        self.find(name)?
            .ok_or_else(|| OverlayError::not_found(name))
    }

    /// Whether any root provides `name`.
    ///
    /// # Errors
    ///
    /// Returns an error when `name` is malformed or a root cannot be queried.
    pub fn exists(&self, name: &str) -> OverlayResult<bool> {
        Ok(self.find(name)?.is_some())
    }

    /// Every location of `name`, highest priority first.
    ///
    /// # Errors
    ///
    /// Returns an error when `name` is malformed or a root cannot be queried.
    pub fn overlays(&self, name: &str) -> OverlayResult<Vec<Resource>> {
        match Lookup::parse(name)? {
            Lookup::Direct(_) => Ok(self.find(name)?.into_iter().collect()),
            Lookup::Overlay(relative) => {
                let mut found = Vec::new();
                for (index, root) in self.roots.iter() {
                    if exists_in(root, relative)? {
                        found.push(overlay_resource(name, root, relative, index));
                    }
                }
                Ok(found)
            }
        }
    }

    /// Open the highest-priority copy of `name` for reading.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::NotFound`] when absent,
    /// [`OverlayError::IsDirectory`] for directories, and
    /// [`OverlayError::File`] when opening fails.
    pub fn open(&self, name: &str) -> OverlayResult<std::fs::File> {
        let resource = self.resolve(name)?;
        ensure_file(&resource)?;
        std::fs::File::open(&resource.path).at_path(&resource.path)
    }

    /// Read the highest-priority copy of `name` as UTF-8 text.
    ///
    /// # Errors
    ///
    /// See [`OverlayResolver::open`]; decoding failures are reported as
    /// [`OverlayError::File`].
    pub fn read_to_string(&self, name: &str) -> OverlayResult<String> {
        let resource = self.resolve(name)?;
        ensure_file(&resource)?;
        std::fs::read_to_string(&resource.path).at_path(&resource.path)
    }

    /// `file://` URL of the highest-priority copy of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::NotFound`] when absent and
    /// [`OverlayError::File`] when the location cannot be made absolute.
    pub fn url(&self, name: &str) -> OverlayResult<Url> {
        let resource = self.resolve(name)?;
        let absolute = std::path::absolute(resource.path.as_std_path()).at_path(&resource.path)?;
        Url::from_file_path(&absolute).map_err(|()| {
            OverlayError::file(
                &resource.path,
                io::Error::new(ErrorKind::InvalidInput, "location cannot be expressed as a URL"),
            )
        })
    }

    /// Immediate children of directory resource `dir`, merged across roots.
    ///
    /// Each child is reported once under its full resource name, sorted;
    /// directories carry a trailing `/`. A directory missing from every root
    /// yields an empty listing.
    ///
    /// # Errors
    ///
    /// Returns an error when `dir` is malformed or a root cannot be read.
    pub fn list(&self, dir: &str) -> OverlayResult<BTreeSet<String>> {
        let mut children = BTreeMap::new();
        match Lookup::parse(dir)? {
            Lookup::Direct(path) => list_into(path, &mut children)?,
            Lookup::Overlay(relative) => {
                for (_, root) in self.roots.iter() {
                    list_into(&root.path.join(relative), &mut children)?;
                }
            }
        }
        Ok(children
            .into_iter()
            .map(|(entry, is_dir)| child_name(dir, &entry, is_dir))
            .collect())
    }

    /// Delete the highest-priority copy of `name`.
    ///
    /// Lower-priority copies stay in place and become visible afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::NotFound`] when absent,
    /// [`OverlayError::IsDirectory`] for directories, and
    /// [`OverlayError::File`] when removal fails.
    pub fn delete(&self, name: &str) -> OverlayResult<()> {
        let resource = self.resolve(name)?;
        ensure_file(&resource)?;
        std::fs::remove_file(&resource.path).at_path(&resource.path)?;
        tracing::debug!(resource = name, path = %resource.path, "deleted resource");
        Ok(())
    }

    /// Location to write `name` to.
    ///
    /// Existing resources are written in place; new ones land in the
    /// top-level root.
    ///
    /// # Errors
    ///
    /// Returns an error when `name` is malformed or a root cannot be queried.
    pub fn resolve_for_write(&self, name: &str) -> OverlayResult<Utf8PathBuf> {
        if let Some(resource) = self.find(name)? {
            return Ok(resource.path);
        }
        Ok(match Lookup::parse(name)? {
            Lookup::Direct(path) => path.to_path_buf(),
            Lookup::Overlay(relative) => self.roots.top_level().join(relative),
        })
    }
}

/// Rejects directories; symlinks count as whatever they point at.
fn ensure_file(resource: &Resource) -> OverlayResult<()> {
    if resource.path.metadata().at_path(&resource.path)?.is_dir() {
        return Err(std::sync::Arc::new(OverlayError::IsDirectory {
            name: resource.name.clone(),
        }));
    }
    Ok(())
}

fn overlay_resource(name: &str, root: &Root, relative: &str, index: usize) -> Resource {
    Resource {
        name: name.to_owned(),
        path: root.path.join(relative),
        layer: Layer::Root(index),
    }
}

fn exists_in(root: &Root, relative: &str) -> OverlayResult<bool> {
    let location = root.path.join(relative);
    match location.metadata() {
        Ok(_) => Ok(true),
        Err(err) if is_absent(&err) => Ok(false),
        Err(err) => Err(OverlayError::file(&location, err)),
    }
}

fn direct_exists(path: &Utf8Path) -> OverlayResult<bool> {
    path.try_exists().at_path(path)
}

/// Record the children of `location`, keeping the kind seen first.
///
/// Roots are visited in priority order, so an entry that is a file in one
/// root and a directory in another takes the higher root's kind.
fn list_into(location: &Utf8Path, children: &mut BTreeMap<String, bool>) -> OverlayResult<()> {
    let entries = match location.read_dir_utf8() {
        Ok(entries) => entries,
        Err(err) if is_absent(&err) => return Ok(()),
        Err(err) => return Err(OverlayError::file(location, err)),
    };
    for entry in entries {
        let entry = entry.at_path(location)?;
        children
            .entry(entry.file_name().to_owned())
            .or_insert_with(|| entry.path().is_dir());
    }
    Ok(())
}

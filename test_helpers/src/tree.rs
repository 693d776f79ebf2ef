//! Temporary directory trees holding several resource roots.

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// A temporary directory containing one sub-directory per resource root.
///
/// The directory is removed when the tree is dropped.
///
/// # Examples
///
/// ```
/// use overlay_config_test_helpers::OverlayTree;
///
/// # fn run() -> anyhow::Result<()> {
/// let tree = OverlayTree::new(["overlay", "base"])?;
/// tree.write("base", "/WEB-INF/conf/app.xml", "<root/>")?;
/// assert_eq!(tree.roots().len(), 2);
/// # Ok(())
/// # }
/// # run().unwrap();
/// ```
#[derive(Debug)]
pub struct OverlayTree {
    base: Utf8PathBuf,
    names: Vec<String>,
    roots: Vec<Utf8PathBuf>,
    _dir: TempDir,
}

impl OverlayTree {
    /// Create a tree with the named roots, highest priority first.
    ///
    /// # Errors
    ///
    /// Returns an error when the temporary directory or a root cannot be
    /// created.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dir = tempfile::tempdir().context("create temporary overlay tree")?;
        let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|path| anyhow!("temporary directory {} is not UTF-8", path.display()))?;
        let mut tree = Self {
            base,
            names: Vec::new(),
            roots: Vec::new(),
            _dir: dir,
        };
        for name in names {
            let name = name.into();
            let root = tree.base.join(&name);
            std::fs::create_dir_all(&root).with_context(|| format!("create root {root}"))?;
            tree.names.push(name);
            tree.roots.push(root);
        }
        Ok(tree)
    }

    /// Directory containing every root.
    #[must_use]
    pub fn base(&self) -> &Utf8Path {
        &self.base
    }

    /// Root directories in priority order.
    #[must_use]
    pub fn roots(&self) -> &[Utf8PathBuf] {
        &self.roots
    }

    /// Directory of the root called `name`.
    ///
    /// # Errors
    ///
    /// Returns an error when no root has that name.
    pub fn root(&self, name: &str) -> Result<&Utf8Path> {
        self.names
            .iter()
            .position(|candidate| candidate == name)
            .and_then(|index| self.roots.get(index))
            .map(Utf8PathBuf::as_path)
            .ok_or_else(|| anyhow!("no root named {name}"))
    }

    /// Write `contents` to resource `resource` inside root `root`.
    ///
    /// Parent directories are created as needed.
    ///
    /// # Errors
    ///
    /// Returns an error when the root is unknown or writing fails.
    pub fn write(&self, root: &str, resource: &str, contents: &str) -> Result<Utf8PathBuf> {
        let path = self.root(root)?.join(resource.trim_start_matches('/'));
        write_with_parents(&path, contents)?;
        Ok(path)
    }

    /// Create directory resource `resource` inside root `root`.
    ///
    /// # Errors
    ///
    /// Returns an error when the root is unknown or creation fails.
    pub fn mkdir(&self, root: &str, resource: &str) -> Result<Utf8PathBuf> {
        let path = self.root(root)?.join(resource.trim_start_matches('/'));
        std::fs::create_dir_all(&path).with_context(|| format!("create directory {path}"))?;
        Ok(path)
    }

    /// Write a file outside every root, relative to [`OverlayTree::base`].
    ///
    /// # Errors
    ///
    /// Returns an error when writing fails.
    pub fn write_outside(&self, relative: &str, contents: &str) -> Result<Utf8PathBuf> {
        let path = self.base.join(relative);
        write_with_parents(&path, contents)?;
        Ok(path)
    }
}

fn write_with_parents(path: &Utf8Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory {parent}"))?;
    }
    std::fs::write(path, contents).with_context(|| format!("write {path}"))
}

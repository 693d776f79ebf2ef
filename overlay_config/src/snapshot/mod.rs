//! Immutable result of loading every fragment of a deployment.

mod fold;

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Serialize;

pub use fold::{fold_aliases, fold_sections};

use crate::OverlayResult;
use crate::alias::AliasTable;
use crate::facade::SectionView;
use crate::fragment::Fragment;

/// Entries of one property section, sorted by key.
pub type Section = BTreeMap<String, String>;

/// Folded sections and resolved aliases of an ordered fragment list.
///
/// Snapshots never change after construction; a reload produces a new one.
///
/// # Examples
///
/// ```
/// use overlay_config::fragment::{Fragment, SectionDecl};
/// use overlay_config::snapshot::PropertySnapshot;
///
/// # fn run() -> overlay_config::OverlayResult<()> {
/// let base = Fragment::new("base").with_section(SectionDecl::new("db").with_entry("url", "base-url"));
/// let overlay = Fragment::new("overlay").with_section(SectionDecl::new("db").with_entry("user", "admin"));
/// let snapshot = PropertySnapshot::build(&[base, overlay])?;
/// let db = snapshot.configuration("db");
/// assert_eq!(db.value("url").as_deref(), Some("base-url"));
/// assert_eq!(db.value("user").as_deref(), Some("admin"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PropertySnapshot {
    sections: BTreeMap<String, Section>,
    aliases: AliasTable,
    sources: Vec<String>,
}

/// Fold `fragments`, lowest priority first, into a snapshot.
///
/// # Errors
///
/// Returns [`crate::OverlayError::CyclicAlias`] when the collected alias
/// definitions reference each other in a loop.
pub fn fold_fragments(fragments: &[Fragment]) -> OverlayResult<PropertySnapshot> {
    PropertySnapshot::build(fragments)
}

impl PropertySnapshot {
    /// Fold `fragments`, lowest priority first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::OverlayError::CyclicAlias`] when alias definitions
    /// form a loop.
    pub fn build(fragments: &[Fragment]) -> OverlayResult<Self> {
        let aliases = AliasTable::resolve(&fold_aliases(fragments))?;
        Ok(Self {
            sections: fold_sections(fragments),
            aliases,
            sources: fragments.iter().map(|f| f.name().to_owned()).collect(),
        })
    }

    /// Raw entries of section `name`.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Names of every section, sorted.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Resolved alias table.
    #[must_use]
    pub const fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Fragment names in the order they were folded.
    #[must_use]
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Alias-expanding view of section `name`; unknown sections are empty.
    #[must_use]
    pub fn configuration<'a>(&'a self, name: &'a str) -> SectionView<'a> {
        SectionView::new(name, self.sections.get(name), &self.aliases)
    }

    /// Expand `%NAME%` tokens in `input` with this snapshot's aliases.
    #[must_use]
    pub fn expand<'s>(&self, input: &'s str) -> Cow<'s, str> {
        self.aliases.expand(input)
    }
}

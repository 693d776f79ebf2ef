//! Configuration fragments: one XML document contributing aliases and
//! property sections.
//!
//! A fragment looks like this:
//!
//! ```xml
//! <root>
//!   <alias>
//!     <entry name="%HOST%" value="db.local"/>
//!   </alias>
//!   <properties>
//!     <section name="db" inherit="no">
//!       <entry name="url" value="jdbc://%HOST%/app"/>
//!       <entry name="password" value="c2VjcmV0" encrypt="true"/>
//!     </section>
//!   </properties>
//! </root>
//! ```

mod parse;
mod xml;

/// A parsed configuration fragment.
///
/// Fragments are usually produced by [`Fragment::parse`], but can be assembled
/// in code for programmatic overrides.
///
/// # Examples
///
/// ```
/// use overlay_config::fragment::{Fragment, SectionDecl};
///
/// let fragment = Fragment::new("inline")
///     .with_alias("HOST", "db.local")
///     .with_section(SectionDecl::new("db").with_entry("user", "admin"));
/// assert_eq!(fragment.sections().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    name: String,
    aliases: Vec<(String, String)>,
    sections: Vec<SectionDecl>,
}

impl Fragment {
    /// Start an empty fragment called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add an alias definition.
    #[must_use]
    pub fn with_alias(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.aliases.push((name.into(), value.into()));
        self
    }

    /// Add a section declaration.
    #[must_use]
    pub fn with_section(mut self, section: SectionDecl) -> Self {
        self.sections.push(section);
        self
    }

    /// Name of the resource this fragment was read from.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Alias definitions in document order.
    #[must_use]
    pub fn aliases(&self) -> &[(String, String)] {
        &self.aliases
    }

    /// Section declarations in document order.
    #[must_use]
    pub fn sections(&self) -> &[SectionDecl] {
        &self.sections
    }
}

/// One `section` element of a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionDecl {
    name: String,
    inherit: bool,
    entries: Vec<(String, String)>,
}

impl SectionDecl {
    /// Start an inheriting section called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inherit: true,
            entries: Vec::new(),
        }
    }

    /// Set whether the section merges into earlier declarations.
    #[must_use]
    pub const fn with_inherit(mut self, inherit: bool) -> Self {
        self.inherit = inherit;
        self
    }

    /// Add an entry; later entries with the same key win.
    #[must_use]
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// Section name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `false` when the section was declared `inherit="no"`.
    #[must_use]
    pub const fn inherits(&self) -> bool {
        self.inherit
    }

    /// Entries in document order, already decoded.
    #[must_use]
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}

#[cfg(test)]
mod tests;

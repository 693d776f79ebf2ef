//! Builders rendering configuration fragment XML and meta-conf listings.

use std::fmt::Write as _;

/// Renders a fragment document with an `alias` and a `properties` block.
///
/// # Examples
///
/// ```
/// use overlay_config_test_helpers::{FragmentBuilder, SectionBuilder};
///
/// let xml = FragmentBuilder::new()
///     .alias("%HOST%", "db.local")
///     .section(SectionBuilder::new("db").entry("url", "jdbc://%HOST%/app"))
///     .to_xml();
/// assert!(xml.contains(r#"<section name="db">"#));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FragmentBuilder {
    aliases: Vec<(String, String)>,
    sections: Vec<SectionBuilder>,
}

impl FragmentBuilder {
    /// Start an empty fragment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an alias definition; `name` is written verbatim.
    #[must_use]
    pub fn alias(mut self, name: &str, value: &str) -> Self {
        self.aliases.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Append a section declaration.
    #[must_use]
    pub fn section(mut self, section: SectionBuilder) -> Self {
        self.sections.push(section);
        self
    }

    /// Render the document.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<root>\n");
        if !self.aliases.is_empty() {
            out.push_str("  <alias>\n");
            for (name, value) in &self.aliases {
                push_entry(&mut out, "    ", name, value, false);
            }
            out.push_str("  </alias>\n");
        }
        out.push_str("  <properties>\n");
        for section in &self.sections {
            section.render(&mut out);
        }
        out.push_str("  </properties>\n</root>\n");
        out
    }
}

/// One `section` element of a fragment.
#[derive(Debug, Clone)]
pub struct SectionBuilder {
    name: String,
    inherit: bool,
    entries: Vec<(String, String, bool)>,
}

impl SectionBuilder {
    /// Start a section called `name` that inherits earlier declarations.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            inherit: true,
            entries: Vec::new(),
        }
    }

    /// Mark the section `inherit="no"`.
    #[must_use]
    pub const fn no_inherit(mut self) -> Self {
        self.inherit = false;
        self
    }

    /// Add a plain entry.
    #[must_use]
    pub fn entry(mut self, key: &str, value: &str) -> Self {
        self.entries.push((key.to_owned(), value.to_owned(), false));
        self
    }

    /// Add an entry marked `encrypt="true"`.
    #[must_use]
    pub fn encrypted(mut self, key: &str, value: &str) -> Self {
        self.entries.push((key.to_owned(), value.to_owned(), true));
        self
    }

    fn render(&self, out: &mut String) {
        let _unused = write!(out, "    <section name=\"{}\"", escape(&self.name));
        if !self.inherit {
            out.push_str(" inherit=\"no\"");
        }
        out.push_str(">\n");
        for (key, value, encrypted) in &self.entries {
            push_entry(out, "      ", key, value, *encrypted);
        }
        out.push_str("    </section>\n");
    }
}

/// Render a meta-conf listing with one fragment name per line.
#[must_use]
pub fn meta_conf(names: &[&str]) -> String {
    let mut out = names.join("\n");
    out.push('\n');
    out
}

fn push_entry(out: &mut String, indent: &str, key: &str, value: &str, encrypted: bool) {
    let _unused = write!(
        out,
        "{indent}<entry name=\"{}\" value=\"{}\"",
        escape(key),
        escape(value)
    );
    if encrypted {
        out.push_str(" encrypt=\"true\"");
    }
    out.push_str("/>\n");
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

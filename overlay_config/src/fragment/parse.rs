//! Interpretation of a fragment document.

use std::collections::HashSet;
use std::sync::Arc;

use uncased::UncasedStr;

use super::xml::{Element, read_document};
use super::{Fragment, SectionDecl};
use crate::codec::SecretCodec;
use crate::{OverlayError, OverlayResult};

const ALIAS_NODE: &str = "alias";
const PROP_NODE: &str = "properties";
const SECTION_NODE: &str = "section";
const ENTRY_NODE: &str = "entry";
const KEY_ATTR: &str = "name";
const VALUE_ATTR: &str = "value";
const INHERIT_ATTR: &str = "inherit";
const INHERIT_VAL_NO: &str = "no";
const ENCRYPT_ATTR: &str = "encrypt";

struct FragmentReader<'a> {
    fragment: &'a str,
    codec: &'a dyn SecretCodec,
    problems: Vec<String>,
    declared: HashSet<String>,
}

impl Fragment {
    /// Parse fragment `name` from `text`, decoding encrypted entries with
    /// `codec`.
    ///
    /// Sections without a name and entries without a name or value are
    /// skipped. Unexpected elements are collected and reported together.
    ///
    /// # Errors
    ///
    /// - [`OverlayError::Malformed`] when the document is not well-formed or
    ///   contains unexpected elements.
    /// - [`OverlayError::DuplicateSection`] when a section name repeats.
    /// - [`OverlayError::Decode`] when an encrypted value cannot be decoded.
    pub fn parse(
        name: impl Into<String>,
        text: &str,
        codec: &dyn SecretCodec,
    ) -> OverlayResult<Self> {
        let name = name.into();
        let root = read_document(text).map_err(|message| {
            Arc::new(OverlayError::Malformed {
                fragment: name.clone(),
                messages: vec![message],
            })
        })?;
        let mut reader = FragmentReader {
            fragment: &name,
            codec,
            problems: Vec::new(),
            declared: HashSet::new(),
        };
        let mut aliases = Vec::new();
        let mut sections = Vec::new();
        for child in &root.children {
            match child.name.as_str() {
                ALIAS_NODE => aliases.extend(reader.entries(child)?),
                PROP_NODE => reader.sections(child, &mut sections)?,
                other => reader.unexpected(other, &root.name, "'alias' or 'properties'"),
            }
        }
        let problems = reader.problems;
        if !problems.is_empty() {
            return Err(Arc::new(OverlayError::Malformed {
                fragment: name,
                messages: problems,
            }));
        }
        tracing::debug!(
            fragment = %name,
            aliases = aliases.len(),
            sections = sections.len(),
            "parsed configuration fragment"
        );
        Ok(Self {
            name,
            aliases,
            sections,
        })
    }
}

impl FragmentReader<'_> {
    fn unexpected(&mut self, found: &str, parent: &str, expected: &str) {
        self.problems.push(format!(
            "unexpected element '{found}' in '{parent}', expected {expected}"
        ));
    }

    fn sections(&mut self, properties: &Element, out: &mut Vec<SectionDecl>) -> OverlayResult<()> {
        for section in &properties.children {
            if section.name != SECTION_NODE {
                self.unexpected(&section.name, PROP_NODE, "'section'");
                continue;
            }
            let Some(name) = section.attribute(KEY_ATTR).filter(|n| !n.is_empty()) else {
                continue;
            };
            if !self.declared.insert(name.to_owned()) {
                return Err(Arc::new(OverlayError::DuplicateSection {
                    section: name.to_owned(),
                    fragment: self.fragment.to_owned(),
                }));
            }
            let inherit = !section
                .attribute(INHERIT_ATTR)
                .is_some_and(|value| UncasedStr::new(value) == INHERIT_VAL_NO);
            out.push(SectionDecl {
                name: name.to_owned(),
                inherit,
                entries: self.entries(section)?,
            });
        }
        Ok(())
    }

    fn entries(&mut self, parent: &Element) -> OverlayResult<Vec<(String, String)>> {
        let mut entries = Vec::with_capacity(parent.children.len());
        for entry in &parent.children {
            if entry.name != ENTRY_NODE {
                self.unexpected(&entry.name, &parent.name, "'entry'");
                continue;
            }
            let Some(key) = entry.attribute(KEY_ATTR).filter(|k| !k.is_empty()) else {
                continue;
            };
            let Some(value) = entry.attribute(VALUE_ATTR) else {
                continue;
            };
            let value = if entry.attribute(ENCRYPT_ATTR) == Some("true") {
                self.decode(key, value)?
            } else {
                value.to_owned()
            };
            entries.push((key.to_owned(), value));
        }
        Ok(entries)
    }

    fn decode(&self, key: &str, value: &str) -> OverlayResult<String> {
        if value.is_empty() {
            return Ok(String::new());
        }
        self.codec.decode(value).map_err(|source| {
            Arc::new(OverlayError::Decode {
                fragment: self.fragment.to_owned(),
                key: key.to_owned(),
                source,
            })
        })
    }
}

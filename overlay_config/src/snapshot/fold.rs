//! Pure folding of ordered fragments into sections and raw aliases.

use std::collections::BTreeMap;

use tracing::debug;

use super::Section;
use crate::fragment::Fragment;

/// Fold section declarations, lowest priority fragment first.
///
/// A declaration that does not inherit replaces the accumulated section;
/// otherwise its entries are layered over a copy of it.
#[must_use]
pub fn fold_sections(fragments: &[Fragment]) -> BTreeMap<String, Section> {
    let mut sections: BTreeMap<String, Section> = BTreeMap::new();
    for fragment in fragments {
        for decl in fragment.sections() {
            let mut section = if decl.inherits() {
                sections.get(decl.name()).cloned().unwrap_or_default()
            } else {
                Section::new()
            };
            section.extend(decl.entries().iter().cloned());
            sections.insert(decl.name().to_owned(), section);
        }
        debug!(
            fragment = fragment.name(),
            sections = fragment.sections().len(),
            "folded fragment"
        );
    }
    sections
}

/// Collect alias definitions; later fragments replace earlier definitions.
///
/// Names are stored without their `%` delimiters.
#[must_use]
pub fn fold_aliases(fragments: &[Fragment]) -> BTreeMap<String, String> {
    fragments
        .iter()
        .flat_map(Fragment::aliases)
        .map(|(name, value)| (crate::alias::alias_name(name).to_owned(), value.clone()))
        .collect()
}

//! Read-only, alias-expanding access to one property section.

use std::borrow::Cow;
use std::str::FromStr;
use std::sync::Arc;

use crate::alias::AliasTable;
use crate::snapshot::Section;
use crate::{OverlayError, OverlayResult};

/// View over one section of a [`crate::snapshot::PropertySnapshot`].
///
/// Every value handed out has its `%NAME%` alias tokens expanded.
#[derive(Debug, Clone, Copy)]
pub struct SectionView<'a> {
    name: &'a str,
    entries: Option<&'a Section>,
    aliases: &'a AliasTable,
}

impl<'a> SectionView<'a> {
    pub(crate) const fn new(
        name: &'a str,
        entries: Option<&'a Section>,
        aliases: &'a AliasTable,
    ) -> Self {
        Self {
            name,
            entries,
            aliases,
        }
    }

    /// Section name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// Whether the section is unknown or has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_none_or(Section::is_empty)
    }

    /// Value of `key` exactly as folded, without alias expansion.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&'a str> {
        self.entries?.get(key).map(String::as_str)
    }

    /// Alias-expanded value of `key`.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<Cow<'a, str>> {
        self.raw(key).map(|raw| self.aliases.expand(raw))
    }

    /// Alias-expanded value of `key`, or the expanded `default` when absent.
    #[must_use]
    pub fn value_or(&self, key: &str, default: &str) -> String {
        self.value(key).map_or_else(
            || self.aliases.expand(default).into_owned(),
            Cow::into_owned,
        )
    }

    /// Parse the expanded value of `key` through [`FromStr`].
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::InvalidValue`] when the value does not parse.
    ///
    /// # Examples
    ///
    /// ```
    /// use overlay_config::fragment::{Fragment, SectionDecl};
    /// use overlay_config::snapshot::PropertySnapshot;
    ///
    /// # fn run() -> overlay_config::OverlayResult<()> {
    /// let fragment = Fragment::new("f")
    ///     .with_section(SectionDecl::new("pool").with_entry("size", "8"));
    /// let snapshot = PropertySnapshot::build(&[fragment])?;
    /// let size: Option<u32> = snapshot.configuration("pool").value_as("size")?;
    /// assert_eq!(size, Some(8));
    /// # Ok(())
    /// # }
    /// ```
    pub fn value_as<T>(&self, key: &str) -> OverlayResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.value(key)
            .map(|value| {
                value.trim().parse::<T>().map_err(|e| {
                    Arc::new(OverlayError::InvalidValue {
                        section: self.name.to_owned(),
                        key: key.to_owned(),
                        source: Box::new(e),
                    })
                })
            })
            .transpose()
    }

    /// Every entry with its value expanded, sorted by key.
    pub fn entries(&self) -> impl Iterator<Item = (&'a str, Cow<'a, str>)> + 'a {
        let aliases = self.aliases;
        self.entries
            .into_iter()
            .flatten()
            .map(move |(key, value)| (key.as_str(), aliases.expand(value)))
    }

    /// Keys of the section, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.entries.into_iter().flat_map(|s| s.keys().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, anyhow, ensure};
    use rstest::rstest;

    use crate::OverlayError;
    use crate::fragment::{Fragment, SectionDecl};
    use crate::snapshot::PropertySnapshot;

    fn snapshot() -> Result<PropertySnapshot> {
        let fragment = Fragment::new("app")
            .with_alias("%DATA%", "/srv/data")
            .with_section(
                SectionDecl::new("store")
                    .with_entry("dir", "%DATA%/store")
                    .with_entry("limit", " 42 ")
                    .with_entry("ratio", "high"),
            );
        PropertySnapshot::build(&[fragment]).map_err(|e| anyhow!("{e}"))
    }

    #[test]
    fn raw_and_expanded_values_differ() -> Result<()> {
        let snapshot = snapshot()?;
        let view = snapshot.configuration("store");
        ensure!(view.raw("dir") == Some("%DATA%/store"));
        ensure!(view.value("dir").as_deref() == Some("/srv/data/store"));
        ensure!(view.value("missing").is_none());
        Ok(())
    }

    #[rstest]
    #[case("dir", "unused", "/srv/data/store")]
    #[case("missing", "%DATA%/fallback", "/srv/data/fallback")]
    #[case("missing", "plain", "plain")]
    fn value_or_expands_both_sides(
        #[case] key: &str,
        #[case] default: &str,
        #[case] expected: &str,
    ) -> Result<()> {
        let snapshot = snapshot()?;
        ensure!(snapshot.configuration("store").value_or(key, default) == expected);
        Ok(())
    }

    #[test]
    fn value_as_parses_trimmed_values() -> Result<()> {
        let snapshot = snapshot()?;
        let view = snapshot.configuration("store");
        let limit: Option<u16> = view.value_as("limit").map_err(|e| anyhow!("{e}"))?;
        ensure!(limit == Some(42));
        let absent: Option<u16> = view.value_as("missing").map_err(|e| anyhow!("{e}"))?;
        ensure!(absent.is_none());
        Ok(())
    }

    #[test]
    fn value_as_reports_section_and_key() -> Result<()> {
        let snapshot = snapshot()?;
        let err = snapshot
            .configuration("store")
            .value_as::<f64>("ratio")
            .err()
            .ok_or_else(|| anyhow!("'high' must not parse as f64"))?;
        ensure!(
            matches!(&*err, OverlayError::InvalidValue { section, key, .. } if section == "store" && key == "ratio"),
            "{err:?}"
        );
        Ok(())
    }

    #[test]
    fn entries_are_sorted_and_expanded() -> Result<()> {
        let snapshot = snapshot()?;
        let view = snapshot.configuration("store");
        let entries: Vec<(String, String)> = view
            .entries()
            .map(|(k, v)| (k.to_owned(), v.into_owned()))
            .collect();
        ensure!(entries.first() == Some(&("dir".to_owned(), "/srv/data/store".to_owned())));
        ensure!(view.keys().collect::<Vec<_>>() == ["dir", "limit", "ratio"]);
        Ok(())
    }

    #[test]
    fn unknown_sections_are_empty_views() -> Result<()> {
        let snapshot = snapshot()?;
        let view = snapshot.configuration("nope");
        ensure!(view.is_empty());
        ensure!(view.name() == "nope");
        ensure!(view.entries().next().is_none());
        ensure!(view.value_or("k", "d") == "d");
        Ok(())
    }
}

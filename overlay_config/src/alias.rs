//! Alias table with `%NAME%` token expansion.
//!
//! Aliases are collected from every fragment, later definitions replacing
//! earlier ones. Values may reference other aliases; those references are
//! resolved once when the table is built so lookups and expansion never
//! recurse at runtime.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use regex::{Captures, Regex};
use serde::Serialize;

use crate::{OverlayError, OverlayResult};

#[expect(clippy::expect_used, reason = "the token pattern is a literal")]
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%([^%\s]+)%").expect("alias token pattern"));

/// Strip the `%` delimiters from an alias definition name, if present.
///
/// # Examples
///
/// ```
/// use overlay_config::alias::alias_name;
///
/// assert_eq!(alias_name("%HOST%"), "HOST");
/// assert_eq!(alias_name("HOST"), "HOST");
/// ```
#[must_use]
pub fn alias_name(raw: &str) -> &str {
    raw.strip_prefix('%')
        .and_then(|inner| inner.strip_suffix('%'))
        .filter(|inner| !inner.is_empty())
        .unwrap_or(raw)
}

/// Fully resolved alias table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AliasTable {
    values: BTreeMap<String, String>,
}

impl AliasTable {
    /// Resolve `raw` definitions transitively.
    ///
    /// References to undefined aliases are kept verbatim. Names containing
    /// whitespace or `%` could never appear in a token, so they are dropped
    /// with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::CyclicAlias`] when definitions reference each
    /// other in a loop.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use overlay_config::alias::AliasTable;
    ///
    /// # fn run() -> overlay_config::OverlayResult<()> {
    /// let raw = BTreeMap::from([
    ///     ("ROOT".to_owned(), "/srv".to_owned()),
    ///     ("DATA".to_owned(), "%ROOT%/data".to_owned()),
    /// ]);
    /// let table = AliasTable::resolve(&raw)?;
    /// assert_eq!(table.get("DATA"), Some("/srv/data"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn resolve(raw: &BTreeMap<String, String>) -> OverlayResult<Self> {
        let mut resolved = BTreeMap::new();
        let mut stack = Vec::new();
        for name in raw.keys() {
            if !is_token_name(name) {
                tracing::warn!(alias = %name, "dropping alias that no token can reference");
                continue;
            }
            resolve_one(name, raw, &mut resolved, &mut stack)?;
        }
        Ok(Self { values: resolved })
    }

    /// Resolved value of alias `name`; `%` delimiters are optional.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(alias_name(name)).map(String::as_str)
    }

    /// Replace every `%NAME%` token of a defined alias in `input`.
    ///
    /// Input without tokens is returned borrowed and unchanged.
    #[must_use]
    pub fn expand<'s>(&self, input: &'s str) -> Cow<'s, str> {
        substitute(input, |name| self.values.get(name).map(String::as_str))
    }

    /// Number of aliases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no alias is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Aliases sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn is_token_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(|c| c == '%' || c.is_whitespace())
}

fn substitute<'s, 'v, F>(input: &'s str, lookup: F) -> Cow<'s, str>
where
    F: Fn(&str) -> Option<&'v str>,
{
    TOKEN.replace_all(input, |caps: &Captures<'_>| {
        let whole = caps.get(0).map_or("", |m| m.as_str());
        caps.get(1)
            .and_then(|name| lookup(name.as_str()))
            .unwrap_or(whole)
            .to_owned()
    })
}

fn resolve_one(
    name: &str,
    raw: &BTreeMap<String, String>,
    resolved: &mut BTreeMap<String, String>,
    stack: &mut Vec<String>,
) -> OverlayResult<String> {
    if let Some(done) = resolved.get(name) {
        return Ok(done.clone());
    }
    if let Some(start) = stack.iter().position(|entry| entry == name) {
        let mut cycle: Vec<&str> = stack.iter().skip(start).map(String::as_str).collect();
        cycle.push(name);
        return Err(Arc::new(OverlayError::CyclicAlias {
            cycle: cycle.join(" -> "),
        }));
    }
    let Some(value) = raw.get(name) else {
        return Ok(format!("%{name}%"));
    };
    stack.push(name.to_owned());
    let mut out = String::with_capacity(value.len());
    let mut last = 0;
    for caps in TOKEN.captures_iter(value) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(value.get(last..whole.start()).unwrap_or_default());
        if raw.contains_key(inner.as_str()) {
            out.push_str(&resolve_one(inner.as_str(), raw, resolved, stack)?);
        } else {
            out.push_str(whole.as_str());
        }
        last = whole.end();
    }
    out.push_str(value.get(last..).unwrap_or_default());
    stack.pop();
    resolved.insert(name.to_owned(), out.clone());
    Ok(out)
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests panic to surface configuration mistakes"
)]
mod tests {
    use std::borrow::Cow;
    use std::collections::BTreeMap;

    use rstest::rstest;

    use super::{AliasTable, alias_name};
    use crate::OverlayError;

    fn table(pairs: &[(&str, &str)]) -> crate::OverlayResult<AliasTable> {
        let raw: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        AliasTable::resolve(&raw)
    }

    #[rstest]
    #[case("%A%", "A")]
    #[case("A", "A")]
    #[case("%%", "%%")]
    #[case("%A", "%A")]
    fn strips_delimiters(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(alias_name(raw), expected);
    }

    #[test]
    fn resolves_transitively() {
        let table = table(&[("ROOT", "/srv"), ("APP", "%ROOT%/app"), ("LOG", "%APP%/log")])
            .expect("acyclic table");
        assert_eq!(table.get("LOG"), Some("/srv/app/log"));
        assert_eq!(table.get("%APP%"), Some("/srv/app"));
        assert_eq!(table.expand("dir=%LOG%/x"), "dir=/srv/app/log/x");
    }

    #[test]
    fn unknown_tokens_survive() {
        let table = table(&[("A", "a-%MISSING%")]).expect("acyclic table");
        assert_eq!(table.get("A"), Some("a-%MISSING%"));
        assert_eq!(table.expand("%MISSING% and %A%"), "%MISSING% and a-%MISSING%");
    }

    #[test]
    fn expansion_is_idempotent_and_borrows_plain_input() {
        let table = table(&[("HOST", "db.local")]).expect("acyclic table");
        let once = table.expand("jdbc://%HOST%/app");
        let twice = table.expand(&once);
        assert_eq!(once, twice);
        assert!(matches!(table.expand("50% off"), Cow::Borrowed("50% off")));
    }

    #[rstest]
    #[case(&[("A", "%A%")], "A -> A")]
    #[case(&[("A", "%B%"), ("B", "%C%"), ("C", "x%A%")], "A -> B -> C -> A")]
    fn cycles_fail_deterministically(#[case] pairs: &[(&str, &str)], #[case] cycle: &str) {
        let err = table(pairs).expect_err("cycle must be rejected");
        match err.as_ref() {
            OverlayError::CyclicAlias { cycle: found } => assert_eq!(found, cycle),
            other => panic!("expected CyclicAlias, got {other:?}"),
        }
    }

    #[test]
    fn names_with_punctuation_expand() {
        let table = table(&[("a:b", "colon"), ("APP-HOME", "/opt/app")]).expect("acyclic table");
        assert_eq!(table.expand("%a:b% in %APP-HOME%"), "colon in /opt/app");
    }

    #[test]
    fn names_no_token_can_reach_are_dropped() {
        let table = table(&[("APP HOME", "/opt/app"), ("OK", "fine")]).expect("acyclic table");
        assert_eq!(table.get("APP HOME"), None);
        assert_eq!(table.len(), 1);
        assert_eq!(table.expand("%APP HOME% %OK%"), "%APP HOME% fine");
    }

    #[test]
    fn repeated_references_are_resolved_once() {
        let table = table(&[("A", "x"), ("B", "%A%%A%")]).expect("acyclic table");
        assert_eq!(table.get("B"), Some("xx"));
    }
}
